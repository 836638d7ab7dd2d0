//! Column-pinned force layout.
//!
//! Every node sits in the column of its [`NodeKind`]; only the vertical axis
//! is simulated. A [`Simulation`] owns the per-node position and velocity and
//! is advanced by [`Simulation::step`]. [`LayoutEngine`] drives it: a
//! synchronous pre-warm on restart, then a bounded number of per-frame steps,
//! then a final spacing pass after which the layout is frozen until the
//! inputs change.

use std::collections::HashMap;

use log::{debug, info};

use crate::model::{Link, NodeData, NodeId, NodeKind};

const COLUMNS: usize = NodeKind::ALL.len();

/// Gaps this close to the minimum spacing count as resolved.
const SPACING_EPSILON: f64 = 1e-9;

/// Tunables for the relaxation.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutConfig {
	/// Spring constant applied to the vertical difference along each link.
	pub spring: f64,
	/// Pull toward the vertical center of the viewport.
	pub centering: f64,
	/// Velocity multiplier applied every step.
	pub damping: f64,
	/// Minimum vertical distance between neighbours in a column.
	pub min_spacing: f64,
	/// Distance the outermost nodes keep from the top and bottom edges.
	pub edge_margin: f64,
	/// Half-width of the random offset added to seeded positions.
	pub jitter: f64,
	/// Fraction of the viewport height used for the initial spread.
	pub seed_band: f64,
	/// Collision sweeps per step.
	pub collision_sweeps: usize,
	/// Steps run before any position is exposed.
	pub prewarm_iterations: usize,
	/// Steps run one per frame after the pre-warm.
	pub settle_iterations: usize,
	/// Upper bound on sweeps of the final spacing pass.
	pub freeze_sweeps: usize,
	/// Seed for the jitter generator.
	pub seed: u64,
}

impl Default for LayoutConfig {
	fn default() -> Self {
		Self {
			spring: 0.08,
			centering: 0.03,
			damping: 0.55,
			min_spacing: 80.0,
			edge_margin: 60.0,
			jitter: 10.0,
			seed_band: 0.8,
			collision_sweeps: 2,
			prewarm_iterations: 100,
			settle_iterations: 60,
			freeze_sweeps: 256,
			seed: 42,
		}
	}
}

/// Size of the drawing surface in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	/// Width in CSS pixels.
	pub width: f64,
	/// Height in CSS pixels.
	pub height: f64,
}

impl Viewport {
	/// A viewport of the given size.
	pub fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	/// Zero, negative or NaN dimensions: nothing can be laid out.
	pub fn is_degenerate(&self) -> bool {
		!(self.width > 0.0 && self.height > 0.0)
	}
}

/// Position of a node center.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
	/// Horizontal, from the left edge.
	pub x: f64,
	/// Vertical, from the top edge.
	pub y: f64,
}

/// Read-only view of the layout handed to consumers.
pub type Positions = HashMap<NodeId, Point>;

/// Linear congruential generator, deterministic for a given seed.
#[derive(Clone, Debug)]
struct Jitter(u64);

impl Jitter {
	const MODULUS: u64 = 233_280;

	fn new(seed: u64) -> Self {
		Self(seed % Self::MODULUS)
	}

	/// Next value in `[0, 1)`.
	fn next_unit(&mut self) -> f64 {
		self.0 = (self.0 * 9301 + 49297) % Self::MODULUS;
		self.0 as f64 / Self::MODULUS as f64
	}
}

#[derive(Clone, Debug)]
struct Body {
	id: NodeId,
	kind: NodeKind,
	x: f64,
	y: f64,
	vy: f64,
}

/// Physics state for one set of inputs.
#[derive(Clone, Debug)]
pub struct Simulation {
	bodies: Vec<Body>,
	index: HashMap<NodeId, usize>,
	springs: Vec<(usize, usize)>,
	columns: [Vec<usize>; COLUMNS],
	viewport: Viewport,
}

impl Simulation {
	/// Seeds every node into its column, evenly spread over the central band
	/// of the viewport with a little jitter. Returns `None` for a degenerate
	/// viewport. Links with an unknown endpoint are dropped here, so later
	/// steps never see them.
	pub fn seeded(
		nodes: &[NodeData],
		links: &[Link],
		viewport: Viewport,
		config: &LayoutConfig,
	) -> Option<Self> {
		if viewport.is_degenerate() {
			debug!(
				"layout withheld for degenerate viewport {}x{}",
				viewport.width, viewport.height
			);
			return None;
		}

		let mut jitter = Jitter::new(config.seed);
		let mut bodies = Vec::with_capacity(nodes.len());
		let mut index = HashMap::with_capacity(nodes.len());
		let mut columns: [Vec<usize>; COLUMNS] = Default::default();
		let top = viewport.height * (1.0 - config.seed_band) / 2.0;

		for kind in NodeKind::ALL {
			let members: Vec<&NodeData> = nodes.iter().filter(|n| n.kind == kind).collect();
			let gap = viewport.height * config.seed_band / (members.len() + 1) as f64;
			for (i, node) in members.into_iter().enumerate() {
				if index.contains_key(node.id) {
					debug!("duplicate node id {} ignored by layout", node.id);
					continue;
				}
				let offset = (jitter.next_unit() * 2.0 - 1.0) * config.jitter;
				let idx = bodies.len();
				bodies.push(Body {
					id: node.id,
					kind,
					x: viewport.width * kind.column_fraction(),
					y: top + gap * (i + 1) as f64 + offset,
					vy: 0.0,
				});
				index.insert(node.id, idx);
				columns[kind.column()].push(idx);
			}
		}

		let springs = links
			.iter()
			.filter_map(|link| match (index.get(link.source), index.get(link.target)) {
				(Some(&src), Some(&tgt)) => Some((src, tgt)),
				_ => {
					debug!("dangling link {} -> {} skipped", link.source, link.target);
					None
				}
			})
			.collect();

		Some(Self {
			bodies,
			index,
			springs,
			columns,
			viewport,
		})
	}

	/// Viewport the simulation was seeded for.
	pub fn viewport(&self) -> Viewport {
		self.viewport
	}

	/// One relaxation step: springs, centering with damping, then collision
	/// resolution per column.
	pub fn step(&mut self, config: &LayoutConfig) {
		let Self {
			bodies,
			springs,
			columns,
			viewport,
			..
		} = self;

		for &(src, tgt) in springs.iter() {
			let force = (bodies[tgt].y - bodies[src].y) * config.spring;
			bodies[src].vy += force;
			bodies[tgt].vy -= force;
		}

		let center = viewport.height / 2.0;
		for body in bodies.iter_mut() {
			body.vy += (center - body.y) * config.centering;
			body.vy *= config.damping;
			body.y += body.vy;
			// x is never simulated
			body.x = viewport.width * body.kind.column_fraction();
		}

		for column in columns.iter_mut() {
			sort_by_y(column, bodies);
			for _ in 0..config.collision_sweeps {
				separate(column, bodies, config.min_spacing);
				clamp_ends(column, bodies, viewport.height, config.edge_margin);
			}
		}
	}

	/// Sweeps every column until no neighbours overlap or the sweep cap is
	/// hit. Columns holding more nodes than fit between the margins stay
	/// compressed at their ends.
	pub fn settle_spacing(&mut self, config: &LayoutConfig) {
		let Self {
			bodies,
			columns,
			viewport,
			..
		} = self;

		for column in columns.iter_mut() {
			sort_by_y(column, bodies);
			for _ in 0..config.freeze_sweeps {
				let moved = separate(column, bodies, config.min_spacing);
				clamp_ends(column, bodies, viewport.height, config.edge_margin);
				if !moved {
					break;
				}
			}
		}
		for body in bodies.iter_mut() {
			body.vy = 0.0;
		}
	}

	/// Current position of `id`.
	pub fn position(&self, id: &str) -> Option<Point> {
		self.index.get(id).map(|&idx| {
			let body = &self.bodies[idx];
			Point {
				x: body.x,
				y: body.y,
			}
		})
	}

	/// Snapshot of every position.
	pub fn positions(&self) -> Positions {
		self.bodies
			.iter()
			.map(|body| (body.id, Point { x: body.x, y: body.y }))
			.collect()
	}
}

fn sort_by_y(column: &mut [usize], bodies: &[Body]) {
	column.sort_by(|&a, &b| bodies[a].y.total_cmp(&bodies[b].y));
}

/// Pushes overlapping neighbours apart by half the overlap each and stops
/// them. Returns whether anything moved.
fn separate(column: &[usize], bodies: &mut [Body], min_spacing: f64) -> bool {
	let mut moved = false;
	for pair in column.windows(2) {
		let (a, b) = (pair[0], pair[1]);
		let diff = bodies[b].y - bodies[a].y;
		if diff < min_spacing - SPACING_EPSILON {
			let half = (min_spacing - diff) / 2.0;
			bodies[a].y -= half;
			bodies[b].y += half;
			bodies[a].vy = 0.0;
			bodies[b].vy = 0.0;
			moved = true;
		}
	}
	moved
}

fn clamp_ends(column: &[usize], bodies: &mut [Body], height: f64, margin: f64) {
	let (Some(&first), Some(&last)) = (column.first(), column.last()) else {
		return;
	};
	if bodies[first].y < margin {
		bodies[first].y = margin;
	}
	if bodies[last].y > height - margin {
		bodies[last].y = height - margin;
	}
}

/// Owns the current simulation and its frame budget.
///
/// [`LayoutEngine::restart`] replaces the simulation wholesale, so a step
/// scheduled for the previous inputs can never write into the new layout.
#[derive(Clone, Debug, Default)]
pub struct LayoutEngine {
	config: LayoutConfig,
	simulation: Option<Simulation>,
	remaining: usize,
	generation: u64,
}

impl LayoutEngine {
	/// An engine with no layout yet.
	pub fn new(config: LayoutConfig) -> Self {
		Self {
			config,
			..Self::default()
		}
	}

	/// Reseeds and pre-warms for new inputs. Returns the new generation.
	pub fn restart(&mut self, nodes: &[NodeData], links: &[Link], viewport: Viewport) -> u64 {
		self.generation += 1;
		self.remaining = 0;
		self.simulation = Simulation::seeded(nodes, links, viewport, &self.config);

		if let Some(sim) = self.simulation.as_mut() {
			for _ in 0..self.config.prewarm_iterations {
				sim.step(&self.config);
			}
			self.remaining = self.config.settle_iterations;
			if self.remaining == 0 {
				sim.settle_spacing(&self.config);
			}
			info!(
				"layout #{} seeded {} nodes for {}x{}",
				self.generation,
				sim.bodies.len(),
				viewport.width,
				viewport.height
			);
		}
		self.generation
	}

	/// Runs one frame's worth of relaxation. Returns `true` while further
	/// frames are wanted; once it returns `false` the layout is frozen.
	pub fn advance_frame(&mut self) -> bool {
		let Some(sim) = self.simulation.as_mut() else {
			return false;
		};
		if self.remaining == 0 {
			return false;
		}
		sim.step(&self.config);
		self.remaining -= 1;
		if self.remaining == 0 {
			sim.settle_spacing(&self.config);
			debug!("layout #{} frozen", self.generation);
		}
		self.remaining > 0
	}

	/// Spends the rest of the frame budget at once.
	pub fn run_to_completion(&mut self) {
		while self.advance_frame() {}
	}

	/// Whether the layout has stopped moving.
	pub fn is_frozen(&self) -> bool {
		self.remaining == 0
	}

	/// Bumped by each restart.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Viewport of the current layout, if it has one.
	pub fn viewport(&self) -> Option<Viewport> {
		self.simulation.as_ref().map(Simulation::viewport)
	}

	/// Position of `id` in the current layout.
	pub fn position(&self, id: &str) -> Option<Point> {
		self.simulation.as_ref().and_then(|sim| sim.position(id))
	}

	/// Empty until a non-degenerate viewport has been seen.
	pub fn positions(&self) -> Positions {
		self.simulation
			.as_ref()
			.map(Simulation::positions)
			.unwrap_or_default()
	}
}

/// Full synchronous layout: seed, pre-warm, settle, freeze.
pub fn compute_layout(
	nodes: &[NodeData],
	links: &[Link],
	width: f64,
	height: f64,
	config: &LayoutConfig,
) -> Positions {
	let mut engine = LayoutEngine::new(config.clone());
	engine.restart(nodes, links, Viewport::new(width, height));
	engine.run_to_completion();
	engine.positions()
}
