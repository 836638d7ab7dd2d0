use std::collections::HashMap;

use log::debug;

use super::highlight::{AdjacencyIndex, FocusMode};
use super::layout::{LayoutConfig, LayoutEngine, Point, Viewport};
use super::types::GraphModel;
use crate::model::{NodeData, NodeId, NodeKind};

/// Pill width for every node.
pub const NODE_WIDTH: f64 = 220.0;
/// Pill height for everything but the orchestrator.
pub const NODE_HEIGHT: f64 = 52.0;
/// The orchestrator pill carries the "run scenarios" badge.
pub const ORCHESTRATOR_HEIGHT: f64 = 78.0;
/// Scale applied to the endpoints of the active flow step.
pub const FLOW_SCALE: f64 = 1.15;

/// Seconds per frame the loop assumes.
pub const FRAME_DT: f64 = 0.016;
/// How quickly drawn positions chase the layout, per second.
const FOLLOW_RATE: f64 = 12.0;

/// Pill height for a node of `kind`.
pub fn pill_height(kind: NodeKind) -> f64 {
	match kind {
		NodeKind::Orchestrator => ORCHESTRATOR_HEIGHT,
		_ => NODE_HEIGHT,
	}
}

/// Hovered and selected node. Hover wins when both are set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SelectionState {
	/// Node under the pointer.
	pub hovered: Option<NodeId>,
	/// Node clicked last, shown in the info panel.
	pub selected: Option<NodeId>,
}

/// What a click on a node asks the page to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickIntent {
	/// Show the scenario picker.
	OpenScenarios,
	/// Show this node in the info panel.
	Select(NodeId),
}

impl ClickIntent {
	/// Whether the scenario picker is open after this click. Any other
	/// node click closes it.
	pub fn shows_scenarios(self) -> bool {
		self == ClickIntent::OpenScenarios
	}
}

impl SelectionState {
	/// Marks `id` as hovered.
	pub fn hover_enter(&mut self, id: NodeId) {
		self.hovered = Some(id);
	}

	/// Clears hover only if `id` is the node currently hovered.
	pub fn hover_leave(&mut self, id: NodeId) {
		if self.hovered == Some(id) {
			self.hovered = None;
		}
	}

	/// Selects `id`.
	pub fn select(&mut self, id: NodeId) {
		self.selected = Some(id);
	}

	/// Drops the selection; hover is untouched.
	pub fn clear_selection(&mut self) {
		self.selected = None;
	}

	/// The node to highlight from: hover, else selection.
	pub fn focus(&self) -> Option<NodeId> {
		self.hovered.or(self.selected)
	}

	/// The orchestrator opens the scenario picker instead of being selected.
	pub fn click(&mut self, node: &NodeData) -> ClickIntent {
		if node.kind == NodeKind::Orchestrator {
			self.selected = None;
			ClickIntent::OpenScenarios
		} else {
			self.selected = Some(node.id);
			ClickIntent::Select(node.id)
		}
	}
}

/// Fade of the dimming overlay, 0 = nothing dimmed, 1 = fully dimmed.
#[derive(Clone, Debug, Default)]
pub struct EmphasisState {
	/// Current fade amount.
	pub t: f64,
	/// Last active focus, kept so the fade-out has something to draw.
	pub fading: FocusMode,
	delay_t: f64,
}

/// Everything the canvas needs between frames.
pub struct SystemMapState {
	/// Nodes and links being drawn.
	pub model: GraphModel,
	/// Layout the pills chase.
	pub layout: LayoutEngine,
	/// Adjacency of `model`.
	pub adjacency: AdjacencyIndex,
	/// Fade of the focus overlay.
	pub emphasis: EmphasisState,
	/// Size of the canvas in CSS pixels.
	pub viewport: Viewport,
	/// Seconds since the map was created; drives dash and particle motion.
	pub flow_time: f64,
	drawn: HashMap<NodeId, Point>,
}

impl SystemMapState {
	/// Seeds a layout for `viewport` straight away.
	pub fn new(model: GraphModel, config: LayoutConfig, viewport: Viewport) -> Self {
		let mut state = Self {
			model,
			layout: LayoutEngine::new(config),
			adjacency: AdjacencyIndex::new(model.nodes, model.links),
			emphasis: EmphasisState::default(),
			viewport,
			flow_time: 0.0,
			drawn: HashMap::new(),
		};
		state.layout.restart(model.nodes, model.links, viewport);
		state
	}

	/// Throws the layout away and starts over for the new size.
	pub fn resize(&mut self, viewport: Viewport) {
		if viewport == self.viewport {
			return;
		}
		debug!("viewport {}x{}", viewport.width, viewport.height);
		self.viewport = viewport;
		self.drawn.clear();
		self.layout.restart(self.model.nodes, self.model.links, viewport);
	}

	/// Swaps the graph and restarts the layout.
	pub fn set_model(&mut self, model: GraphModel) {
		self.model = model;
		self.adjacency = AdjacencyIndex::new(model.nodes, model.links);
		self.drawn.clear();
		self.layout.restart(model.nodes, model.links, self.viewport);
	}

	/// Where a node is drawn this frame. Follows the layout with easing so
	/// the final spacing pass and restarts do not jump.
	pub fn drawn_position(&self, id: &str) -> Option<Point> {
		self.drawn.get(id).copied()
	}

	/// The focus to draw with: the live one, or the previous one while the
	/// dimming fades out.
	pub fn render_focus<'a>(&'a self, live: &'a FocusMode) -> &'a FocusMode {
		if live.is_active() {
			live
		} else {
			&self.emphasis.fading
		}
	}

	/// Advances the layout, the flow clock and the emphasis fade by `dt` seconds.
	pub fn tick(&mut self, dt: f64, focus: &FocusMode) {
		self.layout.advance_frame();
		self.flow_time += dt;
		self.follow_layout(dt);
		self.ease_emphasis(dt, focus);
	}

	fn follow_layout(&mut self, dt: f64) {
		let blend = 1.0 - (-FOLLOW_RATE * dt).exp();
		for node in self.model.nodes {
			let Some(target) = self.layout.position(node.id) else {
				continue;
			};
			let drawn = self.drawn.entry(node.id).or_insert(target);
			drawn.x = target.x;
			drawn.y += (target.y - drawn.y) * blend;
			if (target.y - drawn.y).abs() < 0.05 {
				drawn.y = target.y;
			}
		}
	}

	fn ease_emphasis(&mut self, dt: f64, focus: &FocusMode) {
		let em = &mut self.emphasis;
		if focus.is_active() {
			if !em.fading.is_active() {
				em.delay_t = 0.0;
			}
			em.fading = focus.clone();
			em.delay_t = (em.delay_t + dt).min(0.08);
			if em.delay_t >= 0.08 {
				em.t += (1.0 - em.t) * (8.0 * dt).min(1.0);
			}
		} else {
			em.t -= em.t * (6.0 * dt).min(1.0);
			if em.t < 0.01 {
				em.t = 0.0;
				em.fading = FocusMode::None;
			}
		}
	}

	/// Topmost node whose pill contains the point.
	pub fn node_at_position(&self, x: f64, y: f64) -> Option<NodeId> {
		self.model.nodes.iter().rev().find_map(|node| {
			let p = self.drawn_position(node.id)?;
			let (half_w, half_h) = (NODE_WIDTH / 2.0, pill_height(node.kind) / 2.0);
			((x - p.x).abs() <= half_w && (y - p.y).abs() <= half_h).then_some(node.id)
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::{SCENARIOS, find_node};

	fn settled(viewport: Viewport) -> SystemMapState {
		let mut state = SystemMapState::new(GraphModel::catalog(), LayoutConfig::default(), viewport);
		for _ in 0..400 {
			state.tick(FRAME_DT, &FocusMode::None);
		}
		state
	}

	#[test]
	fn test_hover_beats_selection() {
		let mut sel = SelectionState::default();
		assert_eq!(sel.focus(), None);
		sel.select("devops-agent");
		assert_eq!(sel.focus(), Some("devops-agent"));
		sel.hover_enter("cosmos-dba");
		assert_eq!(sel.focus(), Some("cosmos-dba"));
		sel.hover_leave("secretaire");
		assert_eq!(sel.focus(), Some("cosmos-dba"));
		sel.hover_leave("cosmos-dba");
		assert_eq!(sel.focus(), Some("devops-agent"));
		sel.clear_selection();
		assert_eq!(sel.focus(), None);
	}

	#[test]
	fn test_orchestrator_click_opens_scenarios() {
		let mut sel = SelectionState::default();
		sel.select("devops-agent");
		let main = find_node("main-agent").unwrap();
		assert_eq!(sel.click(main), ClickIntent::OpenScenarios);
		assert_eq!(sel.selected, None);

		let skill = find_node("data-export").unwrap();
		assert_eq!(sel.click(skill), ClickIntent::Select("data-export"));
		assert_eq!(sel.selected, Some("data-export"));
	}

	#[test]
	fn test_node_click_closes_scenario_picker() {
		let mut sel = SelectionState::default();
		let main = find_node("main-agent").unwrap();
		assert!(sel.click(main).shows_scenarios());

		for id in ["cosmos-dba", "notion-backlog", "mcp-browser"] {
			let node = find_node(id).unwrap();
			assert!(!sel.click(node).shows_scenarios());
			assert_eq!(sel.selected, Some(id));
		}
	}

	#[test]
	fn test_drawn_positions_converge_to_layout() {
		let state = settled(Viewport::new(1200.0, 800.0));
		assert!(state.layout.is_frozen());
		for node in ["main-agent", "cosmos-dba", "data-export", "mcp-browser"] {
			let drawn = state.drawn_position(node).unwrap();
			let target = state.layout.position(node).unwrap();
			assert_eq!(drawn, target);
		}
	}

	#[test]
	fn test_hit_testing_uses_pill_bounds() {
		let state = settled(Viewport::new(1200.0, 800.0));
		let p = state.drawn_position("main-agent").unwrap();
		assert_eq!(state.node_at_position(p.x, p.y), Some("main-agent"));
		assert_eq!(state.node_at_position(p.x + NODE_WIDTH / 2.0 - 1.0, p.y), Some("main-agent"));
		assert_eq!(state.node_at_position(p.x - NODE_WIDTH, p.y), None);
		assert_eq!(state.node_at_position(5.0, 5.0), None);
	}

	#[test]
	fn test_degenerate_viewport_has_nothing_to_hit() {
		let state = settled(Viewport::new(0.0, 0.0));
		assert!(state.drawn_position("main-agent").is_none());
		assert_eq!(state.node_at_position(0.0, 0.0), None);
	}

	#[test]
	fn test_resize_restarts_layout() {
		let mut state = settled(Viewport::new(1200.0, 800.0));
		let before = state.layout.generation();
		state.resize(Viewport::new(1200.0, 800.0));
		assert_eq!(state.layout.generation(), before);

		state.resize(Viewport::new(900.0, 700.0));
		assert!(state.layout.generation() > before);
		assert!(!state.layout.is_frozen());
		state.tick(FRAME_DT, &FocusMode::None);
		assert_eq!(state.drawn_position("main-agent").map(|p| p.x), Some(900.0 * 0.15));
	}

	#[test]
	fn test_emphasis_fades_in_and_out() {
		let mut state = settled(Viewport::new(1200.0, 800.0));
		let step = &SCENARIOS[0].steps[0];
		let focus = FocusMode::resolve(&state.adjacency, None, Some(step));
		for _ in 0..120 {
			state.tick(FRAME_DT, &focus);
		}
		assert!(state.emphasis.t > 0.9);

		let none = FocusMode::None;
		state.tick(FRAME_DT, &none);
		assert_eq!(state.render_focus(&none), &focus);
		for _ in 0..240 {
			state.tick(FRAME_DT, &none);
		}
		assert_eq!(state.emphasis.t, 0.0);
		assert!(!state.render_focus(&none).is_active());
	}
}
