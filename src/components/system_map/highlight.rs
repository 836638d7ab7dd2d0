//! Reachability highlighting and focus resolution.

use std::collections::{HashMap, HashSet, VecDeque};

use log::debug;

use crate::model::{Direction, FlowStep, Link, NodeData, NodeId};

/// Direct successors and predecessors of every node, built once from the
/// link list. Links naming an unknown node are left out.
#[derive(Clone, Debug, Default)]
pub struct AdjacencyIndex {
	downstream: HashMap<NodeId, Vec<NodeId>>,
	upstream: HashMap<NodeId, Vec<NodeId>>,
}

/// Everything upstream and downstream of a focus node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Highlights {
	/// Nodes on any path through the focus.
	pub nodes: HashSet<NodeId>,
	/// Links on any path through the focus.
	pub links: HashSet<Link>,
}

impl Highlights {
	/// Whether `id` is highlighted.
	pub fn contains_node(&self, id: &str) -> bool {
		self.nodes.contains(id)
	}

	/// Whether `link` is highlighted.
	pub fn contains_link(&self, link: &Link) -> bool {
		self.links.contains(link)
	}
}

impl AdjacencyIndex {
	/// Indexes `links`, skipping any whose ends are not in `nodes`.
	pub fn new(nodes: &[NodeData], links: &[Link]) -> Self {
		let known: HashSet<NodeId> = nodes.iter().map(|n| n.id).collect();
		let mut index = Self::default();
		for link in links {
			if !known.contains(link.source) || !known.contains(link.target) {
				debug!("dangling link {} -> {} left out of adjacency", link.source, link.target);
				continue;
			}
			index.downstream.entry(link.source).or_default().push(link.target);
			index.upstream.entry(link.target).or_default().push(link.source);
		}
		index
	}

	/// Direct targets of `id`.
	pub fn successors(&self, id: &str) -> &[NodeId] {
		self.downstream.get(id).map(Vec::as_slice).unwrap_or_default()
	}

	/// Direct sources of `id`.
	pub fn predecessors(&self, id: &str) -> &[NodeId] {
		self.upstream.get(id).map(Vec::as_slice).unwrap_or_default()
	}

	/// Full reachability closure in both directions. The focus node is always
	/// part of the result, even if the index has never heard of it.
	pub fn highlights_for(&self, focus: NodeId) -> Highlights {
		let mut highlights = Highlights::default();
		highlights.nodes.insert(focus);
		self.walk(focus, &mut highlights, |index, id| index.successors(id), |from, to| Link::new(from, to));
		self.walk(focus, &mut highlights, |index, id| index.predecessors(id), |from, to| Link::new(to, from));
		highlights
	}

	fn walk<'a>(
		&'a self,
		focus: NodeId,
		highlights: &mut Highlights,
		neighbours: impl Fn(&'a Self, &str) -> &'a [NodeId],
		edge: impl Fn(NodeId, NodeId) -> Link,
	) {
		let mut visited = HashSet::from([focus]);
		let mut queue = VecDeque::from([focus]);
		while let Some(current) = queue.pop_front() {
			for &next in neighbours(self, current) {
				highlights.links.insert(edge(current, next));
				if visited.insert(next) {
					highlights.nodes.insert(next);
					queue.push_back(next);
				}
			}
		}
	}
}

/// The single value the renderer derives emphasis from, resolved once per
/// frame. Flow playback beats hover and selection.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FocusMode {
	/// Nothing focused; every node drawn normally.
	#[default]
	None,
	/// A hovered or selected node and what it reaches.
	Reachability {
		/// The focus node.
		node: NodeId,
		/// Its closure in both directions.
		highlights: Highlights,
	},
	/// A scenario step in flight.
	FlowStep {
		/// Sending node.
		from: NodeId,
		/// Receiving node.
		to: NodeId,
	},
}

/// How a link should be drawn under the current focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkEmphasis {
	/// Carries the active flow step, in the given direction.
	Flow(Direction),
	/// On a highlighted path.
	Highlighted,
	/// No focus active.
	Normal,
	/// Dimmed by the focus.
	Suppressed,
}

impl FocusMode {
	/// Picks the focus for this frame. A flow step wins over a hovered or selected node.
	pub fn resolve(index: &AdjacencyIndex, focus: Option<NodeId>, step: Option<&FlowStep>) -> Self {
		match (step, focus) {
			(Some(step), _) => FocusMode::FlowStep {
				from: step.from,
				to: step.to,
			},
			(None, Some(node)) => FocusMode::Reachability {
				node,
				highlights: index.highlights_for(node),
			},
			(None, None) => FocusMode::None,
		}
	}

	/// Whether anything is focused.
	pub fn is_active(&self) -> bool {
		!matches!(self, FocusMode::None)
	}

	/// Emphasized under the current focus: a flow endpoint or a reachable node.
	pub fn is_node_emphasized(&self, id: &str) -> bool {
		match self {
			FocusMode::None => false,
			FocusMode::Reachability { highlights, .. } => highlights.contains_node(id),
			FocusMode::FlowStep { from, to } => *from == id || *to == id,
		}
	}

	/// Whether `id` is dimmed.
	pub fn is_node_suppressed(&self, id: &str) -> bool {
		self.is_active() && !self.is_node_emphasized(id)
	}

	/// Whether `id` is the hovered, selected or sending or receiving node.
	pub fn is_focus_node(&self, id: &str) -> bool {
		matches!(self, FocusMode::Reachability { node, .. } if *node == id)
	}

	/// Styling for `link`.
	pub fn link_emphasis(&self, link: &Link) -> LinkEmphasis {
		match self {
			FocusMode::None => LinkEmphasis::Normal,
			FocusMode::Reachability { highlights, .. } => {
				if highlights.contains_link(link) {
					LinkEmphasis::Highlighted
				} else {
					LinkEmphasis::Suppressed
				}
			}
			FocusMode::FlowStep { from, to } => {
				if link.source == *from && link.target == *to {
					LinkEmphasis::Flow(Direction::Forward)
				} else if link.source == *to && link.target == *from {
					LinkEmphasis::Flow(Direction::Reverse)
				} else {
					LinkEmphasis::Suppressed
				}
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::{LINKS, NODES, find_scenario};

	fn index() -> AdjacencyIndex {
		AdjacencyIndex::new(NODES, LINKS)
	}

	#[test]
	fn test_hover_cosmos_dba() {
		let hl = index().highlights_for("cosmos-dba");
		for id in [
			"cosmos-dba",
			"main-agent",
			"cosmosdb-cli-wrapper",
			"cosmosdb-data-ops",
			"data-export",
			"mcp-azure",
			"mcp-github",
		] {
			assert!(hl.contains_node(id), "missing {id}");
		}
		assert!(!hl.contains_node("devops-agent"));
		assert!(!hl.contains_node("mcp-notion"));
		assert!(hl.contains_link(&Link::new("cosmosdb-cli-wrapper", "mcp-azure")));
		assert!(hl.contains_link(&Link::new("main-agent", "cosmos-dba")));
		assert!(!hl.contains_link(&Link::new("main-agent", "devops-agent")));
	}

	#[test]
	fn test_upstream_closure_of_connector() {
		let hl = index().highlights_for("mcp-azure");
		for id in [
			"cosmosdb-cli-wrapper",
			"cosmosdb-data-ops",
			"azure-cli-wrapper",
			"foundry-persona",
			"cosmos-dba",
			"devops-agent",
			"product-manager",
			"main-agent",
		] {
			assert!(hl.contains_node(id), "missing {id}");
		}
		// upstream walk only; siblings of ancestors are not pulled in
		assert!(!hl.contains_node("notion-backlog"));
	}

	fn reachable_from(index: &AdjacencyIndex, start: NodeId) -> HashSet<NodeId> {
		let mut seen = HashSet::new();
		let mut stack = vec![start];
		while let Some(id) = stack.pop() {
			for &next in index.successors(id) {
				if seen.insert(next) {
					stack.push(next);
				}
			}
		}
		seen
	}

	#[test]
	fn test_reachability_is_symmetric() {
		let index = index();
		for a in NODES {
			let hl_a = index.highlights_for(a.id);
			for b in reachable_from(&index, a.id) {
				assert!(hl_a.contains_node(b), "{} should reach {}", a.id, b);
				assert!(
					index.highlights_for(b).contains_node(a.id),
					"{} should see {} upstream",
					b,
					a.id
				);
			}
		}
	}

	#[test]
	fn test_path_endpoints_see_each_other() {
		let index = index();
		// main-agent -> secretaire -> team-directory -> mcp-github
		assert!(index.highlights_for("main-agent").contains_node("mcp-github"));
		assert!(index.highlights_for("mcp-github").contains_node("main-agent"));
		assert!(index.highlights_for("team-directory").contains_node("main-agent"));
		assert!(index.highlights_for("main-agent").contains_node("team-directory"));
	}

	#[test]
	fn test_isolated_and_unknown_focus() {
		let index = index();
		let hl = index.highlights_for("mcp-browser");
		assert_eq!(hl.nodes, HashSet::from(["mcp-browser"]));
		assert!(hl.links.is_empty());

		let hl = index.highlights_for("ghost");
		assert_eq!(hl.nodes, HashSet::from(["ghost"]));
	}

	#[test]
	fn test_dangling_links_are_skipped() {
		let mut links = LINKS.to_vec();
		links.push(Link::new("cosmos-dba", "ghost"));
		let index = AdjacencyIndex::new(NODES, &links);
		assert!(!index.successors("cosmos-dba").contains(&"ghost"));
		assert!(!index.highlights_for("cosmos-dba").contains_node("ghost"));
	}

	#[test]
	fn test_flow_step_overrides_hover() {
		let index = index();
		let flow = find_scenario("feature-spec").unwrap();
		let mode = FocusMode::resolve(&index, Some("cosmos-dba"), Some(&flow.steps[0]));
		assert_eq!(
			mode,
			FocusMode::FlowStep {
				from: "main-agent",
				to: "product-manager"
			}
		);
		assert!(mode.is_node_emphasized("product-manager"));
		assert!(mode.is_node_suppressed("cosmos-dba"));
		assert_eq!(
			mode.link_emphasis(&Link::new("main-agent", "product-manager")),
			LinkEmphasis::Flow(Direction::Forward)
		);
		assert_eq!(
			mode.link_emphasis(&Link::new("main-agent", "cosmos-dba")),
			LinkEmphasis::Suppressed
		);

		// the report step runs against the link direction
		let back = FocusMode::resolve(&index, None, Some(&flow.steps[5]));
		assert_eq!(
			back.link_emphasis(&Link::new("main-agent", "product-manager")),
			LinkEmphasis::Flow(Direction::Reverse)
		);
	}

	#[test]
	fn test_reachability_and_none() {
		let index = index();
		let mode = FocusMode::resolve(&index, Some("devops-agent"), None);
		assert!(mode.is_focus_node("devops-agent"));
		assert!(mode.is_node_emphasized("mcp-azure"));
		assert!(mode.is_node_suppressed("secretaire"));
		assert_eq!(
			mode.link_emphasis(&Link::new("devops-agent", "azure-cli-wrapper")),
			LinkEmphasis::Highlighted
		);
		assert_eq!(
			mode.link_emphasis(&Link::new("secretaire", "email-sender")),
			LinkEmphasis::Suppressed
		);

		let none = FocusMode::resolve(&index, None, None);
		assert!(!none.is_active());
		assert!(NODES.iter().all(|n| !none.is_node_suppressed(n.id)));
		assert_eq!(none.link_emphasis(&LINKS[0]), LinkEmphasis::Normal);
	}
}
