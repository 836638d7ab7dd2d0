/// Node identifiers are catalog string slices; nothing creates ids at runtime.
pub type NodeId = &'static str;

/// The four component tiers, left to right in dependency order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
	/// The main agent that delegates work.
	Orchestrator,
	/// Specialised agents the orchestrator delegates to.
	SubAgent,
	/// Skills invoked by sub-agents.
	Skill,
	/// External service connectors (MCP servers).
	Connector,
}

impl NodeKind {
	/// Every kind in column order.
	pub const ALL: [NodeKind; 4] = [
		NodeKind::Orchestrator,
		NodeKind::SubAgent,
		NodeKind::Skill,
		NodeKind::Connector,
	];

	/// Column index, 0 being the leftmost.
	pub fn column(self) -> usize {
		match self {
			NodeKind::Orchestrator => 0,
			NodeKind::SubAgent => 1,
			NodeKind::Skill => 2,
			NodeKind::Connector => 3,
		}
	}

	/// Horizontal position of the column as a fraction of viewport width.
	pub fn column_fraction(self) -> f64 {
		match self {
			NodeKind::Orchestrator => 0.15,
			NodeKind::SubAgent => 0.38,
			NodeKind::Skill => 0.62,
			NodeKind::Connector => 0.85,
		}
	}

	/// Header drawn above the column.
	pub fn column_label(self) -> &'static str {
		match self {
			NodeKind::Orchestrator => "ORCHESTRATOR",
			NodeKind::SubAgent => "AGENTS SQUAD",
			NodeKind::Skill => "SKILLS",
			NodeKind::Connector => "MCP SERVERS",
		}
	}

	/// Name used in composition stats and the info panel.
	pub fn display_name(self) -> &'static str {
		match self {
			NodeKind::Orchestrator => "Orchestrator",
			NodeKind::SubAgent => "Sub Agents",
			NodeKind::Skill => "Skills",
			NodeKind::Connector => "MCPs",
		}
	}

	/// Swatch color for the kind.
	pub fn swatch(self) -> &'static str {
		match self {
			NodeKind::Orchestrator => "#8b5cf6",
			NodeKind::SubAgent => "#3b82f6",
			NodeKind::Skill => "#10b981",
			NodeKind::Connector => "#f59e0b",
		}
	}
}

/// Optional detail payload shown in the info panel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeDetails {
	/// One-line purpose.
	pub mission: Option<&'static str>,
	/// Labels of the skills the agent calls.
	pub skills_used: &'static [&'static str],
	/// Labels of the MCP servers it relies on.
	pub connectors_used: &'static [&'static str],
	/// Safety note shown in red.
	pub special: Option<&'static str>,
}

/// A catalog entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeData {
	/// Stable key used by links and scenarios.
	pub id: NodeId,
	/// Display name.
	pub label: &'static str,
	/// Decides the column.
	pub kind: NodeKind,
	/// Shown under the title.
	pub description: &'static str,
	/// Palette tag, see [`NodeData::accent`].
	pub color: &'static str,
	/// Icon name; its first letter is drawn in the badge.
	pub icon: &'static str,
	/// Linked context document.
	pub context_file: Option<&'static str>,
	/// Extra panel content for sub-agents.
	pub details: Option<NodeDetails>,
}

impl NodeData {
	/// Resolves the palette tag to a hex color.
	pub fn accent(&self) -> &'static str {
		match self.color {
			"violet" => "#8b5cf6",
			"blue" => "#3b82f6",
			"emerald" => "#10b981",
			"amber" => "#f59e0b",
			"cyan" => "#06b6d4",
			"fuchsia" => "#d946ef",
			"orange" => "#f97316",
			"rose" => "#f43f5e",
			_ => "#64748b",
		}
	}
}

/// Directed link between two node ids. Doubles as the link identifier in
/// highlight sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Link {
	/// Calling node.
	pub source: NodeId,
	/// Called node.
	pub target: NodeId,
}

impl Link {
	/// A link from `source` to `target`.
	pub const fn new(source: NodeId, target: NodeId) -> Self {
		Self { source, target }
	}
}

/// One directed interaction of a scenario.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlowStep {
	/// Short name shown in the execution log.
	pub label: &'static str,
	/// Sending node.
	pub from: NodeId,
	/// Receiving node.
	pub to: NodeId,
	/// What happens in this step.
	pub description: &'static str,
}

/// Whether a step follows a link's direction or runs against it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
	/// Same direction as the link.
	Forward,
	/// Back along the link, as a response.
	Reverse,
}

/// Authored interaction flow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scenario {
	/// Key passed to the player.
	pub id: &'static str,
	/// Shown in the picker and the log.
	pub title: &'static str,
	/// Shown under the title.
	pub description: &'static str,
	/// Played in order.
	pub steps: &'static [FlowStep],
}

/// Node count for one kind, shown in the header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KindStat {
	/// The kind counted.
	pub kind: NodeKind,
	/// Number of nodes of that kind.
	pub count: usize,
}
