//! Static graph model: node catalog, links and authored scenarios.

/// The built-in nodes, links and scenarios.
pub mod catalog;
mod types;

pub use catalog::{LINKS, NODES, SCENARIOS, composition, find_node, find_scenario};
pub use types::{Direction, FlowStep, KindStat, Link, NodeData, NodeDetails, NodeId, NodeKind, Scenario};
