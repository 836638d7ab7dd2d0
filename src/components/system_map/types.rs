use crate::model::{LINKS, Link, NODES, NodeData};

/// What the map draws: a node catalog and the links between its entries.
#[derive(Clone, Copy, Debug)]
pub struct GraphModel {
	/// Nodes to place.
	pub nodes: &'static [NodeData],
	/// Links between them.
	pub links: &'static [Link],
}

impl GraphModel {
	/// The built-in operating model.
	pub fn catalog() -> Self {
		Self {
			nodes: NODES,
			links: LINKS,
		}
	}
}

impl Default for GraphModel {
	fn default() -> Self {
		Self::catalog()
	}
}
