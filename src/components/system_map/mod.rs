mod component;
/// Reachability and focus resolution.
pub mod highlight;
/// Column-pinned layout engine.
pub mod layout;
mod render;
/// Selection, easing and hit-testing between frames.
pub mod state;
mod types;

pub use component::SystemMapCanvas;
pub use highlight::{AdjacencyIndex, FocusMode, Highlights, LinkEmphasis};
pub use layout::{LayoutConfig, LayoutEngine, Point, Positions, Viewport, compute_layout};
pub use state::{ClickIntent, SelectionState};
pub use types::GraphModel;
