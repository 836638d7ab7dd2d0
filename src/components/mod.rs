//! Leptos components: the map canvas, the scenario overlays and the page chrome.

mod header;
mod info_panel;
/// Scenario picker, playback and execution log.
pub mod scenario;
/// The canvas map and the pure layout, highlight and interaction state behind it.
pub mod system_map;

pub use header::Header;
pub use info_panel::InfoPanel;
