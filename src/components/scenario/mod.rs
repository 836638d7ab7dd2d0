mod driver;
/// Scenario state machine and its timing.
pub mod player;
mod selector;
mod terminal;

pub use driver::{IntervalSlot, PlaybackDriver};
pub use player::{Phase, PlaybackConfig, PlaybackStatus, ScenarioPlayer, TickOutcome};
pub use selector::ScenarioSelector;
pub use terminal::TerminalPanel;
