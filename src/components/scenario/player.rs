//! Scripted playback of a scenario, one step per dwell interval.

use std::time::Duration;

use log::{debug, info};

use crate::model::{FlowStep, Scenario};

/// Timing for scenario playback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaybackConfig {
	/// Time each step stays active before the next one.
	pub dwell: Duration,
}

impl Default for PlaybackConfig {
	fn default() -> Self {
		Self {
			dwell: Duration::from_millis(2500),
		}
	}
}

/// Display-only summary of the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackStatus {
	/// No scenario loaded.
	Idle,
	/// A scenario is armed or stepping.
	Running,
	/// Every step has been shown.
	Completed,
}

/// Where the player is within a scenario.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
	/// No scenario loaded.
	#[default]
	Idle,
	/// Scenario chosen, nothing shown yet.
	Armed,
	/// Showing the step at this index.
	Stepping(usize),
	/// Every step has been shown; terminal until abort or a new start.
	Completed,
}

/// Result of feeding a timer tick to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
	/// Moved on to the next step.
	Advanced,
	/// The last step has been passed; the timer should stop.
	Completed,
	/// Stale generation or nothing left to advance.
	Ignored,
}

/// Timed state machine over one scenario at a time.
///
/// Every start and abort bumps the generation. Timers capture the generation
/// they were started for and pass it back to [`ScenarioPlayer::tick`], so a
/// tick that outlived its scenario is recognised and dropped.
#[derive(Clone, Debug, Default)]
pub struct ScenarioPlayer {
	scenario: Option<&'static Scenario>,
	phase: Phase,
	generation: u64,
}

impl ScenarioPlayer {
	/// An idle player.
	pub fn new() -> Self {
		Self::default()
	}

	/// Arms `id` from `catalog`, discarding whatever was playing. Unknown ids
	/// leave the player untouched and return `None`.
	pub fn start(&mut self, catalog: &'static [Scenario], id: &str) -> Option<u64> {
		let Some(scenario) = catalog.iter().find(|s| s.id == id) else {
			debug!("unknown scenario {id} ignored");
			return None;
		};
		if let Some(previous) = self.scenario {
			debug!("scenario {} replaced by {}", previous.id, scenario.id);
		}
		self.generation += 1;
		self.scenario = Some(scenario);
		self.phase = Phase::Armed;
		info!("scenario {} armed ({} steps)", scenario.id, scenario.steps.len());
		Some(self.generation)
	}

	/// Back to idle from any state.
	pub fn abort(&mut self) {
		self.generation += 1;
		if let Some(scenario) = self.scenario.take() {
			info!("scenario {} closed", scenario.id);
		}
		self.phase = Phase::Idle;
	}

	/// Advances by one step if `generation` is current. Armed moves straight
	/// to the first step.
	pub fn tick(&mut self, generation: u64) -> TickOutcome {
		if !self.is_current(generation) {
			debug!("stale playback tick {generation} (current {})", self.generation);
			return TickOutcome::Ignored;
		}
		let Some(scenario) = self.scenario else {
			return TickOutcome::Ignored;
		};
		let len = scenario.steps.len();
		let next = match self.phase {
			Phase::Armed => 0,
			Phase::Stepping(i) => i + 1,
			Phase::Idle | Phase::Completed => return TickOutcome::Ignored,
		};
		if next >= len {
			self.phase = Phase::Completed;
			info!("scenario {} completed", scenario.id);
			TickOutcome::Completed
		} else {
			self.phase = Phase::Stepping(next);
			TickOutcome::Advanced
		}
	}

	/// Ticket of the current run; ticks carrying another one are ignored.
	pub fn generation(&self) -> u64 {
		self.generation
	}

	/// Whether ticks carrying `generation` are still accepted.
	pub fn is_current(&self, generation: u64) -> bool {
		self.generation == generation
	}

	/// Current phase.
	pub fn phase(&self) -> Phase {
		self.phase
	}

	/// The loaded scenario, kept after completion until abort.
	pub fn scenario(&self) -> Option<&'static Scenario> {
		self.scenario
	}

	/// Summary for the header and log panel.
	pub fn status(&self) -> PlaybackStatus {
		match self.phase {
			Phase::Idle => PlaybackStatus::Idle,
			Phase::Armed | Phase::Stepping(_) => PlaybackStatus::Running,
			Phase::Completed => PlaybackStatus::Completed,
		}
	}

	/// -1 before the first step, the step number while stepping, the step
	/// count once completed.
	pub fn step_index(&self) -> isize {
		match (self.phase, self.scenario) {
			(Phase::Stepping(i), _) => i as isize,
			(Phase::Completed, Some(scenario)) => scenario.steps.len() as isize,
			_ => -1,
		}
	}

	/// The step whose edge is in flight.
	pub fn active_step(&self) -> Option<&'static FlowStep> {
		match (self.phase, self.scenario) {
			(Phase::Stepping(i), Some(scenario)) => scenario.steps.get(i),
			_ => None,
		}
	}

	/// Steps shown so far, the active one last.
	pub fn revealed_steps(&self) -> &'static [FlowStep] {
		match (self.phase, self.scenario) {
			(Phase::Stepping(i), Some(scenario)) => &scenario.steps[..=i],
			(Phase::Completed, Some(scenario)) => scenario.steps,
			_ => &[],
		}
	}

	/// Fraction of steps reached, for progress bars.
	pub fn progress(&self) -> f64 {
		let Some(scenario) = self.scenario else {
			return 0.0;
		};
		if scenario.steps.is_empty() {
			return if self.phase == Phase::Completed { 1.0 } else { 0.0 };
		}
		((self.step_index() + 1) as f64 / scenario.steps.len() as f64).clamp(0.0, 1.0)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::{Link, SCENARIOS};

	fn edge(player: &ScenarioPlayer) -> Option<Link> {
		player.active_step().map(|s| Link::new(s.from, s.to))
	}

	#[test]
	fn test_feature_spec_playback() {
		let mut player = ScenarioPlayer::new();
		assert_eq!(player.status(), PlaybackStatus::Idle);

		let ticket = player.start(SCENARIOS, "feature-spec").unwrap();
		let mut observed = vec![player.step_index()];
		assert_eq!(player.status(), PlaybackStatus::Running);
		assert_eq!(edge(&player), None);

		assert_eq!(player.tick(ticket), TickOutcome::Advanced);
		observed.push(player.step_index());
		assert_eq!(edge(&player), Some(Link::new("main-agent", "product-manager")));

		for _ in 0..5 {
			assert_eq!(player.tick(ticket), TickOutcome::Advanced);
			observed.push(player.step_index());
		}
		assert_eq!(edge(&player), Some(Link::new("product-manager", "main-agent")));

		assert_eq!(player.tick(ticket), TickOutcome::Completed);
		observed.push(player.step_index());

		assert_eq!(observed, vec![-1, 0, 1, 2, 3, 4, 5, 6]);
		assert_eq!(player.status(), PlaybackStatus::Completed);
		assert_eq!(edge(&player), None);
		assert_eq!(player.revealed_steps().len(), 6);
		assert_eq!(player.progress(), 1.0);

		// no wraparound
		assert_eq!(player.tick(ticket), TickOutcome::Ignored);
		assert_eq!(player.step_index(), 6);
	}

	#[test]
	fn test_abort_resets_and_silences_timer() {
		let mut player = ScenarioPlayer::new();
		let ticket = player.start(SCENARIOS, "check-deployment").unwrap();
		player.tick(ticket);
		player.tick(ticket);
		assert_eq!(player.step_index(), 1);

		player.abort();
		assert_eq!(player.status(), PlaybackStatus::Idle);
		assert_eq!(player.step_index(), -1);
		assert!(player.scenario().is_none());

		assert_eq!(player.tick(ticket), TickOutcome::Ignored);
		assert_eq!(player.step_index(), -1);
	}

	#[test]
	fn test_restart_discards_previous_scenario() {
		let mut player = ScenarioPlayer::new();
		let old = player.start(SCENARIOS, "db-maintenance").unwrap();
		player.tick(old);
		player.tick(old);
		player.tick(old);

		let new = player.start(SCENARIOS, "feature-spec").unwrap();
		assert_ne!(old, new);
		assert_eq!(player.phase(), Phase::Armed);
		assert_eq!(player.step_index(), -1);

		// a late tick from the old timer must not move the new scenario
		assert_eq!(player.tick(old), TickOutcome::Ignored);
		assert_eq!(player.step_index(), -1);

		player.tick(new);
		assert_eq!(player.active_step().map(|s| s.label), Some("Delegation"));
		assert_eq!(player.scenario().map(|s| s.id), Some("feature-spec"));
	}

	#[test]
	fn test_unknown_scenario_is_a_no_op() {
		let mut player = ScenarioPlayer::new();
		let ticket = player.start(SCENARIOS, "feature-spec").unwrap();
		player.tick(ticket);

		assert_eq!(player.start(SCENARIOS, "does-not-exist"), None);
		assert_eq!(player.generation(), ticket);
		assert_eq!(player.step_index(), 0);
		assert_eq!(player.tick(ticket), TickOutcome::Advanced);
	}

	#[test]
	fn test_index_is_monotonic() {
		let mut player = ScenarioPlayer::new();
		let ticket = player.start(SCENARIOS, "db-maintenance").unwrap();
		let mut last = player.step_index();
		while player.tick(ticket) != TickOutcome::Ignored {
			let now = player.step_index();
			assert_eq!(now, last + 1);
			last = now;
		}
		assert_eq!(last, 10);
		assert_eq!(player.status(), PlaybackStatus::Completed);
	}

	#[test]
	fn test_revealed_steps_and_progress() {
		let mut player = ScenarioPlayer::new();
		assert!(player.revealed_steps().is_empty());
		assert_eq!(player.progress(), 0.0);

		let ticket = player.start(SCENARIOS, "feature-spec").unwrap();
		assert_eq!(player.progress(), 0.0);
		player.tick(ticket);
		player.tick(ticket);
		let labels: Vec<_> = player.revealed_steps().iter().map(|s| s.label).collect();
		assert_eq!(labels, vec!["Delegation", "Skill Call"]);
		assert!((player.progress() - 2.0 / 6.0).abs() < 1e-12);
	}

	#[test]
	fn test_default_dwell() {
		assert_eq!(PlaybackConfig::default().dwell, Duration::from_millis(2500));
	}
}
