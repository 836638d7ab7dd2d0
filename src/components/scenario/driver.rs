use std::cell::Cell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;

use super::player::{PlaybackConfig, ScenarioPlayer, TickOutcome};
use crate::model::Scenario;

/// Bookkeeping for the single browser interval a driver may own.
///
/// Every handle that leaves the slot through [`take`](Self::take) or
/// [`install`](Self::install) is one the caller must clear.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntervalSlot {
	handle: Option<i32>,
}

impl IntervalSlot {
	/// The live interval, if any.
	pub fn handle(&self) -> Option<i32> {
		self.handle
	}

	/// Empties the slot.
	pub fn take(&mut self) -> Option<i32> {
		self.handle.take()
	}

	/// Records a newly scheduled interval, handing back one that was still
	/// recorded.
	pub fn install(&mut self, handle: i32) -> Option<i32> {
		self.handle.replace(handle).filter(|&old| old != handle)
	}

	/// Forgets `handle` if it is the one recorded. A newer interval is left
	/// alone.
	pub fn release(&mut self, handle: i32) -> bool {
		if self.handle == Some(handle) {
			self.handle = None;
			true
		} else {
			false
		}
	}
}

fn clear_interval(handle: i32) {
	if let Some(window) = web_sys::window() {
		window.clear_interval_with_handle(handle);
	}
}

/// Ties a [`ScenarioPlayer`] signal to a browser interval.
///
/// At most one interval is live. Starting or aborting clears it before the
/// player moves on, and each interval also stops itself once the player no
/// longer accepts its generation.
#[derive(Clone, Copy)]
pub struct PlaybackDriver {
	player: RwSignal<ScenarioPlayer>,
	interval: StoredValue<IntervalSlot>,
	catalog: &'static [Scenario],
	dwell_ms: i32,
}

impl PlaybackDriver {
	/// Creates an idle driver for `catalog`.
	pub fn new(catalog: &'static [Scenario], config: PlaybackConfig) -> Self {
		Self {
			player: RwSignal::new(ScenarioPlayer::new()),
			interval: StoredValue::new(IntervalSlot::default()),
			catalog,
			dwell_ms: i32::try_from(config.dwell.as_millis()).unwrap_or(i32::MAX),
		}
	}

	/// Read side of the player, for views.
	pub fn player(&self) -> ReadSignal<ScenarioPlayer> {
		self.player.read_only()
	}

	/// Starts `id`, replacing anything already playing. Returns `false` and
	/// changes nothing if the id is unknown.
	pub fn start(&self, id: &str) -> bool {
		if !self.catalog.iter().any(|s| s.id == id) {
			debug!("start of unknown scenario {id} dropped");
			return false;
		}
		self.cancel_timer();
		let catalog = self.catalog;
		let Some(ticket) = self.player.try_update(|p| p.start(catalog, id)).flatten() else {
			return false;
		};
		// armed moves to the first step without waiting a dwell
		let first = self.player.try_update(|p| p.tick(ticket));
		if first == Some(TickOutcome::Advanced) {
			self.schedule(ticket);
		}
		true
	}

	/// Stops playback and returns the player to idle.
	pub fn abort(&self) {
		self.cancel_timer();
		self.player.update(ScenarioPlayer::abort);
	}

	/// Clears the live interval, if any. Safe to call after teardown.
	pub fn cancel_timer(&self) {
		let Some(handle) = self.interval.try_update_value(IntervalSlot::take).flatten() else {
			return;
		};
		clear_interval(handle);
		debug!("playback interval {handle} cleared");
	}

	fn schedule(&self, ticket: u64) {
		let Some(window) = web_sys::window() else {
			warn!("no window; scenario will not advance");
			return;
		};
		let (player, interval) = (self.player, self.interval);
		let own_handle: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
		let own_inner = own_handle.clone();

		let tick = Closure::<dyn FnMut()>::new(move || {
			let outcome = player
				.try_update(|p| p.tick(ticket))
				.unwrap_or(TickOutcome::Ignored);
			if outcome == TickOutcome::Advanced {
				return;
			}
			let Some(handle) = own_inner.take() else {
				return;
			};
			clear_interval(handle);
			interval.try_update_value(|slot| slot.release(handle));
			debug!("playback interval {handle} stopped ({outcome:?})");
		});
		// JS owns the callback from here; it is collected once the interval
		// is cleared
		let callback = tick.into_js_value();
		match window.set_interval_with_callback_and_timeout_and_arguments_0(
			callback.unchecked_ref(),
			self.dwell_ms,
		) {
			Ok(handle) => {
				own_handle.set(Some(handle));
				let stale = self
					.interval
					.try_update_value(|slot| slot.install(handle))
					.flatten();
				if let Some(stale) = stale {
					clear_interval(stale);
					debug!("playback interval {stale} replaced");
				}
			}
			Err(err) => warn!("setInterval failed: {err:?}"),
		}
	}

	#[cfg(all(test, target_arch = "wasm32"))]
	fn live_interval(&self) -> Option<i32> {
		self.interval.with_value(IntervalSlot::handle)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::scenario::player::PlaybackStatus;
	use crate::model::SCENARIOS;

	#[test]
	fn test_slot_take_empties() {
		let mut slot = IntervalSlot::default();
		assert_eq!(slot.take(), None);
		assert_eq!(slot.install(7), None);
		assert_eq!(slot.handle(), Some(7));
		assert_eq!(slot.take(), Some(7));
		assert_eq!(slot.handle(), None);
		assert_eq!(slot.take(), None);
	}

	#[test]
	fn test_slot_install_hands_back_leftover() {
		let mut slot = IntervalSlot::default();
		slot.install(1);
		assert_eq!(slot.install(2), Some(1));
		assert_eq!(slot.handle(), Some(2));
		// the same handle twice is not a leftover
		assert_eq!(slot.install(2), None);
	}

	#[test]
	fn test_slot_release_keeps_newer_interval() {
		let mut slot = IntervalSlot::default();
		slot.install(1);
		assert!(!slot.release(9));
		assert_eq!(slot.handle(), Some(1));
		assert!(slot.release(1));
		assert_eq!(slot.handle(), None);
	}

	/// Replays the driver's slot and player moves for start, start, abort
	/// without a browser: each replacement hands the previous interval back
	/// for clearing and a late tick from it changes nothing.
	#[test]
	fn test_restart_and_abort_leave_no_pending_tick() {
		let mut slot = IntervalSlot::default();
		let mut player = ScenarioPlayer::new();
		let mut cleared = Vec::new();

		// start: nothing to clear, first tick runs at once, interval 1 scheduled
		cleared.extend(slot.take());
		let first = player.start(SCENARIOS, "feature-spec").unwrap();
		player.tick(first);
		cleared.extend(slot.install(1));
		assert!(cleared.is_empty());

		// second start clears interval 1 before anything else moves
		cleared.extend(slot.take());
		assert_eq!(cleared, vec![1]);
		let second = player.start(SCENARIOS, "db-maintenance").unwrap();
		player.tick(second);
		cleared.extend(slot.install(2));
		assert_eq!(slot.handle(), Some(2));

		// a tick from interval 1 that was already queued is ignored, and its
		// self-release leaves interval 2 recorded
		assert_eq!(player.tick(first), TickOutcome::Ignored);
		assert!(!slot.release(1));
		assert_eq!(player.step_index(), 0);
		assert_eq!(slot.handle(), Some(2));

		// abort clears interval 2 and nothing is left to fire
		cleared.extend(slot.take());
		player.abort();
		assert_eq!(cleared, vec![1, 2]);
		assert_eq!(slot.handle(), None);
		assert_eq!(player.status(), PlaybackStatus::Idle);
		assert_eq!(player.tick(second), TickOutcome::Ignored);
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
	use wasm_bindgen_test::*;

	use super::*;
	use crate::components::scenario::player::PlaybackStatus;
	use crate::model::SCENARIOS;

	wasm_bindgen_test_configure!(run_in_browser);

	#[wasm_bindgen_test]
	fn start_twice_keeps_one_interval() {
		let owner = Owner::new();
		owner.set();
		let driver = PlaybackDriver::new(SCENARIOS, PlaybackConfig::default());

		assert!(driver.start("feature-spec"));
		let first = driver.live_interval().expect("interval after start");

		assert!(driver.start("check-deployment"));
		let second = driver.live_interval().expect("interval after restart");
		assert_ne!(first, second);
		assert_eq!(
			driver.player().with_untracked(|p| p.scenario().map(|s| s.id)),
			Some("check-deployment")
		);
		assert_eq!(driver.player().with_untracked(ScenarioPlayer::step_index), 0);

		driver.abort();
	}

	#[wasm_bindgen_test]
	fn abort_clears_interval() {
		let owner = Owner::new();
		owner.set();
		let driver = PlaybackDriver::new(SCENARIOS, PlaybackConfig::default());

		assert!(driver.start("db-maintenance"));
		assert!(driver.live_interval().is_some());

		driver.abort();
		assert_eq!(driver.live_interval(), None);
		assert_eq!(driver.player().with_untracked(ScenarioPlayer::status), PlaybackStatus::Idle);

		// cancelling again is harmless
		driver.cancel_timer();
		assert_eq!(driver.live_interval(), None);
	}

	#[wasm_bindgen_test]
	fn unknown_id_leaves_timer_alone() {
		let owner = Owner::new();
		owner.set();
		let driver = PlaybackDriver::new(SCENARIOS, PlaybackConfig::default());

		assert!(driver.start("feature-spec"));
		let live = driver.live_interval();
		assert!(!driver.start("does-not-exist"));
		assert_eq!(driver.live_interval(), live);

		driver.abort();
	}
}
