use leptos::prelude::*;
use log::info;

use crate::components::scenario::{PlaybackConfig, PlaybackDriver, ScenarioSelector, TerminalPanel};
use crate::components::system_map::{GraphModel, SelectionState, SystemMapCanvas};
use crate::components::{Header, InfoPanel};
use crate::model::{NodeId, SCENARIOS, find_node};

/// Operating model page: the map, its overlays and the scenario player.
#[component]
pub fn Home() -> impl IntoView {
	let model = Signal::derive(GraphModel::catalog);
	let selection = RwSignal::new(SelectionState::default());
	let show_selector = RwSignal::new(false);

	let driver = PlaybackDriver::new(SCENARIOS, PlaybackConfig::default());
	let player = driver.player();
	on_cleanup(move || driver.cancel_timer());

	let active_step = Signal::derive(move || player.with(|p| p.active_step()));

	let on_node_click = Callback::new(move |id: NodeId| {
		let Some(node) = find_node(id) else {
			return;
		};
		if let Some(intent) = selection.try_update(|s| s.click(node)) {
			show_selector.set(intent.shows_scenarios());
		}
	});
	let on_background = Callback::new(move |()| selection.update(SelectionState::clear_selection));

	let on_start = Callback::new(move |id: &'static str| {
		if driver.start(id) {
			info!("scenario {id} started");
			show_selector.set(false);
			selection.update(SelectionState::clear_selection);
		}
	});
	let on_close_selector = Callback::new(move |()| show_selector.set(false));
	let on_abort = Callback::new(move |()| {
		driver.abort();
		info!("scenario aborted");
	});

	let selected_node = move || selection.with(|s| s.selected).and_then(find_node);
	let has_scenario = move || player.with(|p| p.scenario().is_some());

	view! {
		<div class="operating-model">
			<Header player=player />
			<main class="map-area">
				<SystemMapCanvas
					data=model
					selection=selection
					active_step=active_step
					on_node_click=on_node_click
					on_background_click=on_background
				/>
				{move || {
					selected_node()
						.map(|node| {
							view! {
								<InfoPanel
									node=node
									on_close=Callback::new(move |()| {
										selection.update(SelectionState::clear_selection)
									})
								/>
							}
						})
				}}
			</main>
			<Show when=move || show_selector.get()>
				<ScenarioSelector
					scenarios=SCENARIOS
					on_select=on_start
					on_close=on_close_selector
				/>
			</Show>
			<Show when=has_scenario>
				<TerminalPanel player=player on_abort=on_abort />
			</Show>
		</div>
	}
}
