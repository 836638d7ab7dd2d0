use leptos::prelude::*;

use crate::model::Scenario;

/// Modal listing the runnable scenarios.
#[component]
pub fn ScenarioSelector(
	/// Scenarios to offer.
	scenarios: &'static [Scenario],
	/// Called with the chosen scenario id.
	on_select: Callback<&'static str>,
	/// Called when the modal is dismissed.
	on_close: Callback<()>,
) -> impl IntoView {
	let items = scenarios
		.iter()
		.map(|scenario| {
			view! {
				<li>
					<button class="scenario-option" on:click=move |_| on_select.run(scenario.id)>
						<span class="scenario-title">{scenario.title}</span>
						<span class="scenario-steps">{format!("{} steps", scenario.steps.len())}</span>
						<p class="scenario-description">{scenario.description}</p>
					</button>
				</li>
			}
		})
		.collect_view();

	view! {
		<div class="modal-backdrop" on:click=move |_| on_close.run(())>
			<div class="modal" on:click=|ev| ev.stop_propagation()>
				<header class="modal-header">
					<h2>"Run a scenario"</h2>
					<button class="close" on:click=move |_| on_close.run(())>"×"</button>
				</header>
				<ul class="scenario-list">{items}</ul>
			</div>
		</div>
	}
}
