use leptos::prelude::*;

use super::player::{PlaybackStatus, ScenarioPlayer};

/// Execution log for the running scenario: steps shown so far, the current
/// one marked, a banner once complete.
#[component]
pub fn TerminalPanel(
	/// Player whose progress is logged.
	player: ReadSignal<ScenarioPlayer>,
	/// Called by the ABORT button.
	on_abort: Callback<()>,
) -> impl IntoView {
	let title = move || player.with(|p| p.scenario().map(|s| s.title).unwrap_or_default());
	let progress = move || player.with(|p| format!("{:.0}%", p.progress() * 100.0));

	let steps = move || {
		player.with(|p| {
			let current = p.step_index();
			p.revealed_steps()
				.iter()
				.enumerate()
				.map(|(idx, step)| {
					let class = if idx as isize == current {
						"log-step current"
					} else {
						"log-step"
					};
					view! {
						<li class=class>
							<span class="log-label">{step.label}</span>
							<span class="log-route">
								<code>{step.from}</code>
								" → "
								<code>{step.to}</code>
							</span>
							<p class="log-description">{step.description}</p>
						</li>
					}
				})
				.collect_view()
		})
	};

	let completed = move || player.with(|p| p.status() == PlaybackStatus::Completed);

	view! {
		<section class="terminal-panel">
			<header class="terminal-header">
				<div>
					<span class="terminal-title">"Live Execution"</span>
					<span class="terminal-subtitle">"Orchestrator Logs"</span>
				</div>
				<button class="abort" on:click=move |_| on_abort.run(())>"■ ABORT"</button>
			</header>
			<div class="terminal-body">
				<div class="terminal-running">"SCENARIO RUNNING: " <strong>{title}</strong></div>
				<div class="progress">
					<div class="progress-bar" style:width=progress></div>
				</div>
				<ol class="log">{steps}</ol>
				<Show when=completed>
					<div class="completed">"Process Completed Successfully"</div>
				</Show>
			</div>
		</section>
	}
}
