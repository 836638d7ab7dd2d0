use leptos::prelude::*;

use super::scenario::{PlaybackStatus, ScenarioPlayer};
use crate::model::{NODES, composition};

/// Title bar with per-kind node counts and the playback status pill.
#[component]
pub fn Header(
	/// Drives the status pill.
	player: ReadSignal<ScenarioPlayer>,
) -> impl IntoView {
	let stats = composition(NODES)
		.into_iter()
		.map(|stat| {
			view! {
				<li class="stat">
					<span class="swatch" style:background-color=stat.kind.swatch()></span>
					<span class="stat-count">{stat.count}</span>
					<span class="stat-label">{stat.kind.display_name()}</span>
				</li>
			}
		})
		.collect_view();

	let running = move || player.with(|p| p.status() != PlaybackStatus::Idle);
	let pill_class = move || if running() { "status-pill running" } else { "status-pill" };
	let pill_text = move || if running() { "Simulation Running" } else { "System Idle" };

	view! {
		<header class="app-header">
			<div class="brand">
				<h1>"Cursor Operating Model"</h1>
				<p class="subtitle">"Orchestrator, agents, skills and MCP servers"</p>
			</div>
			<ul class="composition">{stats}</ul>
			<span class=pill_class>
				<span class="status-dot"></span>
				{pill_text}
			</span>
		</header>
	}
}
