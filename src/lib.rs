//! Interactive map of an AI agent operating model, rendered client-side
//! with Leptos on a canvas.

use leptos::prelude::*;
use leptos_meta::{Html, Meta, Title, provide_meta_context};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;
use log::{Level, info};

pub mod components;
pub mod model;
mod pages;

use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Most verbose level sent to the browser console. Debug builds also log
/// layout restarts and timer bookkeeping.
const LOG_LEVEL: Level = if cfg!(debug_assertions) { Level::Debug } else { Level::Info };

/// Routes panics and `log` records to the browser console.
pub fn init_logging() {
	console_error_panic_hook::set_once();
	if console_log::init_with_level(LOG_LEVEL).is_err() {
		// a logger is already installed; keep it
		return;
	}
	info!("console logging at {LOG_LEVEL}");
}

/// Installs logging and mounts [`App`] on the document body.
pub fn start() {
	init_logging();
	leptos::mount::mount_to_body(App);
}

/// The operating model at `/`, a not-found page for anything else.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:data-theme="light" />
		<Title text="Cursor Operating Model" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />
		<Meta
			name="description"
			content="How the orchestrator delegates to agents, skills and MCP servers"
		/>

		<Router>
			<Routes fallback=NotFound>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
