use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, ResizeObserver, Window};

use super::highlight::FocusMode;
use super::layout::{LayoutConfig, Viewport};
use super::render;
use super::state::{FRAME_DT, SelectionState, SystemMapState};
use super::types::GraphModel;
use crate::model::{FlowStep, NodeId};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;
type SharedState = Rc<RefCell<Option<SystemMapState>>>;

fn parent_viewport(canvas: &HtmlCanvasElement) -> Viewport {
	canvas
		.parent_element()
		.map(|p| Viewport::new(p.client_width() as f64, p.client_height() as f64))
		.unwrap_or_default()
}

fn fit_canvas(canvas: &HtmlCanvasElement) -> Viewport {
	let viewport = parent_viewport(canvas);
	canvas.set_width(viewport.width.max(0.0) as u32);
	canvas.set_height(viewport.height.max(0.0) as u32);
	viewport
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok().flatten()?.dyn_into().ok()
}

fn local_point(canvas: &HtmlCanvasElement, ev: &MouseEvent) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	)
}

/// Refits the canvas whenever its container changes size.
struct ContainerWatch {
	observer: ResizeObserver,
	_callback: Closure<dyn FnMut()>,
}

impl ContainerWatch {
	fn attach(canvas: &HtmlCanvasElement, state: SharedState) -> Option<Self> {
		let parent = canvas.parent_element()?;
		let target = canvas.clone();
		let callback = Closure::<dyn FnMut()>::new(move || {
			let viewport = fit_canvas(&target);
			if let Some(s) = state.borrow_mut().as_mut() {
				s.resize(viewport);
			}
		});
		match ResizeObserver::new(callback.as_ref().unchecked_ref()) {
			Ok(observer) => {
				observer.observe(&parent);
				Some(Self {
					observer,
					_callback: callback,
				})
			}
			Err(err) => {
				warn!("ResizeObserver unavailable: {err:?}");
				None
			}
		}
	}
}

/// Browser handles owned by one mounted map: the map state, the
/// self-referencing frame callback, the pending frame id and the container
/// watch. [`stop`](Self::stop) releases all of them.
#[derive(Default)]
struct FrameLoop {
	state: SharedState,
	animate: FrameCallback,
	pending: Rc<Cell<Option<i32>>>,
	// bumped on every (re)start and on stop; a frame from an older loop sees
	// the mismatch and stops requesting frames
	generation: Rc<Cell<u64>>,
	watch: Option<ContainerWatch>,
}

impl FrameLoop {
	fn start(
		&mut self,
		canvas: &HtmlCanvasElement,
		model: GraphModel,
		selection: RwSignal<SelectionState>,
		active_step: Signal<Option<&'static FlowStep>>,
	) {
		let Some(window) = web_sys::window() else {
			warn!("no window; map not started");
			return;
		};
		let Some(ctx) = context_2d(canvas) else {
			warn!("canvas 2d context unavailable; map not started");
			return;
		};

		let generation = self.generation.get() + 1;
		self.generation.set(generation);
		self.cancel_frame(&window);

		let viewport = fit_canvas(canvas);
		{
			let mut slot = self.state.borrow_mut();
			match slot.as_mut() {
				Some(s) => {
					s.set_model(model);
					s.resize(viewport);
				}
				None => *slot = Some(SystemMapState::new(model, LayoutConfig::default(), viewport)),
			}
		}

		if self.watch.is_none() {
			self.watch = ContainerWatch::attach(canvas, self.state.clone());
		}

		let (state, animate, pending, current) = (
			self.state.clone(),
			self.animate.clone(),
			self.pending.clone(),
			self.generation.clone(),
		);
		*self.animate.borrow_mut() = Some(Closure::new(move || {
			pending.set(None);
			if current.get() != generation {
				return;
			}
			if let Some(ref mut s) = *state.borrow_mut() {
				let focus = FocusMode::resolve(
					&s.adjacency,
					selection.try_with_untracked(SelectionState::focus).flatten(),
					active_step.try_get_untracked().flatten(),
				);
				s.tick(FRAME_DT, &focus);
				render::render(s, &focus, &ctx);
			}
			let Some(win): Option<Window> = web_sys::window() else {
				return;
			};
			if let Some(ref cb) = *animate.borrow() {
				if let Ok(id) = win.request_animation_frame(cb.as_ref().unchecked_ref()) {
					pending.set(Some(id));
				}
			}
		}));
		if let Some(ref cb) = *self.animate.borrow() {
			match window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				Ok(id) => self.pending.set(Some(id)),
				Err(err) => warn!("requestAnimationFrame failed: {err:?}"),
			}
		}
	}

	fn cancel_frame(&self, window: &Window) {
		if let Some(id) = self.pending.take() {
			let _ = window.cancel_animation_frame(id);
		}
	}

	/// Cancels the pending frame, disconnects the container watch and drops
	/// the frame callback, breaking its reference to itself.
	fn stop(&mut self) {
		self.generation.set(self.generation.get() + 1);
		if let Some(window) = web_sys::window() {
			self.cancel_frame(&window);
		}
		self.animate.borrow_mut().take();
		if let Some(watch) = self.watch.take() {
			watch.observer.disconnect();
		}
		debug!("system map frame loop stopped");
	}

	fn node_at(&self, x: f64, y: f64) -> Option<NodeId> {
		self.state.borrow().as_ref().and_then(|s| s.node_at_position(x, y))
	}
}

/// The architecture map. Layout, highlighting and the flow animation are
/// drawn on a canvas sized to its parent; hover is written straight into
/// `selection`, clicks are handed to the page.
#[component]
pub fn SystemMapCanvas(
	/// Graph to lay out; a change restarts the layout.
	#[prop(into)] data: Signal<GraphModel>,
	/// Shared hover and selection.
	selection: RwSignal<SelectionState>,
	/// Step whose edge is animated, if a scenario is playing.
	#[prop(into)] active_step: Signal<Option<&'static FlowStep>>,
	/// Called with the node under a click.
	on_node_click: Callback<NodeId>,
	/// Called for clicks that miss every node.
	on_background_click: Callback<()>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let frames = StoredValue::new_local(FrameLoop::default());

	// cleanups run before the owner disposes `frames`
	on_cleanup(move || {
		frames.try_update_value(FrameLoop::stop);
	});

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let model = data.get();
		frames.try_update_value(|f| f.start(&canvas, model, selection, active_step));
	});

	let hit = move |ev: &MouseEvent| {
		let canvas = canvas_ref.get_untracked()?;
		let (x, y) = local_point(&canvas, ev);
		frames.try_with_value(|f| f.node_at(x, y)).flatten()
	};

	let on_mousemove = move |ev: MouseEvent| {
		let hit = hit(&ev);
		let current = selection.with_untracked(|sel| sel.hovered);
		if hit == current {
			return;
		}
		selection.update(|sel| match (hit, current) {
			(Some(id), _) => sel.hover_enter(id),
			(None, Some(prev)) => sel.hover_leave(prev),
			(None, None) => {}
		});
	};

	let on_mouseleave = move |_: MouseEvent| {
		if let Some(prev) = selection.with_untracked(|sel| sel.hovered) {
			selection.update(|sel| sel.hover_leave(prev));
		}
	};

	let on_click = move |ev: MouseEvent| match hit(&ev) {
		Some(id) => on_node_click.run(id),
		None => on_background_click.run(()),
	};

	let cursor = move || {
		if selection.with(|sel| sel.hovered.is_some()) {
			"display: block; cursor: pointer;"
		} else {
			"display: block; cursor: default;"
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="system-map-canvas"
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			on:click=on_click
			style=cursor
		/>
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
	use wasm_bindgen_test::*;
	use web_sys::HtmlElement;

	use super::*;

	wasm_bindgen_test_configure!(run_in_browser);

	fn mounted_canvas() -> (HtmlElement, HtmlCanvasElement) {
		let document = web_sys::window().and_then(|w| w.document()).expect("document");
		let parent: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
		parent.style().set_property("width", "800px").unwrap();
		parent.style().set_property("height", "600px").unwrap();
		let canvas: HtmlCanvasElement = document.create_element("canvas").unwrap().dyn_into().unwrap();
		parent.append_child(&canvas).unwrap();
		document.body().expect("body").append_child(&parent).unwrap();
		(parent, canvas)
	}

	#[wasm_bindgen_test]
	fn stop_releases_browser_handles() {
		let owner = Owner::new();
		owner.set();
		let (parent, canvas) = mounted_canvas();
		let selection = RwSignal::new(SelectionState::default());
		let active_step = Signal::derive(|| None);

		let mut frames = FrameLoop::default();
		frames.start(&canvas, GraphModel::catalog(), selection, active_step);
		assert!(frames.animate.borrow().is_some());
		assert!(frames.pending.get().is_some());
		assert!(frames.watch.is_some());
		assert_eq!(canvas.width(), 800);

		frames.stop();
		assert!(frames.animate.borrow().is_none());
		assert_eq!(frames.pending.get(), None);
		assert!(frames.watch.is_none());
		// nothing but the loop itself holds the map state
		assert_eq!(Rc::strong_count(&frames.state), 1);

		parent.remove();
	}

	#[wasm_bindgen_test]
	fn restart_replaces_pending_frame() {
		let owner = Owner::new();
		owner.set();
		let (parent, canvas) = mounted_canvas();
		let selection = RwSignal::new(SelectionState::default());
		let active_step = Signal::derive(|| None);

		let mut frames = FrameLoop::default();
		frames.start(&canvas, GraphModel::catalog(), selection, active_step);
		let before = frames.generation.get();
		frames.start(&canvas, GraphModel::catalog(), selection, active_step);
		assert_eq!(frames.generation.get(), before + 1);
		assert!(frames.pending.get().is_some());

		frames.stop();
		parent.remove();
	}
}
