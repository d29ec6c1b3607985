use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::callback::{Callable, Callback};
use leptos::prelude::*;
use log::{error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{
	Element, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, PointerEvent, TouchEvent,
};

use super::config::CanvasConfig;
use super::host::{CanvasError, Host};
use super::render;
use super::secret::{COMMANDS, Theme};
use super::state::{NeuralCanvasState, Overlay, PointerInput};
use super::types::{AboutSection, CanvasEvent, PortfolioContent, ProjectSelection};

type SharedState = Rc<RefCell<Option<NeuralCanvasState>>>;
type Slot<F> = Rc<RefCell<Option<Closure<F>>>>;

/// Host callbacks fired by canvas interactions.
#[derive(Clone, Copy)]
struct Outputs {
	on_project_select: Callback<Option<ProjectSelection>>,
	on_about_select: Callback<AboutSection>,
	on_open_contact_modal: Callback<()>,
}

/// Everything the page must release on unmount.
#[derive(Clone, Default)]
struct Handles {
	host: Rc<RefCell<Option<Rc<Host>>>>,
	animate: Slot<dyn FnMut(f64)>,
	resize_cb: Slot<dyn FnMut()>,
	keydown_cb: Slot<dyn FnMut(KeyboardEvent)>,
	frame_id: Rc<Cell<Option<i32>>>,
}

impl Handles {
	fn teardown(&self, state: &SharedState) {
		if let Some(host) = self.host.borrow_mut().take() {
			if let Some(id) = self.frame_id.take() {
				let _ = host.window.cancel_animation_frame(id);
			}
			if let Some(cb) = self.resize_cb.borrow().as_ref() {
				let _ = host
					.window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
			if let Some(cb) = self.keydown_cb.borrow().as_ref() {
				let _ = host
					.window
					.remove_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
			}
		}
		self.animate.borrow_mut().take();
		self.resize_cb.borrow_mut().take();
		self.keydown_cb.borrow_mut().take();
		state.borrow_mut().take();
		info!("neural canvas torn down");
	}
}

/// Runs `f` against the live state, if the canvas is mounted.
fn update(shared: StoredValue<SharedState, LocalStorage>, f: impl FnOnce(&mut NeuralCanvasState)) {
	shared.try_with_value(|state| {
		if let Some(ref mut s) = *state.borrow_mut() {
			f(s);
		}
	});
}

fn pointer_from(canvas: &HtmlCanvasElement, client_x: f64, client_y: f64) -> PointerInput {
	let rect = canvas.get_bounding_client_rect();
	PointerInput {
		x: client_x - rect.left(),
		y: client_y - rect.top(),
		client_x,
		client_y,
	}
}

/// Keys typed into form fields belong to the field, not the command buffer.
fn typed_into_field(ev: &KeyboardEvent) -> bool {
	ev.target()
		.and_then(|t| t.dyn_into::<Element>().ok())
		.is_some_and(|el| matches!(el.tag_name().as_str(), "INPUT" | "TEXTAREA"))
}

fn dispatch(events: Vec<CanvasEvent>, host: &Host, outputs: Outputs) {
	for event in events {
		match event {
			CanvasEvent::ProjectSelect(selection) => outputs.on_project_select.run(selection),
			CanvasEvent::AboutSelect(section) => outputs.on_about_select.run(section),
			CanvasEvent::OpenContactModal => outputs.on_open_contact_modal.run(()),
			CanvasEvent::OpenUrl(url) => {
				if let Err(err) = host.open_url(&url) {
					warn!("could not open {url}: {err}");
				}
			}
		}
	}
}

fn start(
	canvas: HtmlCanvasElement,
	content: PortfolioContent,
	config: CanvasConfig,
	state: &SharedState,
	handles: &Handles,
	overlay: RwSignal<Overlay>,
	outputs: Outputs,
) -> Result<(), CanvasError> {
	let host = Rc::new(Host::attach(canvas)?);
	let (w, h) = host.viewport()?;
	let max_dpr = config.max_dpr;
	let dpr = Rc::new(Cell::new(host.device_pixel_ratio(max_dpr)));
	host.fit(w, h, dpr.get())?;
	*state.borrow_mut() = Some(NeuralCanvasState::new(
		content,
		config,
		w,
		h,
		host.prefers_reduced_motion(),
	));
	*handles.host.borrow_mut() = Some(host.clone());

	let (state_resize, host_resize, dpr_resize) = (state.clone(), host.clone(), dpr.clone());
	*handles.resize_cb.borrow_mut() = Some(Closure::new(move || {
		let Ok((nw, nh)) = host_resize.viewport() else {
			return;
		};
		let ratio = host_resize.device_pixel_ratio(max_dpr);
		if let Err(err) = host_resize.fit(nw, nh, ratio) {
			warn!("canvas resize failed: {err}");
			return;
		}
		dpr_resize.set(ratio);
		if let Some(ref mut s) = *state_resize.borrow_mut() {
			s.resize(nw, nh);
		}
	}));
	if let Some(ref cb) = *handles.resize_cb.borrow() {
		host.window
			.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())?;
	}

	let state_key = state.clone();
	*handles.keydown_cb.borrow_mut() = Some(Closure::new(move |ev: KeyboardEvent| {
		if let Some(ref mut s) = *state_key.borrow_mut() {
			s.key(&ev.key(), ev.ctrl_key(), ev.meta_key(), typed_into_field(&ev));
		}
	}));
	if let Some(ref cb) = *handles.keydown_cb.borrow() {
		host.window
			.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref())?;
	}

	let (state_anim, animate_inner, frame_id, host_anim) = (
		state.clone(),
		handles.animate.clone(),
		handles.frame_id.clone(),
		host.clone(),
	);
	let applied_theme: Cell<Option<Option<Theme>>> = Cell::new(None);
	*handles.animate.borrow_mut() = Some(Closure::new(move |now: f64| {
		let events = {
			let mut guard = state_anim.borrow_mut();
			let Some(s) = guard.as_mut() else {
				return;
			};
			s.frame(now);
			if let Err(err) = render::render(s, &host_anim.ctx, dpr.get()) {
				warn!("frame render failed: {err:?}");
			}
			if applied_theme.get() != Some(s.secret.theme) {
				applied_theme.set(Some(s.secret.theme));
				if let Err(err) = host_anim.set_page_background(s.secret.background()) {
					warn!("page background not applied: {err}");
				}
			}
			let next = s.overlay();
			if overlay.try_with_untracked(|o| *o != next).unwrap_or(false) {
				overlay.set(next);
			}
			s.drain_events()
		};
		dispatch(events, &host_anim, outputs);

		if let Some(ref cb) = *animate_inner.borrow() {
			match host_anim.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				Ok(id) => frame_id.set(Some(id)),
				Err(err) => error!("animation loop stopped: {err:?}"),
			}
		}
	}));
	if let Some(ref cb) = *handles.animate.borrow() {
		let id = host.window.request_animation_frame(cb.as_ref().unchecked_ref())?;
		handles.frame_id.set(Some(id));
	}
	info!("neural canvas mounted at {w:.0}x{h:.0}");
	Ok(())
}

/// Full-window animated portfolio graph with its DOM overlays.
#[component]
pub fn NeuralCanvas(
	#[prop(into)] content: Signal<PortfolioContent>,
	#[prop(into)] on_project_select: Callback<Option<ProjectSelection>>,
	#[prop(into)] on_about_select: Callback<AboutSection>,
	#[prop(into)] on_open_contact_modal: Callback<()>,
	#[prop(optional)] config: Option<CanvasConfig>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let handles = Handles::default();
	let overlay = RwSignal::new(Overlay::default());
	let outputs = Outputs {
		on_project_select,
		on_about_select,
		on_open_contact_modal,
	};
	let config = config.unwrap_or_default();

	let (state_init, handles_init) = (state.clone(), handles.clone());
	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if handles_init.host.borrow().is_some() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let result = start(
			canvas,
			content.get_untracked(),
			config.clone(),
			&state_init,
			&handles_init,
			overlay,
			outputs,
		);
		if let Err(err) = result {
			error!("neural canvas disabled: {err}");
		}
	});

	let state_content = state.clone();
	Effect::new(move |_| {
		let next = content.get();
		if let Some(ref mut s) = *state_content.borrow_mut() {
			s.set_content(next);
		}
	});

	let shared = StoredValue::new_local(state.clone());
	let teardown = StoredValue::new_local((handles, state));
	on_cleanup(move || {
		teardown.try_with_value(|(handles, state)| handles.teardown(state));
	});

	let on_pointermove = move |ev: PointerEvent| {
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let p = pointer_from(&canvas, f64::from(ev.client_x()), f64::from(ev.client_y()));
		update(shared, |s| s.pointer_move(p));
	};

	let on_pointerdown = move |ev: PointerEvent| {
		// Touch clicks arrive through touchend.
		if ev.pointer_type() == "touch" {
			return;
		}
		let Some(canvas) = canvas_ref.get_untracked() else {
			return;
		};
		let p = pointer_from(&canvas, f64::from(ev.client_x()), f64::from(ev.client_y()));
		update(shared, |s| s.click(p));
	};

	let on_touchstart = move |ev: TouchEvent| {
		if ev.touches().length() != 1 {
			return;
		}
		let (Some(canvas), Some(touch)) = (canvas_ref.get_untracked(), ev.touches().get(0)) else {
			return;
		};
		let p = pointer_from(&canvas, f64::from(touch.client_x()), f64::from(touch.client_y()));
		update(shared, |s| s.touch_start(p));
	};

	let on_touchend = move |ev: TouchEvent| {
		if ev.touches().length() != 0 || ev.changed_touches().length() != 1 {
			return;
		}
		let (Some(canvas), Some(touch)) = (canvas_ref.get_untracked(), ev.changed_touches().get(0))
		else {
			return;
		};
		ev.prevent_default();
		let p = pointer_from(&canvas, f64::from(touch.client_x()), f64::from(touch.client_y()));
		update(shared, |s| s.touch_end(p));
	};

	let on_command = move |ev: KeyboardEvent| {
		if ev.key() != "Enter" {
			return;
		}
		let input = event_target::<HtmlInputElement>(&ev);
		let command = input.value().to_lowercase();
		update(shared, |s| s.run_command(&command));
		input.set_value("");
	};

	let cursor = move || {
		if overlay.with(|o| o.pointer) {
			"display: block; position: fixed; inset: 0; cursor: pointer; touch-action: none;"
		} else {
			"display: block; position: fixed; inset: 0; cursor: default; touch-action: none;"
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="neural-canvas"
			aria-label="Interactive portfolio graph"
			on:pointermove=on_pointermove
			on:pointerleave=move |_| update(shared, NeuralCanvasState::pointer_leave)
			on:pointerdown=on_pointerdown
			on:touchstart=on_touchstart
			on:touchend=on_touchend
			style=cursor
		/>
		{move || {
			overlay
				.with(|o| o.tooltip.clone())
				.map(|tip| {
					view! {
						<div
							class="neural-tooltip"
							style=format!(
								"position: fixed; left: {}px; top: {}px; pointer-events: none; z-index: 30;",
								tip.x,
								tip.y,
							)
						>
							{tip.text}
						</div>
					}
				})
		}}
		<Show when=move || overlay.with(|o| o.expanded)>
			<button class="neural-back" on:click=move |_| update(shared, NeuralCanvasState::collapse)>
				"Back"
			</button>
		</Show>
		<button
			class="neural-secrets"
			on:click=move |_| update(shared, NeuralCanvasState::show_help)
		>
			"Discover secrets"
		</button>
		<Show when=move || overlay.with(|o| o.help)>
			<div class="neural-help" role="dialog">
				<h3>"Secret Commands"</h3>
				<ul>
					{COMMANDS
						.iter()
						.map(|(command, description)| {
							view! {
								<li>
									<code>{*command}</code>
									" "
									<span>{*description}</span>
								</li>
							}
						})
						.collect_view()}
				</ul>
				<input
					type="text"
					placeholder="Type a command (e.g. 'help', 'matrix')"
					on:keydown=on_command
				/>
				<button on:click=move |_| update(shared, NeuralCanvasState::hide_help)>
					"Close"
				</button>
			</div>
		</Show>
		{move || {
			let (flash, theme) = overlay.with(|o| (o.flash, o.theme));
			flash
				.then(|| {
					let tint = theme
						.and_then(|t| t.color_for("frontend"))
						.map_or_else(|| "rgba(255,255,255,0.2)".to_string(), |c| format!("{c}40"));
					view! {
						<div
							class="neural-flash"
							style=format!(
								"position: fixed; inset: 0; pointer-events: none; z-index: 20; background: {tint};",
							)
						/>
					}
				})
		}}
		{move || {
			overlay
				.with(|o| o.theme)
				.map(|theme| {
					view! { <div class="neural-theme">{format!("{} Mode", theme.name())}</div> }
				})
		}}
		{move || {
			overlay
				.with(|o| o.dev.clone().map(|dev| (dev, o.theme)))
				.map(|(dev, theme)| {
					view! {
						<div class="neural-dev">
							<div>"DEV MODE"</div>
							<div>{format!("FPS: {}", dev.fps)}</div>
							<div>{format!("Nodes: {}", dev.nodes)}</div>
							<div>{format!("Edges: {}", dev.edges)}</div>
							<div>{format!("Theme: {}", theme.map_or("default", Theme::name))}</div>
							<div>{format!("Clicks: {}/10", dev.clicks)}</div>
							<div>{format!("Satellites: {:.1}x", dev.satellite_multiplier)}</div>
							<div>{format!("Edges: {:.1}x", dev.edge_multiplier)}</div>
							<div>"Type \"more\" to increase, \"less\" to decrease"</div>
						</div>
					}
				})
		}}
	}
}
