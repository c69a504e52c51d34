use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{
	AddEventListenerOptions, CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, TouchEvent,
	Window,
};

use super::render;
use super::state::RelationGraphState;
use super::types::StatsMap;

type SharedState = Rc<RefCell<Option<RelationGraphState>>>;
type FrameClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;
type MouseClosure = Rc<RefCell<Option<Closure<dyn FnMut(MouseEvent)>>>>;
type TouchClosure = Rc<RefCell<Option<Closure<dyn FnMut(TouchEvent)>>>>;

fn canvas_coords(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> (f64, f64) {
	let rect = canvas.get_bounding_client_rect();
	(
		f64::from(client_x) - rect.left(),
		f64::from(client_y) - rect.top(),
	)
}

#[component]
pub fn RelationGraphCanvas(
	#[prop(into)] items: Signal<Vec<String>>,
	#[prop(into)] stats: Signal<StatsMap>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: SharedState = Rc::new(RefCell::new(None));
	let animate: FrameClosure = Rc::new(RefCell::new(None));
	let frame_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
	let resize_cb: FrameClosure = Rc::new(RefCell::new(None));
	let mouse_move_cb: MouseClosure = Rc::new(RefCell::new(None));
	let mouse_up_cb: MouseClosure = Rc::new(RefCell::new(None));
	let touch_start_cb: TouchClosure = Rc::new(RefCell::new(None));
	let touch_move_cb: TouchClosure = Rc::new(RefCell::new(None));
	let touch_end_cb: TouchClosure = Rc::new(RefCell::new(None));

	let (state_init, animate_init, frame_id_init, resize_cb_init) = (
		state.clone(),
		animate.clone(),
		frame_id.clone(),
		resize_cb.clone(),
	);
	let (mouse_move_init, mouse_up_init) = (mouse_move_cb.clone(), mouse_up_cb.clone());
	let (touch_start_init, touch_move_init, touch_end_init) = (
		touch_start_cb.clone(),
		touch_move_cb.clone(),
		touch_end_cb.clone(),
	);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		let (w, h) = if fullscreen {
			(
				window.inner_width().unwrap().as_f64().unwrap(),
				window.inner_height().unwrap().as_f64().unwrap(),
			)
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		*state_init.borrow_mut() = Some(RelationGraphState::new(&items.get(), &stats.get(), w, h));

		// Re-runs of this effect only install a fresh dataset; the frame
		// loop and listeners below are wired once.
		if animate_init.borrow().is_some() {
			return;
		}

		let ctx: CanvasRenderingContext2d = canvas
			.get_context("2d")
			.unwrap()
			.unwrap()
			.dyn_into()
			.unwrap();

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let win: Window = web_sys::window().unwrap();
				let (nw, nh) = (
					win.inner_width().unwrap().as_f64().unwrap(),
					win.inner_height().unwrap().as_f64().unwrap(),
				);
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		// One simulation step per repaint; physics is gated inside tick()
		// while a drag is in progress, but painting never stops.
		let (state_anim, animate_inner, frame_id_anim) = (
			state_init.clone(),
			animate_init.clone(),
			frame_id_init.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				s.tick();
				render::render(s, &ctx);
			}
			if let Some(ref cb) = *animate_inner.borrow() {
				if let Ok(id) = web_sys::window()
					.unwrap()
					.request_animation_frame(cb.as_ref().unchecked_ref())
				{
					frame_id_anim.set(Some(id));
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				frame_id_init.set(Some(id));
			}
		}

		// Drag motion and release are window-level so a drag started on the
		// canvas survives the pointer leaving it.
		let (state_mm, canvas_mm) = (state_init.clone(), canvas.clone());
		*mouse_move_init.borrow_mut() = Some(Closure::new(move |ev: MouseEvent| {
			if let Some(ref mut s) = *state_mm.borrow_mut() {
				if s.is_dragging() {
					let (x, y) = canvas_coords(&canvas_mm, ev.client_x(), ev.client_y());
					s.drag_to(x, y);
				}
			}
		}));
		let state_mu = state_init.clone();
		*mouse_up_init.borrow_mut() = Some(Closure::new(move |_: MouseEvent| {
			if let Some(ref mut s) = *state_mu.borrow_mut() {
				s.end_drag();
			}
		}));

		let (state_ts, canvas_ts) = (state_init.clone(), canvas.clone());
		*touch_start_init.borrow_mut() = Some(Closure::new(move |ev: TouchEvent| {
			let Some(touch) = ev.touches().get(0) else {
				return;
			};
			if let Some(ref mut s) = *state_ts.borrow_mut() {
				let (x, y) = canvas_coords(&canvas_ts, touch.client_x(), touch.client_y());
				if s.begin_drag(x, y) {
					ev.prevent_default();
				}
			}
		}));
		let (state_tm, canvas_tm) = (state_init.clone(), canvas.clone());
		*touch_move_init.borrow_mut() = Some(Closure::new(move |ev: TouchEvent| {
			let Some(touch) = ev.touches().get(0) else {
				return;
			};
			if let Some(ref mut s) = *state_tm.borrow_mut() {
				if s.is_dragging() {
					ev.prevent_default();
					let (x, y) = canvas_coords(&canvas_tm, touch.client_x(), touch.client_y());
					s.drag_to(x, y);
				}
			}
		}));
		let state_te = state_init.clone();
		*touch_end_init.borrow_mut() = Some(Closure::new(move |_: TouchEvent| {
			if let Some(ref mut s) = *state_te.borrow_mut() {
				s.end_drag();
			}
		}));

		if let Some(ref cb) = *mouse_move_init.borrow() {
			let _ =
				window.add_event_listener_with_callback("mousemove", cb.as_ref().unchecked_ref());
		}
		if let Some(ref cb) = *mouse_up_init.borrow() {
			let _ = window.add_event_listener_with_callback("mouseup", cb.as_ref().unchecked_ref());
		}
		// Touch listeners are registered non-passive so prevent_default can
		// stop the page from scrolling under a drag.
		let opts = AddEventListenerOptions::new();
		opts.set_passive(false);
		if let Some(ref cb) = *touch_start_init.borrow() {
			let _ = canvas.add_event_listener_with_callback_and_add_event_listener_options(
				"touchstart",
				cb.as_ref().unchecked_ref(),
				&opts,
			);
		}
		if let Some(ref cb) = *touch_move_init.borrow() {
			let _ = window.add_event_listener_with_callback_and_add_event_listener_options(
				"touchmove",
				cb.as_ref().unchecked_ref(),
				&opts,
			);
		}
		if let Some(ref cb) = *touch_end_init.borrow() {
			let _ =
				window.add_event_listener_with_callback("touchend", cb.as_ref().unchecked_ref());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = canvas_coords(&canvas, ev.client_x(), ev.client_y());
		if let Some(ref mut s) = *state_md.borrow_mut() {
			if s.begin_drag(x, y) {
				ev.prevent_default();
			}
		}
	};

	let state_hover = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let canvas: HtmlCanvasElement = canvas_ref.get().unwrap().into();
		let (x, y) = canvas_coords(&canvas, ev.client_x(), ev.client_y());
		if let Some(ref mut s) = *state_hover.borrow_mut() {
			// hover tracking only; drag motion arrives via the window
			// listener, and set_hover is a no-op mid-drag anyway
			let hovered = s.node_at_position(x, y).map(str::to_owned);
			s.set_hover(hovered);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.set_hover(None);
		}
	};

	// Teardown must cancel the pending frame and unhook every listener, or a
	// stale closure keeps mutating state nobody observes.
	{
		let (state_cl, animate_cl, frame_id_cl, resize_cl) =
			(state.clone(), animate.clone(), frame_id.clone(), resize_cb.clone());
		let (mouse_move_cl, mouse_up_cl) = (mouse_move_cb.clone(), mouse_up_cb.clone());
		let (touch_start_cl, touch_move_cl, touch_end_cl) = (
			touch_start_cb.clone(),
			touch_move_cb.clone(),
			touch_end_cb.clone(),
		);
		// The teardown closure captures `Rc<RefCell<_>>` handles, which are
		// neither `Send` nor `Sync`; `on_cleanup` requires both. On the
		// single-threaded wasm runtime these are never moved across threads, so
		// `SendWrapper` satisfies the bound without altering behavior.
		let cleanup = leptos::__reexports::send_wrapper::SendWrapper::new(move || {
			if let Some(window) = web_sys::window() {
				if let Some(id) = frame_id_cl.take() {
					let _ = window.cancel_animation_frame(id);
				}
				if let Some(cb) = resize_cl.borrow_mut().take() {
					let _ = window
						.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
				}
				if let Some(cb) = mouse_move_cl.borrow_mut().take() {
					let _ = window.remove_event_listener_with_callback(
						"mousemove",
						cb.as_ref().unchecked_ref(),
					);
				}
				if let Some(cb) = mouse_up_cl.borrow_mut().take() {
					let _ = window.remove_event_listener_with_callback(
						"mouseup",
						cb.as_ref().unchecked_ref(),
					);
				}
				if let Some(cb) = touch_move_cl.borrow_mut().take() {
					let _ = window.remove_event_listener_with_callback(
						"touchmove",
						cb.as_ref().unchecked_ref(),
					);
				}
				if let Some(cb) = touch_end_cl.borrow_mut().take() {
					let _ = window.remove_event_listener_with_callback(
						"touchend",
						cb.as_ref().unchecked_ref(),
					);
				}
			}
			if let Some(canvas) = canvas_ref.get_untracked() {
				let canvas: HtmlCanvasElement = canvas.into();
				if let Some(cb) = touch_start_cl.borrow_mut().take() {
					let _ = canvas.remove_event_listener_with_callback(
						"touchstart",
						cb.as_ref().unchecked_ref(),
					);
				}
			}
			*animate_cl.borrow_mut() = None;
			*state_cl.borrow_mut() = None;
		});
		on_cleanup(move || (cleanup.take())());
	}

	view! {
		<canvas
			node_ref=canvas_ref
			class="relation-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseleave=on_mouseleave
			style="display: block; cursor: grab; touch-action: none;"
		/>
	}
}
