//! WASM utilities for browser interop
//!
//! # Event Listener Cleanup Pattern
//!
//! A JavaScript listener backed by a Rust `Closure` must keep that closure
//! alive for as long as it is attached. `closure.forget()` does that by leaking
//! it, which also leaves the listener attached forever.
//!
//! [`EventListener`] owns the closure instead and detaches it in `Drop`, so the
//! listener lives exactly as long as the Rust value:
//!
//! ```ignore
//! let listener = EventListener::new(&window, "resize", move |_| relayout());
//!
//! // Listener is removed here
//! drop(listener);
//! ```
//!
//! The lightbox keeps all of its listeners in one `Vec` and clears it on
//! `destroy()`.

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[derive(Clone, Copy, Debug, Default)]
pub struct ListenerOptions {
    pub capture: bool,
    pub passive: bool,
}

impl ListenerOptions {
    pub fn passive() -> Self {
        Self {
            capture: false,
            passive: true,
        }
    }
}

/// An event listener that removes itself when dropped.
pub struct EventListener {
    target: web_sys::EventTarget,
    event_name: &'static str,
    capture: bool,
    callback: Closure<dyn FnMut(web_sys::Event)>,
}

impl EventListener {
    pub fn new(
        target: &web_sys::EventTarget,
        event_name: &'static str,
        callback: impl FnMut(web_sys::Event) + 'static,
    ) -> Self {
        Self::with_options(target, event_name, ListenerOptions::default(), callback)
    }

    pub fn with_options(
        target: &web_sys::EventTarget,
        event_name: &'static str,
        options: ListenerOptions,
        callback: impl FnMut(web_sys::Event) + 'static,
    ) -> Self {
        let callback: Closure<dyn FnMut(web_sys::Event)> = Closure::wrap(Box::new(callback));

        let init = web_sys::AddEventListenerOptions::new();
        init.set_capture(options.capture);
        init.set_passive(options.passive);
        target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event_name,
                callback.as_ref().unchecked_ref(),
                &init,
            )
            .ok();

        Self {
            target: target.clone(),
            event_name,
            capture: options.capture,
            callback,
        }
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback_and_bool(
            self.event_name,
            self.callback.as_ref().unchecked_ref(),
            self.capture,
        );
    }
}

/// Run `callback` once after `millis`.
pub fn set_timeout(window: &web_sys::Window, millis: f64, callback: impl FnOnce() + 'static) {
    let callback = Closure::once_into_js(callback);
    let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        millis.ceil() as i32,
    );
}

/// Run `callback` once before the next repaint.
pub fn request_animation_frame(window: &web_sys::Window, callback: impl FnOnce() + 'static) {
    let callback = Closure::once_into_js(callback);
    let _ = window.request_animation_frame(callback.unchecked_ref());
}

/// Call a method that `web-sys` does not bind yet.
pub fn call_method(target: &JsValue, name: &str, args: &js_sys::Array) -> Option<JsValue> {
    let method = js_sys::Reflect::get(target, &JsValue::from_str(name)).ok()?;
    let method = method.dyn_ref::<js_sys::Function>()?;
    method.apply(target, args).ok()
}

pub fn has_property(target: &JsValue, name: &str) -> bool {
    js_sys::Reflect::has(target, &JsValue::from_str(name)).unwrap_or(false)
}
