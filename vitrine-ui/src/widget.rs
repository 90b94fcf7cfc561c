//! The engine wired to the browser
//!
//! [`WebLightbox`] owns a `Lightbox<DomHost>` behind `Rc<RefCell<_>>` and the
//! page listeners that drive it. Host signals are delivered from a spawned
//! task, so the engine is never re-entered while it is borrowed.

use crate::dom_host::{DomHost, Notify, ROOT_CLASS, SLIDER_CLASS, TRIGGER_CLASS};
use crate::wasm_utils::{EventListener, ListenerOptions};
use std::cell::{OnceCell, RefCell};
use std::rc::{Rc, Weak};
use thiserror::Error;
use tracing::{debug, warn};
use vitrine_core::{
    ConfigError, EventKind, HostSignal, Key, Lightbox, LightboxError, LightboxEvent, ListenerId,
    Options, PointerInput, PointerKind,
};
use wasm_bindgen::JsCast;
use web_sys::Element;

type Engine = Lightbox<DomHost>;

/// Clicks inside the modal that land on one of these are not backdrop clicks.
const CONTENT_SELECTOR: &str = ".vitrine-image, .vitrine-controls, .vitrine-caption, .vitrine-error";

#[derive(Error, Debug)]
pub enum WebError {
    #[error("No browser window available")]
    NoWindow,
    #[error("Invalid options: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Lightbox(#[from] LightboxError),
    /// Called from inside one of the lightbox's own listeners
    #[error("Lightbox is busy dispatching an event")]
    Busy,
}

/// A lightbox attached to the current document.
///
/// Cheap to clone; clones share one engine.
#[derive(Clone)]
pub struct WebLightbox {
    engine: Rc<RefCell<Engine>>,
    listeners: Rc<RefCell<Vec<EventListener>>>,
}

impl PartialEq for WebLightbox {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.engine, &other.engine)
    }
}

fn with_engine<R>(engine: &RefCell<Engine>, f: impl FnOnce(&mut Engine) -> R) -> Result<R, WebError> {
    match engine.try_borrow_mut() {
        Ok(mut lightbox) => Ok(f(&mut lightbox)),
        Err(_) => {
            warn!("Lightbox re-entered from one of its own listeners, call ignored");
            Err(WebError::Busy)
        }
    }
}

fn notifier(slot: Rc<OnceCell<Weak<RefCell<Engine>>>>) -> Notify {
    Rc::new(move |signal: HostSignal| {
        let Some(engine) = slot.get().and_then(Weak::upgrade) else {
            return;
        };
        wasm_bindgen_futures::spawn_local(async move {
            let _ = with_engine(&engine, |lightbox| lightbox.handle_signal(signal));
        });
    })
}

fn event_element(event: &web_sys::Event) -> Option<Element> {
    event.target()?.dyn_into::<Element>().ok()
}

fn within(el: &Element, selector: &str) -> Option<Element> {
    el.closest(selector).ok().flatten()
}

fn pointer_input(event: &web_sys::Event) -> Option<PointerInput> {
    let event = event.dyn_ref::<web_sys::PointerEvent>()?;
    let kind = match event.pointer_type().as_str() {
        "touch" => PointerKind::Touch,
        "pen" => PointerKind::Pen,
        _ => PointerKind::Mouse,
    };
    Some(PointerInput {
        id: event.pointer_id(),
        x: event.client_x() as f64,
        y: event.client_y() as f64,
        kind,
    })
}

impl WebLightbox {
    pub fn new(options: Options) -> Result<Self, WebError> {
        let slot = Rc::new(OnceCell::new());
        let host = DomHost::new(notifier(slot.clone())).ok_or(WebError::NoWindow)?;
        let engine = Rc::new(RefCell::new(Lightbox::new(host, options)?));
        let _ = slot.set(Rc::downgrade(&engine));
        Ok(Self {
            engine,
            listeners: Rc::new(RefCell::new(Vec::new())),
        })
    }

    /// Options given as JSON, e.g. `{"selector": ".photo", "docClose": false}`.
    pub fn from_json(json: &str) -> Result<Self, WebError> {
        Self::new(Options::from_json(json)?)
    }

    fn with<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> Result<R, WebError> {
        with_engine(&self.engine, f)
    }

    /// Register the triggers on the page and start listening. Repeatable.
    pub fn init(&self) -> usize {
        self.attach();
        self.with(|lightbox| lightbox.init()).unwrap_or(0)
    }

    pub fn add(&self, el: Element) -> Result<(), WebError> {
        self.attach();
        Ok(self.with(|lightbox| lightbox.add(el))??)
    }

    pub fn remove(&self, el: &Element) -> bool {
        self.with(|lightbox| lightbox.remove(el)).unwrap_or(false)
    }

    pub fn open(&self, el: &Element) -> bool {
        self.with(|lightbox| lightbox.open(el)).unwrap_or(false)
    }

    pub fn close(&self) {
        let _ = self.with(|lightbox| lightbox.close());
    }

    pub fn select(&self, index: usize) -> Result<(), WebError> {
        Ok(self.with(|lightbox| lightbox.select(index))??)
    }

    /// Select from an untyped number, as passed from script.
    pub fn select_value(&self, value: f64) -> Result<(), WebError> {
        Ok(self.with(|lightbox| lightbox.select_value(value))??)
    }

    pub fn previous(&self) -> Result<(), WebError> {
        Ok(self.with(|lightbox| lightbox.previous())??)
    }

    pub fn next(&self) -> Result<(), WebError> {
        Ok(self.with(|lightbox| lightbox.next())??)
    }

    pub fn is_open(&self) -> bool {
        self.with(|lightbox| lightbox.is_open()).unwrap_or(false)
    }

    pub fn current_index(&self) -> Option<usize> {
        self.with(|lightbox| lightbox.current_index()).ok().flatten()
    }

    /// Listeners run while the engine is borrowed; calling back into this
    /// `WebLightbox` from one fails with [`WebError::Busy`].
    pub fn on(
        &self,
        kind: EventKind,
        handler: impl FnMut(&mut LightboxEvent<Element>) + 'static,
    ) -> Result<ListenerId, WebError> {
        self.with(|lightbox| lightbox.on(kind, handler))
    }

    pub fn off(&self, kind: EventKind, id: ListenerId) -> bool {
        self.with(|lightbox| lightbox.off(kind, id)).unwrap_or(false)
    }

    /// Tear down the modal, forget every trigger and detach page listeners.
    pub fn destroy(&self) {
        let _ = self.with(|lightbox| lightbox.destroy());
        self.listeners.borrow_mut().clear();
        debug!("Lightbox destroyed");
    }

    fn attach(&self) {
        if !self.listeners.borrow().is_empty() {
            return;
        }
        let Ok((window, document)) = self.with(|lightbox| {
            (
                lightbox.host().window().clone(),
                lightbox.host().document().clone(),
            )
        }) else {
            return;
        };
        let window: &web_sys::EventTarget = window.as_ref();
        let document: &web_sys::EventTarget = document.as_ref();

        let mut listeners = self.listeners.borrow_mut();
        listeners.push(EventListener::new(
            document,
            "click",
            self.handler(on_click),
        ));
        listeners.push(EventListener::new(
            window,
            "keydown",
            self.handler(|engine, event| {
                let Some(key) = event.dyn_ref::<web_sys::KeyboardEvent>() else {
                    return;
                };
                let handled = with_engine(engine, |lightbox| {
                    lightbox.handle_key(Key::from_key_name(&key.key()), key.shift_key())
                });
                if matches!(handled, Ok(true)) {
                    event.prevent_default();
                }
            }),
        ));
        listeners.push(EventListener::new(
            window,
            "resize",
            self.handler(|engine, _| {
                let _ = with_engine(engine, |lightbox| lightbox.request_relayout());
            }),
        ));
        listeners.push(EventListener::new(
            window,
            "popstate",
            self.handler(|engine, _| {
                let _ = with_engine(engine, |lightbox| lightbox.handle_popstate());
            }),
        ));
        listeners.push(EventListener::with_options(
            window,
            "wheel",
            ListenerOptions::passive(),
            self.handler(|engine, _| {
                let _ = with_engine(engine, |lightbox| lightbox.handle_wheel());
            }),
        ));
        listeners.push(EventListener::new(
            document,
            "pointerdown",
            self.handler(|engine, event| {
                let Some(target) = event_element(&event) else {
                    return;
                };
                if within(&target, &format!(".{}", SLIDER_CLASS)).is_none() {
                    return;
                }
                let Some(input) = pointer_input(&event) else {
                    return;
                };
                let accepted = with_engine(engine, |lightbox| lightbox.pointer_down(input));
                if matches!(accepted, Ok(true)) {
                    let _ = target.set_pointer_capture(input.id);
                    event.prevent_default();
                }
            }),
        ));
        listeners.push(EventListener::new(
            document,
            "pointermove",
            self.handler(|engine, event| {
                if let Some(input) = pointer_input(&event) {
                    let _ = with_engine(engine, |lightbox| lightbox.pointer_move(input));
                }
            }),
        ));
        listeners.push(EventListener::new(
            document,
            "pointerup",
            self.handler(|engine, event| {
                if let Some(input) = pointer_input(&event) {
                    let _ = with_engine(engine, |lightbox| lightbox.pointer_up(input));
                }
            }),
        ));
        listeners.push(EventListener::new(
            document,
            "pointercancel",
            self.handler(|engine, _| {
                let _ = with_engine(engine, |lightbox| lightbox.pointer_cancel());
            }),
        ));
    }

    /// Wrap a page handler so it holds the engine weakly.
    fn handler(
        &self,
        f: impl Fn(&RefCell<Engine>, web_sys::Event) + 'static,
    ) -> impl FnMut(web_sys::Event) + 'static {
        let engine = Rc::downgrade(&self.engine);
        move |event| {
            if let Some(engine) = engine.upgrade() {
                f(&engine, event);
            }
        }
    }
}

fn on_click(engine: &RefCell<Engine>, event: web_sys::Event) {
    let Some(target) = event_element(&event) else {
        return;
    };

    if let Some(trigger) = within(&target, &format!(".{}", TRIGGER_CLASS)) {
        let registered = with_engine(engine, |lightbox| {
            let registered = lightbox.registry().contains(&trigger);
            if registered {
                lightbox.open(&trigger);
            }
            registered
        });
        if matches!(registered, Ok(true)) {
            event.prevent_default();
        }
        return;
    }

    if within(&target, &format!(".{}", ROOT_CLASS)).is_none() {
        return;
    }
    let _ = with_engine(engine, |lightbox| {
        if within(&target, ".vitrine-previous").is_some() {
            let _ = lightbox.previous();
        } else if within(&target, ".vitrine-next").is_some() {
            let _ = lightbox.next();
        } else if within(&target, ".vitrine-close").is_some() {
            lightbox.close();
        } else if within(&target, CONTENT_SELECTOR).is_none() {
            lightbox.handle_backdrop_click();
        }
    });
}
