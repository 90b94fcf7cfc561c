//! Hooks that own a [`WebLightbox`] for the lifetime of a component

use crate::widget::WebLightbox;
use dioxus::prelude::*;
use dioxus_core::{Runtime, RuntimeGuard};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, error, warn};
use vitrine_core::{EventKind, LightboxEvent, ListenerId, Options};

/// Shared access to the page's lightbox. `None` until the first effect ran.
#[derive(Clone, Copy, PartialEq)]
pub struct LightboxHandle {
    inner: Signal<Option<WebLightbox>>,
}

impl LightboxHandle {
    /// Subscribes the calling scope.
    pub fn get(&self) -> Option<WebLightbox> {
        self.inner.read().clone()
    }

    pub fn peek(&self) -> Option<WebLightbox> {
        self.inner.peek().clone()
    }
}

/// Create the lightbox after the first render, register the triggers already
/// on the page and provide the handle to descendants.
///
/// Options are read once; later renders do not reconfigure the lightbox.
pub fn use_lightbox(options: Options) -> LightboxHandle {
    let mut inner = use_signal(|| None::<WebLightbox>);
    let options = use_hook(|| options);

    // Runs after render so the triggers exist in the document
    use_effect(move || {
        if inner.peek().is_some() {
            return;
        }
        match WebLightbox::new(options.clone()) {
            Ok(lightbox) => {
                let added = lightbox.init();
                debug!("Lightbox ready with {} triggers", added);
                inner.set(Some(lightbox));
            }
            Err(e) => error!("Failed to start lightbox: {}", e),
        }
    });

    use_drop(move || {
        if let Some(lightbox) = inner.write().take() {
            lightbox.destroy();
        }
    });

    use_context_provider(|| LightboxHandle { inner })
}

/// Subscribe `handler` to `kind` on the lightbox from context, once it exists.
/// Unsubscribed when the component unmounts.
pub fn use_lightbox_listener(
    kind: EventKind,
    handler: impl FnMut(&mut LightboxEvent<web_sys::Element>) + 'static,
) {
    let handle = use_context::<LightboxHandle>();
    let pending = use_hook(|| Rc::new(RefCell::new(Some(handler))));
    let mut subscription = use_signal(|| None::<ListenerId>);

    use_effect(move || {
        let Some(lightbox) = handle.get() else {
            return;
        };
        let Some(mut handler) = pending.borrow_mut().take() else {
            return;
        };
        // Events fire from browser callbacks, outside the Dioxus runtime
        let runtime = Runtime::current();
        let guarded = move |event: &mut LightboxEvent<web_sys::Element>| {
            let _guard = RuntimeGuard::new(runtime.clone());
            handler(event);
        };
        match lightbox.on(kind, guarded) {
            Ok(id) => subscription.set(Some(id)),
            Err(e) => warn!("Failed to subscribe to {} events: {}", kind, e),
        }
    });

    use_drop(move || {
        let Some(id) = subscription.write().take() else {
            return;
        };
        if let Some(lightbox) = handle.peek() {
            lightbox.off(kind, id);
        }
    });
}
