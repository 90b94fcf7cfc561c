//! Trigger link rendered by Dioxus
//!
//! Registers itself with the lightbox from context when it mounts after the
//! lightbox started, and unregisters on unmount, so triggers can come and go
//! with the page's state.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::components::hooks::LightboxHandle;
use crate::widget::WebError;
use dioxus::prelude::*;
use tracing::warn;
use vitrine_core::LightboxError;

/// Counter for generating unique trigger IDs
static TRIGGER_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Link that opens `href` in the lightbox
#[component]
pub fn LightboxTrigger(
    /// Full-size image URL
    href: String,
    /// Carousel to join; triggers without one share the page's default group
    #[props(default)]
    group: Option<String>,
    #[props(default)]
    caption: Option<String>,
    /// Alt text of the full-size image
    #[props(default)]
    alt: Option<String>,
    #[props(default)]
    srcset: Option<String>,
    #[props(default)]
    sizes: Option<String>,
    /// Defaults to `lightbox`, the default trigger selector
    #[props(default)]
    class: Option<String>,
    /// Usually a thumbnail `img`
    children: Element,
) -> Element {
    let handle = try_use_context::<LightboxHandle>();
    let id = use_hook(|| {
        let id = TRIGGER_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        format!("vitrine-trigger-{}", id)
    });
    let id_for_effect = id.clone();
    let mut registered = use_signal(|| None::<web_sys::Element>);

    use_effect(move || {
        let Some(lightbox) = handle.and_then(|handle| handle.get()) else {
            return;
        };
        if registered.peek().is_some() {
            return;
        }
        let Some(document) = web_sys::window().and_then(|window| window.document()) else {
            return;
        };
        let Some(el) = document.get_element_by_id(&id_for_effect) else {
            return;
        };
        match lightbox.add(el.clone()) {
            // Already picked up by the lightbox's own scan
            Ok(()) | Err(WebError::Lightbox(LightboxError::DuplicateTrigger { .. })) => {
                registered.set(Some(el))
            }
            Err(e) => warn!("Trigger {} not registered: {}", id_for_effect, e),
        }
    });

    use_drop(move || {
        let Some(el) = registered.write().take() else {
            return;
        };
        if let Some(lightbox) = handle.and_then(|handle| handle.peek()) {
            lightbox.remove(&el);
        }
    });

    rsx! {
        a {
            id,
            class: class.unwrap_or_else(|| "lightbox".to_string()),
            href,
            "data-group": group,
            "data-caption": caption,
            "data-alt": alt,
            "data-srcset": srcset,
            "data-sizes": sizes,
            {children}
        }
    }
}
