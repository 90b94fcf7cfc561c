//! Dioxus components for pages that show a lightbox

pub mod hooks;
pub mod trigger;

pub use hooks::{use_lightbox, use_lightbox_listener, LightboxHandle};
pub use trigger::LightboxTrigger;
