//! vitrine-ui - browser binding for the vitrine lightbox
//!
//! Implements the engine's `Host` over `web-sys`, wires page events to it and
//! offers Dioxus components for pages that render their triggers.

pub mod components;
pub mod dom_host;
pub mod wasm_utils;
pub mod widget;

pub use components::*;
pub use dom_host::DomHost;
pub use widget::{WebError, WebLightbox};
