mod dynamic;
mod events;
mod galleries;

pub use dynamic::Dynamic;
pub use events::Events;
pub use galleries::Galleries;

use crate::demo_data::Photo;
use dioxus::prelude::*;
use vitrine_ui::LightboxTrigger;

/// Thumbnail link for one fixture photo
#[component]
pub fn PhotoTrigger(photo: Photo, #[props(default)] group: Option<String>) -> Element {
    rsx! {
        LightboxTrigger {
            href: photo.full_url(),
            group,
            caption: photo.caption.clone(),
            alt: photo.alt.clone(),
            srcset: photo.srcset(),
            sizes: "(max-width: 800px) 100vw, 1600px",
            class: "lightbox demo-thumb",
            img { src: photo.thumbnail_url(), alt: photo.alt.clone(), width: 320, height: 214 }
        }
    }
}
