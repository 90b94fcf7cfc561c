//! Galleries grouped by container, plus an explicit group and a button trigger

use super::PhotoTrigger;
use crate::demo_data;
use dioxus::prelude::*;
use vitrine_core::Options;
use vitrine_ui::use_lightbox;

#[component]
pub fn Galleries() -> Element {
    use_lightbox(Options {
        gallery_selector: Some(".gallery".into()),
        ..Options::default()
    });

    rsx! {
        section {
            h2 { "Coast" }
            p { "Each gallery container is its own carousel." }
            div { class: "gallery",
                for photo in demo_data::get_collection("coast") {
                    PhotoTrigger { key: "{photo.id}", photo }
                }
            }
        }
        section {
            h2 { "Woods" }
            div { class: "gallery",
                for photo in demo_data::get_collection("woods") {
                    PhotoTrigger { key: "{photo.id}", photo }
                }
            }
        }
        section {
            h2 { "City" }
            p { "Outside any gallery, grouped with data-group." }
            div { class: "strip",
                for photo in demo_data::get_collection("city") {
                    PhotoTrigger { key: "{photo.id}", photo, group: "city" }
                }
            }
        }
        section {
            h2 { "Button trigger" }
            button {
                class: "lightbox demo-button",
                r#type: "button",
                "data-target": "https://picsum.photos/id/1018/1600/1067.jpg",
                "data-caption": "Opened from a button",
                "data-alt": "Mountain landscape",
                "Show poster"
            }
        }
    }
}
