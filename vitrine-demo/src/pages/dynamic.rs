//! Triggers added and removed while the lightbox is running

use super::PhotoTrigger;
use crate::demo_data;
use dioxus::prelude::*;
use vitrine_core::Options;
use vitrine_ui::use_lightbox;

#[component]
pub fn Dynamic() -> Element {
    use_lightbox(Options::default());
    let all_photos = use_hook(demo_data::get_photos);
    let mut shown = use_signal(|| 3usize);

    let count = shown();
    let total = all_photos.len();
    let visible: Vec<_> = all_photos.iter().take(count).cloned().collect();

    rsx! {
        section {
            h2 { "Dynamic triggers" }
            p { "Showing {count} of {total} photos. The open lightbox follows along." }
            div { class: "demo-actions",
                button {
                    class: "demo-button",
                    disabled: count >= total,
                    onclick: move |_| shown += 1,
                    "Add photo"
                }
                button {
                    class: "demo-button",
                    disabled: count == 0,
                    onclick: move |_| shown -= 1,
                    "Remove last"
                }
            }
            div { class: "strip",
                for photo in visible {
                    PhotoTrigger { key: "{photo.id}", photo }
                }
            }
        }
    }
}
