//! Event log and programmatic control

use super::PhotoTrigger;
use crate::demo_data;
use dioxus::prelude::*;
use tracing::warn;
use vitrine_core::{EventKind, Options};
use vitrine_ui::{use_lightbox, use_lightbox_listener};

const MAX_LOG_LINES: usize = 12;

#[component]
pub fn Events() -> Element {
    let lightbox = use_lightbox(Options {
        doc_close: false,
        scroll_close: true,
        ..Options::default()
    });
    let log = use_signal(Vec::<String>::new);

    for kind in [
        EventKind::Open,
        EventKind::Select,
        EventKind::Close,
        EventKind::Destroy,
    ] {
        let mut log = log;
        use_lightbox_listener(kind, move |event| {
            let index = event
                .index
                .map(|index| index.to_string())
                .unwrap_or_else(|| "-".into());
            let mut lines = log.write();
            lines.insert(0, format!("{} (index {})", kind, index));
            lines.truncate(MAX_LOG_LINES);
        });
    }

    let photos = demo_data::get_collection("coast");
    let first_href = photos.first().map(|photo| photo.full_url());

    rsx! {
        section {
            h2 { "Events" }
            p { "Backdrop clicks are ignored here; scroll the wheel to close." }
            div { class: "demo-actions",
                button {
                    class: "demo-button",
                    onclick: move |_| {
                        let Some(lightbox) = lightbox.peek() else {
                            return;
                        };
                        let Some(href) = first_href.as_deref() else {
                            return;
                        };
                        let Some(document) = web_sys::window().and_then(|window| window.document())
                        else {
                            return;
                        };
                        let selector = format!("a[href=\"{}\"]", href);
                        match document.query_selector(&selector) {
                            Ok(Some(trigger)) => {
                                lightbox.open(&trigger);
                            }
                            _ => warn!("No trigger for {}", href),
                        }
                    },
                    "Open first photo"
                }
            }
            div { class: "strip",
                for photo in photos {
                    PhotoTrigger { key: "{photo.id}", photo, group: "events" }
                }
            }
            ol { class: "event-log",
                for line in log() {
                    li { "{line}" }
                }
            }
        }
    }
}
