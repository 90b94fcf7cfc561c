//! vitrine demo - Web demo of the lightbox
//!
//! Pages exercising galleries, dynamic triggers and the event API against
//! fixture photos.

mod demo_data;
mod pages;

use dioxus::prelude::*;
use pages::{Dynamic, Events, Galleries};

pub const MAIN_CSS: Asset = asset!("/assets/main.css");
pub const VITRINE_CSS: Asset = asset!("/assets/vitrine.css");

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(DemoLayout)]
    #[route("/")]
    Galleries {},
    #[route("/dynamic")]
    Dynamic {},
    #[route("/events")]
    Events {},
}

#[component]
fn DemoLayout() -> Element {
    rsx! {
        header { class: "demo-header",
            h1 { "vitrine" }
            nav {
                Link { to: Route::Galleries {}, "Galleries" }
                Link { to: Route::Dynamic {}, "Dynamic triggers" }
                Link { to: Route::Events {}, "Events" }
            }
        }
        main { class: "demo-main", Outlet::<Route> {} }
    }
}

#[component]
pub fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }
        document::Link { rel: "stylesheet", href: VITRINE_CSS }
        Router::<Route> {}
    }
}

fn main() {
    dioxus::launch(App);
}
