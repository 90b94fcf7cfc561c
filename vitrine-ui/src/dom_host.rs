//! `Host` implementation over the browser DOM
//!
//! Builds the modal markup, mirrors engine state onto classes and inline
//! styles, and reports asynchronous completions (image decode, close
//! transitions, animation frames) through a [`Notify`] callback.

use crate::wasm_utils::{call_method, has_property, request_animation_frame, set_timeout};
use serde::Serialize;
use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, warn};
use vitrine_core::events::LightboxEvent;
use vitrine_core::focus::focusable_selector;
use vitrine_core::gesture::ZoomState;
use vitrine_core::host::{CloseAnimation, CloseStyle, Host, HostSignal, OpenAnimation, ShellSpec};
use vitrine_core::l10n::Labels;
use vitrine_core::layout::{ImageFit, Insets, Rect, SlideMetrics, Size};
use vitrine_core::lightbox::Phase;
use vitrine_core::load::{LoadOutcome, LoadTicket, SlideId};
use vitrine_core::navigation::{ButtonState, Control, ControlsState};
use vitrine_core::trigger::{CaptionSource, ImageRequest, TriggerDescriptor, TriggerKind};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, Window};

/// Receives signals for the engine. Must not call back into it synchronously.
pub type Notify = Rc<dyn Fn(HostSignal)>;

/// Class added to every registered trigger.
pub const TRIGGER_CLASS: &str = "vitrine-trigger";
pub const ROOT_CLASS: &str = "vitrine";
pub const SLIDER_CLASS: &str = "vitrine-slider";
pub const SLIDE_CLASS: &str = "vitrine-slide";

/// Extra wait past the close transition before reporting it finished.
const CLOSE_SLACK_MS: f64 = 50.0;

const BACKGROUND_SELECTOR: &str = r#"body > *:not([aria-hidden="true"])"#;

struct Shell {
    root: HtmlElement,
    previous: HtmlElement,
    next: HtmlElement,
    close: HtmlElement,
    counter: HtmlElement,
}

struct SlideDom {
    root: HtmlElement,
    figure: HtmlElement,
    image: HtmlImageElement,
    loader: HtmlElement,
    caption: HtmlElement,
    /// Cleared when the slide is removed so a late decode is not reported
    alive: Rc<Cell<bool>>,
}

impl SlideDom {
    fn revoke(&self) {
        self.alive.set(false);
        self.root.remove();
    }
}

struct SavedBodyStyle {
    overflow: String,
    padding_right: String,
}

#[derive(Serialize)]
struct HistoryState {
    vitrine: &'static str,
}

#[derive(Serialize)]
struct EventDetail<'a> {
    index: Option<usize>,
    group: Option<&'a str>,
}

pub struct DomHost {
    window: Window,
    document: Document,
    notify: Notify,
    labels: Labels,
    shell: Option<Shell>,
    slider: Option<HtmlElement>,
    slides: HashMap<SlideId, SlideDom>,
    hidden_background: Vec<Element>,
    saved_body_style: Option<SavedBodyStyle>,
}

impl DomHost {
    /// `None` outside a browser window.
    pub fn new(notify: Notify) -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self {
            window,
            document,
            notify,
            labels: Labels::default(),
            shell: None,
            slider: None,
            slides: HashMap::new(),
            hidden_background: Vec::new(),
            saved_body_style: None,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The modal root, once built.
    pub fn root(&self) -> Option<&HtmlElement> {
        self.shell.as_ref().map(|shell| &shell.root)
    }

    fn create(&self, tag: &str, class: &str) -> Option<HtmlElement> {
        let el = self.document.create_element(tag).ok()?;
        el.set_class_name(class);
        el.dyn_into::<HtmlElement>().ok()
    }

    fn schedule_close_finished(&self, delay: f64) {
        let notify = self.notify.clone();
        set_timeout(&self.window, delay, move || notify(HostSignal::CloseFinished));
    }

    fn start_view_transition(&self, fallback_delay: f64) {
        let Some(shell) = &self.shell else {
            self.schedule_close_finished(0.0);
            return;
        };
        let root = shell.root.clone();
        let update = Closure::once_into_js(move || {
            let classes = root.class_list();
            let _ = classes.remove_2("vitrine-open", "vitrine-closing");
        });
        let started = call_method(
            self.document.as_ref(),
            "startViewTransition",
            &js_sys::Array::of1(&update),
        );
        let finished = started
            .and_then(|transition| js_sys::Reflect::get(&transition, &"finished".into()).ok())
            .and_then(|promise| promise.dyn_into::<js_sys::Promise>().ok());

        let Some(finished) = finished else {
            debug!("View transition unavailable, falling back to a timer");
            self.schedule_close_finished(fallback_delay + CLOSE_SLACK_MS);
            return;
        };
        let notify = self.notify.clone();
        wasm_bindgen_futures::spawn_local(async move {
            // A skipped transition rejects `finished`; closing completes either way.
            let _ = JsFuture::from(finished).await;
            notify(HostSignal::CloseFinished);
        });
    }
}

fn set_attr(el: &Element, name: &str, value: &str) {
    let _ = el.set_attribute(name, value);
}

fn set_style(el: &HtmlElement, name: &str, value: &str) {
    let _ = el.style().set_property(name, value);
}

fn clear_style(el: &HtmlElement, name: &str) {
    let _ = el.style().remove_property(name);
}

fn toggle_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

fn rect_of(el: &Element) -> Rect {
    let r = el.get_bounding_client_rect();
    Rect::new(r.left(), r.top(), r.width(), r.height())
}

fn px(value: &str) -> f64 {
    value.trim().trim_end_matches("px").parse().unwrap_or(0.0)
}

fn elements(list: web_sys::NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn apply_button(button: &HtmlElement, state: &ButtonState) {
    if let Some(button) = button.dyn_ref::<web_sys::HtmlButtonElement>() {
        button.set_disabled(state.disabled);
    }
    set_attr(button, "aria-hidden", state.aria_hidden());
}

fn caption_of(el: &Element, source: &CaptionSource<'_>) -> Option<String> {
    if !source.enabled {
        return None;
    }
    match source.selector {
        None => el.get_attribute(source.attribute),
        Some(selector) => {
            let child = el.query_selector(selector).ok().flatten()?;
            child
                .get_attribute(source.attribute)
                .or_else(|| Some(child.inner_html()))
        }
    }
}

impl Host for DomHost {
    type Element = Element;

    fn query_all(&self, selector: &str) -> Vec<Element> {
        match self.document.query_selector_all(selector) {
            Ok(list) => elements(list),
            Err(_) => {
                warn!("Invalid selector '{}'", selector);
                Vec::new()
            }
        }
    }

    fn query_within(&self, scope: &Element, selector: &str) -> Vec<Element> {
        scope
            .query_selector_all(selector)
            .map(elements)
            .unwrap_or_default()
    }

    fn describe(&self, el: &Element, captions: &CaptionSource<'_>) -> TriggerDescriptor {
        let kind = match el.tag_name().to_ascii_lowercase().as_str() {
            "a" => TriggerKind::Anchor,
            "button" => TriggerKind::Button,
            _ => TriggerKind::Other,
        };
        // Resolve against the document only when the attribute is really there
        let href = el.get_attribute("href").map(|raw| {
            el.dyn_ref::<web_sys::HtmlAnchorElement>()
                .map(|anchor| anchor.href())
                .filter(|resolved| !raw.trim().is_empty() && !resolved.is_empty())
                .unwrap_or(raw)
        });
        let thumbnail = el.query_selector("img").ok().flatten();

        TriggerDescriptor {
            kind: Some(kind),
            href,
            target: el.get_attribute("data-target"),
            alt: el.get_attribute("data-alt"),
            thumbnail_alt: thumbnail.as_ref().and_then(|img| img.get_attribute("alt")),
            has_thumbnail: thumbnail.is_some(),
            caption: caption_of(el, captions),
            srcset: el.get_attribute("data-srcset"),
            sizes: el.get_attribute("data-sizes"),
        }
    }

    fn group_attribute(&self, el: &Element) -> Option<String> {
        el.get_attribute("data-group")
    }

    fn set_group_attribute(&mut self, el: &Element, group: &str) {
        set_attr(el, "data-group", group);
    }

    fn decorate_trigger(&mut self, el: &Element, zoom_icon: Option<&str>) {
        let _ = el.class_list().add_1(TRIGGER_CLASS);
        let Some(icon) = zoom_icon else {
            return;
        };
        if el.query_selector(".vitrine-zoom").ok().flatten().is_some() {
            return;
        }
        if let Some(indicator) = self.create("span", "vitrine-zoom") {
            set_attr(&indicator, "aria-hidden", "true");
            indicator.set_inner_html(icon);
            let _ = el.append_child(&indicator);
        }
    }

    fn undecorate_trigger(&mut self, el: &Element) {
        let _ = el.class_list().remove_1(TRIGGER_CLASS);
        if let Ok(Some(indicator)) = el.query_selector(".vitrine-zoom") {
            indicator.remove();
        }
    }

    fn thumbnail_rect(&self, el: &Element) -> Option<Rect> {
        let img = el.query_selector("img").ok().flatten()?;
        let rect = rect_of(&img);
        (rect.width > 0.0 && rect.height > 0.0).then_some(rect)
    }

    fn prefers_reduced_motion(&self) -> bool {
        matches!(
            self.window.match_media("(prefers-reduced-motion: reduce)"),
            Ok(Some(query)) if query.matches()
        )
    }

    fn supports_view_transitions(&self) -> bool {
        has_property(self.document.as_ref(), "startViewTransition")
    }

    fn is_touch_device(&self) -> bool {
        self.window.navigator().max_touch_points() > 0
    }

    fn scrollbar_width(&self) -> f64 {
        let inner = self
            .window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or(0.0);
        let client = self
            .document
            .document_element()
            .map(|html| html.client_width() as f64)
            .unwrap_or(inner);
        (inner - client).max(0.0)
    }

    fn container_width(&self) -> f64 {
        let measured = self
            .slider
            .as_ref()
            .map(|slider| slider.client_width() as f64)
            .unwrap_or(0.0);
        if measured > 0.0 {
            return measured;
        }
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or(0.0)
    }

    fn build_shell(&mut self, spec: &ShellSpec<'_>) {
        if self.shell.is_some() {
            return;
        }
        let Some(body) = self.document.body() else {
            warn!("Document has no body, lightbox shell not built");
            return;
        };
        self.labels = spec.labels.clone();

        let (Some(root), Some(controls), Some(previous), Some(next), Some(close), Some(counter)) = (
            self.create("div", ROOT_CLASS),
            self.create("div", "vitrine-controls"),
            self.create("button", "vitrine-button vitrine-previous"),
            self.create("button", "vitrine-button vitrine-next"),
            self.create("button", "vitrine-button vitrine-close"),
            self.create("div", "vitrine-counter"),
        ) else {
            warn!("Failed to create lightbox shell elements");
            return;
        };

        set_attr(&root, "role", "dialog");
        set_attr(&root, "aria-modal", "true");
        set_attr(&root, "aria-hidden", "true");
        set_attr(&root, "aria-label", &spec.labels.lightbox_label);
        set_attr(&root, "tabindex", "-1");
        set_style(
            &root,
            "--vitrine-duration",
            &format!("{}ms", spec.transition_duration),
        );
        set_style(&root, "--vitrine-timing", spec.transition_timing_function);

        set_attr(&controls, "role", "group");
        set_attr(&controls, "aria-label", &spec.labels.controls_label);

        for (button, label, icon) in [
            (&close, &spec.labels.close_button_label, &spec.icons.close),
            (&previous, &spec.labels.previous_button_label, &spec.icons.previous),
            (&next, &spec.labels.next_button_label, &spec.icons.next),
        ] {
            set_attr(button, "type", "button");
            set_attr(button, "aria-label", label);
            set_attr(button, "title", label);
            button.set_inner_html(icon);
        }
        set_attr(&counter, "aria-hidden", "true");

        let _ = controls.append_child(&counter);
        let _ = controls.append_child(&close);
        let _ = controls.append_child(&previous);
        let _ = controls.append_child(&next);
        let _ = root.append_child(&controls);
        let _ = body.append_child(&root);

        debug!("Lightbox shell attached to the document");
        self.shell = Some(Shell {
            root,
            previous,
            next,
            close,
            counter,
        });
    }

    fn remove_shell(&mut self) {
        for slide in self.slides.values() {
            slide.revoke();
        }
        self.slides.clear();
        self.slider = None;
        if let Some(shell) = self.shell.take() {
            shell.root.remove();
        }
    }

    fn set_phase(&mut self, phase: Phase) {
        let Some(shell) = &self.shell else {
            return;
        };
        let root: &Element = shell.root.as_ref();
        match phase {
            Phase::Closed => {
                let _ = root.class_list().remove_4(
                    "vitrine-open",
                    "vitrine-opening",
                    "vitrine-closing",
                    "vitrine-fade-out",
                );
                let _ = root.class_list().remove_1("vitrine-reveal");
                set_attr(root, "aria-hidden", "true");
            }
            Phase::Opening => {
                let _ = root.class_list().add_2("vitrine-open", "vitrine-opening");
                set_attr(root, "aria-hidden", "false");
            }
            Phase::Open => {
                let _ = root.class_list().remove_1("vitrine-opening");
            }
            Phase::Closing => {
                let _ = root.class_list().add_1("vitrine-closing");
            }
        }
    }

    fn set_controls(&mut self, controls: &ControlsState) {
        let Some(shell) = &self.shell else {
            return;
        };
        apply_button(&shell.previous, &controls.previous);
        apply_button(&shell.next, &controls.next);
        shell.counter.set_text_content(Some(&controls.counter));
        shell.counter.set_hidden(controls.counter_hidden);
    }

    fn set_overlay_opacity(&mut self, opacity: Option<f64>) {
        let Some(shell) = &self.shell else {
            return;
        };
        match opacity {
            Some(opacity) => set_style(
                &shell.root,
                "--vitrine-overlay-opacity",
                &opacity.to_string(),
            ),
            None => clear_style(&shell.root, "--vitrine-overlay-opacity"),
        }
    }

    fn set_vertical_closing(&mut self, closing: bool) {
        if let Some(shell) = &self.shell {
            toggle_class(&shell.root, "vitrine-vertical-closing", closing);
        }
    }

    fn create_slider(&mut self, draggable: bool) {
        let Some(slider) = self.create("div", SLIDER_CLASS) else {
            return;
        };
        let Some(shell) = &self.shell else {
            return;
        };
        set_attr(&slider, "role", "region");
        set_attr(&slider, "aria-label", &self.labels.slider_label);
        toggle_class(&slider, "vitrine-draggable", draggable);
        let _ = shell.root.insert_before(&slider, shell.root.first_child().as_ref());
        self.slider = Some(slider);
    }

    fn remove_slider(&mut self) {
        for slide in self.slides.values() {
            slide.revoke();
        }
        self.slides.clear();
        if let Some(slider) = self.slider.take() {
            slider.remove();
        }
    }

    fn set_slider_dragging(&mut self, dragging: bool) {
        if let Some(slider) = &self.slider {
            toggle_class(slider, "vitrine-dragging", dragging);
        }
    }

    fn set_slider_transform(&mut self, x: f64, y: f64, animate: bool) {
        let Some(slider) = &self.slider else {
            return;
        };
        if animate {
            clear_style(slider, "transition");
        } else {
            set_style(slider, "transition", "none");
        }
        set_style(
            slider,
            "transform",
            &format!("translate3d({}px, {}px, 0)", x, y),
        );
    }

    fn create_slide(&mut self, slide: SlideId, index: usize, total: usize) {
        let Some(slider) = &self.slider else {
            return;
        };
        let (Some(root), Some(figure), Some(loader), Some(caption)) = (
            self.create("div", SLIDE_CLASS),
            self.create("figure", "vitrine-figure"),
            self.create("div", "vitrine-loader"),
            self.create("figcaption", "vitrine-caption"),
        ) else {
            return;
        };
        let Ok(image) = self
            .document
            .create_element("img")
            .and_then(|img| img.dyn_into::<HtmlImageElement>().map_err(JsValue::from))
        else {
            return;
        };

        set_attr(&root, "role", "group");
        set_attr(&root, "aria-roledescription", "slide");
        set_attr(&root, "aria-label", &self.labels.slide(index, total));
        set_attr(&root, "aria-hidden", "true");
        set_style(&root, "left", &format!("{}%", index * 100));

        set_attr(&loader, "role", "progressbar");
        set_attr(
            &loader,
            "aria-label",
            &self.labels.lightbox_loading_indicator_label,
        );

        image.set_class_name("vitrine-image");
        image.set_hidden(true);
        caption.set_id(&format!("vitrine-caption-{}", slide));
        caption.set_hidden(true);

        let _ = figure.append_child(&loader);
        let _ = figure.append_child(&image);
        let _ = figure.append_child(&caption);
        let _ = root.append_child(&figure);
        let _ = slider.append_child(&root);

        self.slides.insert(
            slide,
            SlideDom {
                root,
                figure,
                image,
                loader,
                caption,
                alive: Rc::new(Cell::new(true)),
            },
        );
    }

    fn position_slide(&mut self, slide: SlideId, index: usize, total: usize) {
        if let Some(dom) = self.slides.get(&slide) {
            set_style(&dom.root, "left", &format!("{}%", index * 100));
            set_attr(&dom.root, "aria-label", &self.labels.slide(index, total));
        }
    }

    fn remove_slide(&mut self, slide: SlideId) {
        if let Some(dom) = self.slides.remove(&slide) {
            dom.revoke();
        }
    }

    fn set_slide_active(&mut self, slide: SlideId, active: bool) {
        if let Some(dom) = self.slides.get(&slide) {
            toggle_class(&dom.root, "vitrine-active", active);
            set_attr(&dom.root, "aria-hidden", if active { "false" } else { "true" });
        }
    }

    fn load_image(&mut self, slide: SlideId, request: &ImageRequest, ticket: LoadTicket) {
        let Some(dom) = self.slides.get(&slide) else {
            return;
        };
        let image = dom.image.clone();
        image.set_alt(&request.alt);
        if let Some(srcset) = &request.srcset {
            image.set_srcset(srcset);
        }
        if let Some(sizes) = &request.sizes {
            image.set_sizes(sizes);
        }
        if let Some(caption) = &request.caption {
            dom.caption.set_inner_html(caption);
            dom.caption.set_hidden(false);
            set_attr(&image, "aria-labelledby", &dom.caption.id());
        }
        image.set_src(&request.src);

        let alive = dom.alive.clone();
        let notify = self.notify.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let decoded = JsFuture::from(image.decode()).await;
            if !alive.get() {
                return;
            }
            let outcome = match decoded {
                Ok(_) => LoadOutcome::Loaded {
                    natural: Size::new(image.natural_width() as f64, image.natural_height() as f64),
                },
                Err(err) => {
                    debug!("Failed to decode {}: {:?}", image.src(), err);
                    LoadOutcome::Failed
                }
            };
            notify(HostSignal::ImageReady { ticket, outcome });
        });
    }

    fn show_image(&mut self, slide: SlideId, _natural: Size) {
        if let Some(dom) = self.slides.get(&slide) {
            dom.loader.remove();
            dom.image.set_hidden(false);
            let _ = dom.image.class_list().add_1("vitrine-loaded");
        }
    }

    fn show_error(&mut self, slide: SlideId, message: &str) {
        let Some(dom) = self.slides.get(&slide) else {
            return;
        };
        dom.loader.remove();
        dom.image.set_hidden(true);
        if let Some(placeholder) = self.create("div", "vitrine-error") {
            set_attr(&placeholder, "role", "alert");
            placeholder.set_text_content(Some(message));
            let _ = dom.figure.insert_before(&placeholder, Some(dom.caption.as_ref()));
        }
    }

    fn slide_metrics(&self, slide: SlideId) -> Option<SlideMetrics> {
        let dom = self.slides.get(&slide)?;
        let style = self.window.get_computed_style(&dom.root).ok().flatten()?;
        let side = |name: &str| px(&style.get_property_value(name).unwrap_or_default());
        let caption_height = if dom.caption.hidden() {
            0.0
        } else {
            dom.caption.offset_height() as f64
        };
        Some(SlideMetrics {
            size: Size::new(dom.root.client_width() as f64, dom.root.client_height() as f64),
            padding: Insets {
                top: side("padding-top"),
                right: side("padding-right"),
                bottom: side("padding-bottom"),
                left: side("padding-left"),
            },
            caption_height,
        })
    }

    fn size_image(&mut self, slide: SlideId, fit: ImageFit) {
        let Some(dom) = self.slides.get(&slide) else {
            return;
        };
        match fit {
            ImageFit::Natural => {
                clear_style(&dom.image, "width");
                clear_style(&dom.image, "height");
            }
            ImageFit::Scaled(size) => {
                set_style(&dom.image, "width", &format!("{}px", size.width));
                set_style(&dom.image, "height", &format!("{}px", size.height));
            }
        }
    }

    fn image_rect(&self, slide: SlideId) -> Option<Rect> {
        let dom = self.slides.get(&slide)?;
        if dom.image.hidden() {
            return None;
        }
        Some(rect_of(&dom.image))
    }

    fn animate_open(&mut self, slide: SlideId, animation: &OpenAnimation) {
        let Some(dom) = self.slides.get(&slide) else {
            return;
        };
        match animation {
            OpenAnimation::FromThumbnail {
                transform,
                duration,
                timing_function,
            } => {
                let image = &dom.image;
                set_style(image, "transition", "none");
                set_style(image, "transform", &transform.to_css());
                // Reading layout commits the start transform before the transition
                let _ = image.offset_width();
                set_style(
                    image,
                    "transition",
                    &format!("transform {}ms {}", duration, timing_function),
                );
                clear_style(image, "transform");
            }
            OpenAnimation::Reveal { duration } => {
                if let Some(shell) = &self.shell {
                    set_style(&shell.root, "--vitrine-duration", &format!("{}ms", duration));
                    let _ = shell.root.class_list().add_1("vitrine-reveal");
                }
            }
        }
    }

    fn set_image_zoom(&mut self, slide: SlideId, zoom: &ZoomState) {
        let Some(dom) = self.slides.get(&slide) else {
            return;
        };
        if *zoom == ZoomState::identity() {
            clear_style(&dom.image, "transform");
            clear_style(&dom.image, "transform-origin");
            return;
        }
        let rect = rect_of(&dom.image);
        set_style(&dom.image, "transition", "none");
        set_style(
            &dom.image,
            "transform-origin",
            &format!("{}px {}px", zoom.origin_x - rect.left, zoom.origin_y - rect.top),
        );
        set_style(&dom.image, "transform", &zoom.to_css());
    }

    fn begin_close(&mut self, animation: &CloseAnimation) {
        let Some(shell) = &self.shell else {
            self.schedule_close_finished(0.0);
            return;
        };
        set_style(
            &shell.root,
            "--vitrine-duration",
            &format!("{}ms", animation.duration),
        );
        match animation.style {
            CloseStyle::ToThumbnail(transform) => {
                if let Some(dom) = animation.slide.and_then(|id| self.slides.get(&id)) {
                    set_style(
                        &dom.image,
                        "transition",
                        &format!(
                            "transform {}ms {}",
                            animation.duration, animation.timing_function
                        ),
                    );
                    set_style(&dom.image, "transform", &transform.to_css());
                }
                self.schedule_close_finished(animation.duration + CLOSE_SLACK_MS);
            }
            CloseStyle::Fade => {
                let _ = shell.root.class_list().add_1("vitrine-fade-out");
                self.schedule_close_finished(animation.duration + CLOSE_SLACK_MS);
            }
            CloseStyle::ViewTransition => self.start_view_transition(animation.duration),
        }
    }

    fn hide_background(&mut self) {
        let root: Option<web_sys::Node> = self.shell.as_ref().map(|s| s.root.clone().into());
        let Ok(candidates) = self.document.query_selector_all(BACKGROUND_SELECTOR) else {
            return;
        };
        for el in elements(candidates) {
            if el.is_same_node(root.as_ref()) {
                continue;
            }
            set_attr(&el, "aria-hidden", "true");
            self.hidden_background.push(el);
        }
    }

    fn restore_background(&mut self) {
        for el in self.hidden_background.drain(..) {
            let _ = el.remove_attribute("aria-hidden");
        }
    }

    fn lock_scroll(&mut self, scrollbar_width: f64) {
        let Some(body) = self.document.body() else {
            return;
        };
        let style = body.style();
        if self.saved_body_style.is_none() {
            self.saved_body_style = Some(SavedBodyStyle {
                overflow: style.get_property_value("overflow").unwrap_or_default(),
                padding_right: style.get_property_value("padding-right").unwrap_or_default(),
            });
        }
        let _ = style.set_property("overflow", "hidden");
        if scrollbar_width > 0.0 {
            let _ = style.set_property("padding-right", &format!("{}px", scrollbar_width));
        }
    }

    fn unlock_scroll(&mut self) {
        let (Some(body), Some(saved)) = (self.document.body(), self.saved_body_style.take()) else {
            return;
        };
        let style = body.style();
        for (name, value) in [
            ("overflow", saved.overflow),
            ("padding-right", saved.padding_right),
        ] {
            if value.is_empty() {
                let _ = style.remove_property(name);
            } else {
                let _ = style.set_property(name, &value);
            }
        }
    }

    fn push_history(&mut self) {
        let state = serde_json::to_string(&HistoryState { vitrine: "close" })
            .ok()
            .and_then(|json| js_sys::JSON::parse(&json).ok())
            .unwrap_or(JsValue::NULL);
        match self.window.history() {
            Ok(history) => {
                if let Err(err) = history.push_state(&state, "") {
                    warn!("Failed to push history entry: {:?}", err);
                }
            }
            Err(err) => warn!("History unavailable: {:?}", err),
        }
    }

    fn history_back(&mut self) {
        if let Ok(history) = self.window.history() {
            let _ = history.back();
        }
    }

    fn request_animation_frame(&mut self) {
        let notify = self.notify.clone();
        request_animation_frame(&self.window, move || notify(HostSignal::AnimationFrame));
    }

    fn active_element(&self) -> Option<Element> {
        self.document.active_element()
    }

    fn focusable_elements(&self) -> Vec<Element> {
        let Some(shell) = &self.shell else {
            return Vec::new();
        };
        shell
            .root
            .query_selector_all(&focusable_selector())
            .map(elements)
            .unwrap_or_default()
            .into_iter()
            .filter(|el| el.get_client_rects().length() > 0)
            .collect()
    }

    fn control_element(&self, control: Control) -> Option<Element> {
        let shell = self.shell.as_ref()?;
        let button = match control {
            Control::Previous => &shell.previous,
            Control::Next => &shell.next,
            Control::Close => &shell.close,
        };
        Some(button.clone().into())
    }

    fn focus(&mut self, el: &Element) {
        if let Some(el) = el.dyn_ref::<HtmlElement>() {
            let _ = el.focus();
        }
    }

    fn dispatch_event(&mut self, event: &LightboxEvent<Element>) -> bool {
        let group = event
            .source
            .as_ref()
            .and_then(|source| source.get_attribute("data-group"));
        let detail = serde_json::to_string(&EventDetail {
            index: event.index,
            group: group.as_deref(),
        })
        .ok()
        .and_then(|json| js_sys::JSON::parse(&json).ok())
        .unwrap_or_else(|| js_sys::Object::new().into());
        if let Some(source) = &event.source {
            let _ = js_sys::Reflect::set(&detail, &"trigger".into(), source);
        }

        let init = web_sys::CustomEventInit::new();
        init.set_bubbles(true);
        init.set_cancelable(true);
        init.set_detail(&detail);
        let name = format!("vitrine:{}", event.kind);
        let Ok(custom) = web_sys::CustomEvent::new_with_event_init_dict(&name, &init) else {
            warn!("Failed to create {} event", name);
            return false;
        };

        let target: &web_sys::EventTarget = match &self.shell {
            Some(shell) => shell.root.as_ref(),
            None => self.document.as_ref(),
        };
        target
            .dispatch_event(&custom)
            .map(|not_cancelled| !not_cancelled)
            .unwrap_or(false)
    }
}
