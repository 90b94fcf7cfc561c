//! Recording host for tests.
//!
//! Holds a tiny page model (elements with a tag, classes, attributes and a
//! parent) and records every change the lightbox makes to it. Asynchronous
//! completions are queued and handed back through [`MockHost::drain_signals`]
//! or [`settle`].

use crate::events::{EventKind, LightboxEvent};
use crate::gesture::ZoomState;
use crate::host::{CloseAnimation, Host, HostSignal, OpenAnimation, ShellSpec};
use crate::layout::{ImageFit, Insets, Rect, SlideMetrics, Size};
use crate::lightbox::{Lightbox, Phase};
use crate::load::{Content, LoadOutcome, LoadTicket, SlideId};
use crate::navigation::{Control, ControlsState};
use crate::trigger::{CaptionSource, ImageRequest, TriggerDescriptor, TriggerKind};
use std::collections::{BTreeMap, BTreeSet};

/// Natural size reported for images without an explicit one.
pub const DEFAULT_NATURAL: Size = Size {
    width: 1600.0,
    height: 1200.0,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MockElement(pub u32);

#[derive(Clone, Debug, Default)]
struct Node {
    tag: String,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    parent: Option<MockElement>,
    inner_html: String,
    thumbnail: Option<(String, Rect)>,
}

impl Node {
    fn matches(&self, selector: &str) -> bool {
        selector.split(',').map(str::trim).any(|part| {
            if let Some(class) = part.strip_prefix('.') {
                self.classes.iter().any(|c| c == class)
            } else {
                self.tag == part
            }
        })
    }
}

/// One slide as the host sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct SlideRecord {
    pub index: usize,
    pub total: usize,
    pub active: bool,
    pub request: Option<ImageRequest>,
    pub content: Option<Content>,
    pub error_message: Option<String>,
    pub fit: Option<ImageFit>,
    pub zoom: ZoomState,
    pub open_animation: Option<OpenAnimation>,
}

impl SlideRecord {
    fn new(index: usize, total: usize) -> Self {
        Self {
            index,
            total,
            active: false,
            request: None,
            content: None,
            error_message: None,
            fit: None,
            zoom: ZoomState::identity(),
            open_animation: None,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SliderRecord {
    pub draggable: bool,
    pub dragging: bool,
    pub x: f64,
    pub y: f64,
    pub animated: bool,
}

/// A dispatched lifecycle event.
#[derive(Clone, Debug, PartialEq)]
pub struct EventRecord {
    pub kind: EventKind,
    pub index: Option<usize>,
    pub source: Option<MockElement>,
}

#[derive(Debug)]
pub struct MockHost {
    nodes: BTreeMap<MockElement, Node>,
    next_id: u32,
    natural_sizes: BTreeMap<String, Size>,
    broken: BTreeSet<String>,
    pending_loads: Vec<(LoadTicket, String)>,
    close_pending: bool,

    // Environment
    pub reduced_motion: bool,
    pub view_transitions: bool,
    pub touch_device: bool,
    pub viewport: Size,
    pub scrollbar: f64,
    pub slide_padding: f64,
    pub caption_height: f64,
    /// Events whose default page listeners prevent
    pub prevented: BTreeSet<EventKind>,

    // Recorded state
    pub shell_built: bool,
    pub shells_built: usize,
    pub phase: Phase,
    pub controls: Option<ControlsState>,
    pub overlay_opacity: Option<f64>,
    pub vertical_closing: bool,
    pub slider: Option<SliderRecord>,
    pub slides: BTreeMap<SlideId, SlideRecord>,
    pub removed_slides: Vec<SlideId>,
    pub decorated: BTreeMap<MockElement, bool>,
    pub background_hidden: bool,
    pub scroll_lock: Option<f64>,
    pub history_depth: usize,
    pub focused: Option<MockElement>,
    pub close_animation: Option<CloseAnimation>,
    pub frames_requested: usize,
    frame_pending: bool,
    pub events: Vec<EventRecord>,
    previous_button: MockElement,
    next_button: MockElement,
    close_button: MockElement,
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MockHost {
    pub fn new() -> Self {
        let mut host = Self {
            nodes: BTreeMap::new(),
            next_id: 0,
            natural_sizes: BTreeMap::new(),
            broken: BTreeSet::new(),
            pending_loads: Vec::new(),
            close_pending: false,
            reduced_motion: false,
            view_transitions: false,
            touch_device: false,
            viewport: Size::new(1000.0, 800.0),
            scrollbar: 15.0,
            slide_padding: 0.0,
            caption_height: 0.0,
            prevented: BTreeSet::new(),
            shell_built: false,
            shells_built: 0,
            phase: Phase::Closed,
            controls: None,
            overlay_opacity: None,
            vertical_closing: false,
            slider: None,
            slides: BTreeMap::new(),
            removed_slides: Vec::new(),
            decorated: BTreeMap::new(),
            background_hidden: false,
            scroll_lock: None,
            history_depth: 0,
            focused: None,
            close_animation: None,
            frames_requested: 0,
            frame_pending: false,
            events: Vec::new(),
            previous_button: MockElement(0),
            next_button: MockElement(0),
            close_button: MockElement(0),
        };
        host.previous_button = host.element("button", &["vitrine-previous"]);
        host.next_button = host.element("button", &["vitrine-next"]);
        host.close_button = host.element("button", &["vitrine-close"]);
        host
    }

    // Page model

    pub fn element(&mut self, tag: &str, classes: &[&str]) -> MockElement {
        self.next_id += 1;
        let el = MockElement(self.next_id);
        self.nodes.insert(
            el,
            Node {
                tag: tag.to_string(),
                classes: classes.iter().map(|c| c.to_string()).collect(),
                ..Default::default()
            },
        );
        el
    }

    /// `<a class="lightbox" href>`
    pub fn anchor(&mut self, href: &str) -> MockElement {
        let el = self.element("a", &["lightbox"]);
        self.set_attribute(el, "href", href);
        el
    }

    /// `<button class="lightbox" data-target>`
    pub fn button(&mut self, target: &str) -> MockElement {
        let el = self.element("button", &["lightbox"]);
        self.set_attribute(el, "data-target", target);
        el
    }

    pub fn set_attribute(&mut self, el: MockElement, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(&el) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    pub fn attribute(&self, el: MockElement, name: &str) -> Option<&str> {
        self.nodes.get(&el)?.attributes.get(name).map(String::as_str)
    }

    pub fn set_parent(&mut self, child: MockElement, parent: MockElement) {
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
    }

    pub fn set_inner_html(&mut self, el: MockElement, html: &str) {
        if let Some(node) = self.nodes.get_mut(&el) {
            node.inner_html = html.to_string();
        }
    }

    /// Give a trigger an `<img>` thumbnail at `rect`.
    pub fn set_thumbnail(&mut self, el: MockElement, alt: &str, rect: Rect) {
        if let Some(node) = self.nodes.get_mut(&el) {
            node.thumbnail = Some((alt.to_string(), rect));
        }
    }

    pub fn set_natural_size(&mut self, src: &str, size: Size) {
        self.natural_sizes.insert(src.to_string(), size);
    }

    /// Loads of `src` fail.
    pub fn break_image(&mut self, src: &str) {
        self.broken.insert(src.to_string());
    }

    /// Simulate the user focusing something on the page.
    pub fn focus_page_element(&mut self, el: MockElement) {
        self.focused = Some(el);
    }

    fn is_descendant(&self, el: MockElement, ancestor: MockElement) -> bool {
        let mut current = self.nodes.get(&el).and_then(|node| node.parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.nodes.get(&parent).and_then(|node| node.parent);
        }
        false
    }

    // Inspection

    pub fn control(&self, control: Control) -> MockElement {
        match control {
            Control::Previous => self.previous_button,
            Control::Next => self.next_button,
            Control::Close => self.close_button,
        }
    }

    pub fn counter(&self) -> Option<&str> {
        self.controls.as_ref().map(|c| c.counter.as_str())
    }

    pub fn active_slides(&self) -> Vec<usize> {
        self.slides
            .values()
            .filter(|slide| slide.active)
            .map(|slide| slide.index)
            .collect()
    }

    pub fn slide_at(&self, index: usize) -> Option<(SlideId, &SlideRecord)> {
        self.slides
            .iter()
            .find(|(_, slide)| slide.index == index)
            .map(|(id, slide)| (*id, slide))
    }

    pub fn slider_x(&self) -> Option<f64> {
        self.slider.as_ref().map(|slider| slider.x)
    }

    pub fn event_kinds(&self) -> Vec<EventKind> {
        self.events.iter().map(|event| event.kind).collect()
    }

    pub fn pending_load_count(&self) -> usize {
        self.pending_loads.len()
    }

    pub fn has_pending_frame(&self) -> bool {
        self.frame_pending
    }

    // Completions

    fn outcome_for(&self, src: &str) -> LoadOutcome {
        if self.broken.contains(src) {
            LoadOutcome::Failed
        } else {
            LoadOutcome::Loaded {
                natural: self
                    .natural_sizes
                    .get(src)
                    .copied()
                    .unwrap_or(DEFAULT_NATURAL),
            }
        }
    }

    /// Finish the in-flight load of `slide`, if any.
    pub fn resolve_load(&mut self, slide: SlideId) -> Option<HostSignal> {
        let position = self
            .pending_loads
            .iter()
            .position(|(ticket, _)| ticket.slide == slide)?;
        let (ticket, src) = self.pending_loads.remove(position);
        Some(HostSignal::ImageReady {
            ticket,
            outcome: self.outcome_for(&src),
        })
    }

    /// Every queued completion: loads, then the close animation, then a frame.
    pub fn drain_signals(&mut self) -> Vec<HostSignal> {
        let mut signals: Vec<HostSignal> = std::mem::take(&mut self.pending_loads)
            .into_iter()
            .map(|(ticket, src)| HostSignal::ImageReady {
                ticket,
                outcome: self.outcome_for(&src),
            })
            .collect();
        if std::mem::take(&mut self.close_pending) {
            signals.push(HostSignal::CloseFinished);
        }
        if std::mem::take(&mut self.frame_pending) {
            signals.push(HostSignal::AnimationFrame);
        }
        signals
    }
}

/// Feed queued completions back into the lightbox until nothing is left.
pub fn settle(lightbox: &mut Lightbox<MockHost>) {
    for _ in 0..32 {
        let signals = lightbox.host_mut().drain_signals();
        if signals.is_empty() {
            return;
        }
        for signal in signals {
            lightbox.handle_signal(signal);
        }
    }
}

impl Host for MockHost {
    type Element = MockElement;

    fn query_all(&self, selector: &str) -> Vec<MockElement> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.matches(selector))
            .map(|(el, _)| *el)
            .collect()
    }

    fn query_within(&self, scope: &MockElement, selector: &str) -> Vec<MockElement> {
        self.query_all(selector)
            .into_iter()
            .filter(|el| self.is_descendant(*el, *scope))
            .collect()
    }

    fn describe(&self, el: &MockElement, captions: &CaptionSource<'_>) -> TriggerDescriptor {
        let Some(node) = self.nodes.get(el) else {
            return TriggerDescriptor::default();
        };
        let attr = |name: &str| node.attributes.get(name).cloned();
        let kind = match node.tag.as_str() {
            "a" => TriggerKind::Anchor,
            "button" => TriggerKind::Button,
            _ => TriggerKind::Other,
        };
        let caption = if !captions.enabled {
            None
        } else {
            match captions.selector {
                None => attr(captions.attribute),
                Some(selector) => self
                    .query_within(el, selector)
                    .first()
                    .and_then(|child| self.nodes.get(child))
                    .map(|child| {
                        child
                            .attributes
                            .get(captions.attribute)
                            .cloned()
                            .unwrap_or_else(|| child.inner_html.clone())
                    }),
            }
        };
        TriggerDescriptor {
            kind: Some(kind),
            href: attr("href"),
            target: attr("data-target"),
            alt: attr("data-alt"),
            thumbnail_alt: node.thumbnail.as_ref().map(|(alt, _)| alt.clone()),
            has_thumbnail: node.thumbnail.is_some(),
            caption,
            srcset: attr("data-srcset"),
            sizes: attr("data-sizes"),
        }
    }

    fn group_attribute(&self, el: &MockElement) -> Option<String> {
        self.attribute(*el, "data-group").map(str::to_string)
    }

    fn set_group_attribute(&mut self, el: &MockElement, group: &str) {
        self.set_attribute(*el, "data-group", group);
    }

    fn decorate_trigger(&mut self, el: &MockElement, zoom_icon: Option<&str>) {
        self.decorated.insert(*el, zoom_icon.is_some());
    }

    fn undecorate_trigger(&mut self, el: &MockElement) {
        self.decorated.remove(el);
    }

    fn thumbnail_rect(&self, el: &MockElement) -> Option<Rect> {
        self.nodes.get(el)?.thumbnail.as_ref().map(|(_, rect)| *rect)
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn supports_view_transitions(&self) -> bool {
        self.view_transitions
    }

    fn is_touch_device(&self) -> bool {
        self.touch_device
    }

    fn scrollbar_width(&self) -> f64 {
        self.scrollbar
    }

    fn container_width(&self) -> f64 {
        self.viewport.width
    }

    fn build_shell(&mut self, _shell: &ShellSpec<'_>) {
        self.shell_built = true;
        self.shells_built += 1;
    }

    fn remove_shell(&mut self) {
        self.shell_built = false;
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    fn set_controls(&mut self, controls: &ControlsState) {
        self.controls = Some(controls.clone());
    }

    fn set_overlay_opacity(&mut self, opacity: Option<f64>) {
        self.overlay_opacity = opacity;
    }

    fn set_vertical_closing(&mut self, closing: bool) {
        self.vertical_closing = closing;
    }

    fn create_slider(&mut self, draggable: bool) {
        self.slider = Some(SliderRecord {
            draggable,
            ..Default::default()
        });
    }

    fn remove_slider(&mut self) {
        self.slider = None;
    }

    fn set_slider_dragging(&mut self, dragging: bool) {
        if let Some(slider) = self.slider.as_mut() {
            slider.dragging = dragging;
        }
    }

    fn set_slider_transform(&mut self, x: f64, y: f64, animate: bool) {
        if let Some(slider) = self.slider.as_mut() {
            slider.x = x;
            slider.y = y;
            slider.animated = animate;
        }
    }

    fn create_slide(&mut self, slide: SlideId, index: usize, total: usize) {
        self.slides.insert(slide, SlideRecord::new(index, total));
    }

    fn position_slide(&mut self, slide: SlideId, index: usize, total: usize) {
        if let Some(record) = self.slides.get_mut(&slide) {
            record.index = index;
            record.total = total;
        }
    }

    fn remove_slide(&mut self, slide: SlideId) {
        self.slides.remove(&slide);
        self.removed_slides.push(slide);
    }

    fn set_slide_active(&mut self, slide: SlideId, active: bool) {
        if let Some(record) = self.slides.get_mut(&slide) {
            record.active = active;
        }
    }

    fn load_image(&mut self, slide: SlideId, request: &ImageRequest, ticket: LoadTicket) {
        if let Some(record) = self.slides.get_mut(&slide) {
            record.request = Some(request.clone());
        }
        self.pending_loads.push((ticket, request.src.clone()));
    }

    fn show_image(&mut self, slide: SlideId, natural: Size) {
        if let Some(record) = self.slides.get_mut(&slide) {
            record.content = Some(Content::Image { natural });
        }
    }

    fn show_error(&mut self, slide: SlideId, message: &str) {
        if let Some(record) = self.slides.get_mut(&slide) {
            record.content = Some(Content::Error);
            record.error_message = Some(message.to_string());
        }
    }

    fn slide_metrics(&self, slide: SlideId) -> Option<SlideMetrics> {
        self.slides.get(&slide)?;
        let p = self.slide_padding;
        Some(SlideMetrics {
            size: self.viewport,
            padding: Insets {
                top: p,
                right: p,
                bottom: p,
                left: p,
            },
            caption_height: self.caption_height,
        })
    }

    fn size_image(&mut self, slide: SlideId, fit: ImageFit) {
        if let Some(record) = self.slides.get_mut(&slide) {
            record.fit = Some(fit);
        }
    }

    fn image_rect(&self, slide: SlideId) -> Option<Rect> {
        let record = self.slides.get(&slide)?;
        let size = match (record.fit, record.content) {
            (Some(ImageFit::Scaled(size)), _) => size,
            (_, Some(Content::Image { natural })) => natural,
            _ => return None,
        };
        Some(Rect::new(
            (self.viewport.width - size.width) / 2.0,
            (self.viewport.height - size.height) / 2.0,
            size.width,
            size.height,
        ))
    }

    fn animate_open(&mut self, slide: SlideId, animation: &OpenAnimation) {
        if let Some(record) = self.slides.get_mut(&slide) {
            record.open_animation = Some(animation.clone());
        }
    }

    fn set_image_zoom(&mut self, slide: SlideId, zoom: &ZoomState) {
        if let Some(record) = self.slides.get_mut(&slide) {
            record.zoom = *zoom;
        }
    }

    fn begin_close(&mut self, animation: &CloseAnimation) {
        self.close_animation = Some(animation.clone());
        self.close_pending = true;
    }

    fn hide_background(&mut self) {
        self.background_hidden = true;
    }

    fn restore_background(&mut self) {
        self.background_hidden = false;
    }

    fn lock_scroll(&mut self, scrollbar_width: f64) {
        self.scroll_lock = Some(scrollbar_width);
    }

    fn unlock_scroll(&mut self) {
        self.scroll_lock = None;
    }

    fn push_history(&mut self) {
        self.history_depth += 1;
    }

    fn history_back(&mut self) {
        self.history_depth = self.history_depth.saturating_sub(1);
    }

    fn request_animation_frame(&mut self) {
        self.frames_requested += 1;
        self.frame_pending = true;
    }

    fn active_element(&self) -> Option<MockElement> {
        self.focused
    }

    fn focusable_elements(&self) -> Vec<MockElement> {
        if !self.shell_built {
            return Vec::new();
        }
        let controls = self.controls.clone().unwrap_or_else(|| ControlsState::for_position(0, 1));
        let mut focusable = Vec::new();
        if !controls.previous.disabled {
            focusable.push(self.previous_button);
        }
        if !controls.next.disabled {
            focusable.push(self.next_button);
        }
        focusable.push(self.close_button);
        focusable
    }

    fn control_element(&self, control: Control) -> Option<MockElement> {
        Some(self.control(control))
    }

    fn focus(&mut self, el: &MockElement) {
        self.focused = Some(*el);
    }

    fn dispatch_event(&mut self, event: &LightboxEvent<MockElement>) -> bool {
        self.events.push(EventRecord {
            kind: event.kind,
            index: event.index,
            source: event.source,
        });
        self.prevented.contains(&event.kind)
    }
}
