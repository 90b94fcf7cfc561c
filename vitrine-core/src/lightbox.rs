//! The lightbox: registry, navigation controller and lifecycle in one state
//! machine.
//!
//! ```text
//! Closed --open--> Opening --image ready--> Open
//!                     |                      |
//!                     +--------close---------+--> Closing --CloseFinished--> Closed
//! ```
//!
//! Every public operation runs to completion synchronously against the host.
//! Image loads, the close animation and relayout frames come back later through
//! [`Lightbox::handle_signal`].

use crate::config::Options;
use crate::error::{ConfigError, LightboxError};
use crate::events::{EventBus, EventKind, LightboxEvent, ListenerId};
use crate::focus::trap_tab;
use crate::gesture::{
    GestureContext, GestureInterpreter, GestureOutcome, GestureTuning, GestureUpdate,
    PointerInput, PointerKind, ZoomState,
};
use crate::host::{CloseAnimation, CloseStyle, Host, HostSignal, OpenAnimation, ShellSpec};
use crate::layout::{fit_image, slide_offset, thumbnail_transform, Size};
use crate::load::{Content, LoadOutcome, LoadTicket, SlideId};
use crate::navigation::{focus_after_move, preload_target, Control, ControlsState, Direction};
use crate::registry::{GroupKey, Registry};
use crate::trigger::CaptionSource;
use regex::Regex;
use tracing::{debug, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Closed,
    /// Modal shown, waiting for the first image
    Opening,
    Open,
    /// Close animation running
    Closing,
}

impl Phase {
    /// `Opening` and `Open` both count as open.
    pub fn is_open(self) -> bool {
        matches!(self, Phase::Opening | Phase::Open)
    }
}

/// Keys the lightbox reacts to while open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Tab,
    Escape,
    ArrowLeft,
    ArrowRight,
    Other,
}

impl Key {
    /// Map a `KeyboardEvent.key` value.
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "Tab" => Key::Tab,
            "Escape" | "Esc" => Key::Escape,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            _ => Key::Other,
        }
    }
}

pub struct Lightbox<H: Host> {
    host: H,
    options: Options,
    file_types: Regex,
    registry: Registry<H::Element>,
    events: EventBus<H::Element>,
    gesture: GestureInterpreter,
    phase: Phase,
    active_group: Option<GroupKey>,
    current_index: usize,
    shell_built: bool,
    last_focus: Option<H::Element>,
    /// Trigger of the slide shown when closing began
    closing_trigger: Option<H::Element>,
    history_pushed: bool,
    relayout_pending: bool,
    reduced_motion: bool,
}

impl<H: Host> Lightbox<H> {
    pub fn new(host: H, options: Options) -> Result<Self, ConfigError> {
        options.validate()?;
        let file_types = options.file_type_pattern()?;
        let gesture = GestureInterpreter::new(GestureTuning::from(&options));
        Ok(Self {
            host,
            options,
            file_types,
            registry: Registry::new(),
            events: EventBus::new(),
            gesture,
            phase: Phase::Closed,
            active_group: None,
            current_index: 0,
            shell_built: false,
            last_focus: None,
            closing_trigger: None,
            history_pushed: false,
            relayout_pending: false,
            reduced_motion: false,
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn registry(&self) -> &Registry<H::Element> {
        &self.registry
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase.is_open()
    }

    pub fn active_group(&self) -> Option<&GroupKey> {
        self.active_group.as_ref()
    }

    /// Index of the displayed slide, while open.
    pub fn current_index(&self) -> Option<usize> {
        self.is_open().then_some(self.current_index)
    }

    pub fn on(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&mut LightboxEvent<H::Element>) + 'static,
    ) -> ListenerId {
        self.events.on(kind, handler)
    }

    pub fn off(&mut self, kind: EventKind, id: ListenerId) -> bool {
        self.events.off(kind, id)
    }

    // Registry

    /// Register every trigger on the page. Triggers that do not qualify are
    /// skipped with a warning. Returns how many were added.
    pub fn init(&mut self) -> usize {
        self.ensure_shell();
        let selector = self.options.selector.clone();
        let mut added = 0;

        if let Some(gallery_selector) = self.options.gallery_selector.clone() {
            let galleries = self.host.query_all(&gallery_selector);
            for (i, gallery) in galleries.iter().enumerate() {
                let key = format!("vitrine-gallery-{i}");
                for el in self.host.query_within(gallery, &selector) {
                    if self.registry.contains(&el) {
                        continue;
                    }
                    if self.explicit_group(&el).is_none() {
                        self.host.set_group_attribute(&el, &key);
                    }
                    added += usize::from(self.try_add(el));
                }
            }
        }

        for el in self.host.query_all(&selector) {
            if !self.registry.contains(&el) {
                added += usize::from(self.try_add(el));
            }
        }

        debug!("Lightbox initialised with {} new triggers", added);
        added
    }

    fn try_add(&mut self, el: H::Element) -> bool {
        match self.add(el) {
            Ok(()) => true,
            Err(e) => {
                warn!("Skipping lightbox trigger: {}", e);
                false
            }
        }
    }

    pub fn add(&mut self, el: H::Element) -> Result<(), LightboxError> {
        self.ensure_shell();
        let descriptor = self.host.describe(&el, &self.caption_source());
        descriptor.validate(&self.file_types)?;

        let key = self.group_of(&el);
        let index = self.registry.insert(key.clone(), el.clone())?;
        let zoom_icon = descriptor
            .has_thumbnail
            .then_some(self.options.icons.zoom_indicator.as_str());
        self.host.decorate_trigger(&el, zoom_icon);
        debug!("Added trigger {} to group {}", index, key);

        if self.is_open() && self.active_group.as_ref() == Some(&key) {
            self.ensure_slide(&key, index);
            self.relabel_slides(&key);
            self.refresh_controls();
        }
        Ok(())
    }

    /// Unregister a trigger. Returns `false` when it was not registered.
    pub fn remove(&mut self, el: &H::Element) -> bool {
        let Some(key) = self.explicit_group(el) else {
            return false;
        };
        let Some(removed) = self.registry.remove(&key, el) else {
            return false;
        };
        self.host.undecorate_trigger(el);
        if let Some(slide) = removed.slide {
            self.host.remove_slide(slide);
        }
        debug!("Removed trigger {} from group {}", removed.index, key);

        if !self.is_open() || self.active_group.as_ref() != Some(&key) {
            return true;
        }

        let len = self.group_len(&key);
        if len == 0 {
            self.close();
            return true;
        }

        self.relabel_slides(&key);
        if removed.index < self.current_index {
            self.current_index -= 1;
            self.apply_offset(false);
            self.refresh_controls();
        } else if removed.index == self.current_index {
            self.gesture.reset();
            let target = self.current_index.min(len - 1);
            self.move_to(&key, None, target);
        } else {
            self.refresh_controls();
        }
        true
    }

    /// Close without animation, unregister everything and remove the modal.
    pub fn destroy(&mut self) {
        if self.phase.is_open() {
            self.host.restore_background();
            self.closing_trigger = self.current_trigger();
            self.phase = Phase::Closing;
        }
        if self.phase == Phase::Closing {
            self.finish_close();
        }

        for el in self.registry.all_triggers() {
            self.host.undecorate_trigger(&el);
        }
        self.registry.clear();
        if self.shell_built {
            self.host.remove_shell();
            self.shell_built = false;
        }
        debug!("Lightbox destroyed");
        self.emit(EventKind::Destroy, None);
    }

    // Navigation

    /// Open the modal on `el`. Does nothing unless closed and `el` is registered.
    pub fn open(&mut self, el: &H::Element) -> bool {
        if self.phase != Phase::Closed || !self.shell_built {
            return false;
        }
        let Some((key, index)) = self.registry.locate(el) else {
            warn!("Ignoring open request for an unregistered trigger");
            return false;
        };

        self.reduced_motion = self.host.prefers_reduced_motion();
        self.set_phase(Phase::Opening);
        self.active_group = Some(key.clone());
        self.current_index = index;
        self.last_focus = self.host.active_element();

        self.host.push_history();
        self.history_pushed = true;
        self.host.hide_background();
        if self.options.hide_scrollbar {
            let width = self.host.scrollbar_width();
            self.host.lock_scroll(width);
        }

        let len = self.group_len(&key);
        let draggable = self.is_draggable(len);
        self.host.create_slider(draggable);
        self.host.set_overlay_opacity(None);
        self.host.set_vertical_closing(false);

        self.ensure_slide(&key, index);
        if let Some(slide) = self.current_slide() {
            self.host.set_slide_active(slide, true);
        }
        self.apply_offset(false);
        self.refresh_controls();
        if let Some(first) = self.host.focusable_elements().first().cloned() {
            self.host.focus(&first);
        }
        debug!("Opening group {} at slide {}", key, index);

        if self.current_content().is_some() {
            self.complete_open();
        }
        true
    }

    /// Start closing. A no-op unless opening or open.
    pub fn close(&mut self) {
        if !self.phase.is_open() {
            return;
        }
        self.set_phase(Phase::Closing);
        self.closing_trigger = self.current_trigger();

        let slide = self.current_slide();
        if let Some(slide) = slide {
            if self.gesture.is_zoomed() {
                self.host.set_image_zoom(slide, &ZoomState::identity());
            }
        }
        self.gesture.reset();
        self.host.set_slider_dragging(false);
        self.host.restore_background();

        let animation = CloseAnimation {
            slide,
            style: self.close_style(slide),
            duration: self.options.transition_duration(self.reduced_motion),
            timing_function: self.options.transition_timing_function.clone(),
        };
        debug!("Closing lightbox with {:?}", animation.style);
        self.host.begin_close(&animation);
        self.emit(EventKind::Close, Some(self.current_index));
    }

    fn close_style(&self, slide: Option<SlideId>) -> CloseStyle {
        if self.reduced_motion {
            return CloseStyle::Fade;
        }
        if self.host.supports_view_transitions() {
            return CloseStyle::ViewTransition;
        }
        let is_image = matches!(self.current_content(), Some(Content::Image { .. }));
        let transform = slide.filter(|_| is_image).and_then(|slide| {
            let thumbnail = self.host.thumbnail_rect(&self.current_trigger()?)?;
            thumbnail_transform(thumbnail, self.host.image_rect(slide)?)
        });
        transform.map_or(CloseStyle::Fade, CloseStyle::ToThumbnail)
    }

    /// Tear down per-open state once the close animation ended.
    fn finish_close(&mut self) {
        if self.phase != Phase::Closing {
            return;
        }
        let closing_trigger = self.closing_trigger.take();
        let back_focus = closing_trigger
            .filter(|el| self.options.back_focus && self.registry.contains(el));
        let focus_target = back_focus.or_else(|| self.last_focus.take());

        if let Some(key) = self.active_group.take() {
            if let Some(group) = self.registry.group_mut(&key) {
                for slide in group.clear_materialised() {
                    self.host.remove_slide(slide);
                }
            }
        }
        self.host.remove_slider();
        self.host.set_overlay_opacity(None);
        self.host.set_vertical_closing(false);
        if self.options.hide_scrollbar {
            self.host.unlock_scroll();
        }
        if let Some(el) = focus_target {
            self.host.focus(&el);
        }
        if std::mem::take(&mut self.history_pushed) {
            self.host.history_back();
        }
        self.last_focus = None;
        self.relayout_pending = false;
        self.set_phase(Phase::Closed);
        debug!("Lightbox closed");
    }

    pub fn select(&mut self, index: usize) -> Result<(), LightboxError> {
        let key = self.open_group()?;
        let len = self.group_len(&key);
        if index == self.current_index {
            return Err(LightboxError::AlreadySelected { index });
        }
        if index >= len {
            return Err(LightboxError::OutOfRange {
                index: index as i64,
                len,
            });
        }
        let from = self.current_index;
        self.move_to(&key, Some(from), index);
        Ok(())
    }

    /// `select` for untyped callers: rejects non-finite, fractional and
    /// negative values.
    pub fn select_value(&mut self, value: f64) -> Result<(), LightboxError> {
        let key = self.open_group()?;
        if !value.is_finite() || value.fract() != 0.0 {
            return Err(LightboxError::InvalidIndex { value });
        }
        if value < 0.0 {
            return Err(LightboxError::OutOfRange {
                index: value as i64,
                len: self.group_len(&key),
            });
        }
        self.select(value as usize)
    }

    /// Go back one slide; a no-op on the first.
    pub fn previous(&mut self) -> Result<(), LightboxError> {
        self.open_group()?;
        match self.current_index.checked_sub(1) {
            Some(index) => self.select(index),
            None => Ok(()),
        }
    }

    /// Go forward one slide; a no-op on the last.
    pub fn next(&mut self) -> Result<(), LightboxError> {
        let key = self.open_group()?;
        let index = self.current_index + 1;
        if index >= self.group_len(&key) {
            return Ok(());
        }
        self.select(index)
    }

    fn open_group(&self) -> Result<GroupKey, LightboxError> {
        match (&self.active_group, self.phase.is_open()) {
            (Some(key), true) => Ok(key.clone()),
            _ => Err(LightboxError::NotOpen),
        }
    }

    /// Display slide `to`: leave the old slide, make sure the new one exists,
    /// move the slider, refresh controls and focus, preload, then announce.
    fn move_to(&mut self, key: &GroupKey, from: Option<usize>, to: usize) {
        if let Some(from) = from {
            self.leave_slide(key, from);
        }

        self.current_index = to;
        self.ensure_slide(key, to);
        if let Some(slide) = self.current_slide() {
            self.host.set_slide_active(slide, true);
        }

        self.apply_offset(true);

        let len = self.group_len(key);
        self.refresh_controls();
        let direction = from.map(|from| Direction::between(from, to));
        self.focus_control(focus_after_move(to, len, direction));

        let neighbour = preload_target(to, len, direction.unwrap_or(Direction::Forward));
        if let Some(neighbour) = neighbour {
            self.ensure_slide(key, neighbour);
        }

        debug!("Selected slide {} of {}", to, len);
        self.emit(EventKind::Select, Some(to));

        if self.phase == Phase::Opening && self.current_content().is_some() {
            self.complete_open();
        }
    }

    fn leave_slide(&mut self, key: &GroupKey, index: usize) {
        let slide = self.registry.group(key).and_then(|group| group.slide(index));
        if let Some(slide) = slide {
            self.host.set_slide_active(slide, false);
            if self.gesture.is_zoomed() {
                self.host.set_image_zoom(slide, &ZoomState::identity());
            }
        }
        self.gesture.reset();
    }

    // Slides and content

    fn ensure_slide(&mut self, key: &GroupKey, index: usize) {
        let Some(group) = self.registry.group(key) else {
            return;
        };
        let total = group.len();
        if index >= total {
            return;
        }
        let slide = match group.slide(index) {
            Some(slide) => slide,
            None => {
                let slide = self.registry.allocate_slide();
                self.host.create_slide(slide, index, total);
                if let Some(group) = self.registry.group_mut(key) {
                    group.insert_slide(index, slide);
                }
                slide
            }
        };
        self.request_content(key, index, slide);
    }

    fn request_content(&mut self, key: &GroupKey, index: usize, slide: SlideId) {
        let Some(group) = self.registry.group(key) else {
            return;
        };
        if group.content(index).is_some() || group.is_pending(index) {
            return;
        }
        let Some(trigger) = group.trigger(index).cloned() else {
            return;
        };

        let descriptor = self.host.describe(&trigger, &self.caption_source());
        match descriptor.image_request(&self.file_types) {
            Ok(request) => {
                let ticket = LoadTicket { slide };
                if let Some(group) = self.registry.group_mut(key) {
                    group.begin_load(index, ticket);
                }
                self.host.load_image(slide, &request, ticket);
            }
            Err(e) => {
                warn!("Trigger {} in group {} no longer qualifies: {}", index, key, e);
                if let Some(group) = self.registry.group_mut(key) {
                    group.store_content(index, Content::Error);
                }
                self.host
                    .show_error(slide, &self.options.l10n.lightbox_loading_error);
            }
        }
    }

    fn on_image_ready(&mut self, ticket: LoadTicket, outcome: LoadOutcome) {
        let Some(key) = self.active_group.clone() else {
            debug!("Dropping image result for slide {} after close", ticket.slide);
            return;
        };
        let content = Content::from(outcome);
        let index = self
            .registry
            .group_mut(&key)
            .and_then(|group| group.finish_load(ticket, content));
        let Some(index) = index else {
            debug!("Dropping stale image result for slide {}", ticket.slide);
            return;
        };

        match content {
            Content::Image { natural } => {
                self.host.show_image(ticket.slide, natural);
                self.fit_slide(ticket.slide, natural);
            }
            Content::Error => {
                warn!("Image for slide {} in group {} failed to load", index, key);
                self.host
                    .show_error(ticket.slide, &self.options.l10n.lightbox_loading_error);
            }
        }

        if self.phase == Phase::Opening && index == self.current_index {
            self.complete_open();
        }
    }

    /// First image is ready: play the open animation, preload around it and announce.
    fn complete_open(&mut self) {
        self.set_phase(Phase::Open);
        let index = self.current_index;

        if let Some(slide) = self.current_slide() {
            let duration = self.options.transition_duration(self.reduced_motion);
            let is_image = matches!(self.current_content(), Some(Content::Image { .. }));
            let transform = if is_image && !self.reduced_motion {
                self.current_trigger()
                    .and_then(|trigger| self.host.thumbnail_rect(&trigger))
                    .zip(self.host.image_rect(slide))
                    .and_then(|(thumbnail, image)| thumbnail_transform(thumbnail, image))
            } else {
                None
            };
            let animation = match transform {
                Some(transform) => OpenAnimation::FromThumbnail {
                    transform,
                    duration,
                    timing_function: self.options.transition_timing_function.clone(),
                },
                None => OpenAnimation::Reveal { duration },
            };
            self.host.animate_open(slide, &animation);
        }

        if let Some(key) = self.active_group.clone() {
            if let Some(before) = index.checked_sub(1) {
                self.ensure_slide(&key, before);
            }
            self.ensure_slide(&key, index + 1);
        }

        debug!("Lightbox open at slide {}", index);
        self.emit(EventKind::Open, Some(index));
    }

    fn fit_slide(&mut self, slide: SlideId, natural: Size) {
        if let Some(metrics) = self.host.slide_metrics(slide) {
            self.host.size_image(slide, fit_image(natural, &metrics));
        }
    }

    fn relabel_slides(&mut self, key: &GroupKey) {
        if let Some(group) = self.registry.group(key) {
            let total = group.len();
            for (index, slide) in group.slides() {
                self.host.position_slide(slide, index, total);
            }
        }
    }

    // Host signals and page events

    pub fn handle_signal(&mut self, signal: HostSignal) {
        match signal {
            HostSignal::ImageReady { ticket, outcome } => self.on_image_ready(ticket, outcome),
            HostSignal::CloseFinished => self.finish_close(),
            HostSignal::AnimationFrame => self.on_animation_frame(),
        }
    }

    /// Returns `true` when the key was handled and its default should be prevented.
    pub fn handle_key(&mut self, key: Key, shift: bool) -> bool {
        if !self.is_open() {
            return false;
        }
        match key {
            Key::Tab => {
                let focusables = self.host.focusable_elements();
                let active = self.host.active_element();
                match trap_tab(&focusables, active.as_ref(), shift) {
                    Some(target) => {
                        let target = target.clone();
                        self.host.focus(&target);
                        true
                    }
                    None => false,
                }
            }
            Key::Escape => {
                self.close();
                true
            }
            Key::ArrowLeft => {
                let _ = self.previous();
                true
            }
            Key::ArrowRight => {
                let _ = self.next();
                true
            }
            Key::Other => false,
        }
    }

    /// Browser back while open. The history entry is already gone.
    pub fn handle_popstate(&mut self) {
        if self.phase == Phase::Closed {
            return;
        }
        self.history_pushed = false;
        self.close();
    }

    pub fn handle_wheel(&mut self) {
        if self.options.scroll_close {
            self.close();
        }
    }

    /// Click on a slide outside its image.
    pub fn handle_backdrop_click(&mut self) {
        let ended_drag = self.gesture.take_moved();
        if self.phase == Phase::Open && self.options.doc_close && !ended_drag {
            self.close();
        }
    }

    /// Schedule a relayout on the next frame; repeated requests coalesce.
    pub fn request_relayout(&mut self) {
        if !self.is_open() || self.relayout_pending {
            return;
        }
        self.relayout_pending = true;
        self.host.request_animation_frame();
    }

    fn on_animation_frame(&mut self) {
        if !std::mem::take(&mut self.relayout_pending) || !self.is_open() {
            return;
        }
        let Some(key) = self.active_group.clone() else {
            return;
        };
        let loaded: Vec<(SlideId, Size)> = match self.registry.group(&key) {
            Some(group) => group
                .slides()
                .filter_map(|(index, slide)| match group.content(index) {
                    Some(Content::Image { natural }) => Some((slide, natural)),
                    _ => None,
                })
                .collect(),
            None => Vec::new(),
        };
        for (slide, natural) in loaded {
            self.fit_slide(slide, natural);
        }
        self.apply_offset(false);
    }

    // Gestures

    /// Returns `true` when the binding should capture the pointer.
    pub fn pointer_down(&mut self, input: PointerInput) -> bool {
        if self.phase != Phase::Open {
            return false;
        }
        if input.kind == PointerKind::Mouse && !self.options.simulate_touch {
            return false;
        }
        let update = self.gesture.pointer_down(input, 1.0);
        self.apply_gesture_update(update);
        true
    }

    pub fn pointer_move(&mut self, input: PointerInput) {
        if self.phase != Phase::Open {
            return;
        }
        let ctx = self.gesture_context();
        let update = self.gesture.pointer_move(input, &ctx);
        self.apply_gesture_update(update);
    }

    fn apply_gesture_update(&mut self, update: GestureUpdate) {
        match update {
            GestureUpdate::None => {}
            GestureUpdate::SnapBack => {
                self.host.set_slider_dragging(false);
                self.clear_drag_visuals();
                self.apply_offset(true);
            }
            GestureUpdate::Slide { x } => {
                self.host.set_slider_dragging(true);
                self.host.set_slider_transform(x, 0.0, false);
            }
            GestureUpdate::Dismiss {
                x,
                y,
                overlay_opacity,
            } => {
                self.host.set_slider_dragging(true);
                self.host.set_vertical_closing(true);
                self.host.set_slider_transform(x, y, false);
                if overlay_opacity.is_some() {
                    self.host.set_overlay_opacity(overlay_opacity);
                }
            }
            GestureUpdate::Zoom(zoom) => {
                if let Some(slide) = self.current_slide() {
                    self.host.set_image_zoom(slide, &zoom);
                }
            }
        }
    }

    pub fn pointer_up(&mut self, input: PointerInput) {
        if self.phase != Phase::Open {
            self.gesture.cancel();
            return;
        }
        let ctx = self.gesture_context();
        let outcome = self.gesture.pointer_up(input, &ctx);
        if !self.gesture.is_active() {
            self.host.set_slider_dragging(false);
        }
        self.apply_gesture_outcome(outcome);
    }

    pub fn pointer_cancel(&mut self) {
        let outcome = self.gesture.cancel();
        self.host.set_slider_dragging(false);
        if self.phase == Phase::Open {
            self.apply_gesture_outcome(outcome);
        }
    }

    fn apply_gesture_outcome(&mut self, outcome: GestureOutcome) {
        match outcome {
            GestureOutcome::None | GestureOutcome::Zoomed => {}
            GestureOutcome::Previous => {
                self.clear_drag_visuals();
                let _ = self.previous();
            }
            GestureOutcome::Next => {
                self.clear_drag_visuals();
                let _ = self.next();
            }
            GestureOutcome::SnapBack => {
                self.clear_drag_visuals();
                self.apply_offset(true);
            }
            GestureOutcome::Dismiss => self.close(),
            GestureOutcome::ResetZoom => {
                if let Some(slide) = self.current_slide() {
                    self.host.set_image_zoom(slide, &ZoomState::identity());
                }
            }
        }
    }

    fn clear_drag_visuals(&mut self) {
        self.host.set_vertical_closing(false);
        self.host.set_overlay_opacity(None);
    }

    fn gesture_context(&self) -> GestureContext {
        let slide_count = self
            .active_group
            .as_ref()
            .map_or(0, |key| self.group_len(key));
        GestureContext {
            slide_count,
            current_index: self.current_index,
            base_offset: slide_offset(self.current_index, self.host.container_width()),
            swipe_close: self.options.swipe_close,
            reduced_motion: self.reduced_motion,
        }
    }

    // Helpers

    fn ensure_shell(&mut self) {
        if self.shell_built {
            return;
        }
        let shell = ShellSpec {
            labels: &self.options.l10n,
            icons: &self.options.icons,
            transition_duration: self.options.transition_duration,
            transition_timing_function: &self.options.transition_timing_function,
        };
        self.host.build_shell(&shell);
        self.shell_built = true;
    }

    fn caption_source(&self) -> CaptionSource<'_> {
        CaptionSource {
            enabled: self.options.captions,
            selector: (!self.options.captions_from_self())
                .then_some(self.options.captions_selector.as_str()),
            attribute: &self.options.captions_attribute,
        }
    }

    fn explicit_group(&self, el: &H::Element) -> Option<GroupKey> {
        self.host
            .group_attribute(el)
            .filter(|group| !group.trim().is_empty())
            .map(GroupKey::from)
    }

    /// Group of a trigger, assigning the instance default on first use.
    fn group_of(&mut self, el: &H::Element) -> GroupKey {
        if let Some(key) = self.explicit_group(el) {
            return key;
        }
        let key = self.registry.default_key().clone();
        self.host.set_group_attribute(el, key.as_str());
        key
    }

    fn group_len(&self, key: &GroupKey) -> usize {
        self.registry.group(key).map_or(0, |group| group.len())
    }

    fn is_draggable(&self, len: usize) -> bool {
        let pointer_can_drag = self.options.simulate_touch || self.host.is_touch_device();
        pointer_can_drag && (len > 1 || self.options.swipe_close)
    }

    fn current_slide(&self) -> Option<SlideId> {
        let key = self.active_group.as_ref()?;
        self.registry.group(key)?.slide(self.current_index)
    }

    fn current_content(&self) -> Option<Content> {
        let key = self.active_group.as_ref()?;
        self.registry.group(key)?.content(self.current_index)
    }

    fn current_trigger(&self) -> Option<H::Element> {
        self.trigger_at(self.current_index)
    }

    fn trigger_at(&self, index: usize) -> Option<H::Element> {
        let key = self.active_group.as_ref()?;
        self.registry.group(key)?.trigger(index).cloned()
    }

    fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.host.set_phase(phase);
    }

    fn apply_offset(&mut self, animate: bool) {
        let x = slide_offset(self.current_index, self.host.container_width());
        self.host.set_slider_transform(x, 0.0, animate);
    }

    fn refresh_controls(&mut self) {
        if let Some(key) = self.active_group.clone() {
            let len = self.group_len(&key);
            let controls = ControlsState::for_position(self.current_index, len);
            self.host.set_controls(&controls);
        }
    }

    fn focus_control(&mut self, control: Control) {
        if let Some(el) = self.host.control_element(control) {
            self.host.focus(&el);
        }
    }

    fn emit(&mut self, kind: EventKind, index: Option<usize>) {
        let source = index.and_then(|index| self.trigger_at(index));
        let mut event = LightboxEvent::new(kind, source, index);
        self.events.emit(&mut event);
        let page_prevented = self.host.dispatch_event(&event);
        if event.default_prevented() || page_prevented {
            debug!("Listener prevented default of '{}' event", kind);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_key_name("Escape"), Key::Escape);
        assert_eq!(Key::from_key_name("Esc"), Key::Escape);
        assert_eq!(Key::from_key_name("ArrowRight"), Key::ArrowRight);
        assert_eq!(Key::from_key_name("Left"), Key::ArrowLeft);
        assert_eq!(Key::from_key_name("a"), Key::Other);
    }

    #[test]
    fn test_opening_counts_as_open() {
        assert!(Phase::Opening.is_open());
        assert!(Phase::Open.is_open());
        assert!(!Phase::Closing.is_open());
        assert!(!Phase::Closed.is_open());
    }
}
