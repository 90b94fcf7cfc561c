//! Host: the page the lightbox runs in.
//!
//! The engine never touches the DOM. Everything it needs from the page (reading
//! triggers, building the modal, moving the slider, loading images, focus and
//! history) goes through this trait. The browser binding implements it with
//! `web-sys`; tests use the recording `MockHost`.
//!
//! Methods are synchronous. Work that completes later (image decode, close
//! transitions, animation frames) is reported back by the binding as a
//! [`HostSignal`] passed to `Lightbox::handle_signal`.

use crate::config::Icons;
use crate::events::LightboxEvent;
use crate::gesture::ZoomState;
use crate::l10n::Labels;
use crate::layout::{ImageFit, Rect, SlideMetrics, Size, ThumbnailTransform};
use crate::lightbox::Phase;
use crate::load::{LoadOutcome, LoadTicket, SlideId};
use crate::navigation::{Control, ControlsState};
use crate::trigger::{CaptionSource, ImageRequest, TriggerDescriptor};
use std::fmt;

/// Asynchronous completions reported by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostSignal {
    ImageReady {
        ticket: LoadTicket,
        outcome: LoadOutcome,
    },
    /// The close animation ended (or its fallback timer fired)
    CloseFinished,
    /// A frame requested through `Host::request_animation_frame`
    AnimationFrame,
}

/// What the modal shell is built from.
#[derive(Clone, Copy, Debug)]
pub struct ShellSpec<'a> {
    pub labels: &'a Labels,
    pub icons: &'a Icons,
    /// Milliseconds
    pub transition_duration: f64,
    pub transition_timing_function: &'a str,
}

#[derive(Clone, Debug, PartialEq)]
pub enum OpenAnimation {
    /// Morph from the thumbnail's rect into place
    FromThumbnail {
        transform: ThumbnailTransform,
        duration: f64,
        timing_function: String,
    },
    /// Plain fade in
    Reveal { duration: f64 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CloseStyle {
    ToThumbnail(ThumbnailTransform),
    Fade,
    /// Let the platform's view transition animate the change
    ViewTransition,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CloseAnimation {
    /// Slide on screen when closing started
    pub slide: Option<SlideId>,
    pub style: CloseStyle,
    /// Milliseconds
    pub duration: f64,
    pub timing_function: String,
}

pub trait Host {
    type Element: Clone + PartialEq + fmt::Debug;

    // Page

    /// Elements matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Element>;

    /// Descendants of `scope` matching `selector`, in document order.
    fn query_within(&self, scope: &Self::Element, selector: &str) -> Vec<Self::Element>;

    fn describe(&self, el: &Self::Element, captions: &CaptionSource<'_>) -> TriggerDescriptor;

    /// `data-group` of a trigger.
    fn group_attribute(&self, el: &Self::Element) -> Option<String>;

    fn set_group_attribute(&mut self, el: &Self::Element, group: &str);

    /// Mark a registered trigger. `zoom_icon` is set when it wraps a thumbnail.
    fn decorate_trigger(&mut self, el: &Self::Element, zoom_icon: Option<&str>);

    fn undecorate_trigger(&mut self, el: &Self::Element);

    /// Screen rect of the thumbnail inside a trigger, if it has one.
    fn thumbnail_rect(&self, el: &Self::Element) -> Option<Rect>;

    // Environment

    fn prefers_reduced_motion(&self) -> bool;

    fn supports_view_transitions(&self) -> bool;

    fn is_touch_device(&self) -> bool;

    fn scrollbar_width(&self) -> f64;

    /// Width of one slide, which is also the slider's step.
    fn container_width(&self) -> f64;

    // Modal shell

    fn build_shell(&mut self, shell: &ShellSpec<'_>);

    fn remove_shell(&mut self);

    fn set_phase(&mut self, phase: Phase);

    fn set_controls(&mut self, controls: &ControlsState);

    /// `None` restores the stylesheet's opacity.
    fn set_overlay_opacity(&mut self, opacity: Option<f64>);

    fn set_vertical_closing(&mut self, closing: bool);

    // Slider

    fn create_slider(&mut self, draggable: bool);

    fn remove_slider(&mut self);

    fn set_slider_dragging(&mut self, dragging: bool);

    fn set_slider_transform(&mut self, x: f64, y: f64, animate: bool);

    // Slides

    fn create_slide(&mut self, slide: SlideId, index: usize, total: usize);

    /// Re-label a slide after the group changed size or order.
    fn position_slide(&mut self, slide: SlideId, index: usize, total: usize);

    fn remove_slide(&mut self, slide: SlideId);

    fn set_slide_active(&mut self, slide: SlideId, active: bool);

    /// Start loading; answer with `HostSignal::ImageReady` carrying `ticket`.
    fn load_image(&mut self, slide: SlideId, request: &ImageRequest, ticket: LoadTicket);

    /// Swap the loading indicator for the decoded image.
    fn show_image(&mut self, slide: SlideId, natural: Size);

    /// Swap the loading indicator for an error placeholder.
    fn show_error(&mut self, slide: SlideId, message: &str);

    fn slide_metrics(&self, slide: SlideId) -> Option<SlideMetrics>;

    fn size_image(&mut self, slide: SlideId, fit: ImageFit);

    fn image_rect(&self, slide: SlideId) -> Option<Rect>;

    fn animate_open(&mut self, slide: SlideId, animation: &OpenAnimation);

    fn set_image_zoom(&mut self, slide: SlideId, zoom: &ZoomState);

    /// Start closing; answer with `HostSignal::CloseFinished`.
    fn begin_close(&mut self, animation: &CloseAnimation);

    // Page state while open

    /// Hide everything outside the modal from assistive technology.
    fn hide_background(&mut self);

    fn restore_background(&mut self);

    fn lock_scroll(&mut self, scrollbar_width: f64);

    fn unlock_scroll(&mut self);

    fn push_history(&mut self);

    fn history_back(&mut self);

    /// Answer with `HostSignal::AnimationFrame`.
    fn request_animation_frame(&mut self);

    // Focus

    fn active_element(&self) -> Option<Self::Element>;

    /// Focusable descendants of the modal, in tab order.
    fn focusable_elements(&self) -> Vec<Self::Element>;

    fn control_element(&self, control: Control) -> Option<Self::Element>;

    fn focus(&mut self, el: &Self::Element);

    /// Mirror a lifecycle event to page listeners. Returns `true` when one of
    /// them prevented its default.
    fn dispatch_event(&mut self, event: &LightboxEvent<Self::Element>) -> bool;
}
