//! Lightbox options
//!
//! Callers pass a partial JSON object; every key they leave out falls back to
//! the default below, so `Options::from_json("{}")` equals `Options::default()`.

use crate::error::ConfigError;
use crate::l10n::Labels;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

const ZOOM_INDICATOR_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" aria-hidden="true" focusable="false"><path d="M8 3H5a2 2 0 00-2 2v3m18 0V5a2 2 0 00-2-2h-3m0 18h3a2 2 0 002-2v-3M3 16v3a2 2 0 002 2h3"/></svg>"#;
const PREVIOUS_BUTTON_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" aria-hidden="true" focusable="false"><path stroke="none" d="M0 0h24v24H0z"/><polyline points="15 6 9 12 15 18" /></svg>"#;
const NEXT_BUTTON_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" aria-hidden="true" focusable="false"><path stroke="none" d="M0 0h24v24H0z"/><polyline points="9 6 15 12 9 18" /></svg>"#;
const CLOSE_BUTTON_ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24" aria-hidden="true" focusable="false"><path d="M18 6L6 18M6 6l12 12"/></svg>"#;

/// Caption source meaning "read the attribute from the trigger itself".
pub const CAPTIONS_SELF: &str = "self";

/// Markup for the control icons. Rendered as inner HTML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Icons {
    pub zoom_indicator: String,
    pub previous: String,
    pub next: String,
    pub close: String,
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            zoom_indicator: ZOOM_INDICATOR_ICON.into(),
            previous: PREVIOUS_BUTTON_ICON.into(),
            next: NEXT_BUTTON_ICON.into(),
            close: CLOSE_BUTTON_ICON.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Options {
    /// Selector for trigger elements
    pub selector: String,
    /// Containers whose triggers form one group each
    pub gallery_selector: Option<String>,
    pub captions: bool,
    /// `"self"` or a selector evaluated inside the trigger
    pub captions_selector: String,
    pub captions_attribute: String,
    /// Click on the empty slide area closes
    pub doc_close: bool,
    /// Wheel events close
    pub scroll_close: bool,
    /// Vertical swipe closes
    pub swipe_close: bool,
    /// Mouse drags behave like touch swipes
    pub simulate_touch: bool,
    /// Drag distance in pixels needed to change slide or dismiss
    pub threshold: f64,
    /// Return focus to the current trigger instead of the previously focused element
    pub back_focus: bool,
    pub hide_scrollbar: bool,
    /// Milliseconds
    pub transition_duration: f64,
    /// Milliseconds, used when the user prefers reduced motion
    pub reduced_transition_duration: f64,
    pub transition_timing_function: String,
    /// Case-insensitive pattern an image path must match
    pub file_types: String,
    /// How much `|dx|` must dominate `|dy|` before a drag counts as horizontal
    pub direction_bias: f64,
    /// Pixels of movement before a drag gets classified
    pub min_drag_movement: f64,
    /// Exponent applied to overscroll past the first/last slide (0..=1)
    pub edge_damping: f64,
    /// Vertical distance over which the overlay fades out while dragging
    pub dismiss_fade_distance: f64,
    pub max_zoom: f64,
    pub l10n: Labels,
    pub icons: Icons,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            selector: ".lightbox".into(),
            gallery_selector: None,
            captions: true,
            captions_selector: CAPTIONS_SELF.into(),
            captions_attribute: "data-caption".into(),
            doc_close: true,
            scroll_close: false,
            swipe_close: true,
            simulate_touch: true,
            threshold: 50.0,
            back_focus: true,
            hide_scrollbar: true,
            transition_duration: 300.0,
            reduced_transition_duration: 0.1,
            transition_timing_function: "cubic-bezier(0.4, 0, 0.22, 1)".into(),
            file_types: r"\.(png|jpe?g|webp|avif|svg)(\?.*)?$".into(),
            direction_bias: 1.15,
            min_drag_movement: 2.0,
            edge_damping: 0.85,
            dismiss_fade_distance: 100.0,
            max_zoom: 3.0,
            l10n: Labels::default(),
            icons: Icons::default(),
        }
    }
}

impl Options {
    /// Merge caller JSON over the defaults and validate the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let options: Options = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.selector.trim().is_empty() {
            return Err(ConfigError::Invalid("selector must not be empty".into()));
        }
        if !(self.threshold > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "threshold must be positive, got {}",
                self.threshold
            )));
        }
        if !(self.direction_bias >= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "directionBias must be at least 1, got {}",
                self.direction_bias
            )));
        }
        if !(0.0..=1.0).contains(&self.edge_damping) {
            return Err(ConfigError::Invalid(format!(
                "edgeDamping must be within 0..=1, got {}",
                self.edge_damping
            )));
        }
        if !(self.max_zoom >= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "maxZoom must be at least 1, got {}",
                self.max_zoom
            )));
        }
        if self.transition_duration < 0.0 || self.reduced_transition_duration < 0.0 {
            return Err(ConfigError::Invalid(
                "transition durations must not be negative".into(),
            ));
        }
        if !(self.dismiss_fade_distance > 0.0) || self.min_drag_movement < 0.0 {
            return Err(ConfigError::Invalid(
                "drag distances must not be negative".into(),
            ));
        }
        self.file_type_pattern()?;
        Ok(())
    }

    pub fn file_type_pattern(&self) -> Result<Regex, ConfigError> {
        Ok(RegexBuilder::new(&self.file_types)
            .case_insensitive(true)
            .build()?)
    }

    /// Transition length in milliseconds for the current motion preference.
    pub fn transition_duration(&self, reduced_motion: bool) -> f64 {
        if reduced_motion {
            self.reduced_transition_duration
        } else {
            self.transition_duration
        }
    }

    pub fn captions_from_self(&self) -> bool {
        self.captions_selector == CAPTIONS_SELF
    }
}
