//! User-visible strings and ARIA labels

use serde::{Deserialize, Serialize};

/// Label table for every ARIA label and visible string the lightbox renders.
///
/// Only the English table ships; other languages are supplied by the caller
/// through the `l10n` option.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct Labels {
    pub lightbox_label: String,
    pub lightbox_loading_indicator_label: String,
    pub lightbox_loading_error: String,
    pub controls_label: String,
    pub previous_button_label: String,
    pub next_button_label: String,
    pub close_button_label: String,
    pub slider_label: String,
    pub slide_label: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self::english()
    }
}

impl Labels {
    pub fn english() -> Self {
        Self {
            lightbox_label: "This is a dialog window that overlays the main content of the page. \
                             The modal shows the enlarged image. Pressing the Escape key will close \
                             the modal and bring you back to where you were on the page."
                .into(),
            lightbox_loading_indicator_label: "Image loading".into(),
            lightbox_loading_error: "The requested image cannot be loaded.".into(),
            controls_label: "Controls".into(),
            previous_button_label: "Previous image".into(),
            next_button_label: "Next image".into(),
            close_button_label: "Close dialog window".into(),
            slider_label: "Images".into(),
            slide_label: "Image".into(),
        }
    }

    /// Accessible label of one slide, e.g. `"Image 2/5"`.
    pub fn slide(&self, index: usize, total: usize) -> String {
        format!("{} {}/{}", self.slide_label, index + 1, total)
    }
}
