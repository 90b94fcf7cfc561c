//! Error types for the lightbox engine

use thiserror::Error;

/// Usage errors surfaced synchronously by the public lightbox operations.
///
/// Image load failures are not errors: they turn into an inline placeholder
/// on the slide and never reach the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LightboxError {
    #[error(
        "Use a link with the 'href' attribute or a button with the 'data-target' attribute. \
         Both attributes must point at an image file matching {pattern}"
    )]
    InvalidTrigger { pattern: String },
    #[error("Trigger is already registered in group '{group}'")]
    DuplicateTrigger { group: String },
    #[error("Lightbox is not open")]
    NotOpen,
    #[error("No valid slide index specified: {value}")]
    InvalidIndex { value: f64 },
    #[error("Slide {index} is already selected")]
    AlreadySelected { index: usize },
    #[error("Slide {index} is out of range (group has {len} slides)")]
    OutOfRange { index: i64, len: usize },
}

/// Errors produced while resolving caller options.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid options JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid file type pattern: {0}")]
    FileTypes(#[from] regex::Error),
    #[error("Invalid option: {0}")]
    Invalid(String),
}
