//! Trigger elements: what the host reads from them and how they are validated

use crate::error::LightboxError;
use regex::Regex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerKind {
    /// `<a href>`
    Anchor,
    /// `<button data-target>`
    Button,
    Other,
}

/// Where captions come from, passed to the host when it describes a trigger.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptionSource<'a> {
    pub enabled: bool,
    /// `None` reads `attribute` from the trigger itself; `Some(selector)` reads the
    /// first matching descendant's `attribute`, falling back to its inner HTML.
    pub selector: Option<&'a str>,
    pub attribute: &'a str,
}

/// Snapshot of the attributes that matter on a trigger element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriggerDescriptor {
    pub kind: Option<TriggerKind>,
    /// Resolved `href` for anchors
    pub href: Option<String>,
    /// `data-target` for buttons
    pub target: Option<String>,
    /// `data-alt`
    pub alt: Option<String>,
    /// `alt` of an `<img>` inside the trigger, when there is one
    pub thumbnail_alt: Option<String>,
    pub has_thumbnail: bool,
    pub caption: Option<String>,
    /// `data-srcset`
    pub srcset: Option<String>,
    /// `data-sizes`
    pub sizes: Option<String>,
}

/// Everything the host needs to create one slide's image.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageRequest {
    pub src: String,
    pub alt: String,
    pub srcset: Option<String>,
    pub sizes: Option<String>,
    pub caption: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

impl TriggerDescriptor {
    /// Path of the full-size image, before validation.
    pub fn image_source(&self) -> Option<&str> {
        match self.kind? {
            TriggerKind::Anchor => non_empty(&self.href),
            TriggerKind::Button => non_empty(&self.target),
            TriggerKind::Other => None,
        }
    }

    /// Checks the trigger qualifies and returns its image path.
    pub fn validate(&self, file_types: &Regex) -> Result<&str, LightboxError> {
        self.image_source()
            .filter(|src| file_types.is_match(src))
            .ok_or_else(|| LightboxError::InvalidTrigger {
                pattern: file_types.as_str().to_string(),
            })
    }

    pub fn image_request(&self, file_types: &Regex) -> Result<ImageRequest, LightboxError> {
        let src = self.validate(file_types)?.to_string();
        // Anchors with a thumbnail take its alt text; everything else uses data-alt.
        let alt = match (self.kind, self.has_thumbnail) {
            (Some(TriggerKind::Anchor), true) => non_empty(&self.thumbnail_alt),
            _ => non_empty(&self.alt),
        }
        .unwrap_or_default()
        .to_string();

        Ok(ImageRequest {
            src,
            alt,
            srcset: non_empty(&self.srcset).map(str::to_string),
            sizes: non_empty(&self.sizes).map(str::to_string),
            caption: non_empty(&self.caption).map(str::to_string),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Options;

    fn anchor(href: &str) -> TriggerDescriptor {
        TriggerDescriptor {
            kind: Some(TriggerKind::Anchor),
            href: Some(href.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_anchor_with_image_href_is_valid() {
        let pattern = Options::default().file_type_pattern().unwrap();
        assert_eq!(anchor("/a/b.jpeg").validate(&pattern), Ok("/a/b.jpeg"));
    }

    #[test]
    fn test_anchor_to_page_is_rejected() {
        let pattern = Options::default().file_type_pattern().unwrap();
        assert!(matches!(
            anchor("/about.html").validate(&pattern),
            Err(LightboxError::InvalidTrigger { .. })
        ));
    }

    #[test]
    fn test_button_needs_data_target() {
        let pattern = Options::default().file_type_pattern().unwrap();
        let mut button = TriggerDescriptor {
            kind: Some(TriggerKind::Button),
            href: Some("/ignored.png".into()),
            ..Default::default()
        };
        assert!(button.validate(&pattern).is_err());
        button.target = Some("/photo.png".into());
        assert_eq!(button.validate(&pattern), Ok("/photo.png"));
    }

    #[test]
    fn test_other_elements_are_rejected() {
        let pattern = Options::default().file_type_pattern().unwrap();
        let div = TriggerDescriptor {
            kind: Some(TriggerKind::Other),
            target: Some("/photo.png".into()),
            ..Default::default()
        };
        assert!(div.validate(&pattern).is_err());
    }

    #[test]
    fn test_image_request_prefers_thumbnail_alt_for_anchors() {
        let pattern = Options::default().file_type_pattern().unwrap();
        let descriptor = TriggerDescriptor {
            has_thumbnail: true,
            thumbnail_alt: Some("Harbour at dusk".into()),
            alt: Some("ignored".into()),
            caption: Some("   ".into()),
            srcset: Some("a.jpg 1x, b.jpg 2x".into()),
            ..anchor("/a.jpg")
        };
        let request = descriptor.image_request(&pattern).unwrap();
        assert_eq!(request.alt, "Harbour at dusk");
        assert_eq!(request.caption, None);
        assert_eq!(request.srcset.as_deref(), Some("a.jpg 1x, b.jpg 2x"));
    }

    #[test]
    fn test_image_request_without_alt_is_empty_string() {
        let pattern = Options::default().file_type_pattern().unwrap();
        let request = anchor("/a.jpg").image_request(&pattern).unwrap();
        assert_eq!(request.alt, "");
    }
}
