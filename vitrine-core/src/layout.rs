//! Geometry: image fitting, slider offsets and thumbnail transforms

/// Axis-aligned rectangle in CSS pixels, relative to the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// What the host measured for one slide.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SlideMetrics {
    pub size: Size,
    pub padding: Insets,
    pub caption_height: f64,
}

impl SlideMetrics {
    /// Space left for the image once padding and caption are taken away.
    pub fn available(&self) -> Size {
        Size {
            width: (self.size.width - self.padding.left - self.padding.right).max(0.0),
            height: (self.size.height - self.padding.top - self.padding.bottom - self.caption_height)
                .max(0.0),
        }
    }
}

/// How an image is sized inside its slide.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ImageFit {
    /// The image fits; clear any explicit size.
    Natural,
    Scaled(Size),
}

/// Fit `natural` into the slide, preserving the aspect ratio. Never upscales.
pub fn fit_image(natural: Size, metrics: &SlideMetrics) -> ImageFit {
    let available = metrics.available();
    if natural.width <= 0.0 || natural.height <= 0.0 {
        return ImageFit::Natural;
    }
    if natural.width <= available.width && natural.height <= available.height {
        return ImageFit::Natural;
    }
    let ratio = (available.width / natural.width).min(available.height / natural.height);
    ImageFit::Scaled(Size::new(natural.width * ratio, natural.height * ratio))
}

/// Horizontal slider translation that shows slide `index`.
pub fn slide_offset(index: usize, container_width: f64) -> f64 {
    -(index as f64) * container_width
}

/// Translate + non-uniform scale, the transform used to morph between the
/// thumbnail and the full-size image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThumbnailTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl ThumbnailTransform {
    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({}, {})",
            self.translate_x, self.translate_y, self.scale_x, self.scale_y
        )
    }
}

/// Transform that places the image (at `image`) exactly over the thumbnail.
///
/// Returns `None` when the image has not been laid out yet.
pub fn thumbnail_transform(thumbnail: Rect, image: Rect) -> Option<ThumbnailTransform> {
    if image.width <= 0.0 || image.height <= 0.0 {
        return None;
    }
    Some(ThumbnailTransform {
        translate_x: thumbnail.left - image.left,
        translate_y: thumbnail.top - image.top,
        scale_x: thumbnail.width / image.width,
        scale_y: thumbnail.height / image.height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(width: f64, height: f64) -> SlideMetrics {
        SlideMetrics {
            size: Size::new(width, height),
            padding: Insets {
                top: 10.0,
                right: 10.0,
                bottom: 10.0,
                left: 10.0,
            },
            caption_height: 20.0,
        }
    }

    #[test]
    fn test_small_image_keeps_natural_size() {
        assert_eq!(
            fit_image(Size::new(300.0, 200.0), &metrics(1000.0, 800.0)),
            ImageFit::Natural
        );
    }

    #[test]
    fn test_wide_image_scales_to_width() {
        // available: 980 x 760
        let fit = fit_image(Size::new(1960.0, 400.0), &metrics(1000.0, 800.0));
        assert_eq!(fit, ImageFit::Scaled(Size::new(980.0, 200.0)));
    }

    #[test]
    fn test_tall_image_accounts_for_caption() {
        // available height: 800 - 20 - 20 = 760
        let fit = fit_image(Size::new(380.0, 1520.0), &metrics(1000.0, 800.0));
        assert_eq!(fit, ImageFit::Scaled(Size::new(190.0, 760.0)));
    }

    #[test]
    fn test_zero_sized_image_is_natural() {
        assert_eq!(
            fit_image(Size::new(0.0, 0.0), &metrics(1000.0, 800.0)),
            ImageFit::Natural
        );
    }

    #[test]
    fn test_slide_offset() {
        assert_eq!(slide_offset(0, 800.0), 0.0);
        assert_eq!(slide_offset(3, 800.0), -2400.0);
    }

    #[test]
    fn test_thumbnail_transform() {
        let t = thumbnail_transform(
            Rect::new(10.0, 20.0, 100.0, 50.0),
            Rect::new(110.0, 70.0, 400.0, 200.0),
        )
        .unwrap();
        assert_eq!(t.translate_x, -100.0);
        assert_eq!(t.translate_y, -50.0);
        assert_eq!(t.scale_x, 0.25);
        assert_eq!(t.scale_y, 0.25);
        assert_eq!(t.to_css(), "translate(-100px, -50px) scale(0.25, 0.25)");
    }

    #[test]
    fn test_thumbnail_transform_needs_laid_out_image() {
        assert!(thumbnail_transform(Rect::default(), Rect::default()).is_none());
    }
}
