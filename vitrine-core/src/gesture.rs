//! Gesture interpreter
//!
//! Turns raw pointer sequences into slider movement, swipe-to-dismiss, and
//! pinch zoom. Pure state: the lightbox feeds it pointer samples and applies
//! the returned updates to the host.

use crate::config::Options;

/// Scales below `1 + ZOOM_EPSILON` count as "not zoomed".
const ZOOM_EPSILON: f64 = 0.01;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

/// One pointer sample in page coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerInput {
    pub id: i32,
    pub x: f64,
    pub y: f64,
    pub kind: PointerKind,
}

impl PointerInput {
    pub fn touch(id: i32, x: f64, y: f64) -> Self {
        Self {
            id,
            x,
            y,
            kind: PointerKind::Touch,
        }
    }

    pub fn mouse(x: f64, y: f64) -> Self {
        Self {
            id: 1,
            x,
            y,
            kind: PointerKind::Mouse,
        }
    }
}

/// Start and end of the current single-pointer drag. All zero between gestures.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragRecord {
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
}

impl DragRecord {
    fn at(x: f64, y: f64) -> Self {
        Self {
            start_x: x,
            start_y: y,
            end_x: x,
            end_y: y,
        }
    }

    pub fn dx(&self) -> f64 {
        self.end_x - self.start_x
    }

    pub fn dy(&self) -> f64 {
        self.end_y - self.start_y
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureTuning {
    pub threshold: f64,
    pub direction_bias: f64,
    pub min_movement: f64,
    pub edge_damping: f64,
    pub dismiss_fade_distance: f64,
    pub max_zoom: f64,
}

impl From<&Options> for GestureTuning {
    fn from(options: &Options) -> Self {
        Self {
            threshold: options.threshold,
            direction_bias: options.direction_bias,
            min_movement: options.min_drag_movement,
            edge_damping: options.edge_damping,
            dismiss_fade_distance: options.dismiss_fade_distance,
            max_zoom: options.max_zoom,
        }
    }
}

impl Default for GestureTuning {
    fn default() -> Self {
        Self::from(&Options::default())
    }
}

/// Slider state the interpreter needs for each sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureContext {
    pub slide_count: usize,
    pub current_index: usize,
    /// Resting slider translation of the current slide
    pub base_offset: f64,
    pub swipe_close: bool,
    pub reduced_motion: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Pinch zoom applied to the current image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomState {
    pub scale: f64,
    /// Pinch midpoint in page coordinates
    pub origin_x: f64,
    pub origin_y: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self::identity()
    }
}

impl ZoomState {
    pub fn identity() -> Self {
        Self {
            scale: 1.0,
            origin_x: 0.0,
            origin_y: 0.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }

    pub fn is_zoomed(&self) -> bool {
        self.scale > 1.0 + ZOOM_EPSILON
    }

    pub fn to_css(&self) -> String {
        format!(
            "translate({}px, {}px) scale({})",
            self.pan_x, self.pan_y, self.scale
        )
    }
}

/// Live visual change while a gesture is in progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureUpdate {
    None,
    /// Horizontal drag: slider translation
    Slide { x: f64 },
    /// Vertical drag towards dismissal
    Dismiss {
        x: f64,
        y: f64,
        /// `None` under reduced motion
        overlay_opacity: Option<f64>,
    },
    Zoom(ZoomState),
    /// A second pointer interrupted a drag; return to the resting offset
    SnapBack,
}

/// What a released gesture asks the lightbox to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureOutcome {
    /// Nothing happened (tap, or a malformed sequence)
    None,
    Previous,
    Next,
    /// Return to the resting offset and clear dismiss visuals
    SnapBack,
    Dismiss,
    /// A tap while zoomed: back to scale 1
    ResetZoom,
    /// Still zoomed; swiping stays suspended
    Zoomed,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Pinch {
    start_distance: f64,
    start_scale: f64,
}

#[derive(Debug)]
pub struct GestureInterpreter {
    tuning: GestureTuning,
    pointers: Vec<PointerInput>,
    drag: DragRecord,
    pointer_down: bool,
    axis: Option<Axis>,
    moved: bool,
    overlay_baseline: f64,
    pinch: Option<Pinch>,
    after_pinch: bool,
    zoom: ZoomState,
    pan_start: (f64, f64),
    last_gesture_moved: bool,
}

impl Default for GestureInterpreter {
    fn default() -> Self {
        Self::new(GestureTuning::default())
    }
}

fn distance(a: &PointerInput, b: &PointerInput) -> f64 {
    (a.x - b.x).hypot(a.y - b.y)
}

impl GestureInterpreter {
    pub fn new(tuning: GestureTuning) -> Self {
        Self {
            tuning,
            pointers: Vec::with_capacity(2),
            drag: DragRecord::default(),
            pointer_down: false,
            axis: None,
            moved: false,
            overlay_baseline: 1.0,
            pinch: None,
            after_pinch: false,
            zoom: ZoomState::identity(),
            pan_start: (0.0, 0.0),
            last_gesture_moved: false,
        }
    }

    pub fn set_tuning(&mut self, tuning: GestureTuning) {
        self.tuning = tuning;
    }

    pub fn drag(&self) -> DragRecord {
        self.drag
    }

    pub fn axis(&self) -> Option<Axis> {
        self.axis
    }

    pub fn zoom(&self) -> ZoomState {
        self.zoom
    }

    pub fn is_zoomed(&self) -> bool {
        self.zoom.is_zoomed()
    }

    pub fn is_active(&self) -> bool {
        self.pointer_down || self.pinch.is_some()
    }

    /// Whether the last released gesture moved anything. Cleared on read, so a
    /// click event that ends a drag can be told apart from a plain click.
    pub fn take_moved(&mut self) -> bool {
        std::mem::take(&mut self.last_gesture_moved)
    }

    pub fn pointer_down(&mut self, input: PointerInput, overlay_opacity: f64) -> GestureUpdate {
        if let Some(existing) = self.pointers.iter_mut().find(|p| p.id == input.id) {
            *existing = input;
        } else if self.pointers.len() >= 2 {
            return GestureUpdate::None;
        } else {
            self.pointers.push(input);
        }

        if let [a, b] = self.pointers.as_slice() {
            let start_distance = distance(a, b);
            if start_distance > 0.0 {
                self.pinch = Some(Pinch {
                    start_distance,
                    start_scale: self.zoom.scale,
                });
            }
            let interrupted = self.axis.is_some();
            self.pointer_down = false;
            self.clear_drag();
            return if interrupted {
                GestureUpdate::SnapBack
            } else {
                GestureUpdate::None
            };
        }

        self.drag = DragRecord::at(input.x, input.y);
        self.axis = None;
        self.moved = false;
        self.after_pinch = false;
        self.pointer_down = true;
        self.overlay_baseline = overlay_opacity;
        self.pan_start = (self.zoom.pan_x, self.zoom.pan_y);
        GestureUpdate::None
    }

    pub fn pointer_move(&mut self, input: PointerInput, ctx: &GestureContext) -> GestureUpdate {
        let Some(pointer) = self.pointers.iter_mut().find(|p| p.id == input.id) else {
            return GestureUpdate::None;
        };
        pointer.x = input.x;
        pointer.y = input.y;

        if let Some(pinch) = self.pinch {
            return match self.pointers.as_slice() {
                [a, b] => {
                    let scale = (pinch.start_scale * distance(a, b) / pinch.start_distance)
                        .clamp(1.0, self.tuning.max_zoom);
                    self.zoom.scale = scale;
                    self.zoom.origin_x = (a.x + b.x) / 2.0;
                    self.zoom.origin_y = (a.y + b.y) / 2.0;
                    if !self.zoom.is_zoomed() {
                        self.zoom.pan_x = 0.0;
                        self.zoom.pan_y = 0.0;
                    }
                    self.moved = true;
                    GestureUpdate::Zoom(self.zoom)
                }
                _ => GestureUpdate::None,
            };
        }

        if !self.pointer_down {
            return GestureUpdate::None;
        }
        self.drag.end_x = input.x;
        self.drag.end_y = input.y;
        let dx = self.drag.dx();
        let dy = self.drag.dy();

        // Zoomed: single-pointer moves pan the image, swiping is suspended.
        if self.zoom.is_zoomed() {
            if dx.abs().max(dy.abs()) > self.tuning.min_movement {
                self.moved = true;
            }
            self.zoom.pan_x = self.pan_start.0 + dx;
            self.zoom.pan_y = self.pan_start.1 + dy;
            return GestureUpdate::Zoom(self.zoom);
        }

        if self.axis.is_none() {
            if dx.abs().max(dy.abs()) <= self.tuning.min_movement {
                return GestureUpdate::None;
            }
            if ctx.slide_count > 1 && dx.abs() >= dy.abs() * self.tuning.direction_bias {
                self.axis = Some(Axis::Horizontal);
            } else if ctx.swipe_close && dy.abs() > dx.abs() {
                self.axis = Some(Axis::Vertical);
            } else {
                return GestureUpdate::None;
            }
            self.moved = true;
        }

        match self.axis {
            Some(Axis::Horizontal) => GestureUpdate::Slide {
                x: ctx.base_offset + self.damped(dx, ctx),
            },
            Some(Axis::Vertical) => {
                let overlay_opacity = (!ctx.reduced_motion).then(|| {
                    let fade = (1.0 - dy.abs() / self.tuning.dismiss_fade_distance).max(0.0);
                    self.overlay_baseline * fade
                });
                GestureUpdate::Dismiss {
                    x: ctx.base_offset,
                    y: dy,
                    overlay_opacity,
                }
            }
            None => GestureUpdate::None,
        }
    }

    pub fn pointer_up(&mut self, input: PointerInput, ctx: &GestureContext) -> GestureOutcome {
        let Some(position) = self.pointers.iter().position(|p| p.id == input.id) else {
            return GestureOutcome::None;
        };
        self.pointers.remove(position);

        if self.pinch.is_some() {
            if self.pointers.len() < 2 {
                self.pinch = None;
                if !self.zoom.is_zoomed() {
                    self.zoom = ZoomState::identity();
                }
                // The remaining finger continues as a pan and must not count as a tap.
                if let Some(rest) = self.pointers.first().copied() {
                    self.drag = DragRecord::at(rest.x, rest.y);
                    self.pointer_down = true;
                    self.pan_start = (self.zoom.pan_x, self.zoom.pan_y);
                    self.after_pinch = true;
                }
            }
            self.last_gesture_moved = true;
            return if self.zoom.is_zoomed() {
                GestureOutcome::Zoomed
            } else {
                GestureOutcome::None
            };
        }

        if !self.pointer_down {
            return GestureOutcome::None;
        }
        self.pointer_down = false;
        self.drag.end_x = input.x;
        self.drag.end_y = input.y;

        let outcome = if self.zoom.is_zoomed() {
            if self.moved || self.after_pinch {
                GestureOutcome::Zoomed
            } else {
                self.zoom = ZoomState::identity();
                GestureOutcome::ResetZoom
            }
        } else {
            self.release_outcome(ctx)
        };

        self.last_gesture_moved = self.moved || self.after_pinch;
        self.clear_drag();
        outcome
    }

    /// Pointer stream interrupted (pointercancel, lost capture).
    pub fn cancel(&mut self) -> GestureOutcome {
        let outcome = if self.axis.is_some() {
            GestureOutcome::SnapBack
        } else {
            GestureOutcome::None
        };
        self.pointers.clear();
        self.pinch = None;
        self.pointer_down = false;
        self.clear_drag();
        outcome
    }

    /// Forget everything, zoom included. Used when the slide changes or the
    /// lightbox closes.
    pub fn reset(&mut self) {
        self.pointers.clear();
        self.pinch = None;
        self.pointer_down = false;
        self.after_pinch = false;
        self.zoom = ZoomState::identity();
        self.last_gesture_moved = false;
        self.clear_drag();
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = ZoomState::identity();
    }

    fn clear_drag(&mut self) {
        self.drag = DragRecord::default();
        self.axis = None;
        self.moved = false;
    }

    fn release_outcome(&self, ctx: &GestureContext) -> GestureOutcome {
        let dx = self.drag.dx();
        let dy = self.drag.dy();
        let threshold = self.tuning.threshold;
        match self.axis {
            Some(Axis::Horizontal) => {
                if dx > 0.0 && dx >= threshold && ctx.current_index > 0 {
                    GestureOutcome::Previous
                } else if dx < 0.0 && -dx >= threshold && ctx.current_index + 1 < ctx.slide_count
                {
                    GestureOutcome::Next
                } else {
                    GestureOutcome::SnapBack
                }
            }
            Some(Axis::Vertical) => {
                if ctx.swipe_close && dy.abs() >= threshold {
                    GestureOutcome::Dismiss
                } else {
                    GestureOutcome::SnapBack
                }
            }
            None => GestureOutcome::None,
        }
    }

    /// Rubber-band resistance when dragging past the first or last slide.
    fn damped(&self, dx: f64, ctx: &GestureContext) -> f64 {
        let at_start = ctx.current_index == 0 && dx > 0.0;
        let at_end = ctx.current_index + 1 >= ctx.slide_count && dx < 0.0;
        if at_start || at_end {
            dx.signum() * dx.abs().powf(self.tuning.edge_damping)
        } else {
            dx
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(index: usize, count: usize) -> GestureContext {
        GestureContext {
            slide_count: count,
            current_index: index,
            base_offset: -(index as f64) * 1000.0,
            swipe_close: true,
            reduced_motion: false,
        }
    }

    fn drag(
        gesture: &mut GestureInterpreter,
        ctx: &GestureContext,
        from: (f64, f64),
        to: (f64, f64),
    ) -> (GestureUpdate, GestureOutcome) {
        gesture.pointer_down(PointerInput::touch(1, from.0, from.1), 1.0);
        let update = gesture.pointer_move(PointerInput::touch(1, to.0, to.1), ctx);
        let outcome = gesture.pointer_up(PointerInput::touch(1, to.0, to.1), ctx);
        (update, outcome)
    }

    #[test]
    fn test_swipe_left_past_threshold_goes_next() {
        let mut gesture = GestureInterpreter::default();
        let ctx = ctx(1, 3);
        let (update, outcome) = drag(&mut gesture, &ctx, (500.0, 300.0), (420.0, 305.0));
        assert_eq!(update, GestureUpdate::Slide { x: -1080.0 });
        assert_eq!(outcome, GestureOutcome::Next);
        assert_eq!(gesture.drag(), DragRecord::default());
    }

    #[test]
    fn test_swipe_right_past_threshold_goes_previous() {
        let mut gesture = GestureInterpreter::default();
        let (_, outcome) = drag(&mut gesture, &ctx(1, 3), (300.0, 300.0), (360.0, 300.0));
        assert_eq!(outcome, GestureOutcome::Previous);
    }

    #[test]
    fn test_short_swipe_snaps_back() {
        let mut gesture = GestureInterpreter::default();
        let (_, outcome) = drag(&mut gesture, &ctx(1, 3), (300.0, 300.0), (330.0, 300.0));
        assert_eq!(outcome, GestureOutcome::SnapBack);
    }

    #[test]
    fn test_swipe_past_last_slide_snaps_back_with_damping() {
        let mut gesture = GestureInterpreter::default();
        let ctx = ctx(2, 3);
        let (update, outcome) = drag(&mut gesture, &ctx, (500.0, 300.0), (400.0, 300.0));
        match update {
            GestureUpdate::Slide { x } => {
                let travelled = ctx.base_offset - x;
                assert!(travelled > 0.0 && travelled < 100.0, "damped: {travelled}");
            }
            other => panic!("Expected Slide, got {other:?}"),
        }
        assert_eq!(outcome, GestureOutcome::SnapBack);
    }

    #[test]
    fn test_single_slide_never_swipes_horizontally() {
        let mut gesture = GestureInterpreter::default();
        let (update, outcome) = drag(&mut gesture, &ctx(0, 1), (500.0, 300.0), (300.0, 300.0));
        assert_eq!(update, GestureUpdate::None);
        assert_eq!(outcome, GestureOutcome::None);
    }

    #[test]
    fn test_vertical_swipe_dismisses_and_fades() {
        let mut gesture = GestureInterpreter::default();
        let ctx = ctx(0, 3);
        let (update, outcome) = drag(&mut gesture, &ctx, (500.0, 300.0), (505.0, 360.0));
        match update {
            GestureUpdate::Dismiss {
                y, overlay_opacity, ..
            } => {
                assert_eq!(y, 60.0);
                let opacity = overlay_opacity.unwrap();
                assert!((opacity - 0.4).abs() < 1e-9);
            }
            other => panic!("Expected Dismiss, got {other:?}"),
        }
        assert_eq!(outcome, GestureOutcome::Dismiss);
    }

    #[test]
    fn test_vertical_swipe_without_swipe_close_does_nothing() {
        let mut gesture = GestureInterpreter::default();
        let ctx = GestureContext {
            swipe_close: false,
            ..ctx(0, 3)
        };
        let (update, outcome) = drag(&mut gesture, &ctx, (500.0, 300.0), (500.0, 400.0));
        assert_eq!(update, GestureUpdate::None);
        assert_eq!(outcome, GestureOutcome::None);
    }

    #[test]
    fn test_reduced_motion_skips_overlay_fade() {
        let mut gesture = GestureInterpreter::default();
        let ctx = GestureContext {
            reduced_motion: true,
            ..ctx(0, 3)
        };
        let (update, _) = drag(&mut gesture, &ctx, (500.0, 300.0), (500.0, 340.0));
        assert!(matches!(
            update,
            GestureUpdate::Dismiss {
                overlay_opacity: None,
                ..
            }
        ));
    }

    #[test]
    fn test_axis_is_locked_once_classified() {
        let mut gesture = GestureInterpreter::default();
        let ctx = ctx(1, 3);
        gesture.pointer_down(PointerInput::touch(1, 500.0, 300.0), 1.0);
        gesture.pointer_move(PointerInput::touch(1, 480.0, 300.0), &ctx);
        assert_eq!(gesture.axis(), Some(Axis::Horizontal));
        let update = gesture.pointer_move(PointerInput::touch(1, 470.0, 400.0), &ctx);
        assert_eq!(update, GestureUpdate::Slide { x: -1030.0 });
    }

    #[test]
    fn test_up_without_down_is_ignored() {
        let mut gesture = GestureInterpreter::default();
        let outcome = gesture.pointer_up(PointerInput::touch(9, 0.0, 0.0), &ctx(0, 3));
        assert_eq!(outcome, GestureOutcome::None);
    }

    #[test]
    fn test_tap_is_no_gesture() {
        let mut gesture = GestureInterpreter::default();
        let (_, outcome) = drag(&mut gesture, &ctx(1, 3), (500.0, 300.0), (501.0, 300.0));
        assert_eq!(outcome, GestureOutcome::None);
        assert!(!gesture.take_moved());
    }

    #[test]
    fn test_pinch_zoom_clamps_and_suspends_swipe() {
        let mut gesture = GestureInterpreter::default();
        let ctx = ctx(1, 3);
        gesture.pointer_down(PointerInput::touch(1, 400.0, 300.0), 1.0);
        gesture.pointer_down(PointerInput::touch(2, 600.0, 300.0), 1.0);

        let update = gesture.pointer_move(PointerInput::touch(2, 1400.0, 300.0), &ctx);
        match update {
            GestureUpdate::Zoom(zoom) => {
                assert_eq!(zoom.scale, 3.0);
                assert_eq!(zoom.origin_x, 900.0);
            }
            other => panic!("Expected Zoom, got {other:?}"),
        }

        assert_eq!(
            gesture.pointer_up(PointerInput::touch(2, 1400.0, 300.0), &ctx),
            GestureOutcome::Zoomed
        );

        // Remaining finger pans instead of swiping.
        let update = gesture.pointer_move(PointerInput::touch(1, 300.0, 300.0), &ctx);
        assert!(matches!(update, GestureUpdate::Zoom(z) if z.pan_x == -100.0));
        assert_eq!(
            gesture.pointer_up(PointerInput::touch(1, 300.0, 300.0), &ctx),
            GestureOutcome::Zoomed
        );
        assert!(gesture.is_zoomed());

        // A later long swipe still only pans.
        let (_, outcome) = drag(&mut gesture, &ctx, (500.0, 300.0), (200.0, 300.0));
        assert_eq!(outcome, GestureOutcome::Zoomed);
    }

    #[test]
    fn test_second_pointer_mid_drag_snaps_back() {
        let mut gesture = GestureInterpreter::default();
        let ctx = ctx(1, 3);
        gesture.pointer_down(PointerInput::touch(1, 500.0, 300.0), 1.0);
        let update = gesture.pointer_move(PointerInput::touch(1, 460.0, 300.0), &ctx);
        assert_eq!(update, GestureUpdate::Slide { x: -1040.0 });

        let update = gesture.pointer_down(PointerInput::touch(2, 700.0, 300.0), 1.0);
        assert_eq!(update, GestureUpdate::SnapBack);
        assert_eq!(gesture.axis(), None);
        assert_eq!(gesture.drag(), DragRecord::default());

        // Before any classified movement the second pointer just starts a pinch.
        let mut gesture = GestureInterpreter::default();
        gesture.pointer_down(PointerInput::touch(1, 500.0, 300.0), 1.0);
        let update = gesture.pointer_down(PointerInput::touch(2, 700.0, 300.0), 1.0);
        assert_eq!(update, GestureUpdate::None);
    }

    #[test]
    fn test_tap_while_zoomed_resets() {
        let mut gesture = GestureInterpreter::default();
        let ctx = ctx(1, 3);
        gesture.pointer_down(PointerInput::touch(1, 400.0, 300.0), 1.0);
        gesture.pointer_down(PointerInput::touch(2, 500.0, 300.0), 1.0);
        gesture.pointer_move(PointerInput::touch(2, 600.0, 300.0), &ctx);
        gesture.pointer_up(PointerInput::touch(2, 600.0, 300.0), &ctx);
        gesture.pointer_up(PointerInput::touch(1, 400.0, 300.0), &ctx);
        assert!(gesture.is_zoomed());

        let (_, outcome) = drag(&mut gesture, &ctx, (450.0, 300.0), (450.0, 300.0));
        assert_eq!(outcome, GestureOutcome::ResetZoom);
        assert!(!gesture.is_zoomed());
    }

    #[test]
    fn test_pinch_below_one_stays_unzoomed() {
        let mut gesture = GestureInterpreter::default();
        let ctx = ctx(1, 3);
        gesture.pointer_down(PointerInput::touch(1, 400.0, 300.0), 1.0);
        gesture.pointer_down(PointerInput::touch(2, 600.0, 300.0), 1.0);
        let update = gesture.pointer_move(PointerInput::touch(2, 450.0, 300.0), &ctx);
        assert!(matches!(update, GestureUpdate::Zoom(z) if z.scale == 1.0));
        assert_eq!(
            gesture.pointer_up(PointerInput::touch(2, 450.0, 300.0), &ctx),
            GestureOutcome::None
        );
        assert!(!gesture.is_zoomed());
    }

    #[test]
    fn test_cancel_snaps_back_classified_drag() {
        let mut gesture = GestureInterpreter::default();
        let ctx = ctx(1, 3);
        gesture.pointer_down(PointerInput::touch(1, 500.0, 300.0), 1.0);
        gesture.pointer_move(PointerInput::touch(1, 450.0, 300.0), &ctx);
        assert_eq!(gesture.cancel(), GestureOutcome::SnapBack);
        assert!(!gesture.is_active());
    }
}
