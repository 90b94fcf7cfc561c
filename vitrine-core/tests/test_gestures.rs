#![cfg(feature = "test-utils")]
mod support;
use crate::support::Fixture;
use vitrine_core::gesture::ZoomState;
use vitrine_core::{Options, Phase, PointerInput};

fn swipe(fx: &mut Fixture, from: (f64, f64), to: (f64, f64)) {
    assert!(fx.lightbox.pointer_down(PointerInput::touch(1, from.0, from.1)));
    fx.lightbox.pointer_move(PointerInput::touch(1, to.0, to.1));
    fx.lightbox.pointer_up(PointerInput::touch(1, to.0, to.1));
}

fn current_zoom(fx: &Fixture) -> ZoomState {
    let index = fx.lightbox.current_index().unwrap();
    fx.host().slide_at(index).unwrap().1.zoom
}

#[test]
fn test_long_swipe_moves_exactly_one_slide() {
    let mut fx = Fixture::new(4);
    fx.open(1);

    swipe(&mut fx, (600.0, 400.0), (300.0, 410.0));
    assert_eq!(fx.lightbox.current_index(), Some(2));
    assert_eq!(fx.host().slider_x(), Some(-2000.0));
    fx.settle();

    swipe(&mut fx, (300.0, 400.0), (600.0, 400.0));
    assert_eq!(fx.lightbox.current_index(), Some(1));
}

#[test]
fn test_short_swipe_restores_offset() {
    let mut fx = Fixture::new(3);
    fx.open(1);

    assert!(fx.lightbox.pointer_down(PointerInput::touch(1, 500.0, 400.0)));
    fx.lightbox.pointer_move(PointerInput::touch(1, 470.0, 400.0));
    assert_eq!(fx.host().slider_x(), Some(-1030.0));
    assert!(fx.host().slider.as_ref().unwrap().dragging);

    fx.lightbox.pointer_up(PointerInput::touch(1, 470.0, 400.0));
    assert_eq!(fx.lightbox.current_index(), Some(1));
    assert_eq!(fx.host().slider_x(), Some(-1000.0));
    assert!(!fx.host().slider.as_ref().unwrap().dragging);
}

#[test]
fn test_swipe_past_last_slide_snaps_back() {
    let mut fx = Fixture::new(2);
    fx.open(1);
    swipe(&mut fx, (600.0, 400.0), (300.0, 400.0));
    assert_eq!(fx.lightbox.current_index(), Some(1));
    assert_eq!(fx.host().slider_x(), Some(-1000.0));
}

#[test]
fn test_vertical_swipe_dismisses() {
    let mut fx = Fixture::new(3);
    fx.open(0);

    assert!(fx.lightbox.pointer_down(PointerInput::touch(1, 500.0, 300.0)));
    fx.lightbox.pointer_move(PointerInput::touch(1, 505.0, 380.0));
    assert!(fx.host().vertical_closing);
    let opacity = fx.host().overlay_opacity.unwrap();
    assert!((opacity - 0.2).abs() < 1e-9);

    fx.lightbox.pointer_up(PointerInput::touch(1, 505.0, 380.0));
    assert_eq!(fx.lightbox.phase(), Phase::Closing);
    fx.settle();
    assert_eq!(fx.lightbox.phase(), Phase::Closed);
}

#[test]
fn test_short_vertical_swipe_clears_dismiss_visuals() {
    let mut fx = Fixture::new(3);
    fx.open(0);
    swipe(&mut fx, (500.0, 300.0), (500.0, 330.0));
    assert_eq!(fx.lightbox.phase(), Phase::Open);
    assert!(!fx.host().vertical_closing);
    assert_eq!(fx.host().overlay_opacity, None);
    assert_eq!(fx.host().slider.as_ref().unwrap().y, 0.0);
}

#[test]
fn test_click_ending_a_drag_does_not_close() {
    let mut fx = Fixture::new(3);
    fx.open(1);
    swipe(&mut fx, (500.0, 300.0), (480.0, 300.0));
    fx.lightbox.handle_backdrop_click();
    assert_eq!(fx.lightbox.phase(), Phase::Open);

    fx.lightbox.handle_backdrop_click();
    assert_eq!(fx.lightbox.phase(), Phase::Closing);
}

#[test]
fn test_pinch_zoom_suspends_swiping_until_tap() {
    let mut fx = Fixture::new(3);
    fx.open(1);

    fx.lightbox.pointer_down(PointerInput::touch(1, 400.0, 400.0));
    fx.lightbox.pointer_down(PointerInput::touch(2, 600.0, 400.0));
    fx.lightbox.pointer_move(PointerInput::touch(2, 800.0, 400.0));
    assert_eq!(current_zoom(&fx).scale, 2.0);
    fx.lightbox.pointer_up(PointerInput::touch(2, 800.0, 400.0));
    fx.lightbox.pointer_up(PointerInput::touch(1, 400.0, 400.0));

    swipe(&mut fx, (600.0, 400.0), (300.0, 400.0));
    assert_eq!(fx.lightbox.current_index(), Some(1));
    assert_eq!(current_zoom(&fx).pan_x, -300.0);

    // A tap returns to scale 1 and swiping works again.
    swipe(&mut fx, (500.0, 400.0), (500.0, 400.0));
    assert_eq!(current_zoom(&fx), ZoomState::identity());

    swipe(&mut fx, (600.0, 400.0), (300.0, 400.0));
    assert_eq!(fx.lightbox.current_index(), Some(2));
}

#[test]
fn test_second_finger_mid_swipe_restores_offset() {
    let mut fx = Fixture::new(3);
    fx.open(1);

    assert!(fx.lightbox.pointer_down(PointerInput::touch(1, 500.0, 400.0)));
    fx.lightbox.pointer_move(PointerInput::touch(1, 460.0, 400.0));
    assert_eq!(fx.host().slider_x(), Some(-1040.0));

    fx.lightbox.pointer_down(PointerInput::touch(2, 700.0, 400.0));
    assert_eq!(fx.host().slider_x(), Some(-1000.0));
    assert!(!fx.host().slider.as_ref().unwrap().dragging);

    fx.lightbox.pointer_up(PointerInput::touch(2, 700.0, 400.0));
    fx.lightbox.pointer_up(PointerInput::touch(1, 460.0, 400.0));
    assert_eq!(fx.lightbox.current_index(), Some(1));
    assert_eq!(fx.host().slider_x(), Some(-1000.0));
}

#[test]
fn test_second_finger_mid_dismiss_clears_visuals() {
    let mut fx = Fixture::new(3);
    fx.open(0);

    assert!(fx.lightbox.pointer_down(PointerInput::touch(1, 500.0, 300.0)));
    fx.lightbox.pointer_move(PointerInput::touch(1, 505.0, 340.0));
    assert!(fx.host().vertical_closing);
    assert!(fx.host().overlay_opacity.is_some());

    fx.lightbox.pointer_down(PointerInput::touch(2, 700.0, 300.0));
    assert!(!fx.host().vertical_closing);
    assert_eq!(fx.host().overlay_opacity, None);
    assert_eq!(fx.host().slider.as_ref().unwrap().y, 0.0);

    fx.lightbox.pointer_up(PointerInput::touch(2, 700.0, 300.0));
    fx.lightbox.pointer_up(PointerInput::touch(1, 505.0, 340.0));
    assert_eq!(fx.lightbox.phase(), Phase::Open);
}

#[test]
fn test_zoom_is_reset_when_leaving_slide() {
    let mut fx = Fixture::new(3);
    fx.open(1);
    fx.lightbox.pointer_down(PointerInput::touch(1, 400.0, 400.0));
    fx.lightbox.pointer_down(PointerInput::touch(2, 600.0, 400.0));
    fx.lightbox.pointer_move(PointerInput::touch(2, 900.0, 400.0));
    fx.lightbox.pointer_up(PointerInput::touch(2, 900.0, 400.0));
    fx.lightbox.pointer_up(PointerInput::touch(1, 400.0, 400.0));

    fx.lightbox.next().unwrap();
    let (_, previous) = fx.host().slide_at(1).unwrap();
    assert_eq!(previous.zoom, ZoomState::identity());
}

#[test]
fn test_gestures_ignored_until_open() {
    let mut fx = Fixture::new(3);
    assert!(!fx.lightbox.pointer_down(PointerInput::touch(1, 500.0, 400.0)));

    let trigger = fx.triggers[0];
    fx.lightbox.open(&trigger);
    assert_eq!(fx.lightbox.phase(), Phase::Opening);
    assert!(!fx.lightbox.pointer_down(PointerInput::touch(1, 500.0, 400.0)));
}

#[test]
fn test_mouse_drags_need_simulate_touch() {
    let options = Options {
        simulate_touch: false,
        ..Options::default()
    };
    let mut fx = Fixture::with_options(3, options);
    fx.open(0);
    assert!(!fx.host().slider.as_ref().unwrap().draggable);

    assert!(!fx.lightbox.pointer_down(PointerInput::mouse(600.0, 400.0)));
    fx.lightbox.pointer_move(PointerInput::mouse(300.0, 400.0));
    fx.lightbox.pointer_up(PointerInput::mouse(300.0, 400.0));
    assert_eq!(fx.lightbox.current_index(), Some(0));

    swipe(&mut fx, (600.0, 400.0), (300.0, 400.0));
    assert_eq!(fx.lightbox.current_index(), Some(1));
}

#[test]
fn test_slider_marked_draggable_with_simulated_touch() {
    let mut fx = Fixture::new(2);
    fx.open(0);
    assert!(fx.host().slider.as_ref().unwrap().draggable);
}

#[test]
fn test_cancel_snaps_back() {
    let mut fx = Fixture::new(3);
    fx.open(1);
    fx.lightbox.pointer_down(PointerInput::touch(1, 500.0, 400.0));
    fx.lightbox.pointer_move(PointerInput::touch(1, 420.0, 400.0));
    fx.lightbox.pointer_cancel();
    assert_eq!(fx.lightbox.current_index(), Some(1));
    assert_eq!(fx.host().slider_x(), Some(-1000.0));
}
