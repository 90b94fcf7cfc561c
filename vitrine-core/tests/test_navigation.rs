#![cfg(feature = "test-utils")]
mod support;
use crate::support::Fixture;
use std::cell::RefCell;
use std::rc::Rc;
use vitrine_core::mock::MockHost;
use vitrine_core::navigation::Control;
use vitrine_core::{EventKind, LightboxError, Phase};

/// The parts of the page a select is allowed to touch.
fn snapshot(host: &MockHost) -> impl PartialEq + std::fmt::Debug {
    (
        host.slides.clone(),
        host.slider.clone(),
        host.controls.clone(),
        host.focused,
        host.events.len(),
    )
}

#[test]
fn test_select_marks_exactly_one_active_slide() {
    let mut fx = Fixture::new(5);
    fx.open(0);

    for index in [3, 1, 4, 0, 2] {
        fx.lightbox.select(index).unwrap();
        assert_eq!(fx.lightbox.current_index(), Some(index));
        assert_eq!(fx.host().active_slides(), vec![index]);
        assert_eq!(fx.host().slider_x(), Some(-(index as f64) * 1000.0));
        fx.settle();
    }
}

#[test]
fn test_invalid_select_changes_nothing() {
    let mut fx = Fixture::new(3);
    fx.open(1);
    let before = snapshot(fx.host());

    assert_eq!(
        fx.lightbox.select(1),
        Err(LightboxError::AlreadySelected { index: 1 })
    );
    assert_eq!(
        fx.lightbox.select(3),
        Err(LightboxError::OutOfRange { index: 3, len: 3 })
    );
    assert_eq!(
        fx.lightbox.select_value(-1.0),
        Err(LightboxError::OutOfRange { index: -1, len: 3 })
    );
    assert!(matches!(
        fx.lightbox.select_value(f64::NAN),
        Err(LightboxError::InvalidIndex { .. })
    ));
    assert!(matches!(
        fx.lightbox.select_value(0.5),
        Err(LightboxError::InvalidIndex { .. })
    ));

    assert_eq!(fx.lightbox.current_index(), Some(1));
    assert_eq!(snapshot(fx.host()), before);
}

#[test]
fn test_select_while_closed_is_an_error() {
    let mut fx = Fixture::new(3);
    assert_eq!(fx.lightbox.select(1), Err(LightboxError::NotOpen));
    assert_eq!(fx.lightbox.next(), Err(LightboxError::NotOpen));
    assert_eq!(fx.lightbox.previous(), Err(LightboxError::NotOpen));
    assert_eq!(fx.lightbox.current_index(), None);
}

#[test]
fn test_select_value_accepts_whole_numbers() {
    let mut fx = Fixture::new(3);
    fx.open(0);
    fx.lightbox.select_value(2.0).unwrap();
    assert_eq!(fx.lightbox.current_index(), Some(2));
}

#[test]
fn test_previous_and_next_stop_at_bounds() {
    let mut fx = Fixture::new(3);
    fx.open(0);
    let events = fx.host().events.len();

    fx.lightbox.previous().unwrap();
    assert_eq!(fx.lightbox.current_index(), Some(0));
    assert_eq!(fx.host().events.len(), events);

    fx.lightbox.select(2).unwrap();
    let events = fx.host().events.len();
    fx.lightbox.next().unwrap();
    assert_eq!(fx.lightbox.current_index(), Some(2));
    assert_eq!(fx.host().events.len(), events);
}

#[test]
fn test_counter_runs_from_first_to_last() {
    let mut fx = Fixture::new(4);
    fx.open(0);
    assert_eq!(fx.host().counter(), Some("1/4"));
    let controls = fx.host().controls.clone().unwrap();
    assert!(controls.previous.disabled);
    assert!(!controls.next.disabled);

    fx.lightbox.select(3).unwrap();
    assert_eq!(fx.host().counter(), Some("4/4"));
    let controls = fx.host().controls.clone().unwrap();
    assert!(controls.next.disabled);
    assert!(!controls.previous.disabled);
}

#[test]
fn test_single_image_hides_navigation() {
    let mut fx = Fixture::new(1);
    fx.open(0);
    let controls = fx.host().controls.clone().unwrap();
    assert!(controls.previous.hidden && controls.next.hidden);
    assert!(controls.counter_hidden);
    assert_eq!(fx.host().focused, Some(fx.host().control(Control::Close)));
}

#[test]
fn test_three_image_walkthrough() {
    let mut fx = Fixture::new(3);
    let selected = Rc::new(RefCell::new(Vec::new()));
    let log = selected.clone();
    fx.lightbox.on(EventKind::Select, move |event| {
        log.borrow_mut().push((event.index, event.source));
    });

    fx.open(0);
    assert_eq!(fx.lightbox.current_index(), Some(0));

    fx.lightbox.next().unwrap();
    assert_eq!(fx.lightbox.current_index(), Some(1));
    assert_eq!(*selected.borrow(), vec![(Some(1), Some(fx.triggers[1]))]);

    fx.lightbox.next().unwrap();
    assert_eq!(fx.lightbox.current_index(), Some(2));
    assert!(fx.host().controls.as_ref().unwrap().next.disabled);

    fx.lightbox.next().unwrap();
    assert_eq!(fx.lightbox.current_index(), Some(2));
    assert_eq!(selected.borrow().len(), 2);
}

#[test]
fn test_focus_follows_direction_of_travel() {
    let mut fx = Fixture::new(4);
    fx.open(0);
    assert_eq!(fx.host().focused, Some(fx.host().control(Control::Next)));

    fx.lightbox.select(2).unwrap();
    assert_eq!(fx.host().focused, Some(fx.host().control(Control::Next)));

    fx.lightbox.previous().unwrap();
    assert_eq!(fx.host().focused, Some(fx.host().control(Control::Previous)));

    fx.lightbox.select(3).unwrap();
    assert_eq!(fx.host().focused, Some(fx.host().control(Control::Previous)));
}

#[test]
fn test_neighbours_are_preloaded() {
    let mut fx = Fixture::new(5);
    fx.open(2);
    assert!(fx.host().slide_at(1).is_some());
    assert!(fx.host().slide_at(3).is_some());
    assert!(fx.host().slide_at(4).is_none());

    fx.lightbox.next().unwrap();
    assert!(fx.host().slide_at(4).is_some());
    assert!(fx.host().slide_at(0).is_none());
}

#[test]
fn test_select_during_opening_completes_on_new_slide() {
    let mut fx = Fixture::new(3);
    let trigger = fx.triggers[0];
    fx.lightbox.open(&trigger);
    assert_eq!(fx.lightbox.phase(), Phase::Opening);

    fx.lightbox.select(2).unwrap();
    fx.settle();

    assert_eq!(fx.lightbox.phase(), Phase::Open);
    let open = fx
        .host()
        .events
        .iter()
        .find(|event| event.kind == EventKind::Open)
        .cloned()
        .unwrap();
    assert_eq!(open.index, Some(2));
    assert_eq!(open.source, Some(fx.triggers[2]));
}

#[test]
fn test_select_during_opening_onto_loaded_slide_completes_open() {
    let mut fx = Fixture::new(3);
    let trigger = fx.triggers[0];
    fx.lightbox.open(&trigger);
    fx.lightbox.select(1).unwrap();
    fx.lightbox.select(0).unwrap();

    let (slide, _) = fx.host().slide_at(1).unwrap();
    let signal = fx.host_mut().resolve_load(slide).unwrap();
    fx.lightbox.handle_signal(signal);
    assert_eq!(fx.lightbox.phase(), Phase::Opening);

    fx.lightbox.select(1).unwrap();
    assert_eq!(fx.lightbox.phase(), Phase::Open);
    assert_eq!(
        fx.host().event_kinds(),
        vec![
            EventKind::Select,
            EventKind::Select,
            EventKind::Select,
            EventKind::Open
        ]
    );
    let open = fx.host().events.last().cloned().unwrap();
    assert_eq!(open.index, Some(1));
    assert_eq!(open.source, Some(fx.triggers[1]));

    fx.settle();
    assert_eq!(fx.lightbox.phase(), Phase::Open);
    assert_eq!(fx.host().active_slides(), vec![1]);
}

#[test]
fn test_off_stops_delivery() {
    let mut fx = Fixture::new(3);
    let count = Rc::new(RefCell::new(0));
    let counter = count.clone();
    let id = fx
        .lightbox
        .on(EventKind::Select, move |_| *counter.borrow_mut() += 1);

    fx.open(0);
    fx.lightbox.next().unwrap();
    assert!(fx.lightbox.off(EventKind::Select, id));
    fx.lightbox.next().unwrap();

    assert_eq!(*count.borrow(), 1);
    assert!(!fx.lightbox.off(EventKind::Select, id));
}
