use std::cell::RefCell;
use std::rc::Rc;

use egui::{PointerButton, Pos2, Vec2};

use super::{DragHandle, DragHandleOptions, DragPhase};
use crate::{DefaultAction, PointerEvent, PointerEventKind, PointerRegistry};

fn recording_handle(registry: &PointerRegistry) -> (DragHandle, Rc<RefCell<Vec<Vec2>>>) {
    let deltas: Rc<RefCell<Vec<Vec2>>> = Rc::default();
    let handle = DragHandle::new(registry).with_on_drag({
        let deltas = Rc::clone(&deltas);
        move |delta| deltas.borrow_mut().push(delta)
    });
    (handle, deltas)
}

fn move_to(registry: &PointerRegistry, x: f32, y: f32) -> crate::DispatchOutcome {
    registry.dispatch(&PointerEvent::Moved {
        pos: Pos2::new(x, y),
    })
}

fn release(registry: &PointerRegistry, button: PointerButton) {
    registry.dispatch(&PointerEvent::Released { button, pos: None });
}

fn assert_no_listeners(registry: &PointerRegistry) {
    assert!(registry.is_empty(), "listeners leaked: {registry:?}");
}

#[test]
fn press_move_release_reports_incremental_deltas() {
    let registry = PointerRegistry::new();
    let (handle, deltas) = recording_handle(&registry);

    handle.press(Pos2::new(10.0, 10.0));
    move_to(&registry, 15.0, 12.0);
    move_to(&registry, 20.0, 20.0);
    release(&registry, PointerButton::Primary);
    move_to(&registry, 100.0, 100.0);

    assert_eq!(*deltas.borrow(), vec![Vec2::new(5.0, 2.0), Vec2::new(5.0, 8.0)]);
    assert!(!handle.is_dragging());
    assert_no_listeners(&registry);
}

#[test]
fn teardown_while_dragging_leaves_nothing_behind() {
    let registry = PointerRegistry::new();
    let (handle, deltas) = recording_handle(&registry);

    handle.press(Pos2::ZERO);
    assert_eq!(registry.listener_count(PointerEventKind::Move), 1);
    assert_eq!(registry.listener_count(PointerEventKind::Release), 1);
    drop(handle);

    let outcome = move_to(&registry, 50.0, 50.0);
    assert_eq!(outcome.notified, 0);
    assert!(deltas.borrow().is_empty());
    assert_no_listeners(&registry);
}

#[test]
fn explicit_teardown_keeps_handle_usable() {
    let registry = PointerRegistry::new();
    let (handle, deltas) = recording_handle(&registry);

    handle.press(Pos2::ZERO);
    assert!(handle.teardown());
    assert!(!handle.teardown());
    move_to(&registry, 1.0, 1.0);
    assert!(deltas.borrow().is_empty());

    handle.press(Pos2::new(1.0, 1.0));
    move_to(&registry, 2.0, 3.0);
    assert_eq!(*deltas.borrow(), vec![Vec2::new(1.0, 2.0)]);
}

#[test]
fn phase_follows_the_state_machine() {
    let registry = PointerRegistry::new();
    let handle = DragHandle::new(&registry);
    assert_eq!(handle.phase(), DragPhase::Idle);
    assert_eq!(handle.session_id(), None);

    assert_eq!(handle.press(Pos2::new(1.0, 2.0)), 1);
    handle.move_to(Pos2::new(4.0, 6.0));
    assert_eq!(
        handle.phase(),
        DragPhase::Dragging {
            start: Pos2::new(1.0, 2.0),
            last: Pos2::new(4.0, 6.0),
        }
    );

    assert!(handle.release());
    assert!(!handle.release());
    assert_eq!(handle.phase(), DragPhase::Idle);
    assert_eq!(handle.press(Pos2::ZERO), 2);
}

#[test]
fn moving_while_idle_is_a_no_op() {
    let registry = PointerRegistry::new();
    let (handle, deltas) = recording_handle(&registry);
    assert_eq!(handle.move_to(Pos2::new(3.0, 3.0)), None);
    assert!(deltas.borrow().is_empty());
}

#[test]
fn handle_without_callback_still_tracks_pointer() {
    let registry = PointerRegistry::new();
    let handle = DragHandle::new(&registry);
    handle.press(Pos2::new(2.0, 2.0));
    assert_eq!(handle.move_to(Pos2::new(5.0, 1.0)), Some(Vec2::new(3.0, -1.0)));
    assert!(handle.is_dragging());
}

#[test]
fn second_press_replaces_the_session() {
    let registry = PointerRegistry::new();
    let (handle, deltas) = recording_handle(&registry);

    handle.press(Pos2::new(0.0, 0.0));
    handle.press(Pos2::new(10.0, 10.0));
    assert_eq!(registry.listener_count(PointerEventKind::Move), 1);
    assert_eq!(registry.listener_count(PointerEventKind::Release), 1);

    let outcome = move_to(&registry, 11.0, 10.0);
    assert_eq!(outcome.notified, 1);
    assert_eq!(*deltas.borrow(), vec![Vec2::new(1.0, 0.0)]);
}

#[test]
fn only_the_pressed_button_ends_the_drag() {
    let registry = PointerRegistry::new();
    let options = DragHandleOptions {
        button: PointerButton::Secondary,
        ..Default::default()
    };
    let handle = DragHandle::new_with_options(&registry, options);

    handle.press(Pos2::ZERO);
    release(&registry, PointerButton::Primary);
    assert!(handle.is_dragging());
    release(&registry, PointerButton::Secondary);
    assert!(!handle.is_dragging());
    assert_no_listeners(&registry);
}

#[test]
fn moves_prevent_default_unless_disabled() {
    let registry = PointerRegistry::new();
    let mut handle = DragHandle::new(&registry);
    handle.press(Pos2::ZERO);
    assert!(move_to(&registry, 1.0, 0.0).default_prevented);

    handle.set_options(DragHandleOptions {
        prevent_default_on_move: false,
        ..Default::default()
    });
    let outcome = move_to(&registry, 2.0, 0.0);
    assert_eq!(outcome.notified, 1);
    assert!(!outcome.default_prevented);
}

#[test]
fn zero_deltas_can_be_skipped() {
    let registry = PointerRegistry::new();
    let (mut handle, deltas) = recording_handle(&registry);
    handle.set_options(DragHandleOptions {
        skip_zero_deltas: true,
        ..Default::default()
    });

    handle.press(Pos2::new(5.0, 5.0));
    move_to(&registry, 5.0, 5.0);
    move_to(&registry, 6.0, 5.0);
    move_to(&registry, 6.0, 5.0);
    assert_eq!(*deltas.borrow(), vec![Vec2::new(1.0, 0.0)]);
}

#[test]
fn cleared_callback_stops_notifications() {
    let registry = PointerRegistry::new();
    let (mut handle, deltas) = recording_handle(&registry);
    handle.press(Pos2::ZERO);
    move_to(&registry, 1.0, 1.0);
    handle.clear_on_drag();
    move_to(&registry, 2.0, 2.0);
    assert_eq!(deltas.borrow().len(), 1);
    assert!(handle.is_dragging());
}

#[test]
fn handles_drag_independently() {
    let registry = PointerRegistry::new();
    let (a, a_deltas) = recording_handle(&registry);
    let (b, b_deltas) = recording_handle(&registry);

    a.press(Pos2::ZERO);
    move_to(&registry, 1.0, 0.0);
    b.press(Pos2::new(1.0, 0.0));
    move_to(&registry, 3.0, 0.0);
    release(&registry, PointerButton::Primary);

    assert_eq!(*a_deltas.borrow(), vec![Vec2::new(1.0, 0.0), Vec2::new(2.0, 0.0)]);
    assert_eq!(*b_deltas.borrow(), vec![Vec2::new(2.0, 0.0)]);
    assert_no_listeners(&registry);
}

#[test]
fn callback_sees_deltas_in_order_with_other_listeners() {
    let registry = PointerRegistry::new();
    let seen: Rc<RefCell<Vec<&'static str>>> = Rc::default();

    let _before = registry.subscribe(PointerEventKind::Move, {
        let seen = Rc::clone(&seen);
        move |_| {
            seen.borrow_mut().push("observer");
            DefaultAction::Allow
        }
    });
    let handle = DragHandle::new(&registry).with_on_drag({
        let seen = Rc::clone(&seen);
        move |_| seen.borrow_mut().push("handle")
    });

    handle.press(Pos2::ZERO);
    move_to(&registry, 1.0, 1.0);
    assert_eq!(*seen.borrow(), vec!["observer", "handle"]);
}
