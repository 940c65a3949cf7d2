#![allow(clippy::float_cmp)]

use std::cell::RefCell;
use std::rc::Rc;

use super::*;

fn recorder() -> (Rc<RefCell<Vec<NodeEvent>>>, Listener) {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let listener: Listener = Rc::new(move |event: NodeEvent| sink.borrow_mut().push(event));
    (seen, listener)
}

// =============================================================
// Construction
// =============================================================

#[test]
fn new_shape_has_identity_transform() {
    let shape = BasicShape::new(100.0, 50.0);
    assert_eq!(shape.local_bounding_box(), Rect::new(0.0, 0.0, 100.0, 50.0));
    assert_eq!(shape.position(), Point::new(0.0, 0.0));
    assert_eq!(shape.scale(), Point::new(1.0, 1.0));
    assert_eq!(shape.rotation(), 0.0);
    assert_eq!(shape.offset(), Point::new(0.0, 0.0));
    assert_eq!(shape.angle_unit(), AngleUnit::Degrees);
    assert_eq!(shape.listener_count(), 0);
}

#[test]
fn builders_set_position_and_unit() {
    let shape = BasicShape::new(10.0, 10.0).at(3.0, 4.0).in_unit(AngleUnit::Radians);
    assert_eq!(shape.position(), Point::new(3.0, 4.0));
    assert_eq!(shape.angle_unit(), AngleUnit::Radians);
}

#[test]
fn with_bounds_keeps_non_zero_origin() {
    let shape = BasicShape::with_bounds(Rect::new(-20.0, -20.0, 40.0, 40.0));
    assert_eq!(shape.local_bounding_box().origin(), Point::new(-20.0, -20.0));
}

// =============================================================
// Notifications
// =============================================================

#[test]
fn setters_notify_subscribed_events_only() {
    let mut shape = BasicShape::new(10.0, 10.0);
    let (seen, listener) = recorder();
    shape.subscribe(&[NodeEvent::XChange, NodeEvent::ScaleYChange], listener);

    shape.set_position(Point::new(5.0, 7.0));
    shape.set_scale(Point::new(2.0, 3.0));
    shape.set_rotation(45.0);

    assert_eq!(*seen.borrow(), vec![NodeEvent::XChange, NodeEvent::ScaleYChange]);
}

#[test]
fn unchanged_values_do_not_notify() {
    let mut shape = BasicShape::new(10.0, 10.0);
    let (seen, listener) = recorder();
    shape.subscribe(&[NodeEvent::XChange, NodeEvent::YChange, NodeEvent::RotationChange], listener);

    shape.set_position(Point::new(0.0, 0.0));
    shape.set_rotation(0.0);

    assert!(seen.borrow().is_empty());
}

#[test]
fn drag_to_fires_drag_move_after_position_changes() {
    let mut shape = BasicShape::new(10.0, 10.0);
    let (seen, listener) = recorder();
    shape.subscribe(&[NodeEvent::XChange, NodeEvent::DragMove], listener);

    shape.drag_to(Point::new(1.0, 0.0));

    assert_eq!(*seen.borrow(), vec![NodeEvent::XChange, NodeEvent::DragMove]);
}

#[test]
fn set_bounds_and_offset_notify() {
    let mut shape = BasicShape::new(10.0, 10.0);
    let (seen, listener) = recorder();
    shape.subscribe(
        &[NodeEvent::WidthChange, NodeEvent::HeightChange, NodeEvent::OffsetXChange, NodeEvent::OffsetYChange],
        listener,
    );

    shape.set_bounds(Rect::new(0.0, 0.0, 20.0, 10.0));
    shape.set_offset(Point::new(1.0, 1.0));

    assert_eq!(
        *seen.borrow(),
        vec![NodeEvent::WidthChange, NodeEvent::OffsetXChange, NodeEvent::OffsetYChange]
    );
}

#[test]
fn fire_records_and_dispatches() {
    let mut shape = BasicShape::new(10.0, 10.0);
    let (seen, listener) = recorder();
    shape.subscribe(&[NodeEvent::Transform], listener);

    shape.fire(NodeEvent::Transform);
    shape.fire(NodeEvent::TransformEnd);

    assert_eq!(shape.fired(), &[NodeEvent::Transform, NodeEvent::TransformEnd]);
    assert_eq!(*seen.borrow(), vec![NodeEvent::Transform]);
}

#[test]
fn unsubscribe_removes_only_that_listener() {
    let mut shape = BasicShape::new(10.0, 10.0);
    let (_, a) = recorder();
    let (_, b) = recorder();
    let id_a = shape.subscribe(&[NodeEvent::XChange], a);
    shape.subscribe(&[NodeEvent::XChange], b);

    assert!(shape.unsubscribe(id_a));
    assert!(!shape.unsubscribe(id_a));
    assert_eq!(shape.listener_count(), 1);
}

#[test]
fn request_redraw_counts() {
    let mut shape = BasicShape::new(10.0, 10.0);
    shape.request_redraw();
    shape.request_redraw();
    assert_eq!(shape.redraw_requests(), 2);
}

#[test]
fn debug_format_hides_listener_closures() {
    let shape = BasicShape::new(1.0, 1.0);
    let s = format!("{shape:?}");
    assert!(s.contains("BasicShape"));
    assert!(s.contains("listeners: 0"));
}
