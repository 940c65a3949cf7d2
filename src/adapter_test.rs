#![allow(clippy::float_cmp)]

use std::cell::Cell;
use std::f64::consts::FRAC_PI_2;
use std::rc::Rc;

use super::*;
use crate::geom::{AngleUnit, Rect};
use crate::node::{Listener, NodeEvent, TRANSFORM_CHANGE_EVENTS};
use crate::shape::BasicShape;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn rect_approx_eq(a: &OrientedRect, b: &OrientedRect) -> bool {
    approx_eq(a.x, b.x)
        && approx_eq(a.y, b.y)
        && approx_eq(a.width, b.width)
        && approx_eq(a.height, b.height)
        && approx_eq(a.rotation, b.rotation)
}

// =============================================================
// ApplyFlag
// =============================================================

#[test]
fn flag_starts_lowered() {
    assert!(!ApplyFlag::new().is_applying());
}

#[test]
fn guard_raises_and_lowers_flag() {
    let flag = ApplyFlag::new();
    {
        let guard = flag.hold();
        assert!(guard.is_some());
        assert!(flag.is_applying());
    }
    assert!(!flag.is_applying());
}

#[test]
fn second_hold_is_refused_while_first_is_alive() {
    let flag = ApplyFlag::new();
    let shared = flag.clone();
    let _first = flag.hold();
    assert!(shared.hold().is_none());
    assert!(shared.is_applying());
}

// =============================================================
// node_rect
// =============================================================

#[test]
fn node_rect_identity_transform() {
    let shape = BasicShape::new(100.0, 50.0).at(10.0, 20.0);
    let r = node_rect(&shape);
    assert_eq!(r, OrientedRect { x: 10.0, y: 20.0, width: 100.0, height: 50.0, rotation: 0.0 });
}

#[test]
fn node_rect_applies_scale_to_size_and_box_origin() {
    let mut shape = BasicShape::with_bounds(Rect::new(-10.0, -5.0, 20.0, 10.0)).at(100.0, 100.0);
    shape.set_scale(Point::new(2.0, 3.0));
    let r = node_rect(&shape);
    assert!(approx_eq(r.x, 80.0));
    assert!(approx_eq(r.y, 85.0));
    assert!(approx_eq(r.width, 40.0));
    assert!(approx_eq(r.height, 30.0));
}

#[test]
fn node_rect_subtracts_offset() {
    let mut shape = BasicShape::new(40.0, 40.0).at(100.0, 100.0);
    shape.set_offset(Point::new(20.0, 20.0));
    let r = node_rect(&shape);
    assert!(approx_eq(r.x, 80.0));
    assert!(approx_eq(r.y, 80.0));
}

#[test]
fn node_rect_rotates_box_origin_about_position() {
    let mut shape = BasicShape::with_bounds(Rect::new(10.0, 0.0, 20.0, 10.0)).at(0.0, 0.0);
    shape.set_rotation(90.0);
    let r = node_rect(&shape);
    assert!(approx_eq(r.x, 0.0));
    assert!(approx_eq(r.y, 10.0));
    assert!(approx_eq(r.rotation, FRAC_PI_2));
}

#[test]
fn node_rect_reads_radian_nodes() {
    let mut shape = BasicShape::new(10.0, 10.0).in_unit(AngleUnit::Radians);
    shape.set_rotation(FRAC_PI_2);
    assert!(approx_eq(node_rect(&shape).rotation, FRAC_PI_2));
}

// =============================================================
// fit_node_into
// =============================================================

#[test]
fn fit_roundtrip_does_not_drift() {
    let mut shape = BasicShape::new(100.0, 50.0).at(30.0, 40.0);
    let flag = ApplyFlag::new();
    let r = node_rect(&shape);

    assert!(fit_node_into(&mut shape, &FitTarget::from(r), &flag).unwrap());

    assert_eq!(shape.position(), Point::new(30.0, 40.0));
    assert_eq!(shape.scale(), Point::new(1.0, 1.0));
}

#[test]
fn fit_solves_scale_from_box() {
    let mut shape = BasicShape::new(100.0, 50.0);
    let flag = ApplyFlag::new();
    fit_node_into(&mut shape, &FitTarget::resize(0.0, 0.0, 200.0, 25.0), &flag).unwrap();
    assert_eq!(shape.scale(), Point::new(2.0, 0.5));
}

#[test]
fn fit_then_rect_reproduces_target_with_rotation_and_offset() {
    let mut shape = BasicShape::with_bounds(Rect::new(-15.0, 4.0, 30.0, 12.0)).at(7.0, 9.0);
    shape.set_offset(Point::new(3.0, -2.0));
    let flag = ApplyFlag::new();
    let target = OrientedRect { x: 50.0, y: -20.0, width: 90.0, height: 24.0, rotation: 0.6 };

    fit_node_into(&mut shape, &FitTarget::from(target), &flag).unwrap();

    assert!(rect_approx_eq(&node_rect(&shape), &target));
}

#[test]
fn fit_without_rotation_keeps_node_rotation() {
    let mut shape = BasicShape::new(10.0, 10.0);
    shape.set_rotation(30.0);
    let flag = ApplyFlag::new();
    fit_node_into(&mut shape, &FitTarget::resize(0.0, 0.0, 20.0, 20.0), &flag).unwrap();
    assert_eq!(shape.rotation(), 30.0);
}

#[test]
fn fit_writes_rotation_in_node_unit() {
    let mut degrees = BasicShape::new(10.0, 10.0);
    let mut radians = BasicShape::new(10.0, 10.0).in_unit(AngleUnit::Radians);
    let flag = ApplyFlag::new();
    let target = OrientedRect { x: 0.0, y: 0.0, width: 10.0, height: 10.0, rotation: FRAC_PI_2 };

    fit_node_into(&mut degrees, &FitTarget::from(target), &flag).unwrap();
    fit_node_into(&mut radians, &FitTarget::from(target), &flag).unwrap();

    assert!(approx_eq(degrees.rotation(), 90.0));
    assert!(approx_eq(radians.rotation(), FRAC_PI_2));
}

#[test]
fn fit_twice_is_bit_identical() {
    let mut shape = BasicShape::with_bounds(Rect::new(-3.0, 2.0, 17.0, 9.0)).at(1.0, 1.0);
    let flag = ApplyFlag::new();
    let target = FitTarget { x: 12.3, y: 45.6, width: 78.9, height: 10.1, rotation: Some(1.234) };

    fit_node_into(&mut shape, &target, &flag).unwrap();
    let (scale, position, rotation) = (shape.scale(), shape.position(), shape.rotation());
    fit_node_into(&mut shape, &target, &flag).unwrap();

    assert_eq!(shape.scale().x.to_bits(), scale.x.to_bits());
    assert_eq!(shape.scale().y.to_bits(), scale.y.to_bits());
    assert_eq!(shape.position().x.to_bits(), position.x.to_bits());
    assert_eq!(shape.position().y.to_bits(), position.y.to_bits());
    assert_eq!(shape.rotation().to_bits(), rotation.to_bits());
}

#[test]
fn fit_zero_width_box_gives_finite_scale() {
    let mut shape = BasicShape::new(0.0, 50.0);
    let flag = ApplyFlag::new();
    fit_node_into(&mut shape, &FitTarget::resize(0.0, 0.0, 40.0, 50.0), &flag).unwrap();
    assert!(shape.scale().is_finite());
    assert!(shape.position().is_finite());
}

#[test]
fn fit_rejects_non_finite_target_and_leaves_node() {
    let mut shape = BasicShape::new(10.0, 10.0).at(5.0, 5.0);
    let flag = ApplyFlag::new();
    let err = fit_node_into(&mut shape, &FitTarget::resize(f64::NAN, 0.0, 10.0, 10.0), &flag).unwrap_err();
    assert!(matches!(err, TransformerError::NonFiniteGeometry { field: "x" }));
    assert_eq!(shape.position(), Point::new(5.0, 5.0));
    assert!(!flag.is_applying());
}

#[test]
fn fit_rejects_non_finite_box_and_restores_rotation() {
    let mut shape = BasicShape::new(f64::NAN, 10.0);
    shape.set_rotation(10.0);
    let flag = ApplyFlag::new();
    let target = FitTarget { x: 0.0, y: 0.0, width: 10.0, height: 10.0, rotation: Some(1.0) };

    let err = fit_node_into(&mut shape, &target, &flag).unwrap_err();

    assert_eq!(err.error_code(), "E_NON_FINITE_GEOMETRY");
    assert_eq!(shape.rotation(), 10.0);
    assert_eq!(shape.scale(), Point::new(1.0, 1.0));
}

#[test]
fn fit_is_skipped_while_flag_is_held() {
    let mut shape = BasicShape::new(10.0, 10.0);
    let flag = ApplyFlag::new();
    let _held = flag.hold();
    let applied = fit_node_into(&mut shape, &FitTarget::resize(0.0, 0.0, 99.0, 99.0), &flag).unwrap();
    assert!(!applied);
    assert_eq!(shape.scale(), Point::new(1.0, 1.0));
}

#[test]
fn listeners_see_flag_raised_during_fit() {
    let mut shape = BasicShape::new(10.0, 10.0);
    let flag = ApplyFlag::new();
    let observed_outside = Rc::new(Cell::new(0_u32));
    let observed_inside = Rc::new(Cell::new(0_u32));

    let (outside, inside, probe) = (Rc::clone(&observed_outside), Rc::clone(&observed_inside), flag.clone());
    let listener: Listener = Rc::new(move |_: NodeEvent| {
        if probe.is_applying() {
            inside.set(inside.get() + 1);
        } else {
            outside.set(outside.get() + 1);
        }
    });
    shape.subscribe(&TRANSFORM_CHANGE_EVENTS, listener);

    fit_node_into(&mut shape, &FitTarget::resize(3.0, 4.0, 20.0, 30.0), &flag).unwrap();
    shape.set_position(Point::new(0.0, 0.0));

    assert_eq!(observed_inside.get(), 4);
    assert_eq!(observed_outside.get(), 2);
}
