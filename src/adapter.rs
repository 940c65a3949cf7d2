//! Node ↔ oriented rectangle conversion.
//!
//! DESIGN
//! ======
//! The forward pass reads a node's untransformed bounding box and its
//! position/scale/offset/rotation and reports where that box sits in parent
//! space. The inverse pass takes a desired oriented rectangle and solves for
//! the scale and position that put the node's box exactly there. Both sides
//! use the same offset term, so forward(inverse(r)) == r up to rounding.
//!
//! Applying attributes fires the node's own change notifications. Those are
//! wired back into the transformer's refresh, so the inverse pass holds an
//! [`ApplyGuard`] for its whole duration and listeners check
//! [`ApplyFlag::is_applying`] before scheduling work.

#[cfg(test)]
#[path = "adapter_test.rs"]
mod adapter_test;

use std::cell::Cell;
use std::rc::Rc;

use crate::consts::MIN_BOX_DIMENSION;
use crate::error::TransformerError;
use crate::geom::{OrientedRect, Point};
use crate::node::TransformableNode;

// =============================================================================
// RE-ENTRANCY
// =============================================================================

/// Shared "attributes are being applied" flag.
///
/// Cloning shares the flag, so a listener closure can hold a clone while the
/// transformer keeps its own.
#[derive(Debug, Clone, Default)]
pub struct ApplyFlag(Rc<Cell<bool>>);

impl ApplyFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_applying(&self) -> bool {
        self.0.get()
    }

    /// Raise the flag. Returns `None` if it is already raised.
    #[must_use]
    pub fn hold(&self) -> Option<ApplyGuard> {
        if self.0.replace(true) {
            return None;
        }
        Some(ApplyGuard(Rc::clone(&self.0)))
    }
}

/// Lowers the [`ApplyFlag`] when dropped.
#[derive(Debug)]
pub struct ApplyGuard(Rc<Cell<bool>>);

impl Drop for ApplyGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

// =============================================================================
// FORWARD
// =============================================================================

/// The node's bounding box as an oriented rectangle in parent space.
#[must_use]
pub fn node_rect(node: &dyn TransformableNode) -> OrientedRect {
    let rect = node.local_bounding_box();
    let scale = node.scale();
    let offset = node.offset();
    let rotation = node.angle_unit().to_radians(node.rotation());

    let d = Point::new(rect.x * scale.x - offset.x, rect.y * scale.y - offset.y);
    let origin = node.position() + d.rotated(rotation);

    OrientedRect {
        x: origin.x,
        y: origin.y,
        width: rect.width * scale.x,
        height: rect.height * scale.y,
        rotation,
    }
}

// =============================================================================
// INVERSE
// =============================================================================

/// Where the node's box should end up.
///
/// `rotation` is radians; `None` keeps the node's current rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitTarget {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: Option<f64>,
}

impl FitTarget {
    /// Resize target that keeps the current rotation.
    #[must_use]
    pub fn resize(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height, rotation: None }
    }

    fn non_finite_field(&self) -> Option<&'static str> {
        let rect = OrientedRect {
            x: self.x,
            y: self.y,
            width: self.width,
            height: self.height,
            rotation: self.rotation.unwrap_or(0.0),
        };
        rect.non_finite_field()
    }
}

impl From<OrientedRect> for FitTarget {
    fn from(r: OrientedRect) -> Self {
        Self { x: r.x, y: r.y, width: r.width, height: r.height, rotation: Some(r.rotation) }
    }
}

/// Solve for scale and position so the node's box matches `target`.
///
/// Returns `Ok(false)` without touching the node when called while `flag` is
/// already held.
///
/// # Errors
///
/// Returns `NonFiniteGeometry` if the target or the solved transform contains
/// NaN or infinity. The node is left as it was.
pub fn fit_node_into(
    node: &mut dyn TransformableNode,
    target: &FitTarget,
    flag: &ApplyFlag,
) -> Result<bool, TransformerError> {
    if let Some(field) = target.non_finite_field() {
        return Err(TransformerError::NonFiniteGeometry { field });
    }
    let Some(_guard) = flag.hold() else {
        tracing::debug!("fit_node_into re-entered while applying; ignored");
        return Ok(false);
    };

    let unit = node.angle_unit();
    let previous_rotation = node.rotation();
    if let Some(rotation) = target.rotation {
        node.set_rotation(unit.from_radians(rotation));
    }

    let bbox = node.local_bounding_box();
    let scale = Point::new(target.width / clamp_dimension(bbox.width), target.height / clamp_dimension(bbox.height));
    let rotation = unit.to_radians(node.rotation());
    let offset = node.offset();

    let d = Point::new(bbox.x * scale.x - offset.x, bbox.y * scale.y - offset.y);
    let position = Point::new(target.x, target.y) - d.rotated(rotation);

    if !scale.is_finite() || !position.is_finite() {
        node.set_rotation(previous_rotation);
        let field = if scale.is_finite() { "position" } else { "scale" };
        return Err(TransformerError::NonFiniteGeometry { field });
    }

    node.set_scale(scale);
    node.set_position(position);
    Ok(true)
}

/// Keep a box dimension away from zero so dividing by it stays finite.
fn clamp_dimension(value: f64) -> f64 {
    if value.abs() < MIN_BOX_DIMENSION {
        MIN_BOX_DIMENSION.copysign(value)
    } else {
        value
    }
}
