//! Drag state machine and the per-handle geometry behind it.
//!
//! DESIGN
//! ======
//! A press on a handle moves the machine out of `Idle`. Resize presses take
//! an [`AspectSnapshot`] of the box's diagonal; it is never re-derived while
//! the gesture lasts, so corner drags keep the proportions the box had when
//! the gesture started. Every move is resolved independently from the
//! current anchor layout plus the pointer's local position, producing a
//! [`FitTarget`] for the adapter. Release returns to `Idle`.
//!
//! Resizing works in the transformer's own rotated frame, where the box is
//! axis-aligned. That turns rotated resizing into plain subtraction: only the
//! final top-left corner needs converting back into parent space.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use std::f64::consts::FRAC_PI_2;

use crate::adapter::FitTarget;
use crate::anchor::{AnchorSet, Handle, ResizeAnchor};
use crate::consts::ROTATE_SNAP_TOLERANCE_RAD;
use crate::geom::{OrientedRect, Point, angular_distance, diagonal_sin_cos};

/// Direction of the box diagonal when a resize started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectSnapshot {
    /// `height / hypotenuse`.
    pub sin: f64,
    /// `width / hypotenuse`.
    pub cos: f64,
}

impl AspectSnapshot {
    /// Capture the diagonal of a `width` × `height` box. A zero diagonal reads as 45°.
    #[must_use]
    pub fn capture(width: f64, height: f64) -> Self {
        let (sin, cos) = diagonal_sin_cos(width, height);
        Self { sin, cos }
    }

    /// Split a diagonal length into width and height along the captured direction.
    #[must_use]
    pub fn project(&self, hypotenuse: f64) -> Point {
        Point::new(hypotenuse * self.cos, hypotenuse * self.sin)
    }
}

/// The gesture currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Resizing {
        anchor: ResizeAnchor,
        aspect: AspectSnapshot,
    },
    Rotating,
}

impl DragState {
    /// State entered by pressing `handle` on a box currently shaped like `rect`.
    #[must_use]
    pub fn begin(handle: Handle, rect: &OrientedRect) -> Self {
        match handle {
            Handle::Resize(anchor) => Self::Resizing { anchor, aspect: AspectSnapshot::capture(rect.width, rect.height) },
            Handle::Rotate => Self::Rotating,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// The handle being dragged, if any.
    #[must_use]
    pub fn handle(&self) -> Option<Handle> {
        match self {
            Self::Idle => None,
            Self::Resizing { anchor, .. } => Some(Handle::Resize(*anchor)),
            Self::Rotating => Some(Handle::Rotate),
        }
    }

    /// Resolve a pointer move into the geometry to apply.
    ///
    /// `rect` is the node's current oriented rect, `anchors` the layout built
    /// from it and `pointer` the pointer in the same local frame as `anchors`.
    /// Returns `None` while idle.
    #[must_use]
    pub fn resolve(&self, rect: &OrientedRect, anchors: &AnchorSet, pointer: Point, snaps_deg: &[f64]) -> Option<FitTarget> {
        match *self {
            Self::Idle => None,
            Self::Resizing { anchor, aspect } => {
                let local = resize_box(anchors, anchor, pointer, aspect);
                Some(local.to_fit_target(rect))
            }
            Self::Rotating => Some(FitTarget::from(rotate_rect(rect, pointer, snaps_deg))),
        }
    }
}

// =============================================================================
// RESIZE
// =============================================================================

/// The resized box in the transformer's local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalBox {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl LocalBox {
    #[must_use]
    pub fn width(&self) -> f64 {
        self.bottom_right.x - self.top_left.x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.bottom_right.y - self.top_left.y
    }

    /// Express this box as a parent-space resize target for a frame shaped like `frame`.
    #[must_use]
    pub fn to_fit_target(&self, frame: &OrientedRect) -> FitTarget {
        let origin = frame.to_parent(self.top_left);
        FitTarget::resize(origin.x, origin.y, self.width(), self.height())
    }
}

/// Rebuild the box after `anchor` is dragged to `pointer`.
///
/// Corners hold the diagonally opposite corner fixed and keep the aspect
/// captured at press time, measuring the new diagonal from that fixed corner.
/// Edge midpoints move only their own edge along one axis.
#[must_use]
pub fn resize_box(anchors: &AnchorSet, anchor: ResizeAnchor, pointer: Point, aspect: AspectSnapshot) -> LocalBox {
    let top_right = anchors.corner(ResizeAnchor::TopRight);
    let bottom_left = anchors.corner(ResizeAnchor::BottomLeft);
    let mut top_left = anchors.corner(ResizeAnchor::TopLeft);
    let mut bottom_right = anchors.corner(ResizeAnchor::BottomRight);

    match anchor {
        ResizeAnchor::TopLeft => {
            let d = aspect.project(bottom_right.distance_to(pointer));
            top_left = bottom_right - d;
        }
        ResizeAnchor::TopCenter => top_left.y = pointer.y,
        ResizeAnchor::TopRight => {
            let d = aspect.project(bottom_left.distance_to(pointer));
            top_left.y = bottom_left.y - d.y;
            bottom_right.x = bottom_left.x + d.x;
        }
        ResizeAnchor::MiddleLeft => top_left.x = pointer.x,
        ResizeAnchor::MiddleRight => bottom_right.x = pointer.x,
        ResizeAnchor::BottomLeft => {
            let d = aspect.project(top_right.distance_to(pointer));
            top_left.x = top_right.x - d.x;
            bottom_right.y = top_right.y + d.y;
        }
        ResizeAnchor::BottomCenter => bottom_right.y = pointer.y,
        ResizeAnchor::BottomRight => {
            let d = aspect.project(top_left.distance_to(pointer));
            bottom_right = top_left + d;
        }
    }

    LocalBox { top_left, bottom_right }
}

// =============================================================================
// ROTATE
// =============================================================================

/// Snap `rotation` (radians) to the closest of `snaps_deg` within tolerance.
#[must_use]
pub fn snap_rotation(rotation: f64, snaps_deg: &[f64]) -> f64 {
    snaps_deg
        .iter()
        .map(|deg| deg.to_radians())
        .map(|snap| (snap, angular_distance(snap, rotation)))
        .filter(|(_, distance)| *distance < ROTATE_SNAP_TOLERANCE_RAD)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(rotation, |(snap, _)| snap)
}

/// Rotate `rect` so its rotate handle points at `pointer`, keeping the center fixed.
///
/// `pointer` is in the rect's local frame.
#[must_use]
pub fn rotate_rect(rect: &OrientedRect, pointer: Point, snaps_deg: &[f64]) -> OrientedRect {
    let half_w = rect.width / 2.0;
    let half_h = rect.height / 2.0;
    let x = pointer.x - half_w;
    let y = -pointer.y + half_h;

    let delta = (-y).atan2(x) + FRAC_PI_2;
    let alpha = rect.rotation;
    let beta = snap_rotation(alpha + delta, snaps_deg);

    let (sin_a, cos_a) = alpha.sin_cos();
    let (sin_b, cos_b) = beta.sin_cos();

    OrientedRect {
        x: rect.x + half_w * (cos_a - cos_b) + half_h * (sin_b - sin_a),
        y: rect.y + half_h * (cos_a - cos_b) + half_w * (sin_a - sin_b),
        width: rect.width,
        height: rect.height,
        rotation: beta,
    }
}
