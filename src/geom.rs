//! Geometry primitives: points, boxes, oriented rectangles and angle helpers.
//!
//! Angles are radians everywhere inside the crate. Nodes may report their
//! rotation in degrees; [`AngleUnit`] converts at that boundary.

#[cfg(test)]
#[path = "geom_test.rs"]
mod geom_test;

use std::f64::consts::{PI, TAU};
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// A point or vector in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Length of the vector from the origin to this point.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Straight-line distance to `other`.
    #[must_use]
    pub fn distance_to(self, other: Point) -> f64 {
        (other - self).length()
    }

    /// Rotate this vector about the origin by `angle` radians.
    ///
    /// With y pointing down a positive angle turns clockwise on screen.
    #[must_use]
    pub fn rotated(self, angle: f64) -> Point {
        let (sin, cos) = angle.sin_cos();
        Point { x: self.x * cos - self.y * sin, y: self.y * cos + self.x * sin }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

/// Axis-aligned box, e.g. a node's bounding box in its own untransformed space
/// or the drawing surface's bounding box in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Top-left corner.
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// The drawing surface's bounding box in client (screen) coordinates.
pub type SurfaceRect = Rect;

/// A rectangle rotated about its own origin corner, in parent space.
///
/// `(x, y)` is where the unrotated local `(0, 0)` corner lands. The other
/// corners are found by rotating `(width, 0)`, `(0, height)` and
/// `(width, height)` by `rotation` and adding them to `(x, y)`. Width and
/// height may go negative while a drag crosses over the opposite edge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OrientedRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Clockwise rotation in radians.
    pub rotation: f64,
}

impl OrientedRect {
    #[must_use]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Map a point in the rectangle's local frame into parent space.
    #[must_use]
    pub fn to_parent(&self, local: Point) -> Point {
        self.origin() + local.rotated(self.rotation)
    }

    /// Map a parent-space point into the rectangle's local frame.
    #[must_use]
    pub fn to_local(&self, parent: Point) -> Point {
        (parent - self.origin()).rotated(-self.rotation)
    }

    /// The four corners in parent space: top-left, top-right, bottom-right, bottom-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [
            self.to_parent(Point::new(0.0, 0.0)),
            self.to_parent(Point::new(self.width, 0.0)),
            self.to_parent(Point::new(self.width, self.height)),
            self.to_parent(Point::new(0.0, self.height)),
        ]
    }

    /// Center of the rectangle in parent space.
    #[must_use]
    pub fn center(&self) -> Point {
        self.to_parent(Point::new(self.width / 2.0, self.height / 2.0))
    }

    /// Name of the first non-finite field, if any.
    #[must_use]
    pub fn non_finite_field(&self) -> Option<&'static str> {
        [
            ("x", self.x),
            ("y", self.y),
            ("width", self.width),
            ("height", self.height),
            ("rotation", self.rotation),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
    }
}

/// The unit a node uses for its rotation attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    #[default]
    Degrees,
    Radians,
}

impl AngleUnit {
    /// Convert an angle expressed in this unit to radians.
    #[must_use]
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            Self::Degrees => angle.to_radians(),
            Self::Radians => angle,
        }
    }

    /// Convert radians to an angle expressed in this unit.
    #[must_use]
    pub fn from_radians(self, radians: f64) -> f64 {
        match self {
            Self::Degrees => radians.to_degrees(),
            Self::Radians => radians,
        }
    }
}

/// Wrap an angle into `[0, 2π)`.
#[must_use]
pub fn normalize_radians(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

/// Shortest unsigned distance between two angles, in `[0, π]`.
#[must_use]
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let delta = normalize_radians(a - b);
    if delta > PI { TAU - delta } else { delta }
}

/// Sine and cosine of a rectangle's diagonal angle.
///
/// A zero-length diagonal has no direction; it is treated as a square (45°)
/// so corner drags still grow both dimensions.
#[must_use]
pub fn diagonal_sin_cos(width: f64, height: f64) -> (f64, f64) {
    let hypotenuse = width.hypot(height);
    if hypotenuse == 0.0 || !hypotenuse.is_finite() {
        return (std::f64::consts::FRAC_1_SQRT_2, std::f64::consts::FRAC_1_SQRT_2);
    }
    (height / hypotenuse, width / hypotenuse)
}
