//! Handles drawn around the attached node: names, layout and hit-testing.
//!
//! Positions are local to the transformer's frame, whose origin is the
//! node's top-left corner and whose axes follow the node's rotation. The whole
//! set is rebuilt from width/height on every update; nothing is nudged in
//! place, so repeated edits cannot accumulate drift.

#[cfg(test)]
#[path = "anchor_test.rs"]
mod anchor_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::TransformerConfig;
use crate::consts::{ANCHOR_FILL, ANCHOR_HOVER_STROKE_FACTOR, ANCHOR_SIZE_PX, ANCHOR_STROKE, ANCHOR_STROKE_WIDTH};
use crate::error::TransformerError;
use crate::geom::Point;

/// Name of the rotate handle.
pub const ROTATER_NAME: &str = "rotater";

/// One of the eight resize anchors on the corners and edge midpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeAnchor {
    TopLeft,
    TopCenter,
    TopRight,
    MiddleRight,
    MiddleLeft,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl ResizeAnchor {
    pub const ALL: [ResizeAnchor; 8] = [
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::MiddleRight,
        Self::MiddleLeft,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::TopCenter => "top-center",
            Self::TopRight => "top-right",
            Self::MiddleRight => "middle-right",
            Self::MiddleLeft => "middle-left",
            Self::BottomLeft => "bottom-left",
            Self::BottomCenter => "bottom-center",
            Self::BottomRight => "bottom-right",
        }
    }

    /// All valid names, in layout order.
    #[must_use]
    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|a| a.name()).collect()
    }

    #[must_use]
    pub fn is_corner(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight | Self::BottomLeft | Self::BottomRight)
    }

    /// Where this anchor sits on a `width` × `height` box.
    #[must_use]
    pub fn local_position(self, width: f64, height: f64) -> Point {
        match self {
            Self::TopLeft => Point::new(0.0, 0.0),
            Self::TopCenter => Point::new(width / 2.0, 0.0),
            Self::TopRight => Point::new(width, 0.0),
            Self::MiddleLeft => Point::new(0.0, height / 2.0),
            Self::MiddleRight => Point::new(width, height / 2.0),
            Self::BottomLeft => Point::new(0.0, height),
            Self::BottomCenter => Point::new(width / 2.0, height),
            Self::BottomRight => Point::new(width, height),
        }
    }
}

impl fmt::Display for ResizeAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ResizeAnchor {
    type Err = TransformerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| TransformerError::UnknownAnchor(s.to_string()))
    }
}

/// Any handle the user can grab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handle {
    Resize(ResizeAnchor),
    Rotate,
}

impl Handle {
    pub const ALL: [Handle; 9] = [
        Self::Resize(ResizeAnchor::TopLeft),
        Self::Resize(ResizeAnchor::TopCenter),
        Self::Resize(ResizeAnchor::TopRight),
        Self::Resize(ResizeAnchor::MiddleRight),
        Self::Resize(ResizeAnchor::MiddleLeft),
        Self::Resize(ResizeAnchor::BottomLeft),
        Self::Resize(ResizeAnchor::BottomCenter),
        Self::Resize(ResizeAnchor::BottomRight),
        Self::Rotate,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Resize(anchor) => anchor.name(),
            Self::Rotate => ROTATER_NAME,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Resize(anchor) => anchor as usize,
            Self::Rotate => 8,
        }
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Handle {
    type Err = TransformerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ROTATER_NAME {
            return Ok(Self::Rotate);
        }
        s.parse().map(Self::Resize)
    }
}

/// How a handle is painted. The host owns the actual drawing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorStyle {
    pub stroke: &'static str,
    pub fill: &'static str,
    pub stroke_width: f64,
    /// Side length of the square, centred on the handle position.
    pub size: f64,
}

impl Default for AnchorStyle {
    fn default() -> Self {
        Self { stroke: ANCHOR_STROKE, fill: ANCHOR_FILL, stroke_width: ANCHOR_STROKE_WIDTH, size: ANCHOR_SIZE_PX }
    }
}

/// A single handle after layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorHandle {
    pub handle: Handle,
    /// Center of the handle in the transformer's local frame.
    pub position: Point,
    pub visible: bool,
    pub hovered: bool,
}

impl AnchorHandle {
    /// Stroke width to draw with; hovered handles are emphasised.
    #[must_use]
    pub fn stroke_width(&self) -> f64 {
        self.style().stroke_width
    }

    #[must_use]
    pub fn style(&self) -> AnchorStyle {
        let base = AnchorStyle::default();
        if self.hovered {
            AnchorStyle { stroke_width: base.stroke_width * ANCHOR_HOVER_STROKE_FACTOR, ..base }
        } else {
            base
        }
    }

    /// Top-left corner of the handle square, for hosts that draw from a corner.
    #[must_use]
    pub fn square_origin(&self) -> Point {
        let half = ANCHOR_SIZE_PX / 2.0;
        Point::new(self.position.x - half, self.position.y - half)
    }
}

/// The nine handles, indexed by [`Handle`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorSet {
    handles: [AnchorHandle; 9],
}

impl AnchorSet {
    /// Lay out every handle for a `width` × `height` frame.
    ///
    /// Resize anchors are visible when resizing is on and they are listed in
    /// `enabled_resizers`. The rotate handle follows `rotate_enabled`.
    #[must_use]
    pub fn layout(width: f64, height: f64, config: &TransformerConfig) -> Self {
        let handles = Handle::ALL.map(|handle| match handle {
            Handle::Resize(anchor) => AnchorHandle {
                handle,
                position: anchor.local_position(width, height),
                visible: config.resize_enabled && config.is_resizer_enabled(anchor),
                hovered: false,
            },
            Handle::Rotate => AnchorHandle {
                handle,
                position: Point::new(width / 2.0, -config.rotate_handler_offset),
                visible: config.rotate_enabled,
                hovered: false,
            },
        });
        Self { handles }
    }

    #[must_use]
    pub fn get(&self, handle: Handle) -> &AnchorHandle {
        &self.handles[handle.index()]
    }

    #[must_use]
    pub fn position(&self, handle: Handle) -> Point {
        self.get(handle).position
    }

    #[must_use]
    pub fn corner(&self, anchor: ResizeAnchor) -> Point {
        self.position(Handle::Resize(anchor))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AnchorHandle> {
        self.handles.iter()
    }

    /// Mark `handle` as hovered, clearing any other.
    pub fn set_hovered(&mut self, handle: Option<Handle>) {
        for h in &mut self.handles {
            h.hovered = Some(h.handle) == handle;
        }
    }

    /// The visible handle whose center is within `radius` of `local`.
    ///
    /// The rotate handle wins over resize anchors, then the closest anchor.
    #[must_use]
    pub fn hit(&self, local: Point, radius: f64) -> Option<Handle> {
        let rotate = self.get(Handle::Rotate);
        if rotate.visible && rotate.position.distance_to(local) <= radius {
            return Some(Handle::Rotate);
        }
        self.handles
            .iter()
            .filter(|h| h.visible && h.handle != Handle::Rotate)
            .map(|h| (h.handle, h.position.distance_to(local)))
            .filter(|(_, d)| *d <= radius)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(handle, _)| handle)
    }
}

/// The frame drawn around the node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub width: f64,
    pub height: f64,
    pub visible: bool,
    /// End y of the stem from the top-center to the rotate handle, when rotation is on.
    pub rotate_stem: Option<f64>,
}

impl Outline {
    #[must_use]
    pub fn layout(width: f64, height: f64, config: &TransformerConfig) -> Self {
        Self {
            width,
            height,
            visible: config.line_enabled,
            rotate_stem: config.rotate_enabled.then_some(-config.rotate_handler_offset),
        }
    }
}
