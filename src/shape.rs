//! A minimal concrete node.
//!
//! `BasicShape` carries just enough state to be transformed: a local bounding
//! box, position, scale, rotation and offset, plus a listener table. Setters
//! notify listeners only when the value actually changes.

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;

use std::fmt;

use uuid::Uuid;

use crate::geom::{AngleUnit, Point, Rect};
use crate::node::{Listener, ListenerId, NodeEvent, TransformableNode};

struct Registration {
    id: ListenerId,
    events: Vec<NodeEvent>,
    listener: Listener,
}

/// A shape with a fixed local bounding box and a full 2D transform.
pub struct BasicShape {
    pub id: Uuid,
    bounds: Rect,
    position: Point,
    scale: Point,
    rotation: f64,
    angle_unit: AngleUnit,
    offset: Point,
    listeners: Vec<Registration>,
    fired: Vec<NodeEvent>,
    redraw_requests: usize,
}

impl BasicShape {
    /// A `width` × `height` shape whose local box starts at `(0, 0)`.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_bounds(Rect::new(0.0, 0.0, width, height))
    }

    /// A shape whose local box is `bounds` (e.g. centred on the origin for a circle).
    #[must_use]
    pub fn with_bounds(bounds: Rect) -> Self {
        Self {
            id: Uuid::new_v4(),
            bounds,
            position: Point::default(),
            scale: Point::new(1.0, 1.0),
            rotation: 0.0,
            angle_unit: AngleUnit::Degrees,
            offset: Point::default(),
            listeners: Vec::new(),
            fired: Vec::new(),
            redraw_requests: 0,
        }
    }

    /// Builder: place the shape at `(x, y)`.
    #[must_use]
    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }

    /// Builder: store rotation in `unit`.
    #[must_use]
    pub fn in_unit(mut self, unit: AngleUnit) -> Self {
        self.angle_unit = unit;
        self
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Replace the local bounding box (e.g. after editing text content).
    pub fn set_bounds(&mut self, bounds: Rect) {
        let old = self.bounds;
        self.bounds = bounds;
        if changed(old.width, bounds.width) {
            self.notify(NodeEvent::WidthChange);
        }
        if changed(old.height, bounds.height) {
            self.notify(NodeEvent::HeightChange);
        }
    }

    pub fn set_offset(&mut self, offset: Point) {
        let old = self.offset;
        self.offset = offset;
        if changed(old.x, offset.x) {
            self.notify(NodeEvent::OffsetXChange);
        }
        if changed(old.y, offset.y) {
            self.notify(NodeEvent::OffsetYChange);
        }
    }

    /// Move the shape as the host's drag handling would, firing `DragMove`.
    pub fn drag_to(&mut self, position: Point) {
        self.set_position(position);
        self.notify(NodeEvent::DragMove);
    }

    /// Events delivered through [`TransformableNode::fire`], oldest first.
    #[must_use]
    pub fn fired(&self) -> &[NodeEvent] {
        &self.fired
    }

    #[must_use]
    pub fn redraw_requests(&self) -> usize {
        self.redraw_requests
    }

    fn notify(&self, event: NodeEvent) {
        for reg in &self.listeners {
            if reg.events.contains(&event) {
                (reg.listener)(event);
            }
        }
    }
}

fn changed(old: f64, new: f64) -> bool {
    old.to_bits() != new.to_bits()
}

impl fmt::Debug for BasicShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicShape")
            .field("id", &self.id)
            .field("bounds", &self.bounds)
            .field("position", &self.position)
            .field("scale", &self.scale)
            .field("rotation", &self.rotation)
            .field("offset", &self.offset)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl TransformableNode for BasicShape {
    fn local_bounding_box(&self) -> Rect {
        self.bounds
    }

    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        let old = self.position;
        self.position = position;
        if changed(old.x, position.x) {
            self.notify(NodeEvent::XChange);
        }
        if changed(old.y, position.y) {
            self.notify(NodeEvent::YChange);
        }
    }

    fn scale(&self) -> Point {
        self.scale
    }

    fn set_scale(&mut self, scale: Point) {
        let old = self.scale;
        self.scale = scale;
        if changed(old.x, scale.x) {
            self.notify(NodeEvent::ScaleXChange);
        }
        if changed(old.y, scale.y) {
            self.notify(NodeEvent::ScaleYChange);
        }
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: f64) {
        let old = self.rotation;
        self.rotation = rotation;
        if changed(old, rotation) {
            self.notify(NodeEvent::RotationChange);
        }
    }

    fn angle_unit(&self) -> AngleUnit {
        self.angle_unit
    }

    fn offset(&self) -> Point {
        self.offset
    }

    fn subscribe(&mut self, events: &[NodeEvent], listener: Listener) -> ListenerId {
        let id = ListenerId::new();
        self.listeners.push(Registration { id, events: events.to_vec(), listener });
        id
    }

    fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|reg| reg.id != id);
        self.listeners.len() != before
    }

    fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn fire(&mut self, event: NodeEvent) {
        self.fired.push(event);
        self.notify(event);
    }

    fn request_redraw(&mut self) {
        self.redraw_requests += 1;
    }
}
