//! The node capability the transformer works against.
//!
//! The scene graph lives outside this crate. Anything that can report an
//! untransformed bounding box, expose its position/scale/rotation/offset and
//! deliver change notifications can be attached to a
//! [`Transformer`](crate::transformer::Transformer).

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use uuid::Uuid;

use crate::geom::{AngleUnit, Point, Rect};

/// Shared handle to an attachable node.
///
/// Single-threaded: the host's scene graph and the transformer both hold one.
pub type NodeRef = Rc<RefCell<dyn TransformableNode>>;

/// Callback registered on a node. Invoked synchronously while the node is
/// mutably borrowed, so it must not borrow the node again.
pub type Listener = Rc<dyn Fn(NodeEvent)>;

/// Notifications a node can deliver to its listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeEvent {
    XChange,
    YChange,
    WidthChange,
    HeightChange,
    ScaleXChange,
    ScaleYChange,
    SkewXChange,
    SkewYChange,
    RotationChange,
    OffsetXChange,
    OffsetYChange,
    TransformsEnabledChange,
    /// The node was moved by the host's own drag handling.
    DragMove,
    /// A transformer applied new geometry during a gesture.
    Transform,
    /// A transformer gesture ended.
    TransformEnd,
}

/// Attribute changes that alter a node's oriented bounding box.
pub const TRANSFORM_CHANGE_EVENTS: [NodeEvent; 12] = [
    NodeEvent::XChange,
    NodeEvent::YChange,
    NodeEvent::WidthChange,
    NodeEvent::HeightChange,
    NodeEvent::ScaleXChange,
    NodeEvent::ScaleYChange,
    NodeEvent::SkewXChange,
    NodeEvent::SkewYChange,
    NodeEvent::RotationChange,
    NodeEvent::OffsetXChange,
    NodeEvent::OffsetYChange,
    NodeEvent::TransformsEnabledChange,
];

/// Identifier of one registered listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub Uuid);

impl ListenerId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ListenerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Capability a node must provide to be transformed.
pub trait TransformableNode {
    /// Bounding box in the node's own space, ignoring its transform.
    fn local_bounding_box(&self) -> Rect;

    fn position(&self) -> Point;
    fn set_position(&mut self, position: Point);

    fn scale(&self) -> Point;
    fn set_scale(&mut self, scale: Point);

    /// Rotation expressed in [`TransformableNode::angle_unit`].
    fn rotation(&self) -> f64;
    fn set_rotation(&mut self, rotation: f64);

    fn angle_unit(&self) -> AngleUnit {
        AngleUnit::Degrees
    }

    fn offset(&self) -> Point;

    /// Register `listener` for each of `events`.
    fn subscribe(&mut self, events: &[NodeEvent], listener: Listener) -> ListenerId;

    /// Remove a listener. Returns `false` if it was not registered.
    fn unsubscribe(&mut self, id: ListenerId) -> bool;

    /// Number of listeners currently registered.
    fn listener_count(&self) -> usize;

    /// Deliver `event` to this node's listeners.
    fn fire(&mut self, event: NodeEvent);

    /// Ask the host to redraw the layer containing this node.
    fn request_redraw(&mut self);
}

/// Listeners a transformer holds on its attached node.
///
/// Returned by subscribing and consumed by [`Subscription::release`], so a
/// detach removes exactly what the attach added.
#[derive(Debug, Default)]
pub struct Subscription {
    ids: Vec<ListenerId>,
}

impl Subscription {
    /// Subscribe `listener` to `events` on `node`.
    pub fn register(node: &mut dyn TransformableNode, events: &[NodeEvent], listener: Listener) -> Self {
        let id = node.subscribe(events, listener);
        Self { ids: vec![id] }
    }

    /// Subscribe one more listener under the same handle.
    pub fn add(&mut self, node: &mut dyn TransformableNode, events: &[NodeEvent], listener: Listener) {
        self.ids.push(node.subscribe(events, listener));
    }

    #[must_use]
    pub fn ids(&self) -> &[ListenerId] {
        &self.ids
    }

    /// Remove every listener in this subscription from `node`.
    pub fn release(self, node: &mut dyn TransformableNode) {
        for id in self.ids {
            if !node.unsubscribe(id) {
                tracing::debug!(%id, "listener already removed from node");
            }
        }
    }
}
