//! Transformer controller.
//!
//! DESIGN
//! ======
//! A `Transformer` attaches to at most one node. While attached it keeps a
//! frame (the node's oriented rect), the nine handle positions and the
//! outline, all rebuilt from the node on every refresh. Pointer input arrives
//! through the `pointer_*` entry points and comes back out as a list of
//! [`Action`]s for the host: redraws, cursor changes, pointer capture and the
//! `Transform`/`TransformEnd` notifications. The same notifications are also
//! fired on the node itself so listeners attached there see them.
//!
//! The node's change listeners cannot call back into the transformer (the
//! node is mutably borrowed while it notifies). They only mark the frame
//! stale; the host calls [`Transformer::sync`] after dispatching node events.
//! Changes made by the transformer's own apply step are ignored through the
//! shared [`ApplyFlag`], so a drag never schedules a redundant refresh.
//!
//! Coordinates passed to `pointer_move` and `hit_test` are in the node's
//! parent space ("stage" space for a top-level node).

#[cfg(test)]
#[path = "transformer_test.rs"]
mod transformer_test;

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, error, trace, warn};

use crate::adapter::{ApplyFlag, FitTarget, fit_node_into, node_rect};
use crate::anchor::{AnchorSet, Handle, Outline, ResizeAnchor};
use crate::config::{TransformerConfig, parse_resizers, sanitize_snaps};
use crate::consts::{HANDLE_HIT_RADIUS_PX, HANDLE_HOVER_CURSOR};
use crate::drag::DragState;
use crate::error::TransformerError;
use crate::geom::{OrientedRect, Point, SurfaceRect};
use crate::node::{Listener, NodeEvent, NodeRef, Subscription, TRANSFORM_CHANGE_EVENTS};

/// Side effects the host must carry out after a transformer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// New geometry was applied to the node during a gesture.
    Transform,
    /// A gesture finished.
    TransformEnd,
    /// The handles or the node need repainting.
    RenderNeeded,
    /// Change the pointer cursor. An empty string restores the default.
    SetCursor(String),
    /// Route pointer move/release to the transformer until `ReleasePointer`,
    /// even when the pointer leaves the handle.
    CapturePointer,
    ReleasePointer,
}

struct Attachment {
    node: NodeRef,
    subscription: Subscription,
}

/// Resize/rotate handles around one node.
pub struct Transformer {
    config: TransformerConfig,
    attachment: Option<Attachment>,
    frame: Option<OrientedRect>,
    anchors: AnchorSet,
    outline: Outline,
    state: DragState,
    hovered: Option<Handle>,
    apply: ApplyFlag,
    stale: Rc<Cell<bool>>,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new(TransformerConfig::default())
    }
}

impl fmt::Debug for Transformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transformer")
            .field("config", &self.config)
            .field("attached", &self.attachment.is_some())
            .field("frame", &self.frame)
            .field("state", &self.state)
            .field("hovered", &self.hovered)
            .finish_non_exhaustive()
    }
}

impl Transformer {
    #[must_use]
    pub fn new(config: TransformerConfig) -> Self {
        let config = config.sanitized();
        debug!(?config, "transformer created");
        Self {
            anchors: AnchorSet::layout(0.0, 0.0, &config),
            outline: Outline::layout(0.0, 0.0, &config),
            config,
            attachment: None,
            frame: None,
            state: DragState::Idle,
            hovered: None,
            apply: ApplyFlag::new(),
            stale: Rc::new(Cell::new(false)),
        }
    }

    // =========================================================================
    // ATTACHMENT
    // =========================================================================

    /// Attach to `node`, detaching from any previous node first.
    pub fn attach_to(&mut self, node: NodeRef) -> Vec<Action> {
        let mut actions = self.detach();

        let subscription = match node.try_borrow_mut() {
            Ok(mut n) => {
                let mut subscription = Subscription::register(&mut *n, &TRANSFORM_CHANGE_EVENTS, self.change_listener());
                subscription.add(&mut *n, &[NodeEvent::DragMove], self.change_listener());
                subscription
            }
            Err(e) => {
                error!(error = %e, "cannot attach: node is already borrowed");
                return actions;
            }
        };

        debug!(listeners = subscription.ids().len(), "transformer attached");
        self.attachment = Some(Attachment { node, subscription });
        self.update();
        if !actions.contains(&Action::RenderNeeded) {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Remove this transformer's listeners from the attached node.
    ///
    /// The node's geometry is left as it is. Detaching mid-gesture drops the
    /// gesture without a `TransformEnd`.
    pub fn detach(&mut self) -> Vec<Action> {
        let was_active = self.state.is_active();
        if !self.release_attachment() {
            return Vec::new();
        }
        let mut actions = vec![Action::RenderNeeded];
        if was_active {
            actions.push(Action::ReleasePointer);
        }
        actions
    }

    /// End any gesture in progress, then detach.
    pub fn destroy(&mut self) -> Vec<Action> {
        let mut actions = self.pointer_up();
        actions.extend(self.detach());
        debug!("transformer destroyed");
        actions
    }

    /// Returns `false` if nothing was attached.
    fn release_attachment(&mut self) -> bool {
        let Some(Attachment { node, subscription }) = self.attachment.take() else {
            return false;
        };
        match node.try_borrow_mut() {
            Ok(mut n) => subscription.release(&mut *n),
            Err(e) => error!(error = %e, "node is borrowed during detach; its listeners stay registered"),
        }

        self.frame = None;
        self.state = DragState::Idle;
        self.hovered = None;
        self.stale.set(false);
        self.anchors = AnchorSet::layout(0.0, 0.0, &self.config);
        self.outline = Outline::layout(0.0, 0.0, &self.config);
        debug!("transformer detached");
        true
    }

    /// The attached node, if any.
    #[must_use]
    pub fn node(&self) -> Option<NodeRef> {
        self.attachment.as_ref().map(|a| Rc::clone(&a.node))
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    fn change_listener(&self) -> Listener {
        let apply = self.apply.clone();
        let stale = Rc::clone(&self.stale);
        Rc::new(move |event: NodeEvent| {
            if apply.is_applying() {
                return;
            }
            trace!(?event, "attached node changed");
            stale.set(true);
        })
    }

    // =========================================================================
    // REFRESH
    // =========================================================================

    /// Whether the node changed since the last refresh.
    #[must_use]
    pub fn needs_sync(&self) -> bool {
        self.stale.get()
    }

    /// Refresh the frame if the node changed outside a transformer gesture.
    pub fn sync(&mut self) -> Vec<Action> {
        if !self.stale.get() {
            return Vec::new();
        }
        self.update();
        vec![Action::RenderNeeded]
    }

    fn update(&mut self) {
        self.stale.set(false);
        let Some(rect) = self.current_rect() else {
            return;
        };
        self.frame = Some(rect);
        self.anchors = AnchorSet::layout(rect.width, rect.height, &self.config);
        self.anchors.set_hovered(self.hovered);
        self.outline = Outline::layout(rect.width, rect.height, &self.config);
    }

    fn current_rect(&self) -> Option<OrientedRect> {
        let attachment = self.attachment.as_ref()?;
        match attachment.node.try_borrow() {
            Ok(node) => Some(node_rect(&*node)),
            Err(e) => {
                error!(error = %e, "node is mutably borrowed; keeping the last frame");
                None
            }
        }
    }

    fn refresh(&mut self) -> Vec<Action> {
        self.update();
        if self.hovered.is_some_and(|h| !self.anchors.get(h).visible) {
            return self.hover(None);
        }
        if self.is_attached() { vec![Action::RenderNeeded] } else { Vec::new() }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    #[must_use]
    pub fn x(&self) -> Option<f64> {
        self.frame.map(|f| f.x)
    }

    #[must_use]
    pub fn y(&self) -> Option<f64> {
        self.frame.map(|f| f.y)
    }

    #[must_use]
    pub fn width(&self) -> Option<f64> {
        self.frame.map(|f| f.width)
    }

    #[must_use]
    pub fn height(&self) -> Option<f64> {
        self.frame.map(|f| f.height)
    }

    /// Rotation of the frame in degrees.
    #[must_use]
    pub fn rotation(&self) -> Option<f64> {
        self.frame.map(|f| f.rotation.to_degrees())
    }

    /// The attached node's oriented rect as of the last refresh.
    #[must_use]
    pub fn node_rect(&self) -> Option<OrientedRect> {
        self.frame
    }

    #[must_use]
    pub fn anchors(&self) -> &AnchorSet {
        &self.anchors
    }

    #[must_use]
    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    #[must_use]
    pub fn state(&self) -> &DragState {
        &self.state
    }

    #[must_use]
    pub fn is_transforming(&self) -> bool {
        self.state.is_active()
    }

    #[must_use]
    pub fn hovered(&self) -> Option<Handle> {
        self.hovered
    }

    #[must_use]
    pub fn config(&self) -> &TransformerConfig {
        &self.config
    }

    // =========================================================================
    // CONFIGURATION
    // =========================================================================

    pub fn set_config(&mut self, config: TransformerConfig) -> Vec<Action> {
        self.config = config.sanitized();
        self.refresh()
    }

    pub fn set_enabled_resizers(&mut self, anchors: Vec<ResizeAnchor>) -> Vec<Action> {
        self.config.enabled_resizers = anchors;
        self.config = std::mem::take(&mut self.config).sanitized();
        self.refresh()
    }

    /// Set the enabled resizers by name. Unknown names are logged and skipped.
    pub fn set_enabled_resizers_by_name<I, S>(&mut self, names: I) -> Vec<Action>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.enabled_resizers = parse_resizers(names);
        self.refresh()
    }

    pub fn set_resize_enabled(&mut self, enabled: bool) -> Vec<Action> {
        self.config.resize_enabled = enabled;
        self.refresh()
    }

    pub fn set_rotate_enabled(&mut self, enabled: bool) -> Vec<Action> {
        self.config.rotate_enabled = enabled;
        self.refresh()
    }

    /// Set the snap angles in degrees. Non-finite angles are dropped.
    pub fn set_rotation_snaps(&mut self, snaps: Vec<f64>) -> Vec<Action> {
        self.config.rotation_snaps = sanitize_snaps(snaps);
        self.refresh()
    }

    /// Set the rotate handle distance. A non-finite value is logged and ignored.
    pub fn set_rotate_handler_offset(&mut self, offset: f64) -> Vec<Action> {
        if !offset.is_finite() {
            warn!(offset, "ignoring non-finite rotate handler offset");
            return Vec::new();
        }
        self.config.rotate_handler_offset = offset;
        self.refresh()
    }

    pub fn set_line_enabled(&mut self, enabled: bool) -> Vec<Action> {
        self.config.line_enabled = enabled;
        self.refresh()
    }

    // =========================================================================
    // POINTER INPUT
    // =========================================================================

    /// Press on the handle called `name` (`"top-left"`, …, `"rotater"`).
    ///
    /// # Errors
    ///
    /// `UnknownAnchor` for a name that is not a handle, `NotAttached` when
    /// nothing is attached. The state stays idle in both cases.
    pub fn pointer_down(&mut self, name: &str) -> Result<Vec<Action>, TransformerError> {
        let handle = name.parse::<Handle>().inspect_err(|e| {
            warn!(error = %e, code = e.error_code(), available = ?ResizeAnchor::names(), "press on unknown handle");
        })?;
        self.pointer_down_on(handle)
    }

    /// Press on `handle`. Hidden handles ignore the press.
    ///
    /// # Errors
    ///
    /// `NotAttached` when nothing is attached.
    pub fn pointer_down_on(&mut self, handle: Handle) -> Result<Vec<Action>, TransformerError> {
        let Some(frame) = self.frame else {
            warn!(%handle, "press while not attached");
            return Err(TransformerError::NotAttached);
        };
        if !self.anchors.get(handle).visible {
            debug!(%handle, "press on hidden handle ignored");
            return Ok(Vec::new());
        }
        if let Some(previous) = self.state.handle() {
            debug!(%previous, "new press replaces unfinished gesture");
        }

        self.state = DragState::begin(handle, &frame);
        debug!(%handle, "gesture started");
        Ok(vec![Action::CapturePointer])
    }

    /// Pointer moved to `point` in the node's parent space.
    ///
    /// Ignored while idle.
    pub fn pointer_move(&mut self, point: Point) -> Vec<Action> {
        let Some(frame) = self.frame else {
            return Vec::new();
        };
        let local = frame.to_local(point);
        let Some(target) = self.state.resolve(&frame, &self.anchors, local, &self.config.rotation_snaps) else {
            return Vec::new();
        };
        self.apply_target(&target)
    }

    /// Pointer moved to `client` in screen coordinates over a surface whose
    /// bounding box on screen is `surface`.
    pub fn pointer_move_client(&mut self, client: Point, surface: SurfaceRect) -> Vec<Action> {
        self.pointer_move(client - surface.origin())
    }

    /// Pointer released. Ends the gesture, if any.
    pub fn pointer_up(&mut self) -> Vec<Action> {
        let Some(handle) = self.state.handle() else {
            return Vec::new();
        };
        self.state = DragState::Idle;
        debug!(%handle, "gesture ended");

        if let Some(attachment) = &self.attachment {
            match attachment.node.try_borrow_mut() {
                Ok(mut node) => node.fire(NodeEvent::TransformEnd),
                Err(e) => error!(error = %e, "node is borrowed; transformend not delivered to it"),
            }
        }
        vec![Action::TransformEnd, Action::ReleasePointer]
    }

    fn apply_target(&mut self, target: &FitTarget) -> Vec<Action> {
        let Some(attachment) = &self.attachment else {
            return Vec::new();
        };
        let mut node = match attachment.node.try_borrow_mut() {
            Ok(node) => node,
            Err(e) => {
                error!(error = %e, "node is borrowed; move dropped");
                return Vec::new();
            }
        };

        match fit_node_into(&mut *node, target, &self.apply) {
            Ok(true) => {}
            Ok(false) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, code = e.error_code(), ?target, "rejected transform target");
                return Vec::new();
            }
        }
        node.fire(NodeEvent::Transform);
        node.request_redraw();
        drop(node);

        self.update();
        vec![Action::Transform, Action::RenderNeeded]
    }

    // =========================================================================
    // HOVER
    // =========================================================================

    /// The visible handle under `point` (parent space), if any.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<Handle> {
        let frame = self.frame?;
        self.anchors.hit(frame.to_local(point), HANDLE_HIT_RADIUS_PX)
    }

    /// Update hover from a pointer position in parent space.
    pub fn pointer_hover(&mut self, point: Point) -> Vec<Action> {
        let handle = self.hit_test(point);
        self.hover(handle)
    }

    /// Pointer entered `Some(handle)` or left every handle (`None`).
    pub fn hover(&mut self, handle: Option<Handle>) -> Vec<Action> {
        let handle = handle.filter(|h| self.frame.is_some() && self.anchors.get(*h).visible);
        if handle == self.hovered {
            return Vec::new();
        }
        self.hovered = handle;
        self.anchors.set_hovered(handle);
        let cursor = if handle.is_some() { HANDLE_HOVER_CURSOR } else { "" };
        vec![Action::SetCursor(cursor.to_string()), Action::RenderNeeded]
    }
}

impl Drop for Transformer {
    fn drop(&mut self) {
        self.release_attachment();
    }
}
