//! Shared numeric constants for the transformer crate.

// ── Rotation ────────────────────────────────────────────────────

/// Distance in radians within which a computed rotation snaps to a configured angle.
pub const ROTATE_SNAP_TOLERANCE_RAD: f64 = 0.1;

/// Default distance from the top edge to the rotate handle, in pixels.
pub const DEFAULT_ROTATE_HANDLER_OFFSET: f64 = 50.0;

// ── Degenerate geometry ─────────────────────────────────────────

/// Smallest local bounding-box dimension used when solving for scale.
pub const MIN_BOX_DIMENSION: f64 = 1e-6;

// ── Handles ─────────────────────────────────────────────────────

/// Side length of a handle square in pixels.
pub const ANCHOR_SIZE_PX: f64 = 10.0;

/// Resting stroke width of a handle.
pub const ANCHOR_STROKE_WIDTH: f64 = 1.0;

/// Stroke multiplier applied while a handle is hovered.
pub const ANCHOR_HOVER_STROKE_FACTOR: f64 = 4.0;

/// Handle and outline stroke color.
pub const ANCHOR_STROKE: &str = "rgb(0, 161, 255)";

/// Handle fill color.
pub const ANCHOR_FILL: &str = "white";

/// Hit slop around a handle center, in pixels.
pub const HANDLE_HIT_RADIUS_PX: f64 = ANCHOR_SIZE_PX / 2.0;

/// Cursor shown while the pointer is over a handle.
pub const HANDLE_HOVER_CURSOR: &str = "pointer";
