//! Resize and rotate handles for a shape in a retained-mode 2D scene graph.
//!
//! A [`transformer::Transformer`] attaches to one shape at a time and shows
//! eight resize anchors plus a rotate handle around the shape's oriented
//! bounding box. Pointer input on those handles is turned into a new oriented
//! rectangle, which is then applied back onto the shape by solving for the
//! scale and position that reproduce it. The host owns the scene graph, the
//! event loop and all drawing; this crate only does the geometry and reports
//! what happened through [`transformer::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`transformer`] | Controller: attachment, configuration, gesture entry points |
//! | [`drag`] | Drag state machine and per-anchor reconstruction math |
//! | [`anchor`] | Handle names, layout, visibility and hit-testing |
//! | [`adapter`] | Node ↔ oriented rectangle conversion (forward and inverse) |
//! | [`node`] | The `TransformableNode` capability and node events |
//! | [`shape`] | `BasicShape`, a minimal concrete node |
//! | [`geom`] | Points, rectangles, angles and rotation helpers |
//! | [`config`] | Typed transformer configuration |
//! | [`error`] | Error type |
//! | [`consts`] | Shared numeric constants (tolerances, handle sizes, etc.) |

pub mod adapter;
pub mod anchor;
pub mod config;
pub mod consts;
pub mod drag;
pub mod error;
pub mod geom;
pub mod node;
pub mod shape;
pub mod transformer;

pub use config::TransformerConfig;
pub use error::TransformerError;
pub use geom::{OrientedRect, Point, Rect, SurfaceRect};
pub use node::{NodeRef, TransformableNode};
pub use transformer::{Action, Transformer};
