//! Rendering side of the FC canvas.
//!
//! Geometry (`ports`, `route`) is pure; `paint` projects a scene onto any
//! [`RenderTarget`], and `hit` classifies what a target reports under the
//! pointer.

pub mod display_list;
pub mod hit;
pub mod paint;
pub mod ports;
pub mod route;
pub mod svg;
pub mod target;
#[cfg(feature = "vello")]
pub mod vello_target;

pub use display_list::DisplayList;
pub use hit::{HitTarget, classify, hit_test};
pub use paint::{Frame, paint_scene};
pub use route::{EdgeRoute, ProvisionalEdge, connection_curve, route_edge};
pub use target::{PickTag, RenderTarget, StrokeStyle, TextAnchor, TextStyle};
#[cfg(feature = "vello")]
pub use vello_target::VelloTarget;
