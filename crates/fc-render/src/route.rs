//! Edge routing: anchor resolution, connection curves, label placement.
//!
//! A connection is a horizontal-biased cubic: both control points sit on the
//! horizontal through their endpoint, pulled toward the other endpoint by
//! `min(100, |dx| / 2)`. Short links stay almost straight and long links do
//! not balloon.

use crate::ports::port_anchor;
use fc_core::{Edge, Node, PortDirection, PortRef, Scene};
use kurbo::{CubicBez, ParamCurve, Point, Rect, RoundedRect, Size, Vec2};

pub const MAX_CONTROL_OFFSET: f64 = 100.0;
/// Backing plate behind edge labels.
pub const LABEL_PLATE: Size = Size::new(80.0, 20.0);
pub const LABEL_PLATE_RADIUS: f64 = 3.0;
/// Labels sit this far above the chord midpoint.
pub const LABEL_RISE: f64 = 10.0;

/// Cubic between two anchors.
pub fn connection_curve(start: Point, end: Point) -> CubicBez {
    let offset = MAX_CONTROL_OFFSET.min((end.x - start.x).abs() * 0.5);
    CubicBez::new(
        start,
        Point::new(start.x + offset, start.y),
        Point::new(end.x - offset, end.y),
        end,
    )
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelPlacement {
    /// Baseline origin, text anchored in the middle.
    pub origin: Point,
    pub plate: RoundedRect,
}

/// Label over the midpoint of the straight line between the anchors.
pub fn label_placement(start: Point, end: Point) -> LabelPlacement {
    let origin = start.midpoint(end) - Vec2::new(0.0, LABEL_RISE);
    let top_left = origin - Vec2::new(LABEL_PLATE.width / 2.0, 15.0);
    let plate = Rect::from_origin_size(top_left, LABEL_PLATE).to_rounded_rect(LABEL_PLATE_RADIUS);
    LabelPlacement { origin, plate }
}

/// Geometry of a committed edge.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeRoute {
    pub start: Point,
    pub end: Point,
    pub curve: CubicBez,
    pub label: Option<LabelPlacement>,
}

impl EdgeRoute {
    pub fn midpoint(&self) -> Point {
        self.curve.eval(0.5)
    }
}

/// Source-side anchor: the named port (outputs searched before inputs), or
/// the node's right-center.
pub fn source_anchor(node: &Node, port: Option<&str>) -> Point {
    port.and_then(|id| {
        port_anchor(node, PortDirection::Output, id).or_else(|| port_anchor(node, PortDirection::Input, id))
    })
    .unwrap_or_else(|| Point::new(node.x + node.width, node.y + node.height / 2.0))
}

/// Target-side anchor: the named port (inputs searched before outputs), or
/// the node's left-center.
pub fn target_anchor(node: &Node, port: Option<&str>) -> Point {
    port.and_then(|id| {
        port_anchor(node, PortDirection::Input, id).or_else(|| port_anchor(node, PortDirection::Output, id))
    })
    .unwrap_or_else(|| Point::new(node.x, node.y + node.height / 2.0))
}

/// Route a committed edge. `None` if either endpoint node is missing.
pub fn route_edge(scene: &Scene, edge: &Edge) -> Option<EdgeRoute> {
    let source = scene.node(&edge.source)?;
    let target = scene.node(&edge.target)?;
    let start = source_anchor(source, edge.source_port.as_deref());
    let end = target_anchor(target, edge.target_port.as_deref());
    Some(EdgeRoute {
        start,
        end,
        curve: connection_curve(start, end),
        label: edge.label.as_ref().map(|_| label_placement(start, end)),
    })
}

/// The uncommitted connection drawn while wiring ports.
#[derive(Debug, Clone, PartialEq)]
pub struct ProvisionalEdge {
    pub source: PortRef,
    /// World point where the gesture started.
    pub start: Point,
    /// Live pointer position in world space.
    pub end: Point,
}

impl ProvisionalEdge {
    pub fn curve(&self) -> CubicBez {
        connection_curve(self.start, self.end)
    }
}
