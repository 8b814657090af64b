//! Port placement: where a port sits on its node and where its label goes.
//!
//! Left/right ports stack downward from 30 units below the node's top edge
//! at a 20-unit pitch, in declaration order. Top/bottom ports sit at one
//! third (inputs) or two thirds (outputs) of the node width.

use crate::target::TextAnchor;
use fc_core::{Node, PortDirection, PortSide};
use kurbo::{Point, Vec2};

pub const PORT_RADIUS: f64 = 5.0;
pub const FIRST_PORT_OFFSET: f64 = 30.0;
pub const PORT_PITCH: f64 = 20.0;
pub const PORT_LABEL_SIZE: f64 = 12.0;

/// Resolved geometry for one port.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortPlacement {
    /// World-space center of the port marker; edges attach here.
    pub anchor: Point,
    pub side: PortSide,
    /// Baseline origin for the port label.
    pub label_origin: Point,
    pub label_anchor: TextAnchor,
}

fn label_offset(side: PortSide) -> (Vec2, TextAnchor) {
    match side {
        PortSide::Left => (Vec2::new(10.0, 4.0), TextAnchor::Start),
        PortSide::Right => (Vec2::new(-10.0, 4.0), TextAnchor::End),
        PortSide::Top => (Vec2::new(0.0, -8.0), TextAnchor::Middle),
        PortSide::Bottom => (Vec2::new(0.0, 16.0), TextAnchor::Middle),
    }
}

/// Place the `index`-th port of `node`'s `direction` sequence.
///
/// Returns `None` when the index is out of range.
pub fn place_port(node: &Node, direction: PortDirection, index: usize) -> Option<PortPlacement> {
    let port = node.ports(direction).get(index)?;
    let side = port.side(direction);
    let slot = match direction {
        PortDirection::Input => node.width / 3.0,
        PortDirection::Output => 2.0 * node.width / 3.0,
    };
    let stacked = FIRST_PORT_OFFSET + index as f64 * PORT_PITCH;

    let local = match side {
        PortSide::Left => Vec2::new(0.0, stacked),
        PortSide::Right => Vec2::new(node.width, stacked),
        PortSide::Top => Vec2::new(slot, 0.0),
        PortSide::Bottom => Vec2::new(slot, node.height),
    };
    let anchor = Point::new(node.x, node.y) + local;
    let (offset, label_anchor) = label_offset(side);

    Some(PortPlacement {
        anchor,
        side,
        label_origin: anchor + offset,
        label_anchor,
    })
}

/// Anchor of the port `port_id` in `node`'s `direction` sequence.
pub fn port_anchor(node: &Node, direction: PortDirection, port_id: &str) -> Option<Point> {
    let (index, _) = node.port(direction, port_id)?;
    place_port(node, direction, index).map(|p| p.anchor)
}

/// All port placements of a node, inputs first, in declaration order.
pub fn placements(node: &Node) -> impl Iterator<Item = (PortDirection, usize, PortPlacement)> + '_ {
    [PortDirection::Input, PortDirection::Output]
        .into_iter()
        .flat_map(move |direction| {
            (0..node.ports(direction).len()).filter_map(move |index| {
                place_port(node, direction, index).map(|p| (direction, index, p))
            })
        })
}
