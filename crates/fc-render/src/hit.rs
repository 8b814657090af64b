//! Hit classification: screen point → what the pointer is over.
//!
//! The render target reports the topmost tagged primitive; this module folds
//! the tag into the four things an interaction cares about.

use crate::target::{PickTag, RenderTarget};
use fc_core::PortRef;
use kurbo::Point;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HitTarget {
    Node(String),
    Port(PortRef),
    Edge(String),
    Background,
}

impl HitTarget {
    pub fn node_id(&self) -> Option<&str> {
        match self {
            Self::Node(id) => Some(id),
            Self::Port(port) => Some(&port.node),
            _ => None,
        }
    }
}

/// Fold a pick result into a hit target. Labels resolve to their owner.
pub fn classify(tag: Option<PickTag>) -> HitTarget {
    match tag {
        None => HitTarget::Background,
        Some(PickTag::NodeBody { node } | PickTag::NodeLabel { node } | PickTag::PortLabel { node }) => {
            HitTarget::Node(node)
        }
        Some(PickTag::PortMarker { node, port, direction }) => {
            HitTarget::Port(PortRef::new(node, port, direction))
        }
        Some(PickTag::EdgePath { edge } | PickTag::EdgeLabel { edge }) => HitTarget::Edge(edge),
    }
}

/// Classify whatever `target` last drew under `screen`.
pub fn hit_test<T: RenderTarget + ?Sized>(target: &T, screen: Point) -> HitTarget {
    let hit = classify(target.pick(screen));
    log::trace!("hit test at ({}, {}): {:?}", screen.x, screen.y, hit);
    hit
}
