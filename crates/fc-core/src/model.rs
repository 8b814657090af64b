//! Core scene data model for FC diagrams.
//!
//! A scene is an insertion-ordered list of nodes, an insertion-ordered list
//! of edges connecting them, and the pan/zoom viewport. Ports live on nodes in
//! two independent sequences (inputs and outputs); a port id only has to be
//! unique inside its own sequence.
//!
//! The JSON shape produced by `serde` is the host-facing schema:
//! `{ nodes: Node[], edges: Edge[], viewport: {x, y, scale} }`.

use crate::error::{Result, SceneError};
use crate::viewport::Viewport;
use kurbo::{Rect, Vec2};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashSet;

/// Opaque host payload attached to a node.
pub type NodeData = serde_json::Map<String, serde_json::Value>;

/// Port sequence. Most workflow nodes carry one or two ports per side.
pub type Ports = SmallVec<[Port; 2]>;

// ─── Ports ───────────────────────────────────────────────────────────────

/// Which edge of the node a port sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortSide {
    Top,
    Right,
    Bottom,
    Left,
}

/// Whether a port belongs to a node's `inputs` or `outputs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    Input,
    Output,
}

impl PortDirection {
    /// Side used when a port does not declare one.
    pub const fn default_side(self) -> PortSide {
        match self {
            Self::Input => PortSide::Left,
            Self::Output => PortSide::Right,
        }
    }
}

/// Fully-qualified reference to one port: owning node, sequence, and id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PortRef {
    pub node: String,
    pub port: String,
    pub direction: PortDirection,
}

impl PortRef {
    pub fn new(node: impl Into<String>, port: impl Into<String>, direction: PortDirection) -> Self {
        Self {
            node: node.into(),
            port: port.into(),
            direction,
        }
    }
}

/// A named connection point on one side of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub id: String,
    /// Free-form tag, reserved for connection-compatibility checks.
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PortSide>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Port {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            position: None,
            label: None,
        }
    }

    pub fn on(mut self, side: PortSide) -> Self {
        self.position = Some(side);
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Effective side: the declared one, else the direction's default.
    pub fn side(&self, direction: PortDirection) -> PortSide {
        self.position.unwrap_or(direction.default_side())
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

/// A typed box on the canvas. `x, y` is the world-space top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeData>,
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub inputs: Ports,
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub outputs: Ports,
}

impl Node {
    pub fn new(
        id: impl Into<String>,
        kind: impl Into<String>,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            x,
            y,
            width,
            height,
            label: String::new(),
            data: None,
            inputs: Ports::new(),
            outputs: Ports::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_input(mut self, port: Port) -> Self {
        self.inputs.push(port);
        self
    }

    pub fn with_output(mut self, port: Port) -> Self {
        self.outputs.push(port);
        self
    }

    /// World-space bounding rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }

    /// Width and height are finite and strictly positive.
    pub fn has_valid_size(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn ports(&self, direction: PortDirection) -> &[Port] {
        match direction {
            PortDirection::Input => &self.inputs,
            PortDirection::Output => &self.outputs,
        }
    }

    /// Look up a port in one sequence, returning its declaration index.
    pub fn port(&self, direction: PortDirection, id: &str) -> Option<(usize, &Port)> {
        self.ports(direction)
            .iter()
            .enumerate()
            .find(|(_, p)| p.id == id)
    }
}

// ─── Edges ───────────────────────────────────────────────────────────────

/// Manual routing waypoint. Stored and round-tripped, not used for routing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
}

/// A directed connection between two nodes, optionally pinned to ports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
    pub id: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_port: Option<String>,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_port: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Waypoint>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            source_port: None,
            target: target.into(),
            target_port: None,
            points: None,
            label: None,
        }
    }

    pub fn with_ports(mut self, source_port: impl Into<String>, target_port: impl Into<String>) -> Self {
        self.source_port = Some(source_port.into());
        self.target_port = Some(target_port.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// True if either endpoint is the given node.
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

// ─── Scene ───────────────────────────────────────────────────────────────

/// The full diagram owned by one engine instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub viewport: Viewport,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the host JSON schema. The result is not yet sanitized.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON, as written by the "export" action.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edge(id).is_some()
    }

    /// Edges with `node_id` as source or target.
    pub fn edges_touching<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.touches(node_id))
    }

    /// Append a node. Rejected if the id is already taken or the size is
    /// not positive.
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.contains_node(&node.id) {
            return Err(SceneError::DuplicateNode(node.id));
        }
        if !node.has_valid_size() {
            return Err(SceneError::InvalidSize {
                id: node.id,
                width: node.width,
                height: node.height,
            });
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Remove a node and every edge touching it. Unknown ids are a no-op.
    /// Returns whether anything was removed.
    pub fn remove_node(&mut self, id: &str) -> bool {
        let nodes_before = self.nodes.len();
        let edges_before = self.edges.len();
        self.nodes.retain(|n| n.id != id);
        self.edges.retain(|e| !e.touches(id));
        nodes_before != self.nodes.len() || edges_before != self.edges.len()
    }

    /// Append an edge. Both endpoint nodes must exist; ports are not checked.
    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        if self.contains_edge(&edge.id) {
            return Err(SceneError::DuplicateEdge(edge.id));
        }
        for endpoint in [&edge.source, &edge.target] {
            if !self.contains_node(endpoint) {
                return Err(SceneError::MissingNode {
                    edge: edge.id.clone(),
                    node: endpoint.clone(),
                });
            }
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Remove an edge by id. Unknown ids are a no-op.
    pub fn remove_edge(&mut self, id: &str) -> bool {
        let before = self.edges.len();
        self.edges.retain(|e| e.id != id);
        before != self.edges.len()
    }

    /// Translate a node by a world-space delta.
    pub fn move_node(&mut self, id: &str, delta: Vec2) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.x += delta.x;
                node.y += delta.y;
                true
            }
            None => false,
        }
    }

    /// Repair a host-supplied scene so the id and reference invariants hold.
    ///
    /// Nodes without a positive size and later duplicates of a node or edge
    /// id are dropped, edges pointing at missing nodes are dropped, and an unusable scale is reset to 1.
    /// Returns the number of repairs made.
    pub fn sanitize(&mut self) -> usize {
        let mut repairs = 0;

        let mut seen: HashSet<String> = HashSet::with_capacity(self.nodes.len());
        self.nodes.retain(|n| {
            if !n.has_valid_size() {
                log::warn!("dropping node `{}` with size {}x{}", n.id, n.width, n.height);
                repairs += 1;
                return false;
            }
            let fresh = seen.insert(n.id.clone());
            if !fresh {
                log::warn!("dropping duplicate node `{}`", n.id);
                repairs += 1;
            }
            fresh
        });

        let node_ids = seen;
        let mut seen_edges: HashSet<String> = HashSet::with_capacity(self.edges.len());
        self.edges.retain(|e| {
            if !node_ids.contains(&e.source) || !node_ids.contains(&e.target) {
                log::warn!("dropping edge `{}` with a missing endpoint", e.id);
                repairs += 1;
                return false;
            }
            let fresh = seen_edges.insert(e.id.clone());
            if !fresh {
                log::warn!("dropping duplicate edge `{}`", e.id);
                repairs += 1;
            }
            fresh
        });

        if !self.viewport.is_valid() {
            log::warn!("resetting invalid viewport scale {}", self.viewport.scale);
            self.viewport.scale = 1.0;
            if !self.viewport.x.is_finite() || !self.viewport.y.is_finite() {
                self.viewport.center_view();
            }
            repairs += 1;
        }

        repairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_nodes() -> Scene {
        let mut scene = Scene::new();
        scene.add_node(Node::new("A", "task", 0.0, 0.0, 100.0, 50.0)).unwrap();
        scene.add_node(Node::new("B", "task", 300.0, 0.0, 100.0, 50.0)).unwrap();
        scene
    }

    #[test]
    fn duplicate_node_rejected() {
        let mut scene = two_nodes();
        let err = scene
            .add_node(Node::new("A", "task", 5.0, 5.0, 10.0, 10.0))
            .unwrap_err();
        assert!(matches!(err, SceneError::DuplicateNode(id) if id == "A"));
        assert_eq!(scene.nodes.len(), 2);
        assert_eq!(scene.node("A").unwrap().x, 0.0);
    }

    #[test]
    fn edge_to_missing_node_rejected() {
        let mut scene = two_nodes();
        let err = scene.add_edge(Edge::new("e1", "A", "Z")).unwrap_err();
        assert!(matches!(err, SceneError::MissingNode { ref node, .. } if node == "Z"));
        assert!(scene.edges.is_empty());
    }

    #[test]
    fn edge_with_unknown_port_accepted() {
        let mut scene = two_nodes();
        scene
            .add_edge(Edge::new("e1", "A", "B").with_ports("nope", "nada"))
            .unwrap();
        assert_eq!(scene.edges.len(), 1);
    }

    #[test]
    fn remove_node_cascades() {
        let mut scene = two_nodes();
        scene.add_edge(Edge::new("e1", "A", "B")).unwrap();
        scene.add_edge(Edge::new("e2", "B", "A")).unwrap();
        assert!(scene.remove_node("A"));
        assert!(scene.edges.is_empty());
        assert_eq!(scene.nodes.len(), 1);
    }

    #[test]
    fn removing_unknown_ids_is_noop() {
        let mut scene = two_nodes();
        scene.add_edge(Edge::new("e1", "A", "B")).unwrap();
        let before = scene.clone();
        assert!(!scene.remove_node("ghost"));
        assert!(!scene.remove_edge("ghost"));
        assert_eq!(scene, before);
    }

    #[test]
    fn move_node_translates() {
        let mut scene = two_nodes();
        assert!(scene.move_node("B", Vec2::new(-10.0, 4.0)));
        let b = scene.node("B").unwrap();
        assert_eq!((b.x, b.y), (290.0, 4.0));
        assert!(!scene.move_node("ghost", Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn port_lookup_is_per_sequence() {
        let node = Node::new("n", "process", 0.0, 0.0, 150.0, 80.0)
            .with_input(Port::new("p", "default"))
            .with_output(Port::new("q", "default"))
            .with_output(Port::new("p", "default"));
        assert_eq!(node.port(PortDirection::Input, "p").map(|(i, _)| i), Some(0));
        assert_eq!(node.port(PortDirection::Output, "p").map(|(i, _)| i), Some(1));
        assert!(node.port(PortDirection::Input, "q").is_none());
    }

    #[test]
    fn default_sides() {
        let port = Port::new("p", "default");
        assert_eq!(port.side(PortDirection::Input), PortSide::Left);
        assert_eq!(port.side(PortDirection::Output), PortSide::Right);
        assert_eq!(port.clone().on(PortSide::Top).side(PortDirection::Output), PortSide::Top);
    }

    #[test]
    fn sanitize_repairs_invariants() {
        let mut scene = two_nodes();
        scene.nodes.push(Node::new("A", "dup", 1.0, 1.0, 1.0, 1.0));
        scene.edges.push(Edge::new("e1", "A", "B"));
        scene.edges.push(Edge::new("e1", "B", "A"));
        scene.edges.push(Edge::new("e2", "A", "ghost"));
        scene.viewport.scale = 0.0;

        assert_eq!(scene.sanitize(), 4);
        assert_eq!(scene.nodes.len(), 2);
        assert_eq!(scene.node("A").unwrap().kind, "task");
        assert_eq!(scene.edges.len(), 1);
        assert_eq!(scene.edges[0].source, "A");
        assert_eq!(scene.viewport.scale, 1.0);
        assert_eq!(scene.sanitize(), 0);
    }

    #[test]
    fn non_positive_size_rejected() {
        let mut scene = two_nodes();
        for (w, h) in [(0.0, 10.0), (10.0, -1.0), (-50.0, 0.0), (f64::NAN, 10.0)] {
            let err = scene.add_node(Node::new("Z", "task", 0.0, 0.0, w, h)).unwrap_err();
            assert!(matches!(err, SceneError::InvalidSize { ref id, .. } if id == "Z"), "{w}x{h}");
        }
        assert_eq!(scene.nodes.len(), 2);
    }

    #[test]
    fn sanitize_drops_unsized_nodes_and_their_edges() {
        let mut scene = two_nodes();
        scene.nodes.push(Node::new("Z", "task", 0.0, 0.0, -50.0, 0.0));
        scene.edges.push(Edge::new("e1", "A", "Z"));

        assert_eq!(scene.sanitize(), 2);
        assert!(!scene.contains_node("Z"));
        assert!(scene.edges.is_empty());
    }
}
