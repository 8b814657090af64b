//! Scene → render target drawing commands.
//!
//! Every call repaints the whole frame from scratch. Draw order matters for
//! picking: edges go down first so that nodes and ports sit on top of them.

use crate::ports::{PORT_LABEL_SIZE, PORT_RADIUS, placements};
use crate::route::{ProvisionalEdge, route_edge};
use crate::target::{PickTag, RenderTarget, StrokeStyle, TextAnchor, TextStyle};
use fc_core::{Edge, Node, PortRef, Scene, Selection, Theme};
use kurbo::{Circle, Point, Rect, Size};

pub const NODE_CORNER_RADIUS: f64 = 5.0;
pub const LABEL_SIZE: f64 = 14.0;
/// Node labels sit this far below the node's top edge.
pub const NODE_LABEL_BASELINE: f64 = 20.0;
/// Side of the world-space square covered by the grid, centred at the origin.
pub const GRID_EXTENT: f64 = 10_000.0;
pub const PROVISIONAL_DASH: [f64; 2] = [5.0, 5.0];

/// Everything one frame depends on.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    pub scene: &'a Scene,
    pub theme: &'a Theme,
    pub selection: &'a Selection,
    pub provisional: Option<&'a ProvisionalEdge>,
    /// Port currently under the pointer while wiring an edge.
    pub hovered_port: Option<&'a PortRef>,
    pub canvas: Size,
    pub grid_spacing: f64,
}

impl<'a> Frame<'a> {
    pub fn new(scene: &'a Scene, theme: &'a Theme, selection: &'a Selection, canvas: Size) -> Self {
        Self {
            scene,
            theme,
            selection,
            provisional: None,
            hovered_port: None,
            canvas,
            grid_spacing: 20.0,
        }
    }
}

/// Paint a full frame into `target`.
pub fn paint_scene<T: RenderTarget + ?Sized>(target: &mut T, frame: &Frame<'_>) {
    let scene = frame.scene;
    let theme = frame.theme;

    target.begin_frame(frame.canvas, theme.background);
    target.set_transform(scene.viewport.transform());

    if frame.grid_spacing > 0.0 {
        let half = GRID_EXTENT / 2.0;
        target.draw_grid(
            Rect::new(-half, -half, half, half),
            frame.grid_spacing,
            &StrokeStyle::solid(theme.grid, 0.5),
        );
    }

    for edge in &scene.edges {
        paint_edge(target, frame, edge);
    }

    if let Some(provisional) = frame.provisional {
        let stroke = StrokeStyle::dashed(theme.edge.stroke, 1.0, PROVISIONAL_DASH);
        target.draw_curve(provisional.curve(), &stroke, None);
    }

    for node in &scene.nodes {
        paint_node(target, frame, node);
    }

    target.end_frame();
    log::trace!(
        "painted {} nodes, {} edges at scale {}",
        scene.nodes.len(),
        scene.edges.len(),
        scene.viewport.scale
    );
}

// ─── Edges ───────────────────────────────────────────────────────────────

fn paint_edge<T: RenderTarget + ?Sized>(target: &mut T, frame: &Frame<'_>, edge: &Edge) {
    let Some(route) = route_edge(frame.scene, edge) else {
        return;
    };
    let colors = &frame.theme.edge;
    let stroke = if frame.selection.contains_edge(&edge.id) {
        StrokeStyle::solid(colors.selected_stroke, 2.0)
    } else {
        StrokeStyle::solid(colors.stroke, 1.0)
    };
    target.draw_curve(route.curve, &stroke, Some(PickTag::EdgePath { edge: edge.id.clone() }));

    if let (Some(text), Some(label)) = (&edge.label, &route.label) {
        let tag = PickTag::EdgeLabel { edge: edge.id.clone() };
        target.draw_rect(label.plate, Some(frame.theme.background), None, Some(tag.clone()));
        let style = TextStyle {
            color: colors.text,
            size: LABEL_SIZE,
            anchor: TextAnchor::Middle,
        };
        target.draw_text(label.origin, text, &style, Some(tag));
    }
}

// ─── Nodes ───────────────────────────────────────────────────────────────

fn paint_node<T: RenderTarget + ?Sized>(target: &mut T, frame: &Frame<'_>, node: &Node) {
    let colors = &frame.theme.node;
    let stroke = if frame.selection.contains_node(&node.id) {
        StrokeStyle::solid(colors.selected_stroke, 2.0)
    } else {
        StrokeStyle::solid(colors.stroke, 1.0)
    };
    target.draw_rect(
        node.bounds().to_rounded_rect(NODE_CORNER_RADIUS),
        Some(colors.fill),
        Some(&stroke),
        Some(PickTag::NodeBody { node: node.id.clone() }),
    );

    if !node.label.is_empty() {
        let label = &node.label;
        let origin = Point::new(node.x + node.width / 2.0, node.y + NODE_LABEL_BASELINE);
        let style = TextStyle {
            color: colors.text,
            size: LABEL_SIZE,
            anchor: TextAnchor::Middle,
        };
        target.draw_text(origin, label, &style, Some(PickTag::NodeLabel { node: node.id.clone() }));
    }

    paint_ports(target, frame, node);
}

fn paint_ports<T: RenderTarget + ?Sized>(target: &mut T, frame: &Frame<'_>, node: &Node) {
    let colors = &frame.theme.port;
    let port_stroke = StrokeStyle::solid(colors.stroke, 1.0);

    for (direction, index, placement) in placements(node) {
        let port = &node.ports(direction)[index];
        let hovered = frame
            .hovered_port
            .is_some_and(|h| h.node == node.id && h.port == port.id && h.direction == direction);
        let fill = if hovered { colors.hover_fill } else { colors.fill };

        target.draw_circle(
            Circle::new(placement.anchor, PORT_RADIUS),
            Some(fill),
            Some(&port_stroke),
            Some(PickTag::PortMarker {
                node: node.id.clone(),
                port: port.id.clone(),
                direction,
            }),
        );

        if let Some(label) = &port.label {
            let style = TextStyle {
                color: frame.theme.node.text,
                size: PORT_LABEL_SIZE,
                anchor: placement.label_anchor,
            };
            target.draw_text(
                placement.label_origin,
                label,
                &style,
                Some(PickTag::PortLabel { node: node.id.clone() }),
            );
        }
    }
}
