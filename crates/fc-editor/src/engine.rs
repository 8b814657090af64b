//! The embeddable canvas engine.
//!
//! `Engine` owns one scene, its selection, the gesture in flight and a
//! render target. Every public operation runs to completion: it mutates the
//! scene, repaints the full frame, then notifies the host. Hosts only ever
//! see copies of the scene.

use crate::input::{InputEvent, Modifiers};
use crate::interaction::{Effect, Gesture};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use fc_core::error::Result;
use fc_core::{
    Edge, EngineConfig, IdGenerator, Node, Port, PortRef, Scene, Selected, Selection, Theme,
};
use fc_render::{DisplayList, Frame, HitTarget, RenderTarget, hit_test, paint_scene};
use kurbo::{Point, Size, Vec2};

/// Size of nodes created by [`Engine::add_default_node`].
pub const DEFAULT_NODE_SIZE: Size = Size::new(150.0, 80.0);

type NodeSelected = Box<dyn FnMut(&str)>;
type EdgeSelected = Box<dyn FnMut(&str)>;
type CanvasClick = Box<dyn FnMut(f64, f64)>;
type Change = Box<dyn FnMut(&Scene)>;

/// Host notifications. Unset entries are simply not called.
#[derive(Default)]
pub struct Callbacks {
    pub on_node_selected: Option<NodeSelected>,
    pub on_edge_selected: Option<EdgeSelected>,
    /// World coordinates of a press on empty canvas.
    pub on_canvas_click: Option<CanvasClick>,
    /// Receives the scene after every committed change.
    pub on_change: Option<Change>,
}

impl Callbacks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_node_selected(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_node_selected = Some(Box::new(f));
        self
    }

    pub fn on_edge_selected(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_edge_selected = Some(Box::new(f));
        self
    }

    pub fn on_canvas_click(mut self, f: impl FnMut(f64, f64) + 'static) -> Self {
        self.on_canvas_click = Some(Box::new(f));
        self
    }

    pub fn on_change(mut self, f: impl FnMut(&Scene) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    /// Overlay `other`: entries it sets replace ours, the rest are kept.
    pub fn merge(&mut self, other: Callbacks) {
        if other.on_node_selected.is_some() {
            self.on_node_selected = other.on_node_selected;
        }
        if other.on_edge_selected.is_some() {
            self.on_edge_selected = other.on_edge_selected;
        }
        if other.on_canvas_click.is_some() {
            self.on_canvas_click = other.on_canvas_click;
        }
        if other.on_change.is_some() {
            self.on_change = other.on_change;
        }
    }
}

fn frame<'a>(
    scene: &'a Scene,
    theme: &'a Theme,
    selection: &'a Selection,
    gesture: &'a Gesture,
    canvas: Size,
    config: &EngineConfig,
) -> Frame<'a> {
    Frame {
        provisional: gesture.provisional(),
        hovered_port: gesture.hovered_port(),
        grid_spacing: config.grid_spacing,
        ..Frame::new(scene, theme, selection, canvas)
    }
}

pub struct Engine<T: RenderTarget> {
    scene: Scene,
    theme: Theme,
    config: EngineConfig,
    canvas: Size,
    selection: Selection,
    gesture: Gesture,
    node_ids: IdGenerator,
    edge_ids: IdGenerator,
    target: T,
    callbacks: Callbacks,
}

impl<T: RenderTarget> Engine<T> {
    /// Build an engine and paint the first frame. `None` starts empty.
    pub fn new(mut target: T, initial: Option<Scene>, theme: Theme, config: EngineConfig) -> Self {
        target.set_pick_tolerance(config.edge_pick_tolerance);
        let mut engine = Self {
            scene: Scene::new(),
            theme,
            config,
            canvas: config.canvas_size(),
            selection: Selection::new(),
            gesture: Gesture::new(),
            node_ids: IdGenerator::new("node"),
            edge_ids: IdGenerator::new("edge"),
            target,
            callbacks: Callbacks::new(),
        };
        engine.set_data(initial.unwrap_or_default());
        engine
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Deep copy of the current scene; mutating it never affects the engine.
    pub fn get_data(&self) -> Scene {
        self.scene.clone()
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas
    }

    // ─── Scene operations ────────────────────────────────────────────────

    /// Replace the whole scene. Repaints; does not notify.
    pub fn set_data(&mut self, mut scene: Scene) {
        let repaired = scene.sanitize();
        if repaired > 0 {
            log::warn!("set_data: dropped or repaired {repaired} invalid entries");
        }
        self.scene = scene;
        self.selection.clear();
        self.gesture.cancel();
        self.redraw();
    }

    pub fn add_node(&mut self, node: Node) -> Result<()> {
        let id = node.id.clone();
        if let Err(err) = self.scene.add_node(node) {
            log::warn!("add_node rejected: {err}");
            return Err(err);
        }
        log::debug!("added node {id}");
        self.commit();
        Ok(())
    }

    /// Remove a node and every edge touching it. Unknown ids are a no-op
    /// that still repaints and notifies.
    pub fn remove_node(&mut self, id: &str) {
        if self.scene.remove_node(id) {
            log::debug!("removed node {id}");
        }
        self.prune_selection();
        self.commit();
    }

    pub fn add_edge(&mut self, edge: Edge) -> Result<()> {
        let id = edge.id.clone();
        if let Err(err) = self.scene.add_edge(edge) {
            log::warn!("add_edge rejected: {err}");
            return Err(err);
        }
        log::debug!("added edge {id}");
        self.commit();
        Ok(())
    }

    pub fn remove_edge(&mut self, id: &str) {
        if self.scene.remove_edge(id) {
            log::debug!("removed edge {id}");
        }
        self.prune_selection();
        self.commit();
    }

    /// Delete every selected node (with its edges) and edge.
    pub fn remove_selected(&mut self) {
        if self.selection.is_empty() {
            return;
        }
        let nodes: Vec<String> = self.selection.nodes().map(str::to_string).collect();
        let edges: Vec<String> = self.selection.edges().map(str::to_string).collect();
        for id in &edges {
            self.scene.remove_edge(id);
        }
        for id in &nodes {
            self.scene.remove_node(id);
        }
        log::debug!("removed selection: {} nodes, {} edges", nodes.len(), edges.len());
        self.selection.clear();
        self.commit();
    }

    /// Toolbar "add node": a process node with one input and one output,
    /// top-left corner at `world`. Returns the new id.
    pub fn add_default_node(&mut self, world: Point) -> String {
        let scene = &self.scene;
        let id = self.node_ids.next_unique(|id| scene.contains_node(id));
        let node = Node::new(
            id.clone(),
            "process",
            world.x,
            world.y,
            DEFAULT_NODE_SIZE.width,
            DEFAULT_NODE_SIZE.height,
        )
        .with_label("New Node")
        .with_input(Port::new("in-1", "default").with_label("Input"))
        .with_output(Port::new("out-1", "default").with_label("Output"));
        if let Err(err) = self.add_node(node) {
            log::warn!("default node not added: {err}");
        }
        id
    }

    pub fn export_json(&self) -> Result<String> {
        self.scene.to_json_pretty()
    }

    /// Paint the current frame into a fresh display list and serialize it.
    pub fn export_svg(&self) -> String {
        let mut list = DisplayList::new();
        let frame = frame(
            &self.scene,
            &self.theme,
            &self.selection,
            &self.gesture,
            self.canvas,
            &self.config,
        );
        paint_scene(&mut list, &frame);
        list.to_svg()
    }

    // ─── View ────────────────────────────────────────────────────────────

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.redraw();
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.canvas = Size::new(width, height);
        self.redraw();
    }

    pub fn zoom_in(&mut self) {
        self.zoom_toolbar(self.config.zoom_in_factor);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_toolbar(self.config.zoom_out_factor);
    }

    fn zoom_toolbar(&mut self, factor: f64) {
        self.scene
            .viewport
            .zoom_about_center(self.canvas, factor, self.config.zoom_limits);
        self.commit();
    }

    pub fn reset_zoom(&mut self) {
        self.scene.viewport.reset_zoom();
        self.commit();
    }

    pub fn center_view(&mut self) {
        self.scene.viewport.center_view();
        self.commit();
    }

    pub fn reset_view(&mut self) {
        self.scene.viewport.reset_zoom();
        self.scene.viewport.center_view();
        self.commit();
    }

    /// Translate the view by a screen-space delta.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.scene.viewport.pan_by(delta);
        self.commit();
    }

    // ─── Host wiring ─────────────────────────────────────────────────────

    pub fn set_callbacks(&mut self, callbacks: Callbacks) {
        self.callbacks.merge(callbacks);
    }

    /// Feed one pointer or wheel event.
    pub fn handle_input(&mut self, event: &InputEvent) {
        let hit = match event {
            InputEvent::PointerDown { x, y, .. } | InputEvent::PointerUp { x, y, .. } => {
                hit_test(&self.target, Point::new(*x, *y))
            }
            InputEvent::PointerMove { x, y, .. } if self.gesture.provisional().is_some() => {
                hit_test(&self.target, Point::new(*x, *y))
            }
            _ => HitTarget::Background,
        };
        let viewport = self.scene.viewport;
        let effects = self.gesture.handle(event, &hit, &viewport);
        self.apply(effects);
    }

    /// Feed one key press. Returns `true` if it was bound.
    pub fn handle_key(&mut self, key: &str, modifiers: Modifiers) -> bool {
        let Some(action) = ShortcutMap::resolve(key, modifiers) else {
            return false;
        };
        log::debug!("shortcut {key:?} -> {action:?}");
        match action {
            ShortcutAction::Delete => self.remove_selected(),
            ShortcutAction::ZoomIn => self.zoom_in(),
            ShortcutAction::ZoomOut => self.zoom_out(),
            ShortcutAction::ResetView => self.reset_view(),
            ShortcutAction::Cancel => self.cancel(),
        }
        true
    }

    /// Abort the gesture in flight and clear the selection.
    pub fn cancel(&mut self) {
        self.gesture.cancel();
        self.selection.clear();
        self.redraw();
    }

    // ─── Internals ───────────────────────────────────────────────────────

    fn apply(&mut self, effects: Vec<Effect>) {
        let mut changed = false;
        let mut dirty = false;

        for effect in effects {
            match effect {
                Effect::Select { item, additive } => {
                    self.selection.select(item.clone(), additive);
                    dirty = true;
                    match &item {
                        Selected::Node(id) => {
                            if let Some(cb) = &mut self.callbacks.on_node_selected {
                                cb(id);
                            }
                        }
                        Selected::Edge(id) => {
                            if let Some(cb) = &mut self.callbacks.on_edge_selected {
                                cb(id);
                            }
                        }
                    }
                }
                Effect::ClearSelection => {
                    self.selection.clear();
                    dirty = true;
                }
                Effect::CanvasClick { world } => {
                    if let Some(cb) = &mut self.callbacks.on_canvas_click {
                        cb(world.x, world.y);
                    }
                }
                Effect::MoveNode { id, delta } => {
                    changed |= self.scene.move_node(&id, delta);
                }
                Effect::Pan { delta } => {
                    self.scene.viewport.pan_by(delta);
                    changed = true;
                }
                Effect::Zoom { anchor, zoom_in } => {
                    let factor = if zoom_in {
                        self.config.wheel_in_factor
                    } else {
                        self.config.wheel_out_factor
                    };
                    self.scene
                        .viewport
                        .zoom_at(anchor, factor, self.config.zoom_limits);
                    changed = true;
                }
                Effect::Connect { source, target } => {
                    dirty = true;
                    changed |= self.connect(source, target);
                }
                Effect::Redraw => dirty = true,
            }
        }

        if changed || dirty {
            self.redraw();
        }
        if changed {
            self.notify_change();
        }
    }

    fn connect(&mut self, source: PortRef, target: PortRef) -> bool {
        let scene = &self.scene;
        let id = self.edge_ids.next_unique(|id| scene.contains_edge(id));
        let edge = Edge::new(id, source.node, target.node).with_ports(source.port, target.port);
        match self.scene.add_edge(edge) {
            Ok(()) => {
                log::debug!("connected edge {:?}", self.scene.edges.last().map(|e| &e.id));
                true
            }
            Err(err) => {
                log::warn!("edge creation rejected: {err}");
                false
            }
        }
    }

    fn prune_selection(&mut self) {
        let scene = &self.scene;
        self.selection.retain(|item| match item {
            Selected::Node(id) => scene.contains_node(id),
            Selected::Edge(id) => scene.contains_edge(id),
        });
    }

    fn commit(&mut self) {
        self.redraw();
        self.notify_change();
    }

    fn notify_change(&mut self) {
        if let Some(cb) = &mut self.callbacks.on_change {
            cb(&self.scene);
        }
    }

    fn redraw(&mut self) {
        let frame = frame(
            &self.scene,
            &self.theme,
            &self.selection,
            &self.gesture,
            self.canvas,
            &self.config,
        );
        paint_scene(&mut self.target, &frame);
    }
}
