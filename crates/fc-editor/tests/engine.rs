//! Integration tests: the engine facade driven the way a host drives it.
//!
//! Uses the headless `DisplayList` target so hit testing runs against the
//! exact frame the engine painted.

use fc_core::{Edge, EngineConfig, Node, Scene, SceneError, Theme, Viewport};
use fc_editor::{Callbacks, Engine, InputEvent, Modifiers};
use fc_render::{DisplayList, PickTag};
use kurbo::{Point, Vec2};
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

fn pipeline() -> Scene {
    Scene::from_json(include_str!("fixtures/pipeline.json")).expect("fixture parses")
}

fn engine_with(scene: Scene) -> Engine<DisplayList> {
    Engine::new(DisplayList::new(), Some(scene), Theme::dark(), EngineConfig::default())
}

/// Log of every callback invocation, in order.
fn recorder(engine: &mut Engine<DisplayList>) -> Rc<RefCell<Vec<String>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let (a, b, c, d) = (log.clone(), log.clone(), log.clone(), log.clone());
    engine.set_callbacks(
        Callbacks::new()
            .on_node_selected(move |id| a.borrow_mut().push(format!("node:{id}")))
            .on_edge_selected(move |id| b.borrow_mut().push(format!("edge:{id}")))
            .on_canvas_click(move |x, y| c.borrow_mut().push(format!("click:{x},{y}")))
            .on_change(move |scene| d.borrow_mut().push(format!("change:{}", scene.edges.len()))),
    );
    log
}

fn drag(engine: &mut Engine<DisplayList>, from: (f64, f64), to: (f64, f64)) {
    engine.handle_input(&InputEvent::pointer_down(from.0, from.1));
    engine.handle_input(&InputEvent::pointer_move(to.0, to.1));
    engine.handle_input(&InputEvent::pointer_up(to.0, to.1));
}

// ─── Viewport ────────────────────────────────────────────────────────────

#[test]
fn wheel_zoom_keeps_world_point_under_cursor() {
    let mut engine = engine_with(pipeline());
    for (anchor, delta) in [
        (Point::new(400.0, 300.0), -1.0),
        (Point::new(13.0, 577.0), 1.0),
        (Point::new(790.0, 2.0), -1.0),
        (Point::new(250.0, 250.0), 1.0),
    ] {
        let before = engine.scene().viewport.to_world(anchor);
        engine.handle_input(&InputEvent::wheel(anchor.x, anchor.y, delta));
        let after = engine.scene().viewport.to_world(anchor);
        assert!((before - after).hypot() < 1e-9, "anchor {anchor:?} drifted");
    }
}

#[test]
fn two_toolbar_zoom_ins_compound() {
    let mut engine = engine_with(pipeline());
    engine.zoom_in();
    engine.zoom_in();
    assert!((engine.scene().viewport.scale - 1.44).abs() < 1e-9);
}

#[test]
fn zoom_is_clamped_by_config() {
    let mut engine = engine_with(pipeline());
    for _ in 0..100 {
        engine.zoom_out();
    }
    assert_eq!(engine.scene().viewport.scale, 0.1);
    engine.handle_key("0", Modifiers { ctrl: true, ..Modifiers::NONE });
    assert_eq!(engine.scene().viewport, Viewport::default());
}

#[test]
fn background_drag_pans_and_reports_world_click() {
    let mut engine = engine_with(pipeline());
    let log = recorder(&mut engine);
    drag(&mut engine, (600.0, 500.0), (610.0, 505.0));
    assert_eq!(engine.scene().viewport.x, 10.0);
    assert_eq!(engine.scene().viewport.y, 5.0);
    assert_eq!(*log.borrow(), vec!["click:600,500", "change:1"]);
}

#[test]
fn wheel_up_beyond_max_scale_never_zooms_out() {
    let mut scene = pipeline();
    scene.viewport.scale = 20.0;
    let mut engine = engine_with(scene);
    engine.handle_input(&InputEvent::wheel(100.0, 100.0, -1.0));
    assert_eq!(engine.scene().viewport.scale, 20.0);
    engine.handle_input(&InputEvent::wheel(100.0, 100.0, 1.0));
    assert_eq!(engine.scene().viewport.scale, 8.0);
}

#[test]
fn toolbar_view_ops_repaint_and_notify() {
    let mut engine = engine_with(pipeline());
    let log = recorder(&mut engine);
    let node_a = PickTag::NodeBody { node: "A".into() };

    engine.pan_by(Vec2::new(30.0, 40.0));
    engine.zoom_out();
    assert_eq!(engine.target().find(&node_a).unwrap().transform, engine.scene().viewport.transform());

    engine.reset_zoom();
    assert_eq!(engine.scene().viewport.scale, 1.0);
    assert_eq!(engine.target().find(&node_a).unwrap().transform, engine.scene().viewport.transform());

    engine.center_view();
    assert_eq!((engine.scene().viewport.x, engine.scene().viewport.y), (0.0, 0.0));

    engine.zoom_in();
    engine.reset_view();
    assert_eq!(engine.scene().viewport, Viewport::default());
    assert_eq!(engine.target().find(&node_a).unwrap().transform, Viewport::default().transform());

    assert_eq!(log.borrow().len(), 6);
    assert!(log.borrow().iter().all(|entry| entry == "change:1"));
}

#[test]
fn set_theme_repaints_without_notifying() {
    let mut engine = engine_with(pipeline());
    let log = recorder(&mut engine);
    engine.set_theme(Theme::light());
    assert_eq!(engine.target().background(), Some(Theme::light().background));
    assert!(log.borrow().is_empty());
}

#[test]
fn resize_moves_the_toolbar_zoom_center() {
    let mut engine = engine_with(pipeline());
    engine.resize(400.0, 200.0);
    assert_eq!(engine.canvas_size(), kurbo::Size::new(400.0, 200.0));

    let center = Point::new(200.0, 100.0);
    let before = engine.scene().viewport.to_world(center);
    engine.zoom_in();
    let after = engine.scene().viewport.to_world(center);
    assert!((before - after).hypot() < 1e-9);
}

// ─── Scene mutations ─────────────────────────────────────────────────────

#[test]
fn unsized_nodes_are_dropped_or_rejected() {
    let mut scene = pipeline();
    scene.nodes.push(Node::new("Z", "task", 0.0, 0.0, -50.0, 0.0));
    let mut engine = engine_with(scene);
    assert!(!engine.scene().contains_node("Z"));

    let log = recorder(&mut engine);
    let flat = engine.add_node(Node::new("W", "task", 0.0, 0.0, 0.0, -1.0));
    assert!(matches!(flat, Err(SceneError::InvalidSize { .. })));
    assert!(!engine.scene().contains_node("W"));
    assert!(log.borrow().is_empty());
}

#[test]
fn scenario_remove_node_cascades() {
    let mut engine = engine_with(pipeline());
    let log = recorder(&mut engine);
    engine.remove_node("A");
    assert!(engine.scene().edges.is_empty());
    assert!(engine.scene().edges.iter().all(|e| !e.touches("A")));
    assert_eq!(*log.borrow(), vec!["change:0"]);
}

#[test]
fn get_data_is_a_copy() {
    let engine = engine_with(pipeline());
    let mut copy = engine.get_data();
    copy.nodes[0].x = 999.0;
    copy.edges.clear();
    assert_eq!(engine.scene().nodes[0].x, 0.0);
    assert_eq!(engine.scene().edges.len(), 1);
}

#[test]
fn rejected_mutations_do_not_notify() {
    let mut engine = engine_with(pipeline());
    let log = recorder(&mut engine);

    let dup = engine.add_node(Node::new("A", "task", 0.0, 0.0, 10.0, 10.0));
    assert!(matches!(dup, Err(SceneError::DuplicateNode(id)) if id == "A"));

    let dangling = engine.add_edge(Edge::new("e2", "A", "ghost"));
    assert!(matches!(dangling, Err(SceneError::MissingNode { .. })));

    assert!(log.borrow().is_empty());
    assert_eq!(engine.scene().nodes.len(), 2);
    assert_eq!(engine.scene().edges.len(), 1);
}

#[test]
fn unknown_removals_still_notify() {
    let mut engine = engine_with(pipeline());
    let log = recorder(&mut engine);
    engine.remove_edge("nope");
    assert_eq!(*log.borrow(), vec!["change:1"]);
}

#[test]
fn default_node_has_one_port_each_way() {
    let mut engine = engine_with(Scene::new());
    let id = engine.add_default_node(Point::new(40.0, 60.0));
    let node = engine.scene().node(&id).unwrap();
    assert_eq!((node.x, node.y, node.width, node.height), (40.0, 60.0, 150.0, 80.0));
    assert_eq!(node.kind, "process");
    assert_eq!((node.inputs.len(), node.outputs.len()), (1, 1));
}

// ─── Gestures ────────────────────────────────────────────────────────────

#[test]
fn scenario_port_to_port_creates_edge() {
    let mut engine = engine_with(pipeline());
    let log = recorder(&mut engine);
    drag(&mut engine, (100.0, 30.0), (300.0, 30.0));

    let scene = engine.scene();
    assert_eq!(scene.edges.len(), 2);
    let created = &scene.edges[1];
    assert_eq!(created.id, "edge-1");
    assert_eq!((created.source.as_str(), created.target.as_str()), ("A", "B"));
    assert_eq!(created.source_port.as_deref(), Some("out"));
    assert_eq!(created.target_port.as_deref(), Some("in"));
    assert_eq!(*log.borrow(), vec!["change:2"]);
    assert!(engine.gesture().is_idle());
}

#[test]
fn scenario_port_to_own_port_creates_nothing() {
    let mut engine = engine_with(pipeline());
    let log = recorder(&mut engine);
    drag(&mut engine, (100.0, 30.0), (0.0, 30.0));
    assert_eq!(engine.scene().edges.len(), 1);
    assert!(log.borrow().is_empty());
}

#[test]
fn cancelled_edge_creation_leaves_edges_unchanged() {
    let mut engine = engine_with(pipeline());
    let before = engine.get_data();

    engine.handle_input(&InputEvent::pointer_down(100.0, 30.0));
    engine.handle_input(&InputEvent::pointer_move(200.0, 200.0));
    assert!(engine.gesture().provisional().is_some());
    engine.handle_input(&InputEvent::PointerLeave);
    assert_eq!(engine.scene(), &before);

    engine.handle_input(&InputEvent::pointer_down(100.0, 30.0));
    engine.handle_key("Escape", Modifiers::NONE);
    engine.handle_input(&InputEvent::pointer_up(300.0, 30.0));
    assert_eq!(engine.scene(), &before);

    drag(&mut engine, (100.0, 30.0), (200.0, 300.0));
    assert_eq!(engine.scene(), &before);
}

#[test]
fn node_drag_moves_by_world_delta() {
    let mut scene = pipeline();
    scene.viewport.scale = 2.0;
    let mut engine = engine_with(scene);
    let log = recorder(&mut engine);

    drag(&mut engine, (50.0, 80.0), (70.0, 100.0));
    let a = engine.scene().node("A").unwrap();
    assert_eq!((a.x, a.y), (10.0, 10.0));
    assert_eq!(*log.borrow(), vec!["node:A", "change:1"]);
    assert!(engine.selection().contains_node("A"));
}

#[test]
fn selection_is_exclusive_unless_command_held() {
    let mut engine = engine_with(pipeline());
    let ctrl = Modifiers { ctrl: true, ..Modifiers::NONE };

    engine.handle_input(&InputEvent::pointer_down(50.0, 10.0));
    engine.handle_input(&InputEvent::pointer_up(50.0, 10.0));
    engine.handle_input(&InputEvent::pointer_down(350.0, 10.0));
    engine.handle_input(&InputEvent::pointer_up(350.0, 10.0));
    assert_eq!(engine.selection().nodes().collect::<Vec<_>>(), vec!["B"]);

    engine.handle_input(&InputEvent::pointer_down(50.0, 10.0).with_modifiers(ctrl));
    engine.handle_input(&InputEvent::pointer_up(50.0, 10.0));
    assert_eq!(engine.selection().len(), 2);

    engine.handle_input(&InputEvent::pointer_down(200.0, 25.0).with_modifiers(ctrl));
    engine.handle_input(&InputEvent::pointer_up(200.0, 25.0));
    assert!(engine.selection().contains_edge("e1"));
    assert_eq!(engine.selection().len(), 3);
}

#[test]
fn clicking_an_edge_reports_it() {
    let mut engine = engine_with(pipeline());
    let log = recorder(&mut engine);
    engine.handle_input(&InputEvent::pointer_down(200.0, 25.0));
    engine.handle_input(&InputEvent::pointer_up(200.0, 25.0));
    assert_eq!(*log.borrow(), vec!["edge:e1"]);
    assert!(engine.selection().contains_edge("e1"));
}

#[test]
fn delete_key_removes_selection() {
    let mut engine = engine_with(pipeline());
    engine.handle_input(&InputEvent::pointer_down(200.0, 25.0));
    engine.handle_input(&InputEvent::pointer_up(200.0, 25.0));
    assert!(engine.handle_key("Delete", Modifiers::NONE));
    assert!(engine.scene().edges.is_empty());
    assert_eq!(engine.scene().nodes.len(), 2);
    assert!(engine.selection().is_empty());
    assert!(!engine.handle_key("q", Modifiers::NONE));
}

// ─── Host wiring ─────────────────────────────────────────────────────────

#[test]
fn callbacks_merge_per_key() {
    let mut engine = engine_with(pipeline());
    let changes = Rc::new(RefCell::new(0));
    let selected = Rc::new(RefCell::new(Vec::<String>::new()));

    let c = changes.clone();
    engine.set_callbacks(Callbacks::new().on_change(move |_| *c.borrow_mut() += 1));
    let s = selected.clone();
    engine.set_callbacks(Callbacks::new().on_node_selected(move |id| s.borrow_mut().push(id.to_string())));

    engine.handle_input(&InputEvent::pointer_down(50.0, 10.0));
    engine.handle_input(&InputEvent::pointer_up(50.0, 10.0));
    engine.pan_by(Vec2::new(1.0, 1.0));

    assert_eq!(*changes.borrow(), 1);
    assert_eq!(*selected.borrow(), vec!["A".to_string()]);
}

#[test]
fn engines_do_not_share_state() {
    let mut first = engine_with(pipeline());
    let mut second = engine_with(pipeline());
    drag(&mut first, (100.0, 30.0), (300.0, 30.0));
    drag(&mut second, (100.0, 30.0), (300.0, 30.0));
    assert_eq!(first.scene().edges[1].id, "edge-1");
    assert_eq!(second.scene().edges[1].id, "edge-1");

    first.zoom_in();
    assert_eq!(second.scene().viewport.scale, 1.0);
}

#[test]
fn set_data_repaints_without_notifying() {
    let mut engine = engine_with(Scene::new());
    let log = recorder(&mut engine);
    engine.set_data(Scene::sample_workflow());
    assert!(log.borrow().is_empty());
    assert_eq!(engine.target().texts().filter(|t| *t == "Process").count(), 1);
}

#[test]
fn exports_round_trip_and_render() {
    let engine = engine_with(Scene::sample_workflow());
    let json = engine.export_json().unwrap();
    assert_eq!(Scene::from_json(&json).unwrap(), *engine.scene());

    let svg = engine.export_svg();
    assert!(svg.contains(">Result</text>"));
}
