//! WASM bridge for FC: mounts a flow canvas into a web page.
//!
//! Compiled via `wasm-pack build --target web`. `FlowCanvas.mount` creates a
//! full-size `<canvas>` inside the host's container, wires pointer, wheel
//! and key listeners to that canvas only, and drives an `Engine` backed by
//! Canvas2D.
//!
//! Host callbacks are queued while the engine is borrowed and delivered
//! afterwards, so a callback may call straight back into the canvas.

mod render2d;

use fc_core::{Edge, EngineConfig, Node, Scene, Theme};
use fc_editor::{Callbacks, Engine, InputEvent, Modifiers};
use kurbo::Point;
use render2d::Canvas2dTarget;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    AddEventListenerOptions, CanvasRenderingContext2d, Event, HtmlCanvasElement, HtmlElement,
    KeyboardEvent, MouseEvent, WheelEvent,
};

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Notification waiting for the engine borrow to be released.
enum Pending {
    NodeSelected(String),
    EdgeSelected(String),
    CanvasClick(f64, f64),
    Change(Scene),
}

#[derive(Default)]
struct JsCallbacks {
    on_node_selected: Option<js_sys::Function>,
    on_edge_selected: Option<js_sys::Function>,
    on_canvas_click: Option<js_sys::Function>,
    on_change: Option<js_sys::Function>,
}

impl JsCallbacks {
    /// Take every function-valued key of `obj`; keys that are absent keep
    /// their previous handler.
    fn merge(&mut self, obj: &JsValue) {
        let read = |key: &str| {
            js_sys::Reflect::get(obj, &JsValue::from_str(key))
                .ok()
                .and_then(|v| v.dyn_into::<js_sys::Function>().ok())
        };
        if let Some(f) = read("onNodeSelected") {
            self.on_node_selected = Some(f);
        }
        if let Some(f) = read("onEdgeSelected") {
            self.on_edge_selected = Some(f);
        }
        if let Some(f) = read("onCanvasClick") {
            self.on_canvas_click = Some(f);
        }
        if let Some(f) = read("onChange") {
            self.on_change = Some(f);
        }
    }
}

fn scene_to_js(scene: &Scene) -> Result<JsValue, JsValue> {
    let json = scene.to_json().map_err(js_err)?;
    js_sys::JSON::parse(&json)
}

struct Inner {
    engine: RefCell<Engine<Canvas2dTarget>>,
    canvas: HtmlCanvasElement,
    js: RefCell<JsCallbacks>,
    queue: Rc<RefCell<Vec<Pending>>>,
}

impl Inner {
    /// Run `f` against the engine, then deliver whatever it queued.
    fn with_engine<R>(&self, f: impl FnOnce(&mut Engine<Canvas2dTarget>) -> R) -> R {
        let out = f(&mut self.engine.borrow_mut());
        self.flush();
        out
    }

    fn flush(&self) {
        loop {
            let batch = std::mem::take(&mut *self.queue.borrow_mut());
            if batch.is_empty() {
                return;
            }
            for pending in batch {
                self.deliver(pending);
            }
        }
    }

    fn deliver(&self, pending: Pending) {
        // Clone the handler out so a callback may replace the callbacks.
        let handler = {
            let callbacks = self.js.borrow();
            match &pending {
                Pending::NodeSelected(_) => callbacks.on_node_selected.clone(),
                Pending::EdgeSelected(_) => callbacks.on_edge_selected.clone(),
                Pending::CanvasClick(..) => callbacks.on_canvas_click.clone(),
                Pending::Change(_) => callbacks.on_change.clone(),
            }
        };
        let Some(f) = handler else { return };
        let this = JsValue::NULL;
        let result = match pending {
            Pending::NodeSelected(id) | Pending::EdgeSelected(id) => f.call1(&this, &JsValue::from_str(&id)),
            Pending::CanvasClick(x, y) => f.call2(&this, &JsValue::from_f64(x), &JsValue::from_f64(y)),
            Pending::Change(scene) => scene_to_js(&scene).and_then(|data| f.call1(&this, &data)),
        };
        if let Err(err) = result {
            log::warn!("host callback threw: {err:?}");
        }
    }

    fn local_point(&self, event: &MouseEvent) -> Point {
        let rect = self.canvas.get_bounding_client_rect();
        Point::new(
            event.client_x() as f64 - rect.left(),
            event.client_y() as f64 - rect.top(),
        )
    }
}

fn modifiers_of(event: &MouseEvent) -> Modifiers {
    Modifiers {
        shift: event.shift_key(),
        ctrl: event.ctrl_key(),
        alt: event.alt_key(),
        meta: event.meta_key(),
    }
}

fn pointer_input(inner: &Inner, kind: &str, event: &Event) -> Option<InputEvent> {
    if kind == "pointerleave" {
        return Some(InputEvent::PointerLeave);
    }
    let mouse = event.dyn_ref::<MouseEvent>()?;
    let p = inner.local_point(mouse);
    let input = match kind {
        "pointerdown" => InputEvent::pointer_down(p.x, p.y),
        "pointermove" => InputEvent::pointer_move(p.x, p.y),
        "pointerup" => InputEvent::pointer_up(p.x, p.y),
        "wheel" => {
            event.prevent_default();
            let wheel = event.dyn_ref::<WheelEvent>()?;
            return Some(InputEvent::wheel(p.x, p.y, wheel.delta_y()));
        }
        _ => return None,
    };
    Some(input.with_modifiers(modifiers_of(mouse)))
}

struct Listener {
    kind: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

/// One mounted canvas. Dropping it detaches the listeners and removes the
/// `<canvas>` element.
#[wasm_bindgen]
pub struct FlowCanvas {
    inner: Rc<Inner>,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl FlowCanvas {
    /// Mount into `container`. `initial_json` is a scene in the host schema;
    /// when absent the built-in sample workflow is shown.
    pub fn mount(container: &HtmlElement, initial_json: Option<String>, dark: bool) -> Result<FlowCanvas, JsValue> {
        console_error_panic_hook_setup();

        let initial = match initial_json {
            Some(json) => Scene::from_json(&json).map_err(js_err)?,
            None => Scene::sample_workflow(),
        };

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
        let style = canvas.style();
        style.set_property("width", "100%")?;
        style.set_property("height", "100%")?;
        style.set_property("display", "block")?;
        style.set_property("touch-action", "none")?;
        canvas.set_tab_index(0);
        container.append_child(&canvas)?;

        let mut config = EngineConfig::default();
        let (w, h) = (container.client_width(), container.client_height());
        if w > 0 && h > 0 {
            config.canvas_width = w as f64;
            config.canvas_height = h as f64;
        }
        canvas.set_width(config.canvas_width as u32);
        canvas.set_height(config.canvas_height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;

        let theme = if dark { Theme::dark() } else { Theme::light() };
        let mut engine = Engine::new(Canvas2dTarget::new(ctx), Some(initial), theme, config);

        let queue: Rc<RefCell<Vec<Pending>>> = Rc::default();
        let (q1, q2, q3, q4) = (queue.clone(), queue.clone(), queue.clone(), queue.clone());
        engine.set_callbacks(
            Callbacks::new()
                .on_node_selected(move |id| q1.borrow_mut().push(Pending::NodeSelected(id.to_string())))
                .on_edge_selected(move |id| q2.borrow_mut().push(Pending::EdgeSelected(id.to_string())))
                .on_canvas_click(move |x, y| q3.borrow_mut().push(Pending::CanvasClick(x, y)))
                .on_change(move |scene| q4.borrow_mut().push(Pending::Change(scene.clone()))),
        );

        let inner = Rc::new(Inner {
            engine: RefCell::new(engine),
            canvas,
            js: RefCell::default(),
            queue,
        });

        let mut listeners = Vec::new();
        for kind in ["pointerdown", "pointermove", "pointerup", "pointerleave", "wheel"] {
            let weak = Rc::downgrade(&inner);
            let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
                let Some(inner) = weak.upgrade() else { return };
                if let Some(input) = pointer_input(&inner, kind, &event) {
                    inner.with_engine(|engine| engine.handle_input(&input));
                }
            });
            listeners.push(Listener { kind, closure });
        }

        let weak = Rc::downgrade(&inner);
        let keydown = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(inner) = weak.upgrade() else { return };
            let Some(key) = event.dyn_ref::<KeyboardEvent>() else { return };
            let mods = Modifiers {
                shift: key.shift_key(),
                ctrl: key.ctrl_key(),
                alt: key.alt_key(),
                meta: key.meta_key(),
            };
            if inner.with_engine(|engine| engine.handle_key(&key.key(), mods)) {
                event.prevent_default();
            }
        });
        listeners.push(Listener {
            kind: "keydown",
            closure: keydown,
        });

        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        for listener in &listeners {
            inner.canvas.add_event_listener_with_callback_and_add_event_listener_options(
                listener.kind,
                listener.closure.as_ref().unchecked_ref(),
                &options,
            )?;
        }

        log::debug!("flow canvas mounted ({}x{})", config.canvas_width, config.canvas_height);
        Ok(FlowCanvas { inner, listeners })
    }

    // ─── Data ────────────────────────────────────────────────────────────

    /// Replace the scene. Does not fire `onChange`.
    #[wasm_bindgen(js_name = setData)]
    pub fn set_data(&self, json: &str) -> Result<(), JsValue> {
        let scene = Scene::from_json(json).map_err(js_err)?;
        self.inner.with_engine(|engine| engine.set_data(scene));
        Ok(())
    }

    /// Copy of the scene as a plain JS object.
    #[wasm_bindgen(js_name = getData)]
    pub fn get_data(&self) -> Result<JsValue, JsValue> {
        scene_to_js(self.inner.engine.borrow().scene())
    }

    #[wasm_bindgen(js_name = addNode)]
    pub fn add_node(&self, json: &str) -> Result<(), JsValue> {
        let node: Node = serde_json::from_str(json).map_err(js_err)?;
        self.inner.with_engine(|engine| engine.add_node(node)).map_err(js_err)
    }

    #[wasm_bindgen(js_name = removeNode)]
    pub fn remove_node(&self, id: &str) {
        self.inner.with_engine(|engine| engine.remove_node(id));
    }

    #[wasm_bindgen(js_name = addEdge)]
    pub fn add_edge(&self, json: &str) -> Result<(), JsValue> {
        let edge: Edge = serde_json::from_str(json).map_err(js_err)?;
        self.inner.with_engine(|engine| engine.add_edge(edge)).map_err(js_err)
    }

    #[wasm_bindgen(js_name = removeEdge)]
    pub fn remove_edge(&self, id: &str) {
        self.inner.with_engine(|engine| engine.remove_edge(id));
    }

    /// Toolbar "add node" at a world position. Returns the new node id.
    #[wasm_bindgen(js_name = addDefaultNode)]
    pub fn add_default_node(&self, x: f64, y: f64) -> String {
        self.inner.with_engine(|engine| engine.add_default_node(Point::new(x, y)))
    }

    #[wasm_bindgen(js_name = removeSelected)]
    pub fn remove_selected(&self) {
        self.inner.with_engine(|engine| engine.remove_selected());
    }

    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&self) -> Result<String, JsValue> {
        self.inner.engine.borrow().export_json().map_err(js_err)
    }

    #[wasm_bindgen(js_name = exportSvg)]
    pub fn export_svg(&self) -> String {
        self.inner.engine.borrow().export_svg()
    }

    // ─── View ────────────────────────────────────────────────────────────

    /// Switch between the built-in dark and light presets.
    #[wasm_bindgen(js_name = setTheme)]
    pub fn set_theme(&self, dark: bool) {
        let theme = if dark { Theme::dark() } else { Theme::light() };
        self.inner.with_engine(|engine| engine.set_theme(theme));
    }

    /// Apply a custom theme given as JSON.
    #[wasm_bindgen(js_name = setThemeJson)]
    pub fn set_theme_json(&self, json: &str) -> Result<(), JsValue> {
        let theme = Theme::from_json(json).map_err(js_err)?;
        self.inner.with_engine(|engine| engine.set_theme(theme));
        Ok(())
    }

    #[wasm_bindgen(js_name = zoomIn)]
    pub fn zoom_in(&self) {
        self.inner.with_engine(|engine| engine.zoom_in());
    }

    #[wasm_bindgen(js_name = zoomOut)]
    pub fn zoom_out(&self) {
        self.inner.with_engine(|engine| engine.zoom_out());
    }

    #[wasm_bindgen(js_name = resetZoom)]
    pub fn reset_zoom(&self) {
        self.inner.with_engine(|engine| engine.reset_zoom());
    }

    #[wasm_bindgen(js_name = centerView)]
    pub fn center_view(&self) {
        self.inner.with_engine(|engine| engine.center_view());
    }

    /// Match the canvas backing store to a new container size.
    pub fn resize(&self, width: f64, height: f64) {
        self.inner.canvas.set_width(width.max(0.0) as u32);
        self.inner.canvas.set_height(height.max(0.0) as u32);
        self.inner.with_engine(|engine| engine.resize(width, height));
    }

    // ─── Host wiring ─────────────────────────────────────────────────────

    /// `{onNodeSelected, onEdgeSelected, onCanvasClick, onChange}`; keys
    /// left out keep their current handler.
    #[wasm_bindgen(js_name = setCallbacks)]
    pub fn set_callbacks(&self, callbacks: JsValue) {
        self.inner.js.borrow_mut().merge(&callbacks);
    }
}

impl Drop for FlowCanvas {
    fn drop(&mut self) {
        for listener in &self.listeners {
            let _ = self
                .inner
                .canvas
                .remove_event_listener_with_callback(listener.kind, listener.closure.as_ref().unchecked_ref());
        }
        self.inner.canvas.remove();
    }
}

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("FC WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone helpers (no canvas needed) ───────────────────────────────

/// Validate scene JSON. Returns `{"ok":true}` or `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate(json: &str) -> String {
    let result = Scene::from_json(json).map(|mut scene| scene.sanitize());
    let report = match result {
        Ok(0) => serde_json::json!({ "ok": true }),
        Ok(repairs) => serde_json::json!({ "ok": false, "error": format!("{repairs} invalid entries") }),
        Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }),
    };
    report.to_string()
}

/// The built-in demo workflow as JSON.
#[wasm_bindgen(js_name = sampleWorkflow)]
pub fn sample_workflow() -> String {
    Scene::sample_workflow().to_json().unwrap_or_default()
}
