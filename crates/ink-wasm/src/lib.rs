//! WASM bridge for Inkboard: exposes the drawing canvas to JavaScript.
//!
//! Compiled via `wasm-pack build --target web`. The host page forwards
//! pointer and keyboard events through `InkCanvas` methods; wheel and touch
//! listeners are registered here (non-passive, so they can suppress the
//! browser's own scroll and zoom).

mod listeners;
mod render2d;

use ink_core::{BoundingBox, CanvasConfig, Mode, Point, Rect, Stroke, StrokeOptions, StrokeStore, ViewTransform};
use ink_editor::input::Touches;
use ink_editor::{Brush, InputController, InputEvent, MemoryStore, Modifiers, ShortcutAction, ShortcutMap};
use listeners::Listeners;
use render2d::CanvasSurface;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, TouchEvent, WheelEvent};

/// Everything a DOM callback needs, shared between `InkCanvas` and the
/// wheel/touch closures.
struct Session {
    controller: InputController<MemoryStore>,
    surface: CanvasSurface,
    canvas: HtmlCanvasElement,
}

impl Session {
    fn redraw(&mut self) {
        self.controller.render(&mut self.surface);
    }

    /// Handle one event and repaint if it changed anything visible.
    fn dispatch(&mut self, event: &InputEvent) -> bool {
        let changed = self.controller.handle(event);
        if changed {
            self.redraw();
        }
        changed
    }
}

/// The main WASM-facing canvas controller.
#[wasm_bindgen]
pub struct InkCanvas {
    session: Rc<RefCell<Session>>,
    /// Wheel/touch listeners; `None` while detached.
    listeners: Option<Listeners>,
}

#[wasm_bindgen]
impl InkCanvas {
    /// Bind to `canvas`, size it for the current device pixel ratio, and
    /// center the page in it.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<InkCanvas, JsValue> {
        console_error_panic_hook_setup();

        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Missing canvas context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let session = Session {
            controller: InputController::new(MemoryStore::new(), CanvasConfig::default()),
            surface: CanvasSurface::new(ctx),
            canvas,
        };
        let mut this = Self {
            session: Rc::new(RefCell::new(session)),
            listeners: None,
        };
        this.resize()?;
        {
            let mut s = this.session.borrow_mut();
            s.controller.center_canvas();
            s.redraw();
        }
        Ok(this)
    }

    /// Size the backing store to `css size × devicePixelRatio` and refresh
    /// the viewport rect used for coordinate mapping.
    pub fn resize(&mut self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("Missing window"))?;
        let dpr = window.device_pixel_ratio();
        let mut s = self.session.borrow_mut();

        let rect = s.canvas.get_bounding_client_rect();
        s.canvas.set_width((rect.width() * dpr).round() as u32);
        s.canvas.set_height((rect.height() * dpr).round() as u32);
        let style = s.canvas.style();
        style.set_property("width", &format!("{}px", rect.width()))?;
        style.set_property("height", &format!("{}px", rect.height()))?;

        s.surface.set_dpr(dpr);
        s.controller
            .set_viewport(Rect::new(rect.left(), rect.top(), rect.right(), rect.bottom()));
        log::debug!("resize {}×{} @{dpr}", rect.width(), rect.height());
        s.redraw();
        Ok(())
    }

    /// Register wheel and touch listeners on the canvas. Idempotent.
    pub fn attach(&mut self) -> Result<(), JsValue> {
        if self.listeners.is_some() {
            return Ok(());
        }
        let target: EventTarget = self.session.borrow().canvas.clone().into();
        let mut listeners = Listeners::new(target);

        let session = self.session.clone();
        listeners.add("wheel", false, move |event: Event| {
            let Some(e) = event.dyn_ref::<WheelEvent>() else {
                return;
            };
            e.prevent_default();
            let wheel = InputEvent::Wheel {
                x: e.client_x() as f64,
                y: e.client_y() as f64,
                dx: e.delta_x(),
                dy: e.delta_y(),
                modifiers: Modifiers {
                    shift: e.shift_key(),
                    ctrl: e.ctrl_key(),
                    alt: e.alt_key(),
                    meta: e.meta_key(),
                },
            };
            with_session(&session, |s| s.dispatch(&wheel));
        })?;

        let session = self.session.clone();
        listeners.add("touchstart", true, move |event: Event| {
            let Some(e) = event.dyn_ref::<TouchEvent>() else {
                return;
            };
            let touches = touch_points(e);
            with_session(&session, |s| s.dispatch(&InputEvent::TouchStart { touches }));
        })?;

        let session = self.session.clone();
        listeners.add("touchmove", false, move |event: Event| {
            let Some(e) = event.dyn_ref::<TouchEvent>() else {
                return;
            };
            e.prevent_default();
            let touches = touch_points(e);
            with_session(&session, |s| s.dispatch(&InputEvent::TouchMove { touches }));
        })?;

        let session = self.session.clone();
        listeners.add("touchend", true, move |_: Event| {
            with_session(&session, |s| s.dispatch(&InputEvent::TouchEnd));
        })?;

        log::debug!("attached {} listeners", listeners.len());
        self.listeners = Some(listeners);
        Ok(())
    }

    /// Remove every listener registered by `attach`.
    pub fn detach(&mut self) {
        self.listeners = None;
    }

    /// Repaint the whole frame.
    pub fn render(&self) {
        self.session.borrow_mut().redraw();
    }

    // ─── Pointer API ─────────────────────────────────────────────────────

    /// Handle pointer down. Returns true if the frame was repainted.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_down(
        &mut self,
        x: f64,
        y: f64,
        pressure: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        self.dispatch(&InputEvent::PointerDown {
            x,
            y,
            pressure,
            modifiers: Modifiers {
                shift,
                ctrl,
                alt,
                meta,
            },
        })
    }

    /// Handle pointer move. `buttons` is `PointerEvent.buttons`.
    #[allow(clippy::too_many_arguments)]
    pub fn handle_pointer_move(
        &mut self,
        x: f64,
        y: f64,
        pressure: f64,
        buttons: u16,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        self.dispatch(&InputEvent::PointerMove {
            x,
            y,
            pressure,
            buttons,
            modifiers: Modifiers {
                shift,
                ctrl,
                alt,
                meta,
            },
        })
    }

    pub fn handle_pointer_up(&mut self, x: f64, y: f64) -> bool {
        self.dispatch(&InputEvent::PointerUp { x, y })
    }

    // ─── Keyboard Shortcut API ───────────────────────────────────────────

    /// Handle a keyboard event. Returns a JSON string:
    /// `{"changed":bool, "action":"<action_name>", "mode":"<mode_name>"}`
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        let mut s = self.session.borrow_mut();
        let action = if s.controller.has_text_focus() {
            None
        } else {
            ShortcutMap::resolve(key, ctrl, shift, alt, meta)
        };
        let changed = s.dispatch(&InputEvent::Key {
            key: key.to_string(),
            modifiers: Modifiers {
                shift,
                ctrl,
                alt,
                meta,
            },
        });
        let action_name = action.map_or("none", action_to_name);
        let mode = s.controller.store().mode().name();
        format!(r#"{{"changed":{changed},"action":"{action_name}","mode":"{mode}"}}"#)
    }

    /// Tell the canvas whether a text field has focus; shortcuts are
    /// ignored while it does.
    pub fn set_text_focus(&mut self, focused: bool) {
        self.session.borrow_mut().controller.set_text_focus(focused);
    }

    // ─── Mode / brush ────────────────────────────────────────────────────

    /// Switch mode by name (`"draw"`, `"write"`, `"erase"`, `"scroll"`,
    /// `"cursor"`). Returns false for unknown names.
    pub fn set_mode(&mut self, name: &str) -> bool {
        let Some(mode) = Mode::from_name(name) else {
            log::warn!("unknown mode {name:?}");
            return false;
        };
        let mut s = self.session.borrow_mut();
        s.controller.set_mode(mode);
        s.redraw();
        true
    }

    pub fn get_mode(&self) -> String {
        self.session.borrow().controller.store().mode().name().to_string()
    }

    /// CSS cursor for the current mode.
    pub fn get_cursor(&self) -> String {
        self.session
            .borrow()
            .controller
            .store()
            .mode()
            .cursor_style()
            .to_string()
    }

    /// Toolbar entries: `[{"name","label","shortcut","cursor"}]`.
    pub fn get_modes_json(&self) -> String {
        modes_json()
    }

    pub fn set_brush(&mut self, color: &str, width: f64, taper: f64) {
        let mut s = self.session.borrow_mut();
        s.controller.store_mut().set_brush(Brush {
            color: color.to_string(),
            width: width.max(0.0),
            taper: taper.max(0.0),
        });
    }

    // ─── History / view ──────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        let mut s = self.session.borrow_mut();
        let changed = s.controller.undo();
        if changed {
            s.redraw();
        }
        changed
    }

    pub fn redo(&mut self) -> bool {
        let mut s = self.session.borrow_mut();
        let changed = s.controller.redo();
        if changed {
            s.redraw();
        }
        changed
    }

    pub fn can_undo(&self) -> bool {
        self.session.borrow().controller.store().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.session.borrow().controller.store().can_redo()
    }

    pub fn zoom_in(&mut self) {
        self.zoom(1.0);
    }

    pub fn zoom_out(&mut self) {
        self.zoom(-1.0);
    }

    pub fn center_canvas(&mut self) {
        let mut s = self.session.borrow_mut();
        s.controller.center_canvas();
        s.redraw();
    }

    /// `{"panX":f64,"panY":f64,"scale":f64}`
    pub fn get_view_json(&self) -> String {
        view_json(&self.session.borrow().controller.store().view())
    }

    /// Bounding box of the stroke being drawn, or `null`.
    pub fn get_current_bounding_box_json(&self) -> String {
        box_json(self.session.borrow().controller.current_bounding_box())
    }

    // ─── Configuration / persistence ─────────────────────────────────────

    /// Apply a (partial) `CanvasConfig` JSON. Returns `{"ok":true}` or
    /// `{"ok":false,"error":"..."}`.
    pub fn set_config_json(&mut self, json: &str) -> String {
        match CanvasConfig::from_json(json) {
            Ok(config) => {
                let mut s = self.session.borrow_mut();
                s.controller.set_config(config);
                s.redraw();
                ok_json()
            }
            Err(e) => error_json(&e),
        }
    }

    /// Apply a (partial) `StrokeOptions` JSON.
    pub fn set_stroke_options_json(&mut self, json: &str) -> String {
        match serde_json::from_str::<StrokeOptions>(json) {
            Ok(options) => {
                self.session.borrow_mut().controller.set_stroke_options(options);
                ok_json()
            }
            Err(e) => error_json(&e.to_string()),
        }
    }

    /// All strokes in paint order.
    pub fn get_strokes_json(&self) -> String {
        let s = self.session.borrow();
        serde_json::to_string(s.controller.store().strokes()).unwrap_or_else(|e| {
            log::warn!("stroke serialization failed: {e}");
            "[]".to_string()
        })
    }

    /// Replace all strokes. Clears undo history.
    pub fn load_strokes_json(&mut self, json: &str) -> String {
        match serde_json::from_str::<Vec<Stroke>>(json) {
            Ok(strokes) => {
                let mut s = self.session.borrow_mut();
                log::debug!("load {} strokes", strokes.len());
                s.controller.store_mut().load_strokes(strokes);
                s.redraw();
                ok_json()
            }
            Err(e) => error_json(&e.to_string()),
        }
    }
}

impl InkCanvas {
    fn dispatch(&mut self, event: &InputEvent) -> bool {
        self.session.borrow_mut().dispatch(event)
    }

    fn zoom(&mut self, direction: f64) {
        let mut s = self.session.borrow_mut();
        s.controller.zoom_step(direction);
        s.redraw();
    }
}

/// Run `f` unless the session is already borrowed (re-entrant DOM event).
fn with_session(session: &Rc<RefCell<Session>>, f: impl FnOnce(&mut Session) -> bool) {
    match session.try_borrow_mut() {
        Ok(mut s) => {
            f(&mut s);
        }
        Err(_) => log::warn!("dropped re-entrant DOM event"),
    }
}

fn touch_points(e: &TouchEvent) -> Touches {
    let list = e.touches();
    (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|t| Point::new(t.client_x() as f64, t.client_y() as f64))
        .collect()
}

fn action_to_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::SetMode(_) => "setMode",
        ShortcutAction::Undo => "undo",
        ShortcutAction::Redo => "redo",
        ShortcutAction::ZoomIn => "zoomIn",
        ShortcutAction::ZoomOut => "zoomOut",
        ShortcutAction::Deselect => "deselect",
    }
}

fn ok_json() -> String {
    r#"{"ok":true}"#.to_string()
}

fn error_json(error: &str) -> String {
    serde_json::json!({ "ok": false, "error": error }).to_string()
}

fn view_json(view: &ViewTransform) -> String {
    serde_json::json!({
        "panX": view.pan_offset.x,
        "panY": view.pan_offset.y,
        "scale": view.scale,
    })
    .to_string()
}

fn box_json(bbox: Option<BoundingBox>) -> String {
    serde_json::to_string(&bbox).unwrap_or_else(|_| "null".to_string())
}

fn modes_json() -> String {
    let modes: Vec<serde_json::Value> = Mode::ALL
        .iter()
        .map(|m| {
            serde_json::json!({
                "name": m.name(),
                "label": m.label(),
                "shortcut": m.shortcut(),
                "cursor": m.cursor_style(),
            })
        })
        .collect();
    serde_json::Value::Array(modes).to_string()
}

// ─── Panic hook for WASM debugging ───────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Inkboard WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

// ─── Standalone validation (no canvas needed) ────────────────────────────

/// Validate a `CanvasConfig` JSON. Returns `{"ok":true}` or
/// `{"ok":false,"error":"..."}`.
#[wasm_bindgen]
pub fn validate_config(json: &str) -> String {
    match CanvasConfig::from_json(json) {
        Ok(_) => ok_json(),
        Err(e) => error_json(&e),
    }
}
