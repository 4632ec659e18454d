//! Canvas input controller.
//!
//! Turns normalized [`InputEvent`]s into store mutations: drawing and
//! erasing strokes, panning, wheel and pinch zoom, keyboard shortcuts, and
//! Cursor-mode selection. Owns the transient gesture state (point buffer,
//! pan anchor, pinch distance/centroid, live bounding box); everything
//! persistent goes through the [`StrokeStore`] update operations.
//!
//! ## Gestures
//!
//! | State | Entered by | Left by |
//! |-------|------------|---------|
//! | `Drawing` | pointer-down inside the canvas (not Scroll mode) | pointer-up |
//! | `Panning` | pointer-down in Scroll mode | pointer-up |
//! | `PinchZooming` | two-finger touch start | touch end |

use crate::input::{InputEvent, Modifiers, PRIMARY_BUTTON, pinch_geometry};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use ink_core::bounds::from_points;
use ink_core::coords::{
    centered_pan, clamp_pan, clamp_scale, is_point_in_canvas, to_logical, zoom_anchored_pan,
};
use ink_core::{
    BoundingBox, CanvasConfig, DrawStroke, Freehand, Mode, OutlineAlgorithm, Point, Rect, Size,
    Stroke, StrokeId, StrokeOptions, StrokePoint, StrokeStore, Vec2,
};
use ink_render::{Rasterizer, Surface, hit_test};

/// Screen-space slack for Cursor-mode hit testing, in px.
const SELECT_TOLERANCE: f64 = 4.0;

/// Observable interaction state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Idle,
    Drawing,
    Panning,
    PinchZooming,
}

#[derive(Debug)]
enum Gesture {
    Idle,
    Drawing { points: Vec<StrokePoint> },
    /// `start = client − pan` at pointer-down.
    Panning { start: Vec2 },
}

/// Last two-finger measurements; both cleared on touch end.
#[derive(Debug, Default)]
struct Pinch {
    distance: Option<f64>,
    centroid: Option<Point>,
}

pub struct InputController<S: StrokeStore, O: OutlineAlgorithm = Freehand> {
    store: S,
    outline: O,
    config: CanvasConfig,
    /// Base outline options; size and end taper come from the store brush.
    options: StrokeOptions,
    /// Canvas element rect in client coordinates.
    viewport: Option<Rect>,
    gesture: Gesture,
    pinch: Pinch,
    live_box: Option<BoundingBox>,
    selected: Option<StrokeId>,
    /// Keyboard shortcuts are ignored while a text field has focus.
    text_focus: bool,
}

impl<S: StrokeStore> InputController<S> {
    pub fn new(store: S, config: CanvasConfig) -> Self {
        Self::with_outline(store, config, Freehand)
    }
}

impl<S: StrokeStore, O: OutlineAlgorithm> InputController<S, O> {
    pub fn with_outline(store: S, config: CanvasConfig, outline: O) -> Self {
        Self {
            store,
            outline,
            config,
            options: StrokeOptions::default(),
            viewport: None,
            gesture: Gesture::Idle,
            pinch: Pinch::default(),
            live_box: None,
            selected: None,
            text_focus: false,
        }
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &CanvasConfig {
        &self.config
    }

    /// Replace the configuration. Re-clamps the current view into the new
    /// limits.
    pub fn set_config(&mut self, config: CanvasConfig) {
        self.config = config;
        let view = self.store.view();
        let scale = clamp_scale(view.scale, &self.config);
        if scale != view.scale {
            self.store.update_scale(scale);
        }
        self.push_pan(view.pan_offset, scale);
    }

    pub fn set_stroke_options(&mut self, options: StrokeOptions) {
        self.options = options;
    }

    /// Outline options for the current brush.
    pub fn stroke_options(&self) -> StrokeOptions {
        self.options
            .with_brush(self.store.stroke_width(), self.store.stroke_taper())
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = Some(viewport);
    }

    pub fn set_text_focus(&mut self, focused: bool) {
        self.text_focus = focused;
    }

    pub fn has_text_focus(&self) -> bool {
        self.text_focus
    }

    pub fn state(&self) -> InputState {
        if self.pinch.distance.is_some() {
            return InputState::PinchZooming;
        }
        match self.gesture {
            Gesture::Idle => InputState::Idle,
            Gesture::Drawing { .. } => InputState::Drawing,
            Gesture::Panning { .. } => InputState::Panning,
        }
    }

    /// Bounding box of the in-progress Draw-mode stroke.
    pub fn current_bounding_box(&self) -> Option<BoundingBox> {
        self.live_box
    }

    /// Point buffer of the in-progress gesture, if drawing.
    pub fn preview_points(&self) -> Option<&[StrokePoint]> {
        match &self.gesture {
            Gesture::Drawing { points } => Some(points),
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<StrokeId> {
        self.selected
    }

    pub fn set_mode(&mut self, mode: Mode) {
        log::debug!("mode → {}", mode.name());
        self.store.update_mode(mode);
    }

    /// Repaint the whole frame onto `surface`.
    pub fn render(&self, surface: &mut dyn Surface) {
        Rasterizer::new(&self.store, &self.config, &self.outline)
            .with_options(self.stroke_options())
            .redraw(surface, self.preview_points(), self.selected);
    }

    // ─── Dispatch ────────────────────────────────────────────────────────

    /// Handle one input event. Returns `true` when the frame needs a redraw.
    pub fn handle(&mut self, event: &InputEvent) -> bool {
        match event {
            InputEvent::PointerDown { x, y, pressure, .. } => {
                self.pointer_down(Point::new(*x, *y), *pressure)
            }
            InputEvent::PointerMove {
                x,
                y,
                pressure,
                buttons,
                ..
            } => self.pointer_move(Point::new(*x, *y), *pressure, *buttons),
            InputEvent::PointerUp { .. } => self.pointer_up(),
            InputEvent::Wheel {
                x,
                y,
                dx,
                dy,
                modifiers,
            } => self.wheel(Point::new(*x, *y), Vec2::new(*dx, *dy), *modifiers),
            InputEvent::TouchStart { touches } => self.touch_start(touches),
            InputEvent::TouchMove { touches } => self.touch_move(touches),
            InputEvent::TouchEnd => self.touch_end(),
            InputEvent::Key { key, modifiers } => self.key(key, *modifiers),
        }
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    fn pointer_down(&mut self, client: Point, pressure: f64) -> bool {
        if self.pinch.distance.is_some() {
            return false;
        }
        let view = self.store.view();
        let mode = self.store.mode();

        if mode == Mode::Scroll {
            let start = client.to_vec2() - view.pan_offset;
            log::debug!("pan start at {client:?}");
            self.gesture = Gesture::Panning { start };
            return false;
        }

        let p = self.map(client);
        if !is_point_in_canvas(p, &self.config) {
            return false;
        }

        let mut changed = false;
        if mode == Mode::Cursor {
            let hit = hit_test(self.store.strokes(), p, SELECT_TOLERANCE / view.scale);
            changed = hit != self.selected;
            log::debug!("select {hit:?}");
            self.selected = hit;
        }

        log::debug!("{} start at {p:?}", mode.name());
        self.gesture = Gesture::Drawing {
            points: vec![StrokePoint::at(p, pressure)],
        };
        self.live_box = None;
        changed || mode == Mode::Draw
    }

    fn pointer_move(&mut self, client: Point, pressure: f64, buttons: u16) -> bool {
        match self.gesture {
            Gesture::Idle => false,
            Gesture::Panning { start } => {
                let pan = client.to_vec2() - start;
                log::trace!("pan → {pan:?}");
                self.push_pan(pan, self.store.view().scale);
                true
            }
            Gesture::Drawing { .. } if buttons & PRIMARY_BUTTON == 0 => false,
            Gesture::Drawing { .. } => self.extend_buffer(client, pressure),
        }
    }

    fn extend_buffer(&mut self, client: Point, pressure: f64) -> bool {
        let p = self.map(client);
        if !is_point_in_canvas(p, &self.config) {
            return false;
        }
        let mode = self.store.mode();
        let Gesture::Drawing { points } = &mut self.gesture else {
            return false;
        };
        points.push(StrokePoint::at(p, pressure));
        log::trace!("buffer += {p:?} ({} points)", points.len());
        if mode == Mode::Draw {
            self.live_box = from_points(points.iter().map(|sp| sp.to_point()), self.config.box_padding);
        }
        mode == Mode::Draw
    }

    fn pointer_up(&mut self) -> bool {
        let gesture = std::mem::replace(&mut self.gesture, Gesture::Idle);
        let live_box = self.live_box.take();
        match gesture {
            Gesture::Idle => false,
            Gesture::Panning { .. } => {
                log::debug!("pan end");
                false
            }
            Gesture::Drawing { points } if points.is_empty() => false,
            Gesture::Drawing { points } => {
                self.commit(&points, live_box);
                true
            }
        }
    }

    fn commit(&mut self, points: &[StrokePoint], live_box: Option<BoundingBox>) {
        match self.store.mode() {
            Mode::Erase => {
                let polyline: Vec<Point> = points.iter().map(|sp| sp.to_point()).collect();
                log::debug!("erase along {} points", polyline.len());
                self.store.erase_stroke(&polyline);
                self.drop_stale_selection();
            }
            Mode::Draw => {
                let path = self.outline.outline_path(points, &self.stroke_options());
                if path.is_empty() {
                    log::warn!("outline of {} points produced no path", points.len());
                    return;
                }
                let stroke = DrawStroke {
                    id: StrokeId::next(),
                    path,
                    color: self.store.stroke_color().to_string(),
                    bounding_box: live_box,
                };
                log::debug!("commit stroke {} ({} points)", stroke.id, points.len());
                self.store.add_stroke(Stroke::Draw(stroke));
            }
            Mode::Write | Mode::Scroll | Mode::Cursor => {}
        }
    }

    // ─── Wheel ───────────────────────────────────────────────────────────

    fn wheel(&mut self, client: Point, delta: Vec2, modifiers: Modifiers) -> bool {
        let view = self.store.view();
        if modifiers.ctrl {
            let cursor = client - self.origin();
            let scale = clamp_scale(
                view.scale + delta.y * self.config.wheel_zoom_factor,
                &self.config,
            );
            log::trace!("wheel zoom {} → {scale}", view.scale);
            self.zoom_to(scale, cursor);
        } else {
            self.push_pan(view.pan_offset - delta, view.scale);
        }
        true
    }

    // ─── Touch ───────────────────────────────────────────────────────────

    fn touch_start(&mut self, touches: &[Point]) -> bool {
        let Some((distance, _)) = pinch_geometry(touches) else {
            return false;
        };
        if let Gesture::Drawing { points } = &self.gesture {
            log::debug!("pinch start, dropping {} buffered points", points.len());
        }
        self.gesture = Gesture::Idle;
        self.live_box = None;
        self.pinch.distance = Some(distance);
        true
    }

    fn touch_move(&mut self, touches: &[Point]) -> bool {
        let Some((distance, centroid)) = pinch_geometry(touches) else {
            return false;
        };
        let view = self.store.view();

        if let Some(last) = self.pinch.centroid {
            self.push_pan(view.pan_offset + (centroid - last), view.scale);
        }
        self.pinch.centroid = Some(centroid);

        if let Some(last) = self.pinch.distance {
            let scale = clamp_scale(
                view.scale + (distance - last) * self.config.pinch_zoom_factor,
                &self.config,
            );
            log::trace!("pinch {last} → {distance}, scale {scale}");
            self.store.update_scale(scale);
            // Keep the pan inside the bounds of the new scale.
            self.push_pan(self.store.view().pan_offset, scale);
        }
        self.pinch.distance = Some(distance);
        true
    }

    fn touch_end(&mut self) -> bool {
        self.pinch = Pinch::default();
        false
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    fn key(&mut self, key: &str, m: Modifiers) -> bool {
        if self.text_focus {
            return false;
        }
        let Some(action) = ShortcutMap::resolve(key, m.ctrl, m.shift, m.alt, m.meta) else {
            return false;
        };
        log::debug!("shortcut {key:?} → {action:?}");
        match action {
            ShortcutAction::SetMode(mode) => {
                self.set_mode(mode);
                true
            }
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::ZoomIn => {
                self.zoom_step(1.0);
                true
            }
            ShortcutAction::ZoomOut => {
                self.zoom_step(-1.0);
                true
            }
            ShortcutAction::Deselect => self.selected.take().is_some(),
        }
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.store.undo();
        self.drop_stale_selection();
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.store.redo();
        self.drop_stale_selection();
        changed
    }

    // ─── View ────────────────────────────────────────────────────────────

    /// Zoom by `direction × zoom_step`, anchored at the viewport centre.
    pub fn zoom_step(&mut self, direction: f64) {
        let view = self.store.view();
        let scale = clamp_scale(
            view.scale + direction * self.config.zoom_step,
            &self.config,
        );
        let center = self.window().to_vec2() / 2.0;
        self.zoom_to(scale, center.to_point());
    }

    /// Center the unscaled canvas in the viewport.
    pub fn center_canvas(&mut self) {
        let pan = centered_pan(self.window(), &self.config);
        log::debug!("center canvas at {pan:?}");
        self.push_pan(pan, self.store.view().scale);
    }

    /// Set `scale`, keeping the viewport-relative `anchor` fixed on screen.
    fn zoom_to(&mut self, scale: f64, anchor: Point) {
        let view = self.store.view();
        let pan = zoom_anchored_pan(anchor, view.pan_offset, view.scale, scale);
        self.store.update_scale(scale);
        self.push_pan(pan, scale);
    }

    /// Clamp `pan` for `scale` and hand it to the store.
    fn push_pan(&mut self, pan: Vec2, scale: f64) {
        let clamped = clamp_pan(pan, scale, self.window(), &self.config);
        self.store.update_pan_offset(clamped);
    }

    fn map(&self, client: Point) -> Point {
        let view = self.store.view();
        to_logical(
            client,
            self.viewport,
            view.pan_offset,
            view.scale,
            &self.config,
        )
    }

    fn origin(&self) -> Vec2 {
        self.viewport.map_or(Vec2::ZERO, |v| v.origin().to_vec2())
    }

    fn window(&self) -> Size {
        self.viewport.map_or(Size::ZERO, |v| v.size())
    }

    fn drop_stale_selection(&mut self) {
        let strokes = self.store.strokes();
        if self.selected.is_some_and(|id| !strokes.iter().any(|s| s.id() == id)) {
            self.selected = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Touches;
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;
    use smallvec::smallvec;

    fn controller() -> InputController<MemoryStore> {
        let mut c = InputController::new(MemoryStore::new(), CanvasConfig::default());
        c.set_viewport(Rect::new(0.0, 0.0, 800.0, 600.0));
        c
    }

    fn two(a: (f64, f64), b: (f64, f64)) -> Touches {
        smallvec![Point::new(a.0, a.1), Point::new(b.0, b.1)]
    }

    #[test]
    fn pointer_down_starts_buffer() {
        let mut c = controller();
        c.handle(&InputEvent::pointer_down(100.0, 100.0, 0.5));
        assert_eq!(c.state(), InputState::Drawing);
        assert_eq!(
            c.preview_points(),
            Some(&[StrokePoint::new(100.0, 100.0, 0.5)][..])
        );
    }

    #[test]
    fn move_without_primary_button_is_ignored() {
        let mut c = controller();
        c.handle(&InputEvent::pointer_down(100.0, 100.0, 0.5));
        c.handle(&InputEvent::PointerMove {
            x: 120.0,
            y: 120.0,
            pressure: 0.5,
            buttons: 0,
            modifiers: Modifiers::NONE,
        });
        assert_eq!(c.preview_points().map(<[_]>::len), Some(1));
        assert_eq!(c.current_bounding_box(), None);
    }

    #[test]
    fn draw_commits_with_live_box() {
        let mut c = controller();
        c.handle(&InputEvent::pointer_down(100.0, 100.0, 0.5));
        c.handle(&InputEvent::pointer_drag(150.0, 120.0, 0.5));
        let live = c.current_bounding_box().unwrap();
        assert_eq!(live, BoundingBox::new(90.0, 90.0, 70.0, 40.0));

        assert!(c.handle(&InputEvent::pointer_up(150.0, 120.0)));
        assert_eq!(c.state(), InputState::Idle);
        assert_eq!(c.current_bounding_box(), None);

        let [Stroke::Draw(d)] = c.store().strokes() else {
            panic!("expected one draw stroke");
        };
        assert_eq!(d.bounding_box, Some(live));
        assert_eq!(d.color, "#000000");
        assert!(d.path.starts_with('M'));
    }

    #[test]
    fn write_mode_commits_nothing() {
        let mut c = controller();
        c.set_mode(Mode::Write);
        c.handle(&InputEvent::pointer_down(100.0, 100.0, 0.5));
        c.handle(&InputEvent::pointer_drag(110.0, 110.0, 0.5));
        assert_eq!(c.current_bounding_box(), None);
        c.handle(&InputEvent::pointer_up(110.0, 110.0));
        assert!(c.store().strokes().is_empty());
    }

    #[test]
    fn scroll_mode_pans_with_clamp() {
        let mut c = controller();
        c.set_mode(Mode::Scroll);
        c.handle(&InputEvent::pointer_down(400.0, 300.0, 0.5));
        assert_eq!(c.state(), InputState::Panning);
        c.handle(&InputEvent::pointer_drag(450.0, 280.0, 0.5));
        assert_eq!(c.store().view().pan_offset, Vec2::new(50.0, -20.0));

        // Way past the bound: (3508 − 800)/2 + 100 = 1454.
        c.handle(&InputEvent::pointer_drag(5000.0, 300.0, 0.5));
        assert_eq!(c.store().view().pan_offset.x, 1454.0);

        c.handle(&InputEvent::pointer_up(5000.0, 300.0));
        assert_eq!(c.state(), InputState::Idle);
        assert!(c.store().strokes().is_empty());
    }

    #[test]
    fn ctrl_wheel_zooms_around_cursor() {
        let mut c = controller();
        c.handle(&InputEvent::Wheel {
            x: 200.0,
            y: 100.0,
            dx: 0.0,
            dy: -50.0,
            modifiers: Modifiers::CTRL,
        });
        let view = c.store().view();
        assert_eq!(view.scale, 1.5);
        // cursor − (cursor − 0) × 1.5
        assert_eq!(view.pan_offset, Vec2::new(-100.0, -50.0));
    }

    #[test]
    fn wheel_zoom_clamps_scale() {
        let mut c = controller();
        c.handle(&InputEvent::Wheel {
            x: 0.0,
            y: 0.0,
            dx: 0.0,
            dy: 1000.0,
            modifiers: Modifiers::CTRL,
        });
        assert_eq!(c.store().view().scale, 0.5);
    }

    #[test]
    fn plain_wheel_pans() {
        let mut c = controller();
        c.handle(&InputEvent::Wheel {
            x: 0.0,
            y: 0.0,
            dx: 10.0,
            dy: -20.0,
            modifiers: Modifiers::NONE,
        });
        assert_eq!(c.store().view().pan_offset, Vec2::new(-10.0, 20.0));
        assert_eq!(c.store().view().scale, 1.0);
    }

    #[test]
    fn pinch_scales_by_distance_change() {
        let mut c = controller();
        c.handle(&InputEvent::TouchStart {
            touches: two((100.0, 100.0), (200.0, 100.0)),
        });
        assert_eq!(c.state(), InputState::PinchZooming);
        c.handle(&InputEvent::TouchMove {
            touches: two((75.0, 100.0), (225.0, 100.0)),
        });
        assert_eq!(c.store().view().scale, 1.5);

        c.handle(&InputEvent::TouchEnd);
        assert_eq!(c.state(), InputState::Idle);
    }

    #[test]
    fn pinch_pans_by_centroid_delta() {
        let mut c = controller();
        c.handle(&InputEvent::TouchStart {
            touches: two((100.0, 100.0), (200.0, 100.0)),
        });
        // First move only records the centroid.
        c.handle(&InputEvent::TouchMove {
            touches: two((100.0, 100.0), (200.0, 100.0)),
        });
        assert_eq!(c.store().view().pan_offset, Vec2::ZERO);
        c.handle(&InputEvent::TouchMove {
            touches: two((110.0, 130.0), (210.0, 130.0)),
        });
        assert_eq!(c.store().view().pan_offset, Vec2::new(10.0, 30.0));
        assert_eq!(c.store().view().scale, 1.0);
    }

    #[test]
    fn pinch_drops_in_progress_stroke() {
        let mut c = controller();
        c.handle(&InputEvent::pointer_down(100.0, 100.0, 0.5));
        c.handle(&InputEvent::TouchStart {
            touches: two((100.0, 100.0), (200.0, 100.0)),
        });
        assert_eq!(c.preview_points(), None);
        c.handle(&InputEvent::TouchEnd);
        assert!(!c.handle(&InputEvent::pointer_up(100.0, 100.0)));
        assert!(c.store().strokes().is_empty());
    }

    #[test]
    fn zoom_step_anchors_at_viewport_centre() {
        let mut c = controller();
        c.zoom_step(1.0);
        let view = c.store().view();
        assert!((view.scale - 1.1).abs() < 1e-12);
        // centre (400, 300) stays fixed: 400 − 400 × 1.1
        assert!((view.pan_offset.x + 40.0).abs() < 1e-9);
        assert!((view.pan_offset.y + 30.0).abs() < 1e-9);
    }

    #[test]
    fn center_canvas_on_mount() {
        let mut c = controller();
        c.center_canvas();
        assert_eq!(c.store().view().pan_offset, Vec2::new(-1354.0, -940.0));
    }

    #[test]
    fn shortcuts_switch_mode_and_respect_text_focus() {
        let mut c = controller();
        assert!(c.handle(&InputEvent::key("3", Modifiers::NONE)));
        assert_eq!(c.store().mode(), Mode::Erase);

        c.set_text_focus(true);
        assert!(!c.handle(&InputEvent::key("1", Modifiers::NONE)));
        assert_eq!(c.store().mode(), Mode::Erase);
    }

    #[test]
    fn cursor_mode_selects_topmost() {
        let mut c = controller();
        c.handle(&InputEvent::pointer_down(100.0, 100.0, 0.5));
        c.handle(&InputEvent::pointer_drag(200.0, 100.0, 0.5));
        c.handle(&InputEvent::pointer_up(200.0, 100.0));
        let id = c.store().strokes()[0].id();

        c.set_mode(Mode::Cursor);
        c.handle(&InputEvent::pointer_down(150.0, 100.0, 0.5));
        c.handle(&InputEvent::pointer_up(150.0, 100.0));
        assert_eq!(c.selected(), Some(id));
        assert_eq!(c.store().strokes().len(), 1);

        assert!(c.handle(&InputEvent::key("Escape", Modifiers::NONE)));
        assert_eq!(c.selected(), None);
    }

    #[test]
    fn undo_drops_selection_of_removed_stroke() {
        let mut c = controller();
        c.handle(&InputEvent::pointer_down(100.0, 100.0, 0.5));
        c.handle(&InputEvent::pointer_drag(200.0, 100.0, 0.5));
        c.handle(&InputEvent::pointer_up(200.0, 100.0));
        c.set_mode(Mode::Cursor);
        c.handle(&InputEvent::pointer_down(150.0, 100.0, 0.5));
        c.handle(&InputEvent::pointer_up(150.0, 100.0));
        assert!(c.selected().is_some());

        assert!(c.handle(&InputEvent::key("z", Modifiers::CTRL)));
        assert!(c.store().strokes().is_empty());
        assert_eq!(c.selected(), None);
    }
}
