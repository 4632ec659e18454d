//! In-memory stroke store with undo/redo.
//!
//! The default `StrokeStore` used by the browser bridge and the tests.
//! Stroke-list changes go through a [`CommandStack`]; view and brush
//! changes are not recorded in history.

use crate::commands::{Command, CommandStack};
use ink_core::{Mode, Point, Stroke, StrokeId, StrokeStore, Vec2, ViewTransform};
use ink_render::strokes_touched;

/// Brush settings applied to new strokes.
#[derive(Debug, Clone, PartialEq)]
pub struct Brush {
    /// CSS color. Default: **#000000**.
    pub color: String,
    /// Stroke diameter. Default: **8**.
    pub width: f64,
    /// End-taper length. Default: **0**.
    pub taper: f64,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: "#000000".to_string(),
            width: 8.0,
            taper: 0.0,
        }
    }
}

pub struct MemoryStore {
    mode: Mode,
    strokes: Vec<Stroke>,
    brush: Brush,
    view: ViewTransform,
    history: CommandStack,
    /// Slack around strokes when erasing, in canvas units.
    erase_tolerance: f64,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            mode: Mode::default(),
            strokes: Vec::new(),
            brush: Brush::default(),
            view: ViewTransform::default(),
            history: CommandStack::default(),
            erase_tolerance: 4.0,
        }
    }

    pub fn with_strokes(mut self, strokes: Vec<Stroke>) -> Self {
        self.load_strokes(strokes);
        self
    }

    /// Replace the stroke list wholesale. Clears history.
    ///
    /// Ids of loaded strokes are reserved so new strokes never reuse them.
    pub fn load_strokes(&mut self, strokes: Vec<Stroke>) {
        for s in &strokes {
            StrokeId::from_raw(s.id().as_u64());
        }
        self.strokes = strokes;
        self.history.clear();
    }

    pub fn set_brush(&mut self, brush: Brush) {
        self.brush = brush;
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }
}

impl StrokeStore for MemoryStore {
    fn mode(&self) -> Mode {
        self.mode
    }

    fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    fn stroke_color(&self) -> &str {
        &self.brush.color
    }

    fn stroke_width(&self) -> f64 {
        self.brush.width
    }

    fn stroke_taper(&self) -> f64 {
        self.brush.taper
    }

    fn view(&self) -> ViewTransform {
        self.view
    }

    fn add_stroke(&mut self, stroke: Stroke) {
        self.history.execute(&mut self.strokes, Command::Add { stroke });
    }

    fn erase_stroke(&mut self, points: &[Point]) {
        let touched = strokes_touched(&self.strokes, points, self.erase_tolerance);
        match Command::erase(&self.strokes, &touched) {
            Some(cmd) => self.history.execute(&mut self.strokes, cmd),
            None => log::trace!("erase over {} points touched nothing", points.len()),
        }
    }

    fn update_pan_offset(&mut self, pan: Vec2) {
        self.view.pan_offset = pan;
    }

    fn update_scale(&mut self, scale: f64) {
        self.view.scale = scale;
    }

    fn update_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    fn undo(&mut self) -> bool {
        self.history.undo(&mut self.strokes)
    }

    fn redo(&mut self) -> bool {
        self.history.redo(&mut self.strokes)
    }
}
