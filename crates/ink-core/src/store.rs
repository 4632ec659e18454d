//! Access interface to the stroke store.
//!
//! The store owns the canonical stroke list, brush settings, and view
//! transform. Interaction code never mutates these directly: it reads the
//! current state and hands candidate values to the update operations.

use crate::model::{Mode, Stroke, ViewTransform};
use kurbo::{Point, Vec2};

pub trait StrokeStore {
    // ── State reads ──

    fn mode(&self) -> Mode;

    /// Strokes in paint order (first = bottom).
    fn strokes(&self) -> &[Stroke];

    /// CSS color of new strokes.
    fn stroke_color(&self) -> &str;

    /// Brush diameter of new strokes.
    fn stroke_width(&self) -> f64;

    /// End-taper length of new strokes.
    fn stroke_taper(&self) -> f64;

    fn view(&self) -> ViewTransform;

    // ── Mutators ──

    fn add_stroke(&mut self, stroke: Stroke);

    /// Erase whatever the polyline through `points` touches.
    fn erase_stroke(&mut self, points: &[Point]);

    fn update_pan_offset(&mut self, pan: Vec2);

    fn update_scale(&mut self, scale: f64);

    fn update_mode(&mut self, mode: Mode);

    /// Undo the last store change. Returns `true` if anything changed.
    fn undo(&mut self) -> bool {
        false
    }

    /// Redo the last undone change. Returns `true` if anything changed.
    fn redo(&mut self) -> bool {
        false
    }
}
