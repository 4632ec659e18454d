//! In-memory surface that records every call.
//!
//! Used by tests across the workspace to assert on what a redraw painted
//! without a browser.

use crate::surface::Surface;
use kurbo::{Point, Rect};

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear,
    Save,
    Restore,
    Translate(f64, f64),
    Scale(f64, f64),
    FillStyle(String),
    StrokeStyle(String),
    LineWidth(f64),
    LineDash(Vec<f64>),
    LineDashOffset(f64),
    Font(String),
    TextBaseline(String),
    FillRect(Rect),
    StrokeRect(Rect),
    FillPath(String),
    FillText(String, Point),
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
    depth: usize,
    max_depth: usize,
    /// Set when `restore` is called with nothing saved.
    underflow: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `save` matched by a `restore`, and never the reverse.
    pub fn is_balanced(&self) -> bool {
        self.depth == 0 && !self.underflow
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn count(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }

    /// Path data of every `fill_path` call, in order.
    pub fn filled_paths(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillPath(p) => Some(p.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn save(&mut self) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        if self.depth == 0 {
            self.underflow = true;
        } else {
            self.depth -= 1;
        }
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.ops.push(DrawOp::Translate(dx, dy));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.ops.push(DrawOp::Scale(sx, sy));
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ops.push(DrawOp::FillStyle(color.to_string()));
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ops.push(DrawOp::StrokeStyle(color.to_string()));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(DrawOp::LineWidth(width));
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        self.ops.push(DrawOp::LineDash(segments.to_vec()));
    }

    fn set_line_dash_offset(&mut self, offset: f64) {
        self.ops.push(DrawOp::LineDashOffset(offset));
    }

    fn set_font(&mut self, font: &str) {
        self.ops.push(DrawOp::Font(font.to_string()));
    }

    fn set_text_baseline(&mut self, baseline: &str) {
        self.ops.push(DrawOp::TextBaseline(baseline.to_string()));
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::FillRect(rect));
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::StrokeRect(rect));
    }

    fn fill_path(&mut self, path: &str) {
        self.ops.push(DrawOp::FillPath(path.to_string()));
    }

    fn fill_text(&mut self, text: &str, at: Point) {
        self.ops.push(DrawOp::FillText(text.to_string(), at));
    }
}
