//! Drawing surface abstraction.
//!
//! Mirrors the subset of the Canvas 2D API the renderers need. The browser
//! implementation wraps `CanvasRenderingContext2d`; tests use
//! `RecordingSurface` (behind the `test-utils` feature).

use kurbo::{Point, Rect};
use std::ops::{Deref, DerefMut};

/// A stateful 2D drawing target with a save/restore stack.
pub trait Surface {
    /// Clear the whole physical surface, ignoring the current transform.
    fn clear(&mut self);

    fn save(&mut self);
    fn restore(&mut self);

    fn translate(&mut self, dx: f64, dy: f64);
    fn scale(&mut self, sx: f64, sy: f64);

    fn set_fill_style(&mut self, color: &str);
    fn set_stroke_style(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    /// Empty slice = solid line.
    fn set_line_dash(&mut self, segments: &[f64]);
    fn set_line_dash_offset(&mut self, offset: f64);
    /// CSS font shorthand, e.g. `"20px serif"`.
    fn set_font(&mut self, font: &str);
    fn set_text_baseline(&mut self, baseline: &str);

    fn fill_rect(&mut self, rect: Rect);
    fn stroke_rect(&mut self, rect: Rect);
    /// Fill SVG path data with the current fill style.
    fn fill_path(&mut self, path: &str);
    fn fill_text(&mut self, text: &str, at: Point);
}

/// Scoped drawing state: `save()` on creation, `restore()` on drop.
///
/// Derefs to the wrapped surface, so drawing goes through the guard and the
/// restore happens on every exit path, early returns included.
pub struct SavedState<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: Surface + ?Sized> SavedState<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<S: Surface + ?Sized> Deref for SavedState<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for SavedState<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface + ?Sized> Drop for SavedState<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawOp, RecordingSurface};
    use pretty_assertions::assert_eq;

    fn draw_until(surface: &mut dyn Surface, bail: bool) {
        let mut s = SavedState::new(surface);
        s.set_line_width(3.0);
        if bail {
            return;
        }
        s.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn guard_restores_on_early_return() {
        let mut rec = RecordingSurface::new();
        draw_until(&mut rec, true);
        assert_eq!(
            rec.ops,
            vec![DrawOp::Save, DrawOp::LineWidth(3.0), DrawOp::Restore]
        );
        assert!(rec.is_balanced());
    }

    #[test]
    fn nested_guards_unwind_in_order() {
        let mut rec = RecordingSurface::new();
        {
            let mut outer = SavedState::new(&mut rec);
            {
                let mut inner = SavedState::new(&mut *outer);
                inner.translate(1.0, 2.0);
            }
            outer.scale(2.0, 2.0);
        }
        assert_eq!(
            rec.ops,
            vec![
                DrawOp::Save,
                DrawOp::Save,
                DrawOp::Translate(1.0, 2.0),
                DrawOp::Restore,
                DrawOp::Scale(2.0, 2.0),
                DrawOp::Restore,
            ]
        );
        assert_eq!(rec.max_depth(), 2);
    }
}
