//! Core data model for an Inkboard canvas.
//!
//! Strokes live in a fixed logical space of `CANVAS_WIDTH × CANVAS_HEIGHT`
//! units. The view transform (pan + scale) maps that space onto the screen;
//! strokes themselves never store screen coordinates.

use crate::id::StrokeId;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

// ─── Canvas bounds ───────────────────────────────────────────────────────

/// Logical canvas width (A4 landscape at 300 dpi).
pub const CANVAS_WIDTH: f64 = 3508.0;
/// Logical canvas height.
pub const CANVAS_HEIGHT: f64 = 2480.0;

/// Smallest width/height a `BoundingBox` may have.
pub const MIN_BOX_SIZE: f64 = 10.0;

// ─── Points ──────────────────────────────────────────────────────────────

/// A sampled pointer position in logical canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokePoint {
    pub x: f64,
    pub y: f64,
    /// Pressure from 0.0 (none) to 1.0 (max).
    pub pressure: f64,
}

impl StrokePoint {
    pub fn new(x: f64, y: f64, pressure: f64) -> Self {
        Self {
            x,
            y,
            pressure: pressure.clamp(0.0, 1.0),
        }
    }

    pub fn at(p: Point, pressure: f64) -> Self {
        Self::new(p.x, p.y, pressure)
    }

    pub fn to_point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

// ─── Bounding box ────────────────────────────────────────────────────────

/// Axis-aligned box in logical coordinates. Width and height are never
/// below [`MIN_BOX_SIZE`] when produced by the `bounds` module.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.right(), self.bottom())
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Smallest box covering both `self` and `other`.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        BoundingBox {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Top-left corners of the 8 resize handles of side `size`:
    /// 4 corners first, then the 4 edge midpoints.
    pub fn handles(&self, size: f64) -> [Point; 8] {
        let half = size / 2.0;
        let (l, t) = (self.x - half, self.y - half);
        let (r, b) = (self.right() - half, self.bottom() - half);
        let (cx, cy) = (self.x + self.width / 2.0 - half, self.y + self.height / 2.0 - half);
        [
            Point::new(l, t),
            Point::new(r, t),
            Point::new(l, b),
            Point::new(r, b),
            Point::new(cx, t),
            Point::new(cx, b),
            Point::new(l, cy),
            Point::new(r, cy),
        ]
    }
}

// ─── Strokes ─────────────────────────────────────────────────────────────

/// A committed freehand stroke: a filled outline polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawStroke {
    pub id: StrokeId,
    /// SVG path data of the outline polygon.
    pub path: String,
    /// CSS color.
    pub color: String,
    /// Box cached at creation time from the raw input points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

/// A text label placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStroke {
    pub id: StrokeId,
    pub text: String,
    /// Top-left corner (text baseline is `top`).
    pub position: Point,
    pub font_size: f64,
    pub font_family: String,
    pub color: String,
}

impl TextStroke {
    /// Approximate extent: `len × size × 0.6` wide, `size` tall.
    pub fn approximate_rect(&self) -> Rect {
        let width = self.text.chars().count() as f64 * self.font_size * 0.6;
        Rect::new(
            self.position.x,
            self.position.y,
            self.position.x + width,
            self.position.y + self.font_size,
        )
    }
}

/// Anything the store keeps in its ordered stroke list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Stroke {
    Draw(DrawStroke),
    Text(TextStroke),
}

impl Stroke {
    pub fn id(&self) -> StrokeId {
        match self {
            Stroke::Draw(d) => d.id,
            Stroke::Text(t) => t.id,
        }
    }

    pub fn color(&self) -> &str {
        match self {
            Stroke::Draw(d) => &d.color,
            Stroke::Text(t) => &t.color,
        }
    }
}

// ─── View transform ──────────────────────────────────────────────────────

/// Screen-space pan followed by uniform scale.
///
/// `screen = pan_offset + logical * scale` (relative to the viewport origin).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewTransform {
    pub pan_offset: Vec2,
    pub scale: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            pan_offset: Vec2::ZERO,
            scale: 1.0,
        }
    }
}

// ─── Mode ────────────────────────────────────────────────────────────────

/// The active interaction mode selected from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Draw,
    Write,
    Erase,
    Scroll,
    Cursor,
}

impl Mode {
    /// Toolbar order.
    pub const ALL: [Mode; 5] = [Mode::Draw, Mode::Write, Mode::Erase, Mode::Scroll, Mode::Cursor];

    pub fn name(self) -> &'static str {
        match self {
            Mode::Draw => "draw",
            Mode::Write => "write",
            Mode::Erase => "erase",
            Mode::Scroll => "scroll",
            Mode::Cursor => "cursor",
        }
    }

    pub fn from_name(name: &str) -> Option<Mode> {
        Mode::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Human label shown in the toolbar tooltip.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Draw => "Draw",
            Mode::Write => "Write",
            Mode::Erase => "Erase",
            Mode::Scroll => "Move",
            Mode::Cursor => "Select",
        }
    }

    /// Single-key shortcut (`"1"`..`"5"`).
    pub fn shortcut(self) -> &'static str {
        match self {
            Mode::Draw => "1",
            Mode::Write => "2",
            Mode::Erase => "3",
            Mode::Scroll => "4",
            Mode::Cursor => "5",
        }
    }

    /// CSS `cursor` value for the canvas element.
    pub fn cursor_style(self) -> &'static str {
        match self {
            Mode::Draw => "crosshair",
            Mode::Write => "text",
            Mode::Erase => "pointer",
            Mode::Scroll => "grab",
            Mode::Cursor => "default",
        }
    }
}
