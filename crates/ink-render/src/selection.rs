//! Dashed selection box with optional resize handles.
//!
//! Line widths, dash lengths, and handle sizes are divided by the view scale
//! so they keep a constant on-screen size at every zoom level.

use crate::surface::{SavedState, Surface};
use ink_core::BoundingBox;
use kurbo::Rect;

const ACTIVE_COLOR: &str = "#2196f3";
const PASSIVE_COLOR: &str = "#0099ff";
const HANDLE_FILL: &str = "#ffffff";

/// On-screen dash length in px.
const DASH: f64 = 5.0;
/// On-screen outline width in px.
const LINE_WIDTH: f64 = 1.5;
/// On-screen handle side in px.
const HANDLE_SIZE: f64 = 8.0;
const HANDLE_LINE_WIDTH: f64 = 1.0;

/// Draw `bbox` as a dashed outline; when `is_active`, add the 8 handles.
pub fn draw_selection_box(surface: &mut dyn Surface, bbox: &BoundingBox, scale: f64, is_active: bool) {
    let dash = DASH / scale;
    let mut s = SavedState::new(surface);

    s.set_stroke_style(if is_active { ACTIVE_COLOR } else { PASSIVE_COLOR });
    s.set_line_width(LINE_WIDTH / scale);
    s.set_line_dash(&[dash, dash]);
    s.set_line_dash_offset(0.0);
    s.stroke_rect(bbox.to_rect());

    if !is_active {
        return;
    }

    let size = HANDLE_SIZE / scale;
    s.set_line_dash(&[]);
    s.set_fill_style(HANDLE_FILL);
    s.set_stroke_style(ACTIVE_COLOR);
    s.set_line_width(HANDLE_LINE_WIDTH / scale);

    for corner in bbox.handles(size) {
        let handle = Rect::from_origin_size(corner, (size, size));
        s.fill_rect(handle);
        s.stroke_rect(handle);
    }
}
