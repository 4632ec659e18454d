//! Hit testing: point → stroke lookup.
//!
//! Walks the stroke list in reverse (last painted = topmost). Draw strokes
//! are tested against their filled outline, text strokes against their
//! approximate text box.

use ink_core::{Stroke, StrokeId};
use kurbo::{BezPath, ParamCurveNearest, Point, Shape};

/// Find the topmost stroke at `p`, allowing `tolerance` units of slack.
/// Returns `None` if nothing is hit (background).
pub fn hit_test(strokes: &[Stroke], p: Point, tolerance: f64) -> Option<StrokeId> {
    strokes
        .iter()
        .rev()
        .find(|s| stroke_hit(s, p, tolerance))
        .map(Stroke::id)
}

/// All strokes touched by any point of `polyline`, in paint order.
/// Used by the eraser.
pub fn strokes_touched(strokes: &[Stroke], polyline: &[Point], tolerance: f64) -> Vec<StrokeId> {
    strokes
        .iter()
        .filter(|s| polyline.iter().any(|p| stroke_hit(s, *p, tolerance)))
        .map(Stroke::id)
        .collect()
}

/// Does `p` lie on (or within `tolerance` of) `stroke`?
pub fn stroke_hit(stroke: &Stroke, p: Point, tolerance: f64) -> bool {
    match stroke {
        Stroke::Draw(draw) => match BezPath::from_svg(&draw.path) {
            Ok(path) => path_hit(&path, p, tolerance),
            Err(e) => {
                log::warn!("stroke {} has malformed path data: {e}", draw.id);
                false
            }
        },
        Stroke::Text(text) => text
            .approximate_rect()
            .inflate(tolerance, tolerance)
            .contains(p),
    }
}

fn path_hit(path: &BezPath, p: Point, tolerance: f64) -> bool {
    if !path.bounding_box().inflate(tolerance, tolerance).contains(p) {
        return false;
    }
    if path.contains(p) {
        return true;
    }
    let tol_sq = tolerance * tolerance;
    path.segments()
        .any(|seg| seg.nearest(p, 1e-3).distance_sq <= tol_sq)
}
