//! Screen ↔ logical canvas coordinate mapping.
//!
//! `screen = viewport.origin + pan + logical * scale`. Every function here is
//! pure; the view transform itself lives in the store.

use crate::config::CanvasConfig;
use kurbo::{Point, Rect, Size, Vec2};

/// Map a client (device) position into logical canvas coordinates.
///
/// Subtracts the viewport origin and pan offset, divides by scale, then clamps
/// into `[0, width] × [0, height]`. Without a viewport there is nothing to map
/// against and the result is the origin.
pub fn to_logical(
    client: Point,
    viewport: Option<Rect>,
    pan: Vec2,
    scale: f64,
    config: &CanvasConfig,
) -> Point {
    let Some(viewport) = viewport else {
        return Point::ZERO;
    };
    let x = (client.x - viewport.x0 - pan.x) / scale;
    let y = (client.y - viewport.y0 - pan.y) / scale;
    Point::new(x.max(0.0).min(config.width), y.max(0.0).min(config.height))
}

/// Inverse of [`to_logical`] (without clamping).
pub fn to_screen(logical: Point, viewport: Option<Rect>, pan: Vec2, scale: f64) -> Point {
    let origin = viewport.map_or(Point::ZERO, |v| v.origin());
    Point::new(
        origin.x + pan.x + logical.x * scale,
        origin.y + pan.y + logical.y * scale,
    )
}

/// Is `p` inside the logical canvas (edges inclusive)?
pub fn is_point_in_canvas(p: Point, config: &CanvasConfig) -> bool {
    p.x >= 0.0 && p.x <= config.width && p.y >= 0.0 && p.y <= config.height
}

/// How far the canvas may be dragged in each direction at `scale`.
///
/// `(canvas_dim * scale - window_dim) / 2 + margin`. May be negative when the
/// window is much larger than the scaled canvas.
pub fn max_pan(scale: f64, window: Size, config: &CanvasConfig) -> Vec2 {
    Vec2::new(
        (config.width * scale - window.width) / 2.0 + config.pan_margin,
        (config.height * scale - window.height) / 2.0 + config.pan_margin,
    )
}

/// Clamp a candidate pan offset into `[-max, max]` on each axis.
///
/// Applies `min(max)` before `max(-max)` so a negative bound collapses onto
/// `-max` instead of panicking like `f64::clamp` would.
pub fn clamp_pan(pan: Vec2, scale: f64, window: Size, config: &CanvasConfig) -> Vec2 {
    let bound = max_pan(scale, window, config);
    Vec2::new(
        pan.x.min(bound.x).max(-bound.x),
        pan.y.min(bound.y).max(-bound.y),
    )
}

/// Clamp a candidate scale into `[min_scale, max_scale]`.
pub fn clamp_scale(scale: f64, config: &CanvasConfig) -> f64 {
    scale.max(config.min_scale).min(config.max_scale)
}

/// Pan offset that keeps `anchor` (viewport-relative) fixed on screen while
/// the scale changes from `old_scale` to `new_scale`.
pub fn zoom_anchored_pan(anchor: Point, pan: Vec2, old_scale: f64, new_scale: f64) -> Vec2 {
    let ratio = new_scale / old_scale;
    Vec2::new(
        anchor.x - (anchor.x - pan.x) * ratio,
        anchor.y - (anchor.y - pan.y) * ratio,
    )
}

/// Pan offset that centers the unscaled canvas in `window`.
pub fn centered_pan(window: Size, config: &CanvasConfig) -> Vec2 {
    Vec2::new(
        (window.width - config.width) / 2.0,
        (window.height - config.height) / 2.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn cfg() -> CanvasConfig {
        CanvasConfig::default()
    }

    #[test]
    fn identity_transform_maps_client_directly() {
        let vp = Some(Rect::new(0.0, 0.0, 800.0, 600.0));
        let p = to_logical(Point::new(100.0, 100.0), vp, Vec2::ZERO, 1.0, &cfg());
        assert_eq!(p, Point::new(100.0, 100.0));
    }

    #[test]
    fn subtracts_origin_and_pan_then_divides() {
        let vp = Some(Rect::new(20.0, 10.0, 820.0, 610.0));
        let p = to_logical(Point::new(220.0, 110.0), vp, Vec2::new(100.0, 50.0), 2.0, &cfg());
        assert_eq!(p, Point::new(50.0, 25.0));
    }

    #[test]
    fn missing_viewport_yields_origin() {
        let p = to_logical(Point::new(500.0, 500.0), None, Vec2::new(3.0, 4.0), 1.5, &cfg());
        assert_eq!(p, Point::ZERO);
    }

    #[test]
    fn clamps_to_canvas_edges() {
        let vp = Some(Rect::new(0.0, 0.0, 800.0, 600.0));
        let c = cfg();
        assert_eq!(to_logical(Point::new(-50.0, -5.0), vp, Vec2::ZERO, 1.0, &c), Point::ZERO);
        assert_eq!(
            to_logical(Point::new(9000.0, 9000.0), vp, Vec2::ZERO, 1.0, &c),
            Point::new(3508.0, 2480.0)
        );
    }

    #[test]
    fn repeated_calls_are_stable() {
        let vp = Some(Rect::new(5.0, 7.0, 805.0, 607.0));
        let a = to_logical(Point::new(321.0, 123.0), vp, Vec2::new(-40.0, 12.0), 0.75, &cfg());
        let b = to_logical(Point::new(321.0, 123.0), vp, Vec2::new(-40.0, 12.0), 0.75, &cfg());
        assert_eq!(a, b);
    }

    #[test]
    fn max_pan_formula() {
        let m = max_pan(1.0, Size::new(1920.0, 1080.0), &cfg());
        assert_eq!(m, Vec2::new(894.0, 800.0));
    }

    #[test]
    fn clamp_pan_with_negative_bound_collapses() {
        // Window far wider than the scaled canvas: bound.x = (1754 - 4000) / 2 + 100 = -1023
        let window = Size::new(4000.0, 600.0);
        let pan = clamp_pan(Vec2::new(0.0, 0.0), 0.5, window, &cfg());
        assert_eq!(pan.x, 1023.0);
    }

    #[test]
    fn clamp_scale_bounds() {
        assert_eq!(clamp_scale(0.1, &cfg()), 0.5);
        assert_eq!(clamp_scale(7.0, &cfg()), 2.0);
        assert_eq!(clamp_scale(1.3, &cfg()), 1.3);
    }

    #[test]
    fn centered_pan_splits_overflow() {
        let pan = centered_pan(Size::new(1508.0, 480.0), &cfg());
        assert_eq!(pan, Vec2::new(-1000.0, -1000.0));
    }

    #[test]
    fn point_in_canvas_is_edge_inclusive() {
        let c = cfg();
        assert!(is_point_in_canvas(Point::new(0.0, 2480.0), &c));
        assert!(!is_point_in_canvas(Point::new(-0.1, 10.0), &c));
    }
}
