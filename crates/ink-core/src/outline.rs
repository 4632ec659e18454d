//! Freehand stroke outlines.
//!
//! An [`OutlineAlgorithm`] turns an ordered, pressure-weighted point sequence
//! into a closed polygon approximating a brush stroke. The polygon is then
//! encoded as SVG path data with quadratic midpoint smoothing, which is what
//! the store persists and the surface fills.

use crate::config::StrokeOptions;
use crate::model::StrokePoint;
use kurbo::{BezPath, Point, Vec2};
use std::f64::consts::PI;

/// Segments used to approximate a round cap or a single dot.
const CAP_SEGMENTS: usize = 8;

/// Converts pointer samples into a fillable outline polygon.
pub trait OutlineAlgorithm {
    /// Outline polygon for `points`. Empty input yields an empty polygon.
    fn outline(&self, points: &[StrokePoint], options: &StrokeOptions) -> Vec<Point>;

    /// Encode a polygon as SVG path data.
    fn to_path_string(&self, polygon: &[Point]) -> String {
        quadratic_path(polygon).to_svg()
    }

    /// `outline` followed by `to_path_string`.
    fn outline_path(&self, points: &[StrokePoint], options: &StrokeOptions) -> String {
        self.to_path_string(&self.outline(points, options))
    }
}

/// Smooth a closed polygon: each vertex becomes the control point of a
/// quadratic curve ending at the midpoint to the next vertex.
pub fn quadratic_path(polygon: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some(&first) = polygon.first() else {
        return path;
    };
    path.move_to(first);
    for (i, &p) in polygon.iter().enumerate() {
        let next = polygon[(i + 1) % polygon.len()];
        path.quad_to(p, p.midpoint(next));
    }
    path.close_path();
    path
}

// ─── Default implementation ──────────────────────────────────────────────

/// Pressure-sensitive variable-width outline with round caps and optional
/// tapering at both ends.
#[derive(Debug, Clone, Copy, Default)]
pub struct Freehand;

/// A streamlined sample with its running length along the stroke.
#[derive(Debug, Clone, Copy)]
struct Sample {
    point: Point,
    pressure: f64,
    running_length: f64,
}

impl Freehand {
    fn samples(points: &[StrokePoint], options: &StrokeOptions) -> Vec<Sample> {
        let t = 0.15 + (1.0 - options.streamline.clamp(0.0, 1.0)) * 0.85;
        let min_step = (options.size / 8.0).max(0.5);

        let mut out: Vec<Sample> = Vec::with_capacity(points.len());
        let mut prev_pressure = points.first().map_or(0.5, |p| p.pressure);

        for raw in points {
            let target = raw.to_point();
            let Some(last) = out.last().copied() else {
                out.push(Sample {
                    point: target,
                    pressure: raw.pressure,
                    running_length: 0.0,
                });
                continue;
            };

            let point = last.point.lerp(target, t);
            let step = point.distance(last.point);
            if step < min_step {
                continue;
            }

            let pressure = if options.simulate_pressure {
                // Faster movement reads as lighter pressure.
                let speed = (step / options.size.max(1.0)).min(1.0);
                let p = prev_pressure + ((1.0 - speed) - prev_pressure) * 0.275;
                p.clamp(0.0, 1.0)
            } else {
                raw.pressure
            };
            prev_pressure = pressure;

            out.push(Sample {
                point,
                pressure,
                running_length: last.running_length + step,
            });
        }
        out
    }

    fn radius(sample: &Sample, total: f64, options: &StrokeOptions) -> f64 {
        let thinning = options.thinning.clamp(-1.0, 1.0);
        let mut r = options.size * (0.5 - thinning * (0.5 - sample.pressure));
        if options.taper_start > 0.0 && sample.running_length < options.taper_start {
            r *= ease_out(sample.running_length / options.taper_start);
        }
        let remaining = total - sample.running_length;
        if options.taper_end > 0.0 && remaining < options.taper_end {
            r *= ease_out(remaining / options.taper_end);
        }
        r.max(0.01)
    }
}

impl OutlineAlgorithm for Freehand {
    fn outline(&self, points: &[StrokePoint], options: &StrokeOptions) -> Vec<Point> {
        let Some(first) = points.first() else {
            return Vec::new();
        };

        let samples = Self::samples(points, options);
        if samples.len() < 2 {
            let r = (options.size / 2.0).max(0.5);
            return dot(first.to_point(), r);
        }

        let total = samples.last().map_or(0.0, |s| s.running_length);
        let smoothing = options.smoothing.clamp(0.0, 1.0);

        let mut left = Vec::with_capacity(samples.len());
        let mut right = Vec::with_capacity(samples.len());
        let mut prev_dir: Option<Vec2> = None;

        for (i, s) in samples.iter().enumerate() {
            let before = samples[i.saturating_sub(1)].point;
            let after = samples[(i + 1).min(samples.len() - 1)].point;
            let mut dir = unit(after - before).unwrap_or(Vec2::new(1.0, 0.0));
            if let Some(prev) = prev_dir {
                dir = unit(prev.lerp(dir, 1.0 - smoothing * 0.5)).unwrap_or(dir);
            }
            prev_dir = Some(dir);

            let normal = Vec2::new(-dir.y, dir.x);
            let r = Self::radius(s, total, options);
            left.push(s.point + normal * r);
            right.push(s.point - normal * r);
        }

        let start = samples[0];
        let end = samples[samples.len() - 1];
        let end_dir = prev_dir.unwrap_or(Vec2::new(1.0, 0.0));
        let start_dir = unit(samples[1].point - start.point).unwrap_or(end_dir);

        let mut polygon = Vec::with_capacity(left.len() + right.len() + CAP_SEGMENTS * 2);
        polygon.extend(left.iter().copied());
        polygon.extend(cap(end.point, end_dir, Self::radius(&end, total, options)));
        polygon.extend(right.iter().rev().copied());
        polygon.extend(cap(start.point, -start_dir, Self::radius(&start, total, options)));
        polygon
    }
}

fn ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * (2.0 - t)
}

fn unit(v: Vec2) -> Option<Vec2> {
    let len = v.hypot();
    (len > f64::EPSILON).then(|| v / len)
}

/// Half circle around `center`, swept from the left side of `dir` through
/// its tip to the right side. Endpoints are excluded.
fn cap(center: Point, dir: Vec2, r: f64) -> impl Iterator<Item = Point> {
    let base = dir.y.atan2(dir.x) + PI / 2.0;
    (1..CAP_SEGMENTS).map(move |k| {
        let a = base - PI * k as f64 / CAP_SEGMENTS as f64;
        center + Vec2::new(a.cos(), a.sin()) * r
    })
}

fn dot(center: Point, r: f64) -> Vec<Point> {
    let n = CAP_SEGMENTS * 2;
    (0..n)
        .map(|k| {
            let a = 2.0 * PI * k as f64 / n as f64;
            center + Vec2::new(a.cos(), a.sin()) * r
        })
        .collect()
}
