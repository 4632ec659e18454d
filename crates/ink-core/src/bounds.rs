//! Bounding-box computation for point sets and stroke collections.
//!
//! Boxes are padded on every side and never smaller than
//! [`MIN_BOX_SIZE`] in either dimension, so renderers never receive a
//! zero-area box.
//!
//! Draw strokes store only their outline as SVG path data, so their extent is
//! re-derived from the numeric tokens of that path. The tokenizer is built on
//! `winnow` 0.7.

use crate::model::{BoundingBox, MIN_BOX_SIZE, Stroke};
use kurbo::Point;
use winnow::combinator::{preceded, repeat};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

/// Default padding added on each side.
pub const DEFAULT_PADDING: f64 = 10.0;

/// Running min/max accumulator.
#[derive(Debug, Clone, Copy)]
struct Extent {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Extent {
    fn empty() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    fn include(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn is_empty(&self) -> bool {
        self.min_x == f64::INFINITY || self.min_y == f64::INFINITY
    }

    fn padded(&self, padding: f64) -> BoundingBox {
        BoundingBox {
            x: self.min_x - padding,
            y: self.min_y - padding,
            width: (self.max_x - self.min_x + padding * 2.0).max(MIN_BOX_SIZE),
            height: (self.max_y - self.min_y + padding * 2.0).max(MIN_BOX_SIZE),
        }
    }
}

/// Box around a point set. Returns `None` for fewer than 2 points.
pub fn from_points<I>(points: I, padding: f64) -> Option<BoundingBox>
where
    I: IntoIterator<Item = Point>,
{
    let mut extent = Extent::empty();
    let mut count = 0usize;
    for p in points {
        extent.include(p.x, p.y);
        count += 1;
    }
    if count < 2 {
        return None;
    }
    Some(extent.padded(padding))
}

/// Box around every stroke in the collection.
///
/// Draw strokes contribute the coordinate pairs found in their path data;
/// text strokes contribute an approximate box (`len × size × 0.6` wide,
/// `size` tall). Returns `None` when nothing contributed.
pub fn from_strokes(strokes: &[Stroke], padding: f64) -> Option<BoundingBox> {
    let mut extent = Extent::empty();

    for stroke in strokes {
        match stroke {
            Stroke::Draw(draw) => {
                for p in path_coordinates(&draw.path) {
                    extent.include(p.x, p.y);
                }
            }
            Stroke::Text(text) => {
                let r = text.approximate_rect();
                extent.include(r.x0, r.y0);
                extent.include(r.x1, r.y1);
            }
        }
    }

    if extent.is_empty() {
        return None;
    }
    Some(extent.padded(padding))
}

/// Box around a single stroke (used for the selected-stroke overlay).
pub fn stroke_box(stroke: &Stroke, padding: f64) -> Option<BoundingBox> {
    from_strokes(std::slice::from_ref(stroke), padding)
}

// ─── Path tokens ─────────────────────────────────────────────────────────

fn is_separator(c: char) -> bool {
    c.is_ascii_uppercase() || c == ' ' || c == ','
}

fn path_token<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    preceded(take_while(0.., is_separator), take_till(1.., is_separator)).parse_next(input)
}

/// Split SVG path data into its raw tokens: everything between uppercase
/// command letters, spaces, and commas.
pub fn path_tokens(path: &str) -> Vec<&str> {
    let mut rest = path;
    let tokens: ModalResult<Vec<&str>> = repeat(0.., path_token).parse_next(&mut rest);
    tokens.unwrap_or_default()
}

/// Coordinate pairs recovered from path data.
///
/// Tokens are paired in order; a pair with a non-numeric member (or a
/// dangling last token) is skipped.
pub fn path_coordinates(path: &str) -> Vec<Point> {
    let numbers: Vec<Option<f64>> = path_tokens(path)
        .into_iter()
        .map(|t| t.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect();

    let coords: Vec<Point> = numbers
        .chunks(2)
        .filter_map(|pair| match pair {
            [Some(x), Some(y)] => Some(Point::new(*x, *y)),
            _ => None,
        })
        .collect();

    if coords.is_empty() && !path.trim().is_empty() {
        log::warn!("path data contributed no coordinates: {path:?}");
    }
    coords
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::StrokeId;
    use crate::model::{DrawStroke, TextStroke};
    use pretty_assertions::assert_eq;

    fn draw(path: &str) -> Stroke {
        Stroke::Draw(DrawStroke {
            id: StrokeId::next(),
            path: path.to_string(),
            color: "#000".into(),
            bounding_box: None,
        })
    }

    fn text(x: f64, y: f64, s: &str, size: f64) -> Stroke {
        Stroke::Text(TextStroke {
            id: StrokeId::next(),
            text: s.to_string(),
            position: Point::new(x, y),
            font_size: size,
            font_family: "serif".into(),
            color: "#000".into(),
        })
    }

    #[test]
    fn fewer_than_two_points_is_none() {
        assert_eq!(from_points(Vec::<Point>::new(), DEFAULT_PADDING), None);
        assert_eq!(from_points([Point::new(5.0, 5.0)], DEFAULT_PADDING), None);
    }

    #[test]
    fn two_points_padded() {
        let b = from_points([Point::new(10.0, 20.0), Point::new(110.0, 70.0)], 10.0).unwrap();
        assert_eq!(b, BoundingBox::new(0.0, 10.0, 120.0, 70.0));
    }

    #[test]
    fn coincident_points_get_minimum_size() {
        let b = from_points([Point::new(3.0, 3.0), Point::new(3.0, 3.0)], 0.0).unwrap();
        assert_eq!((b.width, b.height), (10.0, 10.0));
    }

    #[test]
    fn tokens_split_on_commands_spaces_commas() {
        assert_eq!(
            path_tokens("M1,2 Q3 4 5.5 -6Z"),
            vec!["1", "2", "3", "4", "5.5", "-6"]
        );
        assert!(path_tokens("").is_empty());
        assert!(path_tokens("M Z").is_empty());
    }

    #[test]
    fn non_numeric_pairs_are_skipped() {
        let coords = path_coordinates("M 1 2 L x 4 L 5 6 L 7");
        assert_eq!(coords, vec![Point::new(1.0, 2.0), Point::new(5.0, 6.0)]);
    }

    #[test]
    fn empty_stroke_list_is_none() {
        assert_eq!(from_strokes(&[], DEFAULT_PADDING), None);
    }

    #[test]
    fn unparseable_draw_contributes_nothing() {
        assert_eq!(from_strokes(&[draw("M Z")], DEFAULT_PADDING), None);
    }

    #[test]
    fn text_stroke_uses_width_heuristic() {
        let b = from_strokes(&[text(10.0, 10.0, "hi", 20.0)], 10.0).unwrap();
        assert_eq!(b.x, 0.0);
        assert_eq!(b.y, 0.0);
        assert!((b.right() - 44.0).abs() < 1e-9);
        assert!((b.bottom() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn mixed_strokes_union() {
        let strokes = [draw("M100 100 Q150 150 200 120Z"), text(0.0, 300.0, "abc", 10.0)];
        let b = from_strokes(&strokes, 0.0).unwrap();
        assert_eq!(b, BoundingBox::new(0.0, 100.0, 200.0, 210.0));
    }

    #[test]
    fn single_draw_point_still_min_box() {
        let b = from_strokes(&[draw("M5 5Z")], 0.0).unwrap();
        assert_eq!((b.width, b.height), (10.0, 10.0));
    }
}
