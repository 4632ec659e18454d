//! Full-repaint stroke rasterizer.
//!
//! Every redraw clears the surface and paints, in order: the white page,
//! its border, committed strokes, the in-progress preview, and the
//! selection overlays. Nothing is cached between frames.

use crate::selection::draw_selection_box;
use crate::surface::{SavedState, Surface};
use ink_core::bounds::{from_strokes, stroke_box};
use ink_core::{
    CanvasConfig, Mode, OutlineAlgorithm, Stroke, StrokeId, StrokeOptions, StrokePoint,
    StrokeStore,
};
use kurbo::Rect;

const PAGE_FILL: &str = "#ffffff";
const PAGE_BORDER: &str = "#cccccc";
const TEXT_BASELINE: &str = "top";

/// Borrowed view over everything one frame needs.
pub struct Rasterizer<'a, S: StrokeStore + ?Sized, O: OutlineAlgorithm + ?Sized> {
    store: &'a S,
    config: &'a CanvasConfig,
    outline: &'a O,
    options: StrokeOptions,
}

impl<'a, S: StrokeStore + ?Sized, O: OutlineAlgorithm + ?Sized> Rasterizer<'a, S, O> {
    /// Preview options follow the store's current brush.
    pub fn new(store: &'a S, config: &'a CanvasConfig, outline: &'a O) -> Self {
        let options = StrokeOptions::default().with_brush(store.stroke_width(), store.stroke_taper());
        Self {
            store,
            config,
            outline,
            options,
        }
    }

    /// Override the outline options used for the preview.
    pub fn with_options(mut self, options: StrokeOptions) -> Self {
        self.options = options;
        self
    }

    /// Repaint the whole frame.
    ///
    /// `preview` is the in-progress point buffer (painted only in Draw
    /// mode); `selected` gets its own active box on top of the global one.
    pub fn redraw(
        &self,
        surface: &mut dyn Surface,
        preview: Option<&[StrokePoint]>,
        selected: Option<StrokeId>,
    ) {
        let view = self.store.view();
        let scale = view.scale;

        surface.clear();
        let mut s = SavedState::new(surface);
        s.translate(view.pan_offset.x, view.pan_offset.y);
        s.scale(scale, scale);

        self.draw_page(&mut *s, scale);

        let strokes = self.store.strokes();
        for stroke in strokes {
            draw_stroke(&mut *s, stroke);
        }

        let preview = preview.filter(|p| !p.is_empty() && self.store.mode() == Mode::Draw);
        if let Some(points) = preview {
            let path = self.outline.outline_path(points, &self.options);
            if !path.is_empty() {
                s.set_fill_style(self.store.stroke_color());
                s.fill_path(&path);
            }
        }

        let global = self
            .config
            .show_global_box
            .then(|| from_strokes(strokes, self.config.box_padding))
            .flatten();
        if let Some(bbox) = global {
            draw_selection_box(&mut *s, &bbox, scale, true);
        }

        if let Some(bbox) = selected
            .and_then(|id| strokes.iter().find(|st| st.id() == id))
            .and_then(|st| stroke_box(st, self.config.box_padding))
        {
            draw_selection_box(&mut *s, &bbox, scale, true);
        }
    }

    fn draw_page(&self, s: &mut dyn Surface, scale: f64) {
        let page = Rect::from_origin_size((0.0, 0.0), self.config.canvas_size());
        s.set_fill_style(PAGE_FILL);
        s.fill_rect(page);
        s.set_stroke_style(PAGE_BORDER);
        s.set_line_width(1.0 / scale);
        s.stroke_rect(page);
    }
}

fn draw_stroke(s: &mut dyn Surface, stroke: &Stroke) {
    match stroke {
        Stroke::Draw(draw) => {
            s.set_fill_style(&draw.color);
            s.fill_path(&draw.path);
        }
        Stroke::Text(text) => {
            s.set_font(&format!("{}px {}", text.font_size, text.font_family));
            s.set_text_baseline(TEXT_BASELINE);
            s.set_fill_style(&text.color);
            s.fill_text(&text.text, text.position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawOp, RecordingSurface};
    use ink_core::{DrawStroke, Freehand, Point, TextStroke, Vec2, ViewTransform};
    use pretty_assertions::assert_eq;

    /// Read-only store fixture; mutators are no-ops.
    struct Fixture {
        mode: Mode,
        strokes: Vec<Stroke>,
        view: ViewTransform,
    }

    impl Fixture {
        fn new(strokes: Vec<Stroke>) -> Self {
            Self {
                mode: Mode::Draw,
                strokes,
                view: ViewTransform::default(),
            }
        }
    }

    impl StrokeStore for Fixture {
        fn mode(&self) -> Mode {
            self.mode
        }
        fn strokes(&self) -> &[Stroke] {
            &self.strokes
        }
        fn stroke_color(&self) -> &str {
            "#ff0000"
        }
        fn stroke_width(&self) -> f64 {
            6.0
        }
        fn stroke_taper(&self) -> f64 {
            0.0
        }
        fn view(&self) -> ViewTransform {
            self.view
        }
        fn add_stroke(&mut self, _: Stroke) {}
        fn erase_stroke(&mut self, _: &[Point]) {}
        fn update_pan_offset(&mut self, _: Vec2) {}
        fn update_scale(&mut self, _: f64) {}
        fn update_mode(&mut self, _: Mode) {}
    }

    fn draw(path: &str, color: &str) -> Stroke {
        Stroke::Draw(DrawStroke {
            id: StrokeId::next(),
            path: path.into(),
            color: color.into(),
            bounding_box: None,
        })
    }

    fn no_global_box() -> CanvasConfig {
        CanvasConfig {
            show_global_box: false,
            ..CanvasConfig::default()
        }
    }

    #[test]
    fn empty_store_paints_page_only() {
        let store = Fixture::new(vec![]);
        let config = CanvasConfig::default();
        let mut rec = RecordingSurface::new();
        Rasterizer::new(&store, &config, &Freehand).redraw(&mut rec, None, None);

        let page = Rect::new(0.0, 0.0, config.width, config.height);
        assert_eq!(
            rec.ops,
            vec![
                DrawOp::Clear,
                DrawOp::Save,
                DrawOp::Translate(0.0, 0.0),
                DrawOp::Scale(1.0, 1.0),
                DrawOp::FillStyle(PAGE_FILL.into()),
                DrawOp::FillRect(page),
                DrawOp::StrokeStyle(PAGE_BORDER.into()),
                DrawOp::LineWidth(1.0),
                DrawOp::StrokeRect(page),
                DrawOp::Restore,
            ]
        );
    }

    #[test]
    fn view_transform_applied_before_painting() {
        let mut store = Fixture::new(vec![]);
        store.view = ViewTransform {
            pan_offset: Vec2::new(-40.0, 25.0),
            scale: 2.0,
        };
        let config = no_global_box();
        let mut rec = RecordingSurface::new();
        Rasterizer::new(&store, &config, &Freehand).redraw(&mut rec, None, None);

        assert_eq!(rec.ops[2], DrawOp::Translate(-40.0, 25.0));
        assert_eq!(rec.ops[3], DrawOp::Scale(2.0, 2.0));
        // Border stays 1 screen px.
        assert!(rec.ops.contains(&DrawOp::LineWidth(0.5)));
    }

    #[test]
    fn strokes_paint_in_store_order() {
        let store = Fixture::new(vec![
            draw("M0,0 L10,0 L10,10 Z", "#111"),
            draw("M20,20 L30,20 L30,30 Z", "#222"),
        ]);
        let config = no_global_box();
        let mut rec = RecordingSurface::new();
        Rasterizer::new(&store, &config, &Freehand).redraw(&mut rec, None, None);

        assert_eq!(
            rec.filled_paths(),
            vec!["M0,0 L10,0 L10,10 Z", "M20,20 L30,20 L30,30 Z"]
        );
        let fills: Vec<_> = rec
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillStyle(c) => Some(c.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(fills, vec![PAGE_FILL, "#111", "#222"]);
    }

    #[test]
    fn text_stroke_sets_font_and_baseline() {
        let store = Fixture::new(vec![Stroke::Text(TextStroke {
            id: StrokeId::next(),
            text: "note".into(),
            position: Point::new(50.0, 60.0),
            font_size: 24.0,
            font_family: "Georgia".into(),
            color: "#333".into(),
        })]);
        let config = no_global_box();
        let mut rec = RecordingSurface::new();
        Rasterizer::new(&store, &config, &Freehand).redraw(&mut rec, None, None);

        let tail = &rec.ops[rec.ops.len() - 5..];
        assert_eq!(
            tail,
            &[
                DrawOp::Font("24px Georgia".into()),
                DrawOp::TextBaseline("top".into()),
                DrawOp::FillStyle("#333".into()),
                DrawOp::FillText("note".into(), Point::new(50.0, 60.0)),
                DrawOp::Restore,
            ]
        );
    }

    #[test]
    fn preview_only_in_draw_mode() {
        let points = [
            StrokePoint::new(100.0, 100.0, 0.5),
            StrokePoint::new(140.0, 110.0, 0.5),
            StrokePoint::new(180.0, 130.0, 0.5),
        ];
        let config = no_global_box();

        let mut store = Fixture::new(vec![]);
        let mut rec = RecordingSurface::new();
        Rasterizer::new(&store, &config, &Freehand).redraw(&mut rec, Some(&points), None);
        assert_eq!(rec.filled_paths().len(), 1);
        assert!(rec.ops.contains(&DrawOp::FillStyle("#ff0000".into())));

        store.mode = Mode::Erase;
        let mut rec = RecordingSurface::new();
        Rasterizer::new(&store, &config, &Freehand).redraw(&mut rec, Some(&points), None);
        assert!(rec.filled_paths().is_empty());
    }

    #[test]
    fn global_box_follows_config() {
        let store = Fixture::new(vec![draw("M0,0 L100,0 L100,100 Z", "#000")]);

        let mut rec = RecordingSurface::new();
        Rasterizer::new(&store, &CanvasConfig::default(), &Freehand).redraw(&mut rec, None, None);
        // Page border + box outline + 8 handle outlines.
        assert_eq!(rec.count(|op| matches!(op, DrawOp::StrokeRect(_))), 10);
        assert!(rec.ops.contains(&DrawOp::StrokeRect(Rect::new(-10.0, -10.0, 110.0, 110.0))));
        assert!(rec.is_balanced());

        let mut rec = RecordingSurface::new();
        Rasterizer::new(&store, &no_global_box(), &Freehand).redraw(&mut rec, None, None);
        assert_eq!(rec.count(|op| matches!(op, DrawOp::StrokeRect(_))), 1);
    }

    #[test]
    fn selected_stroke_gets_its_own_box() {
        let store = Fixture::new(vec![
            draw("M0,0 L10,0 L10,10 Z", "#000"),
            draw("M200,200 L220,200 L220,220 Z", "#000"),
        ]);
        let selected = store.strokes[1].id();
        let config = no_global_box();
        let mut rec = RecordingSurface::new();
        Rasterizer::new(&store, &config, &Freehand).redraw(&mut rec, None, Some(selected));

        assert!(rec.ops.contains(&DrawOp::StrokeRect(Rect::new(190.0, 190.0, 230.0, 230.0))));
        assert_eq!(rec.count(|op| matches!(op, DrawOp::FillRect(_))), 1 + 8);
        assert_eq!(rec.max_depth(), 2);
    }

    #[test]
    fn unknown_selection_is_ignored() {
        let store = Fixture::new(vec![draw("M0,0 L10,0 L10,10 Z", "#000")]);
        let config = no_global_box();
        let mut rec = RecordingSurface::new();
        Rasterizer::new(&store, &config, &Freehand).redraw(&mut rec, None, Some(StrokeId::from_raw(0)));
        assert_eq!(rec.count(|op| matches!(op, DrawOp::FillRect(_))), 1);
    }
}
