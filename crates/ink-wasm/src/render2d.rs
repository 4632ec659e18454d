//! Canvas2D surface.
//!
//! Adapts an HTML `<canvas>` 2D context to the renderer's [`Surface`]
//! trait. The device-pixel-ratio transform is the base transform: every
//! frame starts from it, so the renderer only ever sees CSS pixels.

use ink_render::Surface;
use kurbo::{Point, Rect};
use wasm_bindgen::JsValue;
use web_sys::{CanvasRenderingContext2d, Path2d};

pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
    dpr: f64,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx, dpr: 1.0 }
    }

    /// Set the device pixel ratio the backing store was sized with.
    pub fn set_dpr(&mut self, dpr: f64) {
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        self.reset_transform();
    }

    fn reset_transform(&self) {
        let d = self.dpr;
        warn_on_err("setTransform", self.ctx.set_transform(d, 0.0, 0.0, d, 0.0, 0.0));
    }
}

fn warn_on_err(what: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        log::warn!("canvas {what} failed: {e:?}");
    }
}

impl Surface for CanvasSurface {
    fn clear(&mut self) {
        warn_on_err("setTransform", self.ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0));
        if let Some(canvas) = self.ctx.canvas() {
            self.ctx
                .clear_rect(0.0, 0.0, canvas.width() as f64, canvas.height() as f64);
        }
        self.reset_transform();
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        warn_on_err("translate", self.ctx.translate(dx, dy));
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        warn_on_err("scale", self.ctx.scale(sx, sy));
    }

    fn set_fill_style(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn set_stroke_style(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_line_dash(&mut self, segments: &[f64]) {
        let arr = js_sys::Array::new();
        for s in segments {
            arr.push(&JsValue::from_f64(*s));
        }
        warn_on_err("setLineDash", self.ctx.set_line_dash(&arr));
    }

    fn set_line_dash_offset(&mut self, offset: f64) {
        self.ctx.set_line_dash_offset(offset);
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }

    fn set_text_baseline(&mut self, baseline: &str) {
        self.ctx.set_text_baseline(baseline);
    }

    fn fill_rect(&mut self, rect: Rect) {
        self.ctx
            .fill_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn stroke_rect(&mut self, rect: Rect) {
        self.ctx
            .stroke_rect(rect.x0, rect.y0, rect.width(), rect.height());
    }

    fn fill_path(&mut self, path: &str) {
        match Path2d::new_with_path_string(path) {
            Ok(p) => self.ctx.fill_with_path_2d(&p),
            Err(e) => log::warn!("bad path data ({} bytes): {e:?}", path.len()),
        }
    }

    fn fill_text(&mut self, text: &str, at: Point) {
        warn_on_err("fillText", self.ctx.fill_text(text, at.x, at.y));
    }
}
