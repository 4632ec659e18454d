//! Tunable constants for canvas interaction and stroke outlines.
//!
//! Both structs deserialize from partial JSON (`#[serde(default)]`), so the
//! host page only needs to send the fields it wants to override.

use crate::model::{CANVAS_HEIGHT, CANVAS_WIDTH};
use kurbo::Size;
use serde::{Deserialize, Serialize};

// ─── Canvas ──────────────────────────────────────────────────────────────

/// Configuration for coordinate mapping, gestures, and redraw.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CanvasConfig {
    /// Logical canvas width. Default: **3508**.
    pub width: f64,
    /// Logical canvas height. Default: **2480**.
    pub height: f64,
    /// Lower scale bound. Default: **0.5**.
    pub min_scale: f64,
    /// Upper scale bound. Default: **2.0**.
    pub max_scale: f64,
    /// Extra slack (screen px) allowed when dragging the canvas off-screen.
    /// Default: **100**.
    pub pan_margin: f64,
    /// Scale delta per unit of ctrl+wheel `deltaY`. Default: **-0.01**.
    pub wheel_zoom_factor: f64,
    /// Scale delta per pixel of pinch distance change. Default: **0.01**.
    pub pinch_zoom_factor: f64,
    /// Scale delta of one zoom-in / zoom-out button press. Default: **0.1**.
    pub zoom_step: f64,
    /// Padding added on each side of computed bounding boxes. Default: **10**.
    pub box_padding: f64,
    /// Draw the box around all strokes on every redraw. Default: **true**.
    pub show_global_box: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            min_scale: 0.5,
            max_scale: 2.0,
            pan_margin: 100.0,
            wheel_zoom_factor: -0.01,
            pinch_zoom_factor: 0.01,
            zoom_step: 0.1,
            box_padding: 10.0,
            show_global_box: true,
        }
    }
}

impl CanvasConfig {
    pub fn canvas_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Parse from JSON, falling back to defaults for missing fields.
    ///
    /// # Errors
    /// Returns the serde error message if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, String> {
        let config: Self = serde_json::from_str(json).map_err(|e| e.to_string())?;
        if config.min_scale <= 0.0 || config.min_scale > config.max_scale {
            return Err(format!(
                "invalid scale range [{}, {}]",
                config.min_scale, config.max_scale
            ));
        }
        Ok(config)
    }
}

// ─── Stroke outline ──────────────────────────────────────────────────────

/// Options for the freehand outline algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StrokeOptions {
    /// Base diameter of the stroke. Default: **8**.
    pub size: f64,
    /// How much pressure narrows the stroke (0 = constant width). Default: **0.5**.
    pub thinning: f64,
    /// Corner softening between samples (0..1). Default: **0.5**.
    pub smoothing: f64,
    /// How strongly new samples are pulled toward the previous one (0..1).
    /// Default: **0.5**.
    pub streamline: f64,
    /// Distance over which the start narrows to a point. Default: **0**.
    pub taper_start: f64,
    /// Distance over which the end narrows to a point. Default: **0**.
    pub taper_end: f64,
    /// Derive pressure from pointer velocity instead of the device.
    /// Default: **false**.
    pub simulate_pressure: bool,
}

impl Default for StrokeOptions {
    fn default() -> Self {
        Self {
            size: 8.0,
            thinning: 0.5,
            smoothing: 0.5,
            streamline: 0.5,
            taper_start: 0.0,
            taper_end: 0.0,
            simulate_pressure: false,
        }
    }
}

impl StrokeOptions {
    /// Options for the current brush: `size` from the store's stroke width,
    /// end taper from its taper setting, everything else from `self`.
    pub fn with_brush(mut self, width: f64, taper: f64) -> Self {
        self.size = width;
        self.taper_end = taper;
        self
    }
}
