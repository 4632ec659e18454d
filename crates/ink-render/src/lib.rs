pub mod hit;
pub mod raster;
#[cfg(any(test, feature = "test-utils"))]
pub mod recording;
pub mod selection;
pub mod surface;

pub use hit::{hit_test, stroke_hit, strokes_touched};
pub use raster::Rasterizer;
#[cfg(any(test, feature = "test-utils"))]
pub use recording::{DrawOp, RecordingSurface};
pub use selection::draw_selection_box;
pub use surface::{SavedState, Surface};
