pub mod bounds;
pub mod config;
pub mod coords;
pub mod id;
pub mod model;
pub mod outline;
pub mod store;

pub use bounds::{from_points, from_strokes};
pub use config::{CanvasConfig, StrokeOptions};
pub use id::StrokeId;
pub use model::*;
pub use outline::{Freehand, OutlineAlgorithm};
pub use store::StrokeStore;

// Re-export kurbo geometry so downstream crates share one version
pub use kurbo::{Point, Rect, Size, Vec2};
