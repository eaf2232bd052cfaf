pub mod error;
pub mod math;
pub mod operations;
pub mod polygon;
pub mod scene;
pub mod shadow;
pub mod topology;

pub use error::{Result, ShadowcastError};
pub use operations::boolean::{BooleanOp, BooleanOptions};
pub use operations::sweep::find_intersections;
pub use polygon::{build_polygon, LinkedPolygon};
pub use shadow::{evaluate_shadow, Sample, ShadowHit, Source, Wall};
