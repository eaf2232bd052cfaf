//! Boolean intersection, union and exclusive-or of linked polygons.

mod edgify;
mod engine;
mod select;
mod walk;

pub use engine::{boolean_execute, BooleanOptions};
pub use select::BooleanOp;
