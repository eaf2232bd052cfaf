use crate::math::Point2;
use crate::topology::Color;

/// Receiver for drawn segments.
///
/// The core does not rasterize anything; a renderer implements this trait to
/// receive the lines it should stroke.
pub trait DrawTarget {
    /// Strokes the line `a → b` in `color`.
    fn draw_segment(&mut self, a: Point2, b: Point2, color: Color);
}

/// A recorded draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawnSegment {
    pub a: Point2,
    pub b: Point2,
    pub color: Color,
}

impl DrawTarget for Vec<DrawnSegment> {
    fn draw_segment(&mut self, a: Point2, b: Point2, color: Color) {
        self.push(DrawnSegment { a, b, color });
    }
}
