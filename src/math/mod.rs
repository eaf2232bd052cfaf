pub mod distance_2d;
pub mod intersect_2d;
pub mod polygon_2d;

/// 2D point type.
pub type Point2 = nalgebra::Point2<f64>;

/// 2D vector type.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Global geometric tolerance for floating-point comparisons.
pub const TOLERANCE: f64 = 1e-10;

/// Distance under which two points are the same point.
///
/// Coarser than [`TOLERANCE`] because points produced by intersection
/// arithmetic carry rounding error.
pub const POINT_EPSILON: f64 = 1e-7;

/// Largest coordinate magnitude a [`PointKey`] can represent exactly.
///
/// Quantized coordinates must fit an `i64`; beyond `i64::MAX * POINT_EPSILON`
/// (about 9.2e11) the cast saturates and distinct points share a key.
pub const MAX_COORDINATE: f64 = 1e11;

/// Returns `true` if both coordinates are finite and within
/// [`MAX_COORDINATE`].
#[must_use]
pub fn coordinates_in_range(point: &Point2) -> bool {
    point.x.abs() <= MAX_COORDINATE && point.y.abs() <= MAX_COORDINATE
}

/// Returns `true` if two points coincide within [`POINT_EPSILON`].
#[must_use]
pub fn points_equal(a: &Point2, b: &Point2) -> bool {
    (a.x - b.x).abs() < POINT_EPSILON && (a.y - b.y).abs() < POINT_EPSILON
}

/// Coordinate-derived identity of a point.
///
/// Coordinates are quantized to [`POINT_EPSILON`], so structurally equal
/// points hash and compare equal. Keys are distinct only for points that
/// pass [`coordinates_in_range`]; polygon construction rejects the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointKey {
    x: i64,
    y: i64,
}

impl PointKey {
    /// Quantizes a point into its key.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(point: &Point2) -> Self {
        Self {
            x: (point.x / POINT_EPSILON).round() as i64,
            y: (point.y / POINT_EPSILON).round() as i64,
        }
    }
}

impl From<&Point2> for PointKey {
    fn from(point: &Point2) -> Self {
        Self::new(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearby_points_share_a_key() {
        let a = Point2::new(1.0, 2.0);
        let b = Point2::new(1.0 + POINT_EPSILON * 0.1, 2.0 - POINT_EPSILON * 0.1);
        assert!(points_equal(&a, &b));
        assert_eq!(PointKey::new(&a), PointKey::new(&b));
    }

    #[test]
    fn keys_stay_distinct_up_to_the_coordinate_limit() {
        let a = Point2::new(MAX_COORDINATE, 0.0);
        let b = Point2::new(MAX_COORDINATE - 1.0, 0.0);
        assert!(coordinates_in_range(&a));
        assert_ne!(PointKey::new(&a), PointKey::new(&b));

        assert!(!coordinates_in_range(&Point2::new(2e12, 0.0)));
        assert!(!coordinates_in_range(&Point2::new(0.0, f64::NAN)));
        assert!(!coordinates_in_range(&Point2::new(f64::INFINITY, 0.0)));
    }

    #[test]
    fn distinct_points_have_distinct_keys() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(0.0, 1e-3);
        assert!(!points_equal(&a, &b));
        assert_ne!(PointKey::new(&a), PointKey::new(&b));
    }
}
