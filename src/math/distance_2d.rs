use super::{Point2, TOLERANCE};

/// Point on the infinite line `a → b` closest to `c` (orthogonal projection).
///
/// Returns `None` when `a` and `b` coincide.
#[must_use]
pub fn perpendicular_point(a: &Point2, b: &Point2, c: &Point2) -> Option<Point2> {
    let delta_ba = b - a;
    let dab = delta_ba.norm_squared();
    if dab < TOLERANCE * TOLERANCE {
        return None;
    }
    let u = (c - a).dot(&delta_ba) / dab;
    Some(a + delta_ba * u)
}

/// Distance from `c` to the infinite line through `a` and `b`.
///
/// Returns `None` when `a` and `b` coincide.
#[must_use]
pub fn point_to_line_dist(a: &Point2, b: &Point2, c: &Point2) -> Option<f64> {
    perpendicular_point(a, b, c).map(|foot| (c - foot).norm())
}
