use super::{points_equal, Point2, Vector2, POINT_EPSILON, TOLERANCE};

/// Orientation of `c` relative to the directed line `a → b`.
///
/// The sign tells on which side `c` lies; zero means collinear. The value is
/// affine in `c`, which [`segments_cross`] relies on to locate the crossing.
#[must_use]
pub fn orient2d(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    (a.y - c.y) * (b.x - c.x) - (a.x - c.x) * (b.y - c.y)
}

/// Does segment `ab` touch or cross segment `cd`?
///
/// Endpoint contact counts as an intersection. Collinear segments never do,
/// which keeps a wall lying on the sight line from casting a shadow.
#[must_use]
pub fn line_segment_intersects(a: &Point2, b: &Point2, c: &Point2, d: &Point2) -> bool {
    let xa = orient2d(a, b, c);
    let xb = orient2d(a, b, d);
    if xa == 0.0 && xb == 0.0 {
        return false;
    }

    let xab = xa * xb <= 0.0;
    let xcd = orient2d(c, d, a) * orient2d(c, d, b) <= 0.0;
    xab && xcd
}

/// Proper crossing of two segments.
///
/// Returns the crossing point only when each segment passes strictly through
/// the interior of the other. Parallel, collinear and endpoint-touching pairs
/// return `None`.
#[must_use]
pub fn segments_cross(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> Option<Point2> {
    let scale = (a1 - a0).norm() * (b1 - b0).norm();
    if scale < TOLERANCE {
        return None;
    }
    let zero = TOLERANCE * scale;
    let sign = |o: f64| {
        if o.abs() <= zero {
            0
        } else if o > 0.0 {
            1
        } else {
            -1
        }
    };

    let o1 = orient2d(a0, a1, b0);
    let o2 = orient2d(a0, a1, b1);
    let o3 = orient2d(b0, b1, a0);
    let o4 = orient2d(b0, b1, a1);

    let (s1, s2, s3, s4) = (sign(o1), sign(o2), sign(o3), sign(o4));
    if s1 * s2 >= 0 || s3 * s4 >= 0 {
        return None;
    }

    let s = o1 / (o1 - o2);
    let point = b0 + (b1 - b0) * s;

    let touches_endpoint = [a0, a1, b0, b1].iter().any(|p| points_equal(p, &point));
    if touches_endpoint {
        return None;
    }
    Some(point)
}

/// Parameter of `p` along segment `a → b`, if `p` lies on the segment.
///
/// `p` must be within [`POINT_EPSILON`] of the segment. The returned
/// parameter is clamped to `[0, 1]`. Zero-length segments return `None`.
#[must_use]
pub fn point_on_segment(p: &Point2, a: &Point2, b: &Point2) -> Option<f64> {
    let d: Vector2 = b - a;
    let len_sq = d.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return None;
    }
    let t = (p - a).dot(&d) / len_sq;
    let len = len_sq.sqrt();
    if t < -POINT_EPSILON / len || t > 1.0 + POINT_EPSILON / len {
        return None;
    }
    let t = t.clamp(0.0, 1.0);
    let closest = a + d * t;
    ((p - closest).norm() < POINT_EPSILON).then_some(t)
}

/// Returns `true` if the axis-aligned boxes of two segments overlap.
#[must_use]
pub fn bounds_overlap(a0: &Point2, a1: &Point2, b0: &Point2, b1: &Point2) -> bool {
    let eps = POINT_EPSILON;
    a0.x.min(a1.x) <= b0.x.max(b1.x) + eps
        && b0.x.min(b1.x) <= a0.x.max(a1.x) + eps
        && a0.y.min(a1.y) <= b0.y.max(b1.y) + eps
        && b0.y.min(b1.y) <= a0.y.max(a1.y) + eps
}
