use crate::math::polygon_2d::{point_in_polygon_2d, signed_area_2d};
use crate::math::{Point2, Vector2, TOLERANCE};

use super::walk::Arrangement;

/// The type of boolean operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    /// Interior to both polygons.
    Intersection,
    /// Interior to either polygon.
    Union,
    /// Interior to exactly one polygon.
    Xor,
}

impl BooleanOp {
    /// Whether a point with the given memberships belongs to the result.
    #[must_use]
    pub fn keeps(self, in_a: bool, in_b: bool) -> bool {
        match self {
            Self::Intersection => in_a && in_b,
            Self::Union => in_a || in_b,
            Self::Xor => in_a != in_b,
        }
    }
}

/// The result region of a boolean operation over two point rings.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Region<'a> {
    a: &'a [Point2],
    b: &'a [Point2],
    op: BooleanOp,
}

impl<'a> Region<'a> {
    pub(crate) fn new(a: &'a [Point2], b: &'a [Point2], op: BooleanOp) -> Self {
        Self { a, b, op }
    }

    pub(crate) fn contains(&self, point: &Point2) -> bool {
        self.op.keeps(
            point_in_polygon_2d(point, self.a),
            point_in_polygon_2d(point, self.b),
        )
    }

    /// An arrangement edge bounds the result when the region lies just to
    /// its left and not just to its right.
    pub(crate) fn is_boundary_edge(&self, from: &Point2, to: &Point2) -> bool {
        let d: Vector2 = to - from;
        let len = d.norm();
        if len < TOLERANCE {
            return false;
        }
        let offset = (len * 1e-3).min(1e-4);
        let normal = Vector2::new(-d.y, d.x) / len * offset;
        let mid = from + d * 0.5;
        self.contains(&(mid + normal)) && !self.contains(&(mid - normal))
    }
}

/// Signed turn from direction `prev → cur` onto `cur → next`, in `(-π, π]`.
/// Positive turns are to the left.
fn turn_angle(prev: &Point2, cur: &Point2, next: &Point2) -> f64 {
    let d_in = cur - prev;
    let d_out = next - cur;
    let cross = d_in.x * d_out.y - d_in.y * d_out.x;
    cross.atan2(d_in.dot(&d_out))
}

/// Keeps a closed walk only if it is a face of the result boundary: at
/// every vertex it took the leftmost boundary continuation, and it encloses
/// a non-zero area.
///
/// Walks that cross over at a pinch point close too, but they merge two
/// faces into one ring and fail the leftmost test there.
pub(crate) fn keep_cycle(boundary: &Arrangement, cycle: &[usize]) -> bool {
    let n = cycle.len();
    if n < 3 {
        return false;
    }

    for i in 0..n {
        let prev = cycle[(i + n - 1) % n];
        let cur = cycle[i];
        let next = cycle[(i + 1) % n];
        let (p, c) = (boundary.point(prev), boundary.point(cur));
        let taken = turn_angle(p, c, boundary.point(next));
        let leftmost = boundary
            .successors(cur)
            .iter()
            .map(|&candidate| turn_angle(p, c, boundary.point(candidate)))
            .fold(f64::NEG_INFINITY, f64::max);
        if taken < leftmost - 1e-12 {
            return false;
        }
    }

    let points: Vec<Point2> = cycle.iter().map(|&i| *boundary.point(i)).collect();
    signed_area_2d(&points).abs() > TOLERANCE
}
