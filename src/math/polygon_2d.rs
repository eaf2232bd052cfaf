use super::{points_equal, Point2};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. A trailing point
/// equal to the first one is ignored.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let points = open_ring(points);
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Even-odd point-in-polygon test by horizontal ray casting.
///
/// Works for rings with or without the repeated closing point. Points
/// exactly on the boundary may land on either side.
#[must_use]
pub fn point_in_polygon_2d(point: &Point2, polygon: &[Point2]) -> bool {
    let ring = open_ring(polygon);
    let n = ring.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (&ring[i], &ring[j]);
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = pj.x + (point.y - pj.y) * (pi.x - pj.x) / (pi.y - pj.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Strips the repeated closing point from a closed ring, if present.
#[must_use]
pub fn open_ring(points: &[Point2]) -> &[Point2] {
    match points {
        [first, .., last] if points_equal(first, last) => &points[..points.len() - 1],
        _ => points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn square(x0: f64, y0: f64, side: f64) -> Vec<Point2> {
        vec![
            Point2::new(x0, y0),
            Point2::new(x0 + side, y0),
            Point2::new(x0 + side, y0 + side),
            Point2::new(x0, y0 + side),
            Point2::new(x0, y0),
        ]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert_abs_diff_eq!(signed_area_2d(&square(0.0, 0.0, 2.0)), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn signed_area_cw_square() {
        let mut pts = square(0.0, 0.0, 1.0);
        pts.reverse();
        assert_abs_diff_eq!(signed_area_2d(&pts), -1.0, epsilon = 1e-12);
    }

    #[test]
    fn signed_area_degenerate() {
        assert_abs_diff_eq!(signed_area_2d(&[Point2::new(0.0, 0.0)]), 0.0);
        assert_abs_diff_eq!(signed_area_2d(&[]), 0.0);
    }

    #[test]
    fn point_inside_and_outside() {
        let sq = square(0.0, 0.0, 2.0);
        assert!(point_in_polygon_2d(&Point2::new(1.0, 1.0), &sq));
        assert!(!point_in_polygon_2d(&Point2::new(3.0, 1.0), &sq));
        assert!(!point_in_polygon_2d(&Point2::new(1.0, -0.5), &sq));
    }

    #[test]
    fn open_ring_strips_closing_point() {
        let sq = square(0.0, 0.0, 1.0);
        assert_eq!(open_ring(&sq).len(), 4);
        assert_eq!(open_ring(&sq[..4]).len(), 4);
    }
}
