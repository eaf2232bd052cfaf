use std::collections::HashMap;

use crate::error::Result;
use crate::math::intersect_2d::{bounds_overlap, point_on_segment};
use crate::math::{points_equal, Point2};
use crate::operations::sweep::{find_crossings, leaf_edges};
use crate::polygon::LinkedPolygon;
use crate::topology::{SegmentId, TopologyStore};

/// Splits the segments of both polygons so that no two leaf segments meet
/// except at shared endpoints.
///
/// Proper crossings come from the sweep. Contacts the sweep leaves alone,
/// where an endpoint of one segment lies inside another (T-junctions and
/// collinear overlaps), are found pairwise. Returns the number of splits.
///
/// # Errors
///
/// Returns an error if a polygon's segments cannot be read or split.
pub(crate) fn edgify(
    store: &mut TopologyStore,
    a: &mut LinkedPolygon,
    b: &mut LinkedPolygon,
) -> Result<usize> {
    let mut edges = leaf_edges(store, a)?;
    edges.extend(leaf_edges(store, b)?);

    let segments: Vec<(Point2, Point2)> = edges.iter().map(|&(_, p, q)| (p, q)).collect();
    let mut cuts: HashMap<SegmentId, Vec<Point2>> = HashMap::new();

    for crossing in find_crossings(&segments) {
        cuts.entry(edges[crossing.first].0)
            .or_default()
            .push(crossing.point);
        cuts.entry(edges[crossing.second].0)
            .or_default()
            .push(crossing.point);
    }

    for (i, &(segment, a0, a1)) in edges.iter().enumerate() {
        for (j, &(_, b0, b1)) in edges.iter().enumerate() {
            if i == j || !bounds_overlap(&a0, &a1, &b0, &b1) {
                continue;
            }
            for p in [b0, b1] {
                if points_equal(&p, &a0) || points_equal(&p, &a1) {
                    continue;
                }
                if point_on_segment(&p, &a0, &a1).is_some() {
                    cuts.entry(segment).or_default().push(p);
                }
            }
        }
    }

    let mut splits = 0;
    for (segment, points) in cuts {
        splits += store.split_at_points(segment, &points)?;
    }
    Ok(splits)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

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
    fn crossings_split_both_polygons() {
        let mut store = TopologyStore::new();
        let mut a = LinkedPolygon::new(&mut store, square(0.0, 0.0, 2.0)).unwrap();
        let mut b = LinkedPolygon::new(&mut store, square(1.0, 1.0, 2.0)).unwrap();
        assert_eq!(edgify(&mut store, &mut a, &mut b).unwrap(), 4);
        assert_eq!(a.leaf_segments(&mut store).unwrap().len(), 6);
        assert_eq!(b.leaf_segments(&mut store).unwrap().len(), 6);
    }

    #[test]
    fn collinear_overlap_is_split_at_contacts() {
        // B shares part of A's bottom edge.
        let mut store = TopologyStore::new();
        let mut a = LinkedPolygon::new(&mut store, square(0.0, 0.0, 4.0)).unwrap();
        let mut b = LinkedPolygon::new(&mut store, square(1.0, 0.0, 2.0)).unwrap();
        edgify(&mut store, &mut a, &mut b).unwrap();
        // A's bottom edge gains (1, 0) and (3, 0).
        assert_eq!(a.leaf_segments(&mut store).unwrap().len(), 6);
        assert_eq!(b.leaf_segments(&mut store).unwrap().len(), 4);
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let mut store = TopologyStore::new();
        let mut a = LinkedPolygon::new(&mut store, square(0.0, 0.0, 2.0)).unwrap();
        let mut b = LinkedPolygon::new(&mut store, square(1.0, 1.0, 2.0)).unwrap();
        edgify(&mut store, &mut a, &mut b).unwrap();
        assert_eq!(edgify(&mut store, &mut a, &mut b).unwrap(), 0);
    }
}
