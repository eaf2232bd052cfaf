use tracing::{debug, warn};

use crate::error::{OperationError, Result};
use crate::math::Point2;
use crate::operations::sweep::leaf_edges;
use crate::polygon::LinkedPolygon;
use crate::topology::TopologyStore;

use super::edgify::edgify;
use super::select::{keep_cycle, BooleanOp, Region};
use super::walk::{walk_cycles, Arrangement};

/// Tuning for a boolean operation.
#[derive(Debug, Clone, Copy)]
pub struct BooleanOptions {
    /// Upper bound on the extra walk branches forked where the result
    /// boundary branches. Plain boundary runs cost nothing.
    pub max_walks: usize,
    /// Fail instead of returning partial output when the bound is hit.
    pub strict: bool,
}

impl Default for BooleanOptions {
    fn default() -> Self {
        Self {
            max_walks: 4096,
            strict: false,
        }
    }
}

/// Executes a boolean operation on two polygons.
///
/// Orchestrates the full pipeline: split both polygons at every mutual
/// contact, build the shared arrangement, keep the edges that bound the
/// result region, walk them into cycles, and emit one polygon per cycle.
///
/// Result rings wind counter-clockwise around filled area and clockwise
/// around holes.
///
/// # Errors
///
/// Returns an error if a polygon cannot be split or a result ring cannot be
/// built, or `OperationError::Failed` if the walk budget runs out while
/// `options.strict` is set.
pub fn boolean_execute(
    store: &mut TopologyStore,
    a: &mut LinkedPolygon,
    b: &mut LinkedPolygon,
    op: BooleanOp,
    options: &BooleanOptions,
) -> Result<Vec<LinkedPolygon>> {
    // Step 1: split at every crossing and contact
    let splits = edgify(store, a, b)?;

    // Step 2: shared arrangement over both polygons
    let mut edges = leaf_edges(store, a)?;
    edges.extend(leaf_edges(store, b)?);
    let arrangement = Arrangement::from_edges(edges.iter().map(|&(_, p, q)| (p, q)));

    // Step 3: keep edges with the result on their left only
    let region = Region::new(a.points(), b.points(), op);
    let boundary = arrangement.filtered(|from, to| region.is_boundary_edge(from, to));

    // Step 4: walk the boundary into faces
    let outcome = walk_cycles(&boundary, options.max_walks, |cycle| {
        keep_cycle(&boundary, cycle)
    });
    if outcome.exhausted {
        warn!(
            ?op,
            max_walks = options.max_walks,
            "boolean walk budget exhausted"
        );
        if options.strict {
            return Err(OperationError::Failed(format!(
                "{op:?}: walk budget of {} branches exhausted",
                options.max_walks
            ))
            .into());
        }
    }

    // Step 5: one polygon per cycle
    let mut result = Vec::with_capacity(outcome.cycles.len());
    for cycle in &outcome.cycles {
        let mut points: Vec<Point2> = cycle.iter().map(|&i| *boundary.point(i)).collect();
        points.push(points[0]);
        result.push(LinkedPolygon::new(store, points)?);
    }

    debug!(
        ?op,
        splits,
        edges = arrangement.edge_count(),
        boundary = boundary.edge_count(),
        kept = result.len(),
        "boolean operation"
    );
    Ok(result)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
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

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn run(a: Vec<Point2>, b: Vec<Point2>, op: BooleanOp) -> Vec<LinkedPolygon> {
        init_tracing();
        let mut store = TopologyStore::new();
        let mut a = LinkedPolygon::new(&mut store, a).unwrap();
        let mut b = LinkedPolygon::new(&mut store, b).unwrap();
        boolean_execute(&mut store, &mut a, &mut b, op, &BooleanOptions::default()).unwrap()
    }

    fn total_area(polygons: &[LinkedPolygon]) -> f64 {
        polygons.iter().map(LinkedPolygon::signed_area).sum()
    }

    #[test]
    fn overlapping_squares() {
        let a = square(0.0, 0.0, 2.0);
        let b = square(1.0, 1.0, 2.0);

        let inter = run(a.clone(), b.clone(), BooleanOp::Intersection);
        assert_eq!(inter.len(), 1);
        assert_abs_diff_eq!(total_area(&inter), 1.0, epsilon = 1e-9);

        let union = run(a.clone(), b.clone(), BooleanOp::Union);
        assert_eq!(union.len(), 1);
        assert_abs_diff_eq!(total_area(&union), 7.0, epsilon = 1e-9);

        let xor = run(a, b, BooleanOp::Xor);
        assert_eq!(xor.len(), 2);
        for piece in &xor {
            assert_abs_diff_eq!(piece.signed_area(), 3.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn intersection_plus_xor_is_union() {
        let a = vec![
            Point2::new(0.0, 0.0),
            Point2::new(4.0, 0.0),
            Point2::new(2.0, 3.0),
            Point2::new(0.0, 0.0),
        ];
        let b = square(1.0, -1.0, 2.0);

        let inter = total_area(&run(a.clone(), b.clone(), BooleanOp::Intersection));
        let union = total_area(&run(a.clone(), b.clone(), BooleanOp::Union));
        let xor = total_area(&run(a, b, BooleanOp::Xor));
        assert!(inter > 0.0);
        assert_abs_diff_eq!(inter + xor, union, epsilon = 1e-9);
    }

    #[test]
    fn disjoint_squares() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(5.0, 5.0, 1.0);
        assert!(run(a.clone(), b.clone(), BooleanOp::Intersection).is_empty());
        assert_eq!(run(a.clone(), b.clone(), BooleanOp::Union).len(), 2);
        assert_abs_diff_eq!(total_area(&run(a, b, BooleanOp::Xor)), 2.0, epsilon = 1e-9);
    }

    #[test]
    fn identical_squares() {
        let a = square(0.0, 0.0, 2.0);
        assert!(run(a.clone(), a.clone(), BooleanOp::Xor).is_empty());
        let union = run(a.clone(), a.clone(), BooleanOp::Union);
        assert_eq!(union.len(), 1);
        assert_abs_diff_eq!(union[0].signed_area(), 4.0, epsilon = 1e-9);
        let inter = run(a.clone(), a, BooleanOp::Intersection);
        assert_abs_diff_eq!(total_area(&inter), 4.0, epsilon = 1e-9);
    }

    #[test]
    fn contained_square_xor_has_a_hole() {
        let outer = square(0.0, 0.0, 4.0);
        let inner = square(1.0, 1.0, 2.0);

        let inter = run(outer.clone(), inner.clone(), BooleanOp::Intersection);
        assert_eq!(inter.len(), 1);
        assert_abs_diff_eq!(inter[0].signed_area(), 4.0, epsilon = 1e-9);

        let union = run(outer.clone(), inner.clone(), BooleanOp::Union);
        assert_eq!(union.len(), 1);
        assert_abs_diff_eq!(union[0].signed_area(), 16.0, epsilon = 1e-9);

        let xor = run(outer, inner, BooleanOp::Xor);
        assert_eq!(xor.len(), 2);
        let mut areas: Vec<f64> = xor.iter().map(LinkedPolygon::signed_area).collect();
        areas.sort_by(f64::total_cmp);
        assert_abs_diff_eq!(areas[0], -4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(areas[1], 16.0, epsilon = 1e-9);
    }

    #[test]
    fn shared_edge_union_merges() {
        let a = square(0.0, 0.0, 1.0);
        let b = square(1.0, 0.0, 1.0);
        let union = run(a.clone(), b.clone(), BooleanOp::Union);
        assert_eq!(union.len(), 1);
        assert_abs_diff_eq!(union[0].signed_area(), 2.0, epsilon = 1e-9);
        assert!(run(a, b, BooleanOp::Intersection).is_empty());
    }

    #[test]
    fn repeated_operation_reuses_splits() {
        let mut store = TopologyStore::new();
        let mut a = LinkedPolygon::new(&mut store, square(0.0, 0.0, 2.0)).unwrap();
        let mut b = LinkedPolygon::new(&mut store, square(1.0, 1.0, 2.0)).unwrap();
        let options = BooleanOptions::default();

        let first = boolean_execute(&mut store, &mut a, &mut b, BooleanOp::Union, &options).unwrap();
        let segments = store.segment_count();
        let second = boolean_execute(&mut store, &mut a, &mut b, BooleanOp::Union, &options).unwrap();

        assert_eq!(first.len(), second.len());
        assert_abs_diff_eq!(total_area(&first), total_area(&second), epsilon = 1e-9);
        // Only the new result ring was added; no further splitting happened.
        assert_eq!(store.segment_count(), segments + 8);
    }

    #[test]
    fn strict_budget_fails() {
        // Xor pieces touch at the crossings, so the walk forks there.
        let mut store = TopologyStore::new();
        let mut a = LinkedPolygon::new(&mut store, square(0.0, 0.0, 2.0)).unwrap();
        let mut b = LinkedPolygon::new(&mut store, square(1.0, 1.0, 2.0)).unwrap();
        let options = BooleanOptions {
            max_walks: 1,
            strict: true,
        };
        assert!(boolean_execute(&mut store, &mut a, &mut b, BooleanOp::Xor, &options).is_err());
    }

    #[test]
    fn lenient_budget_returns_partial_output() {
        let mut store = TopologyStore::new();
        let mut a = LinkedPolygon::new(&mut store, square(0.0, 0.0, 2.0)).unwrap();
        let mut b = LinkedPolygon::new(&mut store, square(1.0, 1.0, 2.0)).unwrap();
        let options = BooleanOptions {
            max_walks: 1,
            strict: false,
        };
        let result = boolean_execute(&mut store, &mut a, &mut b, BooleanOp::Xor, &options).unwrap();
        assert!(result.len() < 2);
    }

    #[test]
    fn unbranched_boundary_needs_no_budget() {
        let mut store = TopologyStore::new();
        let mut a = LinkedPolygon::new(&mut store, square(0.0, 0.0, 2.0)).unwrap();
        let mut b = LinkedPolygon::new(&mut store, square(1.0, 1.0, 2.0)).unwrap();
        let options = BooleanOptions {
            max_walks: 0,
            strict: true,
        };
        let union = boolean_execute(&mut store, &mut a, &mut b, BooleanOp::Union, &options).unwrap();
        assert_eq!(union.len(), 1);
        assert_abs_diff_eq!(union[0].signed_area(), 7.0, epsilon = 1e-9);
    }

    #[test]
    fn union_with_many_vertices() {
        init_tracing();
        let mut circle: Vec<Point2> = (0..4500)
            .map(|i| {
                let angle = std::f64::consts::TAU * f64::from(i) / 4500.0;
                Point2::new(angle.cos() * 100.0, angle.sin() * 100.0)
            })
            .collect();
        circle.push(circle[0]);

        let mut store = TopologyStore::new();
        let mut a = LinkedPolygon::new(&mut store, circle).unwrap();
        let mut b = LinkedPolygon::new(&mut store, square(90.0, -5.0, 20.0)).unwrap();
        let circle_area = a.signed_area();
        let options = BooleanOptions {
            strict: true,
            ..BooleanOptions::default()
        };

        let union = boolean_execute(&mut store, &mut a, &mut b, BooleanOp::Union, &options).unwrap();
        assert_eq!(union.len(), 1);
        let area = union[0].signed_area();
        assert!(area > circle_area + 100.0);
        assert!(area < circle_area + 400.0);
    }
}
