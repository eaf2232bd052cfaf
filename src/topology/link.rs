//! Linking and splitting operations on the vertex/segment graph.

use crate::error::{GeometryError, Result, ShadowcastError, TopologyError};
use crate::math::intersect_2d::point_on_segment;
use crate::math::{points_equal, Point2};

use super::{SegmentData, SegmentId, SegmentKind, TopologyStore, VertexData, VertexId};

impl TopologyStore {
    /// Attaches `segment` to `vertex` in the role the geometry dictates:
    /// incoming if the vertex is the segment's end, outgoing if its start.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::NotIncident` if the segment does not touch the
    /// vertex, or `TopologyError::SlotOccupied` if the role is already taken.
    pub fn include_segment(&mut self, vertex: VertexId, segment: SegmentId) -> Result<()> {
        let (start, end) = {
            let seg = self.segment(segment)?;
            (seg.start, seg.end)
        };
        let v = self.vertex_mut(vertex)?;
        if end == vertex {
            if v.incoming.is_some() {
                return Err(TopologyError::SlotOccupied { role: "incoming" }.into());
            }
            v.incoming = Some(segment);
        } else if start == vertex {
            if v.outgoing.is_some() {
                return Err(TopologyError::SlotOccupied { role: "outgoing" }.into());
            }
            v.outgoing = Some(segment);
        } else {
            return Err(TopologyError::NotIncident.into());
        }
        Ok(())
    }

    /// Creates a vertex at `point` joined to `from` by a new segment
    /// `from → new`, and returns the new vertex.
    ///
    /// The new vertex inherits the origin of `from`.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::SlotOccupied` if `from` already has an
    /// outgoing segment, or a geometry error if `point` coincides with it.
    pub fn connect_point(
        &mut self,
        from: VertexId,
        point: Point2,
        kind: SegmentKind,
    ) -> Result<VertexId> {
        let origin = {
            let v = self.vertex(from)?;
            if v.outgoing.is_some() {
                return Err(TopologyError::SlotOccupied { role: "outgoing" }.into());
            }
            v.origin
        };

        let new_vertex = self.add_vertex(VertexData::new(point).with_origin(origin));
        let segment = match self.add_segment(from, new_vertex, kind) {
            Ok(segment) => segment,
            Err(err) => {
                self.remove_vertex(new_vertex)?;
                return Err(err);
            }
        };
        self.include_segment(from, segment)?;
        self.include_segment(new_vertex, segment)?;
        Ok(new_vertex)
    }

    /// Splits an unsplit segment at `point`.
    ///
    /// Returns the halves `(A → P, P → B)`. Both inherit the original kind and
    /// properties. Endpoint vertices that referenced the original now
    /// reference the matching half; the original is kept as their parent.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::AlreadySplit` if the segment has children,
    /// `GeometryError::ZeroLengthSegment` if `point` is an endpoint, or
    /// `GeometryError::PointNotOnSegment` if `point` is off the segment.
    pub fn split_segment(
        &mut self,
        segment: SegmentId,
        point: Point2,
    ) -> Result<(SegmentId, SegmentId)> {
        let (start, end, kind, properties) = {
            let seg = self.segment(segment)?;
            if seg.is_split() {
                return Err(TopologyError::AlreadySplit.into());
            }
            (seg.start, seg.end, seg.kind, seg.properties.clone())
        };
        let (a, b) = self.segment_points(segment)?;

        if points_equal(&point, &a) || points_equal(&point, &b) {
            return Err(GeometryError::ZeroLengthSegment {
                x: point.x,
                y: point.y,
            }
            .into());
        }
        if point_on_segment(&point, &a, &b).is_none() {
            return Err(GeometryError::PointNotOnSegment {
                x: point.x,
                y: point.y,
            }
            .into());
        }

        let origin = self.vertex(start)?.origin;
        let mid = self.add_vertex(VertexData::new(point).with_origin(origin));

        let mut left = SegmentData::new(start, mid, kind);
        left.properties = properties.clone();
        left.parent = Some(segment);
        let mut right = SegmentData::new(mid, end, kind);
        right.properties = properties;
        right.parent = Some(segment);

        let left = self.segments.insert(left);
        let right = self.segments.insert(right);

        {
            let a_vertex = self.vertex_mut(start)?;
            if a_vertex.outgoing == Some(segment) {
                a_vertex.outgoing = Some(left);
            }
        }
        {
            let b_vertex = self.vertex_mut(end)?;
            if b_vertex.incoming == Some(segment) {
                b_vertex.incoming = Some(right);
            }
        }
        self.include_segment(mid, left)?;
        self.include_segment(mid, right)?;
        self.segment_mut(segment)?.children = Some([left, right]);

        Ok((left, right))
    }

    /// Splits whichever current leaf of `segment` contains `point`.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::ZeroLengthSegment` if `point` is already a
    /// vertex of the split chain, or `GeometryError::PointNotOnSegment` if
    /// no leaf contains it.
    pub fn split_at(&mut self, segment: SegmentId, point: Point2) -> Result<(SegmentId, SegmentId)> {
        for leaf in self.splits(segment)? {
            let (a, b) = self.segment_points(leaf)?;
            if points_equal(&point, &a) || points_equal(&point, &b) {
                return Err(GeometryError::ZeroLengthSegment {
                    x: point.x,
                    y: point.y,
                }
                .into());
            }
            if point_on_segment(&point, &a, &b).is_some() {
                return self.split_segment(leaf, point);
            }
        }
        Err(GeometryError::PointNotOnSegment {
            x: point.x,
            y: point.y,
        }
        .into())
    }

    /// Splits `segment` at every point in `points` that lies strictly inside
    /// its current split chain. Points landing on existing vertices are
    /// skipped. Returns the number of splits made.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::PointNotOnSegment` if a point is off the
    /// segment.
    pub fn split_at_points(&mut self, segment: SegmentId, points: &[Point2]) -> Result<usize> {
        let (a, b) = self.segment_points(segment)?;
        let mut ordered = Vec::with_capacity(points.len());
        for point in points {
            let t = point_on_segment(point, &a, &b).ok_or(GeometryError::PointNotOnSegment {
                x: point.x,
                y: point.y,
            })?;
            ordered.push((t, *point));
        }
        ordered.sort_by(|x, y| x.0.total_cmp(&y.0));
        ordered.dedup_by(|x, y| points_equal(&x.1, &y.1));

        let mut count = 0;
        for (_, point) in ordered {
            match self.split_at(segment, point) {
                Ok(_) => count += 1,
                Err(ShadowcastError::Geometry(GeometryError::ZeroLengthSegment { .. })) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn line(store: &mut TopologyStore, a: Point2, b: Point2) -> (VertexId, VertexId, SegmentId) {
        let va = store.add_vertex(VertexData::new(a));
        let vb = store.connect_point(va, b, SegmentKind::Plain).unwrap();
        let seg = store.vertex(va).unwrap().outgoing.unwrap();
        (va, vb, seg)
    }

    #[test]
    fn connect_point_links_both_roles() {
        let mut store = TopologyStore::new();
        let (va, vb, seg) = line(&mut store, Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        assert_eq!(store.vertex(va).unwrap().outgoing, Some(seg));
        assert_eq!(store.vertex(vb).unwrap().incoming, Some(seg));
        assert_eq!(store.segment(seg).unwrap().start, va);
        assert_eq!(store.segment(seg).unwrap().end, vb);
    }

    #[test]
    fn connect_point_refuses_second_outgoing() {
        let mut store = TopologyStore::new();
        let (va, _, _) = line(&mut store, Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        let before = store.vertex_count();
        assert!(store
            .connect_point(va, Point2::new(0.0, 1.0), SegmentKind::Plain)
            .is_err());
        assert_eq!(store.vertex_count(), before);
    }

    #[test]
    fn include_segment_rejects_unrelated_vertex() {
        let mut store = TopologyStore::new();
        let (_, _, seg) = line(&mut store, Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
        let other = store.add_vertex(VertexData::new(Point2::new(5.0, 5.0)));
        assert!(store.include_segment(other, seg).is_err());
    }

    #[test]
    fn split_preserves_length_and_endpoints() {
        let mut store = TopologyStore::new();
        let a = Point2::new(1.0, 1.0);
        let b = Point2::new(4.0, 5.0);
        let (va, vb, seg) = line(&mut store, a, b);
        store.segment_mut(seg).unwrap().properties.color = Some(crate::topology::Color::RED);

        let t = 0.3;
        let p = a + (b - a) * t;
        let (left, right) = store.split_segment(seg, p).unwrap();

        let (l0, l1) = store.segment_points(left).unwrap();
        let (r0, r1) = store.segment_points(right).unwrap();
        assert_abs_diff_eq!((l1 - l0).norm() + (r1 - r0).norm(), 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(l1.x, p.x, epsilon = 1e-12);
        assert_abs_diff_eq!(l1.y, p.y, epsilon = 1e-12);

        assert_eq!(store.segment(left).unwrap().start, va);
        assert_eq!(store.segment(right).unwrap().end, vb);
        assert_eq!(store.vertex(va).unwrap().outgoing, Some(left));
        assert_eq!(store.vertex(vb).unwrap().incoming, Some(right));
        let mid = store.segment(left).unwrap().end;
        assert!(store.vertex(mid).unwrap().is_complete());
        assert_eq!(
            store.segment(right).unwrap().properties.color,
            Some(crate::topology::Color::RED)
        );
    }

    #[test]
    fn split_rejects_point_off_segment() {
        let mut store = TopologyStore::new();
        let (_, _, seg) = line(&mut store, Point2::new(0.0, 0.0), Point2::new(2.0, 0.0));
        assert!(store.split_segment(seg, Point2::new(1.0, 0.5)).is_err());
        assert!(store.split_segment(seg, Point2::new(0.0, 0.0)).is_err());
    }

    #[test]
    fn split_twice_requires_leaf() {
        let mut store = TopologyStore::new();
        let (_, _, seg) = line(&mut store, Point2::new(0.0, 0.0), Point2::new(4.0, 0.0));
        store.split_segment(seg, Point2::new(2.0, 0.0)).unwrap();
        assert!(store.split_segment(seg, Point2::new(1.0, 0.0)).is_err());
        store.split_at(seg, Point2::new(1.0, 0.0)).unwrap();
        assert_eq!(store.splits(seg).unwrap().len(), 3);
    }

    #[test]
    fn split_at_points_orders_along_segment() {
        let mut store = TopologyStore::new();
        let (_, _, seg) = line(&mut store, Point2::new(0.0, 0.0), Point2::new(4.0, 0.0));
        let count = store
            .split_at_points(
                seg,
                &[
                    Point2::new(3.0, 0.0),
                    Point2::new(1.0, 0.0),
                    Point2::new(1.0, 0.0),
                    Point2::new(4.0, 0.0),
                ],
            )
            .unwrap();
        assert_eq!(count, 2);

        let xs: Vec<f64> = store
            .splits(seg)
            .unwrap()
            .into_iter()
            .map(|leaf| store.segment_points(leaf).unwrap().0.x)
            .collect();
        assert_eq!(xs, vec![0.0, 1.0, 3.0]);
    }
}
