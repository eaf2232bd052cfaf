mod draw;

pub use draw::{DrawTarget, DrawnSegment};

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::{GeometryError, Result, TopologyError};
use crate::math::polygon_2d::{open_ring, point_in_polygon_2d, signed_area_2d};
use crate::math::{coordinates_in_range, points_equal, Point2, PointKey};
use crate::operations::boolean::{boolean_execute, BooleanOp, BooleanOptions};
use crate::topology::{
    Color, ObjectRef, PropertyUpdate, SegmentId, SegmentKey, SegmentKind, TopologyStore,
    VertexData, VertexId, VisionDistance, VisionType,
};

/// Builds a linked polygon from a closed point ring.
///
/// # Errors
///
/// See [`LinkedPolygon::new`].
pub fn build_polygon(store: &mut TopologyStore, points: Vec<Point2>) -> Result<LinkedPolygon> {
    LinkedPolygon::new(store, points)
}

/// A closed polygon stored as a ring of linked vertices and segments.
///
/// The vertex and segment maps are caches over the topology store. Both
/// iterate in ring order and hold exactly one entry per ring vertex: each
/// vertex contributes its outgoing segment, the closing segment being the
/// outgoing edge of the last vertex.
#[derive(Debug)]
pub struct LinkedPolygon {
    points: Vec<Point2>,
    origin: ObjectRef,
    kind: SegmentKind,
    vertices: Option<IndexMap<PointKey, VertexId>>,
    segments: Option<IndexMap<SegmentKey, SegmentId>>,
}

impl LinkedPolygon {
    /// Builds a polygon of plain segments and links it into `store`.
    ///
    /// `points` must be closed (first point equal to the last) and hold at
    /// least 3 distinct vertices.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::NotClosed`, `GeometryError::TooFewPoints`,
    /// `GeometryError::DuplicateVertex`, or `GeometryError::OutOfRange` (see
    /// [`MAX_COORDINATE`](crate::math::MAX_COORDINATE)) for malformed rings.
    pub fn new(store: &mut TopologyStore, points: Vec<Point2>) -> Result<Self> {
        Self::with_kind(store, points, SegmentKind::Plain)
    }

    /// Builds a polygon whose segments are of the given kind.
    ///
    /// # Errors
    ///
    /// See [`LinkedPolygon::new`].
    pub fn with_kind(
        store: &mut TopologyStore,
        points: Vec<Point2>,
        kind: SegmentKind,
    ) -> Result<Self> {
        validate_ring(&points)?;
        let mut polygon = Self {
            points,
            origin: store.register_object(),
            kind,
            vertices: None,
            segments: None,
        };
        polygon.segments(store)?;
        Ok(polygon)
    }

    /// The closed point ring this polygon was built from.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// The object reference stamped on this polygon's vertices.
    #[must_use]
    pub fn origin(&self) -> ObjectRef {
        self.origin
    }

    /// Map of ring vertices keyed by coordinates, in ring order.
    ///
    /// Rebuilding the vertices drops the segment cache.
    ///
    /// # Errors
    ///
    /// Returns an error if linking the ring fails.
    pub fn vertices(&mut self, store: &mut TopologyStore) -> Result<&IndexMap<PointKey, VertexId>> {
        if self.vertices.is_none() {
            self.segments = None;
            self.vertices = Some(self.construct_vertices(store)?);
        }
        self.vertices
            .as_ref()
            .ok_or_else(|| TopologyError::InvalidTopology("vertex cache missing".into()).into())
    }

    /// Map of ring segments keyed by coordinates, one per vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertices cannot be built or a vertex lacks an
    /// outgoing segment.
    pub fn segments(&mut self, store: &mut TopologyStore) -> Result<&IndexMap<SegmentKey, SegmentId>> {
        if self.segments.is_none() {
            let ring: Vec<VertexId> = self.vertices(store)?.values().copied().collect();
            self.segments = Some(construct_segments(store, &ring)?);
        }
        self.segments
            .as_ref()
            .ok_or_else(|| TopologyError::InvalidTopology("segment cache missing".into()).into())
    }

    /// Ring segments with each replaced by its current split pieces.
    ///
    /// # Errors
    ///
    /// Returns an error if the caches cannot be built.
    pub fn leaf_segments(&mut self, store: &mut TopologyStore) -> Result<Vec<SegmentId>> {
        let roots: Vec<SegmentId> = self.segments(store)?.values().copied().collect();
        let mut leaves = Vec::with_capacity(roots.len());
        for root in roots {
            leaves.extend(store.splits(root)?);
        }
        Ok(leaves)
    }

    /// Removes this polygon's nodes from the store and drops both caches.
    ///
    /// The next cache access relinks a fresh ring.
    ///
    /// # Errors
    ///
    /// Returns an error if a cached node is already missing from the store.
    pub fn invalidate(&mut self, store: &mut TopologyStore) -> Result<()> {
        if let Some(segments) = self.segments.take() {
            for segment in segments.into_values() {
                store.remove_segment(segment)?;
            }
        }
        if let Some(vertices) = self.vertices.take() {
            for vertex in vertices.into_values() {
                store.remove_vertex(vertex)?;
            }
        }
        Ok(())
    }

    /// Sets the color of every segment, split pieces included.
    ///
    /// # Errors
    ///
    /// Returns an error if the caches cannot be built.
    pub fn set_segments_color(&mut self, store: &mut TopologyStore, color: Color) -> Result<()> {
        let roots: Vec<SegmentId> = self.segments(store)?.values().copied().collect();
        for root in roots {
            store.segment_mut(root)?.properties.merge(PropertyUpdate::color(color));
            for leaf in store.splits(root)? {
                store.segment_mut(leaf)?.properties.merge(PropertyUpdate::color(color));
            }
        }
        Ok(())
    }

    /// Draws every split piece of every segment in its own color, or
    /// `default_color` when it has none.
    ///
    /// # Errors
    ///
    /// Returns an error if the caches cannot be built.
    pub fn draw(
        &mut self,
        store: &mut TopologyStore,
        default_color: Color,
        target: &mut impl DrawTarget,
    ) -> Result<()> {
        for leaf in self.leaf_segments(store)? {
            let (a, b) = store.segment_points(leaf)?;
            let color = store.segment(leaf)?.properties.color.unwrap_or(default_color);
            target.draw_segment(a, b, color);
        }
        Ok(())
    }

    /// Draws the raw point ring, ignoring the linked segments.
    pub fn draw_outline(&self, color: Color, target: &mut impl DrawTarget) {
        for pair in self.points.windows(2) {
            target.draw_segment(pair[0], pair[1], color);
        }
    }

    /// Signed area: positive for a counter-clockwise ring.
    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.points)
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    /// Even-odd containment test against the point ring.
    #[must_use]
    pub fn contains_point(&self, point: &Point2) -> bool {
        point_in_polygon_2d(point, &self.points)
    }

    /// Region covered by both polygons.
    ///
    /// Both polygons have their segments split at every mutual intersection
    /// as a side effect.
    ///
    /// # Errors
    ///
    /// Returns an error if the arrangement cannot be built.
    pub fn intersection(
        &mut self,
        other: &mut Self,
        store: &mut TopologyStore,
    ) -> Result<Vec<LinkedPolygon>> {
        self.set_operation(other, store, BooleanOp::Intersection)
    }

    /// Region covered by either polygon.
    ///
    /// # Errors
    ///
    /// Returns an error if the arrangement cannot be built.
    pub fn union(&mut self, other: &mut Self, store: &mut TopologyStore) -> Result<Vec<LinkedPolygon>> {
        self.set_operation(other, store, BooleanOp::Union)
    }

    /// Region covered by exactly one of the polygons.
    ///
    /// # Errors
    ///
    /// Returns an error if the arrangement cannot be built.
    pub fn xor(&mut self, other: &mut Self, store: &mut TopologyStore) -> Result<Vec<LinkedPolygon>> {
        self.set_operation(other, store, BooleanOp::Xor)
    }

    /// Runs a boolean operation with explicit options.
    ///
    /// # Errors
    ///
    /// Returns an error if the arrangement cannot be built, or if the walk
    /// budget runs out while `options.strict` is set.
    pub fn set_operation_with(
        &mut self,
        other: &mut Self,
        store: &mut TopologyStore,
        op: BooleanOp,
        options: &BooleanOptions,
    ) -> Result<Vec<LinkedPolygon>> {
        boolean_execute(store, self, other, op, options)
    }

    fn set_operation(
        &mut self,
        other: &mut Self,
        store: &mut TopologyStore,
        op: BooleanOp,
    ) -> Result<Vec<LinkedPolygon>> {
        self.set_operation_with(other, store, op, &BooleanOptions::default())
    }

    /// Walks the ring, connecting each point to the previous vertex, then
    /// closes the cycle from the last vertex back to the first.
    fn construct_vertices(&self, store: &mut TopologyStore) -> Result<IndexMap<PointKey, VertexId>> {
        let ring = open_ring(&self.points);
        let mut vertices = IndexMap::with_capacity(ring.len());

        let first =
            store.add_vertex(VertexData::new(ring[0]).with_origin(Some(self.origin)));
        vertices.insert(PointKey::new(&ring[0]), first);

        let mut prior = first;
        for point in &ring[1..] {
            let next = store.connect_point(prior, *point, self.kind)?;
            vertices.insert(PointKey::new(point), next);
            prior = next;
        }

        // The closing segment is the last vertex's outgoing edge and fills the
        // first vertex's incoming slot.
        let closing = store.add_segment(prior, first, self.kind)?;
        store.include_segment(prior, closing)?;
        store.include_segment(first, closing)?;

        Ok(vertices)
    }
}

/// Takes each ring vertex's outgoing segment, so the closing segment lands
/// last. Segments start out `Far` and `Ignore`.
fn construct_segments(
    store: &mut TopologyStore,
    ring: &[VertexId],
) -> Result<IndexMap<SegmentKey, SegmentId>> {
    let mut segments = IndexMap::with_capacity(ring.len());
    for &vertex in ring {
        let outgoing = store
            .vertex(vertex)?
            .outgoing
            .ok_or_else(|| TopologyError::InvalidTopology("ring vertex without outgoing segment".into()))?;
        let root = root_segment(store, outgoing, vertex)?;
        store
            .segment_mut(root)?
            .properties
            .merge(PropertyUpdate::vision(VisionDistance::Far, VisionType::Ignore));
        segments.insert(store.segment_key(root)?, root);
    }
    Ok(segments)
}

/// Climbs from a split piece to the original segment that starts at `vertex`.
fn root_segment(store: &TopologyStore, mut segment: SegmentId, vertex: VertexId) -> Result<SegmentId> {
    while let Some(parent) = store.segment(segment)?.parent {
        if store.segment(parent)?.start != vertex {
            break;
        }
        segment = parent;
    }
    Ok(segment)
}

fn validate_ring(points: &[Point2]) -> Result<()> {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return Err(GeometryError::TooFewPoints { count: 0 }.into());
    };
    if points.len() < 2 || !points_equal(first, last) {
        return Err(GeometryError::NotClosed.into());
    }

    if let Some(point) = points.iter().find(|p| !coordinates_in_range(p)) {
        return Err(GeometryError::OutOfRange {
            x: point.x,
            y: point.y,
        }
        .into());
    }

    let ring = open_ring(points);
    if ring.len() < 3 {
        return Err(GeometryError::TooFewPoints { count: ring.len() }.into());
    }

    let mut seen = HashSet::with_capacity(ring.len());
    for point in ring {
        if !seen.insert(PointKey::new(point)) {
            return Err(GeometryError::DuplicateVertex {
                x: point.x,
                y: point.y,
            }
            .into());
        }
    }
    Ok(())
}
