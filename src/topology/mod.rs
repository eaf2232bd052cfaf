mod link;
pub mod segment;
pub mod vertex;

pub use segment::{
    Color, PropertyUpdate, SegmentData, SegmentId, SegmentKey, SegmentKind, SegmentProperties,
    VisionDistance, VisionType,
};
pub use vertex::{ObjectRef, VertexData, VertexId};

use crate::error::{GeometryError, Result, TopologyError};
use crate::math::{points_equal, Point2};
use slotmap::SlotMap;

/// Central arena that owns all vertices and segments.
///
/// Vertices and segments reference each other via typed IDs (generational
/// indices), so the vertex ↔ segment ring needs no shared ownership.
#[derive(Debug, Default)]
pub struct TopologyStore {
    vertices: SlotMap<VertexId, VertexData>,
    segments: SlotMap<SegmentId, SegmentData>,
    next_object: u64,
}

impl TopologyStore {
    /// Creates a new, empty topology store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh reference for an object that will own vertices.
    pub fn register_object(&mut self) -> ObjectRef {
        self.next_object += 1;
        ObjectRef(self.next_object)
    }

    // --- Vertex operations ---

    /// Inserts a vertex and returns its ID.
    pub fn add_vertex(&mut self, data: VertexData) -> VertexId {
        self.vertices.insert(data)
    }

    /// Returns a reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex(&self, id: VertexId) -> Result<&VertexData> {
        self.vertices
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()).into())
    }

    /// Returns a mutable reference to the vertex data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut VertexData> {
        self.vertices
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()).into())
    }

    /// Number of live vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    // --- Segment operations ---

    /// Creates a segment `start → end` without linking it into either vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if either vertex is missing, or
    /// `GeometryError::ZeroLengthSegment` if both sit at the same point.
    pub fn add_segment(
        &mut self,
        start: VertexId,
        end: VertexId,
        kind: SegmentKind,
    ) -> Result<SegmentId> {
        let a = self.vertex(start)?.point;
        let b = self.vertex(end)?.point;
        if points_equal(&a, &b) {
            return Err(GeometryError::ZeroLengthSegment { x: a.x, y: a.y }.into());
        }
        Ok(self.segments.insert(SegmentData::new(start, end, kind)))
    }

    /// Returns a reference to the segment data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn segment(&self, id: SegmentId) -> Result<&SegmentData> {
        self.segments
            .get(id)
            .ok_or_else(|| TopologyError::EntityNotFound("segment".into()).into())
    }

    /// Returns a mutable reference to the segment data, or an error if not found.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the store.
    pub fn segment_mut(&mut self, id: SegmentId) -> Result<&mut SegmentData> {
        self.segments
            .get_mut(id)
            .ok_or_else(|| TopologyError::EntityNotFound("segment".into()).into())
    }

    /// Number of live segments, split parents included.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Endpoint coordinates `(A, B)` of a segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment or its vertices are missing.
    pub fn segment_points(&self, id: SegmentId) -> Result<(Point2, Point2)> {
        let seg = self.segment(id)?;
        Ok((self.vertex(seg.start)?.point, self.vertex(seg.end)?.point))
    }

    /// Coordinate-derived identity of a segment.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment or its vertices are missing.
    pub fn segment_key(&self, id: SegmentId) -> Result<SegmentKey> {
        let seg = self.segment(id)?;
        Ok(SegmentKey {
            start: self.vertex(seg.start)?.key(),
            end: self.vertex(seg.end)?.key(),
        })
    }

    /// Current leaf sub-segments of `id`, ordered from A to B.
    ///
    /// An unsplit segment is its own single leaf.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment or one of its splits is missing.
    pub fn splits(&self, id: SegmentId) -> Result<Vec<SegmentId>> {
        let mut leaves = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            match self.segment(current)?.children {
                // Push right first so the left half is visited first.
                Some([left, right]) => {
                    stack.push(right);
                    stack.push(left);
                }
                None => leaves.push(current),
            }
        }
        Ok(leaves)
    }

    /// Removes a segment together with every split descendant and the
    /// vertices created by those splits.
    ///
    /// The original endpoints are left in place.
    ///
    /// # Errors
    ///
    /// Returns an error if the segment is missing.
    pub fn remove_segment(&mut self, id: SegmentId) -> Result<()> {
        let seg = self
            .segments
            .remove(id)
            .ok_or_else(|| TopologyError::EntityNotFound("segment".into()))?;
        if let Some([left, right]) = seg.children {
            let mid = self.segment(left)?.end;
            self.remove_segment(left)?;
            self.remove_segment(right)?;
            self.vertices.remove(mid);
        }
        Ok(())
    }

    /// Removes a vertex.
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is missing.
    pub fn remove_vertex(&mut self, id: VertexId) -> Result<VertexData> {
        self.vertices
            .remove(id)
            .ok_or_else(|| TopologyError::EntityNotFound("vertex".into()).into())
    }
}
