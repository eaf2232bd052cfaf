use crate::math::{Point2, PointKey};

use super::segment::SegmentId;

slotmap::new_key_type! {
    /// Unique identifier for a vertex in the topology store.
    pub struct VertexId;
}

/// Non-owning reference to the polygon or wall that created a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectRef(pub(crate) u64);

/// Data associated with a topological vertex.
///
/// A finished polygon vertex has exactly one incoming and one outgoing
/// segment, with `incoming.end == self == outgoing.start`. A vertex missing
/// either link is still under construction.
#[derive(Debug, Clone)]
pub struct VertexData {
    /// The position of the vertex.
    pub point: Point2,
    /// The object that created this vertex.
    pub origin: Option<ObjectRef>,
    /// Segment ending at this vertex.
    pub incoming: Option<SegmentId>,
    /// Segment starting at this vertex.
    pub outgoing: Option<SegmentId>,
}

impl VertexData {
    /// Creates a new, unlinked vertex at the given point.
    #[must_use]
    pub fn new(point: Point2) -> Self {
        Self {
            point,
            origin: None,
            incoming: None,
            outgoing: None,
        }
    }

    /// Sets the originating object.
    #[must_use]
    pub fn with_origin(mut self, origin: Option<ObjectRef>) -> Self {
        self.origin = origin;
        self
    }

    /// Coordinate-derived identity of this vertex.
    #[must_use]
    pub fn key(&self) -> PointKey {
        PointKey::new(&self.point)
    }

    /// Returns `true` once both incidence slots are filled.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.incoming.is_some() && self.outgoing.is_some()
    }
}

/// Vertices are equal when they sit at the same coordinates, regardless of
/// which arena slot or polygon they belong to.
impl PartialEq for VertexData {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for VertexData {}
