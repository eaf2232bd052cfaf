use std::collections::BTreeMap;

use crate::math::PointKey;

use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for a segment in the topology store.
    pub struct SegmentId;
}

/// Coordinate-derived identity of a directed segment: `(start, end)` keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentKey {
    pub start: PointKey,
    pub end: PointKey,
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub const BLACK: Self = Self(0x00_00_00);
    pub const WHITE: Self = Self(0xFF_FF_FF);
    pub const RED: Self = Self(0xFF_00_00);
    pub const GREEN: Self = Self(0x00_FF_00);
    pub const BLUE: Self = Self(0x00_00_FF);
    pub const ORANGE: Self = Self(0xFF_A5_00);
}

/// Whether a segment is near or far from the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisionDistance {
    Near,
    #[default]
    Far,
}

/// How a segment interacts with visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisionType {
    Block,
    Shadow,
    #[default]
    Ignore,
}

/// Flavor of segment created when connecting vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SegmentKind {
    #[default]
    Plain,
    /// Edge of a shadow outline.
    Shadow,
}

/// Key/value properties carried by a segment and inherited by its splits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentProperties {
    pub color: Option<Color>,
    pub vision_distance: VisionDistance,
    pub vision_type: VisionType,
    pub extra: BTreeMap<String, String>,
}

/// Partial update applied with [`SegmentProperties::merge`].
///
/// `None` fields leave the current value untouched.
#[derive(Debug, Clone, Default)]
pub struct PropertyUpdate {
    pub color: Option<Color>,
    pub vision_distance: Option<VisionDistance>,
    pub vision_type: Option<VisionType>,
    pub extra: BTreeMap<String, String>,
}

impl PropertyUpdate {
    #[must_use]
    pub fn color(color: Color) -> Self {
        Self {
            color: Some(color),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn vision(distance: VisionDistance, kind: VisionType) -> Self {
        Self {
            vision_distance: Some(distance),
            vision_type: Some(kind),
            ..Self::default()
        }
    }
}

impl SegmentProperties {
    /// Overwrites the fields present in `update`.
    pub fn merge(&mut self, update: PropertyUpdate) {
        if let Some(color) = update.color {
            self.color = Some(color);
        }
        if let Some(distance) = update.vision_distance {
            self.vision_distance = distance;
        }
        if let Some(kind) = update.vision_type {
            self.vision_type = kind;
        }
        self.extra.extend(update.extra);
    }
}

/// Data associated with a directed segment `start → end`.
///
/// Once split, a segment stays in the store as the parent of its two
/// halves so callers holding its ID can still reach the refined pieces.
#[derive(Debug, Clone)]
pub struct SegmentData {
    /// Start vertex (A).
    pub start: VertexId,
    /// End vertex (B).
    pub end: VertexId,
    pub kind: SegmentKind,
    pub properties: SegmentProperties,
    /// The segment this one was split from.
    pub parent: Option<SegmentId>,
    /// The two halves, `start → mid` and `mid → end`, once split.
    pub children: Option<[SegmentId; 2]>,
}

impl SegmentData {
    /// Creates a new segment between two vertices.
    #[must_use]
    pub fn new(start: VertexId, end: VertexId, kind: SegmentKind) -> Self {
        Self {
            start,
            end,
            kind,
            properties: SegmentProperties::default(),
            parent: None,
            children: None,
        }
    }

    #[must_use]
    pub fn is_split(&self) -> bool {
        self.children.is_some()
    }
}
