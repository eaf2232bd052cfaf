//! Shadow volumes cast by elevated walls.
//!
//! Each wall is judged in the vertical cross-section through the source,
//! the wall and the sample: planar distance on one axis, elevation on the
//! other. Elevations must already be in planar units (see
//! [`ElevationTransform`]).

mod caster;
mod transform;

pub use caster::{find_wall_crossings, ShadowCaster, SourceKind};
pub use transform::{ElevationTransform, LocalFrame};

use crate::error::Result;
use crate::math::distance_2d::{perpendicular_point, point_to_line_dist};
use crate::math::intersect_2d::line_segment_intersects;
use crate::math::{Point2, TOLERANCE};
use crate::topology::{SegmentId, TopologyStore};

/// A light or vision origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Source {
    pub position: Point2,
    pub elevation: f64,
}

impl Source {
    #[must_use]
    pub fn new(position: Point2, elevation: f64) -> Self {
        Self {
            position,
            elevation,
        }
    }
}

/// A vertical wall between two points, rising to `top_elevation`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub a: Point2,
    pub b: Point2,
    pub top_elevation: f64,
}

impl Wall {
    #[must_use]
    pub fn new(a: Point2, b: Point2, top_elevation: f64) -> Self {
        Self {
            a,
            b,
            top_elevation,
        }
    }

    /// Lifts an arena segment to a wall of the given height.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EntityNotFound` if the segment or one of its
    /// vertices is missing.
    pub fn from_segment(
        store: &TopologyStore,
        segment: SegmentId,
        top_elevation: f64,
    ) -> Result<Self> {
        let (a, b) = store.segment_points(segment)?;
        Ok(Self::new(a, b, top_elevation))
    }

    /// The wall's planar footprint.
    #[must_use]
    pub fn segment(&self) -> (Point2, Point2) {
        (self.a, self.b)
    }
}

/// A point on the ground plane at which shadow is evaluated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub position: Point2,
    pub elevation: f64,
}

impl Sample {
    #[must_use]
    pub fn new(position: Point2, elevation: f64) -> Self {
        Self {
            position,
            elevation,
        }
    }
}

/// Shadow decision for one sample.
///
/// `depth` is the normalized position inside the shadow: 0 at the wall,
/// approaching 1 at the shadow's far edge. Lit samples report 1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowHit {
    pub in_shadow: bool,
    pub depth: f64,
}

impl ShadowHit {
    pub const LIT: Self = Self {
        in_shadow: false,
        depth: 1.0,
    };

    #[must_use]
    pub fn shadowed(depth: f64) -> Self {
        Self {
            in_shadow: true,
            depth,
        }
    }
}

/// Planar distance from the source to the wall's line, or `None` for a
/// zero-length wall.
#[must_use]
pub fn wall_distance(source: &Source, wall: &Wall) -> Option<f64> {
    point_to_line_dist(&wall.a, &wall.b, &source.position)
}

/// Decides whether `sample` lies in the shadow `wall` casts from `source`.
///
/// `wall_distance` is the planar distance from the source to the wall's
/// line (see [`wall_distance`]). The checks run in a fixed order and the
/// first that fails returns [`ShadowHit::LIT`]:
///
/// 1. the source must be above the wall top,
/// 2. the sample must be below the wall top,
/// 3. the sight line from sample to source must cross the wall,
/// 4. the wall's line must be well defined, and the source must not
///    stand on it.
///
/// The sample is then in shadow when its distance to the wall line is less
/// than the wall's shadow throw at the sample's elevation.
#[must_use]
pub fn evaluate_shadow(
    source: &Source,
    wall: &Wall,
    sample: &Sample,
    wall_distance: f64,
) -> ShadowHit {
    if source.elevation <= wall.top_elevation {
        return ShadowHit::LIT;
    }
    if sample.elevation >= wall.top_elevation {
        return ShadowHit::LIT;
    }
    if !line_segment_intersects(&sample.position, &source.position, &wall.a, &wall.b) {
        return ShadowHit::LIT;
    }
    let Some(foot) = perpendicular_point(&wall.a, &wall.b, &sample.position) else {
        return ShadowHit::LIT;
    };
    if wall_distance <= TOLERANCE {
        return ShadowHit::LIT;
    }
    let dist_wp = (sample.position - foot).norm();

    let adj_wall = wall.top_elevation - sample.elevation;
    let adj_source = source.elevation - sample.elevation;
    let theta = ((adj_source - adj_wall) / wall_distance).atan();
    let dist_ov = adj_source / theta.tan();
    let max_dist_wp = dist_ov - wall_distance;

    if dist_wp < max_dist_wp {
        ShadowHit::shadowed(dist_wp / max_dist_wp)
    } else {
        ShadowHit::LIT
    }
}
