//! Read-only scene context handed to the shadow entry points.

use crate::error::Result;
use crate::math::Point2;
use crate::shadow::{ElevationTransform, Sample, ShadowCaster, Source, SourceKind, Wall};

/// Scene-wide constants: grid scale and the elevation transform.
///
/// Raw elevations go in, planar-unit elevations come out; nothing here
/// mutates after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneContext {
    /// Planar units per grid square.
    pub grid_size: f64,
    /// Elevation units per grid square.
    pub grid_distance: f64,
    pub elevation: ElevationTransform,
}

impl SceneContext {
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if `grid_distance` is zero.
    pub fn new(grid_size: f64, grid_distance: f64, min: f64, step: f64) -> Result<Self> {
        Ok(Self {
            grid_size,
            grid_distance,
            elevation: ElevationTransform::from_grid(min, step, grid_size, grid_distance)?,
        })
    }

    #[must_use]
    pub fn source(&self, position: Point2, raw_elevation: f64) -> Source {
        Source::new(position, self.elevation.to_plane_units(raw_elevation))
    }

    #[must_use]
    pub fn wall(&self, a: Point2, b: Point2, raw_top: f64) -> Wall {
        Wall::new(a, b, self.elevation.to_plane_units(raw_top))
    }

    #[must_use]
    pub fn sample(&self, position: Point2, raw_elevation: f64) -> Sample {
        Sample::new(position, self.elevation.to_plane_units(raw_elevation))
    }

    /// Sample whose elevation comes from a normalized elevation pixel.
    #[must_use]
    pub fn sample_from_pixel(&self, position: Point2, pixel: f64) -> Sample {
        Sample::new(position, self.elevation.pixel_to_plane_units(pixel))
    }

    /// Prepares a caster with every wall top converted to planar units.
    #[must_use]
    pub fn caster(
        &self,
        position: Point2,
        raw_elevation: f64,
        kind: SourceKind,
        walls: impl IntoIterator<Item = (Point2, Point2, f64)>,
    ) -> ShadowCaster {
        ShadowCaster::new(
            self.source(position, raw_elevation),
            kind,
            walls.into_iter().map(|(a, b, top)| self.wall(a, b, top)),
        )
    }
}
