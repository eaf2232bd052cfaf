use crate::error::{OperationError, Result};
use crate::math::{Point2, TOLERANCE};

use super::{Sample, Source, Wall};

/// Linear map from raw elevation values to planar distance units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationTransform {
    /// Raw value that maps to elevation zero.
    pub min: f64,
    /// Elevation units per raw unit.
    pub step: f64,
    /// Planar units per elevation unit.
    pub plane_scale: f64,
    /// Raw value of a fully saturated elevation pixel.
    pub max_pixel_value: f64,
}

impl Default for ElevationTransform {
    fn default() -> Self {
        Self {
            min: 0.0,
            step: 1.0,
            plane_scale: 1.0,
            max_pixel_value: 255.0,
        }
    }
}

impl ElevationTransform {
    /// Transform for a grid where `grid_size` planar units span
    /// `grid_distance` elevation units.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` if `grid_distance` is zero.
    pub fn from_grid(min: f64, step: f64, grid_size: f64, grid_distance: f64) -> Result<Self> {
        if grid_distance.abs() < TOLERANCE {
            return Err(OperationError::InvalidInput("grid distance is zero".into()).into());
        }
        Ok(Self {
            min,
            step,
            plane_scale: grid_size / grid_distance,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_max_pixel_value(mut self, max_pixel_value: f64) -> Self {
        self.max_pixel_value = max_pixel_value;
        self
    }

    /// `(raw - min) * step * plane_scale`.
    #[must_use]
    pub fn to_plane_units(self, raw: f64) -> f64 {
        (raw - self.min) * self.step * self.plane_scale
    }

    /// Converts a normalized pixel channel in `[0, 1]`.
    ///
    /// The channel is first scaled to a raw value and then goes through
    /// [`Self::to_plane_units`], so `min` is subtracted in raw units before
    /// `step` applies: `(pixel * max_pixel_value - min) * step * plane_scale`.
    /// Subtracting `min` after `step` would give a different elevation
    /// whenever `step != 1`.
    #[must_use]
    pub fn pixel_to_plane_units(self, pixel: f64) -> f64 {
        self.to_plane_units(pixel * self.max_pixel_value)
    }
}

/// Coordinates local to a source's circle of influence: the center maps to
/// `(0.5, 0.5)` and the circle to radius 0.5.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    pub center: Point2,
    pub radius: f64,
}

impl LocalFrame {
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` unless `radius` is positive.
    pub fn new(center: Point2, radius: f64) -> Result<Self> {
        if radius <= TOLERANCE {
            return Err(OperationError::InvalidInput(format!(
                "frame radius must be positive, got {radius}"
            ))
            .into());
        }
        Ok(Self { center, radius })
    }

    #[must_use]
    pub fn to_local(self, point: &Point2) -> Point2 {
        let scale = 0.5 / self.radius;
        Point2::new(
            (point.x - self.center.x) * scale + 0.5,
            (point.y - self.center.y) * scale + 0.5,
        )
    }

    #[must_use]
    pub fn to_world(self, point: &Point2) -> Point2 {
        let scale = 2.0 * self.radius;
        Point2::new(
            (point.x - 0.5) * scale + self.center.x,
            (point.y - 0.5) * scale + self.center.y,
        )
    }

    #[must_use]
    pub fn elevation_to_local(self, elevation: f64) -> f64 {
        elevation * 0.5 / self.radius
    }

    #[must_use]
    pub fn elevation_to_world(self, elevation: f64) -> f64 {
        elevation * 2.0 * self.radius
    }

    #[must_use]
    pub fn source(&self, source: &Source) -> Source {
        Source::new(
            self.to_local(&source.position),
            self.elevation_to_local(source.elevation),
        )
    }

    #[must_use]
    pub fn wall(&self, wall: &Wall) -> Wall {
        Wall::new(
            self.to_local(&wall.a),
            self.to_local(&wall.b),
            self.elevation_to_local(wall.top_elevation),
        )
    }

    #[must_use]
    pub fn sample(&self, sample: &Sample) -> Sample {
        Sample::new(
            self.to_local(&sample.position),
            self.elevation_to_local(sample.elevation),
        )
    }
}
