use tracing::debug;

use crate::math::{Point2, TOLERANCE};
use crate::operations::sweep::crossing_points;

use super::{evaluate_shadow, wall_distance, Sample, ShadowHit, Source, Wall};

/// What a source stands for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceKind {
    /// Illumination: samples above the source are simply unlit.
    #[default]
    Light,
    /// Line of sight: samples above the source cannot be seen at all.
    Vision,
}

/// A source with the walls that can shadow it, prepared once and evaluated
/// for many samples.
#[derive(Debug, Clone)]
pub struct ShadowCaster {
    source: Source,
    kind: SourceKind,
    walls: Vec<(Wall, f64)>,
}

impl ShadowCaster {
    /// Keeps the walls whose top is below the source and precomputes their
    /// distance to it. Zero-length walls, and walls whose line passes through
    /// the source, cast no shadow and are dropped.
    #[must_use]
    pub fn new(source: Source, kind: SourceKind, walls: impl IntoIterator<Item = Wall>) -> Self {
        let walls = walls
            .into_iter()
            .filter(|wall| wall.top_elevation < source.elevation)
            .filter_map(|wall| match wall_distance(&source, &wall) {
                Some(distance) if distance > TOLERANCE => Some((wall, distance)),
                _ => {
                    debug!(a = ?wall.a, b = ?wall.b, "dropping degenerate wall");
                    None
                }
            })
            .collect();
        Self {
            source,
            kind,
            walls,
        }
    }

    #[must_use]
    pub fn source(&self) -> &Source {
        &self.source
    }

    #[must_use]
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Number of walls that can cast shadow.
    #[must_use]
    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    /// Evaluates every wall against `sample` and reports the shallowest
    /// shadow.
    ///
    /// A sample above the source gets depth 0; it counts as shadowed only
    /// for a vision source.
    #[must_use]
    pub fn evaluate(&self, sample: &Sample) -> ShadowHit {
        if sample.elevation > self.source.elevation {
            return ShadowHit {
                in_shadow: self.kind == SourceKind::Vision,
                depth: 0.0,
            };
        }

        let mut result = ShadowHit::LIT;
        for (wall, distance) in &self.walls {
            let hit = evaluate_shadow(&self.source, wall, sample, *distance);
            if hit.in_shadow {
                result.in_shadow = true;
                result.depth = result.depth.min(hit.depth);
            }
        }
        result
    }

    /// Evaluates a batch of samples; the result is in input order.
    #[must_use]
    pub fn evaluate_many(&self, samples: &[Sample]) -> Vec<ShadowHit> {
        samples.iter().map(|sample| self.evaluate(sample)).collect()
    }
}

/// Interior crossings between wall footprints.
///
/// Walls meeting only at their ends are fine; a non-empty result means the
/// arrangement has walls passing through each other.
#[must_use]
pub fn find_wall_crossings(walls: &[Wall]) -> Vec<Point2> {
    let segments: Vec<(Point2, Point2)> = walls.iter().map(Wall::segment).collect();
    crossing_points(&segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn wall(x0: f64, y0: f64, x1: f64, y1: f64, top: f64) -> Wall {
        Wall::new(Point2::new(x0, y0), Point2::new(x1, y1), top)
    }

    fn sample(x: f64, y: f64) -> Sample {
        Sample::new(Point2::new(x, y), 0.0)
    }

    fn light() -> Source {
        Source::new(Point2::new(0.0, 0.0), 10.0)
    }

    #[test]
    fn walls_at_or_above_source_are_skipped() {
        let caster = ShadowCaster::new(
            light(),
            SourceKind::Light,
            [
                wall(10.0, -5.0, 10.0, 5.0, 5.0),
                wall(-10.0, -5.0, -10.0, 5.0, 10.0),
                wall(0.0, 10.0, 5.0, 10.0, 12.0),
            ],
        );
        assert_eq!(caster.wall_count(), 1);
    }

    #[test]
    fn degenerate_walls_are_dropped() {
        let caster = ShadowCaster::new(
            light(),
            SourceKind::Light,
            [
                wall(3.0, 3.0, 3.0, 3.0, 5.0),
                // Line through the source.
                wall(2.0, 0.0, 6.0, 0.0, 5.0),
            ],
        );
        assert_eq!(caster.wall_count(), 0);
    }

    #[test]
    fn shallowest_shadow_wins() {
        // Two parallel walls; the sample sits in both shadows.
        let caster = ShadowCaster::new(
            light(),
            SourceKind::Light,
            [
                wall(10.0, -5.0, 10.0, 5.0, 5.0),
                wall(12.0, -5.0, 12.0, 5.0, 6.0),
            ],
        );
        let hit = caster.evaluate(&sample(14.0, 0.0));
        assert!(hit.in_shadow);
        // Near wall: throw 10, distance 4. Far wall: throw 18, distance 2.
        assert_relative_eq!(hit.depth, 2.0 / 18.0, epsilon = 1e-12);
    }

    #[test]
    fn lit_sample_reports_lit() {
        let caster = ShadowCaster::new(
            light(),
            SourceKind::Light,
            [wall(10.0, -5.0, 10.0, 5.0, 5.0)],
        );
        assert_eq!(caster.evaluate(&sample(-15.0, 0.0)), ShadowHit::LIT);
    }

    #[test]
    fn sample_above_source_depends_on_kind() {
        let walls = [wall(10.0, -5.0, 10.0, 5.0, 5.0)];
        let high = Sample::new(Point2::new(-3.0, 0.0), 11.0);

        let light = ShadowCaster::new(light(), SourceKind::Light, walls);
        let hit = light.evaluate(&high);
        assert!(!hit.in_shadow);
        assert_relative_eq!(hit.depth, 0.0);

        let vision = ShadowCaster::new(
            Source::new(Point2::new(0.0, 0.0), 10.0),
            SourceKind::Vision,
            walls,
        );
        assert!(vision.evaluate(&high).in_shadow);
    }

    #[test]
    fn batch_matches_single_evaluation() {
        let caster = ShadowCaster::new(
            light(),
            SourceKind::Light,
            [wall(10.0, -5.0, 10.0, 5.0, 5.0)],
        );
        let samples: Vec<Sample> = (0..30).map(|i| sample(f64::from(i), 1.0)).collect();
        let batch = caster.evaluate_many(&samples);
        assert_eq!(batch.len(), samples.len());
        for (hit, s) in batch.iter().zip(&samples) {
            assert_eq!(*hit, caster.evaluate(s));
        }
        assert!(batch[15].in_shadow);
        assert!(!batch[5].in_shadow);
    }

    #[test]
    fn crossing_walls_are_reported() {
        let walls = [
            wall(0.0, 0.0, 4.0, 4.0, 5.0),
            wall(0.0, 4.0, 4.0, 0.0, 5.0),
            // Shares an endpoint only.
            wall(4.0, 4.0, 8.0, 4.0, 5.0),
        ];
        let crossings = find_wall_crossings(&walls);
        assert_eq!(crossings.len(), 1);
        assert_relative_eq!(crossings[0].x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(crossings[0].y, 2.0, epsilon = 1e-9);
    }
}
