//! Bentley–Ottmann sweep for interior segment crossings.
//!
//! The sweep line moves in increasing `y`. Events are kept in a vector
//! sorted so the next event sits at the end and is popped. The status holds
//! the non-horizontal segments crossing the sweep line, ordered by their `x`
//! at the current sweep `y`. Only neighbors in the status are tested, giving
//! `O((n + k) log n)` behavior on well-spread input.
//!
//! Horizontal segments never enter the status. When the sweep reaches their
//! left endpoint they are tested against every active segment, and they stay
//! open until the sweep leaves their `y`, so segments starting on that line
//! later in the event order are tested against them too.

use std::cmp::Ordering;
use std::collections::HashSet;

use tracing::{debug, trace};

use crate::error::Result;
use crate::math::intersect_2d::segments_cross;
use crate::math::{points_equal, Point2, PointKey};
use crate::polygon::LinkedPolygon;
use crate::topology::{SegmentId, TopologyStore};

/// Sweep configuration.
#[derive(Debug, Clone, Copy)]
pub struct SweepOptions {
    /// Coordinates closer than this are treated as equal when ordering
    /// events and status entries.
    pub tolerance: f64,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self { tolerance: 1e-5 }
    }
}

impl SweepOptions {
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}

/// An interior crossing between two input segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub point: Point2,
    /// Index of the first segment in the input slice.
    pub first: usize,
    /// Index of the second segment in the input slice.
    pub second: usize,
}

#[derive(Debug, Clone, Copy)]
struct SweepSegment {
    top: Point2,
    bottom: Point2,
    horizontal: bool,
}

impl SweepSegment {
    fn new(a: Point2, b: Point2, tolerance: f64) -> Self {
        let horizontal = (a.y - b.y).abs() <= tolerance;
        let a_first = if horizontal { a.x <= b.x } else { a.y < b.y };
        let (top, bottom) = if a_first { (a, b) } else { (b, a) };
        Self {
            top,
            bottom,
            horizontal,
        }
    }

    /// `x` where the segment meets the horizontal line at `y`.
    fn x_at(&self, y: f64) -> f64 {
        let dy = self.bottom.y - self.top.y;
        if self.horizontal || dy.abs() < f64::EPSILON {
            return self.top.x;
        }
        let t = ((y - self.top.y) / dy).clamp(0.0, 1.0);
        self.top.x + t * (self.bottom.x - self.top.x)
    }

    /// Change in `x` per unit of sweep progress, used to order segments that
    /// meet at the sweep line.
    fn dx_dy(&self) -> f64 {
        let dy = self.bottom.y - self.top.y;
        if dy.abs() < f64::EPSILON {
            0.0
        } else {
            (self.bottom.x - self.top.x) / dy
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum EventKind {
    Bottom(usize),
    Crossing(usize, usize),
    Top(usize),
}

impl EventKind {
    /// Processing order among events at the same point.
    fn rank(self) -> u8 {
        match self {
            Self::Bottom(_) => 0,
            Self::Crossing(..) => 1,
            Self::Top(_) => 2,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Event {
    point: Point2,
    kind: EventKind,
}

/// Bentley–Ottmann sweep over a set of plain segments.
#[derive(Debug)]
pub struct SweepLine {
    segments: Vec<Option<SweepSegment>>,
    tolerance: f64,
    /// Pending events, next event last.
    events: Vec<Event>,
    /// Segment indices ordered left to right at the sweep line.
    status: Vec<usize>,
    /// Horizontal segments at or near the current sweep `y`.
    horizontals: Vec<usize>,
    tested: HashSet<(usize, usize)>,
    crossings: Vec<Crossing>,
    last_reorder: Option<Point2>,
    sweep: Point2,
}

impl SweepLine {
    /// Prepares a sweep over `segments` with default options.
    ///
    /// Zero-length segments are ignored.
    #[must_use]
    pub fn new(segments: &[(Point2, Point2)]) -> Self {
        Self::with_options(segments, SweepOptions::default())
    }

    #[must_use]
    pub fn with_options(segments: &[(Point2, Point2)], options: SweepOptions) -> Self {
        let segments: Vec<Option<SweepSegment>> = segments
            .iter()
            .map(|(a, b)| (!points_equal(a, b)).then(|| SweepSegment::new(*a, *b, options.tolerance)))
            .collect();

        let mut events: Vec<Event> = segments
            .iter()
            .enumerate()
            .filter_map(|(index, seg)| {
                seg.map(|seg| Event {
                    point: seg.top,
                    kind: EventKind::Top(index),
                })
            })
            .collect();
        let tolerance = options.tolerance;
        events.sort_by(|a, b| process_order(b, a, tolerance));

        Self {
            segments,
            tolerance,
            events,
            status: Vec::new(),
            horizontals: Vec::new(),
            tested: HashSet::new(),
            crossings: Vec::new(),
            last_reorder: None,
            sweep: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Runs the sweep to completion and returns every crossing found, one per
    /// crossing pair, in sweep order.
    #[must_use]
    pub fn run(mut self) -> Vec<Crossing> {
        while let Some(event) = self.events.pop() {
            self.sweep = event.point;
            trace!(x = event.point.x, y = event.point.y, kind = ?event.kind, "sweep event");
            match event.kind {
                EventKind::Top(index) => self.handle_top(index),
                EventKind::Bottom(index) => self.handle_bottom(index),
                EventKind::Crossing(first, second) => self.handle_crossing(event.point, first, second),
            }
        }
        debug!(
            segments = self.segments.len(),
            crossings = self.crossings.len(),
            "sweep complete"
        );
        self.crossings
    }

    fn segment(&self, index: usize) -> Option<&SweepSegment> {
        self.segments.get(index).and_then(Option::as_ref)
    }

    fn handle_top(&mut self, index: usize) {
        let Some(seg) = self.segment(index).copied() else {
            return;
        };

        let y = self.sweep.y;
        let tol = self.tolerance;
        let segments = &self.segments;
        self.horizontals.retain(|&h| {
            segments
                .get(h)
                .and_then(Option::as_ref)
                .is_some_and(|h| h.top.y >= y - tol)
        });

        if seg.horizontal {
            let active = self.status.clone();
            for other in active {
                self.test_pair(index, other);
            }
            self.horizontals.push(index);
            return;
        }

        let open = self.horizontals.clone();
        for horizontal in open {
            self.test_pair(horizontal, index);
        }

        let x = seg.x_at(y);
        let slope = seg.dx_dy();
        let position = self.status.partition_point(|&other| {
            self.segment(other).is_some_and(|o| {
                let ox = o.x_at(y);
                if (ox - x).abs() > tol {
                    return ox < x;
                }
                let oslope = o.dx_dy();
                if (oslope - slope).abs() > f64::EPSILON {
                    return oslope < slope;
                }
                other < index
            })
        });
        self.status.insert(position, index);

        if position > 0 {
            self.test_pair(self.status[position - 1], index);
        }
        if position + 1 < self.status.len() {
            self.test_pair(index, self.status[position + 1]);
        }

        self.push_event(Event {
            point: seg.bottom,
            kind: EventKind::Bottom(index),
        });
    }

    fn handle_bottom(&mut self, index: usize) {
        let Some(position) = self.position(index) else {
            return;
        };
        self.status.remove(position);
        if position > 0 && position < self.status.len() {
            self.test_pair(self.status[position - 1], self.status[position]);
        }
    }

    fn handle_crossing(&mut self, point: Point2, first: usize, second: usize) {
        self.crossings.push(Crossing {
            point,
            first,
            second,
        });

        // Every pair meeting at one point shares a single reorder.
        if self
            .last_reorder
            .is_some_and(|last| self.near(&last, &point))
        {
            return;
        }

        let (Some(i), Some(j)) = (self.position(first), self.position(second)) else {
            return;
        };
        let (mut lo, mut hi) = (i.min(j), i.max(j));
        while lo > 0 && self.passes_through(self.status[lo - 1], &point) {
            lo -= 1;
        }
        while hi + 1 < self.status.len() && self.passes_through(self.status[hi + 1], &point) {
            hi += 1;
        }
        self.status[lo..=hi].reverse();
        self.last_reorder = Some(point);

        if lo > 0 {
            self.test_pair(self.status[lo - 1], self.status[lo]);
        }
        if hi + 1 < self.status.len() {
            self.test_pair(self.status[hi], self.status[hi + 1]);
        }
    }

    /// Tests two segments and queues their crossing, unless the pair was
    /// already queued or the crossing lies above the sweep line.
    fn test_pair(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        let key = (a.min(b), a.max(b));
        if self.tested.contains(&key) {
            return;
        }
        let (Some(sa), Some(sb)) = (self.segment(a), self.segment(b)) else {
            return;
        };
        let Some(point) = segments_cross(&sa.top, &sa.bottom, &sb.top, &sb.bottom) else {
            return;
        };
        if point.y < self.sweep.y - self.tolerance {
            return;
        }

        self.tested.insert(key);
        self.push_event(Event {
            point,
            kind: EventKind::Crossing(key.0, key.1),
        });
    }

    fn push_event(&mut self, event: Event) {
        let tol = self.tolerance;
        let position = self
            .events
            .partition_point(|queued| process_order(&event, queued, tol) == Ordering::Less);
        self.events.insert(position, event);
    }

    /// Index of a segment in the status.
    fn position(&self, index: usize) -> Option<usize> {
        let seg = self.segment(index)?;
        let y = self.sweep.y;
        let x = seg.x_at(y);
        let tol = self.tolerance;
        let start = self.status.partition_point(|&other| {
            self.segment(other)
                .is_some_and(|o| o.x_at(y) < x - tol)
        });
        self.status[start..]
            .iter()
            .take_while(|&&other| self.segment(other).is_some_and(|o| o.x_at(y) <= x + tol))
            .position(|&other| other == index)
            .map(|offset| start + offset)
            .or_else(|| self.status.iter().position(|&other| other == index))
    }

    fn passes_through(&self, index: usize, point: &Point2) -> bool {
        self.segment(index)
            .is_some_and(|seg| (seg.x_at(point.y) - point.x).abs() <= self.tolerance)
    }

    fn near(&self, a: &Point2, b: &Point2) -> bool {
        (a.x - b.x).abs() <= self.tolerance && (a.y - b.y).abs() <= self.tolerance
    }
}

/// Order in which two events are processed: by `y`, then `x`, then kind.
fn process_order(a: &Event, b: &Event, tolerance: f64) -> Ordering {
    if (a.point.y - b.point.y).abs() > tolerance {
        return a.point.y.total_cmp(&b.point.y);
    }
    if (a.point.x - b.point.x).abs() > tolerance {
        return a.point.x.total_cmp(&b.point.x);
    }
    a.kind.rank().cmp(&b.kind.rank())
}

/// Finds all interior crossings among plain segments.
#[must_use]
pub fn find_crossings(segments: &[(Point2, Point2)]) -> Vec<Crossing> {
    SweepLine::new(segments).run()
}

/// Unique crossing points among plain segments.
#[must_use]
pub fn crossing_points(segments: &[(Point2, Point2)]) -> Vec<Point2> {
    unique_points(find_crossings(segments).into_iter().map(|c| c.point))
}

/// Finds the interior intersection points among the segments of all
/// polygons, including crossings of a polygon with itself.
///
/// Segments already split by earlier operations contribute their pieces.
///
/// # Errors
///
/// Returns an error if a polygon's caches cannot be built.
pub fn find_intersections(
    store: &mut TopologyStore,
    polygons: &mut [LinkedPolygon],
) -> Result<Vec<Point2>> {
    let mut edges = Vec::new();
    for polygon in polygons.iter_mut() {
        edges.extend(leaf_edges(store, polygon)?);
    }
    let segments: Vec<(Point2, Point2)> = edges.iter().map(|&(_, a, b)| (a, b)).collect();
    Ok(crossing_points(&segments))
}

/// Leaf segments of a polygon with their endpoint coordinates.
pub(crate) fn leaf_edges(
    store: &mut TopologyStore,
    polygon: &mut LinkedPolygon,
) -> Result<Vec<(SegmentId, Point2, Point2)>> {
    let leaves = polygon.leaf_segments(store)?;
    let mut edges = Vec::with_capacity(leaves.len());
    for leaf in leaves {
        let (a, b) = store.segment_points(leaf)?;
        edges.push((leaf, a, b));
    }
    Ok(edges)
}

fn unique_points(points: impl IntoIterator<Item = Point2>) -> Vec<Point2> {
    let mut seen = HashSet::new();
    points
        .into_iter()
        .filter(|p| seen.insert(PointKey::new(p)))
        .collect()
}
