// Copyright 2026 the Pathfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Distance, containment, and intersection queries over a flattened path.

use crate::Error;
use crate::flatten::{Point, Polyline};
use crate::kurbo::Rect;
use std::sync::OnceLock;

/// The result of projecting a query point onto a path.
#[derive(Clone, Copy, Debug)]
pub struct PointInfo {
    /// The queried point.
    pub search_point: Point,
    /// Arc length from the path's start vertex to the closest point.
    pub distance_along_path: f32,
    /// Unsigned Euclidean distance from the query point to the path.
    pub distance_from_path: f32,
    /// The closest point on the path.
    pub closest_point_on_path: Point,
}

/// A flattened path with cached query acceleration state.
///
/// Construction is cheap: only the bounding box is computed eagerly, so
/// geometry used purely for bounds culling never pays for the derived
/// tables. Arc length and the per-edge point-in-polygon constants are
/// computed on first use, exactly once, and may be raced from multiple
/// rasterization workers; after the first computation all reads are
/// lock-free. The geometry itself is immutable.
#[derive(Clone, Debug)]
pub struct PathGeometry {
    points: Vec<Point>,
    offset: Point,
    closed: bool,
    bounds: Rect,
    length: OnceLock<f32>,
    tables: OnceLock<EdgeTables>,
}

/// Per-edge constants for the point-in-polygon crossing test, plus the
/// cumulative arc length table.
///
/// See <http://alienryderflex.com/polygon/> for the precomputation trick.
#[derive(Clone, Debug)]
struct EdgeTables {
    constant: Vec<f32>,
    multiple: Vec<f32>,
    cumulative: Vec<f32>,
}

impl PathGeometry {
    /// Create a path from a point sequence.
    ///
    /// Returns [`Error::TooFewPoints`] for fewer than two points.
    pub fn new(points: Vec<Point>, closed: bool) -> Result<Self, Error> {
        Self::with_offset(points, closed, Point::ZERO)
    }

    /// Create a path whose points are all translated by `offset`.
    pub fn with_offset(points: Vec<Point>, closed: bool, offset: Point) -> Result<Self, Error> {
        if points.len() < 2 {
            return Err(Error::TooFewPoints(points.len()));
        }
        let bounds = bounds_of(&points, offset);
        Ok(Self {
            points,
            offset,
            closed,
            bounds,
            length: OnceLock::new(),
            tables: OnceLock::new(),
        })
    }

    /// Create a closed path from points known to satisfy the length
    /// invariant (e.g. rectangle corners).
    pub(crate) fn closed_from_corners(points: Vec<Point>) -> Self {
        debug_assert!(points.len() >= 2);
        let bounds = bounds_of(&points, Point::ZERO);
        Self {
            points,
            offset: Point::ZERO,
            closed: true,
            bounds,
            length: OnceLock::new(),
            tables: OnceLock::new(),
        }
    }

    /// The bounding box of the path, offset included.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The points of the path, before the offset is applied.
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// The translation applied to every point.
    pub fn offset(&self) -> Point {
        self.offset
    }

    /// Whether the last point connects back to the first.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// The points of the path with the offset applied.
    pub(crate) fn offset_points(&self) -> impl Iterator<Item = Point> + '_ {
        self.points.iter().map(move |&p| p + self.offset)
    }

    /// Total arc length of the path; closed paths include the closing edge.
    pub fn length(&self) -> f32 {
        *self.length.get_or_init(|| {
            let mut length = 0.0;
            for (start, end) in self.edges() {
                length += start.distance(end);
            }
            length
        })
    }

    /// An upper bound on how many points one segment can intersect the path
    /// in, used by callers to size intersection buffers.
    pub fn max_intersections(&self) -> usize {
        self.edge_count()
    }

    /// Determine whether `point` lies inside the path.
    ///
    /// Only closed paths can contain points; open paths always report false.
    pub fn point_in_polygon(&self, point: Point) -> bool {
        if !self.closed {
            return false;
        }
        if !self.bounds.contains(point) {
            return false;
        }

        let point = point - self.offset;
        let tables = self.tables();
        let poly = &self.points;

        let mut inside = false;
        let mut j = poly.len() - 1;
        for i in 0..poly.len() {
            if (poly[i].y < point.y && poly[j].y >= point.y)
                || (poly[j].y < point.y && poly[i].y >= point.y)
            {
                inside ^= point.y * tables.multiple[i] + tables.constant[i] < point.x;
            }
            j = i;
        }

        inside
    }

    /// Project `point` onto the path, returning the closest point, its arc
    /// length position, and the unsigned distance.
    ///
    /// Ties between edges resolve to the earliest edge, so results are
    /// deterministic.
    pub fn distance_from_path(&self, point: Point) -> PointInfo {
        let tables = self.tables();
        let local = point - self.offset;

        let mut best_distance_squared = f32::MAX;
        let mut best_point = self.points[0];
        let mut best_edge = 0;
        for (i, (start, end)) in self.edges().enumerate() {
            let candidate = project_onto_segment(start, end, local);
            let distance_squared = (candidate - local).length_squared();
            if distance_squared < best_distance_squared {
                best_distance_squared = distance_squared;
                best_point = candidate;
                best_edge = i;
            }
        }

        PointInfo {
            search_point: point,
            distance_along_path: tables.cumulative[best_edge]
                + self.points[best_edge].distance(best_point),
            distance_from_path: best_distance_squared.sqrt(),
            closest_point_on_path: best_point + self.offset,
        }
    }

    /// Append every intersection of the segment `start..end` with the
    /// path's edges into `out`, returning the number of points written.
    ///
    /// The caller sizes `out` from [`max_intersections`](Self::max_intersections);
    /// writing stops when the buffer is full. Corners shared by two edges
    /// may be reported once per edge; the scanline consumer relies on that
    /// doubling to keep its crossing parity correct.
    pub fn find_intersections(&self, start: Point, end: Point, out: &mut [Point]) -> usize {
        let start = start - self.offset;
        let end = end - self.offset;

        let mut written = 0;
        for (edge_start, edge_end) in self.edges() {
            if written == out.len() {
                break;
            }
            if let Some(point) = segment_intersection(edge_start, edge_end, start, end) {
                out[written] = point + self.offset;
                written += 1;
            }
        }

        written
    }

    fn edge_count(&self) -> usize {
        if self.closed {
            self.points.len()
        } else {
            self.points.len() - 1
        }
    }

    /// Iterate the edges as (start, end) pairs, in path order. The closing
    /// edge is produced only for closed paths.
    fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.points.len();
        (0..self.edge_count()).map(move |i| {
            let next = if i + 1 == n { 0 } else { i + 1 };
            (self.points[i], self.points[next])
        })
    }

    fn tables(&self) -> &EdgeTables {
        self.tables.get_or_init(|| EdgeTables::build(&self.points))
    }
}

impl TryFrom<Polyline> for PathGeometry {
    type Error = Error;

    fn try_from(polyline: Polyline) -> Result<Self, Error> {
        Self::new(polyline.points, polyline.closed)
    }
}

impl EdgeTables {
    fn build(points: &[Point]) -> Self {
        let n = points.len();
        let mut constant = vec![0.0; n];
        let mut multiple = vec![0.0; n];
        let mut cumulative = vec![0.0; n];

        for k in 1..n {
            cumulative[k] = cumulative[k - 1] + points[k - 1].distance(points[k]);
        }

        let mut j = n - 1;
        for i in 0..n {
            let (pi, pj) = (points[i], points[j]);
            if pj.y == pi.y {
                // Horizontal edge: the crossing test never divides here.
                constant[i] = pi.x;
                multiple[i] = 0.0;
            } else {
                multiple[i] = (pj.x - pi.x) / (pj.y - pi.y);
                constant[i] = pi.x - pi.y * multiple[i];
            }
            j = i;
        }

        Self {
            constant,
            multiple,
            cumulative,
        }
    }
}

fn bounds_of(points: &[Point], offset: Point) -> Rect {
    let mut min = points[0];
    let mut max = points[0];
    for &p in &points[1..] {
        min = min.min(p);
        max = max.max(p);
    }
    Rect::new(
        (min.x + offset.x) as f64,
        (min.y + offset.y) as f64,
        (max.x + offset.x) as f64,
        (max.y + offset.y) as f64,
    )
}

/// Project `point` onto the segment `start..end`, clamped to the segment.
fn project_onto_segment(start: Point, end: Point, point: Point) -> Point {
    let axis = end - start;
    let length_squared = axis.length_squared();
    if length_squared == 0.0 {
        // Degenerate edge: both endpoints coincide.
        return start;
    }
    let u = ((point - start).dot(axis) / length_squared).clamp(0.0, 1.0);
    start + axis * u
}

/// Axis-aligned bounding box overlap test for two segments.
fn boxes_overlap(a_start: Point, a_end: Point, b_start: Point, b_end: Point) -> bool {
    let (a_min, a_max) = (a_start.min(a_end), a_start.max(a_end));
    let (b_min, b_max) = (b_start.min(b_end), b_start.max(b_end));
    a_min.x <= b_max.x && a_max.x >= b_min.x && a_min.y <= b_max.y && a_max.y >= b_min.y
}

/// Intersect two segments using slope/intercept form.
///
/// Returns the crossing point of the segments' carrier lines when it falls
/// inside either segment's bounding box, and `None` for disjoint, parallel,
/// or coincident segments.
fn segment_intersection(a_start: Point, a_end: Point, b_start: Point, b_end: Point) -> Option<Point> {
    if !boxes_overlap(a_start, a_end, b_start, b_end) {
        return None;
    }

    let a_diff = a_end - a_start;
    let b_diff = b_end - b_start;

    let point = if a_diff.x == 0.0 {
        if b_diff.x == 0.0 {
            // Both vertical; overlapping boxes mean collinear, which has no
            // single crossing point to report.
            return None;
        }
        let slope = b_diff.y / b_diff.x;
        let intercept = b_start.y - slope * b_start.x;
        Point::new(a_start.x, slope * a_start.x + intercept)
    } else if b_diff.x == 0.0 {
        let slope = a_diff.y / a_diff.x;
        let intercept = a_start.y - slope * a_start.x;
        Point::new(b_start.x, slope * b_start.x + intercept)
    } else {
        let a_slope = a_diff.y / a_diff.x;
        let b_slope = b_diff.y / b_diff.x;
        if a_slope == b_slope {
            return None;
        }
        let a_intercept = a_start.y - a_slope * a_start.x;
        let b_intercept = b_start.y - b_slope * b_start.x;
        let x = (b_intercept - a_intercept) / (a_slope - b_slope);
        Point::new(x, a_slope * x + a_intercept)
    };

    (boxes_overlap(a_start, a_end, point, point) || boxes_overlap(b_start, b_end, point, point))
        .then_some(point)
}
