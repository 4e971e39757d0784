// Copyright 2026 the Pathfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flattening curve segments into polylines.

use crate::kurbo::{self, Affine, PathEl};
use log::warn;

/// Flattening tolerance: the maximum distance between a curve and its
/// polyline approximation.
pub const TOL: f64 = 0.25;

/// A point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// The x coordinate of the point.
    pub x: f32,
    /// The y coordinate of the point.
    pub y: f32,
}

impl Point {
    /// The point `(0, 0)`.
    pub const ZERO: Self = Self::new(0., 0.);

    /// Create a new point.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The dot product of two vectors.
    pub fn dot(self, rhs: Self) -> f32 {
        self.x * rhs.x + self.y * rhs.y
    }

    /// The squared length of the vector.
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// The length of the vector.
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// The Euclidean distance to another point.
    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    /// The componentwise minimum of two points.
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    /// The componentwise maximum of two points.
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    /// Whether either coordinate is NaN.
    pub fn is_nan(self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }
}

impl core::ops::Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl core::ops::Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl core::ops::Mul<f32> for Point {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self::new(p.x as f32, p.y as f32)
    }
}

impl From<Point> for kurbo::Point {
    fn from(p: Point) -> Self {
        Self::new(p.x as f64, p.y as f64)
    }
}

/// A flattened subpath: an ordered point sequence plus a closed flag.
///
/// A closed polyline does not store the trailing duplicate of its start
/// point; the closing edge is implied by `closed`.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    /// The points of the polyline.
    pub points: Vec<Point>,
    /// Whether the last point connects back to the first.
    pub closed: bool,
}

/// Flatten a bezier path into polylines, one per subpath.
///
/// Curves are approximated to within [`TOL`] after applying `affine`.
/// Subpaths with fewer than two distinct on-curve points
/// are dropped. A path that contains NaN is ill-defined and is dropped
/// entirely.
pub fn flatten(path: impl IntoIterator<Item = PathEl>, affine: Affine, out: &mut Vec<Polyline>) {
    let initial_len = out.len();
    let mut points: Vec<Point> = Vec::new();
    let mut is_nan = false;

    kurbo::flatten(path.into_iter().map(|el| affine * el), TOL, |el| match el {
        PathEl::MoveTo(p) => {
            flush(&mut points, false, out);
            let p = Point::from(p);
            is_nan |= p.is_nan();
            points.push(p);
        }
        PathEl::LineTo(p) => {
            let p = Point::from(p);
            is_nan |= p.is_nan();
            points.push(p);
        }
        PathEl::ClosePath => {
            flush(&mut points, true, out);
        }
        // `kurbo::flatten` only ever emits moves, lines and closes.
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => unreachable!(),
    });
    flush(&mut points, false, out);

    if is_nan {
        warn!("A path contains NaN, ignoring it.");
        out.truncate(initial_len);
    }
}

fn flush(points: &mut Vec<Point>, closed: bool, out: &mut Vec<Polyline>) {
    // The closing edge is implied, so a stored duplicate of the start point
    // would only add a zero-length edge.
    if closed && points.len() > 1 && points.last() == points.first() {
        points.pop();
    }
    if points.len() > 1 {
        out.push(Polyline {
            points: core::mem::take(points),
            closed,
        });
    } else {
        points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, Polyline, flatten};
    use crate::kurbo::{Affine, BezPath};

    fn flattened(path: &BezPath) -> Vec<Polyline> {
        let mut out = Vec::new();
        flatten(path, Affine::IDENTITY, &mut out);
        out
    }

    #[test]
    fn square_path_is_one_closed_polyline() {
        let path = BezPath::from_svg("M0,0 L10,0 L10,10 L0,10 Z").unwrap();
        let polylines = flattened(&path);

        assert_eq!(
            polylines,
            [Polyline {
                points: vec![
                    Point::new(0.0, 0.0),
                    Point::new(10.0, 0.0),
                    Point::new(10.0, 10.0),
                    Point::new(0.0, 10.0),
                ],
                closed: true,
            }]
        );
    }

    #[test]
    fn closing_duplicate_point_is_dropped() {
        let path = BezPath::from_svg("M0,0 L10,0 L10,10 L0,10 L0,0 Z").unwrap();
        let polylines = flattened(&path);

        assert_eq!(polylines.len(), 1);
        assert_eq!(polylines[0].points.len(), 4);
        assert!(polylines[0].closed);
    }

    #[test]
    fn curve_is_subdivided() {
        let path = BezPath::from_svg("M0,0 C0,10 10,10 10,0").unwrap();
        let polylines = flattened(&path);

        assert_eq!(polylines.len(), 1);
        let points = &polylines[0].points;
        assert!(points.len() > 2, "a curve should flatten to many lines");
        assert_eq!(points[0], Point::new(0.0, 0.0));
        assert_eq!(*points.last().unwrap(), Point::new(10.0, 0.0));
        assert!(!polylines[0].closed);
    }

    #[test]
    fn affine_is_applied() {
        let path = BezPath::from_svg("M0,0 L10,0").unwrap();
        let mut out = Vec::new();
        flatten(&path, Affine::translate((5.0, 7.0)), &mut out);

        assert_eq!(
            out[0].points,
            [Point::new(5.0, 7.0), Point::new(15.0, 7.0)]
        );
    }

    #[test]
    fn multiple_subpaths_split() {
        let path = BezPath::from_svg("M0,0 L10,0 M20,0 L30,0 L30,10 Z").unwrap();
        let polylines = flattened(&path);

        assert_eq!(polylines.len(), 2);
        assert!(!polylines[0].closed);
        assert!(polylines[1].closed);
    }

    #[test]
    fn nan_path_is_dropped() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((f64::NAN, 0.0));

        let polylines = flattened(&path);
        assert!(polylines.is_empty());
    }

    #[test]
    fn degenerate_subpath_is_dropped() {
        let path = BezPath::from_svg("M5,5 M0,0 L10,0").unwrap();
        let polylines = flattened(&path);

        assert_eq!(polylines.len(), 1);
        assert_eq!(polylines[0].points.len(), 2);
    }
}
