// Copyright 2026 the Pathfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shape variants the rasterizer renders.
//!
//! Every variant satisfies the same four-operation contract: bounds for
//! culling, signed distance for anti-aliased coverage, scanline intersection
//! enumeration, and an upper bound on the intersection count for buffer
//! sizing. Negative distances mean "inside"; open paths have no inside and
//! always report unsigned distances.

use crate::Error;
use crate::composite::CompositeShape;
use crate::flatten::{Point, Polyline};
use crate::kurbo::Rect;
use crate::path::{PathGeometry, PointInfo};

/// A renderable shape.
#[derive(Clone, Debug)]
pub enum Shape {
    /// An open polyline; distances are unsigned.
    Open(OpenPath),
    /// A single closed path.
    Polygon(Polygon),
    /// An axis-aligned rectangle with closed-form queries.
    Rect(RectShape),
    /// Outlines composed with holes.
    Composite(CompositeShape),
}

impl Shape {
    /// The bounding box of the shape.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Open(path) => path.geometry().bounds(),
            Self::Polygon(polygon) => polygon.geometry().bounds(),
            Self::Rect(rect) => rect.bounds(),
            Self::Composite(composite) => composite.bounds(),
        }
    }

    /// An upper bound on how many points one segment can intersect the
    /// shape in.
    pub fn max_intersections(&self) -> usize {
        match self {
            Self::Open(path) => path.geometry().max_intersections(),
            Self::Polygon(polygon) => polygon.geometry().max_intersections(),
            Self::Rect(_) => 4,
            Self::Composite(composite) => composite.max_intersections(),
        }
    }

    /// Signed distance from `point` to the shape's boundary.
    ///
    /// Negative means inside; open paths never report negative distances.
    pub fn distance(&self, point: Point) -> f32 {
        match self {
            Self::Open(path) => path.distance(point),
            Self::Polygon(polygon) => polygon.distance(point),
            Self::Rect(rect) => rect.distance(point),
            Self::Composite(composite) => composite.distance(point),
        }
    }

    /// Append every intersection of the segment `start..end` with the
    /// shape's boundary into `out`, returning the number written.
    pub fn find_intersections(&self, start: Point, end: Point, out: &mut [Point]) -> usize {
        match self {
            Self::Open(path) => path.geometry().find_intersections(start, end, out),
            Self::Polygon(polygon) => polygon.geometry().find_intersections(start, end, out),
            Self::Rect(rect) => rect.find_intersections(start, end, out),
            Self::Composite(composite) => composite.find_intersections(start, end, out),
        }
    }

    /// Collect the closed contours of the shape for clipping, offsets
    /// applied. Open paths have no closed contour and are rejected.
    pub(crate) fn closed_contours(&self, out: &mut Vec<Vec<Point>>) -> Result<(), Error> {
        match self {
            Self::Open(_) => Err(Error::OpenClipPath),
            Self::Polygon(polygon) => {
                out.push(polygon.geometry().offset_points().collect());
                Ok(())
            }
            Self::Rect(rect) => {
                out.push(rect.corners().to_vec());
                Ok(())
            }
            Self::Composite(composite) => {
                for shape in composite.outlines().iter().chain(composite.holes()) {
                    shape.closed_contours(out)?;
                }
                Ok(())
            }
        }
    }
}

/// An open polyline.
#[derive(Clone, Debug)]
pub struct OpenPath {
    geometry: PathGeometry,
}

impl OpenPath {
    /// Create an open path from a point sequence.
    pub fn new(points: Vec<Point>) -> Result<Self, Error> {
        Ok(Self {
            geometry: PathGeometry::new(points, false)?,
        })
    }

    /// Create an open path whose points are all translated by `offset`.
    pub fn with_offset(points: Vec<Point>, offset: Point) -> Result<Self, Error> {
        Ok(Self {
            geometry: PathGeometry::with_offset(points, false, offset)?,
        })
    }

    /// The underlying path geometry.
    pub fn geometry(&self) -> &PathGeometry {
        &self.geometry
    }

    /// Unsigned distance from `point` to the path.
    pub fn distance(&self, point: Point) -> f32 {
        self.geometry.distance_from_path(point).distance_from_path
    }

    /// Project `point` onto the path, for pen rendering.
    pub fn point_info(&self, point: Point) -> PointInfo {
        self.geometry.distance_from_path(point)
    }
}

/// A single closed path.
#[derive(Clone, Debug)]
pub struct Polygon {
    geometry: PathGeometry,
}

impl Polygon {
    /// Create a polygon from its vertices.
    pub fn new(points: Vec<Point>) -> Result<Self, Error> {
        Ok(Self {
            geometry: PathGeometry::new(points, true)?,
        })
    }

    /// Create a polygon whose vertices are all translated by `offset`.
    pub fn with_offset(points: Vec<Point>, offset: Point) -> Result<Self, Error> {
        Ok(Self {
            geometry: PathGeometry::with_offset(points, true, offset)?,
        })
    }

    /// The underlying path geometry.
    pub fn geometry(&self) -> &PathGeometry {
        &self.geometry
    }

    /// Signed distance from `point` to the polygon boundary, negative
    /// inside.
    pub fn distance(&self, point: Point) -> f32 {
        let distance = self.geometry.distance_from_path(point).distance_from_path;
        if self.geometry.point_in_polygon(point) {
            -distance
        } else {
            distance
        }
    }

    /// Project `point` onto the polygon boundary, for pen rendering.
    pub fn point_info(&self, point: Point) -> PointInfo {
        self.geometry.distance_from_path(point)
    }
}

impl TryFrom<Polyline> for Shape {
    type Error = Error;

    /// Wrap a flattened polyline in the matching shape variant.
    fn try_from(polyline: Polyline) -> Result<Self, Error> {
        if polyline.closed {
            Ok(Self::Polygon(Polygon::new(polyline.points)?))
        } else {
            Ok(Self::Open(OpenPath::new(polyline.points)?))
        }
    }
}

/// An axis-aligned rectangle.
///
/// Mathematically equivalent to a [`Polygon`] over its four corners, but
/// every query is computed in closed form in O(1). The rasterizer leans on
/// this for the very common rectangle fill.
#[derive(Clone, Copy, Debug)]
pub struct RectShape {
    min: Point,
    max: Point,
}

impl RectShape {
    /// Create a rectangle spanning the two corner points, in any order.
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Create a rectangle from a [`Rect`].
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(
            Point::new(rect.x0 as f32, rect.y0 as f32),
            Point::new(rect.x1 as f32, rect.y1 as f32),
        )
    }

    /// The bounding box; for a rectangle this is the shape itself.
    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.min.x as f64,
            self.min.y as f64,
            self.max.x as f64,
            self.max.y as f64,
        )
    }

    /// The corner points, in path order.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }

    /// The equivalent generic polygon, for callers that need the full path
    /// query surface.
    pub fn to_polygon(&self) -> Polygon {
        Polygon {
            geometry: PathGeometry::closed_from_corners(self.corners().to_vec()),
        }
    }

    /// Signed distance from `point` to the rectangle boundary, negative
    /// inside.
    pub fn distance(&self, point: Point) -> f32 {
        let clamped = point.max(self.min).min(self.max);
        if clamped == point {
            // Inside or on the boundary: the nearest edge is a plain
            // coordinate delta.
            let left = point.x - self.min.x;
            let right = self.max.x - point.x;
            let top = point.y - self.min.y;
            let bottom = self.max.y - point.y;
            -left.min(right).min(top).min(bottom)
        } else {
            point.distance(clamped)
        }
    }

    /// Append every intersection of the segment `start..end` with the
    /// rectangle boundary into `out`, returning the number written.
    ///
    /// Each of the four boundary lines is solved parametrically; a corner
    /// crossing is reported once per adjacent edge, matching the generic
    /// per-edge loop.
    pub fn find_intersections(&self, start: Point, end: Point, out: &mut [Point]) -> usize {
        let diff = end - start;
        let mut written = 0;

        if diff.x != 0.0 {
            for x in [self.min.x, self.max.x] {
                if written == out.len() {
                    return written;
                }
                let t = (x - start.x) / diff.x;
                if (0.0..=1.0).contains(&t) {
                    let y = start.y + t * diff.y;
                    if y >= self.min.y && y <= self.max.y {
                        out[written] = Point::new(x, y);
                        written += 1;
                    }
                }
            }
        }
        if diff.y != 0.0 {
            for y in [self.min.y, self.max.y] {
                if written == out.len() {
                    return written;
                }
                let t = (y - start.y) / diff.y;
                if (0.0..=1.0).contains(&t) {
                    let x = start.x + t * diff.x;
                    if x >= self.min.x && x <= self.max.x {
                        out[written] = Point::new(x, y);
                        written += 1;
                    }
                }
            }
        }

        written
    }
}
