// Copyright 2026 the Pathfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composing outline shapes and hole shapes into one queryable shape.

use crate::Error;
use crate::clip::{CLIP_SCALE, ClipOp, Clipper, ContourNode, PathRole};
use crate::flatten::Point;
use crate::kurbo::Rect;
use crate::shape::{Polygon, Shape};

/// A shape built from outline shapes minus hole shapes.
///
/// Constituents whose bounding boxes overlap are merged through the polygon
/// clipper once, at construction time; constituents that overlap nothing
/// keep their original (possibly closed-form) variants. Afterwards the
/// composite is immutable and safe for concurrent querying.
///
/// Containment composes even-odd: a point inside a hole that is itself
/// inside an outline is outside the shape, and nested
/// outline-in-hole-in-outline alternates. This assumes holes are nested
/// inside outlines the way pens and fills normally produce them; it is not
/// a general boolean evaluator.
#[derive(Clone, Debug)]
pub struct CompositeShape {
    outlines: Vec<Shape>,
    holes: Vec<Shape>,
    bounds: Rect,
}

impl CompositeShape {
    /// Compose `outlines` minus `holes`.
    ///
    /// Returns [`Error::NoOutlines`] when `outlines` is empty, and
    /// [`Error::OpenClipPath`] when an open path needs clipping.
    pub fn new(outlines: Vec<Shape>, holes: Vec<Shape>) -> Result<Self, Error> {
        if outlines.is_empty() {
            return Err(Error::NoOutlines);
        }
        let (outlines, holes) = compose(outlines, holes)?;

        let mut bounds = Rect::ZERO;
        for (i, outline) in outlines.iter().enumerate() {
            let b = outline.bounds();
            bounds = if i == 0 { b } else { bounds.union(b) };
        }

        Ok(Self {
            outlines,
            holes,
            bounds,
        })
    }

    /// The union of all outline bounds.
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    /// The outline shapes after composition.
    pub fn outlines(&self) -> &[Shape] {
        &self.outlines
    }

    /// The hole shapes after composition.
    pub fn holes(&self) -> &[Shape] {
        &self.holes
    }

    /// An upper bound on how many points one segment can intersect the
    /// composite in: the sum of the constituent bounds.
    pub fn max_intersections(&self) -> usize {
        self.outlines
            .iter()
            .chain(&self.holes)
            .map(Shape::max_intersections)
            .sum()
    }

    /// Signed distance with even-odd composition.
    ///
    /// Every constituent containing the point flips the inside parity, and
    /// the magnitude is the distance to the nearest constituent edge — hole
    /// edges are part of the composite's boundary.
    pub fn distance(&self, point: Point) -> f32 {
        let mut distance = f32::MAX;
        let mut inside = false;
        for shape in self.outlines.iter().chain(&self.holes) {
            let d = shape.distance(point);
            if d <= 0.0 {
                inside = !inside;
            }
            distance = distance.min(d.abs());
        }
        if inside { -distance } else { distance }
    }

    /// Append every intersection of the segment `start..end` with any
    /// constituent boundary into `out`, returning the number written.
    pub fn find_intersections(&self, start: Point, end: Point, out: &mut [Point]) -> usize {
        let mut written = 0;
        for shape in self.outlines.iter().chain(&self.holes) {
            written += shape.find_intersections(start, end, &mut out[written..]);
        }
        written
    }
}

/// Merge overlapping constituents through the clipper; pass everything else
/// through untouched.
fn compose(outlines: Vec<Shape>, holes: Vec<Shape>) -> Result<(Vec<Shape>, Vec<Shape>), Error> {
    let outline_bounds: Vec<Rect> = outlines.iter().map(Shape::bounds).collect();
    let hole_bounds: Vec<Rect> = holes.iter().map(Shape::bounds).collect();

    let mut outline_overlaps = vec![false; outlines.len()];
    let mut hole_overlaps = vec![false; holes.len()];
    for i in 0..outlines.len() {
        for j in i + 1..outlines.len() {
            if bounds_overlap(outline_bounds[i], outline_bounds[j]) {
                outline_overlaps[i] = true;
                outline_overlaps[j] = true;
            }
        }
        for j in 0..holes.len() {
            if bounds_overlap(outline_bounds[i], hole_bounds[j]) {
                outline_overlaps[i] = true;
                hole_overlaps[j] = true;
            }
        }
    }

    // Nothing interacts: keep every shape in its original, possibly
    // closed-form, variant.
    if !outline_overlaps.iter().any(|&overlaps| overlaps) {
        return Ok((outlines, holes));
    }

    let mut clipper = Clipper::new();
    let mut kept_outlines = Vec::new();
    let mut kept_holes = Vec::new();
    for (shape, overlaps) in outlines.into_iter().zip(outline_overlaps) {
        if overlaps {
            add_scaled_contours(&mut clipper, &shape, PathRole::Subject)?;
        } else {
            kept_outlines.push(shape);
        }
    }
    for (shape, overlaps) in holes.into_iter().zip(hole_overlaps) {
        if overlaps {
            add_scaled_contours(&mut clipper, &shape, PathRole::Clip)?;
        } else {
            kept_holes.push(shape);
        }
    }

    for node in clipper.execute(ClipOp::Difference) {
        collect_descaled(node, &mut kept_outlines, &mut kept_holes)?;
    }

    Ok((kept_outlines, kept_holes))
}

fn add_scaled_contours(clipper: &mut Clipper, shape: &Shape, role: PathRole) -> Result<(), Error> {
    let mut contours = Vec::new();
    shape.closed_contours(&mut contours)?;
    for contour in &mut contours {
        for point in contour.iter_mut() {
            *point = *point * CLIP_SCALE;
        }
        clipper.add_path(contour, role, true)?;
    }
    Ok(())
}

/// Turn a clipper output node (and its children) back into shapes at the
/// original scale.
fn collect_descaled(
    node: ContourNode,
    outlines: &mut Vec<Shape>,
    holes: &mut Vec<Shape>,
) -> Result<(), Error> {
    let ContourNode {
        mut contour,
        is_hole,
        children,
    } = node;

    if contour.len() >= 3 {
        for point in contour.iter_mut() {
            *point = *point * (1.0 / CLIP_SCALE);
        }
        let polygon = Shape::Polygon(Polygon::new(contour)?);
        if is_hole {
            holes.push(polygon);
        } else {
            outlines.push(polygon);
        }
    }
    for child in children {
        collect_descaled(child, outlines, holes)?;
    }
    Ok(())
}

fn bounds_overlap(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && a.x1 >= b.x0 && a.y0 <= b.y1 && a.y1 >= b.y0
}

#[cfg(test)]
mod tests {
    use super::CompositeShape;
    use crate::flatten::Point;
    use crate::shape::{Polygon, RectShape, Shape};

    fn square(x: f32, y: f32, size: f32) -> Shape {
        Shape::Polygon(
            Polygon::new(vec![
                Point::new(x, y),
                Point::new(x + size, y),
                Point::new(x + size, y + size),
                Point::new(x, y + size),
            ])
            .unwrap(),
        )
    }

    fn rect(x: f32, y: f32, size: f32) -> Shape {
        Shape::Rect(RectShape::new(
            Point::new(x, y),
            Point::new(x + size, y + size),
        ))
    }

    #[test]
    fn empty_outlines_is_an_error() {
        assert!(CompositeShape::new(Vec::new(), Vec::new()).is_err());
    }

    #[test]
    fn disjoint_shapes_skip_the_clipper() {
        let composite =
            CompositeShape::new(vec![rect(0.0, 0.0, 10.0), rect(20.0, 0.0, 10.0)], Vec::new())
                .unwrap();

        // The closed-form rectangle variants survive untouched.
        assert_eq!(composite.outlines().len(), 2);
        assert!(
            composite
                .outlines()
                .iter()
                .all(|shape| matches!(shape, Shape::Rect(_)))
        );
        assert!(composite.holes().is_empty());

        assert_eq!(composite.bounds().width(), 30.0);
        assert_eq!(composite.distance(Point::new(5.0, 5.0)), -5.0);
        assert_eq!(composite.distance(Point::new(15.0, 5.0)), 5.0);
    }

    #[test]
    fn hole_inside_outline_is_outside_the_shape() {
        let composite = CompositeShape::new(
            vec![square(0.0, 0.0, 10.0)],
            vec![square(3.0, 3.0, 4.0)],
        )
        .unwrap();

        // The hole's center lies inside the outline's bounds but outside
        // the composed shape.
        let center = composite.distance(Point::new(5.0, 5.0));
        assert!(center > 0.0, "hole center should be outside, got {center}");
        assert!((center - 2.0).abs() < 1e-4);

        // Between the hole and the outer edge is inside.
        let ring = composite.distance(Point::new(1.5, 5.0));
        assert!(ring < 0.0, "ring interior should be inside, got {ring}");
        assert!((ring + 1.5).abs() < 1e-4);

        // Outside the outline entirely.
        assert!(composite.distance(Point::new(15.0, 5.0)) > 0.0);
    }

    #[test]
    fn overlapping_constituents_are_clipped_to_polygons() {
        let composite = CompositeShape::new(
            vec![rect(0.0, 0.0, 10.0)],
            vec![rect(3.0, 3.0, 4.0)],
        )
        .unwrap();

        // The overlap forces both rectangles through the clipper.
        assert_eq!(composite.outlines().len(), 1);
        assert_eq!(composite.holes().len(), 1);
        assert!(matches!(composite.outlines()[0], Shape::Polygon(_)));
        assert!(matches!(composite.holes()[0], Shape::Polygon(_)));

        assert!(composite.distance(Point::new(5.0, 5.0)) > 0.0);
        assert!(composite.distance(Point::new(1.5, 5.0)) < 0.0);
    }

    #[test]
    fn non_overlapping_outline_is_not_sent_through_the_clipper() {
        let composite = CompositeShape::new(
            vec![square(0.0, 0.0, 10.0), rect(50.0, 0.0, 10.0)],
            vec![square(3.0, 3.0, 4.0)],
        )
        .unwrap();

        // The far rectangle keeps its fast-path variant; the overlapping
        // pair merges into clipped polygons.
        assert!(
            composite
                .outlines()
                .iter()
                .any(|shape| matches!(shape, Shape::Rect(_)))
        );
        assert!(composite.distance(Point::new(55.0, 5.0)) < 0.0);
        assert!(composite.distance(Point::new(5.0, 5.0)) > 0.0);
    }

    #[test]
    fn nested_outline_in_hole_alternates() {
        // An outline, a hole inside it, and a second outline inside the
        // hole. Everything overlaps, so the whole stack goes through the
        // clipper under the even-odd rule.
        let composite = CompositeShape::new(
            vec![square(0.0, 0.0, 20.0), square(8.0, 8.0, 4.0)],
            vec![square(4.0, 4.0, 12.0)],
        )
        .unwrap();

        // Inside the outer ring only.
        assert!(composite.distance(Point::new(2.0, 10.0)) < 0.0);
        // Inside the hole band.
        assert!(composite.distance(Point::new(6.0, 10.0)) > 0.0);
    }

    #[test]
    fn open_paths_cannot_be_composed_when_overlapping() {
        let open = Shape::Open(
            crate::shape::OpenPath::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)])
                .unwrap(),
        );
        let result = CompositeShape::new(vec![open, square(0.0, 0.0, 10.0)], Vec::new());
        assert!(result.is_err());
    }

    #[test]
    fn max_intersections_sums_constituents() {
        let composite = CompositeShape::new(
            vec![rect(0.0, 0.0, 10.0), rect(20.0, 0.0, 10.0)],
            Vec::new(),
        )
        .unwrap();
        assert_eq!(composite.max_intersections(), 8);
    }

    #[test]
    fn intersections_cover_all_constituents() {
        let composite = CompositeShape::new(
            vec![rect(0.0, 0.0, 10.0), rect(20.0, 0.0, 10.0)],
            Vec::new(),
        )
        .unwrap();
        let mut buffer = vec![Point::ZERO; composite.max_intersections()];

        let count = composite.find_intersections(
            Point::new(-1.0, 5.0),
            Point::new(31.0, 5.0),
            &mut buffer,
        );
        assert_eq!(count, 4);
    }
}
