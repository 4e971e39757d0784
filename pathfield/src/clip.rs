// Copyright 2026 the Pathfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integration contract for the external polygon clipper.
//!
//! Shape composition needs a general polygon boolean operation: subtracting
//! hole paths from outline paths. The algorithm itself is an external
//! dependency — currently [`geo`]'s `BooleanOps` — and only the protocol in
//! this module is load-bearing: paths go in through [`Clipper::add_path`]
//! tagged with a [`PathRole`], one operation runs through
//! [`Clipper::execute`], and the result comes back as a forest of
//! [`ContourNode`]s tagged hole or outline.
//!
//! Paths of the same role combine under the even-odd fill rule, so
//! overlapping same-role contours carve each other out the way nested glyph
//! contours do.

use crate::Error;
use crate::flatten::Point;
use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon};

/// Coordinate scale applied to geometry before it is handed to the clipper
/// and removed from everything it returns.
///
/// Clipping libraries commonly snap intermediate results to a coarser grid
/// than the source geometry; scaling up keeps sub-unit coordinates
/// meaningful across that boundary.
pub const CLIP_SCALE: f32 = 100.0;

/// Which side of the boolean operation a path belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathRole {
    /// The geometry being clipped (shape outlines).
    Subject,
    /// The geometry clipping it (shape holes).
    Clip,
}

/// The boolean operation to run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum ClipOp {
    /// Subject minus clip; what shape composition uses.
    Difference,
    /// The area common to both sides.
    Intersection,
    /// The area covered by either side.
    Union,
    /// The area covered by exactly one side.
    Xor,
}

/// One node of the clipper's output: a closed contour, its hole flag, and
/// the contours nested directly inside it.
#[derive(Clone, Debug)]
pub struct ContourNode {
    /// The contour's vertices, without a closing duplicate.
    pub contour: Vec<Point>,
    /// Whether the contour bounds a hole rather than filled area.
    pub is_hole: bool,
    /// Contours nested directly inside this one.
    pub children: Vec<ContourNode>,
}

/// Accumulates subject and clip paths, then runs one boolean operation.
#[derive(Debug, Default)]
pub struct Clipper {
    subject: Vec<LineString<f64>>,
    clip: Vec<LineString<f64>>,
}

impl Clipper {
    /// Create an empty clipper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a closed path under the given role.
    ///
    /// Returns `Ok(false)`, without adding anything, when the path
    /// degenerates to fewer than three distinct vertices. Open paths are
    /// rejected with [`Error::OpenClipPath`].
    pub fn add_path(&mut self, points: &[Point], role: PathRole, closed: bool) -> Result<bool, Error> {
        if !closed {
            return Err(Error::OpenClipPath);
        }

        let mut ring: Vec<Coord<f64>> = points
            .iter()
            .map(|p| Coord {
                x: p.x as f64,
                y: p.y as f64,
            })
            .collect();
        ring.dedup();
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() < 3 {
            return Ok(false);
        }
        // The backend wants rings explicitly closed.
        ring.push(ring[0]);

        let ring = LineString::new(ring);
        match role {
            PathRole::Subject => self.subject.push(ring),
            PathRole::Clip => self.clip.push(ring),
        }
        Ok(true)
    }

    /// Run the boolean operation over everything added so far and return
    /// the resulting contour forest.
    pub fn execute(&self, op: ClipOp) -> Vec<ContourNode> {
        let subject = merge_even_odd(&self.subject);
        if self.clip.is_empty() && op == ClipOp::Difference {
            // Subtracting nothing: skip the backend entirely.
            return subject.0.into_iter().map(contour_tree).collect();
        }
        let clip = merge_even_odd(&self.clip);

        let result = match op {
            ClipOp::Difference => subject.difference(&clip),
            ClipOp::Intersection => subject.intersection(&clip),
            ClipOp::Union => subject.union(&clip),
            ClipOp::Xor => subject.xor(&clip),
        };

        result.0.into_iter().map(contour_tree).collect()
    }
}

/// Combine raw rings into one valid multi-polygon under the even-odd fill
/// rule.
///
/// The backend requires valid input (no overlapping constituents), so the
/// rings are folded together with xor, which is exactly even-odd filling.
fn merge_even_odd(rings: &[LineString<f64>]) -> MultiPolygon<f64> {
    let mut polygons = rings
        .iter()
        .map(|ring| Polygon::new(ring.clone(), Vec::new()));
    let Some(first) = polygons.next() else {
        return MultiPolygon::new(Vec::new());
    };

    let mut merged = MultiPolygon::new(vec![first]);
    for polygon in polygons {
        merged = merged.xor(&MultiPolygon::new(vec![polygon]));
    }
    merged
}

fn contour_tree(polygon: Polygon<f64>) -> ContourNode {
    let (exterior, interiors) = polygon.into_inner();
    ContourNode {
        contour: ring_points(&exterior),
        is_hole: false,
        children: interiors
            .iter()
            .map(|ring| ContourNode {
                contour: ring_points(ring),
                is_hole: true,
                children: Vec::new(),
            })
            .collect(),
    }
}

fn ring_points(ring: &LineString<f64>) -> Vec<Point> {
    let mut points: Vec<Point> = ring
        .0
        .iter()
        .map(|c| Point::new(c.x as f32, c.y as f32))
        .collect();
    // The backend closes rings with a duplicate of the first vertex.
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    points
}

#[cfg(test)]
mod tests {
    use super::{ClipOp, Clipper, PathRole, Point};

    fn square(x: f32, y: f32, size: f32) -> Vec<Point> {
        vec![
            Point::new(x, y),
            Point::new(x + size, y),
            Point::new(x + size, y + size),
            Point::new(x, y + size),
        ]
    }

    #[test]
    fn open_paths_are_rejected() {
        let mut clipper = Clipper::new();
        let result = clipper.add_path(&square(0.0, 0.0, 10.0), PathRole::Subject, false);
        assert!(result.is_err());
    }

    #[test]
    fn degenerate_paths_are_skipped() {
        let mut clipper = Clipper::new();
        let added = clipper
            .add_path(
                &[Point::new(0.0, 0.0), Point::new(0.0, 0.0), Point::new(1.0, 1.0)],
                PathRole::Subject,
                true,
            )
            .unwrap();
        assert!(!added);
        assert!(clipper.execute(ClipOp::Difference).is_empty());
    }

    #[test]
    fn difference_with_no_clip_returns_the_subject() {
        let mut clipper = Clipper::new();
        clipper
            .add_path(&square(0.0, 0.0, 10.0), PathRole::Subject, true)
            .unwrap();

        let forest = clipper.execute(ClipOp::Difference);
        assert_eq!(forest.len(), 1);
        assert!(!forest[0].is_hole);
        assert_eq!(forest[0].contour.len(), 4);
        assert!(forest[0].children.is_empty());
    }

    #[test]
    fn contained_clip_becomes_a_hole_child() {
        let mut clipper = Clipper::new();
        clipper
            .add_path(&square(0.0, 0.0, 10.0), PathRole::Subject, true)
            .unwrap();
        clipper
            .add_path(&square(3.0, 3.0, 4.0), PathRole::Clip, true)
            .unwrap();

        let forest = clipper.execute(ClipOp::Difference);
        assert_eq!(forest.len(), 1);

        let outline = &forest[0];
        assert!(!outline.is_hole);
        assert_eq!(outline.children.len(), 1);
        assert!(outline.children[0].is_hole);
        assert_eq!(outline.children[0].contour.len(), 4);
    }

    #[test]
    fn overlapping_clip_notches_the_subject() {
        let mut clipper = Clipper::new();
        clipper
            .add_path(&square(0.0, 0.0, 10.0), PathRole::Subject, true)
            .unwrap();
        // Overlaps the right half.
        clipper
            .add_path(&square(5.0, -1.0, 12.0), PathRole::Clip, true)
            .unwrap();

        let forest = clipper.execute(ClipOp::Difference);
        assert_eq!(forest.len(), 1);
        let outline = &forest[0];
        assert!(outline.children.is_empty());
        // The remaining area is the left half of the subject.
        assert!(outline.contour.iter().all(|p| p.x <= 5.0 + 1e-4));
    }

    #[test]
    fn union_of_disjoint_squares_keeps_both() {
        let mut clipper = Clipper::new();
        clipper
            .add_path(&square(0.0, 0.0, 10.0), PathRole::Subject, true)
            .unwrap();
        clipper
            .add_path(&square(20.0, 0.0, 10.0), PathRole::Clip, true)
            .unwrap();

        let forest = clipper.execute(ClipOp::Union);
        assert_eq!(forest.len(), 2);
    }

    #[test]
    fn same_role_rings_fill_even_odd() {
        let mut clipper = Clipper::new();
        clipper
            .add_path(&square(0.0, 0.0, 10.0), PathRole::Subject, true)
            .unwrap();
        // A second subject ring nested inside the first becomes a hole
        // under even-odd filling, like a glyph counter.
        clipper
            .add_path(&square(3.0, 3.0, 4.0), PathRole::Subject, true)
            .unwrap();

        let forest = clipper.execute(ClipOp::Difference);
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].children.len(), 1);
        assert!(forest[0].children[0].is_hole);
    }
}
