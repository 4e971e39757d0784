// Copyright 2026 the Pathfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pathfield is the geometry kernel underneath an anti-aliased 2D shape
//! renderer.
//!
//! Given arbitrary open or closed polylines (flattened from lines and Bezier
//! curves), it answers the queries a rasterizer issues per pixel or per
//! scanline:
//!
//! - signed distance from a point to a path, with the sign encoding
//!   inside/outside for closed shapes;
//! - point-in-polygon containment;
//! - scanline intersection enumeration;
//! - composition of shapes with holes via polygon boolean clipping;
//! - mapping a position along a path onto a repeating dash/dot pattern for
//!   pen rendering.
//!
//! The rasterizer itself — pixel iteration, anti-aliasing weights, blending —
//! lives outside this crate and consumes the [`shape::Shape`] contract. The
//! polygon clipping algorithm is likewise external and is reached through the
//! integration contract in [`clip`].
//!
//! # Contents
//!
//! - [`flatten`]: curve segments to flat point sequences.
//! - [`path`]: the query core over a single flattened path.
//! - [`shape`]: the shape variants the rasterizer renders.
//! - [`composite`]: outlines-minus-holes composition.
//! - [`clip`]: the external clipper's integration contract.
//! - [`pattern`]: stroke patterns for dashed and dotted pens.
//!
//! # Example
//!
//! ```
//! use pathfield::flatten::Point;
//! use pathfield::shape::{Polygon, Shape};
//!
//! let square = Shape::Polygon(Polygon::new(vec![
//!     Point::new(0.0, 0.0),
//!     Point::new(10.0, 0.0),
//!     Point::new(10.0, 10.0),
//!     Point::new(0.0, 10.0),
//! ])?);
//! // Negative distance means the point is inside the shape.
//! assert_eq!(square.distance(Point::new(5.0, 5.0)), -5.0);
//! assert_eq!(square.distance(Point::new(15.0, 5.0)), 5.0);
//! # Ok::<(), pathfield::Error>(())
//! ```

// These lints shouldn't apply to examples or tests.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
// These lints shouldn't apply to examples.
#![warn(clippy::print_stdout, clippy::print_stderr)]
#![forbid(unsafe_code)]

use thiserror::Error;

pub mod clip;
pub mod composite;
pub mod flatten;
pub mod path;
pub mod pattern;
pub mod shape;

pub use kurbo;

/// Errors that can occur while constructing geometry.
///
/// Every variant is a programmer-contract violation surfaced at construction
/// time; queries on successfully constructed geometry never fail.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A path needs at least two points to describe an edge.
    #[error("a path requires at least 2 points, got {0}")]
    TooFewPoints(usize),
    /// A composite shape needs at least one outline.
    #[error("a composite shape requires at least one outline")]
    NoOutlines,
    /// Stroke pattern run lengths must be positive.
    #[error("stroke pattern run lengths must be positive, got {0}")]
    InvalidPatternRun(f32),
    /// The polygon clipper only accepts closed paths.
    #[error("open paths cannot be clipped")]
    OpenClipPath,
}
