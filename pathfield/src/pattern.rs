// Copyright 2026 the Pathfield Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mapping path positions onto repeating stroke patterns.
//!
//! A pen stroke covers the band within half the pen width of the path. A
//! patterned pen additionally switches between drawn runs and gaps along the
//! path's arc length; the rasterizer feeds each [`PointInfo`] through
//! [`Pattern::distance_from_element`] and turns the resulting distance into
//! anti-aliased coverage.

use crate::Error;
use crate::path::PointInfo;
use smallvec::SmallVec;

/// A repeating on/off stroke pattern, scaled by pen width.
///
/// Thresholds are cumulative: `thresholds[k]..thresholds[k + 1]` is the
/// `k`-th run of one period, even runs drawn, odd runs gaps. A solid pen
/// stores no thresholds and skips the period arithmetic entirely.
#[derive(Clone, Debug)]
pub struct Pattern {
    thresholds: SmallVec<[f32; 8]>,
    total_length: f32,
    width: f32,
}

impl Pattern {
    /// A solid pen of the given width.
    pub fn solid(width: f32) -> Self {
        Self {
            thresholds: SmallVec::new(),
            total_length: 0.0,
            width,
        }
    }

    /// A pen repeating the given run lengths, alternating drawn and gap,
    /// each scaled by the pen width.
    ///
    /// Fewer than two runs cannot alternate and degenerate to a solid pen.
    /// Non-positive run lengths return [`Error::InvalidPatternRun`].
    pub fn new(width: f32, runs: &[f32]) -> Result<Self, Error> {
        for &run in runs {
            if run <= 0.0 {
                return Err(Error::InvalidPatternRun(run));
            }
        }
        Ok(Self::from_runs(width, runs))
    }

    /// Dashes: three units drawn, one unit gap.
    pub fn dashed(width: f32) -> Self {
        Self::from_runs(width, &[3.0, 1.0])
    }

    /// Dots: one unit drawn, three units gap.
    pub fn dotted(width: f32) -> Self {
        Self::from_runs(width, &[1.0, 3.0])
    }

    /// Dash-dot: a dash, a gap, a dot, a gap.
    pub fn dash_dot(width: f32) -> Self {
        Self::from_runs(width, &[3.0, 1.0, 1.0, 1.0])
    }

    /// Dash-dot-dot.
    pub fn dash_dot_dot(width: f32) -> Self {
        Self::from_runs(width, &[3.0, 1.0, 1.0, 1.0, 1.0, 1.0])
    }

    fn from_runs(width: f32, runs: &[f32]) -> Self {
        if runs.len() < 2 {
            return Self::solid(width);
        }
        let mut thresholds = SmallVec::with_capacity(runs.len() + 1);
        thresholds.push(0.0);
        let mut total = 0.0;
        for &run in runs {
            total += run * width;
            thresholds.push(total);
        }
        Self {
            thresholds,
            total_length: total,
            width,
        }
    }

    /// The pen width.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// The arc length of one full pattern period; zero for solid pens.
    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Whether this pen draws its whole length.
    pub fn is_solid(&self) -> bool {
        self.thresholds.len() < 2
    }

    /// Distance from the queried point to the nearest drawn element of the
    /// stroke.
    ///
    /// Zero means the point lies on a drawn run within the stroke's
    /// half-width band; points in gaps or beyond the band report how far
    /// away the nearest drawn geometry is, which the rasterizer maps to
    /// anti-aliased coverage falloff.
    pub fn distance_from_element(&self, info: &PointInfo) -> f32 {
        let across = (info.distance_from_path - self.width / 2.0).max(0.0);
        if self.is_solid() {
            return across;
        }

        let position = info.distance_along_path.rem_euclid(self.total_length);

        // Patterns are a handful of runs; a linear scan beats a search.
        let mut run = self.thresholds.len() - 2;
        for k in 0..self.thresholds.len() - 1 {
            if position < self.thresholds[k + 1] {
                run = k;
                break;
            }
        }

        if run % 2 == 0 {
            // A drawn run: only the across-band distance matters.
            across
        } else {
            // A gap: distance to the nearest run boundary along the path,
            // combined with the across-band distance.
            let along =
                (position - self.thresholds[run]).min(self.thresholds[run + 1] - position);
            if across > 0.0 {
                (along * along + across * across).sqrt()
            } else {
                along
            }
        }
    }
}
