//! Regular-grid field sampling for the arrow diagnostic view
//!
//! The field is sampled at `(i/res, j/res)` for `i, j ∈ [0, res)`. The
//! strongest sample sets a scale factor so the longest magnitude arrow has a
//! fixed length; every other arrow is drawn proportionally.

use crate::core_types::{normalize, Vec2};
use crate::physics::FieldEvaluator;

/// Field value at one grid node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSample {
    pub position: Vec2,
    pub field: Vec2,
}

impl GridSample {
    /// Field magnitude at this node.
    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.field.norm()
    }
}

/// Field sampled on a `resolution × resolution` grid over the unit square.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldGrid {
    resolution: usize,
    /// Row-major by `j` (y index), then `i` (x index)
    samples: Vec<GridSample>,
    max_magnitude: f64,
    scale: f64,
}

impl FieldGrid {
    /// Sample the field and derive the arrow scale.
    ///
    /// `max_arrow_length` is the length (unit-square units) that the
    /// strongest sample maps to. A field that vanishes everywhere gets a
    /// scale of zero.
    pub fn sample(
        evaluator: &FieldEvaluator<'_>,
        resolution: usize,
        max_arrow_length: f64,
    ) -> Self {
        let step = 1.0 / resolution as f64;
        let mut samples = Vec::with_capacity(resolution * resolution);
        for j in 0..resolution {
            for i in 0..resolution {
                let position = Vec2::new(i as f64 * step, j as f64 * step);
                samples.push(GridSample {
                    position,
                    field: evaluator.evaluate(position),
                });
            }
        }

        let max_magnitude = samples
            .iter()
            .map(GridSample::magnitude)
            .fold(0.0_f64, f64::max);
        let scale = if max_magnitude > 0.0 {
            max_arrow_length / max_magnitude
        } else {
            0.0
        };

        Self {
            resolution,
            samples,
            max_magnitude,
            scale,
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn samples(&self) -> &[GridSample] {
        &self.samples
    }

    /// Sample at column `i`, row `j`.
    pub fn at(&self, i: usize, j: usize) -> Option<&GridSample> {
        if i >= self.resolution || j >= self.resolution {
            return None;
        }
        self.samples.get(j * self.resolution + i)
    }

    /// Largest field magnitude on the grid.
    pub fn max_magnitude(&self) -> f64 {
        self.max_magnitude
    }

    /// Multiplier mapping a field vector to its arrow.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Magnitude-proportional arrow for `sample`.
    pub fn magnitude_arrow(&self, sample: &GridSample) -> Vec2 {
        sample.field * self.scale
    }

    /// Fixed-length arrow along the field direction, `None` where it vanishes.
    pub fn direction_arrow(sample: &GridSample, length: f64) -> Option<Vec2> {
        normalize(sample.field).map(|d| d * length)
    }
}
