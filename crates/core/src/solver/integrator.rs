//! Fixed-step integration along the normalized field direction
//!
//! Both schemes advance a point by (approximately) `delta` along the unit
//! field direction, so a trace moves at constant speed regardless of the
//! local field strength. `delta` is a unit-square length, not a physical
//! step; line density therefore depends on the window setup.

use crate::core_types::{normalize, Polarity, Vec2};
use crate::physics::FieldEvaluator;
use serde::{Deserialize, Serialize};

/// Integration scheme for field-line tracing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationMethod {
    /// First-order: one direction estimate per step
    #[default]
    Euler,
    /// Classic fourth-order Runge-Kutta on the unit direction field
    RungeKutta,
}

impl IntegrationMethod {
    /// Advance `point` by one step of length `delta`.
    ///
    /// `polarity` flips the direction for lines traced away from negative
    /// sources. Returns `None` when the field vanishes at any stage point.
    pub fn step(
        self,
        point: Vec2,
        polarity: Polarity,
        evaluator: &FieldEvaluator<'_>,
        delta: f64,
    ) -> Option<Vec2> {
        let direction = |p: Vec2| normalize(evaluator.evaluate(p)).map(|d| d * polarity.sign());

        match self {
            Self::Euler => Some(point + direction(point)? * delta),
            Self::RungeKutta => {
                let k1 = direction(point)?;
                let k2 = direction(point + k1 * (0.5 * delta))?;
                let k3 = direction(point + k2 * (0.5 * delta))?;
                let k4 = direction(point + k3 * delta)?;
                let heading = (k1 + k2 * 2.0 + k3 * 2.0 + k4) / 6.0;
                Some(point + heading * delta)
            }
        }
    }
}
