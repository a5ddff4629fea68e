//! Electrostatic field superposition
//!
//! Sums closed-form contributions from every configured source at a query
//! point. Units are normalized (Coulomb constant = 1), so a unit charge
//! produces `1/d²` at distance `d`.
//!
//! # Point charge
//!
//! ```text
//! E(p) = q · (p − c) / |p − c|³
//! ```
//!
//! # Finite charged rod
//!
//! In the rod's local frame (`a` along the rod from `start`, `b` along its
//! left-hand normal, length `L`, density `λ`):
//!
//! ```text
//! r1 = √(a² + b²)            r2 = √((L − a)² + b²)
//! E_a = λ (1/r2 − 1/r1)
//! E_b = λ (a/r1 + (L − a)/r2) / b
//! V   = λ ln((L − a + r2) / (r1 − a))
//! ```
//!
//! These are the exact integrals of the point-charge field along the rod,
//! so `E = −∇V`. The sign of `E_a` and the `1/b` scaling of `E_b` are fixed
//! by that; see "Rod field formula" in `DESIGN.md` for the variant with a
//! flipped `E_a` and a `1/b²` factor that this replaces.
//!
//! `E_b` is singular on the rod's infinite line (`b = 0`); contributions
//! that cannot be evaluated are reported as `None` and count as zero.

use crate::core_types::{perpendicular, ChargedSegment, PointCharge, Vec2};

/// Sources closer than this to the query point are skipped.
pub const SINGULARITY_EPSILON: f64 = 1e-4;

/// Field of a single point charge at `p`, `None` within [`SINGULARITY_EPSILON`].
#[inline]
pub fn evaluate_point_charge_field(charge: &PointCharge, p: Vec2) -> Option<Vec2> {
    let offset = p - charge.position;
    let dist = offset.norm();
    if dist < SINGULARITY_EPSILON {
        return None;
    }
    Some(offset * (charge.magnitude / (dist * dist * dist)))
}

/// Field of a single charged rod at `p`.
///
/// Returns `None` (treat as zero) when `p` coincides with `start`, lies
/// exactly on the rod's infinite line, the rod is degenerate, or the result
/// is not finite.
pub fn evaluate_segment_field(segment: &ChargedSegment, p: Vec2) -> Option<Vec2> {
    if (p - segment.start).norm() < SINGULARITY_EPSILON {
        return None;
    }
    let dir = segment.direction()?;
    let (a, b) = segment.local_coordinates(p)?;
    if b == 0.0 {
        return None;
    }

    let len = segment.length();
    let r1 = a.hypot(b);
    let r2 = (len - a).hypot(b);

    let along = segment.magnitude * (1.0 / r2 - 1.0 / r1);
    let across = segment.magnitude * (a / r1 + (len - a) / r2) / b;

    let field = dir * along + perpendicular(dir) * across;
    (field.x.is_finite() && field.y.is_finite()).then_some(field)
}

/// Potential of a single point charge at `p`, `None` within [`SINGULARITY_EPSILON`].
#[inline]
pub fn point_charge_potential(charge: &PointCharge, p: Vec2) -> Option<f64> {
    let dist = (p - charge.position).norm();
    (dist >= SINGULARITY_EPSILON).then_some(charge.magnitude / dist)
}

/// Potential of a single charged rod at `p`, `None` on the rod or its
/// forward extension where the logarithm is undefined.
pub fn segment_potential(segment: &ChargedSegment, p: Vec2) -> Option<f64> {
    let (a, b) = segment.local_coordinates(p)?;
    let len = segment.length();
    let numerator = len - a + (len - a).hypot(b);
    let denominator = a.hypot(b) - a;
    if numerator <= 0.0 || denominator <= 0.0 {
        return None;
    }
    let v = segment.magnitude * (numerator / denominator).ln();
    v.is_finite().then_some(v)
}

/// Superposition of all configured sources.
///
/// Borrows the source layout read-only; cheap to copy and pass by value.
#[derive(Debug, Clone, Copy)]
pub struct FieldEvaluator<'a> {
    charges: &'a [PointCharge],
    segments: &'a [ChargedSegment],
}

impl<'a> FieldEvaluator<'a> {
    /// Create an evaluator over a source layout.
    pub fn new(charges: &'a [PointCharge], segments: &'a [ChargedSegment]) -> Self {
        Self { charges, segments }
    }

    /// Point charges in this layout.
    pub fn charges(&self) -> &'a [PointCharge] {
        self.charges
    }

    /// Charged rods in this layout.
    pub fn segments(&self) -> &'a [ChargedSegment] {
        self.segments
    }

    /// Total field at `p`.
    ///
    /// Contributions that hit a singularity or degenerate geometry are
    /// skipped, so the result is always finite.
    pub fn evaluate(&self, p: Vec2) -> Vec2 {
        let charges = self
            .charges
            .iter()
            .filter_map(|c| evaluate_point_charge_field(c, p));
        let segments = self
            .segments
            .iter()
            .filter_map(|s| evaluate_segment_field(s, p));
        charges.chain(segments).fold(Vec2::zeros(), |acc, e| acc + e)
    }

    /// Field magnitude at `p`.
    #[inline]
    pub fn magnitude(&self, p: Vec2) -> f64 {
        self.evaluate(p).norm()
    }

    /// Total electric potential at `p`, skipping singular contributions.
    pub fn potential(&self, p: Vec2) -> f64 {
        let charges = self
            .charges
            .iter()
            .filter_map(|c| point_charge_potential(c, p));
        let segments = self.segments.iter().filter_map(|s| segment_potential(s, p));
        charges.chain(segments).sum()
    }
}
