//! Field sources: point charges and uniformly charged rods ("plates").

use super::vec2::{normalize, perpendicular, Vec2};
use serde::{Deserialize, Serialize};

/// Direction a field line is traced relative to the field vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    /// Follow the field (positive sources)
    Outward,
    /// Follow the field backwards (negative sources)
    Inward,
}

impl Polarity {
    /// Polarity for a source of the given magnitude.
    ///
    /// Zero magnitude is treated as outward; such sources produce no field and
    /// their traces stop on the first step.
    pub fn of(magnitude: f64) -> Self {
        if magnitude < 0.0 {
            Self::Inward
        } else {
            Self::Outward
        }
    }

    /// Multiplier applied to the field direction (+1 or -1).
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Self::Outward => 1.0,
            Self::Inward => -1.0,
        }
    }
}

/// Idealized point charge in unit-square coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointCharge {
    /// Position in the unit square
    pub position: Vec2,
    /// Charge magnitude; the sign is the polarity
    pub magnitude: f64,
}

impl PointCharge {
    /// Create a point charge at `(x, y)`.
    pub fn new(x: f64, y: f64, magnitude: f64) -> Self {
        Self {
            position: Vec2::new(x, y),
            magnitude,
        }
    }

    /// Tracing direction for lines seeded around this charge.
    pub fn polarity(&self) -> Polarity {
        Polarity::of(self.magnitude)
    }
}

/// Uniformly charged straight rod of finite length.
///
/// `magnitude` acts as a linear charge density: the far field of a rod of
/// length `L` approaches that of a point charge `magnitude * L`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChargedSegment {
    /// First endpoint; origin of the rod's local frame
    pub start: Vec2,
    /// Second endpoint
    pub end: Vec2,
    /// Linear charge density proxy; the sign is the polarity
    pub magnitude: f64,
}

impl ChargedSegment {
    /// Create a rod between two endpoints.
    pub fn new(start: Vec2, end: Vec2, magnitude: f64) -> Self {
        Self {
            start,
            end,
            magnitude,
        }
    }

    /// Rod length in unit-square units.
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Unit vector from `start` to `end`, `None` for a zero-length rod.
    pub fn direction(&self) -> Option<Vec2> {
        normalize(self.end - self.start)
    }

    /// Tracing direction for lines seeded along this rod.
    pub fn polarity(&self) -> Polarity {
        Polarity::of(self.magnitude)
    }

    /// Coordinates of `p` in the rod's local frame.
    ///
    /// Returns `(a, b)` where `a` is the signed projection along the rod from
    /// `start` and `b` the signed offset along the left-hand normal.
    pub fn local_coordinates(&self, p: Vec2) -> Option<(f64, f64)> {
        let dir = self.direction()?;
        let rel = p - self.start;
        Some((rel.dot(&dir), rel.dot(&perpendicular(dir))))
    }

    /// Euclidean distance from `p` to the closest point of the finite rod.
    pub fn distance_to(&self, p: Vec2) -> f64 {
        let span = self.end - self.start;
        let len_sq = span.norm_squared();
        if len_sq == 0.0 {
            return (p - self.start).norm();
        }
        let t = ((p - self.start).dot(&span) / len_sq).clamp(0.0, 1.0);
        (p - (self.start + span * t)).norm()
    }

    /// Point at fraction `t` of the way from `start` to `end`.
    #[inline]
    pub fn point_at(&self, t: f64) -> Vec2 {
        self.start + (self.end - self.start) * t
    }
}
