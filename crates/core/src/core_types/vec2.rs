//! Vector type alias for 2D positions, field samples and directions.

use nalgebra::Vector2;

/// 2D vector type for positions, field values, and directions.
///
/// This is a simple alias for `nalgebra::Vector2<f64>`, used throughout
/// the engine for unit-square positions, field samples and trace steps.
pub type Vec2 = Vector2<f64>;

/// Field magnitudes below this are treated as a vanished field.
pub const MIN_FIELD_MAGNITUDE: f64 = 1e-12;

/// Unit vector along `v`, or `None` when `v` is (numerically) zero.
///
/// Callers use `None` to stop a trace at exact symmetry points instead of
/// dividing by a zero magnitude.
#[inline]
pub fn normalize(v: Vec2) -> Option<Vec2> {
    v.try_normalize(MIN_FIELD_MAGNITUDE)
}

/// Left-hand normal of a unit direction (rotated +90°).
#[inline]
pub fn perpendicular(dir: Vec2) -> Vec2 {
    Vec2::new(-dir.y, dir.x)
}

/// True when `p` lies inside the closed unit square `[0,1] × [0,1]`.
#[inline]
pub fn in_unit_square(p: Vec2) -> bool {
    (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y)
}
