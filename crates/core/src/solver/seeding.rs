//! Seed placement for field lines
//!
//! Point charges get a ring of seeds; rods get stations along their length
//! with one seed on each face.

use crate::core_types::{perpendicular, ChargedSegment, PointCharge, Vec2};
use std::f64::consts::TAU;

/// Seeds evenly spaced on a circle of `radius` around `charge`.
///
/// Seed `i` sits at angle `2πi/count`; consecutive indices are neighbours on
/// the ring and the last wraps to the first.
pub fn charge_seeds(charge: &PointCharge, count: usize, radius: f64) -> Vec<Vec2> {
    (0..count)
        .map(|i| {
            let angle = TAU * i as f64 / count as f64;
            charge.position + Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// Seeds along a charged rod at `density` stations per unit length.
///
/// Each station at `t = (i + ½)/n` yields two seeds offset by `±offset` along
/// the rod's normal (left face first). At least one station is placed.
/// A degenerate rod yields no seeds.
pub fn segment_seeds(segment: &ChargedSegment, density: f64, offset: f64) -> Vec<Vec2> {
    let Some(dir) = segment.direction() else {
        return Vec::new();
    };
    let normal = perpendicular(dir) * offset;
    let stations = ((segment.length() * density).round() as usize).max(1);

    let mut seeds = Vec::with_capacity(stations * 2);
    for i in 0..stations {
        let base = segment.point_at((i as f64 + 0.5) / stations as f64);
        seeds.push(base + normal);
        seeds.push(base - normal);
    }
    seeds
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_charge_seeds_on_circle() {
        let charge = PointCharge::new(0.3, 0.5, 1.0);
        let seeds = charge_seeds(&charge, 12, 0.02);

        assert_eq!(seeds.len(), 12);
        for s in &seeds {
            assert_relative_eq!((s - charge.position).norm(), 0.02, epsilon = 1e-12);
        }
        // First seed on the +x axis, fourth a quarter turn later
        assert_relative_eq!(seeds[0].x, 0.32, epsilon = 1e-12);
        assert_relative_eq!(seeds[3].y, 0.52, epsilon = 1e-12);
    }

    #[test]
    fn test_segment_seeds_on_both_faces() {
        let rod = ChargedSegment::new(Vec2::new(0.25, 0.5), Vec2::new(0.75, 0.5), 1.0);
        let seeds = segment_seeds(&rod, 10.0, 0.01);

        // 0.5 length * 10 per unit = 5 stations, two faces each
        assert_eq!(seeds.len(), 10);
        assert_relative_eq!(seeds[0].x, 0.3, epsilon = 1e-12);
        assert_relative_eq!(seeds[0].y, 0.51, epsilon = 1e-12);
        assert_relative_eq!(seeds[1].y, 0.49, epsilon = 1e-12);
        assert_relative_eq!(seeds[9].x, 0.7, epsilon = 1e-12);
    }

    #[test]
    fn test_short_segment_gets_one_station() {
        let rod = ChargedSegment::new(Vec2::new(0.5, 0.5), Vec2::new(0.5, 0.51), 1.0);
        let seeds = segment_seeds(&rod, 10.0, 0.01);
        assert_eq!(seeds.len(), 2);
    }
}
