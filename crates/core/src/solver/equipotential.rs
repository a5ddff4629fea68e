//! Equipotential contours from traced field lines
//!
//! While a field line is traced, the potential drop from its seed is
//! accumulated step by step. The first point of each line to reach a given
//! multiple of the bucket width is recorded in a table indexed by
//! `[level][seed]`. Points sharing a level lie on (approximately) the same
//! equipotential, and neighbouring seeds on a charge's seed ring give
//! neighbouring contour points.

use crate::core_types::Vec2;

/// Per-source table of contour samples, `rows[level][seed]`.
///
/// Rows are allocated lazily as deeper levels are reached, up to
/// `max_levels`. A slot is written at most once: the first sample wins.
#[derive(Debug, Clone, PartialEq)]
pub struct BucketTable {
    seeds: usize,
    max_levels: usize,
    rows: Vec<Vec<Option<Vec2>>>,
}

impl BucketTable {
    /// Empty table for `seeds` field lines and at most `max_levels` levels.
    pub fn new(seeds: usize, max_levels: usize) -> Self {
        Self {
            seeds,
            max_levels,
            rows: Vec::new(),
        }
    }

    /// Number of seed columns.
    pub fn seed_count(&self) -> usize {
        self.seeds
    }

    /// Number of allocated levels.
    pub fn level_count(&self) -> usize {
        self.rows.len()
    }

    /// Recorded sample at `[level][seed]`, if any.
    pub fn get(&self, level: usize, seed: usize) -> Option<Vec2> {
        self.rows.get(level)?.get(seed).copied().flatten()
    }

    /// Read-only view of the rows.
    pub fn rows(&self) -> &[Vec<Option<Vec2>>] {
        &self.rows
    }

    /// Record `point` at `[level][seed]` unless the slot is already filled.
    ///
    /// Returns `true` when the point was stored. Levels at or beyond
    /// `max_levels` and out-of-range seeds are ignored.
    pub fn record(&mut self, level: usize, seed: usize, point: Vec2) -> bool {
        if level >= self.max_levels || seed >= self.seeds {
            return false;
        }
        if self.rows.len() <= level {
            self.rows.resize(level + 1, vec![None; self.seeds]);
        }
        let slot = &mut self.rows[level][seed];
        if slot.is_some() {
            return false;
        }
        *slot = Some(point);
        true
    }
}

/// Connected run of contour points at one potential level.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    /// Bucket index (potential drop ≈ `level × bucket width`)
    pub level: usize,
    /// Points in seed order
    pub points: Vec<Vec2>,
    /// Whether the last point connects back to the first
    pub closed: bool,
}

impl Contour {
    /// Line segments making up this contour, including the closing one.
    pub fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let closing = (self.closed && self.points.len() > 2)
            .then(|| (self.points[self.points.len() - 1], self.points[0]));
        self.points
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(closing)
    }
}

/// Copy of the table's rows with per-seed gaps filled.
///
/// For each seed column, levels before the first recorded sample copy that
/// sample; levels between two samples are interpolated linearly by level
/// distance; levels after the last sample stay empty.
pub fn fill_gaps(table: &BucketTable) -> Vec<Vec<Option<Vec2>>> {
    let mut rows = table.rows().to_vec();

    for seed in 0..table.seed_count() {
        let mut last: Option<(usize, Vec2)> = None;
        for level in 0..rows.len() {
            let Some(point) = rows[level][seed] else {
                continue;
            };
            match last {
                None => {
                    for row in &mut rows[..level] {
                        row[seed] = Some(point);
                    }
                }
                Some((prev_level, prev_point)) => {
                    let span = (level - prev_level) as f64;
                    for fill in (prev_level + 1)..level {
                        let t = (fill - prev_level) as f64 / span;
                        rows[fill][seed] = Some(prev_point + (point - prev_point) * t);
                    }
                }
            }
            last = Some((level, point));
        }
    }

    rows
}

/// Rebuild equipotential contours from a completed table.
///
/// Each level is a ring of seeds (the last seed neighbours the first).
/// Neighbours are joined unless either is missing or they are farther apart
/// than `max_segment_length`. Runs of joined points become [`Contour`]s.
pub fn reconstruct(table: &BucketTable, max_segment_length: f64) -> Vec<Contour> {
    fill_gaps(table)
        .iter()
        .enumerate()
        .flat_map(|(level, ring)| ring_contours(level, ring, max_segment_length))
        .collect()
}

fn ring_contours(level: usize, ring: &[Option<Vec2>], max_segment_length: f64) -> Vec<Contour> {
    let n = ring.len();
    if n < 2 {
        return Vec::new();
    }

    let joined = |i: usize| match (ring[i], ring[(i + 1) % n]) {
        (Some(a), Some(b)) => (b - a).norm() <= max_segment_length,
        _ => false,
    };

    if (0..n).all(joined) {
        return vec![Contour {
            level,
            points: ring.iter().flatten().copied().collect(),
            closed: true,
        }];
    }

    // Walk the ring starting just after a break so no run straddles the wrap
    let Some(first_break) = (0..n).find(|&i| !joined(i)) else {
        return Vec::new();
    };
    let start = (first_break + 1) % n;

    let mut contours = Vec::new();
    let mut run: Vec<Vec2> = Vec::new();
    for k in 0..n {
        let i = (start + k) % n;
        if let Some(p) = ring[i] {
            run.push(p);
        }
        if !joined(i) {
            if run.len() >= 2 {
                contours.push(Contour {
                    level,
                    points: std::mem::take(&mut run),
                    closed: false,
                });
            } else {
                run.clear();
            }
        }
    }
    contours
}
