//! Field-line tracing
//!
//! A trace starts at a seed point, repeatedly applies the configured
//! integration step, hands each new segment to a [`TraceSink`], and stops on
//! the first of:
//!
//! 1. leaving the unit square,
//! 2. coming within `charge_proximity` of a point charge,
//! 3. coming within `plate_proximity` of a charged segment,
//! 4. a vanished field,
//! 5. a cooperative abort from the sink,
//! 6. the step cap (always finite).

use super::equipotential::BucketTable;
use super::integrator::IntegrationMethod;
use crate::config::EngineConfig;
use crate::core_types::{in_unit_square, Polarity, Vec2};
use crate::physics::FieldEvaluator;

/// Receiver for traced segments.
pub trait TraceSink {
    /// Called once per integration step with the segment just traced.
    fn segment(&mut self, from: Vec2, to: Vec2);

    /// Polled after every step; `true` stops the trace.
    fn abort_requested(&self) -> bool {
        false
    }
}

/// Collects segments in memory.
impl TraceSink for Vec<(Vec2, Vec2)> {
    fn segment(&mut self, from: Vec2, to: Vec2) {
        self.push((from, to));
    }
}

/// Discards segments (used when only equipotential samples are needed).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn segment(&mut self, _from: Vec2, _to: Vec2) {}
}

/// Why a trace stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// Left the unit square (or the seed was already outside it)
    LeftDomain,
    /// Came within proximity of the point charge with this index
    ReachedCharge(usize),
    /// Came within proximity of the charged segment with this index
    ReachedSegment(usize),
    /// Hit the configured step cap
    StepCap,
    /// The field vanished, so no direction could be taken
    FieldVanished,
    /// The sink requested a cooperative abort
    Aborted,
}

/// Result of one trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceOutcome {
    /// Integration steps taken (= segments emitted)
    pub steps: usize,
    pub termination: Termination,
    /// Last point of the line
    pub end: Vec2,
}

/// Where a trace writes its equipotential samples.
#[derive(Debug)]
pub struct EquipotentialTrack<'t> {
    pub table: &'t mut BucketTable,
    /// Column of this trace's seed in the table
    pub seed_index: usize,
}

/// Tracing parameters, usually taken from an [`EngineConfig`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceSettings {
    pub method: IntegrationMethod,
    pub step_size: f64,
    /// Maximum steps per trace; must be finite
    pub step_cap: usize,
    pub charge_proximity: f64,
    pub plate_proximity: f64,
    /// Potential drop per equipotential level
    pub bucket_width: f64,
}

impl TraceSettings {
    /// Settings from a validated configuration.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            method: config.integration_method,
            step_size: config.step_size,
            step_cap: config.step_cap(),
            charge_proximity: config.charge_proximity,
            plate_proximity: config.plate_proximity,
            bucket_width: config.equipotential_bucket_width,
        }
    }
}

/// Traces field lines through a fixed source layout.
#[derive(Debug, Clone, Copy)]
pub struct FieldLineTracer<'a> {
    evaluator: FieldEvaluator<'a>,
    settings: TraceSettings,
}

impl<'a> FieldLineTracer<'a> {
    pub fn new(evaluator: FieldEvaluator<'a>, settings: TraceSettings) -> Self {
        Self {
            evaluator,
            settings,
        }
    }

    pub fn settings(&self) -> &TraceSettings {
        &self.settings
    }

    /// Trace one field line from `seed`.
    ///
    /// `polarity` is the sign of the seed's source; negative sources are
    /// traced against the field so every line leaves its seed. When `track`
    /// is given, the accumulated potential drop is sampled into its table.
    pub fn trace<S: TraceSink + ?Sized>(
        &self,
        seed: Vec2,
        polarity: Polarity,
        mut track: Option<EquipotentialTrack<'_>>,
        sink: &mut S,
    ) -> TraceOutcome {
        let settings = &self.settings;
        let mut point = seed;

        if !in_unit_square(point) {
            return TraceOutcome {
                steps: 0,
                termination: Termination::LeftDomain,
                end: point,
            };
        }

        let mut potential_drop = 0.0;
        let mut previous_magnitude = if track.is_some() {
            self.evaluator.magnitude(point)
        } else {
            0.0
        };

        for step in 1..=settings.step_cap {
            let Some(next) =
                settings
                    .method
                    .step(point, polarity, &self.evaluator, settings.step_size)
            else {
                return TraceOutcome {
                    steps: step - 1,
                    termination: Termination::FieldVanished,
                    end: point,
                };
            };

            if let Some(track) = track.as_mut() {
                // Trapezoidal estimate of ∫|E|·ds over this step
                let magnitude = self.evaluator.magnitude(next);
                potential_drop += 0.5 * (previous_magnitude + magnitude) * settings.step_size;
                previous_magnitude = magnitude;

                let level = (potential_drop / settings.bucket_width).floor() as usize;
                track.table.record(level, track.seed_index, next);
            }

            sink.segment(point, next);
            point = next;

            if let Some(termination) = self.termination_at(point) {
                return TraceOutcome {
                    steps: step,
                    termination,
                    end: point,
                };
            }
            if sink.abort_requested() {
                return TraceOutcome {
                    steps: step,
                    termination: Termination::Aborted,
                    end: point,
                };
            }
        }

        TraceOutcome {
            steps: settings.step_cap,
            termination: Termination::StepCap,
            end: point,
        }
    }

    /// Geometric stop condition at `p`, if any.
    pub fn termination_at(&self, p: Vec2) -> Option<Termination> {
        if !in_unit_square(p) {
            return Some(Termination::LeftDomain);
        }
        if let Some(i) = self
            .evaluator
            .charges()
            .iter()
            .position(|c| (p - c.position).norm() < self.settings.charge_proximity)
        {
            return Some(Termination::ReachedCharge(i));
        }
        self.evaluator
            .segments()
            .iter()
            .position(|s| s.distance_to(p) < self.settings.plate_proximity)
            .map(Termination::ReachedSegment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::{ChargedSegment, PointCharge};
    use approx::assert_relative_eq;

    fn settings(method: IntegrationMethod, step_cap: usize) -> TraceSettings {
        TraceSettings {
            method,
            step_size: 0.02,
            step_cap,
            charge_proximity: 0.015,
            plate_proximity: 0.005,
            bucket_width: 2.0,
        }
    }

    #[test]
    fn test_seed_outside_domain_emits_nothing() {
        let charges = [PointCharge::new(0.5, 0.5, 1.0)];
        let tracer = FieldLineTracer::new(
            FieldEvaluator::new(&charges, &[]),
            settings(IntegrationMethod::Euler, usize::MAX),
        );

        let mut segments = Vec::new();
        let outcome = tracer.trace(Vec2::new(1.2, 0.5), Polarity::Outward, None, &mut segments);

        assert_eq!(outcome.termination, Termination::LeftDomain);
        assert_eq!(outcome.steps, 0);
        assert!(segments.is_empty());
    }

    #[test]
    fn test_trace_leaves_domain() {
        let charges = [PointCharge::new(0.5, 0.5, 1.0)];
        let tracer = FieldLineTracer::new(
            FieldEvaluator::new(&charges, &[]),
            settings(IntegrationMethod::Euler, 1000),
        );

        let mut segments = Vec::new();
        let outcome = tracer.trace(Vec2::new(0.51, 0.5), Polarity::Outward, None, &mut segments);

        assert_eq!(outcome.termination, Termination::LeftDomain);
        assert!(outcome.end.x > 1.0);
        assert_eq!(segments.len(), outcome.steps);
        // 0.51 -> 1.01 in 0.02 steps
        assert_eq!(outcome.steps, 25);
    }

    #[test]
    fn test_trace_reaches_opposite_charge() {
        let charges = [PointCharge::new(0.3, 0.5, 1.0), PointCharge::new(0.5, 0.5, -1.0)];
        let tracer = FieldLineTracer::new(
            FieldEvaluator::new(&charges, &[]),
            settings(IntegrationMethod::Euler, 50),
        );

        let mut segments = Vec::new();
        let outcome = tracer.trace(Vec2::new(0.45, 0.5), Polarity::Outward, None, &mut segments);

        assert_eq!(outcome.termination, Termination::ReachedCharge(1));
        assert_eq!(outcome.steps, 2);
    }

    #[test]
    fn test_step_cap_limits_trace() {
        let charges = [PointCharge::new(0.5, 0.5, 1.0)];
        let tracer = FieldLineTracer::new(
            FieldEvaluator::new(&charges, &[]),
            settings(IntegrationMethod::RungeKutta, 5),
        );

        let mut segments = Vec::new();
        let outcome = tracer.trace(Vec2::new(0.52, 0.5), Polarity::Outward, None, &mut segments);

        assert_eq!(outcome.termination, Termination::StepCap);
        assert_eq!(outcome.steps, 5);
        assert_eq!(segments.len(), 5);
    }

    #[test]
    fn test_trace_stops_at_plate() {
        let charges = [PointCharge::new(0.5, 0.2, 1.0)];
        let segments_cfg = [ChargedSegment::new(
            Vec2::new(0.3, 0.6),
            Vec2::new(0.7, 0.6),
            -0.5,
        )];
        let tracer = FieldLineTracer::new(
            FieldEvaluator::new(&charges, &segments_cfg),
            settings(IntegrationMethod::Euler, 200),
        );

        let outcome = tracer.trace(Vec2::new(0.5, 0.22), Polarity::Outward, None, &mut NullSink);
        assert_eq!(outcome.termination, Termination::ReachedSegment(0));
        assert!(outcome.end.y < 0.6 + 0.005);
    }

    #[test]
    fn test_potential_samples_recorded_once_per_level() {
        let charges = [PointCharge::new(0.5, 0.5, 1.0)];
        let tracer = FieldLineTracer::new(
            FieldEvaluator::new(&charges, &[]),
            settings(IntegrationMethod::Euler, 100),
        );
        let mut table = BucketTable::new(2, 512);

        let track = EquipotentialTrack {
            table: &mut table,
            seed_index: 1,
        };
        tracer.trace(Vec2::new(0.52, 0.5), Polarity::Outward, Some(track), &mut NullSink);

        assert!(table.level_count() > 1);
        // Seed column 0 was never traced
        assert!((0..table.level_count()).all(|l| table.get(l, 0).is_none()));
        // Samples move outward as the level increases
        let recorded: Vec<Vec2> = (0..table.level_count())
            .filter_map(|l| table.get(l, 1))
            .collect();
        assert!(recorded.windows(2).all(|w| w[1].x > w[0].x));
    }

    #[test]
    fn test_potential_drop_uses_trapezoid_rule() {
        let charges = [PointCharge::new(0.5, 0.5, 1.0)];
        let tracer = FieldLineTracer::new(
            FieldEvaluator::new(&charges, &[]),
            settings(IntegrationMethod::Euler, 2),
        );
        assert_eq!(tracer.settings().bucket_width, 2.0);
        let mut table = BucketTable::new(1, 512);

        let track = EquipotentialTrack {
            table: &mut table,
            seed_index: 0,
        };
        tracer.trace(Vec2::new(0.52, 0.5), Polarity::Outward, Some(track), &mut NullSink);

        // |E| = 1/r²: 2500 at r = 0.02, 625 at 0.04, 277.8 at 0.06
        // Step 1: (2500 + 625) / 2 * 0.02 = 31.25   -> level 15
        // Step 2: + (625 + 277.8) / 2 * 0.02 = 40.28 -> level 20
        assert_eq!(table.level_count(), 21);
        let first = table.get(15, 0).expect("first step sample");
        let second = table.get(20, 0).expect("second step sample");
        assert_relative_eq!(first.x, 0.54, epsilon = 1e-12);
        assert_relative_eq!(second.x, 0.56, epsilon = 1e-12);
        assert!((0..21)
            .filter(|&l| l != 15 && l != 20)
            .all(|l| table.get(l, 0).is_none()));
    }

    struct AbortAfter {
        remaining: usize,
    }

    impl TraceSink for AbortAfter {
        fn segment(&mut self, _from: Vec2, _to: Vec2) {
            self.remaining = self.remaining.saturating_sub(1);
        }

        fn abort_requested(&self) -> bool {
            self.remaining == 0
        }
    }

    #[test]
    fn test_sink_abort_stops_after_current_step() {
        let charges = [PointCharge::new(0.5, 0.5, 1.0)];
        let tracer = FieldLineTracer::new(
            FieldEvaluator::new(&charges, &[]),
            settings(IntegrationMethod::Euler, 100),
        );

        let mut sink = AbortAfter { remaining: 3 };
        let outcome = tracer.trace(Vec2::new(0.52, 0.5), Polarity::Outward, None, &mut sink);
        assert_eq!(outcome.termination, Termination::Aborted);
        assert_eq!(outcome.steps, 3);
    }
}
