//! Field-line solver
//!
//! Integrates field lines through the superposed field of the configured
//! sources and rebuilds equipotential contours from the traced lines.
//!
//! # Example
//!
//! ```rust
//! use efield_core::physics::FieldEvaluator;
//! use efield_core::solver::{FieldLineTracer, TraceSettings, Termination};
//! use efield_core::{EngineConfig, Polarity, Vec2};
//!
//! let config = EngineConfig::dipole();
//! let evaluator = FieldEvaluator::new(&config.point_charges, &config.charged_segments);
//! let tracer = FieldLineTracer::new(evaluator, TraceSettings::from_config(&config));
//!
//! let mut segments = Vec::new();
//! let outcome = tracer.trace(Vec2::new(0.37, 0.5), Polarity::Outward, None, &mut segments);
//! assert_eq!(outcome.termination, Termination::ReachedCharge(1));
//! ```

pub mod equipotential;
mod integrator;
pub mod profiler;
pub mod seeding;
mod tracer;

pub use equipotential::{fill_gaps, reconstruct, BucketTable, Contour};
pub use integrator::IntegrationMethod;
pub use profiler::ProfilerScope;
pub use seeding::{charge_seeds, segment_seeds};
pub use tracer::{
    EquipotentialTrack, FieldLineTracer, NullSink, Termination, TraceOutcome, TraceSettings,
    TraceSink,
};
