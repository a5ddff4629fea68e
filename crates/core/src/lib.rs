//! Electrostatic Field Plotting Core Library
//!
//! Computes the 2D electrostatic field of point charges and finite charged
//! rods ("plates") in the unit square, traces field lines through it, and
//! rebuilds equipotential contours from the traced lines.
//!
//! ## Layout
//!
//! - [`physics`]: closed-form superposition of source fields and potentials
//! - [`solver`]: Euler/RK4 stepping, field-line tracing, equipotential reconstruction
//! - [`grid`]: regular-grid sampling for the arrow diagnostic view
//! - [`render`]: the render-surface contract and the cooperative quit flag
//! - [`simulation`]: `FieldPlot`, which runs all passes against a surface
//!
//! ## Example
//!
//! ```rust
//! use efield_core::render::{EngineContext, RecordingSurface};
//! use efield_core::{EngineConfig, FieldPlot};
//!
//! let plot = FieldPlot::new(EngineConfig::dipole()).expect("preset is valid");
//! let mut ctx = EngineContext::new(RecordingSurface::new(), plot.config().flush_interval);
//! let summary = plot.render(&mut ctx);
//! assert_eq!(summary.lines_traced, 24);
//! ```

// Core types and utilities
pub mod core_types;

pub mod config;
pub mod error;

pub mod grid;
pub mod physics;
pub mod render;
pub mod simulation;
pub mod solver;

// Re-export core types
pub use core_types::{ChargedSegment, Color, PointCharge, Polarity, Vec2};

pub use config::{EngineConfig, UNBOUNDED_STEP_CAP};
pub use error::ConfigError;

pub use grid::{FieldGrid, GridSample};
pub use physics::FieldEvaluator;
pub use render::{EngineContext, RecordingSurface, RenderSurface};
pub use simulation::{FieldPlot, PlotSummary, TerminationCounts};
pub use solver::{Contour, IntegrationMethod, Termination};
