//! Field plot orchestration

mod field_plot;

pub use field_plot::{FieldPlot, PlotSummary, TerminationCounts};
