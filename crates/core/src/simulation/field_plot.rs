//! Field plot orchestration
//!
//! `FieldPlot` runs the configured render passes against an
//! [`EngineContext`]:
//!
//! 1. grid arrows (optional diagnostic view),
//! 2. field lines from every source, with equipotential contours rebuilt
//!    per positive point charge right after its lines are traced,
//! 3. the sources themselves.
//!
//! Every pass checks the context's quit flag and stops early once it is set.

use crate::config::EngineConfig;
use crate::core_types::{Color, Polarity, Vec2};
use crate::error::ConfigError;
use crate::grid::FieldGrid;
use crate::physics::FieldEvaluator;
use crate::render::{EngineContext, RenderSurface};
use crate::solver::{
    charge_seeds, reconstruct, segment_seeds, BucketTable, Contour, EquipotentialTrack,
    FieldLineTracer, ProfilerScope, Termination, TraceSettings, TraceSink,
};
use tracing::{debug, info, warn};

/// Line thickness for charged rods, in pixels.
const PLATE_THICKNESS: f64 = 3.0;

/// Tally of how traces ended
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TerminationCounts {
    pub left_domain: usize,
    pub reached_charge: usize,
    pub reached_segment: usize,
    pub step_cap: usize,
    pub field_vanished: usize,
    pub aborted: usize,
}

impl TerminationCounts {
    pub fn record(&mut self, termination: Termination) {
        match termination {
            Termination::LeftDomain => self.left_domain += 1,
            Termination::ReachedCharge(_) => self.reached_charge += 1,
            Termination::ReachedSegment(_) => self.reached_segment += 1,
            Termination::StepCap => self.step_cap += 1,
            Termination::FieldVanished => self.field_vanished += 1,
            Termination::Aborted => self.aborted += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.left_domain
            + self.reached_charge
            + self.reached_segment
            + self.step_cap
            + self.field_vanished
            + self.aborted
    }
}

/// Statistics from one [`FieldPlot::render`] call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlotSummary {
    pub grid_samples: usize,
    pub lines_traced: usize,
    pub steps_taken: usize,
    pub terminations: TerminationCounts,
    /// Rebuilt equipotential contours, in drawing order
    pub contours: Vec<Contour>,
    /// The quit flag stopped rendering early
    pub aborted: bool,
}

/// Forwards traced segments to the context, optionally without drawing.
struct LineSink<'c, S: RenderSurface> {
    ctx: &'c mut EngineContext<S>,
    draw: bool,
}

impl<S: RenderSurface> TraceSink for LineSink<'_, S> {
    fn segment(&mut self, from: Vec2, to: Vec2) {
        if self.draw {
            self.ctx.draw_segment(from, to, Color::WHITE, 1.0);
        }
    }

    fn abort_requested(&self) -> bool {
        self.ctx.quit_requested()
    }
}

/// A validated configuration ready to render.
#[derive(Debug, Clone)]
pub struct FieldPlot {
    config: EngineConfig,
}

impl FieldPlot {
    /// Validate `config` and build a plot from it.
    ///
    /// # Errors
    /// Returns the configuration's validation error.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluator over this plot's sources.
    pub fn evaluator(&self) -> FieldEvaluator<'_> {
        FieldEvaluator::new(&self.config.point_charges, &self.config.charged_segments)
    }

    /// Tracer using this plot's integration settings.
    pub fn tracer(&self) -> FieldLineTracer<'_> {
        FieldLineTracer::new(self.evaluator(), TraceSettings::from_config(&self.config))
    }

    /// Sample the diagnostic grid.
    pub fn sample_grid(&self) -> FieldGrid {
        FieldGrid::sample(
            &self.evaluator(),
            self.config.grid_resolution,
            self.config.pixels_to_unit(self.config.max_arrow_length),
        )
    }

    /// Run all enabled passes and flush the surface.
    pub fn render<S: RenderSurface>(&self, ctx: &mut EngineContext<S>) -> PlotSummary {
        let config = &self.config;
        info!(
            "Rendering field plot: {} point charges, {} charged segments, {:?} integration",
            config.point_charges.len(),
            config.charged_segments.len(),
            config.integration_method
        );

        let mut summary = PlotSummary::default();

        if config.show_grid && !ctx.quit_requested() {
            let _scope = ProfilerScope::new("grid");
            summary.grid_samples = self.draw_grid(ctx);
        }

        if (config.show_field_lines || config.show_equipotential_lines) && !ctx.quit_requested() {
            let _scope = ProfilerScope::new("field_lines");
            self.draw_field_lines(ctx, &mut summary);
        }

        if !ctx.quit_requested() {
            self.draw_sources(ctx);
        }
        ctx.yield_to_surface();

        summary.aborted = ctx.quit_requested();
        if summary.aborted {
            warn!(
                "Rendering stopped by quit request after {} lines",
                summary.lines_traced
            );
        }
        info!(
            "Field plot done: {} lines, {} steps, {} contours, {} primitives",
            summary.lines_traced,
            summary.steps_taken,
            summary.contours.len(),
            ctx.primitives_drawn()
        );
        summary
    }

    /// Direction tick, magnitude arrow and compass ring at every grid node.
    fn draw_grid<S: RenderSurface>(&self, ctx: &mut EngineContext<S>) -> usize {
        let config = &self.config;
        let grid = self.sample_grid();
        let tick = config.pixels_to_unit(config.direction_tick_length);
        let ring_radius = 1.0 / config.grid_resolution as f64 / 5.0;

        debug!(
            "Grid {}x{}: max magnitude {:.3}, arrow scale {:.3e}",
            grid.resolution(),
            grid.resolution(),
            grid.max_magnitude(),
            grid.scale()
        );

        let mut drawn = 0;
        for sample in grid.samples() {
            if ctx.quit_requested() {
                break;
            }
            if let Some(direction) = FieldGrid::direction_arrow(sample, tick) {
                ctx.draw_segment(sample.position, sample.position + direction, Color::YELLOW, 1.0);
            }
            let arrow = grid.magnitude_arrow(sample);
            ctx.draw_segment(sample.position, sample.position + arrow, Color::WHITE, 1.0);
            ctx.draw_circle(sample.position, ring_radius, Color::WHITE, false);
            drawn += 1;
        }
        drawn
    }

    /// Trace every seed of every source.
    fn draw_field_lines<S: RenderSurface>(
        &self,
        ctx: &mut EngineContext<S>,
        summary: &mut PlotSummary,
    ) {
        let config = &self.config;
        let tracer = self.tracer();

        for (index, charge) in config.point_charges.iter().enumerate() {
            if ctx.quit_requested() {
                return;
            }
            let polarity = charge.polarity();
            let tracks_potential = config.show_equipotential_lines
                && polarity == Polarity::Outward
                && charge.magnitude != 0.0;
            // Field lines hidden: only positive charges need tracing, for their contours
            if !config.show_field_lines && !tracks_potential {
                continue;
            }

            let seeds = charge_seeds(charge, config.seeds_per_charge, config.seed_radius);
            debug!(
                "Charge {} ({:+}) at ({:.3}, {:.3}): {} seeds",
                index,
                charge.magnitude,
                charge.position.x,
                charge.position.y,
                seeds.len()
            );

            let mut table = tracks_potential
                .then(|| BucketTable::new(seeds.len(), config.max_equipotential_buckets));

            for (seed_index, seed) in seeds.iter().enumerate() {
                if ctx.quit_requested() {
                    break;
                }
                let track = table.as_mut().map(|table| EquipotentialTrack { table, seed_index });
                let mut sink = LineSink {
                    ctx: &mut *ctx,
                    draw: config.show_field_lines,
                };
                let outcome = tracer.trace(*seed, polarity, track, &mut sink);
                Self::record_outcome(summary, outcome.steps, outcome.termination);
            }

            if let Some(table) = table {
                if !ctx.quit_requested() {
                    self.draw_contours(ctx, &table, summary);
                }
            }
        }

        if !config.show_field_lines {
            return;
        }

        for (index, segment) in config.charged_segments.iter().enumerate() {
            if ctx.quit_requested() {
                return;
            }
            let seeds = segment_seeds(segment, config.plate_seed_density, config.plate_seed_offset);
            debug!(
                "Segment {} ({:+}): {} seeds",
                index,
                segment.magnitude,
                seeds.len()
            );

            for seed in &seeds {
                if ctx.quit_requested() {
                    break;
                }
                let mut sink = LineSink {
                    ctx: &mut *ctx,
                    draw: true,
                };
                let outcome = tracer.trace(*seed, segment.polarity(), None, &mut sink);
                Self::record_outcome(summary, outcome.steps, outcome.termination);
            }
        }
    }

    fn record_outcome(summary: &mut PlotSummary, steps: usize, termination: Termination) {
        summary.lines_traced += 1;
        summary.steps_taken += steps;
        summary.terminations.record(termination);
    }

    /// Rebuild and draw contours from one charge's bucket table.
    fn draw_contours<S: RenderSurface>(
        &self,
        ctx: &mut EngineContext<S>,
        table: &BucketTable,
        summary: &mut PlotSummary,
    ) {
        let contours = reconstruct(table, self.config.max_equipotential_segment_length);
        debug!(
            "Rebuilt {} contours from {} potential levels",
            contours.len(),
            table.level_count()
        );
        for contour in contours {
            for (from, to) in contour.segments() {
                ctx.draw_segment(from, to, Color::GREEN, 1.0);
            }
            summary.contours.push(contour);
        }
    }

    /// Filled circles for point charges, thick lines for rods.
    fn draw_sources<S: RenderSurface>(&self, ctx: &mut EngineContext<S>) {
        let config = &self.config;
        let radius = 1.0 / config.grid_resolution as f64 / 3.0;
        for charge in &config.point_charges {
            ctx.draw_circle(charge.position, radius, Color::for_magnitude(charge.magnitude), true);
        }
        for segment in &config.charged_segments {
            ctx.draw_segment(
                segment.start,
                segment.end,
                Color::for_magnitude(segment.magnitude),
                PLATE_THICKNESS,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::PointCharge;
    use crate::render::RecordingSurface;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = EngineConfig {
            point_charges: Vec::new(),
            ..Default::default()
        };
        assert_eq!(FieldPlot::new(config).err(), Some(ConfigError::NoSources));
    }

    #[test]
    fn test_default_plot_draws_lines_and_charges() {
        let plot = FieldPlot::new(EngineConfig::four_charges()).expect("valid preset");
        let mut ctx = EngineContext::new(RecordingSurface::new(), 64);
        let summary = plot.render(&mut ctx);

        assert_eq!(summary.lines_traced, 4 * 12);
        assert_eq!(summary.terminations.total(), summary.lines_traced);
        assert!(!summary.aborted);

        let surface = ctx.into_surface();
        assert_eq!(surface.segment_count(Color::WHITE), summary.steps_taken);
        assert_eq!(surface.circle_count(Color::RED), 3);
        assert_eq!(surface.circle_count(Color::BLUE), 1);
        assert!(surface.flush_count() >= 1);
    }

    #[test]
    fn test_grid_pass_draws_three_primitives_per_node() {
        let config = EngineConfig {
            point_charges: vec![PointCharge::new(0.53, 0.47, 1.0)],
            show_grid: true,
            show_field_lines: false,
            grid_resolution: 5,
            ..Default::default()
        };
        let plot = FieldPlot::new(config).expect("valid config");
        let mut ctx = EngineContext::new(RecordingSurface::new(), 1000);
        let summary = plot.render(&mut ctx);

        assert_eq!(summary.grid_samples, 25);
        assert_eq!(summary.lines_traced, 0);
        let surface = ctx.into_surface();
        assert_eq!(surface.segment_count(Color::YELLOW), 25);
        // 25 magnitude arrows plus 25 compass rings
        assert_eq!(surface.segment_count(Color::WHITE), 25);
        assert_eq!(surface.circle_count(Color::WHITE), 25);
    }

    #[test]
    fn test_quit_stops_rendering_early() {
        let plot = FieldPlot::new(EngineConfig::four_charges()).expect("valid preset");
        let mut ctx = EngineContext::new(RecordingSurface::quitting_after(1), 10);
        let summary = plot.render(&mut ctx);

        assert!(summary.aborted);
        assert!(summary.lines_traced < 48);
        assert_eq!(summary.terminations.aborted, 1);
        // Sources are not drawn once quit was requested
        assert_eq!(ctx.surface().circle_count(Color::RED), 0);
    }

    #[test]
    fn test_quit_requested_before_render_draws_nothing() {
        let plot = FieldPlot::new(EngineConfig {
            show_grid: true,
            show_equipotential_lines: true,
            ..EngineConfig::four_charges()
        })
        .expect("valid config");
        let mut ctx = EngineContext::new(RecordingSurface::new(), 64);
        ctx.request_quit();
        let summary = plot.render(&mut ctx);

        assert!(summary.aborted);
        assert_eq!(summary.grid_samples, 0);
        assert_eq!(summary.lines_traced, 0);
        assert!(summary.contours.is_empty());
        assert_eq!(ctx.primitives_drawn(), 0);
        assert!(ctx.surface().commands().is_empty());
    }

    #[test]
    fn test_equipotentials_only_for_positive_charges() {
        let config = EngineConfig {
            point_charges: vec![PointCharge::new(0.5, 0.5, -1.0)],
            show_equipotential_lines: true,
            ..Default::default()
        };
        let plot = FieldPlot::new(config).expect("valid config");
        let mut ctx = EngineContext::new(RecordingSurface::new(), 256);
        let summary = plot.render(&mut ctx);

        assert!(summary.contours.is_empty());
        assert_eq!(ctx.surface().segment_count(Color::GREEN), 0);
    }
}
