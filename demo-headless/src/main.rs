use clap::{Parser, ValueEnum};
use efield_core::{
    ConfigError, EngineConfig, EngineContext, FieldPlot, IntegrationMethod, RecordingSurface,
};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    /// One negative charge surrounded by three positive ones
    FourCharges,
    /// Equal and opposite charges
    Dipole,
    /// Two oppositely charged rods
    ParallelPlates,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Method {
    Euler,
    Rk4,
}

impl From<Method> for IntegrationMethod {
    fn from(method: Method) -> Self {
        match method {
            Method::Euler => IntegrationMethod::Euler,
            Method::Rk4 => IntegrationMethod::RungeKutta,
        }
    }
}

/// Headless electrostatic field plot with configurable parameters
#[derive(Parser, Debug)]
#[command(name = "efield-demo")]
#[command(about = "Headless field-line and equipotential renderer", long_about = None)]
struct Args {
    /// JSON configuration file (overrides --preset)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Built-in source layout
    #[arg(short, long, value_enum, default_value_t = Preset::FourCharges)]
    preset: Preset,

    /// Integration scheme
    #[arg(short, long, value_enum)]
    method: Option<Method>,

    /// Step cap per field line (0 = unbounded)
    #[arg(long)]
    max_steps: Option<usize>,

    /// Integration step in unit-square lengths
    #[arg(short, long)]
    step_size: Option<f64>,

    /// Draw the sampled field grid
    #[arg(short, long)]
    grid: bool,

    /// Rebuild equipotential contours around positive charges
    #[arg(short, long)]
    equipotentials: bool,

    /// Skip drawing field lines
    #[arg(long)]
    no_field_lines: bool,
}

fn build_config(args: &Args) -> Result<EngineConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => match args.preset {
            Preset::FourCharges => EngineConfig::four_charges(),
            Preset::Dipole => EngineConfig::dipole(),
            Preset::ParallelPlates => EngineConfig::parallel_plates(),
        },
    };

    if let Some(method) = args.method {
        config.integration_method = method.into();
    }
    if let Some(max_steps) = args.max_steps {
        config.max_steps = max_steps;
    }
    if let Some(step_size) = args.step_size {
        config.step_size = step_size;
    }
    config.show_grid |= args.grid;
    config.show_equipotential_lines |= args.equipotentials;
    config.show_field_lines &= !args.no_field_lines;

    Ok(config)
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();
    info!(config = ?args.config, preset = ?args.preset, "Building configuration");

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!("=== Electrostatic Field Demo ===\n");
    println!(
        "Sources: {} point charges, {} charged segments",
        config.point_charges.len(),
        config.charged_segments.len()
    );
    println!(
        "Method: {:?}, step {:.4}, cap {} steps",
        config.integration_method,
        config.step_size,
        config.step_cap()
    );

    let plot = match FieldPlot::new(config) {
        Ok(plot) => plot,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut ctx = EngineContext::new(RecordingSurface::new(), plot.config().flush_interval);
    let summary = plot.render(&mut ctx);

    println!("\n=== Render Complete ===");
    if summary.grid_samples > 0 {
        let grid = plot.sample_grid();
        println!(
            "Grid: {} samples, max |E| {:.3}",
            summary.grid_samples,
            grid.max_magnitude()
        );
    }
    println!(
        "Field lines: {} traced, {} steps",
        summary.lines_traced, summary.steps_taken
    );

    let t = &summary.terminations;
    println!("  left domain:     {}", t.left_domain);
    println!("  reached charge:  {}", t.reached_charge);
    println!("  reached segment: {}", t.reached_segment);
    println!("  step cap:        {}", t.step_cap);
    println!("  field vanished:  {}", t.field_vanished);

    if plot.config().show_equipotential_lines {
        let evaluator = plot.evaluator();
        let closed = summary.contours.iter().filter(|c| c.closed).count();

        // Potential spread along each contour, relative to its mean
        let worst = summary
            .contours
            .iter()
            .filter(|c| c.points.len() > 1)
            .map(|c| {
                let values: Vec<f64> = c.points.iter().map(|&p| evaluator.potential(p)).collect();
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                let (lo, hi) = values
                    .iter()
                    .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
                (hi - lo) / mean.abs().max(f64::EPSILON)
            })
            .fold(0.0_f64, f64::max);

        println!(
            "Equipotentials: {} contours ({} closed), worst relative spread {:.1}%",
            summary.contours.len(),
            closed,
            worst * 100.0
        );
    }

    let surface = ctx.into_surface();
    println!(
        "Surface: {} primitives, {} flushes",
        surface.commands().len(),
        surface.flush_count()
    );

    ExitCode::SUCCESS
}
