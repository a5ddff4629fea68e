//! Engine configuration
//!
//! Static options for a field plot: the source layout, which layers to draw,
//! integration parameters, and the pixel-space sizes the render surface
//! expects. Loaded once, validated, then shared read-only.

use crate::core_types::{ChargedSegment, PointCharge, Vec2};
use crate::error::ConfigError;
use crate::solver::IntegrationMethod;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Step cap used when `max_steps` is configured as 0 ("unbounded").
///
/// Traces always stop eventually; a line that orbits without leaving the
/// domain or reaching a source is cut off here.
pub const UNBOUNDED_STEP_CAP: usize = 1_000_000;

/// Configuration for a field plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Point charges in the unit square
    #[serde(default)]
    pub point_charges: Vec<PointCharge>,
    /// Uniformly charged rods in the unit square
    #[serde(default)]
    pub charged_segments: Vec<ChargedSegment>,

    /// Grid samples per axis for the diagnostic arrow view
    pub grid_resolution: usize,
    pub show_grid: bool,
    pub show_field_lines: bool,
    pub show_equipotential_lines: bool,

    pub integration_method: IntegrationMethod,
    /// Step length along a field line (unit-square units)
    pub step_size: f64,
    /// Maximum steps per field line; 0 means "unbounded" (see [`UNBOUNDED_STEP_CAP`])
    pub max_steps: usize,

    /// Field lines launched from each point charge
    pub seeds_per_charge: usize,
    /// Radius of the seed circle around each point charge
    pub seed_radius: f64,
    /// Seed stations per unit length along each charged segment
    pub plate_seed_density: f64,
    /// Normal offset of segment seeds from the rod, on both faces
    pub plate_seed_offset: f64,

    /// Traces stop when they come this close to a point charge
    pub charge_proximity: f64,
    /// Traces stop when they come this close to a charged segment
    pub plate_proximity: f64,

    /// Accumulated potential drop per equipotential level
    pub equipotential_bucket_width: f64,
    /// Levels beyond this many are not recorded
    pub max_equipotential_buckets: usize,
    /// Longer chords between neighbouring contour points are not drawn
    pub max_equipotential_segment_length: f64,

    /// Square window edge in pixels
    pub window_size: u32,
    /// Length of the grid direction tick in pixels
    pub direction_tick_length: f64,
    /// Pixel length of the strongest grid vector
    pub max_arrow_length: f64,

    /// Primitives drawn between surface flushes / quit polls
    pub flush_interval: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::four_charges()
    }
}

impl EngineConfig {
    /// Base options with no sources.
    fn base(point_charges: Vec<PointCharge>, charged_segments: Vec<ChargedSegment>) -> Self {
        Self {
            point_charges,
            charged_segments,
            grid_resolution: 25,
            show_grid: false,
            show_field_lines: true,
            show_equipotential_lines: false,
            integration_method: IntegrationMethod::Euler,
            step_size: 0.02,
            max_steps: 50,
            seeds_per_charge: 12,
            seed_radius: 0.02,
            plate_seed_density: 40.0,
            plate_seed_offset: 0.01,
            charge_proximity: 0.015,
            plate_proximity: 0.005,
            equipotential_bucket_width: 2.0,
            max_equipotential_buckets: 512,
            max_equipotential_segment_length: 0.1,
            window_size: 640,
            direction_tick_length: 16.0,
            max_arrow_length: 50.0,
            flush_interval: 256,
        }
    }

    /// One negative charge surrounded by three positive ones.
    pub fn four_charges() -> Self {
        Self::base(
            vec![
                PointCharge::new(0.5, 0.3, -1.0),
                PointCharge::new(0.3, 0.5, 1.0),
                PointCharge::new(0.7, 0.5, 1.0),
                PointCharge::new(0.5, 0.7, 1.0),
            ],
            Vec::new(),
        )
    }

    /// Equal and opposite charges on the horizontal midline.
    pub fn dipole() -> Self {
        Self::base(
            vec![
                PointCharge::new(0.35, 0.5, 1.0),
                PointCharge::new(0.65, 0.5, -1.0),
            ],
            Vec::new(),
        )
    }

    /// Two oppositely charged parallel rods (a finite capacitor).
    pub fn parallel_plates() -> Self {
        Self::base(
            Vec::new(),
            vec![
                ChargedSegment::new(Vec2::new(0.25, 0.35), Vec2::new(0.75, 0.35), 1.0),
                ChargedSegment::new(Vec2::new(0.25, 0.65), Vec2::new(0.75, 0.65), -1.0),
            ],
        )
    }

    /// Parse and validate a JSON configuration.
    ///
    /// Missing options take their [`Default`] values; missing source lists
    /// are empty.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON, or the validation error.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load, parse and validate a JSON configuration file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Load`] if the file cannot be read, otherwise as
    /// [`EngineConfig::from_json_str`].
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Load(e.to_string()))?;
        Self::from_json_str(&contents)
    }

    /// Effective per-trace step cap (always finite).
    pub fn step_cap(&self) -> usize {
        if self.max_steps == 0 {
            UNBOUNDED_STEP_CAP
        } else {
            self.max_steps
        }
    }

    /// Convert a pixel length to unit-square units for this window.
    #[inline]
    pub fn pixels_to_unit(&self, pixels: f64) -> f64 {
        pixels / f64::from(self.window_size)
    }

    /// Check the configuration can be evaluated without producing NaNs.
    ///
    /// # Errors
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.point_charges.is_empty() && self.charged_segments.is_empty() {
            return Err(ConfigError::NoSources);
        }

        for charge in &self.point_charges {
            require_finite("point_charges.position", charge.position.x)?;
            require_finite("point_charges.position", charge.position.y)?;
            require_finite("point_charges.magnitude", charge.magnitude)?;
        }
        for (index, segment) in self.charged_segments.iter().enumerate() {
            for v in [segment.start.x, segment.start.y, segment.end.x, segment.end.y] {
                require_finite("charged_segments.endpoint", v)?;
            }
            require_finite("charged_segments.magnitude", segment.magnitude)?;
            if segment.direction().is_none() {
                return Err(ConfigError::DegenerateSegment { index });
            }
        }

        let all_zero = self.point_charges.iter().all(|c| c.magnitude == 0.0)
            && self.charged_segments.iter().all(|s| s.magnitude == 0.0);
        if all_zero {
            return Err(ConfigError::AllZeroMagnitude);
        }

        require_positive("step_size", self.step_size)?;
        require_positive("seed_radius", self.seed_radius)?;
        require_positive("plate_seed_density", self.plate_seed_density)?;
        require_positive("plate_seed_offset", self.plate_seed_offset)?;
        require_positive("charge_proximity", self.charge_proximity)?;
        require_positive("plate_proximity", self.plate_proximity)?;
        require_positive("equipotential_bucket_width", self.equipotential_bucket_width)?;
        require_positive(
            "max_equipotential_segment_length",
            self.max_equipotential_segment_length,
        )?;
        require_positive("direction_tick_length", self.direction_tick_length)?;
        require_positive("max_arrow_length", self.max_arrow_length)?;

        require_count("grid_resolution", self.grid_resolution)?;
        require_count("seeds_per_charge", self.seeds_per_charge)?;
        require_count("max_equipotential_buckets", self.max_equipotential_buckets)?;
        require_count("flush_interval", self.flush_interval)?;
        require_count("window_size", self.window_size as usize)?;

        Ok(())
    }
}

fn require_finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { name })
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    require_finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn require_count(name: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::ZeroCount { name })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(EngineConfig::four_charges().validate().is_ok());
        assert!(EngineConfig::dipole().validate().is_ok());
        assert!(EngineConfig::parallel_plates().validate().is_ok());
        assert_eq!(EngineConfig::default(), EngineConfig::four_charges());
    }

    #[test]
    fn test_empty_configuration_rejected() {
        let config = EngineConfig {
            point_charges: Vec::new(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::NoSources));
    }

    #[test]
    fn test_all_zero_magnitudes_rejected() {
        let config = EngineConfig {
            point_charges: vec![PointCharge::new(0.4, 0.4, 0.0), PointCharge::new(0.6, 0.6, 0.0)],
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::AllZeroMagnitude));
    }

    #[test]
    fn test_degenerate_segment_rejected() {
        let p = Vec2::new(0.5, 0.5);
        let config = EngineConfig {
            charged_segments: vec![
                ChargedSegment::new(Vec2::new(0.1, 0.1), Vec2::new(0.2, 0.1), 1.0),
                ChargedSegment::new(p, p, 1.0),
            ],
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::DegenerateSegment { index: 1 })
        );
    }

    #[test]
    fn test_invalid_options_rejected() {
        let config = EngineConfig {
            step_size: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositive { name: "step_size", .. })
        ));

        let config = EngineConfig {
            seeds_per_charge: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroCount { name: "seeds_per_charge" })
        );

        let config = EngineConfig {
            point_charges: vec![PointCharge::new(f64::NAN, 0.5, 1.0)],
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NonFinite { .. })));
    }

    #[test]
    fn test_step_cap_is_always_finite() {
        let config = EngineConfig {
            max_steps: 0,
            ..Default::default()
        };
        assert_eq!(config.step_cap(), UNBOUNDED_STEP_CAP);
        assert_eq!(EngineConfig::default().step_cap(), 50);
    }

    #[test]
    fn test_json_uses_defaults_for_missing_keys() {
        let json = r#"{
            "point_charges": [{ "position": [0.25, 0.5], "magnitude": 2.0 }],
            "integration_method": "runge_kutta",
            "max_steps": 200
        }"#;
        let config = EngineConfig::from_json_str(json).expect("valid config");
        assert_eq!(config.point_charges.len(), 1);
        assert_eq!(config.point_charges[0].position, Vec2::new(0.25, 0.5));
        assert_eq!(config.integration_method, IntegrationMethod::RungeKutta);
        assert_eq!(config.max_steps, 200);
        assert_eq!(config.seeds_per_charge, 12);
    }

    #[test]
    fn test_json_errors() {
        assert!(matches!(
            EngineConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            EngineConfig::from_json_str(r#"{ "point_charges": [] }"#),
            Err(ConfigError::NoSources)
        ));
        assert!(matches!(
            EngineConfig::from_json_file("/nonexistent/efield.json"),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn test_pixels_to_unit() {
        let config = EngineConfig::default();
        assert_eq!(config.pixels_to_unit(64.0), 0.1);
    }
}
