//! Configuration errors
//!
//! Numerical edge cases (singularities, degenerate geometry) are recovered
//! locally and never surface here. Only an unusable configuration is fatal,
//! and it is rejected before any field is evaluated.

use std::fmt;

/// Error raised while loading or validating an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Neither point charges nor charged segments were configured
    NoSources,
    /// Every configured source has zero magnitude
    AllZeroMagnitude,
    /// A charged segment has coincident endpoints
    DegenerateSegment { index: usize },
    /// A numeric option or source coordinate is NaN or infinite
    NonFinite { name: &'static str },
    /// A length or width option must be strictly positive
    NonPositive { name: &'static str, value: f64 },
    /// A count option must be at least one
    ZeroCount { name: &'static str },
    /// Configuration file could not be read
    Load(String),
    /// Configuration file could not be parsed
    Parse(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoSources => write!(f, "No point charges or charged segments configured"),
            ConfigError::AllZeroMagnitude => {
                write!(f, "All configured sources have zero magnitude")
            }
            ConfigError::DegenerateSegment { index } => {
                write!(f, "Charged segment {index} has zero length")
            }
            ConfigError::NonFinite { name } => write!(f, "Option '{name}' must be finite"),
            ConfigError::NonPositive { name, value } => {
                write!(f, "Option '{name}' must be positive, got {value}")
            }
            ConfigError::ZeroCount { name } => write!(f, "Option '{name}' must be at least 1"),
            ConfigError::Load(msg) => write!(f, "Failed to load configuration: {msg}"),
            ConfigError::Parse(msg) => write!(f, "Failed to parse configuration: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
