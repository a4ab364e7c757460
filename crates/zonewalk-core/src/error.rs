use thiserror::Error;

/// Rejected generation or agent parameters.
///
/// Only configuration can fail; the algorithms themselves degrade quietly
/// (short growth, fewer houses, fallback spawns) instead of erroring.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid {rows}x{cols} is smaller than the {min}x{min} minimum")]
    GridTooSmall { rows: usize, cols: usize, min: usize },

    #[error("{name} must be a probability in [0, 1], got {value}")]
    InvalidProbability { name: &'static str, value: f64 },

    #[error("{name} range {min}..={max} is empty or inverted")]
    InvalidRange { name: &'static str, min: usize, max: usize },

    #[error("{name} target of {target} cells exceeds the {cells}-cell grid")]
    TargetTooLarge { name: &'static str, target: usize, cells: usize },

    #[error("cooling rate must lie strictly between 0 and 1, got {0}")]
    InvalidCoolingRate(f64),

    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidTemperature { name: &'static str, value: f64 },

    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidDistance { name: &'static str, value: f64 },

    #[error("malformed config JSON: {0}")]
    Json(String),
}
