use thiserror::Error;

/// Top-level error type for strider.
#[derive(Debug, Error)]
pub enum StriderError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Geometry error: {0}")]
    Geometry(#[from] GeometryError),

    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("Gait error: {0}")]
    Gait(#[from] GaitError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid cycle_time: {0} (must be > 0)")]
    InvalidCycleTime(f64),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Geometry kernel errors.
///
/// Copy + static messages for cheap propagation in hot paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("Degenerate input: {0}")]
    DegenerateInput(&'static str),
}

/// Kinematic chain construction errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChainError {
    #[error("Invalid link length: {0} (must be > 0)")]
    NonPositiveLinkLength(f64),

    #[error("Joint axis must have non-zero length")]
    ZeroLengthAxis,

    #[error("Joint direction must have non-zero length")]
    ZeroLengthDirection,

    #[error("Chain element out of order: expected a {expected}, got a {got}")]
    OutOfOrder {
        expected: &'static str,
        got: &'static str,
    },

    #[error("Chain {0} has no links")]
    Empty(String),
}

/// Gait construction and runtime errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GaitError {
    #[error("Unknown gait pattern: {0}")]
    UnknownPattern(String),

    #[error("Invalid duty factor: {0} (must be in (0, 1])")]
    InvalidDutyFactor(f64),

    #[error("Pattern {pattern} is not suitable for {legs} legs")]
    UnsuitableLegCount { pattern: String, legs: usize },

    #[error("Unknown leg: {0}")]
    UnknownLeg(String),

    #[error("Duplicate leg: {0}")]
    DuplicateLeg(String),

    #[error("Pattern {pattern} requires leg {leg}")]
    MissingLeg { pattern: String, leg: String },

    #[error("No legs given")]
    NoLegs,

    #[error("Invalid leg identifier: {0}")]
    InvalidLegId(String),

    #[error("Motion command contains a non-finite value")]
    InvalidCommand,

    #[error("Invalid timestep: {0} (must be finite and >= 0)")]
    InvalidTimestep(f64),
}
