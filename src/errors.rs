use thiserror::Error;

/// Raised before a run starts: bad input values, unreadable tables or files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("atmosphere table is empty")]
    EmptyAtmosphereTable,

    #[error("atmosphere table altitudes must be strictly increasing (row {row})")]
    UnsortedAtmosphereTable { row: usize },

    #[error("atmosphere table density at row {row} must be finite and non-negative")]
    InvalidDensity { row: usize },

    #[error("invalid launch epoch `{value}`: {reason}")]
    InvalidEpoch { value: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// Raised by the force model when a state cannot be evaluated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DynamicsError {
    #[error("vehicle mass depleted ({mass} kg)")]
    MassDepleted { mass: f64 },

    #[error("non-finite {quantity}")]
    NonFinite { quantity: &'static str },
}
