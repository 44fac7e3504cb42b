use std::fmt;

/// Error type for scale and precision configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A scale value was NaN or infinite.
    NonNumericScale { option: &'static str },
    /// The scale expanded to no values at all.
    EmptyScale,
    /// The range's upper bound was below its lower bound.
    InvalidRange { first: f64, last: f64 },
    /// The step was non-positive, non-finite, or underivable.
    InvalidStep { step: f64 },
    /// The precision override was not a non-negative integer.
    InvalidPrecision { given: i64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonNumericScale { option } => {
                write!(f, "scale {} must consist of finite numeric values only", option)
            }
            ConfigError::EmptyScale => write!(f, "scale must contain at least one value"),
            ConfigError::InvalidRange { first, last } => {
                write!(f, "scale range is inverted: {}..{}", first, last)
            }
            ConfigError::InvalidStep { step } => {
                write!(f, "scale step must be positive and finite (got {})", step)
            }
            ConfigError::InvalidPrecision { given } => {
                write!(f, "precision must be a non-negative integer (got {})", given)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
