// src/error.rs
use std::fmt;

/// Error type for every fallible operation in bsm-pricer
#[derive(Debug, Clone, PartialEq)]
pub enum PricingError {
    /// A market input violates its domain (non-positive spot or strike,
    /// negative maturity or volatility)
    InvalidInput {
        field: String,
        value: f64,
        constraint: String,
    },

    /// A market input is NaN or infinite, usually an upstream parse failure
    NonFiniteInput { field: String, value: f64 },

    /// Finite inputs produced a non-finite intermediate or price
    NumericalOverflow { quantity: String, value: f64 },

    /// Invalid batch or sampler configuration
    InvalidConfiguration { field: String, reason: String },
}

impl PricingError {
    /// Name of the offending input or configuration field, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            PricingError::InvalidInput { field, .. }
            | PricingError::NonFiniteInput { field, .. }
            | PricingError::InvalidConfiguration { field, .. } => Some(field),
            PricingError::NumericalOverflow { .. } => None,
        }
    }
}

impl fmt::Display for PricingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PricingError::InvalidInput {
                field,
                value,
                constraint,
            } => {
                write!(f, "Invalid input '{}' = {}: {}", field, value, constraint)
            }
            PricingError::NonFiniteInput { field, value } => {
                write!(
                    f,
                    "Non-finite input '{}' = {}: must be a finite number",
                    field, value
                )
            }
            PricingError::NumericalOverflow { quantity, value } => {
                write!(
                    f,
                    "Numerical overflow: {} evaluated to {}",
                    quantity, value
                )
            }
            PricingError::InvalidConfiguration { field, reason } => {
                write!(f, "Invalid configuration for '{}': {}", field, reason)
            }
        }
    }
}

impl std::error::Error for PricingError {}

/// Result type alias for bsm-pricer operations
pub type BsResult<T> = Result<T, PricingError>;

/// Validation utilities
pub mod validation {
    use super::{BsResult, PricingError};

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> BsResult<()> {
        if !value.is_finite() {
            Err(PricingError::NonFiniteInput {
                field: name.to_string(),
                value,
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> BsResult<()> {
        if value <= 0.0 {
            Err(PricingError::InvalidInput {
                field: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> BsResult<()> {
        if value < 0.0 {
            Err(PricingError::InvalidInput {
                field: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }
}
