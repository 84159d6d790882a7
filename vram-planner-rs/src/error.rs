//! Error types for memory planning operations.
//!
//! Two policies coexist in this crate:
//!
//! - **Fail-fast**: the memory estimator entry point and the utilization
//!   calculator reject invalid arguments immediately with a [`PlannerError`].
//! - **Fail-soft**: the batch-size optimizer never returns an error. Internal
//!   failures are folded into a result whose verdict is marked invalid.
//!
//! The parameter validator and the hardware recommendation engine never fail;
//! they report through their return values instead.
//!
//! # Example
//!
//! ```rust
//! use vram_planner_rs::{standardize, PlannerError, UtilizationConfig};
//!
//! let err = standardize(1.0, 0.0, &UtilizationConfig::default()).unwrap_err();
//! assert!(matches!(err, PlannerError::InvalidArgument { .. }));
//! ```

use thiserror::Error;

/// Result type alias for planner operations.
pub type Result<T> = std::result::Result<T, PlannerError>;

/// Errors that can occur while estimating memory or planning hardware.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlannerError {
    /// A numeric argument was outside its accepted domain.
    #[error("invalid argument '{name}' = {value}: {reason}")]
    InvalidArgument {
        /// Name of the offending argument.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Why the value was rejected.
        reason: String,
    },

    /// Model parameters failed validation.
    #[error("invalid model parameters: {}", errors.join("; "))]
    InvalidParameters {
        /// Every failed check, in validation order.
        errors: Vec<String>,
    },

    /// Unrecognized numeric precision name.
    #[error("unknown precision '{0}' (expected one of: fp32, fp16, int8, int4)")]
    UnknownPrecision(String),

    /// Unrecognized optimizer name.
    #[error("unknown optimizer '{0}' (expected one of: adam, adamw, sgd)")]
    UnknownOptimizer(String),

    /// Unrecognized calculation mode.
    #[error("unknown calculation mode '{0}' (expected inference or training)")]
    UnknownMode(String),

    /// Unrecognized recommendation sort key.
    #[error("unknown sort key '{0}' (expected one of: fit, price, memory, efficiency, cost-per-gb)")]
    UnknownSortKey(String),

    /// A computed estimate was NaN or infinite.
    #[error("non-finite estimate for {what}: {value}")]
    NonFiniteEstimate {
        /// The quantity being estimated.
        what: &'static str,
        /// The offending value.
        value: f64,
    },

    /// The requested memory budget cannot hold even the smallest configuration.
    #[error("configuration needs {required_gb:.2} GB but only {available_gb:.2} GB is available")]
    Infeasible {
        /// Memory required by the smallest configuration.
        required_gb: f64,
        /// Memory budget that was supplied.
        available_gb: f64,
    },

    /// Configuration error (invalid values or unreadable file).
    #[error("configuration error: {detail}")]
    ConfigError {
        /// Description of the configuration issue.
        detail: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PlannerError {
    /// Create an invalid argument error.
    pub fn invalid_argument(name: &'static str, value: f64, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            value,
            reason: reason.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(detail: impl Into<String>) -> Self {
        Self::ConfigError {
            detail: detail.into(),
        }
    }

    /// Fails with [`PlannerError::NonFiniteEstimate`] unless `value` is finite.
    pub(crate) fn ensure_finite(what: &'static str, value: f64) -> Result<f64> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::NonFiniteEstimate { what, value })
        }
    }

    /// Whether the caller can fix this error by changing its inputs.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidArgument { .. }
                | Self::InvalidParameters { .. }
                | Self::UnknownPrecision(_)
                | Self::UnknownOptimizer(_)
                | Self::UnknownMode(_)
                | Self::UnknownSortKey(_)
                | Self::Infeasible { .. }
                | Self::ConfigError { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = PlannerError::invalid_argument("gpu_memory_bytes", 0.0, "must be > 0");
        let msg = err.to_string();
        assert!(msg.contains("gpu_memory_bytes"));
        assert!(msg.contains("must be > 0"));
    }

    #[test]
    fn test_invalid_parameters_joins_errors() {
        let err = PlannerError::InvalidParameters {
            errors: vec!["first".into(), "second".into()],
        };
        assert_eq!(err.to_string(), "invalid model parameters: first; second");
    }

    #[test]
    fn test_infeasible_formats_gigabytes() {
        let err = PlannerError::Infeasible {
            required_gb: 326.0,
            available_gb: 80.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("326.00"));
        assert!(msg.contains("80.00"));
    }

    #[test]
    fn test_ensure_finite() {
        assert_eq!(PlannerError::ensure_finite("x", 1.5).unwrap(), 1.5);
        assert!(matches!(
            PlannerError::ensure_finite("x", f64::NAN),
            Err(PlannerError::NonFiniteEstimate { what: "x", .. })
        ));
        assert!(PlannerError::ensure_finite("x", f64::INFINITY).is_err());
    }

    #[test]
    fn test_user_errors() {
        assert!(PlannerError::UnknownPrecision("bf8".into()).is_user_error());
        assert!(PlannerError::config("bad").is_user_error());
        assert!(!PlannerError::NonFiniteEstimate {
            what: "activations",
            value: f64::NAN
        }
        .is_user_error());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.toml");
        let err: PlannerError = io_err.into();
        assert!(matches!(err, PlannerError::Io(_)));
        assert!(err.to_string().contains("missing.toml"));
    }
}
