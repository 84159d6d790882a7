//! Range checks for model hyperparameters.
//!
//! The validator never fails. Every check runs independently and each failure
//! contributes one message, so callers can show all problems at once.

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::params::ModelParameters;

/// Longest accepted sequence length.
pub const MAX_SEQUENCE_LENGTH: u32 = 32_768;

/// Largest accepted batch size.
pub const MAX_BATCH_SIZE: u32 = 1024;

/// Outcome of validating a parameter set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// `true` when `errors` is empty.
    pub is_valid: bool,
    /// One human-readable message per failed check.
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Convert into a `Result`, failing with [`PlannerError::InvalidParameters`].
    ///
    /// # Errors
    ///
    /// Returns an error carrying every message if the report is invalid.
    pub fn into_result(self) -> Result<()> {
        if self.is_valid {
            Ok(())
        } else {
            Err(PlannerError::InvalidParameters {
                errors: self.errors,
            })
        }
    }
}

/// Check every hyperparameter against its accepted range.
///
/// # Example
///
/// ```rust
/// use vram_planner_rs::{validate_model_parameters, ModelParameters};
///
/// let report = validate_model_parameters(&ModelParameters::default().with_batch_size(0));
/// assert!(!report.is_valid);
/// assert_eq!(report.errors.len(), 1);
/// ```
#[must_use]
pub fn validate_model_parameters(params: &ModelParameters) -> ValidationReport {
    let mut errors = Vec::new();

    if !(params.parameter_count.is_finite() && params.parameter_count > 0.0) {
        errors.push(format!(
            "Parameter count must be a finite number greater than 0 (got {})",
            params.parameter_count
        ));
    }

    if !(1..=MAX_SEQUENCE_LENGTH).contains(&params.sequence_length) {
        errors.push(format!(
            "Sequence length must be between 1 and {MAX_SEQUENCE_LENGTH} (got {})",
            params.sequence_length
        ));
    }

    if !(1..=MAX_BATCH_SIZE).contains(&params.batch_size) {
        errors.push(format!(
            "Batch size must be between 1 and {MAX_BATCH_SIZE} (got {})",
            params.batch_size
        ));
    }

    if params.hidden_size == 0 {
        errors.push("Hidden size must be greater than 0".to_string());
    }

    if params.num_layers == 0 {
        errors.push("Number of layers must be greater than 0".to_string());
    }

    if params.vocabulary_size == 0 {
        errors.push("Vocabulary size must be greater than 0".to_string());
    }

    ValidationReport::from_errors(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters_are_valid() {
        let report = validate_model_parameters(&ModelParameters::default());
        assert!(report.is_valid);
        assert!(report.errors.is_empty());
        assert!(report.into_result().is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let params = ModelParameters {
            parameter_count: 0.0,
            sequence_length: 0,
            batch_size: 0,
            hidden_size: 0,
            num_layers: 0,
            vocabulary_size: 0,
            ..ModelParameters::default()
        };
        let report = validate_model_parameters(&params);
        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 6);
    }

    #[test]
    fn test_messages_are_distinct() {
        let params = ModelParameters {
            parameter_count: -1.0,
            sequence_length: 0,
            batch_size: 0,
            hidden_size: 0,
            num_layers: 0,
            vocabulary_size: 0,
            ..ModelParameters::default()
        };
        let report = validate_model_parameters(&params);
        let unique: std::collections::HashSet<_> = report.errors.iter().collect();
        assert_eq!(unique.len(), report.errors.len());
    }

    #[test]
    fn test_upper_bounds() {
        let at_limit = ModelParameters::default()
            .with_sequence_length(MAX_SEQUENCE_LENGTH)
            .with_batch_size(MAX_BATCH_SIZE);
        assert!(validate_model_parameters(&at_limit).is_valid);

        let over = ModelParameters::default()
            .with_sequence_length(MAX_SEQUENCE_LENGTH + 1)
            .with_batch_size(MAX_BATCH_SIZE + 1);
        let report = validate_model_parameters(&over);
        assert_eq!(report.errors.len(), 2);
        assert!(report.errors[0].contains("Sequence length"));
        assert!(report.errors[1].contains("Batch size"));
    }

    #[test]
    fn test_non_finite_parameter_count() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let params = ModelParameters::new(bad, crate::Precision::Fp16);
            let report = validate_model_parameters(&params);
            assert!(!report.is_valid, "{bad} should be rejected");
            assert!(report.errors[0].contains("Parameter count"));
        }
    }

    #[test]
    fn test_into_result_carries_messages() {
        let report = validate_model_parameters(&ModelParameters::default().with_batch_size(0));
        match report.into_result() {
            Err(PlannerError::InvalidParameters { errors }) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("Batch size"));
            }
            other => panic!("expected InvalidParameters, got {other:?}"),
        }
    }
}
