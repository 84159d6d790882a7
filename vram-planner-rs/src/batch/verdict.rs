//! Plausibility check of a chosen batch size.
//!
//! The verdict never flips `is_valid`; it only attaches warnings and lowers
//! the confidence.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Utilization below this is flagged as wasteful.
pub const LOW_UTILIZATION_THRESHOLD: f64 = 0.3;

/// Utilization above this is flagged as risky.
pub const HIGH_UTILIZATION_THRESHOLD: f64 = 0.95;

/// Ratio between optimal and current batch size that is flagged.
pub const BATCH_RATIO_THRESHOLD: f64 = 8.0;

/// Fewer analysis points than this forces low confidence.
pub const MIN_ANALYSIS_POINTS: usize = 3;

/// How much a batch-size result can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// No issues found.
    High,
    /// One issue found.
    Medium,
    /// Several issues, too little data, or an invalid result.
    Low,
}

impl Confidence {
    fn from_issue_count(issues: usize) -> Self {
        match issues {
            0 => Self::High,
            1 => Self::Medium,
            _ => Self::Low,
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        })
    }
}

/// Validity and confidence of a batch optimization result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    /// Whether the result can be used as is.
    pub is_valid: bool,
    /// Why the result is invalid, if it is.
    pub error_message: Option<String>,
    /// Plausibility warnings.
    pub warnings: Vec<String>,
    /// Follow-up suggestions for the warnings.
    pub recommendations: Vec<String>,
    /// Trust level.
    pub confidence: Confidence,
}

impl ValidationVerdict {
    /// An invalid verdict carrying `message`.
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            is_valid: false,
            warnings: vec![message.clone()],
            error_message: Some(message),
            recommendations: Vec::new(),
            confidence: Confidence::Low,
        }
    }
}

/// Inspect a successful scan outcome for implausible values.
#[must_use]
pub fn assess(
    optimal_batch_size: u32,
    utilization_rate: f64,
    current_batch_size: u32,
    analysis_points: usize,
) -> ValidationVerdict {
    let mut warnings = Vec::new();
    let mut recommendations = Vec::new();

    if utilization_rate < LOW_UTILIZATION_THRESHOLD {
        warnings.push(format!(
            "Memory utilization of {:.1}% is low for the chosen batch size",
            utilization_rate * 100.0
        ));
        recommendations.push("Verify the memory budget; a smaller GPU may be sufficient".to_string());
    } else if utilization_rate > HIGH_UTILIZATION_THRESHOLD {
        warnings.push(format!(
            "Memory utilization of {:.1}% leaves almost no headroom",
            utilization_rate * 100.0
        ));
        recommendations.push("Lower the safety margin or the batch size before running".to_string());
    }

    let optimal = f64::from(optimal_batch_size.max(1));
    let current = f64::from(current_batch_size.max(1));
    if optimal.max(current) / optimal.min(current) >= BATCH_RATIO_THRESHOLD {
        warnings.push(format!(
            "Optimal batch size {optimal_batch_size} is far from the current batch size {current_batch_size}"
        ));
        recommendations.push("Change the batch size gradually and watch memory usage".to_string());
    }

    let too_few_points = analysis_points < MIN_ANALYSIS_POINTS;
    if too_few_points {
        warnings.push(format!(
            "Only {analysis_points} batch size(s) were analyzed; the estimate is coarse"
        ));
    }

    let confidence = if too_few_points {
        Confidence::Low
    } else {
        Confidence::from_issue_count(warnings.len())
    };

    ValidationVerdict {
        is_valid: true,
        error_message: None,
        warnings,
        recommendations,
        confidence,
    }
}
