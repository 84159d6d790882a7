//! Largest batch size that fits a memory budget.
//!
//! The search is a linear scan from batch size 1. Memory grows monotonically
//! with batch size, so the scan stops at the first candidate that exceeds the
//! unmargined budget. The selected batch size is the largest one whose usage
//! stays within `max_memory_gb * safety_margin`.
//!
//! The public entry points never fail. Precondition violations and estimator
//! errors are turned into a result whose verdict is invalid, with warnings
//! explaining what went wrong.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use super::advice::{advise, ScanSummary};
use super::verdict::{assess, ValidationVerdict};
use crate::error::{PlannerError, Result};
use crate::estimator::estimate_breakdown;
use crate::params::{CalculationMode, ModelParameters};
use crate::precision::format_gb;

/// Default fraction of the budget the selected batch may use.
pub const DEFAULT_SAFETY_MARGIN: f64 = 0.9;

/// Settings for [`BatchOptimizer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchOptimizerConfig {
    /// Fraction of the budget the selected batch may use, in `(0, 1]`.
    #[serde(default = "default_safety_margin")]
    pub safety_margin: f64,

    /// Largest batch size the scan tries.
    #[serde(default = "default_max_batch_candidates")]
    pub max_batch_candidates: u32,

    /// Largest memory budget accepted, in GB.
    #[serde(default = "default_max_memory_limit_gb")]
    pub max_memory_limit_gb: f64,
}

fn default_safety_margin() -> f64 {
    DEFAULT_SAFETY_MARGIN
}
fn default_max_batch_candidates() -> u32 {
    128
}
fn default_max_memory_limit_gb() -> f64 {
    1000.0
}

impl Default for BatchOptimizerConfig {
    fn default() -> Self {
        Self {
            safety_margin: default_safety_margin(),
            max_batch_candidates: default_max_batch_candidates(),
            max_memory_limit_gb: default_max_memory_limit_gb(),
        }
    }
}

impl BatchOptimizerConfig {
    /// Set the default safety margin.
    #[must_use]
    pub fn with_safety_margin(mut self, safety_margin: f64) -> Self {
        self.safety_margin = safety_margin;
        self
    }

    /// Set the largest batch size the scan tries.
    #[must_use]
    pub fn with_max_batch_candidates(mut self, max_batch_candidates: u32) -> Self {
        self.max_batch_candidates = max_batch_candidates;
        self
    }

    /// Set the largest accepted memory budget, in GB.
    #[must_use]
    pub fn with_max_memory_limit_gb(mut self, max_memory_limit_gb: f64) -> Self {
        self.max_memory_limit_gb = max_memory_limit_gb;
        self
    }

    /// Check that every field is in range.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::ConfigError`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if !(self.safety_margin > 0.0 && self.safety_margin <= 1.0) {
            return Err(PlannerError::config(format!(
                "batch.safety_margin must be in (0, 1] (got {})",
                self.safety_margin
            )));
        }
        if self.max_batch_candidates == 0 {
            return Err(PlannerError::config("batch.max_batch_candidates must be at least 1"));
        }
        if !(self.max_memory_limit_gb.is_finite() && self.max_memory_limit_gb > 0.0) {
            return Err(PlannerError::config(format!(
                "batch.max_memory_limit_gb must be a finite value > 0 (got {})",
                self.max_memory_limit_gb
            )));
        }
        Ok(())
    }
}

/// One evaluated batch size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchAnalysisPoint {
    /// Candidate batch size.
    pub batch_size: u32,
    /// Total memory in the scan's mode, in GB.
    pub memory_usage: f64,
    /// `memory_usage / max_memory_gb`.
    pub utilization_rate: f64,
    /// Whether usage fits the unmargined budget.
    pub within_limit: bool,
    /// Whether usage is above `max_memory_gb * safety_margin`.
    pub safety_margin_exceeded: bool,
    /// Relative throughput, see [`estimated_throughput`].
    pub estimated_throughput: f64,
    /// Named memory components, in GB.
    pub memory_breakdown: BTreeMap<String, f64>,
}

/// Expected performance of the selected batch size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceEstimate {
    /// Relative throughput of the selected batch size.
    pub throughput: f64,
    /// Throughput relative to batch size 1.
    pub speedup_vs_single: f64,
    /// Usage as a fraction of the margined budget.
    pub memory_efficiency: f64,
}

/// Outcome of a batch-size search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOptimizationResult {
    /// Selected batch size; 1 when the result is invalid.
    pub optimal_batch_size: u32,
    /// Memory at the selected batch size, in GB.
    pub memory_usage: f64,
    /// `memory_usage / max_memory_limit`.
    pub utilization_rate: f64,
    /// Every evaluated candidate, in ascending order.
    pub analysis_data: Vec<BatchAnalysisPoint>,
    /// Heuristic warnings.
    pub warnings: Vec<String>,
    /// Heuristic recommendations.
    pub recommendations: Vec<String>,
    /// Throughput and efficiency of the selected batch size.
    pub performance_estimate: PerformanceEstimate,
    /// Validity and confidence.
    pub validation: ValidationVerdict,
    /// Safety margin the search used.
    pub safety_margin: f64,
    /// Memory budget the search used, in GB.
    pub max_memory_limit: f64,
    /// Mode the search used.
    pub mode: CalculationMode,
}

impl BatchOptimizationResult {
    /// Whether the result can be used as is.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid
    }

    /// Serialize to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Relative throughput of a batch size: `b / (1 + 0.1 * log2(b))`.
///
/// Batch size 1 scores exactly 1. Larger batches gain sub-linearly.
#[must_use]
pub fn estimated_throughput(batch_size: u32) -> f64 {
    let b = f64::from(batch_size.max(1));
    b / (1.0 + 0.1 * b.log2())
}

struct ScanOutcome {
    points: Vec<BatchAnalysisPoint>,
    best: Option<(u32, f64)>,
    candidate_limit: u32,
}

/// Batch-size search with a fixed configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptimizer {
    config: BatchOptimizerConfig,
}

impl BatchOptimizer {
    /// Create an optimizer.
    #[must_use]
    pub fn new(config: BatchOptimizerConfig) -> Self {
        Self { config }
    }

    /// The optimizer's configuration.
    #[must_use]
    pub fn config(&self) -> &BatchOptimizerConfig {
        &self.config
    }

    /// Search with the configured safety margin.
    #[must_use]
    pub fn optimize(
        &self,
        params: &ModelParameters,
        max_memory_gb: f64,
        mode: CalculationMode,
    ) -> BatchOptimizationResult {
        self.optimize_with_margin(params, max_memory_gb, mode, self.config.safety_margin)
    }

    /// Search with an explicit safety margin.
    #[must_use]
    pub fn optimize_with_margin(
        &self,
        params: &ModelParameters,
        max_memory_gb: f64,
        mode: CalculationMode,
        safety_margin: f64,
    ) -> BatchOptimizationResult {
        let _span =
            tracing::debug_span!("optimize_batch_size", max_memory_gb, safety_margin, mode = %mode)
                .entered();

        match self.search(params, max_memory_gb, mode, safety_margin) {
            Ok(result) => result,
            Err(err) => {
                warn!(error = %err, "batch size search failed; returning degraded result");
                self.degraded(params, max_memory_gb, mode, safety_margin, &err)
            }
        }
    }

    fn search(
        &self,
        params: &ModelParameters,
        max_memory_gb: f64,
        mode: CalculationMode,
        safety_margin: f64,
    ) -> Result<BatchOptimizationResult> {
        self.check_preconditions(params, max_memory_gb, safety_margin)?;

        let base = estimate_breakdown(&params.with_batch_size(1))?;
        if base.inference.total > max_memory_gb {
            return Err(PlannerError::Infeasible {
                required_gb: base.inference.total,
                available_gb: max_memory_gb,
            });
        }

        let scan = self.scan(params, max_memory_gb, mode, safety_margin)?;

        let Some((optimal, usage)) = scan.best else {
            return Ok(self.no_fit(params, max_memory_gb, mode, safety_margin, scan));
        };

        let utilization_rate = usage / max_memory_gb;
        let advice = advise(&ScanSummary {
            params,
            mode,
            max_memory_gb,
            points: &scan.points,
            optimal_batch_size: optimal,
            candidate_limit: scan.candidate_limit,
        });
        let validation = assess(optimal, utilization_rate, params.batch_size, scan.points.len());

        let throughput = estimated_throughput(optimal);
        let performance_estimate = PerformanceEstimate {
            throughput,
            speedup_vs_single: throughput / estimated_throughput(1),
            memory_efficiency: usage / (max_memory_gb * safety_margin),
        };

        info!(
            optimal_batch_size = optimal,
            memory_gb = usage,
            utilization = utilization_rate,
            confidence = %validation.confidence,
            "selected batch size"
        );

        Ok(BatchOptimizationResult {
            optimal_batch_size: optimal,
            memory_usage: usage,
            utilization_rate,
            analysis_data: scan.points,
            warnings: advice.warnings,
            recommendations: advice.recommendations,
            performance_estimate,
            validation,
            safety_margin,
            max_memory_limit: max_memory_gb,
            mode,
        })
    }

    fn check_preconditions(
        &self,
        params: &ModelParameters,
        max_memory_gb: f64,
        safety_margin: f64,
    ) -> Result<()> {
        self.config.validate()?;

        let limit = self.config.max_memory_limit_gb;
        let mut errors = Vec::new();
        if !(max_memory_gb > 0.0 && max_memory_gb <= limit) {
            errors.push(format!(
                "Maximum memory must be greater than 0 and at most {limit} GB (got {max_memory_gb})"
            ));
        }
        if !(safety_margin > 0.0 && safety_margin <= 1.0) {
            errors.push(format!(
                "Safety margin must be greater than 0 and at most 1 (got {safety_margin})"
            ));
        }
        if params.batch_size == 0 {
            errors.push("Batch size must be greater than 0".to_string());
        }
        if !(params.parameter_count.is_finite() && params.parameter_count > 0.0) {
            errors.push(format!(
                "Parameter count must be a finite number greater than 0 (got {})",
                params.parameter_count
            ));
        }
        if params.sequence_length == 0 {
            errors.push("Sequence length must be greater than 0".to_string());
        }
        if params.hidden_size == 0 {
            errors.push("Hidden size must be greater than 0".to_string());
        }
        if params.num_layers == 0 {
            errors.push("Number of layers must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(PlannerError::InvalidParameters { errors })
        }
    }

    fn candidate_limit(&self, max_memory_gb: f64) -> u32 {
        // budget is validated to a finite value no larger than the configured limit
        let by_memory = (max_memory_gb * 2.0).floor() as u32;
        by_memory.min(self.config.max_batch_candidates).max(1)
    }

    fn scan(
        &self,
        params: &ModelParameters,
        max_memory_gb: f64,
        mode: CalculationMode,
        safety_margin: f64,
    ) -> Result<ScanOutcome> {
        let candidate_limit = self.candidate_limit(max_memory_gb);
        let margined = max_memory_gb * safety_margin;
        let mut points = Vec::new();
        let mut best = None;

        for batch_size in 1..=candidate_limit {
            let breakdown = estimate_breakdown(&params.with_batch_size(batch_size))?;
            let usage = breakdown.total_for(mode);
            let within_limit = usage <= max_memory_gb;
            let safety_margin_exceeded = usage > margined;

            trace!(
                batch_size,
                memory_gb = usage,
                within_limit,
                safety_margin_exceeded,
                "evaluated candidate"
            );

            points.push(BatchAnalysisPoint {
                batch_size,
                memory_usage: usage,
                utilization_rate: usage / max_memory_gb,
                within_limit,
                safety_margin_exceeded,
                estimated_throughput: estimated_throughput(batch_size),
                memory_breakdown: breakdown.components(mode),
            });

            if !safety_margin_exceeded {
                best = Some((batch_size, usage));
            }
            if !within_limit {
                debug!(batch_size, memory_gb = usage, "budget exceeded; stopping scan");
                break;
            }
        }

        Ok(ScanOutcome {
            points,
            best,
            candidate_limit,
        })
    }

    fn no_fit(
        &self,
        params: &ModelParameters,
        max_memory_gb: f64,
        mode: CalculationMode,
        safety_margin: f64,
        scan: ScanOutcome,
    ) -> BatchOptimizationResult {
        let usage = scan.points.first().map_or(0.0, |p| p.memory_usage);
        let message = format!(
            "No batch size fits within {} ({:.0}% of {}) in {mode} mode; batch size 1 needs {}",
            format_gb(max_memory_gb * safety_margin),
            safety_margin * 100.0,
            format_gb(max_memory_gb),
            format_gb(usage)
        );
        warn!(memory_gb = usage, max_memory_gb, "no batch size fits the margined budget");

        let mut validation = ValidationVerdict::invalid(message.clone());
        validation.recommendations = remediation(params, mode);

        BatchOptimizationResult {
            optimal_batch_size: 1,
            memory_usage: usage,
            utilization_rate: usage / max_memory_gb,
            analysis_data: scan.points,
            warnings: vec![message],
            recommendations: remediation(params, mode),
            performance_estimate: PerformanceEstimate {
                throughput: estimated_throughput(1),
                speedup_vs_single: 1.0,
                memory_efficiency: usage / (max_memory_gb * safety_margin),
            },
            validation,
            safety_margin,
            max_memory_limit: max_memory_gb,
            mode,
        }
    }

    fn degraded(
        &self,
        params: &ModelParameters,
        max_memory_gb: f64,
        mode: CalculationMode,
        safety_margin: f64,
        err: &PlannerError,
    ) -> BatchOptimizationResult {
        let usage = estimate_breakdown(&params.with_batch_size(1))
            .map(|b| b.total_for(mode))
            .unwrap_or(0.0);
        let utilization_rate = if max_memory_gb.is_finite() && max_memory_gb > 0.0 {
            usage / max_memory_gb
        } else {
            0.0
        };

        let mut warnings = match err {
            PlannerError::InvalidParameters { errors } => errors.clone(),
            other => vec![other.to_string()],
        };
        if warnings.is_empty() {
            warnings.push("Batch size optimization failed".to_string());
        }

        let mut validation = ValidationVerdict::invalid(err.to_string());
        validation.recommendations = remediation(params, mode);

        BatchOptimizationResult {
            optimal_batch_size: 1,
            memory_usage: usage,
            utilization_rate,
            analysis_data: Vec::new(),
            warnings,
            recommendations: remediation(params, mode),
            performance_estimate: PerformanceEstimate {
                throughput: estimated_throughput(1),
                speedup_vs_single: 1.0,
                memory_efficiency: 0.0,
            },
            validation,
            safety_margin,
            max_memory_limit: max_memory_gb,
            mode,
        }
    }
}

fn remediation(params: &ModelParameters, mode: CalculationMode) -> Vec<String> {
    let mut steps = vec![
        "Increase the available GPU memory or spread the model across more GPUs".to_string(),
        "Reduce the parameter count or sequence length".to_string(),
    ];
    if let Some(narrower) = params.precision.narrower() {
        steps.push(format!("Use quantization ({narrower}) to shrink weight memory"));
    }
    if mode == CalculationMode::Training {
        steps.push("Use an optimizer with less state, such as SGD".to_string());
    }
    steps
}

/// Find the largest batch size whose memory fits `max_memory_gb * safety_margin`.
///
/// `safety_margin` defaults to 0.9. Never fails: invalid inputs produce a
/// result with `validation.is_valid == false` and `optimal_batch_size == 1`.
///
/// # Example
///
/// ```rust
/// use vram_planner_rs::{optimize_batch_size, CalculationMode, ModelParameters};
///
/// let result = optimize_batch_size(&ModelParameters::default(), 24.0, CalculationMode::Inference, None);
/// assert!(result.is_valid());
/// assert_eq!(result.optimal_batch_size, 2);
/// assert!(result.memory_usage <= 24.0 * 0.9);
/// ```
#[must_use]
pub fn optimize_batch_size(
    params: &ModelParameters,
    max_memory_gb: f64,
    mode: CalculationMode,
    safety_margin: Option<f64>,
) -> BatchOptimizationResult {
    let optimizer = BatchOptimizer::default();
    let margin = safety_margin.unwrap_or(optimizer.config().safety_margin);
    optimizer.optimize_with_margin(params, max_memory_gb, mode, margin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::verdict::Confidence;
    use crate::precision::Precision;

    fn seven_b() -> ModelParameters {
        ModelParameters::default()
    }

    fn tiny() -> ModelParameters {
        ModelParameters::new(0.1, Precision::Int4)
            .with_sequence_length(128)
            .with_shape(512, 4)
    }

    #[test]
    fn test_throughput_heuristic() {
        assert_eq!(estimated_throughput(1), 1.0);
        assert!((estimated_throughput(2) - 2.0 / 1.1).abs() < 1e-12);
        assert!(estimated_throughput(64) > estimated_throughput(32));
        assert!(estimated_throughput(64) < 64.0);
    }

    #[test]
    fn test_7b_on_24gb() {
        // batch 1: 17.24 GB, batch 2: 21.44 GB (<= 21.6), batch 3: 25.64 GB (> 24)
        let result = optimize_batch_size(&seven_b(), 24.0, CalculationMode::Inference, None);
        assert!(result.is_valid());
        assert_eq!(result.optimal_batch_size, 2);
        assert_eq!(result.analysis_data.len(), 3);
        assert!(result.analysis_data[1].within_limit);
        assert!(!result.analysis_data[1].safety_margin_exceeded);
        assert!(!result.analysis_data[2].within_limit);
        assert!(result.analysis_data[2].safety_margin_exceeded);
        assert!(result.memory_usage <= 24.0 * 0.9);
        assert_eq!(result.validation.confidence, Confidence::High);
        assert_eq!(result.safety_margin, 0.9);
        assert_eq!(result.max_memory_limit, 24.0);
    }

    #[test]
    fn test_analysis_points_are_consistent() {
        let result = optimize_batch_size(&seven_b(), 48.0, CalculationMode::Inference, Some(0.8));
        for (i, point) in result.analysis_data.iter().enumerate() {
            assert_eq!(point.batch_size as usize, i + 1);
            assert_eq!(point.within_limit, point.memory_usage <= 48.0);
            assert_eq!(point.safety_margin_exceeded, point.memory_usage > 48.0 * 0.8);
            assert!((point.utilization_rate - point.memory_usage / 48.0).abs() < 1e-12);
            let sum: f64 = point.memory_breakdown.values().sum();
            assert!((sum - point.memory_usage).abs() < 1e-9);
        }
    }

    #[test]
    fn test_limit_and_margin_flags_are_distinct() {
        // margin 12 GB: batch 1 (17.24) and 2 (21.44) fit 24 GB but not the margin
        let result = optimize_batch_size(&seven_b(), 24.0, CalculationMode::Inference, Some(0.5));
        let flags: Vec<_> = result
            .analysis_data
            .iter()
            .map(|p| (p.batch_size, p.within_limit, p.safety_margin_exceeded))
            .collect();
        assert_eq!(flags, vec![(1, true, true), (2, true, true), (3, false, true)]);
        assert!(!result.is_valid());
        assert_eq!(result.optimal_batch_size, 1);
    }

    #[test]
    fn test_infeasible_floor() {
        let params = ModelParameters::new(70.0, Precision::Fp16);
        let result = optimize_batch_size(&params, 24.0, CalculationMode::Inference, None);
        assert!(!result.is_valid());
        assert_eq!(result.optimal_batch_size, 1);
        assert!(!result.warnings.is_empty());
        assert!(result.memory_usage > 24.0);
        assert!(result.recommendations.iter().any(|r| r.contains("quantization")));
    }

    #[test]
    fn test_training_without_fit_is_invalid() {
        // inference floor passes (17.2 GB) but training at batch 1 needs ~60 GB
        let result = optimize_batch_size(&seven_b(), 24.0, CalculationMode::Training, None);
        assert!(!result.is_valid());
        assert_eq!(result.optimal_batch_size, 1);
        assert_eq!(result.analysis_data.len(), 1);
        assert!(!result.warnings.is_empty());
        assert!(result.recommendations.iter().any(|r| r.contains("SGD")));
    }

    #[test]
    fn test_invalid_arguments_degrade() {
        for (max, margin) in [(0.0, 0.9), (-4.0, 0.9), (2000.0, 0.9), (24.0, 0.0), (24.0, 1.5), (f64::NAN, 0.9)] {
            let result = optimize_batch_size(&seven_b(), max, CalculationMode::Inference, Some(margin));
            assert!(!result.is_valid(), "max={max} margin={margin}");
            assert_eq!(result.optimal_batch_size, 1);
            assert!(!result.warnings.is_empty());
            assert!(result.validation.error_message.is_some());
        }
    }

    #[test]
    fn test_degraded_uses_batch_one_fallback() {
        let result = optimize_batch_size(&seven_b(), 0.0, CalculationMode::Inference, None);
        assert!((result.memory_usage - 17.24).abs() < 0.01);
        assert_eq!(result.utilization_rate, 0.0);
    }

    #[test]
    fn test_degraded_fallback_failure_is_zero() {
        let params = ModelParameters::new(1e300, Precision::Fp32);
        let result = optimize_batch_size(&params, 24.0, CalculationMode::Inference, None);
        assert!(!result.is_valid());
        assert_eq!(result.memory_usage, 0.0);
    }

    #[test]
    fn test_zero_batch_size_degrades() {
        let params = seven_b().with_batch_size(0);
        let result = optimize_batch_size(&params, 24.0, CalculationMode::Inference, None);
        assert!(!result.is_valid());
        assert!(result.warnings.iter().any(|w| w.contains("Batch size")));
    }

    #[test]
    fn test_candidate_cap() {
        let result = optimize_batch_size(&tiny(), 80.0, CalculationMode::Inference, None);
        assert!(result.is_valid());
        assert_eq!(result.optimal_batch_size, 128);
        assert_eq!(result.analysis_data.len(), 128);
        // far from current batch 1 and low utilization
        assert_eq!(result.validation.confidence, Confidence::Low);
    }

    #[test]
    fn test_small_budget_limits_candidates() {
        let params = ModelParameters::new(0.01, Precision::Int4)
            .with_sequence_length(64)
            .with_shape(128, 2);
        let result = optimize_batch_size(&params, 0.4, CalculationMode::Inference, None);
        assert_eq!(result.analysis_data.len(), 1);
        assert_eq!(result.optimal_batch_size, 1);
        assert_eq!(result.validation.confidence, Confidence::Low);
    }

    #[test]
    fn test_custom_candidate_limit() {
        let optimizer = BatchOptimizer::new(BatchOptimizerConfig::default().with_max_batch_candidates(16));
        let result = optimizer.optimize(&tiny(), 80.0, CalculationMode::Inference);
        assert_eq!(result.optimal_batch_size, 16);
    }

    #[test]
    fn test_invalid_config_degrades() {
        let optimizer = BatchOptimizer::new(BatchOptimizerConfig::default().with_max_batch_candidates(0));
        let result = optimizer.optimize(&seven_b(), 24.0, CalculationMode::Inference);
        assert!(!result.is_valid());
    }

    #[test]
    fn test_performance_estimate() {
        let result = optimize_batch_size(&seven_b(), 24.0, CalculationMode::Inference, None);
        let perf = result.performance_estimate;
        assert!((perf.throughput - 2.0 / 1.1).abs() < 1e-12);
        assert_eq!(perf.speedup_vs_single, perf.throughput);
        assert!((perf.memory_efficiency - result.memory_usage / 21.6).abs() < 1e-12);
        assert!(perf.memory_efficiency <= 1.0);
    }

    #[test]
    fn test_result_json() {
        let result = optimize_batch_size(&seven_b(), 24.0, CalculationMode::Inference, None);
        let json = result.to_json().unwrap();
        assert!(json.contains("\"optimal_batch_size\": 2"));
        assert!(json.contains("\"confidence\": \"high\""));
    }

    #[test]
    fn test_config_defaults_from_toml() {
        let config: BatchOptimizerConfig = toml::from_str("safety_margin = 0.8").unwrap();
        assert_eq!(config.safety_margin, 0.8);
        assert_eq!(config.max_batch_candidates, 128);
        assert_eq!(config.max_memory_limit_gb, 1000.0);
        assert!(config.validate().is_ok());
        assert!(BatchOptimizerConfig::default().with_safety_margin(0.0).validate().is_err());
    }
}
