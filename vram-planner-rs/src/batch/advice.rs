//! Heuristic advice attached to a finished batch-size scan.

use serde::{Deserialize, Serialize};

use super::optimizer::BatchAnalysisPoint;
use crate::params::{CalculationMode, ModelParameters};

const LOW_AVERAGE_UTILIZATION: f64 = 0.3;
const HIGH_AVERAGE_UTILIZATION: f64 = 0.8;
const BASE_MEMORY_SHARE: f64 = 0.7;
const LONG_SEQUENCE_LENGTH: u32 = 4096;
const SMALL_BATCH_SIZE: u32 = 4;
const ACCUMULATION_THRESHOLD: u32 = 8;
const TARGET_EFFECTIVE_BATCH: u32 = 32;

/// Warnings and recommendations for a scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advice {
    /// Things the caller should be aware of.
    pub warnings: Vec<String>,
    /// Suggested actions.
    pub recommendations: Vec<String>,
}

/// Inputs to [`advise`].
#[derive(Debug, Clone, Copy)]
pub struct ScanSummary<'a> {
    /// Parameters the scan started from.
    pub params: &'a ModelParameters,
    /// Mode the scan was run in.
    pub mode: CalculationMode,
    /// Unmargined memory budget, in GB.
    pub max_memory_gb: f64,
    /// Every evaluated point, in ascending batch order.
    pub points: &'a [BatchAnalysisPoint],
    /// Selected batch size.
    pub optimal_batch_size: u32,
    /// Largest batch size the scan was allowed to try.
    pub candidate_limit: u32,
}

/// Build advice for a completed scan.
#[must_use]
pub fn advise(summary: &ScanSummary<'_>) -> Advice {
    let mut advice = Advice::default();
    let optimal = summary.optimal_batch_size;

    let valid: Vec<&BatchAnalysisPoint> = summary
        .points
        .iter()
        .filter(|p| !p.safety_margin_exceeded)
        .collect();
    if !valid.is_empty() {
        let average = valid.iter().map(|p| p.utilization_rate).sum::<f64>() / valid.len() as f64;
        if average < LOW_AVERAGE_UTILIZATION {
            advice.warnings.push(format!(
                "Average memory utilization across feasible batch sizes is only {:.1}%",
                average * 100.0
            ));
            advice
                .recommendations
                .push("A smaller GPU or a larger model would use this budget better".to_string());
        } else if average > HIGH_AVERAGE_UTILIZATION {
            advice.warnings.push(format!(
                "Average memory utilization across feasible batch sizes is {:.1}%; headroom is tight",
                average * 100.0
            ));
            advice
                .recommendations
                .push("Monitor for fragmentation and out-of-memory errors at runtime".to_string());
        }
    }

    if valid.len() == 1 {
        advice
            .warnings
            .push("Only batch size 1 fits within the safety margin".to_string());
        advice.recommendations.push(
            "Use gradient accumulation to reach a larger effective batch size".to_string(),
        );
    }
    let last_fits = summary.points.last().is_some_and(|p| !p.safety_margin_exceeded);
    if optimal == summary.candidate_limit && last_fits && summary.candidate_limit > 1 {
        advice.recommendations.push(format!(
            "Memory allows batch sizes beyond {}; the search stopped at its candidate limit",
            summary.candidate_limit
        ));
    }

    match summary.mode {
        CalculationMode::Training => {
            if optimal < ACCUMULATION_THRESHOLD {
                let steps = TARGET_EFFECTIVE_BATCH.div_ceil(optimal.max(1));
                advice.recommendations.push(format!(
                    "Accumulate gradients over {steps} steps for an effective batch size of {}",
                    steps * optimal.max(1)
                ));
            }
            advice.recommendations.push(
                "Enable gradient checkpointing to trade compute for activation memory".to_string(),
            );
        }
        CalculationMode::Inference => {
            advice.recommendations.push(format!(
                "Batch size {optimal} maximizes throughput; use batch size 1 for the lowest latency"
            ));
        }
    }

    if let Some(base) = summary.points.first() {
        let share = base.memory_usage / summary.max_memory_gb;
        if share > BASE_MEMORY_SHARE {
            advice.warnings.push(format!(
                "Batch size 1 already uses {:.1}% of the memory budget",
                share * 100.0
            ));
            advice.recommendations.push(match summary.params.precision.narrower() {
                Some(narrower) => format!(
                    "Quantize from {} to {narrower} to halve weight memory",
                    summary.params.precision
                ),
                None => "Weights are already int4; reduce model size or shard across GPUs".to_string(),
            });
        }
    }

    if summary.params.sequence_length >= LONG_SEQUENCE_LENGTH && optimal <= SMALL_BATCH_SIZE {
        advice.warnings.push(format!(
            "Sequence length {} limits the batch size to {optimal}",
            summary.params.sequence_length
        ));
        advice.recommendations.push(
            "Shorten sequences or use memory-efficient attention to fit larger batches".to_string(),
        );
    }

    advice
}
