//! Batch-size search under a memory budget.

pub mod advice;
pub mod optimizer;
pub mod verdict;

pub use advice::{advise, Advice, ScanSummary};
pub use optimizer::{
    estimated_throughput, optimize_batch_size, BatchAnalysisPoint, BatchOptimizationResult,
    BatchOptimizer, BatchOptimizerConfig, PerformanceEstimate, DEFAULT_SAFETY_MARGIN,
};
pub use verdict::{assess, Confidence, ValidationVerdict};
