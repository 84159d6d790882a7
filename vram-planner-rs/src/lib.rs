//! # vram-planner-rs
//!
//! GPU memory planning for large language models.
//!
//! Estimates how much memory a model needs for inference or training, ranks
//! hardware that can hold it, finds the largest batch size that fits a
//! memory budget, and turns any (needed, capacity) pair into a bounded
//! utilization figure with a qualitative rating.
//!
//! ## Quick Start
//!
//! ```rust
//! use vram_planner_rs::{
//!     calculate_memory_requirements, optimize_batch_size, CalculationMode, ModelParameters,
//! };
//!
//! let params = ModelParameters::from_preset("llama-7b")?;
//! let result = calculate_memory_requirements(&params, CalculationMode::Inference)?;
//! println!("{}", result.summary());
//!
//! let best = &result.recommendations[0];
//! assert!(best.suitable);
//!
//! let batch = optimize_batch_size(&params, 24.0, CalculationMode::Inference, None);
//! assert!(batch.is_valid());
//! # Ok::<(), vram_planner_rs::PlannerError>(())
//! ```
//!
//! ## Modules
//!
//! - [`precision`]: bytes per parameter, optimizer state multipliers, GB helpers
//! - [`params`]: model hyperparameters, calculation mode, presets
//! - [`validation`]: range checks that report instead of failing
//! - [`estimator`]: inference and training memory breakdowns
//! - [`hardware`]: static GPU catalog and recommendation ranking
//! - [`batch`]: batch-size search with advice and a confidence verdict
//! - [`utilization`]: standardized utilization and efficiency rating
//! - [`config`]: TOML-backed planner configuration
//! - [`error`]: error types and result alias
//!
//! ## Error policy
//!
//! The estimator and utilization calculator return [`Result`] and fail fast.
//! The batch optimizer always returns a [`BatchOptimizationResult`]; check
//! `validation.is_valid`. Validation and recommendation never fail.
//!
//! All GB figures are binary (1024^3 bytes).

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::unused_self)]

pub mod batch;
pub mod config;
pub mod error;
pub mod estimator;
pub mod hardware;
pub mod params;
pub mod precision;
pub mod utilization;
pub mod validation;

pub use batch::{
    optimize_batch_size, BatchAnalysisPoint, BatchOptimizationResult, BatchOptimizer,
    BatchOptimizerConfig, Confidence, PerformanceEstimate, ValidationVerdict,
};
pub use config::PlannerConfig;
pub use error::{PlannerError, Result};
pub use estimator::{
    calculate_memory_requirements, estimate_breakdown, InferenceMemory, MemoryBreakdown,
    MemoryCalculationResult, TrainingMemory,
};
pub use hardware::{
    find_hardware, recommend, recommend_for_result, EfficiencyTier, HardwareRecommendation,
    HardwareSpec, RecommendOptions, SortBy, HARDWARE_CATALOG,
};
pub use params::{CalculationMode, ModelParameters};
pub use precision::{format_gb, OptimizerKind, Precision, BYTES_PER_GB};
pub use utilization::{
    standardize, standardize_gb, EfficiencyRating, StandardizedUtilization, UtilizationConfig,
};
pub use validation::{validate_model_parameters, ValidationReport};
