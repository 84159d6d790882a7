//! Planner configuration.
//!
//! Every section is optional in TOML; missing fields fall back to their
//! defaults.
//!
//! ```toml
//! [utilization]
//! fragmentation_factor = 0.08
//! system_reserved_gb = 1.0
//! driver_overhead_gb = 0.5
//!
//! [batch]
//! safety_margin = 0.9
//! max_batch_candidates = 128
//!
//! [recommend]
//! sort_by = "price"
//! budget = 5000.0
//! max_results = 5
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::batch::{BatchOptimizer, BatchOptimizerConfig};
use crate::error::{PlannerError, Result};
use crate::hardware::RecommendOptions;
use crate::utilization::UtilizationConfig;

/// Aggregate configuration for the planner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Overheads for standardized utilization.
    #[serde(default)]
    pub utilization: UtilizationConfig,

    /// Batch-size search settings.
    #[serde(default)]
    pub batch: BatchOptimizerConfig,

    /// Hardware recommendation options.
    #[serde(default)]
    pub recommend: RecommendOptions,
}

impl PlannerConfig {
    /// Parse a TOML string.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::ConfigError`] if parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| PlannerError::config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::Io`] if the file cannot be read, or
    /// [`PlannerError::ConfigError`] if it cannot be parsed or validated.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded planner config");
        Ok(config)
    }

    /// Save to a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::ConfigError`] if serialization fails, or
    /// [`PlannerError::Io`] if the file cannot be written.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PlannerError::config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::ConfigError`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        self.utilization.validate()?;
        self.batch.validate()?;
        if let Some(budget) = self.recommend.budget {
            if budget.is_nan() {
                return Err(PlannerError::config("recommend.budget must be a number"));
            }
        }
        Ok(())
    }

    /// Recommendation options with this config's utilization overheads.
    #[must_use]
    pub fn recommend_options(&self) -> RecommendOptions {
        self.recommend.with_utilization(self.utilization)
    }

    /// A batch optimizer using this config's batch settings.
    #[must_use]
    pub fn batch_optimizer(&self) -> BatchOptimizer {
        BatchOptimizer::new(self.batch)
    }
}
