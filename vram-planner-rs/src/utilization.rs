//! Standardized memory utilization.
//!
//! Turns a raw (needed, capacity) pair into a bounded utilization figure and a
//! qualitative rating. Capacity is reduced by a fixed system and driver
//! reservation; the need is inflated by an allocator fragmentation factor.
//!
//! | Rating | Practical utilization `U` |
//! |--------|---------------------------|
//! | excellent | `0.70 <= U <= 0.85` |
//! | good | `0.50 <= U <= 0.95` |
//! | fair | `0.30 <= U <= 1.00` |
//! | poor | anything else |
//!
//! Bands overlap; they are checked top to bottom and the first match wins.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::precision::BYTES_PER_GB;

/// Upper bound for both utilization ratios.
pub const MAX_UTILIZATION_RATIO: f64 = 10.0;

/// Upper bound for the utilization percentage.
pub const MAX_UTILIZATION_PERCENT: f64 = 1000.0;

/// Overheads used when standardizing utilization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UtilizationConfig {
    /// Fraction of the need lost to allocator fragmentation.
    #[serde(default = "default_fragmentation_factor")]
    pub fragmentation_factor: f64,

    /// Memory held by the OS and other processes, in GB.
    #[serde(default = "default_system_reserved_gb")]
    pub system_reserved_gb: f64,

    /// Memory held by the driver and runtime context, in GB.
    #[serde(default = "default_driver_overhead_gb")]
    pub driver_overhead_gb: f64,

    /// Headroom fraction. Carried for compatibility; not used in the arithmetic.
    #[serde(default = "default_safety_margin")]
    pub safety_margin: f64,

    /// Multi-card communication overhead. Carried for compatibility; not used
    /// in the arithmetic.
    #[serde(default = "default_multi_card_communication_overhead")]
    pub multi_card_communication_overhead: f64,
}

fn default_fragmentation_factor() -> f64 {
    0.08
}
fn default_system_reserved_gb() -> f64 {
    1.0
}
fn default_driver_overhead_gb() -> f64 {
    0.5
}
fn default_safety_margin() -> f64 {
    0.15
}
fn default_multi_card_communication_overhead() -> f64 {
    0.07
}

impl Default for UtilizationConfig {
    fn default() -> Self {
        Self {
            fragmentation_factor: default_fragmentation_factor(),
            system_reserved_gb: default_system_reserved_gb(),
            driver_overhead_gb: default_driver_overhead_gb(),
            safety_margin: default_safety_margin(),
            multi_card_communication_overhead: default_multi_card_communication_overhead(),
        }
    }
}

impl UtilizationConfig {
    /// Set the fragmentation factor.
    #[must_use]
    pub fn with_fragmentation_factor(mut self, factor: f64) -> Self {
        self.fragmentation_factor = factor;
        self
    }

    /// Set the system reservation and driver overhead, in GB.
    #[must_use]
    pub fn with_overheads(mut self, system_reserved_gb: f64, driver_overhead_gb: f64) -> Self {
        self.system_reserved_gb = system_reserved_gb;
        self.driver_overhead_gb = driver_overhead_gb;
        self
    }

    /// Fixed overhead subtracted from capacity, in bytes.
    #[must_use]
    pub fn system_overhead_bytes(&self) -> f64 {
        (self.system_reserved_gb + self.driver_overhead_gb) * BYTES_PER_GB
    }

    /// Check that every field is finite and in range.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::ConfigError`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        let fractions = [
            ("fragmentation_factor", self.fragmentation_factor),
            ("safety_margin", self.safety_margin),
            (
                "multi_card_communication_overhead",
                self.multi_card_communication_overhead,
            ),
        ];
        for (name, value) in fractions {
            if !(0.0..1.0).contains(&value) {
                return Err(PlannerError::config(format!(
                    "utilization.{name} must be in [0, 1) (got {value})"
                )));
            }
        }

        let overheads = [
            ("system_reserved_gb", self.system_reserved_gb),
            ("driver_overhead_gb", self.driver_overhead_gb),
        ];
        for (name, value) in overheads {
            if !(value.is_finite() && value >= 0.0) {
                return Err(PlannerError::config(format!(
                    "utilization.{name} must be a finite value >= 0 (got {value})"
                )));
            }
        }

        Ok(())
    }
}

/// Qualitative rating of practical utilization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EfficiencyRating {
    /// Sweet spot: well used with headroom.
    Excellent,
    /// Acceptable.
    Good,
    /// Underused or tight.
    Fair,
    /// Wasteful or over capacity.
    Poor,
}

impl EfficiencyRating {
    /// Rate a practical utilization ratio; first matching band wins.
    #[must_use]
    pub fn from_utilization(utilization: f64) -> Self {
        if !utilization.is_finite() || utilization < 0.0 {
            Self::Poor
        } else if (0.70..=0.85).contains(&utilization) {
            Self::Excellent
        } else if (0.50..=0.95).contains(&utilization) {
            Self::Good
        } else if (0.30..=1.00).contains(&utilization) {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Poor => "poor",
        }
    }
}

impl fmt::Display for EfficiencyRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Display-ready utilization metrics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardizedUtilization {
    /// `needed / capacity`, clamped to `[0, 10]`.
    pub theoretical_utilization: f64,
    /// `(needed + fragmentation) / (capacity - overhead)`, clamped to `[0, 10]`.
    pub practical_utilization: f64,
    /// Practical utilization in percent, clamped to `[0, 1000]`.
    pub utilization_percentage: f64,
    /// Whether the unclamped practical utilization exceeds 1.
    pub is_over_capacity: bool,
    /// Rating of the clamped practical utilization.
    pub efficiency_rating: EfficiencyRating,
}

/// Standardize a raw memory need against a GPU capacity, both in bytes.
///
/// # Errors
///
/// Returns [`PlannerError::InvalidArgument`] if `memory_needed_bytes` is
/// negative or non-finite, or `gpu_memory_bytes` is not a finite positive value.
///
/// # Example
///
/// ```rust
/// use vram_planner_rs::{standardize, EfficiencyRating, UtilizationConfig, BYTES_PER_GB};
///
/// let util = standardize(17.0 * BYTES_PER_GB, 24.0 * BYTES_PER_GB, &UtilizationConfig::default())?;
/// assert!(!util.is_over_capacity);
/// assert_eq!(util.efficiency_rating, EfficiencyRating::Excellent);
/// # Ok::<(), vram_planner_rs::PlannerError>(())
/// ```
pub fn standardize(
    memory_needed_bytes: f64,
    gpu_memory_bytes: f64,
    config: &UtilizationConfig,
) -> Result<StandardizedUtilization> {
    if !(memory_needed_bytes.is_finite() && memory_needed_bytes >= 0.0) {
        return Err(PlannerError::invalid_argument(
            "memory_needed_bytes",
            memory_needed_bytes,
            "must be a finite value >= 0",
        ));
    }
    if !(gpu_memory_bytes.is_finite() && gpu_memory_bytes > 0.0) {
        return Err(PlannerError::invalid_argument(
            "gpu_memory_bytes",
            gpu_memory_bytes,
            "must be a finite value > 0",
        ));
    }

    let available_bytes = (gpu_memory_bytes - config.system_overhead_bytes()).max(0.0);
    let fragmentation_bytes = memory_needed_bytes * config.fragmentation_factor;
    let total_needed_bytes = memory_needed_bytes + fragmentation_bytes;

    let theoretical = memory_needed_bytes / gpu_memory_bytes;
    let practical_raw = if available_bytes > 0.0 {
        total_needed_bytes / available_bytes
    } else {
        f64::INFINITY
    };

    let practical = clamp_ratio(practical_raw);
    let percentage = (practical * 100.0).clamp(0.0, MAX_UTILIZATION_PERCENT);

    Ok(StandardizedUtilization {
        theoretical_utilization: clamp_ratio(theoretical),
        practical_utilization: practical,
        utilization_percentage: percentage,
        is_over_capacity: practical_raw > 1.0,
        efficiency_rating: EfficiencyRating::from_utilization(practical),
    })
}

/// [`standardize`] with both quantities given in GB.
///
/// # Errors
///
/// Same as [`standardize`].
pub fn standardize_gb(
    memory_needed_gb: f64,
    gpu_memory_gb: f64,
    config: &UtilizationConfig,
) -> Result<StandardizedUtilization> {
    standardize(
        memory_needed_gb * BYTES_PER_GB,
        gpu_memory_gb * BYTES_PER_GB,
        config,
    )
}

fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() {
        ratio.clamp(0.0, MAX_UTILIZATION_RATIO)
    } else {
        MAX_UTILIZATION_RATIO
    }
}
