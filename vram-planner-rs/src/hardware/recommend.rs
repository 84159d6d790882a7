//! Rank catalog hardware against a memory requirement.
//!
//! Every entry is scored independently; the only aggregation is the final
//! filter, sort and truncate. Suitable entries (a single card holds the whole
//! requirement) always rank ahead of unsuitable ones.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::catalog::{EfficiencyTier, HardwareSpec, HARDWARE_CATALOG};
use crate::error::PlannerError;
use crate::estimator::MemoryCalculationResult;
use crate::params::CalculationMode;
use crate::precision::format_gb;
use crate::utilization::{standardize_gb, StandardizedUtilization, UtilizationConfig};

/// Single-card utilization that ranks best under [`SortBy::Fit`].
pub const TARGET_UTILIZATION: f64 = 0.8;

const TIER_SCORE_WEIGHT: f64 = 0.6;
const CLOSENESS_SCORE_WEIGHT: f64 = 0.4;

/// Ordering applied within the suitable and unsuitable groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    /// Suitable: closest to 80% utilization. Unsuitable: fewest cards.
    #[default]
    Fit,
    /// Cheapest total price first.
    Price,
    /// Largest card memory first.
    Memory,
    /// Highest efficiency score first.
    Efficiency,
    /// Cheapest price per GB first.
    CostPerGb,
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fit => "fit",
            Self::Price => "price",
            Self::Memory => "memory",
            Self::Efficiency => "efficiency",
            Self::CostPerGb => "cost-per-gb",
        })
    }
}

impl FromStr for SortBy {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "fit" | "suitability" => Ok(Self::Fit),
            "price" => Ok(Self::Price),
            "memory" => Ok(Self::Memory),
            "efficiency" => Ok(Self::Efficiency),
            "cost-per-gb" | "costpergb" => Ok(Self::CostPerGb),
            _ => Err(PlannerError::UnknownSortKey(s.to_string())),
        }
    }
}

/// Options for [`recommend`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RecommendOptions {
    /// Drop entries whose total price exceeds this (ignored unless > 0).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    /// Ordering within the suitable/unsuitable groups.
    #[serde(default)]
    pub sort_by: SortBy,
    /// Keep at most this many results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_results: Option<usize>,
    /// Overheads used for the per-entry standardized utilization.
    #[serde(skip)]
    pub utilization: UtilizationConfig,
}

impl RecommendOptions {
    /// Set the budget in USD.
    #[must_use]
    pub fn with_budget(mut self, budget: f64) -> Self {
        self.budget = Some(budget);
        self
    }

    /// Set the sort key.
    #[must_use]
    pub fn with_sort_by(mut self, sort_by: SortBy) -> Self {
        self.sort_by = sort_by;
        self
    }

    /// Limit the number of results.
    #[must_use]
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Set the overheads used for standardized utilization.
    #[must_use]
    pub fn with_utilization(mut self, utilization: UtilizationConfig) -> Self {
        self.utilization = utilization;
        self
    }
}

/// A catalog entry evaluated against one memory requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareRecommendation {
    /// Catalog id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Vendor name.
    pub vendor: String,
    /// Memory per card, in GB.
    pub memory_size: f64,
    /// Price per card, in USD.
    pub price: f64,
    /// Static efficiency class.
    pub efficiency: EfficiencyTier,
    /// Whether one card holds the whole requirement.
    pub suitable: bool,
    /// Cards needed; 1 when suitable.
    pub multi_card_required: u32,
    /// Human summary of the fit.
    pub description: String,
    /// Requirement as a percentage of the combined memory of all cards.
    pub memory_utilization: f64,
    /// Single-card price divided by the combined memory of all cards.
    pub cost_per_gb: f64,
    /// Tier and utilization combined, in `[0, 100]`.
    pub efficiency_score: f64,
    /// Price of all required cards.
    pub total_price: f64,
    /// Standardized utilization of the combined memory, when computable.
    pub standardized: Option<StandardizedUtilization>,
}

impl HardwareRecommendation {
    fn evaluate(spec: &HardwareSpec, total_memory_gb: f64, config: &UtilizationConfig) -> Self {
        let suitable = spec.memory_gb >= total_memory_gb;
        let multi_card_required = if suitable {
            1
        } else {
            cards_needed(total_memory_gb, spec.memory_gb)
        };

        let cards = f64::from(multi_card_required);
        let combined_gb = spec.memory_gb * cards;
        let total_price = spec.price_usd * cards;
        let memory_utilization = total_memory_gb / combined_gb * 100.0;
        let cost_per_gb = spec.price_usd / combined_gb;

        let closeness =
            1.0 - ((TARGET_UTILIZATION - memory_utilization / 100.0).abs() / TARGET_UTILIZATION).min(1.0);
        let efficiency_score =
            100.0 * (TIER_SCORE_WEIGHT * spec.efficiency.weight() + CLOSENESS_SCORE_WEIGHT * closeness);

        let description = if suitable {
            format!(
                "Fits on a single card at {:.1}% memory utilization",
                total_memory_gb / spec.memory_gb * 100.0
            )
        } else {
            format!(
                "Requires {multi_card_required} cards ({} combined) for {}",
                format_gb(combined_gb),
                format_gb(total_memory_gb)
            )
        };

        Self {
            id: spec.id.to_string(),
            name: spec.name.to_string(),
            vendor: spec.vendor.to_string(),
            memory_size: spec.memory_gb,
            price: spec.price_usd,
            efficiency: spec.efficiency,
            suitable,
            multi_card_required,
            description,
            memory_utilization,
            cost_per_gb,
            efficiency_score,
            total_price,
            standardized: standardize_gb(total_memory_gb, combined_gb, config).ok(),
        }
    }

    /// Distance of single-card utilization from [`TARGET_UTILIZATION`].
    #[must_use]
    pub fn fit_distance(&self, total_memory_gb: f64) -> f64 {
        (TARGET_UTILIZATION - total_memory_gb / self.memory_size).abs()
    }
}

/// Cards needed to hold `total_memory_gb`, never less than 1.
///
/// A non-finite ratio (NaN or infinite need) falls back to 1 card.
fn cards_needed(total_memory_gb: f64, card_memory_gb: f64) -> u32 {
    let cards = (total_memory_gb / card_memory_gb).ceil();
    if cards.is_finite() && cards >= 1.0 {
        // saturating float-to-int cast
        cards as u32
    } else {
        1
    }
}

/// Evaluate, filter and rank `catalog` against `total_memory_gb`.
///
/// Never fails: an empty catalog gives an empty list, and a requirement of
/// 0 GB makes every entry suitable.
///
/// `total_memory_gb` is expected to be finite and non-negative, as produced by
/// the estimator. A NaN requirement is not rejected: every entry comes back
/// unsuitable with a card count of 1.
///
/// # Example
///
/// ```rust
/// use vram_planner_rs::{recommend, RecommendOptions, HARDWARE_CATALOG};
///
/// let ranked = recommend(30.0, HARDWARE_CATALOG, &RecommendOptions::default().with_max_results(3));
/// assert_eq!(ranked.len(), 3);
/// assert!(ranked[0].suitable);
/// ```
#[must_use]
pub fn recommend(
    total_memory_gb: f64,
    catalog: &[HardwareSpec],
    options: &RecommendOptions,
) -> Vec<HardwareRecommendation> {
    let _span = tracing::debug_span!("recommend", total_memory_gb, entries = catalog.len()).entered();

    let budget = options.budget.filter(|b| *b > 0.0);

    let mut ranked: Vec<HardwareRecommendation> = catalog
        .iter()
        .filter(|spec| {
            let usable = spec.memory_gb.is_finite() && spec.memory_gb > 0.0;
            if !usable {
                tracing::warn!(id = spec.id, memory_gb = spec.memory_gb, "skipping catalog entry without memory");
            }
            usable
        })
        .map(|spec| HardwareRecommendation::evaluate(spec, total_memory_gb, &options.utilization))
        .filter(|rec| budget.is_none_or(|b| rec.total_price <= b))
        .collect();

    ranked.sort_by(|a, b| compare(a, b, total_memory_gb, options.sort_by));

    if let Some(limit) = options.max_results {
        ranked.truncate(limit);
    }

    tracing::debug!(
        results = ranked.len(),
        suitable = ranked.iter().filter(|r| r.suitable).count(),
        sort_by = %options.sort_by,
        "ranked hardware"
    );

    ranked
}

fn compare(
    a: &HardwareRecommendation,
    b: &HardwareRecommendation,
    total_memory_gb: f64,
    sort_by: SortBy,
) -> Ordering {
    // suitable first
    b.suitable.cmp(&a.suitable).then_with(|| match sort_by {
        SortBy::Fit if a.suitable => a
            .fit_distance(total_memory_gb)
            .total_cmp(&b.fit_distance(total_memory_gb)),
        SortBy::Fit => a.multi_card_required.cmp(&b.multi_card_required),
        SortBy::Price => a.total_price.total_cmp(&b.total_price),
        SortBy::Memory => b.memory_size.total_cmp(&a.memory_size),
        SortBy::Efficiency => b.efficiency_score.total_cmp(&a.efficiency_score),
        SortBy::CostPerGb => a.cost_per_gb.total_cmp(&b.cost_per_gb),
    })
}

/// Recommend catalog hardware for the `mode` total of a computed result.
#[must_use]
pub fn recommend_for_result(
    result: &MemoryCalculationResult,
    mode: CalculationMode,
    options: &RecommendOptions,
) -> Vec<HardwareRecommendation> {
    recommend(result.total_for(mode), HARDWARE_CATALOG, options)
}
