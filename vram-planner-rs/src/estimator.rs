//! Memory estimation for inference and training.
//!
//! All functions are pure and work in `f64` binary gigabytes with no rounding.
//!
//! # Model
//!
//! ```text
//! weights      = params * 1e9 * bytes_per_param / GB
//! activations  = (1 + 2 + 4) * batch * seq * hidden * layers
//!                * bytes_per_param * 1.2 / GB
//! training act = 2 * activations
//! gradients    = weights
//! optimizer    = weights * state_multiplier
//! ```
//!
//! The three activation terms are the hidden states (1x), the key/value cache
//! (2x) and the feed-forward intermediates (4x). Training activations are a
//! flat 2x of inference activations to account for tensors retained for the
//! backward pass; this is a fixed coefficient, not a derived quantity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::hardware::{recommend, HardwareRecommendation, RecommendOptions, HARDWARE_CATALOG};
use crate::params::{CalculationMode, ModelParameters};
use crate::precision::{format_gb, OptimizerKind, BYTES_PER_GB};
use crate::validation::validate_model_parameters;

/// Multiplier applied to raw activation bytes.
pub const ACTIVATION_SAFETY_FACTOR: f64 = 1.2;

/// Training activations as a multiple of inference activations.
pub const TRAINING_ACTIVATION_MULTIPLIER: f64 = 2.0;

const HIDDEN_STATE_COEFFICIENT: f64 = 1.0;
const KV_CACHE_COEFFICIENT: f64 = 2.0;
const INTERMEDIATE_COEFFICIENT: f64 = 4.0;

/// Memory held by model weights, in GB.
#[must_use]
pub fn model_weights(params: &ModelParameters) -> f64 {
    params.parameter_count * 1e9 * params.precision.bytes_per_param() / BYTES_PER_GB
}

/// The three components of inference activation memory, in GB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivationTerms {
    /// Hidden states passed between layers.
    pub hidden_states: f64,
    /// Attention key and value tensors.
    pub kv_cache: f64,
    /// Feed-forward expansion intermediates.
    pub intermediate: f64,
}

impl ActivationTerms {
    /// Sum of all three terms.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.hidden_states + self.kv_cache + self.intermediate
    }
}

/// Break inference activation memory into its three terms.
#[must_use]
pub fn activation_terms(params: &ModelParameters) -> ActivationTerms {
    let scale = element_count(params) * params.precision.bytes_per_param() * ACTIVATION_SAFETY_FACTOR
        / BYTES_PER_GB;
    ActivationTerms {
        hidden_states: HIDDEN_STATE_COEFFICIENT * scale,
        kv_cache: KV_CACHE_COEFFICIENT * scale,
        intermediate: INTERMEDIATE_COEFFICIENT * scale,
    }
}

/// Inference activation memory, in GB.
#[must_use]
pub fn activations(params: &ModelParameters) -> f64 {
    let coefficients = HIDDEN_STATE_COEFFICIENT + KV_CACHE_COEFFICIENT + INTERMEDIATE_COEFFICIENT;
    coefficients
        * element_count(params)
        * params.precision.bytes_per_param()
        * ACTIVATION_SAFETY_FACTOR
        / BYTES_PER_GB
}

/// Training activation memory, in GB.
#[must_use]
pub fn training_activations(params: &ModelParameters) -> f64 {
    TRAINING_ACTIVATION_MULTIPLIER * activations(params)
}

/// Gradient memory for a model whose weights take `model_weights_gb`.
#[must_use]
pub fn gradients(model_weights_gb: f64) -> f64 {
    model_weights_gb
}

/// Optimizer state memory for a model whose weights take `model_weights_gb`.
#[must_use]
pub fn optimizer_states(model_weights_gb: f64, optimizer: OptimizerKind) -> f64 {
    model_weights_gb * optimizer.state_multiplier()
}

// batch * seq * hidden * layers, computed in f64 so large shapes cannot overflow
fn element_count(params: &ModelParameters) -> f64 {
    f64::from(params.batch_size)
        * f64::from(params.sequence_length)
        * f64::from(params.hidden_size)
        * f64::from(params.num_layers)
}

/// Inference memory breakdown in GB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InferenceMemory {
    /// Model weights.
    pub model_weights: f64,
    /// Activations for one forward pass.
    pub activations: f64,
    /// `model_weights + activations`.
    pub total: f64,
}

/// Training memory breakdown in GB.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrainingMemory {
    /// Model weights.
    pub model_weights: f64,
    /// Activations retained for the backward pass.
    pub activations: f64,
    /// One gradient per weight.
    pub gradients: f64,
    /// Optimizer state.
    pub optimizer_states: f64,
    /// Sum of the four components.
    pub total: f64,
}

/// Both breakdowns for one parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryBreakdown {
    /// Inference breakdown.
    pub inference: InferenceMemory,
    /// Training breakdown.
    pub training: TrainingMemory,
}

impl MemoryBreakdown {
    /// Total for the given mode.
    #[must_use]
    pub fn total_for(&self, mode: CalculationMode) -> f64 {
        match mode {
            CalculationMode::Inference => self.inference.total,
            CalculationMode::Training => self.training.total,
        }
    }

    /// Named components for the given mode, in GB.
    #[must_use]
    pub fn components(&self, mode: CalculationMode) -> BTreeMap<String, f64> {
        let mut map = BTreeMap::new();
        match mode {
            CalculationMode::Inference => {
                map.insert("model_weights".to_string(), self.inference.model_weights);
                map.insert("activations".to_string(), self.inference.activations);
            }
            CalculationMode::Training => {
                map.insert("model_weights".to_string(), self.training.model_weights);
                map.insert("activations".to_string(), self.training.activations);
                map.insert("gradients".to_string(), self.training.gradients);
                map.insert("optimizer_states".to_string(), self.training.optimizer_states);
            }
        }
        map
    }
}

/// Compute both breakdowns without validating `params`.
///
/// # Errors
///
/// Returns [`PlannerError::NonFiniteEstimate`] if any total is NaN or infinite.
pub fn estimate_breakdown(params: &ModelParameters) -> Result<MemoryBreakdown> {
    let weights = model_weights(params);
    let inference_activations = activations(params);
    let train_activations = training_activations(params);
    let grads = gradients(weights);
    let optimizer = optimizer_states(weights, params.optimizer);

    let inference = InferenceMemory {
        model_weights: weights,
        activations: inference_activations,
        total: weights + inference_activations,
    };
    let training = TrainingMemory {
        model_weights: weights,
        activations: train_activations,
        gradients: grads,
        optimizer_states: optimizer,
        total: weights + train_activations + grads + optimizer,
    };

    PlannerError::ensure_finite("inference total", inference.total)?;
    PlannerError::ensure_finite("training total", training.total)?;

    Ok(MemoryBreakdown {
        inference,
        training,
    })
}

/// Full result of a memory calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryCalculationResult {
    /// The input parameters.
    pub parameters: ModelParameters,
    /// Mode whose total drove the recommendations.
    pub mode: CalculationMode,
    /// Inference breakdown.
    pub inference: InferenceMemory,
    /// Training breakdown.
    pub training: TrainingMemory,
    /// Ranked hardware for the mode's total.
    pub recommendations: Vec<HardwareRecommendation>,
}

impl MemoryCalculationResult {
    /// Total for the given mode.
    #[must_use]
    pub fn total_for(&self, mode: CalculationMode) -> f64 {
        match mode {
            CalculationMode::Inference => self.inference.total,
            CalculationMode::Training => self.training.total,
        }
    }

    /// Total for the mode this result was computed in.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.total_for(self.mode)
    }

    /// One-line summary for logs.
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "{}B {} ({}): inference {} (weights {} + activations {}), training {}",
            self.parameters.parameter_count,
            self.parameters.precision,
            self.mode,
            format_gb(self.inference.total),
            format_gb(self.inference.model_weights),
            format_gb(self.inference.activations),
            format_gb(self.training.total),
        )
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

/// Estimate memory for `params` and recommend hardware for `mode`.
///
/// Both breakdowns are always computed; `mode` only selects which total the
/// recommendations are ranked against.
///
/// # Errors
///
/// Returns [`PlannerError::InvalidParameters`] if validation fails, or
/// [`PlannerError::NonFiniteEstimate`] if an estimate overflows.
///
/// # Example
///
/// ```rust
/// use vram_planner_rs::{calculate_memory_requirements, CalculationMode, ModelParameters};
///
/// let result = calculate_memory_requirements(&ModelParameters::default(), CalculationMode::Inference)?;
/// assert!((result.inference.model_weights - 13.04).abs() < 0.01);
/// assert!(!result.recommendations.is_empty());
/// # Ok::<(), vram_planner_rs::PlannerError>(())
/// ```
pub fn calculate_memory_requirements(
    params: &ModelParameters,
    mode: CalculationMode,
) -> Result<MemoryCalculationResult> {
    validate_model_parameters(params).into_result()?;

    let breakdown = estimate_breakdown(params)?;
    let total = breakdown.total_for(mode);
    let recommendations = recommend(total, HARDWARE_CATALOG, &RecommendOptions::default());

    tracing::debug!(
        mode = %mode,
        inference_gb = breakdown.inference.total,
        training_gb = breakdown.training.total,
        recommendations = recommendations.len(),
        "calculated memory requirements"
    );

    Ok(MemoryCalculationResult {
        parameters: *params,
        mode,
        inference: breakdown.inference,
        training: breakdown.training,
        recommendations,
    })
}
