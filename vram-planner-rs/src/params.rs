//! Model hyperparameters and calculation modes.
//!
//! [`ModelParameters`] is the single input to every estimate. Presets cover
//! common open model families so callers can start from known shapes:
//!
//! ```rust
//! use vram_planner_rs::{ModelParameters, Precision};
//!
//! let params = ModelParameters::from_preset("llama-7b")?
//!     .with_precision(Precision::Int4)
//!     .with_batch_size(4);
//! assert_eq!(params.num_layers, 32);
//! # Ok::<(), vram_planner_rs::PlannerError>(())
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};
use crate::precision::{OptimizerKind, Precision};

/// Which workload a total refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CalculationMode {
    /// Forward pass only.
    #[default]
    Inference,
    /// Forward and backward passes with optimizer state.
    Training,
}

impl CalculationMode {
    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inference => "inference",
            Self::Training => "training",
        }
    }
}

impl fmt::Display for CalculationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalculationMode {
    type Err = PlannerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inference" | "infer" => Ok(Self::Inference),
            "training" | "train" => Ok(Self::Training),
            _ => Err(PlannerError::UnknownMode(s.to_string())),
        }
    }
}

/// Hyperparameters describing a transformer model and its workload.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelParameters {
    /// Parameter count in billions.
    pub parameter_count: f64,
    /// Numeric precision of the weights.
    pub precision: Precision,
    /// Tokens per sequence.
    pub sequence_length: u32,
    /// Sequences per batch.
    pub batch_size: u32,
    /// Model (embedding) dimension.
    pub hidden_size: u32,
    /// Number of transformer layers.
    pub num_layers: u32,
    /// Tokenizer vocabulary size.
    pub vocabulary_size: u32,
    /// Optimizer used for training estimates.
    #[serde(default)]
    pub optimizer: OptimizerKind,
}

/// Known model shapes: (name, billions, hidden, layers, vocab, context).
const PRESETS: &[(&str, f64, u32, u32, u32, u32)] = &[
    ("llama-7b", 7.0, 4096, 32, 32_000, 2048),
    ("llama-13b", 13.0, 5120, 40, 32_000, 2048),
    ("llama-70b", 70.0, 8192, 80, 32_000, 4096),
    ("llama3-8b", 8.0, 4096, 32, 128_256, 8192),
    ("mistral-7b", 7.0, 4096, 32, 32_000, 8192),
    ("qwen-0.6b", 0.6, 896, 24, 151_936, 2048),
    ("qwen-7b", 7.0, 3584, 28, 152_064, 8192),
    ("qwen-32b", 32.0, 5120, 64, 152_064, 8192),
    ("gpt3-175b", 175.0, 12_288, 96, 50_257, 4096),
];

impl ModelParameters {
    /// Create parameters for a model of `parameter_count` billion parameters.
    ///
    /// Shape fields default to a 7B-class decoder (hidden 4096, 32 layers,
    /// 32k vocabulary) with a 2048-token sequence and batch size 1.
    #[must_use]
    pub fn new(parameter_count: f64, precision: Precision) -> Self {
        Self {
            parameter_count,
            precision,
            sequence_length: 2048,
            batch_size: 1,
            hidden_size: 4096,
            num_layers: 32,
            vocabulary_size: 32_000,
            optimizer: OptimizerKind::default(),
        }
    }

    /// Look up a named preset in fp16 with batch size 1.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::ConfigError`] if the name is not a known preset.
    pub fn from_preset(name: &str) -> Result<Self> {
        let key = name.trim().to_lowercase();
        PRESETS
            .iter()
            .find(|(preset, ..)| *preset == key)
            .map(|&(_, billions, hidden, layers, vocab, context)| Self {
                parameter_count: billions,
                precision: Precision::Fp16,
                sequence_length: context,
                batch_size: 1,
                hidden_size: hidden,
                num_layers: layers,
                vocabulary_size: vocab,
                optimizer: OptimizerKind::default(),
            })
            .ok_or_else(|| {
                PlannerError::config(format!(
                    "unknown preset '{name}' (available: {})",
                    Self::preset_names().join(", ")
                ))
            })
    }

    /// Names accepted by [`ModelParameters::from_preset`].
    #[must_use]
    pub fn preset_names() -> Vec<&'static str> {
        PRESETS.iter().map(|(name, ..)| *name).collect()
    }

    /// Set the precision.
    #[must_use]
    pub fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    /// Set the batch size.
    #[must_use]
    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the sequence length.
    #[must_use]
    pub fn with_sequence_length(mut self, sequence_length: u32) -> Self {
        self.sequence_length = sequence_length;
        self
    }

    /// Set hidden size and layer count.
    #[must_use]
    pub fn with_shape(mut self, hidden_size: u32, num_layers: u32) -> Self {
        self.hidden_size = hidden_size;
        self.num_layers = num_layers;
        self
    }

    /// Set the vocabulary size.
    #[must_use]
    pub fn with_vocabulary_size(mut self, vocabulary_size: u32) -> Self {
        self.vocabulary_size = vocabulary_size;
        self
    }

    /// Set the training optimizer.
    #[must_use]
    pub fn with_optimizer(mut self, optimizer: OptimizerKind) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Absolute parameter count.
    #[must_use]
    pub fn total_parameters(&self) -> f64 {
        self.parameter_count * 1e9
    }

    /// Tokens processed per step (`batch_size * sequence_length`).
    #[must_use]
    pub fn tokens_per_batch(&self) -> u64 {
        u64::from(self.batch_size) * u64::from(self.sequence_length)
    }
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self::new(7.0, Precision::Fp16)
    }
}
