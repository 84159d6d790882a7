//! Unit and precision tables.
//!
//! Static lookups only: bytes per parameter for each numeric precision,
//! optimizer state multipliers, and byte/GB conversions. All GB values in this
//! crate are binary gigabytes (`1024^3` bytes).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlannerError;

/// Bytes in one (binary) gigabyte.
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Numeric representation of model parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    /// 32-bit float
    Fp32,
    /// 16-bit float
    #[default]
    Fp16,
    /// 8-bit integer quantization
    Int8,
    /// 4-bit integer quantization
    Int4,
}

impl Precision {
    /// Every supported precision, widest first.
    pub const ALL: [Precision; 4] = [Self::Fp32, Self::Fp16, Self::Int8, Self::Int4];

    /// Bytes used to store one parameter.
    #[must_use]
    pub const fn bytes_per_param(self) -> f64 {
        match self {
            Self::Fp32 => 4.0,
            Self::Fp16 => 2.0,
            Self::Int8 => 1.0,
            Self::Int4 => 0.5,
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fp32 => "fp32",
            Self::Fp16 => "fp16",
            Self::Int8 => "int8",
            Self::Int4 => "int4",
        }
    }

    /// The next narrower precision, if any.
    #[must_use]
    pub const fn narrower(self) -> Option<Precision> {
        match self {
            Self::Fp32 => Some(Self::Fp16),
            Self::Fp16 => Some(Self::Int8),
            Self::Int8 => Some(Self::Int4),
            Self::Int4 => None,
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Precision {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fp32" | "float32" | "f32" => Ok(Self::Fp32),
            "fp16" | "float16" | "f16" | "half" => Ok(Self::Fp16),
            "int8" | "8bit" | "q8" => Ok(Self::Int8),
            "int4" | "4bit" | "q4" => Ok(Self::Int4),
            _ => Err(PlannerError::UnknownPrecision(s.to_string())),
        }
    }
}

/// Training optimizer, which determines per-parameter state memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    /// Adam: first and second moments.
    #[default]
    Adam,
    /// AdamW: same state as Adam.
    AdamW,
    /// Plain SGD with momentum.
    Sgd,
}

impl OptimizerKind {
    /// Optimizer state size as a multiple of model weight memory.
    #[must_use]
    pub const fn state_multiplier(self) -> f64 {
        match self {
            Self::Adam | Self::AdamW => 2.0,
            Self::Sgd => 1.0,
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Adam => "adam",
            Self::AdamW => "adamw",
            Self::Sgd => "sgd",
        }
    }
}

impl fmt::Display for OptimizerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptimizerKind {
    type Err = PlannerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "adam" => Ok(Self::Adam),
            "adamw" | "adam_w" | "adam-w" => Ok(Self::AdamW),
            "sgd" => Ok(Self::Sgd),
            _ => Err(PlannerError::UnknownOptimizer(s.to_string())),
        }
    }
}

/// Convert bytes to binary gigabytes.
#[must_use]
pub fn bytes_to_gb(bytes: f64) -> f64 {
    bytes / BYTES_PER_GB
}

/// Convert binary gigabytes to bytes.
#[must_use]
pub fn gb_to_bytes(gb: f64) -> f64 {
    gb * BYTES_PER_GB
}

/// Format a GB quantity for logs and descriptions.
#[must_use]
pub fn format_gb(gb: f64) -> String {
    if gb >= 1024.0 {
        format!("{:.2} TB", gb / 1024.0)
    } else if gb >= 1.0 {
        format!("{gb:.2} GB")
    } else {
        format!("{:.0} MB", gb * 1024.0)
    }
}
