//! Static GPU catalog.
//!
//! Ship-time data; never mutated. Prices are approximate street/list prices
//! in USD for a single card.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Static efficiency class of a card (perf per watt and per dollar).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EfficiencyTier {
    /// Current-generation parts.
    High,
    /// Previous generation or consumer parts.
    Medium,
    /// Older or inference-only parts.
    Low,
}

impl EfficiencyTier {
    /// Weight used by the efficiency score, in `[0, 1]`.
    #[must_use]
    pub const fn weight(self) -> f64 {
        match self {
            Self::High => 1.0,
            Self::Medium => 0.75,
            Self::Low => 0.5,
        }
    }
}

impl fmt::Display for EfficiencyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        })
    }
}

/// One purchasable accelerator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HardwareSpec {
    /// Stable identifier.
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Vendor name.
    pub vendor: &'static str,
    /// Memory per card, in GB.
    pub memory_gb: f64,
    /// Price per card, in USD.
    pub price_usd: f64,
    /// Memory bandwidth, in GB/s.
    pub memory_bandwidth_gbps: f64,
    /// Static efficiency class.
    pub efficiency: EfficiencyTier,
}

/// Built-in catalog of consumer, workstation and datacenter GPUs.
pub static HARDWARE_CATALOG: &[HardwareSpec] = &[
    HardwareSpec {
        id: "rtx-3060",
        name: "NVIDIA GeForce RTX 3060",
        vendor: "NVIDIA",
        memory_gb: 12.0,
        price_usd: 329.0,
        memory_bandwidth_gbps: 360.0,
        efficiency: EfficiencyTier::Medium,
    },
    HardwareSpec {
        id: "rtx-4070-ti-super",
        name: "NVIDIA GeForce RTX 4070 Ti SUPER",
        vendor: "NVIDIA",
        memory_gb: 16.0,
        price_usd: 799.0,
        memory_bandwidth_gbps: 672.0,
        efficiency: EfficiencyTier::High,
    },
    HardwareSpec {
        id: "rtx-3090",
        name: "NVIDIA GeForce RTX 3090",
        vendor: "NVIDIA",
        memory_gb: 24.0,
        price_usd: 1499.0,
        memory_bandwidth_gbps: 936.0,
        efficiency: EfficiencyTier::Medium,
    },
    HardwareSpec {
        id: "rtx-4090",
        name: "NVIDIA GeForce RTX 4090",
        vendor: "NVIDIA",
        memory_gb: 24.0,
        price_usd: 1599.0,
        memory_bandwidth_gbps: 1008.0,
        efficiency: EfficiencyTier::High,
    },
    HardwareSpec {
        id: "rtx-5090",
        name: "NVIDIA GeForce RTX 5090",
        vendor: "NVIDIA",
        memory_gb: 32.0,
        price_usd: 1999.0,
        memory_bandwidth_gbps: 1792.0,
        efficiency: EfficiencyTier::High,
    },
    HardwareSpec {
        id: "rx-7900-xtx",
        name: "AMD Radeon RX 7900 XTX",
        vendor: "AMD",
        memory_gb: 24.0,
        price_usd: 999.0,
        memory_bandwidth_gbps: 960.0,
        efficiency: EfficiencyTier::Medium,
    },
    HardwareSpec {
        id: "tesla-t4",
        name: "NVIDIA Tesla T4",
        vendor: "NVIDIA",
        memory_gb: 16.0,
        price_usd: 2000.0,
        memory_bandwidth_gbps: 320.0,
        efficiency: EfficiencyTier::Low,
    },
    HardwareSpec {
        id: "v100-32gb",
        name: "NVIDIA Tesla V100 32GB",
        vendor: "NVIDIA",
        memory_gb: 32.0,
        price_usd: 8000.0,
        memory_bandwidth_gbps: 900.0,
        efficiency: EfficiencyTier::Low,
    },
    HardwareSpec {
        id: "rtx-a6000",
        name: "NVIDIA RTX A6000",
        vendor: "NVIDIA",
        memory_gb: 48.0,
        price_usd: 4650.0,
        memory_bandwidth_gbps: 768.0,
        efficiency: EfficiencyTier::Medium,
    },
    HardwareSpec {
        id: "l40s",
        name: "NVIDIA L40S",
        vendor: "NVIDIA",
        memory_gb: 48.0,
        price_usd: 7500.0,
        memory_bandwidth_gbps: 864.0,
        efficiency: EfficiencyTier::High,
    },
    HardwareSpec {
        id: "a100-40gb",
        name: "NVIDIA A100 40GB",
        vendor: "NVIDIA",
        memory_gb: 40.0,
        price_usd: 10_000.0,
        memory_bandwidth_gbps: 1555.0,
        efficiency: EfficiencyTier::Medium,
    },
    HardwareSpec {
        id: "a100-80gb",
        name: "NVIDIA A100 80GB",
        vendor: "NVIDIA",
        memory_gb: 80.0,
        price_usd: 15_000.0,
        memory_bandwidth_gbps: 2039.0,
        efficiency: EfficiencyTier::High,
    },
    HardwareSpec {
        id: "h100-80gb",
        name: "NVIDIA H100 80GB",
        vendor: "NVIDIA",
        memory_gb: 80.0,
        price_usd: 30_000.0,
        memory_bandwidth_gbps: 3350.0,
        efficiency: EfficiencyTier::High,
    },
    HardwareSpec {
        id: "mi300x",
        name: "AMD Instinct MI300X",
        vendor: "AMD",
        memory_gb: 192.0,
        price_usd: 20_000.0,
        memory_bandwidth_gbps: 5300.0,
        efficiency: EfficiencyTier::High,
    },
    HardwareSpec {
        id: "h200-141gb",
        name: "NVIDIA H200 141GB",
        vendor: "NVIDIA",
        memory_gb: 141.0,
        price_usd: 35_000.0,
        memory_bandwidth_gbps: 4800.0,
        efficiency: EfficiencyTier::High,
    },
];

/// Look up a catalog entry by id.
#[must_use]
pub fn find_hardware(id: &str) -> Option<&'static HardwareSpec> {
    HARDWARE_CATALOG.iter().find(|spec| spec.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_unique() {
        let ids: std::collections::HashSet<_> = HARDWARE_CATALOG.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), HARDWARE_CATALOG.len());
    }

    #[test]
    fn test_catalog_values_are_positive() {
        for spec in HARDWARE_CATALOG {
            assert!(spec.memory_gb > 0.0, "{} memory", spec.id);
            assert!(spec.price_usd > 0.0, "{} price", spec.id);
            assert!(spec.memory_bandwidth_gbps > 0.0, "{} bandwidth", spec.id);
        }
    }

    #[test]
    fn test_find_hardware() {
        let spec = find_hardware("a100-80gb").unwrap();
        assert_eq!(spec.memory_gb, 80.0);
        assert!(find_hardware("tpu-v5").is_none());
    }

    #[test]
    fn test_tier_weights_ordered() {
        assert!(EfficiencyTier::High.weight() > EfficiencyTier::Medium.weight());
        assert!(EfficiencyTier::Medium.weight() > EfficiencyTier::Low.weight());
    }
}
