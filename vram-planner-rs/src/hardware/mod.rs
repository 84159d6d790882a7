//! Hardware catalog and recommendation engine.

pub mod catalog;
pub mod recommend;

pub use catalog::{find_hardware, EfficiencyTier, HardwareSpec, HARDWARE_CATALOG};
pub use recommend::{
    recommend, recommend_for_result, HardwareRecommendation, RecommendOptions, SortBy,
    TARGET_UTILIZATION,
};
