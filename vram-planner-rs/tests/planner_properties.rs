//! End-to-end properties of the planner's public API.

use vram_planner_rs::estimator::{activations, model_weights, optimizer_states};
use vram_planner_rs::{
    calculate_memory_requirements, optimize_batch_size, recommend, recommend_for_result,
    standardize, validate_model_parameters, CalculationMode, EfficiencyRating, HardwareSpec,
    ModelParameters, OptimizerKind, Precision, RecommendOptions, SortBy, UtilizationConfig,
    BYTES_PER_GB, HARDWARE_CATALOG,
};

fn seven_b() -> ModelParameters {
    ModelParameters::new(7.0, Precision::Fp16)
        .with_sequence_length(2048)
        .with_shape(4096, 32)
        .with_vocabulary_size(32_000)
}

#[test]
fn activations_grow_with_batch_size() {
    for params in [seven_b(), ModelParameters::from_preset("qwen-0.6b").unwrap()] {
        for k in 1..200 {
            let smaller = activations(&params.with_batch_size(k));
            let larger = activations(&params.with_batch_size(k + 1));
            assert!(larger > smaller, "batch {k}");
        }
    }
}

#[test]
fn weights_scale_with_precision() {
    for billions in [0.5, 7.0, 70.0, 175.0] {
        let at = |p| model_weights(&ModelParameters::new(billions, p));
        assert_eq!(at(Precision::Fp32), 2.0 * at(Precision::Fp16));
        assert_eq!(at(Precision::Fp32), 4.0 * at(Precision::Int8));
    }
}

#[test]
fn optimizer_state_multipliers() {
    for w in [0.0, 1.5, 13.04, 326.0] {
        assert_eq!(optimizer_states(w, OptimizerKind::Adam), 2.0 * w);
        assert_eq!(optimizer_states(w, OptimizerKind::Sgd), w);
    }
}

#[test]
fn totals_equal_sum_of_components() {
    let presets = ModelParameters::preset_names();
    for name in presets {
        for precision in Precision::ALL {
            let params = ModelParameters::from_preset(name).unwrap().with_precision(precision);
            let result = calculate_memory_requirements(&params, CalculationMode::Training).unwrap();
            let inf = result.inference;
            let tr = result.training;
            assert_eq!(inf.total, inf.model_weights + inf.activations, "{name}");
            assert_eq!(
                tr.total,
                tr.model_weights + tr.activations + tr.gradients + tr.optimizer_states,
                "{name}"
            );
        }
    }
}

#[test]
fn utilization_is_always_clamped() {
    let config = UtilizationConfig::default();
    let needs = [0.0, 0.1, 1.0, 17.0, 24.0, 100.0, 1e6];
    let capacities = [1e-9, 0.5, 1.5, 2.0, 24.0, 80.0, 1e6];
    for need in needs {
        for capacity in capacities {
            let util = standardize(need * BYTES_PER_GB, capacity * BYTES_PER_GB, &config).unwrap();
            assert!((0.0..=1000.0).contains(&util.utilization_percentage));
            assert!(util.theoretical_utilization <= 10.0);
            assert!(util.practical_utilization <= 10.0);
        }
    }
}

#[test]
fn rating_band_boundaries() {
    let cases = [
        (0.85, EfficiencyRating::Excellent),
        (0.8501, EfficiencyRating::Good),
        (0.95, EfficiencyRating::Good),
        (0.9501, EfficiencyRating::Fair),
        (1.0, EfficiencyRating::Fair),
        (1.01, EfficiencyRating::Poor),
    ];
    for (utilization, expected) in cases {
        assert_eq!(EfficiencyRating::from_utilization(utilization), expected, "{utilization}");
    }
}

#[test]
fn batch_optimizer_feasibility_floor() {
    for (params, budget) in [
        (ModelParameters::new(70.0, Precision::Fp16), 24.0),
        (ModelParameters::new(7.0, Precision::Fp32), 16.0),
        (ModelParameters::from_preset("gpt3-175b").unwrap(), 80.0),
    ] {
        for mode in [CalculationMode::Inference, CalculationMode::Training] {
            let result = optimize_batch_size(&params, budget, mode, None);
            assert!(!result.validation.is_valid);
            assert_eq!(result.optimal_batch_size, 1);
            assert!(!result.warnings.is_empty());
        }
    }
}

#[test]
fn batch_optimizer_respects_safety_margin() {
    let params = [
        seven_b(),
        seven_b().with_precision(Precision::Int4),
        ModelParameters::from_preset("qwen-0.6b").unwrap(),
        ModelParameters::from_preset("mistral-7b").unwrap(),
    ];
    for p in params {
        for budget in [8.0, 16.0, 24.0, 48.0, 80.0] {
            for margin in [0.5, 0.8, 0.9, 1.0] {
                for mode in [CalculationMode::Inference, CalculationMode::Training] {
                    let result = optimize_batch_size(&p, budget, mode, Some(margin));
                    if result.validation.is_valid {
                        assert!(
                            result.memory_usage <= budget * margin,
                            "{} GB at margin {margin} used {}",
                            budget,
                            result.memory_usage
                        );
                    } else {
                        assert_eq!(result.optimal_batch_size, 1);
                        assert!(!result.warnings.is_empty());
                    }
                }
            }
        }
    }
}

#[test]
fn hardware_suitability_and_card_count() {
    for need in [0.5, 12.0, 17.24, 24.0, 24.01, 60.5, 300.0, 1200.0] {
        for rec in recommend(need, HARDWARE_CATALOG, &RecommendOptions::default()) {
            assert_eq!(rec.suitable, rec.memory_size >= need, "{} @ {need}", rec.id);
            if rec.suitable {
                assert_eq!(rec.multi_card_required, 1);
            } else {
                assert_eq!(f64::from(rec.multi_card_required), (need / rec.memory_size).ceil());
            }
        }
    }
}

#[test]
fn suitable_entries_rank_first_for_every_sort_key() {
    for sort_by in [SortBy::Fit, SortBy::Price, SortBy::Memory, SortBy::Efficiency, SortBy::CostPerGb] {
        let ranked = recommend(30.0, HARDWARE_CATALOG, &RecommendOptions::default().with_sort_by(sort_by));
        let first_unsuitable = ranked.iter().position(|r| !r.suitable).unwrap_or(ranked.len());
        assert!(ranked[first_unsuitable..].iter().all(|r| !r.suitable), "{sort_by}");
    }
}

#[test]
fn budget_and_result_limit() {
    let options = RecommendOptions::default().with_budget(2500.0).with_max_results(4);
    let ranked = recommend(20.0, HARDWARE_CATALOG, &options);
    assert!(ranked.len() <= 4);
    assert!(ranked.iter().all(|r| r.total_price <= 2500.0));
}

#[test]
fn empty_catalog_and_zero_need() {
    let empty: &[HardwareSpec] = &[];
    assert!(recommend(10.0, empty, &RecommendOptions::default()).is_empty());
    let ranked = recommend(0.0, HARDWARE_CATALOG, &RecommendOptions::default());
    assert_eq!(ranked.len(), HARDWARE_CATALOG.len());
    assert!(ranked.iter().all(|r| r.suitable));
}

#[test]
fn end_to_end_7b_inference() {
    let params = seven_b();
    assert!(validate_model_parameters(&params).is_valid);

    let result = calculate_memory_requirements(&params, CalculationMode::Inference).unwrap();
    let expected_weights = 7e9 * 2.0 / 1024f64.powi(3);
    assert!((result.inference.model_weights - expected_weights).abs() < 1e-9);
    assert!((result.inference.model_weights - 13.0).abs() < 0.1);
    assert!(result.inference.total > 10.0 && result.inference.total < 100.0);

    let large = ModelParameters::from_preset("gpt3-175b")
        .unwrap()
        .with_sequence_length(4096)
        .with_shape(12_288, 96);
    let training = calculate_memory_requirements(&large, CalculationMode::Training).unwrap();
    assert!(training.training.total > 3.0 * result.inference.total);
}

#[test]
fn recommendations_for_result_follow_mode() {
    let result = calculate_memory_requirements(&seven_b(), CalculationMode::Inference).unwrap();
    let inference = recommend_for_result(&result, CalculationMode::Inference, &RecommendOptions::default());
    let training = recommend_for_result(&result, CalculationMode::Training, &RecommendOptions::default());
    assert_eq!(inference, result.recommendations);
    let suitable_training = training.iter().filter(|r| r.suitable).count();
    let suitable_inference = inference.iter().filter(|r| r.suitable).count();
    assert!(suitable_training < suitable_inference);
}

#[test]
fn end_to_end_17gb_on_24gb() {
    let util = standardize(17.0 * BYTES_PER_GB, 24.0 * BYTES_PER_GB, &UtilizationConfig::default()).unwrap();
    assert!(!util.is_over_capacity);
    assert_eq!(
        util.efficiency_rating,
        EfficiencyRating::from_utilization(util.practical_utilization)
    );
    assert_eq!(util.efficiency_rating, EfficiencyRating::Excellent);
}

#[test]
fn invalid_parameters_collect_every_error() {
    let params = ModelParameters {
        parameter_count: -1.0,
        sequence_length: 0,
        batch_size: 2048,
        hidden_size: 0,
        num_layers: 0,
        vocabulary_size: 0,
        ..seven_b()
    };
    let report = validate_model_parameters(&params);
    assert!(!report.is_valid);
    assert_eq!(report.errors.len(), 6);
    assert!(calculate_memory_requirements(&params, CalculationMode::Inference).is_err());
}
