// tests/batch_test.rs
use bsm_pricer::batch::{price_batch, price_batch_in, price_batch_with, BatchConfig, BatchSummary};
use bsm_pricer::rng::MarketSampler;
use bsm_pricer::{norm_cdf, price, ErfNormalCdf, MarketInputs, PricingError};
use std::sync::atomic::{AtomicUsize, Ordering};

#[test]
fn test_parallel_matches_sequential() {
    let inputs = MarketSampler::with_degenerate_cases(11)
        .sample_batch(10_000)
        .expect("Valid sampler");

    let sequential = price_batch(&inputs, &BatchConfig::sequential()).expect("Valid configuration");
    let parallel = price_batch(
        &inputs,
        &BatchConfig {
            min_parallel_len: 1,
            ..Default::default()
        },
    )
    .expect("Valid configuration");

    assert_eq!(sequential.len(), inputs.len());
    assert_eq!(sequential, parallel);
}

#[test]
fn test_batch_preserves_order() {
    let inputs = MarketSampler::new(5).sample_batch(4_096).expect("Valid sampler");
    let results = price_batch(
        &inputs,
        &BatchConfig {
            min_parallel_len: 16,
            threads: Some(2),
            ..Default::default()
        },
    )
    .expect("Valid configuration");

    for (x, result) in inputs.iter().zip(&results) {
        assert_eq!(result, &price(x));
    }
}

#[test]
fn test_invalid_element_does_not_abort_batch() {
    let mut inputs = MarketSampler::new(3).sample_batch(2_000).expect("Valid sampler");
    inputs[17] = MarketInputs::new(100.0, -5.0, 0.01, 1.0, 0.2);
    inputs[1_500] = MarketInputs::new(f64::NAN, 100.0, 0.01, 1.0, 0.2);

    let results = price_batch(
        &inputs,
        &BatchConfig {
            min_parallel_len: 1,
            ..Default::default()
        },
    )
    .expect("Valid configuration");

    assert!(matches!(results[17], Err(PricingError::InvalidInput { .. })));
    assert!(matches!(results[1_500], Err(PricingError::NonFiniteInput { .. })));

    let summary = BatchSummary::from_results(&results);
    println!("\nBatch summary: {:?}", summary);
    assert_eq!(summary, BatchSummary { priced: 1_998, rejected: 2 });
}

#[test]
fn test_batch_with_injected_evaluator() {
    let calls = AtomicUsize::new(0);
    let counting = |x: f64| {
        calls.fetch_add(1, Ordering::Relaxed);
        norm_cdf(x)
    };

    let inputs = vec![MarketInputs::new(100.0, 100.0, 0.02, 1.0, 0.2); 3_000];
    let results = price_batch_with(
        &inputs,
        &BatchConfig {
            min_parallel_len: 1,
            ..Default::default()
        },
        &counting,
    )
    .expect("Valid configuration");

    assert_eq!(results.len(), 3_000);
    assert_eq!(calls.load(Ordering::Relaxed), 4 * 3_000);
}

#[test]
fn test_invalid_thread_count_rejected() {
    let cfg = BatchConfig {
        threads: Some(0),
        ..Default::default()
    };
    match price_batch(&[], &cfg) {
        Err(PricingError::InvalidConfiguration { field, .. }) => assert_eq!(field, "threads"),
        other => panic!("expected InvalidConfiguration, got {:?}", other),
    }
}

#[test]
fn test_reused_pool_matches_sequential() {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(2)
        .build()
        .expect("Could not build thread pool");
    let sequential_cfg = BatchConfig::sequential();

    for seed in 0..3 {
        let inputs = MarketSampler::with_degenerate_cases(seed)
            .sample_batch(2_048)
            .expect("Valid sampler");
        let pooled = price_batch_in(&pool, &inputs, &ErfNormalCdf);
        let sequential = price_batch(&inputs, &sequential_cfg).expect("Valid configuration");
        assert_eq!(pooled, sequential, "seed {}", seed);
    }
}
