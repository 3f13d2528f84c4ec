// tests/integration_test.rs
use bsm_pricer::analytics::bs_analytic::{bs_call_price, bs_put_price};
use bsm_pricer::{price, price_with, MarketInputs, PricingError, PricingResult};

fn assert_close(label: &str, actual: f64, expected: f64, tol: f64) {
    let abs_error = (actual - expected).abs();
    println!("{}: actual = {}, expected = {}, error = {}", label, actual, expected, abs_error);
    assert!(
        abs_error < tol,
        "{} differs from reference by {} (tolerance {})",
        label,
        abs_error,
        tol
    );
}

#[test]
fn test_canonical_reference_case() {
    let inputs = MarketInputs::new(100.0, 100.0, 0.02, 1.0, 0.2);
    let result = price(&inputs).expect("Valid inputs");

    // d1 = 0.2, d2 = 0: call = 100*Φ(0.2) - 50*e^(-0.02)
    assert_close("call", result.call, 8.916037278572539, 1e-4);
    assert_close("put", result.put, 6.935904609248070, 1e-4);
}

#[test]
fn test_textbook_reference_cases() {
    let atm = price(&MarketInputs::new(100.0, 100.0, 0.05, 1.0, 0.2)).expect("Valid inputs");
    assert_close("ATM call", atm.call, 10.450583572185565, 1e-8);
    assert_close("ATM put", atm.put, 5.573526022256971, 1e-8);

    // Hull, Options Futures and Other Derivatives, Example 15.6
    let hull = price(&MarketInputs::new(42.0, 40.0, 0.1, 0.5, 0.2)).expect("Valid inputs");
    assert_close("Hull call", hull.call, 4.759422392871532, 1e-8);
    assert_close("Hull put", hull.put, 0.808599372900092, 1e-8);
}

#[test]
fn test_single_leg_helpers_match_price() {
    let inputs = MarketInputs::new(42.0, 40.0, 0.1, 0.5, 0.2);
    let result = price(&inputs).expect("Valid inputs");

    let call = bs_call_price(42.0, 40.0, 0.1, 0.5, 0.2).expect("Valid inputs");
    let put = bs_put_price(42.0, 40.0, 0.1, 0.5, 0.2).expect("Valid inputs");
    assert_eq!(call, result.call);
    assert_eq!(put, result.put);

    assert!(bs_call_price(0.0, 40.0, 0.1, 0.5, 0.2).is_err());
}

#[test]
fn test_expiry_boundary() {
    for &(rate, sigma) in &[(0.0, 0.0), (0.05, 0.2), (-0.01, 1.5)] {
        let itm_call = price(&MarketInputs::new(100.0, 90.0, rate, 0.0, sigma)).expect("Valid inputs");
        assert_eq!(itm_call, PricingResult { call: 10.0, put: 0.0 });

        let itm_put = price(&MarketInputs::new(80.0, 90.0, rate, 0.0, sigma)).expect("Valid inputs");
        assert_eq!(itm_put, PricingResult { call: 0.0, put: 10.0 });
    }
}

#[test]
fn test_zero_volatility_limit() {
    let result = price(&MarketInputs::new(100.0, 100.0, 0.05, 1.0, 0.0)).expect("Valid inputs");
    assert_close("zero-vol call", result.call, 4.877057549928594, 1e-4);
    assert_close("zero-vol put", result.put, 0.0, 1e-4);
    assert!(result.call.is_finite() && result.put.is_finite());

    // Negative rate pushes the discounted strike above spot
    let result = price(&MarketInputs::new(100.0, 100.0, -0.05, 1.0, 0.0)).expect("Valid inputs");
    assert_eq!(result.call, 0.0);
    assert_close("zero-vol put, negative rate", result.put, 100.0 * 0.05f64.exp() - 100.0, 1e-9);
}

#[test]
fn test_small_volatility_converges_to_zero_vol_limit() {
    let limit = price(&MarketInputs::new(100.0, 100.0, 0.05, 1.0, 0.0)).expect("Valid inputs");
    let near = price(&MarketInputs::new(100.0, 100.0, 0.05, 1.0, 1e-6)).expect("Valid inputs");
    assert_close("call near zero vol", near.call, limit.call, 1e-4);
    assert_close("put near zero vol", near.put, limit.put, 1e-4);
}

#[test]
fn test_expiry_with_zero_volatility_matches_both_limits() {
    let inputs = MarketInputs::new(100.0, 90.0, 0.05, 0.0, 0.0);
    let result = price(&inputs).expect("Valid inputs");
    assert_eq!(result, PricingResult { call: 10.0, put: 0.0 });
    assert_eq!(inputs.discount_factor(), 1.0);
}

#[test]
fn test_rejection() {
    let cases = [
        (MarketInputs::new(-1.0, 100.0, 0.02, 1.0, 0.2), "spot"),
        (MarketInputs::new(0.0, 100.0, 0.02, 1.0, 0.2), "spot"),
        (MarketInputs::new(100.0, 0.0, 0.02, 1.0, 0.2), "strike"),
        (MarketInputs::new(100.0, 100.0, 0.02, -1.0, 0.2), "time_to_maturity"),
        (MarketInputs::new(100.0, 100.0, 0.02, 1.0, -0.2), "volatility"),
    ];

    for (inputs, expected_field) in &cases {
        match price(inputs) {
            Err(PricingError::InvalidInput { field, .. }) => assert_eq!(field, *expected_field),
            other => panic!("expected InvalidInput for {}, got {:?}", expected_field, other),
        }
    }
}

#[test]
fn test_non_finite_inputs_rejected() {
    let cases = [
        (MarketInputs::new(f64::NAN, 100.0, 0.02, 1.0, 0.2), "spot"),
        (MarketInputs::new(100.0, f64::INFINITY, 0.02, 1.0, 0.2), "strike"),
        (MarketInputs::new(100.0, 100.0, f64::NAN, 1.0, 0.2), "rate"),
        (MarketInputs::new(100.0, 100.0, 0.02, f64::INFINITY, 0.2), "time_to_maturity"),
        (MarketInputs::new(100.0, 100.0, 0.02, 1.0, f64::NEG_INFINITY), "volatility"),
        // Non-finite wins over a domain violation on an earlier field
        (MarketInputs::new(-1.0, 100.0, f64::NAN, 1.0, 0.2), "rate"),
    ];

    for (inputs, expected_field) in &cases {
        match price(inputs) {
            Err(PricingError::NonFiniteInput { field, .. }) => assert_eq!(field, *expected_field),
            other => panic!("expected NonFiniteInput for {}, got {:?}", expected_field, other),
        }
    }
}

#[test]
fn test_idempotence() {
    let inputs = MarketInputs::new(123.45, 117.0, 0.031, 0.75, 0.37);
    let first = price(&inputs).expect("Valid inputs");
    for _ in 0..1000 {
        let again = price(&inputs).expect("Valid inputs");
        assert_eq!(again.call.to_bits(), first.call.to_bits());
        assert_eq!(again.put.to_bits(), first.put.to_bits());
    }
}

#[test]
fn test_injected_cdf_evaluator() {
    // A flat Φ = 0.5 turns both legs into half the forward intrinsic value
    let inputs = MarketInputs::new(100.0, 100.0, 0.02, 1.0, 0.2);
    let flat = |_: f64| 0.5;
    let result = price_with(&inputs, &flat).expect("Valid inputs");

    let forward_gap = 100.0 - 100.0 * (-0.02f64).exp();
    assert_close("flat-CDF call", result.call, 0.5 * forward_gap, 1e-12);
    assert_eq!(result.put, 0.0);
}

#[test]
fn test_prices_are_non_negative_in_the_wings() {
    let deep_otm_call = price(&MarketInputs::new(10.0, 1000.0, 0.05, 0.1, 0.1)).expect("Valid inputs");
    assert!(deep_otm_call.call >= 0.0);

    let deep_otm_put = price(&MarketInputs::new(1000.0, 10.0, 0.05, 0.1, 0.1)).expect("Valid inputs");
    assert!(deep_otm_put.put >= 0.0);
    assert_close("deep ITM call", deep_otm_put.call, 1000.0 - 10.0 * (-0.005f64).exp(), 1e-9);
}

#[test]
fn test_large_volatility_limit() {
    // σ = 2e154 puts σ²T past f64::MAX while σ√T stays finite
    let inputs = MarketInputs::new(100.0, 100.0, 0.05, 1.0, 2e154);
    let result = price(&inputs).expect("Valid inputs");
    assert_close("Call (σ = 2e154)", result.call, 100.0, 1e-9);
    assert_close("Put (σ = 2e154)", result.put, 100.0 * (-0.05f64).exp(), 1e-9);
    assert!(result.parity_residual(&inputs).abs() < 1e-9);
}
