// demos/error_handling_demo.rs
use bsm_pricer::batch::{price_batch, BatchConfig};
use bsm_pricer::boundary::quote_json;
use bsm_pricer::{price, MarketInputs, PricingError};

fn main() {
    println!("Error Handling Demo for bsm-pricer");
    println!("==================================\n");

    // Test 1: Negative spot
    println!("1. Testing negative spot price...");
    match price(&MarketInputs::new(-1.0, 100.0, 0.02, 1.0, 0.2)) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 2: Zero strike
    println!("\n2. Testing zero strike...");
    match price(&MarketInputs::new(100.0, 0.0, 0.02, 1.0, 0.2)) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 3: Negative maturity
    println!("\n3. Testing negative time to maturity...");
    match price(&MarketInputs::new(100.0, 100.0, 0.02, -1.0, 0.2)) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 4: NaN from a failed upstream parse
    println!("\n4. Testing non-finite volatility...");
    let sigma = "twenty percent".parse::<f64>().unwrap_or(f64::NAN);
    match price(&MarketInputs::new(100.0, 100.0, 0.02, 1.0, sigma)) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 5: Degenerate but valid inputs
    println!("\n5. Testing zero volatility (valid limiting case)...");
    match price(&MarketInputs::new(100.0, 100.0, 0.05, 1.0, 0.0)) {
        Ok(p) => println!("   ✓ Success: Call = {:.4}, Put = {:.4}", p.call, p.put),
        Err(e) => println!("   Unexpected error: {}", e),
    }

    // Test 6: Overflowing discount factor
    println!("\n6. Testing extreme negative rate...");
    match price(&MarketInputs::new(100.0, 100.0, -800.0, 1.0, 0.2)) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 7: Invalid batch configuration
    println!("\n7. Testing invalid batch configuration...");
    let cfg = BatchConfig {
        threads: Some(0),
        ..Default::default()
    };
    match price_batch(&[], &cfg) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 8: JSON error payloads
    println!("\n8. Testing JSON error payloads...");
    for body in [
        r#"{"S": "abc", "K": 100, "T": 1, "r": 0.02, "sigma": 0.2}"#,
        r#"{"S": 100, "K": 100, "T": 1"#,
    ] {
        match quote_json(body, None) {
            Ok(json) => println!("   Unexpected success: {}", json),
            Err(payload) => println!("   ✓ Error payload: {}", payload),
        }
    }

    // Test 9: Error type matching
    println!("\n9. Testing error type matching...");
    match price(&MarketInputs::new(100.0, 100.0, 0.02, 1.0, -0.2)) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(PricingError::InvalidInput { field, value, constraint }) => {
            println!("   ✓ Caught InvalidInput: {} = {} ({})", field, value, constraint);
        }
        Err(other) => println!("   Unexpected error type: {}", other),
    }

    println!("\n✓ Error handling demo complete!");
    println!("All error cases were properly caught and handled.");
}
