// demos/pricing_demo.rs
use bsm_pricer::batch::{price_batch, BatchConfig, BatchSummary};
use bsm_pricer::math_utils::Timer;
use bsm_pricer::{price, MarketInputs};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // cargo run --example pricing_demo -- <spot> <strike> <rate> <time_to_maturity> <volatility>
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() == 5 {
        run_single(&args);
    } else {
        run_demo_mode();
    }
}

fn run_single(args: &[String]) {
    // Unparseable text becomes NaN and is reported as a non-finite input
    let values: Vec<f64> = args
        .iter()
        .map(|a| a.trim().parse::<f64>().unwrap_or(f64::NAN))
        .collect();
    let inputs = MarketInputs::new(values[0], values[1], values[2], values[3], values[4]);

    match price(&inputs) {
        Ok(result) => {
            println!("Call == {:.6}", result.call);
            println!("Put == {:.6}", result.put);
        }
        Err(e) => {
            eprintln!("Invalid input: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_demo_mode() {
    println!("Running bsm-pricer Demo\n");

    let canonical = MarketInputs::new(100.0, 100.0, 0.02, 1.0, 0.2);
    let result = price(&canonical).expect("Valid inputs");
    println!("Canonical case (S=100, K=100, r=2%, T=1y, σ=20%)");
    println!("  Call: {:.6}", result.call);
    println!("  Put:  {:.6}", result.put);
    println!("  Parity residual: {:e}\n", result.parity_residual(&canonical));

    println!("Limiting cases");
    let expired = price(&MarketInputs::new(100.0, 90.0, 0.02, 0.0, 0.2)).expect("Valid inputs");
    println!("  Expired (T=0):       call {:.4}, put {:.4}", expired.call, expired.put);
    let zero_vol = price(&MarketInputs::new(100.0, 100.0, 0.05, 1.0, 0.0)).expect("Valid inputs");
    println!("  Zero volatility:     call {:.4}, put {:.4}\n", zero_vol.call, zero_vol.put);

    // A strike ladder priced as one batch
    let chain: Vec<MarketInputs> = (0..=20)
        .map(|i| MarketInputs::new(100.0, 80.0 + 2.0 * i as f64, 0.02, 0.5, 0.25))
        .collect();

    let mut timer = Timer::new();
    timer.start();
    let results = price_batch(&chain, &BatchConfig::default()).expect("Valid configuration");
    let elapsed = timer.elapsed_ms();

    println!("{:>8} {:>12} {:>12}", "Strike", "Call", "Put");
    for (x, r) in chain.iter().zip(&results) {
        match r {
            Ok(p) => println!("{:>8.1} {:>12.4} {:>12.4}", x.strike, p.call, p.put),
            Err(e) => println!("{:>8.1} {}", x.strike, e),
        }
    }

    let summary = BatchSummary::from_results(&results);
    println!(
        "\nPriced {} of {} contracts in {:.3} ms",
        summary.priced,
        summary.total(),
        elapsed
    );
}
