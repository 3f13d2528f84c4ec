// scripts/benchmark.rs
use bsm_pricer::batch::{price_batch, BatchConfig, BatchSummary};
use bsm_pricer::math_utils::{norm_cdf, Timer};
use bsm_pricer::output;
use bsm_pricer::rng::MarketSampler;
use bsm_pricer::{price, MarketInputs};
use std::env;
use std::fs::File;
use std::hint::black_box;
use std::io::{self, Write};
use std::process::Command;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_model: String,
    cpu_cores: usize,
    rust_version: String,
    rustc_flags: String,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_model: Self::get_cpu_model(),
            cpu_cores: num_cpus::get(),
            rust_version: Self::get_rust_version(),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
            rayon_threads: rayon::current_num_threads(),
        }
    }

    fn get_cpu_model() -> String {
        #[cfg(target_os = "linux")]
        {
            std::fs::read_to_string("/proc/cpuinfo")
                .ok()
                .and_then(|content| {
                    content
                        .lines()
                        .find(|line| line.starts_with("model name"))
                        .and_then(|line| line.split(':').nth(1))
                        .map(|s| s.trim().to_string())
                })
                .unwrap_or_else(|| "Unknown CPU".to_string())
        }

        #[cfg(target_os = "macos")]
        {
            Command::new("sysctl")
                .args(["-n", "machdep.cpu.brand_string"])
                .output()
                .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
                .unwrap_or_else(|_| "Unknown CPU".to_string())
        }

        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            "Unknown CPU".to_string()
        }
    }

    fn get_rust_version() -> String {
        Command::new("rustc")
            .arg("--version")
            .output()
            .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
            .unwrap_or_else(|_| "Unknown Rust version".to_string())
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: String,
    evaluations: usize,
    time_ms: f64,
    throughput_per_sec: f64,
    check: Option<f64>, // Max parity residual or reference error, where meaningful
}

impl BenchmarkResult {
    fn new(name: String, evaluations: usize, time_ms: f64, check: Option<f64>) -> Self {
        Self {
            name,
            evaluations,
            time_ms,
            throughput_per_sec: evaluations as f64 / (time_ms / 1000.0),
            check,
        }
    }
}

fn run_cdf_benchmark(n: usize) -> BenchmarkResult {
    let mut timer = Timer::new();
    timer.start();
    let mut acc = 0.0;
    for i in 0..n {
        let x = -8.0 + 16.0 * (i as f64) / (n as f64);
        acc += norm_cdf(black_box(x));
    }
    black_box(acc);
    BenchmarkResult::new("Normal CDF".to_string(), n, timer.elapsed_ms(), None)
}

fn run_reference_benchmark(n: usize) -> BenchmarkResult {
    let inputs = MarketInputs::new(100.0, 100.0, 0.02, 1.0, 0.2);
    let mut timer = Timer::new();
    timer.start();
    let mut last = None;
    for _ in 0..n {
        last = Some(price(black_box(&inputs)));
    }
    let time_ms = timer.elapsed_ms();

    let error = match last {
        Some(Ok(p)) => Some((p.call - 8.916037278572539).abs().max((p.put - 6.93590460924807).abs())),
        _ => None,
    };
    BenchmarkResult::new("Single price (canonical)".to_string(), n, time_ms, error)
}

fn run_batch_benchmarks(inputs: &[MarketInputs]) -> Vec<BenchmarkResult> {
    let mut results = Vec::new();
    let configs = [
        ("Batch sequential", BatchConfig::sequential()),
        ("Batch parallel", BatchConfig::default()),
    ];

    for (name, cfg) in configs {
        println!("Running {} over {} contracts...", name, inputs.len());
        let mut timer = Timer::new();
        timer.start();
        let priced = match price_batch(inputs, &cfg) {
            Ok(priced) => priced,
            Err(e) => {
                error!(error = %e, "batch benchmark skipped");
                continue;
            }
        };
        let time_ms = timer.elapsed_ms();

        let worst_parity = inputs
            .iter()
            .zip(&priced)
            .filter_map(|(x, r)| r.as_ref().ok().map(|p| p.parity_residual(x).abs()))
            .fold(0.0f64, f64::max);

        let summary = BatchSummary::from_results(&priced);
        info!(priced = summary.priced, rejected = summary.rejected, "{}", name);

        results.push(BenchmarkResult::new(
            format!("{} ({}k)", name, inputs.len() / 1000),
            inputs.len(),
            time_ms,
            Some(worst_parity),
        ));
    }

    results
}

fn write_results_to_csv(
    results: &[BenchmarkResult],
    system_info: &SystemInfo,
    filename: &str,
) -> io::Result<()> {
    let mut file = File::create(filename)?;

    // Write system information as comments
    writeln!(file, "# System Information")?;
    writeln!(file, "# OS: {}", system_info.os)?;
    writeln!(file, "# CPU: {}", system_info.cpu_model)?;
    writeln!(file, "# CPU Cores: {}", system_info.cpu_cores)?;
    writeln!(file, "# Rust Version: {}", system_info.rust_version)?;
    writeln!(file, "# RUSTFLAGS: {}", system_info.rustc_flags)?;
    writeln!(file, "# Rayon Threads: {}", system_info.rayon_threads)?;
    writeln!(
        file,
        "# Benchmark Date: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(file, "#")?;

    writeln!(file, "Benchmark,Evaluations,Time_ms,Throughput_per_sec,Check")?;
    for result in results {
        writeln!(
            file,
            "{},{},{:.2},{:.0},{}",
            result.name,
            result.evaluations,
            result.time_ms,
            result.throughput_per_sec,
            result
                .check
                .map(|v| format!("{:e}", v))
                .unwrap_or_else(|| "N/A".to_string())
        )?;
    }

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("bsm-pricer Benchmark Suite");
    println!("==========================\n");

    let batch_size = env::args()
        .nth(1)
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1_000_000);

    let system_info = SystemInfo::gather();
    println!("System Information:");
    println!("  OS: {}", system_info.os);
    println!("  CPU: {}", system_info.cpu_model);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  Rust Version: {}", system_info.rust_version);
    println!("  RUSTFLAGS: {}", system_info.rustc_flags);
    println!("  Rayon Threads: {}", system_info.rayon_threads);
    println!();

    let inputs = match MarketSampler::with_degenerate_cases(42).sample_batch(batch_size) {
        Ok(inputs) => inputs,
        Err(e) => {
            error!(error = %e, "could not sample benchmark inputs");
            return;
        }
    };

    let mut all_results = vec![run_cdf_benchmark(10_000_000), run_reference_benchmark(1_000_000)];
    all_results.extend(run_batch_benchmarks(&inputs));

    println!("\n{:=<80}", "");
    println!("BENCHMARK RESULTS");
    println!("{:=<80}", "");
    println!(
        "{:<32} {:>12} {:>12} {:>15} {:>12}",
        "Benchmark", "Evaluations", "Time (ms)", "Throughput/s", "Check"
    );
    println!("{:-<80}", "");
    for result in &all_results {
        println!(
            "{:<32} {:>12} {:>12.2} {:>15.0} {:>12}",
            result.name,
            result.evaluations,
            result.time_ms,
            result.throughput_per_sec,
            result
                .check
                .map(|v| format!("{:.1e}", v))
                .unwrap_or_else(|| "N/A".to_string())
        );
    }
    println!("{:=<80}", "");

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let filename = format!("benchmark_results_{}.csv", timestamp);
    match write_results_to_csv(&all_results, &system_info, &filename) {
        Ok(()) => println!("Results written to {}", filename),
        Err(e) => error!(error = %e, "could not write {}", filename),
    }

    // Keep a small priced sample for inspection
    let sample_len = inputs.len().min(1_000);
    if let Ok(sample) = price_batch(&inputs[..sample_len], &BatchConfig::sequential()) {
        let quotes_file = format!("benchmark_quotes_{}.csv", timestamp);
        if let Err(e) = output::write_quotes_to_csv(&quotes_file, &inputs[..sample_len], &sample) {
            error!(error = %e, "could not write {}", quotes_file);
        }
        let summary = BatchSummary::from_results(&sample);
        let priced = summary.priced.to_string();
        let rejected = summary.rejected.to_string();
        let summary_file = format!("benchmark_summary_{}.csv", timestamp);
        if let Err(e) = output::write_summary_to_csv(
            &summary_file,
            &[("priced", priced.as_str()), ("rejected", rejected.as_str())],
        ) {
            error!(error = %e, "could not write {}", summary_file);
        }
    }

    println!("\nBenchmark complete!");
    println!("\nTo reproduce these results:");
    println!("1. Use Rust version: {}", system_info.rust_version);
    println!("2. Set RUSTFLAGS: {}", system_info.rustc_flags);
    println!("3. Run: cargo run --bin benchmark --release -- {}", batch_size);
    println!("4. Ensure {} CPU threads available", system_info.rayon_threads);
}
