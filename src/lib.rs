//! # bsm-pricer: Black-Scholes-Merton Pricing for European Options
//!
//! Closed-form call and put prices from five market observables, built on an
//! exact standard-normal CDF.
//!
//! ## Key Features
//!
//! - **Exact CDF**: `Φ(x) = 0.5 * (1 + erf(x/√2))` with `libm`'s `erf`/`erfc`
//! - **Defined limits**: expiry (`T = 0`) and zero volatility have explicit branches
//! - **Typed errors**: invalid and non-finite inputs fail fast, never as `NaN` prices
//! - **Batch pricing**: order-preserving parallel pricing with Rayon
//! - **Caller boundary**: JSON request/response shapes for HTTP front ends
//!
//! ## Quick Start
//!
//! ```rust
//! use bsm_pricer::{price, MarketInputs};
//!
//! // (spot, strike, rate, time_to_maturity, volatility)
//! let inputs = MarketInputs::new(100.0, 100.0, 0.02, 1.0, 0.2);
//!
//! let result = price(&inputs).expect("Valid inputs");
//! println!("Call: {:.4}, Put: {:.4}", result.call, result.put);
//! assert!(result.parity_residual(&inputs).abs() < 1e-9);
//! ```
//!
//! ## Parameter Order
//!
//! All functions take market inputs as
//! `(spot, strike, rate, time_to_maturity, volatility)`.

// Module declarations
pub mod error;
pub mod math_utils;
pub mod analytics;
pub mod batch;
pub mod boundary;
pub mod rng;
pub mod output;

// Re-export commonly used types for convenience
pub use analytics::bs_analytic::{price, price_with, MarketInputs, PricingResult};
pub use batch::{price_batch, price_batch_in, BatchConfig, BatchSummary};
pub use error::{BsResult, PricingError};
pub use math_utils::{norm_cdf, CdfEvaluator, ErfNormalCdf};
