// src/batch.rs
//! Batch pricing of independent option contracts
//!
//! Each contract is priced on its own, so a batch is embarrassingly parallel.
//! Large batches are spread over rayon workers; small ones run inline where
//! the scheduling overhead would dominate. Results always come back in input
//! order, and an invalid contract only poisons its own slot.

use crate::analytics::bs_analytic::{price_with, MarketInputs, PricingResult};
use crate::error::{BsResult, PricingError};
use crate::math_utils::{CdfEvaluator, ErfNormalCdf};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// How a batch is spread over threads
///
/// `threads: Some(n)` builds a fresh `n`-thread rayon pool on every
/// [`price_batch`] call and drops it afterwards. Callers pricing many
/// batches on a fixed thread count should build one pool themselves and use
/// [`price_batch_in`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub parallel: bool,
    pub min_parallel_len: usize, // Batches shorter than this run sequentially
    pub threads: Option<usize>,  // None = global rayon pool
}

impl BatchConfig {
    /// Validate the batch configuration
    pub fn validate(&self) -> BsResult<()> {
        if self.min_parallel_len == 0 {
            return Err(PricingError::InvalidConfiguration {
                field: "min_parallel_len".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.threads == Some(0) {
            return Err(PricingError::InvalidConfiguration {
                field: "threads".to_string(),
                reason: "must be greater than 0 when set".to_string(),
            });
        }
        Ok(())
    }

    /// Sequential configuration, useful for reproducing timings
    pub fn sequential() -> Self {
        BatchConfig {
            parallel: false,
            ..Default::default()
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            parallel: true,
            min_parallel_len: 1024,
            threads: None,
        }
    }
}

/// Counts of priced and rejected contracts in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    pub priced: usize,
    pub rejected: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[BsResult<PricingResult>]) -> Self {
        let priced = results.iter().filter(|r| r.is_ok()).count();
        BatchSummary {
            priced,
            rejected: results.len() - priced,
        }
    }

    pub fn total(&self) -> usize {
        self.priced + self.rejected
    }
}

/// Price a batch of contracts with the exact normal CDF
///
/// # Returns
///
/// One entry per input, in input order. The outer `Result` fails only for
/// an invalid [`BatchConfig`] or a thread pool that cannot be built.
pub fn price_batch(
    inputs: &[MarketInputs],
    cfg: &BatchConfig,
) -> BsResult<Vec<BsResult<PricingResult>>> {
    price_batch_with(inputs, cfg, &ErfNormalCdf)
}

/// [`price_batch`] with an injected CDF evaluator
pub fn price_batch_with<C>(
    inputs: &[MarketInputs],
    cfg: &BatchConfig,
    cdf: &C,
) -> BsResult<Vec<BsResult<PricingResult>>>
where
    C: CdfEvaluator + ?Sized,
{
    cfg.validate()?;

    let results = if !cfg.parallel || inputs.len() < cfg.min_parallel_len {
        inputs.iter().map(|x| price_with(x, cdf)).collect()
    } else {
        match cfg.threads {
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| PricingError::InvalidConfiguration {
                        field: "threads".to_string(),
                        reason: e.to_string(),
                    })?;
                pool.install(|| price_par(inputs, cdf))
            }
            None => price_par(inputs, cdf),
        }
    };

    log_summary(&results);
    Ok(results)
}

/// Price a batch in parallel on a caller-owned rayon pool
///
/// The pool is reused as-is; no [`BatchConfig`] applies.
pub fn price_batch_in<C>(
    pool: &rayon::ThreadPool,
    inputs: &[MarketInputs],
    cdf: &C,
) -> Vec<BsResult<PricingResult>>
where
    C: CdfEvaluator + ?Sized,
{
    let results = pool.install(|| price_par(inputs, cdf));
    log_summary(&results);
    results
}

fn log_summary(results: &[BsResult<PricingResult>]) {
    let summary = BatchSummary::from_results(results);
    if summary.rejected > 0 {
        warn!(
            priced = summary.priced,
            rejected = summary.rejected,
            "batch contained rejected contracts"
        );
    } else {
        info!(priced = summary.priced, "batch priced");
    }
}

fn price_par<C>(inputs: &[MarketInputs], cdf: &C) -> Vec<BsResult<PricingResult>>
where
    C: CdfEvaluator + ?Sized,
{
    inputs.par_iter().map(|x| price_with(x, cdf)).collect()
}
