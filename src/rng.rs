// src/rng.rs
//! Reproducible sampling of market inputs
//!
//! # Design
//!
//! Property checks and benchmarks need many valid [`MarketInputs`] that are
//! identical from run to run and independent of how work is split across
//! threads. Each sample index gets its own generator seeded with
//! `seed + index`, so `sample(i)` depends only on `(seed, i)`.
//!
//! # Distributions
//!
//! - spot: log-normal around `spot_median`
//! - strike: `spot * m` with moneyness `m` uniform in `moneyness`
//! - rate, time to maturity, volatility: uniform in their ranges
//! - with probability `expiry_probability` the maturity is exactly `0`, and
//!   with probability `zero_vol_probability` the volatility is exactly `0`

use crate::analytics::bs_analytic::MarketInputs;
use crate::error::{validation::*, BsResult, PricingError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, LogNormal};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSampler {
    pub seed: u64,
    pub spot_median: f64,
    pub spot_log_sd: f64,
    pub moneyness: (f64, f64),
    pub rate: (f64, f64),
    pub time_to_maturity: (f64, f64),
    pub volatility: (f64, f64),
    pub expiry_probability: f64,
    pub zero_vol_probability: f64,
}

impl Default for MarketSampler {
    fn default() -> Self {
        MarketSampler {
            seed: 12345,
            spot_median: 100.0,
            spot_log_sd: 0.5,
            moneyness: (0.5, 1.5),
            rate: (-0.01, 0.10),
            time_to_maturity: (0.01, 5.0),
            volatility: (0.01, 1.0),
            expiry_probability: 0.0,
            zero_vol_probability: 0.0,
        }
    }
}

impl MarketSampler {
    pub fn new(seed: u64) -> Self {
        MarketSampler {
            seed,
            ..Default::default()
        }
    }

    /// Sampler that also draws expired and zero-volatility contracts
    pub fn with_degenerate_cases(seed: u64) -> Self {
        MarketSampler {
            seed,
            expiry_probability: 0.1,
            zero_vol_probability: 0.1,
            ..Default::default()
        }
    }

    /// Validate the sampler configuration
    pub fn validate(&self) -> BsResult<()> {
        validate_positive("spot_median", self.spot_median)?;
        validate_non_negative("spot_log_sd", self.spot_log_sd)?;
        validate_range("moneyness", self.moneyness, true)?;
        validate_range("rate", self.rate, false)?;
        validate_range("time_to_maturity", self.time_to_maturity, false)?;
        validate_range("volatility", self.volatility, false)?;
        if self.time_to_maturity.0 < 0.0 {
            return Err(invalid("time_to_maturity", "lower bound must be non-negative"));
        }
        if self.volatility.0 < 0.0 {
            return Err(invalid("volatility", "lower bound must be non-negative"));
        }
        validate_probability("expiry_probability", self.expiry_probability)?;
        validate_probability("zero_vol_probability", self.zero_vol_probability)?;
        Ok(())
    }

    /// Generator for one sample index
    pub fn rng_for(&self, index: u64) -> StdRng {
        StdRng::seed_from_u64(self.seed.wrapping_add(index))
    }

    /// Draw the inputs for sample `index`
    ///
    /// Assumes a configuration that passed [`MarketSampler::validate`].
    pub fn sample(&self, index: u64) -> MarketInputs {
        let mut rng = self.rng_for(index);

        let spot = match LogNormal::new(self.spot_median.ln(), self.spot_log_sd) {
            Ok(dist) => dist.sample(&mut rng),
            Err(_) => self.spot_median,
        };
        let strike = spot * uniform(&mut rng, self.moneyness);
        let rate = uniform(&mut rng, self.rate);

        let time_to_maturity = if rng.gen::<f64>() < self.expiry_probability {
            0.0
        } else {
            uniform(&mut rng, self.time_to_maturity)
        };
        let volatility = if rng.gen::<f64>() < self.zero_vol_probability {
            0.0
        } else {
            uniform(&mut rng, self.volatility)
        };

        MarketInputs::new(spot, strike, rate, time_to_maturity, volatility)
    }

    /// Draw samples `0..n`, in parallel
    pub fn sample_batch(&self, n: usize) -> BsResult<Vec<MarketInputs>> {
        self.validate()?;
        Ok((0..n as u64)
            .into_par_iter()
            .map(|i| self.sample(i))
            .collect())
    }
}

fn uniform(rng: &mut StdRng, (lo, hi): (f64, f64)) -> f64 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}

fn invalid(field: &str, reason: &str) -> PricingError {
    PricingError::InvalidConfiguration {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_range(name: &str, (lo, hi): (f64, f64), positive: bool) -> BsResult<()> {
    if !lo.is_finite() || !hi.is_finite() {
        return Err(invalid(name, "bounds must be finite"));
    }
    if lo > hi {
        return Err(invalid(name, "lower bound exceeds upper bound"));
    }
    if positive && lo <= 0.0 {
        return Err(invalid(name, "lower bound must be positive"));
    }
    Ok(())
}

fn validate_probability(name: &str, p: f64) -> BsResult<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(invalid(name, "must be in range [0, 1]"));
    }
    Ok(())
}
