// src/analytics/bs_analytic.rs
//! Analytical Black-Scholes-Merton prices for European calls and puts
//!
//! # Mathematical Foundation
//!
//! Under the Black-Scholes model, the underlying asset follows:
//! ```text
//! dS_t = r S_t dt + σ S_t dW_t
//! ```
//!
//! The risk-neutral pricing formula gives:
//! ```text
//! V(S,t) = e^(-r(T-t)) * E^Q[payoff(S_T) | S_t = S]
//! ```
//!
//! For European options this has a closed form in terms of the cumulative
//! normal distribution Φ(x), evaluated here through [`CdfEvaluator`].
//!
//! # Parameter Order
//!
//! Every function in this crate takes market inputs in the order
//! `(spot, strike, rate, time_to_maturity, volatility)`.

use crate::error::{validation::*, BsResult, PricingError};
use crate::math_utils::{CdfEvaluator, ErfNormalCdf};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// The five market observables of a single European option
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketInputs {
    pub spot: f64,             // Current price of the underlying
    pub strike: f64,           // Strike price
    pub rate: f64,             // Continuously compounded risk-free rate
    pub time_to_maturity: f64, // Years until expiry
    pub volatility: f64,       // Annualized volatility of log-returns
}

impl MarketInputs {
    pub fn new(spot: f64, strike: f64, rate: f64, time_to_maturity: f64, volatility: f64) -> Self {
        Self {
            spot,
            strike,
            rate,
            time_to_maturity,
            volatility,
        }
    }

    /// Validate the inputs
    ///
    /// Non-finite values are reported before domain violations, so a failed
    /// upstream parse always surfaces as [`PricingError::NonFiniteInput`].
    pub fn validate(&self) -> BsResult<()> {
        validate_finite("spot", self.spot)?;
        validate_finite("strike", self.strike)?;
        validate_finite("rate", self.rate)?;
        validate_finite("time_to_maturity", self.time_to_maturity)?;
        validate_finite("volatility", self.volatility)?;

        validate_positive("spot", self.spot)?;
        validate_positive("strike", self.strike)?;
        validate_non_negative("time_to_maturity", self.time_to_maturity)?;
        validate_non_negative("volatility", self.volatility)?;

        Ok(())
    }

    /// Discount factor `e^(-rT)`
    pub fn discount_factor(&self) -> f64 {
        (-self.rate * self.time_to_maturity).exp()
    }
}

/// Call and put prices for one set of market inputs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub call: f64,
    pub put: f64,
}

impl PricingResult {
    /// Signed deviation from put-call parity
    ///
    /// ```text
    /// (C - P) - (S - K*e^(-rT))
    /// ```
    pub fn parity_residual(&self, inputs: &MarketInputs) -> f64 {
        (self.call - self.put) - (inputs.spot - inputs.strike * inputs.discount_factor())
    }

    /// Both legs rounded half away from zero to `decimals` places
    pub fn rounded(&self, decimals: u32) -> PricingResult {
        PricingResult {
            call: round_to(self.call, decimals),
            put: round_to(self.put, decimals),
        }
    }
}

pub(crate) fn round_to(value: f64, decimals: u32) -> f64 {
    // 10^308 is the largest finite power of ten
    let factor = 10f64.powi(decimals.min(308) as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Black-Scholes call and put prices using the exact normal CDF
///
/// # Formula
/// ```text
/// C = S*Φ(d₁) - K*e^(-rT)*Φ(d₂)
/// P = K*e^(-rT)*Φ(-d₂) - S*Φ(-d₁)
/// ```
///
/// Where:
/// ```text
/// d₁ = [ln(S/K) + rT] / (σ√T) + σ√T/2     (= [ln(S/K) + (r + σ²/2)T] / (σ√T))
/// d₂ = d₁ - σ√T
/// ```
///
/// # Limiting Cases
/// - `T = 0`: intrinsic value `max(S-K, 0)` / `max(K-S, 0)`
/// - `σ√T = 0` with `T > 0`: discounted intrinsic value
///   `max(S - K*e^(-rT), 0)` / `max(K*e^(-rT) - S, 0)`
///
/// # Errors
/// - [`PricingError::NonFiniteInput`] if any input is NaN or infinite
/// - [`PricingError::InvalidInput`] if `S <= 0`, `K <= 0`, `T < 0` or `σ < 0`
/// - [`PricingError::NumericalOverflow`] if the discount factor or a price
///   is not finite (only for `rT` below about -709)
pub fn price(inputs: &MarketInputs) -> BsResult<PricingResult> {
    price_with(inputs, &ErfNormalCdf)
}

/// [`price`] with an injected CDF evaluator
pub fn price_with<C>(inputs: &MarketInputs, cdf: &C) -> BsResult<PricingResult>
where
    C: CdfEvaluator + ?Sized,
{
    if let Err(e) = inputs.validate() {
        debug!(error = %e, "rejected market inputs");
        return Err(e);
    }

    let MarketInputs {
        spot: s,
        strike: k,
        rate: r,
        time_to_maturity: t,
        volatility: sigma,
    } = *inputs;

    if t == 0.0 {
        trace!(spot = s, strike = k, "expiry branch");
        return Ok(PricingResult {
            call: (s - k).max(0.0),
            put: (k - s).max(0.0),
        });
    }

    let discount = (-r * t).exp();
    check_finite("discount factor", discount)?;
    let discounted_strike = k * discount;

    let vol_sqrt_t = sigma * t.sqrt();
    let (call, put) = if vol_sqrt_t == 0.0 {
        trace!(spot = s, discounted_strike = discounted_strike, "zero-volatility branch");
        (s - discounted_strike, discounted_strike - s)
    } else {
        // σ²T/(σ√T) folded to σ√T/2: σ²T overflows once σ√T passes ~1e154
        let d1 = ((s / k).ln() + r * t) / vol_sqrt_t + 0.5 * vol_sqrt_t;
        let d2 = d1 - vol_sqrt_t;
        trace!(d1 = d1, d2 = d2, discount = discount, "closed-form branch");

        (
            s * cdf.cdf(d1) - discounted_strike * cdf.cdf(d2),
            discounted_strike * cdf.cdf(-d2) - s * cdf.cdf(-d1),
        )
    };

    // Checked before flooring: NaN.max(0.0) is 0.0
    check_finite("call price", call)?;
    check_finite("put price", put)?;

    // Floors only absorb rounding residue around zero
    Ok(PricingResult {
        call: call.max(0.0),
        put: put.max(0.0),
    })
}

fn check_finite(quantity: &str, value: f64) -> BsResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(PricingError::NumericalOverflow {
            quantity: quantity.to_string(),
            value,
        })
    }
}

/// Black-Scholes European call option price
///
/// # Parameters
/// - `s`: Current stock price
/// - `k`: Strike price
/// - `r`: Risk-free rate
/// - `t`: Time to expiration
/// - `sigma`: Volatility
pub fn bs_call_price(s: f64, k: f64, r: f64, t: f64, sigma: f64) -> BsResult<f64> {
    price(&MarketInputs::new(s, k, r, t, sigma)).map(|p| p.call)
}

/// Black-Scholes European put option price
///
/// Same parameters as [`bs_call_price`].
pub fn bs_put_price(s: f64, k: f64, r: f64, t: f64, sigma: f64) -> BsResult<f64> {
    price(&MarketInputs::new(s, k, r, t, sigma)).map(|p| p.put)
}
