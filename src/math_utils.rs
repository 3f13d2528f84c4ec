// src/math_utils.rs
use std::f64::consts::SQRT_2;

/// Standard normal cumulative distribution function
///
/// # Formula
/// ```text
/// Φ(x) = 0.5 * (1 + erf(x / √2))      x >= 0
/// Φ(x) = 0.5 * erfc(-x / √2)          x < 0
/// ```
///
/// Both forms are the same identity; the left tail goes through `erfc` so
/// `1 + erf` does not cancel and `Φ(-8) ≈ 6.22e-16` keeps full relative
/// precision. `erf` is odd, so `Φ(-x) = 1 - Φ(x)` holds algebraically.
/// Infinite arguments saturate to `0.0` / `1.0`.
pub fn norm_cdf(x: f64) -> f64 {
    if x.is_infinite() {
        return if x > 0.0 { 1.0 } else { 0.0 };
    }
    let p = if x < 0.0 {
        0.5 * libm::erfc(-x / SQRT_2)
    } else {
        0.5 * (1.0 + libm::erf(x / SQRT_2))
    };
    p.clamp(0.0, 1.0)
}

/// Evaluator for the standard normal CDF used by the pricer.
///
/// Implemented for [`ErfNormalCdf`] and for any `Fn(f64) -> f64` closure that
/// is `Send + Sync`, so callers can inject an instrumented or alternative
/// evaluator.
pub trait CdfEvaluator: Send + Sync {
    fn cdf(&self, x: f64) -> f64;
}

/// Default evaluator backed by [`norm_cdf`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ErfNormalCdf;

impl CdfEvaluator for ErfNormalCdf {
    fn cdf(&self, x: f64) -> f64 {
        norm_cdf(x)
    }
}

impl<F> CdfEvaluator for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn cdf(&self, x: f64) -> f64 {
        self(x)
    }
}

pub struct Timer {
    start_time: std::time::Instant,
}

impl Timer {
    pub fn new() -> Timer {
        Timer {
            start_time: std::time::Instant::now(),
        }
    }

    pub fn start(&mut self) {
        self.start_time = std::time::Instant::now();
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}
