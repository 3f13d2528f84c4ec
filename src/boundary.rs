// src/boundary.rs
//! Request and response shapes for callers that speak JSON
//!
//! Front ends name the five inputs differently (`S, K, T, r, sigma` or
//! `underlying_price, strike_price, time_to_expiry, risk_free_rate,
//! volatility`) and some send numbers as strings. [`QuoteRequest`] accepts
//! all of those. Answers use `call_price` / `put_price` or, for front ends
//! that post the long names, `call_option_price` / `put_option_price`
//! (see [`ResponseKeys`]). Serving HTTP is left to the caller.

use crate::analytics::bs_analytic::{price, round_to, MarketInputs, PricingResult};
use crate::error::{BsResult, PricingError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A JSON number or a string holding one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericField {
    Number(f64),
    Text(String),
}

impl NumericField {
    /// Parse to `f64`; text that is not a float is a [`PricingError::NonFiniteInput`]
    pub fn to_f64(&self, name: &str) -> BsResult<f64> {
        match self {
            NumericField::Number(v) => Ok(*v),
            NumericField::Text(s) => {
                s.trim()
                    .parse::<f64>()
                    .map_err(|_| PricingError::NonFiniteInput {
                        field: name.to_string(),
                        value: f64::NAN,
                    })
            }
        }
    }
}

impl From<f64> for NumericField {
    fn from(v: f64) -> Self {
        NumericField::Number(v)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    #[serde(alias = "S", alias = "underlying_price")]
    pub spot: NumericField,
    #[serde(alias = "K", alias = "strike_price")]
    pub strike: NumericField,
    #[serde(alias = "r", alias = "risk_free_rate")]
    pub rate: NumericField,
    #[serde(alias = "T", alias = "time_to_expiry")]
    pub time_to_maturity: NumericField,
    #[serde(alias = "sigma")]
    pub volatility: NumericField,
}

impl QuoteRequest {
    pub fn to_market_inputs(&self) -> BsResult<MarketInputs> {
        Ok(MarketInputs::new(
            self.spot.to_f64("spot")?,
            self.strike.to_f64("strike")?,
            self.rate.to_f64("rate")?,
            self.time_to_maturity.to_f64("time_to_maturity")?,
            self.volatility.to_f64("volatility")?,
        ))
    }
}

impl From<MarketInputs> for QuoteRequest {
    fn from(m: MarketInputs) -> Self {
        QuoteRequest {
            spot: m.spot.into(),
            strike: m.strike.into(),
            rate: m.rate.into(),
            time_to_maturity: m.time_to_maturity.into(),
            volatility: m.volatility.into(),
        }
    }
}

/// Key names used when serializing a [`QuoteResponse`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKeys {
    /// `call_price` / `put_price`
    #[default]
    Short,
    /// `call_option_price` / `put_option_price`
    Long,
}

// Request keys that only the long naming family uses
const LONG_REQUEST_KEYS: [&str; 4] = [
    "underlying_price",
    "strike_price",
    "time_to_expiry",
    "risk_free_rate",
];

impl ResponseKeys {
    /// Long keys if the request body used any long-form field name
    pub fn matching(body: &serde_json::Value) -> ResponseKeys {
        match body.as_object() {
            Some(map) if LONG_REQUEST_KEYS.iter().any(|k| map.contains_key(*k)) => {
                ResponseKeys::Long
            }
            _ => ResponseKeys::Short,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuoteResponse {
    #[serde(alias = "call_option_price")]
    pub call_price: f64,
    #[serde(alias = "put_option_price")]
    pub put_price: f64,
}

#[derive(Serialize)]
struct LongQuoteResponse {
    call_option_price: f64,
    put_option_price: f64,
}

impl QuoteResponse {
    pub fn rounded(&self, decimals: u32) -> QuoteResponse {
        QuoteResponse {
            call_price: round_to(self.call_price, decimals),
            put_price: round_to(self.put_price, decimals),
        }
    }

    /// Serialize with the chosen key names
    pub fn to_json(&self, keys: ResponseKeys) -> serde_json::Result<String> {
        match keys {
            ResponseKeys::Short => serde_json::to_string(self),
            ResponseKeys::Long => serde_json::to_string(&LongQuoteResponse {
                call_option_price: self.call_price,
                put_option_price: self.put_price,
            }),
        }
    }
}

impl From<PricingResult> for QuoteResponse {
    fn from(p: PricingResult) -> Self {
        QuoteResponse {
            call_price: p.call,
            put_price: p.put,
        }
    }
}

/// Error payload handed back to the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<&PricingError> for ErrorResponse {
    fn from(e: &PricingError) -> Self {
        ErrorResponse {
            error: e.to_string(),
            field: e.field().map(str::to_string),
        }
    }
}

impl From<PricingError> for ErrorResponse {
    fn from(e: PricingError) -> Self {
        ErrorResponse::from(&e)
    }
}

/// Price a decoded request, optionally rounding both legs
pub fn quote(request: &QuoteRequest, round: Option<u32>) -> Result<QuoteResponse, ErrorResponse> {
    let inputs = request.to_market_inputs()?;
    let response = QuoteResponse::from(price(&inputs)?);
    Ok(match round {
        Some(dp) => response.rounded(dp),
        None => response,
    })
}

/// Price a raw JSON body
///
/// Returns the serialized [`QuoteResponse`] on success and the serialized
/// [`ErrorResponse`] otherwise, including for malformed JSON. Response keys
/// follow the request's naming family (see [`ResponseKeys::matching`]).
pub fn quote_json(body: &str, round: Option<u32>) -> Result<String, String> {
    quote_json_with(body, round, None)
}

/// [`quote_json`] with explicit response keys; `None` matches the request
pub fn quote_json_with(
    body: &str,
    round: Option<u32>,
    keys: Option<ResponseKeys>,
) -> Result<String, String> {
    let malformed = |e: serde_json::Error| {
        debug!(error = %e, "malformed quote request");
        ErrorResponse {
            error: format!("Malformed request: {}", e),
            field: None,
        }
    };

    let outcome = serde_json::from_str::<serde_json::Value>(body)
        .map_err(malformed)
        .and_then(|value| {
            let keys = keys.unwrap_or_else(|| ResponseKeys::matching(&value));
            serde_json::from_value::<QuoteRequest>(value)
                .map_err(malformed)
                .map(|req| (req, keys))
        })
        .and_then(|(req, keys)| quote(&req, round).map(|response| (response, keys)));

    match outcome {
        Ok((response, keys)) => response.to_json(keys).map_err(|e| e.to_string()),
        Err(err) => Err(serde_json::to_string(&err).unwrap_or_else(|_| err.error.clone())),
    }
}
