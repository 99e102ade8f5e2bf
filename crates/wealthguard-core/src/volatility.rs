//! Volatility scoring
//!
//! Price history becomes log returns, log returns become a population
//! standard deviation (sigma), and sigma is squashed into a 0-100 score with
//! `tanh(2 * sigma)`.
//!
//! All rounding in this crate is round-half-to-even.

use serde::Serialize;

use crate::error::{WealthGuardError, WealthGuardResult};

/// Fewest price points a volatility-dependent request may carry.
pub const MIN_PRICE_POINTS: usize = 2;

/// Sigma and its bounded score.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct VolatilityReading {
    /// 0-100, non-decreasing in sigma
    pub score: u8,
    pub sigma: f64,
}

/// Reject price histories too short to carry a return.
pub fn require_price_history(prices: &[f64]) -> WealthGuardResult<()> {
    if prices.len() < MIN_PRICE_POINTS {
        return Err(WealthGuardError::InsufficientPrices { got: prices.len() });
    }
    Ok(())
}

/// `ln(p[i] / p[i-1])` for every adjacent pair where both prices are finite
/// and strictly positive. Other pairs are skipped, not zero-filled.
///
/// Computed as `ln(p[i]) - ln(p[i-1])` so extreme ratios stay finite.
pub fn compute_log_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .filter(|pair| is_valid_price(pair[0]) && is_valid_price(pair[1]))
        .map(|pair| pair[1].ln() - pair[0].ln())
        .filter(|r| r.is_finite())
        .collect()
}

fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

/// Score a price series. Series with no valid return score `(0, 0.0)`.
pub fn compute_volatility_score(prices: &[f64]) -> VolatilityReading {
    score_returns(&compute_log_returns(prices))
}

pub fn score_returns(returns: &[f64]) -> VolatilityReading {
    if returns.is_empty() {
        return VolatilityReading::default();
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns
        .iter()
        .map(|r| {
            let diff = r - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;
    let sigma = variance.sqrt();

    VolatilityReading {
        score: score_from_sigma(sigma),
        sigma,
    }
}

/// Map sigma onto 0-100 via `round(min(100, tanh(2 * sigma) * 100))`.
pub fn score_from_sigma(sigma: f64) -> u8 {
    if sigma.is_nan() {
        return 0;
    }
    let normalized = (sigma * 2.0).tanh();
    (normalized * 100.0)
        .min(100.0)
        .round_ties_even()
        .clamp(0.0, 100.0) as u8
}

/// Round to `dp` decimal places, ties to even.
pub(crate) fn round_to(value: f64, dp: i32) -> f64 {
    let factor = 10f64.powi(dp);
    (value * factor).round_ties_even() / factor
}
