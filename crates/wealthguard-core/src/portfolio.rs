//! Portfolio summary
//!
//! Prices every holding, assigns a jittered per-asset risk and derives
//! portfolio-level statistics. Summaries are recomputed from scratch on every
//! request and never mutate the holdings they were built from.
//!
//! The jitter is the only non-deterministic step in this crate; callers pass
//! the random source in so it can be seeded.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{WealthGuardError, WealthGuardResult};
use crate::models::{Asset, AssetType};
use crate::volatility::round_to;

pub const MIN_ASSET_RISK: u8 = 1;
pub const MAX_ASSET_RISK: u8 = 10;
pub const HIGH_RISK_THRESHOLD: u8 = 8;
pub const LOW_RISK_THRESHOLD: u8 = 4;

/// Upper bound of the uniform jitter added to the base risk.
const RISK_JITTER: f64 = 3.0;

/// Number of known asset classes a fully diversified portfolio spans.
const KNOWN_ASSET_CLASSES: f64 = 3.0;

#[derive(Debug, Clone, Serialize)]
pub struct AssetSummary {
    pub asset: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub asset_type: AssetType,
    pub market_price: Decimal,
    pub current_value: Decimal,
    pub risk: u8,
    pub recommendation: String,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioStats {
    pub total_value: Decimal,
    /// Mean per-asset risk, one decimal place
    pub average_risk: f64,
    pub high_risk_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortfolioSummary {
    pub assets: Vec<AssetSummary>,
    pub diversification_score: u8,
    pub stats: PortfolioStats,
}

impl PortfolioSummary {
    pub fn high_risk_assets(&self) -> impl Iterator<Item = &AssetSummary> {
        self.assets.iter().filter(|a| a.risk >= HIGH_RISK_THRESHOLD)
    }

    pub fn low_risk_assets(&self) -> impl Iterator<Item = &AssetSummary> {
        self.assets.iter().filter(|a| a.risk <= LOW_RISK_THRESHOLD)
    }
}

pub fn base_risk(asset_type: &AssetType) -> f64 {
    match asset_type {
        AssetType::Stock => 5.0,
        AssetType::Crypto => 7.0,
        AssetType::Bond => 3.0,
        AssetType::Other(_) => 5.0,
    }
}

/// Base risk plus `uniform(0, 3)`, truncated and clamped to 1..=10.
pub fn jittered_risk<R: Rng + ?Sized>(asset_type: &AssetType, rng: &mut R) -> u8 {
    let risk = base_risk(asset_type) + rng.gen_range(0.0..=RISK_JITTER);
    (risk.trunc() as i64).clamp(i64::from(MIN_ASSET_RISK), i64::from(MAX_ASSET_RISK)) as u8
}

pub fn asset_recommendation(risk: u8) -> &'static str {
    if risk >= HIGH_RISK_THRESHOLD {
        "High Risk: Reduce Exposure"
    } else if risk >= 5 {
        "Medium Risk: Hold"
    } else {
        "Low Risk: Consider Increasing"
    }
}

/// `min(10, round(distinct_types / 3 * 10))`; 0 for an empty portfolio.
pub fn diversification_score(assets: &[Asset]) -> u8 {
    let distinct: HashSet<&AssetType> = assets.iter().map(|a| &a.asset_type).collect();
    if distinct.is_empty() {
        return 0;
    }
    let score = (distinct.len() as f64 / KNOWN_ASSET_CLASSES * 10.0).round_ties_even();
    score.min(10.0) as u8
}

fn value_overflow(symbol: &str) -> WealthGuardError {
    WealthGuardError::InvalidParam(format!("Holding value out of range for {}", symbol))
}

/// Build a summary for `assets`.
///
/// `price_lookup` resolves a market price per holding and is expected to
/// already have applied any fallback; it is called once per holding, in order.
///
/// Fails with `InvalidParam` when a holding value or the portfolio total does
/// not fit in a `Decimal`.
pub fn build_summary<F, R>(
    assets: &[Asset],
    mut price_lookup: F,
    rng: &mut R,
) -> WealthGuardResult<PortfolioSummary>
where
    F: FnMut(&Asset) -> Decimal,
    R: Rng + ?Sized,
{
    let now = Utc::now();

    let mut rows = Vec::with_capacity(assets.len());
    let mut total_value = Decimal::ZERO;
    for asset in assets {
        let market_price = price_lookup(asset);
        let current_value = asset
            .amount
            .checked_mul(market_price)
            .ok_or_else(|| value_overflow(&asset.symbol))?;
        total_value = total_value
            .checked_add(current_value)
            .ok_or_else(|| value_overflow(&asset.symbol))?;

        let risk = jittered_risk(&asset.asset_type, rng);
        rows.push(AssetSummary {
            asset: asset.symbol.clone(),
            amount: asset.amount,
            asset_type: asset.asset_type.clone(),
            market_price,
            current_value,
            risk,
            recommendation: asset_recommendation(risk).to_string(),
            last_updated: now,
        });
    }

    let average_risk = if rows.is_empty() {
        0.0
    } else {
        let total: u32 = rows.iter().map(|r| u32::from(r.risk)).sum();
        round_to(f64::from(total) / rows.len() as f64, 1)
    };
    let high_risk_count = rows.iter().filter(|r| r.risk >= HIGH_RISK_THRESHOLD).count();

    Ok(PortfolioSummary {
        diversification_score: diversification_score(assets),
        stats: PortfolioStats {
            total_value,
            average_risk,
            high_risk_count,
        },
        assets: rows,
    })
}
