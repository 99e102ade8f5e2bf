//! Personalized risk score
//!
//! Blends a volatility score with a fixed penalty for risky contracts, using
//! weights chosen by the caller's risk preference, and labels the result.

use serde::Serialize;

use crate::error::WealthGuardResult;
use crate::models::{ContractVerdict, RiskPreference};
use crate::volatility::{compute_volatility_score, require_price_history};

/// Penalty folded into the blend when a contract verdict says `risky`.
pub const CONTRACT_RISK_PENALTY: f64 = 40.0;

pub const CONSERVATIVE_AVOID_THRESHOLD: u8 = 50;
pub const AGGRESSIVE_CAUTION_THRESHOLD: u8 = 80;

/// Relative weight of volatility versus contract risk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub volatility: f64,
    pub contract: f64,
}

impl RiskPreference {
    pub fn weights(&self) -> ScoreWeights {
        let (volatility, contract) = match self {
            RiskPreference::Conservative => (0.7, 0.3),
            RiskPreference::Aggressive => (0.4, 0.6),
            RiskPreference::Neutral => (0.55, 0.45),
        };
        ScoreWeights {
            volatility,
            contract,
        }
    }

    /// Recommendation for a final score under this preference.
    ///
    /// Neutral ignores the score entirely.
    pub fn recommendation(&self, final_score: u8) -> &'static str {
        match self {
            RiskPreference::Conservative if final_score > CONSERVATIVE_AVOID_THRESHOLD => {
                "Avoid: too risky for a conservative profile"
            }
            RiskPreference::Conservative => "Acceptable for conservative investors",
            RiskPreference::Aggressive if final_score > AGGRESSIVE_CAUTION_THRESHOLD => {
                "High risk: suitable for aggressive investors with caution"
            }
            RiskPreference::Aggressive => "Within acceptable risk for aggressive investors",
            RiskPreference::Neutral => "Matches neutral risk profile",
        }
    }
}

/// Blended score and its label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateScore {
    pub score: u8,
    pub recommendation: String,
}

/// Full result of a personalized scoring request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersonalizedScore {
    /// Final 0-100 score, higher is riskier
    pub score: u8,
    /// Volatility score the final score was blended from
    pub volatility: u8,
    pub sigma: f64,
    pub scam: Option<ContractVerdict>,
    pub recommendation: String,
}

/// Contract penalty contributed by an optional verdict.
pub fn contract_penalty(verdict: Option<&ContractVerdict>) -> f64 {
    match verdict {
        Some(v) if v.risky => CONTRACT_RISK_PENALTY,
        _ => 0.0,
    }
}

/// `min(100, round(w_vol * volatility_score + w_scam * penalty))` plus label.
pub fn aggregate(
    volatility_score: u8,
    preference: RiskPreference,
    verdict: Option<&ContractVerdict>,
) -> AggregateScore {
    let weights = preference.weights();
    let blended = weights.volatility * f64::from(volatility_score)
        + weights.contract * contract_penalty(verdict);
    let score = blended.round_ties_even().clamp(0.0, 100.0) as u8;

    AggregateScore {
        score,
        recommendation: preference.recommendation(score).to_string(),
    }
}

/// Score a price history for a caller with the given preference string.
///
/// Fails when fewer than two prices are supplied.
pub fn personalized_score(
    prices: &[f64],
    risk_preference: &str,
    verdict: Option<ContractVerdict>,
) -> WealthGuardResult<PersonalizedScore> {
    require_price_history(prices)?;

    let reading = compute_volatility_score(prices);
    let preference = RiskPreference::parse(risk_preference);
    let blended = aggregate(reading.score, preference, verdict.as_ref());

    Ok(PersonalizedScore {
        score: blended.score,
        volatility: reading.score,
        sigma: reading.sigma,
        scam: verdict,
        recommendation: blended.recommendation,
    })
}
