//! Combined financial and security risk for a list of asset symbols
//!
//! Both tables use a 0-10 scale. Unknown symbols score the midpoint.

use serde::Serialize;

use crate::volatility::round_to;

pub const DEFAULT_SYMBOL_RISK: f64 = 5.0;

const FINANCIAL_WEIGHT: f64 = 0.6;
const SECURITY_WEIGHT: f64 = 0.4;

pub fn financial_risk(symbol: &str) -> f64 {
    match symbol {
        "BTC" => 8.5,
        "ETH" => 7.5,
        "AAPL" => 4.0,
        "TSLA" => 6.5,
        "GOOGL" => 3.5,
        "MSFT" => 3.0,
        "BOND" => 1.5,
        "GOLD" => 2.0,
        _ => DEFAULT_SYMBOL_RISK,
    }
}

pub fn security_risk(symbol: &str) -> f64 {
    match symbol {
        "BTC" => 6.0,
        "ETH" => 7.0,
        "AAPL" => 2.0,
        "TSLA" => 2.5,
        "GOOGL" => 2.0,
        "MSFT" => 2.0,
        "BOND" => 1.0,
        "GOLD" => 1.5,
        _ => DEFAULT_SYMBOL_RISK,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

impl RiskBand {
    /// `<= 3` low, `(3, 6]` medium, `> 6` high.
    pub fn from_score(combined: f64) -> Self {
        if combined <= 3.0 {
            RiskBand::Low
        } else if combined <= 6.0 {
            RiskBand::Medium
        } else {
            RiskBand::High
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            RiskBand::Low => "Low Risk - Good to proceed",
            RiskBand::Medium => "Medium Risk - Consider diversification",
            RiskBand::High => "High Risk - Strong caution advised",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedRisk {
    pub combined_score: f64,
    pub financial_risk: f64,
    pub security_risk: f64,
    pub band: RiskBand,
    pub recommendation: String,
}

fn mean_or_default(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return DEFAULT_SYMBOL_RISK;
    }
    values.sum::<f64>() / n as f64
}

/// Average both tables over `symbols` and blend them 60/40.
///
/// The band is chosen from the unrounded blend; reported scores are rounded
/// to two decimals.
pub fn calculate_combined_risk<S: AsRef<str>>(symbols: &[S]) -> CombinedRisk {
    let financial = mean_or_default(symbols.iter().map(|s| financial_risk(s.as_ref())));
    let security = mean_or_default(symbols.iter().map(|s| security_risk(s.as_ref())));
    let combined = FINANCIAL_WEIGHT * financial + SECURITY_WEIGHT * security;
    let band = RiskBand::from_score(combined);

    CombinedRisk {
        combined_score: round_to(combined, 2),
        financial_risk: round_to(financial, 2),
        security_risk: round_to(security, 2),
        band,
        recommendation: band.recommendation().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_portfolio() {
        let risk = calculate_combined_risk(&["BTC", "AAPL", "BOND"]);
        assert_eq!(risk.financial_risk, 4.67);
        assert_eq!(risk.security_risk, 3.0);
        assert_eq!(risk.combined_score, 4.0);
        assert_eq!(risk.band, RiskBand::Medium);
        assert_eq!(risk.recommendation, "Medium Risk - Consider diversification");
    }

    #[test]
    fn test_crypto_heavy_portfolio() {
        // 0.6 * 8.0 + 0.4 * 6.5
        let risk = calculate_combined_risk(&["BTC", "ETH"]);
        assert_eq!(risk.combined_score, 7.4);
        assert_eq!(risk.band, RiskBand::High);
    }

    #[test]
    fn test_blue_chip_portfolio() {
        // 0.6 * 3.25 + 0.4 * 2.0
        let risk = calculate_combined_risk(&["GOOGL", "MSFT"]);
        assert_eq!(risk.combined_score, 2.75);
        assert_eq!(risk.band, RiskBand::Low);
        assert_eq!(risk.recommendation, "Low Risk - Good to proceed");
    }

    #[test]
    fn test_empty_and_unknown_symbols_default() {
        let empty: [&str; 0] = [];
        let risk = calculate_combined_risk(&empty);
        assert_eq!(risk.financial_risk, 5.0);
        assert_eq!(risk.security_risk, 5.0);
        assert_eq!(risk.combined_score, 5.0);
        assert_eq!(risk.band, RiskBand::Medium);

        let risk = calculate_combined_risk(&["DOGE".to_string()]);
        assert_eq!(risk.combined_score, 5.0);
    }

    #[test]
    fn test_band_edges() {
        assert_eq!(RiskBand::from_score(3.0), RiskBand::Low);
        assert_eq!(RiskBand::from_score(3.01), RiskBand::Medium);
        assert_eq!(RiskBand::from_score(6.0), RiskBand::Medium);
        assert_eq!(RiskBand::from_score(6.01), RiskBand::High);
    }
}
