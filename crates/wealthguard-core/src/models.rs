//! Data models shared by the scoring pipeline and the server
//!
//! Everything here is transient: values are built per request from caller
//! input and never persisted.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Portfolio Holdings
// =============================================================================

/// Asset class of a holding.
///
/// Known classes drive base risk and price lookup; anything else is kept
/// verbatim so distinct unknown classes still count towards diversification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssetType {
    Stock,
    Crypto,
    Bond,
    Other(String),
}

impl From<String> for AssetType {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "stock" => AssetType::Stock,
            "crypto" => AssetType::Crypto,
            "bond" => AssetType::Bond,
            _ => AssetType::Other(s),
        }
    }
}

impl From<&str> for AssetType {
    fn from(s: &str) -> Self {
        AssetType::from(s.to_string())
    }
}

impl From<AssetType> for String {
    fn from(t: AssetType) -> Self {
        t.to_string()
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetType::Stock => write!(f, "Stock"),
            AssetType::Crypto => write!(f, "Crypto"),
            AssetType::Bond => write!(f, "Bond"),
            AssetType::Other(name) => write!(f, "{}", name),
        }
    }
}

/// A single holding in a user's portfolio. Duplicates are allowed; a holding
/// has no identity beyond its position in the portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// Display name or ticker, e.g. "Bitcoin", "Stock A"
    #[serde(rename = "asset", alias = "symbol")]
    pub symbol: String,

    /// Units held
    pub amount: Decimal,

    #[serde(rename = "type")]
    pub asset_type: AssetType,
}

impl Asset {
    pub fn new(symbol: impl Into<String>, amount: Decimal, asset_type: AssetType) -> Self {
        Self {
            symbol: symbol.into(),
            amount,
            asset_type,
        }
    }
}

// =============================================================================
// Scoring Inputs
// =============================================================================

/// Caller-supplied stance that controls how volatility and contract risk are
/// weighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskPreference {
    Conservative,
    #[default]
    Neutral,
    Aggressive,
}

impl RiskPreference {
    /// Case-insensitive exact match. Unrecognized values fold into `Neutral`.
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "conservative" => RiskPreference::Conservative,
            "aggressive" => RiskPreference::Aggressive,
            _ => RiskPreference::Neutral,
        }
    }
}

impl fmt::Display for RiskPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskPreference::Conservative => write!(f, "conservative"),
            RiskPreference::Neutral => write!(f, "neutral"),
            RiskPreference::Aggressive => write!(f, "aggressive"),
        }
    }
}

pub const UNVERIFIED_SOURCE_ISSUE: &str = "Contract source not publicly verified";

/// Assessment of a smart-contract address produced by a contract classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractVerdict {
    pub address: String,
    pub verified: bool,
    pub risky: bool,
    /// `None` when the classifier found nothing to report
    pub issues: Option<Vec<String>>,
}

impl ContractVerdict {
    /// Verdict for a contract whose source could not be obtained.
    pub fn unverified(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            verified: false,
            risky: true,
            issues: Some(vec![UNVERIFIED_SOURCE_ISSUE.to_string()]),
        }
    }
}

// =============================================================================
// Ledger Boundary
// =============================================================================

/// Outcome of submitting a portfolio decision to a ledger verifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerReceipt {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub memo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl LedgerReceipt {
    pub fn failed(memo: String, error: impl Into<String>) -> Self {
        Self {
            success: false,
            transaction_id: None,
            status: None,
            memo,
            explorer_url: None,
            error: Some(error.into()),
            note: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_asset_type_parsing() {
        assert_eq!(AssetType::from("Crypto"), AssetType::Crypto);
        assert_eq!(AssetType::from("stock"), AssetType::Stock);
        assert_eq!(AssetType::from("BOND"), AssetType::Bond);
        assert_eq!(
            AssetType::from("Real Estate"),
            AssetType::Other("Real Estate".to_string())
        );
        assert_eq!(AssetType::Other("Gold".to_string()).to_string(), "Gold");
    }

    #[test]
    fn test_asset_json_shape() {
        let asset: Asset =
            serde_json::from_str(r#"{"asset": "Bitcoin", "amount": 0.5, "type": "Crypto"}"#)
                .unwrap();
        assert_eq!(asset.symbol, "Bitcoin");
        assert_eq!(asset.amount, dec!(0.5));
        assert_eq!(asset.asset_type, AssetType::Crypto);

        let json = serde_json::to_value(&asset).unwrap();
        assert_eq!(json["type"], "Crypto");
        assert_eq!(json["asset"], "Bitcoin");
    }

    #[test]
    fn test_risk_preference_parse() {
        assert_eq!(RiskPreference::parse("Conservative"), RiskPreference::Conservative);
        assert_eq!(RiskPreference::parse("AGGRESSIVE"), RiskPreference::Aggressive);
        assert_eq!(RiskPreference::parse("neutral"), RiskPreference::Neutral);
        assert_eq!(RiskPreference::parse("yolo"), RiskPreference::Neutral);
        assert_eq!(RiskPreference::parse(""), RiskPreference::Neutral);
    }

    #[test]
    fn test_unverified_verdict() {
        let verdict = ContractVerdict::unverified("0x0000000000000000000000000000000000000000");
        assert!(!verdict.verified);
        assert!(verdict.risky);
        let issues = verdict.issues.unwrap();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].to_lowercase().contains("source not"));
    }
}
