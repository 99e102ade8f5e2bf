//! Keyword advisor
//!
//! Answers a handful of canned questions about a computed portfolio summary.
//! Routing is by lower-cased keyword; the first matching topic wins.

use crate::portfolio::{AssetSummary, PortfolioSummary};

pub const HELP_TEXT: &str =
    "I can provide portfolio summary, risk report, recommendations, or current market values.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisorTopic {
    Risk,
    Summary,
    Recommendations,
    Prices,
    Best,
    Help,
}

impl AdvisorTopic {
    pub fn classify(question: &str) -> Self {
        let q = question.to_lowercase();
        if q.contains("risk") {
            AdvisorTopic::Risk
        } else if q.contains("summary") {
            AdvisorTopic::Summary
        } else if q.contains("recommend") || q.contains("advice") {
            AdvisorTopic::Recommendations
        } else if q.contains("price") || q.contains("value") {
            AdvisorTopic::Prices
        } else if q.contains("best") {
            AdvisorTopic::Best
        } else {
            AdvisorTopic::Help
        }
    }
}

pub fn respond(question: &str, summary: &PortfolioSummary) -> String {
    match AdvisorTopic::classify(question) {
        AdvisorTopic::Risk => {
            let names = joined_names(summary.high_risk_assets());
            if names.is_empty() {
                "No high-risk assets.".to_string()
            } else {
                format!("High-risk assets: {}", names)
            }
        }
        AdvisorTopic::Summary => render_table(
            &["Asset", "Amount", "MarketPrice", "Risk", "Recommendation"],
            summary.assets.iter().map(|a| {
                vec![
                    a.asset.clone(),
                    a.amount.to_string(),
                    a.market_price.to_string(),
                    a.risk.to_string(),
                    a.recommendation.clone(),
                ]
            }),
        ),
        AdvisorTopic::Recommendations => render_table(
            &["Asset", "Recommendation"],
            summary
                .assets
                .iter()
                .map(|a| vec![a.asset.clone(), a.recommendation.clone()]),
        ),
        AdvisorTopic::Prices => render_table(
            &["Asset", "MarketPrice", "CurrentValue"],
            summary.assets.iter().map(|a| {
                vec![
                    a.asset.clone(),
                    a.market_price.to_string(),
                    a.current_value.to_string(),
                ]
            }),
        ),
        AdvisorTopic::Best => {
            let names = joined_names(summary.low_risk_assets());
            if names.is_empty() {
                "All assets have medium/high risk. Consider diversification.".to_string()
            } else {
                format!("Lower-risk assets to consider increasing: {}", names)
            }
        }
        AdvisorTopic::Help => HELP_TEXT.to_string(),
    }
}

fn joined_names<'a>(assets: impl Iterator<Item = &'a AssetSummary>) -> String {
    assets.map(|a| a.asset.as_str()).collect::<Vec<_>>().join(", ")
}

/// Right-aligned plain-text table.
fn render_table(headers: &[&str], rows: impl Iterator<Item = Vec<String>>) -> String {
    let rows: Vec<Vec<String>> = rows.collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = vec![format_line(headers, &widths)];
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        lines.push(format_line(&cells, &widths));
    }
    lines.join("\n")
}

fn format_line(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:>width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetType;
    use crate::portfolio::{asset_recommendation, PortfolioStats};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn row(name: &str, risk: u8) -> AssetSummary {
        AssetSummary {
            asset: name.to_string(),
            amount: dec!(2),
            asset_type: AssetType::Crypto,
            market_price: dec!(100),
            current_value: dec!(200),
            risk,
            recommendation: asset_recommendation(risk).to_string(),
            last_updated: Utc::now(),
        }
    }

    fn summary(rows: Vec<AssetSummary>) -> PortfolioSummary {
        PortfolioSummary {
            diversification_score: 3,
            stats: PortfolioStats {
                total_value: dec!(200) * rust_decimal::Decimal::from(rows.len()),
                average_risk: 0.0,
                high_risk_count: 0,
            },
            assets: rows,
        }
    }

    #[test]
    fn test_classify_first_match_wins() {
        assert_eq!(AdvisorTopic::classify("What is the RISK?"), AdvisorTopic::Risk);
        assert_eq!(AdvisorTopic::classify("Show summary"), AdvisorTopic::Summary);
        assert_eq!(AdvisorTopic::classify("Give me advice"), AdvisorTopic::Recommendations);
        assert_eq!(AdvisorTopic::classify("Current prices"), AdvisorTopic::Prices);
        assert_eq!(AdvisorTopic::classify("Best action"), AdvisorTopic::Best);
        assert_eq!(AdvisorTopic::classify("hello"), AdvisorTopic::Help);
        // "risk" beats "summary"
        assert_eq!(AdvisorTopic::classify("risk summary"), AdvisorTopic::Risk);
    }

    #[test]
    fn test_risk_answers() {
        let s = summary(vec![row("Bitcoin", 9), row("Bond B", 3), row("Ethereum", 8)]);
        assert_eq!(respond("risk?", &s), "High-risk assets: Bitcoin, Ethereum");

        let calm = summary(vec![row("Bond B", 3)]);
        assert_eq!(respond("risk?", &calm), "No high-risk assets.");
    }

    #[test]
    fn test_best_answers() {
        let s = summary(vec![row("Bitcoin", 9), row("Bond B", 4)]);
        assert_eq!(
            respond("best move", &s),
            "Lower-risk assets to consider increasing: Bond B"
        );
        let hot = summary(vec![row("Bitcoin", 9)]);
        assert_eq!(
            respond("best move", &hot),
            "All assets have medium/high risk. Consider diversification."
        );
    }

    #[test]
    fn test_tables() {
        let s = summary(vec![row("Bitcoin", 9)]);
        let table = respond("recommendations please", &s);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("Asset"));
        assert!(lines[1].contains("High Risk: Reduce Exposure"));

        let prices = respond("current value", &s);
        assert!(prices.contains("CurrentValue"));
        assert!(prices.contains("200"));

        let full = respond("summary", &s);
        assert!(full.lines().next().unwrap().contains("MarketPrice"));
    }

    #[test]
    fn test_help() {
        assert_eq!(respond("what can you do", &summary(vec![])), HELP_TEXT);
    }
}
