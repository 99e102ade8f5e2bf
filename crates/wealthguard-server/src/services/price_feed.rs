//! Market price lookup
//!
//! Feeds may fail or be slow. `resolve_price` bounds every lookup with a
//! timeout and replaces failures with a random quote drawn from a range that
//! depends on the asset class, so a summary is always produced.

use std::ops::RangeInclusive;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rand::Rng;
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use wealthguard_core::{Asset, AssetType};

use crate::config::PriceFeedConfig;
use crate::error::{AppError, AppResult};
use crate::services::SharedRng;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PriceError {
    #[error("No quote available for {0}")]
    Unlisted(String),

    #[error("Price request failed: {0}")]
    Transport(String),

    #[error("Price request timed out")]
    Timeout,
}

#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn get_price(&self, symbol: &str, asset_type: &AssetType) -> Result<f64, PriceError>;
    fn name(&self) -> &str;
}

/// Fixed quotes for the demo stock universe.
pub fn stock_quote(symbol: &str) -> Option<f64> {
    match symbol {
        "Stock A" => Some(150.0),
        "Stock B" => Some(250.0),
        "Stock C" => Some(75.0),
        _ => None,
    }
}

fn coingecko_id(symbol: &str) -> Option<&'static str> {
    match symbol {
        "Bitcoin" => Some("bitcoin"),
        "Ethereum" => Some("ethereum"),
        "Cardano" => Some("cardano"),
        _ => None,
    }
}

// ============================================================================
// CoinGecko - live crypto quotes
// ============================================================================

#[derive(Clone)]
pub struct CoinGeckoFeed {
    client: Client,
    base_url: String,
}

impl CoinGeckoFeed {
    pub fn new(config: &PriceFeedConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to create HTTP client: {}", e)))?;

        tracing::debug!(base_url = %config.coingecko_url, "Creating CoinGecko price feed");

        Ok(Self {
            client,
            base_url: config.coingecko_url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_usd(&self, coin_id: &str) -> Result<f64, PriceError> {
        let start = Instant::now();
        let url = format!("{}/simple/price", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("ids", coin_id), ("vs_currencies", "usd")])
            .send()
            .await
            .map_err(|e| PriceError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PriceError::Transport(format!(
                "CoinGecko API error: {}",
                response.status()
            )));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| PriceError::Transport(e.to_string()))?;

        let price = json[coin_id]["usd"]
            .as_f64()
            .ok_or_else(|| PriceError::Transport(format!("Missing usd quote for {}", coin_id)))?;

        tracing::debug!(
            coin_id = %coin_id,
            price = %price,
            duration_ms = %start.elapsed().as_millis(),
            "Fetched CoinGecko quote"
        );

        Ok(price)
    }
}

#[async_trait]
impl PriceFeed for CoinGeckoFeed {
    async fn get_price(&self, symbol: &str, asset_type: &AssetType) -> Result<f64, PriceError> {
        match asset_type {
            AssetType::Crypto => {
                let coin_id =
                    coingecko_id(symbol).ok_or_else(|| PriceError::Unlisted(symbol.to_string()))?;
                self.fetch_usd(coin_id).await
            }
            AssetType::Stock => {
                stock_quote(symbol).ok_or_else(|| PriceError::Unlisted(symbol.to_string()))
            }
            _ => Err(PriceError::Unlisted(symbol.to_string())),
        }
    }

    fn name(&self) -> &str {
        "coingecko"
    }
}

// ============================================================================
// Static - offline quotes
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct StaticPriceFeed;

impl StaticPriceFeed {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PriceFeed for StaticPriceFeed {
    async fn get_price(&self, symbol: &str, asset_type: &AssetType) -> Result<f64, PriceError> {
        let quote = match asset_type {
            AssetType::Crypto => match symbol {
                "Bitcoin" => Some(60000.0),
                "Ethereum" => Some(3000.0),
                "Cardano" => Some(0.45),
                _ => None,
            },
            AssetType::Stock => stock_quote(symbol),
            _ => None,
        };
        quote.ok_or_else(|| PriceError::Unlisted(symbol.to_string()))
    }

    fn name(&self) -> &str {
        "static"
    }
}

// ============================================================================
// Fallback
// ============================================================================

/// Range a fallback quote is drawn from after a failed lookup.
pub fn fallback_range(asset_type: &AssetType, err: &PriceError) -> RangeInclusive<u32> {
    match (asset_type, err) {
        (AssetType::Crypto, PriceError::Unlisted(_)) => 100..=50_000,
        (AssetType::Crypto, _) => 1_000..=50_000,
        (AssetType::Stock, _) => 10..=500,
        _ => 50..=200,
    }
}

/// Quote `asset`, falling back to a random price on failure or timeout.
pub async fn resolve_price(
    feed: &dyn PriceFeed,
    asset: &Asset,
    timeout: Duration,
    rng: &SharedRng,
) -> Decimal {
    let result = tokio::time::timeout(timeout, feed.get_price(&asset.symbol, &asset.asset_type))
        .await
        .unwrap_or(Err(PriceError::Timeout));

    let err = match result {
        Ok(price) if price.is_finite() && price >= 0.0 => match Decimal::from_f64(price) {
            Some(quote) => return quote,
            None => PriceError::Transport(format!("Unrepresentable price {}", price)),
        },
        Ok(price) => PriceError::Transport(format!("Invalid price {}", price)),
        Err(e) => e,
    };

    let range = fallback_range(&asset.asset_type, &err);
    let fallback = rng.with(|rng| rng.gen_range(range));
    match &err {
        PriceError::Unlisted(_) => tracing::debug!(
            asset = %asset.symbol,
            feed = %feed.name(),
            fallback = %fallback,
            "No quote, using random price"
        ),
        _ => tracing::warn!(
            asset = %asset.symbol,
            feed = %feed.name(),
            error = %err,
            fallback = %fallback,
            "Price lookup failed, using random price"
        ),
    }
    Decimal::from(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    struct FailingFeed;

    #[async_trait]
    impl PriceFeed for FailingFeed {
        async fn get_price(&self, _: &str, _: &AssetType) -> Result<f64, PriceError> {
            Err(PriceError::Transport("connection refused".to_string()))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct SlowFeed;

    #[async_trait]
    impl PriceFeed for SlowFeed {
        async fn get_price(&self, _: &str, _: &AssetType) -> Result<f64, PriceError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(1.0)
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    fn in_range(value: Decimal, range: RangeInclusive<u32>) -> bool {
        value >= Decimal::from(*range.start()) && value <= Decimal::from(*range.end())
    }

    #[tokio::test]
    async fn test_static_feed_quotes() {
        let feed = StaticPriceFeed::new();
        assert_eq!(feed.get_price("Stock B", &AssetType::Stock).await, Ok(250.0));
        assert_eq!(feed.get_price("Bitcoin", &AssetType::Crypto).await, Ok(60000.0));
        assert_eq!(
            feed.get_price("Bond B", &AssetType::Bond).await,
            Err(PriceError::Unlisted("Bond B".to_string()))
        );
    }

    #[tokio::test]
    async fn test_resolve_known_price() {
        let rng = SharedRng::new(Some(1));
        let asset = Asset::new("Stock A", dec!(10), AssetType::Stock);
        let price = resolve_price(&StaticPriceFeed::new(), &asset, Duration::from_secs(5), &rng).await;
        assert_eq!(price, dec!(150));
    }

    #[tokio::test]
    async fn test_resolve_falls_back_per_asset_class() {
        let rng = SharedRng::new(Some(2));
        let timeout = Duration::from_secs(5);
        let feed = StaticPriceFeed::new();

        for _ in 0..20 {
            let bond = Asset::new("Bond B", dec!(1), AssetType::Bond);
            assert!(in_range(resolve_price(&feed, &bond, timeout, &rng).await, 50..=200));

            let stock = Asset::new("Stock Z", dec!(1), AssetType::Stock);
            assert!(in_range(resolve_price(&feed, &stock, timeout, &rng).await, 10..=500));

            let coin = Asset::new("Dogecoin", dec!(1), AssetType::Crypto);
            assert!(in_range(resolve_price(&feed, &coin, timeout, &rng).await, 100..=50_000));

            let btc = Asset::new("Bitcoin", dec!(1), AssetType::Crypto);
            assert!(in_range(
                resolve_price(&FailingFeed, &btc, timeout, &rng).await,
                1_000..=50_000
            ));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_times_out() {
        let rng = SharedRng::new(Some(3));
        let asset = Asset::new("Bitcoin", dec!(1), AssetType::Crypto);
        let price = resolve_price(&SlowFeed, &asset, Duration::from_secs(5), &rng).await;
        assert!(in_range(price, 1_000..=50_000));
    }

    #[test]
    fn test_fallback_ranges() {
        let unlisted = PriceError::Unlisted("x".to_string());
        assert_eq!(fallback_range(&AssetType::Crypto, &unlisted), 100..=50_000);
        assert_eq!(fallback_range(&AssetType::Crypto, &PriceError::Timeout), 1_000..=50_000);
        assert_eq!(fallback_range(&AssetType::Stock, &unlisted), 10..=500);
        assert_eq!(
            fallback_range(&AssetType::Other("Art".to_string()), &unlisted),
            50..=200
        );
    }
}
