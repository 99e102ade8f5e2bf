use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub price_feed: PriceFeedConfig,
    pub contracts: ContractsConfig,
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    pub users: UsersConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PriceFeedMode {
    /// CoinGecko for crypto, fixed table for stocks
    Live,
    /// Fixed quotes only, no network
    Static,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PriceFeedConfig {
    pub mode: PriceFeedMode,
    pub coingecko_url: String,
    pub timeout_seconds: u64,
}

impl Default for PriceFeedConfig {
    fn default() -> Self {
        Self {
            mode: PriceFeedMode::Live,
            coingecko_url: "https://api.coingecko.com/api/v3".to_string(),
            timeout_seconds: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContractsMode {
    /// Fetch verified source from Etherscan
    Live,
    /// Never fetch; every contract is reported unverified
    Offline,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContractsConfig {
    pub mode: ContractsMode,
    pub etherscan_url: String,
    pub timeout_seconds: u64,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            mode: ContractsMode::Live,
            etherscan_url: "https://api.etherscan.io/api".to_string(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LedgerMode {
    Mock,
    Hedera,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LedgerConfig {
    pub mode: LedgerMode,
    pub network: String,
    pub account_id: String,
    /// Bearer credential presented to the submission relay
    pub operator_key: String,
    /// Relay endpoint that signs and submits memo transactions
    pub submit_url: String,
    pub timeout_seconds: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            mode: LedgerMode::Mock,
            network: "testnet".to_string(),
            account_id: String::new(),
            operator_key: String::new(),
            submit_url: String::new(),
            timeout_seconds: 10,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RiskConfig {
    /// Seeds risk jitter and fallback prices; entropy when unset
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UsersConfig {
    pub default_tokens: u32,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            default_tokens: wealthguard_core::DEFAULT_TOKENS,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();
        let config = Config::builder()
            // Start with default values
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", defaults.server.port as i64)?
            .set_default("price_feed.mode", "live")?
            .set_default("price_feed.coingecko_url", defaults.price_feed.coingecko_url)?
            .set_default("price_feed.timeout_seconds", defaults.price_feed.timeout_seconds as i64)?
            .set_default("contracts.mode", "live")?
            .set_default("contracts.etherscan_url", defaults.contracts.etherscan_url)?
            .set_default("contracts.timeout_seconds", defaults.contracts.timeout_seconds as i64)?
            .set_default("ledger.mode", "mock")?
            .set_default("ledger.network", defaults.ledger.network)?
            .set_default("ledger.account_id", "")?
            .set_default("ledger.operator_key", "")?
            .set_default("ledger.submit_url", "")?
            .set_default("ledger.timeout_seconds", defaults.ledger.timeout_seconds as i64)?
            .set_default("users.default_tokens", defaults.users.default_tokens as i64)?
            // Load from config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (WEALTHGUARD__SERVER__PORT, etc.)
            .add_source(
                Environment::with_prefix("WEALTHGUARD")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
