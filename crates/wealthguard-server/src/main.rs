mod api;
mod config;
mod error;
mod services;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wealthguard_core::PortfolioRegistry;

use crate::config::{AppConfig, ContractsMode, LedgerMode, PriceFeedMode};
use crate::services::{
    CoinGeckoFeed, ContractClassifier, EtherscanClassifier, HederaLedgerVerifier, LedgerVerifier,
    MockLedgerVerifier, OfflineClassifier, PriceFeed, SharedRng, StaticPriceFeed,
};

pub use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub prices: Arc<dyn PriceFeed>,
    pub contracts: Arc<dyn ContractClassifier>,
    pub ledger: Arc<dyn LedgerVerifier>,
    pub registry: Arc<RwLock<PortfolioRegistry>>,
    pub rng: SharedRng,
}

impl AppState {
    /// Wire up capability implementations selected by `config`.
    pub fn from_config(config: AppConfig) -> AppResult<Self> {
        let prices: Arc<dyn PriceFeed> = match config.price_feed.mode {
            PriceFeedMode::Live => Arc::new(CoinGeckoFeed::new(&config.price_feed)?),
            PriceFeedMode::Static => Arc::new(StaticPriceFeed::new()),
        };
        let contracts: Arc<dyn ContractClassifier> = match config.contracts.mode {
            ContractsMode::Live => Arc::new(EtherscanClassifier::new(&config.contracts)?),
            ContractsMode::Offline => Arc::new(OfflineClassifier),
        };
        let ledger: Arc<dyn LedgerVerifier> = match config.ledger.mode {
            LedgerMode::Mock => Arc::new(MockLedgerVerifier),
            LedgerMode::Hedera => Arc::new(HederaLedgerVerifier::new(&config.ledger)?),
        };

        Ok(Self {
            registry: Arc::new(RwLock::new(PortfolioRegistry::new(
                config.users.default_tokens,
            ))),
            rng: SharedRng::new(config.risk.seed),
            config: Arc::new(config),
            prices,
            contracts,
            ledger,
        })
    }

    pub fn price_timeout(&self) -> Duration {
        Duration::from_secs(self.config.price_feed.timeout_seconds)
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(api::create_router())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wealthguard=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false),
        )
        .init();

    println!("================================================");
    println!("          WEALTHGUARD - Starting Up             ");
    println!("================================================");

    let config = AppConfig::load().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    println!("[CONFIG] Server: {}:{}", config.server.host, config.server.port);
    println!(
        "[CONFIG] Price feed: {:?} (timeout {}s)",
        config.price_feed.mode, config.price_feed.timeout_seconds
    );
    println!("[CONFIG] Contracts: {:?}", config.contracts.mode);
    println!(
        "[CONFIG] Ledger: {:?} on {}",
        config.ledger.mode, config.ledger.network
    );
    if config.ledger.mode == LedgerMode::Hedera && config.ledger.operator_key.is_empty() {
        println!("[CONFIG] Ledger operator key: *** EMPTY - PLEASE SET WEALTHGUARD__LEDGER__OPERATOR_KEY ***");
    }
    match config.risk.seed {
        Some(seed) => println!("[CONFIG] Risk seed: {}", seed),
        None => println!("[CONFIG] Risk seed: entropy"),
    }

    tracing::info!(
        host = %config.server.host,
        port = %config.server.port,
        "Starting WealthGuard"
    );

    let addr: SocketAddr = config.server_addr().parse()?;
    let state = AppState::from_config(config)?;
    tracing::info!(
        price_feed = %state.prices.name(),
        contracts = %state.contracts.name(),
        ledger = %state.ledger.mode(),
        "Capabilities ready"
    );

    let app = build_app(state);
    println!("[ROUTER] Routes configured: /health, /money_meter, /scam_check, /personalized_score, /combined_risk, /verify, /api/v1/users/*");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    println!("================================================");
    println!("  Server listening on http://{}", addr);
    println!("================================================");
    println!();

    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
