//! # WealthGuard Core
//!
//! Deterministic risk scoring for WealthGuard portfolios.
//!
//! This crate turns raw inputs into bounded scores: price history into a
//! volatility score, a volatility score plus an optional contract verdict into
//! a personalized recommendation, and a list of holdings into a portfolio
//! summary. Nothing here performs I/O; price quotes, contract verdicts and
//! ledger receipts are produced by the server's capability implementations.

pub mod advisor;
pub mod aggregator;
pub mod asset_risk;
pub mod error;
pub mod ledger;
pub mod models;
pub mod portfolio;
pub mod registry;
pub mod volatility;

pub use aggregator::*;
pub use asset_risk::*;
pub use error::*;
pub use ledger::*;
pub use models::*;
pub use portfolio::*;
pub use registry::*;
pub use volatility::*;
