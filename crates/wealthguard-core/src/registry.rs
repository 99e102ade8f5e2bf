//! In-process user registry
//!
//! Holds each user's holdings and remaining advisor tokens for the lifetime of
//! the process. The server owns one instance; it is only cleared by `reset`.

use std::collections::HashMap;

use crate::error::{WealthGuardError, WealthGuardResult};
use crate::models::Asset;

pub const DEFAULT_TOKENS: u32 = 10;

#[derive(Debug, Clone)]
pub struct PortfolioRegistry {
    portfolios: HashMap<String, Vec<Asset>>,
    tokens: HashMap<String, u32>,
    default_tokens: u32,
}

impl Default for PortfolioRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_TOKENS)
    }
}

impl PortfolioRegistry {
    pub fn new(default_tokens: u32) -> Self {
        Self {
            portfolios: HashMap::new(),
            tokens: HashMap::new(),
            default_tokens,
        }
    }

    /// Register a user with an empty portfolio and the default token
    /// allowance. Returns false if the user already exists.
    pub fn create_user(&mut self, username: &str) -> bool {
        if self.portfolios.contains_key(username) {
            return false;
        }
        self.portfolios.insert(username.to_string(), Vec::new());
        self.tokens.insert(username.to_string(), self.default_tokens);
        true
    }

    pub fn contains_user(&self, username: &str) -> bool {
        self.portfolios.contains_key(username)
    }

    /// Remaining tokens; 0 for unknown users.
    pub fn tokens(&self, username: &str) -> u32 {
        self.tokens.get(username).copied().unwrap_or(0)
    }

    /// Spend one token. Returns false when none are left.
    pub fn use_token(&mut self, username: &str) -> bool {
        match self.tokens.get_mut(username) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }

    /// Spend one token or explain why not.
    pub fn spend_token(&mut self, username: &str) -> WealthGuardResult<u32> {
        if !self.contains_user(username) {
            return Err(WealthGuardError::UnknownUser(username.to_string()));
        }
        if !self.use_token(username) {
            return Err(WealthGuardError::TokensExhausted(username.to_string()));
        }
        Ok(self.tokens(username))
    }

    /// Append a holding. An unknown user gets a portfolio but no tokens.
    pub fn add_asset(&mut self, username: &str, asset: Asset) -> usize {
        let portfolio = self.portfolios.entry(username.to_string()).or_default();
        portfolio.push(asset);
        portfolio.len()
    }

    /// Copy of the user's holdings; empty for unknown users.
    pub fn portfolio(&self, username: &str) -> Vec<Asset> {
        self.portfolios.get(username).cloned().unwrap_or_default()
    }

    pub fn user_count(&self) -> usize {
        self.portfolios.len()
    }

    pub fn reset(&mut self) {
        self.portfolios.clear();
        self.tokens.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AssetType;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_user_once() {
        let mut registry = PortfolioRegistry::default();
        assert!(registry.create_user("finance_demo"));
        assert!(!registry.create_user("finance_demo"));
        assert_eq!(registry.tokens("finance_demo"), DEFAULT_TOKENS);
        assert_eq!(registry.user_count(), 1);
    }

    #[test]
    fn test_tokens_run_out() {
        let mut registry = PortfolioRegistry::new(2);
        registry.create_user("alice");
        assert!(registry.use_token("alice"));
        assert!(registry.use_token("alice"));
        assert!(!registry.use_token("alice"));
        assert_eq!(registry.tokens("alice"), 0);
        assert!(!registry.use_token("nobody"));
        assert_eq!(registry.tokens("nobody"), 0);
    }

    #[test]
    fn test_spend_token_errors() {
        let mut registry = PortfolioRegistry::new(1);
        assert_eq!(
            registry.spend_token("ghost"),
            Err(WealthGuardError::UnknownUser("ghost".to_string()))
        );
        registry.create_user("bob");
        assert_eq!(registry.spend_token("bob"), Ok(0));
        assert_eq!(
            registry.spend_token("bob"),
            Err(WealthGuardError::TokensExhausted("bob".to_string()))
        );
    }

    #[test]
    fn test_add_asset_and_portfolio() {
        let mut registry = PortfolioRegistry::default();
        registry.create_user("carol");
        let btc = Asset::new("Bitcoin", dec!(0.5), AssetType::Crypto);
        assert_eq!(registry.add_asset("carol", btc.clone()), 1);
        assert_eq!(registry.add_asset("carol", btc.clone()), 2);
        assert_eq!(registry.portfolio("carol"), vec![btc.clone(), btc]);
        assert!(registry.portfolio("nobody").is_empty());
    }

    #[test]
    fn test_add_asset_for_unregistered_user() {
        let mut registry = PortfolioRegistry::default();
        registry.add_asset("dave", Asset::new("Bond B", dec!(100), AssetType::Bond));
        assert_eq!(registry.portfolio("dave").len(), 1);
        assert_eq!(registry.tokens("dave"), 0);
    }

    #[test]
    fn test_reset() {
        let mut registry = PortfolioRegistry::default();
        registry.create_user("erin");
        registry.reset();
        assert!(!registry.contains_user("erin"));
        assert_eq!(registry.tokens("erin"), 0);
    }
}
