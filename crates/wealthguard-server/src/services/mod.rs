//! Capability implementations for the collaborators the scoring core depends
//! on: market prices, contract verdicts and ledger receipts.
//!
//! Each capability has a live and an offline implementation, chosen from
//! configuration when the server starts.

pub mod contracts;
pub mod ledger;
pub mod price_feed;

use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::SeedableRng;

pub use contracts::{ContractClassifier, EtherscanClassifier, OfflineClassifier};
pub use ledger::{HederaLedgerVerifier, LedgerVerifier, MockLedgerVerifier};
pub use price_feed::{resolve_price, CoinGeckoFeed, PriceFeed, StaticPriceFeed};

/// Process-wide random source for risk jitter and fallback prices.
///
/// Seeded from `risk.seed` so runs can be reproduced.
#[derive(Debug, Clone)]
pub struct SharedRng {
    rng: Arc<Mutex<StdRng>>,
}

impl SharedRng {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Arc::new(Mutex::new(rng)),
        }
    }

    /// Run `f` with exclusive access to the generator. Never hold this across
    /// an await point.
    pub fn with<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let a = SharedRng::new(Some(11));
        let b = SharedRng::new(Some(11));
        let xs: Vec<u32> = (0..5).map(|_| a.with(|rng| rng.gen_range(0..1000))).collect();
        let ys: Vec<u32> = (0..5).map(|_| b.with(|rng| rng.gen_range(0..1000))).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_clones_share_state() {
        let a = SharedRng::new(Some(5));
        let reference = SharedRng::new(Some(5));
        let clone = a.clone();
        let first = a.with(|rng| rng.gen::<u64>());
        let second = clone.with(|rng| rng.gen::<u64>());
        let expected: Vec<u64> = (0..2).map(|_| reference.with(|rng| rng.gen::<u64>())).collect();
        assert_eq!(vec![first, second], expected);
    }
}
