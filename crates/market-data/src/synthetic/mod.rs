//! Synthetic data fallback.
//!
//! Fabricates plausible price histories and listing sets when every real
//! attempt has failed. Output is shape-identical to real data and always
//! returned as [`crate::models::FetchResult::Synthetic`].
//!
//! Generators never fail: unknown items and degenerate ranges fall back to
//! the defaults in [`base_prices`].
//!
//! Randomness comes from an injected [`RandomSource`], so a [`SeededSource`]
//! makes every generated series reproducible.

pub mod base_prices;
mod history;
mod listings;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::models::{Listing, ListingFilters, PricePoint};

pub use history::{synthesize_price_history, PRICE_FLOOR_RATIO};
pub use listings::{synthesize_listings, GENERIC_ICON_REF, MAX_LISTINGS, MIN_LISTINGS};

/// Supplies a fresh RNG per generated result.
pub trait RandomSource: Send + Sync {
    fn rng(&self) -> StdRng;
}

/// OS entropy, for production.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntropySource;

impl RandomSource for EntropySource {
    fn rng(&self) -> StdRng {
        StdRng::from_entropy()
    }
}

/// The same seed for every call.
#[derive(Clone, Copy, Debug)]
pub struct SeededSource {
    seed: u64,
}

impl SeededSource {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl RandomSource for SeededSource {
    fn rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }
}

/// Convenience wrapper binding the generators to a random source and clock.
pub struct SyntheticGenerator<'a> {
    source: &'a dyn RandomSource,
    now: DateTime<Utc>,
}

impl<'a> SyntheticGenerator<'a> {
    pub fn new(source: &'a dyn RandomSource, now: DateTime<Utc>) -> Self {
        Self { source, now }
    }

    pub fn price_history(&self, key: &str, days: u32) -> Vec<PricePoint> {
        synthesize_price_history(&mut self.source.rng(), key, days, self.now)
    }

    pub fn listings(&self, filters: &ListingFilters) -> Vec<Listing> {
        synthesize_listings(&mut self.source.rng(), filters, self.now)
    }
}
