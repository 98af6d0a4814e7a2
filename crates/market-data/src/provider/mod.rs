//! Marketplace provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - Provider capabilities
//! - `ProviderClient`, which issues one request and classifies its outcome
//! - Concrete providers (Steam, CSFloat, Buff163)
//!
//! # Architecture
//!
//! Providers receive fully-built URLs. Name encoding and URL construction
//! happen in the resolver module, and fallback to synthetic data happens in
//! the dispatcher, not in the providers themselves.

mod capabilities;
pub mod client;
pub mod normalize;
mod traits;

pub mod buff163;
pub mod csfloat;
pub mod steam;

// Re-exports
pub use capabilities::ProviderCapabilities;
pub use client::{default_headers, ProviderClient, RawResponse};
pub use traits::MarketDataProvider;
