//! Floatwatch Market Data Crate
//!
//! This crate retrieves price histories and live listings for collectible
//! items from several independent marketplaces, and guarantees a usable
//! result even when every real source fails.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Price history from Steam and CSFloat, keyed by market hash name
//! - Live CSFloat listings filtered by float range and def/paint index
//! - Buff163 goods history through a multi-variant retry cascade
//! - Deterministic synthetic fallback, always tagged as such
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +------------------+
//! |  Message layer   | --> |   Dispatcher     |  (typed request routing)
//! +------------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    Resolver      |  (name encoder, URL builder)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    Provider      |  (Steam, CSFloat, Buff163)
//!                          +------------------+
//!                                  |
//!                      on failure  v
//!                          +------------------+
//!                          |  Retry cascade   |  (Buff163 only)
//!                          +------------------+
//!                                  |
//!                    on exhaustion v
//!                          +------------------+
//!                          |    Synthetic     |  (seeded generators)
//!                          +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`Dispatcher`] - Single entry point returning a [`FetchResult`]
//! - [`FetchResult`] - `Real` or `Synthetic`; never hides which
//! - [`PricePoint`] - Timestamped price observation
//! - [`Listing`] - Marketplace listing, always sorted by price
//! - [`ActionRegistry`] - Action name to handler routing for inbound messages
//! - [`MarketDataError`] - Classified failures with a [`RetryClass`]
//!
//! # Type Aliases
//!
//! - [`ProviderId`] - Provider identifier (e.g., "STEAM", "CSFLOAT")

pub mod config;
pub mod errors;
pub mod http;
pub mod message;
pub mod models;
pub mod provider;
pub mod registry;
pub mod resolver;
pub mod synthetic;

pub use config::FetchConfig;
pub use errors::{MarketDataError, RetryClass};

// Re-export all public types from models
pub use models::{
    FetchResult, GoodsHistoryRequest, HistoryProvider, Listing, ListingFilters, ListingsRequest,
    PaintVariant, PriceHistoryRequest, PricePoint, ProviderId, SellerStatistics, SyntheticReason,
};

// Re-export resolver types
pub use resolver::{
    encode_market_hash_name, Endpoint, MarketHashEncoder, NameEncoder, ProviderUrlBuilder,
    UrlBuilder, UrlParams,
};

// Re-export transport types
pub use http::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, StubTransport};

// Re-export provider types
pub use provider::buff163::Buff163Provider;
pub use provider::csfloat::CsFloatProvider;
pub use provider::steam::SteamProvider;
pub use provider::{MarketDataProvider, ProviderCapabilities, ProviderClient};

// Re-export registry types
pub use registry::{
    AttemptVariant, CascadeOutcome, Dispatcher, FetchDiagnostics, FetchPayload, FetchRequest,
    ProviderAttempt, RetryCascade,
};

// Re-export synthetic and message types
pub use message::{Action, ActionRegistry, MessageResponse};
pub use synthetic::{EntropySource, RandomSource, SeededSource};
