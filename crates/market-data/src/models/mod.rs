//! Market data models
//!
//! This module contains the value objects created per request:
//! - `types` - Provider identifiers
//! - `request` - Typed inbound requests (price history, listings, goods history)
//! - `price_point` - Chronological price observations
//! - `listing` - Marketplace listings and seller statistics
//! - `fetch_result` - Real vs synthetic result tagging

mod fetch_result;
mod listing;
mod price_point;
mod request;
mod types;

pub use fetch_result::{FetchResult, SyntheticReason};
pub use listing::{sort_by_price, Listing, SellerStatistics};
pub use price_point::{sort_chronologically, PricePoint};
pub use request::{
    GoodsHistoryRequest, HistoryProvider, ListingFilters, ListingsRequest, PaintVariant,
    PriceHistoryRequest, DEFAULT_HISTORY_DAYS, MAX_HISTORY_DAYS,
};
pub use types::{ProviderId, BUFF163, CSFLOAT, STEAM};
