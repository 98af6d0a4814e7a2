//! Identifier and URL resolution.
//!
//! Turns a typed request into what a provider actually accepts:
//! - [`MarketHashEncoder`] percent-encodes item names into market hash names
//! - [`ProviderUrlBuilder`] fills each provider's URL template and validates
//!   caller-supplied listings URLs

mod market_hash;
mod traits;
mod url_builder;

pub use market_hash::{encode_market_hash_name, MarketHashEncoder};
pub use traits::{Endpoint, NameEncoder, UrlBuilder, UrlParams};
pub use url_builder::{ProviderUrlBuilder, LISTING_FILTER_KEYS};
