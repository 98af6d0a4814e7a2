//! Resolution traits for the market data crate.
//!
//! Defines the abstractions that turn a caller's request into the exact
//! identifier and URL a provider expects. Both are injected into the
//! dispatcher so tests can substitute them.

use url::Url;

use crate::errors::MarketDataError;
use crate::models::{ListingFilters, PaintVariant};

/// Turns a human-readable item name into a provider identifier.
pub trait NameEncoder: Send + Sync {
    /// Encode `raw_name` for use in a URL.
    ///
    /// # Returns
    /// * `Ok(encoded)` - Percent-encoded identifier
    /// * `Err(MarketDataError::InvalidInput)` - Blank name
    fn encode(&self, raw_name: &str) -> Result<String, MarketDataError>;
}

/// A provider endpoint the builder knows how to address.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Endpoint {
    /// Steam market price history (query template)
    SteamPriceHistory,
    /// CSFloat per-item history graph (path template)
    CsFloatHistory,
    /// Buff163 goods price history
    BuffGoodsHistory,
    /// Older Buff163 goods price history path
    BuffLegacyGoodsHistory,
}

/// Request parameters that shape a URL.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct UrlParams {
    pub variant: Option<PaintVariant>,
    pub days: Option<u32>,
}

/// Builds and validates provider URLs.
pub trait UrlBuilder: Send + Sync {
    /// Produce a fully-qualified request URL.
    ///
    /// Endpoint/parameter combinations the provider cannot express fail with
    /// [`MarketDataError::UnsupportedProvider`].
    fn build_url(
        &self,
        endpoint: Endpoint,
        encoded_id: &str,
        params: &UrlParams,
    ) -> Result<String, MarketDataError>;

    /// Validate a caller-supplied listings URL and extract its filters.
    fn validate_listings_url(&self, api_url: &str)
        -> Result<(Url, ListingFilters), MarketDataError>;
}
