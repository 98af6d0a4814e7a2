//! Market data provider trait definitions.
//!
//! This module defines the core `MarketDataProvider` trait that all
//! marketplace clients implement.

use async_trait::async_trait;

use crate::errors::MarketDataError;
use crate::models::{Listing, PricePoint};

use super::capabilities::ProviderCapabilities;

/// Trait for marketplace clients.
///
/// Providers receive a fully-built URL (see [`crate::resolver::UrlBuilder`])
/// and return normalized, provider-agnostic data or a classified error.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use floatwatch_market_data::provider::{MarketDataProvider, ProviderCapabilities};
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl MarketDataProvider for MyProvider {
///     fn id(&self) -> &'static str {
///         "MY_PROVIDER"
///     }
///
///     fn capabilities(&self) -> ProviderCapabilities {
///         ProviderCapabilities {
///             supports_price_history: true,
///             supports_listings: false,
///             stable_endpoint: true,
///         }
///     }
///
///     // ... implement get_price_history
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "STEAM" or "CSFLOAT".
    /// Used for logging and result tagging.
    fn id(&self) -> &'static str;

    /// Describes what this provider can do.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Fetch the price history behind `url`.
    ///
    /// # Arguments
    ///
    /// * `url` - Fully-qualified request URL
    /// * `item` - The caller's item name or identifier, used in error messages
    ///
    /// # Returns
    ///
    /// Chronologically ordered points, or a classified `MarketDataError`.
    async fn get_price_history(
        &self,
        url: &str,
        item: &str,
    ) -> Result<Vec<PricePoint>, MarketDataError> {
        let _ = (url, item);
        Err(MarketDataError::UnsupportedProvider {
            provider: self.id().to_string(),
            operation: "price history".to_string(),
        })
    }

    /// Fetch the listings behind a validated listings URL.
    ///
    /// Listings are returned sorted ascending by price.
    async fn get_listings(&self, url: &str) -> Result<Vec<Listing>, MarketDataError> {
        let _ = url;
        Err(MarketDataError::UnsupportedProvider {
            provider: self.id().to_string(),
            operation: "listings".to_string(),
        })
    }
}
