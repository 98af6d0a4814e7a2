//! Provider capabilities.
//!
//! Describes what a marketplace client can serve so the dispatcher can
//! refuse impossible routes before any request is sent.

/// Describes the capabilities of a market data provider.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ProviderCapabilities {
    /// Whether the provider serves price histories.
    pub supports_price_history: bool,

    /// Whether the provider serves live listings.
    pub supports_listings: bool,

    /// False for providers without a documented endpoint; those are always
    /// reached through the retry cascade.
    pub stable_endpoint: bool,
}
