use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seller trade statistics attached to a listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerStatistics {
    /// Median time to complete a trade, in seconds
    pub median_trade_time: u64,
    pub total_failed_trades: u32,
    pub total_trades: u32,
    pub total_verified_trades: u32,
}

/// A single marketplace listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub price_cents: u64,

    /// Wear value in [0, 1]
    pub float_value: f64,

    pub seller_id: String,
    pub def_index: u32,
    pub paint_index: u32,
    pub paint_seed: u32,
    pub icon_ref: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_statistics: Option<SellerStatistics>,
}

/// Listings are always returned cheapest first.
pub fn sort_by_price(listings: &mut [Listing]) {
    listings.sort_by_key(|l| l.price_cents);
}
