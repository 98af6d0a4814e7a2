//! CSFloat API response models.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One day of the history graph.
#[derive(Debug, Deserialize)]
pub struct CsFloatHistoryEntry {
    /// Average sale price in cents
    pub avg_price: f64,
    /// RFC 3339 timestamp or bare `YYYY-MM-DD`
    pub day: String,
}

/// A live listing with its nested item and seller.
#[derive(Debug, Deserialize)]
pub struct CsFloatListing {
    pub id: String,
    pub created_at: DateTime<Utc>,
    /// Price in cents
    pub price: u64,
    pub item: CsFloatItem,
    #[serde(default)]
    pub seller: Option<CsFloatSeller>,
}

#[derive(Debug, Deserialize)]
pub struct CsFloatItem {
    pub float_value: f64,
    pub def_index: u32,
    #[serde(default)]
    pub paint_index: u32,
    #[serde(default)]
    pub paint_seed: u32,
    #[serde(default)]
    pub icon_url: String,
}

#[derive(Debug, Deserialize)]
pub struct CsFloatSeller {
    #[serde(default)]
    pub steam_id: String,
    #[serde(default)]
    pub statistics: Option<CsFloatSellerStatistics>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CsFloatSellerStatistics {
    pub median_trade_time: u64,
    pub total_failed_trades: u32,
    pub total_trades: u32,
    pub total_verified_trades: u32,
}
