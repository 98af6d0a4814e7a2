//! CSFloat market provider.
//!
//! Serves two endpoints:
//! - Per-item history graph (`/api/v1/history/{name}/graph`), newest day first
//! - Live listings (`/api/v1/listings?...`), filtered by the caller's URL
//!
//! Both may return their array at the root or under a `data` key.

mod models;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::errors::MarketDataError;
use crate::http::HttpTransport;
use crate::models::{
    sort_by_price, sort_chronologically, Listing, PricePoint, SellerStatistics, CSFLOAT,
};
use crate::provider::client::{default_headers, ProviderClient};
use crate::provider::normalize::{extract_array, parse_json};
use crate::provider::{MarketDataProvider, ProviderCapabilities};

use models::{CsFloatHistoryEntry, CsFloatListing};

/// CSFloat history and listings provider.
pub struct CsFloatProvider {
    client: ProviderClient,
    history_headers: BTreeMap<String, String>,
    listing_headers: BTreeMap<String, String>,
}

impl CsFloatProvider {
    pub fn new(transport: Arc<dyn HttpTransport>, config: &FetchConfig) -> Self {
        let history_headers = default_headers(config);

        // Listings are only served to requests that look like they come from the site.
        let mut listing_headers = history_headers.clone();
        listing_headers.insert("origin".to_string(), config.csfloat_base_url.clone());
        listing_headers.insert(
            "referer".to_string(),
            format!("{}/", config.csfloat_base_url),
        );

        Self {
            client: ProviderClient::new(CSFLOAT, transport, config.request_timeout),
            history_headers,
            listing_headers,
        }
    }

    fn parse_history(item: &str, body: &str) -> Result<Vec<PricePoint>, MarketDataError> {
        let entries = extract_array(CSFLOAT, item, parse_json(CSFLOAT, item, body)?)?;

        let mut points: Vec<PricePoint> = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<CsFloatHistoryEntry>(entry) {
                Ok(entry) => history_point(&entry),
                Err(e) => {
                    warn!("Skipping CSFloat history entry for {}: {}", item, e);
                    None
                }
            })
            .collect();

        if points.is_empty() {
            return Err(MarketDataError::MalformedResponse {
                provider: CSFLOAT.to_string(),
                item: item.to_string(),
                message: "no history entry could be parsed".to_string(),
            });
        }

        sort_chronologically(&mut points);
        Ok(points)
    }

    fn parse_listings(url: &str, body: &str) -> Result<Vec<Listing>, MarketDataError> {
        let entries = extract_array(CSFLOAT, url, parse_json(CSFLOAT, url, body)?)?;

        let mut listings: Vec<Listing> = entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<CsFloatListing>(entry) {
                Ok(listing) if !(0.0..=1.0).contains(&listing.item.float_value) => {
                    warn!(
                        "Skipping CSFloat listing {}: float {} outside [0, 1]",
                        listing.id, listing.item.float_value
                    );
                    None
                }
                Ok(listing) => Some(listing.into()),
                Err(e) => {
                    warn!("Skipping CSFloat listing: {}", e);
                    None
                }
            })
            .collect();

        if listings.is_empty() {
            return Err(MarketDataError::MalformedResponse {
                provider: CSFLOAT.to_string(),
                item: url.to_string(),
                message: "no listing could be parsed".to_string(),
            });
        }

        sort_by_price(&mut listings);
        Ok(listings)
    }
}

fn history_point(entry: &CsFloatHistoryEntry) -> Option<PricePoint> {
    let timestamp = parse_day(&entry.day)?;
    let cents = Decimal::from_f64(entry.avg_price)?;
    let price = (cents / Decimal::ONE_HUNDRED).round_dp(2);
    Some(PricePoint::at(timestamp, price))
}

fn parse_day(day: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(day) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

impl From<CsFloatListing> for Listing {
    fn from(raw: CsFloatListing) -> Self {
        let (seller_id, seller_statistics) = match raw.seller {
            Some(seller) => (
                seller.steam_id,
                seller.statistics.map(|s| SellerStatistics {
                    median_trade_time: s.median_trade_time,
                    total_failed_trades: s.total_failed_trades,
                    total_trades: s.total_trades,
                    total_verified_trades: s.total_verified_trades,
                }),
            ),
            None => (String::new(), None),
        };

        Listing {
            id: raw.id,
            created_at: raw.created_at,
            price_cents: raw.price,
            float_value: raw.item.float_value,
            seller_id,
            def_index: raw.item.def_index,
            paint_index: raw.item.paint_index,
            paint_seed: raw.item.paint_seed,
            icon_ref: raw.item.icon_url,
            seller_statistics,
        }
    }
}

#[async_trait]
impl MarketDataProvider for CsFloatProvider {
    fn id(&self) -> &'static str {
        CSFLOAT
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            supports_price_history: true,
            supports_listings: true,
            stable_endpoint: true,
        }
    }

    async fn get_price_history(
        &self,
        url: &str,
        item: &str,
    ) -> Result<Vec<PricePoint>, MarketDataError> {
        let raw = self.client.fetch(url, &self.history_headers, item).await?;
        let points = Self::parse_history(item, &raw.body).map_err(|e| {
            warn!("CSFloat history for {} rejected (url: {}): {}", item, url, e);
            e
        })?;

        debug!("CSFloat returned {} history points for {}", points.len(), item);
        Ok(points)
    }

    async fn get_listings(&self, url: &str) -> Result<Vec<Listing>, MarketDataError> {
        let raw = self.client.fetch(url, &self.listing_headers, url).await?;
        let listings = Self::parse_listings(url, &raw.body).map_err(|e| {
            warn!("CSFloat listings rejected (url: {}): {}", url, e);
            e
        })?;

        debug!("CSFloat returned {} listings", listings.len());
        Ok(listings)
    }
}
