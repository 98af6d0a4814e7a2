//! Steam Community market price history provider.
//!
//! The endpoint wraps its payload in a `{success, prices}` envelope where each
//! price entry is a `[date, median_price, volume]` triple:
//!
//! ```text
//! {"success": true, "price_prefix": "$", "prices": [["Jul 02 2014 01: +0", 417.48, "40"], ...]}
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::FetchConfig;
use crate::errors::MarketDataError;
use crate::http::HttpTransport;
use crate::models::{sort_chronologically, PricePoint, STEAM};
use crate::provider::client::{default_headers, ProviderClient};
use crate::provider::normalize::{decimal_from_value, parse_json};
use crate::provider::{MarketDataProvider, ProviderCapabilities};

/// Steam market price history provider.
pub struct SteamProvider {
    client: ProviderClient,
    headers: BTreeMap<String, String>,
}

impl SteamProvider {
    pub fn new(transport: Arc<dyn HttpTransport>, config: &FetchConfig) -> Self {
        Self {
            client: ProviderClient::new(STEAM, transport, config.request_timeout),
            headers: default_headers(config),
        }
    }

    /// Validate the envelope and convert its `prices` entries.
    fn parse_price_history(item: &str, body: &str) -> Result<Vec<PricePoint>, MarketDataError> {
        let value = parse_json(STEAM, item, body)?;

        if value.get("success").and_then(Value::as_bool) != Some(true) {
            return Err(MarketDataError::MalformedResponse {
                provider: STEAM.to_string(),
                item: item.to_string(),
                message: "success flag is not true".to_string(),
            });
        }

        let entries = match value.get("prices").and_then(Value::as_array) {
            Some(entries) if !entries.is_empty() => entries,
            _ => {
                return Err(MarketDataError::EmptyResult {
                    provider: STEAM.to_string(),
                    item: item.to_string(),
                })
            }
        };

        let mut points: Vec<PricePoint> = entries
            .iter()
            .filter_map(|entry| {
                let point = parse_entry(entry);
                if point.is_none() {
                    warn!("Skipping unparseable Steam price entry for {}: {}", item, entry);
                }
                point
            })
            .collect();

        if points.is_empty() {
            return Err(MarketDataError::EmptyResult {
                provider: STEAM.to_string(),
                item: item.to_string(),
            });
        }

        sort_chronologically(&mut points);
        Ok(points)
    }
}

fn parse_entry(entry: &Value) -> Option<PricePoint> {
    let fields = entry.as_array()?;
    let timestamp = parse_steam_date(fields.first()?.as_str()?)?;
    let price = decimal_from_value(fields.get(1)?)?;
    Some(PricePoint::at(timestamp, price))
}

/// Parse Steam's hour-precision date, e.g. `"Jul 02 2014 01: +0"`.
fn parse_steam_date(raw: &str) -> Option<DateTime<Utc>> {
    let (date_hour, _) = raw.split_once(':')?;
    let normalized = format!("{}:00", date_hour.trim());
    NaiveDateTime::parse_from_str(&normalized, "%b %d %Y %H:%M")
        .ok()
        .map(|naive| naive.and_utc())
}

#[async_trait]
impl MarketDataProvider for SteamProvider {
    fn id(&self) -> &'static str {
        STEAM
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            supports_price_history: true,
            supports_listings: false,
            stable_endpoint: true,
        }
    }

    async fn get_price_history(
        &self,
        url: &str,
        item: &str,
    ) -> Result<Vec<PricePoint>, MarketDataError> {
        let raw = self.client.fetch(url, &self.headers, item).await?;
        let points = Self::parse_price_history(item, &raw.body).map_err(|e| {
            warn!("Steam response for {} rejected (url: {}): {}", item, url, e);
            e
        })?;

        debug!("Steam returned {} price points for {}", points.len(), item);
        Ok(points)
    }
}
