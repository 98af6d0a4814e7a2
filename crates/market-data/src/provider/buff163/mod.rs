//! Buff163 goods price history provider.
//!
//! Buff163 has no documented public endpoint. Responses depend on headers,
//! caching and which path generation is live, so every request goes through
//! a [`RetryCascade`] over four variants:
//!
//! 1. `json-api` - XHR-style JSON request
//! 2. `cache-busted` - same URL with a `_=<now ms>` parameter
//! 3. `browser-headers` - HTML-style `Accept` plus `Accept-Language`
//! 4. `legacy-endpoint` - older path without the `/buff` suffix
//!
//! Points arrive as `[timestamp_ms, price]` pairs or `{timestamp, price}`
//! objects; prices may be numbers or numeric strings.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::config::FetchConfig;
use crate::errors::MarketDataError;
use crate::http::HttpTransport;
use crate::models::{sort_chronologically, PricePoint, BUFF163};
use crate::provider::client::{default_headers, ProviderClient};
use crate::provider::normalize::{decimal_from_value, i64_from_value};
use crate::provider::{MarketDataProvider, ProviderCapabilities};
use crate::registry::{AttemptVariant, CascadeOutcome, RetryCascade};

const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,application/json;q=0.8,*/*;q=0.7";

/// Timestamps below this are in seconds rather than milliseconds.
const SECONDS_CUTOFF: i64 = 100_000_000_000;

/// Buff163 goods price history provider.
pub struct Buff163Provider {
    cascade: RetryCascade,
    base_headers: BTreeMap<String, String>,
    referer: String,
}

impl Buff163Provider {
    pub fn new(transport: Arc<dyn HttpTransport>, config: &FetchConfig) -> Self {
        let client = ProviderClient::new(BUFF163, transport, config.request_timeout);
        Self {
            cascade: RetryCascade::new(client, config.cascade_pause),
            base_headers: default_headers(config),
            referer: format!("{}/", config.buff_base_url),
        }
    }

    /// Build the ordered attempt variants for one goods history request.
    ///
    /// `now_ms` feeds the cache-busting parameter.
    pub fn variants(
        &self,
        primary_url: &str,
        legacy_url: Option<&str>,
        now_ms: i64,
    ) -> Vec<AttemptVariant> {
        let mut variants = Vec::with_capacity(4);

        let mut json_headers = self.base_headers.clone();
        json_headers.insert("x-requested-with".to_string(), "XMLHttpRequest".to_string());
        variants.push(AttemptVariant::new("json-api", primary_url, json_headers));

        match Url::parse(primary_url) {
            Ok(mut url) => {
                url.query_pairs_mut().append_pair("_", &now_ms.to_string());
                variants.push(AttemptVariant::new(
                    "cache-busted",
                    url.as_str(),
                    self.base_headers.clone(),
                ));
            }
            Err(e) => warn!(
                "Buff163 URL {} does not parse, skipping cache-busted variant: {}",
                primary_url, e
            ),
        }

        let mut browser_headers = self.base_headers.clone();
        browser_headers.insert("accept".to_string(), BROWSER_ACCEPT.to_string());
        browser_headers.insert(
            "accept-language".to_string(),
            "en-US,en;q=0.9,zh-CN;q=0.8".to_string(),
        );
        browser_headers.insert("referer".to_string(), self.referer.clone());
        variants.push(AttemptVariant::new(
            "browser-headers",
            primary_url,
            browser_headers,
        ));

        let legacy = legacy_url
            .map(str::to_string)
            .or_else(|| legacy_url_for(primary_url));
        if let Some(legacy) = legacy {
            variants.push(AttemptVariant::new(
                "legacy-endpoint",
                legacy,
                self.base_headers.clone(),
            ));
        }

        variants
    }

    /// Run the cascade for a goods id and convert the winning payload.
    pub async fn fetch_goods_history(
        &self,
        primary_url: &str,
        legacy_url: Option<&str>,
        item: &str,
    ) -> Result<Vec<PricePoint>, MarketDataError> {
        let now_ms = Utc::now().timestamp_millis();
        let variants = self.variants(primary_url, legacy_url, now_ms);

        match self.cascade.run(item, &variants).await {
            CascadeOutcome::Succeeded { variant, data, .. } => {
                let points = parse_points(item, &data)?;
                debug!(
                    "Buff163 variant '{}' returned {} points for {}",
                    variant,
                    points.len(),
                    item
                );
                Ok(points)
            }
            CascadeOutcome::Exhausted {
                last_error,
                diagnostics,
            } => {
                warn!("Buff163 history for {} unavailable, last error: {}", item, last_error);
                Err(MarketDataError::CascadeExhausted {
                    provider: BUFF163.to_string(),
                    item: item.to_string(),
                    attempts: diagnostics.len(),
                })
            }
        }
    }
}

/// Derive the older endpoint by dropping the trailing `/buff` path segment.
fn legacy_url_for(primary_url: &str) -> Option<String> {
    let mut url = Url::parse(primary_url).ok()?;
    if url.path_segments()?.last()? != "buff" {
        return None;
    }
    url.path_segments_mut().ok()?.pop();
    Some(url.into())
}

fn parse_points(item: &str, data: &[Value]) -> Result<Vec<PricePoint>, MarketDataError> {
    let mut points: Vec<PricePoint> = data
        .iter()
        .filter_map(|entry| {
            let point = parse_point(entry);
            if point.is_none() {
                warn!("Skipping Buff163 price entry for {}: {}", item, entry);
            }
            point
        })
        .collect();

    if points.is_empty() {
        return Err(MarketDataError::MalformedResponse {
            provider: BUFF163.to_string(),
            item: item.to_string(),
            message: "no price point could be parsed".to_string(),
        });
    }

    sort_chronologically(&mut points);
    Ok(points)
}

fn parse_point(entry: &Value) -> Option<PricePoint> {
    let (timestamp, price) = match entry {
        Value::Array(fields) => (fields.first()?, fields.get(1)?),
        Value::Object(map) => (map.get("timestamp")?, map.get("price")?),
        _ => return None,
    };

    let timestamp = i64_from_value(timestamp)?;
    if timestamp <= 0 {
        return None;
    }
    let timestamp_ms = if timestamp < SECONDS_CUTOFF {
        timestamp.checked_mul(1000)?
    } else {
        timestamp
    };
    Some(PricePoint::new(timestamp_ms, decimal_from_value(price)?))
}

#[async_trait]
impl MarketDataProvider for Buff163Provider {
    fn id(&self) -> &'static str {
        BUFF163
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities {
            supports_price_history: true,
            supports_listings: false,
            stable_endpoint: false,
        }
    }

    async fn get_price_history(
        &self,
        url: &str,
        item: &str,
    ) -> Result<Vec<PricePoint>, MarketDataError> {
        self.fetch_goods_history(url, None, item).await
    }
}
