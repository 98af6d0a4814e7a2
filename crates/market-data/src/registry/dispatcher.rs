//! Single entry point for price history, listings and goods history.
//!
//! The dispatcher:
//! - Encodes item names and builds provider URLs
//! - Routes each request kind to its provider
//! - Propagates caller defects (`InvalidInput`, `UnsupportedProvider`)
//! - Replaces every other failure with synthetic data tagged as such

use std::borrow::Cow;
use std::sync::Arc;

use chrono::Utc;
use log::{debug, info, warn};
use serde::Serialize;

use crate::config::FetchConfig;
use crate::errors::MarketDataError;
use crate::http::{HttpTransport, ReqwestTransport};
use crate::models::{
    FetchResult, GoodsHistoryRequest, HistoryProvider, Listing, ListingsRequest,
    PriceHistoryRequest, PricePoint, SyntheticReason,
};
use crate::provider::buff163::Buff163Provider;
use crate::provider::csfloat::CsFloatProvider;
use crate::provider::steam::SteamProvider;
use crate::provider::MarketDataProvider;
use crate::resolver::{
    Endpoint, MarketHashEncoder, NameEncoder, ProviderUrlBuilder, UrlBuilder, UrlParams,
};
use crate::synthetic::{EntropySource, RandomSource, SyntheticGenerator};

/// Typed inbound request.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchRequest {
    PriceHistory(PriceHistoryRequest),
    Listings(ListingsRequest),
    GoodsHistory(GoodsHistoryRequest),
}

/// Data carried by a [`FetchResult`] from [`Dispatcher::handle`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FetchPayload {
    PricePoints(Vec<PricePoint>),
    Listings(Vec<Listing>),
}

impl FetchPayload {
    pub fn len(&self) -> usize {
        match self {
            Self::PricePoints(points) => points.len(),
            Self::Listings(listings) => listings.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Routes requests to providers and falls back to synthetic data.
///
/// Holds no cross-request state; concurrent calls are independent.
pub struct Dispatcher {
    encoder: Arc<dyn NameEncoder>,
    url_builder: Arc<dyn UrlBuilder>,
    random: Arc<dyn RandomSource>,
    steam: Arc<dyn MarketDataProvider>,
    csfloat: Arc<dyn MarketDataProvider>,
    buff: Arc<Buff163Provider>,
    synthetic_history_days: u32,
}

impl Dispatcher {
    /// Create a dispatcher with the default encoder, URL builder and
    /// entropy-backed random source.
    pub fn new(transport: Arc<dyn HttpTransport>, config: &FetchConfig) -> Self {
        Self {
            encoder: Arc::new(MarketHashEncoder),
            url_builder: Arc::new(ProviderUrlBuilder::new(config)),
            random: Arc::new(EntropySource),
            steam: Arc::new(SteamProvider::new(transport.clone(), config)),
            csfloat: Arc::new(CsFloatProvider::new(transport.clone(), config)),
            buff: Arc::new(Buff163Provider::new(transport, config)),
            synthetic_history_days: config.synthetic_history_days,
        }
    }

    /// Dispatcher over the production `reqwest` transport.
    pub fn from_config(config: &FetchConfig) -> Self {
        Self::new(Arc::new(ReqwestTransport::new()), config)
    }

    pub fn with_encoder(mut self, encoder: Arc<dyn NameEncoder>) -> Self {
        self.encoder = encoder;
        self
    }

    pub fn with_url_builder(mut self, url_builder: Arc<dyn UrlBuilder>) -> Self {
        self.url_builder = url_builder;
        self
    }

    pub fn with_random_source(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    /// Handle any request kind.
    pub async fn handle(
        &self,
        request: FetchRequest,
    ) -> Result<FetchResult<FetchPayload>, MarketDataError> {
        match request {
            FetchRequest::PriceHistory(request) => Ok(self
                .fetch_price_history(&request)
                .await?
                .map(FetchPayload::PricePoints)),
            FetchRequest::Listings(request) => Ok(self
                .fetch_listings(&request)
                .await?
                .map(FetchPayload::Listings)),
            FetchRequest::GoodsHistory(request) => Ok(self
                .fetch_goods_history(&request)
                .await?
                .map(FetchPayload::PricePoints)),
        }
    }

    /// Price history for a named item from Steam or CSFloat.
    pub async fn fetch_price_history(
        &self,
        request: &PriceHistoryRequest,
    ) -> Result<FetchResult<Vec<PricePoint>>, MarketDataError> {
        let encoded = self.encoder.encode(&request.item_name)?;

        let (provider, endpoint) = match request.provider {
            HistoryProvider::Steam => (&self.steam, Endpoint::SteamPriceHistory),
            HistoryProvider::CsFloat => (&self.csfloat, Endpoint::CsFloatHistory),
        };

        let params = UrlParams {
            variant: request.variant,
            days: None,
        };
        let url = self.url_builder.build_url(endpoint, &encoded, &params)?;

        debug!(
            "Fetching price history for {} from {}",
            request.item_name,
            provider.id()
        );

        let result = provider.get_price_history(&url, &request.item_name).await;
        let days = self.synthetic_history_days;
        self.settle(provider.id(), &url, result, |generator| {
            generator.price_history(&request.item_name, days)
        })
    }

    /// Listings behind a caller-supplied CSFloat URL.
    pub async fn fetch_listings(
        &self,
        request: &ListingsRequest,
    ) -> Result<FetchResult<Vec<Listing>>, MarketDataError> {
        let (url, filters) = self.url_builder.validate_listings_url(&request.api_url)?;

        if !self.csfloat.capabilities().supports_listings {
            return Err(MarketDataError::UnsupportedProvider {
                provider: self.csfloat.id().to_string(),
                operation: "listings".to_string(),
            });
        }

        debug!("Fetching listings from {}", url);

        let result = self.csfloat.get_listings(url.as_str()).await;
        self.settle(self.csfloat.id(), url.as_str(), result, |generator| {
            generator.listings(&filters)
        })
    }

    /// Buff163 goods history, always through the retry cascade.
    pub async fn fetch_goods_history(
        &self,
        request: &GoodsHistoryRequest,
    ) -> Result<FetchResult<Vec<PricePoint>>, MarketDataError> {
        request.validate()?;

        let goods_id = request.goods_id.to_string();
        let params = UrlParams {
            variant: None,
            days: Some(request.days),
        };
        let primary = self
            .url_builder
            .build_url(Endpoint::BuffGoodsHistory, &goods_id, &params)?;
        let legacy = self
            .url_builder
            .build_url(Endpoint::BuffLegacyGoodsHistory, &goods_id, &params)
            .ok();

        debug!(
            "Fetching goods history for {} ({} days) from {}",
            goods_id,
            request.days,
            self.buff.id()
        );

        let result = self
            .buff
            .fetch_goods_history(&primary, legacy.as_deref(), &goods_id)
            .await;
        self.settle(self.buff.id(), &primary, result, |generator| {
            generator.price_history(&goods_id, request.days)
        })
    }

    /// Tag a real result, propagate a caller defect, or synthesize.
    fn settle<T, F>(
        &self,
        provider: &'static str,
        url: &str,
        result: Result<T, MarketDataError>,
        fallback: F,
    ) -> Result<FetchResult<T>, MarketDataError>
    where
        F: FnOnce(&SyntheticGenerator<'_>) -> T,
    {
        match result {
            Ok(data) => {
                info!("{} served real data for {}", provider, url);
                Ok(FetchResult::Real {
                    data,
                    provider: Cow::Borrowed(provider),
                })
            }
            Err(e) if e.is_caller_defect() => Err(e),
            Err(e) => {
                warn!(
                    "{} failed (url: {}, status: {:?}): {}. Returning synthetic data",
                    provider,
                    url,
                    e.status(),
                    e
                );
                let generator = SyntheticGenerator::new(self.random.as_ref(), Utc::now());
                Ok(FetchResult::Synthetic {
                    data: fallback(&generator),
                    reason: SyntheticReason::from_error(Cow::Borrowed(provider), &e),
                })
            }
        }
    }
}
