//! Provider URL templates and listings URL validation.

use url::Url;

use super::traits::{Endpoint, UrlBuilder, UrlParams};
use crate::config::FetchConfig;
use crate::errors::MarketDataError;
use crate::models::{ListingFilters, BUFF163, DEFAULT_HISTORY_DAYS, STEAM};

/// Query keys a listings URL may carry.
pub const LISTING_FILTER_KEYS: &[&str] = &["min_float", "max_float", "def_index", "paint_index"];

/// Default [`UrlBuilder`], one template per endpoint.
#[derive(Clone, Debug)]
pub struct ProviderUrlBuilder {
    steam_base_url: String,
    steam_country: String,
    steam_currency: u32,
    steam_app_id: u32,
    csfloat_base_url: String,
    buff_base_url: String,
    buff_currency: String,
}

impl ProviderUrlBuilder {
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            steam_base_url: config.steam_base_url.clone(),
            steam_country: config.steam_country.clone(),
            steam_currency: config.steam_currency,
            steam_app_id: config.steam_app_id,
            csfloat_base_url: config.csfloat_base_url.clone(),
            buff_base_url: config.buff_base_url.clone(),
            buff_currency: config.buff_currency.clone(),
        }
    }

    fn reject_variant(
        provider: &str,
        params: &UrlParams,
        endpoint: Endpoint,
    ) -> Result<(), MarketDataError> {
        match params.variant {
            Some(variant) => Err(MarketDataError::UnsupportedProvider {
                provider: provider.to_string(),
                operation: format!(
                    "{:?} with paint_index {}",
                    endpoint, variant.paint_index
                ),
            }),
            None => Ok(()),
        }
    }
}

impl Default for ProviderUrlBuilder {
    fn default() -> Self {
        Self::new(&FetchConfig::default())
    }
}

impl UrlBuilder for ProviderUrlBuilder {
    fn build_url(
        &self,
        endpoint: Endpoint,
        encoded_id: &str,
        params: &UrlParams,
    ) -> Result<String, MarketDataError> {
        if encoded_id.is_empty() {
            return Err(MarketDataError::InvalidInput(
                "identifier must not be empty".to_string(),
            ));
        }

        match endpoint {
            Endpoint::SteamPriceHistory => {
                Self::reject_variant(STEAM, params, endpoint)?;
                Ok(format!(
                    "{}/market/pricehistory/?country={}&currency={}&appid={}&market_hash_name={}",
                    self.steam_base_url,
                    self.steam_country,
                    self.steam_currency,
                    self.steam_app_id,
                    encoded_id
                ))
            }
            Endpoint::CsFloatHistory => {
                let mut url = format!(
                    "{}/api/v1/history/{}/graph",
                    self.csfloat_base_url, encoded_id
                );
                // Doppler phases share a name; the paint index selects the phase.
                if let Some(variant) = params.variant {
                    url.push_str(&format!("?paint_index={}", variant.paint_index));
                }
                Ok(url)
            }
            Endpoint::BuffGoodsHistory => {
                Self::reject_variant(BUFF163, params, endpoint)?;
                Ok(format!(
                    "{}/api/market/goods/price_history/buff?game=csgo&goods_id={}&currency={}&days={}&buff_price_type=2&with_sell_num=false",
                    self.buff_base_url,
                    encoded_id,
                    self.buff_currency,
                    params.days.unwrap_or(DEFAULT_HISTORY_DAYS)
                ))
            }
            Endpoint::BuffLegacyGoodsHistory => {
                Self::reject_variant(BUFF163, params, endpoint)?;
                Ok(format!(
                    "{}/api/market/goods/price_history?game=csgo&goods_id={}&currency={}&days={}",
                    self.buff_base_url,
                    encoded_id,
                    self.buff_currency,
                    params.days.unwrap_or(DEFAULT_HISTORY_DAYS)
                ))
            }
        }
    }

    fn validate_listings_url(
        &self,
        api_url: &str,
    ) -> Result<(Url, ListingFilters), MarketDataError> {
        let url = Url::parse(api_url.trim()).map_err(|e| {
            MarketDataError::InvalidInput(format!("listings URL does not parse: {}", e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(MarketDataError::InvalidInput(format!(
                "listings URL must use http(s), got {}",
                url.scheme()
            )));
        }

        let mut filters = ListingFilters::default();
        let mut recognized = 0usize;

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "min_float" => filters.min_float = parse_float(&key, &value)?,
                "max_float" => filters.max_float = parse_float(&key, &value)?,
                "def_index" => filters.def_index = parse_index(&key, &value)?,
                "paint_index" => filters.paint_index = parse_index(&key, &value)?,
                _ => continue,
            }
            recognized += 1;
        }

        if recognized == 0 {
            return Err(MarketDataError::InvalidInput(format!(
                "listings URL carries none of the filter keys {:?}",
                LISTING_FILTER_KEYS
            )));
        }

        if filters.min_float > filters.max_float {
            return Err(MarketDataError::InvalidInput(format!(
                "min_float {} exceeds max_float {}",
                filters.min_float, filters.max_float
            )));
        }

        Ok((url, filters))
    }
}

fn parse_float(key: &str, value: &str) -> Result<f64, MarketDataError> {
    let parsed: f64 = value.trim().parse().map_err(|_| {
        MarketDataError::InvalidInput(format!("{} is not a number: {:?}", key, value))
    })?;

    if !(0.0..=1.0).contains(&parsed) {
        return Err(MarketDataError::InvalidInput(format!(
            "{} must lie in [0, 1], got {}",
            key, parsed
        )));
    }
    Ok(parsed)
}

fn parse_index(key: &str, value: &str) -> Result<u32, MarketDataError> {
    value.trim().parse().map_err(|_| {
        MarketDataError::InvalidInput(format!("{} is not an index: {:?}", key, value))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PaintVariant;
    use crate::resolver::encode_market_hash_name;

    fn builder() -> ProviderUrlBuilder {
        ProviderUrlBuilder::default()
    }

    fn doppler(paint_index: u32) -> UrlParams {
        UrlParams {
            variant: Some(PaintVariant { paint_index }),
            days: None,
        }
    }

    #[test]
    fn test_steam_template() {
        let id = encode_market_hash_name("★ Karambit | Lore (Battle-Scarred)").unwrap();
        let url = builder()
            .build_url(Endpoint::SteamPriceHistory, &id, &UrlParams::default())
            .unwrap();
        assert_eq!(
            url,
            format!(
                "https://steamcommunity.com/market/pricehistory/?country=US&currency=1&appid=730&market_hash_name={}",
                id
            )
        );
        assert!(!url.contains("paint_index"));
    }

    #[test]
    fn test_steam_rejects_doppler_variant() {
        let err = builder()
            .build_url(Endpoint::SteamPriceHistory, "x", &doppler(418))
            .unwrap_err();
        assert!(matches!(err, MarketDataError::UnsupportedProvider { .. }));
    }

    #[test]
    fn test_csfloat_doppler_adds_paint_index() {
        let id = encode_market_hash_name("★ Karambit | Doppler (Factory New)").unwrap();
        for paint_index in [415, 418, 421, 568] {
            let url = builder()
                .build_url(Endpoint::CsFloatHistory, &id, &doppler(paint_index))
                .unwrap();
            let parsed = Url::parse(&url).unwrap();
            let found = parsed
                .query_pairs()
                .find(|(k, _)| k == "paint_index")
                .map(|(_, v)| v.into_owned());
            assert_eq!(found, Some(paint_index.to_string()));
            assert!(parsed.path().ends_with("/graph"));
        }
    }

    #[test]
    fn test_csfloat_plain_has_no_paint_index() {
        let url = builder()
            .build_url(Endpoint::CsFloatHistory, "AK-47%20%7C%20Redline", &UrlParams::default())
            .unwrap();
        assert_eq!(
            url,
            "https://csfloat.com/api/v1/history/AK-47%20%7C%20Redline/graph"
        );
    }

    #[test]
    fn test_buff_templates() {
        let params = UrlParams {
            variant: None,
            days: Some(30),
        };
        let url = builder()
            .build_url(Endpoint::BuffGoodsHistory, "42567", &params)
            .unwrap();
        assert!(url.starts_with("https://buff.163.com/api/market/goods/price_history/buff?"));
        assert!(url.contains("goods_id=42567"));
        assert!(url.contains("days=30"));

        let legacy = builder()
            .build_url(Endpoint::BuffLegacyGoodsHistory, "42567", &UrlParams::default())
            .unwrap();
        assert!(legacy.contains("/price_history?"));
        assert!(legacy.contains("days=180"));
    }

    #[test]
    fn test_listings_url_filters_extracted() {
        let (url, filters) = builder()
            .validate_listings_url(
                "https://csfloat.com/api/v1/listings?min_float=0.1&max_float=0.2&def_index=507&paint_index=561&sort_by=lowest_price",
            )
            .unwrap();
        assert_eq!(url.host_str(), Some("csfloat.com"));
        assert_eq!(filters.min_float, 0.1);
        assert_eq!(filters.max_float, 0.2);
        assert_eq!(filters.def_index, 507);
        assert_eq!(filters.paint_index, 561);
    }

    #[test]
    fn test_listings_url_defaults_missing_floats() {
        let (_, filters) = builder()
            .validate_listings_url("https://csfloat.com/api/v1/listings?def_index=7")
            .unwrap();
        assert_eq!(filters.min_float, 0.0);
        assert_eq!(filters.max_float, 1.0);
        assert_eq!(filters.def_index, 7);
    }

    #[test]
    fn test_listings_url_rejections() {
        let b = builder();
        for bad in [
            "not a url",
            "ftp://csfloat.com/api/v1/listings?def_index=7",
            "https://csfloat.com/api/v1/listings?sort_by=lowest_price",
            "https://csfloat.com/api/v1/listings?min_float=abc",
            "https://csfloat.com/api/v1/listings?min_float=0.5&max_float=0.2",
            "https://csfloat.com/api/v1/listings?max_float=1.5",
        ] {
            assert!(
                matches!(
                    b.validate_listings_url(bad),
                    Err(MarketDataError::InvalidInput(_))
                ),
                "{}",
                bad
            );
        }
    }
}
