//! Typed inbound requests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::types::{CSFLOAT, STEAM};
use crate::errors::MarketDataError;

/// Default look-back window for goods history requests.
pub const DEFAULT_HISTORY_DAYS: u32 = 180;

/// Upper bound on the look-back window a caller may request.
pub const MAX_HISTORY_DAYS: u32 = 3650;

/// Marketplace that serves a per-item price history.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum HistoryProvider {
    Steam,
    #[serde(rename = "CSFloat")]
    CsFloat,
}

impl HistoryProvider {
    /// Provider id used for logging and result tagging.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Steam => STEAM,
            Self::CsFloat => CSFLOAT,
        }
    }
}

impl fmt::Display for HistoryProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for HistoryProvider {
    type Err = MarketDataError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "steam" => Ok(Self::Steam),
            "csfloat" => Ok(Self::CsFloat),
            _ => Err(MarketDataError::UnsupportedProvider {
                provider: value.to_string(),
                operation: "price history".to_string(),
            }),
        }
    }
}

/// Doppler-style variant, identified by paint index rather than by name.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaintVariant {
    pub paint_index: u32,
}

/// Request for the price history of a single named item.
#[derive(Clone, Debug, PartialEq)]
pub struct PriceHistoryRequest {
    pub item_name: String,
    pub provider: HistoryProvider,
    pub variant: Option<PaintVariant>,
}

impl PriceHistoryRequest {
    /// Create a request for a plain (non-Doppler) item.
    ///
    /// Fails with [`MarketDataError::InvalidInput`] when the name is blank.
    pub fn new(
        item_name: impl Into<String>,
        provider: HistoryProvider,
    ) -> Result<Self, MarketDataError> {
        let item_name = item_name.into();
        if item_name.trim().is_empty() {
            return Err(MarketDataError::InvalidInput(
                "item name must not be empty".to_string(),
            ));
        }

        Ok(Self {
            item_name,
            provider,
            variant: None,
        })
    }

    /// Attach a Doppler paint index.
    pub fn with_doppler(mut self, paint_index: u32) -> Self {
        self.variant = Some(PaintVariant { paint_index });
        self
    }

    /// Build a request from loosely typed message fields.
    ///
    /// `paint_index` is required if and only if `is_doppler` is set.
    pub fn from_parts(
        item_name: impl Into<String>,
        provider: HistoryProvider,
        is_doppler: bool,
        paint_index: Option<i64>,
    ) -> Result<Self, MarketDataError> {
        let request = Self::new(item_name, provider)?;

        match (is_doppler, paint_index) {
            (true, Some(index)) => {
                let index = u32::try_from(index).map_err(|_| {
                    MarketDataError::InvalidInput(format!("paint index out of range: {}", index))
                })?;
                Ok(request.with_doppler(index))
            }
            (true, None) => Err(MarketDataError::InvalidInput(
                "doppler variant requires a paint index".to_string(),
            )),
            (false, Some(_)) => Err(MarketDataError::InvalidInput(
                "paint index is only valid for doppler variants".to_string(),
            )),
            (false, None) => Ok(request),
        }
    }

    pub fn is_doppler(&self) -> bool {
        self.variant.is_some()
    }
}

/// Request for live listings; the URL already carries the filters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingsRequest {
    pub api_url: String,
}

impl ListingsRequest {
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
        }
    }
}

/// Filters extracted from a listings URL.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingFilters {
    pub min_float: f64,
    pub max_float: f64,
    pub def_index: u32,
    pub paint_index: u32,
}

impl Default for ListingFilters {
    fn default() -> Self {
        Self {
            min_float: 0.0,
            max_float: 1.0,
            def_index: 0,
            paint_index: 0,
        }
    }
}

/// Request for a Buff163 goods price history.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GoodsHistoryRequest {
    pub goods_id: u64,
    pub days: u32,
}

impl GoodsHistoryRequest {
    pub fn new(goods_id: u64) -> Self {
        Self {
            goods_id,
            days: DEFAULT_HISTORY_DAYS,
        }
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    /// Reject ids and windows no marketplace can answer.
    pub fn validate(&self) -> Result<(), MarketDataError> {
        if self.goods_id == 0 {
            return Err(MarketDataError::InvalidInput(
                "goods id must be positive".to_string(),
            ));
        }
        if self.days == 0 || self.days > MAX_HISTORY_DAYS {
            return Err(MarketDataError::InvalidInput(format!(
                "days must be between 1 and {}, got {}",
                MAX_HISTORY_DAYS, self.days
            )));
        }
        Ok(())
    }
}
