//! Inbound message contract.
//!
//! Collaborators send flat JSON messages naming an `action`:
//!
//! ```text
//! {"action": "fetchPriceHistory", "itemName": "AK-47 | Redline (Field-Tested)", "provider": "Steam"}
//! {"action": "fetchListings", "apiUrl": "https://csfloat.com/api/v1/listings?def_index=7"}
//! {"action": "fetchGoodsHistory", "goodsId": 42567, "days": 30}
//! {"action": "ping"}
//! ```
//!
//! Every reply uses the same envelope, see [`MessageResponse`].

mod registry;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::{
    FetchResult, GoodsHistoryRequest, HistoryProvider, ListingsRequest, PriceHistoryRequest,
    DEFAULT_HISTORY_DAYS,
};

pub use registry::{
    ActionHandler, ActionRegistry, GoodsHistoryHandler, ListingsHandler, PingHandler,
    PriceHistoryHandler,
};

/// Actions a message may name.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    FetchPriceHistory,
    FetchListings,
    FetchGoodsHistory,
    Ping,
}

impl Action {
    pub const ALL: [Action; 4] = [
        Action::FetchPriceHistory,
        Action::FetchListings,
        Action::FetchGoodsHistory,
        Action::Ping,
    ];

    /// Wire name of the action.
    pub fn name(&self) -> &'static str {
        match self {
            Self::FetchPriceHistory => "fetchPriceHistory",
            Self::FetchListings => "fetchListings",
            Self::FetchGoodsHistory => "fetchGoodsHistory",
            Self::Ping => "ping",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = MarketDataError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.name() == value)
            .ok_or_else(|| MarketDataError::InvalidInput(format!("unknown action: {}", value)))
    }
}

/// Uniform reply envelope.
///
/// `is_mock_data` is `Some(true)` whenever `data` was synthesized; callers
/// must not treat such data as authoritative pricing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_mock_data: Option<bool>,
}

impl MessageResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            is_mock_data: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            is_mock_data: None,
        }
    }

    /// Envelope for a fetch result; the variant decides `isMockData`.
    pub fn from_fetch<T: Serialize>(result: FetchResult<T>) -> Self {
        let is_mock = result.is_synthetic();
        match serde_json::to_value(result.into_data()) {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                error: None,
                is_mock_data: Some(is_mock),
            },
            Err(e) => Self::error(format!("failed to serialize result: {}", e)),
        }
    }
}

impl From<MarketDataError> for MessageResponse {
    fn from(error: MarketDataError) -> Self {
        Self::error(error.to_string())
    }
}

/// Doppler selector as sent by callers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantInput {
    #[serde(default)]
    pub is_doppler: bool,
    #[serde(default)]
    pub paint_index: Option<i64>,
}

/// `fetchPriceHistory` fields.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryInput {
    pub item_name: String,
    pub provider: String,
    #[serde(default)]
    pub variant: Option<VariantInput>,
}

impl TryFrom<PriceHistoryInput> for PriceHistoryRequest {
    type Error = MarketDataError;

    fn try_from(input: PriceHistoryInput) -> Result<Self, Self::Error> {
        let provider: HistoryProvider = input.provider.parse()?;
        let variant = input.variant.unwrap_or_default();
        PriceHistoryRequest::from_parts(
            input.item_name,
            provider,
            variant.is_doppler,
            variant.paint_index,
        )
    }
}

/// `fetchListings` fields.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingsInput {
    pub api_url: String,
}

impl From<ListingsInput> for ListingsRequest {
    fn from(input: ListingsInput) -> Self {
        ListingsRequest::new(input.api_url)
    }
}

/// Goods ids arrive as numbers or numeric strings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum GoodsId {
    Number(u64),
    Text(String),
}

/// `fetchGoodsHistory` fields.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoodsHistoryInput {
    pub goods_id: GoodsId,
    #[serde(default)]
    pub days: Option<u32>,
}

impl TryFrom<GoodsHistoryInput> for GoodsHistoryRequest {
    type Error = MarketDataError;

    fn try_from(input: GoodsHistoryInput) -> Result<Self, Self::Error> {
        let goods_id = match input.goods_id {
            GoodsId::Number(id) => id,
            GoodsId::Text(text) => text.trim().parse().map_err(|_| {
                MarketDataError::InvalidInput(format!("goods id is not a number: {}", text))
            })?,
        };
        let request =
            GoodsHistoryRequest::new(goods_id).with_days(input.days.unwrap_or(DEFAULT_HISTORY_DAYS));
        request.validate()?;
        Ok(request)
    }
}

/// Deserialize action fields from a message, mapping failures to `InvalidInput`.
pub fn parse_input<T: serde::de::DeserializeOwned>(
    action: Action,
    message: Value,
) -> Result<T, MarketDataError> {
    serde_json::from_value(message)
        .map_err(|e| MarketDataError::InvalidInput(format!("invalid {} message: {}", action, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PricePoint, SyntheticReason, STEAM};
    use rust_decimal_macros::dec;
    use serde_json::json;
    use std::borrow::Cow;

    #[test]
    fn test_action_names_round_trip() {
        for action in Action::ALL {
            assert_eq!(action.name().parse::<Action>().unwrap(), action);
        }
        assert!("fetchEverything".parse::<Action>().is_err());
    }

    #[test]
    fn test_envelope_flags_synthetic_data() {
        let synthetic = FetchResult::Synthetic {
            data: vec![PricePoint::new(1, dec!(1.5))],
            reason: SyntheticReason {
                provider: Cow::Borrowed(STEAM),
                error_kind: "Timeout",
                message: "Timeout: STEAM (x)".to_string(),
            },
        };

        let json = serde_json::to_value(MessageResponse::from_fetch(synthetic)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["isMockData"], true);
        assert_eq!(json["data"][0]["timestampMs"], 1);
        assert!(json.get("error").is_none());

        let real = FetchResult::Real {
            data: Vec::<PricePoint>::new(),
            provider: Cow::Borrowed(STEAM),
        };
        let json = serde_json::to_value(MessageResponse::from_fetch(real)).unwrap();
        assert_eq!(json["isMockData"], false);
    }

    #[test]
    fn test_error_envelope() {
        let json = serde_json::to_value(MessageResponse::error("boom")).unwrap();
        assert_eq!(json, json!({"success": false, "error": "boom"}));
    }

    #[test]
    fn test_price_history_input() {
        let input: PriceHistoryInput = serde_json::from_value(json!({
            "action": "fetchPriceHistory",
            "itemName": "★ Karambit | Doppler (Factory New)",
            "provider": "CSFloat",
            "variant": {"isDoppler": true, "paintIndex": 418}
        }))
        .unwrap();

        let request = PriceHistoryRequest::try_from(input).unwrap();
        assert_eq!(request.provider, HistoryProvider::CsFloat);
        assert_eq!(request.variant.map(|v| v.paint_index), Some(418));
    }

    #[test]
    fn test_price_history_input_rejects_bad_variant() {
        let input = PriceHistoryInput {
            item_name: "x".to_string(),
            provider: "Steam".to_string(),
            variant: Some(VariantInput {
                is_doppler: true,
                paint_index: None,
            }),
        };
        assert!(matches!(
            PriceHistoryRequest::try_from(input),
            Err(MarketDataError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_goods_history_input() {
        let input: GoodsHistoryInput =
            serde_json::from_value(json!({"goodsId": "42567"})).unwrap();
        let request = GoodsHistoryRequest::try_from(input).unwrap();
        assert_eq!(request.goods_id, 42567);
        assert_eq!(request.days, DEFAULT_HISTORY_DAYS);

        let input: GoodsHistoryInput =
            serde_json::from_value(json!({"goodsId": 1, "days": 0})).unwrap();
        assert!(GoodsHistoryRequest::try_from(input).is_err());

        let input: GoodsHistoryInput =
            serde_json::from_value(json!({"goodsId": "abc"})).unwrap();
        assert!(GoodsHistoryRequest::try_from(input).is_err());
    }

    #[test]
    fn test_parse_input_reports_action() {
        let err = parse_input::<ListingsInput>(Action::FetchListings, json!({})).unwrap_err();
        assert!(err.to_string().contains("invalid fetchListings message"));
    }
}
