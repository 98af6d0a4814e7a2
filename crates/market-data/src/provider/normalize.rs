//! Shared response normalization helpers.

use std::str::FromStr;

use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::errors::MarketDataError;

/// Parse a 2xx body as JSON.
pub fn parse_json(provider: &str, item: &str, body: &str) -> Result<Value, MarketDataError> {
    serde_json::from_str(body).map_err(|e| MarketDataError::MalformedResponse {
        provider: provider.to_string(),
        item: item.to_string(),
        message: format!("body is not JSON: {}", e),
    })
}

/// Locate the payload array: the root itself, then a nested `data` field.
///
/// Fails with `UnexpectedShape` when neither holds an array and with
/// `EmptyResult` when the array has no entries.
pub fn extract_array(
    provider: &str,
    item: &str,
    value: Value,
) -> Result<Vec<Value>, MarketDataError> {
    let array = match value {
        Value::Array(array) => array,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(array)) => array,
            _ => {
                return Err(MarketDataError::UnexpectedShape {
                    provider: provider.to_string(),
                    item: item.to_string(),
                })
            }
        },
        _ => {
            return Err(MarketDataError::UnexpectedShape {
                provider: provider.to_string(),
                item: item.to_string(),
            })
        }
    };

    if array.is_empty() {
        return Err(MarketDataError::EmptyResult {
            provider: provider.to_string(),
            item: item.to_string(),
        });
    }

    Ok(array)
}

/// Number or numeric string.
pub fn decimal_from_value(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(Decimal::from(i))
            } else {
                n.as_f64().and_then(Decimal::from_f64)
            }
        }
        Value::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

/// Integer, float or numeric string, truncated to `i64`.
pub fn i64_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}
