use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single observed (or synthesized) price at a point in time.
///
/// Sequences are chronological; duplicate timestamps are allowed because
/// providers report them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    /// Milliseconds since the Unix epoch (UTC)
    pub timestamp_ms: i64,

    /// Price in the provider's currency
    pub price: Decimal,
}

impl PricePoint {
    pub fn new(timestamp_ms: i64, price: Decimal) -> Self {
        Self {
            timestamp_ms,
            price,
        }
    }

    pub fn at(timestamp: DateTime<Utc>, price: Decimal) -> Self {
        Self::new(timestamp.timestamp_millis(), price)
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp_ms).single()
    }
}

/// Stable chronological sort; equal timestamps keep provider order.
pub fn sort_chronologically(points: &mut [PricePoint]) {
    points.sort_by_key(|p| p.timestamp_ms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_point_at() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let point = PricePoint::at(ts, dec!(12.34));
        assert_eq!(point.timestamp_ms, 1_704_067_200_000);
        assert_eq!(point.timestamp(), Some(ts));
    }

    #[test]
    fn test_sort_keeps_duplicates_in_order() {
        let mut points = vec![
            PricePoint::new(2_000, dec!(3)),
            PricePoint::new(1_000, dec!(1)),
            PricePoint::new(2_000, dec!(4)),
        ];
        sort_chronologically(&mut points);
        assert_eq!(
            points.iter().map(|p| p.price).collect::<Vec<_>>(),
            vec![dec!(1), dec!(3), dec!(4)]
        );
    }

    #[test]
    fn test_serializes_camel_case() {
        let json = serde_json::to_value(PricePoint::new(1_000, dec!(2.5))).unwrap();
        assert_eq!(json["timestampMs"], 1_000);
        assert_eq!(json["price"], 2.5);
    }
}
