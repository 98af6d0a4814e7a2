//! Synthetic price history.

use std::f64::consts::PI;

use chrono::{DateTime, Datelike, Utc, Weekday};
use num_traits::FromPrimitive;
use rand::Rng;
use rust_decimal::{Decimal, RoundingStrategy};

use super::base_prices::base_price_for;
use crate::models::{PricePoint, MAX_HISTORY_DAYS};

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Prices never drop below this share of the running base.
pub const PRICE_FLOOR_RATIO: f64 = 0.7;

const DAILY_NOISE: f64 = 0.03;
const WEEKLY_AMPLITUDE: f64 = 0.02;
const MONTHLY_AMPLITUDE: f64 = 0.04;
const SEASONAL_AMPLITUDE: f64 = 0.06;
const MAX_MARKET_DISCOUNT: f64 = 0.02;
const VOLATILITY: f64 = 0.03;
const MAX_DAILY_DRIFT: f64 = 0.0015;

/// One point per day from `now - days` to `now`, both inclusive.
///
/// `key` is an item name or goods id; unknown keys use the default base
/// price. Windows longer than [`MAX_HISTORY_DAYS`] are clamped.
pub fn synthesize_price_history<R: Rng + ?Sized>(
    rng: &mut R,
    key: &str,
    days: u32,
    now: DateTime<Utc>,
) -> Vec<PricePoint> {
    let days = days.min(MAX_HISTORY_DAYS);
    let mut base = base_price_for(key);
    let now_ms = now.timestamp_millis();
    let start_ms = now_ms - i64::from(days) * MS_PER_DAY;

    (0..=days)
        .map(|day| {
            let timestamp_ms = start_ms + i64::from(day) * MS_PER_DAY;
            let price = daily_price(rng, base, day, timestamp_ms);
            base *= 1.0 + rng.gen_range(0.0..MAX_DAILY_DRIFT);
            PricePoint::new(timestamp_ms, price)
        })
        .collect()
}

fn daily_price<R: Rng + ?Sized>(rng: &mut R, base: f64, day: u32, timestamp_ms: i64) -> Decimal {
    let t = f64::from(day);

    let noise = base * rng.gen_range(-DAILY_NOISE..DAILY_NOISE);
    let weekly = base * WEEKLY_AMPLITUDE * (2.0 * PI * t / 7.0).sin();
    let monthly = base * MONTHLY_AMPLITUDE * (2.0 * PI * t / 30.0).sin();
    let seasonal = base * SEASONAL_AMPLITUDE * (2.0 * PI * t / 365.0).sin();
    let discount = base * rng.gen_range(0.0..MAX_MARKET_DISCOUNT);
    let volatility = rng.gen_range((1.0 - VOLATILITY)..(1.0 + VOLATILITY));

    let mut price = (base + noise + weekly + monthly + seasonal - discount) * volatility;

    if is_weekend(timestamp_ms) {
        price += base * rng.gen_range(-0.01..0.02);
    }

    let floor = base * PRICE_FLOOR_RATIO;
    to_cents_up(price.max(floor)).unwrap_or_else(|| to_cents_up(floor).unwrap_or(Decimal::ZERO))
}

fn is_weekend(timestamp_ms: i64) -> bool {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .map(|ts| matches!(ts.weekday(), Weekday::Sat | Weekday::Sun))
        .unwrap_or(false)
}

/// Round up so the floor survives rounding.
fn to_cents_up(value: f64) -> Option<Decimal> {
    Decimal::from_f64(value).map(|d| d.round_dp_with_strategy(2, RoundingStrategy::AwayFromZero))
}
