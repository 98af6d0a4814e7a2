//! Synthetic listings.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use uuid::Builder;

use super::base_prices::price_range_for;
use crate::models::{sort_by_price, Listing, ListingFilters, SellerStatistics};

pub const MIN_LISTINGS: usize = 3;
pub const MAX_LISTINGS: usize = 8;

/// Icon reference shared by every synthetic listing.
pub const GENERIC_ICON_REF: &str = "econ/default_generated/synthetic_listing";

const PRICE_VARIATION: f64 = 0.05;
const MAX_AGE_SECONDS: i64 = 72 * 60 * 60;
const STEAM_ID_PREFIX: &str = "7656119";

/// Between [`MIN_LISTINGS`] and [`MAX_LISTINGS`] listings inside the filter's
/// float range, cheapest first.
///
/// Price falls linearly from the item's high price at the bottom of the
/// float range to its low price at the top, with up to 5% variation.
/// An inverted or out-of-bounds float range is normalized rather than
/// rejected.
pub fn synthesize_listings<R: Rng + ?Sized>(
    rng: &mut R,
    filters: &ListingFilters,
    now: DateTime<Utc>,
) -> Vec<Listing> {
    let (min_float, max_float) = float_bounds(filters);
    let span = max_float - min_float;
    let range = price_range_for(filters.def_index, filters.paint_index);
    let high = range.high_cents as f64;
    let low = range.low_cents as f64;

    let count = rng.gen_range(MIN_LISTINGS..=MAX_LISTINGS);
    let mut listings: Vec<Listing> = (0..count)
        .map(|_| {
            let float_value = if span > 0.0 {
                rng.gen_range(min_float..=max_float)
            } else {
                min_float
            };

            let position = if span > 0.0 {
                (float_value - min_float) / span
            } else {
                0.0
            };
            let price = (high - (high - low) * position)
                * rng.gen_range((1.0 - PRICE_VARIATION)..=(1.0 + PRICE_VARIATION));

            synthetic_listing(rng, filters, float_value, price.round().max(1.0) as u64, now)
        })
        .collect();

    sort_by_price(&mut listings);
    listings
}

fn float_bounds(filters: &ListingFilters) -> (f64, f64) {
    let clamp = |v: f64| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
    let (a, b) = (clamp(filters.min_float), clamp(filters.max_float));
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

fn synthetic_listing<R: Rng + ?Sized>(
    rng: &mut R,
    filters: &ListingFilters,
    float_value: f64,
    price_cents: u64,
    now: DateTime<Utc>,
) -> Listing {
    let id = Builder::from_random_bytes(rng.gen()).into_uuid();
    let created_at = now - Duration::seconds(rng.gen_range(0..MAX_AGE_SECONDS));

    Listing {
        id: id.to_string(),
        created_at,
        price_cents,
        float_value,
        seller_id: format!("{}{:010}", STEAM_ID_PREFIX, rng.gen_range(0..10_000_000_000u64)),
        def_index: filters.def_index,
        paint_index: filters.paint_index,
        paint_seed: rng.gen_range(0..=1000),
        icon_ref: GENERIC_ICON_REF.to_string(),
        seller_statistics: Some(seller_statistics(rng)),
    }
}

fn seller_statistics<R: Rng + ?Sized>(rng: &mut R) -> SellerStatistics {
    let total_trades = rng.gen_range(5..=2500u32);
    let total_failed_trades = rng.gen_range(0..=total_trades / 50);
    SellerStatistics {
        median_trade_time: rng.gen_range(60..=14_400),
        total_failed_trades,
        total_trades,
        total_verified_trades: total_trades - total_failed_trades,
    }
}
