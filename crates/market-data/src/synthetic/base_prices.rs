//! Reference prices used to anchor synthetic data.

/// Base price for items missing from [`HISTORY_BASE_PRICES`].
pub const DEFAULT_BASE_PRICE: f64 = 100.0;

/// Listing price range for def/paint pairs missing from [`LISTING_PRICE_RANGES`].
pub const DEFAULT_PRICE_RANGE: PriceRange = PriceRange {
    high_cents: 25_000,
    low_cents: 4_000,
};

/// Base prices keyed by market hash name or Buff163 goods id.
pub const HISTORY_BASE_PRICES: &[(&str, f64)] = &[
    ("★ Karambit | Lore (Battle-Scarred)", 640.0),
    ("★ Karambit | Lore (Factory New)", 2150.0),
    ("★ Karambit | Doppler (Factory New)", 1280.0),
    ("★ Butterfly Knife | Fade (Factory New)", 2450.0),
    ("AWP | Dragon Lore (Factory New)", 11800.0),
    ("AWP | Asiimov (Field-Tested)", 96.0),
    ("AK-47 | Redline (Field-Tested)", 19.5),
    ("AK-47 | Vulcan (Minimal Wear)", 245.0),
    ("M4A4 | Howl (Minimal Wear)", 4300.0),
    ("M4A1-S | Printstream (Field-Tested)", 145.0),
    ("Desert Eagle | Blaze (Factory New)", 520.0),
    ("USP-S | Kill Confirmed (Minimal Wear)", 68.0),
    // Buff163 goods ids, prices in CNY
    ("42567", 4650.0),
    ("33815", 138.0),
    ("35856", 690.0),
];

/// Listing price bounds in cents. `high_cents` applies at the low end of the
/// float range, `low_cents` at the high end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PriceRange {
    pub high_cents: u64,
    pub low_cents: u64,
}

/// Listing price ranges keyed by `(def_index, paint_index)`.
pub const LISTING_PRICE_RANGES: &[((u32, u32), PriceRange)] = &[
    // Karambit | Lore
    (
        (507, 561),
        PriceRange {
            high_cents: 240_000,
            low_cents: 62_000,
        },
    ),
    // Karambit | Doppler
    (
        (507, 418),
        PriceRange {
            high_cents: 145_000,
            low_cents: 98_000,
        },
    ),
    // AK-47 | Redline
    (
        (7, 282),
        PriceRange {
            high_cents: 4_800,
            low_cents: 1_600,
        },
    ),
    // AWP | Asiimov
    (
        (9, 279),
        PriceRange {
            high_cents: 21_000,
            low_cents: 7_500,
        },
    ),
    // M4A4 | Howl
    (
        (16, 309),
        PriceRange {
            high_cents: 720_000,
            low_cents: 380_000,
        },
    ),
];

/// Look up the base price for an item name or goods id.
///
/// Matching ignores surrounding whitespace and ASCII case.
pub fn base_price_for(key: &str) -> f64 {
    let key = key.trim();
    HISTORY_BASE_PRICES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key))
        .map(|(_, price)| *price)
        .unwrap_or(DEFAULT_BASE_PRICE)
}

/// Look up the listing price range for a def/paint pair.
pub fn price_range_for(def_index: u32, paint_index: u32) -> PriceRange {
    LISTING_PRICE_RANGES
        .iter()
        .find(|(key, _)| *key == (def_index, paint_index))
        .map(|(_, range)| *range)
        .unwrap_or(DEFAULT_PRICE_RANGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_and_unknown_items() {
        assert_eq!(base_price_for("AK-47 | Redline (Field-Tested)"), 19.5);
        assert_eq!(base_price_for("  ak-47 | redline (field-tested) "), 19.5);
        assert_eq!(base_price_for("42567"), 4650.0);
        assert_eq!(base_price_for("Sticker | Unknown"), DEFAULT_BASE_PRICE);
        assert_eq!(base_price_for(""), DEFAULT_BASE_PRICE);
    }

    #[test]
    fn test_price_ranges() {
        assert_eq!(price_range_for(507, 561).high_cents, 240_000);
        assert_eq!(price_range_for(0, 0), DEFAULT_PRICE_RANGE);
        for (_, range) in LISTING_PRICE_RANGES {
            assert!(range.high_cents > range.low_cents);
        }
    }
}
