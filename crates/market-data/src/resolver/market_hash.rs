//! Market hash name encoding.

use urlencoding::encode;

use super::traits::NameEncoder;
use crate::errors::MarketDataError;

/// Percent-encodes an item name into a market hash name.
///
/// Non-ASCII glyphs (the `★` rarity star), spaces and the `|` separator are
/// escaped as UTF-8 percent sequences. Parentheses are always escaped;
/// marketplaces reject them literal. Only `A-Z a-z 0-9 - . _ ~` stay
/// literal, so `!`, `'` and `*` are escaped too; the result still decodes to
/// the same name.
///
/// ```
/// use floatwatch_market_data::resolver::encode_market_hash_name;
///
/// let encoded = encode_market_hash_name("★ Karambit | Lore (Battle-Scarred)").unwrap();
/// assert_eq!(encoded, "%E2%98%85%20Karambit%20%7C%20Lore%20%28Battle-Scarred%29");
/// ```
pub fn encode_market_hash_name(raw_name: &str) -> Result<String, MarketDataError> {
    let name = raw_name.trim();
    if name.is_empty() {
        return Err(MarketDataError::InvalidInput(
            "item name must not be empty".to_string(),
        ));
    }

    Ok(encode(name).replace('(', "%28").replace(')', "%29"))
}

/// Default [`NameEncoder`] used by every provider.
#[derive(Clone, Copy, Debug, Default)]
pub struct MarketHashEncoder;

impl NameEncoder for MarketHashEncoder {
    fn encode(&self, raw_name: &str) -> Result<String, MarketDataError> {
        encode_market_hash_name(raw_name)
    }
}
