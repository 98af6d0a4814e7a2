use std::borrow::Cow;

/// Provider identifier - mostly static constants
pub type ProviderId = Cow<'static, str>;

/// Steam Community market (price history provider A).
pub const STEAM: &str = "STEAM";

/// CSFloat market (price history provider B and listings).
pub const CSFLOAT: &str = "CSFLOAT";

/// Buff163 goods price history (no stable endpoint).
pub const BUFF163: &str = "BUFF163";
