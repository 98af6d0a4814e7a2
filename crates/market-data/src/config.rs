//! Fetch configuration shared by the URL builder, providers and dispatcher.

use std::time::Duration;

use crate::models::DEFAULT_HISTORY_DAYS;

/// Conventional desktop browser user agent sent to every marketplace.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_CASCADE_PAUSE: Duration = Duration::from_millis(250);

/// Runtime configuration for outbound requests.
#[derive(Clone, Debug)]
pub struct FetchConfig {
    /// Per-request timeout; the connection is dropped when it expires
    pub request_timeout: Duration,
    pub user_agent: String,

    pub steam_base_url: String,
    pub steam_country: String,
    /// Steam currency code (1 = USD)
    pub steam_currency: u32,
    /// Steam app id (730 = CS2)
    pub steam_app_id: u32,

    pub csfloat_base_url: String,

    pub buff_base_url: String,
    pub buff_currency: String,

    /// Pause before the next cascade variant after a transient failure
    pub cascade_pause: Duration,

    /// Length of synthesized history when the request names no window
    pub synthetic_history_days: u32,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            steam_base_url: "https://steamcommunity.com".to_string(),
            steam_country: "US".to_string(),
            steam_currency: 1,
            steam_app_id: 730,
            csfloat_base_url: "https://csfloat.com".to_string(),
            buff_base_url: "https://buff.163.com".to_string(),
            buff_currency: "CNY".to_string(),
            cascade_pause: DEFAULT_CASCADE_PAUSE,
            synthetic_history_days: DEFAULT_HISTORY_DAYS,
        }
    }
}

impl FetchConfig {
    /// Defaults overridden by `FW_*` environment variables.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(ms) = parse_u64(&lookup, "FW_REQUEST_TIMEOUT_MS") {
            config.request_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_u64(&lookup, "FW_CASCADE_PAUSE_MS") {
            config.cascade_pause = Duration::from_millis(ms);
        }
        if let Some(agent) = lookup("FW_USER_AGENT").filter(|v| !v.trim().is_empty()) {
            config.user_agent = agent;
        }
        if let Some(url) = lookup("FW_STEAM_BASE_URL") {
            config.steam_base_url = trim_base(url);
        }
        if let Some(url) = lookup("FW_CSFLOAT_BASE_URL") {
            config.csfloat_base_url = trim_base(url);
        }
        if let Some(url) = lookup("FW_BUFF_BASE_URL") {
            config.buff_base_url = trim_base(url);
        }

        config
    }
}

fn parse_u64<F>(lookup: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not an integer", key, raw);
            None
        }
    }
}

fn trim_base(url: String) -> String {
    url.trim().trim_end_matches('/').to_string()
}
