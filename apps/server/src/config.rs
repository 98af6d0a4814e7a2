use std::net::SocketAddr;

use floatwatch_market_data::FetchConfig;

/// Server settings read from `FW_*` environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    pub listen_addr: SocketAddr,
    /// Allowed CORS origins; empty means any origin
    pub cors_allow_origins: Vec<String>,
    pub fetch: FetchConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let listen_addr = std::env::var("FW_LISTEN_ADDR")
            .ok()
            .and_then(|raw| match raw.parse::<SocketAddr>() {
                Ok(addr) => Some(addr),
                Err(e) => {
                    tracing::warn!("Ignoring FW_LISTEN_ADDR={:?}: {}", raw, e);
                    None
                }
            })
            .unwrap_or_else(default_listen_addr);

        let cors_allow_origins = std::env::var("FW_CORS_ALLOW_ORIGINS")
            .map(|raw| parse_origins(&raw))
            .unwrap_or_default();

        Self {
            listen_addr,
            cors_allow_origins,
            fetch: FetchConfig::from_env(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            cors_allow_origins: Vec::new(),
            fetch: FetchConfig::default(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8088))
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty() && *origin != "*")
        .map(str::to_string)
        .collect()
}
