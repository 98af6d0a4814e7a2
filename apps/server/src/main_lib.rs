use std::sync::Arc;

use floatwatch_market_data::{ActionRegistry, Dispatcher};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub registry: ActionRegistry,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        let dispatcher = Arc::new(dispatcher);
        Self {
            registry: ActionRegistry::with_dispatcher(dispatcher.clone()),
            dispatcher,
        }
    }
}

pub fn init_tracing() {
    let log_format = std::env::var("FW_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// State over the production HTTP transport.
pub fn build_state(config: &Config) -> Arc<AppState> {
    tracing::info!(
        "Providers: steam={}, csfloat={}, buff163={}",
        config.fetch.steam_base_url,
        config.fetch.csfloat_base_url,
        config.fetch.buff_base_url
    );
    Arc::new(AppState::new(Dispatcher::from_config(&config.fetch)))
}
