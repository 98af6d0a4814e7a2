//! Typed action registry.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{
    parse_input, Action, GoodsHistoryInput, ListingsInput, MessageResponse, PriceHistoryInput,
};
use crate::errors::MarketDataError;
use crate::models::{GoodsHistoryRequest, ListingsRequest, PriceHistoryRequest};
use crate::registry::Dispatcher;

/// Handles one action.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// `message` is the full inbound message, `action` key included.
    async fn handle(&self, message: Value) -> Result<MessageResponse, MarketDataError>;
}

pub struct PriceHistoryHandler {
    dispatcher: Arc<Dispatcher>,
}

impl PriceHistoryHandler {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl ActionHandler for PriceHistoryHandler {
    async fn handle(&self, message: Value) -> Result<MessageResponse, MarketDataError> {
        let input: PriceHistoryInput = parse_input(Action::FetchPriceHistory, message)?;
        let request = PriceHistoryRequest::try_from(input)?;
        let result = self.dispatcher.fetch_price_history(&request).await?;
        Ok(MessageResponse::from_fetch(result))
    }
}

pub struct ListingsHandler {
    dispatcher: Arc<Dispatcher>,
}

impl ListingsHandler {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl ActionHandler for ListingsHandler {
    async fn handle(&self, message: Value) -> Result<MessageResponse, MarketDataError> {
        let input: ListingsInput = parse_input(Action::FetchListings, message)?;
        let result = self
            .dispatcher
            .fetch_listings(&ListingsRequest::from(input))
            .await?;
        Ok(MessageResponse::from_fetch(result))
    }
}

pub struct GoodsHistoryHandler {
    dispatcher: Arc<Dispatcher>,
}

impl GoodsHistoryHandler {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl ActionHandler for GoodsHistoryHandler {
    async fn handle(&self, message: Value) -> Result<MessageResponse, MarketDataError> {
        let input: GoodsHistoryInput = parse_input(Action::FetchGoodsHistory, message)?;
        let request = GoodsHistoryRequest::try_from(input)?;
        let result = self.dispatcher.fetch_goods_history(&request).await?;
        Ok(MessageResponse::from_fetch(result))
    }
}

/// Liveness acknowledgement.
pub struct PingHandler;

#[async_trait]
impl ActionHandler for PingHandler {
    async fn handle(&self, _message: Value) -> Result<MessageResponse, MarketDataError> {
        Ok(MessageResponse::ok(json!({ "message": "pong" })))
    }
}

/// Maps action names to handlers.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    handlers: HashMap<Action, Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registry with every action wired to `dispatcher`.
    pub fn with_dispatcher(dispatcher: Arc<Dispatcher>) -> Self {
        let mut registry = Self::new();
        registry.register(
            Action::FetchPriceHistory,
            Arc::new(PriceHistoryHandler::new(dispatcher.clone())),
        );
        registry.register(
            Action::FetchListings,
            Arc::new(ListingsHandler::new(dispatcher.clone())),
        );
        registry.register(
            Action::FetchGoodsHistory,
            Arc::new(GoodsHistoryHandler::new(dispatcher)),
        );
        registry.register(Action::Ping, Arc::new(PingHandler));
        registry
    }

    /// Register or replace the handler for `action`.
    pub fn register(&mut self, action: Action, handler: Arc<dyn ActionHandler>) {
        self.handlers.insert(action, handler);
    }

    pub fn actions(&self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|action| self.handlers.contains_key(action))
            .collect()
    }

    /// Route a raw message. Never fails: every problem becomes an error envelope.
    pub async fn dispatch(&self, message: Value) -> MessageResponse {
        let Some(name) = message.get("action").and_then(Value::as_str) else {
            return MessageResponse::error("message has no action");
        };

        let action: Action = match name.parse() {
            Ok(action) => action,
            Err(e) => {
                warn!("Rejected message: {}", e);
                return MessageResponse::from(e);
            }
        };

        let Some(handler) = self.handlers.get(&action) else {
            return MessageResponse::error(format!("no handler registered for {}", action));
        };

        debug!("Dispatching {} message", action);

        match handler.handle(message).await {
            Ok(response) => response,
            Err(e) => {
                warn!("{} failed: {}", action, e);
                MessageResponse::from(e)
            }
        }
    }
}
