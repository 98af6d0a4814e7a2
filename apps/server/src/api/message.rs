use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use floatwatch_market_data::MessageResponse;
use serde_json::{json, Value};

use crate::main_lib::AppState;

/// Route a message envelope. Failures are reported inside the envelope, so
/// the status is always 200 once the body parses as JSON.
async fn handle_message(
    State(state): State<Arc<AppState>>,
    Json(message): Json<Value>,
) -> Json<MessageResponse> {
    Json(state.registry.dispatch(message).await)
}

async fn ping(State(state): State<Arc<AppState>>) -> Json<MessageResponse> {
    Json(state.registry.dispatch(json!({ "action": "ping" })).await)
}

async fn list_actions(State(state): State<Arc<AppState>>) -> Json<Vec<&'static str>> {
    Json(
        state
            .registry
            .actions()
            .into_iter()
            .map(|action| action.name())
            .collect(),
    )
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/message", post(handle_message))
        .route("/ping", get(ping))
        .route("/actions", get(list_actions))
}
