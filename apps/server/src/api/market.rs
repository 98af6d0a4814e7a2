use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use floatwatch_market_data::{
    FetchRequest, GoodsHistoryRequest, HistoryProvider, ListingsRequest, MessageResponse,
    PriceHistoryRequest,
};
use serde::Deserialize;

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceHistoryQuery {
    item_name: String,
    provider: String,
    /// Present only for Doppler phases
    paint_index: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListingsQuery {
    api_url: String,
}

#[derive(Deserialize)]
struct GoodsHistoryQuery {
    days: Option<u32>,
}

async fn fetch(state: &AppState, request: FetchRequest) -> ApiResult<Json<MessageResponse>> {
    let result = state.dispatcher.handle(request).await?;
    Ok(Json(MessageResponse::from_fetch(result)))
}

async fn get_price_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PriceHistoryQuery>,
) -> ApiResult<Json<MessageResponse>> {
    let provider: HistoryProvider = query.provider.parse()?;
    let request = PriceHistoryRequest::from_parts(
        query.item_name,
        provider,
        query.paint_index.is_some(),
        query.paint_index,
    )?;
    fetch(&state, FetchRequest::PriceHistory(request)).await
}

async fn get_listings(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListingsQuery>,
) -> ApiResult<Json<MessageResponse>> {
    fetch(
        &state,
        FetchRequest::Listings(ListingsRequest::new(query.api_url)),
    )
    .await
}

async fn get_goods_history(
    State(state): State<Arc<AppState>>,
    Path(goods_id): Path<u64>,
    Query(query): Query<GoodsHistoryQuery>,
) -> ApiResult<Json<MessageResponse>> {
    let mut request = GoodsHistoryRequest::new(goods_id);
    if let Some(days) = query.days {
        request = request.with_days(days);
    }
    fetch(&state, FetchRequest::GoodsHistory(request)).await
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/price-history", get(get_price_history))
        .route("/listings", get(get_listings))
        .route("/goods/{goods_id}/history", get(get_goods_history))
}
