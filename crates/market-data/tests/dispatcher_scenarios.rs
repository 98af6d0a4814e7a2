use std::sync::Arc;
use std::time::Duration;

use floatwatch_market_data::http::TransportError;
use floatwatch_market_data::synthetic::base_prices::base_price_for;
use floatwatch_market_data::synthetic::{MAX_LISTINGS, MIN_LISTINGS, PRICE_FLOOR_RATIO};
use floatwatch_market_data::{
    ActionRegistry, Dispatcher, FetchConfig, FetchResult, GoodsHistoryRequest, HistoryProvider,
    HttpResponse, ListingsRequest, MarketDataError, PriceHistoryRequest, PricePoint,
    SeededSource, StubTransport,
};
use rust_decimal::prelude::ToPrimitive;
use serde_json::json;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

fn config() -> FetchConfig {
    FetchConfig {
        cascade_pause: Duration::ZERO,
        ..FetchConfig::default()
    }
}

fn dispatcher(stub: Arc<StubTransport>) -> Dispatcher {
    Dispatcher::new(stub, &config()).with_random_source(Arc::new(SeededSource::new(2024)))
}

#[tokio::test]
async fn steam_timeout_falls_back_to_synthetic_history() {
    let stub = Arc::new(StubTransport::timeout());
    let dispatcher = dispatcher(stub.clone());

    let request =
        PriceHistoryRequest::new("★ Karambit | Lore (Battle-Scarred)", HistoryProvider::Steam)
            .unwrap();
    let result = dispatcher.fetch_price_history(&request).await.unwrap();

    assert!(result.is_synthetic());
    assert!(!result.data().is_empty());
    if let FetchResult::Synthetic { reason, .. } = &result {
        assert_eq!(reason.error_kind, "Timeout");
    }

    let sent = stub.requests();
    assert_eq!(sent.len(), 1);
    assert!(sent[0]
        .url
        .contains("market_hash_name=%E2%98%85%20Karambit%20%7C%20Lore%20%28Battle-Scarred%29"));
}

#[tokio::test]
async fn steam_timeout_is_reported_as_mock_data() {
    let dispatcher = dispatcher(Arc::new(StubTransport::timeout()));
    let registry = ActionRegistry::with_dispatcher(Arc::new(dispatcher));

    let response = registry
        .dispatch(json!({
            "action": "fetchPriceHistory",
            "itemName": "★ Karambit | Lore (Battle-Scarred)",
            "provider": "Steam"
        }))
        .await;

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["isMockData"], true);
    assert!(!json["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn steam_not_found_is_classified_before_fallback() {
    let dispatcher = dispatcher(Arc::new(StubTransport::status(404, "")));

    let request = PriceHistoryRequest::new("No Such Item", HistoryProvider::Steam).unwrap();
    let result = dispatcher.fetch_price_history(&request).await.unwrap();

    match result {
        FetchResult::Synthetic { reason, .. } => assert_eq!(reason.error_kind, "NotFound"),
        FetchResult::Real { .. } => panic!("404 must not produce real data"),
    }
}

#[tokio::test]
async fn listings_server_error_synthesizes_sorted_listings() {
    let stub = Arc::new(StubTransport::status(500, "upstream down"));
    let dispatcher = dispatcher(stub.clone());

    let request = ListingsRequest::new(
        "https://csfloat.com/api/v1/listings?min_float=0&max_float=1&def_index=507&paint_index=561",
    );
    let result = dispatcher.fetch_listings(&request).await.unwrap();

    assert!(result.is_synthetic());
    let listings = result.data();
    assert!((MIN_LISTINGS..=MAX_LISTINGS).contains(&listings.len()));
    assert!(listings
        .windows(2)
        .all(|pair| pair[0].price_cents <= pair[1].price_cents));
    assert!(listings
        .iter()
        .all(|l| l.def_index == 507 && l.paint_index == 561));
    assert_eq!(stub.request_count(), 1);
}

#[tokio::test]
async fn synthetic_listings_respect_float_range() {
    let dispatcher = dispatcher(Arc::new(StubTransport::timeout()));

    let request = ListingsRequest::new(
        "https://csfloat.com/api/v1/listings?min_float=0.1&max_float=0.2&def_index=7&paint_index=282",
    );
    let result = dispatcher.fetch_listings(&request).await.unwrap();

    assert!(result.is_synthetic());
    assert!(result
        .data()
        .iter()
        .all(|l| (0.1..=0.2).contains(&l.float_value)));
}

#[tokio::test]
async fn listings_url_without_filters_is_rejected() {
    let stub = Arc::new(StubTransport::timeout());
    let dispatcher = dispatcher(stub.clone());

    let err = dispatcher
        .fetch_listings(&ListingsRequest::new("https://csfloat.com/api/v1/listings"))
        .await
        .unwrap_err();

    assert!(matches!(err, MarketDataError::InvalidInput(_)));
    assert_eq!(stub.request_count(), 0);
}

#[tokio::test]
async fn cascade_recovers_after_unparseable_bodies() {
    let stub = Arc::new(StubTransport::sequence(vec![
        Ok(HttpResponse::ok("<html>blocked</html>")),
        Ok(HttpResponse::ok("not json either")),
        Ok(HttpResponse::ok(
            json!({"data": [[1_700_000_000_000_i64, 4650.5], [1_700_086_400_000_i64, 4700]]})
                .to_string(),
        )),
    ]));
    let dispatcher = dispatcher(stub.clone());

    let result = dispatcher
        .fetch_goods_history(&GoodsHistoryRequest::new(42567).with_days(30))
        .await
        .unwrap();

    assert!(!result.is_synthetic());
    assert_eq!(result.data().len(), 2);
    assert_eq!(result.data()[0].timestamp_ms, 1_700_000_000_000);

    let sent = stub.requests();
    assert_eq!(sent.len(), 3);
    assert_eq!(sent[0].header("x-requested-with"), Some("XMLHttpRequest"));
    assert!(sent[1].url.contains("_="));
    assert!(sent[2].header("referer").is_some());
}

#[tokio::test]
async fn exhausted_cascade_synthesizes_full_window() {
    let stub = Arc::new(StubTransport::always(Err(TransportError::Connect(
        "connection refused".to_string(),
    ))));
    let dispatcher = dispatcher(stub.clone());

    let result = dispatcher
        .fetch_goods_history(&GoodsHistoryRequest::new(42567).with_days(180))
        .await
        .unwrap();

    match &result {
        FetchResult::Synthetic { reason, .. } => {
            assert_eq!(reason.error_kind, "CascadeExhausted")
        }
        FetchResult::Real { .. } => panic!("cascade cannot succeed"),
    }

    let points = result.data();
    assert_eq!(points.len(), 181);
    assert!(points
        .windows(2)
        .all(|pair| pair[1].timestamp_ms - pair[0].timestamp_ms == MS_PER_DAY));

    let floor = base_price_for("42567") * PRICE_FLOOR_RATIO;
    assert!(points
        .iter()
        .all(|p| p.price.to_f64().unwrap() >= floor));

    // One request per cascade variant, the last on the legacy endpoint.
    let sent = stub.requests();
    assert_eq!(sent.len(), 4);
    assert!(!sent[3].url.contains("/price_history/buff"));
}

#[tokio::test]
async fn seeded_fallback_is_reproducible() {
    let request = PriceHistoryRequest::new("AWP | Asiimov (Field-Tested)", HistoryProvider::CsFloat)
        .unwrap();

    let first = dispatcher(Arc::new(StubTransport::timeout()))
        .fetch_price_history(&request)
        .await
        .unwrap();
    let second = dispatcher(Arc::new(StubTransport::timeout()))
        .fetch_price_history(&request)
        .await
        .unwrap();

    let prices = |result: &FetchResult<Vec<PricePoint>>| {
        result
            .data()
            .iter()
            .map(|p| p.price)
            .collect::<Vec<_>>()
    };
    assert_eq!(prices(&first), prices(&second));
}

#[tokio::test]
async fn out_of_range_goods_timestamps_fall_back() {
    let dispatcher = dispatcher(Arc::new(StubTransport::status(
        200,
        r#"{"data":[[-9000000000000000000,12.5]]}"#,
    )));

    let result = dispatcher
        .fetch_goods_history(&GoodsHistoryRequest::new(42567).with_days(7))
        .await
        .unwrap();

    match &result {
        FetchResult::Synthetic { reason, .. } => {
            assert_eq!(reason.error_kind, "MalformedResponse")
        }
        FetchResult::Real { .. } => panic!("unparseable timestamps must not be real data"),
    }
    assert_eq!(result.data().len(), 8);
}
