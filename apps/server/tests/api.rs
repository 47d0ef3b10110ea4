use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::{NaiveDate, TimeZone};
use crypto_ledger_core::prices::NewDailyPrice;
use crypto_ledger_core::transactions::{NewTransaction, TransactionRepositoryTrait};
use crypto_ledger_storage_sqlite::{create_pool, spawn_writer, TransactionRepository};
use crypto_ledger_server::{api::app_router, build_state, config::Config, AppState};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    state: Arc<AppState>,
    db_path: String,
    _tmp: TempDir,
}

async fn build_test_app() -> TestApp {
    let tmp = tempdir().unwrap();
    let config = Config {
        db_path: tmp.path().join("test.db").to_string_lossy().to_string(),
        price_api_url: "http://127.0.0.1:9".to_string(),
        price_sync_delay: Duration::ZERO,
        db_connect_attempts: 1,
        ..Config::default()
    };
    let state = build_state(&config).await.unwrap();
    TestApp {
        router: app_router(state.clone(), &config),
        state,
        db_path: config.db_path.clone(),
        _tmp: tmp,
    }
}

impl TestApp {
    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn send_raw(&self, method: Method, uri: &str, raw: &'static str) -> Response {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(raw))
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn btc_purchase() -> Value {
    json!({
        "symbol": "BTC",
        "amount": 0.5,
        "price_at_purchase": 4000000,
        "purchased_at": "2024-01-01"
    })
}

#[tokio::test]
async fn root_and_health_routes() {
    let app = build_test_app().await;

    let response = app.send(Method::GET, "/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"Hello, Crypto Ledger!");

    for uri in ["/api/healthz", "/api/readyz"] {
        let response = app.send(Method::GET, uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn transaction_crud_lifecycle() {
    let app = build_test_app().await;

    let response = app
        .send(Method::POST, "/api/transactions", Some(btc_purchase()))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = json_body(response).await;
    let id = created["id"].as_i64().unwrap();
    assert_eq!(created["symbol"], "BTC");
    assert_eq!(created["amount"].as_f64(), Some(0.5));

    let response = app
        .send(Method::GET, &format!("/api/transactions/{}", id), None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let replacement = json!({
        "symbol": "ETH",
        "amount": 2,
        "price_at_purchase": 300000,
        "purchased_at": "2024-01-03T09:30:00Z"
    });
    let response = app
        .send(
            Method::PUT,
            &format!("/api/transactions/{}", id),
            Some(replacement),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = json_body(response).await;
    assert_eq!(updated["id"].as_i64(), Some(id));
    assert_eq!(updated["symbol"], "ETH");
    assert_eq!(updated["created_at"], created["created_at"]);

    let response = app.send(Method::GET, "/api/transactions", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 1);

    let response = app
        .send(Method::DELETE, &format!("/api/transactions/{}", id), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .send(Method::DELETE, &format!("/api/transactions/{}", id), None)
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["error"], "Transaction not found");
}

#[tokio::test]
async fn list_is_newest_first() {
    let app = build_test_app().await;
    for day in ["2024-01-01", "2024-03-01", "2024-02-01"] {
        let body = json!({
            "symbol": "BTC",
            "amount": 1,
            "price_at_purchase": 100,
            "purchased_at": day
        });
        let response = app.send(Method::POST, "/api/transactions", Some(body)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.send(Method::GET, "/api/transactions", None).await;
    let listed = json_body(response).await;
    let days: Vec<&str> = listed
        .as_array()
        .unwrap()
        .iter()
        .map(|t| &t["purchased_at"].as_str().unwrap()[..10])
        .collect();
    assert_eq!(days, vec!["2024-03-01", "2024-02-01", "2024-01-01"]);
}

#[tokio::test]
async fn zero_price_purchase_is_accepted() {
    let app = build_test_app().await;
    let body = json!({
        "symbol": "ETH",
        "amount": 1,
        "price_at_purchase": 0,
        "purchased_at": "2024-01-01"
    });
    let response = app.send(Method::POST, "/api/transactions", Some(body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn invalid_input_is_rejected() {
    let app = build_test_app().await;

    let mut bad_date = btc_purchase();
    bad_date["purchased_at"] = json!("01/02/2024");
    let response = app.send(Method::POST, "/api/transactions", Some(bad_date)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("Invalid date format"));

    let response = app
        .send_raw(Method::POST, "/api/transactions", "{\"symbol\": ")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .send(Method::POST, "/api/transactions", Some(json!({ "symbol": "BTC" })))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app.send(Method::GET, "/api/transactions/abc", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .send(Method::PUT, "/api/transactions/999", Some(btc_purchase()))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .send(Method::GET, "/api/portfolio/history?as_of=yesterday", None)
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn history_combines_transactions_and_prices() {
    let app = build_test_app().await;

    app.send(Method::POST, "/api/transactions", Some(btc_purchase()))
        .await;
    let eth = json!({
        "symbol": "ETH",
        "amount": 2,
        "price_at_purchase": 300000,
        "purchased_at": "2024-01-02"
    });
    app.send(Method::POST, "/api/transactions", Some(eth)).await;

    let day = |d: u32| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
    let price = |symbol: &str, date: NaiveDate, price: Decimal| NewDailyPrice {
        symbol: symbol.to_string(),
        date,
        price,
    };
    app.state
        .price_repository
        .upsert_prices(&[
            price("BTC", day(1), dec!(5000000)),
            price("BTC", day(2), dec!(6000000)),
            price("ETH", day(2), dec!(400000)),
        ])
        .await
        .unwrap();

    let response = app
        .send(Method::GET, "/api/portfolio/history?as_of=2024-01-02", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let history = json_body(response).await;
    let points = history.as_array().unwrap();
    assert_eq!(points.len(), 2);

    assert_eq!(points[0]["date"], "2024-01-01");
    assert_eq!(points[0]["total_value"].as_f64(), Some(2500000.0));
    assert_eq!(points[0]["total_investment"].as_f64(), Some(2000000.0));
    assert_eq!(points[0]["eth_value"].as_f64(), Some(0.0));

    assert_eq!(points[1]["date"], "2024-01-02");
    assert_eq!(points[1]["btc_value"].as_f64(), Some(3000000.0));
    assert_eq!(points[1]["eth_value"].as_f64(), Some(800000.0));
    assert_eq!(points[1]["total_value"].as_f64(), Some(3800000.0));
    assert_eq!(points[1]["total_investment"].as_f64(), Some(2600000.0));
}

#[tokio::test]
async fn history_is_empty_without_transactions() {
    let app = build_test_app().await;
    let response = app.send(Method::GET, "/api/portfolio/history", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!([]));
}

#[tokio::test]
async fn price_sync_reports_success_when_feed_is_down() {
    let app = build_test_app().await;

    let response = app.send(Method::POST, "/api/prices/sync", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Prices synced successfully");

    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["symbol"], "BTC");
    assert_eq!(results[1]["symbol"], "ETH");
    assert!(results.iter().all(|r| r["error"].is_string()));
}

#[tokio::test]
async fn oversized_purchase_is_rejected_and_history_survives_stored_one() {
    let app = build_test_app().await;

    let huge = json!({
        "symbol": "BTC",
        "amount": 1e15,
        "price_at_purchase": 1e15,
        "purchased_at": "2024-01-01"
    });
    let response = app.send(Method::POST, "/api/transactions", Some(huge)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"],
        "Amount times price at purchase is too large"
    );

    // A row written past validation must not break the history endpoint.
    let pool = create_pool(&app.db_path).unwrap();
    let repository = TransactionRepository::new(pool.clone(), spawn_writer(pool));
    repository
        .create_transaction(NewTransaction {
            symbol: "BTC".to_string(),
            amount: dec!(1000000000000000),
            price_at_purchase: dec!(1000000000000000),
            purchased_at: chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        })
        .await
        .unwrap();
    app.send(Method::POST, "/api/transactions", Some(btc_purchase()))
        .await;

    let response = app
        .send(Method::GET, "/api/portfolio/history?as_of=2024-01-02", None)
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let history = json_body(response).await;
    let points = history.as_array().unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[1]["total_investment"].as_f64(), Some(2000000.0));
}
