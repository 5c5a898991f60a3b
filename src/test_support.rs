//! Shared fixtures for handler and engine tests.

use std::str::FromStr;
use std::sync::Arc;

use actix_web::test::TestRequest;
use rust_decimal::Decimal;

use crate::config::Config;
use crate::seed;
use crate::state::AppState;
use crate::store::memory::MemoryStore;

pub const ADMIN_PASSWORD: &str = "admin-pass";
pub const EMPLOYEE_PASSWORD: &str = "employee-pass";

pub fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

pub fn test_config() -> Config {
    Config {
        database_url: "mysql://unused".into(),
        jwt_secret: "test-secret".into(),
        server_addr: "127.0.0.1:0".into(),
        access_token_ttl: 900,
        refresh_token_ttl: 3600,
        rate_login_per_min: 1000,
        rate_register_per_min: 1000,
        rate_refresh_per_min: 1000,
        rate_protected_per_min: 1000,
        api_prefix: "/api".into(),
        log_dir: "logs".into(),
        seed_demo_data: true,
        seed_admin_password: ADMIN_PASSWORD.into(),
        seed_employee_password: EMPLOYEE_PASSWORD.into(),
    }
}

/// Memory store holding the demo data set.
pub async fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();
    seed::bootstrap(&store, ADMIN_PASSWORD, EMPLOYEE_PASSWORD)
        .await
        .unwrap();
    store
}

pub fn test_state(store: Arc<MemoryStore>) -> AppState {
    AppState::new(store, test_config())
}

/// Request with a peer address, which the rate limiter keys on.
pub fn request() -> TestRequest {
    TestRequest::default().peer_addr("127.0.0.1:40000".parse().unwrap())
}

/// Builds the full application around `state`.
macro_rules! init_app {
    ($state:expr) => {{
        let state: crate::state::AppState = $state;
        let config = state.config().clone();
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new(state))
                .configure(|cfg| crate::routes::configure(cfg, &config)),
        )
        .await
    }};
}
pub(crate) use init_app;

/// Logs in through the HTTP surface and returns the access token.
macro_rules! login {
    ($app:expr, $username:expr, $password:expr, $employee_id:expr) => {{
        let req = crate::test_support::request()
            .method(actix_web::http::Method::POST)
            .uri("/auth/login")
            .set_json(serde_json::json!({
                "username": $username,
                "password": $password,
                "employee_id": $employee_id,
            }))
            .to_request();
        let body: serde_json::Value = actix_web::test::call_and_read_body_json(&$app, req).await;
        format!("Bearer {}", body["access_token"].as_str().unwrap())
    }};
}
pub(crate) use login;

/// Sends a `TestRequest` and returns the status with the JSON body
/// (`Null` for empty or non-JSON bodies).
macro_rules! call {
    ($app:expr, $req:expr) => {{
        let resp = actix_web::test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let bytes = actix_web::test::read_body(resp).await;
        let json: serde_json::Value =
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }};
}
pub(crate) use call;
