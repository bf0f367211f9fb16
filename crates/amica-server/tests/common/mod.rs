#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use amica_core::config::Config;
use amica_core::user::{NewUserRecord, Role, User};
use amica_duckdb::DuckDbBackend;
use amica_server::app::build_app;
use amica_server::auth::password::hash_password;
use amica_server::state::AppState;

pub const TENANT_A: &str = "11111111-1111-4111-8111-111111111111";
pub const TENANT_B: &str = "22222222-2222-4222-8222-222222222222";
pub const TEST_PASSWORD: &str = "strong_password_123";

/// Config with low argon2 memory for fast tests.
pub fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        data_dir: "/tmp/amica-test".to_string(),
        duckdb_memory_limit: "1GB".to_string(),
        app_secret: Some("test-secret".to_string()),
        https: false,
        session_days: 7,
        argon2_memory_kb: 4096,
        debug: false,
        metrics_collector: false,
        bootstrap_admin: None,
    }
}

/// Fresh in-memory backend with two tenants, plus state and router.
pub async fn setup() -> (Arc<AppState>, axum::Router) {
    let db = DuckDbBackend::open_in_memory().expect("in-memory DuckDB");
    db.seed_tenant(TENANT_A, "Amica Center", &json!({ "salon_name": "Amica Center" }))
        .await
        .expect("seed tenant A");
    db.seed_tenant(TENANT_B, "Amica North", &json!({ "salon_name": "Amica North" }))
        .await
        .expect("seed tenant B");
    let state = Arc::new(AppState::init(db, test_config()).await.expect("state"));
    let app = build_app(Arc::clone(&state));
    (state, app)
}

pub async fn create_user(state: &AppState, email: &str, role: Role, tenant: Option<&str>) -> User {
    state
        .db
        .create_user(NewUserRecord {
            email: email.to_string(),
            password_hash: hash_password(TEST_PASSWORD, 4096).expect("hash"),
            role,
            tenant_id: tenant.map(str::to_string),
            first_name: Some("Test".to_string()),
            last_name: None,
        })
        .await
        .expect("create user")
        .expect("unique email")
}

/// Log in and return the `amica_session=...` cookie pair.
pub async fn login(app: &axum::Router, email: &str) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": email, "password": TEST_PASSWORD }),
        ))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK, "login as {email}");
    response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .expect("session cookie")
        .to_string()
}

/// Create a user of `role` and return its session cookie.
pub async fn session_for(
    state: &AppState,
    app: &axum::Router,
    email: &str,
    role: Role,
    tenant: Option<&str>,
) -> String {
    create_user(state, email, role, tenant).await;
    login(app, email).await
}

pub fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(serde_json::to_vec(&body).expect("json")))
        .expect("request")
}

pub fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).expect("request")
}

pub fn delete_request(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .expect("request")
}

pub async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, body)
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_session(
    db: &DuckDbBackend,
    tenant_id: &str,
    session_id: &str,
    started_at: &str,
    final_status: &str,
    meta: &str,
    booking_id: Option<&str>,
    booking_amount: Option<f64>,
) {
    let conn = db.conn_for_test().await;
    conn.execute(
        "INSERT INTO conversation_sessions \
             (session_id, tenant_id, user_id, started_at, final_status, booking_id, booking_amount, meta) \
         VALUES (?1, ?2, 'client_1', CAST(?3 AS TIMESTAMP), ?4, ?5, ?6, ?7)",
        amica_duckdb::duckdb::params![
            session_id,
            tenant_id,
            started_at,
            final_status,
            booking_id,
            booking_amount,
            meta
        ],
    )
    .expect("insert session");
}

pub async fn insert_wishlist(db: &DuckDbBackend, tenant_id: &str, status: &str, amount: Option<f64>) -> i64 {
    let conn = db.conn_for_test().await;
    conn.prepare(
        "INSERT INTO wishlist_items (tenant_id, user_id, item_type, item_id, status, amount) \
         VALUES (?1, 'client_1', 'service', 'svc_1', ?2, ?3) RETURNING id",
    )
    .expect("prepare")
    .query_row(
        amica_duckdb::duckdb::params![tenant_id, status, amount],
        |row| row.get(0),
    )
    .expect("insert wishlist item")
}
