mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use amica_core::user::Role;
use common::*;

fn login_from(ip: &str, email: &str, password: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .header("x-forwarded-for", ip)
        .body(Body::from(
            serde_json::to_vec(&json!({ "email": email, "password": password })).expect("json"),
        ))
        .expect("request")
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let (state, app) = setup().await;
    create_user(&state, "anna@salon.com", Role::Admin, Some(TENANT_A)).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({ "email": "  ANNA@salon.com", "password": format!(" {TEST_PASSWORD} ") }),
        ))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie")
        .to_string();
    assert!(cookie.starts_with("amica_session="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(!cookie.contains("Secure"), "https is off in tests");
}

#[tokio::test]
async fn test_unknown_email_and_wrong_password_are_indistinguishable() {
    let (state, app) = setup().await;
    create_user(&state, "x@y.com", Role::Staff, Some(TENANT_A)).await;

    let (wrong_status, wrong_body) = send(&app, login_from("10.0.0.1", "x@y.com", "wrong")).await;
    let (unknown_status, unknown_body) =
        send(&app, login_from("10.0.0.2", "nonexistent@y.com", "anything")).await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_login_rate_limited_after_five_failures() {
    let (state, app) = setup().await;
    create_user(&state, "x@y.com", Role::Staff, Some(TENANT_A)).await;

    for _ in 0..5 {
        let (status, _) = send(&app, login_from("198.51.100.7", "x@y.com", "wrong")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    let (status, body) = send(&app, login_from("198.51.100.7", "x@y.com", TEST_PASSWORD)).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["code"], "rate_limited");

    let (status, _) = send(&app, login_from("198.51.100.8", "x@y.com", TEST_PASSWORD)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_session_returns_principal() {
    let (state, app) = setup().await;
    let cookie = session_for(&state, &app, "staff@salon.com", Role::Staff, Some(TENANT_A)).await;

    let (status, body) = send(&app, get_request("/api/auth/session", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "staff@salon.com");
    assert_eq!(body["data"]["role"], "staff");
    assert_eq!(body["data"]["tenant_id"], TENANT_A);
}

#[tokio::test]
async fn test_bearer_token_is_accepted() {
    let (state, app) = setup().await;
    let cookie = session_for(&state, &app, "staff@salon.com", Role::Staff, Some(TENANT_A)).await;
    let token = cookie.trim_start_matches("amica_session=");

    let request = Request::builder()
        .uri("/api/auth/session")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request");
    let (status, _) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let (_state, app) = setup().await;
    for uri in [
        "/api/auth/session".to_string(),
        "/api/tenants".to_string(),
        format!("/api/tenants/{TENANT_A}/overview"),
        "/api/users".to_string(),
    ] {
        let (status, body) = send(&app, get_request(&uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["error"]["code"], "unauthorized");
    }

    let (status, _) = send(
        &app,
        get_request("/api/auth/session", Some("amica_session=not.a.jwt")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_inactive_user_cannot_login() {
    let (state, app) = setup().await;
    let user = create_user(&state, "gone@salon.com", Role::Admin, Some(TENANT_A)).await;
    state.db.set_user_active(user.id, false).await.expect("deactivate");

    let (status, _) = send(&app, login_from("10.0.0.3", "gone@salon.com", TEST_PASSWORD)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let (_state, app) = setup().await;
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/auth/logout", None, json!({})))
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie");
    assert!(cookie.starts_with("amica_session=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_deleted_user_session_is_revoked() {
    let (state, app) = setup().await;
    let root = session_for(&state, &app, "root@amica.com", Role::SuperAdmin, None).await;
    let cookie = session_for(&state, &app, "admin@a.com", Role::Admin, Some(TENANT_A)).await;
    let stats = format!("/api/tenants/{TENANT_A}/wishlist/stats");

    let (status, _) = send(&app, get_request(&stats, Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);

    let admin = state
        .db
        .lookup_user_by_email("admin@a.com")
        .await
        .expect("lookup")
        .expect("admin");
    let (status, _) = send(
        &app,
        delete_request(&format!("/api/users/{}", admin.user.id), &root),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, get_request(&stats, Some(&cookie))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "unauthorized");

    let (status, _) = send(
        &app,
        json_request(
            "PUT",
            &format!("/api/tenants/{TENANT_A}/settings"),
            Some(&cookie),
            json!({ "salon_name": "Hijacked" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let tenant = state
        .db
        .get_tenant(TENANT_A)
        .await
        .expect("get")
        .expect("tenant");
    assert_eq!(tenant.metadata["salon_name"], "Amica Center");
}

#[tokio::test]
async fn test_deactivated_user_session_is_revoked() {
    let (state, app) = setup().await;
    let cookie = session_for(&state, &app, "staff@a.com", Role::Staff, Some(TENANT_A)).await;
    let user = state
        .db
        .lookup_user_by_email("staff@a.com")
        .await
        .expect("lookup")
        .expect("staff");

    state
        .db
        .set_user_active(user.user.id, false)
        .await
        .expect("deactivate");
    let (status, _) = send(&app, get_request("/api/auth/session", Some(&cookie))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    state
        .db
        .set_user_active(user.user.id, true)
        .await
        .expect("reactivate");
    let (status, _) = send(&app, get_request("/api/auth/session", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
}
