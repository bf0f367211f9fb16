mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};

use amica_core::user::Role;
use common::*;

async fn seed_reference_sessions(state: &amica_server::state::AppState) {
    let db = state.db.as_ref();
    insert_session(db, TENANT_A, "s1", "2026-03-02 10:00:00", "done", "{}", Some("b1"), Some(100.0)).await;
    insert_session(
        db,
        TENANT_A,
        "s2",
        "2026-03-03 10:00:00",
        "abandoned",
        r#"{"drop_off_stage":"time_selection"}"#,
        None,
        None,
    )
    .await;
    insert_session(
        db,
        TENANT_A,
        "s3",
        "2026-03-04 10:00:00",
        "abandoned",
        r#"{"drop_off_stage":"staff_selection"}"#,
        None,
        None,
    )
    .await;
    insert_session(
        db,
        TENANT_A,
        "s4",
        "2026-03-05 10:00:00",
        "ghost",
        r#"{"drop_off_stage":"service_selection"}"#,
        None,
        None,
    )
    .await;
    insert_session(db, TENANT_B, "b1", "2026-03-02 10:00:00", "done", "{}", Some("x"), Some(500.0)).await;
}

#[tokio::test]
async fn test_overview_reports_kpi_and_funnel() {
    let (state, app) = setup().await;
    seed_reference_sessions(&state).await;
    let cookie = session_for(&state, &app, "admin@a.com", Role::Admin, Some(TENANT_A)).await;

    let (status, body) = send(
        &app,
        get_request(
            &format!("/api/tenants/{TENANT_A}/overview?date_from=2026-03-01&date_to=2026-03-07"),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["kpi"]["sessions"], 4);
    assert_eq!(data["kpi"]["bookings"], 1);
    assert_eq!(data["kpi"]["revenue"], 100.0);
    assert_eq!(data["kpi"]["conversion"], 25.0);

    let stages = &data["funnel"]["stages"];
    assert_eq!(stages["started"], 4);
    assert_eq!(stages["service_selected"], 3);
    assert_eq!(stages["staff_selected"], 2);
    assert_eq!(stages["time_selected"], 1);
    assert_eq!(stages["done"], 1);
    assert_eq!(data["funnel"]["steps"][4]["percent_of_started"], 25.0);
}

#[tokio::test]
async fn test_overview_defaults_to_last_week() {
    let (state, app) = setup().await;
    let yesterday = (Utc::now() - Duration::days(1)).format("%Y-%m-%d 12:00:00").to_string();
    let old = (Utc::now() - Duration::days(30)).format("%Y-%m-%d 12:00:00").to_string();
    insert_session(state.db.as_ref(), TENANT_A, "recent", &yesterday, "done", "{}", None, None).await;
    insert_session(state.db.as_ref(), TENANT_A, "old", &old, "done", "{}", None, None).await;
    let cookie = session_for(&state, &app, "admin@a.com", Role::Admin, Some(TENANT_A)).await;

    let (status, body) = send(
        &app,
        get_request(&format!("/api/tenants/{TENANT_A}/overview"), Some(&cookie)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["kpi"]["sessions"], 1);
    assert_eq!(body["data"]["kpi"]["conversion"], 0.0);
}

#[tokio::test]
async fn test_empty_tenant_has_zero_overview() {
    let (state, app) = setup().await;
    let cookie = session_for(&state, &app, "admin@b.com", Role::Admin, Some(TENANT_B)).await;

    let (status, body) = send(
        &app,
        get_request(
            &format!("/api/tenants/{TENANT_B}/overview?date_from=2026-01-01&date_to=2026-01-31"),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["kpi"]["sessions"], 0);
    assert_eq!(body["data"]["kpi"]["conversion"], 0.0);
    assert_eq!(body["data"]["funnel"]["stages"]["started"], 0);
    assert_eq!(body["data"]["funnel"]["steps"][0]["percent_of_started"], 0.0);
}

#[tokio::test]
async fn test_inverted_range_is_rejected() {
    let (state, app) = setup().await;
    let cookie = session_for(&state, &app, "admin@a.com", Role::Admin, Some(TENANT_A)).await;

    let (status, body) = send(
        &app,
        get_request(
            &format!("/api/tenants/{TENANT_A}/overview?date_from=2026-03-07&date_to=2026-03-01"),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "date_from");
}

#[tokio::test]
async fn test_cross_tenant_access_is_forbidden() {
    let (state, app) = setup().await;
    seed_reference_sessions(&state).await;
    let cookie = session_for(&state, &app, "staff@a.com", Role::Staff, Some(TENANT_A)).await;

    for path in ["overview", "sessions", "wishlist", "wishlist/stats", "metrics/daily"] {
        let (status, body) = send(
            &app,
            get_request(&format!("/api/tenants/{TENANT_B}/{path}"), Some(&cookie)),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{path}");
        assert_eq!(body["error"]["code"], "forbidden");
    }
}

#[tokio::test]
async fn test_malformed_and_unknown_tenant_ids() {
    let (state, app) = setup().await;
    let cookie = session_for(&state, &app, "root@amica.com", Role::SuperAdmin, None).await;

    let (status, body) = send(
        &app,
        get_request("/api/tenants/not-a-uuid/overview", Some(&cookie)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "tenant_id");

    let (status, _) = send(
        &app,
        get_request(
            "/api/tenants/33333333-3333-4333-8333-333333333333/overview",
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tenant_list_is_scoped_by_role() {
    let (state, app) = setup().await;
    let root = session_for(&state, &app, "root@amica.com", Role::SuperAdmin, None).await;
    let admin = session_for(&state, &app, "admin@a.com", Role::Admin, Some(TENANT_A)).await;

    let (_, body) = send(&app, get_request("/api/tenants", Some(&root))).await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));

    let (_, body) = send(&app, get_request("/api/tenants", Some(&admin))).await;
    let tenants = body["data"].as_array().expect("array");
    assert_eq!(tenants.len(), 1);
    assert_eq!(tenants[0]["id"], TENANT_A);
}

#[tokio::test]
async fn test_session_list_and_history_stay_in_tenant() {
    let (state, app) = setup().await;
    seed_reference_sessions(&state).await;
    {
        let conn = state.db.conn_for_test().await;
        conn.execute(
            "INSERT INTO session_messages (session_id, role, message) VALUES ('b1', 'user', 'secret')",
            [],
        )
        .expect("insert message");
    }
    let cookie = session_for(&state, &app, "staff@a.com", Role::Staff, Some(TENANT_A)).await;

    let (status, body) = send(
        &app,
        get_request(
            &format!("/api/tenants/{TENANT_A}/sessions?limit=2&status=all"),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["total"], 4);
    assert_eq!(body["pagination"]["has_more"], true);
    let sessions = body["data"].as_array().expect("array");
    assert_eq!(sessions.len(), 2);
    assert!(sessions.iter().all(|s| s["tenant_id"] == TENANT_A));
    assert_eq!(sessions[0]["status_tone"], "neutral");

    let (status, _) = send(
        &app,
        get_request(
            &format!("/api/tenants/{TENANT_A}/sessions/b1/messages"),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_daily_metrics_endpoint_lists_snapshots() {
    let (state, app) = setup().await;
    insert_session(state.db.as_ref(), TENANT_A, "d1", "2026-03-02 09:00:00", "done", "{}", Some("b"), Some(60.0)).await;
    let day = chrono::NaiveDate::from_ymd_opt(2026, 3, 2).expect("date");
    amica_server::scheduler::metrics::collect_daily_metrics(state.db.as_ref(), day)
        .await
        .expect("collect");
    let cookie = session_for(&state, &app, "staff@a.com", Role::Staff, Some(TENANT_A)).await;

    let (status, body) = send(
        &app,
        get_request(
            &format!("/api/tenants/{TENANT_A}/metrics/daily?date_from=2026-03-01&date_to=2026-03-07"),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rows = body["data"].as_array().expect("array");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["day"], "2026-03-02");
    assert_eq!(rows[0]["total_bookings"], 1);
    assert_eq!(rows[0]["revenue"], 60.0);
}

#[tokio::test]
async fn test_health_reports_ok() {
    let (_state, app) = setup().await;
    let (status, body) = send(&app, get_request("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_extreme_offset_returns_empty_page() {
    let (state, app) = setup().await;
    seed_reference_sessions(&state).await;
    insert_wishlist(state.db.as_ref(), TENANT_A, "pending", None).await;
    let cookie = session_for(&state, &app, "admin@a.com", Role::Admin, Some(TENANT_A)).await;

    for path in ["sessions", "wishlist"] {
        let (status, body) = send(
            &app,
            get_request(
                &format!("/api/tenants/{TENANT_A}/{path}?offset={}", i64::MAX),
                Some(&cookie),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{path}");
        assert_eq!(body["data"].as_array().map(Vec::len), Some(0), "{path}");
        assert_eq!(body["pagination"]["has_more"], false, "{path}");
    }
}

#[tokio::test]
async fn test_single_day_metrics_snapshot() {
    let (state, app) = setup().await;
    insert_session(state.db.as_ref(), TENANT_A, "d1", "2026-03-02 09:00:00", "done", "{}", Some("b"), Some(80.0)).await;
    insert_session(state.db.as_ref(), TENANT_A, "d2", "2026-03-02 15:00:00", "abandoned", "{}", None, None).await;
    let day = chrono::NaiveDate::from_ymd_opt(2026, 3, 2).expect("date");
    amica_server::scheduler::metrics::collect_daily_metrics(state.db.as_ref(), day)
        .await
        .expect("collect");
    let cookie = session_for(&state, &app, "staff@a.com", Role::Staff, Some(TENANT_A)).await;
    let base = format!("/api/tenants/{TENANT_A}/metrics/daily");

    let (status, body) = send(&app, get_request(&format!("{base}/2026-03-02"), Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["day"], "2026-03-02");
    assert_eq!(body["data"]["total_sessions"], 2);
    assert_eq!(body["data"]["conversion_rate"], 50.0);

    let (status, _) = send(&app, get_request(&format!("{base}/2026-03-03"), Some(&cookie))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, get_request(&format!("{base}/yesterday"), Some(&cookie))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "day");

    let (status, _) = send(
        &app,
        get_request(
            &format!("/api/tenants/{TENANT_B}/metrics/daily/2026-03-02"),
            Some(&cookie),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
