use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{auth, routes, state::AppState};

/// Construct the Axum [`Router`] with all routes and middleware attached.
///
/// Everything under `/api` except login and logout runs behind
/// [`auth::middleware::require_auth`], which resolves the session into a
/// `Principal`. Tenant-level checks happen per handler.
pub fn build_app(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/api/auth/session", get(auth::handlers::auth_session))
        .route("/api/tenants", get(routes::tenants::list_tenants))
        .route(
            "/api/tenants/{tenant_id}/overview",
            get(routes::tenants::overview),
        )
        .route(
            "/api/tenants/{tenant_id}/sessions",
            get(routes::sessions::list_sessions),
        )
        .route(
            "/api/tenants/{tenant_id}/sessions/{session_id}/messages",
            get(routes::sessions::session_messages),
        )
        .route(
            "/api/tenants/{tenant_id}/wishlist",
            get(routes::wishlist::list_wishlist),
        )
        .route(
            "/api/tenants/{tenant_id}/wishlist/stats",
            get(routes::wishlist::wishlist_stats),
        )
        .route(
            "/api/tenants/{tenant_id}/wishlist/{item_id}",
            patch(routes::wishlist::update_wishlist_item)
                .delete(routes::wishlist::delete_wishlist_item),
        )
        .route(
            "/api/tenants/{tenant_id}/settings",
            get(routes::settings::get_settings).put(routes::settings::update_settings),
        )
        .route(
            "/api/tenants/{tenant_id}/metrics/daily",
            get(routes::metrics::daily_metrics),
        )
        .route(
            "/api/tenants/{tenant_id}/metrics/daily/{day}",
            get(routes::metrics::daily_metrics_for_day),
        )
        .route(
            "/api/users",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/api/users/{id}",
            axum::routing::delete(routes::users::delete_user),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/auth/login", post(auth::handlers::auth_login))
        .route("/api/auth/logout", post(auth::handlers::auth_logout))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
