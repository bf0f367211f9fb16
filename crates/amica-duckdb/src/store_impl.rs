use async_trait::async_trait;
use chrono::NaiveDate;

use amica_core::kpi::DailyMetrics;
use amica_core::range::DateRange;
use amica_core::session::{
    ConversationSession, FunnelRow, HistoryMessage, SessionCounts, SessionFilter,
};
use amica_core::store::{MetricsStore, SessionStore, TenantStore, UserStore, WishlistStore};
use amica_core::tenant::{Tenant, TenantSummary};
use amica_core::user::{NewUserRecord, User, UserRecord};
use amica_core::wishlist::{StatusChange, WishlistItem, WishlistRow, WishlistStatus};

use crate::queries::{metrics, sessions, wishlist};
use crate::DuckDbBackend;

#[async_trait]
impl SessionStore for DuckDbBackend {
    async fn fetch_funnel_rows(
        &self,
        tenant_id: &str,
        range: &DateRange,
    ) -> anyhow::Result<Vec<FunnelRow>> {
        sessions::fetch_funnel_rows_inner(self, tenant_id, range).await
    }

    async fn fetch_session_counts(
        &self,
        tenant_id: &str,
        range: &DateRange,
    ) -> anyhow::Result<SessionCounts> {
        sessions::fetch_session_counts_inner(self, tenant_id, range).await
    }

    async fn list_sessions(
        &self,
        tenant_id: &str,
        filter: &SessionFilter,
    ) -> anyhow::Result<(Vec<ConversationSession>, i64)> {
        sessions::list_sessions_inner(self, tenant_id, filter).await
    }

    async fn session_history(
        &self,
        tenant_id: &str,
        session_id: &str,
    ) -> anyhow::Result<Option<Vec<HistoryMessage>>> {
        sessions::session_history_inner(self, tenant_id, session_id).await
    }
}

#[async_trait]
impl WishlistStore for DuckDbBackend {
    async fn fetch_wishlist_rows(&self, tenant_id: &str) -> anyhow::Result<Vec<WishlistRow>> {
        wishlist::fetch_wishlist_rows_inner(self, tenant_id).await
    }

    async fn list_wishlist_items(
        &self,
        tenant_id: &str,
        status: Option<WishlistStatus>,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<(Vec<WishlistItem>, i64)> {
        wishlist::list_wishlist_items_inner(self, tenant_id, status, limit, offset).await
    }

    async fn update_wishlist_item(
        &self,
        item_id: i64,
        tenant_id: &str,
        change: &StatusChange,
    ) -> anyhow::Result<bool> {
        wishlist::update_wishlist_item_inner(self, item_id, tenant_id, change).await
    }

    async fn delete_wishlist_item(&self, item_id: i64, tenant_id: &str) -> anyhow::Result<bool> {
        wishlist::delete_wishlist_item_inner(self, item_id, tenant_id).await
    }
}

#[async_trait]
impl UserStore for DuckDbBackend {
    async fn lookup_user_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>> {
        DuckDbBackend::lookup_user_by_email(self, email).await
    }

    async fn get_user_by_id(&self, user_id: i64) -> anyhow::Result<Option<User>> {
        DuckDbBackend::get_user_by_id(self, user_id).await
    }

    async fn list_users(&self) -> anyhow::Result<Vec<User>> {
        DuckDbBackend::list_users(self).await
    }

    async fn create_user(&self, user: NewUserRecord) -> anyhow::Result<Option<User>> {
        DuckDbBackend::create_user(self, user).await
    }

    async fn delete_user(&self, user_id: i64) -> anyhow::Result<bool> {
        DuckDbBackend::delete_user(self, user_id).await
    }

    async fn count_users(&self) -> anyhow::Result<i64> {
        DuckDbBackend::count_users(self).await
    }
}

#[async_trait]
impl TenantStore for DuckDbBackend {
    async fn list_tenants(&self) -> anyhow::Result<Vec<TenantSummary>> {
        DuckDbBackend::list_tenants(self).await
    }

    async fn get_tenant(&self, tenant_id: &str) -> anyhow::Result<Option<Tenant>> {
        DuckDbBackend::get_tenant(self, tenant_id).await
    }

    async fn update_tenant_metadata(
        &self,
        tenant_id: &str,
        metadata: &serde_json::Value,
    ) -> anyhow::Result<bool> {
        DuckDbBackend::update_tenant_metadata(self, tenant_id, metadata).await
    }
}

#[async_trait]
impl MetricsStore for DuckDbBackend {
    async fn upsert_daily_metrics(&self, metrics: &DailyMetrics) -> anyhow::Result<()> {
        metrics::upsert_daily_metrics_inner(self, metrics).await
    }

    async fn list_daily_metrics(
        &self,
        tenant_id: &str,
        range: &DateRange,
    ) -> anyhow::Result<Vec<DailyMetrics>> {
        metrics::list_daily_metrics_inner(self, tenant_id, range).await
    }

    async fn get_daily_metrics(
        &self,
        tenant_id: &str,
        day: NaiveDate,
    ) -> anyhow::Result<Option<DailyMetrics>> {
        metrics::get_daily_metrics_inner(self, tenant_id, day).await
    }
}
