//! Storage abstraction for everything the dashboard reads and writes.
//!
//! Each trait covers one table family so callers (and test doubles) only
//! depend on what they use. Every tenant-scoped method filters by exactly one
//! `tenant_id`.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::kpi::DailyMetrics;
use crate::range::DateRange;
use crate::session::{ConversationSession, FunnelRow, HistoryMessage, SessionCounts, SessionFilter};
use crate::tenant::{Tenant, TenantSummary};
use crate::user::{NewUserRecord, User, UserRecord};
use crate::wishlist::{StatusChange, WishlistItem, WishlistRow, WishlistStatus};

#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// `(meta, final_status)` of every session started in `range`.
    async fn fetch_funnel_rows(
        &self,
        tenant_id: &str,
        range: &DateRange,
    ) -> anyhow::Result<Vec<FunnelRow>>;

    /// Total session count plus the amounts of booked sessions in `range`.
    async fn fetch_session_counts(
        &self,
        tenant_id: &str,
        range: &DateRange,
    ) -> anyhow::Result<SessionCounts>;

    /// Newest-first page of sessions and the total matching the filter.
    async fn list_sessions(
        &self,
        tenant_id: &str,
        filter: &SessionFilter,
    ) -> anyhow::Result<(Vec<ConversationSession>, i64)>;

    /// Chat history of a session, oldest first. `None` when the session does
    /// not belong to `tenant_id`.
    async fn session_history(
        &self,
        tenant_id: &str,
        session_id: &str,
    ) -> anyhow::Result<Option<Vec<HistoryMessage>>>;
}

#[async_trait]
pub trait WishlistStore: Send + Sync + 'static {
    async fn fetch_wishlist_rows(&self, tenant_id: &str) -> anyhow::Result<Vec<WishlistRow>>;

    async fn list_wishlist_items(
        &self,
        tenant_id: &str,
        status: Option<WishlistStatus>,
        limit: i64,
        offset: i64,
    ) -> anyhow::Result<(Vec<WishlistItem>, i64)>;

    /// Apply a validated status change. Returns `false` when no item with
    /// `item_id` exists under `tenant_id`.
    async fn update_wishlist_item(
        &self,
        item_id: i64,
        tenant_id: &str,
        change: &StatusChange,
    ) -> anyhow::Result<bool>;

    async fn delete_wishlist_item(&self, item_id: i64, tenant_id: &str) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait UserStore: Send + Sync + 'static {
    /// Exact match on an already-normalized email.
    async fn lookup_user_by_email(&self, email: &str) -> anyhow::Result<Option<UserRecord>>;
    async fn get_user_by_id(&self, user_id: i64) -> anyhow::Result<Option<User>>;
    async fn list_users(&self) -> anyhow::Result<Vec<User>>;
    /// Returns `Ok(None)` when the email is already taken.
    async fn create_user(&self, user: NewUserRecord) -> anyhow::Result<Option<User>>;
    async fn delete_user(&self, user_id: i64) -> anyhow::Result<bool>;
    async fn count_users(&self) -> anyhow::Result<i64>;
}

#[async_trait]
pub trait TenantStore: Send + Sync + 'static {
    async fn list_tenants(&self) -> anyhow::Result<Vec<TenantSummary>>;
    async fn get_tenant(&self, tenant_id: &str) -> anyhow::Result<Option<Tenant>>;
    async fn update_tenant_metadata(
        &self,
        tenant_id: &str,
        metadata: &serde_json::Value,
    ) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait MetricsStore: Send + Sync + 'static {
    async fn upsert_daily_metrics(&self, metrics: &DailyMetrics) -> anyhow::Result<()>;
    async fn list_daily_metrics(
        &self,
        tenant_id: &str,
        range: &DateRange,
    ) -> anyhow::Result<Vec<DailyMetrics>>;
    async fn get_daily_metrics(
        &self,
        tenant_id: &str,
        day: NaiveDate,
    ) -> anyhow::Result<Option<DailyMetrics>>;
}
