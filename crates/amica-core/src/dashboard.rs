//! Fetch-then-aggregate entry points used by the overview and wishlist views.
//!
//! A failed fetch is logged and replaced by an all-zero result so the view
//! shows "no data" instead of an error.

use tracing::warn;

use crate::funnel::{aggregate_funnel, FunnelStages};
use crate::kpi::{summarize_kpi, KpiSummary};
use crate::range::DateRange;
use crate::store::{SessionStore, WishlistStore};
use crate::wishlist::{aggregate_wishlist, WishlistStats};

pub async fn load_funnel(store: &dyn SessionStore, tenant_id: &str, range: &DateRange) -> FunnelStages {
    match store.fetch_funnel_rows(tenant_id, range).await {
        Ok(rows) => aggregate_funnel(&rows),
        Err(e) => {
            warn!(tenant_id, error = %e, "funnel fetch failed, reporting empty funnel");
            FunnelStages::default()
        }
    }
}

pub async fn load_kpi_summary(
    store: &dyn SessionStore,
    tenant_id: &str,
    range: &DateRange,
) -> KpiSummary {
    match store.fetch_session_counts(tenant_id, range).await {
        Ok(counts) => summarize_kpi(&counts),
        Err(e) => {
            warn!(tenant_id, error = %e, "KPI fetch failed, reporting zeros");
            KpiSummary::default()
        }
    }
}

pub async fn load_wishlist_stats(store: &dyn WishlistStore, tenant_id: &str) -> WishlistStats {
    match store.fetch_wishlist_rows(tenant_id).await {
        Ok(rows) => aggregate_wishlist(&rows),
        Err(e) => {
            warn!(tenant_id, error = %e, "wishlist stats fetch failed, reporting zeros");
            WishlistStats::default()
        }
    }
}
