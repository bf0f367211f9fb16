use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::{Duration, NaiveDate, Utc};
use tracing::info;

use amica_core::config::Config;
use amica_core::range::parse_date;
use amica_duckdb::DuckDbBackend;
use amica_server::bootstrap::ensure_bootstrap_admin;
use amica_server::scheduler;
use amica_server::state::AppState;

/// `amica health`: liveness probe for Docker HEALTHCHECK.
///
/// Calls `GET http://localhost:$AMICA_PORT/health`.
/// Exits 0 if the server responds with HTTP 200, exits 1 otherwise.
fn run_health_check() -> ! {
    let port = std::env::var("AMICA_PORT").unwrap_or_else(|_| "8080".to_string());
    let url = format!("http://localhost:{}/health", port);
    match ureq::get(&url).call() {
        Ok(resp) if resp.status() == 200 => std::process::exit(0),
        _ => std::process::exit(1),
    }
}

fn open_database(cfg: &Config) -> Result<DuckDbBackend> {
    std::fs::create_dir_all(&cfg.data_dir)?;
    let db_path = format!("{}/amica.db", cfg.data_dir);
    DuckDbBackend::open(&db_path, &cfg.duckdb_memory_limit)
}

/// `amica collect-metrics [YYYY-MM-DD]`: snapshot one day (yesterday by
/// default) and exit.
async fn run_collect_metrics(cfg: &Config, day_arg: Option<&str>) -> Result<()> {
    let day: NaiveDate = match day_arg {
        Some(raw) => parse_date(raw).ok_or_else(|| anyhow!("invalid date {raw:?}, expected YYYY-MM-DD"))?,
        None => Utc::now().date_naive() - Duration::days(1),
    };
    let db = open_database(cfg)?;
    let processed = scheduler::metrics::collect_daily_metrics(&db, day).await?;
    info!(%day, processed, "Daily metrics collected");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(|s| s.as_str()) == Some("health") {
        run_health_check();
    }

    let cfg = Config::from_env().map_err(|e| anyhow!(e))?;

    // Structured JSON logging. RUST_LOG still applies on top of the default.
    let directive = if cfg.debug { "amica=debug" } else { "amica=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(directive.parse()?),
        )
        .json()
        .init();

    if args.get(1).map(|s| s.as_str()) == Some("collect-metrics") {
        return run_collect_metrics(&cfg, args.get(2).map(|s| s.as_str())).await;
    }

    let db = open_database(&cfg)?;

    ensure_bootstrap_admin(&db, cfg.bootstrap_admin.as_ref(), cfg.argon2_memory_kb).await?;
    if cfg.app_secret.is_none() {
        info!("AMICA_APP_SECRET not set; using the secret stored in the database");
    }

    let state = Arc::new(AppState::init(db, cfg.clone()).await?);

    if cfg.metrics_collector {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            scheduler::run_metrics_loop(state).await;
        });
    }

    let addr = cfg.bind_addr();
    let app = amica_server::app::build_app(Arc::clone(&state));

    info!(port = cfg.port, https = cfg.https, "Amica dashboard listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::signal::ctrl_c().await.ok();
        })
        .await?;

    Ok(())
}
