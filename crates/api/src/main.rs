use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use rollcall_core::holiday::{HolidayCalendar, StaticHolidayCalendar};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

use rollcall_api::config::ServerConfig;
use rollcall_api::router::build_app_router;
use rollcall_api::state::AppState;
use rollcall_db::DbPool;

const DEFAULT_LOG_FILTER: &str = "rollcall_api=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = config.port,
        org_utc_offset_minutes = config.org_utc_offset_minutes,
        "Configuration loaded"
    );

    let pool = connect_database().await;
    let holidays = load_holidays(config.holiday_calendar_path.as_deref());

    let ip: IpAddr = config
        .host
        .parse()
        .unwrap_or_else(|e| panic!("HOST '{}' is not an IP address: {e}", config.host));
    let addr = SocketAddr::new(ip, config.port);
    let drain_budget = Duration::from_secs(config.shutdown_timeout_secs);

    let state = AppState::new(pool.clone(), config, holidays)
        .unwrap_or_else(|e| panic!("Cannot build application state: {e}"));

    serve(addr, build_app_router(state)).await;
    close_pool(pool, drain_budget).await;
}

/// `RUST_LOG` filtering, with JSON lines when `LOG_FORMAT=json`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let (json_layer, text_layer) = if json {
        (Some(tracing_subscriber::fmt::layer().json()), None)
    } else {
        (None, Some(tracing_subscriber::fmt::layer()))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

/// Connect, ping and migrate. Any failure aborts startup.
async fn connect_database() -> DbPool {
    let url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| panic!("DATABASE_URL is required"));

    let pool = rollcall_db::create_pool(&url)
        .await
        .unwrap_or_else(|e| panic!("Cannot connect to Postgres: {e}"));
    if let Err(e) = rollcall_db::health_check(&pool).await {
        panic!("Postgres did not answer the startup ping: {e}");
    }
    if let Err(e) = rollcall_db::run_migrations(&pool).await {
        panic!("Migrations failed: {e}");
    }
    tracing::info!("Database ready");
    pool
}

/// Built-in holidays, extended by the JSON file at `path` when given.
///
/// Panics on an unreadable or malformed file.
fn load_holidays(path: Option<&str>) -> Arc<dyn HolidayCalendar> {
    let Some(path) = path else {
        return Arc::new(StaticHolidayCalendar::builtin());
    };
    let raw = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read holiday calendar '{path}': {e}"));
    let overrides = StaticHolidayCalendar::from_json(&raw)
        .unwrap_or_else(|e| panic!("Invalid holiday calendar '{path}': {e}"));
    let calendar = StaticHolidayCalendar::builtin_with(overrides);
    tracing::info!(path, years = ?calendar.years(), "Holiday calendar loaded");
    Arc::new(calendar)
}

async fn serve(addr: SocketAddr, app: axum::Router) {
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => panic!("Cannot listen on {addr}: {e}"),
    };
    tracing::info!(%addr, "Listening");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_stop())
        .await
    {
        tracing::error!(error = %e, "Server exited with an error");
    }
}

/// Give in-flight pool connections `budget` to finish.
async fn close_pool(pool: DbPool, budget: Duration) {
    tracing::info!("Draining database pool");
    match tokio::time::timeout(budget, pool.close()).await {
        Ok(()) => tracing::info!("Shutdown complete"),
        Err(_) => tracing::warn!(
            budget_secs = budget.as_secs(),
            "Database pool did not close in time"
        ),
    }
}

/// Resolves on the first of Ctrl-C or (on unix) SIGTERM.
async fn wait_for_stop() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl-C listener failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM listener failed");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    let which = tokio::select! {
        () = interrupt => "SIGINT",
        () = sigterm => "SIGTERM",
    };
    tracing::info!(signal = which, "Stopping: no new connections accepted");
}
