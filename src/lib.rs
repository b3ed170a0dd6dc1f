use anyhow::Result;

pub mod ai;
pub mod api;
mod config;
pub mod db;
mod handlers;
pub mod json_utils;
pub mod models;
pub mod sustainability;
pub mod swap;
#[doc(hidden)]
pub mod tests;
mod text_utils;

pub use api::{router as api_router, ApiConfig, AppState};
pub use config::Config;
pub use text_utils::{display_value, format_amount, single_line};

// ──────────────────────────────────────────────────────────────
// Main application setup
// ──────────────────────────────────────────────────────────────

pub async fn run() -> Result<()> {
    let config = Config::from_env();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting BarterBrain API...");

    match &config.ai {
        Some(ai) => tracing::info!(model = %ai.model, "Gemini configured"),
        None => tracing::warn!("GEMINI_API_KEY not set; model calls will fail and fall back"),
    }

    // --- SQLite Pool ---
    let db_url = db::prepare_sqlite_url(&config.db_url);
    tracing::info!("Connecting to database at: {}", &db_url);
    let pool = db::connect_db(&db_url, 5).await?;
    tracing::info!("Database connection successful.");

    // --- Run Migrations ---
    db::migrate(&pool).await?;

    let state = AppState {
        db: db::Database::new(pool),
        gemini: ai::common::GeminiClient::new(config.ai.clone()),
    };
    let app = api::router(
        state,
        ApiConfig {
            rate_limit_per_second: config.rate_limit_per_second,
        },
    );

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
