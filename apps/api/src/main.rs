mod analysis;
mod config;
mod errors;
mod routes;
mod state;
mod stats;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::estimator::{
    FixedJitter, JitterSource, MockAtsScorer, RandomJitter, ScoreEstimator,
};
use crate::config::{Config, StatsBackend};
use crate::routes::build_router;
use crate::state::AppState;
use crate::stats::aggregator::StatsAggregator;
use crate::stats::store::{KeyValueStore, MemoryStore, SqliteStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ATS Check API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize stats store
    let store: Arc<dyn KeyValueStore> = match config.stats_backend {
        StatsBackend::Sqlite => Arc::new(SqliteStore::open(&config.stats_db_path())?),
        StatsBackend::Memory => {
            info!("Stats store in memory; counters reset on restart");
            Arc::new(MemoryStore::new())
        }
    };
    let stats = Arc::new(StatsAggregator::new(store));
    info!("{} resumes analyzed so far", stats.query().resumes_analyzed);

    // Initialize scorer
    let jitter: Arc<dyn JitterSource> = if config.score_jitter {
        Arc::new(RandomJitter)
    } else {
        Arc::new(FixedJitter(0))
    };
    let scorer = Arc::new(MockAtsScorer::new(
        ScoreEstimator::new(jitter),
        config.analysis_delay,
    ));
    info!(
        "Mock ATS scorer initialized (delay: {:?}, jitter: {})",
        config.analysis_delay, config.score_jitter
    );

    let state = AppState { scorer, stats };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
