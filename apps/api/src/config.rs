use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::analysis::estimator::DEFAULT_LATENCY;

/// File name of the stats database inside `stats_dir`.
const STATS_DB_FILE: &str = "stats.db";

/// Where the stats record lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsBackend {
    /// SQLite database file under `stats_dir`.
    Sqlite,
    /// Process memory only; counters reset on restart.
    Memory,
}

impl FromStr for StatsBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StatsBackend::Sqlite),
            "memory" => Ok(StatsBackend::Memory),
            other => anyhow::bail!("unknown stats backend '{other}' (expected 'sqlite' or 'memory')"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub stats_backend: StatsBackend,
    /// Directory holding the stats database file.
    pub stats_dir: PathBuf,
    /// Simulated analysis turnaround.
    pub analysis_delay: Duration,
    /// Random score jitter; off means a fixed zero adjustment.
    pub score_jitter: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            stats_backend: std::env::var("STATS_BACKEND")
                .ok()
                .map(|raw| raw.parse::<StatsBackend>())
                .transpose()
                .context("Environment variable 'STATS_BACKEND' is invalid")?
                .unwrap_or(StatsBackend::Sqlite),
            stats_dir: std::env::var("STATS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data")),
            analysis_delay: Duration::from_millis(env_or(
                "ANALYSIS_DELAY_MS",
                DEFAULT_LATENCY.as_millis() as u64,
            )?),
            score_jitter: env_or("SCORE_JITTER", true)?,
        })
    }

    pub fn stats_db_path(&self) -> PathBuf {
        self.stats_dir.join(STATS_DB_FILE)
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.trim()
        .parse::<T>()
        .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'"))
}
