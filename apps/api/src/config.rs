use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::provider::FetchPolicy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl StoreBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "pg" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => bail!("STORE must be 'postgres' or 'memory', got '{other}'"),
        }
    }
}

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreBackend,
    /// Required for the Postgres backend only.
    pub database_url: Option<String>,
    pub port: u16,
    pub rust_log: String,
    /// Where the page fetches the aggregate from.
    pub resume_api_url: String,
    pub fetch_policy: FetchPolicy,
    pub pdf_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let store = StoreBackend::parse(&optional_env("STORE").unwrap_or_else(|| "postgres".into()))?;
        let database_url = match store {
            StoreBackend::Postgres => Some(require_env("DATABASE_URL")?),
            StoreBackend::Memory => optional_env("DATABASE_URL"),
        };
        let port = parse_env("PORT", 8080u16).context("PORT must be a valid port number")?;

        let defaults = FetchPolicy::default();
        let fetch_policy = FetchPolicy {
            timeout: Duration::from_millis(
                parse_env("FETCH_TIMEOUT_MS", defaults.timeout.as_millis() as u64)
                    .context("FETCH_TIMEOUT_MS must be a number of milliseconds")?,
            ),
            max_retries: parse_env("FETCH_MAX_RETRIES", defaults.max_retries)
                .context("FETCH_MAX_RETRIES must be a non-negative integer")?,
            retry_backoff: defaults.retry_backoff,
        };

        Ok(Config {
            store,
            database_url,
            port,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            resume_api_url: optional_env("RESUME_API_URL")
                .unwrap_or_else(|| format!("http://127.0.0.1:{port}/api/resume")),
            fetch_policy,
            pdf_dir: optional_env("PDF_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("./public")),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => Ok(raw.trim().parse::<T>()?),
        None => Ok(default),
    }
}
