use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::backoff::BackoffPolicy;

const DEFAULT_COMPLETION_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_COMPLETION_MODEL: &str = "gemini-1.5-flash-latest";
const DEFAULT_IMAGE_SEARCH_URL: &str = "https://api.unsplash.com/search/photos";

/// Application configuration loaded from environment variables.
/// Every component receives what it needs from here at construction time.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub completion_base_url: String,
    pub completion_model: String,
    /// None when image search is not configured; placeholders are used instead.
    pub unsplash_access_key: Option<String>,
    pub image_search_url: String,
    pub image_cache_dir: PathBuf,
    /// Per-attempt timeout for outbound calls.
    pub request_timeout: Duration,
    pub backoff: BackoffPolicy,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gemini_api_key = lookup("GEMINI_API_KEY")
            .filter(|v| !v.trim().is_empty())
            .context("Required environment variable 'GEMINI_API_KEY' is not set")?;

        let backoff = BackoffPolicy::new(
            parse_or(&lookup, "BACKOFF_MAX_ATTEMPTS", 5u32)?,
            Duration::from_millis(parse_or(&lookup, "BACKOFF_BASE_DELAY_MS", 1000u64)?),
            parse_or(&lookup, "BACKOFF_MULTIPLIER", 2u32)?,
        )
        .context("Invalid backoff policy")?
        .with_retry_client_errors(parse_or(&lookup, "BACKOFF_RETRY_CLIENT_ERRORS", true)?);

        Ok(Config {
            gemini_api_key,
            completion_base_url: lookup("COMPLETION_BASE_URL")
                .unwrap_or_else(|| DEFAULT_COMPLETION_BASE_URL.to_string()),
            completion_model: lookup("COMPLETION_MODEL")
                .unwrap_or_else(|| DEFAULT_COMPLETION_MODEL.to_string()),
            unsplash_access_key: lookup("UNSPLASH_ACCESS_KEY").filter(|k| is_real_key(k)),
            image_search_url: lookup("IMAGE_SEARCH_URL")
                .unwrap_or_else(|| DEFAULT_IMAGE_SEARCH_URL.to_string()),
            image_cache_dir: lookup("IMAGE_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("images")),
            request_timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 300u64)?),
            backoff,
            port: parse_or(&lookup, "PORT", 5001u16).context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}

/// Rejects empty values and the `YOUR_..._HERE` placeholders shipped in sample env files.
fn is_real_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && !(key.starts_with("YOUR_") && key.ends_with("_HERE"))
}
