// SYNOID Chroma — Service Configuration
// Copyright (c) 2026 Xing_The_Creator | SYNOID
//
// Everything comes from the environment (a `.env` file is loaded first by
// main). CLI flags may override individual fields afterwards.

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::emotion::client::RetryPolicy;
use crate::emotion::NormalizationStrategy;

pub const DEFAULT_API_URL: &str =
    "https://nobv4nvnk5nb9v9x.us-east-1.aws.endpoints.huggingface.cloud";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &[
    "http://localhost",
    "http://localhost:8080",
    "https://benjaminrongey.github.io",
];

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub api_url: String,
    /// Never logged.
    pub api_key: Option<String>,
    pub normalization: NormalizationStrategy,
    pub cdf_table: Option<PathBuf>,
    pub retry: RetryPolicy,
    pub allowed_origins: Vec<String>,
    pub port: u16,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let normalization = match get("CHROMA_NORMALIZATION") {
            Some(raw) => NormalizationStrategy::from_str(&raw)
                .map_err(anyhow::Error::msg)
                .context("Invalid CHROMA_NORMALIZATION")?,
            None => NormalizationStrategy::Linear,
        };

        let defaults = RetryPolicy::default();
        let max_attempts = parse_or(&get, "CHROMA_MAX_ATTEMPTS", defaults.max_attempts)?;
        if max_attempts == 0 {
            bail!("CHROMA_MAX_ATTEMPTS must be at least 1");
        }

        let retry = RetryPolicy {
            max_attempts,
            retry_delay: Duration::from_secs(parse_or(
                &get,
                "CHROMA_RETRY_DELAY_SECS",
                defaults.retry_delay.as_secs(),
            )?),
            attempt_timeout: Duration::from_secs(parse_or(
                &get,
                "CHROMA_ATTEMPT_TIMEOUT_SECS",
                defaults.attempt_timeout.as_secs(),
            )?),
            request_deadline: match get("CHROMA_REQUEST_DEADLINE_SECS") {
                Some(raw) => Some(Duration::from_secs(
                    raw.parse()
                        .with_context(|| format!("Invalid CHROMA_REQUEST_DEADLINE_SECS '{}'", raw))?,
                )),
                None => None,
            },
        };

        let allowed_origins = match get("CHROMA_ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(|o| o.trim().trim_end_matches('/').to_string())
                .filter(|o| !o.is_empty())
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        Ok(Self {
            api_url: get("HUGGING_FACE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            api_key: get("HUGGING_FACE_API_KEY"),
            normalization,
            cdf_table: get("CHROMA_CDF_TABLE").map(PathBuf::from),
            retry,
            allowed_origins,
            port: parse_or(&get, "CHROMA_PORT", DEFAULT_PORT)?,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("Invalid {} '{}'", key, raw)),
        None => Ok(default),
    }
}
