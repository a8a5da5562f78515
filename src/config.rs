// src/config.rs

use std::{
    path::PathBuf,
    time::{Duration, SystemTime, UNIX_EPOCH},
};
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_ENDPOINT: &str = "https://query.wikidata.org/sparql";
pub const DEFAULT_OUTPUT: &str = "data/candidates.csv";
pub const DEFAULT_USER_AGENT: &str = "CopyClear-SPARQL/0.1 (candidate sampler)";

/// Everything a run needs, captured once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub limit: u32,
    pub user_agent: String,
    pub keep_newlines: bool,
    pub pause_after_fetch: Duration,
    pub endpoint: Url,
    pub output_path: PathBuf,
    pub retry: RetryPolicy,
    pub sample_seed: u64,
}

/// Linear backoff: the wait after attempt `n` is `backoff_base * n`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_base: Duration,
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            backoff_base: Duration::from_secs(2),
            timeout: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff_base
            .checked_mul(attempt)
            .unwrap_or(Duration::MAX)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            limit: 200,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            keep_newlines: false,
            pause_after_fetch: Duration::ZERO,
            // constant, always parses
            endpoint: Url::parse(DEFAULT_ENDPOINT).expect("default endpoint is a valid URL"),
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            retry: RetryPolicy::default(),
            sample_seed: 0,
        }
    }
}

impl Config {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key → value lookup; unset keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut cfg = Self::default();

        if let Some(v) = get("LIMIT") {
            cfg.limit = v
                .parse::<u32>()
                .map_err(|e| ConfigError::invalid("LIMIT", &v, e))?;
            if cfg.limit == 0 {
                return Err(ConfigError::invalid("LIMIT", &v, "must be greater than zero"));
            }
        }
        if let Some(v) = get("USER_AGENT") {
            cfg.user_agent = v;
        }
        if let Some(v) = get("KEEP_NEWLINES") {
            cfg.keep_newlines = parse_flag("KEEP_NEWLINES", &v)?;
        }
        if let Some(v) = get("SLEEP_AFTER") {
            cfg.pause_after_fetch = parse_secs("SLEEP_AFTER", &v)?;
        }
        if let Some(v) = get("SPARQL_ENDPOINT") {
            cfg.endpoint = Url::parse(&v).map_err(|e| ConfigError::invalid("SPARQL_ENDPOINT", &v, e))?;
        }
        if let Some(v) = get("OUTPUT_PATH") {
            cfg.output_path = PathBuf::from(v);
        }
        if let Some(v) = get("MAX_RETRIES") {
            cfg.retry.max_attempts = v
                .parse::<u32>()
                .map_err(|e| ConfigError::invalid("MAX_RETRIES", &v, e))?;
            if cfg.retry.max_attempts == 0 {
                return Err(ConfigError::invalid("MAX_RETRIES", &v, "must be at least 1"));
            }
        }
        if let Some(v) = get("BACKOFF_SECS") {
            cfg.retry.backoff_base = parse_secs("BACKOFF_SECS", &v)?;
        }
        if let Some(v) = get("TIMEOUT_SECS") {
            cfg.retry.timeout = parse_secs("TIMEOUT_SECS", &v)?;
            if cfg.retry.timeout.is_zero() {
                return Err(ConfigError::invalid("TIMEOUT_SECS", &v, "must be positive"));
            }
        }
        cfg.sample_seed = match get("SAMPLE_SEED") {
            Some(v) => v
                .parse::<u64>()
                .map_err(|e| ConfigError::invalid("SAMPLE_SEED", &v, e))?,
            None => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default(),
        };

        Ok(cfg)
    }
}

fn parse_flag(var: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::invalid(var, raw, "expected a boolean flag")),
    }
}

fn parse_secs(var: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    let secs = raw
        .parse::<f64>()
        .map_err(|e| ConfigError::invalid(var, raw, e))?;
    Duration::try_from_secs_f64(secs).map_err(|e| ConfigError::invalid(var, raw, e))
}
