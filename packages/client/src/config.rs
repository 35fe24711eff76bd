use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

pub const DEFAULT_LOG_FILTER: &str = "info,jobjet_client=debug,viewstate=info";

/// Client configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// `tracing_subscriber::EnvFilter` directives, overridden by `RUST_LOG`.
    pub log_filter: String,
    /// Populate the in-memory store with demo accounts, jobs, and a chat.
    pub seed_demo: bool,
    pub email: String,
    pub password: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            log_filter: lookup("JOBJET_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            seed_demo: lookup("JOBJET_SEED_DEMO")
                .map(|value| parse_flag(&value))
                .transpose()
                .context("JOBJET_SEED_DEMO must be true or false")?
                .unwrap_or(true),
            email: lookup("JOBJET_EMAIL").unwrap_or_else(|| "sam@jobjet.dev".to_string()),
            password: lookup("JOBJET_PASSWORD").unwrap_or_else(|| "password123".to_string()),
        })
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("invalid flag value: {}", other),
    }
}
