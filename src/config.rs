//! Application configuration management.
//!
//! This module handles loading and saving the client configuration: the API
//! base URL, request timeout, retry policy, and watchdog tuning.
//!
//! Configuration is stored at `~/.config/stashbook/config.json`. The API base
//! can also be overridden with the `STASHBOOK_API_BASE` environment variable
//! (including via a `.env` file).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Application name used for config/session directory paths
const APP_NAME: &str = "stashbook";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Default API base when nothing is configured
const DEFAULT_API_BASE: &str = "http://localhost:8080";

/// Environment variable overriding the API base
const API_BASE_ENV: &str = "STASHBOOK_API_BASE";

/// How activity signals reach the idle watchdog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ActivityTrigger {
    /// The API client pulses the signal after each completed authenticated
    /// request. Idle means "no API traffic", decoupled from raw input.
    #[default]
    ApiActivity,
    /// The embedding UI pulses the signal from its own input handling
    /// (pointer, key, scroll). Idle means "no user interaction".
    Interaction,
}

/// Retry policy for the API client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RetryConfig {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// First backoff delay; doubles on each retry.
    pub initial_backoff_ms: u64,
    /// Backoff cap.
    pub max_backoff_ms: u64,
    /// Whether a 401 response may be retried. Observed client behavior was
    /// inconsistent here; the safe default is to never retry auth failures.
    pub retry_unauthorized: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff_ms: 500,
            max_backoff_ms: 10_000,
            retry_unauthorized: false,
        }
    }
}

impl RetryConfig {
    pub fn initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms)
    }

    pub fn max_backoff(&self) -> Duration {
        Duration::from_millis(self.max_backoff_ms)
    }
}

/// Idle watchdog tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WatchdogConfig {
    /// Inactivity window after which the session is forcibly ended.
    pub idle_timeout_minutes: u64,
    /// How long before the idle deadline the refresh check fires.
    pub refresh_margin_minutes: u64,
    /// Which signals qualify as activity.
    pub trigger: ActivityTrigger,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            idle_timeout_minutes: 180,
            refresh_margin_minutes: 10,
            trigger: ActivityTrigger::default(),
        }
    }
}

impl WatchdogConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_minutes * 60)
    }

    /// Refresh-check deadline, measured from the same instant as the idle
    /// deadline. Saturates at zero for degenerate configurations where the
    /// margin exceeds the timeout.
    pub fn refresh_deadline(&self) -> Duration {
        let minutes = self
            .idle_timeout_minutes
            .saturating_sub(self.refresh_margin_minutes);
        Duration::from_secs(minutes * 60)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// REST API base URL, no trailing slash.
    pub api_base: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    pub retry: RetryConfig,
    pub watchdog: WatchdogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout_secs: 10,
            retry: RetryConfig::default(),
            watchdog: WatchdogConfig::default(),
        }
    }
}

impl Config {
    /// Load config from disk, applying environment overrides.
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        // Load .env file if present (silently ignore if not found)
        let _ = dotenvy::dotenv();

        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            Self::default()
        };

        if let Ok(base) = std::env::var(API_BASE_ENV) {
            if !base.is_empty() {
                config.api_base = base;
            }
        }
        config.api_base = config.api_base.trim_end_matches('/').to_string();

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory where the persisted session token lives.
    pub fn session_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
