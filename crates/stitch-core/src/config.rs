use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Largest accepted `[retry] delay_secs` (one hour).
pub const MAX_RETRY_DELAY_SECS: f64 = 3600.0;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per segment (including the first).
    pub max_attempts: u32,
    /// Fixed delay in seconds between attempts (e.g. 1.0 = one second).
    pub delay_secs: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay_secs: 1.0,
        }
    }
}

/// Global configuration loaded from `~/.config/stitch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StitchConfig {
    /// Maximum number of segment fetches in flight at once.
    pub concurrency: usize,
    /// Interval between progress status lines, in milliseconds.
    pub progress_interval_ms: u64,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// Optional `User-Agent` override for manifest and segment requests.
    #[serde(default)]
    pub user_agent: Option<String>,
    /// Optional connect timeout per attempt (None = libcurl default).
    #[serde(default)]
    pub connect_timeout_secs: Option<u64>,
    /// Optional whole-transfer timeout per attempt (None = libcurl default).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for StitchConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            progress_interval_ms: 500,
            retry: None,
            user_agent: None,
            connect_timeout_secs: None,
            timeout_secs: None,
        }
    }
}

impl StitchConfig {
    /// Reject values that parse as TOML but cannot drive a run.
    pub fn validate(&self) -> Result<()> {
        if let Some(retry) = &self.retry {
            let d = retry.delay_secs;
            if !d.is_finite() || !(0.0..=MAX_RETRY_DELAY_SECS).contains(&d) {
                bail!(
                    "retry.delay_secs must be between 0 and {} seconds, got {}",
                    MAX_RETRY_DELAY_SECS,
                    d
                );
            }
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("stitch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<StitchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = StitchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: StitchConfig = toml::from_str(&data)?;
    cfg.validate()
        .map_err(|e| e.context(format!("invalid config {}", path.display())))?;
    Ok(cfg)
}
