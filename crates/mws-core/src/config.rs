use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Seller credentials (optional section in config.toml).
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    /// `AWSAccessKeyId` sent with every request.
    pub access_key: String,
    /// Secret used to sign requests. Never logged.
    pub secret_key: String,
    pub seller_id: String,
    pub marketplace_id: String,
    /// `MWSAuthToken` when calling on behalf of another seller.
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("seller_id", &self.seller_id)
            .field("marketplace_id", &self.marketplace_id)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Backoff table in seconds; the attempt counter cycles through it.
    #[serde(default = "default_schedule_secs")]
    pub schedule_secs: Vec<u64>,
    /// Retries allowed per call before giving up.
    #[serde(default = "default_max_retries")]
    pub max_retries: Option<u32>,
    /// Wall-clock budget per call in seconds.
    #[serde(default)]
    pub max_elapsed_secs: Option<u64>,
}

fn default_schedule_secs() -> Vec<u64> {
    vec![1, 4, 10, 30]
}

fn default_max_retries() -> Option<u32> {
    Some(12)
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            schedule_secs: default_schedule_secs(),
            max_retries: default_max_retries(),
            max_elapsed_secs: None,
        }
    }
}

/// Global configuration loaded from `~/.config/mws/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MwsConfig {
    /// Service endpoint, e.g. `https://mws.amazonservices.com`.
    pub endpoint: String,
    pub connect_timeout_secs: u64,
    /// Total time allowed for one request, including the body.
    pub request_timeout_secs: u64,
    /// Required to build a client; absent in a freshly created file.
    pub credentials: Option<Credentials>,
    /// Optional retry policy; if missing, built-in defaults are used.
    pub retry: Option<RetryConfig>,
}

impl Default for MwsConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://mws.amazonservices.com".to_string(),
            connect_timeout_secs: 15,
            request_timeout_secs: 60,
            credentials: None,
            retry: None,
        }
    }
}

impl MwsConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("mws")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<MwsConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = MwsConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<MwsConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: MwsConfig = toml::from_str(&data)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
