use anyhow::{Context, Result, bail};
use log::debug;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
/// Overrides `api_url` from the config file.
pub const API_URL_ENV: &str = "AIOPS_API_URL";
/// Config file location used when no path is given explicitly.
pub const CONFIG_PATH_ENV: &str = "AIOPS_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub api_url: String,
    pub poll_interval_secs: u64,
    pub request_timeout_ms: u64,
    /// Substitute synthetic data when a read endpoint fails.
    pub fallback: bool,
    pub history_rows: usize,
    pub decision_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            poll_interval_secs: 10,
            request_timeout_ms: 5_000,
            fallback: true,
            history_rows: 8,
            decision_rows: 6,
        }
    }
}

impl DashboardConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse dashboard config")
    }

    /// Load from `path`, falling back to `$AIOPS_CONFIG`, then to defaults.
    /// `$AIOPS_API_URL` is applied on top of whatever was loaded.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from));

        let cfg = match path {
            Some(path) => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config {}", path.display()))?;
                debug!("[config] loaded {}", path.display());
                Self::from_toml_str(&content)?
            }
            None => Self::default(),
        };

        Ok(cfg.with_api_url_override(std::env::var(API_URL_ENV).ok()))
    }

    /// Replace `api_url` when `url` is set and non-blank.
    pub fn with_api_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url
            && !url.trim().is_empty()
        {
            self.api_url = url.trim().to_string();
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            bail!("poll_interval_secs must be at least 1");
        }
        if self.request_timeout_ms == 0 {
            bail!("request_timeout_ms must be at least 1");
        }
        parse_base_url(&self.api_url).with_context(|| format!("invalid api_url {}", self.api_url))?;
        Ok(())
    }

    /// Base URL without trailing slashes; endpoint paths are appended to it.
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Parse a backend base URL. Only absolute `http`/`https` URLs with a host
/// are accepted; `localhost:8000` parses with `localhost` as its scheme.
pub fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("unsupported scheme '{}', expected http or https", url.scheme());
    }
    if url.host_str().is_none() {
        bail!("missing host");
    }
    Ok(url)
}
