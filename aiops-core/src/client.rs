use crate::config::{DashboardConfig, parse_base_url};
use crate::error::ActionError;
use crate::synthetic;
use crate::types::{ActionRequest, ActionResponse, Decision, MetricSample};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, warn};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

pub const METRICS_PATH: &str = "/metrics/recent";
pub const DECISIONS_PATH: &str = "/ai/decisions";
pub const ACTION_PATH: &str = "/take-action";

/// Result of a read, tagged with where the data came from.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Live(T),
    /// The backend read failed and synthetic data was substituted.
    Fallback { data: T, reason: String },
    /// The backend read failed and fallback is disabled.
    Failed(String),
}

impl<T> FetchOutcome<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Live(data) | Self::Fallback { data, .. } => Some(data),
            Self::Failed(_) => None,
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            Self::Live(data) | Self::Fallback { data, .. } => Ok(data),
            Self::Failed(reason) => Err(reason),
        }
    }
}

#[async_trait]
pub trait MetricsClient: Send + Sync {
    /// Recent samples, newest first.
    async fn fetch_metrics(&self) -> FetchOutcome<Vec<MetricSample>>;

    /// Decisions in the order the backend returns them.
    async fn fetch_decisions(&self) -> FetchOutcome<Vec<Decision>>;

    async fn submit_action(&self, action: &str, target: &str)
    -> Result<ActionResponse, ActionError>;
}

#[derive(Clone)]
pub struct HttpMetricsClient {
    client: Client,
    base_url: String,
    fallback: bool,
}

impl HttpMetricsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        parse_base_url(base_url).with_context(|| format!("invalid API base URL {base_url}"))?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
            fallback: true,
        })
    }

    pub fn from_config(cfg: &DashboardConfig) -> Result<Self> {
        Ok(Self::new(cfg.base_url(), cfg.request_timeout())?.with_fallback(cfg.fallback))
    }

    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback = enabled;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self
            .client
            .get(self.endpoint(path))
            .send()
            .await
            .context("request failed")?;
        if !resp.status().is_success() {
            return Err(anyhow!("status {}", resp.status()));
        }
        resp.json::<T>().await.context("malformed response body")
    }

    fn recover<T>(
        &self,
        path: &str,
        result: Result<T>,
        synthesize: impl FnOnce() -> T,
    ) -> FetchOutcome<T> {
        match result {
            Ok(data) => FetchOutcome::Live(data),
            Err(err) => {
                let reason = format!("{err:#}");
                if self.fallback {
                    warn!("[client] GET {path} failed: {reason}; using synthetic data");
                    FetchOutcome::Fallback {
                        data: synthesize(),
                        reason,
                    }
                } else {
                    warn!("[client] GET {path} failed: {reason}");
                    FetchOutcome::Failed(reason)
                }
            }
        }
    }
}

#[async_trait]
impl MetricsClient for HttpMetricsClient {
    async fn fetch_metrics(&self) -> FetchOutcome<Vec<MetricSample>> {
        let result = self.get_json(METRICS_PATH).await;
        self.recover(METRICS_PATH, result, || {
            synthetic::metrics(Utc::now(), &mut rand::thread_rng())
        })
    }

    async fn fetch_decisions(&self) -> FetchOutcome<Vec<Decision>> {
        let result = self.get_json(DECISIONS_PATH).await;
        self.recover(DECISIONS_PATH, result, || {
            synthetic::decisions(Utc::now(), &mut rand::thread_rng())
        })
    }

    async fn submit_action(
        &self,
        action: &str,
        target: &str,
    ) -> Result<ActionResponse, ActionError> {
        debug!("[client] POST {ACTION_PATH} action={action} target={target}");
        let resp = self
            .client
            .post(self.endpoint(ACTION_PATH))
            .json(&ActionRequest { action, target })
            .send()
            .await
            .map_err(ActionError::Transport)?;

        let status = resp.status();
        let body = resp.text().await.map_err(ActionError::Transport)?;
        if !status.is_success() {
            return Err(ActionError::Status {
                status: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(ActionError::Decode)
    }
}
