//! Data model, backend client and poll loop behind the AIOps dashboard.

pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod poller;
pub mod state;
pub mod stats;
pub mod synthetic;
pub mod types;

pub use classify::{Resource, classify, usage_level};
pub use client::{FetchOutcome, HttpMetricsClient, MetricsClient};
pub use config::DashboardConfig;
pub use error::ActionError;
pub use poller::{PollHandle, PollingController};
pub use state::{DashboardState, DataSource, PollPhase};
pub use stats::PollStatsSnapshot;
pub use types::{
    ActionResponse, Decision, DecisionStatus, MetricSample, ProcessUsage, SeverityLevel,
    display_pct,
};
