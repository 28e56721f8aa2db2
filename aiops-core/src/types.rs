use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One point-in-time resource snapshot as reported by the backend.
///
/// Percentages are kept exactly as received; use [`display_pct`] when a
/// bounded value is needed for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub cpu_usage: f64,
    pub memory_usage: f64,
    pub disk_usage: f64,
    pub timestamp: String,
    // index 0 is the top consumer, ordered by the backend
    #[serde(default)]
    pub top_processes: Vec<ProcessUsage>,
}

impl MetricSample {
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }

    pub fn top_process(&self) -> Option<&ProcessUsage> {
        self.top_processes.first()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessUsage {
    pub name: String,
    pub cpu: f64,
    pub memory: f64,
}

/// A remediation action taken or proposed by the AI subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub id: String,
    pub action: String,
    pub target: String,
    pub reason: String,
    pub timestamp: String,
    pub status: DecisionStatus,
}

impl Decision {
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }

    /// Kill and restart actions disrupt running workloads.
    pub fn is_disruptive(&self) -> bool {
        let action = self.action.to_lowercase();
        action.contains("kill") || action.contains("restart")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionStatus {
    Success,
    Pending,
    Failed,
}

impl DecisionStatus {
    pub const ALL: [DecisionStatus; 3] = [Self::Success, Self::Pending, Self::Failed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Pending => "pending",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Overall system health. Variants are declared in ascending severity so the
/// derived `Ord` ranks `Critical` highest.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SeverityLevel {
    #[default]
    Healthy,
    Warning,
    Critical,
}

impl SeverityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for SeverityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionRequest<'a> {
    pub action: &'a str,
    pub target: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
}

/// Clamp a stored percentage for display.
pub fn display_pct(value: f64) -> f64 {
    value.min(100.0)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
