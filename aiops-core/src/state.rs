use crate::classify::classify;
use crate::client::FetchOutcome;
use crate::types::{Decision, MetricSample, SeverityLevel};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PollPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Live,
    Fallback,
}

/// Everything the views render. Replaced wholesale by each poll cycle.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardState {
    /// Newest first.
    pub metrics: Vec<MetricSample>,
    pub decisions: Vec<Decision>,
    pub status: SeverityLevel,
    pub loading: bool,
    pub phase: PollPhase,
    pub source: DataSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// What a single cycle did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleResult {
    Applied { fallback: bool },
    Failed,
}

impl DashboardState {
    pub fn latest(&self) -> Option<&MetricSample> {
        self.metrics.first()
    }

    pub fn begin_loading(&mut self) {
        self.loading = true;
        self.phase = PollPhase::Loading;
    }

    /// Merge the two halves of a cycle.
    ///
    /// A failed read leaves data and status untouched and moves to `Error`;
    /// the next successful cycle returns to `Ready`. `status` is only
    /// recomputed when there is a sample to classify.
    pub fn apply(
        &mut self,
        metrics: FetchOutcome<Vec<MetricSample>>,
        decisions: FetchOutcome<Vec<Decision>>,
        now: DateTime<Utc>,
    ) -> CycleResult {
        let fallback = metrics.is_fallback() || decisions.is_fallback();
        let (metrics, decisions) = match (metrics.into_result(), decisions.into_result()) {
            (Ok(m), Ok(d)) => (m, d),
            (m, d) => {
                let reasons: Vec<String> = [m.err(), d.err()].into_iter().flatten().collect();
                self.loading = false;
                self.phase = PollPhase::Error;
                self.last_error = Some(reasons.join("; "));
                return CycleResult::Failed;
            }
        };

        if let Some(latest) = metrics.first() {
            self.status = classify(latest);
        }
        self.metrics = metrics;
        self.decisions = decisions;
        self.loading = false;
        self.phase = PollPhase::Ready;
        self.source = if fallback {
            DataSource::Fallback
        } else {
            DataSource::Live
        };
        self.last_error = None;
        self.updated_at = Some(now);
        CycleResult::Applied { fallback }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DecisionStatus;

    fn sample(cpu: f64) -> MetricSample {
        MetricSample {
            cpu_usage: cpu,
            memory_usage: 10.0,
            disk_usage: 10.0,
            timestamp: "2025-01-01T00:00:00Z".into(),
            top_processes: Vec::new(),
        }
    }

    fn decision(id: &str) -> Decision {
        Decision {
            id: id.into(),
            action: "Scale Up".into(),
            target: "web".into(),
            reason: "load".into(),
            timestamp: "2025-01-01T00:00:00Z".into(),
            status: DecisionStatus::Success,
        }
    }

    #[test]
    fn initial_state_is_idle_and_healthy() {
        let state = DashboardState::default();
        assert_eq!(state.phase, PollPhase::Idle);
        assert_eq!(state.status, SeverityLevel::Healthy);
        assert!(!state.loading);
        assert!(state.metrics.is_empty());
    }

    #[test]
    fn applies_and_classifies_latest_sample() {
        let mut state = DashboardState::default();
        state.begin_loading();
        let result = state.apply(
            FetchOutcome::Live(vec![sample(85.0), sample(10.0)]),
            FetchOutcome::Live(vec![decision("a")]),
            Utc::now(),
        );
        assert_eq!(result, CycleResult::Applied { fallback: false });
        assert_eq!(state.status, SeverityLevel::Critical);
        assert_eq!(state.phase, PollPhase::Ready);
        assert!(!state.loading);
        assert_eq!(state.source, DataSource::Live);
        assert!(state.updated_at.is_some());
    }

    #[test]
    fn empty_metrics_keep_previous_status() {
        let mut state = DashboardState::default();
        state.apply(
            FetchOutcome::Live(vec![sample(65.0)]),
            FetchOutcome::Live(Vec::new()),
            Utc::now(),
        );
        assert_eq!(state.status, SeverityLevel::Warning);

        state.apply(
            FetchOutcome::Live(Vec::new()),
            FetchOutcome::Live(Vec::new()),
            Utc::now(),
        );
        assert!(state.metrics.is_empty());
        assert_eq!(state.status, SeverityLevel::Warning);
        assert_eq!(state.phase, PollPhase::Ready);
    }

    #[test]
    fn fallback_marks_source() {
        let mut state = DashboardState::default();
        let result = state.apply(
            FetchOutcome::Live(vec![sample(10.0)]),
            FetchOutcome::Fallback {
                data: vec![decision("decision-0")],
                reason: "status 500".into(),
            },
            Utc::now(),
        );
        assert_eq!(result, CycleResult::Applied { fallback: true });
        assert_eq!(state.source, DataSource::Fallback);
        assert!(state.last_error.is_none());
    }

    #[test]
    fn failure_keeps_data_and_recovers() {
        let mut state = DashboardState::default();
        state.apply(
            FetchOutcome::Live(vec![sample(90.0)]),
            FetchOutcome::Live(vec![decision("a")]),
            Utc::now(),
        );

        let result = state.apply(
            FetchOutcome::Live(vec![sample(10.0)]),
            FetchOutcome::Failed("request failed".into()),
            Utc::now(),
        );
        assert_eq!(result, CycleResult::Failed);
        assert_eq!(state.phase, PollPhase::Error);
        assert_eq!(state.last_error.as_deref(), Some("request failed"));
        assert_eq!(state.metrics[0].cpu_usage, 90.0);
        assert_eq!(state.status, SeverityLevel::Critical);

        state.apply(
            FetchOutcome::Live(vec![sample(10.0)]),
            FetchOutcome::Live(vec![decision("b")]),
            Utc::now(),
        );
        assert_eq!(state.phase, PollPhase::Ready);
        assert_eq!(state.status, SeverityLevel::Healthy);
        assert!(state.last_error.is_none());
    }
}
