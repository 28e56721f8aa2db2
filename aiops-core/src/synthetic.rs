//! Stand-in data used when the backend cannot be read.
//!
//! The shape is fixed (counts, spacing, names); only the values are random.

use crate::types::{Decision, DecisionStatus, MetricSample, ProcessUsage};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

pub const METRIC_SAMPLES: usize = 10;
pub const METRIC_SPACING_SECS: i64 = 60;
pub const DECISION_COUNT: usize = 8;
pub const DECISION_SPACING_SECS: i64 = 300;

// (name, cpu ceiling, memory ceiling)
const PROCESSES: [(&str, f64, f64); 5] = [
    ("nginx", 50.0, 30.0),
    ("postgres", 40.0, 60.0),
    ("redis", 20.0, 25.0),
    ("node", 70.0, 45.0),
    ("python", 35.0, 40.0),
];

const ACTIONS: [&str; 5] = [
    "Kill Process",
    "Restart Container",
    "Scale Up",
    "Reduce Load",
    "Alert Admin",
];

const TARGETS: [&str; 5] = [
    "nginx-container",
    "postgres-db",
    "web-server",
    "api-gateway",
    "cache-service",
];

const REASONS: [&str; 5] = [
    "High CPU usage detected",
    "Memory threshold exceeded",
    "Process not responding",
    "Load balancing required",
    "Resource optimization needed",
];

/// Newest-first samples, one per minute ending at `now`.
pub fn metrics<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> Vec<MetricSample> {
    (0..METRIC_SAMPLES)
        .map(|i| {
            let at = now - Duration::seconds(i as i64 * METRIC_SPACING_SECS);
            MetricSample {
                cpu_usage: rng.gen_range(0.0..100.0),
                memory_usage: rng.gen_range(0.0..100.0),
                disk_usage: rng.gen_range(45.0..75.0),
                timestamp: format_timestamp(at),
                top_processes: processes(rng),
            }
        })
        .collect()
}

/// Newest-first decisions, one every five minutes ending at `now`.
pub fn decisions<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> Vec<Decision> {
    (0..DECISION_COUNT)
        .map(|i| {
            let at = now - Duration::seconds(i as i64 * DECISION_SPACING_SECS);
            Decision {
                id: format!("decision-{i}"),
                action: pick(&ACTIONS, rng),
                target: pick(&TARGETS, rng),
                reason: pick(&REASONS, rng),
                timestamp: format_timestamp(at),
                status: *DecisionStatus::ALL
                    .choose(rng)
                    .unwrap_or(&DecisionStatus::Pending),
            }
        })
        .collect()
}

fn processes<R: Rng>(rng: &mut R) -> Vec<ProcessUsage> {
    let mut list: Vec<ProcessUsage> = PROCESSES
        .iter()
        .map(|(name, cpu_max, mem_max)| ProcessUsage {
            name: (*name).to_string(),
            cpu: rng.gen_range(0.0..*cpu_max),
            memory: rng.gen_range(0.0..*mem_max),
        })
        .collect();
    list.sort_by(|a, b| b.cpu.total_cmp(&a.cpu));
    list
}

fn pick<R: Rng>(options: &[&str], rng: &mut R) -> String {
    options.choose(rng).copied().unwrap_or_default().to_string()
}

fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}
