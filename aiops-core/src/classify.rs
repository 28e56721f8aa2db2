//! Health classification of metric samples.
//!
//! All comparisons are strict: a gauge sitting exactly on a threshold stays
//! in the lower band. Disk tolerates higher utilisation than CPU and memory.

use crate::types::{MetricSample, SeverityLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Cpu,
    Memory,
    Disk,
}

impl Resource {
    pub const ALL: [Resource; 3] = [Self::Cpu, Self::Memory, Self::Disk];

    /// `(warning, critical)` lower bounds, both exclusive.
    pub fn thresholds(&self) -> (f64, f64) {
        match self {
            Self::Cpu | Self::Memory => (60.0, 80.0),
            Self::Disk => (70.0, 85.0),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Cpu => "CPU",
            Self::Memory => "Memory",
            Self::Disk => "Disk",
        }
    }

    pub fn value(&self, sample: &MetricSample) -> f64 {
        match self {
            Self::Cpu => sample.cpu_usage,
            Self::Memory => sample.memory_usage,
            Self::Disk => sample.disk_usage,
        }
    }
}

/// Level of a single gauge. NaN never raises severity.
pub fn usage_level(resource: Resource, value: f64) -> SeverityLevel {
    let (warning, critical) = resource.thresholds();
    if value > critical {
        SeverityLevel::Critical
    } else if value > warning {
        SeverityLevel::Warning
    } else {
        SeverityLevel::Healthy
    }
}

/// Overall status of a sample: the most severe of its three gauges.
pub fn classify(sample: &MetricSample) -> SeverityLevel {
    Resource::ALL
        .iter()
        .map(|r| usage_level(*r, r.value(sample)))
        .max()
        .unwrap_or_default()
}
