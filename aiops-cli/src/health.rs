use crate::badge::{paint, status_badge};
use crate::local_time;
use aiops_core::{MetricSample, Resource, SeverityLevel, display_pct, usage_level};
use colored::*;
use std::fmt::Write;

const BAR_WIDTH: usize = 20;

/// Current snapshot with one bar per resource.
pub fn system_health(metrics: Option<&MetricSample>, status: SeverityLevel, color: bool) -> String {
    let title = if color {
        "System Health".bold().to_string()
    } else {
        "System Health".to_string()
    };

    let Some(sample) = metrics else {
        return format!("{title}\n  No data available\n");
    };

    let mut out = String::new();
    let _ = writeln!(out, "{title}  {}", status_badge(status, color));
    let _ = writeln!(out, "  Last updated: {}", local_time(&sample.timestamp));
    for resource in Resource::ALL {
        let value = resource.value(sample);
        let level = usage_level(resource, value);
        let _ = writeln!(
            out,
            "  {:<7} {} {}",
            resource.label(),
            paint(&bar(value), level, color),
            paint(&format!("{:>5.1}%", display_pct(value)), level, color)
        );
    }
    out
}

fn bar(value: f64) -> String {
    let pct = display_pct(value).max(0.0);
    let filled = ((pct / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("[{}{}]", "█".repeat(filled), "·".repeat(BAR_WIDTH - filled))
}
