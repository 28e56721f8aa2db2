use crate::badge::paint;
use crate::local_time;
use aiops_core::{MetricSample, Resource, display_pct, usage_level};
use colored::*;
use std::fmt::Write;

const TOP_PROCESS_ROWS: usize = 4;

/// Rolling history of the newest `rows` samples plus the latest process
/// breakdown.
pub fn metrics_table(metrics: &[MetricSample], rows: usize, color: bool) -> String {
    let title = if color {
        "Recent Metrics".bold().to_string()
    } else {
        "Recent Metrics".to_string()
    };
    let mut out = format!("{title}\n");

    if metrics.is_empty() {
        out.push_str("  No metrics data available\n");
        return out;
    }

    let _ = writeln!(
        out,
        "  {:<10} {:<8} {:<8} {:<8} TOP PROCESS",
        "TIME", "CPU%", "MEM%", "DISK%"
    );
    for sample in metrics.iter().take(rows) {
        let top = match sample.top_process() {
            Some(p) => format!("{} ({:.1}% CPU)", p.name, display_pct(p.cpu)),
            None => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "  {:<10} {} {} {} {}",
            local_time(&sample.timestamp),
            usage_cell(Resource::Cpu, sample, color),
            usage_cell(Resource::Memory, sample, color),
            usage_cell(Resource::Disk, sample, color),
            top
        );
    }

    let latest = &metrics[0];
    if !latest.top_processes.is_empty() {
        let _ = writeln!(out, "\n  Current Top Processes");
        for (idx, p) in latest.top_processes.iter().take(TOP_PROCESS_ROWS).enumerate() {
            let _ = writeln!(
                out,
                "  #{:<2} {:<16} {:>5.1}% CPU {:>5.1}% MEM",
                idx + 1,
                p.name,
                display_pct(p.cpu),
                display_pct(p.memory)
            );
        }
    }
    out
}

fn usage_cell(resource: Resource, sample: &MetricSample, color: bool) -> ColoredString {
    let value = resource.value(sample);
    paint(
        &format!("{:<8.1}", display_pct(value)),
        usage_level(resource, value),
        color,
    )
}
