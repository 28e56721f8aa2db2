use crate::badge::decision_status_label;
use aiops_core::Decision;
use chrono::Local;
use colored::*;
use std::fmt::Write;

/// Decision log, newest entries as the backend ordered them.
pub fn ai_decisions(decisions: &[Decision], limit: usize, color: bool) -> String {
    let title = if color {
        "AI Decisions".bold().to_string()
    } else {
        "AI Decisions".to_string()
    };
    let mut out = format!("{title}\n");

    if decisions.is_empty() {
        out.push_str("  No AI decisions recorded yet\n");
        return out;
    }

    for decision in decisions.iter().take(limit) {
        let _ = writeln!(
            out,
            "  {} {} → {} {}",
            action_marker(decision, color),
            decision.action,
            decision.target,
            decision_status_label(decision.status, color)
        );
        let _ = writeln!(out, "      {}", decision.reason);
        let when = decision
            .parsed_timestamp()
            .map(|ts| ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| decision.timestamp.clone());
        let _ = writeln!(out, "      {}", if color { when.dimmed().to_string() } else { when });
    }
    out
}

fn action_marker(decision: &Decision, color: bool) -> ColoredString {
    match (decision.is_disruptive(), color) {
        (true, true) => "⚠".yellow().bold(),
        (true, false) => "⚠".normal(),
        (false, true) => "•".blue(),
        (false, false) => "•".normal(),
    }
}
