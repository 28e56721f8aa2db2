use aiops_core::{DecisionStatus, SeverityLevel};
use colored::*;

pub fn level_color(level: SeverityLevel) -> Color {
    match level {
        SeverityLevel::Healthy => Color::Green,
        SeverityLevel::Warning => Color::Yellow,
        SeverityLevel::Critical => Color::Red,
    }
}

/// Colorize `text` by severity, or leave it plain.
pub fn paint(text: &str, level: SeverityLevel, color: bool) -> ColoredString {
    if color {
        text.color(level_color(level))
    } else {
        text.normal()
    }
}

pub fn status_badge(status: SeverityLevel, color: bool) -> String {
    let (marker, label) = match status {
        SeverityLevel::Healthy => ("✔", "Healthy"),
        SeverityLevel::Warning => ("⚠", "Warning"),
        SeverityLevel::Critical => ("✖", "Critical"),
    };
    let text = format!("{marker} {label}");
    if color {
        text.color(level_color(status)).bold().to_string()
    } else {
        text
    }
}

pub fn decision_status_label(status: DecisionStatus, color: bool) -> String {
    let text = format!("[{status}]");
    if !color {
        return text;
    }
    match status {
        DecisionStatus::Success => text.green().to_string(),
        DecisionStatus::Pending => text.yellow().to_string(),
        DecisionStatus::Failed => text.red().to_string(),
    }
}
