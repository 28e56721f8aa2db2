use crate::decisions::ai_decisions;
use crate::health::system_health;
use crate::history::metrics_table;
use aiops_core::{DashboardState, DataSource, PollPhase};
use colored::*;

#[derive(Debug, Clone, Copy)]
pub struct Layout {
    pub history_rows: usize,
    pub decision_rows: usize,
    pub color: bool,
}

/// Full screen: header, health panel, history and decision log.
pub fn render(state: &DashboardState, layout: Layout) -> String {
    let color = layout.color;
    let mut out = String::new();
    if color {
        out.push_str(&format!("{}\n", "AIOps Dashboard".bold().cyan()));
        out.push_str(&format!(
            "{}\n\n",
            "Real-time system monitoring with AI-powered insights".dimmed()
        ));
    } else {
        out.push_str("AIOps Dashboard\nReal-time system monitoring with AI-powered insights\n\n");
    }

    if state.loading {
        out.push_str("Loading...\n");
        return out;
    }

    if state.phase == PollPhase::Error
        && let Some(err) = &state.last_error
    {
        let line = format!("Refresh failed, showing previous data: {err}");
        out.push_str(&format!(
            "{}\n\n",
            if color { line.red().to_string() } else { line }
        ));
    }
    if state.source == DataSource::Fallback {
        let line = "Backend unreachable, showing synthetic data".to_string();
        out.push_str(&format!(
            "{}\n\n",
            if color { line.yellow().to_string() } else { line }
        ));
    }

    out.push_str(&system_health(state.latest(), state.status, color));
    out.push('\n');
    out.push_str(&metrics_table(&state.metrics, layout.history_rows, color));
    out.push('\n');
    out.push_str(&ai_decisions(&state.decisions, layout.decision_rows, color));
    out
}
