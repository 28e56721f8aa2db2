use aiops_core::{DashboardConfig, HttpMetricsClient, MetricsClient, classify};
use anyhow::{Context, anyhow, bail};
use chrono::{DateTime, Local};
use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

mod badge;
mod dashboard;
mod decisions;
mod health;
mod history;
mod watch;
use dashboard::Layout;
use watch::{WatchOptions, run_watch};

#[derive(clap::Parser, Debug)]
struct Args {
    /// Base URL of the metrics backend [env: AIOPS_API_URL]
    #[clap(long)]
    url: Option<String>,

    /// Path to a TOML config file [env: AIOPS_CONFIG]
    #[clap(long)]
    config: Option<PathBuf>,

    /// Disable colorized output
    #[clap(long)]
    no_color: bool,

    /// Fail instead of showing synthetic data when the backend is unreachable
    #[clap(long)]
    no_fallback: bool,

    /// Print fetched data as JSON
    #[clap(long)]
    json: bool,

    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Live dashboard, refreshed on an interval (default)
    Watch {
        /// Seconds between refreshes
        #[clap(long)]
        interval: Option<u64>,
        /// Render the first frame and exit
        #[clap(long)]
        once: bool,
    },
    /// Show current system health
    Status,
    /// Show recent metrics history
    Metrics {
        /// Number of samples to show
        #[clap(long)]
        rows: Option<usize>,
    },
    /// Show recent AI decisions
    Decisions {
        /// Number of decisions to show
        #[clap(long)]
        limit: Option<usize>,
    },
    /// Ask the backend to take a remediation action
    TakeAction {
        /// Action to perform (e.g. restart)
        action: String,
        /// Target of the action (e.g. web-server)
        target: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let color = !args.no_color;
    if !color {
        colored::control::set_override(false);
    }

    let mut cfg = DashboardConfig::load(args.config.as_deref())?;
    if let Some(url) = &args.url {
        cfg.api_url = url.clone();
    }
    if args.no_fallback {
        cfg.fallback = false;
    }
    cfg.validate()?;

    let client = HttpMetricsClient::from_config(&cfg).context("failed to create API client")?;
    let layout = Layout {
        history_rows: cfg.history_rows,
        decision_rows: cfg.decision_rows,
        color,
    };

    match args.command.unwrap_or(Command::Watch {
        interval: None,
        once: false,
    }) {
        Command::Watch { interval, once } => {
            let interval = interval.map(Duration::from_secs).unwrap_or(cfg.poll_interval());
            if interval.is_zero() {
                bail!("--interval must be at least 1 second");
            }
            let opts = WatchOptions {
                interval,
                once,
                json: args.json,
                layout,
            };
            run_watch(Arc::new(client), opts).await
        }
        Command::Status => {
            let metrics = client
                .fetch_metrics()
                .await
                .into_result()
                .map_err(|reason| anyhow!("failed to fetch metrics: {reason}"))?;
            let status = metrics.first().map(classify).unwrap_or_default();
            if args.json {
                let body = serde_json::json!({ "status": status, "latest": metrics.first() });
                println!("{body}");
            } else {
                print!("{}", health::system_health(metrics.first(), status, color));
            }
            Ok(())
        }
        Command::Metrics { rows } => {
            let metrics = client
                .fetch_metrics()
                .await
                .into_result()
                .map_err(|reason| anyhow!("failed to fetch metrics: {reason}"))?;
            if args.json {
                println!("{}", serde_json::to_string(&metrics)?);
            } else {
                let rows = rows.unwrap_or(layout.history_rows);
                print!("{}", history::metrics_table(&metrics, rows, color));
            }
            Ok(())
        }
        Command::Decisions { limit } => {
            let list = client
                .fetch_decisions()
                .await
                .into_result()
                .map_err(|reason| anyhow!("failed to fetch decisions: {reason}"))?;
            if args.json {
                println!("{}", serde_json::to_string(&list)?);
            } else {
                let limit = limit.unwrap_or(layout.decision_rows);
                print!("{}", decisions::ai_decisions(&list, limit, color));
            }
            Ok(())
        }
        Command::TakeAction { action, target } => {
            let resp = client
                .submit_action(&action, &target)
                .await
                .with_context(|| format!("failed to submit '{action}' on {target}"))?;
            if args.json {
                println!("{}", serde_json::to_string(&resp)?);
            }
            if !resp.success {
                bail!("backend rejected '{action}' on {target}: {}", resp.message);
            }
            if !args.json {
                let line = format!("Action '{action}' on {target} accepted: {}", resp.message);
                println!("{}", if color { line.green().to_string() } else { line });
            }
            Ok(())
        }
    }
}

/// `HH:MM:SS` in local time, or the raw string when it does not parse.
pub(crate) fn local_time(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
