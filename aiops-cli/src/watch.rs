use crate::dashboard::{Layout, render};
use aiops_core::{DashboardState, MetricsClient, PollingController};
use anyhow::Result;
use log::info;
use std::future::Future;
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

pub struct WatchOptions {
    pub interval: Duration,
    pub once: bool,
    pub json: bool,
    pub layout: Layout,
}

/// Poll and redraw until Ctrl-C, or after the first frame with `once`.
pub async fn run_watch(client: Arc<dyn MetricsClient>, opts: WatchOptions) -> Result<()> {
    run_watch_until(client, opts, tokio::signal::ctrl_c()).await
}

/// Like [`run_watch`], stopping when `stop` resolves. `stop` is armed before
/// the first cycle and stays armed across redraws.
pub async fn run_watch_until<F: Future>(
    client: Arc<dyn MetricsClient>,
    opts: WatchOptions,
    stop: F,
) -> Result<()> {
    let mut handle = PollingController::new(client, opts.interval).start();
    let redraw = !opts.once && !opts.json && std::io::stdout().is_terminal();
    tokio::pin!(stop);

    let mut interrupted = false;
    tokio::select! {
        _ = &mut stop => interrupted = true,
        first = handle.first_cycle() => emit(&first, &opts, redraw)?,
    }

    if !opts.once && !interrupted {
        loop {
            tokio::select! {
                _ = &mut stop => {
                    interrupted = true;
                    break;
                }
                changed = handle.changed() => {
                    if !changed {
                        break;
                    }
                    emit(&handle.snapshot(), &opts, redraw)?;
                }
            }
        }
    }
    if interrupted {
        info!("[watch] interrupted");
    }

    let stats = handle.stats();
    handle.shutdown().await;
    info!(
        "[watch] stopped after {} cycles ({} skipped, {} fallbacks, {} errors)",
        stats.cycles, stats.skipped, stats.fallbacks, stats.errors
    );
    Ok(())
}

fn emit(state: &DashboardState, opts: &WatchOptions, redraw: bool) -> Result<()> {
    if opts.json {
        println!("{}", serde_json::to_string(state)?);
        return Ok(());
    }
    if redraw {
        // clear screen, cursor home
        print!("\x1B[2J\x1B[H");
    }
    print!("{}", render(state, opts.layout));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aiops_core::HttpMetricsClient;
    use httpmock::prelude::*;

    fn opts(once: bool) -> WatchOptions {
        WatchOptions {
            interval: Duration::from_secs(1),
            once,
            json: true,
            layout: Layout {
                history_rows: 8,
                decision_rows: 6,
                color: false,
            },
        }
    }

    fn client_for(server: &MockServer) -> Arc<dyn MetricsClient> {
        Arc::new(HttpMetricsClient::new(&server.base_url(), Duration::from_secs(60)).unwrap())
    }

    #[tokio::test]
    async fn stop_during_first_cycle_ends_watch() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200)
                    .header("content-type", "application/json")
                    .body("[]")
                    .delay(Duration::from_secs(30));
            })
            .await;

        let stop = tokio::time::sleep(Duration::from_millis(100));
        let run = run_watch_until(client_for(&server), opts(true), stop);
        let finished = tokio::time::timeout(Duration::from_secs(10), run).await;
        assert!(matches!(finished, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn stop_is_observed_between_redraws() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200)
                    .header("content-type", "application/json")
                    .body("[]");
            })
            .await;

        let stop = tokio::time::sleep(Duration::from_millis(2500));
        let run = run_watch_until(client_for(&server), opts(false), stop);
        let finished = tokio::time::timeout(Duration::from_secs(10), run).await;
        assert!(matches!(finished, Ok(Ok(()))));
    }
}
