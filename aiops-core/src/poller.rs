//! Periodic refresh of the dashboard state.
//!
//! One ticker task owns the schedule. Each tick spawns a cycle that fetches
//! metrics and decisions concurrently and applies both at once. A tick that
//! fires while a cycle is still running is skipped, so results are applied
//! in order. After [`PollHandle::cancel`] no cycle touches the state again.

use crate::client::MetricsClient;
use crate::state::{CycleResult, DashboardState};
use crate::stats::{PollStats, PollStatsSnapshot};
use chrono::Utc;
use log::{debug, info, warn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

pub struct PollingController {
    client: Arc<dyn MetricsClient>,
    interval: Duration,
}

struct Shared {
    client: Arc<dyn MetricsClient>,
    state: watch::Sender<DashboardState>,
    active: AtomicBool,
    busy: AtomicBool,
    stats: PollStats,
}

impl PollingController {
    pub fn new(client: Arc<dyn MetricsClient>, interval: Duration) -> Self {
        Self {
            client,
            interval: interval.max(Duration::from_millis(1)),
        }
    }

    /// Enter `Loading` and start polling. Must be called inside a tokio
    /// runtime. The first cycle runs immediately.
    pub fn start(self) -> PollHandle {
        let mut initial = DashboardState::default();
        initial.begin_loading();
        let (state_tx, state_rx) = watch::channel(initial);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let shared = Arc::new(Shared {
            client: self.client,
            state: state_tx,
            active: AtomicBool::new(true),
            busy: AtomicBool::new(false),
            stats: PollStats::default(),
        });

        info!("[poller] started, interval {:?}", self.interval);
        let task = tokio::spawn(run_ticker(
            Arc::clone(&shared),
            self.interval,
            shutdown_rx,
        ));

        PollHandle {
            shared,
            state_rx,
            shutdown: shutdown_tx,
            task: Some(task),
        }
    }
}

async fn run_ticker(shared: Arc<Shared>, interval: Duration, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            _ = ticker.tick() => {
                if !shared.active.load(Ordering::Acquire) {
                    break;
                }
                if shared.busy.swap(true, Ordering::AcqRel) {
                    shared.stats.record_skipped();
                    debug!("[poller] previous cycle still running; skipping tick");
                    continue;
                }
                let cycle = Arc::clone(&shared);
                tokio::spawn(async move {
                    let run = tokio::spawn({
                        let cycle = Arc::clone(&cycle);
                        async move { cycle.run_cycle().await }
                    });
                    // busy is cleared even when the cycle panicked
                    if let Err(err) = run.await {
                        cycle.stats.record_error();
                        warn!("[poller] cycle aborted: {err}");
                    }
                    cycle.busy.store(false, Ordering::Release);
                });
            }
        }
    }
    debug!("[poller] ticker stopped");
}

impl Shared {
    async fn run_cycle(&self) {
        let (metrics, decisions) =
            tokio::join!(self.client.fetch_metrics(), self.client.fetch_decisions());

        let mut result = None;
        // active is checked under the watch lock; cancel() flips it under
        // the same lock, so nothing lands after teardown.
        self.state.send_if_modified(|state| {
            if !self.active.load(Ordering::Acquire) {
                return false;
            }
            result = Some(state.apply(metrics, decisions, Utc::now()));
            true
        });

        match result {
            None => {
                self.stats.record_discarded();
                debug!("[poller] discarding result that arrived after teardown");
            }
            Some(CycleResult::Applied { fallback }) => {
                self.stats.record_cycle();
                if fallback {
                    self.stats.record_fallback();
                }
            }
            Some(CycleResult::Failed) => {
                self.stats.record_cycle();
                self.stats.record_error();
                warn!("[poller] cycle failed; keeping previous data");
            }
        }
    }
}

/// Owner of a running poller. Dropping it cancels polling.
pub struct PollHandle {
    shared: Arc<Shared>,
    state_rx: watch::Receiver<DashboardState>,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    /// Read-only view of the state for renderers.
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state_rx.clone()
    }

    pub fn snapshot(&self) -> DashboardState {
        self.state_rx.borrow().clone()
    }

    /// Wait for the next state update. Returns `false` once polling has
    /// been cancelled.
    pub async fn changed(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        self.state_rx.changed().await.is_ok() && self.is_active()
    }

    /// Wait until the first cycle has been applied (or failed).
    pub async fn first_cycle(&mut self) -> DashboardState {
        if let Ok(state) = self.state_rx.wait_for(|s| !s.loading).await {
            return state.clone();
        }
        self.snapshot()
    }

    pub fn stats(&self) -> PollStatsSnapshot {
        self.shared.stats.snapshot()
    }

    pub fn is_active(&self) -> bool {
        self.shared.active.load(Ordering::Acquire)
    }

    /// Stop the ticker and discard any in-flight cycle. Safe to call more
    /// than once.
    pub fn cancel(&self) {
        let mut was_active = false;
        self.shared.state.send_if_modified(|_| {
            was_active = self.shared.active.swap(false, Ordering::AcqRel);
            false
        });
        if was_active {
            self.shutdown.send_replace(true);
            info!("[poller] cancelled");
        }
    }

    /// Cancel and wait for the ticker task to exit.
    pub async fn shutdown(mut self) {
        self.cancel();
        if let Some(task) = self.task.take()
            && let Err(err) = task.await
        {
            warn!("[poller] ticker task ended abnormally: {err}");
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
