//! Timer tasks driving a poll state.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::error::FetchError;
use super::state::{PollSnapshot, PollState};

/// Default refresh interval for arrival predictions (10 seconds).
const PREDICTION_INTERVAL_SECS: u64 = 10;

/// Default refresh interval for bikeshare availability (60 seconds).
const BIKESHARE_INTERVAL_SECS: u64 = 60;

/// Countdown ticks per cycle.
const COUNTDOWN_PERIOD: u32 = 10;

/// Timing for one poller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSchedule {
    /// Time between fetches.
    pub interval: Duration,
    /// Countdown start value; it ticks down to 1 then wraps.
    pub countdown_period: u32,
    /// Time between countdown ticks.
    pub tick: Duration,
}

impl PollSchedule {
    /// Schedule with the given fetch interval and the standard countdown.
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            countdown_period: COUNTDOWN_PERIOD,
            tick: Duration::from_secs(1),
        }
    }

    /// Rail and bus prediction cadence.
    pub fn predictions() -> Self {
        Self::every(Duration::from_secs(PREDICTION_INTERVAL_SECS))
    }

    /// Bikeshare availability cadence.
    pub fn bikeshare() -> Self {
        Self::every(Duration::from_secs(BIKESHARE_INTERVAL_SECS))
    }
}

/// How many items a fetch produced, for logging.
pub trait FetchSize {
    fn fetch_size(&self) -> usize;
}

impl<T> FetchSize for Vec<T> {
    fn fetch_size(&self) -> usize {
        self.len()
    }
}

impl<T> FetchSize for Option<T> {
    fn fetch_size(&self) -> usize {
        usize::from(self.is_some())
    }
}

/// A running poller for one displayed entity.
///
/// Dropping a poller cancels its timers; call [`Poller::stop`] to also wait
/// until no further state change can happen.
pub struct Poller<T> {
    name: Arc<str>,
    state: Arc<RwLock<PollState<T>>>,
    token: CancellationToken,
}

impl<T> Poller<T>
where
    T: FetchSize + Clone + Send + Sync + 'static,
{
    /// Start both timers. The first fetch is issued immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F, Fut>(name: impl Into<String>, schedule: PollSchedule, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
    {
        let name: Arc<str> = Arc::from(name.into());
        let state = Arc::new(RwLock::new(PollState::new(schedule.countdown_period)));
        let token = CancellationToken::new();

        tokio::spawn(run_fetch_timer(
            name.clone(),
            schedule.interval,
            fetch,
            state.clone(),
            token.clone(),
        ));
        tokio::spawn(run_countdown_timer(
            schedule.tick,
            state.clone(),
            token.clone(),
        ));

        info!(poller = %name, interval = ?schedule.interval, "poller started");

        Self { name, state, token }
    }

    /// Current state, for display.
    pub async fn snapshot(&self) -> PollSnapshot<T> {
        self.state.read().await.snapshot()
    }

    /// Cancel both timers and any in-flight fetch.
    ///
    /// After this returns the state is frozen, even if a fetch issued
    /// earlier completes later.
    pub async fn stop(&self) {
        if self.token.is_cancelled() {
            return;
        }
        self.token.cancel();
        // Writers check the token while holding the lock, so once we hold it
        // every later writer sees the cancellation.
        let _guard = self.state.write().await;
        info!(poller = %self.name, "poller stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl<T> Drop for Poller<T> {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn run_fetch_timer<T, F, Fut>(
    name: Arc<str>,
    interval: Duration,
    fetch: F,
    state: Arc<RwLock<PollState<T>>>,
    token: CancellationToken,
) where
    T: FetchSize + Send + Sync + 'static,
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, FetchError>> + Send + 'static,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                // Each fetch runs on its own task so a slow upstream never
                // delays the next tick. Overlapping results are applied in
                // completion order.
                tokio::spawn(run_fetch(name.clone(), fetch(), state.clone(), token.clone()));
            }
        }
    }
}

async fn run_fetch<T, Fut>(
    name: Arc<str>,
    fetch: Fut,
    state: Arc<RwLock<PollState<T>>>,
    token: CancellationToken,
) where
    T: FetchSize,
    Fut: Future<Output = Result<T, FetchError>>,
{
    {
        let mut guard = state.write().await;
        if token.is_cancelled() {
            return;
        }
        guard.begin_fetch();
    }

    let outcome = tokio::select! {
        biased;
        _ = token.cancelled() => {
            debug!(poller = %name, "in-flight fetch discarded");
            return;
        }
        outcome = fetch => outcome,
    };

    let mut guard = state.write().await;
    if token.is_cancelled() {
        debug!(poller = %name, "late fetch result discarded");
        return;
    }

    match outcome {
        Ok(value) => {
            debug!(poller = %name, size = value.fetch_size(), "fetch succeeded");
            guard.record_success(value);
        }
        Err(e) => {
            warn!(poller = %name, error = %e, "fetch failed, keeping previous result");
            guard.record_failure(e);
        }
    }
}

async fn run_countdown_timer<T>(
    tick: Duration,
    state: Arc<RwLock<PollState<T>>>,
    token: CancellationToken,
) {
    // The countdown starts full, so the first decrement is one tick away.
    let mut ticker = tokio::time::interval_at(Instant::now() + tick, tick);

    loop {
        tokio::select! {
            biased;
            _ = token.cancelled() => break,
            _ = ticker.tick() => {
                let mut guard = state.write().await;
                if token.is_cancelled() {
                    break;
                }
                guard.tick_countdown();
            }
        }
    }
}
