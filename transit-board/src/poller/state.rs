//! Per-entity poll state.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::FetchError;

/// Mutable state owned by one poller.
///
/// The last good result survives failed fetches: a transient upstream error
/// leaves stale-but-valid data on screen with an error marker beside it.
#[derive(Debug, Clone)]
pub struct PollState<T> {
    last_good: Option<T>,
    fetched_at: Option<DateTime<Utc>>,
    in_flight: usize,
    last_error: Option<FetchError>,
    countdown: u32,
    period: u32,
}

impl<T> PollState<T> {
    /// Fresh state with the countdown at `period`.
    pub fn new(period: u32) -> Self {
        let period = period.max(1);
        Self {
            last_good: None,
            fetched_at: None,
            in_flight: 0,
            last_error: None,
            countdown: period,
            period,
        }
    }

    /// A fetch has been issued.
    pub fn begin_fetch(&mut self) {
        self.in_flight += 1;
    }

    /// A fetch succeeded: replace the result and restart the countdown.
    pub fn record_success(&mut self, value: T) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.last_good = Some(value);
        self.fetched_at = Some(Utc::now());
        self.last_error = None;
        self.countdown = self.period;
    }

    /// A fetch failed: keep the previous result and countdown.
    pub fn record_failure(&mut self, err: FetchError) {
        self.in_flight = self.in_flight.saturating_sub(1);
        self.last_error = Some(err);
    }

    /// One countdown tick. Wraps back to the full period instead of
    /// reaching zero.
    pub fn tick_countdown(&mut self) {
        self.countdown = if self.countdown <= 1 {
            self.period
        } else {
            self.countdown - 1
        };
    }

    pub fn last_good(&self) -> Option<&T> {
        self.last_good.as_ref()
    }

    pub fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }

    pub fn countdown(&self) -> u32 {
        self.countdown
    }
}

impl<T: Clone> PollState<T> {
    /// Copy out everything the display needs.
    pub fn snapshot(&self) -> PollSnapshot<T> {
        PollSnapshot {
            result: self.last_good.clone(),
            fetched_at: self.fetched_at,
            is_loading: self.is_loading(),
            last_error: self.last_error.as_ref().map(ToString::to_string),
            countdown: self.countdown,
        }
    }
}

/// Read-only view of a poller, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollSnapshot<T> {
    pub result: Option<T>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub is_loading: bool,
    pub last_error: Option<String>,
    pub countdown: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure() -> FetchError {
        FetchError::failed("boom")
    }

    #[test]
    fn starts_empty_at_full_countdown() {
        let state: PollState<u32> = PollState::new(10);
        assert!(state.last_good().is_none());
        assert!(state.last_error().is_none());
        assert!(!state.is_loading());
        assert_eq!(state.countdown(), 10);
    }

    #[test]
    fn success_replaces_result_and_resets_countdown() {
        let mut state = PollState::new(10);
        state.tick_countdown();
        state.tick_countdown();
        state.begin_fetch();
        assert!(state.is_loading());

        state.record_success(7);
        assert_eq!(state.last_good(), Some(&7));
        assert_eq!(state.countdown(), 10);
        assert!(!state.is_loading());
        assert!(state.snapshot().fetched_at.is_some());
    }

    #[test]
    fn failure_keeps_result_and_countdown() {
        let mut state = PollState::new(10);
        state.begin_fetch();
        state.record_success(1);
        state.tick_countdown();
        state.tick_countdown();

        state.begin_fetch();
        state.record_failure(failure());

        assert_eq!(state.last_good(), Some(&1));
        assert_eq!(state.last_error(), Some(&failure()));
        assert_eq!(state.countdown(), 8);
        assert!(!state.is_loading());
    }

    #[test]
    fn success_clears_error() {
        let mut state = PollState::new(10);
        state.begin_fetch();
        state.record_failure(failure());
        state.begin_fetch();
        state.record_success(2);
        assert!(state.last_error().is_none());
    }

    #[test]
    fn countdown_ticks_down_and_wraps() {
        let mut state: PollState<()> = PollState::new(10);
        state.record_success(());

        for _ in 0..3 {
            state.tick_countdown();
        }
        assert_eq!(state.countdown(), 7);

        for _ in 0..6 {
            state.tick_countdown();
        }
        assert_eq!(state.countdown(), 1);

        state.tick_countdown();
        assert_eq!(state.countdown(), 10);
    }

    #[test]
    fn countdown_never_reaches_zero() {
        let mut state: PollState<()> = PollState::new(10);
        for _ in 0..100 {
            state.tick_countdown();
            assert!((1..=10).contains(&state.countdown()));
        }
    }

    #[test]
    fn overlapping_fetches_stay_loading_until_all_finish() {
        let mut state = PollState::new(10);
        state.begin_fetch();
        state.begin_fetch();
        state.record_success(1);
        assert!(state.is_loading());
        state.record_failure(failure());
        assert!(!state.is_loading());
    }

    #[test]
    fn snapshot_renders_error_message() {
        let mut state: PollState<u8> = PollState::new(10);
        state.begin_fetch();
        state.record_failure(failure());
        let snapshot = state.snapshot();
        assert_eq!(snapshot.last_error.as_deref(), Some("fetch failed: boom"));
        assert_eq!(snapshot.result, None);
    }
}
