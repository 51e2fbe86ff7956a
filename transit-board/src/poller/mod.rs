//! Scheduled fetch-and-update engine shared by every reconciler.
//!
//! Each displayed entity owns one [`Poller`], which drives two independent
//! timers:
//!
//! - a **fetch timer** that calls the fetch operation immediately and then
//!   every `interval`, keeping the last good result across failures
//! - a **countdown timer** that ticks once a second from 10 down to 1 and
//!   wraps, purely as a progress signal for the display
//!
//! Stopping a poller cancels both timers and discards any fetch still in
//! flight. Once [`Poller::stop`] returns, the poller's state never changes
//! again.

mod engine;
mod error;
mod state;

pub use engine::{FetchSize, PollSchedule, Poller};
pub use error::FetchError;
pub use state::{PollSnapshot, PollState};
