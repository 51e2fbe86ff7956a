//! Client for the regional BusTime predictions API.
//!
//! Regional operators publish predictions through a BusTime server,
//! authenticated with a `key` query parameter. Stops on this system are
//! identified by 4-character ids.

mod client;
mod error;
mod types;

pub use client::{BusTimeClient, BusTimeConfig};
pub use error::BusTimeError;
pub use types::{BusTimeApiError, BusTimeEnvelope, BusTimePrediction, BusTimeResponse};
