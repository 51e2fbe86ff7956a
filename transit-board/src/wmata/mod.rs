//! WMATA API client.
//!
//! Covers the two WMATA endpoints the dashboard polls:
//! - rail predictions per platform code (`StationPrediction.svc`)
//! - bus predictions per stop (`NextBusService.svc`)
//!
//! Both authenticate with an `api_key` header. Transfer stations report
//! trains per platform code, so callers fetch every companion code.

mod client;
mod convert;
mod error;
mod types;

pub use client::{DEFAULT_MAX_CONCURRENT, DEFAULT_TIMEOUT_SECS, WmataClient, WmataConfig};
pub use convert::convert_train;
pub use error::WmataError;
pub use types::{BusPredictionDto, BusPredictionResponse, RailPredictionResponse, TrainDto};
