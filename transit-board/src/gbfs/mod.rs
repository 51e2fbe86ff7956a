//! GBFS bikeshare feed client.
//!
//! GBFS publishes whole-system snapshots: `station_status.json` for live
//! availability and `station_information.json` for names and capacity.
//! Neither can be filtered server-side, so callers fetch both and filter
//! locally.

mod client;
mod error;
mod types;

pub use client::{GbfsClient, GbfsConfig};
pub use error::GbfsError;
pub use types::{
    GbfsFeed, StationInfoDto, StationList, StationStatusDto, VEHICLE_TYPE_BIKE, VEHICLE_TYPE_EBIKE,
    VehicleTypeCount,
};
