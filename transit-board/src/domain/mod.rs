//! Domain types for the transit dashboard.
//!
//! These are the display-ready shapes every upstream feed is normalized
//! into. Station codes are validated at construction; everything else
//! mirrors what the dashboard shows.

mod bikeshare;
mod bus;
mod line;
mod rail;
mod station;

pub use bikeshare::BikeshareStation;
pub use bus::{BusPrediction, BusStopBoard};
pub use line::Line;
pub use rail::{RailArrival, RailPrediction, RailStatus};
pub use station::{InvalidStationCode, StationCode};
