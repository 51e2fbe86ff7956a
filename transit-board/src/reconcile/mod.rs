//! Per-entity reconcilers.
//!
//! Each reconciler owns one [`Poller`](crate::poller::Poller) and a fetch
//! function that turns upstream payloads into display-ready domain values:
//!
//! - [`RailReconciler`]: one station, merged across companion codes,
//!   deduplicated and ordered.
//! - [`BusReconciler`]: one stop, dispatched to WMATA or BusTime by the
//!   shape of its id.
//! - [`BikeshareReconciler`]: one dock, joined from two GBFS feeds.
//!
//! Upstreams sit behind the [`RailSource`], [`BusSource`] and
//! [`BikeshareSource`] traits so reconcilers can be driven by mocks.

mod bikeshare;
mod bus;
mod rail;

pub use bikeshare::{BikeshareReconciler, BikeshareSource, fetch_station, join_stations};
pub use bus::{
    BusClients, BusProvider, BusReconciler, BusSource, fetch_stop_board, normalize_bustime,
    normalize_wmata, parse_countdown,
};
pub use rail::{
    RailReconciler, RailSource, RailStationHeader, fetch_station_board, merge_predictions,
    resolve_destination,
};
