//! Bikeshare dock availability, joined from the status and information feeds.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::domain::BikeshareStation;
use crate::gbfs::{GbfsClient, StationInfoDto, StationStatusDto, VEHICLE_TYPE_BIKE, VEHICLE_TYPE_EBIKE};
use crate::poller::{FetchError, PollSchedule, PollSnapshot, Poller};

/// Whole-system bikeshare feeds.
pub trait BikeshareSource: Send + Sync + 'static {
    fn station_status(
        &self,
    ) -> impl Future<Output = Result<Vec<StationStatusDto>, FetchError>> + Send;

    fn station_information(
        &self,
    ) -> impl Future<Output = Result<Vec<StationInfoDto>, FetchError>> + Send;
}

impl BikeshareSource for GbfsClient {
    async fn station_status(&self) -> Result<Vec<StationStatusDto>, FetchError> {
        self.get_station_status().await.map_err(FetchError::failed)
    }

    async fn station_information(&self) -> Result<Vec<StationInfoDto>, FetchError> {
        self.get_station_information()
            .await
            .map_err(FetchError::failed)
    }
}

/// Join the feeds for the requested stations, in request order.
///
/// A station missing from either feed is left out.
pub fn join_stations(
    station_ids: &[String],
    statuses: &[StationStatusDto],
    infos: &[StationInfoDto],
) -> Vec<BikeshareStation> {
    let statuses: HashMap<&str, &StationStatusDto> = statuses
        .iter()
        .map(|s| (s.station_id.as_str(), s))
        .collect();
    let infos: HashMap<&str, &StationInfoDto> =
        infos.iter().map(|i| (i.station_id.as_str(), i)).collect();

    station_ids
        .iter()
        .filter_map(|id| {
            let (Some(status), Some(info)) = (statuses.get(id.as_str()), infos.get(id.as_str()))
            else {
                debug!(station = %id, "bikeshare station missing from a feed, skipping");
                return None;
            };
            Some(BikeshareStation {
                id: id.clone(),
                name: info.name.clone(),
                capacity: info.capacity,
                regular_bikes_available: status.vehicles_of_type(VEHICLE_TYPE_BIKE),
                ebikes_available: status.vehicles_of_type(VEHICLE_TYPE_EBIKE),
                docks_available: status.num_docks_available,
                is_operational: status.is_renting && status.is_returning,
            })
        })
        .collect()
}

/// Fetch both feeds and pick out one station.
///
/// `Ok(None)` means the feeds were read but the station is not in both.
pub async fn fetch_station<S: BikeshareSource + ?Sized>(
    source: &S,
    station_id: &str,
) -> Result<Option<BikeshareStation>, FetchError> {
    let (statuses, infos) =
        futures::try_join!(source.station_status(), source.station_information())?;

    Ok(join_stations(&[station_id.to_string()], &statuses, &infos)
        .into_iter()
        .next())
}

/// Polls one bikeshare dock.
///
/// Each configured dock has its own poller, so a failed fetch only marks
/// that dock's state and leaves its last joined values visible.
pub struct BikeshareReconciler {
    station_id: String,
    poller: Poller<Option<BikeshareStation>>,
}

impl BikeshareReconciler {
    pub fn start<S: BikeshareSource>(
        station_id: &str,
        source: Arc<S>,
        schedule: PollSchedule,
    ) -> Self {
        let id = station_id.to_string();
        let poller = Poller::start(format!("bikeshare:{station_id}"), schedule, move || {
            let source = source.clone();
            let id = id.clone();
            async move { fetch_station(&*source, &id).await }
        });

        Self {
            station_id: station_id.to_string(),
            poller,
        }
    }

    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    pub async fn snapshot(&self) -> PollSnapshot<Option<BikeshareStation>> {
        self.poller.snapshot().await
    }

    pub async fn stop(&self) {
        self.poller.stop().await;
    }
}
