//! The dashboard: every reconciler for one configuration.

use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::bustime::{BusTimeClient, BusTimeConfig, BusTimeError};
use crate::catalog::{Catalog, CatalogError};
use crate::config::DashboardConfig;
use crate::domain::{BikeshareStation, BusStopBoard, RailArrival};
use crate::gbfs::{GbfsClient, GbfsConfig, GbfsError};
use crate::poller::{PollSchedule, PollSnapshot};
use crate::reconcile::{
    BikeshareReconciler, BikeshareSource, BusClients, BusProvider, BusReconciler, BusSource,
    RailReconciler, RailSource, RailStationHeader,
};
use crate::wmata::{WmataClient, WmataConfig, WmataError};

/// Errors from building or re-parameterizing a dashboard.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("WMATA client: {0}")]
    Wmata(#[from] WmataError),

    #[error("BusTime client: {0}")]
    BusTime(#[from] BusTimeError),

    #[error("GBFS client: {0}")]
    Gbfs(#[from] GbfsError),

    #[error("no rail panel at index {0}")]
    NoSuchPanel(usize),
}

/// Upstreams shared by every reconciler of one dashboard.
pub struct Sources<R, B, K> {
    pub rail: Arc<R>,
    pub bus: Arc<B>,
    pub bikeshare: Arc<K>,
}

/// A dashboard backed by the live HTTP clients.
pub type LiveDashboard = Dashboard<WmataClient, BusClients, GbfsClient>;

/// Owns one reconciler per configured rail station, bus stop and dock.
pub struct Dashboard<R, B, K> {
    catalog: Arc<Catalog>,
    sources: Sources<R, B, K>,
    prediction_schedule: PollSchedule,
    rail: RwLock<Vec<RailReconciler>>,
    bus: Vec<BusReconciler>,
    bikeshare: Vec<BikeshareReconciler>,
}

impl LiveDashboard {
    /// Build the HTTP clients from `config` and start polling.
    pub fn connect(config: &DashboardConfig, catalog: Arc<Catalog>) -> Result<Self, DashboardError> {
        let timeout = config.request_timeout_secs;
        let wmata = WmataClient::new(
            WmataConfig::new(&config.api_key)
                .with_base_url(&config.wmata_base_url)
                .with_limits(config.wmata_max_concurrent, timeout),
        )?;
        let bustime = config
            .bustime
            .as_ref()
            .map(|b| {
                BusTimeClient::new(BusTimeConfig::new(&b.base_url, &b.api_key).with_timeout(timeout))
            })
            .transpose()?;
        let gbfs = GbfsClient::new(
            GbfsConfig::new()
                .with_base_url(&config.gbfs_base_url)
                .with_timeout(timeout),
        )?;

        let sources = Sources {
            rail: Arc::new(wmata.clone()),
            bus: Arc::new(BusClients { wmata, bustime }),
            bikeshare: Arc::new(gbfs),
        };
        Self::start(config, catalog, sources)
    }
}

impl<R, B, K> Dashboard<R, B, K>
where
    R: RailSource,
    B: BusSource,
    K: BikeshareSource,
{
    /// Start every reconciler named by `config`.
    ///
    /// An unknown rail station fails the whole dashboard.
    pub fn start(
        config: &DashboardConfig,
        catalog: Arc<Catalog>,
        sources: Sources<R, B, K>,
    ) -> Result<Self, DashboardError> {
        let rail = config
            .rail_stations
            .iter()
            .map(|code| {
                RailReconciler::start(
                    code,
                    catalog.clone(),
                    sources.rail.clone(),
                    config.prediction_schedule,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        let bus = config
            .bus_stops
            .iter()
            .map(|stop| BusReconciler::start(stop, sources.bus.clone(), config.prediction_schedule))
            .collect();

        let bikeshare = config
            .bikeshare_stations
            .iter()
            .map(|id| {
                BikeshareReconciler::start(id, sources.bikeshare.clone(), config.bikeshare_schedule)
            })
            .collect();

        info!(
            rail = config.rail_stations.len(),
            bus = config.bus_stops.len(),
            bikeshare = config.bikeshare_stations.len(),
            "dashboard started"
        );

        Ok(Self {
            catalog,
            sources,
            prediction_schedule: config.prediction_schedule,
            rail: RwLock::new(rail),
            bus,
            bikeshare,
        })
    }

    /// Point the rail panel at `index` to a different station.
    ///
    /// The new poller starts with a fresh state. On error the current panel
    /// keeps running.
    pub async fn set_rail_station(
        &self,
        index: usize,
        code: &str,
    ) -> Result<RailStationHeader, DashboardError> {
        let mut rail = self.rail.write().await;
        if index >= rail.len() {
            return Err(DashboardError::NoSuchPanel(index));
        }

        let fresh = RailReconciler::start(
            code,
            self.catalog.clone(),
            self.sources.rail.clone(),
            self.prediction_schedule,
        )?;
        let header = fresh.header().clone();

        let old = std::mem::replace(&mut rail[index], fresh);
        old.stop().await;
        info!(panel = index, station = %header.code, "rail station changed");

        Ok(header)
    }

    /// Current state of every panel.
    pub async fn snapshot(&self) -> DashboardSnapshot {
        let mut rail_panels = Vec::new();
        for reconciler in self.rail.read().await.iter() {
            rail_panels.push(RailPanel {
                station: reconciler.header().clone(),
                state: reconciler.snapshot().await,
            });
        }

        let mut bus_panels = Vec::with_capacity(self.bus.len());
        for reconciler in &self.bus {
            bus_panels.push(BusPanel {
                stop_id: reconciler.stop_id().to_string(),
                provider: reconciler.provider(),
                state: reconciler.snapshot().await,
            });
        }

        let mut bikeshare_panels = Vec::with_capacity(self.bikeshare.len());
        for reconciler in &self.bikeshare {
            bikeshare_panels.push(BikesharePanel {
                station_id: reconciler.station_id().to_string(),
                state: reconciler.snapshot().await,
            });
        }

        DashboardSnapshot {
            generated_at: Local::now(),
            rail: rail_panels,
            bus: bus_panels,
            bikeshare: bikeshare_panels,
        }
    }

    /// Stop every poller. Snapshots stay readable afterwards.
    pub async fn stop_all(&self) {
        for reconciler in self.rail.read().await.iter() {
            reconciler.stop().await;
        }
        for reconciler in &self.bus {
            reconciler.stop().await;
        }
        for reconciler in &self.bikeshare {
            reconciler.stop().await;
        }
        info!("dashboard stopped");
    }
}

/// Everything on screen at one instant.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    /// Local wall-clock time, shown as the dashboard clock
    pub generated_at: DateTime<Local>,
    pub rail: Vec<RailPanel>,
    pub bus: Vec<BusPanel>,
    pub bikeshare: Vec<BikesharePanel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RailPanel {
    pub station: RailStationHeader,
    #[serde(flatten)]
    pub state: PollSnapshot<Vec<RailArrival>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BusPanel {
    pub stop_id: String,
    pub provider: BusProvider,
    #[serde(flatten)]
    pub state: PollSnapshot<BusStopBoard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BikesharePanel {
    pub station_id: String,
    #[serde(flatten)]
    pub state: PollSnapshot<Option<BikeshareStation>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bustime::BusTimeResponse;
    use crate::domain::{Line, RailPrediction, RailStatus};
    use crate::gbfs::{StationInfoDto, StationStatusDto};
    use crate::poller::FetchError;
    use crate::wmata::BusPredictionResponse;
    use std::time::Duration;

    struct FixedRail;

    impl RailSource for FixedRail {
        async fn station_predictions(
            &self,
            code: &str,
        ) -> Result<Vec<RailPrediction>, FetchError> {
            Ok(vec![RailPrediction {
                line: Line::Red,
                destination_code: None,
                destination_name: format!("Train at {code}"),
                status: RailStatus::Minutes(3),
            }])
        }
    }

    struct FixedBus;

    impl BusSource for FixedBus {
        async fn wmata_predictions(
            &self,
            _stop_id: &str,
        ) -> Result<BusPredictionResponse, FetchError> {
            Ok(serde_json::from_str(
                r#"{"StopName": "H ST+8TH ST NE", "Predictions": [
                    {"RouteID": "X2", "DirectionText": "East", "Minutes": 4}
                ]}"#,
            )
            .unwrap())
        }

        async fn bustime_predictions(&self, _stop_id: &str) -> Result<BusTimeResponse, FetchError> {
            Err(FetchError::failed("not used"))
        }
    }

    struct FixedFeeds;

    impl BikeshareSource for FixedFeeds {
        async fn station_status(&self) -> Result<Vec<StationStatusDto>, FetchError> {
            Ok(serde_json::from_str(
                r#"[{"station_id": "S1", "num_docks_available": 5,
                     "is_renting": 1, "is_returning": 1,
                     "vehicle_types_available": [{"vehicle_type_id": "1", "count": 2}]}]"#,
            )
            .unwrap())
        }

        async fn station_information(&self) -> Result<Vec<StationInfoDto>, FetchError> {
            Ok(vec![StationInfoDto {
                station_id: "S1".into(),
                name: "Union Station".into(),
                capacity: 12,
            }])
        }
    }

    fn catalog() -> Arc<Catalog> {
        Arc::new(
            Catalog::from_json(
                r#"{"stations": [
                    {"code": ["A01", "C01"], "name": "Metro Center", "lines": ["RD", "OR"]},
                    {"code": ["B11"], "name": "Glenmont", "lines": ["RD"]}
                ]}"#,
            )
            .unwrap(),
        )
    }

    fn sources() -> Sources<FixedRail, FixedBus, FixedFeeds> {
        Sources {
            rail: Arc::new(FixedRail),
            bus: Arc::new(FixedBus),
            bikeshare: Arc::new(FixedFeeds),
        }
    }

    fn config() -> DashboardConfig {
        DashboardConfig::new("k")
            .with_rail_stations(vec!["A01".into()])
            .with_bus_stops(vec!["1001195".into()])
            .with_bikeshare_stations(vec!["S1".into()])
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_covers_every_panel() {
        let dashboard = Dashboard::start(&config(), catalog(), sources()).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let snapshot = dashboard.snapshot().await;

        assert_eq!(snapshot.rail.len(), 1);
        assert_eq!(snapshot.rail[0].station.name, "Metro Center");
        assert_eq!(snapshot.rail[0].state.result.as_ref().unwrap().len(), 2);

        assert_eq!(snapshot.bus[0].provider, BusProvider::Wmata);
        let board = snapshot.bus[0].state.result.as_ref().unwrap();
        assert_eq!(board.stop_name, "H St & 8th St NE");

        let dock = snapshot.bikeshare[0].state.result.clone().flatten().unwrap();
        assert_eq!(dock.regular_bikes_available, 2);
        assert_eq!(dock.capacity, 12);

        dashboard.stop_all().await;
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_rail_station_fails_start() {
        let config = config().with_rail_stations(vec!["Z99".into()]);
        let result = Dashboard::start(&config, catalog(), sources());
        assert!(matches!(
            result,
            Err(DashboardError::Catalog(CatalogError::NotFound(_)))
        ));
    }

    #[tokio::test]
    async fn connect_rejects_unusable_api_key() {
        let config = DashboardConfig::new("bad\nkey").with_rail_stations(vec![]);
        let result = LiveDashboard::connect(&config, catalog());
        assert!(matches!(
            result,
            Err(DashboardError::Wmata(WmataError::InvalidApiKey))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn set_rail_station_restarts_panel() {
        let dashboard = Dashboard::start(&config(), catalog(), sources()).unwrap();
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(dashboard.snapshot().await.rail[0].state.countdown, 7);

        let header = dashboard.set_rail_station(0, "B11").await.unwrap();
        assert_eq!(header.name, "Glenmont");

        let panel = &dashboard.snapshot().await.rail[0];
        assert_eq!(panel.station.name, "Glenmont");
        assert_eq!(panel.state.countdown, 10);

        dashboard.stop_all().await;
    }

    #[tokio::test(start_paused = true)]
    async fn set_rail_station_rejects_bad_input() {
        let dashboard = Dashboard::start(&config(), catalog(), sources()).unwrap();

        assert!(matches!(
            dashboard.set_rail_station(3, "B11").await,
            Err(DashboardError::NoSuchPanel(3))
        ));
        assert!(matches!(
            dashboard.set_rail_station(0, "Z99").await,
            Err(DashboardError::Catalog(_))
        ));

        // The existing panel is untouched.
        assert_eq!(dashboard.snapshot().await.rail[0].station.name, "Metro Center");
    }

    #[tokio::test(start_paused = true)]
    async fn stop_all_freezes_state() {
        let dashboard = Dashboard::start(&config(), catalog(), sources()).unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        dashboard.stop_all().await;
        let frozen = dashboard.snapshot().await;

        tokio::time::sleep(Duration::from_secs(120)).await;

        let later = dashboard.snapshot().await;
        assert_eq!(later.rail[0].state, frozen.rail[0].state);
        assert_eq!(later.bus[0].state, frozen.bus[0].state);
        assert_eq!(later.bikeshare[0].state, frozen.bikeshare[0].state);
    }

    #[tokio::test(start_paused = true)]
    async fn snapshot_serializes_flat_panels() {
        let dashboard = Dashboard::start(&config(), catalog(), sources()).unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;

        let json = serde_json::to_value(dashboard.snapshot().await).unwrap();

        assert_eq!(json["rail"][0]["station"]["code"], "A01");
        assert_eq!(json["rail"][0]["countdown"], 10);
        assert_eq!(json["bus"][0]["provider"], "wmata");
        assert_eq!(json["bikeshare"][0]["result"]["name"], "Union Station");
        assert!(json["generated_at"].is_string());
    }
}
