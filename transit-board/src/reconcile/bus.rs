//! Bus predictions for one stop, from whichever provider serves it.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::bustime::{BusTimeClient, BusTimeResponse};
use crate::domain::{BusPrediction, BusStopBoard};
use crate::normalize::bus_name;
use crate::poller::{FetchError, FetchSize, PollSchedule, PollSnapshot, Poller};
use crate::wmata::{BusPredictionResponse, WmataClient};

/// Length of the stop ids used by the regional BusTime system.
const BUSTIME_STOP_ID_LEN: usize = 4;

/// Upstream that serves a given stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BusProvider {
    Wmata,
    BusTime,
}

impl BusProvider {
    /// Choose a provider from the shape of the stop id alone.
    pub fn for_stop(stop_id: &str) -> Self {
        if stop_id.chars().count() == BUSTIME_STOP_ID_LEN {
            BusProvider::BusTime
        } else {
            BusProvider::Wmata
        }
    }
}

impl fmt::Display for BusProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusProvider::Wmata => write!(f, "wmata"),
            BusProvider::BusTime => write!(f, "bustime"),
        }
    }
}

/// Raw access to both bus providers.
pub trait BusSource: Send + Sync + 'static {
    fn wmata_predictions(
        &self,
        stop_id: &str,
    ) -> impl Future<Output = Result<BusPredictionResponse, FetchError>> + Send;

    fn bustime_predictions(
        &self,
        stop_id: &str,
    ) -> impl Future<Output = Result<BusTimeResponse, FetchError>> + Send;
}

/// The live clients. BusTime is optional; without it only WMATA stops work.
#[derive(Debug, Clone)]
pub struct BusClients {
    pub wmata: WmataClient,
    pub bustime: Option<BusTimeClient>,
}

impl BusSource for BusClients {
    async fn wmata_predictions(&self, stop_id: &str) -> Result<BusPredictionResponse, FetchError> {
        self.wmata
            .get_bus_predictions(stop_id)
            .await
            .map_err(FetchError::failed)
    }

    async fn bustime_predictions(&self, stop_id: &str) -> Result<BusTimeResponse, FetchError> {
        let client = self
            .bustime
            .as_ref()
            .ok_or_else(|| FetchError::failed("BusTime is not configured"))?;
        client
            .get_predictions(stop_id)
            .await
            .map_err(FetchError::failed)
    }
}

/// Normalize a WMATA bus response.
pub fn normalize_wmata(response: &BusPredictionResponse) -> BusStopBoard {
    BusStopBoard {
        stop_name: response.stop_name.as_deref().map(bus_name).unwrap_or_default(),
        predictions: response
            .predictions
            .iter()
            .map(|p| BusPrediction {
                route_id: p.route_id.clone(),
                direction_text: bus_name(&p.direction_text),
                minutes: p.minutes,
            })
            .collect(),
    }
}

/// Normalize a BusTime response.
///
/// Entries whose countdown is neither a number nor `DUE` (for example
/// `DLY`) carry no usable arrival time and are skipped.
pub fn normalize_bustime(response: &BusTimeResponse) -> BusStopBoard {
    let stop_name = response
        .prd
        .iter()
        .find_map(|p| p.stpnm.as_deref())
        .map(bus_name)
        .unwrap_or_default();

    let predictions = response
        .prd
        .iter()
        .filter_map(|p| match parse_countdown(&p.prdctdn) {
            Some(minutes) => Some(BusPrediction {
                route_id: p.rt.clone(),
                direction_text: bus_name(&p.des),
                minutes,
            }),
            None => {
                debug!(route = %p.rt, countdown = %p.prdctdn, "skipping prediction without a time");
                None
            }
        })
        .collect();

    BusStopBoard {
        stop_name,
        predictions,
    }
}

/// Minutes from a BusTime countdown field.
pub fn parse_countdown(countdown: &str) -> Option<i64> {
    let countdown = countdown.trim();
    if countdown.eq_ignore_ascii_case("DUE") {
        return Some(0);
    }
    countdown.parse().ok()
}

/// Fetch and normalize one stop's board from its provider.
pub async fn fetch_stop_board<S: BusSource + ?Sized>(
    source: &S,
    stop_id: &str,
) -> Result<BusStopBoard, FetchError> {
    match BusProvider::for_stop(stop_id) {
        BusProvider::Wmata => Ok(normalize_wmata(&source.wmata_predictions(stop_id).await?)),
        BusProvider::BusTime => Ok(normalize_bustime(&source.bustime_predictions(stop_id).await?)),
    }
}

impl FetchSize for BusStopBoard {
    fn fetch_size(&self) -> usize {
        self.predictions.len()
    }
}

/// Polls one bus stop.
pub struct BusReconciler {
    stop_id: String,
    provider: BusProvider,
    poller: Poller<BusStopBoard>,
}

impl BusReconciler {
    pub fn start<S: BusSource>(stop_id: &str, source: Arc<S>, schedule: PollSchedule) -> Self {
        let provider = BusProvider::for_stop(stop_id);
        let id = stop_id.to_string();

        let poller = Poller::start(format!("bus:{stop_id}"), schedule, move || {
            let source = source.clone();
            let id = id.clone();
            async move { fetch_stop_board(&*source, &id).await }
        });

        Self {
            stop_id: stop_id.to_string(),
            provider,
            poller,
        }
    }

    pub fn stop_id(&self) -> &str {
        &self.stop_id
    }

    pub fn provider(&self) -> BusProvider {
        self.provider
    }

    pub async fn snapshot(&self) -> PollSnapshot<BusStopBoard> {
        self.poller.snapshot().await
    }

    pub async fn stop(&self) {
        self.poller.stop().await;
    }
}
