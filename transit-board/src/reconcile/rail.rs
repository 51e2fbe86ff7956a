//! Rail arrivals for one station, merged across its platform codes.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::catalog::{Catalog, CatalogError};
use crate::domain::{Line, RailArrival, RailPrediction, StationCode};
use crate::normalize::rail_name;
use crate::poller::{FetchError, PollSchedule, PollSnapshot, Poller};
use crate::wmata::WmataClient;

/// Anything that can report predictions for a single platform code.
///
/// This abstraction allows the reconciler to be tested with mock data.
pub trait RailSource: Send + Sync + 'static {
    fn station_predictions(
        &self,
        code: &str,
    ) -> impl Future<Output = Result<Vec<RailPrediction>, FetchError>> + Send;
}

impl RailSource for WmataClient {
    async fn station_predictions(&self, code: &str) -> Result<Vec<RailPrediction>, FetchError> {
        self.get_rail_predictions(code)
            .await
            .map_err(FetchError::failed)
    }
}

/// Station header shown above the arrivals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RailStationHeader {
    pub code: StationCode,
    pub name: String,
    pub lines: Vec<Line>,
}

/// Collapse identical predictions and order them for display.
///
/// Predictions equal in line, destination code, destination name and
/// status are kept once. Ordering is `BRD`, then `ARR`, then ascending
/// minutes; ties keep their input order.
pub fn merge_predictions(predictions: impl IntoIterator<Item = RailPrediction>) -> Vec<RailPrediction> {
    let mut seen = HashSet::new();
    let mut merged: Vec<RailPrediction> = predictions
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .collect();
    merged.sort_by_key(|p| p.status.sort_key());
    merged
}

/// Display name for a prediction's destination.
///
/// A destination code is resolved through the catalog, falling back to the
/// raw code when the catalog does not know it. Without a code, the reported
/// name is expanded instead.
pub fn resolve_destination(prediction: &RailPrediction, catalog: &Catalog) -> String {
    match &prediction.destination_code {
        Some(code) => match catalog.lookup_by_code(code) {
            Ok(station) => station.name.clone(),
            Err(e) => {
                debug!(error = %e, "destination not in catalog, showing raw code");
                code.clone()
            }
        },
        None => rail_name(&prediction.destination_name),
    }
}

/// Fetch every code of a station and build its board.
///
/// Any failed code fails the whole cycle, so a partial board never
/// replaces a complete one.
pub async fn fetch_station_board<S: RailSource + ?Sized>(
    source: &S,
    catalog: &Catalog,
    codes: &[StationCode],
) -> Result<Vec<RailArrival>, FetchError> {
    let batches =
        futures::future::try_join_all(codes.iter().map(|c| source.station_predictions(c.as_str())))
            .await?;

    Ok(merge_predictions(batches.into_iter().flatten())
        .into_iter()
        .map(|p| RailArrival {
            destination: resolve_destination(&p, catalog),
            label: p.status.label(),
            line: p.line,
            status: p.status,
        })
        .collect())
}

/// Polls one rail station, including all of its companion codes.
pub struct RailReconciler {
    header: RailStationHeader,
    poller: Poller<Vec<RailArrival>>,
}

impl RailReconciler {
    /// Start polling the station owning `code`.
    ///
    /// Fails with [`CatalogError::NotFound`] for an unknown code; that is a
    /// configuration error, not a transient one.
    pub fn start<S: RailSource>(
        code: &str,
        catalog: Arc<Catalog>,
        source: Arc<S>,
        schedule: PollSchedule,
    ) -> Result<Self, CatalogError> {
        let station = catalog.lookup_by_code(code)?;
        let primary = StationCode::parse(code).map_err(|_| CatalogError::NotFound(code.into()))?;

        let mut codes = vec![primary];
        codes.extend(catalog.companion_codes(code)?);

        let header = RailStationHeader {
            code: primary,
            name: rail_name(&station.name),
            lines: station.lines.clone(),
        };

        let poller = Poller::start(format!("rail:{primary}"), schedule, move || {
            let source = source.clone();
            let catalog = catalog.clone();
            let codes = codes.clone();
            async move { fetch_station_board(&*source, &catalog, &codes).await }
        });

        Ok(Self { header, poller })
    }

    pub fn header(&self) -> &RailStationHeader {
        &self.header
    }

    pub async fn snapshot(&self) -> PollSnapshot<Vec<RailArrival>> {
        self.poller.snapshot().await
    }

    pub async fn stop(&self) {
        self.poller.stop().await;
    }
}
