//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::catalog::StationRef;
use crate::domain::{Line, StationCode};

/// One selectable station.
#[derive(Debug, Serialize)]
pub struct StationResult {
    /// Code used to select this station
    pub code: StationCode,

    /// Every platform code at this station
    pub codes: Vec<StationCode>,

    pub name: String,

    pub lines: Vec<Line>,
}

impl StationResult {
    /// Create from a catalog entry.
    pub fn from_station(station: &StationRef) -> Self {
        Self {
            code: station.primary_code(),
            codes: station.codes.clone(),
            name: station.name.clone(),
            lines: station.lines.clone(),
        }
    }
}

/// Station list, in display order.
#[derive(Debug, Serialize)]
pub struct StationListResponse {
    pub stations: Vec<StationResult>,
}

/// Request to change the station shown by a rail panel.
#[derive(Debug, Deserialize)]
pub struct SetRailStationRequest {
    /// Station code, case-insensitive
    pub code: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
