//! WMATA API response DTOs.
//!
//! Field names follow the API's PascalCase. Optional fields are `Option`
//! because WMATA sends `null` for trains without a destination.

use serde::Deserialize;

/// Response from `GetPrediction/{StationCodes}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RailPredictionResponse {
    #[serde(default)]
    pub trains: Vec<TrainDto>,
}

/// One train approaching a platform.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TrainDto {
    /// Number of cars, or `-` when unknown.
    pub car: Option<String>,

    /// Abbreviated destination name.
    pub destination: Option<String>,

    /// Destination platform code; `null` for non-revenue trains.
    pub destination_code: Option<String>,

    /// Full destination name.
    pub destination_name: Option<String>,

    /// Track group at the platform.
    pub group: Option<String>,

    /// Two-letter line code, or `--`/`No` for non-revenue trains.
    pub line: Option<String>,

    /// Platform code this prediction was reported for.
    pub location_code: Option<String>,

    /// Minutes to arrival, `ARR`, `BRD`, or `---`.
    pub min: Option<String>,
}

/// Response from `jPredictions?StopID=`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BusPredictionResponse {
    #[serde(default)]
    pub predictions: Vec<BusPredictionDto>,

    pub stop_name: Option<String>,
}

/// One bus approaching a stop.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BusPredictionDto {
    #[serde(rename = "RouteID")]
    pub route_id: String,

    pub direction_text: String,

    pub direction_num: Option<String>,

    pub minutes: i64,

    #[serde(rename = "TripID")]
    pub trip_id: Option<String>,

    #[serde(rename = "VehicleID")]
    pub vehicle_id: Option<String>,
}
