//! GBFS feed DTOs.

use serde::{Deserialize, Deserializer};

/// Vehicle type id for conventional bikes.
pub const VEHICLE_TYPE_BIKE: &str = "1";

/// Vehicle type id for e-bikes.
pub const VEHICLE_TYPE_EBIKE: &str = "2";

/// Common GBFS envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GbfsFeed<T> {
    pub data: T,
    pub last_updated: Option<i64>,
    pub ttl: Option<u32>,
}

/// The `data` object of both station feeds.
#[derive(Debug, Clone, Deserialize)]
pub struct StationList<T> {
    pub stations: Vec<T>,
}

/// One station from `station_status.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct StationStatusDto {
    pub station_id: String,

    #[serde(default)]
    pub num_bikes_available: u32,

    #[serde(default)]
    pub num_ebikes_available: u32,

    #[serde(default)]
    pub num_docks_available: u32,

    #[serde(default, deserialize_with = "flag")]
    pub is_renting: bool,

    #[serde(default, deserialize_with = "flag")]
    pub is_returning: bool,

    #[serde(default)]
    pub vehicle_types_available: Vec<VehicleTypeCount>,
}

impl StationStatusDto {
    /// Count for one vehicle type, zero when the type is not listed.
    pub fn vehicles_of_type(&self, vehicle_type_id: &str) -> u32 {
        self.vehicle_types_available
            .iter()
            .find(|v| v.vehicle_type_id == vehicle_type_id)
            .map(|v| v.count)
            .unwrap_or(0)
    }
}

/// Available vehicles of one type at a station.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleTypeCount {
    pub vehicle_type_id: String,
    pub count: u32,
}

/// One station from `station_information.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct StationInfoDto {
    pub station_id: String,

    pub name: String,

    #[serde(default)]
    pub capacity: u32,
}

/// Feeds encode flags as `1`/`0` or as JSON booleans; only `1`/`true` is set.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n == 1,
    })
}
