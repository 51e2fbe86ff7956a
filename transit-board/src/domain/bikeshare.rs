//! Bikeshare dock availability.

use serde::Serialize;

/// A bikeshare dock, joined from the status and information feeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BikeshareStation {
    pub id: String,
    pub name: String,
    pub capacity: u32,
    pub regular_bikes_available: u32,
    pub ebikes_available: u32,
    pub docks_available: u32,
    /// Renting and returning are both enabled.
    pub is_operational: bool,
}
