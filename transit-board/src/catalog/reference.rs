//! Station reference table and lookups.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Line, StationCode};

use super::error::CatalogError;

/// Station data bundled with the binary.
const EMBEDDED_STATIONS: &str = include_str!("../../data/stations.json");

/// Wrapper for the reference file.
#[derive(Debug, Deserialize)]
struct StationsFile {
    stations: Vec<StationEntryDto>,
}

/// One entry of the reference file, as stored on disk.
#[derive(Debug, Deserialize)]
struct StationEntryDto {
    code: Vec<String>,
    name: String,
    lines: Vec<String>,
}

/// One physical station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StationRef {
    /// Platform codes for this station. Never empty.
    pub codes: Vec<StationCode>,
    pub name: String,
    pub lines: Vec<Line>,
}

impl StationRef {
    /// The code used when this station is offered for selection.
    pub fn primary_code(&self) -> StationCode {
        self.codes[0]
    }
}

/// Immutable station lookup.
///
/// Every code maps to exactly one [`StationRef`]; construction fails
/// otherwise.
#[derive(Debug, Clone)]
pub struct Catalog {
    stations: Vec<StationRef>,
    by_code: HashMap<StationCode, usize>,
}

impl Catalog {
    /// Load the station table bundled with the binary.
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_STATIONS)
    }

    /// Load a station table from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: StationsFile = serde_json::from_str(json).map_err(|e| CatalogError::Load {
            message: e.to_string(),
        })?;

        let stations = file
            .stations
            .into_iter()
            .map(convert_entry)
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_stations(stations)
    }

    /// Build a catalog from already-validated entries.
    pub fn from_stations(stations: Vec<StationRef>) -> Result<Self, CatalogError> {
        let mut by_code = HashMap::new();

        for (idx, station) in stations.iter().enumerate() {
            if station.codes.is_empty() {
                return Err(CatalogError::Load {
                    message: format!("station {} has no codes", station.name),
                });
            }
            for code in &station.codes {
                if by_code.insert(*code, idx).is_some() {
                    return Err(CatalogError::Load {
                        message: format!("duplicate code {code}"),
                    });
                }
            }
        }

        Ok(Self { stations, by_code })
    }

    /// Find the station owning `code`.
    pub fn lookup_by_code(&self, code: &str) -> Result<&StationRef, CatalogError> {
        StationCode::parse(code)
            .ok()
            .and_then(|c| self.by_code.get(&c))
            .map(|&idx| &self.stations[idx])
            .ok_or_else(|| CatalogError::NotFound(code.to_string()))
    }

    /// All stations, ordered by display name.
    ///
    /// Comparison is case-insensitive, with spaces and punctuation ranking
    /// before digits and letters, which matches how a browser's default
    /// collation orders these names.
    pub fn all_stations(&self) -> Vec<&StationRef> {
        let mut sorted: Vec<&StationRef> = self.stations.iter().collect();
        sorted.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.name.cmp(&b.name))
        });
        sorted
    }

    /// The other codes sharing a station with `code`, excluding `code`.
    pub fn companion_codes(&self, code: &str) -> Result<Vec<StationCode>, CatalogError> {
        let station = self.lookup_by_code(code)?;
        Ok(station
            .codes
            .iter()
            .filter(|c| c.as_str() != code)
            .copied()
            .collect())
    }

    /// Number of physical stations.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

fn convert_entry(dto: StationEntryDto) -> Result<StationRef, CatalogError> {
    let codes = dto
        .code
        .iter()
        .map(|c| {
            StationCode::parse(c).map_err(|e| CatalogError::Load {
                message: format!("{}: {e}", dto.name),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(StationRef {
        codes,
        name: dto.name,
        lines: dto.lines.iter().map(|l| Line::from_code(l)).collect(),
    })
}
