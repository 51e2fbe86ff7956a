//! Conversion from WMATA DTOs to domain types.

use crate::domain::{Line, RailPrediction, RailStatus};

use super::types::TrainDto;

/// Convert one reported train into a prediction.
///
/// Missing fields become empty strings rather than errors; a partially
/// filled train still belongs on the board. Empty destination codes are
/// treated as absent.
pub fn convert_train(dto: &TrainDto) -> RailPrediction {
    RailPrediction {
        line: Line::from_code(dto.line.as_deref().unwrap_or_default()),
        destination_code: dto
            .destination_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string),
        destination_name: dto.destination_name.clone().unwrap_or_default(),
        status: RailStatus::parse(dto.min.as_deref().unwrap_or_default()),
    }
}
