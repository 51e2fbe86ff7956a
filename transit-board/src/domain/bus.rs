//! Bus prediction types.

use serde::Serialize;

/// One bus prediction, in the same shape whichever provider produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusPrediction {
    pub route_id: String,
    pub direction_text: String,
    pub minutes: i64,
}

impl BusPrediction {
    /// Display label: zero minutes shows as `ARR`.
    pub fn label(&self) -> String {
        if self.minutes <= 0 {
            "ARR".to_string()
        } else {
            format!("{} min", self.minutes)
        }
    }
}

/// Everything shown for one bus stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusStopBoard {
    pub stop_name: String,
    pub predictions: Vec<BusPrediction>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label() {
        let mut prediction = BusPrediction {
            route_id: "X2".into(),
            direction_text: "East to Minnesota Ave Station".into(),
            minutes: 0,
        };
        assert_eq!(prediction.label(), "ARR");

        prediction.minutes = 6;
        assert_eq!(prediction.label(), "6 min");
    }
}
