//! BusTime API response DTOs.

use serde::Deserialize;

/// Top-level wrapper; everything sits under `bustime-response`.
#[derive(Debug, Clone, Deserialize)]
pub struct BusTimeEnvelope {
    #[serde(rename = "bustime-response")]
    pub response: BusTimeResponse,
}

/// Predictions or errors for the requested stop.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BusTimeResponse {
    #[serde(default)]
    pub prd: Vec<BusTimePrediction>,

    #[serde(default)]
    pub error: Vec<BusTimeApiError>,
}

/// One predicted arrival.
#[derive(Debug, Clone, Deserialize)]
pub struct BusTimePrediction {
    /// Route designator.
    pub rt: String,

    /// Destination headsign.
    pub des: String,

    /// Minutes until arrival, or `DUE`/`DLY`.
    pub prdctdn: String,

    /// Stop name.
    pub stpnm: Option<String>,

    pub stpid: Option<String>,

    /// Route direction, e.g. `Northbound`.
    pub rtdir: Option<String>,

    /// Whether the vehicle is delayed.
    pub dly: Option<bool>,
}

/// An error entry reported in place of predictions.
#[derive(Debug, Clone, Deserialize)]
pub struct BusTimeApiError {
    pub msg: String,

    pub stpid: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_predictions() {
        let json = r#"{"bustime-response": {"prd": [
            {"tmstmp": "20240315 10:00", "typ": "A", "stpnm": "KING ST+WASHINGTON ST",
             "stpid": "1043", "vid": "123", "rt": "AT2", "rtdir": "Westbound",
             "des": "Lincolnia", "prdtm": "20240315 10:04", "dly": false,
             "prdctdn": "4"}
        ]}}"#;

        let envelope: BusTimeEnvelope = serde_json::from_str(json).unwrap();
        let prd = &envelope.response.prd[0];
        assert_eq!(prd.rt, "AT2");
        assert_eq!(prd.des, "Lincolnia");
        assert_eq!(prd.prdctdn, "4");
        assert_eq!(prd.stpnm.as_deref(), Some("KING ST+WASHINGTON ST"));
        assert!(envelope.response.error.is_empty());
    }

    #[test]
    fn parse_error_entry() {
        let json = r#"{"bustime-response": {"error": [
            {"stpid": "1043", "msg": "No arrival times"}
        ]}}"#;

        let envelope: BusTimeEnvelope = serde_json::from_str(json).unwrap();
        assert!(envelope.response.prd.is_empty());
        assert_eq!(envelope.response.error[0].msg, "No arrival times");
    }
}
