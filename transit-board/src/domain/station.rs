//! Rail station code types.

use std::fmt;

use serde::{Serialize, Serializer};

/// Error returned when parsing an invalid station code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station code: {reason}")]
pub struct InvalidStationCode {
    reason: &'static str,
}

/// A valid rail platform code, e.g. `A01`.
///
/// Codes are one uppercase ASCII letter (the line segment) followed by two
/// ASCII digits. Transfer stations have one code per platform level, which
/// is why a physical station may own several codes.
///
/// # Examples
///
/// ```
/// use transit_board::domain::StationCode;
///
/// let metro_center = StationCode::parse("A01").unwrap();
/// assert_eq!(metro_center.as_str(), "A01");
///
/// // Lowercase is rejected
/// assert!(StationCode::parse("a01").is_err());
///
/// // Wrong shape is rejected
/// assert!(StationCode::parse("A1").is_err());
/// assert!(StationCode::parse("AA1").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StationCode([u8; 3]);

impl StationCode {
    /// Parse a station code from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidStationCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 3 {
            return Err(InvalidStationCode {
                reason: "must be exactly 3 characters",
            });
        }

        if !bytes[0].is_ascii_uppercase() {
            return Err(InvalidStationCode {
                reason: "must start with an uppercase ASCII letter",
            });
        }

        if !bytes[1].is_ascii_digit() || !bytes[2].is_ascii_digit() {
            return Err(InvalidStationCode {
                reason: "must end with two ASCII digits",
            });
        }

        Ok(StationCode([bytes[0], bytes[1], bytes[2]]))
    }

    /// Parse a code, accepting lowercase and surrounding whitespace.
    ///
    /// Used for user-supplied configuration.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidStationCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII letters and digits are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.as_str())
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StationCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
