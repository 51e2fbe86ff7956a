//! Rail prediction types.

use std::fmt;

use serde::{Serialize, Serializer};

use super::Line;

/// The minutes-or-status field of a rail prediction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RailStatus {
    /// `BRD`: the train is boarding.
    Boarding,
    /// `ARR`: the train is arriving.
    Arriving,
    /// A non-negative minute count.
    Minutes(u32),
    /// Anything else upstream sends (`---`, empty), kept verbatim.
    Other(String),
}

impl RailStatus {
    /// Parse the upstream `Min` field. Never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "BRD" => RailStatus::Boarding,
            "ARR" => RailStatus::Arriving,
            other => match other.parse::<u32>() {
                Ok(mins) => RailStatus::Minutes(mins),
                Err(_) => RailStatus::Other(other.to_string()),
            },
        }
    }

    /// Ordering key for departure boards.
    ///
    /// `BRD` ranks before `ARR`, both rank before any minute count, minute
    /// counts ascend, and unparseable statuses come last.
    pub fn sort_key(&self) -> (u8, u32) {
        match self {
            RailStatus::Boarding => (0, 0),
            RailStatus::Arriving => (1, 0),
            RailStatus::Minutes(mins) => (2, *mins),
            RailStatus::Other(_) => (3, 0),
        }
    }

    /// Display label: a zero-minute count shows as `ARR`.
    pub fn label(&self) -> String {
        match self {
            RailStatus::Boarding => "BRD".to_string(),
            RailStatus::Arriving | RailStatus::Minutes(0) => "ARR".to_string(),
            RailStatus::Minutes(mins) => format!("{mins} min"),
            RailStatus::Other(raw) => raw.clone(),
        }
    }
}

impl fmt::Display for RailStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RailStatus::Boarding => f.write_str("BRD"),
            RailStatus::Arriving => f.write_str("ARR"),
            RailStatus::Minutes(mins) => write!(f, "{mins}"),
            RailStatus::Other(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for RailStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One train prediction as reported for a single platform code.
///
/// Equality and hashing cover exactly the four reported fields, so two
/// identical predictions seen from companion platforms collapse to one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RailPrediction {
    pub line: Line,
    pub destination_code: Option<String>,
    pub destination_name: String,
    pub status: RailStatus,
}

/// A prediction ready for display, with the destination resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RailArrival {
    pub line: Line,
    pub destination: String,
    pub status: RailStatus,
    pub label: String,
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn status() -> impl Strategy<Value = RailStatus> {
        prop_oneof![
            Just(RailStatus::Boarding),
            Just(RailStatus::Arriving),
            (0u32..120).prop_map(RailStatus::Minutes),
        ]
    }

    proptest! {
        /// Sentinels always precede numbers; BRD precedes ARR; numbers ascend.
        #[test]
        fn sort_order(a in status(), b in status()) {
            let expected = match (&a, &b) {
                (RailStatus::Boarding, RailStatus::Boarding) => std::cmp::Ordering::Equal,
                (RailStatus::Boarding, _) => std::cmp::Ordering::Less,
                (_, RailStatus::Boarding) => std::cmp::Ordering::Greater,
                (RailStatus::Arriving, RailStatus::Arriving) => std::cmp::Ordering::Equal,
                (RailStatus::Arriving, _) => std::cmp::Ordering::Less,
                (_, RailStatus::Arriving) => std::cmp::Ordering::Greater,
                (RailStatus::Minutes(x), RailStatus::Minutes(y)) => x.cmp(y),
                _ => unreachable!(),
            };
            prop_assert_eq!(a.sort_key().cmp(&b.sort_key()), expected);
        }

        /// Parsing a rendered minute count gives the count back.
        #[test]
        fn minutes_parse(n in 0u32..1000) {
            prop_assert_eq!(RailStatus::parse(&n.to_string()), RailStatus::Minutes(n));
        }
    }
}
