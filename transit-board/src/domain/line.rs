//! Rail line identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A rail line, identified upstream by a two-letter code.
///
/// Non-revenue trains are reported with placeholder codes such as `--` or
/// `No`; those are kept verbatim in [`Line::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Line {
    Red,
    Blue,
    Orange,
    Green,
    Yellow,
    Silver,
    Other(String),
}

impl Line {
    /// Parse an upstream line code. Never fails.
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "RD" => Line::Red,
            "BL" => Line::Blue,
            "OR" => Line::Orange,
            "GR" => Line::Green,
            "YL" => Line::Yellow,
            "SV" => Line::Silver,
            other => Line::Other(other.to_string()),
        }
    }

    /// The two-letter code for this line.
    pub fn code(&self) -> &str {
        match self {
            Line::Red => "RD",
            Line::Blue => "BL",
            Line::Orange => "OR",
            Line::Green => "GR",
            Line::Yellow => "YL",
            Line::Silver => "SV",
            Line::Other(code) => code,
        }
    }
}

impl From<String> for Line {
    fn from(code: String) -> Self {
        Line::from_code(&code)
    }
}

impl From<Line> for String {
    fn from(line: Line) -> Self {
        line.code().to_string()
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
