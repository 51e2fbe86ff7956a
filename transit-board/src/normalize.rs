//! Display-name rewriting for upstream station and stop names.
//!
//! Upstream feeds abbreviate aggressively ("Shady Grv", "NewCrlton") and
//! bus feeds often shout ("H ST+8TH ST NE"). The rules here are applied in
//! a fixed order; later rules see the output of earlier ones.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// A single pattern-to-replacement rewrite.
struct Rule {
    pattern: Regex,
    replacement: &'static str,
}

fn rule(pattern: &str, replacement: &'static str) -> Rule {
    Rule {
        pattern: Regex::new(pattern).unwrap_or_else(|e| panic!("bad rule {pattern}: {e}")),
        replacement,
    }
}

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("bad pattern {pattern}: {e}"))
}

static RAIL_RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        rule(r"\bGrv$", "Grove"),
        rule(r"\bN Car", "New Car"),
        rule(r"\bMt ?Vern\b", "Mount Vernon"),
        rule(r"NewCrlton", "New Carrollton"),
        // Matching the full word too keeps this from re-expanding "Square".
        rule(r"Sq(?:uare)?", "Square"),
        rule(r"\bAve?$", "Avenue"),
    ]
});

static WORD: LazyLock<Regex> = LazyLock::new(|| regex(r"[A-Za-z0-9]+"));
static DIRECTION: LazyLock<Regex> = LazyLock::new(|| regex(r"(?i)\b(?:nw|ne|sw|se|n|s|e|w)\b"));
static AFTER_PLUS: LazyLock<Regex> = LazyLock::new(|| regex(r"\+([a-z])"));
static AFTER_DASH: LazyLock<Regex> = LazyLock::new(|| regex(r"-([a-z])"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| regex(r"\s+"));
static TRAILING_AV: LazyLock<Regex> = LazyLock::new(|| regex(r"\bAv$"));

/// Expand rail destination abbreviations.
///
/// ```
/// use transit_board::normalize::rail_name;
///
/// assert_eq!(rail_name("Shady Grv"), "Shady Grove");
/// assert_eq!(rail_name("NewCrlton"), "New Carrollton");
/// ```
pub fn rail_name(name: &str) -> String {
    RAIL_RULES.iter().fold(name.to_string(), |acc, rule| {
        rule.pattern.replace_all(&acc, rule.replacement).into_owned()
    })
}

/// Tidy a bus stop name or direction for display.
///
/// The letter after each `+` or `-` is capitalised first, so the
/// title-casing of all-capital words that follows sees the final letters.
/// Then compass directions are capitalised, `+` becomes ` & `, whitespace
/// is collapsed, and a trailing `Av` becomes `Ave`.
///
/// ```
/// use transit_board::normalize::bus_name;
///
/// assert_eq!(bus_name("H ST+8TH ST NE"), "H St & 8th St NE");
/// ```
pub fn bus_name(name: &str) -> String {
    let s = AFTER_PLUS.replace_all(name, |caps: &Captures| format!("+{}", caps[1].to_uppercase()));
    let s = AFTER_DASH.replace_all(&s, |caps: &Captures| format!("-{}", caps[1].to_uppercase()));
    let s = WORD.replace_all(&s, |caps: &Captures| soften_shouting(&caps[0]));
    let s = DIRECTION.replace_all(&s, |caps: &Captures| caps[0].to_uppercase());
    let s = s.replace('+', " & ");
    let s = WHITESPACE.replace_all(s.trim(), " ");
    TRAILING_AV.replace_all(&s, "Ave").into_owned()
}

/// `ST` -> `St`, `8TH` -> `8th`; single letters and mixed case are left alone.
fn soften_shouting(word: &str) -> String {
    let has_upper = word.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = word.chars().any(|c| c.is_ascii_lowercase());
    if word.len() < 2 || !has_upper || has_lower {
        return word.to_string();
    }

    let mut chars = word.chars();
    let first = chars.next().map(String::from).unwrap_or_default();
    first + &chars.as_str().to_ascii_lowercase()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn rail_token() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec![
            "Grv", "N", "Car", "Mt", "Vern", "MtVern", "NewCrlton", "Sq", "Square", "Av", "Ave",
            "Avenue", "Shady", "Branch", " ",
        ])
    }

    proptest! {
        /// Expanded rail names are left alone by a second pass.
        #[test]
        fn rail_name_idempotent(tokens in prop::collection::vec(rail_token(), 0..6)) {
            let name = tokens.join(" ");
            let once = rail_name(&name);
            prop_assert_eq!(rail_name(&once), once);
        }

        /// No bus rule undoes or re-triggers another on a second pass.
        #[test]
        fn bus_name_idempotent(name in "[A-Za-z0-9 +\\-]{0,20}") {
            let once = bus_name(&name);
            prop_assert_eq!(bus_name(&once), once);
        }

        #[test]
        fn bus_name_leaves_no_plus(name in "[A-Za-z0-9 +\\-]{0,20}") {
            prop_assert!(!bus_name(&name).contains('+'));
        }
    }
}
