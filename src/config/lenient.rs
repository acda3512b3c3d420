//! Lenient value parsing
//!
//! Harness-written property files are advisory. A value that cannot be read
//! collapses to a default, but callers can still tell "explicitly false"
//! apart from "defaulted because the input was unreadable".

use std::fmt;
use tracing::warn;

/// Marker returned when a value was unreadable and a default applies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDefaulted {
    /// The raw input that could not be read
    pub raw: String,
}

impl fmt::Display for ParseDefaulted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unreadable value '{}'", self.raw)
    }
}

/// Parse a boolean. Only `true`/`false` (any case) are explicit values.
pub fn parse_bool(raw: &str) -> Result<bool, ParseDefaulted> {
    let value = raw.trim();
    if value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else {
        Err(ParseDefaulted {
            raw: raw.to_string(),
        })
    }
}

/// Parse a boolean setting, collapsing unreadable input to `false`
pub fn lenient_bool(key: &str, raw: Option<&str>) -> bool {
    match raw.map(parse_bool) {
        None => false,
        Some(Ok(value)) => value,
        Some(Err(defaulted)) => {
            warn!("{} has {}, treating it as false", key, defaulted);
            false
        }
    }
}

/// Parse a non-negative count
pub fn parse_count(raw: &str) -> Result<u32, ParseDefaulted> {
    raw.trim().parse::<u32>().map_err(|_| ParseDefaulted {
        raw: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_booleans() {
        assert_eq!(parse_bool("true"), Ok(true));
        assert_eq!(parse_bool("TRUE"), Ok(true));
        assert_eq!(parse_bool(" false "), Ok(false));
    }

    #[test]
    fn unreadable_boolean_is_distinguishable() {
        let err = parse_bool("yes").unwrap_err();
        assert_eq!(err.raw, "yes");
        assert!(parse_bool("").is_err());
    }

    #[test]
    fn lenient_bool_collapses_to_false() {
        assert!(!lenient_bool("delete", Some("1")));
        assert!(!lenient_bool("delete", None));
        assert!(lenient_bool("delete", Some("True")));
    }

    #[test]
    fn counts() {
        assert_eq!(parse_count("4"), Ok(4));
        assert!(parse_count("four").is_err());
        assert!(parse_count("-1").is_err());
    }
}
