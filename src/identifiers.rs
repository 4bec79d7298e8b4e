//! Identifier list validation
//!
//! Decides whether free-form input is a list of ICAO station identifiers and, if so,
//! turns it into the ordered identifier sequence used by every later stage.

use crate::Result;
use crate::models::StationIdentifier;

/// Split on runs of whitespace and/or commas
fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
}

/// True iff the input holds at least one token and every token is a 4-letter code
#[must_use]
pub fn classify(text: &str) -> bool {
    let mut seen_any = false;
    for token in tokens(text) {
        if StationIdentifier::parse(token).is_err() {
            return false;
        }
        seen_any = true;
    }
    seen_any
}

/// Parse identifiers in input order, upper-cased
///
/// Duplicates are kept: a repeated station is a meaningful route point.
pub fn normalize(text: &str) -> Result<Vec<StationIdentifier>> {
    tokens(text).map(StationIdentifier::parse).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("VABB VOMM", true)]
    #[case("vabb,vomm", true)]
    #[case("  KJFK , , egll\tLFPG\n", true)]
    #[case("VABB", true)]
    #[case("VAB VOMM", false)]
    #[case("VABB VOMM1", false)]
    #[case("turbulence over VABB at FL080", false)]
    #[case("", false)]
    #[case("   ", false)]
    #[case(" , ,, ", false)]
    fn test_classify(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(classify(input), expected);
    }

    #[test]
    fn test_normalize_preserves_order() {
        let ids = normalize("vabb, VOMM vidp").unwrap();
        let ids: Vec<&str> = ids.iter().map(StationIdentifier::as_str).collect();
        assert_eq!(ids, vec!["VABB", "VOMM", "VIDP"]);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let first = normalize("egll,,lfpg   eddf").unwrap();
        let joined = first
            .iter()
            .map(StationIdentifier::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(normalize(&joined).unwrap(), first);
    }

    #[test]
    fn test_normalize_keeps_round_trip() {
        let ids = normalize("VABB VOMM VABB").unwrap();
        assert_eq!(ids.len(), 3);
        assert_eq!(ids[0], ids[2]);
    }

    #[test]
    fn test_normalize_rejects_bad_token() {
        assert!(normalize("VABB V0MM").is_err());
    }

    #[test]
    fn test_normalize_empty_is_empty() {
        assert!(normalize("  ").unwrap().is_empty());
    }
}
