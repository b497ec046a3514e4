use crate::error::{OddsError, Result};

/// Markets requested when the caller names none. Kept tight to maximize the
/// hit-rate for posted props.
pub const DEFAULT_MARKETS: &[&str] = &[
    "player_pass_yds",
    "player_pass_tds",
    "player_rush_yds",
    "player_rush_tds",
    "player_receiving_yds",
    "player_receptions",
    "player_receiving_tds",
];

/// Every player-prop market key the fetcher will request.
pub const VALID_PROP_MARKETS: &[&str] = &[
    "player_pass_yds",
    "player_pass_tds",
    "player_pass_attempts",
    "player_pass_completions",
    "player_pass_interceptions",
    "player_rush_yds",
    "player_rush_tds",
    "player_rush_attempts",
    "player_receiving_yds",
    "player_receptions",
    "player_receiving_tds",
    "player_anytime_td",
];

/// Informal name -> canonical provider key. Names that only lack the
/// `player_` prefix resolve without an entry here.
fn alias(name: &str) -> Option<&'static str> {
    match name {
        "passing_yds" | "passing_yards" | "pass_yards" => Some("player_pass_yds"),
        "passing_tds" | "pass_touchdowns" => Some("player_pass_tds"),
        "ints" | "interceptions" => Some("player_pass_interceptions"),
        "rushing_yds" | "rushing_yards" | "rush_yards" => Some("player_rush_yds"),
        "rushing_tds" | "rush_touchdowns" => Some("player_rush_tds"),
        "rec_yds" | "reception_yds" | "receiving_yards" | "player_reception_yds" => {
            Some("player_receiving_yds")
        }
        "rec" | "catches" => Some("player_receptions"),
        "rec_tds" | "receiving_touchdowns" => Some("player_receiving_tds"),
        "anytime_td" | "anytime_touchdown" | "atd" => Some("player_anytime_td"),
        _ => None,
    }
}

fn canonical(name: &str) -> Option<&'static str> {
    let name = name.trim().to_ascii_lowercase();
    if let Some(key) = VALID_PROP_MARKETS.iter().find(|k| **k == name) {
        return Some(*key);
    }
    if let Some(key) = alias(&name) {
        return Some(key);
    }
    let prefixed = format!("player_{name}");
    VALID_PROP_MARKETS.iter().find(|k| **k == prefixed).copied()
}

/// Resolve aliases, validate against the whitelist and de-duplicate,
/// preserving first-occurrence order. An empty request yields the defaults.
pub fn normalize_markets<S: AsRef<str>>(requested: &[S]) -> Result<Vec<String>> {
    if requested.is_empty() {
        return Ok(DEFAULT_MARKETS.iter().map(|s| s.to_string()).collect());
    }

    let mut out: Vec<String> = Vec::with_capacity(requested.len());
    for name in requested {
        let name = name.as_ref();
        let key = canonical(name).ok_or_else(|| OddsError::UnsupportedMarket {
            market: name.to_string(),
            valid: VALID_PROP_MARKETS.iter().map(|s| s.to_string()).collect(),
        })?;
        if !out.iter().any(|k| k == key) {
            out.push(key.to_string());
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_and_canonical_collapse() {
        let got = normalize_markets(&["rush_yds", "player_rush_yds"]).unwrap();
        assert_eq!(got, vec!["player_rush_yds"]);
    }

    #[test]
    fn test_preserves_first_occurrence_order() {
        let got = normalize_markets(&["receptions", "pass_yds", "player_receptions", "rec_yds"]).unwrap();
        assert_eq!(got, vec!["player_receptions", "player_pass_yds", "player_receiving_yds"]);
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let got = normalize_markets(&["  Player_Pass_TDS ", "ATD"]).unwrap();
        assert_eq!(got, vec!["player_pass_tds", "player_anytime_td"]);
    }

    #[test]
    fn test_empty_request_uses_defaults() {
        let got = normalize_markets::<&str>(&[]).unwrap();
        assert_eq!(got.len(), DEFAULT_MARKETS.len());
        assert_eq!(got[0], "player_pass_yds");
    }

    #[test]
    fn test_unsupported_market_lists_whitelist() {
        let err = normalize_markets(&["player_rush_yds", "totals"]).unwrap_err();
        match err {
            OddsError::UnsupportedMarket { market, valid } => {
                assert_eq!(market, "totals");
                assert_eq!(valid.len(), VALID_PROP_MARKETS.len());
                for key in VALID_PROP_MARKETS {
                    assert!(valid.iter().any(|v| v == key), "missing {key}");
                }
            }
            other => panic!("expected UnsupportedMarket, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults_are_all_valid() {
        for key in DEFAULT_MARKETS {
            assert!(VALID_PROP_MARKETS.contains(key), "{key}");
        }
    }
}
