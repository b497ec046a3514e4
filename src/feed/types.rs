use serde::{Deserialize, Serialize};
use serde_json::Value;

// the-odds-api.com v4 payload types. Fields are defaulted so partial
// objects from the provider still decode.

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Event {
    pub id: String,
    pub home_team: String,
    pub away_team: String,
    pub commence_time: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<String>,
}

/// Event odds as returned by the per-event and bulk odds endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EventOdds {
    pub id: String,
    pub sport_key: String,
    pub home_team: String,
    pub away_team: String,
    pub commence_time: String,
    pub teams: Vec<String>,
    pub bookmakers: Vec<Bookmaker>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Bookmaker {
    pub key: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
    pub markets: Vec<Market>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Market {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update: Option<String>,
    pub outcomes: Vec<Outcome>,
}

/// One side of a market. `price` is American odds, absent when the book
/// has the side off the board.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Outcome {
    #[serde(default)]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "american_price",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Prices arrive as JSON numbers that are occasionally float-typed (`-110.0`).
fn american_price<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.map(|p| p.round() as i32))
}

impl Bookmaker {
    pub fn market(&self, key: &str) -> Option<&Market> {
        self.markets.iter().find(|m| m.key == key)
    }
}

impl Market {
    pub fn outcome(&self, name: &str) -> Option<&Outcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }
}

/// Per-event odds response: the provider answers with either one object or
/// a list of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EventOddsResponse {
    List(Vec<Value>),
    Single(Value),
}

impl EventOddsResponse {
    /// Collapse to one payload: the first entry that carries bookmaker data,
    /// else an empty object.
    pub fn into_event_odds(self) -> EventOdds {
        let candidates = match self {
            EventOddsResponse::List(items) => items,
            EventOddsResponse::Single(item) => vec![item],
        };
        candidates
            .into_iter()
            .filter(|v| v.is_object())
            .filter_map(|v| serde_json::from_value::<EventOdds>(v).ok())
            .find(|p| !p.bookmakers.is_empty())
            .unwrap_or_default()
    }
}

/// An event with the bookmaker prop odds attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedEvent {
    pub id: String,
    pub commence_time: String,
    pub home_team: String,
    pub away_team: String,
    pub teams: Vec<String>,
    pub bookmakers: Vec<Bookmaker>,
}

impl EnrichedEvent {
    /// Teams come from the event listing, falling back to the odds payload.
    pub fn new(event: Event, odds: EventOdds) -> Self {
        let teams = if event.teams.is_empty() {
            odds.teams
        } else {
            event.teams
        };
        Self {
            id: event.id,
            commence_time: event.commence_time,
            home_team: event.home_team,
            away_team: event.away_team,
            teams,
            bookmakers: odds.bookmakers,
        }
    }
}

/// API usage quota info extracted from response headers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiQuota {
    pub requests_used: u64,
    pub requests_remaining: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn with_books(id: &str) -> Value {
        json!({
            "id": id,
            "home_team": "Kansas City Chiefs",
            "away_team": "Buffalo Bills",
            "bookmakers": [{
                "key": "draftkings",
                "title": "DraftKings",
                "markets": [{
                    "key": "player_pass_yds",
                    "outcomes": [
                        {"name": "Over", "price": -110, "point": 275.5, "description": "Josh Allen"}
                    ]
                }]
            }]
        })
    }

    #[test]
    fn test_single_object_payload() {
        let resp: EventOddsResponse = serde_json::from_value(with_books("e1")).unwrap();
        let odds = resp.into_event_odds();
        assert_eq!(odds.id, "e1");
        let outcome = &odds.bookmakers[0].markets[0].outcomes[0];
        assert_eq!(outcome.price, Some(-110));
        assert_eq!(outcome.point, Some(275.5));
        assert_eq!(outcome.description.as_deref(), Some("Josh Allen"));
    }

    #[test]
    fn test_list_payload_picks_first_with_bookmakers() {
        let body = json!([
            {"id": "empty", "bookmakers": []},
            "not-an-object",
            with_books("second"),
            with_books("third"),
        ]);
        let resp: EventOddsResponse = serde_json::from_value(body).unwrap();
        assert_eq!(resp.into_event_odds().id, "second");
    }

    #[test]
    fn test_list_without_bookmakers_yields_empty_object() {
        let body = json!([{"id": "a"}, {"id": "b", "bookmakers": []}]);
        let resp: EventOddsResponse = serde_json::from_value(body).unwrap();
        let odds = resp.into_event_odds();
        assert_eq!(odds, EventOdds::default());
        assert!(odds.bookmakers.is_empty());
    }

    #[test]
    fn test_empty_list_yields_empty_object() {
        let resp: EventOddsResponse = serde_json::from_value(json!([])).unwrap();
        assert_eq!(resp.into_event_odds(), EventOdds::default());
    }

    #[test]
    fn test_float_typed_price_rounds() {
        let o: Outcome = serde_json::from_value(json!({"name": "Under", "price": -115.0})).unwrap();
        assert_eq!(o.price, Some(-115));
    }

    #[test]
    fn test_missing_or_null_price_decodes_as_none() {
        let o: Outcome = serde_json::from_value(json!({"name": "Over", "point": 47.5})).unwrap();
        assert_eq!(o.price, None);
        assert_eq!(o.point, Some(47.5));
        let o: Outcome = serde_json::from_value(json!({"name": "Over", "price": null})).unwrap();
        assert_eq!(o.price, None);
    }

    #[test]
    fn test_list_payload_keeps_entry_with_unpriced_outcome() {
        let mut unpriced = with_books("unpriced");
        unpriced["bookmakers"][0]["markets"][0]["outcomes"][0]
            .as_object_mut()
            .unwrap()
            .remove("price");
        let body = json!([{"id": "empty"}, unpriced, with_books("later")]);
        let resp: EventOddsResponse = serde_json::from_value(body).unwrap();
        let odds = resp.into_event_odds();
        assert_eq!(odds.id, "unpriced");
        assert_eq!(odds.bookmakers[0].markets[0].outcomes[0].price, None);
    }

    fn listed_event(teams: Value) -> Event {
        serde_json::from_value(json!({
            "id": "e1",
            "home_team": "Kansas City Chiefs",
            "away_team": "Buffalo Bills",
            "commence_time": "2026-09-10T00:20:00Z",
            "teams": teams
        }))
        .unwrap()
    }

    #[test]
    fn test_enriched_event_prefers_listing_teams() {
        let odds = EventOdds {
            teams: vec!["Odds Home".to_string(), "Odds Away".to_string()],
            ..Default::default()
        };
        let listed = listed_event(json!(["Kansas City Chiefs", "Buffalo Bills"]));
        let enriched = EnrichedEvent::new(listed, odds.clone());
        assert_eq!(enriched.teams, vec!["Kansas City Chiefs", "Buffalo Bills"]);
        assert_eq!(enriched.commence_time, "2026-09-10T00:20:00Z");

        let enriched = EnrichedEvent::new(listed_event(json!([])), odds);
        assert_eq!(enriched.teams, vec!["Odds Home", "Odds Away"]);
    }

    #[test]
    fn test_market_and_outcome_lookup() {
        let odds: EventOdds = serde_json::from_value(with_books("e1")).unwrap();
        let bm = &odds.bookmakers[0];
        assert!(bm.market("totals").is_none());
        let m = bm.market("player_pass_yds").unwrap();
        assert_eq!(m.outcome("Over").and_then(|o| o.price), Some(-110));
        assert!(m.outcome("Under").is_none());
    }
}
