//! Event discovery, odds retrieval and environment classification on top
//! of an [`OddsTransport`].

use crate::config::{OddsApiConfig, SportConfig};
use crate::engine::environment::{self, EnvironmentMap, EnvironmentPolicy};
use crate::error::{OddsError, Result};
use crate::feed::types::{EnrichedEvent, Event, EventOdds, EventOddsResponse};
use crate::feed::OddsTransport;
use crate::markets::normalize_markets;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

pub struct OddsFetcher<T: OddsTransport> {
    transport: T,
    api_key: Option<String>,
    settings: OddsApiConfig,
}

/// `[now, now + hours_ahead]`. Negative hour counts and ends past the
/// representable date range are rejected.
pub(crate) fn lookahead_window(hours_ahead: i64) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    if hours_ahead < 0 {
        return Err(OddsError::Config(format!(
            "hours_ahead must not be negative (got {hours_ahead})"
        )));
    }
    let now = Utc::now();
    Duration::try_hours(hours_ahead)
        .and_then(|span| now.checked_add_signed(span))
        .map(|end| (now, end))
        .ok_or_else(|| OddsError::Config(format!("hours_ahead {hours_ahead} is out of range")))
}

/// `commenceTimeFrom`/`commenceTimeTo` for the look-ahead window.
fn commence_window(hours_ahead: i64) -> Result<[(String, String); 2]> {
    let (now, end) = lookahead_window(hours_ahead)?;
    Ok([
        (
            "commenceTimeFrom".to_string(),
            now.to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
        (
            "commenceTimeTo".to_string(),
            end.to_rfc3339_opts(SecondsFormat::Secs, true),
        ),
    ])
}

impl<T: OddsTransport> OddsFetcher<T> {
    pub fn new(transport: T, api_key: Option<String>, settings: OddsApiConfig) -> Self {
        Self {
            transport,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            settings,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn require_key(&self) -> Result<&str> {
        self.api_key.as_deref().ok_or(OddsError::MissingApiKey)
    }

    fn base_params(&self) -> Vec<(String, String)> {
        vec![
            ("regions".to_string(), self.settings.regions.clone()),
            ("oddsFormat".to_string(), self.settings.odds_format.clone()),
        ]
    }

    async fn get<R: DeserializeOwned>(
        &self,
        path: &str,
        mut params: Vec<(String, String)>,
    ) -> Result<R> {
        let key = self.require_key()?;
        params.push(("apiKey".to_string(), key.to_string()));
        let value = self.transport.get_json(path, &params).await?;
        serde_json::from_value(value).map_err(|source| OddsError::Decode {
            context: path.to_string(),
            source,
        })
    }

    /// Sport key to use for this invocation: the preseason key when it has
    /// at least one event in the window, otherwise the regular key.
    pub async fn resolve_sport_key(&self, sport: &SportConfig, hours_ahead: i64) -> Result<String> {
        self.require_key()?;
        let Some(preseason) = sport.preseason_key.as_deref() else {
            return Ok(sport.key.clone());
        };
        match self.list_events(preseason, hours_ahead).await {
            Ok(events) if !events.is_empty() => {
                tracing::debug!(sport = preseason, count = events.len(), "using preseason sport key");
                Ok(preseason.to_string())
            }
            Ok(_) => Ok(sport.key.clone()),
            Err(e) => {
                tracing::debug!(sport = preseason, error = %e, "preseason lookup failed");
                Ok(sport.key.clone())
            }
        }
    }

    /// Events for `sport_key` kicking off within the next `hours_ahead` hours.
    pub async fn list_events(&self, sport_key: &str, hours_ahead: i64) -> Result<Vec<Event>> {
        self.require_key()?;
        let window = commence_window(hours_ahead)?;
        let mut params = self.base_params();
        params.extend(window);
        self.get(&format!("/sports/{sport_key}/events"), params).await
    }

    /// Player-prop odds for one event. Market names are resolved and checked
    /// before any request goes out.
    pub async fn event_props<S: AsRef<str>>(
        &self,
        sport_key: &str,
        event_id: &str,
        markets: &[S],
    ) -> Result<EventOdds> {
        self.require_key()?;
        let markets = normalize_markets(markets)?;
        self.fetch_event_odds(sport_key, event_id, &markets).await
    }

    async fn fetch_event_odds(
        &self,
        sport_key: &str,
        event_id: &str,
        markets: &[String],
    ) -> Result<EventOdds> {
        let mut params = self.base_params();
        params.push(("markets".to_string(), markets.join(",")));
        params.push(("bookmakers".to_string(), self.settings.bookmakers.join(",")));
        let resp: EventOddsResponse = self
            .get(&format!("/sports/{sport_key}/events/{event_id}/odds"), params)
            .await?;
        Ok(resp.into_event_odds())
    }

    /// Odds for every event of a sport in one call. Events that don't
    /// decode are logged and left out.
    pub async fn bulk_odds<S: AsRef<str>>(
        &self,
        sport_key: &str,
        markets: &[S],
        hours_ahead: i64,
    ) -> Result<Vec<EventOdds>> {
        self.require_key()?;
        let window = commence_window(hours_ahead)?;
        let markets: Vec<&str> = markets.iter().map(|m| m.as_ref()).collect();
        let mut params = self.base_params();
        params.push(("dateFormat".to_string(), self.settings.date_format.clone()));
        params.push(("markets".to_string(), markets.join(",")));
        params.push(("bookmakers".to_string(), self.settings.bookmakers.join(",")));
        params.extend(window);
        let raw: Vec<Value> = self.get(&format!("/sports/{sport_key}/odds"), params).await?;

        let mut events = Vec::with_capacity(raw.len());
        for value in raw {
            match serde_json::from_value::<EventOdds>(value) {
                Ok(event) => events.push(event),
                Err(e) => tracing::warn!(sport = %sport_key, error = %e, "skipping undecodable event"),
            }
        }
        Ok(events)
    }

    /// Upcoming events with their bookmaker prop odds. Events whose props
    /// can't be fetched are logged and left out.
    pub async fn fetch_props<S: AsRef<str>>(
        &self,
        sport: &SportConfig,
        markets: &[S],
        hours_ahead: i64,
    ) -> Result<Vec<EnrichedEvent>> {
        self.require_key()?;
        let markets = normalize_markets(markets)?;
        let sport_key = self.resolve_sport_key(sport, hours_ahead).await?;
        let events = self.list_events(&sport_key, hours_ahead).await?;

        let mut out = Vec::with_capacity(events.len());
        for event in events {
            match self.fetch_event_odds(&sport_key, &event.id, &markets).await {
                Ok(odds) => out.push(EnrichedEvent::new(event, odds)),
                Err(e) => {
                    tracing::warn!(sport = %sport_key, event_id = %event.id, error = %e, "skipping event: props unavailable");
                }
            }
        }
        tracing::info!(sport = %sport_key, count = out.len(), "fetched events with props");
        Ok(out)
    }

    /// Environment map, or the error that prevented building it.
    pub async fn try_environment_map(
        &self,
        sport: &SportConfig,
        hours_ahead: i64,
        policy: &EnvironmentPolicy,
    ) -> Result<EnvironmentMap> {
        self.require_key()?;
        let sport_key = self.resolve_sport_key(sport, hours_ahead).await?;
        let totals = self.bulk_odds(&sport_key, &["totals"], hours_ahead).await?;
        let moneylines = self.bulk_odds(&sport_key, &["h2h"], hours_ahead).await?;
        let map = environment::build_environment_map(&totals, &moneylines, policy);
        tracing::info!(sport = %sport_key, %policy, count = map.len(), "classified matchups");
        Ok(map)
    }

    /// Environment map keyed by `"AWAY @ HOME"`. Any failure is logged and
    /// yields an empty map, so an empty result means "unavailable".
    pub async fn environment_map(
        &self,
        sport: &SportConfig,
        hours_ahead: i64,
        policy: &EnvironmentPolicy,
    ) -> EnvironmentMap {
        match self.try_environment_map(sport, hours_ahead, policy).await {
            Ok(map) => map,
            Err(e) => {
                tracing::error!(sport = %sport.key, error = %e, "environment map unavailable");
                EnvironmentMap::new()
            }
        }
    }
}
