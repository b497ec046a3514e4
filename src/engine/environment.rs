use super::teams;
use crate::feed::types::EventOdds;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Expected scoring level of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Environment {
    High,
    Neutral,
    Low,
}

/// Which rule set to classify with, as named in config and on the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    #[default]
    TotalsLean,
    JuicedTotals,
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyKind::TotalsLean => write!(f, "totals-lean"),
            PolicyKind::JuicedTotals => write!(f, "juiced-totals"),
        }
    }
}

impl FromStr for PolicyKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "totals-lean" | "a" => Ok(PolicyKind::TotalsLean),
            "juiced-totals" | "b" => Ok(PolicyKind::JuicedTotals),
            other => Err(format!(
                "unknown environment policy '{other}' (expected totals-lean or juiced-totals)"
            )),
        }
    }
}

/// High when the total is at or above `high_total` and the Over is priced at
/// least as short as the Under; Low mirrors it below `low_total`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TotalsLean {
    pub high_total: f64,
    pub low_total: f64,
}

impl Default for TotalsLean {
    fn default() -> Self {
        Self {
            high_total: 47.5,
            low_total: 41.5,
        }
    }
}

/// Wide total cut-offs, plus a juice trigger: an Over (Under) priced at or
/// below `juice_price` tips the label once the total reaches
/// `lean_high_total` (drops to `lean_low_total`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JuicedTotals {
    pub high_total: f64,
    pub low_total: f64,
    pub lean_high_total: f64,
    pub lean_low_total: f64,
    pub juice_price: i32,
}

impl Default for JuicedTotals {
    fn default() -> Self {
        Self {
            high_total: 50.0,
            low_total: 42.0,
            lean_high_total: 47.0,
            lean_low_total: 45.0,
            juice_price: -115,
        }
    }
}

/// Rule set used to turn a totals line into an [`Environment`], with its
/// cut-offs. The two policies disagree in places and both stay selectable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnvironmentPolicy {
    TotalsLean(TotalsLean),
    JuicedTotals(JuicedTotals),
}

impl Default for EnvironmentPolicy {
    fn default() -> Self {
        PolicyKind::default().into()
    }
}

impl From<PolicyKind> for EnvironmentPolicy {
    fn from(kind: PolicyKind) -> Self {
        match kind {
            PolicyKind::TotalsLean => EnvironmentPolicy::TotalsLean(TotalsLean::default()),
            PolicyKind::JuicedTotals => EnvironmentPolicy::JuicedTotals(JuicedTotals::default()),
        }
    }
}

impl fmt::Display for EnvironmentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind(), f)
    }
}

impl EnvironmentPolicy {
    pub fn kind(&self) -> PolicyKind {
        match self {
            EnvironmentPolicy::TotalsLean(_) => PolicyKind::TotalsLean,
            EnvironmentPolicy::JuicedTotals(_) => PolicyKind::JuicedTotals,
        }
    }

    pub fn classify(&self, line: &TotalsLine) -> Environment {
        let Some(total) = line.total else {
            return Environment::Neutral;
        };
        match self {
            EnvironmentPolicy::TotalsLean(t) => {
                let (Some(over), Some(under)) = (line.over_odds, line.under_odds) else {
                    return Environment::Neutral;
                };
                if total >= t.high_total && over <= under {
                    Environment::High
                } else if total <= t.low_total && under <= over {
                    Environment::Low
                } else {
                    Environment::Neutral
                }
            }
            EnvironmentPolicy::JuicedTotals(t) => {
                let juiced = |price: Option<i32>| price.is_some_and(|p| p <= t.juice_price);
                if total >= t.high_total || (juiced(line.over_odds) && total >= t.lean_high_total) {
                    Environment::High
                } else if total <= t.low_total
                    || (juiced(line.under_odds) && total <= t.lean_low_total)
                {
                    Environment::Low
                } else {
                    Environment::Neutral
                }
            }
        }
    }

    /// Display label for a classification under this policy.
    pub fn label(&self, env: Environment) -> &'static str {
        match (self.kind(), env) {
            (_, Environment::Neutral) => "Neutral",
            (PolicyKind::TotalsLean, Environment::High) => "High",
            (PolicyKind::TotalsLean, Environment::Low) => "Low",
            (PolicyKind::JuicedTotals, Environment::High) => "High Scoring",
            (PolicyKind::JuicedTotals, Environment::Low) => "Low Scoring",
        }
    }
}

/// Partial cut-off overrides from config. Unset fields keep the policy's
/// defaults; fields the chosen policy never reads are rejected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThresholdOverrides {
    pub high_total: Option<f64>,
    pub low_total: Option<f64>,
    pub lean_high_total: Option<f64>,
    pub lean_low_total: Option<f64>,
    pub juice_price: Option<i32>,
}

impl ThresholdOverrides {
    pub fn apply(&self, kind: PolicyKind) -> Result<EnvironmentPolicy, String> {
        match kind {
            PolicyKind::TotalsLean => {
                if self.lean_high_total.is_some()
                    || self.lean_low_total.is_some()
                    || self.juice_price.is_some()
                {
                    return Err(
                        "totals-lean only reads high_total and low_total".to_string()
                    );
                }
                let d = TotalsLean::default();
                Ok(EnvironmentPolicy::TotalsLean(TotalsLean {
                    high_total: self.high_total.unwrap_or(d.high_total),
                    low_total: self.low_total.unwrap_or(d.low_total),
                }))
            }
            PolicyKind::JuicedTotals => {
                let d = JuicedTotals::default();
                Ok(EnvironmentPolicy::JuicedTotals(JuicedTotals {
                    high_total: self.high_total.unwrap_or(d.high_total),
                    low_total: self.low_total.unwrap_or(d.low_total),
                    lean_high_total: self.lean_high_total.unwrap_or(d.lean_high_total),
                    lean_low_total: self.lean_low_total.unwrap_or(d.lean_low_total),
                    juice_price: self.juice_price.unwrap_or(d.juice_price),
                }))
            }
        }
    }
}

/// Over/Under line for one game.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TotalsLine {
    pub total: Option<f64>,
    pub over_odds: Option<i32>,
    pub under_odds: Option<i32>,
}

/// Moneyline prices for both sides of one game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoneyLine {
    pub home_price: i32,
    pub away_price: i32,
}

impl MoneyLine {
    /// The side with the lower American price. Equal prices go to the away side.
    pub fn favored<'a>(&self, home: &'a str, away: &'a str) -> &'a str {
        if self.home_price < self.away_price {
            home
        } else {
            away
        }
    }
}

/// Abbreviated teams of one matchup.
#[derive(Debug, Clone, PartialEq)]
pub struct Matchup {
    pub home_team: String,
    pub away_team: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnvironmentRecord {
    pub environment: Environment,
    pub label: String,
    pub total: Option<f64>,
    pub over_odds: Option<i32>,
    pub under_odds: Option<i32>,
    pub favored_team: Option<String>,
    pub home_team: String,
    pub away_team: String,
}

/// Matchup key (`"AWAY @ HOME"`) -> record.
pub type EnvironmentMap = BTreeMap<String, EnvironmentRecord>;

fn matchup_of(event: &EventOdds) -> Option<(String, Matchup)> {
    if event.home_team.is_empty() || event.away_team.is_empty() {
        return None;
    }
    let matchup = Matchup {
        home_team: teams::abbreviate(&event.home_team),
        away_team: teams::abbreviate(&event.away_team),
    };
    Some((teams::matchup_key(&event.away_team, &event.home_team), matchup))
}

/// First bookmaker's `totals` market per matchup. An unpriced side is left
/// empty.
pub fn totals_by_matchup(events: &[EventOdds]) -> HashMap<String, (Matchup, TotalsLine)> {
    let mut out = HashMap::new();
    for event in events {
        let Some((key, matchup)) = matchup_of(event) else {
            continue;
        };
        let Some(market) = event.bookmakers.iter().find_map(|bm| bm.market("totals")) else {
            continue;
        };
        let over = market.outcome("Over");
        let line = TotalsLine {
            total: over.and_then(|o| o.point),
            over_odds: over.and_then(|o| o.price),
            under_odds: market.outcome("Under").and_then(|o| o.price),
        };
        out.insert(key, (matchup, line));
    }
    out
}

/// First bookmaker pricing both sides of `h2h`, per matchup.
pub fn moneylines_by_matchup(events: &[EventOdds]) -> HashMap<String, (Matchup, MoneyLine)> {
    let mut out = HashMap::new();
    for event in events {
        let Some((key, matchup)) = matchup_of(event) else {
            continue;
        };
        let line = event.bookmakers.iter().find_map(|bm| {
            let h2h = bm.market("h2h")?;
            Some(MoneyLine {
                home_price: h2h.outcome(&event.home_team)?.price?,
                away_price: h2h.outcome(&event.away_team)?.price?,
            })
        });
        if let Some(line) = line {
            out.insert(key, (matchup, line));
        }
    }
    out
}

/// Join both tables into one record per matchup. A matchup missing from
/// one side keeps that side's fields empty.
pub fn merge(
    totals: HashMap<String, (Matchup, TotalsLine)>,
    mut moneylines: HashMap<String, (Matchup, MoneyLine)>,
    policy: &EnvironmentPolicy,
) -> EnvironmentMap {
    let mut out = EnvironmentMap::new();

    for (key, (matchup, line)) in totals {
        let favored = moneylines
            .remove(&key)
            .map(|(_, ml)| ml.favored(&matchup.home_team, &matchup.away_team).to_string());
        let environment = policy.classify(&line);
        out.insert(
            key,
            EnvironmentRecord {
                environment,
                label: policy.label(environment).to_string(),
                total: line.total,
                over_odds: line.over_odds,
                under_odds: line.under_odds,
                favored_team: favored,
                home_team: matchup.home_team,
                away_team: matchup.away_team,
            },
        );
    }

    for (key, (matchup, ml)) in moneylines {
        let favored = ml.favored(&matchup.home_team, &matchup.away_team).to_string();
        out.insert(
            key,
            EnvironmentRecord {
                environment: Environment::Neutral,
                label: policy.label(Environment::Neutral).to_string(),
                total: None,
                over_odds: None,
                under_odds: None,
                favored_team: Some(favored),
                home_team: matchup.home_team,
                away_team: matchup.away_team,
            },
        );
    }

    out
}

/// Build the environment map from separately fetched totals and h2h events.
pub fn build_environment_map(
    totals_events: &[EventOdds],
    h2h_events: &[EventOdds],
    policy: &EnvironmentPolicy,
) -> EnvironmentMap {
    merge(
        totals_by_matchup(totals_events),
        moneylines_by_matchup(h2h_events),
        policy,
    )
}
