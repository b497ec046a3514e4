use crate::engine::environment::{EnvironmentPolicy, PolicyKind, ThresholdOverrides};
use crate::error::OddsError;
use crate::fetcher::lookahead_window;
use crate::markets::DEFAULT_MARKETS;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

const API_KEY_VAR: &str = "ODDS_API_KEY";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub odds_api: OddsApiConfig,
    #[serde(default)]
    pub sport: SportConfig,
    #[serde(default)]
    pub props: PropsConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OddsApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_regions")]
    pub regions: String,
    #[serde(default = "default_odds_format")]
    pub odds_format: String,
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_bookmakers")]
    pub bookmakers: Vec<String>,
    #[serde(default = "default_timeout")]
    pub request_timeout_s: u64,
}

fn default_base_url() -> String { "https://api.the-odds-api.com/v4".to_string() }
fn default_regions() -> String { "us".to_string() }
fn default_odds_format() -> String { "american".to_string() }
fn default_date_format() -> String { "iso".to_string() }
fn default_timeout() -> u64 { 20 }

fn default_bookmakers() -> Vec<String> {
    ["draftkings", "fanduel", "betmgm", "caesars", "pointsbetus"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for OddsApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            regions: default_regions(),
            odds_format: default_odds_format(),
            date_format: default_date_format(),
            bookmakers: default_bookmakers(),
            request_timeout_s: default_timeout(),
        }
    }
}

/// Provider sport identifiers. The provider splits a sport into a preseason
/// and a regular-season key; discovery tries the former first.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SportConfig {
    pub key: String,
    #[serde(default)]
    pub preseason_key: Option<String>,
}

impl Default for SportConfig {
    fn default() -> Self {
        Self {
            key: "americanfootball_nfl".to_string(),
            preseason_key: Some("americanfootball_nfl_preseason".to_string()),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PropsConfig {
    #[serde(default = "default_prop_markets")]
    pub markets: Vec<String>,
    #[serde(default = "default_props_hours")]
    pub hours_ahead: i64,
}

fn default_prop_markets() -> Vec<String> {
    DEFAULT_MARKETS.iter().map(|s| s.to_string()).collect()
}
fn default_props_hours() -> i64 { 48 }

impl Default for PropsConfig {
    fn default() -> Self {
        Self {
            markets: default_prop_markets(),
            hours_ahead: default_props_hours(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct EnvironmentConfig {
    #[serde(default = "default_env_hours")]
    pub hours_ahead: i64,
    #[serde(default)]
    pub policy: PolicyKind,
    /// Overrides for the selected policy's cut-offs.
    #[serde(default)]
    pub thresholds: ThresholdOverrides,
}

fn default_env_hours() -> i64 { 72 }

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            hours_ahead: default_env_hours(),
            policy: PolicyKind::default(),
            thresholds: ThresholdOverrides::default(),
        }
    }
}

impl EnvironmentConfig {
    /// The configured policy with any threshold overrides applied.
    pub fn resolve_policy(&self) -> Result<EnvironmentPolicy, OddsError> {
        self.thresholds
            .apply(self.policy)
            .map_err(|e| OddsError::Config(format!("environment.thresholds: {e}")))
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .with_context(|| "Failed to parse config TOML")?;
        if config.sport.key.trim().is_empty() {
            return Err(OddsError::Config("sport.key cannot be empty".to_string()).into());
        }
        lookahead_window(config.props.hours_ahead).context("props.hours_ahead")?;
        lookahead_window(config.environment.hours_ahead).context("environment.hours_ahead")?;
        config.environment.resolve_policy()?;
        Ok(config)
    }

    /// Load `.env` into the process environment. Real env vars take precedence.
    pub fn load_env_file() {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "failed to load .env"),
        }
    }

    /// The provider API key from `ODDS_API_KEY`, if set and non-blank.
    pub fn odds_api_key() -> Option<String> {
        std::env::var(API_KEY_VAR)
            .ok()
            .map(|k| sanitize_key(&k))
            .filter(|k| !k.is_empty())
    }
}

/// Strip carriage returns, BOM, and other invisible chars from a key value.
fn sanitize_key(raw: &str) -> String {
    raw.replace(['\r', '\u{feff}', '\u{200b}'], "")
        .trim()
        .to_string()
}
