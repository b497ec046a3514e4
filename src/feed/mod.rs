pub mod the_odds_api;
pub mod types;

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// GET access to the odds provider. `path` is relative to the provider's
/// base URL (e.g. `/sports/americanfootball_nfl/events`).
#[async_trait]
pub trait OddsTransport: Send + Sync {
    async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value>;
}
