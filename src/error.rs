use thiserror::Error;

/// Errors surfaced by the odds fetcher.
#[derive(Error, Debug)]
pub enum OddsError {
    #[error("ODDS_API_KEY is not set")]
    MissingApiKey,

    #[error("Odds API error {status} at {url}: {detail}")]
    Http {
        status: u16,
        url: String,
        detail: String,
    },

    #[error("unsupported market '{market}'; valid markets: {}", .valid.join(", "))]
    UnsupportedMarket { market: String, valid: Vec<String> },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, OddsError>;
