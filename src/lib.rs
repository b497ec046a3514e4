pub mod config;
pub mod engine;
pub mod error;
pub mod feed;
pub mod fetcher;
pub mod markets;

pub use error::{OddsError, Result};
pub use fetcher::OddsFetcher;
