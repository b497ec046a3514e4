use anyhow::{Context, Result};
use nfl_odds::config::Config;
use nfl_odds::engine::PolicyKind;
use nfl_odds::feed::the_odds_api::TheOddsApi;
use nfl_odds::OddsFetcher;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Value following `flag` on the command line, if any.
fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nfl_odds=info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config_path = arg_value(&args, "--config")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    let mut config = if config_path.exists() {
        Config::load(&config_path)?
    } else {
        tracing::info!(path = %config_path.display(), "no config file, using defaults");
        Config::default()
    };
    if let Some(policy) = arg_value(&args, "--policy") {
        config.environment.policy = policy
            .parse::<PolicyKind>()
            .map_err(anyhow::Error::msg)?;
    }
    let policy = config.environment.resolve_policy()?;

    // Real env vars take precedence over .env
    Config::load_env_file();
    let api_key = Config::odds_api_key();

    let transport = TheOddsApi::new(
        &config.odds_api.base_url,
        Duration::from_secs(config.odds_api.request_timeout_s),
    )
    .context("failed to build HTTP client")?;
    let fetcher = OddsFetcher::new(transport, api_key, config.odds_api.clone());

    let props = fetcher
        .fetch_props(&config.sport, &config.props.markets, config.props.hours_ahead)
        .await?;
    println!("Fetched {} NFL events with player props.", props.len());

    let env = fetcher
        .environment_map(&config.sport, config.environment.hours_ahead, &policy)
        .await;
    println!("Classified {} NFL matchups for environment.", env.len());

    for (matchup, rec) in &env {
        let total = rec
            .total
            .map(|t| format!("{t:.1}"))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<14} {:<13} total {:>5}  favored {}",
            matchup,
            rec.label,
            total,
            rec.favored_team.as_deref().unwrap_or("-"),
        );
    }

    if let Some(quota) = fetcher.transport().last_quota() {
        tracing::info!(
            used = quota.requests_used,
            remaining = quota.requests_remaining,
            "odds api quota"
        );
    }

    Ok(())
}
