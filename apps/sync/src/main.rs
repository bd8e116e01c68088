use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use savevault_api::{Client, Session};
use savevault_dashboard::{AppConfig, Dashboard};
use savevault_storage::FileStore;
use savevault_storage::token::load_token;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,savevault=debug")),
        )
        .init();

    let config = AppConfig::load().context("loading configuration")?;
    let store = Arc::new(
        FileStore::new(&config.data_dir)
            .with_context(|| format!("opening data dir {}", config.data_dir.display()))?,
    );

    // An unreadable token just means starting logged out.
    let token = load_token(&*store).unwrap_or_else(|e| {
        tracing::warn!("failed to read stored token: {e}");
        None
    });
    let client = Client::new(config.api_base.clone(), Session::new(token))
        .context("building API client")?;

    let dashboard = Dashboard::new(client, store);
    dashboard.start().await;

    let games = dashboard.sorted_games();
    tracing::info!(
        api_base = %config.api_base,
        authenticated = dashboard.is_authenticated(),
        games = games.len(),
        "sync finished"
    );
    for game in &games {
        tracing::info!(game_id = %game.id, name = %game.name, saves = game.saves_count(), "game");
    }

    Ok(())
}
