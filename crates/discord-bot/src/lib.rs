use eyre::Result;
use highlight_core::index::TermIndex;
use highlight_db::{DbPool, PgSubscriptionStore};
use serenity::{
    Client,
    prelude::GatewayIntents,
};
use std::sync::Arc;
use tracing::info;

pub mod adapters;
pub mod commands;
pub mod handlers;
pub mod config;

/// Start the Discord bot with the provided configuration and database connection.
///
/// Loads the highlight index from the database, then runs the gateway
/// client until it disconnects or an error occurs.
///
/// # Arguments
///
/// * `config` - The bot configuration containing token, guild and highlight settings
/// * `db_pool` - A PostgreSQL connection pool for database operations
///
/// # Returns
///
/// * `Ok(())` if the bot shut down gracefully
/// * `Err` if an error occurred during initialization or operation
pub async fn start_bot(config: config::BotConfig, db_pool: DbPool) -> Result<()> {
    info!("Starting Discord bot");

    let store = Arc::new(PgSubscriptionStore::new(db_pool));
    let index = Arc::new(TermIndex::load(&*store).await?);
    info!("Loaded {} highlight terms", index.snapshot().await.len());

    let handler = handlers::Handler::new(config.clone(), store, index);

    // Message content is needed to scan for highlighted terms
    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(&config.token, intents)
        .event_handler(handler)
        .await?;

    // Start the client
    info!("Connecting to Discord...");
    client.start().await?;

    Ok(())
}
