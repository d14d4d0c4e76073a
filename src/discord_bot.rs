use color_eyre::eyre::Result;
use dotenv::dotenv;
use highlight_db::{create_pool, schema::initialize_database};
use highlight_discord_bot::config::BotConfig;
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // LOG_LEVEL may come from .env, so load it before configuring logging
    dotenv().ok();
    let config = BotConfig::from_env()?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting highlight bot");

    let db_pool = create_pool(&config.database_url).await?;
    initialize_database(&db_pool).await?;

    match highlight_discord_bot::start_bot(config, db_pool).await {
        Ok(_) => info!("Discord bot shut down gracefully"),
        Err(e) => error!("Discord bot error: {}", e),
    }

    Ok(())
}
