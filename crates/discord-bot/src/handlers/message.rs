use eyre::Result;
use highlight_core::{
    dispatch::{DeliveryOutcome, Dispatcher},
    models::message::{InboundMessage, timestamp_from_snowflake},
};
use serenity::model::channel::Message;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use crate::adapters::{SerenityDelivery, SerenityHistory, SerenityMembership};
use crate::handlers::HandlerContext;

/// Scan a guild message and notify everyone who highlighted a term in it.
pub async fn handle_message(ctx: HandlerContext, message: &Message) -> Result<()> {
    // Direct messages to the bot are never scanned
    let Some(guild_id) = message.guild_id else {
        return Ok(());
    };

    if message.author.bot {
        return Ok(());
    }

    // Take one snapshot; refreshes during this scan only affect later messages
    let snapshot = ctx.subscriptions.index().snapshot().await;
    if snapshot.is_empty() {
        return Ok(());
    }

    let http = ctx.ctx.http.clone();
    let guild_name = guild_name_or_fetch(guild_id.name(&ctx.ctx.cache), || async move {
        let guild = guild_id.to_partial_guild(&*http).await?;
        Ok::<_, eyre::Report>(guild.name)
    })
    .await?;

    let inbound = InboundMessage {
        id: message.id.0,
        guild_id: guild_id.0,
        guild_name,
        channel_id: message.channel_id.0,
        author_id: message.author.id.0,
        author_name: message.author.name.clone(),
        author_is_bot: message.author.bot,
        content: message.content_safe(&ctx.ctx.cache),
        timestamp: timestamp_from_snowflake(message.id.0),
        jump_url: message.link(),
    };

    let history = SerenityHistory::new(ctx.ctx.clone());
    let notifications = ctx.scanner.scan(&snapshot, &inbound, &history).await?;
    if notifications.is_empty() {
        return Ok(());
    }

    let dispatcher = Dispatcher::new(
        Arc::new(SerenityMembership::new(ctx.ctx.clone())),
        Arc::new(SerenityDelivery::new(ctx.ctx.clone())),
    );
    let reports = dispatcher.dispatch(notifications).await;

    let delivered = reports
        .iter()
        .filter(|r| r.outcome == DeliveryOutcome::Delivered)
        .count();
    debug!(
        "Message {} triggered {} highlights, {} delivered",
        message.id,
        reports.len(),
        delivered
    );

    Ok(())
}

/// Uses the cached guild name, asking Discord only when the guild is not cached.
pub async fn guild_name_or_fetch<F, Fut>(cached: Option<String>, fetch: F) -> Result<String>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<String>>,
{
    match cached {
        Some(name) => Ok(name),
        None => fetch().await,
    }
}
