//! Serenity-backed implementations of the highlight capabilities.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::{Result, eyre};
use highlight_core::capabilities::{ChannelHistory, Delivery, DeliveryStatus, Membership};
use highlight_core::models::message::{
    HistoryMessage, Notification, snowflake_from_timestamp, timestamp_from_snowflake,
};
use serenity::{
    http::error::Error as HttpError,
    model::{
        channel::{ChannelType, GuildChannel, Message},
        guild::Member,
        id::{ChannelId, GuildId, MessageId, UserId},
        permissions::Permissions,
    },
    prelude::Context,
    utils::Color,
};
use std::future::Future;

/// Discord returns at most this many messages per history request.
const HISTORY_PAGE_SIZE: u64 = 100;

/// HTTP status of a failed Discord API call, if the error carries one.
pub fn http_status(err: &serenity::Error) -> Option<u16> {
    match err {
        serenity::Error::Http(http_err) => match http_err.as_ref() {
            HttpError::UnsuccessfulRequest(response) => Some(response.status_code.as_u16()),
            _ => None,
        },
        _ => None,
    }
}

/// Converts a serenity message into the scanner's history shape.
pub fn history_message(ctx: &Context, message: &Message) -> HistoryMessage {
    HistoryMessage {
        author_id: message.author.id.0,
        author_name: message.author.name.clone(),
        content: message.content_safe(&ctx.cache),
        timestamp: timestamp_from_snowflake(message.id.0),
    }
}

pub struct SerenityHistory {
    ctx: Context,
}

impl SerenityHistory {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ChannelHistory for SerenityHistory {
    async fn fetch_recent_messages(
        &self,
        channel_id: u64,
        limit: u8,
        before_id: u64,
    ) -> Result<Vec<HistoryMessage>> {
        let messages = ChannelId(channel_id)
            .messages(&self.ctx.http, |request| {
                request.before(MessageId(before_id)).limit(limit as u64)
            })
            .await?;

        Ok(messages
            .iter()
            .map(|message| history_message(&self.ctx, message))
            .collect())
    }

    async fn fetch_messages_since(
        &self,
        channel_id: u64,
        since: DateTime<Utc>,
    ) -> Result<Vec<HistoryMessage>> {
        let channel = ChannelId(channel_id);
        let messages = collect_after(
            snowflake_from_timestamp(since),
            HISTORY_PAGE_SIZE,
            |message: &Message| message.id.0,
            |cursor| async move {
                channel
                    .messages(&self.ctx.http, |request| {
                        request.after(MessageId(cursor)).limit(HISTORY_PAGE_SIZE)
                    })
                    .await
                    .map_err(Into::into)
            },
        )
        .await?;

        Ok(messages
            .iter()
            .map(|message| history_message(&self.ctx, message))
            .collect())
    }
}

/// Pages forward through history starting after the snowflake `start`.
///
/// Each page's newest id becomes the next cursor; paging stops at the first
/// page shorter than `page_size`.
pub async fn collect_after<T, I, F, Fut>(
    start: u64,
    page_size: u64,
    id_of: I,
    mut fetch_page: F,
) -> Result<Vec<T>>
where
    I: Fn(&T) -> u64,
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let mut cursor = start;
    let mut collected = Vec::new();

    loop {
        let page = fetch_page(cursor).await?;
        let full = page.len() as u64 >= page_size;
        let newest = page.iter().map(&id_of).max();
        collected.extend(page);

        match newest {
            Some(newest) if full && newest > cursor => cursor = newest,
            _ => break,
        }
    }

    Ok(collected)
}

pub struct SerenityMembership {
    ctx: Context,
}

impl SerenityMembership {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }

    async fn guild_channel(&self, channel_id: ChannelId) -> Result<GuildChannel> {
        if let Some(channel) = self.ctx.cache.guild_channel(channel_id) {
            return Ok(channel);
        }

        channel_id
            .to_channel(&self.ctx)
            .await?
            .guild()
            .ok_or_else(|| eyre!("Channel {} is not a guild channel", channel_id))
    }
}

#[async_trait]
impl Membership for SerenityMembership {
    type Member = Member;

    async fn resolve_member(&self, guild_id: u64, user_id: u64) -> Result<Option<Member>> {
        match GuildId(guild_id).member(&self.ctx, UserId(user_id)).await {
            Ok(member) => Ok(Some(member)),
            Err(e) if http_status(&e) == Some(404) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn can_view(&self, member: &Member, channel_id: u64) -> Result<bool> {
        let guild = self
            .ctx
            .cache
            .guild(member.guild_id)
            .ok_or_else(|| eyre!("Guild {} is not cached", member.guild_id))?;

        let mut channel = self.guild_channel(ChannelId(channel_id)).await?;

        // Thread visibility follows the parent channel.
        if matches!(
            channel.kind,
            ChannelType::PublicThread | ChannelType::PrivateThread | ChannelType::NewsThread
        ) {
            if let Some(parent_id) = channel.parent_id {
                channel = self.guild_channel(parent_id).await?;
            }
        }

        let permissions = guild.user_permissions_in(&channel, member)?;
        Ok(permissions.contains(Permissions::VIEW_CHANNEL))
    }
}

pub struct SerenityDelivery {
    ctx: Context,
}

impl SerenityDelivery {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Delivery for SerenityDelivery {
    async fn send_direct_message(&self, notification: &Notification) -> Result<DeliveryStatus> {
        let channel = UserId(notification.subscriber_id)
            .create_dm_channel(&self.ctx)
            .await?;

        let sent = channel
            .send_message(&self.ctx.http, |m| {
                m.content(notification.summary()).embed(|e| {
                    e.title(&notification.term)
                        .description(&notification.context)
                        .color(Color::GOLD)
                        .field(
                            "Source Message",
                            format!("[Jump to]({})", notification.jump_url),
                            false,
                        )
                })
            })
            .await;

        match sent {
            Ok(_) => Ok(DeliveryStatus::Delivered),
            Err(e) if http_status(&e) == Some(403) => Ok(DeliveryStatus::Forbidden),
            Err(e) => Err(e.into()),
        }
    }
}
