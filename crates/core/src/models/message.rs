use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Milliseconds between the Unix epoch and the first second of 2015,
/// the origin of Discord snowflake timestamps.
pub const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

/// A chat message as seen by the scanner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub id: u64,
    pub guild_id: u64,
    pub guild_name: String,
    pub channel_id: u64,
    pub author_id: u64,
    pub author_name: String,
    pub author_is_bot: bool,
    /// Message text with mentions already resolved to readable names.
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub jump_url: String,
}

/// An earlier message in the same channel, used for context and activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub author_id: u64,
    pub author_name: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// A single pending direct message for one subscriber and one term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub term: String,
    pub subscriber_id: u64,
    pub guild_id: u64,
    pub guild_name: String,
    pub channel_id: u64,
    pub context: String,
    pub jump_url: String,
}

impl Notification {
    /// Plain-text line sent alongside the embed.
    pub fn summary(&self) -> String {
        format!(
            "You were mentioned with the highlight term `{}` in **{}** <#{}>.",
            self.term, self.guild_name, self.channel_id
        )
    }
}

/// Smallest snowflake that could have been created at `timestamp`.
///
/// Used as a `before`/`after` cursor when paging channel history by time.
/// Timestamps earlier than the Discord epoch clamp to zero.
pub fn snowflake_from_timestamp(timestamp: DateTime<Utc>) -> u64 {
    let millis = timestamp.timestamp_millis() - DISCORD_EPOCH_MS;
    if millis <= 0 {
        return 0;
    }
    (millis as u64) << 22
}

/// Creation time encoded in a Discord snowflake.
pub fn timestamp_from_snowflake(id: u64) -> DateTime<Utc> {
    let millis = (id >> 22) as i64 + DISCORD_EPOCH_MS;
    Utc.timestamp_millis_opt(millis).single().unwrap_or_default()
}
