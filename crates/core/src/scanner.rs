use std::collections::HashSet;

use chrono::Duration;
use eyre::Result;
use tracing::debug;

use crate::capabilities::ChannelHistory;
use crate::index::IndexSnapshot;
use crate::models::message::{HistoryMessage, InboundMessage, Notification};

pub const DEFAULT_ACTIVE_WINDOW_MINUTES: i64 = 5;
pub const DEFAULT_CONTEXT_MESSAGES: u8 = 4;
pub const DEFAULT_MAX_LINE_LENGTH: usize = 256;

/// Tunables for [`Scanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Anyone who posted in the channel within this window is treated as
    /// already part of the conversation and is not notified.
    pub active_window: Duration,
    /// Number of earlier messages included above the triggering one.
    pub context_messages: u8,
    /// Maximum characters kept from each message in the context block.
    pub max_line_length: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            active_window: Duration::minutes(DEFAULT_ACTIVE_WINDOW_MINUTES),
            context_messages: DEFAULT_CONTEXT_MESSAGES,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}

/// Per-message data computed on the first match and reused for every
/// other matching term.
struct SharedContext {
    active: HashSet<u64>,
    context: String,
}

/// Turns inbound messages into notifications for matching subscribers.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    config: ScannerConfig,
}

impl Scanner {
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Scans `message` against every term in `snapshot`.
    ///
    /// Channel history is only read once a term matches, and at most once
    /// per message no matter how many terms match.
    pub async fn scan<H>(
        &self,
        snapshot: &IndexSnapshot,
        message: &InboundMessage,
        history: &H,
    ) -> Result<Vec<Notification>>
    where
        H: ChannelHistory + ?Sized,
    {
        if message.author_is_bot {
            return Ok(Vec::new());
        }

        let mut shared: Option<SharedContext> = None;
        let mut notifications = Vec::new();

        for entry in snapshot.terms() {
            if !entry.is_match(&message.content) {
                continue;
            }

            if shared.is_none() {
                shared = Some(SharedContext {
                    active: self.active_participants(message, history).await?,
                    context: self.context_block(message, history).await?,
                });
            }
            let Some(SharedContext { active, context }) = shared.as_ref() else {
                continue;
            };

            let mut subscribers: Vec<u64> = entry
                .subscribers()
                .iter()
                .copied()
                .filter(|id| *id != message.author_id && !active.contains(id))
                .collect();
            subscribers.sort_unstable();

            debug!(
                "Term {:?} matched message {} ({} to notify)",
                entry.term(),
                message.id,
                subscribers.len()
            );

            notifications.extend(subscribers.into_iter().map(|subscriber_id| Notification {
                term: entry.term().to_string(),
                subscriber_id,
                guild_id: message.guild_id,
                guild_name: message.guild_name.clone(),
                channel_id: message.channel_id,
                context: context.clone(),
                jump_url: message.jump_url.clone(),
            }));
        }

        Ok(notifications)
    }

    async fn active_participants<H>(
        &self,
        message: &InboundMessage,
        history: &H,
    ) -> Result<HashSet<u64>>
    where
        H: ChannelHistory + ?Sized,
    {
        let since = message.timestamp - self.config.active_window;
        let recent = history
            .fetch_messages_since(message.channel_id, since)
            .await?;

        Ok(recent.into_iter().map(|m| m.author_id).collect())
    }

    async fn context_block<H>(&self, message: &InboundMessage, history: &H) -> Result<String>
    where
        H: ChannelHistory + ?Sized,
    {
        let previous = history
            .fetch_recent_messages(
                message.channel_id,
                self.config.context_messages,
                message.id,
            )
            .await?;

        Ok(build_context(
            &previous,
            message,
            self.config.context_messages as usize,
            self.config.max_line_length,
        ))
    }
}

/// Renders the context block shown in a highlight notification.
///
/// `previous` is newest first, as channel history is returned; at most
/// `limit` of those are rendered, oldest first, followed by the triggering
/// message marked with a sparkle.
pub fn build_context(
    previous: &[HistoryMessage],
    message: &InboundMessage,
    limit: usize,
    max_line_length: usize,
) -> String {
    let mut chat = String::new();

    for msg in previous.iter().take(limit).rev() {
        chat.push_str(&format!(
            "**[<t:{}:T>] {}:** {}\n",
            msg.timestamp.timestamp(),
            msg.author_name,
            truncate(&msg.content, max_line_length)
        ));
    }

    chat.push_str(&format!(
        "✨ **[<t:{}:T>] {}:** {}\n",
        message.timestamp.timestamp(),
        message.author_name,
        truncate(&message.content, max_line_length)
    ));

    chat
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
