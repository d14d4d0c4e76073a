//! Boundaries between the highlight core and the services it depends on.
//!
//! Implementations live in the `highlight-db` crate (storage) and the
//! `highlight-discord-bot` crate (history, membership, delivery).
//! Mocks of every trait are available in [`crate::mock`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;

use crate::models::{
    highlight::{Term, TermSubscribers},
    message::{HistoryMessage, Notification},
};

/// Persistent storage for terms and subscriptions.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Every term that has at least one subscriber, ordered by term.
    async fn list_subscriptions(&self) -> Result<Vec<TermSubscribers>>;

    /// Returns the id of `term`, inserting it if it does not exist yet.
    async fn create_or_get_term(&self, term: &str) -> Result<i64>;

    async fn find_term(&self, term: &str) -> Result<Option<Term>>;

    /// Returns `false` when the subscription already existed.
    async fn add_subscription(&self, user_id: u64, term_id: i64) -> Result<bool>;

    /// Returns `false` when the user was not subscribed to the term.
    async fn remove_subscription(&self, user_id: u64, term_id: i64) -> Result<bool>;

    /// Deletes the term when no subscription references it.
    /// Returns `true` if a row was deleted.
    async fn delete_term_if_orphaned(&self, term_id: i64) -> Result<bool>;

    async fn count_user_subscriptions(&self, user_id: u64) -> Result<usize>;

    /// Terms the user is subscribed to, ordered by term.
    async fn list_user_terms(&self, user_id: u64) -> Result<Vec<Term>>;
}

/// Read access to a channel's recent messages.
#[async_trait]
pub trait ChannelHistory: Send + Sync {
    /// Up to `limit` messages sent before the message `before_id`, newest first.
    async fn fetch_recent_messages(
        &self,
        channel_id: u64,
        limit: u8,
        before_id: u64,
    ) -> Result<Vec<HistoryMessage>>;

    /// Messages sent at or after `since`, in any order.
    async fn fetch_messages_since(
        &self,
        channel_id: u64,
        since: DateTime<Utc>,
    ) -> Result<Vec<HistoryMessage>>;
}

/// Guild membership and channel visibility checks.
#[async_trait]
pub trait Membership: Send + Sync {
    type Member: Send + Sync;

    /// `Ok(None)` when the user is not (or no longer) a member of the guild.
    async fn resolve_member(&self, guild_id: u64, user_id: u64) -> Result<Option<Self::Member>>;

    async fn can_view(&self, member: &Self::Member, channel_id: u64) -> Result<bool>;
}

/// Result of a direct-message attempt that reached the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Delivered,
    /// The recipient does not accept direct messages from the bot.
    Forbidden,
}

#[async_trait]
pub trait Delivery: Send + Sync {
    async fn send_direct_message(&self, notification: &Notification) -> Result<DeliveryStatus>;
}
