use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::mock;

use crate::capabilities::{
    ChannelHistory, Delivery, DeliveryStatus, Membership, SubscriptionStore,
};
use crate::models::{
    highlight::{Term, TermSubscribers},
    message::{HistoryMessage, Notification},
};

// Mock capabilities for testing
mock! {
    pub SubscriptionStore {}

    #[async_trait]
    impl SubscriptionStore for SubscriptionStore {
        async fn list_subscriptions(&self) -> eyre::Result<Vec<TermSubscribers>>;
        async fn create_or_get_term(&self, term: &str) -> eyre::Result<i64>;
        async fn find_term(&self, term: &str) -> eyre::Result<Option<Term>>;
        async fn add_subscription(&self, user_id: u64, term_id: i64) -> eyre::Result<bool>;
        async fn remove_subscription(&self, user_id: u64, term_id: i64) -> eyre::Result<bool>;
        async fn delete_term_if_orphaned(&self, term_id: i64) -> eyre::Result<bool>;
        async fn count_user_subscriptions(&self, user_id: u64) -> eyre::Result<usize>;
        async fn list_user_terms(&self, user_id: u64) -> eyre::Result<Vec<Term>>;
    }
}

mock! {
    pub ChannelHistory {}

    #[async_trait]
    impl ChannelHistory for ChannelHistory {
        async fn fetch_recent_messages(
            &self,
            channel_id: u64,
            limit: u8,
            before_id: u64,
        ) -> eyre::Result<Vec<HistoryMessage>>;

        async fn fetch_messages_since(
            &self,
            channel_id: u64,
            since: DateTime<Utc>,
        ) -> eyre::Result<Vec<HistoryMessage>>;
    }
}

mock! {
    pub Membership {}

    #[async_trait]
    impl Membership for Membership {
        type Member = u64;

        async fn resolve_member(&self, guild_id: u64, user_id: u64) -> eyre::Result<Option<u64>>;
        async fn can_view(&self, member: &u64, channel_id: u64) -> eyre::Result<bool>;
    }
}

mock! {
    pub Delivery {}

    #[async_trait]
    impl Delivery for Delivery {
        async fn send_direct_message(
            &self,
            notification: &Notification,
        ) -> eyre::Result<DeliveryStatus>;
    }
}
