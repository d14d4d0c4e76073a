#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use highlight_core::capabilities::SubscriptionStore;
use highlight_core::models::{
    highlight::{Term, TermSubscribers},
    message::{HistoryMessage, InboundMessage},
};

pub const GUILD_ID: u64 = 100;
pub const CHANNEL_ID: u64 = 200;

/// Subscription store backed by two in-memory tables, mirroring the
/// Postgres schema closely enough for service-level tests.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Tables>,
}

#[derive(Default)]
struct Tables {
    next_id: i64,
    terms: BTreeMap<i64, Term>,
    subscriptions: BTreeSet<(u64, i64)>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term_count(&self) -> usize {
        self.inner.lock().unwrap().terms.len()
    }

    pub fn has_term(&self, term: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .terms
            .values()
            .any(|t| t.term == term)
    }
}

#[async_trait]
impl SubscriptionStore for InMemoryStore {
    async fn list_subscriptions(&self) -> eyre::Result<Vec<TermSubscribers>> {
        let tables = self.inner.lock().unwrap();
        let mut rows: Vec<TermSubscribers> = tables
            .terms
            .values()
            .map(|term| TermSubscribers {
                term: term.term.clone(),
                subscribers: tables
                    .subscriptions
                    .iter()
                    .filter(|(_, term_id)| *term_id == term.id)
                    .map(|(user_id, _)| *user_id)
                    .collect(),
            })
            .filter(|row| !row.subscribers.is_empty())
            .collect();
        rows.sort_by(|a, b| a.term.cmp(&b.term));
        Ok(rows)
    }

    async fn create_or_get_term(&self, term: &str) -> eyre::Result<i64> {
        let mut tables = self.inner.lock().unwrap();
        if let Some(existing) = tables.terms.values().find(|t| t.term == term) {
            return Ok(existing.id);
        }
        tables.next_id += 1;
        let id = tables.next_id;
        tables.terms.insert(
            id,
            Term {
                id,
                term: term.to_string(),
                created_at: Utc::now(),
            },
        );
        Ok(id)
    }

    async fn find_term(&self, term: &str) -> eyre::Result<Option<Term>> {
        let tables = self.inner.lock().unwrap();
        Ok(tables.terms.values().find(|t| t.term == term).cloned())
    }

    async fn add_subscription(&self, user_id: u64, term_id: i64) -> eyre::Result<bool> {
        let mut tables = self.inner.lock().unwrap();
        if !tables.terms.contains_key(&term_id) {
            return Err(eyre::eyre!("term {} does not exist", term_id));
        }
        Ok(tables.subscriptions.insert((user_id, term_id)))
    }

    async fn remove_subscription(&self, user_id: u64, term_id: i64) -> eyre::Result<bool> {
        let mut tables = self.inner.lock().unwrap();
        Ok(tables.subscriptions.remove(&(user_id, term_id)))
    }

    async fn delete_term_if_orphaned(&self, term_id: i64) -> eyre::Result<bool> {
        let mut tables = self.inner.lock().unwrap();
        if tables.subscriptions.iter().any(|(_, id)| *id == term_id) {
            return Ok(false);
        }
        Ok(tables.terms.remove(&term_id).is_some())
    }

    async fn count_user_subscriptions(&self, user_id: u64) -> eyre::Result<usize> {
        let tables = self.inner.lock().unwrap();
        Ok(tables
            .subscriptions
            .iter()
            .filter(|(id, _)| *id == user_id)
            .count())
    }

    async fn list_user_terms(&self, user_id: u64) -> eyre::Result<Vec<Term>> {
        let tables = self.inner.lock().unwrap();
        let mut terms: Vec<Term> = tables
            .subscriptions
            .iter()
            .filter(|(id, _)| *id == user_id)
            .filter_map(|(_, term_id)| tables.terms.get(term_id).cloned())
            .collect();
        terms.sort_by(|a, b| a.term.cmp(&b.term));
        Ok(terms)
    }
}

pub fn at(hour: u32, minute: u32, second: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, hour, minute, second).unwrap()
}

pub fn inbound(author_id: u64, author_name: &str, content: &str) -> InboundMessage {
    InboundMessage {
        id: 9000,
        guild_id: GUILD_ID,
        guild_name: "Test Server".to_string(),
        channel_id: CHANNEL_ID,
        author_id,
        author_name: author_name.to_string(),
        author_is_bot: false,
        content: content.to_string(),
        timestamp: at(12, 0, 0),
        jump_url: format!("https://discord.com/channels/{}/{}/9000", GUILD_ID, CHANNEL_ID),
    }
}

pub fn history(author_id: u64, author_name: &str, content: &str, timestamp: DateTime<Utc>) -> HistoryMessage {
    HistoryMessage {
        author_id,
        author_name: author_name.to_string(),
        content: content.to_string(),
        timestamp,
    }
}

pub fn subscribers(term: &str, ids: &[u64]) -> TermSubscribers {
    TermSubscribers {
        term: term.to_string(),
        subscribers: ids.to_vec(),
    }
}
