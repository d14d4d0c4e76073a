//! In-memory term index.
//!
//! The index is a cache of the subscription store. It is never patched in
//! place: every refresh builds a brand new [`IndexSnapshot`] from the store
//! and swaps it in, and scans hold on to the snapshot they started with.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use eyre::Result;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

use crate::capabilities::SubscriptionStore;
use crate::matcher::TermMatcher;
use crate::models::highlight::{TermSubscribers, normalize_term};

/// A term, its compiled matcher and its subscribers.
#[derive(Debug, Clone)]
pub struct IndexedTerm {
    matcher: TermMatcher,
    subscribers: HashSet<u64>,
}

impl IndexedTerm {
    pub fn term(&self) -> &str {
        self.matcher.term()
    }

    pub fn subscribers(&self) -> &HashSet<u64> {
        &self.subscribers
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.matcher.is_match(text)
    }
}

/// Immutable view of every term and its subscriber set.
#[derive(Debug, Clone, Default)]
pub struct IndexSnapshot {
    entries: Vec<IndexedTerm>,
    by_term: HashMap<String, usize>,
}

impl IndexSnapshot {
    pub fn from_subscriptions(rows: Vec<TermSubscribers>) -> Self {
        let mut snapshot = Self::default();

        for row in rows {
            if row.subscribers.is_empty() {
                continue;
            }

            let key = normalize_term(&row.term);
            if let Some(&position) = snapshot.by_term.get(&key) {
                snapshot.entries[position].subscribers.extend(row.subscribers);
                continue;
            }

            let matcher = match TermMatcher::new(&key) {
                Ok(matcher) => matcher,
                Err(e) => {
                    warn!("Skipping highlight term {:?}: {}", key, e);
                    continue;
                }
            };

            snapshot.by_term.insert(key, snapshot.entries.len());
            snapshot.entries.push(IndexedTerm {
                matcher,
                subscribers: row.subscribers.into_iter().collect(),
            });
        }

        snapshot
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn terms(&self) -> impl Iterator<Item = &IndexedTerm> {
        self.entries.iter()
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.by_term.contains_key(&normalize_term(term))
    }

    pub fn subscribers(&self, term: &str) -> Option<&HashSet<u64>> {
        self.by_term
            .get(&normalize_term(term))
            .map(|&position| &self.entries[position].subscribers)
    }

    /// Ordered copy of the contents, for comparisons and diagnostics.
    pub fn to_map(&self) -> BTreeMap<String, BTreeSet<u64>> {
        self.entries
            .iter()
            .map(|entry| {
                (
                    entry.term().to_string(),
                    entry.subscribers.iter().copied().collect(),
                )
            })
            .collect()
    }
}

/// Owner of the current snapshot.
///
/// Construct one per bot instance and share it behind an `Arc`.
#[derive(Debug, Default)]
pub struct TermIndex {
    current: RwLock<Arc<IndexSnapshot>>,
    /// Held across read and swap so refreshes land in the order they read.
    refreshing: Mutex<()>,
}

impl TermIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an index already populated from `store`.
    pub async fn load<S>(store: &S) -> Result<Self>
    where
        S: SubscriptionStore + ?Sized,
    {
        let index = Self::new();
        index.refresh(store).await?;
        Ok(index)
    }

    /// Rebuilds the whole index from `store`.
    ///
    /// Refreshes run one at a time. On error the previous snapshot stays
    /// in place.
    pub async fn refresh<S>(&self, store: &S) -> Result<()>
    where
        S: SubscriptionStore + ?Sized,
    {
        let _guard = self.refreshing.lock().await;

        let rows = store.list_subscriptions().await?;
        let snapshot = Arc::new(IndexSnapshot::from_subscriptions(rows));
        debug!("Highlight index refreshed: {} terms", snapshot.len());

        *self.current.write().await = snapshot;
        Ok(())
    }

    pub async fn snapshot(&self) -> Arc<IndexSnapshot> {
        self.current.read().await.clone()
    }
}
