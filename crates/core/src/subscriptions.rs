//! Adding, removing and listing a user's highlight terms.
//!
//! Every mutation refreshes the shared [`TermIndex`] before returning, so
//! the next scanned message always sees the stored state.

use std::sync::Arc;

use tracing::{info, warn};

use crate::capabilities::SubscriptionStore;
use crate::errors::{HighlightError, HighlightResult};
use crate::index::TermIndex;
use crate::models::highlight::{SubscriptionLimits, normalize_term};

pub struct SubscriptionService<S: ?Sized> {
    store: Arc<S>,
    index: Arc<TermIndex>,
    limits: SubscriptionLimits,
}

impl<S: ?Sized> Clone for SubscriptionService<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            index: self.index.clone(),
            limits: self.limits,
        }
    }
}

impl<S> SubscriptionService<S>
where
    S: SubscriptionStore + ?Sized,
{
    pub fn new(store: Arc<S>, index: Arc<TermIndex>, limits: SubscriptionLimits) -> Self {
        Self {
            store,
            index,
            limits,
        }
    }

    pub fn index(&self) -> &Arc<TermIndex> {
        &self.index
    }

    pub fn limits(&self) -> SubscriptionLimits {
        self.limits
    }

    /// Subscribes `user_id` to `term` and returns the normalized term.
    pub async fn add(&self, user_id: u64, term: &str) -> HighlightResult<String> {
        let term = normalize_term(term);

        if term.is_empty() {
            return Err(HighlightError::Validation(
                "Highlighted terms cannot be empty.".to_string(),
            ));
        }

        if term.chars().count() > self.limits.max_term_length {
            return Err(HighlightError::Validation(format!(
                "Highlighted terms must be at most {} characters.",
                self.limits.max_term_length
            )));
        }

        if self.store.count_user_subscriptions(user_id).await? >= self.limits.max_terms {
            return Err(HighlightError::Validation(format!(
                "You may only have up to {} highlighted terms at once.",
                self.limits.max_terms
            )));
        }

        let term_id = self.store.create_or_get_term(&term).await?;
        let added = match self.store.add_subscription(user_id, term_id).await {
            Ok(added) => added,
            Err(e) => {
                // The term row may have been created for this subscription alone
                self.discard_if_orphaned(term_id).await;
                return Err(e.into());
            }
        };
        if !added {
            return Err(HighlightError::Validation(format!(
                "You are already tracking `{}`.",
                term
            )));
        }
        self.index.refresh(&*self.store).await?;

        info!("User {} added highlight term {:?}", user_id, term);
        Ok(term)
    }

    /// Unsubscribes `user_id` from `term`, deleting the term once nobody
    /// tracks it anymore.
    pub async fn remove(&self, user_id: u64, term: &str) -> HighlightResult<String> {
        let term = normalize_term(term);
        let not_tracking = || HighlightError::NotFound("You are not tracking that term.".to_string());

        let row = self.store.find_term(&term).await?.ok_or_else(not_tracking)?;
        if !self.store.remove_subscription(user_id, row.id).await? {
            return Err(not_tracking());
        }
        self.store.delete_term_if_orphaned(row.id).await?;
        self.index.refresh(&*self.store).await?;

        info!("User {} removed highlight term {:?}", user_id, term);
        Ok(term)
    }

    /// Removes every subscription of `user_id` and returns how many there were.
    pub async fn clear(&self, user_id: u64) -> HighlightResult<usize> {
        let terms = self.store.list_user_terms(user_id).await?;
        if terms.is_empty() {
            return Err(HighlightError::NotFound(
                "You are not tracking any terms.".to_string(),
            ));
        }

        let mut cleared = 0;
        for term in &terms {
            if self.store.remove_subscription(user_id, term.id).await? {
                cleared += 1;
            }
            self.store.delete_term_if_orphaned(term.id).await?;
        }
        self.index.refresh(&*self.store).await?;

        info!("User {} cleared {} highlight terms", user_id, cleared);
        Ok(cleared)
    }

    async fn discard_if_orphaned(&self, term_id: i64) {
        if let Err(e) = self.store.delete_term_if_orphaned(term_id).await {
            warn!("Failed to delete orphaned term {}: {:?}", term_id, e);
        }
    }

    /// The user's terms, read straight from storage.
    pub async fn list(&self, user_id: u64) -> HighlightResult<Vec<String>> {
        let terms = self.store.list_user_terms(user_id).await?;
        if terms.is_empty() {
            return Err(HighlightError::NotFound(
                "You are not tracking any terms.".to_string(),
            ));
        }

        Ok(terms.into_iter().map(|t| t.term).collect())
    }
}
