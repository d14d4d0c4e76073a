use async_trait::async_trait;
use eyre::Result;
use highlight_core::capabilities::SubscriptionStore;
use highlight_core::models::highlight::{Term, TermSubscribers};

use crate::DbPool;
use crate::repositories::highlight;

/// [`SubscriptionStore`] backed by the Postgres highlight tables.
#[derive(Debug, Clone)]
pub struct PgSubscriptionStore {
    pool: DbPool,
}

impl PgSubscriptionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl SubscriptionStore for PgSubscriptionStore {
    async fn list_subscriptions(&self) -> Result<Vec<TermSubscribers>> {
        let rows = highlight::list_term_subscribers(&self.pool).await?;
        Ok(rows.into_iter().map(TermSubscribers::from).collect())
    }

    async fn create_or_get_term(&self, term: &str) -> Result<i64> {
        Ok(highlight::create_or_get_term(&self.pool, term).await?.id)
    }

    async fn find_term(&self, term: &str) -> Result<Option<Term>> {
        Ok(highlight::get_term_by_name(&self.pool, term)
            .await?
            .map(Term::from))
    }

    async fn add_subscription(&self, user_id: u64, term_id: i64) -> Result<bool> {
        highlight::add_subscription(&self.pool, user_id, term_id).await
    }

    async fn remove_subscription(&self, user_id: u64, term_id: i64) -> Result<bool> {
        highlight::remove_subscription(&self.pool, user_id, term_id).await
    }

    async fn delete_term_if_orphaned(&self, term_id: i64) -> Result<bool> {
        highlight::delete_term_if_orphaned(&self.pool, term_id).await
    }

    async fn count_user_subscriptions(&self, user_id: u64) -> Result<usize> {
        let count = highlight::count_user_subscriptions(&self.pool, user_id).await?;
        Ok(usize::try_from(count)?)
    }

    async fn list_user_terms(&self, user_id: u64) -> Result<Vec<Term>> {
        let rows = highlight::get_user_terms(&self.pool, user_id).await?;
        Ok(rows.into_iter().map(Term::from).collect())
    }
}
