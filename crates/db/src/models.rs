use chrono::{DateTime, Utc};
use highlight_core::models::highlight::{Term, TermSubscribers};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbHighlightTerm {
    pub id: i64,
    pub term: String,
    pub created_at: DateTime<Utc>,
}

/// A term with its subscriber ids aggregated into a JSON array.
#[derive(Debug, Clone, FromRow)]
pub struct DbTermSubscribers {
    pub id: i64,
    pub term: String,
    pub subscribers: Json<Vec<i64>>,
}

impl From<DbHighlightTerm> for Term {
    fn from(row: DbHighlightTerm) -> Self {
        Term {
            id: row.id,
            term: row.term,
            created_at: row.created_at,
        }
    }
}

impl From<DbTermSubscribers> for TermSubscribers {
    fn from(row: DbTermSubscribers) -> Self {
        TermSubscribers {
            term: row.term,
            subscribers: row.subscribers.0.into_iter().map(|id| id as u64).collect(),
        }
    }
}

/// Discord snowflakes fit in 63 bits, so the cast is lossless.
pub fn user_id_param(user_id: u64) -> i64 {
    user_id as i64
}
