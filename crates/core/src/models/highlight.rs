use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of terms a single user may track at once.
pub const DEFAULT_MAX_TERMS: usize = 20;

/// Maximum length of a tracked term, in characters.
pub const DEFAULT_MAX_TERM_LENGTH: usize = 50;

/// A tracked word or phrase, stored in its normalized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub id: i64,
    pub term: String,
    pub created_at: DateTime<Utc>,
}

/// One term together with everyone currently subscribed to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermSubscribers {
    pub term: String,
    pub subscribers: Vec<u64>,
}

/// Per-user limits enforced when adding a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionLimits {
    pub max_terms: usize,
    pub max_term_length: usize,
}

impl Default for SubscriptionLimits {
    fn default() -> Self {
        Self {
            max_terms: DEFAULT_MAX_TERMS,
            max_term_length: DEFAULT_MAX_TERM_LENGTH,
        }
    }
}

/// Canonical form of a term: surrounding whitespace removed, lower-cased.
///
/// Two inputs that normalize to the same string refer to the same term.
pub fn normalize_term(raw: &str) -> String {
    raw.trim().to_lowercase()
}
