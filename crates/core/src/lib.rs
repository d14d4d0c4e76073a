//! # Highlight core
//!
//! Platform-independent logic for highlight notifications: the term
//! subscription rules, the in-memory term index, the message scanner and
//! the notification dispatcher.
//!
//! Everything that talks to the outside world (storage, channel history,
//! membership lookups, direct messages) is reached through the traits in
//! [`capabilities`], so the Discord and Postgres layers can be swapped for
//! mocks in tests.

pub mod capabilities;
pub mod dispatch;
pub mod errors;
pub mod index;
pub mod matcher;
pub mod mock;
pub mod models;
pub mod scanner;
pub mod subscriptions;
