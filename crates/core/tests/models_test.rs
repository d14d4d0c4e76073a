mod common;

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{from_str, to_string};
use highlight_core::models::{
    highlight::{SubscriptionLimits, TermSubscribers, normalize_term},
    message::{
        DISCORD_EPOCH_MS, Notification, snowflake_from_timestamp, timestamp_from_snowflake,
    },
};

#[rstest]
#[case("Rust", "rust")]
#[case("  Release Notes \n", "release notes")]
#[case("ÉCOLE", "école")]
#[case("   ", "")]
fn test_normalize_term(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(normalize_term(raw), expected);
}

#[test]
fn test_default_limits() {
    let limits = SubscriptionLimits::default();
    assert_eq!(limits.max_terms, 20);
    assert_eq!(limits.max_term_length, 50);
}

#[test]
fn test_snowflake_from_timestamp() {
    let epoch = Utc.timestamp_millis_opt(DISCORD_EPOCH_MS).unwrap();
    assert_eq!(snowflake_from_timestamp(epoch), 0);

    let one_second_later = Utc.timestamp_millis_opt(DISCORD_EPOCH_MS + 1_000).unwrap();
    assert_eq!(snowflake_from_timestamp(one_second_later), 1_000 << 22);

    let before_epoch = Utc.timestamp_millis_opt(0).unwrap();
    assert_eq!(snowflake_from_timestamp(before_epoch), 0);
}

#[test]
fn test_snowflake_ordering_follows_time() {
    let earlier = snowflake_from_timestamp(common::at(11, 55, 0));
    let later = snowflake_from_timestamp(common::at(12, 0, 0));
    assert!(earlier < later);
}

#[test]
fn test_timestamp_from_snowflake() {
    // Example id from Discord's developer documentation.
    let created = timestamp_from_snowflake(175_928_847_299_117_063);
    assert_eq!(created.timestamp_millis(), 1_462_015_105_796);

    let noon = common::at(12, 0, 0);
    assert_eq!(timestamp_from_snowflake(snowflake_from_timestamp(noon)), noon);
}

#[test]
fn test_notification_summary() {
    let notification = Notification {
        term: "rust".to_string(),
        subscriber_id: 7,
        guild_id: common::GUILD_ID,
        guild_name: "Test Server".to_string(),
        channel_id: common::CHANNEL_ID,
        context: String::new(),
        jump_url: String::new(),
    };

    assert_eq!(
        notification.summary(),
        "You were mentioned with the highlight term `rust` in **Test Server** <#200>."
    );
}

#[test]
fn test_term_subscribers_serialization() {
    let row = common::subscribers("rust", &[3, 1, 2]);

    let json = to_string(&row).expect("Failed to serialize term subscribers");
    assert_eq!(json, r#"{"term":"rust","subscribers":[3,1,2]}"#);

    let deserialized: TermSubscribers = from_str(&json).expect("Failed to deserialize term subscribers");
    assert_eq!(deserialized, row);
}
