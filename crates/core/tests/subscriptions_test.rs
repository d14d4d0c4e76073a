mod common;

use std::sync::Arc;

use common::InMemoryStore;
use highlight_core::errors::HighlightError;
use highlight_core::index::TermIndex;
use highlight_core::mock::MockSubscriptionStore;
use highlight_core::models::highlight::SubscriptionLimits;
use highlight_core::subscriptions::SubscriptionService;
use pretty_assertions::assert_eq;

fn service() -> (Arc<InMemoryStore>, SubscriptionService<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let index = Arc::new(TermIndex::new());
    let service = SubscriptionService::new(store.clone(), index, SubscriptionLimits::default());
    (store, service)
}

#[tokio::test]
async fn test_add_normalizes_and_refreshes_index() {
    let (store, service) = service();

    let term = service.add(1, "  Rust ").await.unwrap();

    assert_eq!(term, "rust");
    assert!(store.has_term("rust"));
    let snapshot = service.index().snapshot().await;
    assert!(snapshot.contains_term("rust"));
}

#[tokio::test]
async fn test_term_length_boundary() {
    let (_, service) = service();

    let fifty = "a".repeat(50);
    let fifty_one = "b".repeat(51);

    assert!(service.add(1, &fifty).await.is_ok());
    let err = service.add(1, &fifty_one).await.unwrap_err();
    assert!(matches!(err, HighlightError::Validation(_)));
    assert_eq!(service.list(1).await.unwrap(), vec![fifty]);
}

#[tokio::test]
async fn test_term_length_counts_characters_not_bytes() {
    let (_, service) = service();
    assert!(service.add(1, &"é".repeat(50)).await.is_ok());
}

#[tokio::test]
async fn test_empty_term_rejected() {
    let (store, service) = service();

    let err = service.add(1, "   ").await.unwrap_err();
    assert!(matches!(err, HighlightError::Validation(_)));
    assert_eq!(store.term_count(), 0);
}

#[tokio::test]
async fn test_subscription_count_boundary() {
    let (_, service) = service();

    for i in 0..19 {
        service.add(1, &format!("term{}", i)).await.unwrap();
    }
    assert!(service.add(1, "twentieth").await.is_ok());

    let err = service.add(1, "twenty-first").await.unwrap_err();
    assert!(matches!(err, HighlightError::Validation(_)));
    assert_eq!(service.list(1).await.unwrap().len(), 20);
    assert!(!service.index().snapshot().await.contains_term("twenty-first"));
}

#[tokio::test]
async fn test_limit_is_per_user() {
    let (_, service) = service();

    for i in 0..20 {
        service.add(1, &format!("term{}", i)).await.unwrap();
    }
    assert!(service.add(2, "term0").await.is_ok());
}

#[tokio::test]
async fn test_duplicate_add_rejected() {
    let (_, service) = service();

    service.add(1, "rust").await.unwrap();
    let err = service.add(1, "RUST").await.unwrap_err();

    assert!(matches!(err, HighlightError::Validation(_)));
    assert_eq!(service.list(1).await.unwrap(), vec!["rust".to_string()]);
}

#[tokio::test]
async fn test_shared_term_reused() {
    let (store, service) = service();

    service.add(1, "rust").await.unwrap();
    service.add(2, "rust").await.unwrap();

    assert_eq!(store.term_count(), 1);
    let snapshot = service.index().snapshot().await;
    assert_eq!(snapshot.subscribers("rust").map(|s| s.len()), Some(2));
}

#[tokio::test]
async fn test_add_then_remove_round_trip() {
    let (store, service) = service();
    service.add(1, "serde").await.unwrap();
    let before = service.list(1).await.unwrap().len();

    service.add(1, "rust").await.unwrap();
    service.remove(1, "rust").await.unwrap();

    assert_eq!(service.list(1).await.unwrap().len(), before);
    assert!(!store.has_term("rust"));
    assert!(!service.index().snapshot().await.contains_term("rust"));
}

#[tokio::test]
async fn test_remove_keeps_term_with_other_subscribers() {
    let (store, service) = service();
    service.add(1, "rust").await.unwrap();
    service.add(2, "rust").await.unwrap();

    service.remove(1, "Rust").await.unwrap();

    assert!(store.has_term("rust"));
    let snapshot = service.index().snapshot().await;
    assert_eq!(
        snapshot.subscribers("rust").map(|s| s.iter().copied().collect::<Vec<_>>()),
        Some(vec![2])
    );
}

#[tokio::test]
async fn test_remove_untracked_term() {
    let (_, service) = service();
    service.add(2, "rust").await.unwrap();

    let missing = service.remove(1, "python").await.unwrap_err();
    let other_users = service.remove(1, "rust").await.unwrap_err();

    assert!(matches!(missing, HighlightError::NotFound(_)));
    assert!(matches!(other_users, HighlightError::NotFound(_)));
    assert_eq!(other_users.user_message(), "You are not tracking that term.");
}

#[tokio::test]
async fn test_remove_does_not_match_id_substrings() {
    let (store, service) = service();
    // 12 is a substring of 123; only user 123 tracks the term.
    service.add(123, "rust").await.unwrap();

    assert!(service.remove(12, "rust").await.is_err());
    assert!(store.has_term("rust"));
}

#[tokio::test]
async fn test_clear_removes_everything_and_orphans() {
    let (store, service) = service();
    service.add(1, "rust").await.unwrap();
    service.add(1, "serde").await.unwrap();
    service.add(2, "serde").await.unwrap();

    let cleared = service.clear(1).await.unwrap();

    assert_eq!(cleared, 2);
    assert!(!store.has_term("rust"));
    assert!(store.has_term("serde"));
    assert!(matches!(service.list(1).await, Err(HighlightError::NotFound(_))));

    let snapshot = service.index().snapshot().await;
    assert!(!snapshot.contains_term("rust"));
    assert!(snapshot.contains_term("serde"));
}

#[tokio::test]
async fn test_clear_without_terms() {
    let (_, service) = service();
    let err = service.clear(1).await.unwrap_err();
    assert_eq!(err.user_message(), "You are not tracking any terms.");
}

#[tokio::test]
async fn test_list_sorted() {
    let (_, service) = service();
    service.add(1, "zebra").await.unwrap();
    service.add(1, "apple").await.unwrap();

    assert_eq!(
        service.list(1).await.unwrap(),
        vec!["apple".to_string(), "zebra".to_string()]
    );
}

#[tokio::test]
async fn test_validation_failure_does_not_touch_store() {
    let mut store = MockSubscriptionStore::new();
    store.expect_count_user_subscriptions().returning(|_| Ok(20));
    store.expect_create_or_get_term().never();
    store.expect_add_subscription().never();
    store.expect_list_subscriptions().never();

    let service = SubscriptionService::new(
        Arc::new(store),
        Arc::new(TermIndex::new()),
        SubscriptionLimits::default(),
    );

    assert!(matches!(
        service.add(1, "rust").await,
        Err(HighlightError::Validation(_))
    ));
}

#[tokio::test]
async fn test_storage_errors_surface_as_database_errors() {
    let mut store = MockSubscriptionStore::new();
    store
        .expect_list_user_terms()
        .returning(|_| Err(eyre::eyre!("pool timed out")));

    let service = SubscriptionService::new(
        Arc::new(store),
        Arc::new(TermIndex::new()),
        SubscriptionLimits::default(),
    );

    assert!(matches!(service.list(1).await, Err(HighlightError::Database(_))));
}

#[tokio::test]
async fn test_failed_subscribe_discards_new_term() {
    let mut store = MockSubscriptionStore::new();
    store.expect_count_user_subscriptions().returning(|_| Ok(0));
    store.expect_create_or_get_term().returning(|_| Ok(5));
    store
        .expect_add_subscription()
        .returning(|_, _| Err(eyre::eyre!("foreign key violation")));
    store
        .expect_delete_term_if_orphaned()
        .withf(|term_id| *term_id == 5)
        .times(1)
        .returning(|_| Ok(true));
    store.expect_list_subscriptions().never();

    let service = SubscriptionService::new(
        Arc::new(store),
        Arc::new(TermIndex::new()),
        SubscriptionLimits::default(),
    );

    assert!(matches!(
        service.add(1, "rust").await,
        Err(HighlightError::Database(_))
    ));
}
