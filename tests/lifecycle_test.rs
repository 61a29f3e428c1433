//! Tests for lifecycle operations against the store contract

mod common;

use std::sync::Arc;

use remixer::error::Error;
use remixer::lifecycle::LifecycleManager;
use remixer::models::PostStatus;
use remixer::store::{MemoryRemixStore, RemixStore};

use common::FakePublisher;

async fn setup() -> (
    Arc<MemoryRemixStore>,
    Arc<FakePublisher>,
    LifecycleManager<MemoryRemixStore, FakePublisher>,
    remixer::models::Remix,
) {
    let store = Arc::new(MemoryRemixStore::new());
    let publisher = Arc::new(FakePublisher::new());
    let manager = LifecycleManager::new(store.clone(), publisher.clone());
    let remix = common::draft_remix("alice");
    store.upsert(&remix).await.unwrap();
    (store, publisher, manager, remix)
}

#[tokio::test]
async fn test_edit_recomputes_character_count_exactly() {
    let (_store, _publisher, manager, remix) = setup().await;
    let linkedin_id = remix.variations[0].id.clone();

    let new_content = "Rewritten **post** about the cache";
    let updated = manager
        .edit_variation(&remix.id, "alice", &linkedin_id, new_content)
        .await
        .unwrap();

    let v = updated.find_variation(&linkedin_id).unwrap();
    assert_eq!(v.content, "Rewritten post about the cache");
    assert_eq!(v.character_count, v.content.chars().count());
    // LinkedIn never carries the hashtag field.
    assert_eq!(v.hashtags, None);
}

#[tokio::test]
async fn test_edit_recomputes_hashtags_for_twitter_only() {
    let (_store, _publisher, manager, remix) = setup().await;
    let tweet_id = remix.variations[1].id.clone();

    let updated = manager
        .edit_variation(&remix.id, "alice", &tweet_id, "New angle #caching #perf")
        .await
        .unwrap();
    let v = updated.find_variation(&tweet_id).unwrap();
    assert_eq!(
        v.hashtags,
        Some(vec!["#caching".to_string(), "#perf".to_string()])
    );

    // Editing away all hashtags clears the field rather than leaving [].
    let updated = manager
        .edit_variation(&remix.id, "alice", &tweet_id, "No tags now")
        .await
        .unwrap();
    assert_eq!(updated.find_variation(&tweet_id).unwrap().hashtags, None);
}

#[tokio::test]
async fn test_schedule_then_publish_full_transition() {
    let (store, _publisher, manager, remix) = setup().await;
    let linkedin_id = remix.variations[0].id.clone();

    manager
        .schedule_variation(&remix.id, "alice", &linkedin_id, "2026-09-01T09:00:00Z")
        .await
        .unwrap();

    let stored = store.read(&remix.id, "alice").await.unwrap().unwrap();
    assert_eq!(stored.status, PostStatus::Scheduled);

    let published = manager
        .publish_variation(&remix.id, "alice", &linkedin_id, "token")
        .await
        .unwrap();

    let v = published.find_variation(&linkedin_id).unwrap();
    assert_eq!(v.status, PostStatus::Published);
    assert!(v.published_at.is_some());
    assert!(v.scheduled_for.is_none());
    assert_eq!(published.status, PostStatus::Published);
    assert_eq!(published.published_at, v.published_at);
    assert_eq!(published.published_variation_ids, vec![linkedin_id]);
}

#[tokio::test]
async fn test_aggregate_status_follows_variants() {
    let (store, _publisher, manager, remix) = setup().await;
    let linkedin_id = remix.variations[0].id.clone();
    let tweet_id = remix.variations[1].id.clone();

    // Draft -> Scheduled via one variant.
    manager
        .schedule_variation(&remix.id, "alice", &tweet_id, "2026-12-01T00:00:00Z")
        .await
        .unwrap();
    let stored = store.read(&remix.id, "alice").await.unwrap().unwrap();
    assert_eq!(stored.status, PostStatus::Scheduled);

    // Published wins over Scheduled.
    manager
        .publish_variation(&remix.id, "alice", &linkedin_id, "token")
        .await
        .unwrap();
    let stored = store.read(&remix.id, "alice").await.unwrap().unwrap();
    assert_eq!(stored.status, PostStatus::Published);

    // Removing the scheduled variant keeps the aggregate Published.
    let updated = manager
        .delete_variation(&remix.id, "alice", &tweet_id)
        .await
        .unwrap();
    assert_eq!(updated.status, PostStatus::Published);
}

#[tokio::test]
async fn test_publish_failure_leaves_no_partial_state() {
    let store = Arc::new(MemoryRemixStore::new());
    let publisher = Arc::new(FakePublisher::failing());
    let manager = LifecycleManager::new(store.clone(), publisher.clone());
    let remix = common::draft_remix("alice");
    store.upsert(&remix).await.unwrap();
    let linkedin_id = remix.variations[0].id.clone();

    let err = manager
        .publish_variation(&remix.id, "alice", &linkedin_id, "token")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Publish(_)));
    assert!(err.is_recoverable());

    let stored = store.read(&remix.id, "alice").await.unwrap().unwrap();
    assert_eq!(stored.status, PostStatus::Draft);
    assert!(stored.published_variation_ids.is_empty());
    let v = stored.find_variation(&linkedin_id).unwrap();
    assert_eq!(v.status, PostStatus::Draft);
    assert!(v.published_at.is_none());
}

#[tokio::test]
async fn test_delete_published_remix_is_conflict() {
    let (_store, _publisher, manager, remix) = setup().await;
    let linkedin_id = remix.variations[0].id.clone();

    manager
        .publish_variation(&remix.id, "alice", &linkedin_id, "token")
        .await
        .unwrap();

    let err = manager.delete_remix(&remix.id, "alice").await.unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
}

#[tokio::test]
async fn test_delete_draft_remix_disappears_from_owner_queries() {
    let (_store, _publisher, manager, remix) = setup().await;

    assert_eq!(manager.list_remixes("alice").await.unwrap().len(), 1);
    manager.delete_remix(&remix.id, "alice").await.unwrap();
    assert!(manager.list_remixes("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_operations_are_owner_partitioned() {
    let (_store, _publisher, manager, remix) = setup().await;
    let linkedin_id = remix.variations[0].id.clone();

    // Same remix id under another owner does not resolve.
    let err = manager
        .edit_variation(&remix.id, "mallory", &linkedin_id, "hijack")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}
