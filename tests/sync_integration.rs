//! Authenticated-mode synchronization: bulk fetch, fallbacks, rollback,
//! realtime invalidation, and teardown.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use learntrack::auth::AuthState;
use learntrack::context::LearningContext;
use learntrack::domain::{NewTopic, Topic, TopicPatch};
use learntrack::remote::{MemoryBackend, RemoteBackend, TopicRow};
use learntrack::seed::SeedData;
use learntrack::test_helpers::{wait_until, RecordingNotifier};

async fn signed_in_context(
    backend: Arc<MemoryBackend>,
    owner: Uuid,
    seed: SeedData,
) -> LearningContext {
    LearningContext::new(
        backend,
        Arc::new(AuthState::signed_in(owner)),
        seed,
        Arc::new(RecordingNotifier::new()),
    )
    .await
}

fn topic_row(owner: Uuid, title: &str) -> TopicRow {
    let topic = Topic::new(NewTopic {
        title: title.to_string(),
        category_id: Uuid::new_v4(),
        ..Default::default()
    });
    TopicRow::from_topic(&topic, owner)
}

#[tokio::test]
async fn test_bulk_fetch_replaces_collections() {
    let backend = Arc::new(MemoryBackend::new());
    let owner = Uuid::new_v4();
    backend.insert_topic(topic_row(owner, "Remote A")).await.unwrap();
    backend.insert_topic(topic_row(owner, "Remote B")).await.unwrap();
    // Another identity's rows must never leak in.
    backend
        .insert_topic(topic_row(Uuid::new_v4(), "Not mine"))
        .await
        .unwrap();

    let context = signed_in_context(backend, owner, SeedData::demo()).await;

    assert!(context.data_fetched());
    let titles: Vec<String> = context.topics.all().iter().map(|t| t.title.clone()).collect();
    assert_eq!(titles, ["Remote A", "Remote B"]);
}

#[tokio::test]
async fn test_empty_remote_kind_falls_back_to_seed() {
    let backend = Arc::new(MemoryBackend::new());
    let owner = Uuid::new_v4();
    backend.insert_topic(topic_row(owner, "Only topic")).await.unwrap();

    let seed = SeedData::demo();
    let seed_categories = seed.categories.len();
    let context = signed_in_context(backend, owner, seed).await;

    // Topics came from the remote store; categories were empty remotely and
    // fall back to onboarding content.
    assert_eq!(context.topics.all().len(), 1);
    assert_eq!(context.categories.all().len(), seed_categories);
}

#[tokio::test]
async fn test_bulk_fetch_failure_degrades_to_seed() {
    let backend = Arc::new(MemoryBackend::new());
    backend.fail_reads(true);

    let context = signed_in_context(backend, Uuid::new_v4(), SeedData::demo()).await;

    assert!(context.error().is_some());
    assert!(!context.data_fetched());
    assert_eq!(context.topics.all().len(), 3);
}

#[tokio::test]
async fn test_create_failure_rolls_back_optimistic_insert() {
    let backend = Arc::new(MemoryBackend::new());
    let owner = Uuid::new_v4();
    let context = signed_in_context(Arc::clone(&backend), owner, SeedData::empty()).await;

    backend.fail_writes(true);
    let category_id = Uuid::new_v4();
    let result = context
        .topics
        .add(NewTopic {
            title: "Doomed".to_string(),
            category_id,
            ..Default::default()
        })
        .await;

    assert!(result.is_err());
    assert!(context.topics.all().iter().all(|t| t.title != "Doomed"));
    assert!(backend.list_topics(owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_failure_resyncs_from_remote() {
    let backend = Arc::new(MemoryBackend::new());
    let owner = Uuid::new_v4();
    let context = signed_in_context(Arc::clone(&backend), owner, SeedData::empty()).await;

    let topic = context
        .topics
        .add(NewTopic {
            title: "React".to_string(),
            category_id: Uuid::new_v4(),
            ..Default::default()
        })
        .await
        .unwrap();

    backend.fail_writes(true);
    assert!(context
        .topics
        .update(topic.id, TopicPatch::progress(80))
        .await
        .is_err());
    backend.fail_writes(false);

    // The optimistic merge is overwritten once the triggered re-fetch lands.
    let topics = context.topics.clone();
    let id = topic.id;
    assert!(
        wait_until(
            move || topics.get(id).map(|t| t.progress) == Some(0),
            Duration::from_secs(2),
        )
        .await
    );
}

#[tokio::test]
async fn test_external_change_triggers_refetch() {
    let backend = Arc::new(MemoryBackend::new());
    let owner = Uuid::new_v4();
    let context = signed_in_context(Arc::clone(&backend), owner, SeedData::empty()).await;
    assert!(context.topics.all().is_empty());

    // Another client writes a row; only the change event reaches us.
    backend
        .insert_topic(topic_row(owner, "From elsewhere"))
        .await
        .unwrap();

    let topics = context.topics.clone();
    assert!(
        wait_until(
            move || topics.all().iter().any(|t| t.title == "From elsewhere"),
            Duration::from_secs(2),
        )
        .await
    );
}

#[tokio::test]
async fn test_sign_in_after_anonymous_preview_fetches_remote_data() {
    let backend = Arc::new(MemoryBackend::new());
    let owner = Uuid::new_v4();
    backend.insert_topic(topic_row(owner, "Mine")).await.unwrap();

    let auth = Arc::new(AuthState::anonymous());
    let context = LearningContext::new(
        Arc::clone(&backend) as Arc<dyn RemoteBackend>,
        Arc::clone(&auth),
        SeedData::demo(),
        Arc::new(RecordingNotifier::new()),
    )
    .await;

    // Logged-out preview shows seed content and no fetched flag.
    assert!(!context.data_fetched());
    assert_eq!(context.topics.all().len(), 3);

    auth.sign_in(owner);

    let topics = context.topics.clone();
    assert!(
        wait_until(
            move || topics.all().iter().any(|t| t.title == "Mine"),
            Duration::from_secs(2),
        )
        .await
    );
    assert!(context.data_fetched());
}

#[tokio::test]
async fn test_shutdown_releases_subscriptions() {
    let backend = Arc::new(MemoryBackend::new());
    let owner = Uuid::new_v4();
    let context = signed_in_context(Arc::clone(&backend), owner, SeedData::empty()).await;

    context.shutdown();

    backend
        .insert_topic(topic_row(owner, "After shutdown"))
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(context.topics.all().is_empty());
}

#[tokio::test]
async fn test_demo_mode_never_touches_remote() {
    let backend = Arc::new(MemoryBackend::new());
    backend.fail_reads(true);
    backend.fail_writes(true);

    let context = LearningContext::new(
        Arc::clone(&backend) as Arc<dyn RemoteBackend>,
        Arc::new(AuthState::demo()),
        SeedData::demo(),
        Arc::new(RecordingNotifier::new()),
    )
    .await;

    // Failure injection is irrelevant in demo mode: no remote calls happen.
    assert!(context.error().is_none());
    assert!(context.data_fetched());
    let category = context.categories.add("Offline").await.unwrap();
    assert!(context.categories.get(category.id).is_some());
}
