//! Legacy JSON import tests

use async_trait::async_trait;
use di::{Injectable, Ref, ServiceCollection, ServiceProvider, existing_as_self};
use serde_json::json;
use sqlx::SqlitePool;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use twosevenths_api::infrastructure::database::{DatabaseConnection, StoreError};
use twosevenths_api::infrastructure::entities::{Message, VoteOption};
use twosevenths_api::infrastructure::legacy::{
    ImportReport, MESSAGES_FILE, VOTES_FILE, import_legacy_data,
};
use twosevenths_api::infrastructure::repositories::{DbMessageRepository, DbVoteRepository};
use twosevenths_api::infrastructure::traits::{MessageRepository, VoteRepository};

static TEST_DB_COUNTER: AtomicU32 = AtomicU32::new(0);

async fn setup_test_db() -> SqlitePool {
    let db_num = TEST_DB_COUNTER.fetch_add(1, Ordering::SeqCst);
    let db_url = format!("sqlite:file:legacydb{}?mode=memory&cache=shared", db_num);

    let pool = SqlitePool::connect(&db_url).await.unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();
    pool
}

fn build_provider(pool: &SqlitePool) -> ServiceProvider {
    ServiceCollection::new()
        .add(existing_as_self(DatabaseConnection::from_pool(pool.clone())))
        .add(DbVoteRepository::scoped())
        .add(DbMessageRepository::scoped())
        .build_provider()
        .unwrap()
}

async fn run_import(provider: &ServiceProvider, dir: &Path) -> ImportReport {
    import_legacy_data(
        dir,
        &*provider.get_required::<dyn VoteRepository>(),
        &*provider.get_required::<dyn MessageRepository>(),
    )
    .await
}

/// Stores messages normally but refuses to touch like counters.
struct LikesUnavailable {
    inner: Ref<dyn MessageRepository>,
}

#[async_trait]
impl MessageRepository for LikesUnavailable {
    async fn add_message(
        &self,
        id: &str,
        content: &str,
        option: VoteOption,
        timestamp: &str,
    ) -> Result<(), StoreError> {
        self.inner.add_message(id, content, option, timestamp).await
    }

    async fn list_messages(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Message>, i64), StoreError> {
        self.inner.list_messages(limit, offset).await
    }

    async fn like_message(&self, id: &str) -> Result<Option<i64>, StoreError> {
        self.inner.like_message(id).await
    }

    async fn message_by_id(&self, id: &str) -> Result<Option<Message>, StoreError> {
        self.inner.message_by_id(id).await
    }

    async fn set_likes(&self, _id: &str, _likes: i64) -> Result<bool, StoreError> {
        Err(StoreError {
            operation: "set message likes",
        })
    }
}

fn write_json(dir: &Path, name: &str, value: serde_json::Value) {
    std::fs::write(dir.join(name), value.to_string()).unwrap();
}

#[tokio::test]
async fn test_import_vote_and_liked_message() {
    let pool = setup_test_db().await;
    let provider = build_provider(&pool);
    let dir = tempfile::tempdir().unwrap();

    write_json(
        dir.path(),
        VOTES_FILE,
        json!({ "votes": [{ "option": "single", "timestamp": "2024-11-02T10:00:00" }] }),
    );
    write_json(
        dir.path(),
        MESSAGES_FILE,
        json!({ "messages": [{
            "id": "legacy-1",
            "content": "old comment",
            "option": "double",
            "likes": 3,
            "timestamp": "2024-11-02T10:05:00+00:00"
        }] }),
    );

    let report = run_import(&provider, dir.path()).await;
    assert_eq!(
        report,
        ImportReport {
            votes: 1,
            messages: 1,
            failed: 0
        }
    );

    let tally = provider
        .get_required::<dyn VoteRepository>()
        .vote_stats()
        .await
        .unwrap();
    assert_eq!(tally.total, 1);
    assert_eq!(tally.counts.get(&VoteOption::Single), Some(&1));
    assert_eq!(tally.timeline[0].timestamp, "2024-11-02T10:00:00");

    let message = provider
        .get_required::<dyn MessageRepository>()
        .message_by_id("legacy-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(message.content, "old comment");
    assert_eq!(message.option, VoteOption::Double);
    assert_eq!(message.likes, 3);
    assert_eq!(message.timestamp, "2024-11-02T10:05:00+00:00");
}

#[tokio::test]
async fn test_files_are_imported_once() {
    let pool = setup_test_db().await;
    let provider = build_provider(&pool);
    let dir = tempfile::tempdir().unwrap();

    write_json(
        dir.path(),
        VOTES_FILE,
        json!({ "votes": [
            { "option": "double", "timestamp": "2024-11-02T10:00:00" },
            { "option": "alternate", "timestamp": "2024-11-02T10:01:00" }
        ] }),
    );

    assert_eq!(run_import(&provider, dir.path()).await.votes, 2);
    assert!(!dir.path().join(VOTES_FILE).exists());
    assert!(dir.path().join("stats.json.migrated").exists());

    assert_eq!(run_import(&provider, dir.path()).await, ImportReport::default());

    let tally = provider
        .get_required::<dyn VoteRepository>()
        .vote_stats()
        .await
        .unwrap();
    assert_eq!(tally.total, 2);
}

#[tokio::test]
async fn test_bad_records_are_skipped() {
    let pool = setup_test_db().await;
    let provider = build_provider(&pool);
    let dir = tempfile::tempdir().unwrap();

    write_json(
        dir.path(),
        VOTES_FILE,
        json!({ "votes": [
            { "option": "never", "timestamp": "2024-11-02T10:00:00" },
            { "option": "single", "timestamp": "2024-11-02T10:01:00" }
        ] }),
    );
    write_json(
        dir.path(),
        MESSAGES_FILE,
        json!({ "messages": [
            { "id": "a", "content": "", "option": "single", "timestamp": "2024-11-02T10:00:00" },
            { "id": "b", "content": "kept", "option": "single", "timestamp": "2024-11-02T10:00:01" },
            { "id": "b", "content": "duplicate", "option": "single", "timestamp": "2024-11-02T10:00:02" },
            { "id": "c", "content": "bad option", "option": "weekly", "timestamp": "2024-11-02T10:00:03" }
        ] }),
    );

    let report = run_import(&provider, dir.path()).await;
    assert_eq!(
        report,
        ImportReport {
            votes: 1,
            messages: 1,
            failed: 0
        }
    );

    let (messages, total) = provider
        .get_required::<dyn MessageRepository>()
        .list_messages(50, 0)
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(messages[0].content, "kept");
    assert_eq!(messages[0].likes, 0);
}

#[tokio::test]
async fn test_missing_or_malformed_files() {
    let pool = setup_test_db().await;
    let provider = build_provider(&pool);
    let dir = tempfile::tempdir().unwrap();

    assert_eq!(run_import(&provider, dir.path()).await, ImportReport::default());

    std::fs::write(dir.path().join(MESSAGES_FILE), "{ not json").unwrap();
    assert_eq!(run_import(&provider, dir.path()).await, ImportReport::default());
    // left in place for someone to fix by hand
    assert!(dir.path().join(MESSAGES_FILE).exists());
}

#[tokio::test]
async fn test_store_failure_keeps_legacy_file() {
    let pool = setup_test_db().await;
    let provider = build_provider(&pool);
    let dir = tempfile::tempdir().unwrap();

    write_json(
        dir.path(),
        VOTES_FILE,
        json!({ "votes": [{ "option": "double", "timestamp": "2024-11-02T10:00:00" }] }),
    );
    sqlx::query("DROP TABLE votes").execute(&pool).await.unwrap();

    let report = run_import(&provider, dir.path()).await;
    assert_eq!(
        report,
        ImportReport {
            votes: 0,
            messages: 0,
            failed: 1
        }
    );
    assert!(dir.path().join(VOTES_FILE).exists());
    assert!(!dir.path().join("stats.json.migrated").exists());
}

#[tokio::test]
async fn test_lost_likes_are_restored_on_retry() {
    let pool = setup_test_db().await;
    let provider = build_provider(&pool);
    let dir = tempfile::tempdir().unwrap();

    write_json(
        dir.path(),
        MESSAGES_FILE,
        json!({ "messages": [{
            "id": "legacy-1",
            "content": "old comment",
            "option": "single",
            "likes": 4,
            "timestamp": "2024-11-02T10:05:00+00:00"
        }] }),
    );

    let failing = LikesUnavailable {
        inner: provider.get_required::<dyn MessageRepository>(),
    };
    let report = import_legacy_data(
        dir.path(),
        &*provider.get_required::<dyn VoteRepository>(),
        &failing,
    )
    .await;
    assert_eq!(report.messages, 1);
    assert_eq!(report.failed, 1);
    assert!(dir.path().join(MESSAGES_FILE).exists());

    // second start: the message is already there, only the counter is written
    let report = run_import(&provider, dir.path()).await;
    assert_eq!(report, ImportReport::default());
    assert!(dir.path().join("messages.json.migrated").exists());

    let messages = provider.get_required::<dyn MessageRepository>();
    let stored = messages.message_by_id("legacy-1").await.unwrap().unwrap();
    assert_eq!(stored.likes, 4);
    let (_, total) = messages.list_messages(50, 0).await.unwrap();
    assert_eq!(total, 1);
}
