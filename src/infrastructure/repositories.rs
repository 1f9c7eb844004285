//! DB Repository abstractions

use crate::infrastructure::database::{DatabaseConnection, StoreError};
use crate::infrastructure::entities::{Message, Vote, VoteOption, VoteTally};
use crate::infrastructure::traits::{MessageRepository, VoteRepository};
use async_trait::async_trait;
use di::{Ref, injectable};

/// Number of votes returned on the stats timeline.
pub const TIMELINE_LENGTH: i64 = 100;

#[injectable(VoteRepository)]
pub struct DbVoteRepository {
    connection: Ref<DatabaseConnection>,
}

impl DbVoteRepository {
    async fn insert_vote(&self, option: VoteOption, timestamp: &str) -> sqlx::Result<()> {
        let mut tx = self.connection.begin().await?;

        sqlx::query("INSERT INTO votes (option, timestamp) VALUES (?, ?)")
            .bind(option)
            .bind(timestamp)
            .execute(&mut *tx)
            .await?;

        tx.commit().await
    }

    async fn read_tally(&self) -> sqlx::Result<VoteTally> {
        let mut tx = self.connection.begin().await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM votes")
            .fetch_one(&mut *tx)
            .await?;

        let counts: Vec<(VoteOption, i64)> =
            sqlx::query_as("SELECT option, COUNT(*) FROM votes GROUP BY option")
                .fetch_all(&mut *tx)
                .await?;

        let recent: Vec<Vote> = sqlx::query_as(
            "SELECT id, option, timestamp, created_at FROM votes ORDER BY id DESC LIMIT ?",
        )
        .bind(TIMELINE_LENGTH)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(VoteTally {
            total,
            counts: counts.into_iter().collect(),
            timeline: recent.into_iter().rev().map(Into::into).collect(),
        })
    }
}

#[async_trait]
impl VoteRepository for DbVoteRepository {
    async fn add_vote(&self, option: VoteOption, timestamp: &str) -> Result<(), StoreError> {
        self.insert_vote(option, timestamp)
            .await
            .map_err(|e| StoreError::trap("add vote", e))
    }

    async fn vote_stats(&self) -> Result<VoteTally, StoreError> {
        self.read_tally()
            .await
            .map_err(|e| StoreError::trap("read vote stats", e))
    }
}

#[injectable(MessageRepository)]
pub struct DbMessageRepository {
    connection: Ref<DatabaseConnection>,
}

impl DbMessageRepository {
    async fn insert_message(
        &self,
        id: &str,
        content: &str,
        option: VoteOption,
        timestamp: &str,
    ) -> sqlx::Result<()> {
        let mut tx = self.connection.begin().await?;

        sqlx::query("INSERT INTO messages (id, content, option, timestamp) VALUES (?, ?, ?, ?)")
            .bind(id)
            .bind(content)
            .bind(option)
            .bind(timestamp)
            .execute(&mut *tx)
            .await?;

        tx.commit().await
    }

    async fn read_page(&self, limit: i64, offset: i64) -> sqlx::Result<(Vec<Message>, i64)> {
        let mut tx = self.connection.begin().await?;

        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM messages")
            .fetch_one(&mut *tx)
            .await?;

        // rowid breaks ties between messages stamped in the same microsecond
        let messages = sqlx::query_as(
            "SELECT id, content, option, likes, timestamp, created_at FROM messages ORDER BY timestamp DESC, rowid DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok((messages, total))
    }

    async fn increment_likes(&self, id: &str) -> sqlx::Result<Option<i64>> {
        let mut tx = self.connection.begin().await?;

        let likes: Option<(i64,)> =
            sqlx::query_as("UPDATE messages SET likes = likes + 1 WHERE id = ? RETURNING likes")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        tx.commit().await?;

        Ok(likes.map(|(likes,)| likes))
    }

    async fn find_message(&self, id: &str) -> sqlx::Result<Option<Message>> {
        sqlx::query_as(
            "SELECT id, content, option, likes, timestamp, created_at FROM messages WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&**self.connection)
        .await
    }

    async fn overwrite_likes(&self, id: &str, likes: i64) -> sqlx::Result<bool> {
        let mut tx = self.connection.begin().await?;

        let result = sqlx::query("UPDATE messages SET likes = ? WHERE id = ?")
            .bind(likes)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl MessageRepository for DbMessageRepository {
    async fn add_message(
        &self,
        id: &str,
        content: &str,
        option: VoteOption,
        timestamp: &str,
    ) -> Result<(), StoreError> {
        self.insert_message(id, content, option, timestamp)
            .await
            .map_err(|e| StoreError::trap("add message", e))
    }

    async fn list_messages(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Message>, i64), StoreError> {
        self.read_page(limit, offset)
            .await
            .map_err(|e| StoreError::trap("list messages", e))
    }

    async fn like_message(&self, id: &str) -> Result<Option<i64>, StoreError> {
        self.increment_likes(id)
            .await
            .map_err(|e| StoreError::trap("like message", e))
    }

    async fn message_by_id(&self, id: &str) -> Result<Option<Message>, StoreError> {
        self.find_message(id)
            .await
            .map_err(|e| StoreError::trap("fetch message", e))
    }

    async fn set_likes(&self, id: &str, likes: i64) -> Result<bool, StoreError> {
        self.overwrite_likes(id, likes)
            .await
            .map_err(|e| StoreError::trap("set message likes", e))
    }
}
