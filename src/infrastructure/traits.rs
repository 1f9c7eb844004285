//! Infrastructure traits, used for DI on higher levels

use crate::infrastructure::database::StoreError;
use crate::infrastructure::entities::{Message, VoteOption, VoteTally};
use async_trait::async_trait;

#[async_trait]
pub trait VoteRepository: Send + Sync {
    /// Records a single vote.
    async fn add_vote(&self, option: VoteOption, timestamp: &str) -> Result<(), StoreError>;

    /// Reads the total, per-option counts and the 100 most recent votes.
    async fn vote_stats(&self) -> Result<VoteTally, StoreError>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Inserts a message with zero likes.
    ///
    /// Fails if a message with the same `id` already exists.
    async fn add_message(
        &self,
        id: &str,
        content: &str,
        option: VoteOption,
        timestamp: &str,
    ) -> Result<(), StoreError>;

    /// Returns one page of messages, newest first, along with the total message count.
    async fn list_messages(&self, limit: i64, offset: i64)
    -> Result<(Vec<Message>, i64), StoreError>;

    /// Increments the like counter and returns the new value, or `None` if no such message.
    async fn like_message(&self, id: &str) -> Result<Option<i64>, StoreError>;

    async fn message_by_id(&self, id: &str) -> Result<Option<Message>, StoreError>;

    /// Overwrites the like counter. Returns whether a message matched.
    ///
    /// Only used when importing legacy data.
    async fn set_likes(&self, id: &str, likes: i64) -> Result<bool, StoreError>;
}
