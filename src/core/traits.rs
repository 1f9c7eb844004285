//! DI "Interfaces"

use crate::core::error::ServiceError;
use crate::core::moderation::Verdict;
use crate::core::stats::PollStats;
use crate::core::validation::{NewMessage, Page};
use crate::infrastructure::entities;
use crate::infrastructure::entities::VoteOption;
use async_trait::async_trait;

#[async_trait]
pub trait VoteService: Send + Sync {
    /// Records a vote for `option`, stamped with the current UTC time.
    async fn submit_vote(&self, option: VoteOption) -> Result<(), ServiceError>;

    /// Computes totals and percentages for every option plus the recent-vote timeline.
    async fn compute_stats(&self) -> Result<PollStats, ServiceError>;
}

#[async_trait]
pub trait MessageService: Send + Sync {
    /// Stores a new message and returns its generated id.
    ///
    /// Returns `ServiceError::Rejected` without storing anything if moderation denies the
    /// content.
    async fn submit_message(&self, message: NewMessage) -> Result<String, ServiceError>;

    /// Lists one page of messages, newest first, along with the total message count.
    async fn list_messages(
        &self,
        page: Page,
    ) -> Result<(Vec<entities::Message>, i64), ServiceError>;

    /// Adds a like and returns the new like count.
    ///
    /// Returns `ServiceError::NotFound` if the message doesn't exist.
    async fn like_message(&self, message_id: &str) -> Result<i64, ServiceError>;

    /// Returns `ServiceError::NotFound` if the message doesn't exist.
    async fn get_message(&self, message_id: &str) -> Result<entities::Message, ServiceError>;
}

/// Pre-insert gate for message content.
#[async_trait]
pub trait ContentModerator: Send + Sync {
    async fn review(&self, content: &str) -> Verdict;
}
