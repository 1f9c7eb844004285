//! Implementations for the services the app needs.
//!

use crate::core::error::ServiceError;
use crate::core::moderation::Verdict;
use crate::core::stats::PollStats;
use crate::core::traits::{ContentModerator, MessageService, VoteService};
use crate::core::utc_timestamp;
use crate::core::validation::{NewMessage, Page};
use crate::infrastructure::entities::{Message, VoteOption};
use crate::infrastructure::traits::{MessageRepository, VoteRepository};
use async_trait::async_trait;
use di::{Ref, injectable};
use log::{debug, info, warn};
use uuid::Uuid;

#[injectable(VoteService)]
pub struct PollVoteService {
    repo: Ref<dyn VoteRepository>,
}

#[async_trait]
impl VoteService for PollVoteService {
    async fn submit_vote(&self, option: VoteOption) -> Result<(), ServiceError> {
        self.repo.add_vote(option, &utc_timestamp()).await?;
        info!("vote recorded for {option}");
        Ok(())
    }

    async fn compute_stats(&self) -> Result<PollStats, ServiceError> {
        let tally = self.repo.vote_stats().await?;
        Ok(PollStats::from(tally))
    }
}

#[injectable(MessageService)]
pub struct BulletMessageService {
    repo: Ref<dyn MessageRepository>,
    moderator: Ref<dyn ContentModerator>,
}

#[async_trait]
impl MessageService for BulletMessageService {
    async fn submit_message(&self, message: NewMessage) -> Result<String, ServiceError> {
        if let Verdict::Reject(reason) = self.moderator.review(&message.content).await {
            warn!("message rejected by moderation: {reason}");
            return Err(ServiceError::Rejected(reason));
        }

        let message_id = Uuid::new_v4().to_string();
        self.repo
            .add_message(
                &message_id,
                &message.content,
                message.option,
                &utc_timestamp(),
            )
            .await?;

        info!("message {message_id} posted for {}", message.option);
        Ok(message_id)
    }

    async fn list_messages(&self, page: Page) -> Result<(Vec<Message>, i64), ServiceError> {
        debug!("listing messages limit={} offset={}", page.limit, page.offset);
        Ok(self.repo.list_messages(page.limit, page.offset).await?)
    }

    async fn like_message(&self, message_id: &str) -> Result<i64, ServiceError> {
        self.repo
            .like_message(message_id)
            .await?
            .ok_or(ServiceError::NotFound)
    }

    async fn get_message(&self, message_id: &str) -> Result<Message, ServiceError> {
        self.repo
            .message_by_id(message_id)
            .await?
            .ok_or(ServiceError::NotFound)
    }
}
