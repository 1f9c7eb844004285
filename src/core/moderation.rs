//! Content moderation gate for new messages.

use crate::core::traits::ContentModerator;
use async_trait::async_trait;
use di::{inject, injectable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Approve,
    Reject(String),
}

/// Moderator that approves everything.
#[derive(Debug, Default)]
pub struct AllowAllModerator;

#[injectable(ContentModerator)]
impl AllowAllModerator {
    #[inject]
    pub fn create() -> AllowAllModerator {
        AllowAllModerator
    }
}

#[async_trait]
impl ContentModerator for AllowAllModerator {
    async fn review(&self, _content: &str) -> Verdict {
        Verdict::Approve
    }
}
