//! TwoSevenths poll backend - Library exports for testing
//!
//! Votes on a work-schedule preference plus a feed of short, likeable comments.

pub mod api;
pub mod config;
pub mod core;
pub mod infrastructure;

use crate::core::moderation::AllowAllModerator;
use crate::core::services::{BulletMessageService, PollVoteService};
use crate::infrastructure::database::DatabaseConnection;
use crate::infrastructure::repositories::{DbMessageRepository, DbVoteRepository};
use di::{Injectable, ServiceCollection, existing_as_self};

/// Service registrations used by the server, wrapped around an opened store.
pub fn service_collection(connection: DatabaseConnection) -> ServiceCollection {
    let mut services = ServiceCollection::new();
    services
        .add(existing_as_self(connection))
        .add(DbVoteRepository::scoped())
        .add(DbMessageRepository::scoped())
        .add(AllowAllModerator::scoped())
        .add(PollVoteService::scoped())
        .add(BulletMessageService::scoped());
    services
}
