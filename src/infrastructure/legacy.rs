//! Import of the JSON files written by the pre-database version of the poll.
//!
//! `stats.json` holds `{"votes": [{"option", "timestamp"}]}` and `messages.json` holds
//! `{"messages": [{"id", "content", "option", "likes", "timestamp"}]}`. Each record is
//! replayed through the repositories; a processed file is renamed to `<name>.migrated`
//! so it is only imported once.

use crate::infrastructure::entities::{MAX_CONTENT_CHARS, VoteOption};
use crate::infrastructure::traits::{MessageRepository, VoteRepository};
use log::{info, warn};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

pub const VOTES_FILE: &str = "stats.json";
pub const MESSAGES_FILE: &str = "messages.json";

#[derive(Debug, Deserialize)]
struct LegacyStats {
    #[serde(default)]
    votes: Vec<LegacyVote>,
}

#[derive(Debug, Deserialize)]
struct LegacyVote {
    option: String,
    timestamp: String,
}

#[derive(Debug, Deserialize)]
struct LegacyMessages {
    #[serde(default)]
    messages: Vec<LegacyMessage>,
}

#[derive(Debug, Deserialize)]
struct LegacyMessage {
    id: String,
    content: String,
    option: String,
    #[serde(default)]
    likes: i64,
    timestamp: String,
}

/// Number of records written by an import, plus the records the store refused.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub votes: usize,
    pub messages: usize,
    pub failed: usize,
}

impl ImportReport {
    pub fn total(&self) -> usize {
        self.votes + self.messages
    }
}

#[derive(Debug, Default)]
struct FileOutcome {
    imported: usize,
    failed: usize,
}

/// Imports whatever legacy files exist under `dir`.
///
/// Never fails: unreadable files and bad records are logged and skipped. A file is
/// only renamed once every valid record in it reached the store, so a store outage
/// leaves it in place for the next start.
pub async fn import_legacy_data(
    dir: &Path,
    votes: &dyn VoteRepository,
    messages: &dyn MessageRepository,
) -> ImportReport {
    let mut report = ImportReport::default();

    let votes_path = dir.join(VOTES_FILE);
    if let Some(stats) = read_legacy_file::<LegacyStats>(&votes_path).await {
        let outcome = import_votes(stats.votes, votes).await;
        info!("imported {} legacy votes", outcome.imported);
        finish_file(&votes_path, &outcome).await;
        report.votes = outcome.imported;
        report.failed += outcome.failed;
    }

    let messages_path = dir.join(MESSAGES_FILE);
    if let Some(legacy) = read_legacy_file::<LegacyMessages>(&messages_path).await {
        let outcome = import_messages(legacy.messages, messages).await;
        info!("imported {} legacy messages", outcome.imported);
        finish_file(&messages_path, &outcome).await;
        report.messages = outcome.imported;
        report.failed += outcome.failed;
    }

    report
}

async fn import_votes(legacy: Vec<LegacyVote>, repo: &dyn VoteRepository) -> FileOutcome {
    let mut outcome = FileOutcome::default();

    for vote in legacy {
        let option = match vote.option.parse::<VoteOption>() {
            Ok(option) => option,
            Err(e) => {
                warn!("skipping legacy vote: {e}");
                continue;
            }
        };

        match repo.add_vote(option, &vote.timestamp).await {
            Ok(()) => outcome.imported += 1,
            Err(_) => outcome.failed += 1,
        }
    }

    outcome
}

async fn import_messages(legacy: Vec<LegacyMessage>, repo: &dyn MessageRepository) -> FileOutcome {
    let mut outcome = FileOutcome::default();

    for message in legacy {
        let option = match message.option.parse::<VoteOption>() {
            Ok(option) => option,
            Err(e) => {
                warn!("skipping legacy message {}: {e}", message.id);
                continue;
            }
        };

        let length = message.content.chars().count();
        if length == 0 || length > MAX_CONTENT_CHARS {
            warn!(
                "skipping legacy message {}: content has {length} characters",
                message.id
            );
            continue;
        }

        // ids make message replay idempotent, so a retried file only tops up likes
        let stored_likes = match repo.message_by_id(&message.id).await {
            Ok(Some(stored)) => {
                info!("legacy message {} already stored", message.id);
                Some(stored.likes)
            }
            Ok(None) => None,
            Err(_) => {
                outcome.failed += 1;
                continue;
            }
        };

        if stored_likes.is_none() {
            if repo
                .add_message(&message.id, &message.content, option, &message.timestamp)
                .await
                .is_err()
            {
                outcome.failed += 1;
                continue;
            }
            outcome.imported += 1;
        }

        if message.likes > stored_likes.unwrap_or(0) {
            match repo.set_likes(&message.id, message.likes).await {
                Ok(true) => {}
                Ok(false) => {
                    warn!(
                        "legacy message {} vanished before its likes were set",
                        message.id
                    );
                    outcome.failed += 1;
                }
                Err(_) => {
                    warn!(
                        "could not restore {} likes on legacy message {}",
                        message.likes, message.id
                    );
                    outcome.failed += 1;
                }
            }
        }
    }

    outcome
}

async fn read_legacy_file<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let raw = match tokio::fs::read(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!("cannot read {}: {e}", path.display());
            return None;
        }
    };

    serde_json::from_slice(&raw)
        .map_err(|e| warn!("cannot parse {}: {e}", path.display()))
        .ok()
}

async fn finish_file(path: &Path, outcome: &FileOutcome) {
    if outcome.failed > 0 {
        warn!(
            "{} records from {} were not stored; leaving it in place",
            outcome.failed,
            path.display()
        );
        return;
    }

    mark_migrated(path).await;
}

async fn mark_migrated(path: &Path) {
    let mut target = PathBuf::from(path);
    target.as_mut_os_string().push(".migrated");

    if let Err(e) = tokio::fs::rename(path, &target).await {
        warn!("could not rename {}: {e}", path.display());
    }
}
