//! Database entities

use chrono::NaiveDateTime;
use serde::Serialize;
use sqlx::FromRow;
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Work-schedule preference shared by votes and messages.
///
/// Stored as lowercase TEXT.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, sqlx::Type,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum VoteOption {
    /// Two days off every week.
    Double,
    /// One day off every week.
    Single,
    /// Alternating long and short weeks.
    Alternate,
}

impl VoteOption {
    pub const ALL: [VoteOption; 3] = [VoteOption::Double, VoteOption::Single, VoteOption::Alternate];

    pub fn as_str(&self) -> &'static str {
        match self {
            VoteOption::Double => "double",
            VoteOption::Single => "single",
            VoteOption::Alternate => "alternate",
        }
    }
}

impl Display for VoteOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown option `{0}`")]
pub struct UnknownOption(pub String);

impl FromStr for VoteOption {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VoteOption::ALL
            .into_iter()
            .find(|option| option.as_str() == s)
            .ok_or_else(|| UnknownOption(s.to_owned()))
    }
}

#[derive(Debug, FromRow)]
pub struct Vote {
    pub id: i64,
    pub option: VoteOption,
    pub timestamp: String,
    pub created_at: Option<NaiveDateTime>,
}

/// A vote as it appears on the stats timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineVote {
    pub option: VoteOption,
    pub timestamp: String,
}

impl From<Vote> for TimelineVote {
    fn from(vote: Vote) -> Self {
        Self {
            option: vote.option,
            timestamp: vote.timestamp,
        }
    }
}

/// Raw aggregate read from the votes table.
///
/// Options nobody voted for are absent from `counts`.
#[derive(Debug, Default)]
pub struct VoteTally {
    pub total: i64,
    pub counts: HashMap<VoteOption, i64>,
    /// Most recent votes, oldest first.
    pub timeline: Vec<TimelineVote>,
}

/// Longest message content accepted, in characters.
pub const MAX_CONTENT_CHARS: usize = 200;

#[derive(Debug, Clone, FromRow)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub option: VoteOption,
    pub likes: i64,
    pub timestamp: String,
    pub created_at: Option<NaiveDateTime>,
}
