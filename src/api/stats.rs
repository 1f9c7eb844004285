//! Voting and statistics endpoints

use crate::api::error::ApiError;
use crate::core::traits::VoteService;
use crate::core::validation::validate_option;
use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::routing::{get, post};
use di_axum::Inject;

pub fn router() -> Router {
    Router::new()
        .route("/vote", post(cast_vote))
        .route("/stats", get(poll_stats))
}

async fn cast_vote(
    Inject(vote_service): Inject<dyn VoteService>,
    payload: Result<Json<schemas::CastVote>, JsonRejection>,
) -> Result<Json<schemas::VoteReceipt>, ApiError> {
    let Json(request) = payload?;
    let option = validate_option(&request.option)?;

    vote_service.submit_vote(option).await?;

    Ok(Json(schemas::VoteReceipt {
        success: true,
        message: "vote recorded".to_owned(),
    }))
}

async fn poll_stats(
    Inject(vote_service): Inject<dyn VoteService>,
) -> Result<Json<schemas::Stats>, ApiError> {
    let stats = vote_service.compute_stats().await?;
    Ok(Json(stats.into()))
}

pub mod schemas {
    use crate::core::stats::{OptionStats as CoreOptionStats, PollStats};
    use crate::infrastructure::entities::{TimelineVote, VoteOption};
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;

    #[derive(Deserialize, Debug)]
    pub struct CastVote {
        pub option: String,
    }

    #[derive(Serialize, Debug)]
    pub struct VoteReceipt {
        pub success: bool,
        pub message: String,
    }

    #[derive(Serialize, Debug)]
    pub struct OptionStats {
        pub count: i64,
        pub percentage: f64,
    }

    impl From<CoreOptionStats> for OptionStats {
        fn from(stats: CoreOptionStats) -> Self {
            OptionStats {
                count: stats.count,
                percentage: stats.percentage,
            }
        }
    }

    #[derive(Serialize, Debug)]
    pub struct TimelineItem {
        pub timestamp: String,
        pub option: VoteOption,
    }

    impl From<TimelineVote> for TimelineItem {
        fn from(vote: TimelineVote) -> Self {
            TimelineItem {
                timestamp: vote.timestamp,
                option: vote.option,
            }
        }
    }

    #[derive(Serialize, Debug)]
    pub struct Stats {
        pub total: i64,
        pub options: BTreeMap<VoteOption, OptionStats>,
        pub timeline: Vec<TimelineItem>,
    }

    impl From<PollStats> for Stats {
        fn from(stats: PollStats) -> Self {
            Stats {
                total: stats.total,
                options: stats
                    .options
                    .into_iter()
                    .map(|(option, stats)| (option, stats.into()))
                    .collect(),
                timeline: stats.timeline.into_iter().map(TimelineItem::from).collect(),
            }
        }
    }
}
