//! Poll statistics derived from the raw vote tally.

use crate::infrastructure::entities::{TimelineVote, VoteOption, VoteTally};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptionStats {
    pub count: i64,
    /// Share of all votes in percent, rounded to two decimals.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollStats {
    pub total: i64,
    /// Always holds an entry for every option.
    pub options: BTreeMap<VoteOption, OptionStats>,
    pub timeline: Vec<TimelineVote>,
}

impl From<VoteTally> for PollStats {
    fn from(tally: VoteTally) -> Self {
        let options = VoteOption::ALL
            .into_iter()
            .map(|option| {
                let count = tally.counts.get(&option).copied().unwrap_or(0);
                let stats = OptionStats {
                    count,
                    percentage: percentage(count, tally.total),
                };
                (option, stats)
            })
            .collect();

        PollStats {
            total: tally.total,
            options,
            timeline: tally.timeline,
        }
    }
}

/// `count / total * 100` rounded to two decimals, or 0 for an empty poll.
///
/// Exact halves round to even, so 1 of 32 is 3.12 rather than 3.13.
pub fn percentage(count: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (count as f64 / total as f64 * 10_000.0).round_ties_even() / 100.0
}
