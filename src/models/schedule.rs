//! Three-tier review schedule.
//!
//! A simplified SM-2 family rule driven by a self-reported recall rating:
//! - Easy: interval grows by the current ease factor (capped at 365 days),
//!   ease rises by 0.1 (capped at 3.0)
//! - Good: interval grows by the ease factor minus 0.15, with a floor of 2 days
//!   and a cap of 180 days; ease rises by 0.02 (capped at 2.8)
//! - Hard: interval resets to 1 day, ease drops by 0.2 (floor 1.3)
//!
//! The next review lands `interval` days after the moment of rating.

use super::ReviewEntry;
use crate::clock::MS_PER_DAY;
use tracing::debug;

pub const MIN_EASE: f64 = 1.3;
pub const MAX_EASE: f64 = 3.0;
pub const MAX_GOOD_EASE: f64 = 2.8;
pub const MAX_INTERVAL_DAYS: f64 = 365.0;
pub const MAX_GOOD_INTERVAL_DAYS: f64 = 180.0;
pub const MIN_GOOD_INTERVAL_DAYS: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rating {
    Hard,
    Good,
    Easy,
}

impl Rating {
    pub const ALL: [Rating; 3] = [Rating::Hard, Rating::Good, Rating::Easy];

    /// Parses a rating name. Anything other than "easy" or "good" counts as hard.
    pub fn parse(value: &str) -> Self {
        match value {
            "easy" => Rating::Easy,
            "good" => Rating::Good,
            "hard" => Rating::Hard,
            other => {
                debug!("Unrecognized rating '{}', treating as hard", other);
                Rating::Hard
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Hard => "hard",
            Rating::Good => "good",
            Rating::Easy => "easy",
        }
    }
}

/// Computes the entry that results from rating `entry` at `now` (epoch ms).
pub fn next_entry(entry: &ReviewEntry, rating: Rating, now: i64) -> ReviewEntry {
    let (interval, ease_factor) = match rating {
        Rating::Easy => (
            (entry.interval * entry.ease_factor).min(MAX_INTERVAL_DAYS),
            (entry.ease_factor + 0.1).min(MAX_EASE),
        ),
        Rating::Good => (
            (entry.interval * (entry.ease_factor - 0.15))
                .max(MIN_GOOD_INTERVAL_DAYS)
                .min(MAX_GOOD_INTERVAL_DAYS),
            (entry.ease_factor + 0.02).min(MAX_GOOD_EASE),
        ),
        Rating::Hard => (1.0, (entry.ease_factor - 0.2).max(MIN_EASE)),
    };

    ReviewEntry {
        interval,
        ease_factor,
        next_review_at: due_after(now, interval),
    }
}

/// Epoch milliseconds `interval` days after `now`
pub fn due_after(now: i64, interval: f64) -> i64 {
    now + (interval * MS_PER_DAY as f64).round() as i64
}
