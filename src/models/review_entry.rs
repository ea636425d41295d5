use super::schedule::{MAX_EASE, MAX_INTERVAL_DAYS, MIN_EASE};
use serde::{Deserialize, Deserializer, Serialize};

/// Review statistics for one item.
///
/// Serialized as `{ "interval": f, "easeFactor": f, "nextReview": ms }` so the
/// stored blob stays readable by the web app.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    /// Days until the next review
    pub interval: f64,
    pub ease_factor: f64,
    /// Epoch milliseconds at which the item becomes due
    #[serde(rename = "nextReview", deserialize_with = "millis_from_number")]
    pub next_review_at: i64,
}

impl Default for ReviewEntry {
    fn default() -> Self {
        Self {
            interval: 1.0,
            ease_factor: 2.0,
            next_review_at: 0,
        }
    }
}

impl ReviewEntry {
    pub fn is_due(&self, now: i64) -> bool {
        self.next_review_at <= now
    }

    /// Pulls interval and ease back into their valid ranges. Non-finite or
    /// non-positive values fall back to the defaults.
    pub fn clamped(self) -> Self {
        let defaults = Self::default();
        let interval = if self.interval.is_finite() && self.interval > 0.0 {
            self.interval.min(MAX_INTERVAL_DAYS)
        } else {
            defaults.interval
        };
        let ease_factor = if self.ease_factor.is_finite() {
            self.ease_factor.clamp(MIN_EASE, MAX_EASE)
        } else {
            defaults.ease_factor
        };
        Self {
            interval,
            ease_factor,
            next_review_at: self.next_review_at,
        }
    }
}

// Blobs written by the web app may carry fractional milliseconds
fn millis_from_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() {
        return Err(serde::de::Error::custom("nextReview must be a finite number"));
    }
    Ok(value as i64)
}
