use chrono::{DateTime, FixedOffset, Timelike};
use serde::{Deserialize, Serialize};
use strum::EnumIter;

/// Day or night tariff period.
///
/// Night runs from 22:00 to 04:59 local time; every other hour,
/// including 21:00-21:59, is day.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    strum::Display,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TimeBucket {
    Day,
    Night,
}

impl TimeBucket {
    /// Classifies a timestamp by the hour in its own offset.
    pub fn of(timestamp: &DateTime<FixedOffset>) -> Self {
        TimeBucket::of_hour(timestamp.hour())
    }

    #[inline]
    pub fn of_hour(hour: u32) -> Self {
        if hour > 21 || hour <= 4 {
            TimeBucket::Night
        } else {
            TimeBucket::Day
        }
    }
}
