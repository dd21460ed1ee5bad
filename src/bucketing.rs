//! Time bucketing for graph series
//!
//! Maps a workout date to the day, ISO week or calendar month it belongs to.
//! A bucket is identified by its start date, so keys order chronologically
//! and two dates share a key iff they fall in the same calendar bucket.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::models::Grouping;

const DAY_LABEL_FORMAT: &str = "%d.%m.%y";
const MONTH_LABEL_FORMAT: &str = "%B %Y";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BucketKey {
  grouping: Grouping,
  start: NaiveDate,
}

/// Bucket key for a timestamp under a grouping
pub fn bucket_key(date: DateTime<Utc>, grouping: Grouping) -> BucketKey {
  BucketKey {
    grouping,
    start: truncate(date.date_naive(), grouping),
  }
}

/// Human readable label of the bucket a timestamp falls in
pub fn bucket_label(date: DateTime<Utc>, grouping: Grouping) -> String {
  key_label(&bucket_key(date, grouping))
}

/// First calendar day covered by a bucket
pub fn bucket_window_start(key: &BucketKey) -> NaiveDate {
  key.start
}

/// Label for an already computed key
pub fn key_label(key: &BucketKey) -> String {
  match key.grouping {
    Grouping::ByDate | Grouping::ByWeek => key.start.format(DAY_LABEL_FORMAT).to_string(),
    Grouping::ByMonth => key.start.format(MONTH_LABEL_FORMAT).to_string(),
  }
}

fn truncate(day: NaiveDate, grouping: Grouping) -> NaiveDate {
  match grouping {
    Grouping::ByDate => day,
    // ISO weeks start on Monday
    Grouping::ByWeek => day - Duration::days(day.weekday().num_days_from_monday() as i64),
    Grouping::ByMonth => day - Duration::days(day.day0() as i64),
  }
}
