//! Graph series builder
//!
//! Buckets an exercise's workouts by day, week or month and aggregates each
//! metric per bucket. Aggregation rules live in `METRIC_TABLE`.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::estimated_one_rep_max;
use crate::bucketing::{bucket_key, bucket_window_start, key_label, BucketKey};
use crate::models::{GraphPoint, Grouping, Metric, Set, Workout};

/// ---------------------------------------------------------------------------
/// Per-Metric Aggregation Table
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
  Max,
  Sum,
}

impl Aggregation {
  fn combine(&self, acc: Option<f64>, value: f64) -> f64 {
    match (self, acc) {
      (_, None) => value,
      (Aggregation::Max, Some(curr)) => curr.max(value),
      (Aggregation::Sum, Some(curr)) => curr + value,
    }
  }
}

pub struct MetricSpec {
  pub metric: Metric,
  pub aggregation: Aggregation,
  /// Per-set contribution; `None` means the set does not contribute
  pub extract: fn(&Set) -> Option<f64>,
}

/// Indexed by `Metric::index`
pub static METRIC_TABLE: [MetricSpec; 4] = [
  MetricSpec {
    metric: Metric::Weight,
    aggregation: Aggregation::Max,
    extract: set_weight,
  },
  MetricSpec {
    metric: Metric::EstimatedOneRepMax,
    aggregation: Aggregation::Max,
    extract: set_one_rep_max,
  },
  MetricSpec {
    metric: Metric::Volume,
    aggregation: Aggregation::Sum,
    extract: set_volume,
  },
  MetricSpec {
    metric: Metric::Reps,
    aggregation: Aggregation::Sum,
    extract: set_reps,
  },
];

fn set_weight(set: &Set) -> Option<f64> {
  Some(set.weight)
}

fn set_one_rep_max(set: &Set) -> Option<f64> {
  estimated_one_rep_max(set.weight, set.reps)
}

fn set_volume(set: &Set) -> Option<f64> {
  Some(set.volume())
}

fn set_reps(set: &Set) -> Option<f64> {
  Some(set.reps as f64)
}

pub fn metric_spec(metric: Metric) -> &'static MetricSpec {
  &METRIC_TABLE[metric.index()]
}

/// ---------------------------------------------------------------------------
/// Date Windows
/// ---------------------------------------------------------------------------

/// Closed date interval; an open start means all history up to `end`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
  pub start: Option<DateTime<Utc>>,
  pub end: DateTime<Utc>,
}

impl DateWindow {
  pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
    Self { start: Some(start), end }
  }

  pub fn all_time(end: DateTime<Utc>) -> Self {
    Self { start: None, end }
  }

  pub fn contains(&self, date: DateTime<Utc>) -> bool {
    self.start.map_or(true, |start| date >= start) && date <= self.end
  }
}

/// Interval options offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WindowPreset {
  Last30Days,
  #[default]
  Last90Days,
  LastYear,
  AllTime,
}

impl WindowPreset {
  pub const ALL: [WindowPreset; 4] = [
    WindowPreset::Last30Days,
    WindowPreset::Last90Days,
    WindowPreset::LastYear,
    WindowPreset::AllTime,
  ];

  pub fn days(&self) -> Option<i64> {
    match self {
      WindowPreset::Last30Days => Some(30),
      WindowPreset::Last90Days => Some(90),
      WindowPreset::LastYear => Some(365),
      WindowPreset::AllTime => None,
    }
  }

  /// Concrete window ending at `now`
  pub fn window(&self, now: DateTime<Utc>) -> DateWindow {
    match self.days() {
      Some(days) => DateWindow::new(now - Duration::days(days), now),
      None => DateWindow::all_time(now),
    }
  }
}

impl std::fmt::Display for WindowPreset {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Last30Days => write!(f, "last_30_days"),
      Self::Last90Days => write!(f, "last_90_days"),
      Self::LastYear => write!(f, "last_year"),
      Self::AllTime => write!(f, "all_time"),
    }
  }
}

impl std::str::FromStr for WindowPreset {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "last_30_days" | "30d" => Ok(Self::Last30Days),
      "last_90_days" | "90d" => Ok(Self::Last90Days),
      "last_year" | "365d" => Ok(Self::LastYear),
      "all_time" | "all" => Ok(Self::AllTime),
      _ => Err(format!("Unknown window: {}", s)),
    }
  }
}

/// ---------------------------------------------------------------------------
/// Series Construction
/// ---------------------------------------------------------------------------

/// A graph series with the metric the caller selected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSeries {
  pub grouping: Grouping,
  pub metric: Metric,
  pub points: Vec<GraphPoint>,
}

impl GraphSeries {
  /// (label, value) pairs for the selected metric
  pub fn values(&self) -> Vec<(String, f64)> {
    self
      .points
      .iter()
      .map(|p| (p.formatted_date.clone(), p.value(self.metric)))
      .collect()
  }

  pub fn is_empty(&self) -> bool {
    self.points.is_empty()
  }
}

/// Why a series is or is not drawable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesAvailability {
  /// The exercise has never been performed
  NoHistory,
  /// History exists but nothing falls inside the window
  ExcludedByWindow,
  Available,
}

impl SeriesAvailability {
  pub fn classify(history_len: usize, point_count: usize) -> Self {
    match (history_len, point_count) {
      (0, _) => SeriesAvailability::NoHistory,
      (_, 0) => SeriesAvailability::ExcludedByWindow,
      _ => SeriesAvailability::Available,
    }
  }
}

/// Build one point per populated bucket, all metrics aggregated.
///
/// The window filters workout dates before bucketing, so a window narrower
/// than the grouping only admits the workouts that fall inside it.
pub fn build_graph_points(
  workouts: &[Workout],
  exercise_id: &str,
  grouping: Grouping,
  window: &DateWindow,
) -> Vec<GraphPoint> {
  let mut buckets: BTreeMap<BucketKey, [Option<f64>; 4]> = BTreeMap::new();

  for workout in workouts.iter().filter(|w| window.contains(w.date)) {
    let mut sets = workout.completed_sets(exercise_id).peekable();
    if sets.peek().is_none() {
      continue;
    }

    let acc = buckets.entry(bucket_key(workout.date, grouping)).or_default();
    for set in sets {
      for spec in &METRIC_TABLE {
        if let Some(value) = (spec.extract)(set) {
          let slot = &mut acc[spec.metric.index()];
          *slot = Some(spec.aggregation.combine(*slot, value));
        }
      }
    }
  }

  buckets
    .into_iter()
    .map(|(key, acc)| to_point(&key, &acc))
    .collect()
}

/// Build the series for a selected metric
pub fn build_graph_series(
  workouts: &[Workout],
  exercise_id: &str,
  grouping: Grouping,
  metric: Metric,
  window: &DateWindow,
) -> GraphSeries {
  GraphSeries {
    grouping,
    metric,
    points: build_graph_points(workouts, exercise_id, grouping, window),
  }
}

fn to_point(key: &BucketKey, acc: &[Option<f64>; 4]) -> GraphPoint {
  let value = |metric: Metric| acc[metric.index()].unwrap_or(0.0);
  GraphPoint {
    date: bucket_window_start(key),
    formatted_date: key_label(key),
    weight: value(Metric::Weight),
    estimated_one_rep_max: value(Metric::EstimatedOneRepMax),
    volume: value(Metric::Volume),
    reps: value(Metric::Reps),
  }
}

/// Bucket start dates of a point list
pub fn bucket_dates(points: &[GraphPoint]) -> Vec<NaiveDate> {
  points.iter().map(|p| p.date).collect()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
