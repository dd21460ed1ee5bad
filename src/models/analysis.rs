use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Bucket granularity for time series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Grouping {
  #[default]
  ByDate,
  ByWeek,
  ByMonth,
}

impl Grouping {
  pub const ALL: [Grouping; 3] = [Grouping::ByDate, Grouping::ByWeek, Grouping::ByMonth];
}

impl std::fmt::Display for Grouping {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::ByDate => write!(f, "by_date"),
      Self::ByWeek => write!(f, "by_week"),
      Self::ByMonth => write!(f, "by_month"),
    }
  }
}

impl std::str::FromStr for Grouping {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "by_date" | "date" | "day" => Ok(Self::ByDate),
      "by_week" | "week" => Ok(Self::ByWeek),
      "by_month" | "month" => Ok(Self::ByMonth),
      _ => Err(format!("Unknown grouping: {}", s)),
    }
  }
}

/// Graph metric selectable by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
  #[default]
  Weight,
  EstimatedOneRepMax,
  Volume,
  Reps,
}

impl Metric {
  pub const ALL: [Metric; 4] = [
    Metric::Weight,
    Metric::EstimatedOneRepMax,
    Metric::Volume,
    Metric::Reps,
  ];

  /// Position in `ALL`, used to index per-metric tables
  pub fn index(&self) -> usize {
    match self {
      Metric::Weight => 0,
      Metric::EstimatedOneRepMax => 1,
      Metric::Volume => 2,
      Metric::Reps => 3,
    }
  }
}

impl std::fmt::Display for Metric {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Weight => write!(f, "weight"),
      Self::EstimatedOneRepMax => write!(f, "estimated_one_rep_max"),
      Self::Volume => write!(f, "volume"),
      Self::Reps => write!(f, "reps"),
    }
  }
}

impl std::str::FromStr for Metric {
  type Err = String;
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "weight" => Ok(Self::Weight),
      "estimated_one_rep_max" | "estimatedOneRepMax" | "1rm" => Ok(Self::EstimatedOneRepMax),
      "volume" => Ok(Self::Volume),
      "reps" => Ok(Self::Reps),
      _ => Err(format!("Unknown metric: {}", s)),
    }
  }
}

/// A non-dominated (reps, weight) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetRecord {
  pub reps: u32,
  pub weight: f64,
  pub volume: f64,
}

impl SetRecord {
  pub fn new(reps: u32, weight: f64) -> Self {
    Self {
      reps,
      weight,
      volume: reps as f64 * weight,
    }
  }

  /// Display label, e.g. "5 x 100 kg"
  pub fn label(&self) -> String {
    format!("{} x {} kg", self.reps, self.weight)
  }
}

/// Summary statistics over an exercise's entire history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseStats {
  pub heaviest_weight: f64,
  pub best_estimated_one_rep_max: f64,
  pub best_set_volume: f64,
  pub best_workout_volume: f64,
  pub total_reps: u64,
  pub total_volume: f64,
  pub total_sets: u64,
  pub avg_workout_reps: f64,
  pub avg_workout_sets: f64,
  pub avg_workout_volume: f64,
  pub set_records: Vec<SetRecord>,
}

/// One populated bucket of a graph series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphPoint {
  /// Bucket start date
  pub date: NaiveDate,
  pub formatted_date: String,
  pub weight: f64,
  pub estimated_one_rep_max: f64,
  pub volume: f64,
  pub reps: f64,
}

impl GraphPoint {
  pub fn value(&self, metric: Metric) -> f64 {
    match metric {
      Metric::Weight => self.weight,
      Metric::EstimatedOneRepMax => self.estimated_one_rep_max,
      Metric::Volume => self.volume,
      Metric::Reps => self.reps,
    }
  }
}
