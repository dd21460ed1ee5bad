use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::exercise::ExerciseId;

pub type WorkoutId = String;

/// Kind of set as tagged by the user when logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SetKind {
  #[default]
  Normal,
  WarmUp,
  Drop,
  Failure,
}

/// Only complete sets count towards statistics and records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SetStatus {
  Complete,
  Incomplete,
}

/// A single set. Volume is always derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Set {
  #[serde(rename = "type", default)]
  pub kind: SetKind,
  pub reps: u32,
  /// Kilograms
  pub weight: f64,
  pub status: SetStatus,
}

impl Set {
  pub fn completed(reps: u32, weight: f64) -> Self {
    Self {
      kind: SetKind::Normal,
      reps,
      weight,
      status: SetStatus::Complete,
    }
  }

  pub fn is_complete(&self) -> bool {
    self.status == SetStatus::Complete
  }

  pub fn volume(&self) -> f64 {
    self.reps as f64 * self.weight
  }
}

/// A workout's usage of one exercise, sets in performance order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
  pub exercise: ExerciseId,
  #[serde(default)]
  pub sets: Vec<Set>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
  pub id: WorkoutId,
  pub name: String,
  pub date: DateTime<Utc>,
  /// Minutes
  #[serde(default)]
  pub duration: u32,
  #[serde(default)]
  pub notes: String,
  #[serde(default)]
  pub exercises: Vec<ExerciseEntry>,
}

impl Workout {
  /// Whether any entry of this workout references the exercise, regardless of set status
  pub fn uses_exercise(&self, exercise_id: &str) -> bool {
    self.exercises.iter().any(|e| e.exercise == exercise_id)
  }

  /// Completed sets of one exercise across all of this workout's entries
  pub fn completed_sets<'a>(&'a self, exercise_id: &'a str) -> impl Iterator<Item = &'a Set> + 'a {
    self
      .exercises
      .iter()
      .filter(move |e| e.exercise == exercise_id)
      .flat_map(|e| e.sets.iter())
      .filter(|s| s.is_complete())
  }

  /// Total volume of completed sets across every entry
  pub fn total_volume(&self) -> f64 {
    self
      .exercises
      .iter()
      .flat_map(|e| e.sets.iter())
      .filter(|s| s.is_complete())
      .map(Set::volume)
      .sum()
  }
}
