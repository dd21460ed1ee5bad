//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Mock data factories for exercises and workouts
//! - A seeded in-memory store
//! - Time helpers

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::models::{Exercise, ExerciseEntry, Set, Workout};
use crate::store::{InMemoryStore, Snapshot};

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Create a built-in exercise
pub fn make_exercise(id: &str, name: &str) -> Exercise {
  Exercise {
    id: id.to_string(),
    name: name.to_string(),
    muscle_groups: vec!["chest".to_string()],
    video_id: None,
    user: None,
  }
}

/// Create a workout with a single exercise entry of completed sets
pub fn make_workout(id: &str, date: DateTime<Utc>, exercise_id: &str, sets: &[(u32, f64)]) -> Workout {
  make_workout_with_entries(id, date, vec![(exercise_id, sets.to_vec())])
}

/// Create a workout with several entries of completed sets
pub fn make_workout_with_entries(
  id: &str,
  date: DateTime<Utc>,
  entries: Vec<(&str, Vec<(u32, f64)>)>,
) -> Workout {
  Workout {
    id: id.to_string(),
    name: format!("Workout {}", id),
    date,
    duration: 60,
    notes: String::new(),
    exercises: entries
      .into_iter()
      .map(|(exercise_id, sets)| ExerciseEntry {
        exercise: exercise_id.to_string(),
        sets: sets
          .into_iter()
          .map(|(reps, weight)| Set::completed(reps, weight))
          .collect(),
      })
      .collect(),
  }
}

/// Store seeded with bench/squat history over the last few weeks
pub fn seeded_store() -> InMemoryStore {
  InMemoryStore::from_snapshot(Snapshot {
    exercises: vec![make_exercise("bench", "Bench Press"), make_exercise("squat", "Back Squat")],
    workouts: vec![
      make_workout("w1", days_ago(20), "bench", &[(5, 100.0), (8, 80.0)]),
      make_workout("w2", days_ago(10), "squat", &[(5, 140.0)]),
      make_workout("w3", days_ago(3), "bench", &[(3, 100.0), (10, 60.0)]),
    ],
  })
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Create a DateTime N days ago from now
pub fn days_ago(days: i64) -> DateTime<Utc> {
  Utc::now() - Duration::days(days)
}

/// Fixed calendar timestamp at noon UTC
pub fn noon(y: i32, m: u32, d: u32) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_mock_factories_create_valid_data() {
    let workout = make_workout("w1", noon(2024, 5, 1), "bench", &[(5, 100.0), (3, 110.0)]);
    assert_eq!(workout.exercises.len(), 1);
    assert_eq!(workout.exercises[0].sets.len(), 2);
    assert!(workout.exercises[0].sets.iter().all(Set::is_complete));
    assert_eq!(workout.total_volume(), 830.0);

    let exercise = make_exercise("bench", "Bench Press");
    assert!(exercise.is_builtin());
  }

  #[test]
  fn test_days_ago_produces_correct_dates() {
    let diff = Utc::now() - days_ago(7);
    assert!(diff.num_days() >= 6 && diff.num_days() <= 8,
            "Expected ~7 days difference, got {}", diff.num_days());
  }
}
