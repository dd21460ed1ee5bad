//! Deterministic analysis layer for exercise statistics
//!
//! Scalar personal-record statistics are always computed over an exercise's
//! entire history. Only completed sets count.

use crate::models::{ExerciseStats, Set, Workout};
use crate::records::compute_set_records;

/// ---------------------------------------------------------------------------
/// One-Rep Max Estimate
/// ---------------------------------------------------------------------------

/// Epley estimate: weight * (1 + reps / 30). Undefined for zero reps.
pub fn estimated_one_rep_max(weight: f64, reps: u32) -> Option<f64> {
  if reps == 0 {
    return None;
  }
  Some(weight * (1.0 + reps as f64 / 30.0))
}

/// ---------------------------------------------------------------------------
/// Per-Workout Totals
/// ---------------------------------------------------------------------------

/// One workout's contribution to an exercise
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorkoutTotals {
  pub reps: u64,
  pub sets: u64,
  pub volume: f64,
}

impl WorkoutTotals {
  pub fn compute<'a>(sets: impl IntoIterator<Item = &'a Set>) -> Self {
    sets.into_iter().fold(Self::default(), |mut acc, s| {
      acc.reps += s.reps as u64;
      acc.sets += 1;
      acc.volume += s.volume();
      acc
    })
  }
}

/// ---------------------------------------------------------------------------
/// Exercise Statistics
/// ---------------------------------------------------------------------------

/// Compute summary statistics and set records for one exercise.
///
/// An unknown exercise id, or one with no completed sets, yields all-zero
/// statistics and no records.
pub fn compute_exercise_stats(workouts: &[Workout], exercise_id: &str) -> ExerciseStats {
  let mut stats = ExerciseStats::default();
  let mut pooled: Vec<&Set> = Vec::new();
  let mut workout_count: u64 = 0;

  for workout in workouts {
    let sets: Vec<&Set> = workout.completed_sets(exercise_id).collect();
    if sets.is_empty() {
      continue;
    }

    let totals = WorkoutTotals::compute(sets.iter().copied());
    workout_count += 1;
    stats.total_reps += totals.reps;
    stats.total_sets += totals.sets;
    stats.total_volume += totals.volume;
    stats.best_workout_volume = stats.best_workout_volume.max(totals.volume);

    for set in &sets {
      stats.heaviest_weight = stats.heaviest_weight.max(set.weight);
      stats.best_set_volume = stats.best_set_volume.max(set.volume());
      if let Some(orm) = estimated_one_rep_max(set.weight, set.reps) {
        stats.best_estimated_one_rep_max = stats.best_estimated_one_rep_max.max(orm);
      }
    }

    pooled.extend(sets);
  }

  // Averages only over workouts that actually contain the exercise
  if workout_count > 0 {
    let n = workout_count as f64;
    stats.avg_workout_reps = stats.total_reps as f64 / n;
    stats.avg_workout_sets = stats.total_sets as f64 / n;
    stats.avg_workout_volume = stats.total_volume / n;
  }

  stats.set_records = compute_set_records(pooled);
  stats
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
