//! Exercise analytics commands
//!
//! Each call reads the current snapshot and goes through the derived-view
//! cache.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::ExerciseHistory;
use crate::graph::{DateWindow, GraphSeries, SeriesAvailability, WindowPreset};
use crate::models::{Exercise, ExerciseStats, Grouping, Metric};
use crate::state::AppState;
use crate::store::RecordStore;

/// ---------------------------------------------------------------------------
/// Outbound Analytics
/// ---------------------------------------------------------------------------

/// Personal-record statistics; all zero for an unknown or unused exercise
pub fn get_exercise_stats(state: &AppState, exercise_id: &str) -> Arc<ExerciseStats> {
  state.cache.exercise_stats(&state.snapshot(), exercise_id)
}

/// Graph series for one metric and grouping inside `window`
pub fn get_exercise_graph_series(
  state: &AppState,
  exercise_id: &str,
  grouping: Grouping,
  metric: Metric,
  window: DateWindow,
) -> Arc<GraphSeries> {
  state
    .cache
    .graph_series(&state.snapshot(), exercise_id, grouping, metric, window)
}

/// History list for an exercise, newest first
pub fn get_workouts_for_exercise(state: &AppState, exercise_id: &str) -> Arc<ExerciseHistory> {
  state.cache.workouts_for_exercise(&state.snapshot(), exercise_id)
}

/// ---------------------------------------------------------------------------
/// Exercise Details View
/// ---------------------------------------------------------------------------

/// Everything the exercise details page shows, computed from one snapshot
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDetails {
  pub exercise: Exercise,
  pub is_custom: bool,
  pub stats: Arc<ExerciseStats>,
  pub series: Arc<GraphSeries>,
  pub availability: SeriesAvailability,
  pub history: Arc<ExerciseHistory>,
}

/// Request for the details view
#[derive(Debug, Clone, Copy)]
pub struct DetailsRequest<'a> {
  pub exercise_id: &'a str,
  pub user_id: Option<&'a str>,
  pub grouping: Grouping,
  pub metric: Metric,
  pub preset: WindowPreset,
  pub now: DateTime<Utc>,
}

/// Compose the details view; `None` when the exercise does not exist
pub fn get_exercise_details(state: &AppState, request: DetailsRequest<'_>) -> Option<ExerciseDetails> {
  let snapshot = state.snapshot();
  let exercise = snapshot.get_exercise(request.exercise_id)?.clone();

  let stats = state.cache.exercise_stats(&snapshot, request.exercise_id);
  let window = request.preset.window(request.now);
  let series = state.cache.graph_series(
    &snapshot,
    request.exercise_id,
    request.grouping,
    request.metric,
    window,
  );
  let history = state.cache.workouts_for_exercise(&snapshot, request.exercise_id);
  let availability = SeriesAvailability::classify(history.len(), series.points.len());
  let is_custom = request.user_id.is_some_and(|user| exercise.is_custom_for(user));

  Some(ExerciseDetails {
    exercise,
    is_custom,
    stats,
    series,
    availability,
    history,
  })
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::commands::{delete_exercise, delete_workout, save_exercise, save_workout};
  use crate::store::Snapshot;
  use crate::test_utils::{make_exercise, make_workout, noon};

  fn state() -> AppState {
    let mut curl = make_exercise("curl", "Cable Curl");
    curl.user = Some("u1".to_string());
    AppState::new(Snapshot {
      exercises: vec![make_exercise("bench", "Bench Press"), curl],
      workouts: vec![
        make_workout("w1", noon(2024, 3, 11), "bench", &[(5, 100.0), (8, 80.0)]),
        make_workout("w2", noon(2024, 3, 14), "bench", &[(3, 100.0), (10, 60.0)]),
        make_workout("w3", noon(2024, 1, 5), "curl", &[(12, 20.0)]),
      ],
    })
  }

  fn request(exercise_id: &str, preset: WindowPreset) -> DetailsRequest<'_> {
    DetailsRequest {
      exercise_id,
      user_id: Some("u1"),
      grouping: Grouping::ByWeek,
      metric: Metric::Volume,
      preset,
      now: noon(2024, 3, 20),
    }
  }

  #[test]
  fn test_stats_through_cache() {
    let state = state();

    let stats = get_exercise_stats(&state, "bench");

    assert_eq!(stats.heaviest_weight, 100.0);
    assert_eq!(stats.best_set_volume, 640.0);
    assert!(Arc::ptr_eq(&stats, &get_exercise_stats(&state, "bench")));
  }

  #[test]
  fn test_graph_series_for_week() {
    let state = state();
    let window = WindowPreset::Last30Days.window(noon(2024, 3, 20));

    let series = get_exercise_graph_series(&state, "bench", Grouping::ByWeek, Metric::Volume, window);

    assert_eq!(series.points.len(), 1);
    assert_eq!(series.points[0].volume, 500.0 + 640.0 + 300.0 + 600.0);
  }

  #[test]
  fn test_mutation_is_visible_to_next_read() {
    // Arrange
    let state = state();
    let before = get_exercise_stats(&state, "bench");

    // Act
    save_workout(&state, make_workout("w4", noon(2024, 3, 18), "bench", &[(2, 110.0)])).unwrap();
    let after = get_exercise_stats(&state, "bench");

    // Assert
    assert_eq!(before.heaviest_weight, 100.0);
    assert_eq!(after.heaviest_weight, 110.0);
    assert_eq!(get_workouts_for_exercise(&state, "bench").len(), 3);
  }

  #[test]
  fn test_update_and_delete_invalidate_cached_views() {
    // Arrange
    let state = state();
    assert_eq!(get_exercise_stats(&state, "bench").heaviest_weight, 100.0);

    // Act: heavier rewrite of an existing workout
    save_workout(&state, make_workout("w1", noon(2024, 3, 11), "bench", &[(5, 120.0)])).unwrap();

    // Assert
    let updated = get_exercise_stats(&state, "bench");
    assert_eq!(updated.heaviest_weight, 120.0);
    assert_eq!(updated.total_sets, 3);
    assert_eq!(get_workouts_for_exercise(&state, "bench").len(), 2);

    delete_workout(&state, "w1").unwrap();
    assert_eq!(get_exercise_stats(&state, "bench").heaviest_weight, 100.0);
    delete_workout(&state, "w2").unwrap();
    assert_eq!(*get_exercise_stats(&state, "bench"), ExerciseStats::default());
    assert!(get_workouts_for_exercise(&state, "bench").is_empty());

    save_exercise(&state, make_exercise("bench", "Barbell Bench Press")).unwrap();
    assert_eq!(state.cache.metrics().entries, 0);
    assert_eq!(state.cache.metrics().invalidations, 4);

    let details = get_exercise_details(&state, request("bench", WindowPreset::AllTime)).unwrap();
    assert_eq!(details.exercise.name, "Barbell Bench Press");
    assert_eq!(details.availability, SeriesAvailability::NoHistory);
  }

  #[test]
  fn test_history_newest_first() {
    let state = state();
    let ids: Vec<String> = get_workouts_for_exercise(&state, "bench")
      .iter()
      .map(|w| w.id.clone())
      .collect();
    assert_eq!(ids, vec!["w2", "w1"]);
  }

  #[test]
  fn test_details_distinguish_empty_states() {
    let state = state();

    let bench = get_exercise_details(&state, request("bench", WindowPreset::Last30Days)).unwrap();
    assert_eq!(bench.availability, SeriesAvailability::Available);
    assert!(!bench.is_custom);

    // Curl history is older than 30 days
    let curl = get_exercise_details(&state, request("curl", WindowPreset::Last30Days)).unwrap();
    assert_eq!(curl.availability, SeriesAvailability::ExcludedByWindow);
    assert!(curl.is_custom);
    assert_eq!(curl.stats.total_sets, 1);

    delete_exercise(&state, "bench").unwrap();
    assert!(get_exercise_details(&state, request("bench", WindowPreset::AllTime)).is_none());
  }

  #[test]
  fn test_exercise_without_history() {
    let state = state();
    state.add_exercise(make_exercise("dip", "Dip")).unwrap();

    let details = get_exercise_details(&state, request("dip", WindowPreset::AllTime)).unwrap();

    assert_eq!(details.availability, SeriesAvailability::NoHistory);
    assert_eq!(*details.stats, ExerciseStats::default());
    assert!(details.series.is_empty());
  }
}
