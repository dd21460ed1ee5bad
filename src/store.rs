//! Record store view
//!
//! Read access to already-loaded exercises and workouts, plus the in-memory
//! store the app mutates. Every mutation swaps in a new snapshot, so anything
//! holding the previous `Arc<Snapshot>` keeps a consistent view of the data.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::models::{Exercise, Workout};

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Failed to read snapshot: {0}")]
  Io(#[from] std::io::Error),

  #[error("Invalid snapshot JSON: {0}")]
  Json(#[from] serde_json::Error),

  #[error("Duplicate {kind} id: {id}")]
  Duplicate { kind: &'static str, id: String },

  #[error("Unknown {kind} id: {id}")]
  NotFound { kind: &'static str, id: String },
}

impl Serialize for StoreError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Read Interface
/// ---------------------------------------------------------------------------

/// Read-only view over loaded records. No ordering is implied.
pub trait RecordStore {
  fn list_workouts(&self) -> &[Workout];

  fn list_exercises(&self) -> &[Exercise];

  fn get_exercise(&self, id: &str) -> Option<&Exercise> {
    self.list_exercises().iter().find(|e| e.id == id)
  }

  fn get_workout(&self, id: &str) -> Option<&Workout> {
    self.list_workouts().iter().find(|w| w.id == id)
  }

  /// Case-insensitive substring match on workout name
  fn workouts_by_query(&self, query: &str) -> Vec<&Workout> {
    let needle = query.to_lowercase();
    self
      .list_workouts()
      .iter()
      .filter(|w| w.name.to_lowercase().contains(&needle))
      .collect()
  }

  /// All workouts, newest first
  fn workouts_sorted_by_desc_date(&self) -> Vec<&Workout> {
    sorted_desc(self.list_workouts().iter().collect())
  }

  /// Workouts that include the exercise, newest first
  fn workouts_for_exercise(&self, exercise_id: &str) -> Vec<&Workout> {
    sorted_desc(
      self
        .list_workouts()
        .iter()
        .filter(|w| w.uses_exercise(exercise_id))
        .collect(),
    )
  }
}

fn sorted_desc(mut workouts: Vec<&Workout>) -> Vec<&Workout> {
  workouts.sort_by(|a, b| b.date.cmp(&a.date));
  workouts
}

/// ---------------------------------------------------------------------------
/// Snapshot
/// ---------------------------------------------------------------------------

/// Immutable set of records as loaded at one point in time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
  #[serde(default)]
  pub exercises: Vec<Exercise>,
  #[serde(default)]
  pub workouts: Vec<Workout>,
}

impl Snapshot {
  pub fn from_json(json: &str) -> Result<Self, StoreError> {
    Ok(serde_json::from_str(json)?)
  }

  pub fn load(path: &Path) -> Result<Self, StoreError> {
    let raw = fs::read_to_string(path)?;
    let snapshot = Self::from_json(&raw)?;
    info!(
      path = %path.display(),
      exercises = snapshot.exercises.len(),
      workouts = snapshot.workouts.len(),
      "Loaded snapshot"
    );
    Ok(snapshot)
  }

  pub fn to_json(&self) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(self)?)
  }
}

impl RecordStore for Snapshot {
  fn list_workouts(&self) -> &[Workout] {
    &self.workouts
  }

  fn list_exercises(&self) -> &[Exercise] {
    &self.exercises
  }
}

/// ---------------------------------------------------------------------------
/// In-Memory Store
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
  snapshot: Arc<Snapshot>,
}

impl InMemoryStore {
  pub fn from_snapshot(snapshot: Snapshot) -> Self {
    Self {
      snapshot: Arc::new(snapshot),
    }
  }

  /// Current snapshot reference; replaced on every mutation
  pub fn snapshot(&self) -> Arc<Snapshot> {
    Arc::clone(&self.snapshot)
  }

  pub fn add_workout(&mut self, workout: Workout) -> Result<(), StoreError> {
    if self.snapshot.get_workout(&workout.id).is_some() {
      return Err(StoreError::Duplicate { kind: "workout", id: workout.id });
    }
    info!(workout_id = %workout.id, "Adding workout");
    self.mutate(|s| s.workouts.push(workout));
    Ok(())
  }

  pub fn update_workout(&mut self, workout: Workout) -> Result<(), StoreError> {
    let idx = self.workout_index(&workout.id)?;
    info!(workout_id = %workout.id, "Updating workout");
    self.mutate(|s| s.workouts[idx] = workout);
    Ok(())
  }

  pub fn remove_workout(&mut self, id: &str) -> Result<Workout, StoreError> {
    let idx = self.workout_index(id)?;
    info!(workout_id = %id, "Removing workout");
    let mut removed = None;
    self.mutate(|s| removed = Some(s.workouts.remove(idx)));
    removed.ok_or_else(|| StoreError::NotFound { kind: "workout", id: id.to_string() })
  }

  pub fn add_exercise(&mut self, exercise: Exercise) -> Result<(), StoreError> {
    if self.snapshot.get_exercise(&exercise.id).is_some() {
      return Err(StoreError::Duplicate { kind: "exercise", id: exercise.id });
    }
    info!(exercise_id = %exercise.id, "Adding exercise");
    self.mutate(|s| s.exercises.push(exercise));
    Ok(())
  }

  pub fn update_exercise(&mut self, exercise: Exercise) -> Result<(), StoreError> {
    let idx = self.exercise_index(&exercise.id)?;
    info!(exercise_id = %exercise.id, "Updating exercise");
    self.mutate(|s| s.exercises[idx] = exercise);
    Ok(())
  }

  /// Remove an exercise and every entry of it from all workouts
  pub fn remove_exercise(&mut self, id: &str) -> Result<Exercise, StoreError> {
    let idx = self.exercise_index(id)?;
    info!(exercise_id = %id, "Removing exercise and its workout entries");
    let mut removed = None;
    self.mutate(|s| {
      removed = Some(s.exercises.remove(idx));
      for workout in &mut s.workouts {
        workout.exercises.retain(|e| e.exercise != id);
      }
    });
    removed.ok_or_else(|| StoreError::NotFound { kind: "exercise", id: id.to_string() })
  }

  fn workout_index(&self, id: &str) -> Result<usize, StoreError> {
    self
      .snapshot
      .workouts
      .iter()
      .position(|w| w.id == id)
      .ok_or_else(|| StoreError::NotFound { kind: "workout", id: id.to_string() })
  }

  fn exercise_index(&self, id: &str) -> Result<usize, StoreError> {
    self
      .snapshot
      .exercises
      .iter()
      .position(|e| e.id == id)
      .ok_or_else(|| StoreError::NotFound { kind: "exercise", id: id.to_string() })
  }

  /// Apply a change to a copy of the records and publish it as a new snapshot
  fn mutate(&mut self, change: impl FnOnce(&mut Snapshot)) {
    let mut next = Snapshot::clone(&self.snapshot);
    change(&mut next);
    self.snapshot = Arc::new(next);
  }
}

impl RecordStore for InMemoryStore {
  fn list_workouts(&self) -> &[Workout] {
    &self.snapshot.workouts
  }

  fn list_exercises(&self) -> &[Exercise] {
    &self.snapshot.exercises
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{make_exercise, make_workout, noon, seeded_store};
  use std::io::Write;

  #[test]
  fn test_get_exercise_and_absence() {
    let store = seeded_store();
    assert_eq!(store.get_exercise("bench").map(|e| e.name.as_str()), Some("Bench Press"));
    assert!(store.get_exercise("deadlift").is_none());
  }

  #[test]
  fn test_workouts_for_exercise_sorted_desc() {
    let store = seeded_store();

    let history: Vec<&str> = store
      .workouts_for_exercise("bench")
      .iter()
      .map(|w| w.id.as_str())
      .collect();

    assert_eq!(history, vec!["w3", "w1"]);
    assert!(store.workouts_for_exercise("deadlift").is_empty());
  }

  #[test]
  fn test_history_includes_workouts_with_only_incomplete_sets() {
    let mut store = seeded_store();
    let mut planned = make_workout("w4", noon(2020, 1, 1), "bench", &[(5, 100.0)]);
    planned.exercises[0].sets[0].status = crate::models::SetStatus::Incomplete;
    store.add_workout(planned).unwrap();

    assert_eq!(store.workouts_for_exercise("bench").len(), 3);
  }

  #[test]
  fn test_workouts_by_query_is_case_insensitive() {
    let mut store = InMemoryStore::default();
    let mut push = make_workout("a", noon(2024, 1, 1), "bench", &[(5, 100.0)]);
    push.name = "Push Day".to_string();
    let mut pull = make_workout("b", noon(2024, 1, 2), "row", &[(8, 60.0)]);
    pull.name = "Pull Day".to_string();
    store.add_workout(push).unwrap();
    store.add_workout(pull).unwrap();

    let ids: Vec<&str> = store.workouts_by_query("PUSH").iter().map(|w| w.id.as_str()).collect();
    assert_eq!(ids, vec!["a"]);
    assert_eq!(store.workouts_by_query("day").len(), 2);
    assert_eq!(store.workouts_by_query("").len(), 2);
  }

  #[test]
  fn test_workouts_sorted_by_desc_date() {
    let store = seeded_store();
    let ids: Vec<&str> = store
      .workouts_sorted_by_desc_date()
      .iter()
      .map(|w| w.id.as_str())
      .collect();
    assert_eq!(ids, vec!["w3", "w2", "w1"]);
  }

  #[test]
  fn test_mutation_replaces_snapshot() {
    let mut store = seeded_store();
    let before = store.snapshot();

    store
      .add_workout(make_workout("w9", noon(2024, 1, 1), "bench", &[(1, 120.0)]))
      .unwrap();

    let after = store.snapshot();
    assert!(!Arc::ptr_eq(&before, &after));
    assert_eq!(before.workouts.len(), 3);
    assert_eq!(after.workouts.len(), 4);
  }

  #[test]
  fn test_duplicate_and_unknown_ids() {
    let mut store = seeded_store();

    let dup = store.add_exercise(make_exercise("bench", "Bench again"));
    assert!(matches!(dup, Err(StoreError::Duplicate { kind: "exercise", .. })));

    let missing = store.remove_workout("nope");
    assert!(matches!(missing, Err(StoreError::NotFound { kind: "workout", .. })));
    assert_eq!(missing.unwrap_err().to_string(), "Unknown workout id: nope");
  }

  #[test]
  fn test_update_workout() {
    let mut store = seeded_store();
    let mut w1 = store.get_workout("w1").cloned().unwrap();
    w1.notes = "felt strong".to_string();

    store.update_workout(w1).unwrap();

    assert_eq!(store.get_workout("w1").unwrap().notes, "felt strong");
  }

  #[test]
  fn test_remove_exercise_strips_workout_entries() {
    let mut store = seeded_store();

    let removed = store.remove_exercise("bench").unwrap();

    assert_eq!(removed.id, "bench");
    assert!(store.get_exercise("bench").is_none());
    assert!(store.list_workouts().iter().all(|w| !w.uses_exercise("bench")));
    assert_eq!(store.list_workouts().len(), 3);
  }

  #[test]
  fn test_load_snapshot_from_file() {
    let json = r#"{
      "exercises": [
        { "id": "bench", "name": "Bench Press", "muscleGroups": ["chest", "triceps"], "videoId": "abc123" },
        { "id": "curl", "name": "Cable Curl", "muscleGroups": ["biceps"], "user": "u1" }
      ],
      "workouts": [
        {
          "id": "w1",
          "name": "Push",
          "date": "2024-03-11T17:30:00Z",
          "duration": 75,
          "notes": "",
          "exercises": [
            { "exercise": "bench", "sets": [
              { "type": "warmUp", "reps": 10, "weight": 40, "status": "complete" },
              { "type": "normal", "reps": 5, "weight": 100, "status": "complete" },
              { "type": "normal", "reps": 5, "weight": 105, "status": "incomplete" }
            ] }
          ]
        }
      ]
    }"#;
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let snapshot = Snapshot::load(file.path()).unwrap();

    assert_eq!(snapshot.exercises.len(), 2);
    assert_eq!(snapshot.exercises[0].video_id.as_deref(), Some("abc123"));
    assert!(snapshot.exercises[1].is_custom_for("u1"));
    assert!(!snapshot.exercises[0].is_custom_for("u1"));
    let sets = &snapshot.workouts[0].exercises[0].sets;
    assert_eq!(sets[0].kind, crate::models::SetKind::WarmUp);
    assert!(!sets[2].is_complete());
    assert_eq!(snapshot.workouts[0].completed_sets("bench").count(), 2);
  }

  #[test]
  fn test_load_snapshot_errors() {
    assert!(matches!(
      Snapshot::load(Path::new("/nonexistent/lift-log.json")),
      Err(StoreError::Io(_))
    ));
    assert!(matches!(Snapshot::from_json("{ not json"), Err(StoreError::Json(_))));
  }

  #[test]
  fn test_saved_snapshot_loads_back() {
    // Arrange
    let snapshot = seeded_store().snapshot();
    let mut file = tempfile::NamedTempFile::new().unwrap();

    // Act
    file.write_all(snapshot.to_json().unwrap().as_bytes()).unwrap();
    let loaded = Snapshot::load(file.path()).unwrap();

    // Assert
    assert_eq!(loaded.exercises, snapshot.exercises);
    assert_eq!(loaded.workouts, snapshot.workouts);
  }
}
