pub mod analysis;

use crate::models::{Exercise, Workout};
use crate::state::AppState;
use crate::store::{RecordStore, StoreError};

/// All workouts, newest first
pub fn get_workouts(state: &AppState) -> Vec<Workout> {
  state
    .snapshot()
    .workouts_sorted_by_desc_date()
    .into_iter()
    .cloned()
    .collect()
}

/// One workout by id
pub fn get_workout(state: &AppState, id: &str) -> Option<Workout> {
  state.snapshot().get_workout(id).cloned()
}

/// Workouts whose name contains `query`, newest first
pub fn search_workouts(state: &AppState, query: &str) -> Vec<Workout> {
  let snapshot = state.snapshot();
  let mut matches: Vec<Workout> = snapshot.workouts_by_query(query).into_iter().cloned().collect();
  matches.sort_by(|a, b| b.date.cmp(&a.date));
  matches
}

pub fn get_exercises(state: &AppState) -> Vec<Exercise> {
  state.snapshot().list_exercises().to_vec()
}

pub fn get_exercise(state: &AppState, id: &str) -> Option<Exercise> {
  state.snapshot().get_exercise(id).cloned()
}

pub fn save_workout(state: &AppState, workout: Workout) -> Result<(), StoreError> {
  if state.snapshot().get_workout(&workout.id).is_some() {
    state.update_workout(workout)
  } else {
    state.add_workout(workout)
  }
}

pub fn delete_workout(state: &AppState, id: &str) -> Result<(), StoreError> {
  state.remove_workout(id).map(|_| ())
}

pub fn save_exercise(state: &AppState, exercise: Exercise) -> Result<(), StoreError> {
  if state.snapshot().get_exercise(&exercise.id).is_some() {
    state.update_exercise(exercise)
  } else {
    state.add_exercise(exercise)
  }
}

/// Delete an exercise together with its entries in every workout
pub fn delete_exercise(state: &AppState, id: &str) -> Result<(), StoreError> {
  state.remove_exercise(id).map(|_| ())
}
