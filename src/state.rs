use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::cache::DerivedViewCache;
use crate::models::{Exercise, Workout};
use crate::store::{InMemoryStore, Snapshot, StoreError};

/// Application state holding the record store and its derived-view cache.
///
/// All store mutations go through here so the cache is invalidated at the
/// same boundary that changes the data.
#[derive(Debug, Default)]
pub struct AppState {
  store: RwLock<InMemoryStore>,
  pub cache: DerivedViewCache,
}

impl AppState {
  pub fn new(snapshot: Snapshot) -> Self {
    Self {
      store: RwLock::new(InMemoryStore::from_snapshot(snapshot)),
      cache: DerivedViewCache::new(),
    }
  }

  /// Load the snapshot file at `path`
  pub fn load(path: &Path) -> Result<Self, StoreError> {
    Ok(Self::new(Snapshot::load(path)?))
  }

  /// Current snapshot; stays valid even if the store changes afterwards
  pub fn snapshot(&self) -> Arc<Snapshot> {
    self.store.read().snapshot()
  }

  pub fn add_workout(&self, workout: Workout) -> Result<(), StoreError> {
    self.mutate(|store| store.add_workout(workout))
  }

  pub fn update_workout(&self, workout: Workout) -> Result<(), StoreError> {
    self.mutate(|store| store.update_workout(workout))
  }

  pub fn remove_workout(&self, id: &str) -> Result<Workout, StoreError> {
    self.mutate(|store| store.remove_workout(id))
  }

  pub fn add_exercise(&self, exercise: Exercise) -> Result<(), StoreError> {
    self.mutate(|store| store.add_exercise(exercise))
  }

  pub fn update_exercise(&self, exercise: Exercise) -> Result<(), StoreError> {
    self.mutate(|store| store.update_exercise(exercise))
  }

  pub fn remove_exercise(&self, id: &str) -> Result<Exercise, StoreError> {
    self.mutate(|store| store.remove_exercise(id))
  }

  fn mutate<T>(&self, change: impl FnOnce(&mut InMemoryStore) -> Result<T, StoreError>) -> Result<T, StoreError> {
    let mut store = self.store.write();
    let result = change(&mut *store)?;
    // Cleared while the store lock is still held
    self.cache.invalidate();
    Ok(result)
  }
}
