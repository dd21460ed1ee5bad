//! Derived-view cache
//!
//! Memoizes exercise statistics, graph series and exercise history against
//! one store snapshot. Entries are only valid for the snapshot they were
//! computed from: a different snapshot reference, or an explicit
//! `invalidate()`, drops every entry before anything is returned.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;

use crate::analysis::compute_exercise_stats;
use crate::graph::{build_graph_series, DateWindow, GraphSeries};
use crate::models::{ExerciseId, ExerciseStats, Grouping, Metric, Workout};
use crate::store::{RecordStore, Snapshot};

/// Request key for a graph series
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
  pub exercise_id: ExerciseId,
  pub grouping: Grouping,
  pub metric: Metric,
  pub window: DateWindow,
}

/// Workouts using an exercise, newest first
pub type ExerciseHistory = Vec<Workout>;

#[derive(Debug, Default)]
struct CacheState {
  snapshot: Option<Arc<Snapshot>>,
  stats: HashMap<ExerciseId, Arc<ExerciseStats>>,
  series: HashMap<SeriesKey, Arc<GraphSeries>>,
  history: HashMap<ExerciseId, Arc<ExerciseHistory>>,
}

impl CacheState {
  fn is_current(&self, snapshot: &Arc<Snapshot>) -> bool {
    self.snapshot.as_ref().is_some_and(|s| Arc::ptr_eq(s, snapshot))
  }

  fn clear(&mut self) {
    self.snapshot = None;
    self.stats.clear();
    self.series.clear();
    self.history.clear();
  }

  fn len(&self) -> usize {
    self.stats.len() + self.series.len() + self.history.len()
  }
}

/// A derived value the cache knows where to keep
trait CachedView: Sized {
  type Key: Hash + Eq + Clone + std::fmt::Debug;

  fn table(state: &CacheState) -> &HashMap<Self::Key, Arc<Self>>;

  fn table_mut(state: &mut CacheState) -> &mut HashMap<Self::Key, Arc<Self>>;
}

impl CachedView for ExerciseStats {
  type Key = ExerciseId;

  fn table(state: &CacheState) -> &HashMap<Self::Key, Arc<Self>> {
    &state.stats
  }

  fn table_mut(state: &mut CacheState) -> &mut HashMap<Self::Key, Arc<Self>> {
    &mut state.stats
  }
}

impl CachedView for GraphSeries {
  type Key = SeriesKey;

  fn table(state: &CacheState) -> &HashMap<Self::Key, Arc<Self>> {
    &state.series
  }

  fn table_mut(state: &mut CacheState) -> &mut HashMap<Self::Key, Arc<Self>> {
    &mut state.series
  }
}

impl CachedView for ExerciseHistory {
  type Key = ExerciseId;

  fn table(state: &CacheState) -> &HashMap<Self::Key, Arc<Self>> {
    &state.history
  }

  fn table_mut(state: &mut CacheState) -> &mut HashMap<Self::Key, Arc<Self>> {
    &mut state.history
  }
}

/// Hit/miss counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheMetrics {
  pub hits: u64,
  pub misses: u64,
  pub invalidations: u64,
  pub entries: usize,
}

#[derive(Debug, Default)]
pub struct DerivedViewCache {
  state: RwLock<CacheState>,
  hits: AtomicU64,
  misses: AtomicU64,
  invalidations: AtomicU64,
}

impl DerivedViewCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn exercise_stats(&self, snapshot: &Arc<Snapshot>, exercise_id: &str) -> Arc<ExerciseStats> {
    self.get_or_compute(snapshot, exercise_id.to_string(), |s| {
      compute_exercise_stats(s.list_workouts(), exercise_id)
    })
  }

  pub fn graph_series(
    &self,
    snapshot: &Arc<Snapshot>,
    exercise_id: &str,
    grouping: Grouping,
    metric: Metric,
    window: DateWindow,
  ) -> Arc<GraphSeries> {
    let key = SeriesKey {
      exercise_id: exercise_id.to_string(),
      grouping,
      metric,
      window,
    };
    self.get_or_compute(snapshot, key, |s| {
      build_graph_series(s.list_workouts(), exercise_id, grouping, metric, &window)
    })
  }

  pub fn workouts_for_exercise(&self, snapshot: &Arc<Snapshot>, exercise_id: &str) -> Arc<ExerciseHistory> {
    self.get_or_compute(snapshot, exercise_id.to_string(), |s| {
      s.workouts_for_exercise(exercise_id).into_iter().cloned().collect()
    })
  }

  /// Drop every entry. Called by the store mutation boundary.
  pub fn invalidate(&self) {
    let mut state = self.state.write();
    let dropped = state.len();
    state.clear();
    self.invalidations.fetch_add(1, Ordering::Relaxed);
    debug!(dropped, "Derived-view cache invalidated");
  }

  pub fn metrics(&self) -> CacheMetrics {
    CacheMetrics {
      hits: self.hits.load(Ordering::Relaxed),
      misses: self.misses.load(Ordering::Relaxed),
      invalidations: self.invalidations.load(Ordering::Relaxed),
      entries: self.state.read().len(),
    }
  }

  fn get_or_compute<V: CachedView>(
    &self,
    snapshot: &Arc<Snapshot>,
    key: V::Key,
    compute: impl FnOnce(&Snapshot) -> V,
  ) -> Arc<V> {
    {
      let state = self.state.read();
      if state.is_current(snapshot) {
        if let Some(value) = V::table(&state).get(&key) {
          self.hits.fetch_add(1, Ordering::Relaxed);
          debug!(?key, "Derived-view cache hit");
          return Arc::clone(value);
        }
      }
    }

    let mut state = self.state.write();
    if !state.is_current(snapshot) {
      if state.snapshot.is_some() {
        debug!(dropped = state.len(), "Snapshot changed, dropping derived views");
      }
      state.clear();
      state.snapshot = Some(Arc::clone(snapshot));
    }

    // Another reader may have filled the entry while we waited for the lock
    if let Some(value) = V::table(&state).get(&key) {
      self.hits.fetch_add(1, Ordering::Relaxed);
      return Arc::clone(value);
    }

    self.misses.fetch_add(1, Ordering::Relaxed);
    debug!(?key, "Derived-view cache miss");
    let value = Arc::new(compute(snapshot.as_ref()));
    V::table_mut(&mut state).insert(key, Arc::clone(&value));
    value
  }
}
