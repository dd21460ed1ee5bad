//! Set records: the Pareto frontier of (reps, weight) pairs
//!
//! A pair is a record iff no other observed pair has at least as many reps
//! and at least as much weight, with one of the two strictly greater.

use std::cmp::Ordering;

use crate::models::{Set, SetRecord};

/// Compute set records from an exercise's pooled sets.
///
/// Incomplete sets are ignored. The result is sorted by reps ascending, so
/// the heavy low-rep records come first. Identical pairs collapse to one.
pub fn compute_set_records<'a, I>(sets: I) -> Vec<SetRecord>
where
  I: IntoIterator<Item = &'a Set>,
{
  let pairs = sets
    .into_iter()
    .filter(|s| s.is_complete())
    .map(|s| (s.reps, s.weight));
  pareto_frontier(pairs)
    .into_iter()
    .map(|(reps, weight)| SetRecord::new(reps, weight))
    .collect()
}

/// Non-dominated (reps, weight) pairs, sorted by reps ascending.
///
/// Sorts by weight descending then reps descending and keeps a pair iff its
/// reps exceed every rep count seen at a heavier (or equal) weight.
pub fn pareto_frontier<I>(pairs: I) -> Vec<(u32, f64)>
where
  I: IntoIterator<Item = (u32, f64)>,
{
  let mut candidates: Vec<(u32, f64)> = pairs.into_iter().collect();
  candidates.sort_by(|a, b| by_weight_then_reps_desc(a, b));

  let mut frontier = Vec::new();
  let mut max_reps: Option<u32> = None;

  for (reps, weight) in candidates {
    if max_reps.map_or(true, |max| reps > max) {
      frontier.push((reps, weight));
      max_reps = Some(reps);
    }
  }

  // Scan order is weight descending, which is reps ascending on the frontier
  frontier
}

fn by_weight_then_reps_desc(a: &(u32, f64), b: &(u32, f64)) -> Ordering {
  b.1.total_cmp(&a.1).then_with(|| b.0.cmp(&a.0))
}

/// True when `q` dominates `p`
pub fn dominates(q: (u32, f64), p: (u32, f64)) -> bool {
  q.0 >= p.0 && q.1 >= p.1 && (q.0 > p.0 || q.1 > p.1)
}
