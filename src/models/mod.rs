pub mod analysis;
pub mod exercise;
pub mod workout;

pub use analysis::{ExerciseStats, GraphPoint, Grouping, Metric, SetRecord};
pub use exercise::{Exercise, ExerciseId};
pub use workout::{ExerciseEntry, Set, SetKind, SetStatus, Workout, WorkoutId};
