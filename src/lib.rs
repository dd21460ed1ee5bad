pub mod analysis;
pub mod bucketing;
pub mod cache;
pub mod commands;
pub mod config;
pub mod graph;
pub mod logging;
pub mod models;
pub mod records;
pub mod state;
pub mod store;

#[cfg(test)]
mod test_utils;

use std::ffi::OsString;
use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use commands::analysis::{get_exercise_details, DetailsRequest};
use config::{AppConfig, ConfigError};
use graph::WindowPreset;
use models::{Grouping, Metric};
use state::AppState;
use store::StoreError;

/// ---------------------------------------------------------------------------
/// Command Line Interface
/// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(
  name = "lift-log",
  version,
  about = "Personal records and progress graphs from logged workouts",
  long_about = None
)]
pub struct Cli {
  /// Snapshot file with exercises and workouts (overrides LIFT_LOG_DATA_PATH)
  #[arg(long, global = true)]
  pub data: Option<PathBuf>,

  #[command(subcommand)]
  pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
  /// List all exercises
  Exercises,
  /// List workouts, optionally filtered by name
  Workouts {
    #[arg(long)]
    query: Option<String>,
  },
  /// Show one workout
  Workout { id: String },
  /// Personal-record statistics for an exercise
  Stats { exercise_id: String },
  /// Graph series for an exercise
  Graph {
    exercise_id: String,
    #[arg(long)]
    grouping: Option<Grouping>,
    #[arg(long, default_value_t = Metric::Weight)]
    metric: Metric,
    #[arg(long)]
    window: Option<WindowPreset>,
  },
  /// Workouts that include an exercise, newest first
  History { exercise_id: String },
  /// Full exercise details page
  Details {
    exercise_id: String,
    #[arg(long)]
    user: Option<String>,
    #[arg(long)]
    grouping: Option<Grouping>,
    #[arg(long, default_value_t = Metric::Weight)]
    metric: Metric,
    #[arg(long)]
    window: Option<WindowPreset>,
  },
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
  #[error(transparent)]
  Args(#[from] clap::Error),

  #[error(transparent)]
  Config(#[from] ConfigError),

  #[error(transparent)]
  Store(#[from] StoreError),

  #[error("Failed to encode output: {0}")]
  Output(#[from] serde_json::Error),

  #[error("Unknown exercise id: {0}")]
  UnknownExercise(String),

  #[error("Unknown workout id: {0}")]
  UnknownWorkout(String),
}

/// Parse process arguments and print the requested view as JSON
pub fn run() -> Result<(), CliError> {
  match run_from(std::env::args_os()) {
    Ok(output) => {
      println!("{}", output);
      Ok(())
    }
    Err(CliError::Args(e)) => e.exit(),
    Err(e) => Err(e),
  }
}

/// Parse `args` first, then load configuration and run the command
pub fn run_from<I, T>(args: I) -> Result<String, CliError>
where
  I: IntoIterator<Item = T>,
  T: Into<OsString> + Clone,
{
  let cli = Cli::try_parse_from(args)?;
  let config = AppConfig::from_env()?;
  logging::init(&config.log_filter, config.log_format);

  execute(&config, cli)
}

/// Run one parsed command and return its JSON output
pub fn execute(config: &AppConfig, cli: Cli) -> Result<String, CliError> {
  let path = config.resolve_data_path(cli.data)?;
  let state = AppState::load(&path)?;
  info!(command = ?cli.command, "Running command");

  let now = Utc::now();
  match cli.command {
    Command::Exercises => to_json(&commands::get_exercises(&state)),
    Command::Workouts { query } => match query {
      Some(q) => to_json(&commands::search_workouts(&state, &q)),
      None => to_json(&commands::get_workouts(&state)),
    },
    Command::Workout { id } => {
      let workout = commands::get_workout(&state, &id).ok_or(CliError::UnknownWorkout(id))?;
      to_json(&workout)
    }
    Command::Stats { exercise_id } => {
      to_json(&*commands::analysis::get_exercise_stats(&state, &exercise_id))
    }
    Command::Graph {
      exercise_id,
      grouping,
      metric,
      window,
    } => {
      let window = window.unwrap_or(config.default_window).window(now);
      let grouping = grouping.unwrap_or(config.default_grouping);
      let series =
        commands::analysis::get_exercise_graph_series(&state, &exercise_id, grouping, metric, window);
      to_json(&*series)
    }
    Command::History { exercise_id } => {
      to_json(&*commands::analysis::get_workouts_for_exercise(&state, &exercise_id))
    }
    Command::Details {
      exercise_id,
      user,
      grouping,
      metric,
      window,
    } => {
      let request = DetailsRequest {
        exercise_id: &exercise_id,
        user_id: user.as_deref(),
        grouping: grouping.unwrap_or(config.default_grouping),
        metric,
        preset: window.unwrap_or(config.default_window),
        now,
      };
      let details =
        get_exercise_details(&state, request).ok_or_else(|| CliError::UnknownExercise(exercise_id.clone()))?;
      to_json(&details)
    }
  }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, CliError> {
  Ok(serde_json::to_string_pretty(value)?)
}
