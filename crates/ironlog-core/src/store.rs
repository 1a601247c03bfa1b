//! The `WorkoutStore` trait and supporting read-model types.
//!
//! The trait is implemented by storage backends (e.g.
//! `ironlog-store-sqlite`). It is deliberately dumb persistence: validation,
//! PR detection, and audit logic live in [`crate::records`] and
//! [`crate::audit`], which drive it.
//!
//! Every method is a potential suspension point and may block on I/O. The
//! store owns all shared mutable state; each multi-row write (create a
//! workout with its rows, replace a workout's rows, cascade-delete) must run
//! in a single transaction so partial batches are never observable.

use std::future::Future;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{
  movement::{Movement, MovementFilter, NewMovement},
  score::ScoreFields,
  template::{NewTemplate, WorkoutTemplate},
  wod::{NewWod, ScoreType, Wod, WodFilter},
  workout::{LoggedWorkout, WodPerformance, WorkoutFilter},
};

// ─── Read-model rows ─────────────────────────────────────────────────────────

/// One movement attempt in a user's history, as the retroactive PR pass
/// consumes it. Ordered chronologically (workout date, then row position).
#[derive(Debug, Clone)]
pub struct HistoryEntry {
  pub performance_id: Uuid,
  pub weight:         Option<f64>,
  pub performed_on:   NaiveDate,
  pub position:       u32,
}

/// One persisted WOD performance joined to its WOD's declared score type,
/// with enough context for manual review of a mismatch.
#[derive(Debug, Clone)]
pub struct PersistedWodScore {
  pub performance_id: Uuid,
  pub wod_id:         Uuid,
  pub wod_name:       String,
  pub user_id:        Uuid,
  pub performed_on:   NaiveDate,
  pub declared:       ScoreType,
  pub fields:         ScoreFields,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an ironlog storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait WorkoutStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Movement catalog ──────────────────────────────────────────────────

  /// Create and persist a custom (or, for seeding, standard) movement.
  fn add_movement(
    &self,
    input: NewMovement,
  ) -> impl Future<Output = Result<Movement, Self::Error>> + Send + '_;

  /// Retrieve a movement by id. Returns `None` if not found.
  fn get_movement(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Movement>, Self::Error>> + Send + '_;

  fn list_movements(
    &self,
    filter: MovementFilter,
  ) -> impl Future<Output = Result<Vec<Movement>, Self::Error>> + Send + '_;

  /// Delete a custom movement. Standard movements are read-only; a movement
  /// owned by someone else is rejected as not-owned.
  fn delete_movement(
    &self,
    id: Uuid,
    requested_by: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── WOD catalog ───────────────────────────────────────────────────────

  fn add_wod(
    &self,
    input: NewWod,
  ) -> impl Future<Output = Result<Wod, Self::Error>> + Send + '_;

  fn get_wod(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Wod>, Self::Error>> + Send + '_;

  fn list_wods(
    &self,
    filter: WodFilter,
  ) -> impl Future<Output = Result<Vec<Wod>, Self::Error>> + Send + '_;

  fn delete_wod(
    &self,
    id: Uuid,
    requested_by: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Templates ─────────────────────────────────────────────────────────

  fn add_template(
    &self,
    input: NewTemplate,
  ) -> impl Future<Output = Result<WorkoutTemplate, Self::Error>> + Send + '_;

  fn get_template(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<WorkoutTemplate>, Self::Error>> + Send + '_;

  fn list_templates(
    &self,
    owner_id: Option<Uuid>,
  ) -> impl Future<Output = Result<Vec<WorkoutTemplate>, Self::Error>> + Send + '_;

  fn delete_template(
    &self,
    id: Uuid,
    requested_by: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Logged workouts ───────────────────────────────────────────────────

  /// Persist a fully-built workout and all of its performance rows as one
  /// atomic batch. Rejects a duplicate (user, template, date) as a
  /// conflict. Callers go through [`crate::records::log_workout`], which
  /// validates scores and resolves PR flags first.
  fn create_workout(
    &self,
    workout: LoggedWorkout,
  ) -> impl Future<Output = Result<LoggedWorkout, Self::Error>> + Send + '_;

  /// Retrieve a workout with all of its rows, ordered by position.
  fn get_workout(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<LoggedWorkout>, Self::Error>> + Send + '_;

  fn list_workouts(
    &self,
    user_id: Uuid,
    filter: WorkoutFilter,
  ) -> impl Future<Output = Result<Vec<LoggedWorkout>, Self::Error>> + Send + '_;

  /// Replace a workout's performance rows in one transaction (delete the
  /// old rows, insert the new), keeping the workout envelope.
  fn replace_workout_rows(
    &self,
    workout: LoggedWorkout,
  ) -> impl Future<Output = Result<LoggedWorkout, Self::Error>> + Send + '_;

  /// Delete a workout, cascading to all of its performance rows.
  fn delete_workout(
    &self,
    id: Uuid,
    requested_by: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Detector reads ────────────────────────────────────────────────────

  /// Maximum weight ever recorded for (user, movement), or `None` with no
  /// weighted history. `exclude_workout` omits the rows of a workout being
  /// edited in place.
  fn max_weight_for_movement(
    &self,
    user_id: Uuid,
    movement_id: Uuid,
    exclude_workout: Option<Uuid>,
  ) -> impl Future<Output = Result<Option<f64>, Self::Error>> + Send + '_;

  /// Full movement history for (user, movement), chronological.
  fn movement_history(
    &self,
    user_id: Uuid,
    movement_id: Uuid,
  ) -> impl Future<Output = Result<Vec<HistoryEntry>, Self::Error>> + Send + '_;

  /// Distinct movements the user has ever logged.
  fn logged_movement_ids(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Uuid>, Self::Error>> + Send + '_;

  /// How many of the user's WOD performances currently carry the PR flag.
  fn flagged_wod_pr_count(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<usize, Self::Error>> + Send + '_;

  // ── Audit surface ─────────────────────────────────────────────────────

  /// Every persisted WOD performance joined to its declared score type.
  fn wod_score_rows(
    &self,
  ) -> impl Future<Output = Result<Vec<PersistedWodScore>, Self::Error>> + Send + '_;

  fn get_wod_performance(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<WodPerformance>, Self::Error>> + Send + '_;

  /// Overwrite a WOD performance's score fields. Raw write — the validated
  /// path is [`crate::records::update_wod_performance`].
  fn update_wod_performance_score(
    &self,
    id: Uuid,
    score: ScoreFields,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn delete_wod_performance(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── PR flags ──────────────────────────────────────────────────────────

  fn set_movement_pr_flag(
    &self,
    id: Uuid,
    is_pr: bool,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  fn set_wod_pr_flag(
    &self,
    id: Uuid,
    is_pr: bool,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
