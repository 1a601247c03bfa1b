//! Logged workouts and their performance rows.
//!
//! A [`LoggedWorkout`] is one dated instance of a user performing a template
//! (or an ad-hoc session). It owns all of its performance rows; they are
//! written as one atomic batch and deleted with it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  formula::{self, OneRmEstimate},
  wod::WodScore,
};

// ─── Performance rows ────────────────────────────────────────────────────────

/// One recorded attempt at a movement within a workout.
///
/// The dimensions are independently optional — a run has seconds and
/// distance, a squat has weight/sets/reps. Weight is the PR-relevant one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementPerformance {
  pub performance_id: Uuid,
  pub workout_id:     Uuid,
  pub movement_id:    Uuid,
  pub weight:         Option<f64>,
  pub sets:           Option<u32>,
  pub reps:           Option<u32>,
  pub seconds:        Option<u32>,
  pub distance_m:     Option<f64>,
  /// Derived, never user input. Set by PR detection at logging time and
  /// recomputed by the retroactive pass.
  pub is_pr:          bool,
  /// Order within the workout.
  pub position:       u32,
}

impl MovementPerformance {
  /// Estimated 1RM for this row, computed on read. "Not applicable" for rows
  /// without both weight and reps.
  pub fn estimated_one_rm(&self) -> OneRmEstimate {
    match (self.weight, self.reps) {
      (Some(weight), Some(reps)) => formula::estimate_one_rm(weight, reps),
      _ => OneRmEstimate::none(),
    }
  }
}

/// One recorded attempt at a WOD within a workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WodPerformance {
  pub performance_id: Uuid,
  pub workout_id:     Uuid,
  pub wod_id:         Uuid,
  pub score:          WodScore,
  /// Manual-only flag; WOD score types are not comparable on one axis, so
  /// nothing flips this automatically.
  pub is_pr:          bool,
}

// ─── LoggedWorkout ───────────────────────────────────────────────────────────

/// A dated performance instance, with all of its rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggedWorkout {
  pub workout_id:   Uuid,
  pub user_id:      Uuid,
  /// `None` for an ad-hoc session. When present, (user, template, date) is
  /// unique.
  pub template_id:  Option<Uuid>,
  pub performed_on: NaiveDate,
  pub notes:        Option<String>,
  pub created_at:   DateTime<Utc>,
  pub movements:    Vec<MovementPerformance>,
  pub wods:         Vec<WodPerformance>,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input row for a movement attempt. No `is_pr` — the detector decides.
#[derive(Debug, Clone)]
pub struct NewMovementPerformance {
  pub movement_id: Uuid,
  pub weight:      Option<f64>,
  pub sets:        Option<u32>,
  pub reps:        Option<u32>,
  pub seconds:     Option<u32>,
  pub distance_m:  Option<f64>,
}

/// Input row for a WOD attempt. No `is_pr` — the flag is a separate,
/// explicit toggle.
#[derive(Debug, Clone)]
pub struct NewWodPerformance {
  pub wod_id: Uuid,
  pub score:  WodScore,
}

/// Input to [`crate::records::log_workout`].
#[derive(Debug, Clone)]
pub struct NewLoggedWorkout {
  pub user_id:      Uuid,
  pub template_id:  Option<Uuid>,
  pub performed_on: NaiveDate,
  pub notes:        Option<String>,
  pub movements:    Vec<NewMovementPerformance>,
  pub wods:         Vec<NewWodPerformance>,
}

/// Parameters for [`crate::store::WorkoutStore::list_workouts`].
#[derive(Debug, Clone, Default)]
pub struct WorkoutFilter {
  pub template_id: Option<Uuid>,
  pub from:        Option<NaiveDate>,
  pub until:       Option<NaiveDate>,
  pub limit:       Option<usize>,
  pub offset:      Option<usize>,
}
