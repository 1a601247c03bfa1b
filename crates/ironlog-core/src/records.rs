//! Personal-record detection and the logging/edit orchestration that feeds
//! it.
//!
//! Movement PRs are automatic: a candidate beats the prior maximum weight
//! for (user, movement), strict greater-than. WOD PRs are manual-only —
//! time, rounds and weight scores are not comparable on one axis, so the
//! flag is flipped only on explicit request. That asymmetry is deliberate.
//!
//! History is re-read from the store per invocation; there is no in-process
//! cache. Two concurrent record-setting logs for the same (user, movement)
//! can therefore race on read-max-then-compare — accepted as benign (worst
//! case one extra flag, corrected by the retroactive pass).

use chrono::Utc;
use uuid::Uuid;

use crate::{
  error::{EntityKind, Error},
  score,
  store::WorkoutStore,
  wod::WodScore,
  workout::{
    LoggedWorkout, MovementPerformance, NewLoggedWorkout,
    NewMovementPerformance, NewWodPerformance, WodPerformance,
  },
};

// ─── Single-record detection ─────────────────────────────────────────────────

/// Decide whether `candidate_weight` is a new PR for (user, movement).
///
/// No prior history always yields `true` for the first weighted attempt.
/// Matching the prior best is not a new record. Candidates without a
/// positive weight are never PRs.
pub async fn detect_movement_pr<S>(
  store: &S,
  user_id: Uuid,
  movement_id: Uuid,
  candidate_weight: f64,
  exclude_workout: Option<Uuid>,
) -> Result<bool, S::Error>
where
  S: WorkoutStore + ?Sized,
{
  if candidate_weight <= 0.0 {
    return Ok(false);
  }

  let prior_max = store
    .max_weight_for_movement(user_id, movement_id, exclude_workout)
    .await?;

  Ok(match prior_max {
    None => true,
    Some(max) => candidate_weight > max,
  })
}

/// Manually toggle the PR flag on a WOD performance.
///
/// This is the only way a WOD performance gains or loses the flag; nothing
/// is inferred from the score.
pub async fn set_wod_pr<S>(
  store: &S,
  performance_id: Uuid,
  is_pr: bool,
) -> Result<(), S::Error>
where
  S: WorkoutStore + ?Sized,
  S::Error: From<Error>,
{
  store
    .get_wod_performance(performance_id)
    .await?
    .ok_or(Error::PerformanceNotFound(performance_id))?;
  store.set_wod_pr_flag(performance_id, is_pr).await
}

// ─── Logging ─────────────────────────────────────────────────────────────────

/// Log a workout: validate every WOD score against its WOD's declared score
/// type, run PR detection for every weighted movement row, then persist the
/// whole batch atomically.
///
/// Duplicate (user, template, date) surfaces as
/// [`Error::DuplicateLog`]; nothing is written in that case.
pub async fn log_workout<S>(
  store: &S,
  input: NewLoggedWorkout,
) -> Result<LoggedWorkout, S::Error>
where
  S: WorkoutStore + ?Sized,
  S::Error: From<Error>,
{
  if let Some(template_id) = input.template_id {
    store
      .get_template(template_id)
      .await?
      .ok_or(Error::TemplateNotFound(template_id))?;
  }

  let workout_id = Uuid::new_v4();
  let movements =
    build_movement_rows(store, workout_id, input.user_id, &input.movements, None)
      .await?;
  let wods = build_wod_rows(store, workout_id, &input.wods).await?;

  let workout = LoggedWorkout {
    workout_id,
    user_id: input.user_id,
    template_id: input.template_id,
    performed_on: input.performed_on,
    notes: input.notes,
    created_at: Utc::now(),
    movements,
    wods,
  };

  store.create_workout(workout).await
}

/// Replace a workout's performance rows in place.
///
/// Validation and PR detection run exactly as for a fresh log, except the
/// workout's own current rows are excluded from the prior-max comparison.
pub async fn update_workout<S>(
  store: &S,
  workout_id: Uuid,
  requested_by: Uuid,
  movements: Vec<NewMovementPerformance>,
  wods: Vec<NewWodPerformance>,
) -> Result<LoggedWorkout, S::Error>
where
  S: WorkoutStore + ?Sized,
  S::Error: From<Error>,
{
  let existing = store
    .get_workout(workout_id)
    .await?
    .ok_or(Error::WorkoutNotFound(workout_id))?;
  if existing.user_id != requested_by {
    return Err(
      Error::NotOwner { kind: EntityKind::Workout, id: workout_id }.into(),
    );
  }

  let new_movements = build_movement_rows(
    store,
    workout_id,
    existing.user_id,
    &movements,
    Some(workout_id),
  )
  .await?;
  let new_wods = build_wod_rows(store, workout_id, &wods).await?;

  let workout = LoggedWorkout {
    movements: new_movements,
    wods: new_wods,
    ..existing
  };

  store.replace_workout_rows(workout).await
}

/// Re-validate a single edited WOD performance before persisting it.
///
/// An invalid score is rejected — never coerced — with the missing/extra
/// fields and the WOD's expected score type in the error.
pub async fn update_wod_performance<S>(
  store: &S,
  performance_id: Uuid,
  score: WodScore,
  requested_by: Uuid,
) -> Result<WodPerformance, S::Error>
where
  S: WorkoutStore + ?Sized,
  S::Error: From<Error>,
{
  let perf = store
    .get_wod_performance(performance_id)
    .await?
    .ok_or(Error::PerformanceNotFound(performance_id))?;

  let workout = store
    .get_workout(perf.workout_id)
    .await?
    .ok_or(Error::WorkoutNotFound(perf.workout_id))?;
  if workout.user_id != requested_by {
    return Err(
      Error::NotOwner { kind: EntityKind::Workout, id: workout.workout_id }
        .into(),
    );
  }

  let wod = store
    .get_wod(perf.wod_id)
    .await?
    .ok_or(Error::WodNotFound(perf.wod_id))?;
  score::expect_score_type(&wod.score_type, &score)
    .map_err(Error::Score)?;

  store
    .update_wod_performance_score(performance_id, score.fields())
    .await?;

  Ok(WodPerformance { score, ..perf })
}

// ─── Retroactive flagging ────────────────────────────────────────────────────

/// Result of [`retroflag_prs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetroflagSummary {
  /// Movement rows carrying the PR flag after the pass.
  pub movement_prs: usize,
  /// WOD rows carrying the (manual) flag — reported, never touched.
  pub wod_prs:      usize,
}

/// Recompute every movement PR flag for a user from scratch.
///
/// Each movement's history is walked oldest-first; every row that strictly
/// exceeds the running maximum is flagged, every other row is unflagged.
/// This reproduces what live detection would have flagged, including
/// multiple non-adjacent PRs per movement. WOD rows are left untouched.
pub async fn retroflag_prs<S>(
  store: &S,
  user_id: Uuid,
) -> Result<RetroflagSummary, S::Error>
where
  S: WorkoutStore + ?Sized,
{
  let mut movement_prs = 0;

  for movement_id in store.logged_movement_ids(user_id).await? {
    let mut running_max: Option<f64> = None;

    for entry in store.movement_history(user_id, movement_id).await? {
      let is_pr = match entry.weight {
        Some(w) if w > 0.0 => running_max.is_none_or(|max| w > max),
        _ => false,
      };
      if is_pr {
        running_max = entry.weight;
        movement_prs += 1;
      }
      store.set_movement_pr_flag(entry.performance_id, is_pr).await?;
    }
  }

  let wod_prs = store.flagged_wod_pr_count(user_id).await?;

  tracing::debug!(%user_id, movement_prs, wod_prs, "retroactive PR pass complete");
  Ok(RetroflagSummary { movement_prs, wod_prs })
}

// ─── Row builders ────────────────────────────────────────────────────────────

async fn build_movement_rows<S>(
  store: &S,
  workout_id: Uuid,
  user_id: Uuid,
  inputs: &[NewMovementPerformance],
  exclude_workout: Option<Uuid>,
) -> Result<Vec<MovementPerformance>, S::Error>
where
  S: WorkoutStore + ?Sized,
  S::Error: From<Error>,
{
  let mut rows = Vec::with_capacity(inputs.len());

  for (position, input) in inputs.iter().enumerate() {
    store
      .get_movement(input.movement_id)
      .await?
      .ok_or(Error::MovementNotFound(input.movement_id))?;

    let is_pr = match input.weight {
      Some(w) => {
        detect_movement_pr(store, user_id, input.movement_id, w, exclude_workout)
          .await?
      }
      None => false,
    };

    rows.push(MovementPerformance {
      performance_id: Uuid::new_v4(),
      workout_id,
      movement_id: input.movement_id,
      weight: input.weight,
      sets: input.sets,
      reps: input.reps,
      seconds: input.seconds,
      distance_m: input.distance_m,
      is_pr,
      position: position as u32,
    });
  }

  Ok(rows)
}

async fn build_wod_rows<S>(
  store: &S,
  workout_id: Uuid,
  inputs: &[NewWodPerformance],
) -> Result<Vec<WodPerformance>, S::Error>
where
  S: WorkoutStore + ?Sized,
  S::Error: From<Error>,
{
  let mut rows = Vec::with_capacity(inputs.len());

  for input in inputs {
    let wod = store
      .get_wod(input.wod_id)
      .await?
      .ok_or(Error::WodNotFound(input.wod_id))?;
    score::expect_score_type(&wod.score_type, &input.score)
      .map_err(Error::Score)?;

    rows.push(WodPerformance {
      performance_id: Uuid::new_v4(),
      workout_id,
      wod_id: input.wod_id,
      score: input.score.clone(),
      is_pr: false,
    });
  }

  Ok(rows)
}
