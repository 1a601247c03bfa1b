//! Mismatch audit and repair — batch integrity checks over persisted WOD
//! scores.
//!
//! Detection is advisory and read-only. Repair deletes every violating row;
//! it is destructive and non-reversible. This is the one place a per-row
//! failure is tolerated: a delete that fails is logged and skipped so the
//! rest of the batch completes, which is why `found` and `deleted` can
//! diverge.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{score, score::ScoreViolation, store::WorkoutStore};

/// One persisted WOD performance whose fields do not match its WOD's
/// declared score type, with context for manual review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreMismatch {
  pub performance_id: Uuid,
  pub wod_id:         Uuid,
  pub wod_name:       String,
  pub user_id:        Uuid,
  pub performed_on:   NaiveDate,
  pub violation:      ScoreViolation,
}

/// Result of [`repair_mismatches`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepairSummary {
  /// Mismatched rows found by the detection scan.
  pub found:   usize,
  /// Rows actually deleted; less than `found` if individual deletes failed.
  pub deleted: usize,
}

/// Scan every persisted WOD performance against its declared score type and
/// collect the violations.
pub async fn detect_mismatches<S>(
  store: &S,
) -> Result<Vec<ScoreMismatch>, S::Error>
where
  S: WorkoutStore + ?Sized,
{
  let rows = store.wod_score_rows().await?;

  let mismatches: Vec<ScoreMismatch> = rows
    .into_iter()
    .filter_map(|row| {
      score::validate_fields(&row.declared, &row.fields).err().map(
        |violation| ScoreMismatch {
          performance_id: row.performance_id,
          wod_id: row.wod_id,
          wod_name: row.wod_name,
          user_id: row.user_id,
          performed_on: row.performed_on,
          violation,
        },
      )
    })
    .collect();

  tracing::debug!(count = mismatches.len(), "score mismatch scan complete");
  Ok(mismatches)
}

/// Re-run detection and delete every violating row.
pub async fn repair_mismatches<S>(store: &S) -> Result<RepairSummary, S::Error>
where
  S: WorkoutStore + ?Sized,
{
  let mismatches = detect_mismatches(store).await?;
  let found = mismatches.len();
  let mut deleted = 0;

  for mismatch in mismatches {
    match store.delete_wod_performance(mismatch.performance_id).await {
      Ok(()) => deleted += 1,
      Err(err) => {
        tracing::warn!(
          performance_id = %mismatch.performance_id,
          wod = %mismatch.wod_name,
          error = %err,
          "failed to delete mismatched score row; skipping",
        );
      }
    }
  }

  tracing::debug!(found, deleted, "score mismatch repair complete");
  Ok(RepairSummary { found, deleted })
}
