//! Error types for `ironlog-core`.
//!
//! One variant per category the boundary layer needs to distinguish:
//! rejected input, not-found, unauthorized, conflict. Persistence failures
//! belong to the store implementation's own error type, which wraps this one.

use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::score::ScoreViolation;

/// The entity a `ReadOnly` or `NotOwner` rejection refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
  Movement,
  Wod,
  Template,
  Workout,
}

impl std::fmt::Display for EntityKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      Self::Movement => "movement",
      Self::Wod => "WOD",
      Self::Template => "template",
      Self::Workout => "workout",
    };
    f.write_str(s)
  }
}

#[derive(Debug, Error)]
pub enum Error {
  /// A performance's score fields do not match its WOD's declared score
  /// type. Carries the specific missing/forbidden fields; never corrected
  /// silently.
  #[error("{0}")]
  Score(#[from] ScoreViolation),

  #[error("movement not found: {0}")]
  MovementNotFound(Uuid),

  #[error("WOD not found: {0}")]
  WodNotFound(Uuid),

  #[error("template not found: {0}")]
  TemplateNotFound(Uuid),

  #[error("workout not found: {0}")]
  WorkoutNotFound(Uuid),

  #[error("performance row not found: {0}")]
  PerformanceNotFound(Uuid),

  /// The target is a seeded standard entity; those are never mutable.
  #[error("{kind} {id} is standard and read-only")]
  ReadOnly { kind: EntityKind, id: Uuid },

  /// The target exists but belongs to a different user.
  #[error("{kind} {id} does not belong to the requesting user")]
  NotOwner { kind: EntityKind, id: Uuid },

  /// The same template was already logged by this user on this date.
  #[error("template {template} already logged by user {user} on {date}")]
  DuplicateLog {
    user:     Uuid,
    template: Uuid,
    date:     NaiveDate,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
