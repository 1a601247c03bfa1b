//! WOD — a named benchmark workout with a declared scoring dimension.
//!
//! The score type drives everything downstream: which fields a performance
//! may carry ([`crate::score`]), and whether PR flags are automatic or
//! manual ([`crate::records`]).

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::score::ScoreFields;

// ─── Score type ──────────────────────────────────────────────────────────────

/// The single measurement that scores a WOD.
///
/// `Other` is the free-form escape hatch: performances against such WODs are
/// passed through without field validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ScoreType {
  Time,
  RoundsReps,
  MaxWeight,
  Other(String),
}

impl std::fmt::Display for ScoreType {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Time => f.write_str("time"),
      Self::RoundsReps => f.write_str("rounds+reps"),
      Self::MaxWeight => f.write_str("max weight"),
      Self::Other(s) => f.write_str(s),
    }
  }
}

/// How the WOD is run (its clock/rep scheme), independent of how it is
/// scored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ScoreRegimen {
  ForTime,
  Amrap,
  Emom,
  Tabata,
  Strength,
  Other(String),
}

// ─── Wod ─────────────────────────────────────────────────────────────────────

/// A named benchmark workout. `name` is unique across the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wod {
  pub wod_id:     Uuid,
  pub name:       String,
  /// Where the benchmark comes from, e.g. "Girls" or "Heroes".
  pub source:     Option<String>,
  pub category:   Option<String>,
  pub regimen:    ScoreRegimen,
  pub score_type: ScoreType,
  /// `None` marks a seeded standard WOD; those are never mutable.
  pub owner_id:   Option<Uuid>,
}

impl Wod {
  pub fn is_standard(&self) -> bool { self.owner_id.is_none() }
}

/// Input to [`crate::store::WorkoutStore::add_wod`].
#[derive(Debug, Clone)]
pub struct NewWod {
  pub name:       String,
  pub source:     Option<String>,
  pub category:   Option<String>,
  pub regimen:    ScoreRegimen,
  pub score_type: ScoreType,
  pub owner_id:   Option<Uuid>,
}

/// Parameters for [`crate::store::WorkoutStore::list_wods`].
#[derive(Debug, Clone)]
pub struct WodFilter {
  /// Case-insensitive substring match on the WOD name.
  pub name_contains:    Option<String>,
  pub score_type:       Option<ScoreType>,
  /// Restrict to custom WODs owned by this user.
  pub owner_id:         Option<Uuid>,
  /// Whether seeded standard WODs are included. Default `true`.
  pub include_standard: bool,
  pub limit:            Option<usize>,
  pub offset:           Option<usize>,
}

impl Default for WodFilter {
  fn default() -> Self {
    Self {
      name_contains:    None,
      score_type:       None,
      owner_id:         None,
      include_standard: true,
      limit:            None,
      offset:           None,
    }
  }
}

// ─── WodScore ────────────────────────────────────────────────────────────────

/// The recorded score of one WOD attempt.
///
/// The variant carries exactly the fields valid for its score type, so a
/// well-typed score cannot mix dimensions. `Freeform` covers
/// [`ScoreType::Other`] WODs — and, on read, legacy rows whose persisted
/// fields no longer match their WOD's declared type (the mismatch audit
/// reports those).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WodScore {
  Time { seconds: u32 },
  RoundsReps { rounds: u32, reps: Option<u32> },
  MaxWeight { weight: f64 },
  Freeform(ScoreFields),
}

impl WodScore {
  /// The score type this score structurally satisfies, if any.
  pub fn score_type(&self) -> Option<ScoreType> {
    match self {
      Self::Time { .. } => Some(ScoreType::Time),
      Self::RoundsReps { .. } => Some(ScoreType::RoundsReps),
      Self::MaxWeight { .. } => Some(ScoreType::MaxWeight),
      Self::Freeform(_) => None,
    }
  }

  /// Flatten to the raw nullable column shape.
  pub fn fields(&self) -> ScoreFields {
    match self {
      Self::Time { seconds } => ScoreFields {
        seconds: Some(*seconds),
        ..ScoreFields::default()
      },
      Self::RoundsReps { rounds, reps } => ScoreFields {
        rounds: Some(*rounds),
        reps: *reps,
        ..ScoreFields::default()
      },
      Self::MaxWeight { weight } => ScoreFields {
        weight: Some(*weight),
        ..ScoreFields::default()
      },
      Self::Freeform(fields) => fields.clone(),
    }
  }
}
