//! Score-type validation — the rule table tying a performance's populated
//! fields to its WOD's declared score type.
//!
//! Exactly one field group must be fully present and the others fully
//! absent. "Missing required" and "forbidden extra" are distinct, separately
//! reported reasons. [`crate::wod::ScoreType::Other`] WODs are free-form and
//! pass unchecked.

use serde::{Deserialize, Serialize};

use crate::wod::{ScoreType, WodScore};

// ─── Raw fields ──────────────────────────────────────────────────────────────

/// The raw nullable shape a WOD performance row has in storage, before the
/// declared score type is applied to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreFields {
  pub seconds: Option<u32>,
  pub rounds:  Option<u32>,
  pub reps:    Option<u32>,
  pub weight:  Option<f64>,
}

impl ScoreFields {
  fn has(&self, field: ScoreField) -> bool {
    match field {
      ScoreField::Seconds => self.seconds.is_some(),
      ScoreField::Rounds => self.rounds.is_some(),
      ScoreField::Reps => self.reps.is_some(),
      ScoreField::Weight => self.weight.is_some(),
    }
  }

  /// Convert to the typed score for `expected`, rejecting any field
  /// combination the rule table disallows.
  pub fn into_score(
    self,
    expected: &ScoreType,
  ) -> Result<WodScore, ScoreViolation> {
    validate_fields(expected, &self)?;

    let score = match expected {
      ScoreType::Time => match self.seconds {
        Some(seconds) => WodScore::Time { seconds },
        None => return Err(ScoreViolation::missing(expected, ScoreField::Seconds)),
      },
      ScoreType::RoundsReps => match self.rounds {
        Some(rounds) => WodScore::RoundsReps { rounds, reps: self.reps },
        None => return Err(ScoreViolation::missing(expected, ScoreField::Rounds)),
      },
      ScoreType::MaxWeight => match self.weight {
        Some(weight) => WodScore::MaxWeight { weight },
        None => return Err(ScoreViolation::missing(expected, ScoreField::Weight)),
      },
      ScoreType::Other(_) => WodScore::Freeform(self),
    };

    Ok(score)
  }
}

// ─── Field names ─────────────────────────────────────────────────────────────

/// The four score columns, named for violation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreField {
  Seconds,
  Rounds,
  Reps,
  Weight,
}

impl std::fmt::Display for ScoreField {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let s = match self {
      Self::Seconds => "time_seconds",
      Self::Rounds => "rounds",
      Self::Reps => "reps",
      Self::Weight => "weight",
    };
    f.write_str(s)
  }
}

// ─── Violation ───────────────────────────────────────────────────────────────

/// A structured validation failure: which required fields are absent and
/// which forbidden fields are present, for the declared score type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreViolation {
  pub expected:  ScoreType,
  pub missing:   Vec<ScoreField>,
  pub forbidden: Vec<ScoreField>,
}

impl ScoreViolation {
  fn missing(expected: &ScoreType, field: ScoreField) -> Self {
    Self {
      expected:  expected.clone(),
      missing:   vec![field],
      forbidden: Vec::new(),
    }
  }
}

impl std::fmt::Display for ScoreViolation {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "score does not match declared type {}", self.expected)?;
    if !self.missing.is_empty() {
      let names: Vec<String> =
        self.missing.iter().map(ToString::to_string).collect();
      write!(f, "; missing required field(s): {}", names.join(", "))?;
    }
    if !self.forbidden.is_empty() {
      let names: Vec<String> =
        self.forbidden.iter().map(ToString::to_string).collect();
      write!(f, "; forbidden field(s) present: {}", names.join(", "))?;
    }
    Ok(())
  }
}

impl std::error::Error for ScoreViolation {}

// ─── Rule table ──────────────────────────────────────────────────────────────

/// Required / forbidden fields per score type.
fn rule(expected: &ScoreType) -> Option<(&'static [ScoreField], &'static [ScoreField])> {
  use ScoreField::{Reps, Rounds, Seconds, Weight};
  match expected {
    ScoreType::Time => Some((&[Seconds], &[Rounds, Reps, Weight])),
    // `reps` is the optional partial-round tail, so it is neither required
    // nor forbidden here.
    ScoreType::RoundsReps => Some((&[Rounds], &[Seconds, Weight])),
    ScoreType::MaxWeight => Some((&[Weight], &[Seconds, Rounds, Reps])),
    ScoreType::Other(_) => None,
  }
}

/// Check raw fields against the declared score type.
///
/// Used defensively before accepting a write, and by the mismatch audit over
/// persisted rows.
pub fn validate_fields(
  expected: &ScoreType,
  fields: &ScoreFields,
) -> Result<(), ScoreViolation> {
  let Some((required, forbidden)) = rule(expected) else {
    // Free-form score types are passed through without validation.
    return Ok(());
  };

  let missing: Vec<ScoreField> = required
    .iter()
    .filter(|f| !fields.has(**f))
    .copied()
    .collect();
  let forbidden: Vec<ScoreField> = forbidden
    .iter()
    .filter(|f| fields.has(**f))
    .copied()
    .collect();

  if missing.is_empty() && forbidden.is_empty() {
    Ok(())
  } else {
    Err(ScoreViolation { expected: expected.clone(), missing, forbidden })
  }
}

/// Check a typed score against a WOD's declared score type.
///
/// The typed variants flatten to exactly their own fields, so this reduces
/// to the same rule table — a `Time` score against a `MaxWeight` WOD reports
/// `weight` missing and `time_seconds` forbidden.
pub fn expect_score_type(
  declared: &ScoreType,
  score: &WodScore,
) -> Result<(), ScoreViolation> {
  validate_fields(declared, &score.fields())
}
