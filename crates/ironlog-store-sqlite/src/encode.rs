//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, dates ISO 8601, UUIDs hyphenated
//! lowercase. Closed enums are short lowercase tokens; the free-form
//! `Other` variants round-trip as their raw text.

use chrono::{DateTime, NaiveDate, Utc};
use ironlog_core::{
  movement::{Movement, MovementCategory},
  score::ScoreFields,
  store::PersistedWodScore,
  template::TemplateEntry,
  wod::{ScoreRegimen, ScoreType, Wod, WodScore},
  workout::{LoggedWorkout, MovementPerformance, WodPerformance},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn decode_opt_uuid(s: Option<&str>) -> Result<Option<Uuid>> {
  s.map(decode_uuid).transpose()
}

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(e.to_string()))
}

// ─── MovementCategory ────────────────────────────────────────────────────────

pub fn encode_movement_category(c: MovementCategory) -> &'static str {
  match c {
    MovementCategory::Weightlifting => "weightlifting",
    MovementCategory::Bodyweight => "bodyweight",
    MovementCategory::Gymnastics => "gymnastics",
    MovementCategory::Cardio => "cardio",
  }
}

pub fn decode_movement_category(s: &str) -> Result<MovementCategory> {
  match s {
    "weightlifting" => Ok(MovementCategory::Weightlifting),
    "bodyweight" => Ok(MovementCategory::Bodyweight),
    "gymnastics" => Ok(MovementCategory::Gymnastics),
    "cardio" => Ok(MovementCategory::Cardio),
    other => {
      Err(Error::Decode(format!("unknown movement category: {other:?}")))
    }
  }
}

// ─── ScoreType / ScoreRegimen ────────────────────────────────────────────────

pub fn encode_score_type(t: &ScoreType) -> String {
  match t {
    ScoreType::Time => "time".to_owned(),
    ScoreType::RoundsReps => "rounds_reps".to_owned(),
    ScoreType::MaxWeight => "max_weight".to_owned(),
    ScoreType::Other(s) => s.clone(),
  }
}

pub fn decode_score_type(s: &str) -> ScoreType {
  match s {
    "time" => ScoreType::Time,
    "rounds_reps" => ScoreType::RoundsReps,
    "max_weight" => ScoreType::MaxWeight,
    other => ScoreType::Other(other.to_owned()),
  }
}

pub fn encode_score_regimen(r: &ScoreRegimen) -> String {
  match r {
    ScoreRegimen::ForTime => "for_time".to_owned(),
    ScoreRegimen::Amrap => "amrap".to_owned(),
    ScoreRegimen::Emom => "emom".to_owned(),
    ScoreRegimen::Tabata => "tabata".to_owned(),
    ScoreRegimen::Strength => "strength".to_owned(),
    ScoreRegimen::Other(s) => s.clone(),
  }
}

pub fn decode_score_regimen(s: &str) -> ScoreRegimen {
  match s {
    "for_time" => ScoreRegimen::ForTime,
    "amrap" => ScoreRegimen::Amrap,
    "emom" => ScoreRegimen::Emom,
    "tabata" => ScoreRegimen::Tabata,
    "strength" => ScoreRegimen::Strength,
    other => ScoreRegimen::Other(other.to_owned()),
  }
}

// ─── Score materialisation ───────────────────────────────────────────────────

/// Build the typed score for a row read back from storage.
///
/// Rows whose persisted fields no longer satisfy their WOD's declared score
/// type surface as `Freeform` — nothing is hidden or coerced on read; the
/// mismatch audit reports such rows.
pub fn score_from_row(declared: &ScoreType, fields: ScoreFields) -> WodScore {
  match fields.clone().into_score(declared) {
    Ok(score) => score,
    Err(_) => WodScore::Freeform(fields),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `movements` row.
pub struct RawMovement {
  pub movement_id: String,
  pub name:        String,
  pub category:    String,
  pub owner_id:    Option<String>,
}

impl RawMovement {
  pub fn into_movement(self) -> Result<Movement> {
    Ok(Movement {
      movement_id: decode_uuid(&self.movement_id)?,
      name:        self.name,
      category:    decode_movement_category(&self.category)?,
      owner_id:    decode_opt_uuid(self.owner_id.as_deref())?,
    })
  }
}

/// Raw strings read directly from a `wods` row.
pub struct RawWod {
  pub wod_id:     String,
  pub name:       String,
  pub source:     Option<String>,
  pub category:   Option<String>,
  pub regimen:    String,
  pub score_type: String,
  pub owner_id:   Option<String>,
}

impl RawWod {
  pub fn into_wod(self) -> Result<Wod> {
    Ok(Wod {
      wod_id:     decode_uuid(&self.wod_id)?,
      name:       self.name,
      source:     self.source,
      category:   self.category,
      regimen:    decode_score_regimen(&self.regimen),
      score_type: decode_score_type(&self.score_type),
      owner_id:   decode_opt_uuid(self.owner_id.as_deref())?,
    })
  }
}

/// Raw `template_entries` row.
pub struct RawTemplateEntry {
  pub movement_id: Option<String>,
  pub wod_id:      Option<String>,
  pub sets:        Option<u32>,
  pub reps:        Option<u32>,
  pub weight:      Option<f64>,
}

impl RawTemplateEntry {
  pub fn into_entry(self) -> Result<TemplateEntry> {
    if let Some(movement_id) = self.movement_id.as_deref() {
      Ok(TemplateEntry::Movement {
        movement_id: decode_uuid(movement_id)?,
        sets:        self.sets,
        reps:        self.reps,
        weight:      self.weight,
      })
    } else if let Some(wod_id) = self.wod_id.as_deref() {
      Ok(TemplateEntry::Wod { wod_id: decode_uuid(wod_id)? })
    } else {
      // Unreachable under the schema CHECK constraint.
      Err(Error::Decode("template entry with no target".to_owned()))
    }
  }
}

/// Raw `workouts` row, without its performance rows.
pub struct RawWorkout {
  pub workout_id:   String,
  pub user_id:      String,
  pub template_id:  Option<String>,
  pub performed_on: String,
  pub notes:        Option<String>,
  pub created_at:   String,
}

impl RawWorkout {
  pub fn into_workout(
    self,
    movements: Vec<MovementPerformance>,
    wods: Vec<WodPerformance>,
  ) -> Result<LoggedWorkout> {
    Ok(LoggedWorkout {
      workout_id:   decode_uuid(&self.workout_id)?,
      user_id:      decode_uuid(&self.user_id)?,
      template_id:  decode_opt_uuid(self.template_id.as_deref())?,
      performed_on: decode_date(&self.performed_on)?,
      notes:        self.notes,
      created_at:   decode_dt(&self.created_at)?,
      movements,
      wods,
    })
  }
}

/// Raw `movement_performances` row.
pub struct RawMovementPerformance {
  pub performance_id: String,
  pub workout_id:     String,
  pub movement_id:    String,
  pub weight:         Option<f64>,
  pub sets:           Option<u32>,
  pub reps:           Option<u32>,
  pub seconds:        Option<u32>,
  pub distance_m:     Option<f64>,
  pub is_pr:          bool,
  pub position:       u32,
}

impl RawMovementPerformance {
  pub fn into_performance(self) -> Result<MovementPerformance> {
    Ok(MovementPerformance {
      performance_id: decode_uuid(&self.performance_id)?,
      workout_id:     decode_uuid(&self.workout_id)?,
      movement_id:    decode_uuid(&self.movement_id)?,
      weight:         self.weight,
      sets:           self.sets,
      reps:           self.reps,
      seconds:        self.seconds,
      distance_m:     self.distance_m,
      is_pr:          self.is_pr,
      position:       self.position,
    })
  }
}

/// Raw `wod_performances` row joined to its WOD's declared score type.
pub struct RawWodPerformance {
  pub performance_id: String,
  pub workout_id:     String,
  pub wod_id:         String,
  pub declared:       String,
  pub seconds:        Option<u32>,
  pub rounds:         Option<u32>,
  pub reps:           Option<u32>,
  pub weight:         Option<f64>,
  pub is_pr:          bool,
}

impl RawWodPerformance {
  pub fn fields(&self) -> ScoreFields {
    ScoreFields {
      seconds: self.seconds,
      rounds:  self.rounds,
      reps:    self.reps,
      weight:  self.weight,
    }
  }

  pub fn into_performance(self) -> Result<WodPerformance> {
    let declared = decode_score_type(&self.declared);
    let fields = self.fields();
    Ok(WodPerformance {
      performance_id: decode_uuid(&self.performance_id)?,
      workout_id:     decode_uuid(&self.workout_id)?,
      wod_id:         decode_uuid(&self.wod_id)?,
      score:          score_from_row(&declared, fields),
      is_pr:          self.is_pr,
    })
  }
}

/// Raw audit row: `wod_performances` joined to `wods` and `workouts`.
pub struct RawPersistedWodScore {
  pub performance_id: String,
  pub wod_id:         String,
  pub wod_name:       String,
  pub user_id:        String,
  pub performed_on:   String,
  pub declared:       String,
  pub seconds:        Option<u32>,
  pub rounds:         Option<u32>,
  pub reps:           Option<u32>,
  pub weight:         Option<f64>,
}

impl RawPersistedWodScore {
  pub fn into_row(self) -> Result<PersistedWodScore> {
    Ok(PersistedWodScore {
      performance_id: decode_uuid(&self.performance_id)?,
      wod_id:         decode_uuid(&self.wod_id)?,
      wod_name:       self.wod_name,
      user_id:        decode_uuid(&self.user_id)?,
      performed_on:   decode_date(&self.performed_on)?,
      declared:       decode_score_type(&self.declared),
      fields:         ScoreFields {
        seconds: self.seconds,
        rounds:  self.rounds,
        reps:    self.reps,
        weight:  self.weight,
      },
    })
  }
}
