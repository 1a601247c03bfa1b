//! Seed catalog of standard movements and benchmark WODs.
//!
//! Seeding runs at every open and is idempotent: rows are inserted with
//! `INSERT OR IGNORE`, keyed on the unique name. Standard rows have a NULL
//! owner and are read-only from then on.

use ironlog_core::{
  movement::MovementCategory,
  wod::{ScoreRegimen, ScoreType},
};

use crate::encode::{
  encode_movement_category, encode_score_regimen, encode_score_type,
};

pub const STANDARD_MOVEMENTS: &[(&str, MovementCategory)] = &[
  ("Back Squat", MovementCategory::Weightlifting),
  ("Front Squat", MovementCategory::Weightlifting),
  ("Overhead Squat", MovementCategory::Weightlifting),
  ("Deadlift", MovementCategory::Weightlifting),
  ("Bench Press", MovementCategory::Weightlifting),
  ("Overhead Press", MovementCategory::Weightlifting),
  ("Push Press", MovementCategory::Weightlifting),
  ("Clean", MovementCategory::Weightlifting),
  ("Clean and Jerk", MovementCategory::Weightlifting),
  ("Snatch", MovementCategory::Weightlifting),
  ("Thruster", MovementCategory::Weightlifting),
  ("Pull-up", MovementCategory::Bodyweight),
  ("Push-up", MovementCategory::Bodyweight),
  ("Air Squat", MovementCategory::Bodyweight),
  ("Burpee", MovementCategory::Bodyweight),
  ("Sit-up", MovementCategory::Bodyweight),
  ("Muscle-up", MovementCategory::Gymnastics),
  ("Handstand Push-up", MovementCategory::Gymnastics),
  ("Handstand Walk", MovementCategory::Gymnastics),
  ("Toes-to-Bar", MovementCategory::Gymnastics),
  ("Rope Climb", MovementCategory::Gymnastics),
  ("Run", MovementCategory::Cardio),
  ("Row", MovementCategory::Cardio),
  ("Double-Under", MovementCategory::Cardio),
  ("Assault Bike", MovementCategory::Cardio),
];

/// (name, source, category, regimen, score type)
pub const STANDARD_WODS: &[(
  &str,
  &str,
  &str,
  ScoreRegimen,
  ScoreType,
)] = &[
  ("Fran", "Girls", "couplet", ScoreRegimen::ForTime, ScoreType::Time),
  ("Grace", "Girls", "single-modality", ScoreRegimen::ForTime, ScoreType::Time),
  ("Helen", "Girls", "triplet", ScoreRegimen::ForTime, ScoreType::Time),
  ("Isabel", "Girls", "single-modality", ScoreRegimen::ForTime, ScoreType::Time),
  ("Karen", "Girls", "single-modality", ScoreRegimen::ForTime, ScoreType::Time),
  ("Cindy", "Girls", "triplet", ScoreRegimen::Amrap, ScoreType::RoundsReps),
  ("Mary", "Girls", "triplet", ScoreRegimen::Amrap, ScoreType::RoundsReps),
  ("Chelsea", "Girls", "triplet", ScoreRegimen::Emom, ScoreType::RoundsReps),
  ("Murph", "Heroes", "chipper", ScoreRegimen::ForTime, ScoreType::Time),
  ("DT", "Heroes", "barbell", ScoreRegimen::ForTime, ScoreType::Time),
  (
    "CrossFit Total",
    "Benchmarks",
    "lifting",
    ScoreRegimen::Strength,
    ScoreType::MaxWeight,
  ),
  (
    "1RM Deadlift",
    "Benchmarks",
    "lifting",
    ScoreRegimen::Strength,
    ScoreType::MaxWeight,
  ),
];

/// Insert the standard catalog into an open connection. Safe to re-run.
pub fn seed_standard_catalog(
  conn: &rusqlite::Connection,
) -> rusqlite::Result<()> {
  for (name, category) in STANDARD_MOVEMENTS {
    conn.execute(
      "INSERT OR IGNORE INTO movements (movement_id, name, category, owner_id)
       VALUES (?1, ?2, ?3, NULL)",
      rusqlite::params![
        uuid::Uuid::new_v4().hyphenated().to_string(),
        name,
        encode_movement_category(*category),
      ],
    )?;
  }

  for (name, source, category, regimen, score_type) in STANDARD_WODS {
    conn.execute(
      "INSERT OR IGNORE INTO wods
         (wod_id, name, source, category, regimen, score_type, owner_id)
       VALUES (?1, ?2, ?3, ?4, ?5, ?6, NULL)",
      rusqlite::params![
        uuid::Uuid::new_v4().hyphenated().to_string(),
        name,
        source,
        category,
        encode_score_regimen(regimen),
        encode_score_type(score_type),
      ],
    )?;
  }

  Ok(())
}
