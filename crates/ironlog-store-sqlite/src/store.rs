//! [`SqliteStore`] — the SQLite implementation of
//! [`WorkoutStore`](ironlog_core::store::WorkoutStore).

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use ironlog_core::{
  Error as CoreError,
  error::EntityKind,
  movement::{Movement, MovementFilter, NewMovement},
  score::ScoreFields,
  store::{HistoryEntry, PersistedWodScore, WorkoutStore},
  template::{NewTemplate, TemplateEntry, WorkoutTemplate},
  wod::{NewWod, Wod, WodFilter},
  workout::{LoggedWorkout, WodPerformance, WorkoutFilter},
};

use crate::{
  Error, Result,
  encode::{
    RawMovement, RawMovementPerformance, RawPersistedWodScore,
    RawTemplateEntry, RawWod, RawWodPerformance, RawWorkout, encode_date,
    encode_dt, encode_movement_category, encode_score_regimen,
    encode_score_type, encode_uuid,
  },
  schema::SCHEMA,
  seed::seed_standard_catalog,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An ironlog store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, run schema initialisation, and
  /// seed the standard catalog.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        seed_standard_catalog(conn)?;
        Ok(())
      })
      .await?;
    tracing::debug!("schema initialised and standard catalog seeded");
    Ok(())
  }

  /// Look up the owner column of a catalog row, apply the standard
  /// read-only and ownership rules, and delete it on success.
  async fn delete_owned(
    &self,
    table: &'static str,
    id_column: &'static str,
    kind: EntityKind,
    id: Uuid,
    requested_by: Uuid,
  ) -> Result<()> {
    let id_str = encode_uuid(id);
    let requester_str = encode_uuid(requested_by);

    let outcome: std::result::Result<(), CoreError> = self
      .conn
      .call(move |conn| {
        let owner: Option<Option<String>> = conn
          .query_row(
            &format!("SELECT owner_id FROM {table} WHERE {id_column} = ?1"),
            rusqlite::params![id_str],
            |row| row.get(0),
          )
          .optional()?;

        let owner = match owner {
          None => {
            return Ok(Err(match kind {
              EntityKind::Movement => CoreError::MovementNotFound(id),
              EntityKind::Wod => CoreError::WodNotFound(id),
              EntityKind::Template => CoreError::TemplateNotFound(id),
              EntityKind::Workout => CoreError::WorkoutNotFound(id),
            }));
          }
          Some(owner) => owner,
        };

        match owner {
          None => Ok(Err(CoreError::ReadOnly { kind, id })),
          Some(o) if o != requester_str => {
            Ok(Err(CoreError::NotOwner { kind, id }))
          }
          Some(_) => {
            conn.execute(
              &format!("DELETE FROM {table} WHERE {id_column} = ?1"),
              rusqlite::params![id_str],
            )?;
            Ok(Ok(()))
          }
        }
      })
      .await?;

    outcome.map_err(Error::Core)
  }
}

// ─── Insert row bundles ──────────────────────────────────────────────────────

/// Pre-encoded `movement_performances` insert values.
struct MovementRowInsert {
  performance_id: String,
  movement_id:    String,
  weight:         Option<f64>,
  sets:           Option<u32>,
  reps:           Option<u32>,
  seconds:        Option<u32>,
  distance_m:     Option<f64>,
  is_pr:          bool,
  position:       u32,
}

/// Pre-encoded `wod_performances` insert values.
struct WodRowInsert {
  performance_id: String,
  wod_id:         String,
  seconds:        Option<u32>,
  rounds:         Option<u32>,
  reps:           Option<u32>,
  weight:         Option<f64>,
  is_pr:          bool,
}

fn movement_inserts(workout: &LoggedWorkout) -> Vec<MovementRowInsert> {
  workout
    .movements
    .iter()
    .map(|mp| MovementRowInsert {
      performance_id: encode_uuid(mp.performance_id),
      movement_id:    encode_uuid(mp.movement_id),
      weight:         mp.weight,
      sets:           mp.sets,
      reps:           mp.reps,
      seconds:        mp.seconds,
      distance_m:     mp.distance_m,
      is_pr:          mp.is_pr,
      position:       mp.position,
    })
    .collect()
}

fn wod_inserts(workout: &LoggedWorkout) -> Vec<WodRowInsert> {
  workout
    .wods
    .iter()
    .map(|wp| {
      let fields = wp.score.fields();
      WodRowInsert {
        performance_id: encode_uuid(wp.performance_id),
        wod_id:         encode_uuid(wp.wod_id),
        seconds:        fields.seconds,
        rounds:         fields.rounds,
        reps:           fields.reps,
        weight:         fields.weight,
        is_pr:          wp.is_pr,
      }
    })
    .collect()
}

fn insert_performance_rows(
  tx: &rusqlite::Transaction<'_>,
  workout_id: &str,
  movements: &[MovementRowInsert],
  wods: &[WodRowInsert],
) -> rusqlite::Result<()> {
  for r in movements {
    tx.execute(
      "INSERT INTO movement_performances (
         performance_id, workout_id, movement_id, weight, sets, reps,
         seconds, distance_m, is_pr, position
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
      rusqlite::params![
        r.performance_id,
        workout_id,
        r.movement_id,
        r.weight,
        r.sets,
        r.reps,
        r.seconds,
        r.distance_m,
        r.is_pr,
        r.position,
      ],
    )?;
  }

  for r in wods {
    tx.execute(
      "INSERT INTO wod_performances (
         performance_id, workout_id, wod_id, seconds, rounds, reps,
         weight, is_pr
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
      rusqlite::params![
        r.performance_id,
        workout_id,
        r.wod_id,
        r.seconds,
        r.rounds,
        r.reps,
        r.weight,
        r.is_pr,
      ],
    )?;
  }

  Ok(())
}

// ─── Row query helpers ───────────────────────────────────────────────────────

fn query_movement_rows(
  conn: &rusqlite::Connection,
  workout_id: &str,
) -> rusqlite::Result<Vec<RawMovementPerformance>> {
  let mut stmt = conn.prepare(
    "SELECT performance_id, workout_id, movement_id, weight, sets, reps,
            seconds, distance_m, is_pr, position
     FROM movement_performances
     WHERE workout_id = ?1
     ORDER BY position",
  )?;
  stmt
    .query_map(rusqlite::params![workout_id], |row| {
      Ok(RawMovementPerformance {
        performance_id: row.get(0)?,
        workout_id:     row.get(1)?,
        movement_id:    row.get(2)?,
        weight:         row.get(3)?,
        sets:           row.get(4)?,
        reps:           row.get(5)?,
        seconds:        row.get(6)?,
        distance_m:     row.get(7)?,
        is_pr:          row.get(8)?,
        position:       row.get(9)?,
      })
    })?
    .collect()
}

fn query_wod_rows(
  conn: &rusqlite::Connection,
  workout_id: &str,
) -> rusqlite::Result<Vec<RawWodPerformance>> {
  let mut stmt = conn.prepare(
    "SELECT wp.performance_id, wp.workout_id, wp.wod_id, wd.score_type,
            wp.seconds, wp.rounds, wp.reps, wp.weight, wp.is_pr
     FROM wod_performances wp
     JOIN wods wd ON wd.wod_id = wp.wod_id
     WHERE wp.workout_id = ?1
     ORDER BY wp.performance_id",
  )?;
  stmt
    .query_map(rusqlite::params![workout_id], |row| {
      Ok(RawWodPerformance {
        performance_id: row.get(0)?,
        workout_id:     row.get(1)?,
        wod_id:         row.get(2)?,
        declared:       row.get(3)?,
        seconds:        row.get(4)?,
        rounds:         row.get(5)?,
        reps:           row.get(6)?,
        weight:         row.get(7)?,
        is_pr:          row.get(8)?,
      })
    })?
    .collect()
}

fn query_template_entries(
  conn: &rusqlite::Connection,
  template_id: &str,
) -> rusqlite::Result<Vec<RawTemplateEntry>> {
  let mut stmt = conn.prepare(
    "SELECT movement_id, wod_id, sets, reps, weight
     FROM template_entries
     WHERE template_id = ?1
     ORDER BY position",
  )?;
  stmt
    .query_map(rusqlite::params![template_id], |row| {
      Ok(RawTemplateEntry {
        movement_id: row.get(0)?,
        wod_id:      row.get(1)?,
        sets:        row.get(2)?,
        reps:        row.get(3)?,
        weight:      row.get(4)?,
      })
    })?
    .collect()
}

fn assemble_workout(
  raw: RawWorkout,
  movements: Vec<RawMovementPerformance>,
  wods: Vec<RawWodPerformance>,
) -> Result<LoggedWorkout> {
  let movements = movements
    .into_iter()
    .map(RawMovementPerformance::into_performance)
    .collect::<Result<Vec<_>>>()?;
  let wods = wods
    .into_iter()
    .map(RawWodPerformance::into_performance)
    .collect::<Result<Vec<_>>>()?;
  raw.into_workout(movements, wods)
}

// ─── WorkoutStore impl ───────────────────────────────────────────────────────

impl WorkoutStore for SqliteStore {
  type Error = Error;

  // ── Movement catalog ──────────────────────────────────────────────────────

  async fn add_movement(&self, input: NewMovement) -> Result<Movement> {
    let movement = Movement {
      movement_id: Uuid::new_v4(),
      name:        input.name,
      category:    input.category,
      owner_id:    input.owner_id,
    };

    let id_str = encode_uuid(movement.movement_id);
    let name = movement.name.clone();
    let category_str = encode_movement_category(movement.category).to_owned();
    let owner_str = movement.owner_id.map(encode_uuid);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO movements (movement_id, name, category, owner_id)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name, category_str, owner_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(movement)
  }

  async fn get_movement(&self, id: Uuid) -> Result<Option<Movement>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawMovement> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT movement_id, name, category, owner_id
               FROM movements WHERE movement_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawMovement {
                  movement_id: row.get(0)?,
                  name:        row.get(1)?,
                  category:    row.get(2)?,
                  owner_id:    row.get(3)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawMovement::into_movement).transpose()
  }

  async fn list_movements(
    &self,
    filter: MovementFilter,
  ) -> Result<Vec<Movement>> {
    let name_pattern = filter.name_contains.as_deref().map(|n| format!("%{n}%"));
    let category_str = filter
      .category
      .map(encode_movement_category)
      .map(str::to_owned);
    let owner_str = filter.owner_id.map(encode_uuid);
    let include_standard = filter.include_standard;
    let limit_val = filter.limit.unwrap_or(100) as i64;
    let offset_val = filter.offset.unwrap_or(0) as i64;

    let raws: Vec<RawMovement> = self
      .conn
      .call(move |conn| {
        let mut conds: Vec<&'static str> = vec![];
        if name_pattern.is_some() {
          conds.push("name LIKE ?1");
        }
        if category_str.is_some() {
          conds.push("category = ?2");
        }
        match (&owner_str, include_standard) {
          (Some(_), true) => conds.push("(owner_id = ?3 OR owner_id IS NULL)"),
          (Some(_), false) => conds.push("owner_id = ?3"),
          (None, true) => {}
          (None, false) => conds.push("owner_id IS NOT NULL"),
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT movement_id, name, category, owner_id
           FROM movements {where_clause}
           ORDER BY name LIMIT ?4 OFFSET ?5"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              name_pattern.as_deref(),
              category_str.as_deref(),
              owner_str.as_deref(),
              limit_val,
              offset_val,
            ],
            |row| {
              Ok(RawMovement {
                movement_id: row.get(0)?,
                name:        row.get(1)?,
                category:    row.get(2)?,
                owner_id:    row.get(3)?,
              })
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMovement::into_movement).collect()
  }

  async fn delete_movement(&self, id: Uuid, requested_by: Uuid) -> Result<()> {
    self
      .delete_owned("movements", "movement_id", EntityKind::Movement, id, requested_by)
      .await
  }

  // ── WOD catalog ───────────────────────────────────────────────────────────

  async fn add_wod(&self, input: NewWod) -> Result<Wod> {
    let wod = Wod {
      wod_id:     Uuid::new_v4(),
      name:       input.name,
      source:     input.source,
      category:   input.category,
      regimen:    input.regimen,
      score_type: input.score_type,
      owner_id:   input.owner_id,
    };

    let id_str = encode_uuid(wod.wod_id);
    let name = wod.name.clone();
    let source = wod.source.clone();
    let category = wod.category.clone();
    let regimen_str = encode_score_regimen(&wod.regimen);
    let score_type_str = encode_score_type(&wod.score_type);
    let owner_str = wod.owner_id.map(encode_uuid);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO wods
             (wod_id, name, source, category, regimen, score_type, owner_id)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            id_str,
            name,
            source,
            category,
            regimen_str,
            score_type_str,
            owner_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(wod)
  }

  async fn get_wod(&self, id: Uuid) -> Result<Option<Wod>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawWod> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT wod_id, name, source, category, regimen, score_type, owner_id
               FROM wods WHERE wod_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawWod {
                  wod_id:     row.get(0)?,
                  name:       row.get(1)?,
                  source:     row.get(2)?,
                  category:   row.get(3)?,
                  regimen:    row.get(4)?,
                  score_type: row.get(5)?,
                  owner_id:   row.get(6)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawWod::into_wod).transpose()
  }

  async fn list_wods(&self, filter: WodFilter) -> Result<Vec<Wod>> {
    let name_pattern = filter.name_contains.as_deref().map(|n| format!("%{n}%"));
    let score_type_str = filter.score_type.as_ref().map(encode_score_type);
    let owner_str = filter.owner_id.map(encode_uuid);
    let include_standard = filter.include_standard;
    let limit_val = filter.limit.unwrap_or(100) as i64;
    let offset_val = filter.offset.unwrap_or(0) as i64;

    let raws: Vec<RawWod> = self
      .conn
      .call(move |conn| {
        let mut conds: Vec<&'static str> = vec![];
        if name_pattern.is_some() {
          conds.push("name LIKE ?1");
        }
        if score_type_str.is_some() {
          conds.push("score_type = ?2");
        }
        match (&owner_str, include_standard) {
          (Some(_), true) => conds.push("(owner_id = ?3 OR owner_id IS NULL)"),
          (Some(_), false) => conds.push("owner_id = ?3"),
          (None, true) => {}
          (None, false) => conds.push("owner_id IS NOT NULL"),
        }

        let where_clause = if conds.is_empty() {
          String::new()
        } else {
          format!("WHERE {}", conds.join(" AND "))
        };

        let sql = format!(
          "SELECT wod_id, name, source, category, regimen, score_type, owner_id
           FROM wods {where_clause}
           ORDER BY name LIMIT ?4 OFFSET ?5"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![
              name_pattern.as_deref(),
              score_type_str.as_deref(),
              owner_str.as_deref(),
              limit_val,
              offset_val,
            ],
            |row| {
              Ok(RawWod {
                wod_id:     row.get(0)?,
                name:       row.get(1)?,
                source:     row.get(2)?,
                category:   row.get(3)?,
                regimen:    row.get(4)?,
                score_type: row.get(5)?,
                owner_id:   row.get(6)?,
              })
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawWod::into_wod).collect()
  }

  async fn delete_wod(&self, id: Uuid, requested_by: Uuid) -> Result<()> {
    self
      .delete_owned("wods", "wod_id", EntityKind::Wod, id, requested_by)
      .await
  }

  // ── Templates ─────────────────────────────────────────────────────────────

  async fn add_template(&self, input: NewTemplate) -> Result<WorkoutTemplate> {
    let template = WorkoutTemplate {
      template_id: Uuid::new_v4(),
      name:        input.name,
      owner_id:    input.owner_id,
      entries:     input.entries,
    };

    let id_str = encode_uuid(template.template_id);
    let name = template.name.clone();
    let owner_str = template.owner_id.map(encode_uuid);

    // (position, movement_id, wod_id, sets, reps, weight)
    type EntryRow =
      (u32, Option<String>, Option<String>, Option<u32>, Option<u32>, Option<f64>);
    let entry_rows: Vec<EntryRow> = template
      .entries
      .iter()
      .enumerate()
      .map(|(position, entry)| match entry {
        TemplateEntry::Movement { movement_id, sets, reps, weight } => (
          position as u32,
          Some(encode_uuid(*movement_id)),
          None,
          *sets,
          *reps,
          *weight,
        ),
        TemplateEntry::Wod { wod_id } => {
          (position as u32, None, Some(encode_uuid(*wod_id)), None, None, None)
        }
      })
      .collect();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO templates (template_id, name, owner_id)
           VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name, owner_str],
        )?;
        for (position, movement_id, wod_id, sets, reps, weight) in &entry_rows {
          tx.execute(
            "INSERT INTO template_entries
               (template_id, position, movement_id, wod_id, sets, reps, weight)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
              id_str, position, movement_id, wod_id, sets, reps, weight
            ],
          )?;
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(template)
  }

  async fn get_template(&self, id: Uuid) -> Result<Option<WorkoutTemplate>> {
    let id_str = encode_uuid(id);

    let raw: Option<(String, Option<String>, Vec<RawTemplateEntry>)> = self
      .conn
      .call(move |conn| {
        let header: Option<(String, Option<String>)> = conn
          .query_row(
            "SELECT name, owner_id FROM templates WHERE template_id = ?1",
            rusqlite::params![id_str],
            |row| Ok((row.get(0)?, row.get(1)?)),
          )
          .optional()?;

        let Some((name, owner_id)) = header else {
          return Ok(None);
        };

        let entries = query_template_entries(conn, &id_str)?;
        Ok(Some((name, owner_id, entries)))
      })
      .await?;

    let Some((name, owner_id, raw_entries)) = raw else {
      return Ok(None);
    };

    let entries = raw_entries
      .into_iter()
      .map(RawTemplateEntry::into_entry)
      .collect::<Result<Vec<_>>>()?;

    Ok(Some(WorkoutTemplate {
      template_id: id,
      name,
      owner_id: owner_id
        .as_deref()
        .map(crate::encode::decode_uuid)
        .transpose()?,
      entries,
    }))
  }

  async fn list_templates(
    &self,
    owner_id: Option<Uuid>,
  ) -> Result<Vec<WorkoutTemplate>> {
    let owner_str = owner_id.map(encode_uuid);

    let raws: Vec<(String, String, Option<String>, Vec<RawTemplateEntry>)> =
      self
        .conn
        .call(move |conn| {
          let sql = match owner_str {
            Some(_) => {
              "SELECT template_id, name, owner_id FROM templates
               WHERE owner_id IS NULL OR owner_id = ?1 ORDER BY name"
            }
            None => {
              "SELECT template_id, name, owner_id FROM templates
               WHERE owner_id IS NULL AND ?1 IS NULL ORDER BY name"
            }
          };

          let mut stmt = conn.prepare(sql)?;
          let headers = stmt
            .query_map(rusqlite::params![owner_str.as_deref()], |row| {
              Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<rusqlite::Result<Vec<(String, String, Option<String>)>>>()?;

          let mut out = Vec::with_capacity(headers.len());
          for (template_id, name, owner) in headers {
            let entries = query_template_entries(conn, &template_id)?;
            out.push((template_id, name, owner, entries));
          }
          Ok(out)
        })
        .await?;

    raws
      .into_iter()
      .map(|(template_id, name, owner, raw_entries)| {
        let entries = raw_entries
          .into_iter()
          .map(RawTemplateEntry::into_entry)
          .collect::<Result<Vec<_>>>()?;
        Ok(WorkoutTemplate {
          template_id: crate::encode::decode_uuid(&template_id)?,
          name,
          owner_id: owner
            .as_deref()
            .map(crate::encode::decode_uuid)
            .transpose()?,
          entries,
        })
      })
      .collect()
  }

  async fn delete_template(&self, id: Uuid, requested_by: Uuid) -> Result<()> {
    self
      .delete_owned("templates", "template_id", EntityKind::Template, id, requested_by)
      .await
  }

  // ── Logged workouts ───────────────────────────────────────────────────────

  async fn create_workout(&self, workout: LoggedWorkout) -> Result<LoggedWorkout> {
    let workout_id_str = encode_uuid(workout.workout_id);
    let user_id_str = encode_uuid(workout.user_id);
    let template_id_str = workout.template_id.map(encode_uuid);
    let date_str = encode_date(workout.performed_on);
    let notes = workout.notes.clone();
    let created_at_str = encode_dt(workout.created_at);

    let movement_rows = movement_inserts(&workout);
    let wod_rows = wod_inserts(&workout);

    let user = workout.user_id;
    let template = workout.template_id;
    let date = workout.performed_on;

    let outcome: std::result::Result<(), CoreError> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        // One log per (user, template, date) — checked inside the same
        // transaction as the insert.
        if let (Some(template_str), Some(template)) =
          (template_id_str.as_deref(), template)
        {
          let duplicate = tx
            .query_row(
              "SELECT 1 FROM workouts
               WHERE user_id = ?1 AND template_id = ?2 AND performed_on = ?3",
              rusqlite::params![user_id_str, template_str, date_str],
              |_| Ok(true),
            )
            .optional()?;
          if duplicate.is_some() {
            return Ok(Err(CoreError::DuplicateLog { user, template, date }));
          }
        }

        tx.execute(
          "INSERT INTO workouts
             (workout_id, user_id, template_id, performed_on, notes, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            workout_id_str,
            user_id_str,
            template_id_str,
            date_str,
            notes,
            created_at_str,
          ],
        )?;

        insert_performance_rows(&tx, &workout_id_str, &movement_rows, &wod_rows)?;

        tx.commit()?;
        Ok(Ok(()))
      })
      .await?;

    outcome.map_err(Error::Core)?;
    Ok(workout)
  }

  async fn get_workout(&self, id: Uuid) -> Result<Option<LoggedWorkout>> {
    let id_str = encode_uuid(id);

    type RawBundle =
      (RawWorkout, Vec<RawMovementPerformance>, Vec<RawWodPerformance>);
    let raw: Option<RawBundle> = self
      .conn
      .call(move |conn| {
        let workout = conn
          .query_row(
            "SELECT workout_id, user_id, template_id, performed_on, notes, created_at
             FROM workouts WHERE workout_id = ?1",
            rusqlite::params![id_str],
            |row| {
              Ok(RawWorkout {
                workout_id:   row.get(0)?,
                user_id:      row.get(1)?,
                template_id:  row.get(2)?,
                performed_on: row.get(3)?,
                notes:        row.get(4)?,
                created_at:   row.get(5)?,
              })
            },
          )
          .optional()?;

        let Some(workout) = workout else {
          return Ok(None);
        };

        let movements = query_movement_rows(conn, &id_str)?;
        let wods = query_wod_rows(conn, &id_str)?;
        Ok(Some((workout, movements, wods)))
      })
      .await?;

    raw
      .map(|(w, movements, wods)| assemble_workout(w, movements, wods))
      .transpose()
  }

  async fn list_workouts(
    &self,
    user_id: Uuid,
    filter: WorkoutFilter,
  ) -> Result<Vec<LoggedWorkout>> {
    let user_str = encode_uuid(user_id);
    let template_str = filter.template_id.map(encode_uuid);
    let from_str = filter.from.map(encode_date);
    let until_str = filter.until.map(encode_date);
    let limit_val = filter.limit.unwrap_or(100) as i64;
    let offset_val = filter.offset.unwrap_or(0) as i64;

    type RawBundle =
      (RawWorkout, Vec<RawMovementPerformance>, Vec<RawWodPerformance>);
    let raws: Vec<RawBundle> = self
      .conn
      .call(move |conn| {
        let mut conds: Vec<&'static str> = vec!["user_id = ?1"];
        if template_str.is_some() {
          conds.push("template_id = ?2");
        }
        if from_str.is_some() {
          conds.push("performed_on >= ?3");
        }
        if until_str.is_some() {
          conds.push("performed_on <= ?4");
        }

        let sql = format!(
          "SELECT workout_id, user_id, template_id, performed_on, notes, created_at
           FROM workouts
           WHERE {}
           ORDER BY performed_on DESC, created_at DESC
           LIMIT ?5 OFFSET ?6",
          conds.join(" AND ")
        );

        let mut stmt = conn.prepare(&sql)?;
        let headers = stmt
          .query_map(
            rusqlite::params![
              user_str,
              template_str.as_deref(),
              from_str.as_deref(),
              until_str.as_deref(),
              limit_val,
              offset_val,
            ],
            |row| {
              Ok(RawWorkout {
                workout_id:   row.get(0)?,
                user_id:      row.get(1)?,
                template_id:  row.get(2)?,
                performed_on: row.get(3)?,
                notes:        row.get(4)?,
                created_at:   row.get(5)?,
              })
            },
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut out = Vec::with_capacity(headers.len());
        for header in headers {
          let movements = query_movement_rows(conn, &header.workout_id)?;
          let wods = query_wod_rows(conn, &header.workout_id)?;
          out.push((header, movements, wods));
        }
        Ok(out)
      })
      .await?;

    raws
      .into_iter()
      .map(|(w, movements, wods)| assemble_workout(w, movements, wods))
      .collect()
  }

  async fn replace_workout_rows(
    &self,
    workout: LoggedWorkout,
  ) -> Result<LoggedWorkout> {
    let workout_id = workout.workout_id;
    let workout_id_str = encode_uuid(workout_id);
    let movement_rows = movement_inserts(&workout);
    let wod_rows = wod_inserts(&workout);

    let outcome: std::result::Result<(), CoreError> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let exists = tx
          .query_row(
            "SELECT 1 FROM workouts WHERE workout_id = ?1",
            rusqlite::params![workout_id_str],
            |_| Ok(true),
          )
          .optional()?;
        if exists.is_none() {
          return Ok(Err(CoreError::WorkoutNotFound(workout_id)));
        }

        tx.execute(
          "DELETE FROM movement_performances WHERE workout_id = ?1",
          rusqlite::params![workout_id_str],
        )?;
        tx.execute(
          "DELETE FROM wod_performances WHERE workout_id = ?1",
          rusqlite::params![workout_id_str],
        )?;

        insert_performance_rows(&tx, &workout_id_str, &movement_rows, &wod_rows)?;

        tx.commit()?;
        Ok(Ok(()))
      })
      .await?;

    outcome.map_err(Error::Core)?;
    Ok(workout)
  }

  async fn delete_workout(&self, id: Uuid, requested_by: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);
    let requester_str = encode_uuid(requested_by);

    let outcome: std::result::Result<(), CoreError> = self
      .conn
      .call(move |conn| {
        let owner: Option<String> = conn
          .query_row(
            "SELECT user_id FROM workouts WHERE workout_id = ?1",
            rusqlite::params![id_str],
            |row| row.get(0),
          )
          .optional()?;

        match owner {
          None => Ok(Err(CoreError::WorkoutNotFound(id))),
          Some(o) if o != requester_str => Ok(Err(CoreError::NotOwner {
            kind: EntityKind::Workout,
            id,
          })),
          Some(_) => {
            // Performance rows go with it via ON DELETE CASCADE.
            conn.execute(
              "DELETE FROM workouts WHERE workout_id = ?1",
              rusqlite::params![id_str],
            )?;
            Ok(Ok(()))
          }
        }
      })
      .await?;

    outcome.map_err(Error::Core)
  }

  // ── Detector reads ────────────────────────────────────────────────────────

  async fn max_weight_for_movement(
    &self,
    user_id: Uuid,
    movement_id: Uuid,
    exclude_workout: Option<Uuid>,
  ) -> Result<Option<f64>> {
    let user_str = encode_uuid(user_id);
    let movement_str = encode_uuid(movement_id);
    let exclude_str = exclude_workout.map(encode_uuid);

    let max: Option<f64> = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT MAX(mp.weight)
           FROM movement_performances mp
           JOIN workouts w ON w.workout_id = mp.workout_id
           WHERE w.user_id = ?1
             AND mp.movement_id = ?2
             AND (?3 IS NULL OR mp.workout_id != ?3)",
          rusqlite::params![user_str, movement_str, exclude_str.as_deref()],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(max)
  }

  async fn movement_history(
    &self,
    user_id: Uuid,
    movement_id: Uuid,
  ) -> Result<Vec<HistoryEntry>> {
    let user_str = encode_uuid(user_id);
    let movement_str = encode_uuid(movement_id);

    let raws: Vec<(String, Option<f64>, String, u32)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT mp.performance_id, mp.weight, w.performed_on, mp.position
           FROM movement_performances mp
           JOIN workouts w ON w.workout_id = mp.workout_id
           WHERE w.user_id = ?1 AND mp.movement_id = ?2
           ORDER BY w.performed_on ASC, w.created_at ASC, mp.position ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str, movement_str], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(performance_id, weight, performed_on, position)| {
        Ok(HistoryEntry {
          performance_id: crate::encode::decode_uuid(&performance_id)?,
          weight,
          performed_on: crate::encode::decode_date(&performed_on)?,
          position,
        })
      })
      .collect()
  }

  async fn logged_movement_ids(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT mp.movement_id
           FROM movement_performances mp
           JOIN workouts w ON w.workout_id = mp.workout_id
           WHERE w.user_id = ?1
           ORDER BY mp.movement_id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.iter().map(|s| crate::encode::decode_uuid(s)).collect()
  }

  async fn flagged_wod_pr_count(&self, user_id: Uuid) -> Result<usize> {
    let user_str = encode_uuid(user_id);

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*)
           FROM wod_performances wp
           JOIN workouts w ON w.workout_id = wp.workout_id
           WHERE w.user_id = ?1 AND wp.is_pr = 1",
          rusqlite::params![user_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    Ok(count as usize)
  }

  // ── Audit surface ─────────────────────────────────────────────────────────

  async fn wod_score_rows(&self) -> Result<Vec<PersistedWodScore>> {
    let raws: Vec<RawPersistedWodScore> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT wp.performance_id, wp.wod_id, wd.name, w.user_id,
                  w.performed_on, wd.score_type,
                  wp.seconds, wp.rounds, wp.reps, wp.weight
           FROM wod_performances wp
           JOIN wods wd ON wd.wod_id = wp.wod_id
           JOIN workouts w ON w.workout_id = wp.workout_id
           ORDER BY w.performed_on ASC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawPersistedWodScore {
              performance_id: row.get(0)?,
              wod_id:         row.get(1)?,
              wod_name:       row.get(2)?,
              user_id:        row.get(3)?,
              performed_on:   row.get(4)?,
              declared:       row.get(5)?,
              seconds:        row.get(6)?,
              rounds:         row.get(7)?,
              reps:           row.get(8)?,
              weight:         row.get(9)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPersistedWodScore::into_row).collect()
  }

  async fn get_wod_performance(&self, id: Uuid) -> Result<Option<WodPerformance>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawWodPerformance> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT wp.performance_id, wp.workout_id, wp.wod_id, wd.score_type,
                      wp.seconds, wp.rounds, wp.reps, wp.weight, wp.is_pr
               FROM wod_performances wp
               JOIN wods wd ON wd.wod_id = wp.wod_id
               WHERE wp.performance_id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawWodPerformance {
                  performance_id: row.get(0)?,
                  workout_id:     row.get(1)?,
                  wod_id:         row.get(2)?,
                  declared:       row.get(3)?,
                  seconds:        row.get(4)?,
                  rounds:         row.get(5)?,
                  reps:           row.get(6)?,
                  weight:         row.get(7)?,
                  is_pr:          row.get(8)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawWodPerformance::into_performance).transpose()
  }

  async fn update_wod_performance_score(
    &self,
    id: Uuid,
    score: ScoreFields,
  ) -> Result<()> {
    let id_str = encode_uuid(id);

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE wod_performances
           SET seconds = ?2, rounds = ?3, reps = ?4, weight = ?5
           WHERE performance_id = ?1",
          rusqlite::params![
            id_str,
            score.seconds,
            score.rounds,
            score.reps,
            score.weight,
          ],
        )?)
      })
      .await?;

    if affected == 0 {
      return Err(Error::Core(CoreError::PerformanceNotFound(id)));
    }
    Ok(())
  }

  async fn delete_wod_performance(&self, id: Uuid) -> Result<()> {
    let id_str = encode_uuid(id);

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM wod_performances WHERE performance_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    if affected == 0 {
      return Err(Error::Core(CoreError::PerformanceNotFound(id)));
    }
    Ok(())
  }

  // ── PR flags ──────────────────────────────────────────────────────────────

  async fn set_movement_pr_flag(&self, id: Uuid, is_pr: bool) -> Result<()> {
    let id_str = encode_uuid(id);

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE movement_performances SET is_pr = ?2 WHERE performance_id = ?1",
          rusqlite::params![id_str, is_pr],
        )?)
      })
      .await?;

    if affected == 0 {
      return Err(Error::Core(CoreError::PerformanceNotFound(id)));
    }
    Ok(())
  }

  async fn set_wod_pr_flag(&self, id: Uuid, is_pr: bool) -> Result<()> {
    let id_str = encode_uuid(id);

    let affected = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE wod_performances SET is_pr = ?2 WHERE performance_id = ?1",
          rusqlite::params![id_str, is_pr],
        )?)
      })
      .await?;

    if affected == 0 {
      return Err(Error::Core(CoreError::PerformanceNotFound(id)));
    }
    Ok(())
  }
}
