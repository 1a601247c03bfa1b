//! SQL schema for the ironlog SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS movements (
    movement_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE,
    category    TEXT NOT NULL,   -- 'weightlifting' | 'bodyweight' | 'gymnastics' | 'cardio'
    owner_id    TEXT             -- NULL marks a seeded standard movement
);

CREATE TABLE IF NOT EXISTS wods (
    wod_id     TEXT PRIMARY KEY,
    name       TEXT NOT NULL UNIQUE,
    source     TEXT,
    category   TEXT,
    regimen    TEXT NOT NULL,    -- 'for_time' | 'amrap' | 'emom' | 'tabata' | 'strength' | free-form
    score_type TEXT NOT NULL,    -- 'time' | 'rounds_reps' | 'max_weight' | free-form
    owner_id   TEXT              -- NULL marks a seeded standard WOD
);

CREATE TABLE IF NOT EXISTS templates (
    template_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    owner_id    TEXT
);

CREATE TABLE IF NOT EXISTS template_entries (
    template_id TEXT NOT NULL REFERENCES templates(template_id) ON DELETE CASCADE,
    position    INTEGER NOT NULL,
    movement_id TEXT REFERENCES movements(movement_id),
    wod_id      TEXT REFERENCES wods(wod_id),
    sets        INTEGER,
    reps        INTEGER,
    weight      REAL,
    PRIMARY KEY (template_id, position),
    CHECK ((movement_id IS NULL) != (wod_id IS NULL))
);

CREATE TABLE IF NOT EXISTS workouts (
    workout_id   TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL,
    template_id  TEXT REFERENCES templates(template_id),
    performed_on TEXT NOT NULL,  -- ISO 8601 date
    notes        TEXT,
    created_at   TEXT NOT NULL   -- ISO 8601 UTC; server-assigned
);

-- One log per (user, template, date). Ad-hoc sessions are exempt.
CREATE UNIQUE INDEX IF NOT EXISTS workouts_user_template_date_idx
    ON workouts(user_id, template_id, performed_on)
    WHERE template_id IS NOT NULL;

-- Performance rows live and die with their workout.
CREATE TABLE IF NOT EXISTS movement_performances (
    performance_id TEXT PRIMARY KEY,
    workout_id     TEXT NOT NULL REFERENCES workouts(workout_id) ON DELETE CASCADE,
    movement_id    TEXT NOT NULL REFERENCES movements(movement_id),
    weight         REAL,
    sets           INTEGER,
    reps           INTEGER,
    seconds        INTEGER,
    distance_m     REAL,
    is_pr          INTEGER NOT NULL DEFAULT 0,
    position       INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS wod_performances (
    performance_id TEXT PRIMARY KEY,
    workout_id     TEXT NOT NULL REFERENCES workouts(workout_id) ON DELETE CASCADE,
    wod_id         TEXT NOT NULL REFERENCES wods(wod_id),
    seconds        INTEGER,
    rounds         INTEGER,
    reps           INTEGER,
    weight         REAL,
    is_pr          INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS workouts_user_idx          ON workouts(user_id);
CREATE INDEX IF NOT EXISTS movement_perf_workout_idx  ON movement_performances(workout_id);
CREATE INDEX IF NOT EXISTS movement_perf_movement_idx ON movement_performances(movement_id);
CREATE INDEX IF NOT EXISTS wod_perf_workout_idx       ON wod_performances(workout_id);
CREATE INDEX IF NOT EXISTS wod_perf_wod_idx           ON wod_performances(wod_id);

PRAGMA user_version = 1;
";
