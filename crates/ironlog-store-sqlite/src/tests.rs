//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{NaiveDate, Utc};
use ironlog_core::{
  Error as CoreError, audit,
  movement::{Movement, MovementCategory, MovementFilter, NewMovement},
  records,
  score::{ScoreField, ScoreFields},
  store::WorkoutStore,
  template::{NewTemplate, TemplateEntry},
  wod::{NewWod, ScoreRegimen, ScoreType, Wod, WodFilter, WodScore},
  workout::{
    LoggedWorkout, NewLoggedWorkout, NewMovementPerformance,
    NewWodPerformance, WorkoutFilter,
  },
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
  NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn standard_movement(s: &SqliteStore, name: &str) -> Movement {
  s.list_movements(MovementFilter {
    name_contains: Some(name.to_owned()),
    ..Default::default()
  })
  .await
  .unwrap()
  .into_iter()
  .find(|m| m.name == name)
  .expect("seeded movement")
}

async fn standard_wod(s: &SqliteStore, name: &str) -> Wod {
  s.list_wods(WodFilter {
    name_contains: Some(name.to_owned()),
    ..Default::default()
  })
  .await
  .unwrap()
  .into_iter()
  .find(|w| w.name == name)
  .expect("seeded WOD")
}

fn lift(movement_id: Uuid, weight: f64) -> NewMovementPerformance {
  NewMovementPerformance {
    movement_id,
    weight: Some(weight),
    sets: Some(5),
    reps: Some(5),
    seconds: None,
    distance_m: None,
  }
}

fn session(
  user_id: Uuid,
  performed_on: NaiveDate,
  movements: Vec<NewMovementPerformance>,
  wods: Vec<NewWodPerformance>,
) -> NewLoggedWorkout {
  NewLoggedWorkout {
    user_id,
    template_id: None,
    performed_on,
    notes: None,
    movements,
    wods,
  }
}

// ─── Catalog: movements ──────────────────────────────────────────────────────

#[tokio::test]
async fn standard_movements_are_seeded() {
  let s = store().await;

  let all = s.list_movements(MovementFilter::default()).await.unwrap();
  assert!(all.len() >= 25);
  assert!(all.iter().all(Movement::is_standard));

  let deadlift = standard_movement(&s, "Deadlift").await;
  assert_eq!(deadlift.category, MovementCategory::Weightlifting);
}

#[tokio::test]
async fn seeding_is_idempotent_across_reopens() {
  let dir = std::env::temp_dir().join(format!("ironlog-{}", Uuid::new_v4()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("log.db");

  let before = {
    let s = SqliteStore::open(&path).await.unwrap();
    s.list_movements(MovementFilter::default()).await.unwrap().len()
  };
  let after = {
    let s = SqliteStore::open(&path).await.unwrap();
    s.list_movements(MovementFilter::default()).await.unwrap().len()
  };
  assert_eq!(before, after);
}

#[tokio::test]
async fn add_and_get_custom_movement() {
  let s = store().await;
  let user = Uuid::new_v4();

  let movement = s
    .add_movement(NewMovement {
      name:     "Zercher Squat".into(),
      category: MovementCategory::Weightlifting,
      owner_id: Some(user),
    })
    .await
    .unwrap();
  assert!(!movement.is_standard());

  let fetched = s.get_movement(movement.movement_id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Zercher Squat");
  assert_eq!(fetched.owner_id, Some(user));
}

#[tokio::test]
async fn get_movement_missing_returns_none() {
  let s = store().await;
  assert!(s.get_movement(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn list_movements_filters_compose() {
  let s = store().await;
  let user = Uuid::new_v4();
  s.add_movement(NewMovement {
    name:     "Safety Bar Squat".into(),
    category: MovementCategory::Weightlifting,
    owner_id: Some(user),
  })
  .await
  .unwrap();

  // Custom-only listing for the owner.
  let custom = s
    .list_movements(MovementFilter {
      owner_id: Some(user),
      include_standard: false,
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(custom.len(), 1);
  assert_eq!(custom[0].name, "Safety Bar Squat");

  // Owner listing with standard included sees both.
  let combined = s
    .list_movements(MovementFilter {
      owner_id: Some(user),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(combined.len() > 1);

  // Category filter excludes the cardio seeds.
  let cardio = s
    .list_movements(MovementFilter {
      category: Some(MovementCategory::Cardio),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(!cardio.is_empty());
  assert!(cardio.iter().all(|m| m.category == MovementCategory::Cardio));
}

#[tokio::test]
async fn standard_movement_is_read_only() {
  let s = store().await;
  let deadlift = standard_movement(&s, "Deadlift").await;

  let err = s
    .delete_movement(deadlift.movement_id, Uuid::new_v4())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::ReadOnly { .. })));
}

#[tokio::test]
async fn custom_movement_delete_checks_owner() {
  let s = store().await;
  let owner = Uuid::new_v4();
  let movement = s
    .add_movement(NewMovement {
      name:     "Jefferson Curl".into(),
      category: MovementCategory::Gymnastics,
      owner_id: Some(owner),
    })
    .await
    .unwrap();

  let err = s
    .delete_movement(movement.movement_id, Uuid::new_v4())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::NotOwner { .. })));

  s.delete_movement(movement.movement_id, owner).await.unwrap();
  assert!(s.get_movement(movement.movement_id).await.unwrap().is_none());

  let err = s.delete_movement(movement.movement_id, owner).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::MovementNotFound(_))));
}

// ─── Catalog: WODs ───────────────────────────────────────────────────────────

#[tokio::test]
async fn seeded_wods_carry_their_score_types() {
  let s = store().await;

  let fran = standard_wod(&s, "Fran").await;
  assert_eq!(fran.score_type, ScoreType::Time);
  assert!(fran.is_standard());

  let cindy = standard_wod(&s, "Cindy").await;
  assert_eq!(cindy.score_type, ScoreType::RoundsReps);
}

#[tokio::test]
async fn add_custom_wod_with_freeform_score_type() {
  let s = store().await;
  let user = Uuid::new_v4();

  let wod = s
    .add_wod(NewWod {
      name:       "Calorie Crusher".into(),
      source:     None,
      category:   None,
      regimen:    ScoreRegimen::Amrap,
      score_type: ScoreType::Other("calories".into()),
      owner_id:   Some(user),
    })
    .await
    .unwrap();

  let fetched = s.get_wod(wod.wod_id).await.unwrap().unwrap();
  assert_eq!(fetched.score_type, ScoreType::Other("calories".into()));
  assert_eq!(fetched.regimen, ScoreRegimen::Amrap);
}

#[tokio::test]
async fn list_wods_by_score_type() {
  let s = store().await;

  let timed = s
    .list_wods(WodFilter {
      score_type: Some(ScoreType::Time),
      ..Default::default()
    })
    .await
    .unwrap();
  assert!(!timed.is_empty());
  assert!(timed.iter().all(|w| w.score_type == ScoreType::Time));
}

#[tokio::test]
async fn standard_wod_is_read_only() {
  let s = store().await;
  let fran = standard_wod(&s, "Fran").await;

  let err = s.delete_wod(fran.wod_id, Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::ReadOnly { .. })));
}

// ─── Templates ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn template_round_trip_preserves_entry_order() {
  let s = store().await;
  let user = Uuid::new_v4();
  let squat = standard_movement(&s, "Back Squat").await;
  let press = standard_movement(&s, "Bench Press").await;
  let fran = standard_wod(&s, "Fran").await;

  let template = s
    .add_template(NewTemplate {
      name:     "Strength + Metcon".into(),
      owner_id: Some(user),
      entries:  vec![
        TemplateEntry::Movement {
          movement_id: squat.movement_id,
          sets:        Some(5),
          reps:        Some(5),
          weight:      Some(225.0),
        },
        TemplateEntry::Movement {
          movement_id: press.movement_id,
          sets:        Some(3),
          reps:        Some(8),
          weight:      None,
        },
        TemplateEntry::Wod { wod_id: fran.wod_id },
      ],
    })
    .await
    .unwrap();

  let fetched = s.get_template(template.template_id).await.unwrap().unwrap();
  assert_eq!(fetched.entries.len(), 3);
  assert!(matches!(
    fetched.entries[0],
    TemplateEntry::Movement { movement_id, .. } if movement_id == squat.movement_id
  ));
  assert!(matches!(
    fetched.entries[2],
    TemplateEntry::Wod { wod_id } if wod_id == fran.wod_id
  ));
}

#[tokio::test]
async fn list_templates_scopes_to_owner() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();
  let squat = standard_movement(&s, "Back Squat").await;

  s.add_template(NewTemplate {
    name:     "Alice Day 1".into(),
    owner_id: Some(alice),
    entries:  vec![TemplateEntry::Movement {
      movement_id: squat.movement_id,
      sets:        Some(3),
      reps:        Some(5),
      weight:      None,
    }],
  })
  .await
  .unwrap();

  assert_eq!(s.list_templates(Some(alice)).await.unwrap().len(), 1);
  assert!(s.list_templates(Some(bob)).await.unwrap().is_empty());
  assert!(s.list_templates(None).await.unwrap().is_empty());
}

// ─── Logging and PR detection ────────────────────────────────────────────────

#[tokio::test]
async fn first_weighted_attempt_is_a_pr() {
  let s = store().await;
  let user = Uuid::new_v4();
  let deadlift = standard_movement(&s, "Deadlift").await;

  let workout = records::log_workout(
    &s,
    session(user, date(2026, 1, 5), vec![lift(deadlift.movement_id, 315.0)], vec![]),
  )
  .await
  .unwrap();

  assert!(workout.movements[0].is_pr);
}

#[tokio::test]
async fn heavier_attempt_is_pr_tie_and_lighter_are_not() {
  let s = store().await;
  let user = Uuid::new_v4();
  let deadlift = standard_movement(&s, "Deadlift").await;

  for (day, weight, expect_pr) in
    [(5, 315.0, true), (6, 335.0, true), (7, 335.0, false), (8, 225.0, false)]
  {
    let workout = records::log_workout(
      &s,
      session(user, date(2026, 1, day), vec![lift(deadlift.movement_id, weight)], vec![]),
    )
    .await
    .unwrap();
    assert_eq!(workout.movements[0].is_pr, expect_pr, "day {day}");
  }
}

#[tokio::test]
async fn unweighted_rows_are_never_prs() {
  let s = store().await;
  let user = Uuid::new_v4();
  let run = standard_movement(&s, "Run").await;

  let workout = records::log_workout(
    &s,
    session(
      user,
      date(2026, 1, 5),
      vec![NewMovementPerformance {
        movement_id: run.movement_id,
        weight:      None,
        sets:        None,
        reps:        None,
        seconds:     Some(1500),
        distance_m:  Some(5000.0),
      }],
      vec![],
    ),
  )
  .await
  .unwrap();

  assert!(!workout.movements[0].is_pr);
}

#[tokio::test]
async fn pr_history_is_scoped_per_user() {
  let s = store().await;
  let alice = Uuid::new_v4();
  let bob = Uuid::new_v4();
  let deadlift = standard_movement(&s, "Deadlift").await;

  records::log_workout(
    &s,
    session(alice, date(2026, 1, 5), vec![lift(deadlift.movement_id, 405.0)], vec![]),
  )
  .await
  .unwrap();

  // Bob's lighter first attempt is still Bob's PR.
  let workout = records::log_workout(
    &s,
    session(bob, date(2026, 1, 5), vec![lift(deadlift.movement_id, 225.0)], vec![]),
  )
  .await
  .unwrap();
  assert!(workout.movements[0].is_pr);
}

#[tokio::test]
async fn logging_unknown_movement_is_rejected() {
  let s = store().await;
  let user = Uuid::new_v4();

  let err = records::log_workout(
    &s,
    session(user, date(2026, 1, 5), vec![lift(Uuid::new_v4(), 100.0)], vec![]),
  )
  .await
  .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::MovementNotFound(_))));
}

#[tokio::test]
async fn duplicate_template_log_on_same_date_conflicts() {
  let s = store().await;
  let user = Uuid::new_v4();
  let squat = standard_movement(&s, "Back Squat").await;
  let template = s
    .add_template(NewTemplate {
      name:     "Squat Day".into(),
      owner_id: Some(user),
      entries:  vec![TemplateEntry::Movement {
        movement_id: squat.movement_id,
        sets:        Some(5),
        reps:        Some(5),
        weight:      None,
      }],
    })
    .await
    .unwrap();

  let mut input =
    session(user, date(2026, 2, 1), vec![lift(squat.movement_id, 185.0)], vec![]);
  input.template_id = Some(template.template_id);

  records::log_workout(&s, input.clone()).await.unwrap();

  let err = records::log_workout(&s, input.clone()).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::DuplicateLog { .. })));

  // Same template on another date is fine; so is the same date ad hoc.
  input.performed_on = date(2026, 2, 2);
  records::log_workout(&s, input).await.unwrap();
  records::log_workout(
    &s,
    session(user, date(2026, 2, 1), vec![lift(squat.movement_id, 185.0)], vec![]),
  )
  .await
  .unwrap();
}

// ─── WOD score validation at the write boundary ──────────────────────────────

#[tokio::test]
async fn wod_score_matching_declared_type_is_accepted() {
  let s = store().await;
  let user = Uuid::new_v4();
  let fran = standard_wod(&s, "Fran").await;

  let workout = records::log_workout(
    &s,
    session(
      user,
      date(2026, 1, 5),
      vec![],
      vec![NewWodPerformance {
        wod_id: fran.wod_id,
        score:  WodScore::Time { seconds: 183 },
      }],
    ),
  )
  .await
  .unwrap();

  assert_eq!(workout.wods[0].score, WodScore::Time { seconds: 183 });
  assert!(!workout.wods[0].is_pr);
}

#[tokio::test]
async fn cross_type_wod_score_is_rejected_with_field_detail() {
  let s = store().await;
  let user = Uuid::new_v4();
  let fran = standard_wod(&s, "Fran").await;

  let err = records::log_workout(
    &s,
    session(
      user,
      date(2026, 1, 5),
      vec![],
      vec![NewWodPerformance {
        wod_id: fran.wod_id,
        score:  WodScore::RoundsReps { rounds: 20, reps: Some(7) },
      }],
    ),
  )
  .await
  .unwrap_err();

  let Error::Core(CoreError::Score(violation)) = err else {
    panic!("expected score violation, got {err:?}");
  };
  assert_eq!(violation.expected, ScoreType::Time);
  assert_eq!(violation.missing, vec![ScoreField::Seconds]);
  assert_eq!(violation.forbidden, vec![ScoreField::Rounds]);

  // Nothing was written.
  assert!(
    s.list_workouts(user, WorkoutFilter::default()).await.unwrap().is_empty()
  );
}

#[tokio::test]
async fn freeform_wod_accepts_any_fields() {
  let s = store().await;
  let user = Uuid::new_v4();
  let wod = s
    .add_wod(NewWod {
      name:       "Row Sprints".into(),
      source:     None,
      category:   None,
      regimen:    ScoreRegimen::Other("intervals".into()),
      score_type: ScoreType::Other("calories".into()),
      owner_id:   Some(user),
    })
    .await
    .unwrap();

  let workout = records::log_workout(
    &s,
    session(
      user,
      date(2026, 1, 5),
      vec![],
      vec![NewWodPerformance {
        wod_id: wod.wod_id,
        score:  WodScore::Freeform(ScoreFields {
          seconds: Some(600),
          reps: Some(42),
          ..Default::default()
        }),
      }],
    ),
  )
  .await
  .unwrap();

  let fetched = s.get_workout(workout.workout_id).await.unwrap().unwrap();
  assert!(matches!(fetched.wods[0].score, WodScore::Freeform(_)));
}

// ─── Editing ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_workout_excludes_own_rows_from_prior_max() {
  let s = store().await;
  let user = Uuid::new_v4();
  let deadlift = standard_movement(&s, "Deadlift").await;

  let workout = records::log_workout(
    &s,
    session(user, date(2026, 1, 5), vec![lift(deadlift.movement_id, 315.0)], vec![]),
  )
  .await
  .unwrap();

  // Correcting the only attempt downward still leaves it the best on
  // record, because the workout's own rows are excluded from comparison.
  let updated = records::update_workout(
    &s,
    workout.workout_id,
    user,
    vec![lift(deadlift.movement_id, 305.0)],
    vec![],
  )
  .await
  .unwrap();

  assert_eq!(updated.movements.len(), 1);
  assert_eq!(updated.movements[0].weight, Some(305.0));
  assert!(updated.movements[0].is_pr);

  let fetched = s.get_workout(workout.workout_id).await.unwrap().unwrap();
  assert_eq!(fetched.movements.len(), 1);
  assert_eq!(fetched.movements[0].weight, Some(305.0));
}

#[tokio::test]
async fn update_workout_rejects_non_owner() {
  let s = store().await;
  let user = Uuid::new_v4();
  let deadlift = standard_movement(&s, "Deadlift").await;

  let workout = records::log_workout(
    &s,
    session(user, date(2026, 1, 5), vec![lift(deadlift.movement_id, 315.0)], vec![]),
  )
  .await
  .unwrap();

  let err = records::update_workout(
    &s,
    workout.workout_id,
    Uuid::new_v4(),
    vec![],
    vec![],
  )
  .await
  .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::NotOwner { .. })));
}

#[tokio::test]
async fn update_wod_performance_revalidates_score() {
  let s = store().await;
  let user = Uuid::new_v4();
  let fran = standard_wod(&s, "Fran").await;

  let workout = records::log_workout(
    &s,
    session(
      user,
      date(2026, 1, 5),
      vec![],
      vec![NewWodPerformance {
        wod_id: fran.wod_id,
        score:  WodScore::Time { seconds: 300 },
      }],
    ),
  )
  .await
  .unwrap();
  let performance_id = workout.wods[0].performance_id;

  // A better time persists.
  let updated = records::update_wod_performance(
    &s,
    performance_id,
    WodScore::Time { seconds: 251 },
    user,
  )
  .await
  .unwrap();
  assert_eq!(updated.score, WodScore::Time { seconds: 251 });

  let fetched = s.get_wod_performance(performance_id).await.unwrap().unwrap();
  assert_eq!(fetched.score, WodScore::Time { seconds: 251 });

  // A cross-type edit is rejected, never coerced.
  let err = records::update_wod_performance(
    &s,
    performance_id,
    WodScore::MaxWeight { weight: 225.0 },
    user,
  )
  .await
  .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::Score(_))));

  let err = records::update_wod_performance(
    &s,
    performance_id,
    WodScore::Time { seconds: 240 },
    Uuid::new_v4(),
  )
  .await
  .unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::NotOwner { .. })));
}

// ─── Manual WOD PR flag ──────────────────────────────────────────────────────

#[tokio::test]
async fn wod_pr_flag_is_manual_only() {
  let s = store().await;
  let user = Uuid::new_v4();
  let fran = standard_wod(&s, "Fran").await;

  let workout = records::log_workout(
    &s,
    session(
      user,
      date(2026, 1, 5),
      vec![],
      vec![NewWodPerformance {
        wod_id: fran.wod_id,
        score:  WodScore::Time { seconds: 183 },
      }],
    ),
  )
  .await
  .unwrap();
  let performance_id = workout.wods[0].performance_id;
  assert!(!workout.wods[0].is_pr);

  records::set_wod_pr(&s, performance_id, true).await.unwrap();
  let fetched = s.get_wod_performance(performance_id).await.unwrap().unwrap();
  assert!(fetched.is_pr);

  records::set_wod_pr(&s, performance_id, false).await.unwrap();
  let fetched = s.get_wod_performance(performance_id).await.unwrap().unwrap();
  assert!(!fetched.is_pr);

  let err = records::set_wod_pr(&s, Uuid::new_v4(), true).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::PerformanceNotFound(_))));
}

// ─── Retroactive PR pass ─────────────────────────────────────────────────────

#[tokio::test]
async fn retroflag_reproduces_running_max_walk() {
  let s = store().await;
  let user = Uuid::new_v4();
  let deadlift = standard_movement(&s, "Deadlift").await;

  let mut performance_ids = Vec::new();
  for (day, weight) in [(1, 100.0), (2, 120.0), (3, 110.0), (4, 130.0)] {
    let workout = records::log_workout(
      &s,
      session(user, date(2026, 3, day), vec![lift(deadlift.movement_id, weight)], vec![]),
    )
    .await
    .unwrap();
    performance_ids.push(workout.movements[0].performance_id);
  }

  // Scramble the flags, then recompute.
  for id in &performance_ids {
    s.set_movement_pr_flag(*id, true).await.unwrap();
  }

  let summary = records::retroflag_prs(&s, user).await.unwrap();
  assert_eq!(summary.movement_prs, 3);
  assert_eq!(summary.wod_prs, 0);

  let flagged = flagged_movement_rows(&s, user).await;
  let expected = [true, true, false, true];
  for (id, expect) in performance_ids.iter().zip(expected) {
    assert_eq!(flagged.contains(id), expect, "performance {id}");
  }
}

async fn flagged_movement_rows(s: &SqliteStore, user: Uuid) -> Vec<Uuid> {
  let mut flagged = Vec::new();
  for workout in
    s.list_workouts(user, WorkoutFilter::default()).await.unwrap()
  {
    for row in workout.movements {
      if row.is_pr {
        flagged.push(row.performance_id);
      }
    }
  }
  flagged
}

#[tokio::test]
async fn retroflag_reports_manual_wod_flags_untouched() {
  let s = store().await;
  let user = Uuid::new_v4();
  let fran = standard_wod(&s, "Fran").await;

  let workout = records::log_workout(
    &s,
    session(
      user,
      date(2026, 1, 5),
      vec![],
      vec![NewWodPerformance {
        wod_id: fran.wod_id,
        score:  WodScore::Time { seconds: 183 },
      }],
    ),
  )
  .await
  .unwrap();
  records::set_wod_pr(&s, workout.wods[0].performance_id, true)
    .await
    .unwrap();

  let summary = records::retroflag_prs(&s, user).await.unwrap();
  assert_eq!(summary.wod_prs, 1);

  let fetched = s
    .get_wod_performance(workout.wods[0].performance_id)
    .await
    .unwrap()
    .unwrap();
  assert!(fetched.is_pr);
}

// ─── Mismatch audit and repair ───────────────────────────────────────────────

/// Persist a row whose fields contradict its WOD's declared score type,
/// bypassing the validated logging path. Returns the performance id.
async fn plant_mismatched_row(s: &SqliteStore, user: Uuid) -> Uuid {
  let fran = standard_wod(s, "Fran").await;
  let performance_id = Uuid::new_v4();
  let workout_id = Uuid::new_v4();

  s.create_workout(LoggedWorkout {
    workout_id,
    user_id: user,
    template_id: None,
    performed_on: date(2025, 12, 1),
    notes: None,
    created_at: Utc::now(),
    movements: vec![],
    wods: vec![ironlog_core::workout::WodPerformance {
      performance_id,
      workout_id,
      wod_id: fran.wod_id,
      score: WodScore::Freeform(ScoreFields {
        rounds: Some(20),
        reps: Some(7),
        ..Default::default()
      }),
      is_pr: false,
    }],
  })
  .await
  .unwrap();

  performance_id
}

#[tokio::test]
async fn detect_mismatches_finds_nothing_on_clean_data() {
  let s = store().await;
  let user = Uuid::new_v4();
  let fran = standard_wod(&s, "Fran").await;

  records::log_workout(
    &s,
    session(
      user,
      date(2026, 1, 5),
      vec![],
      vec![NewWodPerformance {
        wod_id: fran.wod_id,
        score:  WodScore::Time { seconds: 183 },
      }],
    ),
  )
  .await
  .unwrap();

  assert!(audit::detect_mismatches(&s).await.unwrap().is_empty());
}

#[tokio::test]
async fn detect_mismatches_reports_violating_rows_with_context() {
  let s = store().await;
  let user = Uuid::new_v4();
  let planted = plant_mismatched_row(&s, user).await;

  let mismatches = audit::detect_mismatches(&s).await.unwrap();
  assert_eq!(mismatches.len(), 1);
  let m = &mismatches[0];
  assert_eq!(m.performance_id, planted);
  assert_eq!(m.wod_name, "Fran");
  assert_eq!(m.user_id, user);
  assert_eq!(m.violation.expected, ScoreType::Time);
  assert_eq!(m.violation.missing, vec![ScoreField::Seconds]);
  assert_eq!(m.violation.forbidden, vec![ScoreField::Rounds, ScoreField::Reps]);
}

#[tokio::test]
async fn mismatched_rows_surface_as_freeform_on_read() {
  let s = store().await;
  let user = Uuid::new_v4();
  let planted = plant_mismatched_row(&s, user).await;

  let fetched = s.get_wod_performance(planted).await.unwrap().unwrap();
  assert!(matches!(fetched.score, WodScore::Freeform(_)));
}

#[tokio::test]
async fn repair_deletes_violating_rows_and_reports_counts() {
  let s = store().await;
  let user = Uuid::new_v4();
  let planted = plant_mismatched_row(&s, user).await;

  let summary = audit::repair_mismatches(&s).await.unwrap();
  assert_eq!(summary.found, 1);
  assert_eq!(summary.deleted, 1);

  assert!(s.get_wod_performance(planted).await.unwrap().is_none());
  assert!(audit::detect_mismatches(&s).await.unwrap().is_empty());

  // A second pass over the now-clean store is a no-op.
  let summary = audit::repair_mismatches(&s).await.unwrap();
  assert_eq!(summary.found, 0);
  assert_eq!(summary.deleted, 0);
}

// ─── Workout listing and deletion ────────────────────────────────────────────

#[tokio::test]
async fn list_workouts_filters_by_date_range() {
  let s = store().await;
  let user = Uuid::new_v4();
  let squat = standard_movement(&s, "Back Squat").await;

  for day in [1, 10, 20] {
    records::log_workout(
      &s,
      session(user, date(2026, 4, day), vec![lift(squat.movement_id, 185.0)], vec![]),
    )
    .await
    .unwrap();
  }

  let all = s.list_workouts(user, WorkoutFilter::default()).await.unwrap();
  assert_eq!(all.len(), 3);
  // Newest first.
  assert_eq!(all[0].performed_on, date(2026, 4, 20));

  let windowed = s
    .list_workouts(user, WorkoutFilter {
      from: Some(date(2026, 4, 5)),
      until: Some(date(2026, 4, 15)),
      ..Default::default()
    })
    .await
    .unwrap();
  assert_eq!(windowed.len(), 1);
  assert_eq!(windowed[0].performed_on, date(2026, 4, 10));
}

#[tokio::test]
async fn delete_workout_cascades_to_performance_rows() {
  let s = store().await;
  let user = Uuid::new_v4();
  let squat = standard_movement(&s, "Back Squat").await;
  let fran = standard_wod(&s, "Fran").await;

  let workout = records::log_workout(
    &s,
    session(
      user,
      date(2026, 1, 5),
      vec![lift(squat.movement_id, 185.0)],
      vec![NewWodPerformance {
        wod_id: fran.wod_id,
        score:  WodScore::Time { seconds: 183 },
      }],
    ),
  )
  .await
  .unwrap();

  let err = s.delete_workout(workout.workout_id, Uuid::new_v4()).await.unwrap_err();
  assert!(matches!(err, Error::Core(CoreError::NotOwner { .. })));

  s.delete_workout(workout.workout_id, user).await.unwrap();
  assert!(s.get_workout(workout.workout_id).await.unwrap().is_none());
  assert!(s.wod_score_rows().await.unwrap().is_empty());
  assert!(
    s.max_weight_for_movement(user, squat.movement_id, None)
      .await
      .unwrap()
      .is_none()
  );
}
