//! Workout templates — reusable, ordered plans.
//!
//! A template defines *what to do*; it never records what happened. Logged
//! instances live in [`crate::workout`].

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One prescribed step of a template, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TemplateEntry {
  /// A movement prescription, with optional set/rep/weight targets.
  Movement {
    movement_id: Uuid,
    sets:        Option<u32>,
    reps:        Option<u32>,
    weight:      Option<f64>,
  },
  /// A reference to a WOD.
  Wod { wod_id: Uuid },
}

/// A reusable named plan. Templates are immutable once created; standard
/// (unowned) templates are also undeletable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutTemplate {
  pub template_id: Uuid,
  pub name:        String,
  pub owner_id:    Option<Uuid>,
  /// Ordered prescriptions.
  pub entries:     Vec<TemplateEntry>,
}

impl WorkoutTemplate {
  pub fn is_standard(&self) -> bool { self.owner_id.is_none() }
}

/// Input to [`crate::store::WorkoutStore::add_template`].
#[derive(Debug, Clone)]
pub struct NewTemplate {
  pub name:     String,
  pub owner_id: Option<Uuid>,
  pub entries:  Vec<TemplateEntry>,
}
