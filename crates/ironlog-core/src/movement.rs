//! Movement — a named exercise in the catalog.
//!
//! Standard movements are seeded by the store with no owner and are
//! read-only. Custom movements belong to the user who created them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The broad discipline a movement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementCategory {
  Weightlifting,
  Bodyweight,
  Gymnastics,
  Cardio,
}

/// A named exercise. `name` is unique across the whole catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Movement {
  pub movement_id: Uuid,
  pub name:        String,
  pub category:    MovementCategory,
  /// `None` marks a seeded standard movement; those are never mutable.
  pub owner_id:    Option<Uuid>,
}

impl Movement {
  pub fn is_standard(&self) -> bool { self.owner_id.is_none() }
}

/// Input to [`crate::store::WorkoutStore::add_movement`].
/// The id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewMovement {
  pub name:     String,
  pub category: MovementCategory,
  pub owner_id: Option<Uuid>,
}

/// Parameters for [`crate::store::WorkoutStore::list_movements`].
///
/// A closed set of named filters, each with one defined effect — not a
/// free-form key/value map.
#[derive(Debug, Clone)]
pub struct MovementFilter {
  /// Case-insensitive substring match on the movement name.
  pub name_contains:    Option<String>,
  pub category:         Option<MovementCategory>,
  /// Restrict to custom movements owned by this user.
  pub owner_id:         Option<Uuid>,
  /// Whether seeded standard movements are included alongside any
  /// owner-filtered custom ones. Default `true`.
  pub include_standard: bool,
  pub limit:            Option<usize>,
  pub offset:           Option<usize>,
}

impl Default for MovementFilter {
  fn default() -> Self {
    Self {
      name_contains:    None,
      category:         None,
      owner_id:         None,
      include_standard: true,
      limit:            None,
      offset:           None,
    }
  }
}
