//! Core types and trait definitions for the ironlog workout tracker.
//!
//! Everything here is storage- and transport-agnostic: domain entities,
//! the 1RM formulas, score validation, PR detection, and the
//! [`store::WorkoutStore`] trait that backends implement. Persistence
//! lives in the backend crates (e.g. `ironlog-store-sqlite`).

pub mod audit;
pub mod error;
pub mod formula;
pub mod movement;
pub mod records;
pub mod score;
pub mod store;
pub mod template;
pub mod wod;
pub mod workout;

pub use error::{Error, Result};
