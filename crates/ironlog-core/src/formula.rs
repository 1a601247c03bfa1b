//! One-rep-max estimation formulas and derived percentage utilities.
//!
//! Everything here is pure and deterministic. Degenerate inputs (zero or
//! negative weight, zero reps) yield a zero estimate with no formula tag —
//! "not applicable" rather than an error.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator as _};

/// A named 1RM estimation formula.
///
/// The set is closed and iterable; there is no runtime registry.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
  /// `reps == 1`: the lift itself is the 1RM, no estimation involved.
  Actual,
  Epley,
  Brzycki,
  Lombardi,
  Mayhew,
  #[strum(serialize = "O'Conner")]
  #[serde(rename = "o_conner")]
  OConner,
  Wathan,
}

/// Brzycki's denominator `37 - reps` is non-positive from 37 reps on.
const BRZYCKI_MAX_REPS: u32 = 36;

impl Formula {
  /// Apply this formula to a positive `(weight, reps)` pair.
  ///
  /// Returns `None` where the formula is undefined: `Actual` for more than
  /// one rep, and Brzycki beyond [`BRZYCKI_MAX_REPS`].
  pub fn apply(self, weight: f64, reps: u32) -> Option<f64> {
    let r = f64::from(reps);
    match self {
      Self::Actual => (reps == 1).then_some(weight),
      Self::Epley => Some(weight * (1.0 + r / 30.0)),
      Self::Brzycki => {
        (reps <= BRZYCKI_MAX_REPS).then(|| weight * 36.0 / (37.0 - r))
      }
      Self::Lombardi => Some(weight * r.powf(0.10)),
      Self::Mayhew => {
        Some(100.0 * weight / (52.2 + 41.9 * (-0.055 * r).exp()))
      }
      Self::OConner => Some(weight * (1.0 + r / 40.0)),
      Self::Wathan => {
        Some(100.0 * weight / (48.8 + 53.8 * (-0.075 * r).exp()))
      }
    }
  }
}

// ─── Hybrid estimate ─────────────────────────────────────────────────────────

/// The result of [`estimate_one_rm`]: an estimate plus the formula that
/// produced it. `formula` is `None` exactly when the input was degenerate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OneRmEstimate {
  pub estimate: f64,
  pub formula:  Option<Formula>,
}

impl OneRmEstimate {
  /// The "not applicable" result for degenerate input.
  pub fn none() -> Self {
    Self { estimate: 0.0, formula: None }
  }
}

/// Estimate a one-rep max from a multi-rep performance.
///
/// Rep-range policy: the actual weight for singles, Epley for 2–10 reps,
/// Wathan for 11 reps and up (Epley drifts high past 10 reps).
pub fn estimate_one_rm(weight: f64, reps: u32) -> OneRmEstimate {
  if weight <= 0.0 || reps == 0 {
    return OneRmEstimate::none();
  }

  let formula = match reps {
    1 => Formula::Actual,
    2..=10 => Formula::Epley,
    _ => Formula::Wathan,
  };

  match formula.apply(weight, reps) {
    Some(estimate) => OneRmEstimate { estimate, formula: Some(formula) },
    None => OneRmEstimate::none(),
  }
}

/// Compute the estimate under every formula that is defined for the input,
/// for side-by-side comparison displays.
///
/// `Actual` appears only for singles; Brzycki drops out at 37+ reps.
/// Degenerate input yields an empty list.
pub fn all_estimates(weight: f64, reps: u32) -> Vec<(Formula, f64)> {
  if weight <= 0.0 || reps == 0 {
    return Vec::new();
  }

  Formula::iter()
    .filter_map(|f| f.apply(weight, reps).map(|e| (f, e)))
    .collect()
}

// ─── Percentage utilities ────────────────────────────────────────────────────

/// Percent change of `current` over `baseline`; `0` when the baseline is not
/// positive.
pub fn percent_improvement(current: f64, baseline: f64) -> f64 {
  if baseline <= 0.0 {
    return 0.0;
  }
  (current - baseline) / baseline * 100.0
}

/// A working weight as a percentage of a 1RM; `0` when the 1RM is not
/// positive.
pub fn intensity_percent(weight: f64, one_rm: f64) -> f64 {
  if one_rm <= 0.0 {
    return 0.0;
  }
  weight / one_rm * 100.0
}
