//! relevo-scores
//!
//! Deterministic clinical score calculators. Pure functions: identical
//! inputs always produce identical results, and an absent required input is
//! a `ComputationError`, never a silent default. Callers decide whether a
//! missing score blocks progression or renders as "not documented".

pub mod cardiac;
pub mod error;
pub mod result;
pub mod sepsis;
pub mod stroke;

pub use error::ComputationError;
pub use result::{RiskBand, ScoreKind, ScoreResult, ScoreSet};
