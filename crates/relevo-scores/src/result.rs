use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ComputationError;

/// Identifies one of the supported clinical scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ScoreKind {
    Qsofa,
    Sirs,
    Nihss,
    Heart,
    Cincinnati,
    TpaWindow,
}

impl ScoreKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            ScoreKind::Qsofa => "qSOFA",
            ScoreKind::Sirs => "SIRS",
            ScoreKind::Nihss => "NIHSS",
            ScoreKind::Heart => "HEART",
            ScoreKind::Cincinnati => "Cincinnati Stroke Scale",
            ScoreKind::TpaWindow => "tPA window",
        }
    }
}

/// Risk interpretation attached to a score result. Variants are shared
/// across calculators; each documents the ones it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RiskBand {
    Low,
    Moderate,
    High,
    Positive,
    Negative,
    Minor,
    ModerateToSevere,
    Severe,
    Within3HourWindow,
    WithinExtendedWindow,
    OutsideWindow,
    Unknown,
}

impl RiskBand {
    /// Display label used in assembled documents. Window classifications
    /// are full phrases; templates uppercase the short labels where the
    /// document format calls for it.
    pub fn label(&self) -> &'static str {
        match self {
            RiskBand::Low => "Low",
            RiskBand::Moderate => "Moderate",
            RiskBand::High => "High",
            RiskBand::Positive => "Positive",
            RiskBand::Negative => "Negative",
            RiskBand::Minor => "Minor",
            RiskBand::ModerateToSevere => "Moderate to Severe",
            RiskBand::Severe => "Severe",
            RiskBand::Within3HourWindow => "within 3-hour window",
            RiskBand::WithinExtendedWindow => "within extended 4.5-hour window",
            RiskBand::OutsideWindow => "outside window",
            RiskBand::Unknown => "Unknown",
        }
    }
}

/// One computed score: the raw value, the per-criterion breakdown, the risk
/// band, and any derived boolean flags. A pure derivation of step data,
/// recomputed on read and never persisted as a source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreResult {
    pub score: ScoreKind,
    pub raw_value: f64,
    pub components: BTreeMap<String, f64>,
    pub risk_band: RiskBand,
    pub derived_flags: BTreeMap<String, bool>,
}

impl ScoreResult {
    pub fn flag(&self, name: &str) -> bool {
        self.derived_flags.get(name).copied().unwrap_or(false)
    }
}

/// Outcome of computing every score a protocol advertises. Scores whose
/// inputs were not documented are carried as errors, so the caller chooses
/// between rendering a placeholder and blocking.
#[derive(Debug)]
pub struct ScoreSet {
    outcomes: Vec<Result<ScoreResult, ComputationError>>,
}

impl ScoreSet {
    pub fn new(outcomes: Vec<Result<ScoreResult, ComputationError>>) -> Self {
        ScoreSet { outcomes }
    }

    pub fn get(&self, kind: ScoreKind) -> Option<&ScoreResult> {
        self.outcomes
            .iter()
            .filter_map(|o| o.as_ref().ok())
            .find(|r| r.score == kind)
    }

    pub fn results(&self) -> impl Iterator<Item = &ScoreResult> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }

    pub fn errors(&self) -> impl Iterator<Item = &ComputationError> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|o| o.is_ok())
    }
}
