//! Sepsis screening calculators: qSOFA and SIRS.

use std::collections::BTreeMap;

use crate::error::{ComputationError, require};
use crate::result::{RiskBand, ScoreKind, ScoreResult};

/// Inputs for the quick SOFA bedside screen.
#[derive(Debug, Clone, Copy, Default)]
pub struct QsofaInput {
    pub respiratory_rate: Option<f64>,
    pub altered_mentation: Option<bool>,
    pub systolic_bp: Option<f64>,
}

/// qSOFA: one point each for respiratory rate ≥ 22/min, altered mentation,
/// and systolic BP ≤ 100 mmHg. A score of 2 or more is high risk.
pub fn qsofa(input: &QsofaInput) -> Result<ScoreResult, ComputationError> {
    let rr = require(ScoreKind::Qsofa, "respiratory_rate", input.respiratory_rate)?;
    let mentation = require(
        ScoreKind::Qsofa,
        "altered_mentation",
        input.altered_mentation,
    )?;
    let sbp = require(ScoreKind::Qsofa, "systolic_bp", input.systolic_bp)?;

    let criteria = [
        ("respiratory_rate", rr >= 22.0),
        ("altered_mentation", mentation),
        ("systolic_bp", sbp <= 100.0),
    ];

    let raw_value = criteria.iter().filter(|(_, met)| *met).count() as f64;
    let risk_band = if raw_value >= 2.0 {
        RiskBand::High
    } else {
        RiskBand::Low
    };

    Ok(ScoreResult {
        score: ScoreKind::Qsofa,
        raw_value,
        components: criterion_points(&criteria),
        risk_band,
        derived_flags: BTreeMap::from([("sepsis_alert".to_string(), raw_value >= 2.0)]),
    })
}

/// Inputs for the SIRS criteria set.
#[derive(Debug, Clone, Copy, Default)]
pub struct SirsInput {
    pub temperature_c: Option<f64>,
    pub heart_rate: Option<f64>,
    pub respiratory_rate: Option<f64>,
    /// White blood cell count in cells/mm³.
    pub wbc_count: Option<f64>,
    /// Immature neutrophil (band) percentage. Optional refinement of the
    /// WBC criterion: when documented, > 10% bands satisfies it even with a
    /// normal count.
    pub bands_percent: Option<f64>,
}

/// SIRS: one point each for temperature outside 36–38 °C, heart rate
/// > 90/min, respiratory rate > 20/min, and WBC outside 4,000–12,000 (or
/// > 10% bands). Two or more criteria is a positive screen.
pub fn sirs(input: &SirsInput) -> Result<ScoreResult, ComputationError> {
    let temp = require(ScoreKind::Sirs, "temperature_c", input.temperature_c)?;
    let hr = require(ScoreKind::Sirs, "heart_rate", input.heart_rate)?;
    let rr = require(ScoreKind::Sirs, "respiratory_rate", input.respiratory_rate)?;
    let wbc = require(ScoreKind::Sirs, "wbc_count", input.wbc_count)?;

    let wbc_abnormal = wbc < 4_000.0
        || wbc > 12_000.0
        || input.bands_percent.is_some_and(|bands| bands > 10.0);

    let criteria = [
        ("temperature", !(36.0..=38.0).contains(&temp)),
        ("heart_rate", hr > 90.0),
        ("respiratory_rate", rr > 20.0),
        ("wbc", wbc_abnormal),
    ];

    let raw_value = criteria.iter().filter(|(_, met)| *met).count() as f64;
    let risk_band = if raw_value >= 2.0 {
        RiskBand::Positive
    } else {
        RiskBand::Negative
    };

    Ok(ScoreResult {
        score: ScoreKind::Sirs,
        raw_value,
        components: criterion_points(&criteria),
        risk_band,
        derived_flags: BTreeMap::from([("sirs_positive".to_string(), raw_value >= 2.0)]),
    })
}

fn criterion_points(criteria: &[(&str, bool)]) -> BTreeMap<String, f64> {
    criteria
        .iter()
        .map(|(id, met)| (id.to_string(), if *met { 1.0 } else { 0.0 }))
        .collect()
}
