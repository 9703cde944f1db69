//! Cardiac risk stratification: the HEART score.

use std::collections::BTreeMap;

use crate::error::{ComputationError, require};
use crate::result::{RiskBand, ScoreKind, ScoreResult};

/// The five HEART subscores, each 0–2.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeartInput {
    pub history: Option<f64>,
    pub ecg: Option<f64>,
    pub age: Option<f64>,
    pub risk_factors: Option<f64>,
    pub troponin: Option<f64>,
}

/// HEART: sum of History, ECG, Age, Risk factors, and Troponin subscores,
/// each in [0, 2]. Bands (inclusive on the lower bound): 0–3 low,
/// 4–6 moderate, 7–10 high.
pub fn heart(input: &HeartInput) -> Result<ScoreResult, ComputationError> {
    let subscores = [
        ("history", require(ScoreKind::Heart, "history", input.history)?),
        ("ecg", require(ScoreKind::Heart, "ecg", input.ecg)?),
        ("age", require(ScoreKind::Heart, "age", input.age)?),
        (
            "risk_factors",
            require(ScoreKind::Heart, "risk_factors", input.risk_factors)?,
        ),
        (
            "troponin",
            require(ScoreKind::Heart, "troponin", input.troponin)?,
        ),
    ];

    let mut components = BTreeMap::new();
    let mut raw_value = 0.0;
    for (id, value) in subscores {
        if !(0.0..=2.0).contains(&value) || value.fract() != 0.0 {
            return Err(ComputationError::OutOfRange {
                score: ScoreKind::Heart,
                component: id.to_string(),
                value,
                min: 0.0,
                max: 2.0,
            });
        }
        components.insert(id.to_string(), value);
        raw_value += value;
    }

    let risk_band = if raw_value <= 3.0 {
        RiskBand::Low
    } else if raw_value <= 6.0 {
        RiskBand::Moderate
    } else {
        RiskBand::High
    };

    Ok(ScoreResult {
        score: ScoreKind::Heart,
        raw_value,
        components,
        risk_band,
        derived_flags: BTreeMap::from([("high_risk".to_string(), raw_value >= 7.0)]),
    })
}

/// Published 6-week MACE estimate for a HEART band, for document prose.
pub fn mace_estimate(band: RiskBand) -> &'static str {
    match band {
        RiskBand::Low => "~1.7% 6-week MACE",
        RiskBand::Moderate => "~16.6% 6-week MACE",
        _ => "~50-65% 6-week MACE",
    }
}
