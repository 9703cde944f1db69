//! Stroke calculators: NIHSS, Cincinnati Prehospital Stroke Scale, and the
//! tPA eligibility time window.

use std::collections::BTreeMap;

use crate::error::{ComputationError, require};
use crate::result::{RiskBand, ScoreKind, ScoreResult};

/// The 11 NIHSS items with their ordinal maximums: (id, name, max).
pub const NIHSS_ITEMS: &[(&str, &str, f64)] = &[
    ("loc", "Level of consciousness", 3.0),
    ("gaze", "Best gaze", 2.0),
    ("visual_fields", "Visual fields", 3.0),
    ("facial_palsy", "Facial palsy", 3.0),
    ("motor_arm", "Motor arm", 4.0),
    ("motor_leg", "Motor leg", 4.0),
    ("limb_ataxia", "Limb ataxia", 2.0),
    ("sensory", "Sensory", 2.0),
    ("language", "Best language", 3.0),
    ("dysarthria", "Dysarthria", 2.0),
    ("extinction", "Extinction and inattention", 2.0),
];

/// NIHSS: sum of the 11 ordinal item scores, each bounded by its own scale.
/// Severity bands: ≤ 4 minor, 5–15 moderate, 16–20 moderate-to-severe,
/// > 20 severe.
pub fn nihss(items: &BTreeMap<String, f64>) -> Result<ScoreResult, ComputationError> {
    let mut components = BTreeMap::new();
    let mut raw_value = 0.0;

    for (id, _, max) in NIHSS_ITEMS {
        let value = require(ScoreKind::Nihss, id, items.get(*id).copied())?;
        if !(0.0..=*max).contains(&value) || value.fract() != 0.0 {
            return Err(ComputationError::OutOfRange {
                score: ScoreKind::Nihss,
                component: id.to_string(),
                value,
                min: 0.0,
                max: *max,
            });
        }
        components.insert(id.to_string(), value);
        raw_value += value;
    }

    let risk_band = if raw_value <= 4.0 {
        RiskBand::Minor
    } else if raw_value <= 15.0 {
        RiskBand::Moderate
    } else if raw_value <= 20.0 {
        RiskBand::ModerateToSevere
    } else {
        RiskBand::Severe
    };

    Ok(ScoreResult {
        score: ScoreKind::Nihss,
        raw_value,
        components,
        risk_band,
        derived_flags: BTreeMap::from([("severe_deficit".to_string(), raw_value > 20.0)]),
    })
}

/// Inputs for the Cincinnati Prehospital Stroke Scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct CincinnatiInput {
    pub facial_droop: Option<bool>,
    pub arm_drift: Option<bool>,
    pub abnormal_speech: Option<bool>,
}

/// Cincinnati: positive if any of facial droop, arm drift, or abnormal
/// speech is present. The raw value counts positive findings.
pub fn cincinnati(input: &CincinnatiInput) -> Result<ScoreResult, ComputationError> {
    let findings = [
        (
            "facial_droop",
            require(ScoreKind::Cincinnati, "facial_droop", input.facial_droop)?,
        ),
        (
            "arm_drift",
            require(ScoreKind::Cincinnati, "arm_drift", input.arm_drift)?,
        ),
        (
            "abnormal_speech",
            require(
                ScoreKind::Cincinnati,
                "abnormal_speech",
                input.abnormal_speech,
            )?,
        ),
    ];

    let raw_value = findings.iter().filter(|(_, present)| *present).count() as f64;
    let positive = raw_value > 0.0;

    Ok(ScoreResult {
        score: ScoreKind::Cincinnati,
        raw_value,
        components: findings
            .iter()
            .map(|(id, present)| (id.to_string(), if *present { 1.0 } else { 0.0 }))
            .collect(),
        risk_band: if positive {
            RiskBand::Positive
        } else {
            RiskBand::Negative
        },
        derived_flags: BTreeMap::from([("stroke_suspected".to_string(), positive)]),
    })
}

/// Inputs for the tPA eligibility window.
#[derive(Debug, Clone, Default)]
pub struct TpaInput {
    pub last_known_well: Option<jiff::Timestamp>,
    pub contraindications: Vec<String>,
}

/// Classify the thrombolysis window from last-known-well to `now`:
/// < 3 h within the standard window, 3–4.5 h within the extended window,
/// ≥ 4.5 h outside. Eligibility additionally requires zero documented
/// contraindications. A missing last-known-well time classifies as unknown
/// with eligibility forced false; it is not a computation error.
pub fn tpa_window(input: &TpaInput, now: jiff::Timestamp) -> Result<ScoreResult, ComputationError> {
    let no_contraindications = input.contraindications.is_empty();

    let Some(last_known_well) = input.last_known_well else {
        return Ok(ScoreResult {
            score: ScoreKind::TpaWindow,
            raw_value: 0.0,
            components: BTreeMap::new(),
            risk_band: RiskBand::Unknown,
            derived_flags: BTreeMap::from([("eligible".to_string(), false)]),
        });
    };

    let elapsed_hours = now.duration_since(last_known_well).as_secs_f64() / 3600.0;
    if elapsed_hours < 0.0 {
        return Err(ComputationError::OutOfRange {
            score: ScoreKind::TpaWindow,
            component: "last_known_well".to_string(),
            value: elapsed_hours,
            min: 0.0,
            max: f64::INFINITY,
        });
    }

    let risk_band = if elapsed_hours < 3.0 {
        RiskBand::Within3HourWindow
    } else if elapsed_hours < 4.5 {
        RiskBand::WithinExtendedWindow
    } else {
        RiskBand::OutsideWindow
    };
    let in_window = risk_band != RiskBand::OutsideWindow;

    Ok(ScoreResult {
        score: ScoreKind::TpaWindow,
        raw_value: elapsed_hours,
        components: BTreeMap::from([("elapsed_hours".to_string(), elapsed_hours)]),
        risk_band,
        derived_flags: BTreeMap::from([
            ("eligible".to_string(), in_window && no_contraindications),
            ("extended_window".to_string(), risk_band == RiskBand::WithinExtendedWindow),
        ]),
    })
}
