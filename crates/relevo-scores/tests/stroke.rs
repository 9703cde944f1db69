use std::collections::BTreeMap;

use jiff::Timestamp;
use relevo_scores::stroke::{
    CincinnatiInput, NIHSS_ITEMS, TpaInput, cincinnati, nihss, tpa_window,
};
use relevo_scores::{ComputationError, RiskBand};

fn nihss_items(values: &[(&str, f64)]) -> BTreeMap<String, f64> {
    let mut items: BTreeMap<String, f64> = NIHSS_ITEMS
        .iter()
        .map(|(id, _, _)| (id.to_string(), 0.0))
        .collect();
    for (id, value) in values {
        items.insert(id.to_string(), *value);
    }
    items
}

#[test]
fn nihss_sums_all_eleven_items() {
    let items = nihss_items(&[("motor_arm", 3.0), ("motor_leg", 2.0), ("language", 1.0)]);
    let result = nihss(&items).unwrap();
    assert_eq!(result.raw_value, 6.0);
    assert_eq!(result.components.len(), 11);
}

#[test]
fn nihss_severity_band_thresholds() {
    let band_for = |spread: &[(&str, f64)]| nihss(&nihss_items(spread)).unwrap().risk_band;

    // Totals 4, 5, 15, 16, 21 across the band boundaries.
    assert_eq!(band_for(&[("motor_arm", 4.0)]), RiskBand::Minor);
    assert_eq!(
        band_for(&[("motor_arm", 4.0), ("gaze", 1.0)]),
        RiskBand::Moderate
    );
    assert_eq!(
        band_for(&[
            ("motor_arm", 4.0),
            ("motor_leg", 4.0),
            ("loc", 3.0),
            ("language", 3.0),
            ("gaze", 1.0),
        ]),
        RiskBand::Moderate
    );
    assert_eq!(
        band_for(&[
            ("motor_arm", 4.0),
            ("motor_leg", 4.0),
            ("loc", 3.0),
            ("language", 3.0),
            ("gaze", 2.0),
        ]),
        RiskBand::ModerateToSevere
    );
    assert_eq!(
        band_for(&[
            ("motor_arm", 4.0),
            ("motor_leg", 4.0),
            ("loc", 3.0),
            ("language", 3.0),
            ("visual_fields", 3.0),
            ("facial_palsy", 3.0),
            ("gaze", 1.0),
        ]),
        RiskBand::Severe
    );
}

#[test]
fn nihss_missing_item_is_an_error() {
    let mut items = nihss_items(&[]);
    items.remove("dysarthria");
    let err = nihss(&items).unwrap_err();
    assert!(matches!(
        err,
        ComputationError::MissingInput { component, .. } if component == "dysarthria"
    ));
}

#[test]
fn nihss_rejects_value_above_item_maximum() {
    // Gaze is scored 0-2; a 3 is a charting error, not a worse deficit.
    let items = nihss_items(&[("gaze", 3.0)]);
    let err = nihss(&items).unwrap_err();
    assert!(matches!(
        err,
        ComputationError::OutOfRange { component, max, .. } if component == "gaze" && max == 2.0
    ));
}

#[test]
fn cincinnati_any_finding_is_positive() {
    let result = cincinnati(&CincinnatiInput {
        facial_droop: Some(false),
        arm_drift: Some(true),
        abnormal_speech: Some(false),
    })
    .unwrap();
    assert_eq!(result.risk_band, RiskBand::Positive);
    assert!(result.flag("stroke_suspected"));
}

#[test]
fn cincinnati_no_findings_is_negative() {
    let result = cincinnati(&CincinnatiInput {
        facial_droop: Some(false),
        arm_drift: Some(false),
        abnormal_speech: Some(false),
    })
    .unwrap();
    assert_eq!(result.risk_band, RiskBand::Negative);
    assert_eq!(result.raw_value, 0.0);
}

fn ts(s: &str) -> Timestamp {
    s.parse().unwrap()
}

#[test]
fn tpa_two_hours_is_within_standard_window() {
    let input = TpaInput {
        last_known_well: Some(ts("2026-03-01T10:00:00Z")),
        contraindications: Vec::new(),
    };
    let result = tpa_window(&input, ts("2026-03-01T12:00:00Z")).unwrap();
    assert_eq!(result.risk_band, RiskBand::Within3HourWindow);
    assert!(result.flag("eligible"));
}

#[test]
fn tpa_four_hours_is_within_extended_window() {
    let input = TpaInput {
        last_known_well: Some(ts("2026-03-01T08:00:00Z")),
        contraindications: Vec::new(),
    };
    let result = tpa_window(&input, ts("2026-03-01T12:00:00Z")).unwrap();
    assert_eq!(result.risk_band, RiskBand::WithinExtendedWindow);
    assert!(result.flag("eligible"));
    assert!(result.flag("extended_window"));
}

#[test]
fn tpa_six_hours_is_outside_window_and_ineligible() {
    let input = TpaInput {
        last_known_well: Some(ts("2026-03-01T06:00:00Z")),
        contraindications: Vec::new(),
    };
    let result = tpa_window(&input, ts("2026-03-01T12:00:00Z")).unwrap();
    assert_eq!(result.risk_band, RiskBand::OutsideWindow);
    assert!(!result.flag("eligible"));
}

#[test]
fn tpa_contraindication_blocks_eligibility_inside_window() {
    let input = TpaInput {
        last_known_well: Some(ts("2026-03-01T10:00:00Z")),
        contraindications: vec!["recent intracranial surgery".to_string()],
    };
    let result = tpa_window(&input, ts("2026-03-01T12:00:00Z")).unwrap();
    assert_eq!(result.risk_band, RiskBand::Within3HourWindow);
    assert!(!result.flag("eligible"));
}

#[test]
fn tpa_missing_last_known_well_is_unknown_and_ineligible() {
    let input = TpaInput {
        last_known_well: None,
        contraindications: Vec::new(),
    };
    let result = tpa_window(&input, ts("2026-03-01T12:00:00Z")).unwrap();
    assert_eq!(result.risk_band, RiskBand::Unknown);
    assert!(!result.flag("eligible"));
}
