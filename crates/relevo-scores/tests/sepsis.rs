use relevo_scores::sepsis::{QsofaInput, SirsInput, qsofa, sirs};
use relevo_scores::{ComputationError, RiskBand};

fn qsofa_input(rr: f64, mentation: bool, sbp: f64) -> QsofaInput {
    QsofaInput {
        respiratory_rate: Some(rr),
        altered_mentation: Some(mentation),
        systolic_bp: Some(sbp),
    }
}

#[test]
fn qsofa_all_three_criteria_is_high_risk() {
    let result = qsofa(&qsofa_input(24.0, true, 95.0)).unwrap();
    assert_eq!(result.raw_value, 3.0);
    assert_eq!(result.risk_band, RiskBand::High);
    assert!(result.flag("sepsis_alert"));
}

#[test]
fn qsofa_raw_value_counts_met_criteria() {
    let result = qsofa(&qsofa_input(18.0, true, 120.0)).unwrap();
    assert_eq!(result.raw_value, 1.0);
    assert_eq!(result.risk_band, RiskBand::Low);
    assert_eq!(result.components["altered_mentation"], 1.0);
    assert_eq!(result.components["respiratory_rate"], 0.0);
}

#[test]
fn qsofa_two_criteria_crosses_into_high_risk() {
    let low = qsofa(&qsofa_input(18.0, true, 120.0)).unwrap();
    let high = qsofa(&qsofa_input(22.0, true, 120.0)).unwrap();
    assert_eq!(low.risk_band, RiskBand::Low);
    assert_eq!(high.risk_band, RiskBand::High);
}

#[test]
fn qsofa_boundaries_are_inclusive() {
    // RR >= 22 and SBP <= 100 both count exactly at the threshold.
    let result = qsofa(&qsofa_input(22.0, false, 100.0)).unwrap();
    assert_eq!(result.raw_value, 2.0);
}

#[test]
fn qsofa_missing_input_is_an_error_not_a_default() {
    let input = QsofaInput {
        respiratory_rate: Some(24.0),
        altered_mentation: None,
        systolic_bp: Some(95.0),
    };
    let err = qsofa(&input).unwrap_err();
    assert!(matches!(
        err,
        ComputationError::MissingInput { component, .. } if component == "altered_mentation"
    ));
}

#[test]
fn qsofa_is_idempotent() {
    let input = qsofa_input(24.0, true, 95.0);
    assert_eq!(qsofa(&input).unwrap(), qsofa(&input).unwrap());
}

fn sirs_input(temp: f64, hr: f64, rr: f64, wbc: f64) -> SirsInput {
    SirsInput {
        temperature_c: Some(temp),
        heart_rate: Some(hr),
        respiratory_rate: Some(rr),
        wbc_count: Some(wbc),
        bands_percent: None,
    }
}

#[test]
fn sirs_two_criteria_is_positive() {
    let result = sirs(&sirs_input(38.5, 95.0, 16.0, 8_000.0)).unwrap();
    assert_eq!(result.raw_value, 2.0);
    assert_eq!(result.risk_band, RiskBand::Positive);
}

#[test]
fn sirs_normal_vitals_are_negative() {
    let result = sirs(&sirs_input(37.0, 80.0, 16.0, 8_000.0)).unwrap();
    assert_eq!(result.raw_value, 0.0);
    assert_eq!(result.risk_band, RiskBand::Negative);
}

#[test]
fn sirs_temperature_band_edges_are_normal() {
    // The criterion is "outside 36-38"; exactly 36 and 38 do not count.
    let at_36 = sirs(&sirs_input(36.0, 80.0, 16.0, 8_000.0)).unwrap();
    let at_38 = sirs(&sirs_input(38.0, 80.0, 16.0, 8_000.0)).unwrap();
    assert_eq!(at_36.components["temperature"], 0.0);
    assert_eq!(at_38.components["temperature"], 0.0);
}

#[test]
fn sirs_bandemia_satisfies_wbc_criterion_with_normal_count() {
    let mut input = sirs_input(37.0, 80.0, 16.0, 8_000.0);
    input.bands_percent = Some(12.0);
    let result = sirs(&input).unwrap();
    assert_eq!(result.components["wbc"], 1.0);
}

#[test]
fn sirs_missing_wbc_is_an_error() {
    let input = SirsInput {
        temperature_c: Some(39.0),
        heart_rate: Some(110.0),
        respiratory_rate: Some(24.0),
        wbc_count: None,
        bands_percent: None,
    };
    let err = sirs(&input).unwrap_err();
    assert!(matches!(
        err,
        ComputationError::MissingInput { component, .. } if component == "wbc_count"
    ));
}
