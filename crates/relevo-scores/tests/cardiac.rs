use relevo_scores::cardiac::{HeartInput, heart, mace_estimate};
use relevo_scores::{ComputationError, RiskBand};

fn input(history: f64, ecg: f64, age: f64, risk_factors: f64, troponin: f64) -> HeartInput {
    HeartInput {
        history: Some(history),
        ecg: Some(ecg),
        age: Some(age),
        risk_factors: Some(risk_factors),
        troponin: Some(troponin),
    }
}

#[test]
fn heart_sums_the_five_subscores() {
    let result = heart(&input(2.0, 1.0, 1.0, 2.0, 0.0)).unwrap();
    assert_eq!(result.raw_value, 6.0);
    assert_eq!(result.components.len(), 5);
}

#[test]
fn heart_band_transition_is_strict_at_three_to_four() {
    let three = heart(&input(1.0, 1.0, 1.0, 0.0, 0.0)).unwrap();
    let four = heart(&input(1.0, 1.0, 1.0, 1.0, 0.0)).unwrap();
    assert_eq!(three.risk_band, RiskBand::Low);
    assert_eq!(four.risk_band, RiskBand::Moderate);
}

#[test]
fn heart_seven_and_above_is_high_risk() {
    let six = heart(&input(2.0, 2.0, 2.0, 0.0, 0.0)).unwrap();
    let seven = heart(&input(2.0, 2.0, 2.0, 1.0, 0.0)).unwrap();
    assert_eq!(six.risk_band, RiskBand::Moderate);
    assert_eq!(seven.risk_band, RiskBand::High);
    assert!(seven.flag("high_risk"));
}

#[test]
fn heart_rejects_subscore_outside_zero_to_two() {
    let err = heart(&input(3.0, 0.0, 0.0, 0.0, 0.0)).unwrap_err();
    assert!(matches!(
        err,
        ComputationError::OutOfRange { component, .. } if component == "history"
    ));
}

#[test]
fn heart_missing_subscore_is_an_error() {
    let mut incomplete = input(1.0, 1.0, 1.0, 1.0, 1.0);
    incomplete.troponin = None;
    let err = heart(&incomplete).unwrap_err();
    assert!(matches!(
        err,
        ComputationError::MissingInput { component, .. } if component == "troponin"
    ));
}

#[test]
fn mace_estimates_follow_the_band() {
    assert_eq!(mace_estimate(RiskBand::Low), "~1.7% 6-week MACE");
    assert_eq!(mace_estimate(RiskBand::Moderate), "~16.6% 6-week MACE");
    assert_eq!(mace_estimate(RiskBand::High), "~50-65% 6-week MACE");
}
