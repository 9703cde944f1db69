use std::collections::BTreeMap;

use relevo_core::models::session::{SessionStatus, SignatureRequest};
use relevo_engine::{EngineError, WizardEngine};
use relevo_store::{MemoryStore, SessionStore};
use serde_json::{Value, json};
use uuid::Uuid;

fn engine() -> WizardEngine<MemoryStore> {
    WizardEngine::new(MemoryStore::new())
}

fn fields(entries: &[(&str, Value)]) -> BTreeMap<String, Value> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn sepsis_steps() -> Vec<BTreeMap<String, Value>> {
    vec![
        fields(&[
            ("patient_name", json!("Rivera, Ana")),
            ("mrn", json!("483920")),
            ("location", json!("ED Bay 4")),
        ]),
        fields(&[
            ("temperature_c", json!(39.2)),
            ("heart_rate", json!(118.0)),
            ("respiratory_rate", json!(24.0)),
            ("systolic_bp", json!(95.0)),
            ("altered_mentation", json!(true)),
            ("wbc_count", json!(15_000.0)),
        ]),
        fields(&[
            ("suspected_source", json!("urinary")),
            ("allergies", json!([])),
            ("comorbidities", json!(["type 2 diabetes"])),
        ]),
        fields(&[
            ("lactate_drawn", json!(true)),
            ("blood_cultures_drawn", json!(true)),
            ("antibiotics_started", json!(false)),
        ]),
        fields(&[("disposition", json!("icu"))]),
    ]
}

fn incident_steps() -> Vec<BTreeMap<String, Value>> {
    vec![
        fields(&[
            ("occurred_at", json!("2026-03-01T02:30:00Z")),
            ("location", json!("Room 12")),
            ("incident_type", json!("fall")),
            ("description", json!("Patient found on floor beside bed.")),
        ]),
        fields(&[
            ("patient_involved", json!(true)),
            ("patient_name", json!("Okafor, James")),
            ("mrn", json!("771204")),
        ]),
        fields(&[
            ("immediate_actions", json!("Assessed for injury, provider paged.")),
            ("provider_notified", json!(true)),
        ]),
        fields(&[("severity", json!("no_harm"))]),
    ]
}

fn signature() -> SignatureRequest {
    SignatureRequest {
        signer_name: "K. Bailey".to_string(),
        credentials: "RN".to_string(),
        acknowledged: true,
    }
}

#[test]
fn start_fails_for_an_unregistered_protocol() {
    let err = engine().start("tonsillectomy").unwrap_err();
    assert!(matches!(err, EngineError::UnknownProtocol(id) if id == "tonsillectomy"));
}

#[test]
fn start_positions_at_the_first_step_and_autosaves() {
    let engine = engine();
    let session = engine.start("sepsis").unwrap();

    assert_eq!(session.current_step_index, 0);
    assert_eq!(session.status, SessionStatus::Draft);
    assert!(engine.store().load(session.id).unwrap().is_some());
}

#[test]
fn submit_step_advances_and_persists() {
    let engine = engine();
    let mut session = engine.start("sepsis").unwrap();

    engine.submit_step(&mut session, sepsis_steps()[0].clone()).unwrap();

    assert_eq!(session.current_step_index, 1);
    assert_eq!(
        session.step_data["patient"]["patient_name"],
        json!("Rivera, Ana")
    );
    let saved = engine.store().load(session.id).unwrap().unwrap();
    assert_eq!(saved.session, session);
}

#[test]
fn submit_step_failure_leaves_the_session_untouched() {
    let engine = engine();
    let mut session = engine.start("sepsis").unwrap();
    engine.submit_step(&mut session, sepsis_steps()[0].clone()).unwrap();
    let before = session.clone();

    // Heart rate out of range and a required field missing.
    let err = engine
        .submit_step(
            &mut session,
            fields(&[
                ("temperature_c", json!(39.2)),
                ("heart_rate", json!(900.0)),
                ("respiratory_rate", json!(24.0)),
                ("systolic_bp", json!(95.0)),
            ]),
        )
        .unwrap_err();

    let errors = err.validation_errors().expect("validation failure");
    assert!(errors.iter().any(|e| e.field_id == "heart_rate"));
    assert!(errors.iter().any(|e| e.field_id == "altered_mentation"));
    assert_eq!(session, before);
}

#[test]
fn previous_step_keeps_entered_data_and_stops_at_zero() {
    let engine = engine();
    let mut session = engine.start("sepsis").unwrap();
    engine.submit_step(&mut session, sepsis_steps()[0].clone()).unwrap();

    engine.previous_step(&mut session).unwrap();
    assert_eq!(session.current_step_index, 0);
    assert!(session.step_data.contains_key("patient"));

    engine.previous_step(&mut session).unwrap();
    assert_eq!(session.current_step_index, 0);
}

#[test]
fn revisited_step_merges_resubmitted_fields() {
    let engine = engine();
    let mut session = engine.start("sepsis").unwrap();
    engine.submit_step(&mut session, sepsis_steps()[0].clone()).unwrap();
    engine.previous_step(&mut session).unwrap();

    // Resubmit only the location; name and MRN survive the merge.
    engine
        .submit_step(&mut session, fields(&[("location", json!("ICU 2"))]))
        .unwrap();

    assert_eq!(session.step_data["patient"]["location"], json!("ICU 2"));
    assert_eq!(session.step_data["patient"]["mrn"], json!("483920"));
}

#[test]
fn complete_requires_every_step_submitted() {
    let engine = engine();
    let mut session = engine.start("sepsis").unwrap();
    engine.submit_step(&mut session, sepsis_steps()[0].clone()).unwrap();

    let err = engine.complete(&mut session).unwrap_err();
    assert!(matches!(err, EngineError::IncompleteSession { remaining: 4 }));
}

#[test]
fn complete_transitions_a_fully_submitted_session() {
    let engine = engine();
    let mut session = engine.start("sepsis").unwrap();
    for step in sepsis_steps() {
        engine.submit_step(&mut session, step).unwrap();
    }

    engine.complete(&mut session).unwrap();
    assert_eq!(session.status, SessionStatus::Completed);
}

#[test]
fn complete_revalidates_steps_corrupted_out_of_band() {
    let engine = engine();
    let mut session = engine.start("sepsis").unwrap();
    for step in sepsis_steps() {
        engine.submit_step(&mut session, step).unwrap();
    }

    // Simulate a draft damaged outside the engine: a required field from an
    // already-passed step goes missing.
    session
        .step_data
        .get_mut("vitals")
        .unwrap()
        .remove("systolic_bp");

    let err = engine.complete(&mut session).unwrap_err();
    let errors = err.validation_errors().expect("validation failure");
    assert!(errors.iter().any(|e| e.field_id == "systolic_bp"));
    assert_eq!(session.status, SessionStatus::Draft);
}

#[test]
fn cancel_clears_the_draft() {
    let engine = engine();
    let mut session = engine.start("sepsis").unwrap();
    engine.submit_step(&mut session, sepsis_steps()[0].clone()).unwrap();

    engine.cancel(&mut session).unwrap();
    assert_eq!(session.status, SessionStatus::Cancelled);
    assert!(engine.store().load(session.id).unwrap().is_none());

    let err = engine.cancel(&mut session).unwrap_err();
    assert!(matches!(err, EngineError::InvalidTransition { .. }));
}

#[test]
fn finalize_is_rejected_for_protocols_without_sign_off() {
    let engine = engine();
    let mut session = engine.start("sepsis").unwrap();
    for step in sepsis_steps() {
        engine.submit_step(&mut session, step).unwrap();
    }
    engine.complete(&mut session).unwrap();

    let err = engine.finalize(&mut session, signature()).unwrap_err();
    assert!(matches!(err, EngineError::SignatureNotSupported(_)));
}

#[test]
fn finalize_requires_a_complete_signature() {
    let engine = engine();
    let mut session = engine.start("incident_report").unwrap();
    for step in incident_steps() {
        engine.submit_step(&mut session, step).unwrap();
    }
    engine.complete(&mut session).unwrap();

    let unsigned = SignatureRequest {
        signer_name: "  ".to_string(),
        credentials: "RN".to_string(),
        acknowledged: false,
    };
    let err = engine.finalize(&mut session, unsigned).unwrap_err();
    let errors = err.validation_errors().expect("validation failure");
    assert!(errors.iter().any(|e| e.field_id == "signer_name"));
    assert!(errors.iter().any(|e| e.field_id == "acknowledged"));
    assert_eq!(session.status, SessionStatus::Completed);
}

#[test]
fn finalized_sessions_reject_every_further_mutation() {
    let engine = engine();
    let mut session = engine.start("incident_report").unwrap();
    for step in incident_steps() {
        engine.submit_step(&mut session, step).unwrap();
    }
    engine.complete(&mut session).unwrap();
    engine.finalize(&mut session, signature()).unwrap();

    assert_eq!(session.status, SessionStatus::Finalized);
    assert!(session.signature.is_some());

    let submit = engine
        .submit_step(&mut session, fields(&[("severity", json!("death"))]))
        .unwrap_err();
    assert!(matches!(submit, EngineError::ImmutableDocument { .. }));

    let refinalize = engine.finalize(&mut session, signature()).unwrap_err();
    assert!(matches!(refinalize, EngineError::ImmutableDocument { .. }));

    let cancel = engine.cancel(&mut session).unwrap_err();
    assert!(matches!(cancel, EngineError::ImmutableDocument { .. }));
}

#[test]
fn resume_restores_the_exact_saved_position_and_data() {
    let engine = engine();
    let mut session = engine.start("sepsis").unwrap();
    engine.submit_step(&mut session, sepsis_steps()[0].clone()).unwrap();
    engine.submit_step(&mut session, sepsis_steps()[1].clone()).unwrap();

    let resumed = engine.resume(session.id).unwrap();
    assert_eq!(resumed, session);
    assert_eq!(resumed.current_step_index, 2);
}

#[test]
fn resume_of_an_unknown_session_is_not_found() {
    let err = engine().resume(Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, EngineError::SessionNotFound(_)));
}

#[test]
fn resume_fails_stale_when_the_definition_version_moved() {
    let engine = engine();
    let mut session = engine.start("sepsis").unwrap();
    engine.submit_step(&mut session, sepsis_steps()[0].clone()).unwrap();

    // A draft saved by an older build of the definition.
    session.protocol_version -= 1;
    engine.store().save(&session).unwrap();

    let err = engine.resume(session.id).unwrap_err();
    assert!(matches!(
        err,
        EngineError::StaleDraft { saved_version: 1, current_version: 2, .. }
    ));
}

#[test]
fn resumed_finalized_sessions_stay_read_only() {
    let engine = engine();
    let mut session = engine.start("incident_report").unwrap();
    for step in incident_steps() {
        engine.submit_step(&mut session, step).unwrap();
    }
    engine.complete(&mut session).unwrap();
    engine.finalize(&mut session, signature()).unwrap();

    let mut reloaded = engine.resume(session.id).unwrap();
    assert_eq!(reloaded.status, SessionStatus::Finalized);

    let err = engine
        .submit_step(&mut reloaded, fields(&[("severity", json!("death"))]))
        .unwrap_err();
    assert!(matches!(err, EngineError::ImmutableDocument { .. }));
}
