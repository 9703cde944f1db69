//! SBAR document assembly: protocol templates mapped over a session's
//! fields and freshly computed scores. Scores are recomputed on every read;
//! the assembled document is the only artifact, never a cached score.

use jiff::Timestamp;
use relevo_core::models::document::{DocumentMetadata, SbarDocument};
use relevo_core::models::session::{SessionStatus, WizardSession};
use relevo_protocols::get_protocol;
use relevo_protocols::steps::ValidationError;
use relevo_scores::ScoreSet;
use uuid::Uuid;

use crate::error::EngineError;

/// Assemble the handoff document for a completed or finalized session.
pub fn assemble(session: &WizardSession, author: &str) -> Result<SbarDocument, EngineError> {
    match session.status {
        SessionStatus::Completed | SessionStatus::Finalized => build(session, author),
        status => Err(EngineError::InvalidTransition {
            operation: "assemble",
            status,
        }),
    }
}

/// Assemble a preview for an in-progress session. Scores that cannot be
/// computed yet render as "not documented" rather than failing.
pub fn preview(session: &WizardSession, author: &str) -> Result<SbarDocument, EngineError> {
    build(session, author)
}

/// Confirm all four sections are non-empty. Used as a completion gate
/// before finalize/export.
pub fn validate(document: &SbarDocument) -> Vec<ValidationError> {
    let sections = &document.sections;
    [
        ("situation", &sections.situation),
        ("background", &sections.background),
        ("assessment", &sections.assessment),
        ("recommendation", &sections.recommendation),
    ]
    .into_iter()
    .filter(|(_, body)| body.trim().is_empty())
    .map(|(name, _)| ValidationError {
        step_id: "document".to_string(),
        field_id: name.to_string(),
        message: format!("{name} section is empty"),
    })
    .collect()
}

fn build(session: &WizardSession, author: &str) -> Result<SbarDocument, EngineError> {
    let protocol = get_protocol(&session.protocol_id)
        .ok_or_else(|| EngineError::UnknownProtocol(session.protocol_id.clone()))?;

    let now = Timestamp::now();
    let fields = session.fields();
    let scores = ScoreSet::new(protocol.compute_scores(&fields, now));
    let sections = protocol.sbar(&fields, &scores);

    Ok(SbarDocument {
        sections,
        metadata: DocumentMetadata {
            timestamp: now,
            author: author.to_string(),
            protocol_id: session.protocol_id.clone(),
            document_id: Uuid::new_v4(),
            version: protocol.version(),
        },
    })
}
