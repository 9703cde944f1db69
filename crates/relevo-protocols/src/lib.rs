//! relevo-protocols
//!
//! Data-driven protocol definitions. One generic wizard engine walks these;
//! everything protocol-specific (step lists, field constraints, score
//! wiring, SBAR section templates) is configuration on a `Protocol`
//! implementation, not a new engine type.

pub mod protocols;
pub mod steps;

use jiff::Timestamp;
use relevo_core::models::document::SbarSections;
use relevo_core::models::session::FieldView;
use relevo_scores::{ComputationError, ScoreKind, ScoreResult, ScoreSet};

use steps::StepDefinition;

/// Trait implemented by each assessment protocol.
pub trait Protocol: Send + Sync {
    /// Unique identifier (e.g. "sepsis", "incident_report").
    fn id(&self) -> &str;

    /// Human-readable name shown on assembled documents.
    fn name(&self) -> &str;

    /// Definition version; bumped whenever the step set changes. Drafts
    /// saved against an older version fail resume as stale.
    fn version(&self) -> u32;

    /// Whether completion must be followed by a signed finalization before
    /// the document is legally valid.
    fn requires_signature(&self) -> bool {
        false
    }

    /// The ordered steps of this assessment.
    fn steps(&self) -> &[StepDefinition];

    /// The scores this protocol derives from entered data.
    fn score_kinds(&self) -> &[ScoreKind] {
        &[]
    }

    /// Compute every advertised score from the session's fields. `now` is
    /// passed in so time-window scores stay pure and testable.
    fn compute_scores(
        &self,
        _fields: &FieldView,
        _now: Timestamp,
    ) -> Vec<Result<ScoreResult, ComputationError>> {
        Vec::new()
    }

    /// Deterministic SBAR section templates for this protocol.
    fn sbar(&self, fields: &FieldView, scores: &ScoreSet) -> SbarSections;
}

/// Return all registered protocols.
pub fn all_protocols() -> Vec<Box<dyn Protocol>> {
    vec![
        Box::new(protocols::sepsis::Sepsis),
        Box::new(protocols::stroke::Stroke),
        Box::new(protocols::cardiac::Cardiac),
        Box::new(protocols::code_blue::CodeBlue),
        Box::new(protocols::transfusion::Transfusion),
        Box::new(protocols::incident_report::IncidentReport),
        Box::new(protocols::discharge::Discharge),
        Box::new(protocols::medication_guide::MedicationGuide),
    ]
}

/// Look up a protocol by ID.
pub fn get_protocol(id: &str) -> Option<Box<dyn Protocol>> {
    all_protocols().into_iter().find(|p| p.id() == id)
}
