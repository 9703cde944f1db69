use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;
use uuid::Uuid;

/// Lifecycle of a wizard session.
///
/// `Cancelled` and `Finalized` are absorbing: no operation transitions out
/// of them, and a `Finalized` session rejects every mutation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SessionStatus {
    Draft,
    Completed,
    Cancelled,
    Finalized,
}

impl SessionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Cancelled | SessionStatus::Finalized)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SessionStatus::Draft => "draft",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
            SessionStatus::Finalized => "finalized",
        }
    }
}

/// Sign-off captured when a legal document (e.g. an incident report) is
/// finalized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Signature {
    pub signer_name: String,
    pub credentials: String,
    pub acknowledged: bool,
    pub signed_at: jiff::Timestamp,
}

/// What a caller supplies to `finalize`; the engine stamps `signed_at`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SignatureRequest {
    pub signer_name: String,
    pub credentials: String,
    pub acknowledged: bool,
}

/// Per-step field data: step id → field id → entered value.
pub type StepData = BTreeMap<String, BTreeMap<String, Value>>;

/// One walk through a protocol's ordered steps.
///
/// The engine is the sole mutator. `protocol_version` is captured at start
/// and checked against the current definition on resume, so a draft saved
/// against a superseded step set surfaces as a stale-draft error instead of
/// being silently remapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WizardSession {
    pub id: Uuid,
    pub protocol_id: String,
    pub protocol_version: u32,
    pub current_step_index: usize,
    pub step_data: StepData,
    pub status: SessionStatus,
    pub signature: Option<Signature>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl WizardSession {
    pub fn fields(&self) -> FieldView<'_> {
        FieldView {
            data: &self.step_data,
        }
    }
}

/// Placeholder rendered for fields that were never documented. Kept explicit
/// in assembled documents so section structure survives for audit.
pub const NOT_DOCUMENTED: &str = "Not documented";

/// How a session's allergy field reads, under the NKDA domain convention:
/// an explicitly recorded empty list means "no known drug allergies", which
/// is a positive clinical statement and must not be conflated with a field
/// the nurse never reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllergyRecord {
    NotDocumented,
    NoKnownAllergies,
    Known(Vec<String>),
}

impl AllergyRecord {
    pub fn display_line(&self) -> String {
        match self {
            AllergyRecord::NotDocumented => NOT_DOCUMENTED.to_string(),
            AllergyRecord::NoKnownAllergies => "NKDA".to_string(),
            AllergyRecord::Known(items) => items.join(", "),
        }
    }
}

/// Read-only typed accessors over a session's entered fields.
///
/// Field ids are unique within a protocol (enforced by definition tests),
/// so lookups search every step. Values that exist but have the wrong shape
/// read as absent; validation has already rejected them on entry.
pub struct FieldView<'a> {
    data: &'a StepData,
}

impl<'a> FieldView<'a> {
    pub fn new(data: &'a StepData) -> Self {
        FieldView { data }
    }

    pub fn value(&self, field_id: &str) -> Option<&'a Value> {
        self.data
            .values()
            .find_map(|step| step.get(field_id))
            .filter(|v| !v.is_null())
    }

    pub fn number(&self, field_id: &str) -> Option<f64> {
        self.value(field_id)?.as_f64()
    }

    pub fn boolean(&self, field_id: &str) -> Option<bool> {
        self.value(field_id)?.as_bool()
    }

    pub fn text(&self, field_id: &str) -> Option<&'a str> {
        self.value(field_id)?.as_str().filter(|s| !s.trim().is_empty())
    }

    pub fn timestamp(&self, field_id: &str) -> Option<jiff::Timestamp> {
        self.value(field_id)?.as_str()?.parse().ok()
    }

    pub fn list(&self, field_id: &str) -> Option<Vec<String>> {
        let items = self.value(field_id)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(str::to_string)
                .collect(),
        )
    }

    /// The entered text, or the audit placeholder.
    pub fn text_or_placeholder(&self, field_id: &str) -> &'a str {
        self.text(field_id).unwrap_or(NOT_DOCUMENTED)
    }

    /// A number formatted for prose, or the audit placeholder.
    pub fn number_or_placeholder(&self, field_id: &str) -> String {
        match self.number(field_id) {
            Some(n) => format!("{n}"),
            None => NOT_DOCUMENTED.to_string(),
        }
    }

    /// A boolean rendered as "Yes"/"No", or the audit placeholder.
    pub fn yes_no(&self, field_id: &str) -> &'static str {
        match self.boolean(field_id) {
            Some(true) => "Yes",
            Some(false) => "No",
            None => NOT_DOCUMENTED,
        }
    }

    /// Reads an allergy list under the NKDA convention.
    pub fn allergies(&self, field_id: &str) -> AllergyRecord {
        match self.list(field_id) {
            None => AllergyRecord::NotDocumented,
            Some(items) if items.is_empty() => AllergyRecord::NoKnownAllergies,
            Some(items) => AllergyRecord::Known(items),
        }
    }
}
