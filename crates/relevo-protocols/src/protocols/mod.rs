//! One module per assessment protocol, plus the shared template helpers the
//! SBAR sections are composed with.

pub mod cardiac;
pub mod code_blue;
pub mod discharge;
pub mod incident_report;
pub mod medication_guide;
pub mod sepsis;
pub mod stroke;
pub mod transfusion;

use relevo_core::models::session::{FieldView, NOT_DOCUMENTED};
use relevo_scores::{ScoreKind, ScoreResult, ScoreSet};

/// Append a "Label: value" line.
pub(crate) fn labeled(out: &mut String, label: &str, value: &str) {
    out.push_str(label);
    out.push_str(": ");
    out.push_str(value);
    out.push('\n');
}

/// Append a critical finding as its own prominently marked line. Binary
/// critical findings must never be buried in prose.
pub(crate) fn critical(out: &mut String, finding: &str) {
    out.push_str("*** ");
    out.push_str(finding);
    out.push_str(" ***\n");
}

/// Append a score line, or the "not documented" placeholder when the score
/// could not be computed from the entered data.
pub(crate) fn score_line(
    out: &mut String,
    scores: &ScoreSet,
    kind: ScoreKind,
    render: impl FnOnce(&ScoreResult) -> String,
) {
    match scores.get(kind) {
        Some(result) => out.push_str(&render(result)),
        None => {
            out.push_str(kind.display_name());
            out.push_str(": not documented\n");
        }
    }
}

/// A text list rendered for prose: comma-joined entries, "None" for an
/// explicitly empty list, the audit placeholder when never documented.
pub(crate) fn list_or_placeholder(fields: &FieldView, field_id: &str) -> String {
    match fields.list(field_id) {
        Some(items) if !items.is_empty() => items.join(", "),
        Some(_) => "None".to_string(),
        None => NOT_DOCUMENTED.to_string(),
    }
}
