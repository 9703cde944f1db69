use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// The four sections of a Situation-Background-Assessment-Recommendation
/// handoff, as deterministic prose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SbarSections {
    pub situation: String,
    pub background: String,
    pub assessment: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DocumentMetadata {
    pub timestamp: jiff::Timestamp,
    pub author: String,
    pub protocol_id: String,
    pub document_id: Uuid,
    /// Version of the protocol definition the document was assembled from.
    pub version: u32,
}

/// An assembled handoff document. For signature-gated protocols, existence
/// of this object for a finalized session implies the underlying step data
/// is frozen; the text itself is never edited after finalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SbarDocument {
    pub sections: SbarSections,
    pub metadata: DocumentMetadata,
}

impl SbarDocument {
    /// Render the document as a single text block. This is the hand-off
    /// surface for external renderers (print, PDF, clipboard); no format
    /// beyond plain text lives in the core.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "SBAR HANDOFF — {}\nDocument {} · v{} · {} · {}\n\n",
            self.metadata.protocol_id,
            self.metadata.document_id,
            self.metadata.version,
            self.metadata.author,
            self.metadata.timestamp,
        ));
        for (title, body) in [
            ("SITUATION", &self.sections.situation),
            ("BACKGROUND", &self.sections.background),
            ("ASSESSMENT", &self.sections.assessment),
            ("RECOMMENDATION", &self.sections.recommendation),
        ] {
            out.push_str(title);
            out.push('\n');
            out.push_str(body.trim_end());
            out.push_str("\n\n");
        }
        out
    }
}
