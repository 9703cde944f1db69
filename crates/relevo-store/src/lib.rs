//! relevo-store
//!
//! Draft persistence behind the `SessionStore` seam, so the same engine can
//! be backed by an in-memory map, a file directory, or a remote service
//! without changing any wizard logic. One record per session id; record
//! absence means no draft exists.

pub mod error;
pub mod file;
pub mod memory;

use jiff::Timestamp;
use relevo_core::models::session::{SessionStatus, WizardSession};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;

/// The persisted draft envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub session: WizardSession,
    pub saved_at: Timestamp,
}

/// Summary row for a resume-a-draft picker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSummary {
    pub session_id: Uuid,
    pub protocol_id: String,
    pub status: SessionStatus,
    pub current_step_index: usize,
    pub saved_at: Timestamp,
}

impl From<&DraftRecord> for DraftSummary {
    fn from(record: &DraftRecord) -> Self {
        DraftSummary {
            session_id: record.session.id,
            protocol_id: record.session.protocol_id.clone(),
            status: record.session.status,
            current_step_index: record.session.current_step_index,
            saved_at: record.saved_at,
        }
    }
}

/// Key-value persistence for wizard drafts.
///
/// Saving is best-effort from the engine's perspective: an autosave failure
/// is surfaced as a warning and never fails the mutating operation that
/// triggered it. A loaded `Finalized` session is read-only; the engine
/// rejects every mutation on it.
pub trait SessionStore: Send + Sync {
    /// Persist the session, stamping the record's `saved_at`.
    fn save(&self, session: &WizardSession) -> Result<(), StoreError>;

    /// Load the draft for a session id, or `None` if no record exists.
    fn load(&self, session_id: Uuid) -> Result<Option<DraftRecord>, StoreError>;

    /// Remove the draft for a session id. Removing a missing record is not
    /// an error.
    fn clear(&self, session_id: Uuid) -> Result<(), StoreError>;

    /// Summaries of every stored record, newest save first.
    fn list(&self) -> Result<Vec<DraftSummary>, StoreError>;

    /// When the draft was last saved, or `None` if no record exists.
    fn last_saved_at(&self, session_id: Uuid) -> Result<Option<Timestamp>, StoreError> {
        Ok(self.load(session_id)?.map(|record| record.saved_at))
    }
}
