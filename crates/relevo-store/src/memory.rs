use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use jiff::Timestamp;
use relevo_core::models::session::WizardSession;
use uuid::Uuid;

use crate::error::StoreError;
use crate::{DraftRecord, DraftSummary, SessionStore};

/// In-memory store. The default backend for tests and for embedding the
/// engine in a host that does its own persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<Uuid, DraftRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, DraftRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemoryStore {
    fn save(&self, session: &WizardSession) -> Result<(), StoreError> {
        let record = DraftRecord {
            session: session.clone(),
            saved_at: Timestamp::now(),
        };
        self.records().insert(session.id, record);
        Ok(())
    }

    fn load(&self, session_id: Uuid) -> Result<Option<DraftRecord>, StoreError> {
        Ok(self.records().get(&session_id).cloned())
    }

    fn clear(&self, session_id: Uuid) -> Result<(), StoreError> {
        self.records().remove(&session_id);
        Ok(())
    }

    fn list(&self) -> Result<Vec<DraftSummary>, StoreError> {
        let mut summaries: Vec<DraftSummary> =
            self.records().values().map(DraftSummary::from).collect();
        summaries.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(summaries)
    }
}
