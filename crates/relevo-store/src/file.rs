use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use jiff::Timestamp;
use relevo_core::models::session::WizardSession;
use tracing::warn;
use uuid::Uuid;

use crate::error::StoreError;
use crate::{DraftRecord, DraftSummary, SessionStore};

/// File-backed store: one pretty-printed JSON record per session id under a
/// single directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a draft directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(FileStore { dir })
    }

    fn path(&self, session_id: Uuid) -> PathBuf {
        self.dir.join(format!("{session_id}.json"))
    }
}

impl SessionStore for FileStore {
    fn save(&self, session: &WizardSession) -> Result<(), StoreError> {
        let record = DraftRecord {
            session: session.clone(),
            saved_at: Timestamp::now(),
        };
        let body = serde_json::to_vec_pretty(&record)?;
        fs::write(self.path(session.id), body)?;
        Ok(())
    }

    fn load(&self, session_id: Uuid) -> Result<Option<DraftRecord>, StoreError> {
        let bytes = match fs::read(self.path(session_id)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn clear(&self, session_id: Uuid) -> Result<(), StoreError> {
        match fs::remove_file(self.path(session_id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> Result<Vec<DraftSummary>, StoreError> {
        let mut summaries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            // A record that no longer parses is skipped, not fatal: the
            // picker should still show every readable draft.
            match fs::read(&path).map_err(StoreError::from).and_then(|bytes| {
                serde_json::from_slice::<DraftRecord>(&bytes).map_err(StoreError::from)
            }) {
                Ok(record) => summaries.push(DraftSummary::from(&record)),
                Err(error) => {
                    warn!(path = %path.display(), %error, "skipping unreadable draft record");
                }
            }
        }
        summaries.sort_by(|a, b| b.saved_at.cmp(&a.saved_at));
        Ok(summaries)
    }
}
