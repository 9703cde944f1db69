//! Transport-agnostic request/response facade over the engine.
//!
//! `WizardService` owns the active sessions (one per id) so a UI layer can
//! drive the contract with plain ids and serializable responses. Sessions
//! are single-writer: a second concurrent editor of the same id gets
//! last-write-wins semantics, which is an accepted limitation of the
//! client-local model, not a guarantee.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, PoisonError};

use relevo_core::models::document::SbarDocument;
use relevo_core::models::session::{SignatureRequest, WizardSession};
use relevo_protocols::get_protocol;
use relevo_protocols::steps::ValidationError;
use relevo_store::SessionStore;
use serde::Serialize;
use serde_json::Value;
use ts_rs::TS;
use uuid::Uuid;

use crate::assemble;
use crate::error::EngineError;
use crate::wizard::WizardEngine;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct StartResponse {
    pub session_id: Uuid,
    pub current_step: usize,
    pub total_steps: usize,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct SubmitResponse {
    pub accepted: bool,
    pub errors: Vec<ValidationError>,
    pub next_step: Option<usize>,
}

/// Outcome of `complete`: either the assembled document or the field
/// errors that block it.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "snake_case", tag = "outcome")]
#[ts(export)]
pub enum CompleteResponse {
    Document { document: Box<SbarDocument> },
    Invalid { errors: Vec<ValidationError> },
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export)]
pub struct FinalizeResponse {
    pub finalized: bool,
    pub errors: Vec<ValidationError>,
}

pub struct WizardService<S: SessionStore> {
    engine: WizardEngine<S>,
    sessions: Mutex<HashMap<Uuid, WizardSession>>,
}

impl<S: SessionStore> WizardService<S> {
    pub fn new(store: S) -> Self {
        WizardService {
            engine: WizardEngine::new(store),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn engine(&self) -> &WizardEngine<S> {
        &self.engine
    }

    fn sessions(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, WizardSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn start(&self, protocol_id: &str) -> Result<StartResponse, EngineError> {
        let session = self.engine.start(protocol_id)?;
        let total_steps = total_steps(protocol_id)?;
        let response = StartResponse {
            session_id: session.id,
            current_step: session.current_step_index,
            total_steps,
        };
        self.sessions().insert(session.id, session);
        Ok(response)
    }

    /// Load a saved draft into the active set and report its position.
    pub fn resume(&self, session_id: Uuid) -> Result<StartResponse, EngineError> {
        let session = self.engine.resume(session_id)?;
        let total_steps = total_steps(&session.protocol_id)?;
        let response = StartResponse {
            session_id: session.id,
            current_step: session.current_step_index,
            total_steps,
        };
        self.sessions().insert(session.id, session);
        Ok(response)
    }

    pub fn submit_step(
        &self,
        session_id: Uuid,
        fields: BTreeMap<String, Value>,
    ) -> Result<SubmitResponse, EngineError> {
        let mut sessions = self.sessions();
        let session = sessions
            .get_mut(&session_id)
            .ok_or(EngineError::SessionNotFound(session_id))?;

        match self.engine.submit_step(session, fields) {
            Ok(()) => Ok(SubmitResponse {
                accepted: true,
                errors: Vec::new(),
                next_step: Some(session.current_step_index),
            }),
            Err(EngineError::Validation(errors)) => Ok(SubmitResponse {
                accepted: false,
                errors,
                next_step: None,
            }),
            Err(other) => Err(other),
        }
    }

    pub fn previous_step(&self, session_id: Uuid) -> Result<usize, EngineError> {
        let mut sessions = self.sessions();
        let session = sessions
            .get_mut(&session_id)
            .ok_or(EngineError::SessionNotFound(session_id))?;
        self.engine.previous_step(session)?;
        Ok(session.current_step_index)
    }

    pub fn cancel(&self, session_id: Uuid) -> Result<(), EngineError> {
        let mut sessions = self.sessions();
        let session = sessions
            .get_mut(&session_id)
            .ok_or(EngineError::SessionNotFound(session_id))?;
        self.engine.cancel(session)?;
        sessions.remove(&session_id);
        Ok(())
    }

    /// Complete the session and hand back the assembled document, or the
    /// validation errors that block completion.
    pub fn complete(
        &self,
        session_id: Uuid,
        author: &str,
    ) -> Result<CompleteResponse, EngineError> {
        let mut sessions = self.sessions();
        let session = sessions
            .get_mut(&session_id)
            .ok_or(EngineError::SessionNotFound(session_id))?;

        match self.engine.complete(session) {
            Ok(()) => {
                let document = assemble::assemble(session, author)?;
                Ok(CompleteResponse::Document {
                    document: Box::new(document),
                })
            }
            Err(EngineError::Validation(errors)) => Ok(CompleteResponse::Invalid { errors }),
            Err(other) => Err(other),
        }
    }

    pub fn finalize(
        &self,
        session_id: Uuid,
        signature: SignatureRequest,
    ) -> Result<FinalizeResponse, EngineError> {
        let mut sessions = self.sessions();
        let session = sessions
            .get_mut(&session_id)
            .ok_or(EngineError::SessionNotFound(session_id))?;

        match self.engine.finalize(session, signature) {
            Ok(()) => Ok(FinalizeResponse {
                finalized: true,
                errors: Vec::new(),
            }),
            Err(EngineError::Validation(errors)) => Ok(FinalizeResponse {
                finalized: false,
                errors,
            }),
            Err(other) => Err(other),
        }
    }

    /// Assemble a preview document for an in-progress session.
    pub fn preview(&self, session_id: Uuid, author: &str) -> Result<SbarDocument, EngineError> {
        let sessions = self.sessions();
        let session = sessions
            .get(&session_id)
            .ok_or(EngineError::SessionNotFound(session_id))?;
        assemble::preview(session, author)
    }
}

fn total_steps(protocol_id: &str) -> Result<usize, EngineError> {
    get_protocol(protocol_id)
        .map(|p| p.steps().len())
        .ok_or_else(|| EngineError::UnknownProtocol(protocol_id.to_string()))
}
