use std::collections::BTreeMap;

use jiff::Timestamp;
use relevo_core::models::session::{
    SessionStatus, Signature, SignatureRequest, WizardSession,
};
use relevo_protocols::steps::ValidationError;
use relevo_protocols::{Protocol, get_protocol};
use relevo_store::SessionStore;
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use crate::assemble;
use crate::error::EngineError;

/// The generic wizard state machine.
///
/// Owns no sessions itself: callers hold `WizardSession` values and pass
/// them in for mutation. Every operation is synchronous and all-or-nothing;
/// the only side effect is a best-effort autosave to the session store,
/// which warns on failure and never fails the operation.
pub struct WizardEngine<S: SessionStore> {
    store: S,
}

impl<S: SessionStore> WizardEngine<S> {
    pub fn new(store: S) -> Self {
        WizardEngine { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a new session positioned at the first step.
    pub fn start(&self, protocol_id: &str) -> Result<WizardSession, EngineError> {
        let protocol = require_protocol(protocol_id)?;
        let now = Timestamp::now();
        let session = WizardSession {
            id: Uuid::new_v4(),
            protocol_id: protocol.id().to_string(),
            protocol_version: protocol.version(),
            current_step_index: 0,
            step_data: BTreeMap::new(),
            status: SessionStatus::Draft,
            signature: None,
            created_at: now,
            updated_at: now,
        };
        info!(session_id = %session.id, protocol = protocol.id(), "started wizard session");
        self.autosave(&session);
        Ok(session)
    }

    /// Validate and merge field data for the current step, then advance.
    ///
    /// Validation runs against the merged field map (existing entries plus
    /// the submitted ones), so revisiting a step and resubmitting a subset
    /// of its fields keeps the rest. On failure the session is unchanged:
    /// no partial advance, no partial merge.
    pub fn submit_step(
        &self,
        session: &mut WizardSession,
        fields: BTreeMap<String, Value>,
    ) -> Result<(), EngineError> {
        self.guard_mutable(session, "submit_step")?;
        let protocol = require_protocol(&session.protocol_id)?;

        let Some(step) = protocol.steps().get(session.current_step_index) else {
            return Err(EngineError::InvalidTransition {
                operation: "submit_step",
                status: session.status,
            });
        };

        let mut merged = session
            .step_data
            .get(&step.id)
            .cloned()
            .unwrap_or_default();
        merged.extend(fields);

        let errors = step.validate(&merged);
        if !errors.is_empty() {
            return Err(EngineError::Validation(errors));
        }

        session.step_data.insert(step.id.clone(), merged);
        session.current_step_index += 1;
        session.updated_at = Timestamp::now();
        self.autosave(session);
        Ok(())
    }

    /// Step back one step. Data entered for the step being left is kept.
    pub fn previous_step(&self, session: &mut WizardSession) -> Result<(), EngineError> {
        self.guard_mutable(session, "previous_step")?;
        if session.current_step_index > 0 {
            session.current_step_index -= 1;
            session.updated_at = Timestamp::now();
            self.autosave(session);
        }
        Ok(())
    }

    /// Abandon the session from any non-terminal state and clear its draft.
    pub fn cancel(&self, session: &mut WizardSession) -> Result<(), EngineError> {
        match session.status {
            SessionStatus::Finalized => {
                return Err(EngineError::ImmutableDocument {
                    session_id: session.id,
                });
            }
            SessionStatus::Cancelled => {
                return Err(EngineError::InvalidTransition {
                    operation: "cancel",
                    status: session.status,
                });
            }
            SessionStatus::Draft | SessionStatus::Completed => {}
        }

        session.status = SessionStatus::Cancelled;
        session.updated_at = Timestamp::now();
        if let Err(error) = self.store.clear(session.id) {
            warn!(session_id = %session.id, %error, "failed to clear cancelled draft");
        }
        info!(session_id = %session.id, "cancelled wizard session");
        Ok(())
    }

    /// Transition a fully submitted session to `Completed`.
    ///
    /// Re-validates every step's required fields across the whole session,
    /// defending against drafts edited out of order or corrupted out of
    /// band: a hole in an earlier, already-passed step surfaces here as
    /// validation errors, never as a document.
    pub fn complete(&self, session: &mut WizardSession) -> Result<(), EngineError> {
        self.guard_mutable(session, "complete")?;
        let protocol = require_protocol(&session.protocol_id)?;

        let remaining = protocol
            .steps()
            .len()
            .saturating_sub(session.current_step_index);
        if remaining > 0 {
            return Err(EngineError::IncompleteSession { remaining });
        }

        let errors = validate_all_steps(protocol.as_ref(), session);
        if !errors.is_empty() {
            return Err(EngineError::Validation(errors));
        }

        session.status = SessionStatus::Completed;
        session.updated_at = Timestamp::now();
        self.autosave(session);
        info!(session_id = %session.id, "completed wizard session");
        Ok(())
    }

    /// Sign and freeze a completed session of a signature-gated protocol.
    ///
    /// Requires a non-empty signer name and credentials and an explicit
    /// acknowledgment. Also gates on the assembled document passing section
    /// validation. After success the session rejects every further
    /// mutation.
    pub fn finalize(
        &self,
        session: &mut WizardSession,
        signature: SignatureRequest,
    ) -> Result<(), EngineError> {
        match session.status {
            SessionStatus::Completed => {}
            SessionStatus::Finalized => {
                return Err(EngineError::ImmutableDocument {
                    session_id: session.id,
                });
            }
            status => {
                return Err(EngineError::InvalidTransition {
                    operation: "finalize",
                    status,
                });
            }
        }

        let protocol = require_protocol(&session.protocol_id)?;
        if !protocol.requires_signature() {
            return Err(EngineError::SignatureNotSupported(
                session.protocol_id.clone(),
            ));
        }

        let errors = validate_signature(&signature);
        if !errors.is_empty() {
            return Err(EngineError::Validation(errors));
        }

        let document = assemble::preview(session, &signature.signer_name)?;
        let errors = assemble::validate(&document);
        if !errors.is_empty() {
            return Err(EngineError::Validation(errors));
        }

        session.signature = Some(Signature {
            signer_name: signature.signer_name,
            credentials: signature.credentials,
            acknowledged: signature.acknowledged,
            signed_at: Timestamp::now(),
        });
        session.status = SessionStatus::Finalized;
        session.updated_at = Timestamp::now();
        self.autosave(session);
        info!(session_id = %session.id, "finalized wizard session");
        Ok(())
    }

    /// Restore a saved session, exactly as last autosaved.
    ///
    /// Fails with `StaleDraft` if the protocol definition changed since the
    /// save; a best-effort field remap is the caller's decision to make,
    /// never something the engine guesses at.
    pub fn resume(&self, session_id: Uuid) -> Result<WizardSession, EngineError> {
        let record = match self.store.load(session_id) {
            Ok(record) => record,
            Err(error) => {
                warn!(%session_id, %error, "draft load failed");
                None
            }
        };
        let session = record
            .map(|r| r.session)
            .ok_or(EngineError::SessionNotFound(session_id))?;

        let protocol = require_protocol(&session.protocol_id)?;
        let known_steps: Vec<&str> = protocol.steps().iter().map(|s| s.id.as_str()).collect();
        let steps_match = session
            .step_data
            .keys()
            .all(|id| known_steps.contains(&id.as_str()));

        if session.protocol_version != protocol.version() || !steps_match {
            return Err(EngineError::StaleDraft {
                session_id,
                protocol_id: session.protocol_id.clone(),
                saved_version: session.protocol_version,
                current_version: protocol.version(),
            });
        }

        info!(%session_id, step = session.current_step_index, "resumed wizard session");
        Ok(session)
    }

    fn guard_mutable(
        &self,
        session: &WizardSession,
        operation: &'static str,
    ) -> Result<(), EngineError> {
        match session.status {
            SessionStatus::Draft => Ok(()),
            SessionStatus::Finalized => Err(EngineError::ImmutableDocument {
                session_id: session.id,
            }),
            status => Err(EngineError::InvalidTransition { operation, status }),
        }
    }

    fn autosave(&self, session: &WizardSession) {
        if let Err(error) = self.store.save(session) {
            warn!(session_id = %session.id, %error, "draft autosave failed; continuing");
        }
    }
}

fn require_protocol(protocol_id: &str) -> Result<Box<dyn Protocol>, EngineError> {
    get_protocol(protocol_id).ok_or_else(|| EngineError::UnknownProtocol(protocol_id.to_string()))
}

fn validate_all_steps(protocol: &dyn Protocol, session: &WizardSession) -> Vec<ValidationError> {
    let empty = BTreeMap::new();
    protocol
        .steps()
        .iter()
        .flat_map(|step| {
            let values = session.step_data.get(&step.id).unwrap_or(&empty);
            step.validate(values)
        })
        .collect()
}

fn validate_signature(signature: &SignatureRequest) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut push = |field_id: &str, message: &str| {
        errors.push(ValidationError {
            step_id: "signature".to_string(),
            field_id: field_id.to_string(),
            message: message.to_string(),
        });
    };

    if signature.signer_name.trim().is_empty() {
        push("signer_name", "signer name is required");
    }
    if signature.credentials.trim().is_empty() {
        push("credentials", "signer credentials are required");
    }
    if !signature.acknowledged {
        push("acknowledged", "the attestation must be explicitly acknowledged");
    }
    errors
}
