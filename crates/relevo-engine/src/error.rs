use relevo_core::models::session::SessionStatus;
use relevo_protocols::steps::ValidationError;
use relevo_scores::ComputationError;
use thiserror::Error;
use uuid::Uuid;

/// Engine-level failures. Every mutating operation is all-or-nothing: when
/// one of these is returned the session is exactly as it was before the
/// call.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown protocol: {0}")]
    UnknownProtocol(String),

    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<ValidationError>),

    #[error("session {session_id} is finalized and immutable")]
    ImmutableDocument { session_id: Uuid },

    #[error(
        "draft for session {session_id} was saved against {protocol_id} \
         v{saved_version}; the current definition is v{current_version}"
    )]
    StaleDraft {
        session_id: Uuid,
        protocol_id: String,
        saved_version: u32,
        current_version: u32,
    },

    #[error("operation '{operation}' is not valid for a {} session", .status.as_str())]
    InvalidTransition {
        operation: &'static str,
        status: SessionStatus,
    },

    #[error("cannot complete: {remaining} step(s) have not been submitted")]
    IncompleteSession { remaining: usize },

    #[error("protocol '{0}' does not take a signature; completed documents are final as-is")]
    SignatureNotSupported(String),

    #[error("no draft found for session {0}")]
    SessionNotFound(Uuid),

    #[error(transparent)]
    Computation(#[from] ComputationError),
}

impl EngineError {
    /// The field-level errors, when this is a validation failure.
    pub fn validation_errors(&self) -> Option<&[ValidationError]> {
        match self {
            EngineError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
