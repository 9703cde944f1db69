//! relevo-enhance
//!
//! Boundary to the external AI text-enhancement service. The engine never
//! waits on this: requests run as cancellable background tasks, a new
//! request for a field supersedes the in-flight one (last-request-wins),
//! and results for superseded requests are discarded. Navigating away
//! discards everything pending.

pub mod error;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::debug;

pub use error::EnhanceError;

/// The opaque external call: rewrite a nurse's draft text for clarity.
/// Quality of the rewrite is the service's concern, not the engine's.
#[async_trait]
pub trait TextEnhancer: Send + Sync {
    async fn enhance(&self, field_id: &str, draft: &str) -> Result<String, EnhanceError>;
}

/// Test double and offline fallback: returns the draft unchanged.
pub struct NoopEnhancer;

#[async_trait]
impl TextEnhancer for NoopEnhancer {
    async fn enhance(&self, _field_id: &str, draft: &str) -> Result<String, EnhanceError> {
        Ok(draft.to_string())
    }
}

/// Delivered when an enhancement request finishes and is still the current
/// request for its field.
#[derive(Debug)]
pub struct EnhancementOutcome {
    pub field_id: String,
    pub result: Result<String, EnhanceError>,
}

struct Inflight {
    generation: u64,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct FieldState {
    inflight: HashMap<String, Inflight>,
    next_generation: u64,
}

/// Per-field last-request-wins dispatcher over a `TextEnhancer`.
///
/// Each field carries a generation counter: issuing a request bumps it,
/// aborts the previous task, and a finishing task only delivers if its
/// generation is still current. The abort closes most races; the generation
/// check closes the rest (a task that was already past its await when the
/// abort landed).
pub struct EnhancementManager {
    enhancer: Arc<dyn TextEnhancer>,
    state: Arc<Mutex<FieldState>>,
    outcomes: mpsc::UnboundedSender<EnhancementOutcome>,
}

impl EnhancementManager {
    /// Create a manager and the receiver the UI drains for results.
    pub fn new(
        enhancer: Arc<dyn TextEnhancer>,
    ) -> (Self, mpsc::UnboundedReceiver<EnhancementOutcome>) {
        let (outcomes, receiver) = mpsc::unbounded_channel();
        (
            EnhancementManager {
                enhancer,
                state: Arc::new(Mutex::new(FieldState::default())),
                outcomes,
            },
            receiver,
        )
    }

    /// Request enhancement for a field's draft text, superseding any
    /// in-flight request for the same field.
    pub async fn request(&self, field_id: &str, draft: &str) {
        let mut state = self.state.lock().await;
        state.next_generation += 1;
        let generation = state.next_generation;

        if let Some(previous) = state.inflight.remove(field_id) {
            previous.handle.abort();
            debug!(field_id, "superseded in-flight enhancement request");
        }

        let enhancer = Arc::clone(&self.enhancer);
        let shared = Arc::clone(&self.state);
        let outcomes = self.outcomes.clone();
        let field = field_id.to_string();
        let text = draft.to_string();

        let handle = tokio::spawn(async move {
            let result = enhancer.enhance(&field, &text).await;

            // Deliver only if this request is still the current one for the
            // field; a superseded result is silently discarded.
            let mut state = shared.lock().await;
            let current = state
                .inflight
                .get(&field)
                .is_some_and(|entry| entry.generation == generation);
            if current {
                state.inflight.remove(&field);
                let _ = outcomes.send(EnhancementOutcome {
                    field_id: field,
                    result,
                });
            }
        });

        state.inflight.insert(
            field_id.to_string(),
            Inflight { generation, handle },
        );
    }

    /// Discard any pending request for one field (e.g. the field lost
    /// focus and the user moved on).
    pub async fn discard(&self, field_id: &str) {
        let mut state = self.state.lock().await;
        if let Some(entry) = state.inflight.remove(field_id) {
            entry.handle.abort();
            debug!(field_id, "discarded pending enhancement request");
        }
    }

    /// Discard everything pending: the user navigated away mid-request.
    pub async fn discard_all(&self) {
        let mut state = self.state.lock().await;
        for (field_id, entry) in state.inflight.drain() {
            entry.handle.abort();
            debug!(field_id, "discarded pending enhancement request");
        }
    }
}
