use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("draft serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("draft I/O error: {0}")]
    Io(#[from] std::io::Error),
}
