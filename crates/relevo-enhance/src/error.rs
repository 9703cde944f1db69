use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum EnhanceError {
    #[error("enhancement service failed: {0}")]
    Service(String),

    #[error("enhancement service timed out")]
    Timeout,
}
