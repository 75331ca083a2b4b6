use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Record not found: {0}")]
    NotFound(Uuid),
    #[error("Receipt not found: {0}")]
    ReceiptNotFound(String),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("Ledger lock poisoned")]
    LockPoisoned,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// Returns `true` for failures raised while reading or writing durable state.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            CoreError::Persistence(_) | CoreError::Serde(_) | CoreError::Io(_)
        )
    }
}
