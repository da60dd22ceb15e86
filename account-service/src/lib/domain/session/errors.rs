use thiserror::Error;

/// Error for session issuance and validation operations
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}
