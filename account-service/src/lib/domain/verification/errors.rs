use thiserror::Error;

/// Error for verification code storage operations
#[derive(Debug, Clone, Error)]
pub enum VerificationError {
    #[error("Database error: {0}")]
    DatabaseError(String),
}
