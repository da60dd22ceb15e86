use thiserror::Error;

use crate::session::errors::SessionError;
use crate::verification::errors::VerificationError;

/// Error for DisplayName validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DisplayNameError {
    #[error("Display name must not be empty")]
    Empty,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for outbound email delivery
#[derive(Debug, Clone, Error)]
pub enum EmailDeliveryError {
    #[error("Failed to build email message: {0}")]
    InvalidMessage(String),

    #[error("Failed to deliver email: {0}")]
    Transport(String),
}

/// Top-level error for account lifecycle operations
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid display name: {0}")]
    InvalidName(#[from] DisplayNameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    // Conflict errors
    #[error("Email already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Account is already verified: {0}")]
    AlreadyVerified(String),

    // Authentication errors. Unknown email and wrong password share one
    // variant so callers cannot enumerate registered addresses.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email not verified")]
    NotVerified,

    // Verification flow errors
    #[error("No account registered for email: {0}")]
    NotFound(String),

    #[error("No active verification code found")]
    NoActiveCode,

    #[error("Verification code has expired")]
    CodeExpired,

    #[error("Invalid verification code")]
    CodeMismatch,

    #[error("Failed to send verification email: {0}")]
    DeliveryFailed(#[from] EmailDeliveryError),

    // Infrastructure errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Verification error: {0}")]
    Verification(#[from] VerificationError),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        AccountError::Unknown(err.to_string())
    }
}
