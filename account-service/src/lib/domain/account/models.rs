use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::account::errors::DisplayNameError;
use crate::account::errors::EmailError;

/// User aggregate entity.
///
/// Represents a registered marketplace account. The `verified` flag starts
/// false at signup and transitions to true exactly once, on successful email
/// verification; it never reverts.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type.
///
/// Wraps the database-assigned numeric key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name value type
///
/// Ensures the name is non-empty after trimming surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    /// Create a new valid display name.
    ///
    /// # Errors
    /// * `Empty` - Name is empty or whitespace only
    pub fn new(name: String) -> Result<Self, DisplayNameError> {
        if name.trim().is_empty() {
            Err(DisplayNameError::Empty)
        } else {
            Ok(Self(name))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser. Stored and
/// compared case-sensitively, exactly as submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Account fields persisted at signup; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password_hash: String,
}

/// Command to register a new account with domain types
#[derive(Debug)]
pub struct SignupCommand {
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password: String,
}

impl SignupCommand {
    /// Construct a new signup command.
    ///
    /// # Arguments
    /// * `name` - Validated display name
    /// * `email` - Validated email address
    /// * `password` - Plain text password (will be hashed by service)
    pub fn new(name: DisplayName, email: EmailAddress, password: String) -> Self {
        Self {
            name,
            email,
            password,
        }
    }
}

/// Command to authenticate with raw credentials.
///
/// The email is deliberately kept as a raw string: a malformed address is
/// indistinguishable from an unknown one at login, so both collapse to the
/// same invalid-credentials outcome.
#[derive(Debug)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    pub session_token: String,
    pub user_id: UserId,
    pub name: String,
    pub email: String,
}

/// Result of a code verification request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// The submitted code matched and the account is now verified.
    Verified { user_id: UserId },
    /// The account was already verified; verifying again is a no-op success.
    AlreadyVerified { user_id: UserId },
}

impl VerifyOutcome {
    pub fn user_id(&self) -> UserId {
        match self {
            VerifyOutcome::Verified { user_id } => *user_id,
            VerifyOutcome::AlreadyVerified { user_id } => *user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_rejects_empty() {
        assert!(DisplayName::new("".to_string()).is_err());
        assert!(DisplayName::new("   ".to_string()).is_err());
        assert!(DisplayName::new("Gator".to_string()).is_ok());
    }

    #[test]
    fn test_email_address_validation() {
        assert!(EmailAddress::new("g@uf.edu".to_string()).is_ok());
        assert!(EmailAddress::new("not-an-email".to_string()).is_err());
        assert!(EmailAddress::new("".to_string()).is_err());
    }
}
