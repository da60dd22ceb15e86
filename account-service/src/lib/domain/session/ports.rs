use async_trait::async_trait;

use crate::account::models::UserId;
use crate::session::errors::SessionError;
use crate::session::models::Session;

/// Port for session issuance and validation.
#[async_trait]
pub trait SessionIssuerPort: Send + Sync + 'static {
    /// Issue and persist a session for the given user.
    ///
    /// # Returns
    /// The opaque session token
    ///
    /// # Errors
    /// * `DatabaseError` - Session persistence failed
    async fn create_session(&self, user_id: UserId) -> Result<String, SessionError>;

    /// Resolve a presented token to its owning user.
    ///
    /// Valid iff a row exists with this token and the current time is not
    /// yet past its expiry. Expired rows are left in place, not purged.
    ///
    /// # Returns
    /// `Some(user_id)` for a valid session, `None` otherwise
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn validate_session(&self, token: &str) -> Result<Option<UserId>, SessionError>;
}

/// Persistence operations for sessions.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Persist a new session row.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn insert(&self, session: Session) -> Result<(), SessionError>;

    /// Retrieve a session by token, expired or not.
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find(&self, token: &str) -> Result<Option<Session>, SessionError>;
}
