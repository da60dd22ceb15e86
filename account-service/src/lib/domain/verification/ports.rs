use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::account::models::UserId;
use crate::verification::errors::VerificationError;
use crate::verification::models::CodeCheck;
use crate::verification::models::VerificationCode;

/// Port for the verification code lifecycle.
#[async_trait]
pub trait VerificationManagerPort: Send + Sync + 'static {
    /// Generate and persist a fresh code for the user.
    ///
    /// Replaces any pending code atomically; the previous code becomes
    /// invalid even if unexpired.
    ///
    /// # Returns
    /// The six-digit zero-padded code
    ///
    /// # Errors
    /// * `DatabaseError` - Upsert failed
    async fn issue_code(&self, user_id: UserId, email: &str) -> Result<String, VerificationError>;

    /// Check a submitted code against the pending record.
    ///
    /// The `Expired` outcome removes the stale row best-effort; a cleanup
    /// failure is logged, not surfaced, since the outcome is already
    /// determined.
    ///
    /// # Errors
    /// * `DatabaseError` - Store lookup failed
    async fn check_code(
        &self,
        user_id: UserId,
        submitted: &str,
    ) -> Result<CodeCheck, VerificationError>;

    /// Remove a consumed code after successful verification.
    ///
    /// # Errors
    /// * `DatabaseError` - Delete failed
    async fn discard_code(&self, user_id: UserId) -> Result<(), VerificationError>;

    /// Delete all rows past their expiry.
    ///
    /// Housekeeping sweep, independent of per-request checks.
    ///
    /// # Returns
    /// Number of rows removed
    ///
    /// # Errors
    /// * `DatabaseError` - Delete failed
    async fn purge_expired(&self) -> Result<u64, VerificationError>;
}

/// Persistence operations for verification codes.
#[async_trait]
pub trait VerificationCodeStore: Send + Sync + 'static {
    /// Insert or replace the row keyed by user id.
    ///
    /// Must be a single atomic conflict-resolving write, not read-then-write:
    /// concurrent issues race to overwrite and the last write wins.
    ///
    /// # Errors
    /// * `DatabaseError` - Upsert failed
    async fn upsert(&self, code: VerificationCode) -> Result<(), VerificationError>;

    /// Retrieve the pending row for a user, expired or not.
    ///
    /// # Errors
    /// * `DatabaseError` - Store lookup failed
    async fn fetch(&self, user_id: UserId) -> Result<Option<VerificationCode>, VerificationError>;

    /// Delete the row for a user, if any.
    ///
    /// # Errors
    /// * `DatabaseError` - Delete failed
    async fn delete(&self, user_id: UserId) -> Result<(), VerificationError>;

    /// Delete all rows whose expiry is strictly before `now`.
    ///
    /// # Returns
    /// Number of rows removed
    ///
    /// # Errors
    /// * `DatabaseError` - Delete failed
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, VerificationError>;
}
