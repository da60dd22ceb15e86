use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::account::errors::EmailDeliveryError;
use crate::account::models::LoginCommand;
use crate::account::models::LoginSuccess;
use crate::account::models::NewAccount;
use crate::account::models::SignupCommand;
use crate::account::models::User;
use crate::account::models::UserId;
use crate::account::models::VerifyOutcome;

/// Port for account lifecycle operations.
///
/// The HTTP layer holds this as a trait object so tests can substitute a
/// fake service without touching shared state.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account with validated credentials.
    ///
    /// New accounts start unverified.
    ///
    /// # Errors
    /// * `AlreadyRegistered` - Email is already taken
    /// * `DatabaseError` - Store operation failed
    async fn signup(&self, command: SignupCommand) -> Result<User, AccountError>;

    /// Authenticate and issue a session.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `NotVerified` - Credentials matched but the account is unverified
    /// * `Session` - Session persistence failed
    /// * `DatabaseError` - Store operation failed
    async fn login(&self, command: LoginCommand) -> Result<LoginSuccess, AccountError>;

    /// Issue a verification code and deliver it by email.
    ///
    /// A pending code for the same user is overwritten; the replaced code is
    /// invalid immediately regardless of its own expiry.
    ///
    /// # Errors
    /// * `NotFound` - No account registered for this email
    /// * `AlreadyVerified` - Verification flag is already set
    /// * `DeliveryFailed` - Email transport failed (the code stays issued)
    /// * `Verification` / `DatabaseError` - Store operation failed
    async fn send_verification_code(&self, email: &str) -> Result<(), AccountError>;

    /// Check a submitted code and flip the verification flag on match.
    ///
    /// Verifying an already-verified account succeeds idempotently.
    ///
    /// # Errors
    /// * `NotFound` - No account registered for this email
    /// * `NoActiveCode` - No pending code for this user
    /// * `CodeExpired` - Code past its expiry (the stale row is removed)
    /// * `CodeMismatch` - Code does not match the pending one
    /// * `Verification` / `DatabaseError` - Store operation failed
    async fn verify_code(&self, email: &str, code: &str) -> Result<VerifyOutcome, AccountError>;

    /// Resolve a presented session token to its owning user.
    ///
    /// # Returns
    /// `Some(user_id)` iff a session row exists and is unexpired
    ///
    /// # Errors
    /// * `Session` - Store operation failed
    async fn validate_session(&self, token: &str) -> Result<Option<UserId>, AccountError>;

    /// Retrieve account state by identifier.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `DatabaseError` - Store operation failed
    async fn get_account(&self, id: UserId) -> Result<User, AccountError>;

    /// Delete all verification codes past their expiry.
    ///
    /// # Returns
    /// Number of rows removed
    async fn purge_expired_codes(&self) -> Result<u64, AccountError>;
}

/// Persistence operations for the user aggregate.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist a new account and return it with the assigned id.
    ///
    /// The email uniqueness constraint in the store is the source of truth:
    /// under concurrent signups with the same address exactly one insert
    /// succeeds and the other fails with `AlreadyRegistered`.
    ///
    /// # Errors
    /// * `AlreadyRegistered` - Email is already registered
    /// * `DatabaseError` - Store operation failed
    async fn create(&self, account: NewAccount) -> Result<User, AccountError>;

    /// Retrieve a user by email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError>;

    /// Retrieve a user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Store operation failed
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AccountError>;

    /// Flip the verification flag to true.
    ///
    /// One-way transition; calling it on an already-verified account is a
    /// no-op.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `DatabaseError` - Store operation failed
    async fn mark_verified(&self, id: UserId) -> Result<(), AccountError>;
}

/// Outbound email delivery capability.
#[async_trait]
pub trait EmailSender: Send + Sync + 'static {
    /// Deliver a plain text message to an address.
    ///
    /// # Errors
    /// * `InvalidMessage` - Message could not be built
    /// * `Transport` - Delivery failed
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailDeliveryError>;
}
