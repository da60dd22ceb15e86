use std::sync::Arc;

use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::account::models::LoginCommand;
use crate::account::models::LoginSuccess;
use crate::account::models::NewAccount;
use crate::account::models::SignupCommand;
use crate::account::models::User;
use crate::account::models::UserId;
use crate::account::models::VerifyOutcome;
use crate::account::ports::AccountServicePort;
use crate::account::ports::CredentialStore;
use crate::account::ports::EmailSender;
use crate::session::ports::SessionIssuerPort;
use crate::verification::models::CodeCheck;
use crate::verification::models::CODE_TTL_SECONDS;
use crate::verification::ports::VerificationManagerPort;

/// Subject line of verification emails.
pub const VERIFICATION_EMAIL_SUBJECT: &str = "Marketplace Verification Code";

/// Account lifecycle orchestrator.
///
/// Composes the credential store, session issuer, verification code manager,
/// and email delivery capability. Enforces the invariant that login requires
/// a verified account. All collaborators are injected at construction so
/// tests can substitute fakes.
pub struct AccountService<CS, SI, VM, ES>
where
    CS: CredentialStore,
    SI: SessionIssuerPort,
    VM: VerificationManagerPort,
    ES: EmailSender,
{
    credentials: Arc<CS>,
    sessions: Arc<SI>,
    verification: Arc<VM>,
    email: Arc<ES>,
    password_hasher: auth::PasswordHasher,
}

impl<CS, SI, VM, ES> AccountService<CS, SI, VM, ES>
where
    CS: CredentialStore,
    SI: SessionIssuerPort,
    VM: VerificationManagerPort,
    ES: EmailSender,
{
    /// Create a new account service with injected dependencies.
    pub fn new(
        credentials: Arc<CS>,
        sessions: Arc<SI>,
        verification: Arc<VM>,
        email: Arc<ES>,
    ) -> Self {
        Self {
            credentials,
            sessions,
            verification,
            email,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    fn verification_email_body(code: &str) -> String {
        format!(
            "Your verification code is: {}. It expires in {} minutes.",
            code,
            CODE_TTL_SECONDS / 60
        )
    }
}

#[async_trait]
impl<CS, SI, VM, ES> AccountServicePort for AccountService<CS, SI, VM, ES>
where
    CS: CredentialStore,
    SI: SessionIssuerPort,
    VM: VerificationManagerPort,
    ES: EmailSender,
{
    async fn signup(&self, command: SignupCommand) -> Result<User, AccountError> {
        // Pre-check for a friendly error; the store's uniqueness constraint
        // remains the source of truth under concurrent signups.
        if let Some(existing) = self
            .credentials
            .find_by_email(command.email.as_str())
            .await?
        {
            return Err(AccountError::AlreadyRegistered(
                existing.email.as_str().to_string(),
            ));
        }

        let password_hash = self.password_hasher.hash(&command.password)?;

        let account = NewAccount {
            name: command.name,
            email: command.email,
            password_hash,
        };

        let user = self.credentials.create(account).await?;

        tracing::info!(user_id = %user.id, "Account registered");

        Ok(user)
    }

    async fn login(&self, command: LoginCommand) -> Result<LoginSuccess, AccountError> {
        // Unknown email and wrong password produce the identical error so
        // the response does not reveal which factor failed.
        let user = self
            .credentials
            .find_by_email(&command.email)
            .await?
            .ok_or(AccountError::InvalidCredentials)?;

        let matched = self
            .password_hasher
            .verify(&command.password, &user.password_hash)?;
        if !matched {
            return Err(AccountError::InvalidCredentials);
        }

        if !user.verified {
            return Err(AccountError::NotVerified);
        }

        let session_token = self.sessions.create_session(user.id).await?;

        Ok(LoginSuccess {
            session_token,
            user_id: user.id,
            name: user.name.as_str().to_string(),
            email: user.email.as_str().to_string(),
        })
    }

    async fn send_verification_code(&self, email: &str) -> Result<(), AccountError> {
        let user = self
            .credentials
            .find_by_email(email)
            .await?
            .ok_or_else(|| AccountError::NotFound(email.to_string()))?;

        if user.verified {
            return Err(AccountError::AlreadyVerified(
                user.email.as_str().to_string(),
            ));
        }

        let code = self.verification.issue_code(user.id, email).await?;

        // The upserted row stays in place even if delivery fails; a retry
        // simply reissues and overwrites it.
        self.email
            .send(
                email,
                VERIFICATION_EMAIL_SUBJECT,
                &Self::verification_email_body(&code),
            )
            .await?;

        tracing::info!(user_id = %user.id, "Verification code sent");

        Ok(())
    }

    async fn verify_code(&self, email: &str, code: &str) -> Result<VerifyOutcome, AccountError> {
        let user = self
            .credentials
            .find_by_email(email)
            .await?
            .ok_or_else(|| AccountError::NotFound(email.to_string()))?;

        if user.verified {
            return Ok(VerifyOutcome::AlreadyVerified { user_id: user.id });
        }

        match self.verification.check_code(user.id, code).await? {
            CodeCheck::NoActiveCode => Err(AccountError::NoActiveCode),
            CodeCheck::Expired => Err(AccountError::CodeExpired),
            CodeCheck::Mismatch => Err(AccountError::CodeMismatch),
            CodeCheck::Verified => {
                self.credentials.mark_verified(user.id).await?;

                if let Err(e) = self.verification.discard_code(user.id).await {
                    tracing::warn!(
                        user_id = %user.id,
                        error = %e,
                        "Failed to delete consumed verification code"
                    );
                }

                tracing::info!(user_id = %user.id, "Account verified");

                Ok(VerifyOutcome::Verified { user_id: user.id })
            }
        }
    }

    async fn validate_session(&self, token: &str) -> Result<Option<UserId>, AccountError> {
        Ok(self.sessions.validate_session(token).await?)
    }

    async fn get_account(&self, id: UserId) -> Result<User, AccountError> {
        self.credentials
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound(id.to_string()))
    }

    async fn purge_expired_codes(&self) -> Result<u64, AccountError> {
        Ok(self.verification.purge_expired().await?)
    }
}
