use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use account_service::domain::account::errors::AccountError;
use account_service::domain::account::errors::EmailDeliveryError;
use account_service::domain::account::models::NewAccount;
use account_service::domain::account::models::User;
use account_service::domain::account::models::UserId;
use account_service::domain::account::ports::CredentialStore;
use account_service::domain::account::ports::EmailSender;
use account_service::domain::account::service::AccountService;
use account_service::domain::session::errors::SessionError;
use account_service::domain::session::models::Session;
use account_service::domain::session::ports::SessionStore;
use account_service::domain::session::service::SessionIssuer;
use account_service::domain::verification::errors::VerificationError;
use account_service::domain::verification::models::VerificationCode;
use account_service::domain::verification::ports::VerificationCodeStore;
use account_service::domain::verification::service::VerificationCodeManager;
use account_service::inbound::http::router::create_router;
use async_trait::async_trait;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

/// Test application that spawns the real router over in-memory fakes of the
/// outbound ports, so no database or SMTP relay is needed.
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub mailbox: Arc<RecordingEmailSender>,
    pub code_store: Arc<InMemoryCodeStore>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        let credential_store = Arc::new(InMemoryCredentialStore::new());
        let session_store = Arc::new(InMemorySessionStore::new());
        let code_store = Arc::new(InMemoryCodeStore::new());
        let mailbox = Arc::new(RecordingEmailSender::new());

        let session_issuer = Arc::new(SessionIssuer::new(session_store));
        let verification_manager = Arc::new(VerificationCodeManager::new(Arc::clone(&code_store)));

        let account_service = Arc::new(AccountService::new(
            credential_store,
            session_issuer,
            verification_manager,
            Arc::clone(&mailbox),
        ));

        let router = create_router(account_service);

        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            mailbox,
            code_store,
        }
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }
}

/// In-memory credential store mirroring the Postgres schema semantics,
/// including the email uniqueness constraint.
pub struct InMemoryCredentialStore {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn create(&self, account: NewAccount) -> Result<User, AccountError> {
        let mut users = self.users.lock().unwrap();

        if users.iter().any(|u| u.email == account.email) {
            return Err(AccountError::AlreadyRegistered(
                account.email.as_str().to_string(),
            ));
        }

        let user = User {
            id: UserId(self.next_id.fetch_add(1, Ordering::SeqCst)),
            name: account.name,
            email: account.email,
            password_hash: account.password_hash,
            verified: false,
            created_at: Utc::now(),
        };
        users.push(user.clone());

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email.as_str() == email).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AccountError> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn mark_verified(&self, id: UserId) -> Result<(), AccountError> {
        let mut users = self.users.lock().unwrap();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(AccountError::NotFound(id.to_string()))?;
        user.verified = true;
        Ok(())
    }
}

pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<String, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(&self, session: Session) -> Result<(), SessionError> {
        let mut sessions = self.sessions.lock().unwrap();
        sessions.insert(session.token.clone(), session);
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<Session>, SessionError> {
        let sessions = self.sessions.lock().unwrap();
        Ok(sessions.get(token).cloned())
    }
}

pub struct InMemoryCodeStore {
    codes: Mutex<HashMap<i64, VerificationCode>>,
}

impl InMemoryCodeStore {
    pub fn new() -> Self {
        Self {
            codes: Mutex::new(HashMap::new()),
        }
    }

    /// Test hook: backdate the pending code so it reads as expired without
    /// waiting out the real TTL.
    pub fn expire_code(&self, user_id: i64) {
        let mut codes = self.codes.lock().unwrap();
        if let Some(code) = codes.get_mut(&user_id) {
            code.expires_at = Utc::now() - Duration::seconds(1);
        }
    }

    pub fn has_code(&self, user_id: i64) -> bool {
        self.codes.lock().unwrap().contains_key(&user_id)
    }
}

#[async_trait]
impl VerificationCodeStore for InMemoryCodeStore {
    async fn upsert(&self, code: VerificationCode) -> Result<(), VerificationError> {
        let mut codes = self.codes.lock().unwrap();
        codes.insert(code.user_id.0, code);
        Ok(())
    }

    async fn fetch(&self, user_id: UserId) -> Result<Option<VerificationCode>, VerificationError> {
        let codes = self.codes.lock().unwrap();
        Ok(codes.get(&user_id.0).cloned())
    }

    async fn delete(&self, user_id: UserId) -> Result<(), VerificationError> {
        let mut codes = self.codes.lock().unwrap();
        codes.remove(&user_id.0);
        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, VerificationError> {
        let mut codes = self.codes.lock().unwrap();
        let before = codes.len();
        codes.retain(|_, code| code.expires_at >= now);
        Ok((before - codes.len()) as u64)
    }
}

/// Email sender fake that records delivered messages instead of sending
/// them, with a switch to simulate transport failure.
pub struct RecordingEmailSender {
    sent: Mutex<Vec<(String, String, String)>>,
    fail_next: AtomicBool,
}

impl RecordingEmailSender {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_next: AtomicBool::new(false),
        }
    }

    pub fn fail_deliveries(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Extract the six-digit code from the most recently delivered email.
    pub fn last_code(&self) -> String {
        let sent = self.sent.lock().unwrap();
        let (_, _, body) = sent.last().expect("No email was delivered");
        body.split("code is: ")
            .nth(1)
            .expect("Unexpected email body")
            .chars()
            .take(6)
            .collect()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), EmailDeliveryError> {
        if self.fail_next.load(Ordering::SeqCst) {
            return Err(EmailDeliveryError::Transport(
                "simulated transport failure".to_string(),
            ));
        }

        let mut sent = self.sent.lock().unwrap();
        sent.push((to.to_string(), subject.to_string(), body.to_string()));
        Ok(())
    }
}
