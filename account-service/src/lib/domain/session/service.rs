use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::account::models::UserId;
use crate::session::errors::SessionError;
use crate::session::models::Session;
use crate::session::ports::SessionIssuerPort;
use crate::session::ports::SessionStore;

/// Session issuer backed by a persistent store.
///
/// Tokens come from a cryptographically secure source; at 256 bits of
/// entropy, collisions are negligible and no retry is attempted.
pub struct SessionIssuer<S>
where
    S: SessionStore,
{
    store: Arc<S>,
    token_generator: auth::TokenGenerator,
}

impl<S> SessionIssuer<S>
where
    S: SessionStore,
{
    /// Create a new session issuer with an injected store.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            token_generator: auth::TokenGenerator::new(),
        }
    }
}

#[async_trait]
impl<S> SessionIssuerPort for SessionIssuer<S>
where
    S: SessionStore,
{
    async fn create_session(&self, user_id: UserId) -> Result<String, SessionError> {
        let token = self.token_generator.generate();
        let session = Session::new(token.clone(), user_id, Utc::now());

        self.store.insert(session).await?;

        Ok(token)
    }

    async fn validate_session(&self, token: &str) -> Result<Option<UserId>, SessionError> {
        let now = Utc::now();

        Ok(self
            .store
            .find(token)
            .await?
            .filter(|session| session.is_valid_at(now))
            .map(|session| session.user_id))
    }
}
