use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::OsRng;
use rand::Rng;

use crate::account::models::UserId;
use crate::verification::errors::VerificationError;
use crate::verification::models::CodeCheck;
use crate::verification::models::VerificationCode;
use crate::verification::ports::VerificationCodeStore;
use crate::verification::ports::VerificationManagerPort;

/// Verification code manager backed by a persistent store.
///
/// Codes are uniformly random six-digit decimal strings. The one-row-per-user
/// invariant is delegated to the store's atomic upsert.
pub struct VerificationCodeManager<V>
where
    V: VerificationCodeStore,
{
    store: Arc<V>,
}

impl<V> VerificationCodeManager<V>
where
    V: VerificationCodeStore,
{
    /// Create a new manager with an injected store.
    pub fn new(store: Arc<V>) -> Self {
        Self { store }
    }

    fn generate_code() -> String {
        // Uniform over 000000..=999999, zero-padded to width 6
        format!("{:06}", OsRng.gen_range(0..1_000_000))
    }
}

#[async_trait]
impl<V> VerificationManagerPort for VerificationCodeManager<V>
where
    V: VerificationCodeStore,
{
    async fn issue_code(&self, user_id: UserId, email: &str) -> Result<String, VerificationError> {
        let code = Self::generate_code();
        let record = VerificationCode::new(user_id, email.to_string(), code.clone(), Utc::now());

        self.store.upsert(record).await?;

        Ok(code)
    }

    async fn check_code(
        &self,
        user_id: UserId,
        submitted: &str,
    ) -> Result<CodeCheck, VerificationError> {
        let Some(record) = self.store.fetch(user_id).await? else {
            return Ok(CodeCheck::NoActiveCode);
        };

        if record.is_expired_at(Utc::now()) {
            if let Err(e) = self.store.delete(user_id).await {
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    "Failed to delete expired verification code"
                );
            }
            return Ok(CodeCheck::Expired);
        }

        if record.code != submitted {
            return Ok(CodeCheck::Mismatch);
        }

        Ok(CodeCheck::Verified)
    }

    async fn discard_code(&self, user_id: UserId) -> Result<(), VerificationError> {
        self.store.delete(user_id).await
    }

    async fn purge_expired(&self) -> Result<u64, VerificationError> {
        self.store.delete_expired(Utc::now()).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;
    use chrono::Duration;
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;

    mock! {
        pub TestCodeStore {}

        #[async_trait]
        impl VerificationCodeStore for TestCodeStore {
            async fn upsert(&self, code: VerificationCode) -> Result<(), VerificationError>;
            async fn fetch(&self, user_id: UserId) -> Result<Option<VerificationCode>, VerificationError>;
            async fn delete(&self, user_id: UserId) -> Result<(), VerificationError>;
            async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, VerificationError>;
        }
    }

    fn live_record(user_id: UserId, code: &str) -> VerificationCode {
        VerificationCode::new(user_id, "g@uf.edu".to_string(), code.to_string(), Utc::now())
    }

    #[tokio::test]
    async fn test_issue_code_upserts_six_digit_code() {
        let mut store = MockTestCodeStore::new();

        store
            .expect_upsert()
            .withf(|record| {
                record.user_id == UserId(1)
                    && record.email == "g@uf.edu"
                    && record.code.len() == 6
                    && record.code.chars().all(|c| c.is_ascii_digit())
            })
            .times(1)
            .returning(|_| Ok(()));

        let manager = VerificationCodeManager::new(Arc::new(store));

        let code = manager.issue_code(UserId(1), "g@uf.edu").await.unwrap();
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_check_code_no_active_code() {
        let mut store = MockTestCodeStore::new();
        store.expect_fetch().times(1).returning(|_| Ok(None));

        let manager = VerificationCodeManager::new(Arc::new(store));

        let outcome = manager.check_code(UserId(1), "482913").await.unwrap();
        assert_eq!(outcome, CodeCheck::NoActiveCode);
    }

    #[tokio::test]
    async fn test_check_code_expired_deletes_stale_row() {
        let mut store = MockTestCodeStore::new();

        store.expect_fetch().times(1).returning(|user_id| {
            let mut record = live_record(user_id, "111111");
            record.expires_at = Utc::now() - Duration::seconds(1);
            Ok(Some(record))
        });
        store
            .expect_delete()
            .with(eq(UserId(1)))
            .times(1)
            .returning(|_| Ok(()));

        let manager = VerificationCodeManager::new(Arc::new(store));

        let outcome = manager.check_code(UserId(1), "111111").await.unwrap();
        assert_eq!(outcome, CodeCheck::Expired);
    }

    #[tokio::test]
    async fn test_check_code_expired_cleanup_failure_is_swallowed() {
        let mut store = MockTestCodeStore::new();

        store.expect_fetch().times(1).returning(|user_id| {
            let mut record = live_record(user_id, "111111");
            record.expires_at = Utc::now() - Duration::seconds(1);
            Ok(Some(record))
        });
        store
            .expect_delete()
            .times(1)
            .returning(|_| Err(VerificationError::DatabaseError("down".to_string())));

        let manager = VerificationCodeManager::new(Arc::new(store));

        // The primary outcome was already determined before cleanup
        let outcome = manager.check_code(UserId(1), "111111").await.unwrap();
        assert_eq!(outcome, CodeCheck::Expired);
    }

    #[tokio::test]
    async fn test_check_code_mismatch() {
        let mut store = MockTestCodeStore::new();

        store
            .expect_fetch()
            .times(1)
            .returning(|user_id| Ok(Some(live_record(user_id, "333333"))));

        let manager = VerificationCodeManager::new(Arc::new(store));

        let outcome = manager.check_code(UserId(1), "222222").await.unwrap();
        assert_eq!(outcome, CodeCheck::Mismatch);
    }

    #[tokio::test]
    async fn test_check_code_requires_exact_string_match() {
        let mut store = MockTestCodeStore::new();

        store
            .expect_fetch()
            .times(1)
            .returning(|user_id| Ok(Some(live_record(user_id, "012345"))));

        let manager = VerificationCodeManager::new(Arc::new(store));

        // Unpadded submission of the same number is not a match
        let outcome = manager.check_code(UserId(1), "12345").await.unwrap();
        assert_eq!(outcome, CodeCheck::Mismatch);
    }

    #[tokio::test]
    async fn test_check_code_verified() {
        let mut store = MockTestCodeStore::new();

        store
            .expect_fetch()
            .times(1)
            .returning(|user_id| Ok(Some(live_record(user_id, "482913"))));

        let manager = VerificationCodeManager::new(Arc::new(store));

        let outcome = manager.check_code(UserId(1), "482913").await.unwrap();
        assert_eq!(outcome, CodeCheck::Verified);
    }

    #[tokio::test]
    async fn test_purge_expired_reports_count() {
        let mut store = MockTestCodeStore::new();
        store.expect_delete_expired().times(1).returning(|_| Ok(3));

        let manager = VerificationCodeManager::new(Arc::new(store));

        assert_eq!(manager.purge_expired().await.unwrap(), 3);
    }
}
