use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::account::models::UserId;
use crate::verification::errors::VerificationError;
use crate::verification::models::VerificationCode;
use crate::verification::ports::VerificationCodeStore;

pub struct PostgresVerificationCodeStore {
    pool: PgPool,
}

impl PostgresVerificationCodeStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CodeRow {
    user_id: i64,
    email: String,
    code: String,
    expires_at: DateTime<Utc>,
}

impl From<CodeRow> for VerificationCode {
    fn from(row: CodeRow) -> Self {
        VerificationCode {
            user_id: UserId(row.user_id),
            email: row.email,
            code: row.code,
            expires_at: row.expires_at,
        }
    }
}

#[async_trait]
impl VerificationCodeStore for PostgresVerificationCodeStore {
    async fn upsert(&self, code: VerificationCode) -> Result<(), VerificationError> {
        // Single conflict-resolving write keyed by user id; concurrent
        // issues race and the last write wins.
        sqlx::query(
            r#"
            INSERT INTO verification_codes (user_id, email, code, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id)
            DO UPDATE SET
                email = EXCLUDED.email,
                code = EXCLUDED.code,
                expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(code.user_id.0)
        .bind(&code.email)
        .bind(&code.code)
        .bind(code.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| VerificationError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn fetch(&self, user_id: UserId) -> Result<Option<VerificationCode>, VerificationError> {
        let row = sqlx::query_as::<_, CodeRow>(
            r#"
            SELECT user_id, email, code, expires_at
            FROM verification_codes
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| VerificationError::DatabaseError(e.to_string()))?;

        Ok(row.map(VerificationCode::from))
    }

    async fn delete(&self, user_id: UserId) -> Result<(), VerificationError> {
        sqlx::query(
            r#"
            DELETE FROM verification_codes
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| VerificationError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, VerificationError> {
        let result = sqlx::query(
            r#"
            DELETE FROM verification_codes
            WHERE expires_at < $1
            "#,
        )
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| VerificationError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
