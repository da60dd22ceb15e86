use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::account::models::UserId;

/// Fixed session lifetime. Sessions carry an absolute expiry and are never
/// renewed; a new login creates a new session record.
pub const SESSION_TTL_HOURS: i64 = 24;

/// Session entity.
///
/// An opaque high-entropy token bound to one user with an absolute expiry.
/// Multiple concurrent sessions per user are permitted; old sessions are not
/// revoked when a new one is issued.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Create a session expiring a fixed interval after `now`.
    pub fn new(token: String, user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            token,
            user_id,
            expires_at: now + Duration::hours(SESSION_TTL_HOURS),
        }
    }

    /// A session is valid until `now` is strictly past its expiry. The same
    /// inequality governs verification codes.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at >= now
    }
}
