use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::account::models::UserId;

/// Fixed verification code lifetime.
pub const CODE_TTL_SECONDS: i64 = 180;

/// Width of the zero-padded decimal code.
pub const CODE_DIGITS: usize = 6;

/// Pending verification code entity.
///
/// At most one row exists per user at any time; issuing a new code replaces
/// the previous one, invalidating it immediately regardless of its own
/// expiry. The code is a fixed-width zero-padded decimal string compared
/// byte-for-byte, so "012345" and "12345" are distinct submissions.
#[derive(Debug, Clone)]
pub struct VerificationCode {
    pub user_id: UserId,
    pub email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl VerificationCode {
    /// Create a code record expiring a fixed interval after `now`.
    pub fn new(user_id: UserId, email: String, code: String, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            email,
            code,
            expires_at: now + Duration::seconds(CODE_TTL_SECONDS),
        }
    }

    /// A code is expired once `now` is strictly past its expiry. The same
    /// inequality is used by the check path and the housekeeping sweep.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Outcome of checking a submitted code against the pending record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCheck {
    /// Exact string match while unexpired.
    Verified,
    /// No pending code exists for the user.
    NoActiveCode,
    /// A code existed but its expiry has passed; the stale row is removed.
    Expired,
    /// A live code exists but does not equal the submitted value.
    Mismatch,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_expiry_is_3_minutes() {
        let now = Utc::now();
        let code = VerificationCode::new(UserId(1), "g@uf.edu".to_string(), "482913".to_string(), now);
        assert_eq!(code.expires_at, now + Duration::seconds(180));
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let code = VerificationCode::new(UserId(1), "g@uf.edu".to_string(), "482913".to_string(), now);

        assert!(!code.is_expired_at(code.expires_at - Duration::seconds(1)));
        // Strict now > expiry: the expiry instant itself is still live
        assert!(!code.is_expired_at(code.expires_at));
        assert!(code.is_expired_at(code.expires_at + Duration::seconds(1)));
    }
}
