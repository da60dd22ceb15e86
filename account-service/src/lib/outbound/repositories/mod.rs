pub mod account;
pub mod session;
pub mod verification_code;

pub use account::PostgresCredentialStore;
pub use session::PostgresSessionStore;
pub use verification_code::PostgresVerificationCodeStore;
