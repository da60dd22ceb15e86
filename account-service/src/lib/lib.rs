pub mod config;
pub mod domain;
pub mod inbound;
pub mod outbound;

pub use domain::account;
pub use domain::session;
pub use domain::verification;
pub use outbound::repositories;
