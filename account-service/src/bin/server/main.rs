use std::sync::Arc;
use std::time::Duration;

use account_service::config::Config;
use account_service::domain::account::ports::AccountServicePort;
use account_service::domain::account::service::AccountService;
use account_service::domain::session::service::SessionIssuer;
use account_service::domain::verification::service::VerificationCodeManager;
use account_service::inbound::http::router::create_router;
use account_service::outbound::email::SmtpEmailSender;
use account_service::outbound::repositories::PostgresCredentialStore;
use account_service::outbound::repositories::PostgresSessionStore;
use account_service::outbound::repositories::PostgresVerificationCodeStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// How often the expired-code sweep runs, independent of request checks.
const PURGE_INTERVAL_SECS: u64 = 60;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "account_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "account-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        smtp_host = %config.smtp.host,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    tracing::info!(
        max_connections = 5,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    let credential_store = Arc::new(PostgresCredentialStore::new(pg_pool.clone()));
    let session_store = Arc::new(PostgresSessionStore::new(pg_pool.clone()));
    let code_store = Arc::new(PostgresVerificationCodeStore::new(pg_pool));

    let session_issuer = Arc::new(SessionIssuer::new(session_store));
    let verification_manager = Arc::new(VerificationCodeManager::new(code_store));
    let email_sender = Arc::new(SmtpEmailSender::new(&config.smtp)?);

    let account_service = Arc::new(AccountService::new(
        credential_store,
        session_issuer,
        verification_manager,
        email_sender,
    ));

    // Housekeeping sweep for expired verification codes
    let sweeper = Arc::clone(&account_service);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(PURGE_INTERVAL_SECS));
        loop {
            interval.tick().await;
            match sweeper.purge_expired_codes().await {
                Ok(0) => {}
                Ok(count) => {
                    tracing::info!(count, "Purged expired verification codes");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Expired code purge failed");
                }
            }
        }
    });

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(account_service);
    axum::serve(http_listener, http_application).await?;

    Ok(())
}
