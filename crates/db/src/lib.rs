//! PostgreSQL connection pool factory for bookshelf.

use std::time::Duration;

use anyhow::Context;
use bookshelf_kernel::settings::DatabaseSettings;
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Open a connection pool and verify the store is reachable.
///
/// The pool connects eagerly, so an unreachable database fails here rather than
/// on the first request.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<PgPool> {
    let redacted = redact_url(&settings.url);
    tracing::info!(
        target: "bookshelf-db",
        url = %redacted,
        max_connections = settings.max_connections,
        "connecting to database"
    );

    let pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(Duration::from_millis(settings.connect_timeout_ms))
        .connect(&settings.url)
        .await
        .with_context(|| format!("unable to connect to database at {redacted}"))?;

    tracing::info!(target: "bookshelf-db", "database connection successful");
    Ok(pool)
}

/// Replace the password of a connection string so it can be logged.
pub fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                // Only fails for cannot-be-a-base URLs, which carry no password.
                let _ = parsed.set_password(Some("***"));
            }
            parsed.to_string()
        }
        Err(_) => "<unparseable connection string>".to_string(),
    }
}
