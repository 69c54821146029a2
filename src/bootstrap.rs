//! Wiring from settings to a running server.

use std::sync::Arc;

use anyhow::Context;
use bookshelf_kernel::settings::{DatabaseBackend, DatabaseSettings, Settings};
use bookshelf_kernel::{InitCtx, ModuleRegistry};

use crate::modules::{self, books::store::{BookStore, InMemoryBookStore, PgBookStore}};

/// Open the configured book store. A PostgreSQL store fails here if the
/// database is unreachable.
pub async fn open_store(settings: &DatabaseSettings) -> anyhow::Result<Arc<dyn BookStore>> {
    match settings.backend {
        DatabaseBackend::Postgres => {
            let pool = bookshelf_db::connect(settings).await?;
            Ok(Arc::new(PgBookStore::new(pool)))
        }
        DatabaseBackend::Memory => {
            tracing::warn!("using the in-memory book store; data is lost on shutdown");
            Ok(Arc::new(InMemoryBookStore::new()))
        }
    }
}

/// Build the module registry around an already opened store.
pub fn build_registry(store: Arc<dyn BookStore>, settings: &Settings) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store, settings);
    registry
}

/// Connect, initialize every module, and serve until shutdown.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    tracing::info!(env = ?settings.environment, "bookshelf bootstrap starting");

    let store = open_store(&settings.database).await?;
    let registry = build_registry(store, &settings);
    let ctx = InitCtx {
        settings: &settings,
    };

    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;
    tracing::info!("bookshelf bootstrap complete");

    let served = bookshelf_http::start_server(&registry, &settings).await;
    registry.stop_all().await?;
    served
}

/// Create the books table and exit.
pub async fn migrate(settings: &Settings) -> anyhow::Result<()> {
    let store = open_store(&settings.database).await?;
    store
        .ensure_schema()
        .await
        .context("unable to create books table")?;
    Ok(())
}
