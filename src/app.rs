//! Application assembly: stores from settings, the lifecycle service, module
//! registration, and the serve/migrate entry points.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use shelf_db::{CatalogStore, DbPool, MemoryCatalog, PgCatalog};
use shelf_kernel::settings::{DatabaseBackend, Settings, StorageBackend};
use shelf_kernel::{InitCtx, ModuleRegistry};
use shelf_storage::{AssetStore, MemoryAssets, S3Assets, S3Config};

use crate::modules::{
    self,
    books::{Actor, BookService},
};

pub struct App {
    settings: Settings,
    registry: ModuleRegistry,
    pool: Option<DbPool>,
}

impl App {
    /// Connect the configured backends and register all modules
    pub async fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let mut pool = None;
        let catalog: Arc<dyn CatalogStore> = match settings.database.backend {
            DatabaseBackend::Memory => {
                tracing::warn!("using in-memory catalog; records are lost on restart");
                Arc::new(MemoryCatalog::new())
            }
            DatabaseBackend::Postgres => {
                let db = shelf_db::create_pool(
                    &settings.database.url,
                    settings.database.max_connections,
                )
                .await
                .context("failed to connect to PostgreSQL")?;
                shelf_db::health_check(&db)
                    .await
                    .context("database health check failed")?;
                tracing::info!("database connection pool created");
                pool = Some(db.clone());
                Arc::new(PgCatalog::new(db))
            }
        };

        let assets: Arc<dyn AssetStore> = match settings.storage.backend {
            StorageBackend::Memory => {
                tracing::warn!("using in-memory asset store; images are lost on restart");
                Arc::new(MemoryAssets::with_base_url(
                    settings.storage.public_base_url.clone(),
                    settings.storage.bucket.clone(),
                ))
            }
            StorageBackend::S3 => {
                let storage = &settings.storage;
                Arc::new(
                    S3Assets::new(S3Config {
                        bucket: storage.bucket.clone(),
                        region: storage.region.clone(),
                        endpoint_url: storage.endpoint_url.clone(),
                        access_key_id: storage.access_key_id.clone(),
                        secret_access_key: storage.secret_access_key.clone(),
                        public_base_url: storage.public_base_url.clone(),
                    })
                    .await,
                )
            }
        };

        let mut app = Self::with_stores(settings, catalog, assets)?;
        app.pool = pool;
        Ok(app)
    }

    /// Assemble the application around already-built stores
    pub fn with_stores(
        settings: Settings,
        catalog: Arc<dyn CatalogStore>,
        assets: Arc<dyn AssetStore>,
    ) -> anyhow::Result<Self> {
        let actor = Actor::new(settings.catalog.actor.clone());
        let service = Arc::new(BookService::new(catalog, assets, actor));

        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, service)?;

        Ok(Self {
            settings,
            registry,
            pool: None,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn router(&self) -> Router {
        shelf_http::build_router(&self.registry, &self.settings)
    }

    /// Apply pending module migrations. A no-op for the in-memory catalog.
    pub async fn migrate(&self) -> anyhow::Result<usize> {
        let Some(pool) = &self.pool else {
            tracing::info!("in-memory catalog configured; no migrations to run");
            return Ok(0);
        };

        let migrations = self.registry.collect_migrations();
        let applied = shelf_db::run_migrations(pool, &migrations).await?;
        tracing::info!(applied, total = migrations.len(), "database migrations complete");
        Ok(applied)
    }

    /// Run the full lifecycle: init, migrate, start, serve until shutdown,
    /// stop.
    pub async fn serve(self) -> anyhow::Result<()> {
        let ctx = InitCtx {
            settings: &self.settings,
        };

        self.registry.init_modules(&ctx).await?;
        self.migrate().await?;
        self.registry.start_modules(&ctx).await?;

        let served = shelf_http::start_server(&self.registry, &self.settings).await;
        let stopped = self.registry.stop_modules().await;

        served?;
        stopped
    }
}
