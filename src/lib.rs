pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod store;

use std::sync::Arc;

use crate::config::{Config, StoreBackend};
use crate::database::pool::{create_pool, run_migrations};
use crate::error::{Error, Result};
use crate::middleware::auth::AuthKeys;
use crate::services::interview_service::InterviewService;
use crate::store::{DocumentStore, MemoryDocumentStore, PgDocumentStore};

#[derive(Clone)]
pub struct AppState {
    pub interview_service: InterviewService,
    pub auth: AuthKeys,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, jwt_secret: &str) -> Self {
        Self {
            interview_service: InterviewService::new(store),
            auth: AuthKeys::new(jwt_secret),
        }
    }

    /// Connects the configured store backend, running migrations for Postgres.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store: Arc<dyn DocumentStore> = match config.store_backend {
            StoreBackend::Postgres => {
                let database_url = config.database_url.as_deref().ok_or_else(|| {
                    Error::Config("DATABASE_URL is required for the postgres store".to_string())
                })?;
                let pool = create_pool(database_url, config.db_max_connections).await?;
                run_migrations(&pool).await?;
                tracing::info!("connected to postgres document store");
                Arc::new(PgDocumentStore::new(pool))
            }
            StoreBackend::Memory => {
                tracing::warn!("using in-memory document store, data is lost on restart");
                Arc::new(MemoryDocumentStore::new())
            }
        };

        Ok(Self::new(store, &config.jwt_secret))
    }
}
