//! # livepet-database
//!
//! Store traits for share grants and owner health data, their PostgreSQL
//! implementations, and a process-local store used for development and
//! tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

use std::sync::Arc;

use tracing::info;

use livepet_core::config::database::{DatabaseConfig, StoreProvider};
use livepet_core::result::AppResult;

pub use connection::DatabasePool;
pub use memory::MemoryStore;
pub use store::{HealthStore, ShareStore};

/// The store handles shared by every service.
#[derive(Clone)]
pub struct Stores {
    /// Grants and access logs.
    pub shares: Arc<dyn ShareStore>,
    /// Pets and health data.
    pub health: Arc<dyn HealthStore>,
    /// Present only for the PostgreSQL provider.
    pub pool: Option<DatabasePool>,
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores")
            .field("pool", &self.pool)
            .finish_non_exhaustive()
    }
}

impl Stores {
    /// Open the stores named by `database.provider`.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider {
            StoreProvider::Postgres => {
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    migration::run_migrations(pool.pool()).await?;
                }
                Ok(Self::postgres(pool))
            }
            StoreProvider::Memory => {
                info!("Using in-memory store; data will not survive a restart");
                Ok(Self::memory(MemoryStore::new()))
            }
        }
    }

    /// Stores backed by PostgreSQL repositories.
    pub fn postgres(pool: DatabasePool) -> Self {
        Self {
            shares: Arc::new(repositories::ShareRepository::new(pool.pool().clone())),
            health: Arc::new(repositories::HealthRepository::new(pool.pool().clone())),
            pool: Some(pool),
        }
    }

    /// Stores backed by a single in-memory store.
    pub fn memory(store: MemoryStore) -> Self {
        Self {
            shares: Arc::new(store.clone()),
            health: Arc::new(store),
            pool: None,
        }
    }

    /// Check the backing store is reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }
}
