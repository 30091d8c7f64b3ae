use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;

use crate::config::AppConfig;
use crate::store::{MemoryStore, PgStore, Store};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Connects to Postgres using configuration from the environment.
    ///
    /// Returns the raw pool too so the caller can run migrations.
    pub async fn init() -> anyhow::Result<(Self, sqlx::PgPool)> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let store = Arc::new(PgStore::new(db.clone())) as Arc<dyn Store>;
        Ok((Self { store, config }, db))
    }

    /// In-memory store with the fixed test configuration.
    pub fn fake() -> Self {
        let store = Arc::new(MemoryStore::default()) as Arc<dyn Store>;
        Self {
            store,
            config: Arc::new(AppConfig::for_tests()),
        }
    }
}
