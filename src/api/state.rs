//! Shared application state handed to every handler.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Database;
use crate::services::{Integrations, ServiceContainer, Services};

#[derive(Clone)]
pub struct AppState {
    pub services: Arc<dyn ServiceContainer>,
    /// Present when running against a real database; used by `/health`
    pub database: Option<Arc<Database>>,
}

impl AppState {
    /// Production state: per-request services over `database` plus the
    /// configured outbound integrations.
    pub async fn from_config(database: Arc<Database>, config: Config) -> AppResult<Self> {
        let integrations = Integrations::from_config(&config).await?;
        let services = Services::new(database.get_connection(), config, integrations);

        Ok(Self {
            services: Arc::new(services),
            database: Some(database),
        })
    }

    /// State over an arbitrary container, without a database handle.
    pub fn new(services: Arc<dyn ServiceContainer>) -> Self {
        Self {
            services,
            database: None,
        }
    }
}
