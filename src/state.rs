//! Application context handed to every handler through `web::Data`.

use std::sync::Arc;

use crate::config::Config;
use crate::store::Repository;

/// Built once at startup; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn Repository>,
    config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Repository>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    pub fn store(&self) -> &dyn Repository {
        self.store.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
