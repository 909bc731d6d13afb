use std::sync::Arc;

use crate::auth::JwtKeys;
use crate::config::AppConfig;
use crate::database::Store;

/// Everything a handler needs, built once at startup and cloned per request.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: Arc<AppConfig>,
    pub keys: JwtKeys,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
        let keys = JwtKeys::from_config(&config.security);
        Self {
            store,
            config: Arc::new(config),
            keys,
        }
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.config.security.bcrypt_cost
    }
}
