use std::sync::Arc;

use crate::config::AppConfig;
use crate::remote::{HttpRemote, MemoryRemote, RemoteService};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub remote: Arc<dyn RemoteService>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);
        let remote = Arc::new(HttpRemote::new(&config.backend_url, &config.backend_key))
            as Arc<dyn RemoteService>;
        Ok(Self { config, remote })
    }

    pub fn from_parts(config: Arc<AppConfig>, remote: Arc<dyn RemoteService>) -> Self {
        Self { config, remote }
    }

    /// State wired to the in-memory backend; nothing leaves the process.
    pub fn fake() -> Self {
        Self::fake_with(Arc::new(MemoryRemote::new()))
    }

    /// Same as `fake()`, but keeps the caller's handle on the remote so
    /// tests can assert on stored rows and objects.
    pub fn fake_with(remote: Arc<dyn RemoteService>) -> Self {
        let config = Arc::new(AppConfig {
            backend_url: "https://fake.local".into(),
            backend_key: "test".into(),
            storage_bucket: "food_bk".into(),
        });
        Self { config, remote }
    }
}
