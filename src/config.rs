use serde::Deserialize;

/// Connection details for the hosted backend plus the one bucket the app
/// stores images in.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub backend_url: String,
    pub backend_key: String,
    pub storage_bucket: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let backend_url = std::env::var("BACKEND_URL")?;
        let backend_key = std::env::var("BACKEND_ANON_KEY")?;
        let storage_bucket =
            std::env::var("STORAGE_BUCKET").unwrap_or_else(|_| "food_bk".into());
        Ok(Self {
            backend_url: backend_url.trim_end_matches('/').to_string(),
            backend_key,
            storage_bucket,
        })
    }
}
