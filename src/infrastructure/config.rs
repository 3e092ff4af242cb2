use std::env;
use std::path::PathBuf;

/// Request bodies up to this size reach the form handlers, so oversized
/// images are reported as validation errors rather than cut off by axum.
const DEFAULT_MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub uploads_dir: PathBuf,
    pub max_body_bytes: usize,
    pub cors_allowed_origins: Vec<String>,
    pub seed_demo: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite://bookstore.db?mode=rwc".to_string(),
            port: 8000,
            uploads_dir: PathBuf::from("wwwroot/uploads/books"),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            cors_allowed_origins: Vec::new(),
            seed_demo: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            uploads_dir: env::var("UPLOADS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.uploads_dir),
            max_body_bytes: env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_body_bytes),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_default(),
            seed_demo: env::var("SEED_DEMO").is_ok(),
        }
    }
}
