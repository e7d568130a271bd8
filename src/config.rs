use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 4000;

/// Runtime configuration loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    /// Listen port (from PORT).
    pub port: u16,
    /// Database file path (from OPPTRACK_DB). `None` uses the platform
    /// data directory.
    pub db_path: Option<PathBuf>,
    /// Exact allowed CORS origin (from CORS_ORIGIN). `None` allows any.
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let db_path = std::env::var("OPPTRACK_DB")
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        // "*" means the same as unset: any origin.
        let cors_origin = std::env::var("CORS_ORIGIN")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty() && s != "*");

        Self {
            port,
            db_path,
            cors_origin,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            db_path: None,
            cors_origin: None,
        }
    }
}
