use crate::errors::ServerError;
use std::net::SocketAddr;
use url::Url;

/// Startup configuration, read once from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the barangay backend API, e.g. "http://localhost:8000/api".
    pub backend_base_url: Url,
    pub bind_addr: SocketAddr,
    /// Path of the SQLite file holding per-browser UI preferences.
    pub prefs_db_path: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ServerError> {
        let raw_base = std::env::var("BACKEND_BASE_URL").map_err(|_| {
            ServerError::BadRequest("BACKEND_BASE_URL environment variable not set".into())
        })?;

        let backend_base_url = Url::parse(raw_base.trim_end_matches('/')).map_err(|e| {
            ServerError::BadRequest(format!("BACKEND_BASE_URL is not a valid URL: {e}"))
        })?;

        let bind_addr = std::env::var("BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
            .parse()
            .map_err(|e| ServerError::BadRequest(format!("BIND_ADDR is not a valid address: {e}")))?;

        let prefs_db_path =
            std::env::var("PREFS_DB").unwrap_or_else(|_| "portal_prefs.sqlite3".to_string());

        Ok(Self {
            backend_base_url,
            bind_addr,
            prefs_db_path,
        })
    }
}
