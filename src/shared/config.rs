//! Application configuration. Backend URL, user identity, paths.
//!
//! Sources, lowest precedence first: optional file named by `COACH_CONFIG`,
//! then `COACH_*` environment variables (a `.env` file is loaded first).

use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_USER_ID: &str = "anonymous";
pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Coaching backend base URL. Unset means the offline mock. Read from COACH_API_URL.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Identity sent with every request and stored with history. Read from COACH_USER_ID.
    #[serde(default)]
    pub user_id: Option<String>,

    /// Directory for history.json. Read from COACH_DATA_DIR.
    #[serde(default)]
    pub data_dir: Option<String>,

    /// Per-request timeout in seconds. Read from COACH_REQUEST_TIMEOUT_SECS.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Seed for fallback selection; unset uses entropy. Read from COACH_RNG_SEED.
    #[serde(default)]
    pub rng_seed: Option<u64>,

    /// Entries shown by the history view. Read from COACH_HISTORY_LIMIT.
    #[serde(default)]
    pub history_limit: Option<usize>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        if let Ok(path) = std::env::var("COACH_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c = c.add_source(config::Environment::with_prefix("COACH").try_parsing(true));
        c.build()?.try_deserialize()
    }

    /// Backend URL, if one is configured and non-blank.
    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref().map(str::trim).filter(|u| !u.is_empty())
    }

    /// Returns true if a real backend is configured.
    pub fn is_backend_configured(&self) -> bool {
        self.api_url().is_some()
    }

    pub fn user_id_or_default(&self) -> String {
        self.user_id
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .unwrap_or(DEFAULT_USER_ID)
            .to_string()
    }

    pub fn data_dir_or_default(&self) -> PathBuf {
        PathBuf::from(self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR))
    }

    /// History file inside the data directory.
    pub fn history_path(&self) -> PathBuf {
        self.data_dir_or_default().join("history.json")
    }

    /// Returns request timeout. Defaults to 60s; zero is treated as unset.
    pub fn request_timeout_or_default(&self) -> Duration {
        let secs = self
            .request_timeout_secs
            .filter(|&s| s > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        Duration::from_secs(secs)
    }

    pub fn history_limit_or_default(&self) -> usize {
        self.history_limit
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
    }
}
