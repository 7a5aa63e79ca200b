use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_STATIC_DIR: &str = "frontend/dist";
const DEFAULT_WIKIPEDIA_BASE_URL: &str = "https://en.wikipedia.org";
const DEFAULT_SEARCH_BASE_URL: &str = "https://lite.duckduckgo.com";
const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 15;

/// Server settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    /// Directory holding the built widget (`index.html` + wasm bundle).
    pub static_dir: PathBuf,
    pub wikipedia_base_url: String,
    pub search_base_url: String,
    /// Upper bound for each outbound lookup request.
    pub lookup_timeout: Duration,
    /// Allow cross-origin calls to `/chat`, e.g. from `trunk serve`.
    pub cors_permissive: bool,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);
        let static_dir = lookup("STATIC_DIR")
            .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string())
            .into();
        let wikipedia_base_url = lookup("WIKIPEDIA_BASE_URL")
            .unwrap_or_else(|| DEFAULT_WIKIPEDIA_BASE_URL.to_string());
        let search_base_url = lookup("SEARCH_BASE_URL")
            .unwrap_or_else(|| DEFAULT_SEARCH_BASE_URL.to_string());
        let lookup_timeout = lookup("LOOKUP_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_LOOKUP_TIMEOUT_SECS));
        let cors_permissive = lookup("CORS_PERMISSIVE")
            .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Self {
            port,
            static_dir,
            wikipedia_base_url,
            search_base_url,
            lookup_timeout,
            cors_permissive,
        }
    }
}
