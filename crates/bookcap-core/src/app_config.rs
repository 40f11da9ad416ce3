use std::path::PathBuf;

/// Runtime configuration for the capture tooling, loaded from env vars.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Ingestion endpoint that receives capture records as JSON POSTs.
    pub api_url: String,
    pub log_level: String,
    /// Per-request timeout for page fetches and capture submissions.
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Additional attempts after the first failure for transient errors.
    pub max_retries: u32,
    /// Base delay for exponential backoff: `base * 2^attempt` seconds.
    pub retry_backoff_base_secs: u64,
    /// Maximum captures per UTC day before the limiter refuses.
    pub daily_capture_limit: u32,
    /// Where the daily capture counter is persisted between invocations.
    pub limit_state_path: PathBuf,
}
