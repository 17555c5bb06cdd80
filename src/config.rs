#[derive(Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub record_store_url: String,
    pub record_store_timeout_ms: u64,
    pub tick_interval_secs: u64,
    pub proposal_ttl_secs: i64,
    pub tie_break_seed: Option<u64>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            record_store_url: std::env::var("RECORD_STORE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            record_store_timeout_ms: std::env::var("RECORD_STORE_TIMEOUT_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2500),
            tick_interval_secs: std::env::var("TICK_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            proposal_ttl_secs: std::env::var("PROPOSAL_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(600),
            tie_break_seed: std::env::var("TIE_BREAK_SEED").ok().and_then(|s| s.parse().ok()),
        }
    }
}
