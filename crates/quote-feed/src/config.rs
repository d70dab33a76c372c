use std::time::Duration;

/// Feed tuning knobs, read once from the environment and passed by reference.
/// Defaults match free-tier provider limits.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Maximum entries held by the quote cache.
    pub cache_capacity: usize,
    /// Minimum spacing between outbound calls to any one provider.
    pub min_call_interval: Duration,
    /// Per-request HTTP timeout for each provider.
    pub http_timeout: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            cache_capacity: 1000,
            min_call_interval: Duration::from_millis(100),
            http_timeout: Duration::from_secs(10),
        }
    }
}

impl FeedConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_capacity: env_parse("TICKERDESK_CACHE_CAPACITY")
                .unwrap_or(defaults.cache_capacity),
            min_call_interval: env_parse("TICKERDESK_MIN_CALL_INTERVAL_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.min_call_interval),
            http_timeout: env_parse("TICKERDESK_HTTP_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.http_timeout),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
