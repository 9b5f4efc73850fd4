use tracing::warn;

const WEBHOOK_URL: &str = "NOTIFICATION_ALERT_WEBHOOK_URL";

const FAILURE_THRESHOLD: &str = "NOTIFICATION_ALERT_FAILURE_THRESHOLD";

const DEFAULT_FAILURE_THRESHOLD: u64 = 2;

const BACKLOG_THRESHOLD: &str = "NOTIFICATION_ALERT_BACKLOG_THRESHOLD";

const DEFAULT_BACKLOG_THRESHOLD: u64 = 3;

const LATENCY_THRESHOLD_MS: &str = "NOTIFICATION_ALERT_LATENCY_THRESHOLD_MS";

const DEFAULT_LATENCY_THRESHOLD_MS: u64 = 100;

/// Alerting thresholds and the outbound webhook endpoint.
///
/// Immutable after construction. Resolution never fails: a missing or
/// invalid environment value falls back to the documented default, so the
/// monitoring subsystem can never keep the host process from starting.
#[derive(Debug, Clone)]
pub struct AlertConfig {
    /// Webhook endpoint for outbound alerts. When unset, alerts are
    /// logged and dropped instead of posted.
    pub webhook_url: Option<String>,

    /// Failure count at which a failure-spike alert fires.
    pub failure_threshold: u64,

    /// Queue depth above which a backlog alert fires.
    pub backlog_threshold: u64,

    /// Delivery latency in milliseconds above which a latency alert fires.
    pub latency_threshold_ms: u64,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            backlog_threshold: DEFAULT_BACKLOG_THRESHOLD,
            latency_threshold_ms: DEFAULT_LATENCY_THRESHOLD_MS,
        }
    }
}

impl AlertConfig {
    /// Resolve the configuration from environment variables, once.
    pub fn from_env() -> Self {
        Self {
            webhook_url: std::env::var(WEBHOOK_URL).ok().filter(|url| !url.is_empty()),
            failure_threshold: threshold_from_env(FAILURE_THRESHOLD, DEFAULT_FAILURE_THRESHOLD),
            backlog_threshold: threshold_from_env(BACKLOG_THRESHOLD, DEFAULT_BACKLOG_THRESHOLD),
            latency_threshold_ms: threshold_from_env(
                LATENCY_THRESHOLD_MS,
                DEFAULT_LATENCY_THRESHOLD_MS,
            ),
        }
    }
}

// thresholds must be positive integers; anything else falls back
fn threshold_from_env(name: &str, default: u64) -> u64 {
    let Ok(raw) = std::env::var(name) else {
        return default;
    };

    match raw.parse::<u64>() {
        Ok(value) if value > 0 => value,
        _ => {
            warn!("invalid value {raw:?} for {name}, falling back to {default}");
            default
        }
    }
}
