//! Helper functions for integration tests

use notification_monitoring::config::AlertConfig;
use notification_monitoring::{FailureEvent, QueueSnapshot};

pub fn create_test_config(webhook_url: &str) -> AlertConfig {
    AlertConfig {
        webhook_url: Some(webhook_url.to_string()),
        failure_threshold: 2,
        backlog_threshold: 3,
        latency_threshold_ms: 100,
    }
}

// duration below the latency threshold so failure scenarios exercise a
// single alert kind
pub fn create_failure_event(reason: &str, queue_depth: u64) -> FailureEvent {
    FailureEvent {
        reason: reason.to_string(),
        job_type: "booking-confirmation".to_string(),
        snapshot: QueueSnapshot { queue_depth },
        duration_ms: 40,
        wait_ms: Some(12),
    }
}
