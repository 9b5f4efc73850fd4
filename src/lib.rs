pub mod actors;
pub mod config;
pub mod dispatcher;
pub mod evaluator;
pub mod service;

use serde::{Deserialize, Serialize};

pub use config::AlertConfig;
pub use service::NotificationAlertService;

/// One failed notification delivery, reported by the job pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureEvent {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub job_type: String,
    #[serde(default)]
    pub snapshot: QueueSnapshot,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub wait_ms: Option<u64>,
}

/// Queue state captured at the moment of a failure.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct QueueSnapshot {
    #[serde(default)]
    pub queue_depth: u64,
}

/// Point-in-time sample of the pending notification backlog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QueueDepthEvent {
    #[serde(default)]
    pub depth: u64,
}

/// A single observed delivery duration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LatencySample {
    #[serde(default)]
    pub duration_ms: u64,
}
