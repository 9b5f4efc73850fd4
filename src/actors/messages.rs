//! Message types for the alert actor

use tokio::sync::oneshot;

use crate::service::AlertStateSnapshot;
use crate::{FailureEvent, LatencySample, QueueDepthEvent};

/// Event published by the job pipeline for every relevant occurrence.
///
/// Broadcast to all interested subscribers. The channel may lag for slow
/// subscribers - alerting tolerates gaps, the pipeline must never block on
/// its observers.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// A notification job failed to deliver
    DeliveryFailed(FailureEvent),

    /// The pending backlog was sampled
    QueueDepthSampled(QueueDepthEvent),

    /// A delivery duration was observed
    LatencySampled(LatencySample),
}

/// Commands that can be sent to the AlertActor
#[derive(Debug)]
pub enum AlertCommand {
    /// Get the current alert state
    GetState {
        respond_to: oneshot::Sender<AlertStateSnapshot>,
    },

    /// Stop processing pipeline events
    ///
    /// Useful for maintenance windows.
    MuteAlerts,

    /// Resume processing pipeline events
    UnmuteAlerts,

    /// Reset the alert state and shut the actor down
    Shutdown,
}
