//! AlertActor - feeds pipeline events into the alert service
//!
//! The actor owns one [`NotificationAlertService`] and runs until a
//! `Shutdown` command arrives or the pipeline channel closes. All alerting
//! logic lives in the service; the actor only routes events and commands,
//! so everything stays testable through directly-constructed services.

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, instrument, warn};

use crate::NotificationAlertService;
use crate::service::AlertStateSnapshot;

use super::messages::{AlertCommand, PipelineEvent};

/// Actor that evaluates pipeline events and sends alerts
pub struct AlertActor {
    /// The service holding all alert state and dispatch logic
    service: NotificationAlertService,

    /// Command receiver
    command_rx: mpsc::Receiver<AlertCommand>,

    /// Pipeline event receiver (broadcast subscription)
    event_rx: broadcast::Receiver<PipelineEvent>,

    /// Whether alerts are muted
    muted: bool,
}

impl AlertActor {
    /// Create a new alert actor
    pub fn new(
        service: NotificationAlertService,
        command_rx: mpsc::Receiver<AlertCommand>,
        event_rx: broadcast::Receiver<PipelineEvent>,
    ) -> Self {
        Self {
            service,
            command_rx,
            event_rx,
            muted: false,
        }
    }

    /// Run the actor's main loop
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        debug!("starting alert actor");

        loop {
            tokio::select! {
                // Receive pipeline events
                result = self.event_rx.recv() => {
                    match result {
                        Ok(event) => {
                            if !self.muted {
                                self.handle_pipeline_event(event).await;
                            }
                        }
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            warn!("alert actor lagged, skipped {skipped} pipeline events");
                        }
                        Err(broadcast::error::RecvError::Closed) => {
                            warn!("pipeline channel closed, shutting down");
                            break;
                        }
                    }
                }

                // Handle commands
                Some(cmd) = self.command_rx.recv() => {
                    match cmd {
                        AlertCommand::GetState { respond_to } => {
                            let _ = respond_to.send(self.service.snapshot());
                        }

                        AlertCommand::MuteAlerts => {
                            debug!("muting alerts");
                            self.muted = true;
                        }

                        AlertCommand::UnmuteAlerts => {
                            debug!("unmuting alerts");
                            self.muted = false;
                        }

                        AlertCommand::Shutdown => {
                            debug!("received shutdown command");
                            self.service.shutdown();
                            break;
                        }
                    }
                }

                // Command channel closed
                else => {
                    warn!("command channel closed, shutting down");
                    break;
                }
            }
        }

        debug!("alert actor stopped");
    }

    async fn handle_pipeline_event(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::DeliveryFailed(event) => self.service.handle_failed(event).await,
            PipelineEvent::QueueDepthSampled(event) => {
                self.service.handle_queue_depth(event).await
            }
            PipelineEvent::LatencySampled(sample) => self.service.handle_latency(sample).await,
        }
    }
}

/// Handle for controlling the AlertActor
#[derive(Clone)]
pub struct AlertHandle {
    sender: mpsc::Sender<AlertCommand>,
}

impl AlertHandle {
    /// Spawn a new alert actor around `service`
    ///
    /// # Arguments
    /// - `service`: the alert service the actor will drive
    /// - `event_rx`: broadcast receiver for pipeline events
    pub fn spawn(
        service: NotificationAlertService,
        event_rx: broadcast::Receiver<PipelineEvent>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel(32);

        let actor = AlertActor::new(service, cmd_rx, event_rx);
        tokio::spawn(actor.run());

        Self { sender: cmd_tx }
    }

    /// Get the current alert state
    pub async fn get_state(&self) -> Option<AlertStateSnapshot> {
        let (tx, rx) = tokio::sync::oneshot::channel();
        self.sender
            .send(AlertCommand::GetState { respond_to: tx })
            .await
            .ok()?;

        rx.await.ok()
    }

    /// Mute alerts
    pub async fn mute_alerts(&self) {
        let _ = self.sender.send(AlertCommand::MuteAlerts).await;
    }

    /// Unmute alerts
    pub async fn unmute_alerts(&self) {
        let _ = self.sender.send(AlertCommand::UnmuteAlerts).await;
    }

    /// Shutdown the alert actor
    pub async fn shutdown(&self) {
        let _ = self.sender.send(AlertCommand::Shutdown).await;
    }
}
