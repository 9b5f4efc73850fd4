//! Actor wiring for the alert service
//!
//! The job pipeline publishes delivery events on a broadcast channel; the
//! alert actor subscribes and feeds them into one
//! [`crate::NotificationAlertService`].
//!
//! ```text
//! job pipeline ──► Broadcast Channel (PipelineEvent)
//!                          │ subscribe
//!                  ┌───────▼────────┐
//!                  │   AlertActor   │──► webhook
//!                  └───────▲────────┘
//!                          │ mpsc
//!                  AlertHandle commands
//!                  (GetState, Mute, Unmute, Shutdown)
//! ```
//!
//! ## Communication Patterns
//!
//! 1. **Commands**: the actor has an mpsc command channel for control
//!    messages, with oneshot channels for request/response queries
//! 2. **Events**: the pipeline's broadcast channel fans out to the actor
//!    (and any other subscriber); lag drops events rather than blocking
//!    the pipeline

pub mod alert;
pub mod messages;
