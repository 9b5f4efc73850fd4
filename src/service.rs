//! NotificationAlertService - monitors delivery health and raises alerts
//!
//! The service owns the accumulated alert state for one notification
//! pipeline: a running failure counter, the last sampled backlog depth,
//! and one breach flag per alert kind.
//!
//! ## Ordering invariant
//!
//! Every handler mutates counters and commits the alert decision
//! synchronously under the state lock, and releases the lock *before*
//! awaiting the outbound webhook call. Overlapping handler calls can
//! therefore never double-fire a crossing or all skip it, and the lock is
//! never held across an `await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, instrument, trace};

use crate::{
    FailureEvent, LatencySample, QueueDepthEvent,
    config::AlertConfig,
    dispatcher::{AlertKind, HttpTransport, OutboundAlert, WebhookDispatcher, WebhookTransport},
    evaluator::BreachEvaluation,
};

/// Breach bookkeeping for a single alert kind.
#[derive(Debug, Clone, Copy, Default)]
struct BreachState {
    alerted: bool,
    last_alert_at: Option<DateTime<Utc>>,
}

impl BreachState {
    fn trip(&mut self) {
        self.alerted = true;
        self.last_alert_at = Some(Utc::now());
    }

    fn rearm(&mut self) {
        self.alerted = false;
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Breaches {
    failures: BreachState,
    backlog: BreachState,
    latency: BreachState,
}

/// Mutable alert state, created at construction and cleared by `shutdown`.
#[derive(Debug, Default)]
struct AlertState {
    failure_count: u64,
    last_queue_depth: Option<u64>,
    breaches: Breaches,
}

/// Read-only view of the current alert state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertStateSnapshot {
    /// Failures seen since construction or the last reset
    pub failure_count: u64,

    /// Most recent backlog sample, if any
    pub last_queue_depth: Option<u64>,

    /// Whether each kind is currently in a breach episode
    pub failure_alerted: bool,
    pub backlog_alerted: bool,
    pub latency_alerted: bool,

    /// When each kind last fired
    pub last_failure_alert: Option<DateTime<Utc>>,
    pub last_backlog_alert: Option<DateTime<Utc>>,
    pub last_latency_alert: Option<DateTime<Utc>>,
}

/// Watches notification-delivery health and posts webhook alerts when a
/// configured threshold is crossed.
///
/// Each instance owns its configuration and state outright; nothing is
/// shared between instances. Production wiring constructs exactly one
/// service during bootstrap ([`NotificationAlertService::from_env`]) and
/// hands it to the job pipeline (directly or via
/// [`crate::actors::alert::AlertHandle`]).
pub struct NotificationAlertService {
    config: AlertConfig,
    dispatcher: WebhookDispatcher,
    state: Mutex<AlertState>,
}

impl NotificationAlertService {
    /// Create a service with the production HTTP transport.
    pub fn new(config: AlertConfig) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport::new()))
    }

    /// Bootstrap constructor: resolve configuration from the environment.
    pub fn from_env() -> Self {
        Self::new(AlertConfig::from_env())
    }

    /// Create a service with an injected webhook transport.
    pub fn with_transport(config: AlertConfig, transport: Arc<dyn WebhookTransport>) -> Self {
        let dispatcher = WebhookDispatcher::new(config.webhook_url.clone(), transport);

        Self {
            config,
            dispatcher,
            state: Mutex::new(AlertState::default()),
        }
    }

    /// Record one failed delivery and alert if the failure threshold or
    /// the latency threshold is crossed by it.
    #[instrument(skip(self, event), fields(job_type = %event.job_type))]
    pub async fn handle_failed(&self, event: FailureEvent) {
        let mut alerts = Vec::new();

        {
            let mut state = self.lock_state();
            state.failure_count += 1;

            let evaluation = BreachEvaluation::evaluate(
                state.failure_count >= self.config.failure_threshold,
                state.breaches.failures.alerted,
            );

            trace!(
                "failures {}/{} -> {evaluation:?}",
                state.failure_count, self.config.failure_threshold
            );

            if evaluation == BreachEvaluation::StartsToExceed {
                state.breaches.failures.trip();
                debug!(
                    "notification failures crossed the threshold ({} >= {})",
                    state.failure_count, self.config.failure_threshold
                );
                alerts.push(self.failure_alert(&event, state.failure_count));
            }

            // a failed delivery is also a latency observation
            self.evaluate_latency(&mut state, event.duration_ms, &mut alerts);
        }

        for alert in &alerts {
            self.dispatcher.dispatch(alert).await;
        }
    }

    /// Record a backlog sample and alert if it crosses the depth threshold.
    #[instrument(skip(self))]
    pub async fn handle_queue_depth(&self, event: QueueDepthEvent) {
        let alert = {
            let mut state = self.lock_state();
            state.last_queue_depth = Some(event.depth);

            let evaluation = BreachEvaluation::evaluate(
                event.depth > self.config.backlog_threshold,
                state.breaches.backlog.alerted,
            );

            trace!(
                "backlog {} (max: {}) -> {evaluation:?}",
                event.depth, self.config.backlog_threshold
            );

            match evaluation {
                BreachEvaluation::Ok => None,
                BreachEvaluation::StillExceeding => None,
                BreachEvaluation::StartsToExceed => {
                    state.breaches.backlog.trip();
                    debug!(
                        "notification backlog crossed the threshold ({} > {})",
                        event.depth, self.config.backlog_threshold
                    );
                    Some(self.backlog_alert(event.depth))
                }
                BreachEvaluation::BackToOk => {
                    state.breaches.backlog.rearm();
                    debug!("notification backlog is back to normal");
                    None
                }
            }
        };

        if let Some(alert) = alert {
            self.dispatcher.dispatch(&alert).await;
        }
    }

    /// Record a delivery-latency observation and alert if it crosses the
    /// latency threshold.
    #[instrument(skip(self))]
    pub async fn handle_latency(&self, sample: LatencySample) {
        let mut alerts = Vec::new();

        {
            let mut state = self.lock_state();
            self.evaluate_latency(&mut state, sample.duration_ms, &mut alerts);
        }

        for alert in &alerts {
            self.dispatcher.dispatch(alert).await;
        }
    }

    /// Reset all alert state to initial values.
    ///
    /// Idempotent, safe to call before any handler has run, and the only
    /// way to re-arm the failure counter. Configuration is untouched.
    pub fn shutdown(&self) {
        let mut state = self.lock_state();
        *state = AlertState::default();
        debug!("alert state reset");
    }

    /// Current alert state, for operators and the actor's `GetState`.
    pub fn snapshot(&self) -> AlertStateSnapshot {
        let state = self.lock_state();

        AlertStateSnapshot {
            failure_count: state.failure_count,
            last_queue_depth: state.last_queue_depth,
            failure_alerted: state.breaches.failures.alerted,
            backlog_alerted: state.breaches.backlog.alerted,
            latency_alerted: state.breaches.latency.alerted,
            last_failure_alert: state.breaches.failures.last_alert_at,
            last_backlog_alert: state.breaches.backlog.last_alert_at,
            last_latency_alert: state.breaches.latency.last_alert_at,
        }
    }

    // the state mutex is only ever held for in-memory bookkeeping, so a
    // poisoned lock still carries consistent state
    fn lock_state(&self) -> MutexGuard<'_, AlertState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn evaluate_latency(
        &self,
        state: &mut AlertState,
        duration_ms: u64,
        alerts: &mut Vec<OutboundAlert>,
    ) {
        let evaluation = BreachEvaluation::evaluate(
            duration_ms > self.config.latency_threshold_ms,
            state.breaches.latency.alerted,
        );

        trace!(
            "latency {duration_ms}ms (max: {}ms) -> {evaluation:?}",
            self.config.latency_threshold_ms
        );

        match evaluation {
            BreachEvaluation::Ok => {}
            BreachEvaluation::StillExceeding => {}
            BreachEvaluation::StartsToExceed => {
                state.breaches.latency.trip();
                debug!(
                    "notification latency crossed the threshold ({duration_ms}ms > {}ms)",
                    self.config.latency_threshold_ms
                );
                alerts.push(self.latency_alert(duration_ms));
            }
            BreachEvaluation::BackToOk => {
                state.breaches.latency.rearm();
                debug!("notification latency is back to normal");
            }
        }
    }

    fn failure_alert(&self, event: &FailureEvent, failure_count: u64) -> OutboundAlert {
        let threshold = self.config.failure_threshold;

        let mut message = format!(
            "Notification failures spiking: {failure_count} delivery failures (threshold {threshold}). Last failure: {} ({}), queue depth {}, took {}ms",
            event.reason, event.job_type, event.snapshot.queue_depth, event.duration_ms
        );
        if let Some(wait) = event.wait_ms {
            message.push_str(&format!(" after {wait}ms in queue"));
        }

        OutboundAlert {
            kind: AlertKind::FailureSpike,
            message,
            context: json!({
                "reason": event.reason,
                "job_type": event.job_type,
                "queue_depth": event.snapshot.queue_depth,
                "duration_ms": event.duration_ms,
                "wait_ms": event.wait_ms,
                "failure_count": failure_count,
                "threshold": threshold,
            }),
        }
    }

    fn backlog_alert(&self, depth: u64) -> OutboundAlert {
        let threshold = self.config.backlog_threshold;

        OutboundAlert {
            kind: AlertKind::BacklogGrowing,
            message: format!(
                "Notification backlog growing: {depth} jobs pending (threshold {threshold})"
            ),
            context: json!({
                "depth": depth,
                "threshold": threshold,
            }),
        }
    }

    fn latency_alert(&self, duration_ms: u64) -> OutboundAlert {
        let threshold = self.config.latency_threshold_ms;

        OutboundAlert {
            kind: AlertKind::LatencySpike,
            message: format!(
                "Notification latency spiking: delivery took {duration_ms}ms (threshold {threshold}ms)"
            ),
            context: json!({
                "duration_ms": duration_ms,
                "threshold_ms": threshold,
            }),
        }
    }
}
