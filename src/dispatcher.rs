use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use tracing::{error, info, instrument, warn};

/// The three independent alert kinds the service can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    FailureSpike,
    BacklogGrowing,
    LatencySpike,
}

impl AlertKind {
    /// Stable wire name used in the webhook payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::FailureSpike => "failure_spike",
            AlertKind::BacklogGrowing => "backlog_growing",
            AlertKind::LatencySpike => "latency_spike",
        }
    }
}

/// A fully-formed alert on its way out. Built by the service, consumed by
/// the dispatcher, never stored.
#[derive(Debug, Clone)]
pub struct OutboundAlert {
    pub kind: AlertKind,
    pub message: String,
    pub context: Value,
}

/// Outbound HTTP seam.
///
/// The service always talks to the webhook through this trait so tests can
/// substitute a recording transport and never touch the network.
#[async_trait]
pub trait WebhookTransport: Send + Sync {
    /// POST `payload` as JSON to `url`, returning the response status code.
    async fn post_json(&self, url: &str, payload: &Value) -> anyhow::Result<u16>;
}

/// Production transport backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

// a hung webhook endpoint must not pile up in-flight requests
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WebhookTransport for HttpTransport {
    async fn post_json(&self, url: &str, payload: &Value) -> anyhow::Result<u16> {
        let response = self.client.post(url).json(payload).send().await?;
        Ok(response.status().as_u16())
    }
}

/// Delivers alerts to the configured webhook.
///
/// Delivery is best-effort by contract: failures are logged and swallowed,
/// never surfaced to the pipeline that triggered the alert.
pub struct WebhookDispatcher {
    webhook_url: Option<String>,
    transport: Arc<dyn WebhookTransport>,
}

impl WebhookDispatcher {
    pub fn new(webhook_url: Option<String>, transport: Arc<dyn WebhookTransport>) -> Self {
        Self {
            webhook_url,
            transport,
        }
    }

    #[instrument(skip(self, alert), fields(kind = alert.kind.as_str()))]
    pub async fn dispatch(&self, alert: &OutboundAlert) {
        let Some(url) = &self.webhook_url else {
            warn!("no webhook url configured, dropping alert: {}", alert.message);
            return;
        };

        let payload = json!({
            "kind": alert.kind.as_str(),
            "message": alert.message,
            "context": alert.context,
            "timestamp": Utc::now().to_rfc3339(),
        });

        match self.transport.post_json(url, &payload).await {
            Ok(status) if (200..300).contains(&status) => {
                info!("successfully sent alert webhook");
            }
            Ok(status) => {
                error!("alert webhook failed with status: {status}");
            }
            Err(e) => {
                error!("failed to send alert webhook: {e}");
            }
        }
    }
}
