//! End-to-end pipeline tests: broadcast events through the actor into the
//! real HTTP transport against a mock webhook receiver.

use notification_monitoring::NotificationAlertService;
use notification_monitoring::actors::alert::AlertHandle;
use notification_monitoring::actors::messages::PipelineEvent;
use notification_monitoring::QueueDepthEvent;
use tokio::sync::broadcast;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::helpers::*;

#[tokio::test]
async fn failure_spike_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("Notification failures spiking"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = NotificationAlertService::new(create_test_config(&mock_server.uri()));
    let (event_tx, event_rx) = broadcast::channel(256);
    let handle = AlertHandle::spawn(service, event_rx);

    event_tx
        .send(PipelineEvent::DeliveryFailed(create_failure_event(
            "smtp timeout",
            10,
        )))
        .unwrap();
    event_tx
        .send(PipelineEvent::DeliveryFailed(create_failure_event(
            "smtp timeout",
            12,
        )))
        .unwrap();

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    let state = handle.get_state().await.unwrap();
    assert_eq!(state.failure_count, 2);
    assert!(state.failure_alerted);
    assert!(state.last_failure_alert.is_some());
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);

    handle.shutdown().await;
}

#[tokio::test]
async fn backlog_growth_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("Notification backlog growing"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = NotificationAlertService::new(create_test_config(&mock_server.uri()));
    let (event_tx, event_rx) = broadcast::channel(256);
    let handle = AlertHandle::spawn(service, event_rx);

    for depth in [1, 2, 4, 5] {
        event_tx
            .send(PipelineEvent::QueueDepthSampled(QueueDepthEvent { depth }))
            .unwrap();
    }

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    let state = handle.get_state().await.unwrap();
    assert_eq!(state.last_queue_depth, Some(5));
    assert!(state.backlog_alerted);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);

    handle.shutdown().await;
}

#[tokio::test]
async fn actor_survives_broadcast_lag() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let service = NotificationAlertService::new(create_test_config(&mock_server.uri()));

    // tiny buffer so the publisher overruns the actor
    let (event_tx, event_rx) = broadcast::channel(2);
    let handle = AlertHandle::spawn(service, event_rx);

    for depth in 0..32 {
        let _ = event_tx.send(PipelineEvent::QueueDepthSampled(QueueDepthEvent { depth }));
    }

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    // lag skipped events but the actor is still alive and answering
    assert!(handle.get_state().await.is_some());

    handle.shutdown().await;
}

#[tokio::test]
async fn latency_samples_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_string_contains("Notification latency spiking"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service = NotificationAlertService::new(create_test_config(&mock_server.uri()));
    let (event_tx, event_rx) = broadcast::channel(16);
    let handle = AlertHandle::spawn(service, event_rx);

    for duration_ms in [80, 250, 300] {
        event_tx
            .send(PipelineEvent::LatencySampled(
                notification_monitoring::LatencySample { duration_ms },
            ))
            .unwrap();
    }

    tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

    let state = handle.get_state().await.unwrap();
    assert!(state.latency_alerted);
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);

    handle.shutdown().await;
}
