// ── Polling coordinator ──
//
// Owns the poll schedule and the current Snapshot. One coordinator per
// configured device; the host scheduler (here: one background task)
// serializes refreshes. The snapshot is replaced wholesale through a
// watch channel, so readers never observe a partial update.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use aeromon_api::DeviceClient;

use crate::convert::snapshot_from_data;
use crate::error::CoreError;
use crate::model::Snapshot;

/// Result of the most recent poll, observed by entities.
#[derive(Debug, Clone, Default)]
pub struct PollState {
    /// Last known good snapshot. Retained across failed polls.
    pub snapshot: Option<Arc<Snapshot>>,
    /// Whether the most recent poll succeeded.
    pub last_update_success: bool,
}

/// Fetches device state on demand and publishes it to subscribers.
#[derive(Debug)]
pub struct Coordinator {
    client: DeviceClient,
    request_timeout: Duration,
    state: watch::Sender<PollState>,
}

impl Coordinator {
    pub fn new(client: DeviceClient, request_timeout: Duration) -> Self {
        let (state, _) = watch::channel(PollState::default());
        Self {
            client,
            request_timeout,
            state,
        }
    }

    /// The current poll state (snapshot + success flag).
    pub fn state(&self) -> PollState {
        self.state.borrow().clone()
    }

    /// Subscribe to poll state changes.
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state.subscribe()
    }

    /// Issue one poll.
    ///
    /// On success the new snapshot replaces the previous one atomically.
    /// On any transport error, non-2xx response, or timeout, the previous
    /// snapshot is retained, the success flag is cleared, and the cause
    /// is returned as [`CoreError::PollFailed`].
    pub async fn refresh(&self) -> Result<Arc<Snapshot>, CoreError> {
        let outcome = tokio::time::timeout(self.request_timeout, self.client.data()).await;

        let data = match outcome {
            Ok(Ok(data)) => data,
            Ok(Err(err)) => return Err(self.mark_failed(err.to_string())),
            Err(_) => {
                let reason = format!(
                    "request timed out after {}s",
                    self.request_timeout.as_secs()
                );
                return Err(self.mark_failed(reason));
            }
        };

        let snapshot = Arc::new(snapshot_from_data(data));
        self.state.send_modify(|state| {
            state.snapshot = Some(Arc::clone(&snapshot));
            state.last_update_success = true;
        });
        debug!(readings = snapshot.len(), "poll complete");
        Ok(snapshot)
    }

    fn mark_failed(&self, reason: String) -> CoreError {
        self.state
            .send_modify(|state| state.last_update_success = false);
        CoreError::PollFailed { reason }
    }
}

/// Periodically refresh until cancelled.
///
/// The first tick is consumed -- setup performs the eager initial
/// refresh before this task starts. Failures are logged and retried on
/// the next interval.
pub(crate) async fn refresh_task(
    coordinator: Arc<Coordinator>,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(err) = coordinator.refresh().await {
                    warn!(error = %err, "periodic refresh failed");
                }
            }
        }
    }
    debug!("refresh task stopped");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn coordinator_for(server: &MockServer) -> Coordinator {
        let client = DeviceClient::from_reqwest(&server.uri(), reqwest::Client::new()).unwrap();
        Coordinator::new(client, Duration::from_secs(10))
    }

    fn data_body(temperature: &str) -> serde_json::Value {
        json!({
            "software_version": "NAMF-2020-36",
            "sensordatavalues": [
                { "value_type": "BME280_temperature", "value": temperature },
            ]
        })
    }

    #[tokio::test]
    async fn refresh_publishes_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(data_body("22.73")))
            .mount(&server)
            .await;

        let coordinator = coordinator_for(&server);
        let snapshot = coordinator.refresh().await.unwrap();

        assert_eq!(snapshot.reading("BME280_temperature"), Some(22.73));

        let state = coordinator.state();
        assert!(state.last_update_success);
        assert_eq!(
            state.snapshot.unwrap().reading("BME280_temperature"),
            Some(22.73)
        );
    }

    #[tokio::test]
    async fn identical_polls_are_idempotent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(data_body("22.73")))
            .mount(&server)
            .await;

        let coordinator = coordinator_for(&server);
        let first = coordinator.refresh().await.unwrap();
        let second = coordinator.refresh().await.unwrap();

        assert_eq!(
            first.reading("BME280_temperature"),
            second.reading("BME280_temperature")
        );
    }

    #[tokio::test]
    async fn failed_poll_retains_previous_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(data_body("22.73")))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let coordinator = coordinator_for(&server);
        coordinator.refresh().await.unwrap();

        let err = coordinator.refresh().await.unwrap_err();
        assert!(matches!(err, CoreError::PollFailed { .. }));

        let state = coordinator.state();
        assert!(!state.last_update_success);
        // Stale data is still there for when the device comes back.
        assert_eq!(
            state.snapshot.unwrap().reading("BME280_temperature"),
            Some(22.73)
        );
    }

    #[tokio::test]
    async fn subscriber_sees_state_transitions() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(data_body("19.1")))
            .mount(&server)
            .await;

        let coordinator = coordinator_for(&server);
        let mut rx = coordinator.subscribe();
        assert!(!rx.borrow().last_update_success);

        coordinator.refresh().await.unwrap();
        rx.changed().await.unwrap();
        assert!(rx.borrow().last_update_success);
    }
}
