//! Playback notification sidecar
//!
//! Reports each playback to the tracker service from a detached task. The
//! stream never waits for it and never sees its result: failures are logged
//! and dropped.

use async_trait::async_trait;
use sfk_common::PlaybackEvent;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("sfk-streaming/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Notification failures (never leave the sidecar task)
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Could not reach the tracker
    #[error("Network error: {0}")]
    Network(String),

    /// Tracker answered with something other than 201 Created
    #[error("Unexpected status {0} from tracker")]
    UnexpectedStatus(u16),
}

/// Destination of playback events
#[async_trait]
pub trait PlaybackReporter: Send + Sync {
    async fn report(&self, event: &PlaybackEvent) -> Result<(), NotifyError>;
}

/// Tracker client over HTTP: `POST {idUsuario, titulo}`, expects 201
pub struct HttpPlaybackReporter {
    http_client: reqwest::Client,
    endpoint: String,
}

impl HttpPlaybackReporter {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, NotifyError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PlaybackReporter for HttpPlaybackReporter {
    async fn report(&self, event: &PlaybackEvent) -> Result<(), NotifyError> {
        debug!(url = %self.endpoint, user_id = event.user_id, title = %event.title, "Posting playback");

        let response = self
            .http_client
            .post(&self.endpoint)
            .json(event)
            .send()
            .await
            .map_err(|e| NotifyError::Network(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::CREATED {
            return Err(NotifyError::UnexpectedStatus(status.as_u16()));
        }

        Ok(())
    }
}

/// Fire-and-forget launcher for playback notifications
#[derive(Clone)]
pub struct NotificationSidecar {
    reporter: Arc<dyn PlaybackReporter>,
}

impl NotificationSidecar {
    pub fn new(reporter: Arc<dyn PlaybackReporter>) -> Self {
        Self { reporter }
    }

    /// Report a playback in the background
    ///
    /// Spawns a task that owns its copy of the event and the reporter handle.
    /// The task is not joined, cancelled or observed, and may outlive the
    /// stream that triggered it. Must be called from within a tokio runtime.
    pub fn notify(&self, user_id: u32, title: String) {
        let reporter = Arc::clone(&self.reporter);
        let event = PlaybackEvent::new(user_id, title);

        tokio::spawn(async move {
            match reporter.report(&event).await {
                Ok(()) => info!(
                    user_id = event.user_id,
                    title = %event.title,
                    "Playback reported to tracker"
                ),
                Err(e) => warn!(
                    user_id = event.user_id,
                    title = %event.title,
                    "Playback notification failed: {}",
                    e
                ),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    struct ChannelReporter {
        tx: mpsc::UnboundedSender<PlaybackEvent>,
        fail: bool,
    }

    #[async_trait]
    impl PlaybackReporter for ChannelReporter {
        async fn report(&self, event: &PlaybackEvent) -> Result<(), NotifyError> {
            let _ = self.tx.send(event.clone());
            if self.fail {
                Err(NotifyError::UnexpectedStatus(500))
            } else {
                Ok(())
            }
        }
    }

    #[tokio::test]
    async fn test_notify_reports_once_in_background() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sidecar = NotificationSidecar::new(Arc::new(ChannelReporter { tx, fail: false }));

        sidecar.notify(7, "Tren al Sur".to_string());

        let event = rx.recv().await.unwrap();
        assert_eq!(event, PlaybackEvent::new(7, "Tren al Sur"));
        drop(sidecar);
        assert!(rx.recv().await.is_none(), "exactly one report");
    }

    #[tokio::test]
    async fn test_notify_swallows_failures() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sidecar = NotificationSidecar::new(Arc::new(ChannelReporter { tx, fail: true }));

        // Returns immediately and does not panic even though the report fails
        sidecar.notify(1, "Flaca".to_string());
        assert_eq!(rx.recv().await.unwrap().title, "Flaca");
    }

    #[tokio::test]
    async fn test_http_reporter_connection_refused() {
        // Grab a free port, then close it so nothing listens there
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let reporter = HttpPlaybackReporter::new(format!("http://{}/reproducciones", addr)).unwrap();
        let result = reporter.report(&PlaybackEvent::new(1, "Flaca")).await;
        assert!(matches!(result, Err(NotifyError::Network(_))));
    }
}
