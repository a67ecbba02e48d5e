//! Progress broadcaster for real-time client updates.

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::ProgressEvent;

/// Keep-alive interval for SSE connections.
const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(15);

/// Fans progress events out to all subscribed SSE clients.
#[derive(Clone)]
pub struct ProgressBroadcaster {
    tx: broadcast::Sender<ProgressEvent>,
}

impl ProgressBroadcaster {
    /// Create a new broadcaster.
    ///
    /// `capacity` is the number of events buffered per lagging client.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Broadcast an event, ignoring whether any client is connected.
    pub fn broadcast_lossy(&self, event: ProgressEvent) {
        match self.tx.send(event) {
            Ok(count) => debug!("Broadcast progress event to {} clients", count),
            Err(_) => debug!("No progress subscribers, event dropped"),
        }
    }

    /// Subscribe to raw progress events.
    pub fn subscribe(&self) -> broadcast::Receiver<ProgressEvent> {
        self.tx.subscribe()
    }

    /// Get current number of connected clients.
    pub fn client_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Create an SSE stream for a new client connection.
    pub fn subscribe_stream(&self) -> impl Stream<Item = Result<Event, Infallible>> {
        let rx = self.tx.subscribe();
        let stream = BroadcastStream::new(rx);

        stream.filter_map(|result| async move {
            match result {
                Ok(progress) => {
                    let event = Event::default()
                        .event(progress.event_name())
                        .id(Uuid::new_v4().to_string())
                        .json_data(&progress)
                        .ok();
                    event.map(Ok)
                }
                Err(e) => {
                    // BroadcastStream wraps RecvError (client lagged), just log and continue
                    warn!("SSE client error: {:?}", e);
                    None
                }
            }
        })
    }

    /// Create the Axum SSE response for a new client.
    pub fn handle_sse_connection(&self) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
        info!(
            "New SSE client connected, total clients: {}",
            self.client_count() + 1
        );

        Sse::new(self.subscribe_stream()).keep_alive(
            KeepAlive::new()
                .interval(KEEP_ALIVE_INTERVAL)
                .text("keep-alive"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let broadcaster = ProgressBroadcaster::new(16);
        let mut rx = broadcaster.subscribe();

        broadcaster.broadcast_lossy(ProgressEvent::upload_started(2));

        let event = rx.recv().await.unwrap();
        assert!(matches!(event, ProgressEvent::UploadStarted { total: 2, .. }));
    }

    #[tokio::test]
    async fn test_broadcast_without_subscribers_is_ok() {
        let broadcaster = ProgressBroadcaster::new(16);
        // Must not panic or error
        broadcaster.broadcast_lossy(ProgressEvent::upload_completed(1, 1, 0));
    }

    #[tokio::test]
    async fn test_fan_out_to_multiple_subscribers() {
        let broadcaster = ProgressBroadcaster::new(16);
        let mut rx1 = broadcaster.subscribe();
        let mut rx2 = broadcaster.subscribe();
        assert_eq!(broadcaster.client_count(), 2);

        broadcaster.broadcast_lossy(ProgressEvent::file_failed("x.png", 0, 1, "boom"));

        for rx in [&mut rx1, &mut rx2] {
            let event = rx.recv().await.unwrap();
            assert_eq!(event.event_name(), "file_failed");
        }
    }

    #[tokio::test]
    async fn test_sse_stream_yields_events() {
        let broadcaster = ProgressBroadcaster::new(16);
        let mut stream = Box::pin(broadcaster.subscribe_stream());

        broadcaster.broadcast_lossy(ProgressEvent::upload_started(1));

        let item = stream.next().await;
        assert!(matches!(item, Some(Ok(_))));
    }
}
