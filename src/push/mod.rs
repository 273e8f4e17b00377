//! Push-channel client: one WebSocket connection per live session.
//!
//! [`PushClient::connect`] opens the session's channel and spawns a reader
//! loop that parses incoming frames into [`PushEvent`]s. Malformed payloads
//! and unrecognized event types are dropped with a warning; they never kill
//! the loop. There is no automatic reconnect: a broken connection ends the
//! event stream and the owner decides what to do next.

/// Transport abstraction and the WebSocket implementation.
pub mod transport;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::{
    config::ClientConfig,
    dto::push::PushEvent,
    error::PushError,
    push::transport::{Transport, WsTransport},
};

/// Capacity of the event channel between the reader loop and its consumer.
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Handle to a live push connection.
///
/// Dropping the handle aborts the reader loop; [`PushHandle::close`] shuts it
/// down gracefully, closing the socket first.
pub struct PushHandle {
    session_id: String,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl PushHandle {
    /// Session this connection is scoped to.
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Close the connection and wait for the reader loop to finish.
    pub async fn close(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PushHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Factory for push connections.
pub struct PushClient;

impl PushClient {
    /// Open the push channel for `session_id` using the real WebSocket
    /// transport, returning the connection handle and the event stream.
    pub async fn connect(
        config: &ClientConfig,
        session_id: &str,
    ) -> Result<(PushHandle, mpsc::Receiver<PushEvent>), PushError> {
        let url = config.push_url(session_id);
        let transport = WsTransport::connect(&url).await?;
        Ok(Self::start(transport, session_id))
    }

    /// Spawn the reader loop over an already-established transport.
    pub fn start(
        transport: impl Transport,
        session_id: &str,
    ) -> (PushHandle, mpsc::Receiver<PushEvent>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(reader_loop(
            transport,
            event_tx,
            shutdown_rx,
            session_id.to_string(),
        ));

        let handle = PushHandle {
            session_id: session_id.to_string(),
            shutdown: Some(shutdown_tx),
            task: Some(task),
        };
        (handle, event_rx)
    }
}

/// Read frames until the connection closes, forwarding recognized events.
async fn reader_loop(
    mut transport: impl Transport,
    events: mpsc::Sender<PushEvent>,
    mut shutdown: oneshot::Receiver<()>,
    session_id: String,
) {
    loop {
        tokio::select! {
            _ = &mut shutdown => {
                transport.close().await;
                info!(%session_id, "push channel closed by client");
                break;
            }
            incoming = transport.recv() => match incoming {
                Some(Ok(text)) => match serde_json::from_str::<PushEvent>(&text) {
                    Ok(PushEvent::Unknown) => {
                        warn!(%session_id, payload = %text, "dropping unrecognized push event");
                    }
                    Ok(event) => {
                        if events.send(event).await.is_err() {
                            // Consumer is gone; no reason to keep the socket open.
                            transport.close().await;
                            break;
                        }
                    }
                    Err(err) => {
                        warn!(%session_id, error = %err, "dropping malformed push payload");
                    }
                },
                Some(Err(err)) => {
                    warn!(%session_id, error = %err, "push channel error");
                    break;
                }
                None => {
                    info!(%session_id, "push channel closed by server");
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::future::BoxFuture;

    use super::*;

    /// In-memory transport fed from the test body.
    struct ChannelTransport {
        incoming: mpsc::UnboundedReceiver<Result<String, PushError>>,
        closed: std::sync::Arc<std::sync::atomic::AtomicBool>,
    }

    impl ChannelTransport {
        fn new() -> (
            Self,
            mpsc::UnboundedSender<Result<String, PushError>>,
            std::sync::Arc<std::sync::atomic::AtomicBool>,
        ) {
            let (tx, rx) = mpsc::unbounded_channel();
            let closed = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
            (
                Self {
                    incoming: rx,
                    closed: std::sync::Arc::clone(&closed),
                },
                tx,
                closed,
            )
        }
    }

    impl Transport for ChannelTransport {
        fn send(&mut self, _text: String) -> BoxFuture<'_, Result<(), PushError>> {
            Box::pin(async { Ok(()) })
        }

        fn recv(&mut self) -> BoxFuture<'_, Option<Result<String, PushError>>> {
            Box::pin(async { self.incoming.recv().await })
        }

        fn close(&mut self) -> BoxFuture<'_, ()> {
            self.closed
                .store(true, std::sync::atomic::Ordering::SeqCst);
            Box::pin(async {})
        }
    }

    #[tokio::test]
    async fn forwards_recognized_events() {
        let (transport, frames, _closed) = ChannelTransport::new();
        let (_handle, mut events) = PushClient::start(transport, "s-1");

        frames
            .send(Ok(
                r#"{"type":"participant_joined","user_id":"u-1","name":"Alice"}"#.into(),
            ))
            .unwrap();

        let event = events.recv().await.unwrap();
        assert_eq!(
            event,
            PushEvent::ParticipantJoined {
                user_id: "u-1".into(),
                name: "Alice".into(),
            }
        );
    }

    #[tokio::test]
    async fn survives_malformed_and_unknown_payloads() {
        let (transport, frames, _closed) = ChannelTransport::new();
        let (_handle, mut events) = PushClient::start(transport, "s-1");

        frames.send(Ok("not json".into())).unwrap();
        frames
            .send(Ok(r#"{"type":"mystery_event"}"#.into()))
            .unwrap();
        frames.send(Ok(r#"{"type":"quiz_started"}"#.into())).unwrap();

        // Only the valid event comes through; the loop is still alive.
        let event = events.recv().await.unwrap();
        assert_eq!(event, PushEvent::QuizStarted);
    }

    #[tokio::test]
    async fn close_tears_down_the_connection() {
        let (transport, _frames, closed) = ChannelTransport::new();
        let (handle, mut events) = PushClient::start(transport, "s-1");

        handle.close().await;

        assert!(closed.load(std::sync::atomic::Ordering::SeqCst));
        assert!(events.recv().await.is_none());
    }

    #[tokio::test]
    async fn server_close_ends_the_stream() {
        let (transport, frames, _closed) = ChannelTransport::new();
        let (_handle, mut events) = PushClient::start(transport, "s-1");

        drop(frames);
        assert!(events.recv().await.is_none());
    }
}
