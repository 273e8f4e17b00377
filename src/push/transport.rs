use futures::{SinkExt, StreamExt, future::BoxFuture};
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message,
};
use tracing::info;

use crate::error::PushError;

/// Narrow abstraction over a bidirectional text-frame connection.
///
/// The dispatcher loop only ever needs these three operations, which keeps it
/// testable against an in-memory transport.
pub trait Transport: Send + 'static {
    /// Send one text frame to the server.
    fn send(&mut self, text: String) -> BoxFuture<'_, Result<(), PushError>>;
    /// Receive the next text frame; `None` once the peer has closed.
    fn recv(&mut self) -> BoxFuture<'_, Option<Result<String, PushError>>>;
    /// Close the connection.
    fn close(&mut self) -> BoxFuture<'_, ()>;
}

/// WebSocket-backed [`Transport`] used outside of tests.
pub struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl WsTransport {
    /// Open a WebSocket connection to `url`.
    pub async fn connect(url: &str) -> Result<Self, PushError> {
        let (stream, _response) = connect_async(url).await.map_err(PushError::Connect)?;
        info!(%url, "push channel connected");
        Ok(Self { stream })
    }
}

impl Transport for WsTransport {
    fn send(&mut self, text: String) -> BoxFuture<'_, Result<(), PushError>> {
        Box::pin(async move {
            self.stream
                .send(Message::Text(text.into()))
                .await
                .map_err(PushError::Transport)
        })
    }

    fn recv(&mut self) -> BoxFuture<'_, Option<Result<String, PushError>>> {
        Box::pin(async move {
            loop {
                match self.stream.next().await {
                    Some(Ok(Message::Text(text))) => return Some(Ok(text.to_string())),
                    // Ping/pong are handled by tungstenite; binary frames are
                    // not part of the push protocol.
                    Some(Ok(Message::Close(_))) | None => return None,
                    Some(Ok(_)) => continue,
                    Some(Err(err)) => return Some(Err(PushError::Transport(err))),
                }
            }
        })
    }

    fn close(&mut self) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            let _ = self.stream.close(None).await;
        })
    }
}
