//! WebSocket transport for sessions

use crate::protocol::{InboundFrame, OutboundFrame};
use crate::session::{Connection, ConnectionError};
use async_trait::async_trait;
use axum::extract::ws::{Message, WebSocket};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;

/// A [`Connection`] over an upgraded WebSocket
///
/// Reading happens on a separate task so keep-alives are answered while a
/// turn is running. Frames arriving mid-turn wait in a bounded queue; once it
/// is full, new frames are dropped.
pub struct WebSocketConnection {
    sink: SplitSink<WebSocket, Message>,
    inbound: mpsc::Receiver<InboundFrame>,
    reader: JoinHandle<()>,
}

impl WebSocketConnection {
    pub fn new(socket: WebSocket, session_id: String, queue: usize) -> Self {
        let (sink, mut stream) = socket.split();
        let (tx, inbound) = mpsc::channel(queue.max(1));

        let reader = tokio::spawn(async move {
            while let Some(message) = stream.next().await {
                let frame = match message {
                    Ok(Message::Binary(data)) => InboundFrame::Binary(data),
                    Ok(Message::Text(text)) => InboundFrame::Text(text),
                    // The socket answers pings on its own
                    Ok(Message::Ping(_)) => continue,
                    Ok(Message::Pong(_)) => InboundFrame::Other {
                        kind: "pong".to_string(),
                    },
                    Ok(Message::Close(_)) => break,
                    Err(e) => {
                        tracing::debug!(session_id = %session_id, error = %e, "WebSocket read failed");
                        break;
                    }
                };

                match tx.try_send(frame) {
                    Ok(()) => {}
                    Err(TrySendError::Full(frame)) => {
                        tracing::warn!(
                            session_id = %session_id,
                            kind = frame.kind(),
                            "Inbound queue full; dropping frame"
                        );
                    }
                    Err(TrySendError::Closed(_)) => break,
                }
            }
        });

        Self {
            sink,
            inbound,
            reader,
        }
    }
}

#[async_trait]
impl Connection for WebSocketConnection {
    async fn recv(&mut self) -> Option<InboundFrame> {
        self.inbound.recv().await
    }

    async fn send(&mut self, frame: &OutboundFrame) -> Result<(), ConnectionError> {
        let json = frame.to_json()?;
        self.sink
            .send(Message::Text(json))
            .await
            .map_err(|e| ConnectionError::Send(e.to_string()))
    }
}

impl Drop for WebSocketConnection {
    fn drop(&mut self) {
        self.reader.abort();
    }
}
