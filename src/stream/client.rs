use super::subscription::OutboundPayload;
use crate::errors::{ClientError, OrError};
use crate::types::{Endpoint, InboundMessage};
use chrono::Utc;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Everything one session needs: where to connect and what to announce.
/// Replaces the per-script endpoint/payload literals.
#[derive(Debug, Clone)]
pub struct StreamConfig {
    pub endpoint: Endpoint,
    pub initial_payload: OutboundPayload,
}

/// Connects to a stream endpoint and announces the configured payload.
/// One connection per `connect` call; there is no reconnect policy, a
/// dropped connection simply ends the session's receive loop.
pub struct StreamClient {
    config: StreamConfig,
}

impl StreamClient {
    pub fn new(config: StreamConfig) -> OrError<StreamClient> {
        if !config.endpoint.is_stream() {
            return Err(ClientError::invalid_configuration(format!(
                "stream endpoint must use ws:// or wss://, got {}",
                config.endpoint
            )));
        }
        Ok(StreamClient { config })
    }

    /// Opens the connection and sends the configured payload. The returned
    /// session has already announced itself and is ready to receive.
    pub async fn connect(&self) -> OrError<StreamSession> {
        let mut session = StreamSession::connect(&self.config.endpoint).await?;
        session.send(&self.config.initial_payload).await?;
        Ok(session)
    }
}

/// A live, exclusively owned handle to one open stream connection.
///
/// The session is single-task: the only suspension points are the connect
/// handshake and the wait for the next inbound message. Dropping the session
/// releases the underlying transport on every exit path.
pub struct StreamSession {
    endpoint: Endpoint,
    writer: SplitSink<WsStream, Message>,
    reader: SplitStream<WsStream>,
    announced: bool,
    closed: bool,
}

impl StreamSession {
    /// Establishes the transport connection. Blocks until the handshake
    /// completes or fails; no timeout is applied.
    pub async fn connect(endpoint: &Endpoint) -> OrError<StreamSession> {
        let (ws_stream, _) = connect_async(endpoint.as_str()).await.map_err(|e| {
            ClientError::connection(endpoint, format!("failed to connect: {}", e))
        })?;
        let (writer, reader) = ws_stream.split();
        Ok(StreamSession {
            endpoint: endpoint.clone(),
            writer,
            reader,
            announced: false,
            closed: false,
        })
    }

    /// Transmits the payload as a single text message.
    ///
    /// At most one payload goes out per connection, before any inbound
    /// message is read; a second call is rejected.
    pub async fn send(&mut self, payload: &OutboundPayload) -> OrError<()> {
        if self.closed {
            return Err(ClientError::transport(&self.endpoint, "session is closed"));
        }
        if self.announced {
            return Err(ClientError::transport(
                &self.endpoint,
                "a payload was already announced on this session",
            ));
        }
        let text = match payload {
            OutboundPayload::Greeting(text) => text.clone(),
            OutboundPayload::Subscribe(filter) => serde_json::to_string(filter).map_err(|e| {
                ClientError::transport(
                    &self.endpoint,
                    format!("failed to serialize subscription filter: {}", e),
                )
            })?,
        };
        self.writer
            .send(Message::Text(text.into()))
            .await
            .map_err(|e| {
                ClientError::transport(&self.endpoint, format!("failed to send payload: {}", e))
            })?;
        self.announced = true;
        Ok(())
    }

    /// Blocks the calling task, handing every inbound text message to
    /// `on_message` in arrival order. Returns `Ok` when the server closes
    /// the stream, `Err` on a broken transport. Either way the session is
    /// closed afterwards and further calls fail.
    ///
    /// Non-text frames carry no subscriber data and are skipped. There is
    /// no heartbeat handling.
    pub async fn receive_loop<F>(&mut self, mut on_message: F) -> OrError<()>
    where
        F: FnMut(InboundMessage),
    {
        if self.closed {
            return Err(ClientError::transport(&self.endpoint, "session is closed"));
        }
        loop {
            match self.reader.next().await {
                Some(Ok(Message::Text(text))) => on_message(text.to_string()),
                Some(Ok(Message::Close(_))) => {
                    self.closed = true;
                    log_closed(&self.endpoint, "close frame from server");
                    return Ok(());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    self.closed = true;
                    return Err(ClientError::transport(
                        &self.endpoint,
                        format!("receive failed: {}", e),
                    ));
                }
                None => {
                    self.closed = true;
                    log_closed(&self.endpoint, "stream ended");
                    return Ok(());
                }
            }
        }
    }

    /// Graceful close. Also implied by dropping the session.
    pub async fn close(&mut self) -> OrError<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.writer.close().await.map_err(|e| {
            ClientError::transport(&self.endpoint, format!("failed to close session: {}", e))
        })
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

fn log_closed(endpoint: &Endpoint, reason: &str) {
    let timestamp = Utc::now().format("%H:%M:%S");
    eprintln!("StreamSession {}: connection to {} closed ({})", timestamp, endpoint, reason);
}
