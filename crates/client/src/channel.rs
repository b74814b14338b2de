//! Lifecycle of the persistent push connection.
//!
//! One `ChannelManager` owns at most one live websocket, scoped to the
//! notifications namespace by its URL path. There is no automatic
//! reconnection: when the socket drops, the state becomes `Disconnected`
//! and stays there until the owner calls `connect` again.

use std::sync::Arc;
use std::time::Duration;

use campushub_shared::{ChannelError, RawEvent, WsEnvelope};
use futures_util::StreamExt;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::connect_async;

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Connectivity of the push channel. There is no intermediate state: an
/// in-flight handshake reads as `Disconnected` until it succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connected,
}

impl ConnectionState {
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

pub type EventCallback = Arc<dyn Fn(RawEvent) + Send + Sync>;

struct ChannelSession {
    user_id: String,
    shutdown: Arc<Notify>,
    task: JoinHandle<()>,
}

/// Owns the websocket connection for one mounted notification center.
pub struct ChannelManager {
    endpoint: String,
    on_event: EventCallback,
    state_tx: watch::Sender<ConnectionState>,
    session: Option<ChannelSession>,
}

impl ChannelManager {
    /// `endpoint` is the full websocket URL of the notifications namespace,
    /// e.g. `wss://lms.example.edu/ws/notifications`. Every parsed inbound
    /// event is handed to `on_event`.
    pub fn new(
        endpoint: impl Into<String>,
        on_event: impl Fn(RawEvent) + Send + Sync + 'static,
    ) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Disconnected);
        Self {
            endpoint: endpoint.into(),
            on_event: Arc::new(on_event),
            state_tx,
            session: None,
        }
    }

    /// Open the channel with the given bearer token.
    ///
    /// An existing connection is torn down first, so a token rotation or a
    /// user change can never leave two live sockets. On failure or timeout
    /// the state remains `Disconnected` and the error is returned.
    pub async fn connect(&mut self, token: &str, user_id: &str) -> Result<(), ChannelError> {
        if token.is_empty() {
            return Err(ChannelError::MissingToken);
        }

        self.disconnect().await;

        let mut request = self
            .endpoint
            .clone()
            .into_client_request()
            .map_err(|e| ChannelError::InvalidUrl(e.to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|e| ChannelError::Handshake(e.to_string()))?;
        request.headers_mut().insert(AUTHORIZATION, bearer);

        let ws = match tokio::time::timeout(HANDSHAKE_TIMEOUT, connect_async(request)).await {
            Ok(Ok((ws, _response))) => ws,
            Ok(Err(e)) => return Err(ChannelError::Handshake(e.to_string())),
            Err(_) => return Err(ChannelError::Handshake("handshake timed out".to_string())),
        };

        tracing::info!(endpoint = %self.endpoint, %user_id, "notification channel connected");
        self.state_tx.send_replace(ConnectionState::Connected);

        let shutdown = Arc::new(Notify::new());
        let task = spawn_read_loop(
            ws,
            self.on_event.clone(),
            self.state_tx.clone(),
            shutdown.clone(),
        );

        self.session = Some(ChannelSession {
            user_id: user_id.to_string(),
            shutdown,
            task,
        });
        Ok(())
    }

    /// Close the channel. Idempotent; always leaves `Disconnected`.
    pub async fn disconnect(&mut self) {
        if let Some(session) = self.session.take() {
            session.shutdown.notify_one();
            let mut task = session.task;
            if tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut task).await.is_err() {
                task.abort();
            }
        }
        self.state_tx.send_replace(ConnectionState::Disconnected);
    }

    /// Subscribe to connection-state changes (for a status indicator).
    pub fn state(&self) -> watch::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }

    pub fn is_connected(&self) -> bool {
        self.state_tx.borrow().is_connected()
    }

    /// Identity the current connection was opened for, if any.
    pub fn connected_user(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.user_id.as_str())
    }
}

fn spawn_read_loop(
    mut ws: tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >,
    on_event: EventCallback,
    state_tx: watch::Sender<ConnectionState>,
    shutdown: Arc<Notify>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = shutdown.notified() => {
                    let _ = ws.close(None).await;
                    break;
                }
                msg = ws.next() => match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<WsEnvelope<RawEvent>>(&text) {
                            Ok(envelope) => on_event(envelope.payload),
                            Err(e) => tracing::warn!("dropping unparseable frame: {}", e),
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        tracing::info!("notification channel received close frame");
                        break;
                    }
                    // Pong replies are handled by the transport.
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!("notification channel read error: {}", e);
                        break;
                    }
                    None => break,
                }
            }
        }
        state_tx.send_replace(ConnectionState::Disconnected);
    })
}
