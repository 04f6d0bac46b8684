use super::core::messages::{ClientMessage, ServerMessage};
use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Context for a WebSocket connection, tracking the session it plays
pub struct ConnectionContext {
    pub session_id: Option<String>,
}

impl ConnectionContext {
    pub fn new() -> Self {
        Self { session_id: None }
    }
}

impl Default for ConnectionContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait for handling WebSocket messages and disconnections.
pub trait ConnectionHandler: Send + Sync + 'static {
    /// Handle an incoming client message
    fn handle_message(
        self: Arc<Self>,
        msg: ClientMessage,
        tx: broadcast::Sender<ServerMessage>,
        ctx: &mut ConnectionContext,
    ) -> impl Future<Output = ()> + Send;

    /// The client left; tear its session down
    fn handle_disconnect(&self, session_id: &str);

    /// Name for logging purposes
    fn name(&self) -> &'static str;
}

/// Run a WebSocket connection with the given handler.
/// Splits the socket, pumps outgoing messages from a broadcast channel and
/// dispatches incoming ones until either side closes.
pub async fn run_connection<H: ConnectionHandler>(socket: WebSocket, handler: Arc<H>) {
    info!("New {} WebSocket connection", handler.name());
    let (mut sender, receiver) = socket.split();
    let (tx, mut rx) = broadcast::channel::<ServerMessage>(64);

    // Task to send messages from the broadcast channel to the WebSocket
    let mut send_task = tokio::spawn(async move {
        loop {
            let msg = match rx.recv().await {
                Ok(msg) => msg,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Client fell behind, dropping messages");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            };
            debug!(?msg, "Sending message to client");
            let Ok(json) = serde_json::to_string(&msg) else {
                continue;
            };
            if sender.send(Message::Text(json)).await.is_err() {
                break;
            }
        }
    });

    let mut ctx = ConnectionContext::new();

    // Wait for either side to finish
    tokio::select! {
        _ = &mut send_task => {},
        _ = receive_loop(receiver, tx, handler.clone(), &mut ctx) => {},
    }
    send_task.abort();

    if let Some(session_id) = ctx.session_id.take() {
        handler.handle_disconnect(&session_id);
    }

    info!("{} WebSocket connection closed", handler.name());
}

async fn receive_loop<H: ConnectionHandler>(
    mut receiver: futures_util::stream::SplitStream<WebSocket>,
    tx: broadcast::Sender<ServerMessage>,
    handler: Arc<H>,
    ctx: &mut ConnectionContext,
) {
    while let Some(Ok(msg)) = receiver.next().await {
        let Message::Text(text) = msg else {
            debug!("Received non-text message, ignoring");
            continue;
        };

        debug!(raw = %text, "Received message");

        let Ok(client_msg) = serde_json::from_str::<ClientMessage>(&text) else {
            warn!(raw = %text, "Failed to parse client message");
            let _ = tx.send(ServerMessage::Error {
                message: "Unrecognized message".to_string(),
            });
            continue;
        };

        handler.clone().handle_message(client_msg, tx.clone(), ctx).await;
    }
}
