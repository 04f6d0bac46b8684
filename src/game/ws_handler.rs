use super::core::messages::{ClientMessage, GameKind, ServerMessage};
use super::engine::SessionRegistry;
use super::ws::{ConnectionContext, ConnectionHandler, run_connection};
use axum::extract::ws::WebSocket;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::warn;

/// One game screen: every connection to it plays `kind`
pub struct GameEndpoint {
    kind: GameKind,
    registry: Arc<SessionRegistry>,
}

impl GameEndpoint {
    pub fn new(kind: GameKind, registry: Arc<SessionRegistry>) -> Self {
        Self { kind, registry }
    }
}

fn send_error(tx: &broadcast::Sender<ServerMessage>, message: &str) {
    let _ = tx.send(ServerMessage::Error {
        message: message.to_string(),
    });
}

impl ConnectionHandler for GameEndpoint {
    async fn handle_message(
        self: Arc<Self>,
        msg: ClientMessage,
        tx: broadcast::Sender<ServerMessage>,
        ctx: &mut ConnectionContext,
    ) {
        if let ClientMessage::Join { user_id } = msg {
            if ctx.session_id.is_some() {
                send_error(&tx, "Already joined");
                return;
            }
            let session_id = self.registry.start_session(self.kind, user_id, tx);
            ctx.session_id = Some(session_id);
            return;
        }

        let Some(session_id) = ctx.session_id.as_deref() else {
            warn!(game = self.name(), "Received message before join");
            send_error(&tx, "Join a game first");
            return;
        };

        match msg {
            ClientMessage::Answer { choice } => {
                self.registry.handle_answer(session_id, &choice.to_string());
            }
            ClientMessage::SelectTile { index } => {
                self.registry.handle_select(session_id, index);
            }
            ClientMessage::Restart => {
                self.registry.restart(session_id);
            }
            ClientMessage::Join { .. } => {}
        }
    }

    fn handle_disconnect(&self, session_id: &str) {
        self.registry.end_session(session_id);
    }

    fn name(&self) -> &'static str {
        match self.kind {
            GameKind::Quiz => "quiz",
            GameKind::Memory => "memory",
            GameKind::Combat => "combat",
        }
    }
}

pub async fn handle_connection(socket: WebSocket, kind: GameKind, registry: Arc<SessionRegistry>) {
    run_connection(socket, Arc::new(GameEndpoint::new(kind, registry))).await;
}
