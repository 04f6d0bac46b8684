#![allow(dead_code)]

use futures_util::{SinkExt, StreamExt};
use matwise::SessionTiming;
use matwise::messages::{AnswerChoice, ClientMessage, GameKind, ServerMessage};
use sqlx::sqlite::SqlitePoolOptions;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message};

pub type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Clocks slow enough that they never fire during a test
pub const FROZEN: SessionTiming = SessionTiming {
    tick: Duration::from_secs(3600),
    reveal_delay: Duration::from_secs(3600),
};

pub struct TestServer {
    base_url: String,
}

impl TestServer {
    pub fn game_url(&self, kind: GameKind) -> String {
        let path = match kind {
            GameKind::Quiz => "quiz",
            GameKind::Memory => "memory",
            GameKind::Combat => "combat",
        };
        format!("{}/ws/{}", self.base_url, path)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!(
            "http://{}{}",
            self.base_url.strip_prefix("ws://").unwrap(),
            path
        )
    }
}

pub async fn spawn_test_server() -> TestServer {
    spawn_test_server_with_timing(FROZEN).await
}

pub async fn spawn_test_server_with_timing(timing: SessionTiming) -> TestServer {
    // A single long-lived connection keeps the in-memory database alive
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap();
    sqlx::migrate!().run(&pool).await.unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let app = matwise::app_with_config(pool, timing);
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        base_url: format!("ws://{}", addr),
    }
}

pub async fn connect_game(server: &TestServer, kind: GameKind) -> WsStream {
    let (ws, _) = connect_async(&server.game_url(kind))
        .await
        .expect("Failed to connect");
    ws
}

fn to_message(msg: &ClientMessage) -> Message {
    Message::Text(serde_json::to_string(msg).unwrap().into())
}

pub fn join_msg(user_id: &str) -> Message {
    to_message(&ClientMessage::Join {
        user_id: Some(user_id.to_string()),
    })
}

pub fn anonymous_join_msg() -> Message {
    to_message(&ClientMessage::Join { user_id: None })
}

pub fn answer_msg(choice: impl Into<AnswerChoice>) -> Message {
    to_message(&ClientMessage::Answer {
        choice: choice.into(),
    })
}

/// Raw JSON, the way a browser client would send it
pub fn raw_msg(json: &str) -> Message {
    Message::Text(json.to_string().into())
}

pub fn select_msg(index: usize) -> Message {
    to_message(&ClientMessage::SelectTile { index })
}

pub fn restart_msg() -> Message {
    to_message(&ClientMessage::Restart)
}

pub async fn recv(ws: &mut WsStream) -> ServerMessage {
    let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("Timed out waiting for message")
        .unwrap()
        .unwrap();
    serde_json::from_str(msg.to_text().unwrap()).unwrap()
}

/// Skip messages until one satisfies `pred`
pub async fn recv_until(
    ws: &mut WsStream,
    pred: impl Fn(&ServerMessage) -> bool,
) -> ServerMessage {
    loop {
        let msg = recv(ws).await;
        if pred(&msg) {
            return msg;
        }
    }
}

/// Join a game and consume the greeting; returns the session id and first snapshot
pub async fn join(ws: &mut WsStream, user_id: &str) -> (String, ServerMessage) {
    ws.send(join_msg(user_id)).await.unwrap();
    let ServerMessage::Joined { session_id, .. } = recv(ws).await else {
        panic!("expected joined");
    };
    let snapshot = recv(ws).await;
    (session_id, snapshot)
}

/// No message arrives within `wait`
pub async fn assert_silent(ws: &mut WsStream, wait: Duration) {
    if let Ok(msg) = tokio::time::timeout(wait, ws.next()).await {
        panic!("expected no message, got {:?}", msg);
    }
}
