mod api;
pub mod config;
pub mod error;
pub mod game;
pub mod repository;

pub use game::engine::SessionTiming;
pub use game::messages;

use axum::{
    Router,
    extract::{Path, State, WebSocketUpgrade},
    response::Response,
    routing::get,
};
use game::core::memory::MatchConfig;
use game::engine::SessionRegistry;
use game::messages::GameKind;
use repository::{LeaderboardRepository, LeaderboardSink, NotificationRepository, UserRepository};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    pub leaderboard: LeaderboardRepository,
    pub users: UserRepository,
    pub notifications: NotificationRepository,
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(kind): Path<GameKind>,
    State(state): State<AppState>,
) -> Response {
    ws.on_upgrade(move |socket| game::handle_connection(socket, kind, state.sessions))
}

pub fn app(pool: SqlitePool) -> Router {
    app_with_config(pool, SessionTiming::default())
}

pub fn app_with_config(pool: SqlitePool, timing: SessionTiming) -> Router {
    app_with_match_config(pool, timing, MatchConfig::default())
}

pub fn app_with_match_config(
    pool: SqlitePool,
    timing: SessionTiming,
    match_config: MatchConfig,
) -> Router {
    let leaderboard = LeaderboardRepository::new(pool.clone());
    let sink = Arc::new(LeaderboardSink::new(leaderboard.clone()));
    let registry = SessionRegistry::new(sink, timing).with_match_config(match_config);
    let state = AppState {
        sessions: Arc::new(registry),
        leaderboard,
        users: UserRepository::new(pool.clone()),
        notifications: NotificationRepository::new(pool),
    };

    Router::new()
        .route("/health", get(api::health))
        .route("/ws/:game", get(ws_handler))
        .route("/leaderboards/:category", get(api::leaderboard))
        .route("/users/:id", get(api::get_user).put(api::update_user))
        .route("/notifications", get(api::notifications))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
