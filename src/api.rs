use crate::AppState;
use crate::error::ApiError;
use crate::game::core::Category;
use crate::repository::{LeaderboardEntry, Notification, ProfileUpdate, TOP_SCORES, UserProfile};
use axum::Json;
use axum::extract::{Path, State};
use tracing::info;
use validator::Validate;

pub async fn health() -> &'static str {
    "ok"
}

/// Top scores for one game, best first
pub async fn leaderboard(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let category: Category = category.parse()?;
    let entries = state.leaderboard.top(category, TOP_SCORES).await?;
    Ok(Json(entries))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserProfile>, ApiError> {
    state
        .users
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("user {id} not found")))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, ApiError> {
    update.validate()?;
    let profile = state.users.upsert(&id, &update).await?;
    info!(user_id = id, "Profile updated");
    Ok(Json(profile))
}

pub async fn notifications(
    State(state): State<AppState>,
) -> Result<Json<Vec<Notification>>, ApiError> {
    Ok(Json(state.notifications.list().await?))
}
