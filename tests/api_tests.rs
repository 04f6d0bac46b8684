use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use matwise::repository::{LeaderboardEntry, Notification, UserProfile};
use serde::de::DeserializeOwned;
use sqlx::SqlitePool;
use tower::ServiceExt;

async fn send(pool: SqlitePool, request: Request<Body>) -> (StatusCode, Bytes) {
    let response = matwise::app(pool).oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn parse<T: DeserializeOwned>(body: &[u8]) -> T {
    serde_json::from_slice(body).unwrap()
}

#[sqlx::test]
async fn health_returns_ok(pool: SqlitePool) {
    let (status, body) = send(pool, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(&body[..], b"ok");
}

#[sqlx::test]
async fn leaderboard_accepts_slug_and_label(pool: SqlitePool) {
    sqlx::query("INSERT INTO leaderboards (user_id, score, category) VALUES ('demo-user-1', 60, 'Memory Game')")
        .execute(&pool)
        .await
        .unwrap();

    let (status, body) = send(pool.clone(), get("/leaderboards/memory")).await;
    assert_eq!(status, StatusCode::OK);
    let entries: Vec<LeaderboardEntry> = parse(&body);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].rank, 1);
    assert_eq!(entries[0].score, 60);

    let (status, body) = send(pool, get("/leaderboards/Memory%20Game")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<Vec<LeaderboardEntry>>(&body), entries);
}

#[sqlx::test]
async fn unknown_leaderboard_is_bad_request(pool: SqlitePool) {
    let (status, body) = send(pool, get("/leaderboards/chess")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: serde_json::Value = parse(&body);
    assert_eq!(error["status"], 400);
    assert_eq!(error["message"], "unknown category: chess");
}

#[sqlx::test]
async fn user_profile_is_returned(pool: SqlitePool) {
    let (status, body) = send(pool, get("/users/demo-user-2")).await;

    assert_eq!(status, StatusCode::OK);
    let profile: UserProfile = parse(&body);
    assert_eq!(profile.first_name.as_deref(), Some("Maria"));
}

#[sqlx::test]
async fn missing_user_is_not_found(pool: SqlitePool) {
    let (status, _) = send(pool, get("/users/nobody")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test]
async fn profile_update_keeps_unset_fields(pool: SqlitePool) {
    let request = Request::builder()
        .method("PUT")
        .uri("/users/demo-user-1")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"profile_picture": "avatars/owl.png"}"#))
        .unwrap();

    let (status, body) = send(pool, request).await;

    assert_eq!(status, StatusCode::OK);
    let profile: UserProfile = parse(&body);
    assert_eq!(profile.first_name.as_deref(), Some("Juan"));
    assert_eq!(profile.profile_picture.as_deref(), Some("avatars/owl.png"));
}

#[sqlx::test]
async fn notifications_are_listed(pool: SqlitePool) {
    let (status, body) = send(pool, get("/notifications")).await;

    assert_eq!(status, StatusCode::OK);
    let notifications: Vec<Notification> = parse(&body);
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].title, "Welcome!");
}

fn put_json(uri: &str, json: &'static str) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json))
        .unwrap()
}

#[sqlx::test]
async fn empty_first_name_is_rejected(pool: SqlitePool) {
    let (status, body) = send(
        pool.clone(),
        put_json("/users/demo-user-1", r#"{"first_name": ""}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: serde_json::Value = parse(&body);
    assert_eq!(error["status"], 400);

    let (_, body) = send(pool, get("/users/demo-user-1")).await;
    let profile: UserProfile = parse(&body);
    assert_eq!(profile.first_name.as_deref(), Some("Juan"));
}

#[sqlx::test]
async fn name_with_digits_is_rejected(pool: SqlitePool) {
    let (status, _) = send(
        pool.clone(),
        put_json("/users/demo-user-1", r#"{"last_name": "R2D2"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(pool, get("/users/demo-user-1")).await;
    let profile: UserProfile = parse(&body);
    assert_eq!(profile.last_name.as_deref(), Some("Dela Cruz"));
}

#[sqlx::test]
async fn registration_fields_are_saved(pool: SqlitePool) {
    let (status, body) = send(
        pool,
        put_json(
            "/users/new-user",
            r#"{"first_name": "Ana", "last_name": "Reyes", "sex": "female", "contact_number": "09190000000", "guardian": "Luz Reyes"}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let profile: UserProfile = parse(&body);
    assert_eq!(profile.sex.as_deref(), Some("female"));
    assert_eq!(profile.guardian.as_deref(), Some("Luz Reyes"));
}
