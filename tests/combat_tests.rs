mod common;

use common::*;
use futures_util::SinkExt;
use matwise::messages::{CombatView, GameKind, ServerMessage};
use std::time::Duration;

async fn recv_arena(ws: &mut WsStream) -> CombatView {
    match recv(ws).await {
        ServerMessage::Combat(view) => view,
        other => panic!("expected combat snapshot, got {:?}", other),
    }
}

fn correct_answer(view: &CombatView) -> i32 {
    let q = &view.question;
    match q.symbol {
        '+' => q.operand1 + q.operand2,
        '-' => q.operand1 - q.operand2,
        other => panic!("unexpected operation {other}"),
    }
}

fn wrong_answer(view: &CombatView) -> i32 {
    let correct = correct_answer(view);
    *view.question.choices.iter().find(|&&c| c != correct).unwrap()
}

#[tokio::test]
async fn join_spawns_first_boss() {
    let server = spawn_test_server().await;
    let mut ws = connect_game(&server, GameKind::Combat).await;

    let (_, snapshot) = join(&mut ws, "demo-user-1").await;

    let ServerMessage::Combat(view) = snapshot else {
        panic!("expected combat snapshot");
    };
    assert_eq!(view.boss.name, "Addition");
    assert_eq!(view.boss.health, 100);
    assert_eq!(view.player_health, 100);
    assert_eq!(view.lives, 3);
    assert_eq!(view.remaining_time, 60);
    assert!(view.question.choices.contains(&correct_answer(&view)));
}

#[tokio::test]
async fn correct_answer_damages_boss() {
    let server = spawn_test_server().await;
    let mut ws = connect_game(&server, GameKind::Combat).await;
    let (_, snapshot) = join(&mut ws, "demo-user-1").await;
    let ServerMessage::Combat(view) = snapshot else {
        panic!("expected combat snapshot");
    };

    ws.send(answer_msg(correct_answer(&view))).await.unwrap();

    assert_eq!(recv(&mut ws).await, ServerMessage::AnswerResult { correct: true });
    let view = recv_arena(&mut ws).await;
    assert_eq!(view.boss.health, 80);
    assert_eq!(view.player_health, 100);
}

#[tokio::test]
async fn wrong_answer_damages_player() {
    let server = spawn_test_server().await;
    let mut ws = connect_game(&server, GameKind::Combat).await;
    let (_, snapshot) = join(&mut ws, "demo-user-1").await;
    let ServerMessage::Combat(view) = snapshot else {
        panic!("expected combat snapshot");
    };

    ws.send(answer_msg(wrong_answer(&view))).await.unwrap();

    assert_eq!(recv(&mut ws).await, ServerMessage::AnswerResult { correct: false });
    let view = recv_arena(&mut ws).await;
    assert_eq!(view.player_health, 80);
    assert_eq!(view.boss.health, 100);
}

#[tokio::test]
async fn defeating_boss_awards_points() {
    let server = spawn_test_server().await;
    let mut ws = connect_game(&server, GameKind::Combat).await;
    let (_, snapshot) = join(&mut ws, "demo-user-1").await;
    let ServerMessage::Combat(mut view) = snapshot else {
        panic!("expected combat snapshot");
    };

    for _ in 0..5 {
        ws.send(answer_msg(correct_answer(&view))).await.unwrap();
        assert_eq!(recv(&mut ws).await, ServerMessage::AnswerResult { correct: true });
        view = recv_arena(&mut ws).await;
    }

    assert_eq!(view.score, 20);
    assert_eq!(view.boss.health, 100);
}

#[tokio::test]
async fn five_misses_cost_a_life() {
    let server = spawn_test_server().await;
    let mut ws = connect_game(&server, GameKind::Combat).await;
    let (_, snapshot) = join(&mut ws, "demo-user-1").await;
    let ServerMessage::Combat(mut view) = snapshot else {
        panic!("expected combat snapshot");
    };

    for _ in 0..5 {
        ws.send(answer_msg(wrong_answer(&view))).await.unwrap();
        recv(&mut ws).await;
        view = recv_arena(&mut ws).await;
    }

    assert_eq!(view.lives, 2);
    assert_eq!(view.player_health, 100);
}

#[tokio::test]
async fn unparseable_answer_is_ignored() {
    let server = spawn_test_server().await;
    let mut ws = connect_game(&server, GameKind::Combat).await;
    join(&mut ws, "demo-user-1").await;

    ws.send(answer_msg("seven")).await.unwrap();

    assert_silent(&mut ws, Duration::from_millis(100)).await;
}

#[tokio::test]
async fn numeric_choice_from_snapshot_is_accepted() {
    let server = spawn_test_server().await;
    let mut ws = connect_game(&server, GameKind::Combat).await;
    let (_, snapshot) = join(&mut ws, "demo-user-1").await;
    let ServerMessage::Combat(view) = snapshot else {
        panic!("expected combat snapshot");
    };

    let choice = correct_answer(&view);
    ws.send(raw_msg(&format!(r#"{{"type":"answer","choice":{choice}}}"#)))
        .await
        .unwrap();

    assert_eq!(recv(&mut ws).await, ServerMessage::AnswerResult { correct: true });
    assert_eq!(recv_arena(&mut ws).await.boss.health, 80);
}
