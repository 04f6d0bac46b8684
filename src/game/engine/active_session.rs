use crate::game::core::combat::CombatSession;
use crate::game::core::memory::{MatchConfig, MatchSession};
use crate::game::core::messages::{
    BossView, CombatQuestionView, CombatView, GameKind, MemoryView, QuizView, ServerMessage,
};
use crate::game::core::quiz::QuizSession;
use crate::game::core::SessionContext;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// One of the three mini-games
pub enum GameSession {
    Quiz(QuizSession),
    Memory(MatchSession),
    Combat(CombatSession),
}

impl GameSession {
    pub fn new(kind: GameKind, ctx: SessionContext, match_config: MatchConfig) -> Self {
        match kind {
            GameKind::Quiz => GameSession::Quiz(QuizSession::new(ctx)),
            GameKind::Memory => GameSession::Memory(MatchSession::with_config(ctx, match_config)),
            GameKind::Combat => GameSession::Combat(CombatSession::new(ctx)),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            GameSession::Quiz(_) => GameKind::Quiz,
            GameSession::Memory(_) => GameKind::Memory,
            GameSession::Combat(_) => GameKind::Combat,
        }
    }

    pub fn tick(&mut self) {
        match self {
            GameSession::Quiz(game) => game.tick(),
            GameSession::Memory(game) => game.tick(),
            GameSession::Combat(game) => game.tick(),
        }
    }

    pub fn restart(&mut self) {
        match self {
            GameSession::Quiz(game) => game.restart(),
            GameSession::Memory(game) => game.restart(),
            GameSession::Combat(game) => game.restart(),
        }
    }

    pub fn is_over(&self) -> bool {
        match self {
            GameSession::Quiz(game) => game.is_over(),
            GameSession::Memory(game) => game.is_over(),
            GameSession::Combat(game) => game.is_over(),
        }
    }

    pub fn score(&self) -> u32 {
        match self {
            GameSession::Quiz(game) => game.score(),
            GameSession::Memory(game) => game.score(),
            GameSession::Combat(game) => game.score(),
        }
    }

    /// Everything a client needs to draw the screen
    pub fn snapshot(&self) -> ServerMessage {
        match self {
            GameSession::Quiz(game) => {
                let question = game.current_question();
                ServerMessage::Quiz(QuizView {
                    phase: game.phase(),
                    prompt: question.map(|q| q.prompt.clone()),
                    choices: question.map(|q| q.choices.to_vec()).unwrap_or_default(),
                    question_number: game.question_number(),
                    total_questions: game.total_questions(),
                    timer: game.timer(),
                    lives: game.lives(),
                    score: game.score(),
                })
            }
            GameSession::Memory(game) => ServerMessage::Memory(MemoryView {
                phase: game.phase(),
                tiles: game.faces(),
                matched: game.matched().collect(),
                score: game.score(),
                wins: game.wins(),
                remaining_time: game.remaining_time(),
            }),
            GameSession::Combat(game) => {
                let boss = game.boss();
                let question = game.question();
                ServerMessage::Combat(CombatView {
                    phase: game.phase(),
                    player_health: game.player_health(),
                    lives: game.lives(),
                    score: game.score(),
                    remaining_time: game.remaining_time(),
                    boss: BossView {
                        name: boss.name().to_string(),
                        health: boss.health,
                        max_health: boss.max_health(),
                        points: boss.points(),
                    },
                    question: CombatQuestionView {
                        operand1: question.operand1,
                        operand2: question.operand2,
                        symbol: question.operation.symbol(),
                        choices: question.choices.to_vec(),
                    },
                })
            }
        }
    }
}

/// A hosted session: game logic plus its transport channel and clock.
/// Dropping it stops the clock.
pub struct ActiveSession {
    pub session: GameSession,
    tx: broadcast::Sender<ServerMessage>,
    ticker: Option<JoinHandle<()>>,
    // identifies the current clock; older clocks stop on their next tick
    epoch: u64,
}

impl ActiveSession {
    pub fn new(session: GameSession, tx: broadcast::Sender<ServerMessage>) -> Self {
        Self {
            session,
            tx,
            ticker: None,
            epoch: 0,
        }
    }

    pub fn send(&self, msg: ServerMessage) {
        let _ = self.tx.send(msg);
    }

    /// Send a snapshot, plus `GameOver` if the last event ended the game
    pub fn publish(&self, was_over: bool) {
        self.send(self.session.snapshot());
        if !was_over && self.session.is_over() {
            self.send(ServerMessage::GameOver {
                category: self.session.kind().category(),
                score: self.session.score(),
            });
        }
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Invalidate the running clock; returns the epoch for its replacement
    pub fn next_epoch(&mut self) -> u64 {
        self.stop_clock();
        self.epoch += 1;
        self.epoch
    }

    pub fn set_ticker(&mut self, ticker: JoinHandle<()>) {
        self.stop_clock();
        self.ticker = Some(ticker);
    }

    fn stop_clock(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl Drop for ActiveSession {
    fn drop(&mut self) {
        self.stop_clock();
    }
}
