use super::active_session::{ActiveSession, GameSession};
use crate::game::core::memory::{MatchConfig, SelectOutcome};
use crate::game::core::messages::{GameKind, ServerMessage};
use crate::game::core::{AnswerOutcome, ScoreSink, SessionContext};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep};
use tracing::{debug, info};

pub const DEFAULT_TICK: Duration = Duration::from_secs(1);
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_secs(1);

/// Clock settings for hosted sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTiming {
    /// Length of one game second
    pub tick: Duration,
    /// How long a mismatched memory pair stays face up
    pub reveal_delay: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            tick: DEFAULT_TICK,
            reveal_delay: DEFAULT_REVEAL_DELAY,
        }
    }
}

/// Hosts running sessions and drives their clocks.
pub struct SessionRegistry {
    pub sessions: Arc<DashMap<String, ActiveSession>>,
    sink: Arc<dyn ScoreSink>,
    timing: SessionTiming,
    match_config: MatchConfig,
}

impl SessionRegistry {
    pub fn new(sink: Arc<dyn ScoreSink>, timing: SessionTiming) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            sink,
            timing,
            match_config: MatchConfig::default(),
        }
    }

    pub fn with_match_config(mut self, match_config: MatchConfig) -> Self {
        self.match_config = match_config;
        self
    }

    /// Create a session, announce it and start its clock
    pub fn start_session(
        &self,
        kind: GameKind,
        user_id: Option<String>,
        tx: broadcast::Sender<ServerMessage>,
    ) -> String {
        let session_id = uuid::Uuid::new_v4().to_string();
        info!(session_id, ?kind, ?user_id, "Starting session");

        let ctx = SessionContext::for_user(user_id, self.sink.clone());
        let mut active = ActiveSession::new(GameSession::new(kind, ctx, self.match_config), tx);
        active.send(ServerMessage::Joined {
            session_id: session_id.clone(),
            game: kind,
        });
        active.publish(false);

        let ticker = spawn_ticker(
            self.sessions.clone(),
            session_id.clone(),
            self.timing.tick,
            active.epoch(),
        );
        active.set_ticker(ticker);
        self.sessions.insert(session_id.clone(), active);

        session_id
    }

    /// Answer the current quiz or combat question
    pub fn handle_answer(&self, session_id: &str, choice: &str) -> Option<AnswerOutcome> {
        let mut active = self.sessions.get_mut(session_id)?;
        let was_over = active.session.is_over();

        let outcome = match &mut active.session {
            GameSession::Quiz(game) => game.submit_answer(choice),
            GameSession::Combat(game) => match choice.trim().parse::<i32>() {
                Ok(choice) => game.answer(choice),
                Err(_) => AnswerOutcome::Ignored,
            },
            GameSession::Memory(_) => AnswerOutcome::Ignored,
        };
        debug!(session_id, choice, ?outcome, "Answer submitted");

        if outcome != AnswerOutcome::Ignored {
            active.send(ServerMessage::AnswerResult {
                correct: outcome.is_correct(),
            });
            active.publish(was_over);
        }
        Some(outcome)
    }

    /// Turn a memory tile face up
    pub fn handle_select(&self, session_id: &str, index: usize) -> Option<SelectOutcome> {
        let mut active = self.sessions.get_mut(session_id)?;
        let GameSession::Memory(game) = &mut active.session else {
            return Some(SelectOutcome::Ignored);
        };

        let outcome = game.select_tile(index);
        debug!(session_id, index, ?outcome, "Tile selected");

        if let SelectOutcome::PairSelected {
            round_cleared: false,
            generation,
            ..
        } = outcome
        {
            spawn_pair_resolution(
                self.sessions.clone(),
                session_id.to_string(),
                generation,
                self.timing.reveal_delay,
            );
        }
        if outcome != SelectOutcome::Ignored {
            active.publish(false);
        }
        Some(outcome)
    }

    /// Start the game over on a fresh clock
    pub fn restart(&self, session_id: &str) -> bool {
        let Some(mut active) = self.sessions.get_mut(session_id) else {
            return false;
        };
        info!(session_id, "Restarting session");

        active.session.restart();
        let epoch = active.next_epoch();
        let ticker = spawn_ticker(
            self.sessions.clone(),
            session_id.to_string(),
            self.timing.tick,
            epoch,
        );
        active.set_ticker(ticker);
        active.publish(false);
        true
    }

    /// Tear the session down; its clock stops with it
    pub fn end_session(&self, session_id: &str) {
        if let Some((_, active)) = self.sessions.remove(session_id) {
            info!(
                session_id,
                score = active.session.score(),
                game_over = active.session.is_over(),
                "Session ended"
            );
        }
    }

    pub fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Ticks the session once per `period` until the game ends, the session is
/// removed, or a newer clock replaces this one
fn spawn_ticker(
    sessions: Arc<DashMap<String, ActiveSession>>,
    session_id: String,
    period: Duration,
    epoch: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + period, period);
        // A stalled worker must not cost the player several seconds at once
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;

            let Some(mut active) = sessions.get_mut(&session_id) else {
                break;
            };
            if active.epoch() != epoch {
                break;
            }

            let was_over = active.session.is_over();
            active.session.tick();
            active.publish(was_over);

            if active.session.is_over() {
                debug!(session_id, "Clock stopped at game over");
                break;
            }
        }
    })
}

/// Flips a memory pair back down after `delay`, unless it went stale
fn spawn_pair_resolution(
    sessions: Arc<DashMap<String, ActiveSession>>,
    session_id: String,
    generation: u64,
    delay: Duration,
) {
    tokio::spawn(async move {
        sleep(delay).await;

        let Some(mut active) = sessions.get_mut(&session_id) else {
            return;
        };
        let was_over = active.session.is_over();
        let GameSession::Memory(game) = &mut active.session else {
            return;
        };
        if game.resolve_pair(generation) {
            debug!(session_id, generation, "Pair flipped back");
            active.publish(was_over);
        }
    });
}
