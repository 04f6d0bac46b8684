//! Memory-match pairs game.
//!
//! Twenty face-down tiles hold the numbers 1 to 10 twice each. The player
//! reveals two tiles at a time; equal values stay matched, anything else flips
//! back once the reveal delay has passed. Clearing the board starts a new
//! round with a shorter clock.

use super::outcome::GamePhase;
use super::score::{Category, ScoreReporter, SessionContext};
use super::shuffle::shuffle;
use rand::Rng;
use std::collections::BTreeSet;

pub const PAIR_COUNT: u8 = 10;
pub const BOARD_SIZE: usize = PAIR_COUNT as usize * 2;
pub const POINTS_PER_PAIR: u32 = 20;

/// Numbers 1..=10, each twice, shuffled
pub fn generate_board<R: Rng + ?Sized>(rng: &mut R) -> Vec<u8> {
    let mut tiles: Vec<u8> = (1..=PAIR_COUNT).flat_map(|n| [n, n]).collect();
    shuffle(&mut tiles, rng);
    tiles
}

/// Round clock and restart rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    /// Seconds on the clock for the first round and after a restart
    pub round_time: i32,
    /// Seconds removed from the clock for every round won
    pub round_time_step: i32,
    /// Lower bound for a round's clock; `None` lets it reach zero or below
    pub min_round_time: Option<i32>,
    /// Whether `restart` clears the score
    pub reset_score_on_restart: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            round_time: 60,
            round_time_step: 20,
            min_round_time: None,
            reset_score_on_restart: false,
        }
    }
}

/// Result of selecting a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Matched, already face up, out of range, or a pair is still pending
    Ignored,
    /// First tile of a pair is face up
    Revealed,
    /// Second tile is face up and the pair was compared.
    /// Call `resolve_pair(generation)` after the reveal delay.
    PairSelected {
        matched: bool,
        round_cleared: bool,
        generation: u64,
    },
}

/// Memory-match game (pure logic, no I/O)
pub struct MatchSession {
    config: MatchConfig,
    board: Vec<u8>,
    matched: BTreeSet<usize>,
    selected: Vec<usize>,
    flipped: BTreeSet<usize>,
    score: u32,
    wins: u32,
    remaining_time: i32,
    phase: GamePhase,
    reporter: ScoreReporter,
    // bumped whenever the pending pair becomes obsolete
    generation: u64,
}

impl MatchSession {
    pub fn new(ctx: SessionContext) -> Self {
        Self::with_config(ctx, MatchConfig::default())
    }

    pub fn with_config(ctx: SessionContext, config: MatchConfig) -> Self {
        Self::with_board(ctx, config, generate_board(&mut rand::rng()))
    }

    pub fn with_board(ctx: SessionContext, config: MatchConfig, board: Vec<u8>) -> Self {
        Self {
            config,
            board,
            matched: BTreeSet::new(),
            selected: Vec::with_capacity(2),
            flipped: BTreeSet::new(),
            score: 0,
            wins: 0,
            remaining_time: config.round_time,
            phase: GamePhase::Active,
            reporter: ScoreReporter::new(ctx, Category::Memory),
            generation: 0,
        }
    }

    pub fn board(&self) -> &[u8] {
        &self.board
    }

    /// Value shown on a tile, `None` while face down
    pub fn face(&self, index: usize) -> Option<u8> {
        let visible = self.matched.contains(&index)
            || self.selected.contains(&index)
            || self.flipped.contains(&index);
        visible.then(|| self.board.get(index).copied()).flatten()
    }

    pub fn faces(&self) -> Vec<Option<u8>> {
        (0..self.board.len()).map(|i| self.face(i)).collect()
    }

    pub fn matched(&self) -> impl Iterator<Item = usize> + '_ {
        self.matched.iter().copied()
    }

    pub fn selected(&self) -> &[usize] {
        &self.selected
    }

    pub fn is_pair_pending(&self) -> bool {
        self.selected.len() == 2
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn remaining_time(&self) -> i32 {
        self.remaining_time
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn score_submitted(&self) -> bool {
        self.reporter.is_submitted()
    }

    pub fn select_tile(&mut self, index: usize) -> SelectOutcome {
        if self.is_over()
            || index >= self.board.len()
            || self.matched.contains(&index)
            || self.flipped.contains(&index)
            || self.selected.contains(&index)
            || self.is_pair_pending()
        {
            return SelectOutcome::Ignored;
        }

        let Some(&first) = self.selected.first() else {
            self.selected.push(index);
            return SelectOutcome::Revealed;
        };

        self.flipped.insert(index);
        self.selected.push(index);
        self.generation += 1;

        let matched = self.board[first] == self.board[index];
        if matched {
            self.matched.insert(first);
            self.matched.insert(index);
            self.score += POINTS_PER_PAIR;
        }

        let round_cleared = self.matched.len() == self.board.len();
        if round_cleared {
            self.wins += 1;
            let budget = self.round_budget();
            self.next_round(budget);
        }

        SelectOutcome::PairSelected {
            matched,
            round_cleared,
            generation: self.generation,
        }
    }

    /// Flips the pending pair back down. Returns false for a stale generation.
    pub fn resolve_pair(&mut self, generation: u64) -> bool {
        if generation != self.generation || !self.is_pair_pending() {
            return false;
        }
        self.selected.clear();
        self.flipped.clear();
        true
    }

    /// One second elapsed
    pub fn tick(&mut self) {
        if self.is_over() {
            return;
        }
        self.remaining_time -= 1;
        if self.remaining_time <= 0 {
            self.phase = GamePhase::GameOver;
            self.reporter.submit_once(self.score);
        }
    }

    pub fn restart(&mut self) {
        self.wins = 0;
        if self.config.reset_score_on_restart {
            self.score = 0;
        }
        self.reporter.reset();
        self.phase = GamePhase::Active;
        self.next_round(self.config.round_time);
    }

    fn round_budget(&self) -> i32 {
        let wins = i32::try_from(self.wins).unwrap_or(i32::MAX);
        let budget = self
            .config
            .round_time
            .saturating_sub(wins.saturating_mul(self.config.round_time_step));
        match self.config.min_round_time {
            Some(min) => budget.max(min),
            None => budget,
        }
    }

    fn next_round(&mut self, remaining_time: i32) {
        self.board = generate_board(&mut rand::rng());
        self.matched.clear();
        self.selected.clear();
        self.flipped.clear();
        self.remaining_time = remaining_time;
        self.generation += 1;
    }
}
