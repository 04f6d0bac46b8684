use super::outcome::{AnswerOutcome, GamePhase};
use super::score::{Category, ScoreReporter, SessionContext};
use super::shuffle::shuffle;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const MAX_HEALTH: i32 = 100;
pub const DAMAGE: i32 = 20;
pub const STARTING_LIVES: u32 = 3;
pub const STARTING_TIME: i32 = 60;
const MAX_OPERAND: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Addition,
    Subtraction,
}

impl Operation {
    pub fn apply(self, a: i32, b: i32) -> i32 {
        match self {
            Operation::Addition => a + b,
            Operation::Subtraction => a - b,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operation::Addition => '+',
            Operation::Subtraction => '-',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
}

impl Difficulty {
    pub fn operation(self) -> Operation {
        match self {
            Difficulty::Easy => Operation::Addition,
            Difficulty::Medium => Operation::Subtraction,
        }
    }
}

/// A kind of boss the player can face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BossKind {
    pub name: &'static str,
    pub points: u32,
    pub difficulty: Difficulty,
}

pub const BOSSES: [BossKind; 2] = [
    BossKind {
        name: "Addition",
        points: 20,
        difficulty: Difficulty::Easy,
    },
    BossKind {
        name: "Subtraction",
        points: 40,
        difficulty: Difficulty::Medium,
    },
];

/// A boss on the field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boss {
    pub kind: BossKind,
    pub health: i32,
}

impl Boss {
    pub fn spawn(kind: BossKind) -> Self {
        Self {
            kind,
            health: MAX_HEALTH,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind.name
    }

    pub fn points(&self) -> u32 {
        self.kind.points
    }

    pub fn max_health(&self) -> i32 {
        MAX_HEALTH
    }

    pub fn operation(&self) -> Operation {
        self.kind.difficulty.operation()
    }

    pub fn is_defeated(&self) -> bool {
        self.health <= 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatQuestion {
    pub operand1: i32,
    pub operand2: i32,
    pub operation: Operation,
    pub correct_answer: i32,
    /// answer - 1, answer and answer + 1 in random order
    pub choices: [i32; 3],
}

impl CombatQuestion {
    pub fn generate<R: Rng + ?Sized>(operation: Operation, rng: &mut R) -> Self {
        let (operand1, operand2, answer) = loop {
            let a = rng.random_range(1..=MAX_OPERAND);
            let b = rng.random_range(1..=MAX_OPERAND);
            let answer = operation.apply(a, b);
            if answer >= 0 {
                break (a, b, answer);
            }
        };

        let mut choices = [answer - 1, answer, answer + 1];
        shuffle(&mut choices, rng);

        Self {
            operand1,
            operand2,
            operation,
            correct_answer: answer,
            choices,
        }
    }

    pub fn offers(&self, choice: i32) -> bool {
        self.choices.contains(&choice)
    }
}

/// Turn-based boss fight (pure logic, no I/O)
pub struct CombatSession {
    roster: Vec<BossKind>,
    player_health: i32,
    boss: Boss,
    lives: u32,
    score: u32,
    question: CombatQuestion,
    remaining_time: i32,
    phase: GamePhase,
    reporter: ScoreReporter,
}

impl CombatSession {
    pub fn new(ctx: SessionContext) -> Self {
        Self::with_roster(ctx, BOSSES.to_vec())
    }

    /// The first boss in `roster` opens every game. Falls back to the default
    /// roster when `roster` is empty.
    pub fn with_roster(ctx: SessionContext, roster: Vec<BossKind>) -> Self {
        let roster = if roster.is_empty() {
            BOSSES.to_vec()
        } else {
            roster
        };
        let boss = Boss::spawn(roster[0]);
        let question = CombatQuestion::generate(boss.operation(), &mut rand::rng());

        Self {
            roster,
            player_health: MAX_HEALTH,
            boss,
            lives: STARTING_LIVES,
            score: 0,
            question,
            remaining_time: STARTING_TIME,
            phase: GamePhase::Active,
            reporter: ScoreReporter::new(ctx, Category::Combat),
        }
    }

    pub fn player_health(&self) -> i32 {
        self.player_health
    }

    pub fn boss(&self) -> &Boss {
        &self.boss
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn question(&self) -> &CombatQuestion {
        &self.question
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

    pub fn answer(&mut self, choice: i32) -> AnswerOutcome {
        if self.is_over() || !self.question.offers(choice) {
            return AnswerOutcome::Ignored;
        }

        let outcome = if choice == self.question.correct_answer {
            self.boss.health -= DAMAGE;
            AnswerOutcome::Correct
        } else {
            self.player_health -= DAMAGE;
            AnswerOutcome::Wrong
        };

        self.resolve();
        self.question = CombatQuestion::generate(self.boss.operation(), &mut rand::rng());
        outcome
    }

    /// One second elapsed
    pub fn tick(&mut self) {
        if self.is_over() {
            return;
        }
        self.remaining_time -= 1;
        self.resolve();
    }

    pub fn restart(&mut self) {
        self.player_health = MAX_HEALTH;
        self.boss = Boss::spawn(self.roster[0]);
        self.lives = STARTING_LIVES;
        self.score = 0;
        self.remaining_time = STARTING_TIME;
        self.question = CombatQuestion::generate(self.boss.operation(), &mut rand::rng());
        self.reporter.reset();
        self.phase = GamePhase::Active;
    }

    /// Applies at most one consequence, in priority order: life loss, game
    /// over, boss defeat.
    fn resolve(&mut self) {
        if self.player_health <= 0 && self.lives > 0 {
            self.lives -= 1;
            self.player_health = MAX_HEALTH;
            self.boss = self.random_boss();
        } else if self.remaining_time <= 0 || self.player_health <= 0 {
            self.phase = GamePhase::GameOver;
            self.reporter.submit_once(self.score);
        } else if self.boss.is_defeated() {
            self.score += self.boss.points();
            self.boss = self.random_boss();
        }
    }

    fn random_boss(&self) -> Boss {
        let index = rand::rng().random_range(0..self.roster.len());
        Boss::spawn(self.roster[index])
    }
}
