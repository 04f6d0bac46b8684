use super::outcome::{AnswerOutcome, GamePhase};
use super::score::{Category, ScoreReporter, SessionContext};
use super::shuffle::shuffle;
use rand::Rng;

pub const POINTS_PER_ANSWER: u32 = 20;
pub const STARTING_LIVES: u32 = 3;
pub const STARTING_TIMER: i32 = 60;
/// A restarted quiz gets twice the initial time
pub const RESTART_TIMER: i32 = 120;
const DECK_REPEATS: usize = 16;

/// A multiple-choice arithmetic question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizQuestion {
    pub prompt: String,
    pub choices: [String; 4],
    pub correct_answer: String,
}

impl QuizQuestion {
    fn new(prompt: &str, choices: [&str; 4], correct_answer: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
            choices: choices.map(str::to_string),
            correct_answer: correct_answer.to_string(),
        }
    }

    pub fn offers(&self, choice: &str) -> bool {
        self.choices.iter().any(|c| c == choice)
    }

    pub fn is_correct(&self, choice: &str) -> bool {
        self.correct_answer == choice
    }
}

pub fn base_questions() -> Vec<QuizQuestion> {
    vec![
        QuizQuestion::new("2 + 2?", ["2", "3", "4", "5"], "4"),
        QuizQuestion::new("5 + 5?", ["10", "11", "12", "15"], "10"),
        QuizQuestion::new("3 + 1?", ["1", "2", "3", "4"], "4"),
        QuizQuestion::new("12 + 1?", ["13", "15", "14", "12"], "13"),
        QuizQuestion::new("5 * 3?", ["12", "15", "18", "20"], "15"),
        QuizQuestion::new("10 / 2?", ["2", "3", "4", "5"], "5"),
        QuizQuestion::new("12 - 7?", ["3", "5", "6", "7"], "5"),
    ]
}

/// The base set in order, followed by 16 shuffled copies of it
pub fn build_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<QuizQuestion> {
    let base = base_questions();
    let mut more: Vec<QuizQuestion> = (0..DECK_REPEATS).flat_map(|_| base.clone()).collect();
    shuffle(&mut more, rng);

    let mut deck = base;
    deck.extend(more);
    deck
}

/// Timed quiz with lives (pure logic, no I/O)
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    index: usize,
    timer: i32,
    lives: u32,
    score: u32,
    phase: GamePhase,
    reporter: ScoreReporter,
}

impl QuizSession {
    pub fn new(ctx: SessionContext) -> Self {
        Self::with_questions(ctx, build_deck(&mut rand::rng()))
    }

    pub fn with_questions(ctx: SessionContext, questions: Vec<QuizQuestion>) -> Self {
        let mut session = Self {
            questions,
            index: 0,
            timer: STARTING_TIMER,
            lives: STARTING_LIVES,
            score: 0,
            phase: GamePhase::Active,
            reporter: ScoreReporter::new(ctx, Category::Quiz),
        };
        if session.questions.is_empty() {
            session.finish();
        }
        session
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.index)
    }

    pub fn question_number(&self) -> usize {
        self.index + 1
    }

    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    pub fn timer(&self) -> i32 {
        self.timer
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn score(&self) -> u32 {
        self.score
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

    pub fn submit_answer(&mut self, choice: &str) -> AnswerOutcome {
        if self.is_over() {
            return AnswerOutcome::Ignored;
        }
        let correct = match self.current_question() {
            Some(question) if question.offers(choice) => question.is_correct(choice),
            _ => return AnswerOutcome::Ignored,
        };

        let outcome = if correct {
            self.score += POINTS_PER_ANSWER;
            AnswerOutcome::Correct
        } else {
            self.lives = self.lives.saturating_sub(1);
            AnswerOutcome::Wrong
        };

        if self.lives == 0 || self.index + 1 >= self.questions.len() {
            self.finish();
        } else {
            self.index += 1;
        }

        outcome
    }

    /// One second elapsed
    pub fn tick(&mut self) {
        if self.is_over() {
            return;
        }
        self.timer -= 1;
        if self.timer <= 0 {
            self.timer = 0;
            self.finish();
        }
    }

    pub fn restart(&mut self) {
        shuffle(&mut self.questions, &mut rand::rng());
        self.index = 0;
        self.timer = RESTART_TIMER;
        self.lives = STARTING_LIVES;
        self.score = 0;
        self.reporter.reset();
        self.phase = GamePhase::Active;
        if self.questions.is_empty() {
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.phase = GamePhase::GameOver;
        self.reporter.submit_once(self.score);
    }
}
