use serde::{Deserialize, Serialize};

/// Lifecycle of a single game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Active,
    GameOver,
}

/// Result of answering a question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Wrong,
    /// Not accepted: the game is over or the choice is not on offer
    Ignored,
}

impl AnswerOutcome {
    pub fn is_correct(self) -> bool {
        self == AnswerOutcome::Correct
    }
}
