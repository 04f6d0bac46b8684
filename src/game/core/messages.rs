use super::outcome::GamePhase;
use super::score::Category;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which mini-game a connection plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    Quiz,
    Memory,
    Combat,
}

impl GameKind {
    pub fn category(self) -> Category {
        match self {
            GameKind::Quiz => Category::Quiz,
            GameKind::Memory => Category::Memory,
            GameKind::Combat => Category::Combat,
        }
    }
}

/// An answer as the client sent it: quiz choices are text, combat choices
/// may come back as the numbers the snapshot carried
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AnswerChoice {
    Number(i64),
    Text(String),
}

impl fmt::Display for AnswerChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerChoice::Number(n) => write!(f, "{n}"),
            AnswerChoice::Text(text) => f.write_str(text),
        }
    }
}

impl From<&str> for AnswerChoice {
    fn from(text: &str) -> Self {
        AnswerChoice::Text(text.to_string())
    }
}

impl From<i32> for AnswerChoice {
    fn from(n: i32) -> Self {
        AnswerChoice::Number(n.into())
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Join {
        user_id: Option<String>,
    },

    // Quiz and combat
    Answer {
        choice: AnswerChoice,
    },

    // Memory
    SelectTile {
        index: usize,
    },

    Restart,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuizView {
    pub phase: GamePhase,
    pub prompt: Option<String>,
    pub choices: Vec<String>,
    pub question_number: usize,
    pub total_questions: usize,
    pub timer: i32,
    pub lives: u32,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryView {
    pub phase: GamePhase,
    /// Face-up values; `None` for tiles still face down
    pub tiles: Vec<Option<u8>>,
    pub matched: Vec<usize>,
    pub score: u32,
    pub wins: u32,
    pub remaining_time: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BossView {
    pub name: String,
    pub health: i32,
    pub max_health: i32,
    pub points: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CombatQuestionView {
    pub operand1: i32,
    pub operand2: i32,
    pub symbol: char,
    pub choices: Vec<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CombatView {
    pub phase: GamePhase,
    pub player_health: i32,
    pub lives: u32,
    pub score: u32,
    pub remaining_time: i32,
    pub boss: BossView,
    pub question: CombatQuestionView,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Joined {
        session_id: String,
        game: GameKind,
    },

    // Snapshots, sent after every state change
    Quiz(QuizView),
    Memory(MemoryView),
    Combat(CombatView),

    AnswerResult {
        correct: bool,
    },
    GameOver {
        category: Category,
        score: u32,
    },
    Error {
        message: String,
    },
}
