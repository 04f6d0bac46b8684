pub mod combat;
pub mod memory;
pub mod messages;
mod outcome;
pub mod quiz;
pub mod score;
mod shuffle;

pub use outcome::{AnswerOutcome, GamePhase};
pub use score::{Category, ScoreRecord, ScoreSink, SessionContext};
pub use shuffle::shuffle;
