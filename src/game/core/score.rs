use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

/// Leaderboard category, one per mini-game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Quiz Game")]
    Quiz,
    #[serde(rename = "Combat Based")]
    Combat,
    #[serde(rename = "Memory Game")]
    Memory,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Quiz, Category::Combat, Category::Memory];

    /// Label stored with every score record
    pub fn label(self) -> &'static str {
        match self {
            Category::Quiz => "Quiz Game",
            Category::Combat => "Combat Based",
            Category::Memory => "Memory Game",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Category::Quiz => "quiz",
            Category::Combat => "combat",
            Category::Memory => "memory",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts the stored label ("Quiz Game") or the slug ("quiz")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.label() == s || c.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A finished game's result, submitted once to the leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub user_id: String,
    pub score: u32,
    pub category: Category,
}

/// Fire-and-forget destination for score records
pub trait ScoreSink: Send + Sync + 'static {
    fn append(&self, record: ScoreRecord);
}

/// Implementation for closures
impl<F> ScoreSink for F
where
    F: Fn(ScoreRecord) + Send + Sync + 'static,
{
    fn append(&self, record: ScoreRecord) {
        self(record)
    }
}

/// Who is playing
pub trait Identity: Send + Sync + 'static {
    fn current_user_id(&self) -> Option<String>;
}

/// Identity fixed when the session is created
#[derive(Debug, Clone, Default)]
pub struct FixedIdentity(pub Option<String>);

impl Identity for FixedIdentity {
    fn current_user_id(&self) -> Option<String> {
        self.0.clone()
    }
}

/// Collaborators handed to every session
#[derive(Clone)]
pub struct SessionContext {
    identity: Arc<dyn Identity>,
    sink: Arc<dyn ScoreSink>,
}

impl SessionContext {
    pub fn new(identity: Arc<dyn Identity>, sink: Arc<dyn ScoreSink>) -> Self {
        Self { identity, sink }
    }

    pub fn for_user(user_id: Option<String>, sink: Arc<dyn ScoreSink>) -> Self {
        Self::new(Arc::new(FixedIdentity(user_id)), sink)
    }
}

/// Submits a session's score at most once per game.
pub(crate) struct ScoreReporter {
    ctx: SessionContext,
    category: Category,
    submitted: bool,
}

impl ScoreReporter {
    pub(crate) fn new(ctx: SessionContext, category: Category) -> Self {
        Self {
            ctx,
            category,
            submitted: false,
        }
    }

    pub(crate) fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Returns the record if this call was the one that emitted it
    pub(crate) fn submit_once(&mut self, score: u32) -> Option<ScoreRecord> {
        if self.submitted {
            return None;
        }
        self.submitted = true;

        let Some(user_id) = self.ctx.identity.current_user_id() else {
            warn!(category = %self.category, score, "No signed-in user, score not recorded");
            return None;
        };

        let record = ScoreRecord {
            user_id,
            score,
            category: self.category,
        };
        info!(user_id = record.user_id, score, category = %self.category, "Submitting score");
        self.ctx.sink.append(record.clone());
        Some(record)
    }

    pub(crate) fn reset(&mut self) {
        self.submitted = false;
    }
}
