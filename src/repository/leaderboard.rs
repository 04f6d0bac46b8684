use crate::game::core::{Category, ScoreRecord, ScoreSink};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, warn};

/// How many scores a leaderboard shows
pub const TOP_SCORES: u32 = 20;

/// One row of a leaderboard, joined with the player's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub user_id: String,
    pub score: u32,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_picture: Option<String>,
}

type EntryRow = (String, i64, Option<String>, Option<String>, Option<String>);

#[derive(Clone)]
pub struct LeaderboardRepository {
    pool: SqlitePool,
}

impl LeaderboardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn append(&self, record: &ScoreRecord) -> Result<(), sqlx::Error> {
        sqlx::query("INSERT INTO leaderboards (user_id, score, category) VALUES ($1, $2, $3)")
            .bind(&record.user_id)
            .bind(i64::from(record.score))
            .bind(record.category.label())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Highest scores first; ties keep submission order
    pub async fn top(
        &self,
        category: Category,
        limit: u32,
    ) -> Result<Vec<LeaderboardEntry>, sqlx::Error> {
        let rows: Vec<EntryRow> = sqlx::query_as(
            "SELECT l.user_id, l.score, u.first_name, u.last_name, u.profile_picture
             FROM leaderboards l
             LEFT JOIN users u ON u.id = l.user_id
             WHERE l.category = $1
             ORDER BY l.score DESC, l.id ASC
             LIMIT $2",
        )
        .bind(category.label())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .zip(1..)
            .map(
                |((user_id, score, first_name, last_name, profile_picture), rank)| {
                    LeaderboardEntry {
                        rank,
                        user_id,
                        score: u32::try_from(score).unwrap_or_default(),
                        first_name,
                        last_name,
                        profile_picture,
                    }
                },
            )
            .collect())
    }
}

/// Writes finished games to the leaderboard without blocking the game.
/// Must be used from inside a tokio runtime.
#[derive(Clone)]
pub struct LeaderboardSink {
    repo: LeaderboardRepository,
}

impl LeaderboardSink {
    pub fn new(repo: LeaderboardRepository) -> Self {
        Self { repo }
    }
}

impl ScoreSink for LeaderboardSink {
    fn append(&self, record: ScoreRecord) {
        let repo = self.repo.clone();
        tokio::spawn(async move {
            match repo.append(&record).await {
                Ok(()) => debug!(user_id = record.user_id, score = record.score, "Score stored"),
                Err(err) => warn!(
                    user_id = record.user_id,
                    category = %record.category,
                    error = %err,
                    "Failed to store score"
                ),
            }
        });
    }
}
