use crate::game::core::memory::MatchConfig;
use crate::game::engine::SessionTiming;
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub tick_interval: Duration,
    pub reveal_delay: Duration,
    /// Floor for a memory round's clock
    pub match_min_round_time: Option<i32>,
    pub match_reset_score: bool,
}

fn var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let timing = SessionTiming::default();
        Self {
            port: var("PORT").unwrap_or(3000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:matwise.db?mode=rwc".to_string()),
            tick_interval: Duration::from_millis(
                var("TICK_INTERVAL_MS").unwrap_or(timing.tick.as_millis() as u64),
            ),
            reveal_delay: Duration::from_millis(
                var("REVEAL_DELAY_MS").unwrap_or(timing.reveal_delay.as_millis() as u64),
            ),
            match_min_round_time: var("MATCH_MIN_ROUND_TIME"),
            match_reset_score: var("MATCH_RESET_SCORE").unwrap_or(false),
        }
    }

    pub fn addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    pub fn timing(&self) -> SessionTiming {
        SessionTiming {
            tick: self.tick_interval,
            reveal_delay: self.reveal_delay,
        }
    }

    pub fn match_config(&self) -> MatchConfig {
        MatchConfig {
            min_round_time: self.match_min_round_time,
            reset_score_on_restart: self.match_reset_score,
            ..MatchConfig::default()
        }
    }
}
