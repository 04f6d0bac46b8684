mod leaderboard;
mod notifications;
mod users;

pub use leaderboard::{LeaderboardEntry, LeaderboardRepository, LeaderboardSink, TOP_SCORES};
pub use notifications::{Notification, NotificationRepository};
pub use users::{ProfileUpdate, UserProfile, UserRepository};
