//! Per-user statistic models

use serde::Deserialize;

/// Which second number the bot reports next to a user's rank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    /// Points from the combined user endpoint
    #[default]
    Points,
    /// Number of completed rooms from the split endpoints
    CompletedRooms,
}

impl MetricKind {
    /// Label shown in front of the value in rendered fields
    pub fn label(&self) -> &'static str {
        match self {
            MetricKind::Points => "Points:",
            MetricKind::CompletedRooms => "Completed Rooms:",
        }
    }
}

/// One user's leaderboard standing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStatistic {
    pub username: String,
    pub rank: i64,
    pub score: i64,
    pub kind: MetricKind,
}

impl UserStatistic {
    /// Zero-valued record used when a user's stats could not be fetched
    pub fn zeroed(username: &str, kind: MetricKind) -> Self {
        Self {
            username: username.to_string(),
            rank: 0,
            score: 0,
            kind,
        }
    }
}

/// Result of fetching one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatOutcome {
    Fetched(UserStatistic),
    Unavailable {
        username: String,
        kind: MetricKind,
        reason: String,
    },
}

impl StatOutcome {
    pub fn username(&self) -> &str {
        match self {
            StatOutcome::Fetched(stat) => &stat.username,
            StatOutcome::Unavailable { username, .. } => username,
        }
    }

    /// Sort key; failed fetches rank as 0
    pub fn rank(&self) -> i64 {
        match self {
            StatOutcome::Fetched(stat) => stat.rank,
            StatOutcome::Unavailable { .. } => 0,
        }
    }

    pub fn is_fetched(&self) -> bool {
        matches!(self, StatOutcome::Fetched(_))
    }

    /// The statistic to display, zero-valued for failed fetches
    pub fn to_statistic(&self) -> UserStatistic {
        match self {
            StatOutcome::Fetched(stat) => stat.clone(),
            StatOutcome::Unavailable { username, kind, .. } => UserStatistic::zeroed(username, *kind),
        }
    }
}
