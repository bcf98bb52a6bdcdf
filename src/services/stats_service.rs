use std::sync::Arc;

use serenity::async_trait;
use tracing::{debug, info, warn};

use crate::api::tryhackme::{ApiError, TryHackMeClient};
use crate::config::Config;
use crate::models::{MetricKind, StatOutcome, Summary, UserStatistic};
use crate::services::render_service;

pub const DAILY_TITLE: &str = "Daily Stats";
pub const USER_TITLE: &str = "User Stats";

/// Something that produces a user's rank and metric given a username
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Which metric `fetch` fills in
    fn metric(&self) -> MetricKind;

    async fn fetch(&self, username: &str) -> Result<UserStatistic, ApiError>;
}

/// Rank and points from the combined `/api/user` endpoint
pub struct PointsSource {
    client: Arc<TryHackMeClient>,
}

impl PointsSource {
    pub fn new(client: Arc<TryHackMeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatsSource for PointsSource {
    fn metric(&self) -> MetricKind {
        MetricKind::Points
    }

    async fn fetch(&self, username: &str) -> Result<UserStatistic, ApiError> {
        let user = self.client.get_user(username).await?;
        Ok(UserStatistic {
            username: username.to_string(),
            rank: user.user_rank.unwrap_or(0),
            score: user.points.unwrap_or(0),
            kind: MetricKind::Points,
        })
    }
}

/// Rank from `/api/usersRank` plus the completed room count
pub struct CompletedRoomsSource {
    client: Arc<TryHackMeClient>,
}

impl CompletedRoomsSource {
    pub fn new(client: Arc<TryHackMeClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StatsSource for CompletedRoomsSource {
    fn metric(&self) -> MetricKind {
        MetricKind::CompletedRooms
    }

    async fn fetch(&self, username: &str) -> Result<UserStatistic, ApiError> {
        let rank = self.client.get_user_rank(username).await?;
        let rooms = self.client.get_completed_room_count(username).await?;
        Ok(UserStatistic {
            username: username.to_string(),
            rank: rank.user_rank.unwrap_or(0),
            score: rooms as i64,
            kind: MetricKind::CompletedRooms,
        })
    }
}

/// Build the source selected by `config.metric`
pub fn source_from_config(config: &Config) -> Arc<dyn StatsSource> {
    let client = Arc::new(TryHackMeClient::with_base_url(config.api_base_url.clone()));
    match config.metric {
        MetricKind::Points => Arc::new(PointsSource::new(client)),
        MetricKind::CompletedRooms => Arc::new(CompletedRoomsSource::new(client)),
    }
}

/// Fetch one user, turning any error into `StatOutcome::Unavailable`
pub async fn fetch_outcome(source: &dyn StatsSource, username: &str) -> StatOutcome {
    match source.fetch(username).await {
        Ok(stat) => StatOutcome::Fetched(stat),
        Err(e) => {
            warn!("Failed to fetch stats for {}: {}", username, e);
            StatOutcome::Unavailable {
                username: username.to_string(),
                kind: source.metric(),
                reason: e.to_string(),
            }
        }
    }
}

/// Fetch every user one after another, keeping input order and failures
pub async fn collect_all(source: &dyn StatsSource, usernames: &[String]) -> Vec<StatOutcome> {
    let mut outcomes = Vec::with_capacity(usernames.len());
    for username in usernames {
        outcomes.push(fetch_outcome(source, username).await);
    }
    outcomes
}

/// Sort ascending by rank; equal ranks keep their input order
pub fn rank(mut stats: Vec<StatOutcome>) -> Vec<StatOutcome> {
    stats.sort_by_key(|s| s.rank());
    stats
}

/// Collect, rank and render every configured user
pub async fn daily_summary(source: &dyn StatsSource, usernames: &[String]) -> Summary {
    info!("Collecting daily stats for {} users", usernames.len());
    let outcomes = collect_all(source, usernames).await;
    let failed: Vec<String> = outcomes
        .iter()
        .filter_map(|o| match o {
            StatOutcome::Unavailable { username, reason, .. } => Some(format!("{} ({})", username, reason)),
            StatOutcome::Fetched(_) => None,
        })
        .collect();
    if !failed.is_empty() {
        warn!("{} of {} users could not be fetched: {}", failed.len(), outcomes.len(), failed.join(", "));
    }

    let ranked = rank(outcomes);
    render_service::render_summary(&ranked, DAILY_TITLE)
}

/// Fetch and render a single user
pub async fn user_summary(source: &dyn StatsSource, username: &str) -> Summary {
    let outcome = fetch_outcome(source, username).await;
    debug!("Looked up {} (fetched: {})", outcome.username(), outcome.is_fetched());
    render_service::render_summary(std::slice::from_ref(&outcome), USER_TITLE)
}
