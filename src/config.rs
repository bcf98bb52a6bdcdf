//! Bot configuration loaded once from a JSON file at startup

use std::path::Path;

use chrono::NaiveTime;
use serde::Deserialize;
use serenity::model::id::ChannelId;
use thiserror::Error;

use crate::api::tryhackme::TryHackMeClient;
use crate::models::MetricKind;

const DEFAULT_CONFIG_PATH: &str = "config.json";
const DEFAULT_DAILY_TIME: &str = "22:00";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Missing or empty config value: {0}")]
    MissingField(&'static str),
    #[error("Invalid channelID {0:?}: expected a Discord channel id")]
    InvalidChannelId(String),
    #[error("Invalid dailyTime {0:?}: expected HH:MM")]
    InvalidDailyTime(String),
}

/// On-disk shape, everything optional so validation can name what is missing
#[derive(Debug, Deserialize)]
struct RawConfig {
    prefix: Option<String>,
    token: Option<String>,
    users: Option<Vec<String>>,
    #[serde(rename = "channelID")]
    channel_id: Option<String>,
    #[serde(default)]
    metric: MetricKind,
    #[serde(rename = "dailyTime")]
    daily_time: Option<String>,
    #[serde(rename = "apiBaseUrl")]
    api_base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub prefix: String,
    pub token: String,
    pub users: Vec<String>,
    pub channel_id: ChannelId,
    pub metric: MetricKind,
    pub daily_time: NaiveTime,
    pub api_base_url: String,
}

impl Config {
    /// Load from `CONFIG_PATH`, falling back to `config.json`
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_file(&path)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&contents)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(json)?;
        raw.validate()
    }
}

fn required(value: Option<String>, name: &'static str) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingField(name)),
    }
}

impl RawConfig {
    fn validate(self) -> Result<Config, ConfigError> {
        let prefix = required(self.prefix, "prefix")?;
        let token = required(self.token, "token")?;
        let channel = required(self.channel_id, "channelID")?;

        let users = match self.users {
            Some(users) if !users.is_empty() => users,
            _ => return Err(ConfigError::MissingField("users")),
        };

        let channel_id = match channel.trim().parse::<u64>() {
            Ok(id) if id != 0 => ChannelId::new(id),
            _ => return Err(ConfigError::InvalidChannelId(channel)),
        };

        let daily_time_text = self.daily_time.unwrap_or_else(|| DEFAULT_DAILY_TIME.to_string());
        let daily_time = NaiveTime::parse_from_str(daily_time_text.trim(), "%H:%M")
            .map_err(|_| ConfigError::InvalidDailyTime(daily_time_text.clone()))?;

        let api_base_url = self
            .api_base_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| TryHackMeClient::DEFAULT_BASE_URL.to_string());

        Ok(Config {
            prefix,
            token,
            users,
            channel_id,
            metric: self.metric,
            daily_time,
            api_base_url,
        })
    }
}
