use serde::Deserialize;

/// Response from GET /api/user/{username}
#[derive(Debug, Clone, Deserialize)]
pub struct UserResponse {
    #[serde(rename = "userRank", default)]
    pub user_rank: Option<i64>,
    #[serde(default)]
    pub points: Option<i64>,
}

/// Response from GET /api/usersRank/{username}
#[derive(Debug, Clone, Deserialize)]
pub struct UserRankResponse {
    #[serde(rename = "userRank", default)]
    pub user_rank: Option<i64>,
}

/// Error type for TryHackMe API calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// 404 Not Found
    NotFound(String),
    /// 5xx Server Error
    ServerError(u16, String),
    /// Other non-success statuses
    HttpError(u16, String),
    /// Network/request error, including timeouts
    RequestError(String),
    /// Body was not the JSON we expected
    DeserializationError(String),
    /// Username that cannot be a single URL path segment
    InvalidUsername(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::ServerError(code, msg) => write!(f, "Server Error ({}): {}", code, msg),
            ApiError::HttpError(code, msg) => write!(f, "HTTP Error ({}): {}", code, msg),
            ApiError::RequestError(msg) => write!(f, "Request Error: {}", msg),
            ApiError::DeserializationError(msg) => write!(f, "Deserialization Error: {}", msg),
            ApiError::InvalidUsername(name) => write!(f, "Invalid username: {:?}", name),
        }
    }
}

impl std::error::Error for ApiError {}
