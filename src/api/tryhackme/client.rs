use std::time::Duration;

use reqwest::{Client as HttpClient, Url};
use serde::de::{DeserializeOwned, IgnoredAny};
use tracing::{debug, warn};

use super::models::{ApiError, UserRankResponse, UserResponse};

/// TryHackMe public API client
pub struct TryHackMeClient {
    http_client: HttpClient,
    base_url: String,
}

impl TryHackMeClient {
    pub const DEFAULT_BASE_URL: &'static str = "https://tryhackme.com";
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Create a client against `base_url`, normally `DEFAULT_BASE_URL`
    pub fn with_base_url(base_url: String) -> Self {
        let http_client = HttpClient::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build HTTP client with timeout, using defaults: {}", e);
                HttpClient::new()
            });

        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Map a non-success response to an `ApiError`
    async fn handle_error_response(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> ApiError {
        let status_code = status.as_u16();
        let body_text = response.text().await.unwrap_or_default();

        match status_code {
            404 => ApiError::NotFound(body_text),
            500..=599 => {
                warn!("Server error {}: {}", status_code, body_text);
                ApiError::ServerError(status_code, body_text)
            }
            _ => ApiError::HttpError(status_code, body_text),
        }
    }

    /// `{base_url}/{endpoint..}/{username}` with the username kept as one
    /// percent-encoded path segment
    fn endpoint_url(&self, endpoint: &[&str], username: &str) -> Result<Url, ApiError> {
        if username.is_empty() || username == "." || username == ".." {
            return Err(ApiError::InvalidUsername(username.to_string()));
        }

        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ApiError::RequestError(format!("Invalid base URL {}: {}", self.base_url, e)))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::RequestError(format!("Base URL cannot take a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(endpoint)
            .push(username);

        Ok(url)
    }

    /// GET `url` and decode the body as `T`
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        debug!("GET {}", url);

        let response = self.http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::RequestError(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Self::handle_error_response(status, response).await);
        }

        let body = response
            .text()
            .await
            .map_err(|e| ApiError::RequestError(format!("Failed to read body: {}", e)))?;

        decode_body(&body)
    }

    /// GET /api/user/{username}
    ///
    /// Rank and points from the combined user endpoint.
    pub async fn get_user(&self, username: &str) -> Result<UserResponse, ApiError> {
        self.get_json(self.endpoint_url(&["api", "user"], username)?).await
    }

    /// GET /api/usersRank/{username}
    pub async fn get_user_rank(&self, username: &str) -> Result<UserRankResponse, ApiError> {
        self.get_json(self.endpoint_url(&["api", "usersRank"], username)?).await
    }

    /// GET /api/all-completed-rooms/{username}
    ///
    /// Only the number of entries matters, room contents are skipped.
    pub async fn get_completed_room_count(&self, username: &str) -> Result<usize, ApiError> {
        let rooms: Vec<IgnoredAny> = self
            .get_json(self.endpoint_url(&["api", "all-completed-rooms"], username)?)
            .await?;
        Ok(rooms.len())
    }
}

fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body)
        .map_err(|e| ApiError::DeserializationError(format!("Failed to parse response: {}", e)))
}


#[cfg(test)]
mod tests {
    use super::test_server::{closed_port, serve, Route};
    use super::*;

    #[tokio::test]
    async fn test_get_user_decodes_rank_and_points() {
        let base = serve(vec![Route {
            path: "/api/user/carol",
            status: 200,
            body: r#"{"username":"carol","userRank":10,"points":20}"#,
        }])
        .await;

        let user = TryHackMeClient::with_base_url(base).get_user("carol").await.expect("user");
        assert_eq!(user.user_rank, Some(10));
        assert_eq!(user.points, Some(20));
    }

    #[tokio::test]
    async fn test_null_numbers_decode_as_missing() {
        let base = serve(vec![Route {
            path: "/api/user/ghost",
            status: 200,
            body: r#"{"userRank":null}"#,
        }])
        .await;

        let user = TryHackMeClient::with_base_url(base).get_user("ghost").await.expect("user");
        assert_eq!(user.user_rank, None);
        assert_eq!(user.points, None);
    }

    #[tokio::test]
    async fn test_malformed_body_is_deserialization_error() {
        let base = serve(vec![Route {
            path: "/api/user/bad",
            status: 200,
            body: "<html>oops</html>",
        }])
        .await;

        let err = TryHackMeClient::with_base_url(base).get_user("bad").await.unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[tokio::test]
    async fn test_status_codes_map_to_errors() {
        let base = serve(vec![Route {
            path: "/api/user/broken",
            status: 503,
            body: "down",
        }])
        .await;
        let client = TryHackMeClient::with_base_url(base);

        assert_eq!(
            client.get_user("broken").await.unwrap_err(),
            ApiError::ServerError(503, "down".to_string())
        );
        assert!(matches!(client.get_user("nobody").await.unwrap_err(), ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_completed_rooms_counts_entries() {
        let base = serve(vec![Route {
            path: "/api/all-completed-rooms/erin",
            status: 200,
            body: r#"[{"code":"tutorial"},{"code":"linux1","title":"Linux"},{}]"#,
        }])
        .await;

        let count = TryHackMeClient::with_base_url(base)
            .get_completed_room_count("erin")
            .await
            .expect("count");
        assert_eq!(count, 3);
    }

    #[tokio::test]
    async fn test_connection_refused_is_request_error() {
        let client = TryHackMeClient::with_base_url(closed_port().await);
        assert!(matches!(client.get_user_rank("dave").await.unwrap_err(), ApiError::RequestError(_)));
    }

    #[test]
    fn test_username_stays_one_path_segment() {
        let client = TryHackMeClient::with_base_url("https://tryhackme.com".to_string());

        let url = client.endpoint_url(&["api", "user"], "../usersRank/erin").expect("url");
        assert_eq!(url.path(), "/api/user/..%2FusersRank%2Ferin");

        let url = client.endpoint_url(&["api", "user"], "carol#x").expect("url");
        assert_eq!(url.path(), "/api/user/carol%23x");
        assert_eq!(url.fragment(), None);

        let url = client.endpoint_url(&["api", "user"], "carol?x=1").expect("url");
        assert_eq!(url.path(), "/api/user/carol%3Fx=1");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_dot_usernames_are_rejected() {
        let client = TryHackMeClient::with_base_url("https://tryhackme.com".to_string());
        for name in ["", ".", ".."] {
            assert!(matches!(
                client.endpoint_url(&["api", "user"], name),
                Err(ApiError::InvalidUsername(_))
            ));
        }
    }

    #[test]
    fn test_base_url_path_is_kept() {
        let client = TryHackMeClient::with_base_url("http://localhost:8080/mirror/".to_string());
        let url = client.endpoint_url(&["api", "usersRank"], "erin").expect("url");
        assert_eq!(url.as_str(), "http://localhost:8080/mirror/api/usersRank/erin");
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = TryHackMeClient::with_base_url("https://tryhackme.com/".to_string());
        assert_eq!(client.base_url, "https://tryhackme.com");
    }
}
