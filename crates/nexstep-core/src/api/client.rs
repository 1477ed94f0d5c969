//! API client for communicating with the NexStep REST backend.
//!
//! This module provides the `ApiClient` struct, the HTTP implementation of
//! [`Backend`]. Every response is unwrapped from the backend's
//! `{success, data, message}` envelope.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{header, Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::Session;
use crate::models::{Activity, DashboardStats, Goal, ProfileUpdate, SkillLevel, StartedRoadmap, UserProfile};

use super::{ApiError, Backend, Envelope};

// ============================================================================
// Constants
// ============================================================================

/// Backend used when nothing is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The signed-in user's own profile, readable and writable by any role.
const CURRENT_USER_PATH: &str = "/auth/me";

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginPayload {
    #[serde(flatten)]
    user: UserProfile,
    #[serde(default)]
    token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct StartRoadmapRequest<'a> {
    goal_id: &'a str,
    skill_level: SkillLevel,
}

/// API client for the NexStep backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling,
/// and clones share the bearer token.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Arc<RwLock<Option<String>>>,
}

impl ApiClient {
    /// Create a new API client
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set or clear the bearer token for authenticated requests
    pub fn set_token(&self, token: Option<String>) {
        let mut guard = self.token.write().unwrap_or_else(|p| p.into_inner());
        *guard = token;
    }

    pub fn has_token(&self) -> bool {
        self.token
            .read()
            .map(|t| t.is_some())
            .unwrap_or_else(|p| p.into_inner().is_some())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_headers(&self) -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        let token = self.token.read().unwrap_or_else(|p| p.into_inner()).clone();
        if let Some(token) = token {
            match header::HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(header::AUTHORIZATION, value);
                }
                Err(e) => warn!(error = %e, "Token is not a valid header value, sending unauthenticated"),
            }
        }
        headers
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Send a request and unwrap the envelope around its payload.
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, fallback: &str) -> Result<T, ApiError> {
        let response = request.headers(self.auth_headers()).send().await?;
        let response = Self::check_response(response).await?;
        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        envelope.into_result(fallback)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, fallback: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        self.send(self.client.get(&url), fallback).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "POST");
        self.send(self.client.post(&url).json(body), fallback).await
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "PUT");
        self.send(self.client.put(&url).json(body), fallback).await
    }
}

#[async_trait]
impl Backend for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let payload: LoginPayload = self
            .post("/auth/login", &LoginRequest { email, password }, "Login failed. Please try again.")
            .await?;

        let token = payload
            .token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::InvalidResponse("Login response did not include a token".to_string()))?;

        Ok(Session::new(payload.user, token))
    }

    async fn fetch_goals(&self) -> Result<Vec<Goal>, ApiError> {
        self.get("/goals", "Failed to load goals").await
    }

    async fn fetch_goal(&self, goal_id: &str) -> Result<Goal, ApiError> {
        self.get(&format!("/goals/{}", goal_id), "Failed to load goal").await
    }

    async fn start_roadmap(&self, goal_id: &str, skill_level: SkillLevel) -> Result<StartedRoadmap, ApiError> {
        self.post(
            "/progress/start",
            &StartRoadmapRequest { goal_id, skill_level },
            "Failed to start roadmap",
        )
        .await
    }

    async fn fetch_dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.get("/progress/stats", "Failed to load dashboard stats").await
    }

    async fn fetch_activities(&self, limit: u32) -> Result<Vec<Activity>, ApiError> {
        self.get(&format!("/activities?limit={}", limit), "Failed to load activities")
            .await
    }

    async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        self.get(CURRENT_USER_PATH, "Failed to load profile").await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        self.put(CURRENT_USER_PATH, update, "Failed to update profile").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let client = ApiClient::new("http://localhost:5000/api/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(client.url("/goals"), "http://localhost:5000/api/goals");
    }

    #[test]
    fn test_profile_uses_current_user_route() {
        let client = ApiClient::new(DEFAULT_BASE_URL, Duration::from_secs(5)).unwrap();
        assert_eq!(client.url(CURRENT_USER_PATH), "http://localhost:5000/api/auth/me");
    }

    #[test]
    fn test_token_is_shared_between_clones() {
        let client = ApiClient::new(DEFAULT_BASE_URL, Duration::from_secs(5)).unwrap();
        let clone = client.clone();
        client.set_token(Some("abc".to_string()));
        assert!(clone.has_token());
        assert_eq!(
            clone.auth_headers().get(header::AUTHORIZATION).unwrap(),
            "Bearer abc"
        );
        clone.set_token(None);
        assert!(!client.has_token());
        assert!(client.auth_headers().is_empty());
    }

    #[test]
    fn test_parse_login_payload() {
        let json = r#"{"success":true,"data":{"id":"u1","name":"Ada","email":"ada@example.com","role":"admin","token":"jwt"}}"#;
        let envelope: Envelope<LoginPayload> = serde_json::from_str(json).unwrap();
        let payload = envelope.into_result("fallback").unwrap();
        assert_eq!(payload.token.as_deref(), Some("jwt"));
        assert!(payload.user.is_admin());
    }

    #[test]
    fn test_start_request_wire_format() {
        let body = StartRoadmapRequest {
            goal_id: "g1",
            skill_level: SkillLevel::Intermediate,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"goalId":"g1","skillLevel":"intermediate"}"#
        );
    }
}
