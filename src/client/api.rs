use reqwest::{RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Post, TopicDetail, TopicSummary, User};
use crate::paths::api;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ClientError {
    /// 401 with an empty body: missing, bad or expired token
    #[error("Not signed in, or the session has expired")]
    Unauthorized,

    #[error("{message} (HTTP {status})")]
    Api { status: StatusCode, message: String },

    #[error("Response had no data")]
    MissingData,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Decode(#[from] serde_json::Error),
}

/// `{ success, data?, error? }` as sent by every endpoint.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MemberSession {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminSession {
    pub token: String,
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
            token: None,
        }
    }

    /// `ROADMAP_API_URL`, else `http://localhost:3000`.
    pub fn from_env() -> Self {
        let base_url = std::env::var("ROADMAP_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn health(&self) -> Result<Value, ClientError> {
        self.send(self.http.get(format!("{}{}", self.base_url, api::HEALTH))).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<MemberSession, ClientError> {
        let body = json!({ "username": username, "password": password });
        self.send(self.request_post(api::PUBLIC, "/auth/login").json(&body))
            .await
    }

    pub async fn admin_login(&self, username: &str, password: &str) -> Result<AdminSession, ClientError> {
        let body = json!({ "username": username, "password": password });
        self.send(self.request_post(api::ADMIN, "/login").json(&body)).await
    }

    pub async fn topics(&self) -> Result<Vec<TopicSummary>, ClientError> {
        self.send(self.request_get(api::PUBLIC, "/topics")).await
    }

    pub async fn topic(&self, id: Uuid) -> Result<TopicDetail, ClientError> {
        self.send(self.request_get(api::PUBLIC, &format!("/topics/{id}")))
            .await
    }

    pub async fn posts(&self) -> Result<Vec<Post>, ClientError> {
        self.send(self.request_get(api::PUBLIC, "/posts")).await
    }

    pub async fn me(&self) -> Result<User, ClientError> {
        self.send(self.request_get(api::ME, "")).await
    }

    fn request_get(&self, prefix: &str, path: &str) -> RequestBuilder {
        self.authorize(self.http.get(format!("{}{}{}", self.base_url, prefix, path)))
    }

    fn request_post(&self, prefix: &str, path: &str) -> RequestBuilder {
        self.authorize(self.http.post(format!("{}{}{}", self.base_url, prefix, path)))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if status == StatusCode::UNAUTHORIZED && body.is_empty() {
            return Err(ClientError::Unauthorized);
        }

        let envelope: Envelope<T> = serde_json::from_slice(&body)?;
        if !envelope.success || !status.is_success() {
            return Err(ClientError::Api {
                status,
                message: envelope.error.unwrap_or_else(|| status.to_string()),
            });
        }
        envelope.data.ok_or(ClientError::MissingData)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_trailing_slash() {
        let client = ApiClient::new("http://example.test:8080/");
        assert_eq!(client.base_url(), "http://example.test:8080");
    }

    #[test]
    fn failure_envelope_decodes() {
        let envelope: Envelope<Value> =
            serde_json::from_str(r#"{"success":false,"error":"No such topic."}"#).unwrap();
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.error.as_deref(), Some("No such topic."));
    }
}
