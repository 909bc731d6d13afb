#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Method, RequestBuilder, Response};
use serde_json::{json, Value};

use roadmap_api::app;
use roadmap_api::config::{AppConfig, SeedConfig};
use roadmap_api::database::models::{NewRoadmap, Topic};
use roadmap_api::database::MemoryStore;
use roadmap_api::state::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "correct-horse";

/// One server per test, on its own port, backed by an empty memory store.
pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::development();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = port;
        config.database.url = "memory://".to_string();
        config.security.jwt_secret = TEST_SECRET.to_string();
        config.security.bcrypt_cost = 4;

        let state = AppState::new(Arc::new(MemoryStore::new()), config);
        let listener = tokio::net::TcpListener::bind(state.config.bind_addr())
            .await
            .context("failed to bind test port")?;

        let router = app::router(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            base_url,
            state,
            client: reqwest::Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let request = self.client.request(method, self.url(path));
        match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<Response> {
        Ok(self.request(Method::GET, path, token).send().await?)
    }

    pub async fn send_json(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> Result<Response> {
        Ok(self.request(method, path, token).json(&body).send().await?)
    }

    /// Registers a member and returns their token.
    pub async fn register(&self, username: &str) -> Result<String> {
        let res = self
            .send_json(
                Method::POST,
                "/api/public/auth/register",
                None,
                json!({ "username": username, "password": PASSWORD }),
            )
            .await?;
        anyhow::ensure!(res.status().as_u16() == 201, "register failed: {}", res.status());
        token_of(res).await
    }

    /// Seeds the admin row and signs in as it.
    pub async fn admin_token(&self) -> Result<String> {
        let seed = SeedConfig {
            admin_username: "admin".to_string(),
            admin_password: "admin".to_string(),
        };
        roadmap_api::seed::seed_admin(self.state.store.as_ref(), &seed, 4).await?;

        let res = self
            .send_json(
                Method::POST,
                "/api/admin/login",
                None,
                json!({ "username": "admin", "password": "admin" }),
            )
            .await?;
        anyhow::ensure!(res.status().is_success(), "admin login failed: {}", res.status());
        token_of(res).await
    }

    pub async fn insert_topic(&self, name: &str, roadmaps: &[(&str, &str)]) -> Result<Topic> {
        let roadmaps: Vec<NewRoadmap> = roadmaps
            .iter()
            .map(|(title, url)| NewRoadmap::new(*title, *url))
            .collect();
        Ok(self.state.store.insert_topic(name, &roadmaps).await?)
    }
}

async fn token_of(res: Response) -> Result<String> {
    let body: Value = res.json().await?;
    body["data"]["token"]
        .as_str()
        .map(str::to_string)
        .context("response carried no token")
}

/// Status plus parsed JSON body.
pub async fn read(res: Response) -> Result<(u16, Value)> {
    let status = res.status().as_u16();
    let body = res.json::<Value>().await?;
    Ok((status, body))
}

/// Asserts the failure envelope with `message` as its error text.
pub fn assert_failure(body: &Value, message: &str) {
    assert_eq!(body["success"], json!(false), "body: {body}");
    assert_eq!(body["error"], json!(message), "body: {body}");
}
