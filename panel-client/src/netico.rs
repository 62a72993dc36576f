//! Client for the Netico reseller panel.
//!
//! Logs in with a JSON POST and authorizes follow-up calls with the returned
//! bearer token. The inbound list comes back as a bare array.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::PanelError;
use crate::inbound::Inbound;
use crate::PanelApi;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: Option<String>,
    access_token: Option<String>,
}

#[derive(Debug)]
pub struct NeticoClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl NeticoClient {
    pub fn new(base_url: &str, username: &str, password: &str) -> Result<Self, PanelError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    async fn login(&self) -> Result<String, PanelError> {
        let url = format!("{}/api/v1/auth/login", self.base_url);
        debug!(url = %url, "Logging in to Netico panel");

        let response = self
            .http
            .post(&url)
            .json(&serde_json::json!({
                "username": self.username,
                "password": self.password,
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PanelError::Auth(format!(
                "login returned HTTP {}",
                response.status()
            )));
        }

        let body: LoginResponse = response.json().await?;
        body.token
            .or(body.access_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| PanelError::Auth("login response carried no token".to_string()))
    }
}

#[async_trait]
impl PanelApi for NeticoClient {
    async fn list_inbounds(&self) -> Result<Vec<Inbound>, PanelError> {
        let token = self.login().await?;

        let url = format!("{}/api/v1/inbounds", self.base_url);
        let response = self.http.get(&url).bearer_auth(token).send().await?;

        if !response.status().is_success() {
            return Err(PanelError::Api(format!(
                "inbound list returned HTTP {}",
                response.status()
            )));
        }

        let inbounds: Vec<Inbound> = response.json().await?;
        debug!(count = inbounds.len(), "Fetched Netico inbound list");
        Ok(inbounds)
    }
}
