//! Client for the X-UI dashboard family.
//!
//! All three flavors log in with a form POST to `/login` and carry the session
//! cookie afterwards; they differ only in the inbound list endpoint and verb.
//! Responses share the `{success, msg, obj}` envelope.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::error::PanelError;
use crate::inbound::Inbound;
use crate::PanelApi;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Which X-UI lineage the panel runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XuiFlavor {
    /// Original x-ui (and the Sanaei/Alireza forks still on its API).
    Classic,
    /// 3x-ui.
    ThreeX,
    /// tx-ui.
    TxUi,
}

impl XuiFlavor {
    fn list_path(&self) -> &'static str {
        match self {
            XuiFlavor::Classic => "/xui/inbound/list",
            XuiFlavor::ThreeX | XuiFlavor::TxUi => "/panel/api/inbounds/list",
        }
    }

    /// Classic posts to its list endpoint; the newer forks expose a GET API.
    fn list_is_post(&self) -> bool {
        matches!(self, XuiFlavor::Classic)
    }
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    msg: String,
    obj: Option<T>,
}

#[derive(Debug)]
pub struct XuiClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
    flavor: XuiFlavor,
}

impl XuiClient {
    pub fn new(
        base_url: &str,
        username: &str,
        password: &str,
        flavor: XuiFlavor,
    ) -> Result<Self, PanelError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            password: password.to_string(),
            flavor,
        })
    }

    /// Form login; the session cookie lands in the client's jar.
    async fn login(&self) -> Result<(), PanelError> {
        let url = format!("{}/login", self.base_url);
        debug!(url = %url, "Logging in to X-UI panel");

        let response = self
            .http
            .post(&url)
            .form(&[
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PanelError::Auth(format!(
                "login returned HTTP {}",
                response.status()
            )));
        }

        let body: ApiEnvelope<serde_json::Value> = response.json().await?;
        if !body.success {
            let msg = if body.msg.is_empty() {
                "invalid credentials".to_string()
            } else {
                body.msg
            };
            return Err(PanelError::Auth(msg));
        }

        Ok(())
    }
}

#[async_trait]
impl PanelApi for XuiClient {
    async fn list_inbounds(&self) -> Result<Vec<Inbound>, PanelError> {
        self.login().await?;

        let url = format!("{}{}", self.base_url, self.flavor.list_path());
        let request = if self.flavor.list_is_post() {
            self.http.post(&url)
        } else {
            self.http.get(&url)
        };

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(PanelError::Api(format!(
                "inbound list returned HTTP {}",
                response.status()
            )));
        }

        let body: ApiEnvelope<Vec<Inbound>> = response.json().await?;
        if !body.success {
            return Err(PanelError::Api(body.msg));
        }

        let inbounds = body.obj.unwrap_or_default();
        debug!(count = inbounds.len(), "Fetched X-UI inbound list");
        Ok(inbounds)
    }
}
