//! HTTP transport seam for the chat-completion call.
//!
//! The client only needs "POST this JSON with a bearer token, give me
//! status + body". Keeping that behind a trait lets tests count calls
//! and script replies without a network.

use async_trait::async_trait;

/// Raw HTTP reply: status code and the unparsed body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send one POST request. `Err` means no HTTP reply was obtained.
    async fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &serde_json::Value,
    ) -> Result<HttpReply, String>;
}

/// Production transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl ChatTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &serde_json::Value,
    ) -> Result<HttpReply, String> {
        let resp = self
            .client
            .post(url)
            .bearer_auth(bearer)
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| format!("Failed to read response: {}", e))?;
        Ok(HttpReply { status, body })
    }
}
