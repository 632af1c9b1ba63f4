use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Encode a header value as a MIME encoded-word (RFC 2047, base64 form) so
/// non-ASCII titles survive as an HTTP header.
pub fn encode_title(title: &str) -> String {
    format!("=?utf-8?B?{}?=", STANDARD.encode(title.as_bytes()))
}

/// Remote push channel: ntfy-style POST with the message as body and the
/// title in a `Title` header.
#[derive(Debug, Clone)]
pub struct PushClient {
    client: reqwest::Client,
    url: String,
}

impl PushClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn send(&self, title: &str, message: &str) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .header("Title", encode_title(title))
            .body(message.to_string())
            .send()
            .await
            .with_context(|| format!("POST {} failed", self.url))?;

        let status = response.status();
        response
            .error_for_status()
            .with_context(|| format!("POST {} returned {}", self.url, status))?;
        Ok(())
    }
}
