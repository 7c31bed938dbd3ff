//! # Advisory Client
//!
//! Async seam to the text-generation service used for business insights and
//! restock suggestions. Prompts are built by `lanche_core::advisory`; this
//! module only moves text over HTTP.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  commands::advisory                                                     │
//! │       │ prompt (built from a cloned snapshot, lock released)           │
//! │       ▼                                                                 │
//! │  dyn AdvisoryClient ── HttpAdvisoryClient ── POST :generateContent     │
//! │       │                   (bounded by tokio::time::timeout)            │
//! │       ▼                                                                 │
//! │  Result<String, AdvisoryError> ── mapped to fixed text by the caller   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::state::AdvisoryConfig;

/// Generative Language REST endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Why an advisory request produced no text.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    #[error("advisory API key is not configured")]
    MissingApiKey,

    #[error("advisory request timed out after {0:?}")]
    Timeout(Duration),

    #[error("advisory request failed: {0}")]
    Http(String),

    #[error("advisory service returned no text")]
    EmptyReply,
}

impl From<reqwest::Error> for AdvisoryError {
    fn from(err: reqwest::Error) -> Self {
        AdvisoryError::Http(err.to_string())
    }
}

/// Turns a prompt into generated text.
#[async_trait]
pub trait AdvisoryClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError>;
}

// =============================================================================
// HTTP implementation
// =============================================================================

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, if any.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Client for the Generative Language `generateContent` REST call.
#[derive(Debug, Clone)]
pub struct HttpAdvisoryClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
    timeout: Duration,
}

impl HttpAdvisoryClient {
    pub fn new(config: &AdvisoryConfig) -> Self {
        HttpAdvisoryClient {
            http: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            timeout: config.timeout,
        }
    }

    /// Points the client at another base URL (proxies, tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Replaces the underlying HTTP client (custom TLS, proxy settings).
    pub fn with_http(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn send(&self, api_key: &str, prompt: &str) -> Result<String, AdvisoryError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        );
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
        };

        let response: GenerateResponse = self
            .http
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response.text().ok_or(AdvisoryError::EmptyReply)
    }
}

#[async_trait]
impl AdvisoryClient for HttpAdvisoryClient {
    async fn generate(&self, prompt: &str) -> Result<String, AdvisoryError> {
        let Some(api_key) = self.api_key.as_deref() else {
            warn!("Advisory requested without an API key");
            return Err(AdvisoryError::MissingApiKey);
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Sending advisory request");

        match tokio::time::timeout(self.timeout, self.send(api_key, prompt)).await {
            Ok(result) => result,
            Err(_) => Err(AdvisoryError::Timeout(self.timeout)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local_client(api_key: &str, timeout: Duration, addr: std::net::SocketAddr) -> HttpAdvisoryClient {
        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpAdvisoryClient::new(&config(Some(api_key), timeout))
            .with_http(http)
            .with_endpoint(format!("http://{addr}"))
    }

    fn config(api_key: Option<&str>, timeout: Duration) -> AdvisoryConfig {
        AdvisoryConfig {
            api_key: api_key.map(str::to_string),
            timeout,
            ..AdvisoryConfig::default()
        }
    }

    #[tokio::test]
    async fn test_missing_key_short_circuits() {
        let client = HttpAdvisoryClient::new(&config(None, Duration::from_secs(1)));
        assert!(!client.is_configured());
        let err = client.generate("oi").await.unwrap_err();
        assert!(matches!(err, AdvisoryError::MissingApiKey));
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        // accepts the connection at the kernel level but never answers
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        let client = local_client("k", Duration::from_millis(200), addr);
        let err = client.generate("oi").await.unwrap_err();

        assert!(matches!(err, AdvisoryError::Timeout(_)));
        drop(listener);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_http_error() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let client = local_client("k", Duration::from_secs(5), addr);

        let err = client.generate("oi").await.unwrap_err();
        assert!(matches!(err, AdvisoryError::Http(_)));
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "Compre " }, { "text": "pão." }] }
            }]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("Compre pão."));
    }

    #[test]
    fn test_blank_response_has_no_text() {
        let empty = GenerateResponse::default();
        assert!(empty.text().is_none());

        let blank: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "  " }] } }]
        }))
        .unwrap();
        assert!(blank.text().is_none());
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateRequest {
            contents: [Content {
                parts: [Part { text: "oi" }],
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "oi");
    }
}
