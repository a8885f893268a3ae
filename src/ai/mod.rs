//! Upstream generative-language service integration
//!
//! Provides the seam between the relay and the Gemini `generateContent` API:
//! a model endpoint descriptor, the raw reply of one call, and the service
//! trait with a reqwest-backed and a scripted implementation.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiHttpClient;
pub use mock::MockUpstream;

use crate::Result;
use async_trait::async_trait;
use gemini::types::GenerateContentRequest;
use reqwest::StatusCode;
use serde_json::Value;

/// One addressable model on the upstream API, e.g. `v1beta` / `gemini-1.5-flash`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelEndpoint {
    pub api_version: String,
    pub model: String,
}

impl ModelEndpoint {
    /// `model` may be given with or without a `models/` prefix.
    pub fn new(api_version: &str, model: &str) -> Self {
        let model = model.strip_prefix("models/").unwrap_or(model);
        Self {
            api_version: api_version.to_string(),
            model: model.to_string(),
        }
    }

    pub fn v1beta(model: &str) -> Self {
        Self::new("v1beta", model)
    }

    pub fn v1(model: &str) -> Self {
        Self::new("v1", model)
    }

    /// Path below the API base, without a leading slash.
    pub fn path(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_version, self.model)
    }
}

/// Status and undecoded body of a completed upstream call.
#[derive(Debug, Clone)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: String,
}

impl UpstreamReply {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json(&self) -> Result<Value> {
        serde_json::from_str(&self.body).map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}\nBody: {}", e, self.body);
            crate::Error::from(e)
        })
    }
}

#[async_trait]
pub trait UpstreamService: Send + Sync {
    /// Issue one `generateContent` call. Transport failures are `Err`; any
    /// HTTP status, successful or not, is an `Ok` reply.
    async fn generate_content(
        &self,
        endpoint: &ModelEndpoint,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<UpstreamReply>;

    /// Credential-free URL of `endpoint`, for reports and logs.
    fn endpoint_url(&self, endpoint: &ModelEndpoint) -> String;
}
