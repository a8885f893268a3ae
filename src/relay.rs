//! Multi-endpoint fallback relay.
//!
//! A relay call validates the message, resolves the credential, then walks
//! the candidate models in priority order, one call at a time, until one
//! answers with a success status. Only the most recent failure is kept.

use crate::ai::gemini::{first_text, GenerateContentRequest, GenerationConfig};
use crate::ai::{ModelEndpoint, UpstreamService};
use crate::config::ApiKeySource;
use crate::error::RelayError;
use crate::models::RelayRequest;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Relay candidates, highest priority first.
pub const DEFAULT_MODELS: [&str; 4] = [
    "gemini-1.5-flash",
    "gemini-1.5-pro",
    "gemini-1.0-pro",
    "gemini-pro",
];

pub fn default_candidates() -> Vec<ModelEndpoint> {
    DEFAULT_MODELS
        .iter()
        .map(|model| ModelEndpoint::v1beta(model))
        .collect()
}

pub struct Relay {
    pub(crate) upstream: Arc<dyn UpstreamService>,
    pub(crate) api_key: ApiKeySource,
    candidates: Vec<ModelEndpoint>,
    pub(crate) probe_targets: Vec<ModelEndpoint>,
}

impl Relay {
    pub fn new(upstream: Arc<dyn UpstreamService>, api_key: ApiKeySource) -> Self {
        Self {
            upstream,
            api_key,
            candidates: default_candidates(),
            probe_targets: crate::probe::default_targets(),
        }
    }

    pub fn with_candidates(mut self, candidates: Vec<ModelEndpoint>) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn with_probe_targets(mut self, targets: Vec<ModelEndpoint>) -> Self {
        self.probe_targets = targets;
        self
    }

    pub fn candidates(&self) -> &[ModelEndpoint] {
        &self.candidates
    }

    pub(crate) fn require_api_key(&self) -> Result<String, RelayError> {
        self.api_key
            .resolve()
            .ok_or_else(|| RelayError::MissingApiKey(self.api_key.variable_name().to_string()))
    }

    /// Relay `request.message` upstream and return the first text fragment
    /// of the winning reply.
    pub async fn relay(&self, request: RelayRequest) -> Result<String, RelayError> {
        let message = request
            .message
            .filter(|m| !m.is_empty())
            .ok_or(RelayError::MissingMessage)?;

        let api_key = self.require_api_key().map_err(|e| {
            error!("{}", e);
            e
        })?;

        let body = GenerateContentRequest::user_text(&message, GenerationConfig::RELAY);
        let winner = self.first_success(&api_key, &body).await?;

        match first_text(&winner) {
            Some(text) => Ok(text.to_string()),
            None => {
                error!(body = %winner, "Invalid response format from Gemini API");
                Err(RelayError::UpstreamMalformed { body: winner })
            }
        }
    }

    async fn first_success(
        &self,
        api_key: &str,
        body: &GenerateContentRequest,
    ) -> Result<Value, RelayError> {
        let mut last_error = None;

        for endpoint in &self.candidates {
            info!(model = %endpoint.model, "Trying model");

            match self.upstream.generate_content(endpoint, api_key, body).await {
                Ok(reply) if reply.is_success() => {
                    info!(model = %endpoint.model, "Success with model");
                    return Ok(reply.json()?);
                }
                Ok(reply) => {
                    warn!(
                        model = %endpoint.model,
                        status = %reply.status,
                        error = %reply.body,
                        "Model failed"
                    );
                    last_error = Some(reply.body);
                }
                Err(e) => {
                    warn!(model = %endpoint.model, error = %e, "Model error");
                    last_error = Some(e.to_string());
                }
            }
        }

        error!(last_error = ?last_error, "All models failed");
        Err(RelayError::UpstreamExhausted { last_error })
    }
}
