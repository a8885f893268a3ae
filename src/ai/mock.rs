use super::gemini::types::GenerateContentRequest;
use super::{ModelEndpoint, UpstreamReply, UpstreamService};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
enum MockOutcome {
    Reply { status: StatusCode, body: String },
    TransportError(String),
}

/// Scripted upstream keyed by model id, recording every call in order.
///
/// Models without a scripted outcome answer 404.
pub struct MockUpstream {
    outcomes: Arc<Mutex<HashMap<String, MockOutcome>>>,
    calls: Arc<Mutex<Vec<ModelEndpoint>>>,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self {
            outcomes: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_reply(self, model: &str, status: u16, body: impl Into<String>) -> Self {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.outcomes.lock().unwrap().insert(
            model.to_string(),
            MockOutcome::Reply {
                status,
                body: body.into(),
            },
        );
        self
    }

    /// Successful reply whose first candidate carries `text`.
    pub fn with_text(self, model: &str, text: &str) -> Self {
        let body = serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        });
        self.with_reply(model, 200, body.to_string())
    }

    pub fn with_transport_error(self, model: &str, message: &str) -> Self {
        self.outcomes.lock().unwrap().insert(
            model.to_string(),
            MockOutcome::TransportError(message.to_string()),
        );
        self
    }

    /// Models called so far, in call order.
    pub fn called_models(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.model.clone())
            .collect()
    }

    pub fn get_call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Default for MockUpstream {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpstreamService for MockUpstream {
    async fn generate_content(
        &self,
        endpoint: &ModelEndpoint,
        _api_key: &str,
        _request: &GenerateContentRequest,
    ) -> Result<UpstreamReply> {
        self.calls.lock().unwrap().push(endpoint.clone());

        let outcome = self.outcomes.lock().unwrap().get(&endpoint.model).cloned();
        match outcome {
            Some(MockOutcome::Reply { status, body }) => Ok(UpstreamReply { status, body }),
            Some(MockOutcome::TransportError(message)) => Err(Error::Transport(message)),
            None => Ok(UpstreamReply {
                status: StatusCode::NOT_FOUND,
                body: format!("models/{} is not found", endpoint.model),
            }),
        }
    }

    fn endpoint_url(&self, endpoint: &ModelEndpoint) -> String {
        format!("mock://{}", endpoint.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::gemini::types::GenerationConfig;

    fn request() -> GenerateContentRequest {
        GenerateContentRequest::user_text("hi", GenerationConfig::RELAY)
    }

    #[tokio::test]
    async fn test_mock_upstream_default_is_not_found() {
        let upstream = MockUpstream::new();
        let reply = upstream
            .generate_content(&ModelEndpoint::v1beta("gemini-pro"), "k", &request())
            .await
            .unwrap();

        assert_eq!(reply.status, StatusCode::NOT_FOUND);
        assert_eq!(upstream.get_call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_upstream_records_call_order() {
        let upstream = MockUpstream::new()
            .with_transport_error("a", "connection reset")
            .with_text("b", "hello");

        let err = upstream
            .generate_content(&ModelEndpoint::v1beta("a"), "k", &request())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Transport(_)));

        let reply = upstream
            .generate_content(&ModelEndpoint::v1beta("b"), "k", &request())
            .await
            .unwrap();
        assert!(reply.is_success());

        assert_eq!(upstream.called_models(), vec!["a", "b"]);
    }
}
