//! Endpoint probe: checks which upstream endpoint answers for the configured
//! credential, stopping at the first that does.

use crate::ai::gemini::{first_text, GenerateContentRequest, GenerationConfig};
use crate::ai::ModelEndpoint;
use crate::error::RelayError;
use crate::models::{ProbeEntry, ProbeReport};
use crate::relay::Relay;
use tracing::{info, warn};

pub const PROBE_MESSAGE: &str = "Hello, respond with just 'OK'";
pub const REPORT_MESSAGE: &str = "API Key and endpoint test results";
const NO_TEXT: &str = "No text found";

pub fn default_targets() -> Vec<ModelEndpoint> {
    vec![
        ModelEndpoint::v1beta("gemini-pro"),
        ModelEndpoint::v1beta("gemini-1.5-pro"),
        ModelEndpoint::v1("gemini-pro"),
        ModelEndpoint::v1beta("gemini-1.0-pro"),
    ]
}

impl Relay {
    pub async fn probe(&self) -> Result<ProbeReport, RelayError> {
        let api_key = self.require_api_key()?;
        let request = GenerateContentRequest::user_text(PROBE_MESSAGE, GenerationConfig::PROBE);

        let mut results = Vec::with_capacity(self.probe_targets.len());

        for target in &self.probe_targets {
            let endpoint = self.upstream.endpoint_url(target);
            info!(endpoint = %endpoint, "Testing endpoint");

            let entry = match self.upstream.generate_content(target, &api_key, &request).await {
                Ok(reply) if reply.is_success() => match reply.json() {
                    Ok(body) => ProbeEntry {
                        endpoint,
                        status: Some(reply.status.as_u16()),
                        ok: Some(true),
                        success: true,
                        response: Some(
                            first_text(&body)
                                .filter(|t| !t.is_empty())
                                .unwrap_or(NO_TEXT)
                                .to_string(),
                        ),
                        error: None,
                    },
                    Err(e) => failed(endpoint, e.to_string()),
                },
                Ok(reply) => ProbeEntry {
                    endpoint,
                    status: Some(reply.status.as_u16()),
                    ok: Some(false),
                    success: false,
                    response: None,
                    error: Some(reply.body),
                },
                Err(e) => {
                    warn!(endpoint = %endpoint, error = %e, "Endpoint error");
                    failed(endpoint, e.to_string())
                }
            };

            let success = entry.success;
            results.push(entry);
            if success {
                break;
            }
        }

        let working_endpoint = results
            .iter()
            .find(|r| r.success)
            .map(|r| r.endpoint.clone());

        Ok(ProbeReport {
            message: REPORT_MESSAGE.to_string(),
            results,
            working_endpoint,
        })
    }
}

fn failed(endpoint: String, error: String) -> ProbeEntry {
    ProbeEntry {
        endpoint,
        status: None,
        ok: None,
        success: false,
        response: None,
        error: Some(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::MockUpstream;
    use crate::config::ApiKeySource;
    use std::sync::Arc;

    fn relay_with(upstream: Arc<MockUpstream>, key: Option<&str>) -> Relay {
        Relay::new(upstream, ApiKeySource::Static(key.map(str::to_string))).with_probe_targets(
            vec![
                ModelEndpoint::v1beta("a"),
                ModelEndpoint::v1("b"),
                ModelEndpoint::v1beta("c"),
            ],
        )
    }

    #[test]
    fn test_default_targets_mix_api_versions() {
        let paths: Vec<String> = default_targets().iter().map(|t| t.path()).collect();
        assert_eq!(
            paths,
            vec![
                "v1beta/models/gemini-pro:generateContent",
                "v1beta/models/gemini-1.5-pro:generateContent",
                "v1/models/gemini-pro:generateContent",
                "v1beta/models/gemini-1.0-pro:generateContent",
            ]
        );
    }

    #[tokio::test]
    async fn test_probe_stops_at_first_working_endpoint() {
        let upstream = Arc::new(
            MockUpstream::new()
                .with_reply("a", 403, "forbidden")
                .with_text("b", "OK")
                .with_text("c", "never reached"),
        );
        let relay = relay_with(upstream.clone(), Some("k"));

        let report = relay.probe().await.unwrap();

        assert_eq!(report.message, REPORT_MESSAGE);
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].status, Some(403));
        assert_eq!(report.results[0].error.as_deref(), Some("forbidden"));
        assert_eq!(report.results[1].response.as_deref(), Some("OK"));
        assert_eq!(
            report.working_endpoint.as_deref(),
            Some("mock://v1/models/b:generateContent")
        );
        assert_eq!(upstream.called_models(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_probe_records_failures_and_continues() {
        let upstream = Arc::new(
            MockUpstream::new()
                .with_transport_error("a", "timed out")
                .with_reply("b", 200, "not json")
                .with_reply("c", 200, r#"{"candidates":[]}"#),
        );
        let relay = relay_with(upstream, Some("k"));

        let report = relay.probe().await.unwrap();

        assert_eq!(report.results.len(), 3);
        assert!(!report.results[0].success);
        assert!(report.results[0].status.is_none());
        assert!(!report.results[1].success);
        assert!(report.results[2].success);
        assert_eq!(report.results[2].response.as_deref(), Some("No text found"));
        assert_eq!(
            report.working_endpoint.as_deref(),
            Some("mock://v1beta/models/c:generateContent")
        );
    }

    #[tokio::test]
    async fn test_empty_text_reports_no_text_found() {
        let upstream = Arc::new(MockUpstream::new().with_text("a", ""));
        let relay = relay_with(upstream, Some("k"));

        let report = relay.probe().await.unwrap();

        assert_eq!(report.results.len(), 1);
        assert!(report.results[0].success);
        assert_eq!(report.results[0].response.as_deref(), Some("No text found"));
    }

    #[tokio::test]
    async fn test_probe_without_working_endpoint() {
        let upstream = Arc::new(MockUpstream::new());
        let relay = relay_with(upstream.clone(), Some("k"));

        let report = relay.probe().await.unwrap();

        assert_eq!(report.results.len(), 3);
        assert!(report.working_endpoint.is_none());
    }

    #[tokio::test]
    async fn test_probe_fails_closed_without_key() {
        let upstream = Arc::new(MockUpstream::new().with_text("a", "OK"));
        let relay = relay_with(upstream.clone(), None);

        let err = relay.probe().await.unwrap_err();
        assert!(matches!(err, RelayError::MissingApiKey(_)));
        assert_eq!(upstream.get_call_count(), 0);
    }
}
