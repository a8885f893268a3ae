use super::types::GenerateContentRequest;
use crate::ai::{ModelEndpoint, UpstreamReply, UpstreamService};
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Lightweight Gemini REST client shared by relay and probe calls.
///
/// The credential travels as the `key` query parameter. Transport errors are
/// stripped of their URL so the key never reaches logs or relayed details.
pub struct GeminiHttpClient {
    client: Client,
    base_url: String,
}

impl GeminiHttpClient {
    pub fn new(base_url: String) -> Self {
        Self::new_with_client(base_url, Client::new())
    }

    pub fn new_with_client(base_url: String, client: Client) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl UpstreamService for GeminiHttpClient {
    async fn generate_content(
        &self,
        endpoint: &ModelEndpoint,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<UpstreamReply> {
        tracing::debug!(model = %endpoint.model, "Sending generateContent request to Gemini");

        let response = self
            .client
            .post(self.endpoint_url(endpoint))
            .query(&[("key", api_key)])
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::error!("Failed to send request to Gemini: {}", e);
                Error::Http(e)
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| Error::Http(e.without_url()))?;

        Ok(UpstreamReply { status, body })
    }

    fn endpoint_url(&self, endpoint: &ModelEndpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }
}
