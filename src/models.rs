//! Inbound and outbound JSON bodies of the relay's HTTP surface.

use serde::{Deserialize, Serialize};

/// Body of a relay call. `message` stays optional here so that an absent
/// message surfaces as a client error instead of a decoding failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RelayRequest {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayResponse {
    pub response: String,
}

/// Outcome of probing one upstream endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeEntry {
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeReport {
    pub message: String,
    pub results: Vec<ProbeEntry>,
    #[serde(rename = "workingEndpoint")]
    pub working_endpoint: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_relay_request_message_optional() {
        let request: RelayRequest = serde_json::from_str("{}").unwrap();
        assert!(request.message.is_none());

        let request: RelayRequest = serde_json::from_str(r#"{"message":null}"#).unwrap();
        assert!(request.message.is_none());

        let request: RelayRequest =
            serde_json::from_str(r#"{"message":"hi","extra":1}"#).unwrap();
        assert_eq!(request.message.as_deref(), Some("hi"));
    }

    #[test]
    fn test_relay_request_rejects_non_string_message() {
        assert!(serde_json::from_str::<RelayRequest>(r#"{"message":42}"#).is_err());
    }

    #[test]
    fn test_probe_report_serializes_null_working_endpoint() {
        let report = ProbeReport {
            message: "API Key and endpoint test results".to_string(),
            results: vec![ProbeEntry {
                endpoint: "https://example.test/v1/models/gemini-pro:generateContent"
                    .to_string(),
                status: Some(404),
                ok: Some(false),
                success: false,
                response: None,
                error: Some("not found".to_string()),
            }],
            working_endpoint: None,
        };

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "message": "API Key and endpoint test results",
                "results": [{
                    "endpoint": "https://example.test/v1/models/gemini-pro:generateContent",
                    "status": 404,
                    "ok": false,
                    "success": false,
                    "error": "not found"
                }],
                "workingEndpoint": null
            })
        );
    }
}
