//! Error handling and custom error types
//!
//! `Error` covers failures inside the crate (upstream transport, decoding,
//! configuration). `RelayError` is the taxonomy answered to inbound callers;
//! every `Error` that reaches the handler boundary becomes
//! `RelayError::Internal`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Transport failure without a `reqwest::Error` behind it; raised by
    /// `MockUpstream` to script a dropped connection.
    #[error("Upstream transport error: {0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Terminal failures of a relay or probe call, one per client-visible outcome.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Message is required")]
    MissingMessage,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("API key not configured. Please set {0} environment variable.")]
    MissingApiKey(String),

    #[error("All Gemini models failed")]
    UpstreamExhausted { last_error: Option<String> },

    #[error("Invalid response format from Gemini API")]
    UpstreamMalformed { body: Value },

    #[error("Internal server error")]
    Internal(String),
}

impl RelayError {
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::MissingMessage => StatusCode::BAD_REQUEST,
            RelayError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            RelayError::MissingApiKey(_)
            | RelayError::UpstreamExhausted { .. }
            | RelayError::UpstreamMalformed { .. }
            | RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn details(&self) -> Option<Value> {
        match self {
            RelayError::UpstreamExhausted { last_error } => {
                last_error.clone().map(Value::String)
            }
            RelayError::UpstreamMalformed { body } => Some(body.clone()),
            RelayError::Internal(message) => Some(Value::String(message.clone())),
            _ => None,
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
            details: self.details(),
        }
    }
}

impl From<Error> for RelayError {
    fn from(e: Error) -> Self {
        RelayError::Internal(e.to_string())
    }
}

/// JSON body of every failed call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
