use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// ApiError
///
/// The one error shape the view layer ever sees. Built once, at the API-client boundary,
/// from whatever the backend or the transport produced; nothing downstream probes raw
/// response bodies.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request was rejected as malformed (HTTP 400/422) or failed local checks.
    #[error("{0}")]
    Validation(String),

    /// Bad credentials, revoked or missing token (HTTP 401/403).
    #[error("{0}")]
    Auth(String),

    /// The backend could not be reached or did not answer in time.
    #[error("Network error: {0}")]
    Network(String),

    #[error("{0}")]
    Unknown(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn unknown(msg: impl Into<String>) -> Self {
        Self::Unknown(msg.into())
    }

    /// from_status
    ///
    /// Classifies a non-success backend response. `message` is the backend's own
    /// `{"message": ...}` text when it sent one.
    pub fn from_status(status: u16, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("Request failed with status {}", status));

        match status {
            400 | 422 => Self::Validation(message),
            401 | 403 => Self::Auth(message),
            _ => Self::Unknown(message),
        }
    }

    /// Stable tag used in the JSON error body.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Auth(_) => "auth",
            Self::Network(_) => "network",
            Self::Unknown(_) => "unknown",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Network(_) => StatusCode::BAD_GATEWAY,
            Self::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() || err.is_request() {
            Self::Network(err.to_string())
        } else if let Some(status) = err.status() {
            Self::from_status(status.as_u16(), None)
        } else {
            Self::Unknown(err.to_string())
        }
    }
}

/// ErrorBody
///
/// JSON body of every error response produced by the gateway.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "auth")]
    pub kind: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            kind: self.kind().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
