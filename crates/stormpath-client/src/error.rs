//! Error types for the client library.

use serde::Deserialize;
use thiserror::Error;

/// Result alias used throughout the client.
pub type Result<T, E = ClientError> = std::result::Result<T, E>;

/// Structured error payload returned by the service.
///
/// Every field is optional on the wire; missing fields decode to their
/// defaults so a partial payload still yields a usable error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceErrorResponse {
    /// HTTP status the service reports for the error.
    #[serde(default)]
    pub status: u16,
    /// Service-specific error code.
    #[serde(default)]
    pub code: u32,
    /// End-user facing message.
    #[serde(default)]
    pub message: String,
    /// Detailed message intended for developers.
    #[serde(default)]
    pub developer_message: String,
    /// Link to documentation about the error.
    #[serde(default)]
    pub more_info: String,
}

/// Errors that can occur when talking to the Stormpath API.
///
/// None of these are retried by the client. Each one is terminal for the
/// operation that produced it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Network or HTTP transport failure.
    ///
    /// DNS resolution, connection, TLS and timeout errors all land here.
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Middleware layer error.
    #[error("Middleware error: {0}")]
    MiddlewareError(#[from] reqwest_middleware::Error),

    /// JSON serialization or deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Tenant discovery received a status other than the redirect it expects.
    #[error("tenant discovery failed: unexpected status {actual} (expected {expected})")]
    UnexpectedStatus {
        /// Status the protocol requires.
        expected: u16,
        /// Status the service returned.
        actual: u16,
    },

    /// Tenant discovery received a redirect without a `Location` header.
    #[error("tenant discovery failed: missing redirect target")]
    MissingRedirect,

    /// Well-formed error response from the service.
    #[error("{developer_message} More Info: {more_info}")]
    ServiceError {
        /// HTTP status of the response.
        status: u16,
        /// Service-specific error code.
        code: u32,
        /// Detailed message intended for developers.
        developer_message: String,
        /// Link to documentation about the error.
        more_info: String,
    },

    /// Non-success response without a structured error payload.
    #[error("Request failed with status {status}")]
    HttpStatus {
        /// HTTP status of the response.
        status: u16,
    },

    /// A request target could not be turned into a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Client configuration issue.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl ClientError {
    /// Builds a [`ClientError::ServiceError`] from a decoded payload.
    ///
    /// `status` is the HTTP status of the response; it is used when the
    /// payload does not carry one.
    #[must_use]
    pub fn from_service_response(status: u16, payload: ServiceErrorResponse) -> Self {
        let developer_message = if payload.developer_message.is_empty() {
            payload.message
        } else {
            payload.developer_message
        };

        Self::ServiceError {
            status: if payload.status == 0 {
                status
            } else {
                payload.status
            },
            code: payload.code,
            developer_message,
            more_info: payload.more_info,
        }
    }

    /// Check if this is a tenant discovery protocol error.
    pub const fn is_protocol_error(&self) -> bool {
        matches!(self, Self::UnexpectedStatus { .. } | Self::MissingRedirect)
    }

    /// Check if this is a structured service error.
    pub const fn is_service_error(&self) -> bool {
        matches!(self, Self::ServiceError { .. })
    }

    /// HTTP status of a failed response, if the error carries one.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ServiceError { status, .. } | Self::HttpStatus { status } => Some(*status),
            _ => None,
        }
    }

    /// Check if this error came from the transport layer.
    pub const fn is_transport_error(&self) -> bool {
        matches!(self, Self::NetworkError(_) | Self::MiddlewareError(_))
    }

    /// Documentation link attached to a service error.
    pub fn more_info(&self) -> Option<&str> {
        match self {
            Self::ServiceError { more_info, .. } => Some(more_info.as_str()),
            _ => None,
        }
    }
}
