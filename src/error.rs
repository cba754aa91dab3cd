//! Caller-facing error handling for the gateway
//!
//! Every request that does not produce a reply ends in exactly one
//! [`GatewayError`]. The four variants are the whole taxonomy a caller has to
//! handle:
//!
//! - **InvalidInput** - the request body is not a well-formed conversation
//! - **NotFound** - no vendor catalog lists the requested model
//! - **Unavailable** - the model is known but its vendor has no credential
//! - **UpstreamFailure** - the vendor call failed (network, auth, quota, 5xx)
//!
//! Vendor SDK and transport internals never cross this boundary: an upstream
//! failure carries the vendor name and a human-readable message only.
//!
//! ```rust
//! use switchboard::error::{ErrorKind, GatewayError};
//!
//! let error = GatewayError::not_found("gpt-9");
//! assert_eq!(error.kind(), ErrorKind::NotFound);
//! assert!(error.is_user_error());
//!
//! let body = error.to_body();
//! assert_eq!(body.message, "Unknown model: gpt-9");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::traits::LlmError;
use crate::types::Vendor;

/// Main error type for gateway requests
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// The message sequence or request parameters are malformed
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// No catalog lists the requested model
    #[error("Unknown model: {model_id}")]
    NotFound { model_id: String },

    /// The model exists but its vendor is not configured
    #[error("Model {model_id} is unavailable: {vendor} API key not configured")]
    Unavailable { model_id: String, vendor: Vendor },

    /// The vendor call failed
    #[error("Upstream {vendor} failure: {message}")]
    UpstreamFailure { vendor: Vendor, message: String },
}

/// Discriminant of [`GatewayError`], stable on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidInput,
    NotFound,
    Unavailable,
    UpstreamFailure,
}

/// Structured error result handed to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: ErrorKind,
    pub message: String,
}

impl GatewayError {
    /// Create a simple InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a NotFound error for a model id
    pub fn not_found(model_id: impl Into<String>) -> Self {
        Self::NotFound {
            model_id: model_id.into(),
        }
    }

    /// Create an Unavailable error for a model whose vendor has no credential
    pub fn unavailable(model_id: impl Into<String>, vendor: Vendor) -> Self {
        Self::Unavailable {
            model_id: model_id.into(),
            vendor,
        }
    }

    /// Wrap an adapter error, keeping only its display text
    pub fn upstream(vendor: Vendor, error: &LlmError) -> Self {
        Self::UpstreamFailure {
            vendor,
            message: error.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::InvalidInput { .. } => ErrorKind::InvalidInput,
            GatewayError::NotFound { .. } => ErrorKind::NotFound,
            GatewayError::Unavailable { .. } => ErrorKind::Unavailable,
            GatewayError::UpstreamFailure { .. } => ErrorKind::UpstreamFailure,
        }
    }

    /// Check if the error was caused by the request rather than the vendor
    pub fn is_user_error(&self) -> bool {
        !matches!(self, GatewayError::UpstreamFailure { .. })
    }

    /// Render the error as the structured result returned to callers
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            kind: self.kind(),
            message: self.to_string(),
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(error: serde_json::Error) -> Self {
        Self::invalid_input(format!("malformed request body: {}", error))
    }
}
