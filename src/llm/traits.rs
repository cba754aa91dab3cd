//! Core traits for the provider abstraction layer.
//!
//! The gateway only ever talks to vendors through [`ProviderAdapter`]; nothing
//! outside `llm::providers` names a vendor-specific client type.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::llm::translate::{VendorRequest, VendorResponse};
use crate::types::Vendor;

/// Uniform "complete a chat turn" contract, implemented once per vendor
///
/// Adapters are stateless across requests: everything a call needs arrives in
/// its arguments, so one instance can serve any number of concurrent turns.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Send an already-translated request to the vendor and return its raw reply
    async fn complete(
        &self,
        request: &VendorRequest,
        model_id: &str,
        config: &ChatConfig,
    ) -> Result<VendorResponse, LlmError>;

    /// Vendor served by this adapter
    fn vendor(&self) -> Vendor;
}

/// Sampling parameters passed uniformly to every vendor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Temperature for model responses (0.0 to 2.0)
    pub temperature: f64,
    /// Maximum tokens in model response; the field name differs per vendor
    pub max_tokens: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 4096,
        }
    }
}

/// Adapter-level error types
///
/// These never reach callers directly: the gateway folds every variant into
/// [`crate::error::GatewayError::UpstreamFailure`] using the display text.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider error: {message}")]
    ProviderError {
        vendor: Vendor,
        status: Option<u16>,
        message: String,
    },

    #[error("Authentication failed for {vendor}: {message}")]
    AuthenticationError { vendor: Vendor, message: String },

    #[error("Rate limit exceeded for {vendor}")]
    RateLimitError {
        vendor: Vendor,
        retry_after: Option<u64>,
    },

    #[error("Network error: {message}")]
    NetworkError { vendor: Vendor, message: String },

    #[error("Request to {vendor} timed out after {timeout_ms}ms")]
    Timeout { vendor: Vendor, timeout_ms: u64 },

    #[error("Serialization error: {message}")]
    SerializationError { vendor: Vendor, message: String },

    #[error("{vendor} adapter cannot send a {format} request")]
    UnsupportedRequest { vendor: Vendor, format: &'static str },
}

impl LlmError {
    /// Vendor that produced the error
    pub fn vendor(&self) -> Vendor {
        match self {
            LlmError::ProviderError { vendor, .. }
            | LlmError::AuthenticationError { vendor, .. }
            | LlmError::RateLimitError { vendor, .. }
            | LlmError::NetworkError { vendor, .. }
            | LlmError::Timeout { vendor, .. }
            | LlmError::SerializationError { vendor, .. }
            | LlmError::UnsupportedRequest { vendor, .. } => *vendor,
        }
    }
}
