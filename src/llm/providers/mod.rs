//! Provider implementations.
//!
//! Each provider implements [`ProviderAdapter`](crate::llm::traits::ProviderAdapter)
//! for one vendor and owns everything specific to that vendor's HTTP API:
//! endpoint, authentication headers, body layout and reply shape.
//!
//! - `openai` - OpenAI chat completions
//! - `groq` - Groq's OpenAI-compatible endpoint
//! - `anthropic` - Anthropic messages API
//! - `gemini` - Google Gemini `generateContent`
//!
//! The helpers below are shared: one client per adapter with the configured
//! timeout, and a single place where HTTP failures become [`LlmError`]s.

pub mod anthropic;
pub mod gemini;
pub mod groq;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use gemini::GeminiProvider;
pub use groq::GroqProvider;
pub use openai::OpenAIProvider;

use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::llm::traits::LlmError;
use crate::types::Vendor;
use crate::utils::logging::truncate_string;

/// Build the HTTP client an adapter keeps for its whole lifetime
pub(crate) fn build_client(vendor: Vendor, timeout: Duration) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::NetworkError {
            vendor,
            message: format!("Failed to build HTTP client: {}", e),
        })
}

/// Join a base URL and a path without doubling the slash
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

/// Send a prepared request and decode the JSON reply
///
/// Status mapping: 401/403 become `AuthenticationError`, 429 becomes
/// `RateLimitError`, every other non-success status becomes `ProviderError`.
pub(crate) async fn send_json<T: DeserializeOwned>(
    vendor: Vendor,
    request: reqwest::RequestBuilder,
    body: &serde_json::Value,
    timeout: Duration,
) -> Result<T, LlmError> {
    tracing::trace!(
        "{} request body: {}",
        vendor.label(),
        truncate_string(&body.to_string(), 2000)
    );

    let response = request.json(body).send().await.map_err(|e| {
        if e.is_timeout() {
            LlmError::Timeout {
                vendor,
                timeout_ms: timeout.as_millis() as u64,
            }
        } else {
            tracing::debug!("{} HTTP request failed: {}", vendor.label(), e);
            LlmError::NetworkError {
                vendor,
                message: format!("HTTP request failed: {}", e),
            }
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<u64>().ok());
        let error_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = format!(
            "{} API error {}: {}",
            vendor.label(),
            status.as_u16(),
            truncate_string(&error_text, 500)
        );
        tracing::warn!("{}", message);

        return Err(match status.as_u16() {
            401 | 403 => LlmError::AuthenticationError { vendor, message },
            429 => LlmError::RateLimitError {
                vendor,
                retry_after,
            },
            code => LlmError::ProviderError {
                vendor,
                status: Some(code),
                message,
            },
        });
    }

    let text = response.text().await.map_err(|e| {
        if e.is_timeout() {
            LlmError::Timeout {
                vendor,
                timeout_ms: timeout.as_millis() as u64,
            }
        } else {
            LlmError::NetworkError {
                vendor,
                message: format!("Failed to read response text: {}", e),
            }
        }
    })?;
    tracing::trace!("{} raw response: {}", vendor.label(), truncate_string(&text, 2000));

    serde_json::from_str(&text).map_err(|e| LlmError::SerializationError {
        vendor,
        message: format!("Failed to parse {} response: {}", vendor.label(), e),
    })
}
