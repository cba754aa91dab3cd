//! Anthropic API provider implementation.
//!
//! Uses the `/v1/messages` endpoint. System text travels in the top-level
//! `system` field and `max_tokens` is mandatory on every request.

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use crate::llm::providers::{build_client, endpoint, send_json};
use crate::llm::traits::{ChatConfig, LlmError, ProviderAdapter};
use crate::llm::translate::{MessagesResponse, VendorRequest, VendorResponse};
use crate::types::Vendor;

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic API provider
pub struct AnthropicProvider {
    api_key: String,
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl AnthropicProvider {
    /// Create a new Anthropic provider
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout,
            client: build_client(Vendor::Anthropic, timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicProvider {
    async fn complete(
        &self,
        request: &VendorRequest,
        model_id: &str,
        config: &ChatConfig,
    ) -> Result<VendorResponse, LlmError> {
        let VendorRequest::Messages { system, messages } = request else {
            return Err(LlmError::UnsupportedRequest {
                vendor: Vendor::Anthropic,
                format: request.format_name(),
            });
        };

        let mut body = json!({
            "model": model_id,
            "max_tokens": config.max_tokens,
            "temperature": config.temperature,
            "messages": messages,
        });
        if let Some(system) = system {
            body["system"] = json!(system);
        }

        let url = endpoint(&self.base_url, "/v1/messages");
        tracing::debug!("Anthropic POST to: {}", url);

        let http_request = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json");

        let reply: MessagesResponse =
            send_json(Vendor::Anthropic, http_request, &body, self.timeout).await?;
        Ok(VendorResponse::Messages(reply))
    }

    fn vendor(&self) -> Vendor {
        Vendor::Anthropic
    }
}
