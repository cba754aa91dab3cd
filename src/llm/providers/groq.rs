//! Groq API provider implementation.
//!
//! Groq serves an OpenAI-compatible chat completions API, so this adapter is
//! the OpenAI wire client pointed at Groq's endpoint.

use async_trait::async_trait;
use std::time::Duration;

use crate::llm::providers::openai::ChatCompletionsClient;
use crate::llm::traits::{ChatConfig, LlmError, ProviderAdapter};
use crate::llm::translate::{VendorRequest, VendorResponse};
use crate::types::Vendor;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Groq API provider
pub struct GroqProvider {
    inner: ChatCompletionsClient,
}

impl GroqProvider {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            inner: ChatCompletionsClient::new(Vendor::Groq, api_key, base_url, timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }
}

#[async_trait]
impl ProviderAdapter for GroqProvider {
    async fn complete(
        &self,
        request: &VendorRequest,
        model_id: &str,
        config: &ChatConfig,
    ) -> Result<VendorResponse, LlmError> {
        self.inner.complete(request, model_id, config).await
    }

    fn vendor(&self) -> Vendor {
        Vendor::Groq
    }
}
