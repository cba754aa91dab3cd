//! OpenAI API provider implementation.
//!
//! Speaks the `/chat/completions` protocol. The same wire code backs the Groq
//! adapter, which exposes an OpenAI-compatible endpoint under another base URL.

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use crate::llm::providers::{build_client, endpoint, send_json};
use crate::llm::traits::{ChatConfig, LlmError, ProviderAdapter};
use crate::llm::translate::{ChatCompletionResponse, VendorRequest, VendorResponse};
use crate::types::Vendor;

/// Default OpenAI endpoint, `/chat/completions` is appended
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Client for any OpenAI-compatible chat completions endpoint
pub(crate) struct ChatCompletionsClient {
    vendor: Vendor,
    api_key: String,
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl ChatCompletionsClient {
    pub(crate) fn new(
        vendor: Vendor,
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            vendor,
            api_key,
            base_url,
            timeout,
            client: build_client(vendor, timeout)?,
        })
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) async fn complete(
        &self,
        request: &VendorRequest,
        model_id: &str,
        config: &ChatConfig,
    ) -> Result<VendorResponse, LlmError> {
        let VendorRequest::ChatCompletions { messages } = request else {
            return Err(LlmError::UnsupportedRequest {
                vendor: self.vendor,
                format: request.format_name(),
            });
        };

        let body = json!({
            "model": model_id,
            "messages": messages,
            "temperature": config.temperature,
            "max_tokens": config.max_tokens,
        });

        let url = endpoint(&self.base_url, "/chat/completions");
        tracing::debug!("{} POST to: {}", self.vendor.label(), url);

        let http_request = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json");

        let reply: ChatCompletionResponse =
            send_json(self.vendor, http_request, &body, self.timeout).await?;
        Ok(VendorResponse::ChatCompletions(reply))
    }
}

/// OpenAI API provider
pub struct OpenAIProvider {
    inner: ChatCompletionsClient,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Ok(Self {
            inner: ChatCompletionsClient::new(Vendor::OpenAI, api_key, base_url, timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        self.inner.base_url()
    }
}

#[async_trait]
impl ProviderAdapter for OpenAIProvider {
    async fn complete(
        &self,
        request: &VendorRequest,
        model_id: &str,
        config: &ChatConfig,
    ) -> Result<VendorResponse, LlmError> {
        self.inner.complete(request, model_id, config).await
    }

    fn vendor(&self) -> Vendor {
        Vendor::OpenAI
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::translate::{from_vendor_format, to_anthropic_messages, to_chat_completions};
    use crate::types::Message;
    use mockito::Matcher;

    #[test]
    fn test_default_base_url() {
        let provider =
            OpenAIProvider::new("sk-test".to_string(), None, Duration::from_secs(5)).unwrap();
        assert_eq!(provider.base_url(), "https://api.openai.com/v1");
        assert_eq!(provider.vendor(), Vendor::OpenAI);
    }

    #[tokio::test]
    async fn test_chat_completion_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(Matcher::PartialJson(json!({
                "model": "gpt-4o-mini",
                "messages": [
                    {"role": "system", "content": "Be brief."},
                    {"role": "user", "content": "Capital of France?"}
                ],
                "temperature": 0.2,
                "max_tokens": 256
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"id":"chatcmpl-1","choices":[{"index":0,"message":{"role":"assistant","content":"Paris"},"finish_reason":"stop"}]}"#,
            )
            .create_async()
            .await;

        let provider = OpenAIProvider::new(
            "sk-test".to_string(),
            Some(server.url()),
            Duration::from_secs(5),
        )
        .unwrap();
        let request = to_chat_completions(&[
            Message::system("Be brief."),
            Message::user("Capital of France?"),
        ]);
        let config = ChatConfig {
            temperature: 0.2,
            max_tokens: 256,
        };

        let reply = provider
            .complete(&request, "gpt-4o-mini", &config)
            .await
            .unwrap();
        assert_eq!(from_vendor_format(&reply), Message::assistant("Paris"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rejects_foreign_request_shape() {
        let provider =
            OpenAIProvider::new("sk-test".to_string(), None, Duration::from_secs(5)).unwrap();
        let request = to_anthropic_messages(&[Message::user("hi")]);
        let result = provider
            .complete(&request, "gpt-4o", &ChatConfig::default())
            .await;
        assert!(matches!(
            result,
            Err(LlmError::UnsupportedRequest {
                format: "messages",
                ..
            })
        ));
    }
}
