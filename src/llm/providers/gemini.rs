//! Google Gemini API provider implementation.
//!
//! Sends `POST {base}/v1beta/models/{model}:generateContent` with the paired
//! chat history followed by the outgoing user message as the last `contents`
//! entry. The model id is percent-encoded as a single path segment. The key
//! goes in the `x-goog-api-key` header, never in the URL.

use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

use crate::llm::providers::{build_client, send_json};
use crate::llm::traits::{ChatConfig, LlmError, ProviderAdapter};
use crate::llm::translate::{
    GeminiContent, GeminiRole, GenerateContentResponse, VendorRequest, VendorResponse,
};
use crate::types::Vendor;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Google Gemini API provider
pub struct GeminiProvider {
    api_key: String,
    base_url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl GeminiProvider {
    pub fn new(
        api_key: String,
        base_url: Option<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout,
            client: build_client(Vendor::Google, timeout)?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// `generateContent` URL for one model under the configured base
fn generate_content_url(base_url: &str, model_id: &str) -> Result<url::Url, LlmError> {
    let invalid = |reason: String| LlmError::NetworkError {
        vendor: Vendor::Google,
        message: format!("Invalid Gemini base URL '{}': {}", base_url, reason),
    };

    let mut url = url::Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| invalid("cannot be a base".to_string()))?
        .pop_if_empty()
        .push("v1beta")
        .push("models")
        .push(&format!("{}:generateContent", model_id));
    Ok(url)
}

/// Request body for one `generateContent` call
fn generate_content_body(
    system_instruction: Option<&str>,
    history: &[GeminiContent],
    message: &str,
    config: &ChatConfig,
) -> serde_json::Value {
    let mut contents = history.to_vec();
    contents.push(GeminiContent::text(GeminiRole::User, message));

    let mut body = json!({
        "contents": contents,
        "generationConfig": {
            "temperature": config.temperature,
            "maxOutputTokens": config.max_tokens,
        },
    });
    if let Some(instruction) = system_instruction {
        body["systemInstruction"] = json!({ "parts": [{ "text": instruction }] });
    }
    body
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    async fn complete(
        &self,
        request: &VendorRequest,
        model_id: &str,
        config: &ChatConfig,
    ) -> Result<VendorResponse, LlmError> {
        let VendorRequest::GenerateContent {
            system_instruction,
            history,
            message,
        } = request
        else {
            return Err(LlmError::UnsupportedRequest {
                vendor: Vendor::Google,
                format: request.format_name(),
            });
        };

        let body = generate_content_body(system_instruction.as_deref(), history, message, config);
        let url = generate_content_url(&self.base_url, model_id)?;
        tracing::debug!("Gemini POST to: {}", url);

        let http_request = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json");

        let reply: GenerateContentResponse =
            send_json(Vendor::Google, http_request, &body, self.timeout).await?;
        Ok(VendorResponse::GenerateContent(reply))
    }

    fn vendor(&self) -> Vendor {
        Vendor::Google
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::translate::{from_vendor_format, to_gemini_chat, SystemPolicy};
    use crate::types::Message;
    use mockito::Matcher;

    #[test]
    fn test_body_appends_outgoing_message() {
        let history = vec![
            GeminiContent::text(GeminiRole::User, "a"),
            GeminiContent::text(GeminiRole::Model, "b"),
        ];
        let config = ChatConfig {
            temperature: 0.5,
            max_tokens: 64,
        };
        let body = generate_content_body(Some("Be kind."), &history, "c", &config);

        assert_eq!(
            body,
            json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "a"}]},
                    {"role": "model", "parts": [{"text": "b"}]},
                    {"role": "user", "parts": [{"text": "c"}]}
                ],
                "generationConfig": {"temperature": 0.5, "maxOutputTokens": 64},
                "systemInstruction": {"parts": [{"text": "Be kind."}]}
            })
        );
    }

    #[test]
    fn test_body_without_system_instruction() {
        let body = generate_content_body(None, &[], "hi", &ChatConfig::default());
        assert!(body.get("systemInstruction").is_none());
        assert_eq!(body["contents"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_generate_content_url() {
        let url = generate_content_url(DEFAULT_BASE_URL, "gemini-1.5-pro").unwrap();
        assert_eq!(
            url.as_str(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-pro:generateContent"
        );

        let url = generate_content_url("http://localhost:8080/proxy/", "gemini-2.0-flash-exp")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/proxy/v1beta/models/gemini-2.0-flash-exp:generateContent"
        );
    }

    #[test]
    fn test_model_id_is_one_encoded_segment() {
        let url = generate_content_url(DEFAULT_BASE_URL, "tuned/model v1?x#y").unwrap();
        assert_eq!(
            url.path(),
            "/v1beta/models/tuned%2Fmodel%20v1%3Fx%23y:generateContent"
        );
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());
    }

    #[test]
    fn test_unusable_base_url() {
        let result = generate_content_url("mailto:someone@example.com", "gemini-1.5-pro");
        assert!(matches!(
            result,
            Err(LlmError::NetworkError {
                vendor: Vendor::Google,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_generate_content_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
            .match_header("x-goog-api-key", "AIza-test")
            .match_body(Matcher::PartialJson(json!({
                "contents": [{"role": "user", "parts": [{"text": "Hola"}]}],
                "generationConfig": {"maxOutputTokens": 4096}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hello"}]},"finishReason":"STOP"}]}"#,
            )
            .create_async()
            .await;

        let provider = GeminiProvider::new(
            "AIza-test".to_string(),
            Some(server.url()),
            Duration::from_secs(5),
        )
        .unwrap();
        let request = to_gemini_chat(&[Message::user("Hola")], SystemPolicy::Drop);

        let reply = provider
            .complete(&request, "gemini-1.5-flash", &ChatConfig::default())
            .await
            .unwrap();
        assert_eq!(from_vendor_format(&reply), Message::assistant("Hello"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limit() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1beta/models/gemini-1.5-pro:generateContent")
            .with_status(429)
            .with_header("retry-after", "7")
            .with_body("RESOURCE_EXHAUSTED")
            .create_async()
            .await;

        let provider =
            GeminiProvider::new("AIza".to_string(), Some(server.url()), Duration::from_secs(5))
                .unwrap();
        let result = provider
            .complete(
                &to_gemini_chat(&[Message::user("hi")], SystemPolicy::Drop),
                "gemini-1.5-pro",
                &ChatConfig::default(),
            )
            .await;
        assert!(matches!(
            result,
            Err(LlmError::RateLimitError {
                vendor: Vendor::Google,
                retry_after: Some(7)
            })
        ));
    }
}
