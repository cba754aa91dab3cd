//! Full pipeline against fake vendor HTTP endpoints
//!
//! Each test points one vendor's `base_url` at a mockito server and checks the
//! exact request the gateway puts on the wire plus the normalized reply.

use mockito::Matcher;
use serde_json::json;

use switchboard::llm::SystemPolicy;
use switchboard::{ErrorKind, Gateway, GatewayConfig, Message, MessageRole, Vendor};

fn config_for(vendor: Vendor, base_url: String) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    let settings = config.vendors.get_mut(vendor);
    settings.api_key = Some("test-key-123456".to_string());
    settings.base_url = Some(base_url);
    config
}

#[tokio::test]
async fn test_openai_chat_completions_wire_format() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key-123456")
        .match_body(Matcher::Json(json!({
            "model": "gpt-4o",
            "messages": [
                {"role": "system", "content": "You are terse."},
                {"role": "user", "content": "a"},
                {"role": "assistant", "content": "b"},
                {"role": "user", "content": "c"}
            ],
            "temperature": 0.5,
            "max_tokens": 4096
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"choices":[{"message":{"role":"assistant","content":"d"},"finish_reason":"stop"}]}"#,
        )
        .create_async()
        .await;

    let gateway = Gateway::from_config(&config_for(Vendor::OpenAI, server.url())).unwrap();
    let reply = gateway
        .chat(
            vec![
                Message::system("You are terse."),
                Message::user("a"),
                Message::assistant("b"),
                Message::user("c"),
            ],
            "gpt-4o",
            0.5,
        )
        .await
        .unwrap();

    assert_eq!(reply, Message::assistant("d"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_groq_uses_chat_completions_with_groq_key() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer test-key-123456")
        .match_body(Matcher::PartialJson(json!({
            "model": "llama-3.2-90b-vision-preview",
            "messages": [{"role": "user", "content": "hi"}]
        })))
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#)
        .create_async()
        .await;

    let gateway = Gateway::from_config(&config_for(Vendor::Groq, server.url())).unwrap();
    let reply = gateway
        .chat(vec![Message::user("hi")], "llama-3.2-90b-vision-preview", 0.7)
        .await
        .unwrap();

    assert_eq!(reply.role, MessageRole::Assistant);
    assert_eq!(reply.content, "");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_anthropic_lifts_first_system_message() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "test-key-123456")
        .match_header("anthropic-version", "2023-06-01")
        .match_body(Matcher::Json(json!({
            "model": "claude-3-5-sonnet-20241022",
            "system": "first",
            "max_tokens": 4096,
            "temperature": 0.5,
            "messages": [
                {"role": "user", "content": "a"},
                {"role": "assistant", "content": "b"},
                {"role": "user", "content": "c"}
            ]
        })))
        .with_status(200)
        .with_body(r#"{"content":[{"type":"text","text":"done"}],"stop_reason":"end_turn"}"#)
        .create_async()
        .await;

    let gateway = Gateway::from_config(&config_for(Vendor::Anthropic, server.url())).unwrap();
    let reply = gateway
        .chat(
            vec![
                Message::system("first"),
                Message::user("a"),
                Message::system("second"),
                Message::assistant("b"),
                Message::user("c"),
            ],
            "claude-3-5-sonnet-20241022",
            0.5,
        )
        .await
        .unwrap();

    assert_eq!(reply.content, "done");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_gemini_pairs_history_and_drops_system() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1beta/models/gemini-1.5-pro:generateContent")
        .match_header("x-goog-api-key", "test-key-123456")
        .match_body(Matcher::Json(json!({
            "contents": [
                {"role": "user", "parts": [{"text": "a"}]},
                {"role": "model", "parts": [{"text": "b"}]},
                {"role": "user", "parts": [{"text": "c"}]}
            ],
            "generationConfig": {"temperature": 0.5, "maxOutputTokens": 4096}
        })))
        .with_status(200)
        .with_body(r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"d"}]}}]}"#)
        .create_async()
        .await;

    let gateway = Gateway::from_config(&config_for(Vendor::Google, server.url())).unwrap();
    let reply = gateway
        .chat(
            vec![
                Message::system("ignored"),
                Message::user("a"),
                Message::assistant("b"),
                Message::user("c"),
            ],
            "gemini-1.5-pro",
            0.5,
        )
        .await
        .unwrap();

    assert_eq!(reply, Message::assistant("d"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_gemini_system_instruction_policy() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
        .match_body(Matcher::PartialJson(json!({
            "systemInstruction": {"parts": [{"text": "Speak like a pirate."}]},
            "contents": [{"role": "user", "parts": [{"text": "hello"}]}]
        })))
        .with_status(200)
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Ahoy"}]}}]}"#)
        .create_async()
        .await;

    let mut config = config_for(Vendor::Google, server.url());
    config.chat.gemini_system_policy = SystemPolicy::SystemInstruction;

    let gateway = Gateway::from_config(&config).unwrap();
    let reply = gateway
        .chat(
            vec![Message::system("Speak like a pirate."), Message::user("hello")],
            "gemini-1.5-flash",
            0.7,
        )
        .await
        .unwrap();

    assert_eq!(reply.content, "Ahoy");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_vendor_error_surfaces_as_upstream_failure() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/messages")
        .with_status(529)
        .with_body(r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#)
        .create_async()
        .await;

    let gateway = Gateway::from_config(&config_for(Vendor::Anthropic, server.url())).unwrap();
    let error = gateway
        .chat(vec![Message::user("hi")], "claude-3-opus-20240229", 0.7)
        .await
        .unwrap_err();

    let body = error.to_body();
    assert_eq!(body.kind, ErrorKind::UpstreamFailure);
    assert!(body
        .message
        .starts_with("Upstream anthropic failure: Provider error: Anthropic API error 529"));
    assert!(body.message.contains("Overloaded"));
}

#[tokio::test]
async fn test_unreachable_vendor_is_upstream_failure() {
    // Nothing listens on port 9 on the loopback interface
    let gateway =
        Gateway::from_config(&config_for(Vendor::OpenAI, "http://127.0.0.1:9".to_string()))
            .unwrap();
    let error = gateway
        .chat(vec![Message::user("hi")], "gpt-3.5-turbo", 0.7)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::UpstreamFailure);
}

#[tokio::test]
async fn test_chat_request_body_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::PartialJson(json!({"model": "gpt-4o-mini"})))
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"content":"hey"}}]}"#)
        .create_async()
        .await;

    let gateway = Gateway::from_config(&config_for(Vendor::OpenAI, server.url())).unwrap();
    let reply = gateway
        .chat_request(json!({
            "messages": [{"role": "user", "content": "hello"}]
        }))
        .await
        .unwrap();

    assert_eq!(reply.content, "hey");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_default_temperature_is_sent_exactly() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_body(Matcher::Json(json!({
            "model": "gpt-4o-mini",
            "messages": [{"role": "user", "content": "hello"}],
            "temperature": 0.7,
            "max_tokens": 4096
        })))
        .with_status(200)
        .with_body(r#"{"choices":[{"message":{"content":"hey"}}]}"#)
        .create_async()
        .await;

    let gateway = Gateway::from_config(&config_for(Vendor::OpenAI, server.url())).unwrap();
    assert_eq!(gateway.settings().temperature, 0.7);
    let reply = gateway
        .chat_request(json!({"messages": [{"role": "user", "content": "hello"}]}))
        .await
        .unwrap();

    assert_eq!(reply.content, "hey");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_gemini_generation_config_keeps_requested_temperature() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1beta/models/gemini-1.5-flash:generateContent")
        .match_body(Matcher::PartialJson(json!({
            "generationConfig": {"temperature": 0.7, "maxOutputTokens": 4096}
        })))
        .with_status(200)
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"ok"}]}}]}"#)
        .create_async()
        .await;

    let gateway = Gateway::from_config(&config_for(Vendor::Google, server.url())).unwrap();
    let reply = gateway
        .chat(vec![Message::user("hi")], "gemini-1.5-flash", 0.7)
        .await
        .unwrap();

    assert_eq!(reply.content, "ok");
    mock.assert_async().await;
}
