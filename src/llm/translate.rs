//! Bidirectional conversion between canonical messages and vendor wire shapes.
//!
//! Each vendor gets one pure transformation rule, selected by [`Vendor`]:
//!
//! | Vendor | Request shape | System messages |
//! |---|---|---|
//! | OpenAI, Groq | [`VendorRequest::ChatCompletions`] | inline, unchanged |
//! | Anthropic | [`VendorRequest::Messages`] | first one lifted into `system` |
//! | Google | [`VendorRequest::GenerateContent`] | governed by [`SystemPolicy`] |
//!
//! Replies travel the other way through [`from_vendor_format`], which always
//! yields an assistant [`Message`] whose content is never absent.

use serde::{Deserialize, Serialize};

use crate::types::{Message, MessageRole, Vendor};

/// What the Gemini rule does with system messages, which that API has no role for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemPolicy {
    /// Discard system messages
    #[default]
    Drop,
    /// Prepend the system text to the first user turn
    MergeIntoFirstUser,
    /// Send the system text as the request's `systemInstruction`
    SystemInstruction,
}

impl std::str::FromStr for SystemPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drop" => Ok(SystemPolicy::Drop),
            "merge_into_first_user" => Ok(SystemPolicy::MergeIntoFirstUser),
            "system_instruction" => Ok(SystemPolicy::SystemInstruction),
            other => Err(format!(
                "unknown system policy '{}' (expected drop, merge_into_first_user \
                 or system_instruction)",
                other
            )),
        }
    }
}

/// Anthropic conversation roles; `system` is not one of them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnthropicRole {
    User,
    Assistant,
}

/// One turn of an Anthropic `messages` body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnthropicMessage {
    pub role: AnthropicRole,
    pub content: String,
}

/// Gemini conversation roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeminiRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiPart {
    pub text: String,
}

/// One history entry of a Gemini chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiContent {
    pub role: GeminiRole,
    pub parts: Vec<GeminiPart>,
}

impl GeminiContent {
    pub fn text(role: GeminiRole, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![GeminiPart { text: text.into() }],
        }
    }

    /// Concatenated text of all parts
    pub fn joined_text(&self) -> String {
        self.parts.iter().map(|part| part.text.as_str()).collect()
    }
}

/// A conversation translated into one vendor's request shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VendorRequest {
    /// OpenAI-style chat completions: roles pass through unchanged
    ChatCompletions { messages: Vec<Message> },
    /// Anthropic-style messages: system text travels in its own field
    Messages {
        system: Option<String>,
        messages: Vec<AnthropicMessage>,
    },
    /// Gemini-style chat: paired history plus the outgoing user message
    GenerateContent {
        system_instruction: Option<String>,
        history: Vec<GeminiContent>,
        message: String,
    },
}

impl VendorRequest {
    /// Short name of the wire format, used in errors and logs
    pub fn format_name(&self) -> &'static str {
        match self {
            VendorRequest::ChatCompletions { .. } => "chat_completions",
            VendorRequest::Messages { .. } => "messages",
            VendorRequest::GenerateContent { .. } => "generate_content",
        }
    }

    /// Rebuild a canonical sequence from the translated request.
    ///
    /// Turns the forward translation dropped cannot come back; everything it
    /// kept reappears in order, with a lifted system field restored as a
    /// leading system message.
    pub fn to_canonical(&self) -> Vec<Message> {
        match self {
            VendorRequest::ChatCompletions { messages } => messages.clone(),
            VendorRequest::Messages { system, messages } => system
                .iter()
                .map(|text| Message::system(text.clone()))
                .chain(messages.iter().map(|message| {
                    let role = match message.role {
                        AnthropicRole::User => MessageRole::User,
                        AnthropicRole::Assistant => MessageRole::Assistant,
                    };
                    Message::new(role, message.content.clone())
                }))
                .collect(),
            VendorRequest::GenerateContent {
                system_instruction,
                history,
                message,
            } => {
                let mut canonical: Vec<Message> = system_instruction
                    .iter()
                    .map(|text| Message::system(text.clone()))
                    .collect();
                canonical.extend(history.iter().map(|entry| {
                    let role = match entry.role {
                        GeminiRole::User => MessageRole::User,
                        GeminiRole::Model => MessageRole::Assistant,
                    };
                    Message::new(role, entry.joined_text())
                }));
                if !message.is_empty() {
                    canonical.push(Message::user(message.clone()));
                }
                canonical
            }
        }
    }
}

/// Translate a canonical conversation into the request shape `vendor` expects
pub fn to_vendor_format(
    vendor: Vendor,
    messages: &[Message],
    policy: SystemPolicy,
) -> VendorRequest {
    match vendor {
        Vendor::OpenAI | Vendor::Groq => to_chat_completions(messages),
        Vendor::Anthropic => to_anthropic_messages(messages),
        Vendor::Google => to_gemini_chat(messages, policy),
    }
}

/// OpenAI/Groq rule: the sequence is sent as is
pub fn to_chat_completions(messages: &[Message]) -> VendorRequest {
    VendorRequest::ChatCompletions {
        messages: messages.to_vec(),
    }
}

/// Anthropic rule: lift the first system message out, keep user/assistant turns
pub fn to_anthropic_messages(messages: &[Message]) -> VendorRequest {
    let mut system = None;
    let mut body = Vec::with_capacity(messages.len());

    for message in messages {
        match message.role {
            MessageRole::System => {
                if system.is_none() {
                    system = Some(message.content.clone());
                } else {
                    tracing::debug!("Dropping additional system message for anthropic request");
                }
            }
            MessageRole::User => body.push(AnthropicMessage {
                role: AnthropicRole::User,
                content: message.content.clone(),
            }),
            MessageRole::Assistant => body.push(AnthropicMessage {
                role: AnthropicRole::Assistant,
                content: message.content.clone(),
            }),
        }
    }

    VendorRequest::Messages {
        system,
        messages: body,
    }
}

/// Gemini rule: pair each assistant turn with the user turn before it.
///
/// A user turn waits until an assistant turn answers it; a newer user turn
/// replaces one still waiting. Whatever user turn is waiting at the end is the
/// outgoing message rather than history.
pub fn to_gemini_chat(messages: &[Message], policy: SystemPolicy) -> VendorRequest {
    let system_text = {
        let texts: Vec<&str> = messages
            .iter()
            .filter(|message| message.is(MessageRole::System))
            .map(|message| message.content.as_str())
            .collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.join("\n\n"))
        }
    };

    let mut history = Vec::new();
    let mut waiting_user = String::new();

    for message in messages {
        match message.role {
            MessageRole::System => {}
            MessageRole::User => {
                if !waiting_user.is_empty() {
                    tracing::debug!("Replacing unanswered user turn in gemini history");
                }
                waiting_user = message.content.clone();
            }
            MessageRole::Assistant => {
                if !waiting_user.is_empty() {
                    history.push(GeminiContent::text(
                        GeminiRole::User,
                        std::mem::take(&mut waiting_user),
                    ));
                }
                history.push(GeminiContent::text(GeminiRole::Model, message.content.clone()));
            }
        }
    }

    // Merging runs on the paired result so a replaced user turn cannot take
    // the system text with it
    let system_instruction = match (policy, system_text) {
        (SystemPolicy::SystemInstruction, text) => text,
        (SystemPolicy::MergeIntoFirstUser, Some(text)) => {
            let first_user = history
                .iter_mut()
                .find(|content| content.role == GeminiRole::User)
                .and_then(|content| content.parts.first_mut());
            match first_user {
                Some(part) => part.text = format!("{}\n\n{}", text, part.text),
                None if waiting_user.is_empty() => waiting_user = text,
                None => waiting_user = format!("{}\n\n{}", text, waiting_user),
            }
            None
        }
        (SystemPolicy::Drop, _) | (SystemPolicy::MergeIntoFirstUser, None) => None,
    };

    VendorRequest::GenerateContent {
        system_instruction,
        history,
        message: waiting_user,
    }
}

/// OpenAI-compatible `/chat/completions` reply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: Option<ChatChoiceMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Anthropic `/v1/messages` reply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessagesResponse {
    #[serde(default)]
    pub content: Vec<MessagesContentBlock>,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessagesContentBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

/// Gemini `generateContent` reply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

/// A vendor's raw reply, tagged by wire format
#[derive(Debug, Clone, PartialEq)]
pub enum VendorResponse {
    ChatCompletions(ChatCompletionResponse),
    Messages(MessagesResponse),
    GenerateContent(GenerateContentResponse),
}

impl VendorResponse {
    /// Reply carrying `text` in the given wire format; handy for adapters in tests
    pub fn text(vendor: Vendor, text: impl Into<String>) -> Self {
        let text = text.into();
        match vendor {
            Vendor::OpenAI | Vendor::Groq => {
                VendorResponse::ChatCompletions(ChatCompletionResponse {
                    choices: vec![ChatChoice {
                        message: Some(ChatChoiceMessage {
                            content: Some(text),
                        }),
                        finish_reason: Some("stop".to_string()),
                    }],
                })
            }
            Vendor::Anthropic => VendorResponse::Messages(MessagesResponse {
                content: vec![MessagesContentBlock {
                    kind: "text".to_string(),
                    text: Some(text),
                }],
                stop_reason: Some("end_turn".to_string()),
            }),
            Vendor::Google => VendorResponse::GenerateContent(GenerateContentResponse {
                candidates: vec![Candidate {
                    content: Some(CandidateContent {
                        parts: vec![CandidatePart { text: Some(text) }],
                    }),
                    finish_reason: Some("STOP".to_string()),
                }],
            }),
        }
    }
}

/// Reduce a vendor reply to a single assistant message
///
/// Missing or null content becomes the empty string.
pub fn from_vendor_format(response: &VendorResponse) -> Message {
    let content = match response {
        VendorResponse::ChatCompletions(reply) => reply
            .choices
            .first()
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.clone())
            .unwrap_or_default(),
        VendorResponse::Messages(reply) => reply
            .content
            .iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text.as_deref())
            .collect(),
        VendorResponse::GenerateContent(reply) => reply
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect()
            })
            .unwrap_or_default(),
    };

    Message::assistant(content)
}
