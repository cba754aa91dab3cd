//! Message types for gateway communication.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GatewayError;

/// Role of a message in the conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System message (instructions, context)
    System,
    /// Message from the user/human
    User,
    /// Message from the AI assistant
    Assistant,
}

impl MessageRole {
    /// Get string representation of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }

    /// Parse a role name as it appears on the wire
    pub fn parse(role: &str) -> Option<Self> {
        match role {
            "system" => Some(MessageRole::System),
            "user" => Some(MessageRole::User),
            "assistant" => Some(MessageRole::Assistant),
            _ => None,
        }
    }
}

impl std::fmt::Display for MessageRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single vendor-neutral conversation turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender
    pub role: MessageRole,
    /// Text content of the turn
    pub content: String,
}

impl Message {
    /// Create a new user message
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self::new(MessageRole::User, text)
    }

    /// Create a new assistant message
    pub fn assistant<S: Into<String>>(text: S) -> Self {
        Self::new(MessageRole::Assistant, text)
    }

    /// Create a new system message
    pub fn system<S: Into<String>>(text: S) -> Self {
        Self::new(MessageRole::System, text)
    }

    /// Create a new message with the specified role and content
    pub fn new<S: Into<String>>(role: MessageRole, content: S) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Check whether this message carries the given role
    pub fn is(&self, role: MessageRole) -> bool {
        self.role == role
    }
}

/// Validate a raw request value as an ordered list of role/content pairs.
///
/// This is the gateway boundary check: anything that is not an array of
/// `{ "role": <known role>, "content": <string> }` objects is rejected with
/// [`GatewayError::InvalidInput`] before any translation happens.
pub fn messages_from_value(value: &Value) -> Result<Vec<Message>, GatewayError> {
    let items = value
        .as_array()
        .ok_or_else(|| GatewayError::invalid_input("messages must be an array"))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let object = item.as_object().ok_or_else(|| {
                GatewayError::invalid_input(format!("messages[{}] must be an object", index))
            })?;

            let role = object
                .get("role")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    GatewayError::invalid_input(format!(
                        "messages[{}].role must be a string",
                        index
                    ))
                })?;
            let role = MessageRole::parse(role).ok_or_else(|| {
                GatewayError::invalid_input(format!(
                    "messages[{}].role '{}' is not one of system, user, assistant",
                    index, role
                ))
            })?;

            let content = object
                .get("content")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    GatewayError::invalid_input(format!(
                        "messages[{}].content must be a string",
                        index
                    ))
                })?;

            Ok(Message::new(role, content))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_constructors() {
        let msg = Message::user("hello");
        assert_eq!(msg.role, MessageRole::User);
        assert_eq!(msg.content, "hello");
        assert!(Message::system("x").is(MessageRole::System));
        assert!(Message::assistant("x").is(MessageRole::Assistant));
    }

    #[test]
    fn test_message_serialization_uses_lowercase_roles() {
        let value = serde_json::to_value(Message::assistant("hi")).unwrap();
        assert_eq!(value, json!({"role": "assistant", "content": "hi"}));

        let parsed: Message =
            serde_json::from_value(json!({"role": "system", "content": "be brief"})).unwrap();
        assert_eq!(parsed, Message::system("be brief"));
    }

    #[test]
    fn test_messages_from_value_preserves_order() {
        let value = json!([
            {"role": "system", "content": "s"},
            {"role": "user", "content": "a"},
            {"role": "assistant", "content": "b"},
        ]);
        let messages = messages_from_value(&value).unwrap();
        assert_eq!(
            messages,
            vec![Message::system("s"), Message::user("a"), Message::assistant("b")]
        );
    }

    #[test]
    fn test_messages_from_value_rejects_non_array() {
        let err = messages_from_value(&json!({"role": "user", "content": "a"})).unwrap_err();
        assert!(matches!(err, GatewayError::InvalidInput { .. }));
        assert!(err.to_string().contains("must be an array"));
    }

    #[test]
    fn test_messages_from_value_rejects_bad_entries() {
        let cases = vec![
            json!(["just a string"]),
            json!([{"content": "missing role"}]),
            json!([{"role": "tool", "content": "unknown role"}]),
            json!([{"role": "user"}]),
            json!([{"role": "user", "content": 42}]),
        ];

        for case in cases {
            let result = messages_from_value(&case);
            assert!(
                matches!(result, Err(GatewayError::InvalidInput { .. })),
                "expected InvalidInput for {}",
                case
            );
        }
    }
}
