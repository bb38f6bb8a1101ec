//! Bodies of the send-message endpoint.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

use super::conversation::ConversationId;

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MessageRole {
    /// The person typing in the chat page.
    User,
    /// The assistant answering on the backend's behalf.
    Assistant,
}

impl TryFrom<&str> for MessageRole {
    type Error = &'static str;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Self::User),
            "assistant" => Ok(Self::Assistant),
            _ => Err("invalid message role"),
        }
    }
}

/// Body of `POST /chat/send/`.
///
/// A `None` conversation asks the backend to open a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageRequest {
    /// Trimmed message text.
    pub message: String,
    /// Conversation the message belongs to, if one is open.
    pub conversation_id: Option<ConversationId>,
}

/// A stored message echoed back by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    /// Database id of the stored message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Message text.
    #[serde(default)]
    pub content: String,
    /// Server timestamp, unused by the page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Response of `POST /chat/send/`.
///
/// Error bodies only carry `error`, so `success` defaults to `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendMessageResponse {
    /// Whether the backend handled the message.
    #[serde(default)]
    pub success: bool,
    /// Conversation the message was stored in, new or existing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<ConversationId>,
    /// The stored copy of the user's message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_message: Option<MessagePayload>,
    /// The assistant's reply.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_message: Option<MessagePayload>,
    /// Title the backend derived for the conversation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_title: Option<String>,
    /// Failure description when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendMessageResponse {
    /// Assistant reply text, if the response carries a non-empty one.
    #[must_use]
    pub fn reply_text(&self) -> Option<&str> {
        self.ai_message
            .as_ref()
            .map(|message| message.content.as_str())
            .filter(|content| !content.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_message_role_string_forms_round_trip() {
        for role in MessageRole::iter() {
            assert_eq!(MessageRole::try_from(role.as_ref()), Ok(role));
        }
        assert!(MessageRole::try_from("system").is_err());
    }

    #[test]
    fn test_send_request_without_conversation_sends_null() {
        let request = SendMessageRequest {
            message: "hello".to_string(),
            conversation_id: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"message": "hello", "conversation_id": null})
        );
    }

    #[test]
    fn test_send_request_with_conversation() {
        let request = SendMessageRequest {
            message: "again".to_string(),
            conversation_id: ConversationId::parse("42"),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["conversation_id"], "42");
    }

    #[test]
    fn test_send_response_success_body() {
        let body = r#"{
            "success": true,
            "conversation_id": 42,
            "user_message": {"id": 1, "content": "hey", "created_at": "2024-01-01T10:00:00"},
            "ai_message": {"id": 2, "content": "hi", "created_at": "2024-01-01T10:00:01"},
            "conversation_title": "Greetings"
        }"#;
        let response: SendMessageResponse = serde_json::from_str(body).unwrap();
        assert!(response.success);
        assert_eq!(response.conversation_id.as_ref().unwrap().as_str(), "42");
        assert_eq!(response.reply_text(), Some("hi"));
        assert_eq!(response.conversation_title.as_deref(), Some("Greetings"));
    }

    #[test]
    fn test_send_response_error_body_is_failure() {
        let response: SendMessageResponse =
            serde_json::from_str(r#"{"error": "Message cannot be empty"}"#).unwrap();
        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("Message cannot be empty"));
        assert_eq!(response.reply_text(), None);
    }

    #[test]
    fn test_empty_reply_is_ignored() {
        let response: SendMessageResponse =
            serde_json::from_str(r#"{"success": true, "ai_message": {"content": ""}}"#).unwrap();
        assert_eq!(response.reply_text(), None);
    }
}
