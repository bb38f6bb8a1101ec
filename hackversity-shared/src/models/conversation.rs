//! Conversation identifiers and the create/delete endpoint bodies.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a chat conversation.
///
/// The backend emits integer primary keys while the page embeds the same value
/// as text, so both JSON forms are accepted. It always serializes as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawConversationId")]
pub struct ConversationId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawConversationId {
    Text(String),
    Integer(i64),
}

impl From<RawConversationId> for ConversationId {
    fn from(raw: RawConversationId) -> Self {
        match raw {
            RawConversationId::Text(value) => Self(value),
            RawConversationId::Integer(value) => Self(value.to_string()),
        }
    }
}

impl ConversationId {
    /// Parses a page-embedded value. Blank values mean "no conversation yet".
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// The identifier as embedded in URLs and form fields.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `POST /chat/new/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewConversationRequest {
    /// Optional first message; the backend answers it before returning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_message: Option<String>,
}

/// Response of `POST /chat/new/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewConversationResponse {
    /// Whether the backend carried out the request.
    #[serde(default)]
    pub success: bool,
    /// The new conversation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<ConversationId>,
    /// Failure description when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Response of `DELETE /chat/api/conversations/<id>/`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteConversationResponse {
    /// Whether the backend carried out the request.
    #[serde(default)]
    pub success: bool,
    /// Failure description when `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
