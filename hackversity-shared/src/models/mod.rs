//! Request and response bodies for the chat endpoints.

pub mod chat;
pub mod conversation;

pub use chat::{MessagePayload, MessageRole, SendMessageRequest, SendMessageResponse};
pub use conversation::{
    ConversationId, DeleteConversationResponse, NewConversationRequest, NewConversationResponse,
};
