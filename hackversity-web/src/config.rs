//! Frontend configuration module
//!
//! Endpoint paths, page element identifiers and UI tuning for the chat page.

use shared::models::ConversationId;
use url::Url;
use url::form_urlencoded::byte_serialize;

use crate::typing::TypingOptions;

/// Query parameter carrying the open conversation.
pub const CONVERSATION_PARAM: &str = "conversation";

/// Frontend configuration for the chat page.
#[derive(Debug, Clone)]
pub struct FrontendConfig {
    /// Prefix prepended to every endpoint path, empty for same-origin.
    pub api_base: String,
    /// Backend endpoints and navigation targets.
    pub routes: ChatRoutes,
    /// Element identifiers and selectors the page template provides.
    pub ids: PageIds,
    /// Upper bound for the auto-growing message input, in pixels.
    pub input_max_height_px: i32,
    /// Defaults for animated labels without explicit timing attributes.
    pub typing: TypingOptions,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            api_base: option_env!("HACKVERSITY_API_BASE")
                .unwrap_or_default()
                .trim_end_matches('/')
                .to_string(),
            routes: ChatRoutes::default(),
            ids: PageIds::default(),
            input_max_height_px: 120,
            typing: TypingOptions::default(),
        }
    }
}

impl FrontendConfig {
    /// Create a new frontend configuration instance
    pub fn new() -> Self {
        Self::default()
    }
}

/// Paths of the chat backend and the pages it serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRoutes {
    pub chat_root: String,
    pub send_message: String,
    pub new_conversation: String,
    pub conversations_api: String,
}

impl Default for ChatRoutes {
    fn default() -> Self {
        Self {
            chat_root: "/chat/".to_string(),
            send_message: "/chat/send/".to_string(),
            new_conversation: "/chat/new/".to_string(),
            conversations_api: "/chat/api/conversations/".to_string(),
        }
    }
}

impl ChatRoutes {
    /// Page showing a single conversation.
    pub fn conversation_url(&self, id: &ConversationId) -> String {
        let encoded: String = byte_serialize(id.as_str().as_bytes()).collect();
        format!("{}?{CONVERSATION_PARAM}={encoded}", self.chat_root)
    }

    /// Chat page that must not redirect to a default conversation.
    pub fn force_chat_url(&self) -> String {
        format!("{}?force_chat=1", self.chat_root)
    }

    /// Deletion endpoint for one conversation.
    pub fn conversation_api_url(&self, id: &ConversationId) -> String {
        let encoded: String = byte_serialize(id.as_str().as_bytes()).collect();
        format!("{}{encoded}/", self.conversations_api)
    }
}

/// Sets the conversation query parameter on `href`. An existing parameter
/// keeps its position and takes the new value, later duplicates are
/// dropped; otherwise the parameter is appended. Every other parameter keeps
/// its order.
///
/// Returns `None` when `href` is not an absolute URL.
pub fn with_conversation_param(href: &str, id: &ConversationId) -> Option<String> {
    let mut url = Url::parse(href).ok()?;
    let mut replaced = false;
    let mut pairs: Vec<(String, String)> = Vec::new();
    for (key, value) in url.query_pairs() {
        if key != CONVERSATION_PARAM {
            pairs.push((key.into_owned(), value.into_owned()));
        } else if !replaced {
            replaced = true;
            pairs.push((key.into_owned(), id.as_str().to_owned()));
        }
    }
    if !replaced {
        pairs.push((CONVERSATION_PARAM.to_owned(), id.as_str().to_owned()));
    }

    url.query_pairs_mut().clear().extend_pairs(&pairs);
    Some(url.into())
}

/// Identifiers and selectors of the server-rendered chat template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageIds {
    pub form: &'static str,
    pub input: &'static str,
    pub send_button: &'static str,
    pub messages: &'static str,
    pub conversation_field: &'static str,
    pub loading_overlay: &'static str,
    pub confirmation_modal: &'static str,
    pub conversation_item: &'static str,
    pub delete_button: &'static str,
    pub conversation_attr: &'static str,
    pub new_conversation_trigger: &'static str,
    pub typing_target: &'static str,
}

impl Default for PageIds {
    fn default() -> Self {
        Self {
            form: "chatForm",
            input: "messageInput",
            send_button: "sendButton",
            messages: "messagesContainer",
            conversation_field: "conversationId",
            loading_overlay: "loadingOverlay",
            confirmation_modal: "confirmationModal",
            conversation_item: ".conversation-item",
            delete_button: ".delete-btn",
            conversation_attr: "data-conversation-id",
            new_conversation_trigger: "[data-action=\"new-conversation\"]",
            typing_target: "[data-typing-texts]",
        }
    }
}
