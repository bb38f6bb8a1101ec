use async_trait::async_trait;
use once_cell::unsync::OnceCell;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::models::{
    ConversationId, DeleteConversationResponse, NewConversationRequest, NewConversationResponse,
    SendMessageRequest, SendMessageResponse,
};

use crate::config::{ChatRoutes, FrontendConfig};
use crate::csrf;
use crate::errors::{ChatError, ChatResult};

const CSRF_HEADER: &str = "X-CSRFToken";

pub(crate) const SEND_CONTEXT: &str = "Failed to send message";
pub(crate) const CREATE_CONTEXT: &str = "Failed to create new conversation";
pub(crate) const DELETE_CONTEXT: &str = "Failed to delete conversation";

thread_local! {
    static SHARED_CLIENT: OnceCell<ChatClient> = const { OnceCell::new() };
}

/// The chat endpoints the page depends on.
///
/// Implementations return the decoded body even when it reports
/// `success: false`; only transport and decoding failures are errors.
#[async_trait(?Send)]
pub trait ChatBackend {
    async fn send_message(&self, request: &SendMessageRequest) -> ChatResult<SendMessageResponse>;

    async fn create_conversation(
        &self,
        request: &NewConversationRequest,
    ) -> ChatResult<NewConversationResponse>;

    async fn delete_conversation(
        &self,
        id: &ConversationId,
    ) -> ChatResult<DeleteConversationResponse>;
}

/// Lightweight API client for the chat backend.
#[derive(Clone, Debug)]
pub struct ChatClient {
    base_url: String,
    routes: ChatRoutes,
    client: Client,
}

impl ChatClient {
    /// Create a new API client rooted at `base_url`.
    pub fn new(base_url: &str, routes: ChatRoutes) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            routes,
            client: Client::new(),
        }
    }

    /// Client for the page's own origin. reqwest only accepts absolute URLs,
    /// so the origin is read from the window.
    pub fn for_page(config: &FrontendConfig) -> Self {
        let origin = web_sys::window()
            .and_then(|window| window.location().origin().ok())
            .unwrap_or_default();
        Self::new(&format!("{origin}{}", config.api_base), config.routes.clone())
    }

    pub fn shared() -> Self {
        SHARED_CLIENT.with(|cell| {
            cell.get_or_init(|| Self::for_page(&FrontendConfig::default()))
                .clone()
        })
    }

    pub(crate) fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn apply_csrf(request: RequestBuilder) -> RequestBuilder {
        request.header(CSRF_HEADER, csrf::current_token())
    }

    async fn decode<T: DeserializeOwned>(
        context: &'static str,
        sent: Result<Response, reqwest::Error>,
    ) -> ChatResult<T> {
        let response = sent.map_err(|err| ChatError::transport(context, err))?;
        log::debug!("{} answered {}", response.url(), response.status());
        response
            .json()
            .await
            .map_err(|err| ChatError::transport(context, err))
    }
}

#[async_trait(?Send)]
impl ChatBackend for ChatClient {
    async fn send_message(&self, request: &SendMessageRequest) -> ChatResult<SendMessageResponse> {
        let url = self.api_url(&self.routes.send_message);
        let sent = Self::apply_csrf(self.client.post(url))
            .json(request)
            .send()
            .await;
        Self::decode(SEND_CONTEXT, sent).await
    }

    async fn create_conversation(
        &self,
        request: &NewConversationRequest,
    ) -> ChatResult<NewConversationResponse> {
        let url = self.api_url(&self.routes.new_conversation);
        let sent = Self::apply_csrf(self.client.post(url))
            .json(request)
            .send()
            .await;
        Self::decode(CREATE_CONTEXT, sent).await
    }

    async fn delete_conversation(
        &self,
        id: &ConversationId,
    ) -> ChatResult<DeleteConversationResponse> {
        let url = self.api_url(&self.routes.conversation_api_url(id));
        let sent = Self::apply_csrf(self.client.delete(url)).send().await;
        Self::decode(DELETE_CONTEXT, sent).await
    }
}
