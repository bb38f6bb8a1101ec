//! Fakes for the controller ports, driven by a `LocalPool` in tests.

use async_trait::async_trait;
use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::task::LocalSpawn;
use shared::models::{
    ConversationId, DeleteConversationResponse, MessageRole, NewConversationRequest,
    NewConversationResponse, SendMessageRequest, SendMessageResponse,
};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use yew::Callback;

use crate::api::ChatBackend;
use crate::components::Bubble;
use crate::conversations::Confirmer;
use crate::errors::{ChatError, ChatResult};
use crate::view::ChatView;

pub fn id(value: &str) -> ConversationId {
    ConversationId::parse(value).unwrap()
}

/// A real `reqwest::Error`, produced by building a request for an
/// unparsable URL.
pub fn transport_error(context: &'static str) -> ChatError {
    let err = reqwest::Client::new()
        .get("not a url")
        .build()
        .unwrap_err();
    ChatError::transport(context, err)
}

pub fn spawner_for(pool: &LocalPool) -> Rc<dyn LocalSpawn> {
    Rc::new(pool.spawner())
}

/// A scripted backend answer, either immediate or released later.
pub enum Reply<T> {
    Ready(ChatResult<T>),
    Gated(oneshot::Receiver<ChatResult<T>>),
}

impl<T> Reply<T> {
    pub fn ok(value: T) -> Self {
        Self::Ready(Ok(value))
    }

    pub fn err(error: ChatError) -> Self {
        Self::Ready(Err(error))
    }

    /// A reply that resolves once the returned sender fires.
    pub fn gated() -> (oneshot::Sender<ChatResult<T>>, Self) {
        let (tx, rx) = oneshot::channel();
        (tx, Self::Gated(rx))
    }

    async fn resolve(self, context: &'static str) -> ChatResult<T> {
        match self {
            Self::Ready(result) => result,
            Self::Gated(rx) => rx
                .await
                .unwrap_or_else(|_| Err(ChatError::rejected(context, None))),
        }
    }
}

/// Backend returning scripted replies in order and recording every request.
#[derive(Default)]
pub struct FakeBackend {
    send_replies: RefCell<VecDeque<Reply<SendMessageResponse>>>,
    create_replies: RefCell<VecDeque<Reply<NewConversationResponse>>>,
    delete_replies: RefCell<VecDeque<Reply<DeleteConversationResponse>>>,
    pub sent: RefCell<Vec<SendMessageRequest>>,
    pub created: Cell<usize>,
    pub deleted: RefCell<Vec<ConversationId>>,
}

impl FakeBackend {
    pub fn on_send(&self, reply: Reply<SendMessageResponse>) -> &Self {
        self.send_replies.borrow_mut().push_back(reply);
        self
    }

    pub fn on_create(&self, reply: Reply<NewConversationResponse>) -> &Self {
        self.create_replies.borrow_mut().push_back(reply);
        self
    }

    pub fn on_delete(&self, reply: Reply<DeleteConversationResponse>) -> &Self {
        self.delete_replies.borrow_mut().push_back(reply);
        self
    }
}

fn next<T>(queue: &RefCell<VecDeque<Reply<T>>>, what: &str) -> Reply<T> {
    queue
        .borrow_mut()
        .pop_front()
        .unwrap_or_else(|| panic!("unexpected {what} request"))
}

#[async_trait(?Send)]
impl ChatBackend for FakeBackend {
    async fn send_message(&self, request: &SendMessageRequest) -> ChatResult<SendMessageResponse> {
        self.sent.borrow_mut().push(request.clone());
        let reply = next(&self.send_replies, "send");
        reply.resolve("send").await
    }

    async fn create_conversation(
        &self,
        _request: &NewConversationRequest,
    ) -> ChatResult<NewConversationResponse> {
        self.created.set(self.created.get() + 1);
        let reply = next(&self.create_replies, "create");
        reply.resolve("create").await
    }

    async fn delete_conversation(
        &self,
        id: &ConversationId,
    ) -> ChatResult<DeleteConversationResponse> {
        self.deleted.borrow_mut().push(id.clone());
        let reply = next(&self.delete_replies, "delete");
        reply.resolve("delete").await
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    ClearInput,
    Loading(bool),
    Bubble(MessageRole, String),
    Conversation(String),
}

/// View that records what it was asked to do.
#[derive(Default)]
pub struct RecordingView {
    pub events: RefCell<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn bubbles(&self) -> Vec<(MessageRole, String)> {
        self.events
            .borrow()
            .iter()
            .filter_map(|event| match event {
                ViewEvent::Bubble(role, text) => Some((*role, text.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn last_loading(&self) -> Option<bool> {
        self.events.borrow().iter().rev().find_map(|event| match event {
            ViewEvent::Loading(loading) => Some(*loading),
            _ => None,
        })
    }
}

impl ChatView for RecordingView {
    fn clear_input(&self) {
        self.events.borrow_mut().push(ViewEvent::ClearInput);
    }

    fn set_loading(&self, loading: bool) {
        self.events.borrow_mut().push(ViewEvent::Loading(loading));
    }

    fn append_bubble(&self, bubble: &Bubble) {
        self.events
            .borrow_mut()
            .push(ViewEvent::Bubble(bubble.role, bubble.text.clone()));
    }

    fn reflect_conversation(&self, id: &ConversationId) {
        self.events
            .borrow_mut()
            .push(ViewEvent::Conversation(id.as_str().to_string()));
    }
}

/// Confirmer that holds the last request until the test answers it.
#[derive(Default)]
pub struct FakeConfirmer {
    pending: RefCell<Option<(String, String, Callback<()>)>>,
}

impl FakeConfirmer {
    pub fn title(&self) -> Option<String> {
        self.pending.borrow().as_ref().map(|(title, _, _)| title.clone())
    }

    pub fn message(&self) -> Option<String> {
        self.pending
            .borrow()
            .as_ref()
            .map(|(_, message, _)| message.clone())
    }

    pub fn confirm(&self) {
        let pending = self.pending.borrow_mut().take();
        if let Some((_, _, on_confirm)) = pending {
            on_confirm.emit(());
        }
    }

    pub fn dismiss(&self) {
        self.pending.borrow_mut().take();
    }
}

impl Confirmer for FakeConfirmer {
    fn request_confirmation(&self, title: &str, message: &str, on_confirm: Callback<()>) {
        *self.pending.borrow_mut() = Some((title.to_string(), message.to_string(), on_confirm));
    }
}
