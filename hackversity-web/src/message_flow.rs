use futures::task::{LocalSpawn, LocalSpawnExt};
use shared::models::{MessageRole, SendMessageRequest};
use std::fmt;
use std::rc::Rc;

use crate::api::{ChatBackend, SEND_CONTEXT};
use crate::components::Bubble;
use crate::errors::{ChatError, ChatResult, ErrorReporter};
use crate::navigation::Navigator;
use crate::session::ChatSession;
use crate::view::ChatView;

/// A message that passed the submit gate and is on its way to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMessage(String);

/// Owns the send/receive cycle of the chat input.
///
/// The loading flag in the session admits one send at a time; attempts while
/// a send is outstanding are dropped, not queued.
pub struct MessageFlow {
    session: ChatSession,
    backend: Rc<dyn ChatBackend>,
    view: Rc<dyn ChatView>,
    navigator: Rc<dyn Navigator>,
    reporter: Rc<dyn ErrorReporter>,
    spawner: Rc<dyn LocalSpawn>,
}

impl fmt::Debug for MessageFlow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageFlow")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl MessageFlow {
    pub fn new(
        session: ChatSession,
        backend: Rc<dyn ChatBackend>,
        view: Rc<dyn ChatView>,
        navigator: Rc<dyn Navigator>,
        reporter: Rc<dyn ErrorReporter>,
        spawner: Rc<dyn LocalSpawn>,
    ) -> Self {
        Self {
            session,
            backend,
            view,
            navigator,
            reporter,
            spawner,
        }
    }

    #[cfg(test)]
    pub(crate) fn session(&self) -> &ChatSession {
        &self.session
    }

    /// Handles a form submission. Returns whether a send was started.
    pub fn submit(self: &Rc<Self>, raw: &str) -> bool {
        let Some(pending) = self.begin(raw) else {
            return false;
        };

        let flow = Rc::clone(self);
        if let Err(err) = self
            .spawner
            .spawn_local(async move { flow.deliver(pending).await })
        {
            log::error!("send task rejected: {err}");
            self.reporter.report(&ChatError::Spawn {
                context: SEND_CONTEXT,
            });
            self.settle();
        }
        true
    }

    /// Synchronous half of a submission: gate on the loading flag and on
    /// empty input, then clear the input, enter the loading state and show
    /// the user's bubble.
    pub fn begin(&self, raw: &str) -> Option<PendingMessage> {
        if self.session.is_loading() {
            log::debug!("send ignored, another one is in flight");
            return None;
        }
        let text = raw.trim();
        if text.is_empty() || !self.session.try_begin_loading() {
            return None;
        }

        self.view.clear_input();
        self.view.set_loading(true);
        self.view.append_bubble(&Bubble::now(text, MessageRole::User));
        Some(PendingMessage(text.to_owned()))
    }

    /// Asynchronous half: exchange with the backend, then leave the loading
    /// state whatever the outcome.
    pub async fn deliver(&self, pending: PendingMessage) {
        if let Err(error) = self.exchange(pending).await {
            self.reporter.report(&error);
        }
        self.settle();
    }

    async fn exchange(&self, pending: PendingMessage) -> ChatResult<()> {
        let request = SendMessageRequest {
            message: pending.0,
            conversation_id: self.session.current_conversation(),
        };
        let response = self.backend.send_message(&request).await?;
        if !response.success {
            return Err(ChatError::rejected(SEND_CONTEXT, response.error));
        }

        if let Some(id) = response.conversation_id.as_ref()
            && self.session.adopt_conversation(id.clone())
        {
            self.view.reflect_conversation(id);
            self.navigator.push_conversation(id);
        }

        if let Some(reply) = response.reply_text() {
            self.view
                .append_bubble(&Bubble::now(reply, MessageRole::Assistant));
        }
        Ok(())
    }

    fn settle(&self) {
        self.session.finish_loading();
        self.view.set_loading(false);
    }
}
