use futures::task::{LocalSpawn, LocalSpawnExt};
use shared::models::{ConversationId, NewConversationRequest};
use std::fmt;
use std::rc::Rc;
use yew::Callback;

use crate::api::{CREATE_CONTEXT, ChatBackend, DELETE_CONTEXT};
use crate::config::ChatRoutes;
use crate::errors::{ChatError, ChatResult, ErrorReporter};
use crate::navigation::Navigator;
use crate::session::ChatSession;

const DELETE_TITLE: &str = "Delete Conversation";
const DELETE_MESSAGE: &str =
    "Are you sure you want to delete this conversation? This action cannot be undone.";

/// Asks the user a yes/no question; `on_confirm` runs only on a yes.
pub trait Confirmer {
    fn request_confirmation(&self, title: &str, message: &str, on_confirm: Callback<()>);
}

/// Sidebar behaviour: opening, deleting and creating conversations.
pub struct ConversationList {
    session: ChatSession,
    routes: ChatRoutes,
    backend: Rc<dyn ChatBackend>,
    navigator: Rc<dyn Navigator>,
    reporter: Rc<dyn ErrorReporter>,
    confirmer: Option<Rc<dyn Confirmer>>,
    spawner: Rc<dyn LocalSpawn>,
}

impl fmt::Debug for ConversationList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversationList")
            .field("session", &self.session)
            .field("routes", &self.routes)
            .finish_non_exhaustive()
    }
}

impl ConversationList {
    pub fn new(
        session: ChatSession,
        routes: ChatRoutes,
        backend: Rc<dyn ChatBackend>,
        navigator: Rc<dyn Navigator>,
        reporter: Rc<dyn ErrorReporter>,
        confirmer: Option<Rc<dyn Confirmer>>,
        spawner: Rc<dyn LocalSpawn>,
    ) -> Self {
        Self {
            session,
            routes,
            backend,
            navigator,
            reporter,
            confirmer,
            spawner,
        }
    }

    /// Navigates to the conversation's page.
    pub fn open(&self, id: &ConversationId) {
        self.navigator.assign(&self.routes.conversation_url(id));
    }

    /// Asks for confirmation, then deletes `id`. Nothing is sent if the
    /// dialog is dismissed, or if there is no dialog to ask with.
    pub fn request_delete(self: &Rc<Self>, id: ConversationId) {
        let Some(confirmer) = &self.confirmer else {
            log::warn!("no confirmation dialog, delete of {id} ignored");
            return;
        };
        let list = Rc::clone(self);
        let on_confirm = Callback::from(move |()| {
            let task = Rc::clone(&list);
            let id = id.clone();
            list.run(DELETE_CONTEXT, async move { task.delete(&id).await });
        });
        confirmer.request_confirmation(DELETE_TITLE, DELETE_MESSAGE, on_confirm);
    }

    /// Creates a conversation and opens it.
    pub fn start_new_conversation(self: &Rc<Self>) {
        let task = Rc::clone(self);
        self.run(CREATE_CONTEXT, async move { task.create().await });
    }

    /// Deletes `id` without asking. Leaves the page when the open
    /// conversation is gone, otherwise reloads so the sidebar is current.
    pub async fn delete(&self, id: &ConversationId) {
        match self.try_delete(id).await {
            Ok(()) if self.session.is_current(id) => {
                self.navigator.assign(&self.routes.force_chat_url());
            }
            Ok(()) => self.navigator.reload(),
            Err(error) => self.reporter.report(&error),
        }
    }

    async fn try_delete(&self, id: &ConversationId) -> ChatResult<()> {
        let response = self.backend.delete_conversation(id).await?;
        if response.success {
            log::info!("deleted conversation {id}");
            Ok(())
        } else {
            Err(ChatError::rejected(DELETE_CONTEXT, None))
        }
    }

    /// Creates a conversation. Any failure is reported and falls back to the
    /// plain chat page.
    pub async fn create(&self) {
        match self.try_create().await {
            Ok(id) => self.navigator.assign(&self.routes.conversation_url(&id)),
            Err(error) => {
                self.reporter.report(&error);
                self.navigator.assign(&self.routes.chat_root);
            }
        }
    }

    async fn try_create(&self) -> ChatResult<ConversationId> {
        let response = self
            .backend
            .create_conversation(&NewConversationRequest::default())
            .await?;
        match response.conversation_id {
            Some(id) if response.success => Ok(id),
            _ => Err(ChatError::rejected(CREATE_CONTEXT, response.error)),
        }
    }

    fn run(&self, context: &'static str, task: impl Future<Output = ()> + 'static) {
        if let Err(err) = self.spawner.spawn_local(task) {
            log::error!("{context}: {err}");
            self.reporter.report(&ChatError::Spawn { context });
        }
    }
}
