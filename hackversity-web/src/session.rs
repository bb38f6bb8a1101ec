use shared::models::ConversationId;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Page-wide chat state shared by the controllers.
///
/// Cloning yields another handle to the same state. Every mutation completes
/// before returning, so callbacks on the single browser thread never observe
/// a half-applied change.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    inner: Rc<SessionState>,
}

#[derive(Debug, Default)]
struct SessionState {
    conversation: RefCell<Option<ConversationId>>,
    loading: Cell<bool>,
}

impl ChatSession {
    pub fn new(conversation: Option<ConversationId>) -> Self {
        Self {
            inner: Rc::new(SessionState {
                conversation: RefCell::new(conversation),
                loading: Cell::new(false),
            }),
        }
    }

    pub fn current_conversation(&self) -> Option<ConversationId> {
        self.inner.conversation.borrow().clone()
    }

    /// Whether `id` is the conversation currently on screen.
    pub fn is_current(&self, id: &ConversationId) -> bool {
        self.inner.conversation.borrow().as_ref() == Some(id)
    }

    /// Records a backend-assigned conversation. Only takes effect when no
    /// conversation is known yet; returns whether it was adopted.
    pub fn adopt_conversation(&self, id: ConversationId) -> bool {
        let mut current = self.inner.conversation.borrow_mut();
        if current.is_some() {
            return false;
        }
        log::info!("adopting conversation {id}");
        *current = Some(id);
        true
    }

    pub fn is_loading(&self) -> bool {
        self.inner.loading.get()
    }

    /// Raises the loading flag unless a send is already in flight.
    pub fn try_begin_loading(&self) -> bool {
        if self.inner.loading.get() {
            return false;
        }
        self.inner.loading.set(true);
        true
    }

    pub fn finish_loading(&self) {
        self.inner.loading.set(false);
    }
}
