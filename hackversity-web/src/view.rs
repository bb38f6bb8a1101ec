use shared::models::ConversationId;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlInputElement, HtmlTextAreaElement};

use crate::components::message_bubble::bubble_class;
use crate::components::{Bubble, MessageBubble};
use crate::config::PageIds;
use crate::dom;

/// What the message flow changes on screen.
pub trait ChatView {
    /// Empties the message input and resets its height.
    fn clear_input(&self);

    /// Disables the input and send control and shows the loading overlay, or
    /// undoes all three.
    fn set_loading(&self, loading: bool);

    /// Appends a bubble to the message list and scrolls to it.
    fn append_bubble(&self, bubble: &Bubble);

    /// Writes the adopted conversation into the page's hidden field.
    fn reflect_conversation(&self, id: &ConversationId);
}

/// Height of an auto-growing input whose content needs `scroll_height`
/// pixels, capped at `max`.
pub fn grow_height(scroll_height: i32, max: i32) -> i32 {
    scroll_height.min(max)
}

/// [`ChatView`] over the server-rendered chat template. Elements are looked
/// up on every call; missing ones are skipped.
#[derive(Debug, Clone)]
pub struct DomChatView {
    document: Document,
    ids: PageIds,
}

impl DomChatView {
    pub fn new(document: Document, ids: PageIds) -> Self {
        Self { document, ids }
    }

    fn input(&self) -> Option<HtmlTextAreaElement> {
        dom::element_by_id(&self.document, self.ids.input)
            .and_then(|element| element.dyn_into::<HtmlTextAreaElement>().ok())
    }

    pub fn scroll_to_bottom(&self) {
        if let Some(list) = dom::element_by_id(&self.document, self.ids.messages) {
            dom::scroll_to_bottom(&list);
        }
    }
}

impl ChatView for DomChatView {
    fn clear_input(&self) {
        if let Some(input) = self.input() {
            input.set_value("");
            dom::set_height(&input, "auto");
        }
    }

    fn set_loading(&self, loading: bool) {
        for id in [self.ids.send_button, self.ids.input] {
            if let Some(element) = dom::element_by_id(&self.document, id) {
                dom::set_disabled(&element, loading);
            }
        }

        if let Some(overlay) = dom::element_by_id(&self.document, self.ids.loading_overlay)
            && let Err(err) = overlay
                .class_list()
                .toggle_with_force("show", loading)
        {
            log::debug!("could not toggle loading overlay: {err:?}");
        }
    }

    fn append_bubble(&self, bubble: &Bubble) {
        let Some(list) = dom::element_by_id(&self.document, self.ids.messages) else {
            log::warn!("message list #{} missing, bubble dropped", self.ids.messages);
            return;
        };
        let host = match self.document.create_element("div") {
            Ok(host) => host,
            Err(err) => {
                log::error!("could not create bubble: {err:?}");
                return;
            }
        };
        host.set_class_name(&format!("message {}", bubble_class(bubble.role)));
        if let Err(err) = list.append_child(&host) {
            log::error!("could not attach bubble: {err:?}");
            return;
        }

        let _bubble =
            yew::Renderer::<MessageBubble>::with_root_and_props(host, bubble.clone()).render();
        dom::scroll_to_bottom(&list);
    }

    fn reflect_conversation(&self, id: &ConversationId) {
        if let Some(field) = dom::element_by_id(&self.document, self.ids.conversation_field)
            .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
        {
            field.set_value(id.as_str());
        }
    }
}
