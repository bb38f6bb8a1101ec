//! Browser tests for the DOM adapters
//!
//! Run with `wasm-pack test --headless --firefox hackversity-web`.

#[cfg(test)]
mod tests {
    use gloo_timers::future::TimeoutFuture;
    use shared::models::{ConversationId, MessageRole};
    use std::cell::Cell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
    use web_sys::{
        Document, Element, HtmlElement, HtmlInputElement, KeyboardEvent, KeyboardEventInit,
    };
    use yew::Callback;

    use crate::bootstrap::{Listeners, wire_escape};
    use crate::components::{Bubble, DialogHandle};
    use crate::config::PageIds;
    use crate::conversations::Confirmer;
    use crate::csrf::CsrfSources;
    use crate::view::{ChatView, DomChatView};

    wasm_bindgen_test_configure!(run_in_browser);

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    fn fixture(markup: &str) -> Element {
        let document = document();
        let root = document.create_element("div").unwrap();
        root.set_inner_html(markup);
        document.body().unwrap().append_child(&root).unwrap();
        root
    }

    /// Tests that the hidden form field is found when nothing else is set
    #[wasm_bindgen_test]
    fn test_csrf_from_form_field() {
        let root = fixture(r#"<input type="hidden" name="csrfmiddlewaretoken" value="form-token">"#);
        let sources = CsrfSources::from_document(&document());
        assert_eq!(sources.form_field.as_deref(), Some("form-token"));
        root.remove();
    }

    /// Tests the loading state and conversation field on a template fixture
    #[wasm_bindgen_test]
    fn test_dom_view_loading_and_conversation() {
        let root = fixture(
            r#"<textarea id="messageInput">draft</textarea>
               <button id="sendButton"></button>
               <div id="loadingOverlay"></div>
               <input type="hidden" id="conversationId" value="">
               <div id="messagesContainer"></div>"#,
        );
        let document = document();
        let view = DomChatView::new(document.clone(), PageIds::default());

        view.set_loading(true);
        assert!(document.get_element_by_id("sendButton").unwrap().has_attribute("disabled"));
        assert!(
            document
                .get_element_by_id("loadingOverlay")
                .unwrap()
                .class_list()
                .contains("show")
        );

        view.set_loading(false);
        assert!(!document.get_element_by_id("messageInput").unwrap().has_attribute("disabled"));

        view.clear_input();
        view.reflect_conversation(&ConversationId::parse("42").unwrap());
        let field = document
            .get_element_by_id("conversationId")
            .unwrap()
            .dyn_into::<HtmlInputElement>()
            .unwrap();
        assert_eq!(field.value(), "42");

        view.append_bubble(&Bubble::now("hi", MessageRole::User));
        let list = document.get_element_by_id("messagesContainer").unwrap();
        assert_eq!(list.child_element_count(), 1);
        assert_eq!(list.first_element_child().unwrap().class_name(), "message user");

        root.remove();
    }

    /// Lets yew's scheduler render pending updates.
    async fn rendered() {
        TimeoutFuture::new(20).await;
    }

    struct OpenDialog {
        root: Element,
        dialog: Rc<DialogHandle>,
        confirmed: Rc<Cell<u32>>,
    }

    impl OpenDialog {
        async fn mount(id: &'static str) -> Self {
            let root = fixture("");
            let dialog = Rc::new(DialogHandle::mount(root.clone(), id));
            let confirmed = Rc::new(Cell::new(0));
            let counter = Rc::clone(&confirmed);
            dialog.request_confirmation(
                "Delete Conversation",
                "Really?",
                Callback::from(move |()| counter.set(counter.get() + 1)),
            );
            rendered().await;
            Self {
                root,
                dialog,
                confirmed,
            }
        }

        fn element(&self, selector: &str) -> HtmlElement {
            self.root
                .query_selector(selector)
                .unwrap()
                .unwrap()
                .dyn_into::<HtmlElement>()
                .unwrap()
        }

        fn is_visible(&self) -> bool {
            self.element(".confirmation-modal")
                .class_list()
                .contains("show")
        }

        async fn click(&self, selector: &str) {
            self.element(selector).click();
            rendered().await;
        }
    }

    /// Tests that only a click on the overlay itself dismisses the dialog
    #[wasm_bindgen_test]
    async fn test_dialog_backdrop_click_dismisses() {
        let open = OpenDialog::mount("backdropModal").await;
        assert!(open.is_visible());
        assert!(open.element(".confirmation-title").inner_text().contains("Delete Conversation"));

        open.click(".confirmation-content").await;
        assert!(open.is_visible());

        open.click(".confirmation-modal").await;
        assert!(!open.is_visible());
        assert_eq!(open.confirmed.get(), 0);
        open.root.remove();
    }

    /// Tests that the cancel button dismisses without confirming
    #[wasm_bindgen_test]
    async fn test_dialog_cancel_dismisses() {
        let open = OpenDialog::mount("cancelModal").await;

        open.click("#confirmationCancel").await;
        assert!(!open.is_visible());

        open.click("#confirmationConfirm").await;
        assert_eq!(open.confirmed.get(), 0);
        open.root.remove();
    }

    /// Tests that Escape anywhere on the page dismisses the dialog
    #[wasm_bindgen_test]
    async fn test_dialog_escape_dismisses() {
        let open = OpenDialog::mount("escapeModal").await;
        let mut listeners = Listeners::default();
        wire_escape(&mut listeners, &document(), &open.dialog);

        let init = KeyboardEventInit::new();
        init.set_key("Escape");
        init.set_bubbles(true);
        let escape = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
        document().dispatch_event(&escape).unwrap();
        rendered().await;

        assert!(!open.is_visible());
        assert_eq!(open.confirmed.get(), 0);
        drop(listeners);
        open.root.remove();
    }

    /// Tests that confirming hides the dialog and runs the callback once
    #[wasm_bindgen_test]
    async fn test_dialog_confirm_runs_callback_once() {
        let open = OpenDialog::mount("confirmModal").await;

        open.click("#confirmationConfirm").await;
        assert!(!open.is_visible());
        assert_eq!(open.confirmed.get(), 1);

        open.click("#confirmationConfirm").await;
        assert_eq!(open.confirmed.get(), 1);
        open.root.remove();
    }
}
