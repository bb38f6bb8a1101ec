//! Wires the server-rendered chat template to the controllers.
//!
//! Every element is optional: a missing one only leaves its feature unwired.

use futures::future::LocalFutureObj;
use futures::task::{LocalSpawn, SpawnError};
use shared::models::ConversationId;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{Document, Element, Event, EventTarget, HtmlInputElement, HtmlTextAreaElement, KeyboardEvent};

use crate::api::{ChatBackend, ChatClient};
use crate::components::DialogHandle;
use crate::config::{FrontendConfig, PageIds};
use crate::conversations::{Confirmer, ConversationList};
use crate::dom;
use crate::errors::{ConsoleReporter, ErrorReporter};
use crate::message_flow::MessageFlow;
use crate::navigation::{BrowserNavigator, Navigator};
use crate::session::ChatSession;
use crate::typing::{TypingEffect, TypingMachine};
use crate::view::{DomChatView, grow_height};

thread_local! {
    static PAGE: RefCell<Option<ChatPage>> = const { RefCell::new(None) };
}

/// Runs tasks on the browser's microtask queue.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSpawner;

impl LocalSpawn for BrowserSpawner {
    fn spawn_local_obj(&self, future: LocalFutureObj<'static, ()>) -> Result<(), SpawnError> {
        wasm_bindgen_futures::spawn_local(future);
        Ok(())
    }
}

/// Event handlers attached by the page. Each handler stays registered for
/// as long as the registry lives and is detached when it is dropped.
#[derive(Debug, Default)]
pub(crate) struct Listeners(Vec<Listener>);

#[derive(Debug)]
struct Listener {
    target: EventTarget,
    event: String,
    handler: Closure<dyn FnMut(Event)>,
}

impl Listeners {
    fn listen<F>(&mut self, target: &EventTarget, event: &str, handler: F)
    where
        F: FnMut(Event) + 'static,
    {
        let handler = Closure::<dyn FnMut(Event)>::wrap(Box::new(handler));
        match target.add_event_listener_with_callback(event, handler.as_ref().unchecked_ref()) {
            Ok(()) => self.0.push(Listener {
                target: target.clone(),
                event: event.to_string(),
                handler,
            }),
            Err(err) => log::warn!("could not listen for {event}: {err:?}"),
        }
    }

    fn len(&self) -> usize {
        self.0.len()
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(err) = self
            .target
            .remove_event_listener_with_callback(&self.event, self.handler.as_ref().unchecked_ref())
        {
            log::debug!("could not detach {} listener: {err:?}", self.event);
        }
    }
}

/// Everything the chat page keeps alive after startup.
#[derive(Debug)]
pub struct ChatPage {
    _dialog: Option<Rc<DialogHandle>>,
    _typing: Vec<TypingEffect>,
    _listeners: Listeners,
}

impl ChatPage {
    /// Builds the controllers and attaches them to the document.
    pub fn mount(config: &FrontendConfig) -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        let ids = config.ids.clone();

        let session = ChatSession::new(initial_conversation(&document, &ids));
        let backend: Rc<dyn ChatBackend> = Rc::new(ChatClient::shared());
        let navigator: Rc<dyn Navigator> = Rc::new(BrowserNavigator::new(window));
        let reporter: Rc<dyn ErrorReporter> = Rc::new(ConsoleReporter);
        let spawner: Rc<dyn LocalSpawn> = Rc::new(BrowserSpawner);
        let view = Rc::new(DomChatView::new(document.clone(), ids.clone()));
        let dialog = mount_dialog(&document, ids.confirmation_modal).map(Rc::new);

        let flow = Rc::new(MessageFlow::new(
            session.clone(),
            Rc::clone(&backend),
            view.clone(),
            Rc::clone(&navigator),
            Rc::clone(&reporter),
            Rc::clone(&spawner),
        ));
        let conversations = Rc::new(ConversationList::new(
            session,
            config.routes.clone(),
            backend,
            navigator,
            reporter,
            dialog
                .clone()
                .map(|dialog| dialog as Rc<dyn Confirmer>),
            Rc::clone(&spawner),
        ));

        let mut listeners = Listeners::default();
        wire_message_form(&mut listeners, &document, &ids, config.input_max_height_px, &flow);
        wire_conversation_list(
            &mut listeners,
            &document,
            &ids,
            &conversations,
            dialog.is_some(),
        );
        if let Some(dialog) = &dialog {
            wire_escape(&mut listeners, &document, dialog);
        }

        let typing = start_typing_effects(&document, config, spawner.as_ref());
        view.scroll_to_bottom();

        log::info!(
            "chat page ready: {} listeners, {} typing effects",
            listeners.len(),
            typing.len()
        );
        Some(Self {
            _dialog: dialog,
            _typing: typing,
            _listeners: listeners,
        })
    }
}

/// Mounts the page once the document has been parsed.
pub fn start() {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        log::error!("no document, chat page not mounted");
        return;
    };

    if document.ready_state() != "loading" {
        mount_page();
        return;
    }

    let on_ready = Closure::once_into_js(mount_page);
    if let Err(err) =
        document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
    {
        log::error!("could not wait for DOMContentLoaded: {err:?}");
    }
}

fn mount_page() {
    let config = FrontendConfig::new();
    match ChatPage::mount(&config) {
        Some(page) => PAGE.with(|slot| *slot.borrow_mut() = Some(page)),
        None => log::error!("chat page could not be mounted"),
    }
}

fn initial_conversation(document: &Document, ids: &PageIds) -> Option<ConversationId> {
    dom::element_by_id(document, ids.conversation_field)
        .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
        .and_then(|field| ConversationId::parse(&field.value()))
}

/// Mounts the confirmation dialog at the end of `<body>`. Without it the
/// page still works, only deleting conversations is not offered.
fn mount_dialog(document: &Document, id: &'static str) -> Option<DialogHandle> {
    let Some(body) = document.body() else {
        log::warn!("no <body>, confirmation dialog not mounted");
        return None;
    };
    let host = match document.create_element("div") {
        Ok(host) => host,
        Err(err) => {
            log::error!("could not create confirmation dialog: {err:?}");
            return None;
        }
    };
    if let Err(err) = body.append_child(&host) {
        log::error!("could not attach confirmation dialog: {err:?}");
        return None;
    }
    Some(DialogHandle::mount(host, id))
}

/// Hides the dialog on Escape, whoever opened it.
pub(crate) fn wire_escape(
    listeners: &mut Listeners,
    document: &Document,
    dialog: &Rc<DialogHandle>,
) {
    let dialog = Rc::clone(dialog);
    listeners.listen(document, "keydown", move |event: Event| {
        if event
            .dyn_ref::<KeyboardEvent>()
            .is_some_and(|key| key.key() == "Escape")
        {
            dialog.dismiss();
        }
    });
}

/// Whether a key press in the input sends the message. Shift+Enter inserts
/// a line break instead.
pub fn is_send_key(key: &str, shift: bool) -> bool {
    key == "Enter" && !shift
}

fn wire_message_form(
    listeners: &mut Listeners,
    document: &Document,
    ids: &PageIds,
    max_height: i32,
    flow: &Rc<MessageFlow>,
) {
    let input = dom::element_by_id(document, ids.input)
        .and_then(|element| element.dyn_into::<HtmlTextAreaElement>().ok());

    if let Some(form) = dom::element_by_id(document, ids.form) {
        let flow = Rc::clone(flow);
        let input = input.clone();
        listeners.listen(&form, "submit", move |event: Event| {
            event.prevent_default();
            if let Some(input) = &input {
                flow.submit(&input.value());
            }
        });
    } else {
        log::warn!("#{} missing, sending is not wired", ids.form);
    }

    let Some(input) = input else {
        log::warn!("#{} missing, input is not wired", ids.input);
        return;
    };

    let send_flow = Rc::clone(flow);
    let send_input = input.clone();
    listeners.listen(&input, "keypress", move |event: Event| {
        let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if is_send_key(&key.key(), key.shift_key()) {
            event.prevent_default();
            send_flow.submit(&send_input.value());
        }
    });

    let grow_input = input.clone();
    listeners.listen(&input, "input", move |_: Event| {
        dom::set_height(&grow_input, "auto");
        let height = grow_height(grow_input.scroll_height(), max_height);
        dom::set_height(&grow_input, &format!("{height}px"));
    });
}

fn conversation_of(element: &Element, ids: &PageIds) -> Option<ConversationId> {
    element
        .get_attribute(ids.conversation_attr)
        .and_then(|value| ConversationId::parse(&value))
}

fn wire_conversation_list(
    listeners: &mut Listeners,
    document: &Document,
    ids: &PageIds,
    conversations: &Rc<ConversationList>,
    deletable: bool,
) {
    for item in dom::query_all(document, ids.conversation_item) {
        let Some(id) = conversation_of(&item, ids) else {
            continue;
        };
        let list = Rc::clone(conversations);
        let delete_selector = ids.delete_button;
        listeners.listen(&item, "click", move |event: Event| {
            let on_delete = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|target| target.closest(delete_selector).ok().flatten())
                .is_some();
            if !on_delete {
                list.open(&id);
            }
        });
    }

    if !deletable {
        log::warn!("no confirmation dialog, delete buttons are not wired");
    }
    let delete_buttons = if deletable {
        dom::query_all(document, ids.delete_button)
    } else {
        Vec::new()
    };
    for button in delete_buttons {
        let Some(id) = conversation_of(&button, ids) else {
            continue;
        };
        let list = Rc::clone(conversations);
        listeners.listen(&button, "click", move |event: Event| {
            event.stop_propagation();
            list.request_delete(id.clone());
        });
    }

    for trigger in dom::query_all(document, ids.new_conversation_trigger) {
        let list = Rc::clone(conversations);
        listeners.listen(&trigger, "click", move |event: Event| {
            event.prevent_default();
            list.start_new_conversation();
        });
    }
}

/// Texts of a `data-typing-texts` attribute: a JSON array of strings.
pub fn parse_typing_texts(raw: &str) -> Option<Vec<String>> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(texts) if !texts.is_empty() => Some(texts),
        Ok(_) => None,
        Err(err) => {
            log::warn!("ignoring typing texts {raw:?}: {err}");
            None
        }
    }
}

fn start_typing_effects(
    document: &Document,
    config: &FrontendConfig,
    spawner: &dyn LocalSpawn,
) -> Vec<TypingEffect> {
    dom::query_all(document, config.ids.typing_target)
        .into_iter()
        .filter_map(|element| {
            let texts = element
                .get_attribute("data-typing-texts")
                .and_then(|raw| parse_typing_texts(&raw))?;
            let options = config
                .typing
                .with_attributes(|name| element.get_attribute(name));
            let machine = TypingMachine::new(texts, options);
            TypingEffect::start(element, machine, spawner)
                .map_err(|err| log::error!("typing effect not started: {err}"))
                .ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Enter", false, true ; "enter sends")]
    #[test_case("Enter", true, false ; "shift enter breaks the line")]
    #[test_case("a", false, false ; "other keys type")]
    fn test_is_send_key(key: &str, shift: bool, expected: bool) {
        assert_eq!(is_send_key(key, shift), expected);
    }

    #[test]
    fn test_parse_typing_texts() {
        assert_eq!(
            parse_typing_texts(r#"["Learn", "Hack", "Defend"]"#),
            Some(vec![
                "Learn".to_string(),
                "Hack".to_string(),
                "Defend".to_string()
            ])
        );
    }

    #[test_case("[]" ; "empty list")]
    #[test_case("not json" ; "malformed")]
    #[test_case(r#"{"a": 1}"# ; "not a list")]
    fn test_parse_typing_texts_rejects(raw: &str) {
        assert_eq!(parse_typing_texts(raw), None);
    }
}
