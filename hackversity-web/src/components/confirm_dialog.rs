use std::fmt;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, MouseEvent};
use yew::{
    AppHandle, AttrValue, Callback, Component, Context, Html, NodeRef, Properties, classes, html,
};

use crate::conversations::Confirmer;

const DEFAULT_TITLE: &str = "Confirm Action";
const DEFAULT_MESSAGE: &str = "Are you sure?";

/// A pending yes/no question.
#[derive(Clone, PartialEq)]
pub struct ConfirmRequest {
    pub title: String,
    pub message: String,
    pub on_confirm: Callback<()>,
}

/// Visibility, text and the single armed confirm callback of the dialog.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogState {
    visible: bool,
    title: String,
    message: String,
    armed: Option<Callback<()>>,
}

impl Default for DialogState {
    fn default() -> Self {
        Self {
            visible: false,
            title: DEFAULT_TITLE.to_string(),
            message: DEFAULT_MESSAGE.to_string(),
            armed: None,
        }
    }
}

impl DialogState {
    /// Shows `request`, replacing whatever callback was armed before.
    pub fn open(&mut self, request: ConfirmRequest) {
        self.title = request.title;
        self.message = request.message;
        self.armed = Some(request.on_confirm);
        self.visible = true;
    }

    /// Hides the dialog and hands back the armed callback for the caller to
    /// run. `None` when the dialog was not showing.
    pub fn confirm(&mut self) -> Option<Callback<()>> {
        if !self.visible {
            return None;
        }
        self.visible = false;
        self.armed.take()
    }

    /// Hides the dialog without confirming. Returns whether it was visible.
    pub fn dismiss(&mut self) -> bool {
        let was_visible = self.visible;
        self.visible = false;
        self.armed = None;
        was_visible
    }

    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub enum DialogMsg {
    Open(ConfirmRequest),
    Confirm,
    Dismiss,
}

#[derive(Properties, PartialEq)]
pub struct ConfirmDialogProps {
    pub id: AttrValue,
}

/// Modal overlay asking the user to confirm a destructive action.
///
/// Cancel, a click on the backdrop and Escape all dismiss it.
pub struct ConfirmDialog {
    state: DialogState,
    backdrop: NodeRef,
    cancel_button: NodeRef,
    focus_pending: bool,
}

impl Component for ConfirmDialog {
    type Message = DialogMsg;
    type Properties = ConfirmDialogProps;

    fn create(_ctx: &Context<Self>) -> Self {
        Self {
            state: DialogState::default(),
            backdrop: NodeRef::default(),
            cancel_button: NodeRef::default(),
            focus_pending: false,
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            DialogMsg::Open(request) => {
                self.state.open(request);
                self.focus_pending = true;
                true
            }
            DialogMsg::Confirm => match self.state.confirm() {
                Some(on_confirm) => {
                    on_confirm.emit(());
                    true
                }
                None => false,
            },
            DialogMsg::Dismiss => self.state.dismiss(),
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        // Listeners are delegated to the app root, so `current_target` is never
        // the overlay itself.
        let backdrop = self.backdrop.clone();
        let on_backdrop = link.batch_callback(move |event: MouseEvent| {
            let target = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok());
            (target.is_some() && target == backdrop.cast::<Element>())
                .then_some(DialogMsg::Dismiss)
        });
        let on_cancel = link.callback(|_: MouseEvent| DialogMsg::Dismiss);
        let on_confirm = link.callback(|_: MouseEvent| DialogMsg::Confirm);

        html! {
            <div
                id={ctx.props().id.clone()}
                class={classes!("confirmation-modal", self.state.is_visible().then_some("show"))}
                ref={self.backdrop.clone()}
                onclick={on_backdrop}
            >
                <div class="confirmation-content">
                    <div class="confirmation-icon">
                        <i class="fas fa-exclamation-triangle"></i>
                    </div>
                    <h3 class="confirmation-title" id="confirmationTitle">{ self.state.title().to_string() }</h3>
                    <p class="confirmation-message" id="confirmationMessage">{ self.state.message().to_string() }</p>
                    <div class="confirmation-buttons">
                        <button
                            class="confirmation-btn confirmation-btn-cancel"
                            id="confirmationCancel"
                            type="button"
                            ref={self.cancel_button.clone()}
                            onclick={on_cancel}
                        >
                            <i class="fas fa-times"></i>{" Cancel"}
                        </button>
                        <button
                            class="confirmation-btn confirmation-btn-delete"
                            id="confirmationConfirm"
                            type="button"
                            onclick={on_confirm}
                        >
                            <i class="fas fa-trash"></i>{" Delete"}
                        </button>
                    </div>
                </div>
            </div>
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        if !self.focus_pending {
            return;
        }
        self.focus_pending = false;
        if let Some(button) = self.cancel_button.cast::<HtmlElement>()
            && let Err(err) = button.focus()
        {
            log::debug!("could not focus cancel button: {err:?}");
        }
    }
}

/// The mounted dialog. Built once at bootstrap and shared by every caller
/// that needs a confirmation.
pub struct DialogHandle {
    app: AppHandle<ConfirmDialog>,
}

impl fmt::Debug for DialogHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogHandle").finish_non_exhaustive()
    }
}

impl DialogHandle {
    /// Mounts the dialog into `host`.
    pub fn mount(host: Element, id: &'static str) -> Self {
        let app = yew::Renderer::<ConfirmDialog>::with_root_and_props(
            host,
            ConfirmDialogProps {
                id: AttrValue::Static(id),
            },
        )
        .render();
        Self { app }
    }

    /// Hides the dialog if it is showing, whoever opened it.
    pub fn dismiss(&self) {
        self.app.send_message(DialogMsg::Dismiss);
    }
}

impl Confirmer for DialogHandle {
    fn request_confirmation(&self, title: &str, message: &str, on_confirm: Callback<()>) {
        self.app.send_message(DialogMsg::Open(ConfirmRequest {
            title: title.to_string(),
            message: message.to_string(),
            on_confirm,
        }));
    }
}
