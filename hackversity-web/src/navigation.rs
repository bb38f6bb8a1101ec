use shared::models::ConversationId;
use wasm_bindgen::JsValue;
use web_sys::Window;

use crate::config::with_conversation_param;

/// Browser navigation used by the chat flows.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator {
    /// Full page load of `url`.
    fn assign(&self, url: &str);

    /// Reloads the current page.
    fn reload(&self);

    /// Puts `id` into the address bar without reloading.
    fn push_conversation(&self, id: &ConversationId);
}

/// [`Navigator`] over `window.location` and `window.history`.
#[derive(Debug, Clone)]
pub struct BrowserNavigator {
    window: Window,
}

impl BrowserNavigator {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Navigator for BrowserNavigator {
    fn assign(&self, url: &str) {
        log::info!("navigating to {url}");
        if let Err(err) = self.window.location().assign(url) {
            log::error!("navigation to {url} failed: {err:?}");
        }
    }

    fn reload(&self) {
        if let Err(err) = self.window.location().reload() {
            log::error!("reload failed: {err:?}");
        }
    }

    fn push_conversation(&self, id: &ConversationId) {
        let Ok(href) = self.window.location().href() else {
            return;
        };
        let Some(next) = with_conversation_param(&href, id) else {
            log::warn!("cannot rewrite address {href}");
            return;
        };
        let pushed = self
            .window
            .history()
            .and_then(|history| history.push_state_with_url(&JsValue::NULL, "", Some(&next)));
        if let Err(err) = pushed {
            log::error!("history update failed: {err:?}");
        }
    }
}
