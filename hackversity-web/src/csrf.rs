//! CSRF token lookup for mutating requests.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlDocument, HtmlInputElement};

/// Name of the meta tag carrying the token.
pub const META_NAME: &str = "csrf-token";
/// Cookie set by the backend.
pub const COOKIE_NAME: &str = "csrftoken";
/// Hidden form field rendered into server forms.
pub const FORM_FIELD_NAME: &str = "csrfmiddlewaretoken";

/// The three places a token can live, as read from the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsrfSources {
    pub meta: Option<String>,
    pub cookies: Option<String>,
    pub form_field: Option<String>,
}

impl CsrfSources {
    /// First non-empty token wins: meta tag, then cookie, then form field.
    /// Absence degrades to an empty token.
    pub fn resolve(&self) -> String {
        let meta = self.meta.as_deref().filter(|value| !value.is_empty());
        let cookie = self
            .cookies
            .as_deref()
            .and_then(|cookies| cookie_value(cookies, COOKIE_NAME))
            .filter(|value| !value.is_empty());
        let form = self.form_field.as_deref();

        meta.or(cookie).or(form).unwrap_or_default().to_string()
    }

    /// Reads all three sources from the live document.
    pub fn from_document(document: &Document) -> Self {
        let meta = document
            .query_selector(&format!("meta[name=\"{META_NAME}\"]"))
            .ok()
            .flatten()
            .and_then(|element| element.get_attribute("content"));

        let cookies = document
            .dyn_ref::<HtmlDocument>()
            .and_then(|html| html.cookie().ok());

        let form_field = document
            .query_selector(&format!("[name={FORM_FIELD_NAME}]"))
            .ok()
            .flatten()
            .and_then(|element| element.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value());

        Self {
            meta,
            cookies,
            form_field,
        }
    }
}

/// Token for the current page, empty outside a browser document.
pub fn current_token() -> String {
    web_sys::window()
        .and_then(|window| window.document())
        .map(|document| CsrfSources::from_document(&document).resolve())
        .unwrap_or_default()
}

fn cookie_value<'a>(cookie_string: &'a str, name: &str) -> Option<&'a str> {
    cookie_string.split(';').find_map(|pair| {
        let mut parts = pair.trim().splitn(2, '=');
        let key = parts.next()?.trim();
        let value = parts.next()?.trim();
        (key == name).then_some(value)
    })
}
