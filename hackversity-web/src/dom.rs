//! Small DOM helpers shared by the browser adapters.

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

pub fn element_by_id(document: &Document, id: &str) -> Option<Element> {
    document.get_element_by_id(id)
}

/// Elements matching `selector`, in document order. Invalid selectors yield
/// nothing.
pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        log::warn!("invalid selector {selector}");
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn scroll_to_bottom(element: &Element) {
    element.set_scroll_top(element.scroll_height());
}

pub fn set_disabled(element: &Element, disabled: bool) {
    let result = if disabled {
        element.set_attribute("disabled", "")
    } else {
        element.remove_attribute("disabled")
    };
    if let Err(err) = result {
        log::debug!("could not toggle disabled: {err:?}");
    }
}

pub fn set_height(element: &Element, height: &str) {
    if let Some(html) = element.dyn_ref::<HtmlElement>()
        && let Err(err) = html.style().set_property("height", height)
    {
        log::debug!("could not set height: {err:?}");
    }
}
