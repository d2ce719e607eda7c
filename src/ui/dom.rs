//! Small DOM helpers shared by the widgets

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::error::{Error, Result};

pub fn document() -> Result<Document> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or(Error::MissingElement("document"))
}

/// Create `<tag class="...">`
pub fn create<T: JsCast>(doc: &Document, tag: &str, class: &str) -> Result<T> {
    let el = doc.create_element(tag)?;
    if !class.is_empty() {
        el.set_class_name(class);
    }
    el.dyn_into::<T>()
        .map_err(|_| Error::Js(format!("<{}> has an unexpected type", tag)))
}

/// Create an element with text content
pub fn create_text(doc: &Document, tag: &str, class: &str, text: &str) -> Result<HtmlElement> {
    let el: HtmlElement = create(doc, tag, class)?;
    el.set_text_content(Some(text));
    Ok(el)
}

pub fn set_style(el: &HtmlElement, property: &str, value: &str) {
    let _ = el.style().set_property(property, value);
}

pub fn set_px(el: &HtmlElement, property: &str, value: f32) {
    set_style(el, property, &format!("{}px", value));
}

pub fn set_visible(el: &HtmlElement, visible: bool, display: &str) {
    set_style(el, "display", if visible { display } else { "none" });
}

pub fn toggle_class(el: &Element, class: &str, on: bool) {
    let _ = el.class_list().toggle_with_force(class, on);
}

/// Detach `el` if it is still in the document
pub fn detach(el: &Element) {
    if el.is_connected() {
        el.remove();
    }
}
