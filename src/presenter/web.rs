use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::presenter::ContainerHost;

/// [`ContainerHost`] backed by a live DOM document.
#[derive(Clone, Debug)]
pub struct WebDocument {
    document: Document,
}

impl WebDocument {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// The document of the current window, if any.
    pub fn current() -> Option<Self> {
        web_sys::window()
            .and_then(|window| window.document())
            .map(Self::new)
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl ContainerHost for WebDocument {
    fn contains(&self, element_id: &str) -> bool {
        self.document.get_element_by_id(element_id).is_some()
    }

    fn set_hidden(&self, element_id: &str, hidden: bool) -> bool {
        match self
            .document
            .get_element_by_id(element_id)
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        {
            Some(element) => {
                element.set_hidden(hidden);
                true
            }
            None => false,
        }
    }

    fn set_text(&self, element_id: &str, text: &str) -> bool {
        match self.document.get_element_by_id(element_id) {
            Some(element) => {
                element.set_text_content(Some(text));
                true
            }
            None => false,
        }
    }

    fn element(&self, element_id: &str) -> Option<Element> {
        self.document.get_element_by_id(element_id)
    }
}
