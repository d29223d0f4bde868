use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::presenter::ContainerHost;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct MemoryElement {
    hidden: bool,
    text: String,
}

/// In-memory document keyed by element id. Used by native hosts and tests.
#[derive(Debug, Default)]
pub struct MemoryDocument {
    elements: RefCell<BTreeMap<String, MemoryElement>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(self, element_id: &str) -> Self {
        self.insert(element_id);
        self
    }

    /// Adds a visible, empty element. Existing elements are left untouched.
    pub fn insert(&self, element_id: &str) {
        self.elements
            .borrow_mut()
            .entry(element_id.to_string())
            .or_default();
    }

    pub fn is_hidden(&self, element_id: &str) -> Option<bool> {
        self.elements
            .borrow()
            .get(element_id)
            .map(|element| element.hidden)
    }

    pub fn text(&self, element_id: &str) -> Option<String> {
        self.elements
            .borrow()
            .get(element_id)
            .map(|element| element.text.clone())
    }
}

impl ContainerHost for MemoryDocument {
    fn contains(&self, element_id: &str) -> bool {
        self.elements.borrow().contains_key(element_id)
    }

    fn set_hidden(&self, element_id: &str, hidden: bool) -> bool {
        match self.elements.borrow_mut().get_mut(element_id) {
            Some(element) => {
                element.hidden = hidden;
                true
            }
            None => false,
        }
    }

    fn set_text(&self, element_id: &str, text: &str) -> bool {
        match self.elements.borrow_mut().get_mut(element_id) {
            Some(element) => {
                element.text = text.to_string();
                true
            }
            None => false,
        }
    }
}
