//! Container lookup and the authenticated / not-authenticated visibility toggle.
//!
//! Container ids on the host page are namespaced with the page-instance `uid`
//! (`<base>_<uid>`). Lookup tries the current document first and then the document that owns
//! the invoking script, which differ when the widget is loaded through HTML imports.

mod memory;
#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
mod web;

pub use memory::MemoryDocument;
#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
pub use web::WebDocument;

use std::fmt;
use std::rc::Rc;

use crate::error::EmbedError;
use crate::logger::Logger;

pub const AUTHENTICATED_CONTAINER: &str = "ga-authenticated";
pub const NOT_AUTHENTICATED_CONTAINER: &str = "ga-not-authenticated";
pub const PROPERTY_NAME_CONTAINER: &str = "ga-property-name";

static LOGGER: Logger = Logger::new("@ga-embed/presenter");

/// A document able to look up and mutate elements by id.
pub trait ContainerHost {
    fn contains(&self, element_id: &str) -> bool;

    /// Returns `false` when no element has `element_id`.
    fn set_hidden(&self, element_id: &str, hidden: bool) -> bool;

    /// Replaces the element's content with plain text. Returns `false` when no element has
    /// `element_id`.
    fn set_text(&self, element_id: &str, text: &str) -> bool;

    #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
    fn element(&self, _element_id: &str) -> Option<web_sys::Element> {
        None
    }
}

/// An element found by [`ContainerLookup::resolve`], together with the document holding it.
#[derive(Clone)]
pub struct Container {
    element_id: String,
    host: Rc<dyn ContainerHost>,
}

impl Container {
    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    pub fn set_hidden(&self, hidden: bool) -> bool {
        self.host.set_hidden(&self.element_id, hidden)
    }

    pub fn set_text(&self, text: &str) -> bool {
        self.host.set_text(&self.element_id, text)
    }

    #[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
    pub fn element(&self) -> Option<web_sys::Element> {
        self.host.element(&self.element_id)
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("element_id", &self.element_id)
            .finish()
    }
}

/// Resolves `<base>_<uid>` ids across the current document and its fallbacks, in order.
#[derive(Clone)]
pub struct ContainerLookup {
    uid: Option<String>,
    hosts: Vec<Rc<dyn ContainerHost>>,
}

impl ContainerLookup {
    pub fn new(uid: Option<String>, current: Rc<dyn ContainerHost>) -> Self {
        Self {
            uid,
            hosts: vec![current],
        }
    }

    /// Adds a document searched after the ones already registered.
    pub fn with_fallback(mut self, host: Rc<dyn ContainerHost>) -> Self {
        self.hosts.push(host);
        self
    }

    /// Full element id for `base_id`. Without a uid the base id is used unchanged.
    pub fn element_id(&self, base_id: &str) -> String {
        match &self.uid {
            Some(uid) => format!("{base_id}_{uid}"),
            None => base_id.to_string(),
        }
    }

    pub fn resolve(&self, base_id: &str) -> Option<Container> {
        let element_id = self.element_id(base_id);
        self.hosts
            .iter()
            .find(|host| host.contains(&element_id))
            .map(|host| Container {
                element_id,
                host: Rc::clone(host),
            })
    }
}

impl fmt::Debug for ContainerLookup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerLookup")
            .field("uid", &self.uid)
            .field("hosts", &self.hosts.len())
            .finish()
    }
}

/// Shows either the authenticated panel or the error panel, never both.
#[derive(Clone, Debug)]
pub struct Presenter {
    lookup: ContainerLookup,
}

impl Presenter {
    pub fn new(lookup: ContainerLookup) -> Self {
        Self { lookup }
    }

    pub fn lookup(&self) -> &ContainerLookup {
        &self.lookup
    }

    /// Sets the visibility of the container for `base_id` and returns it when it exists.
    pub fn set_visible(&self, base_id: &str, visible: bool) -> Option<Container> {
        match self.lookup.resolve(base_id) {
            Some(container) => {
                container.set_hidden(!visible);
                Some(container)
            }
            None => {
                LOGGER.debug(format!(
                    "container `{}` not found",
                    self.lookup.element_id(base_id)
                ));
                None
            }
        }
    }

    pub fn show_authenticated(&self) {
        self.set_visible(AUTHENTICATED_CONTAINER, true);
        self.set_visible(NOT_AUTHENTICATED_CONTAINER, false);
    }

    pub fn show_error(&self, error: &EmbedError) {
        if let Some(container) = self.set_visible(NOT_AUTHENTICATED_CONTAINER, true) {
            container.set_text(&error.user_message());
        }
        self.set_visible(AUTHENTICATED_CONTAINER, false);
    }

    pub fn show_property_name(&self, name: &str) {
        if let Some(container) = self.lookup.resolve(PROPERTY_NAME_CONTAINER) {
            container.set_text(name);
        }
    }
}
