use std::fmt;

use serde::Deserialize;

/// Collection envelope returned by the `list` methods. `items` is absent when the list is empty.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ItemList<T> {
    pub items: Option<Vec<T>>,
}

impl<T> ItemList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items: Some(items) }
    }

    pub fn empty() -> Self {
        Self { items: None }
    }

    /// Consumes the list and yields its first element in API order.
    pub fn into_first(self) -> Option<T> {
        self.items.and_then(|items| items.into_iter().next())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebProperty {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub web_property_id: Option<String>,
}

/// Identifier of a reporting view (profile).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ViewId(String);

impl ViewId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `ids` value expected by reporting queries.
    pub fn query_id(&self) -> String {
        format!("ga:{}", self.0)
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedView {
    pub account_id: String,
    pub web_property_id: String,
    pub view_id: ViewId,
}
