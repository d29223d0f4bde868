use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Mutex;

use async_trait::async_trait;
use url::Url;

use crate::auth::Authorizer;
use crate::charts::{ChartDescriptor, ChartRenderer, CHART_CONTAINERS};
use crate::error::{EmbedError, EmbedResult};
use crate::management::{Account, ItemList, ManagementApi, Profile, WebProperty};
use crate::presenter::{
    Container, MemoryDocument, AUTHENTICATED_CONTAINER, NOT_AUTHENTICATED_CONTAINER,
};
use crate::token::{AccessToken, TokenResponse, TokenSource};

/// A page carrying both panels and all chart containers for `uid`.
pub fn dashboard_document(uid: &str) -> Rc<MemoryDocument> {
    let document = MemoryDocument::new();
    for base in [AUTHENTICATED_CONTAINER, NOT_AUTHENTICATED_CONTAINER]
        .into_iter()
        .chain(CHART_CONTAINERS)
    {
        document.insert(&format!("{base}_{uid}"));
    }
    Rc::new(document)
}

/// Answers every token request with a fixed service body.
pub struct StaticTokenSource {
    body: String,
    failure: Option<EmbedError>,
    requested: Mutex<Vec<String>>,
}

impl StaticTokenSource {
    pub fn with_body(body: &str) -> Self {
        Self {
            body: body.to_string(),
            failure: None,
            requested: Mutex::new(Vec::new()),
        }
    }

    /// Fails every request with `error` before any body is read.
    pub fn failing(error: EmbedError) -> Self {
        Self {
            failure: Some(error),
            ..Self::with_body("")
        }
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl TokenSource for StaticTokenSource {
    async fn fetch(&self, service_url: &Url) -> EmbedResult<TokenResponse> {
        self.requested
            .lock()
            .unwrap()
            .push(service_url.to_string());
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        TokenResponse::from_body(&self.body)
    }
}

#[derive(Default)]
pub struct RecordingAuthorizer {
    tokens: Mutex<Vec<AccessToken>>,
}

impl RecordingAuthorizer {
    pub fn tokens(&self) -> Vec<AccessToken> {
        self.tokens.lock().unwrap().clone()
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Authorizer for RecordingAuthorizer {
    fn authorize(&self, token: &AccessToken) -> EmbedResult<()> {
        self.tokens.lock().unwrap().push(token.clone());
        Ok(())
    }
}

/// Management API returning fixed ids in the given order.
pub struct StaticManagement {
    accounts: Vec<String>,
    profiles: Vec<String>,
    accounts_error: Option<EmbedError>,
    profile_items_missing: bool,
    profile_error: Option<EmbedError>,
    property_name: Option<String>,
    profile_requests: Mutex<Vec<(String, String)>>,
}

impl StaticManagement {
    pub fn new(accounts: &[&str], profiles: &[&str]) -> Self {
        Self {
            accounts: accounts.iter().map(|id| id.to_string()).collect(),
            profiles: profiles.iter().map(|id| id.to_string()).collect(),
            accounts_error: None,
            profile_items_missing: false,
            profile_error: None,
            property_name: None,
            profile_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_accounts_error(mut self, error: EmbedError) -> Self {
        self.accounts_error = Some(error);
        self
    }

    pub fn without_profile_items(mut self) -> Self {
        self.profile_items_missing = true;
        self
    }

    pub fn with_profile_error(mut self, error: EmbedError) -> Self {
        self.profile_error = Some(error);
        self
    }

    pub fn with_property_name(mut self, name: &str) -> Self {
        self.property_name = Some(name.to_string());
        self
    }

    pub fn profile_requests(&self) -> Vec<(String, String)> {
        self.profile_requests.lock().unwrap().clone()
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ManagementApi for StaticManagement {
    async fn list_accounts(&self) -> EmbedResult<ItemList<Account>> {
        if let Some(error) = &self.accounts_error {
            return Err(error.clone());
        }
        Ok(ItemList::new(
            self.accounts
                .iter()
                .map(|id| Account {
                    id: id.clone(),
                    name: None,
                })
                .collect(),
        ))
    }

    async fn list_profiles(
        &self,
        account_id: &str,
        web_property_id: &str,
    ) -> EmbedResult<ItemList<Profile>> {
        self.profile_requests
            .lock()
            .unwrap()
            .push((account_id.to_string(), web_property_id.to_string()));
        if let Some(error) = &self.profile_error {
            return Err(error.clone());
        }
        if self.profile_items_missing {
            return Ok(ItemList::empty());
        }
        Ok(ItemList::new(
            self.profiles
                .iter()
                .map(|id| Profile {
                    id: id.clone(),
                    name: None,
                    web_property_id: Some(web_property_id.to_string()),
                })
                .collect(),
        ))
    }

    async fn get_web_property(
        &self,
        account_id: &str,
        web_property_id: &str,
    ) -> EmbedResult<WebProperty> {
        match &self.property_name {
            Some(name) => Ok(WebProperty {
                id: web_property_id.to_string(),
                name: Some(name.clone()),
                website_url: None,
                account_id: Some(account_id.to_string()),
            }),
            None => Err(EmbedError::RequestFailed {
                message: Some("Not Found".into()),
            }),
        }
    }
}

/// Records every chart handed to it; optionally fails for one container.
#[derive(Default)]
pub struct RecordingRenderer {
    executed: RefCell<Vec<(String, ChartDescriptor)>>,
    fail_on: Option<(&'static str, EmbedError)>,
}

impl RecordingRenderer {
    pub fn failing_on(base_id: &'static str, error: EmbedError) -> Self {
        Self {
            executed: RefCell::new(Vec::new()),
            fail_on: Some((base_id, error)),
        }
    }

    pub fn element_ids(&self) -> Vec<String> {
        self.executed
            .borrow()
            .iter()
            .map(|(element_id, _)| element_id.clone())
            .collect()
    }

    pub fn query_ids(&self) -> Vec<String> {
        self.executed
            .borrow()
            .iter()
            .map(|(_, descriptor)| descriptor.query.ids.clone())
            .collect()
    }
}

impl ChartRenderer for RecordingRenderer {
    fn execute(&self, descriptor: &ChartDescriptor, container: &Container) -> EmbedResult<()> {
        self.executed
            .borrow_mut()
            .push((container.element_id().to_string(), descriptor.clone()));
        match &self.fail_on {
            Some((base_id, error)) if *base_id == descriptor.chart.container => Err(error.clone()),
            _ => Ok(()),
        }
    }
}
