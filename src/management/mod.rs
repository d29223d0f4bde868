//! Account, property and view lookups against the Analytics Management API.
//!
//! The dashboard only ever needs the first account visible to the token and the first view
//! (profile) under the configured tracking id. [`resolve_view`] performs the two dependent
//! queries; the [`ManagementApi`] seam lets the same logic run over REST or through the
//! `gapi.client` library in the browser.

#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
mod gapi_client;
mod rest;
mod types;

#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
pub use gapi_client::GapiManagementClient;
pub use rest::RestManagementClient;
pub use types::{Account, ItemList, Profile, ResolvedView, ViewId, WebProperty};

use async_trait::async_trait;

use crate::error::{EmbedError, EmbedResult};
use crate::logger::Logger;

static LOGGER: Logger = Logger::new("@ga-embed/management");

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait ManagementApi: Send + Sync {
    async fn list_accounts(&self) -> EmbedResult<ItemList<Account>>;

    async fn list_profiles(
        &self,
        account_id: &str,
        web_property_id: &str,
    ) -> EmbedResult<ItemList<Profile>>;

    async fn get_web_property(
        &self,
        account_id: &str,
        web_property_id: &str,
    ) -> EmbedResult<WebProperty>;
}

/// Picks the first account, then the first view under `tracking_id` for that account.
/// `on_account` is called with the account id before the profiles are listed.
pub async fn resolve_view(
    api: &dyn ManagementApi,
    tracking_id: &str,
    on_account: impl FnOnce(&str),
) -> EmbedResult<ResolvedView> {
    let account_id = first_account(api).await?;
    on_account(&account_id);
    let view_id = first_view(api, &account_id, tracking_id).await?;
    Ok(ResolvedView {
        account_id,
        web_property_id: tracking_id.to_string(),
        view_id,
    })
}

/// Returns the id of the first account listed for the authorized user.
async fn first_account(api: &dyn ManagementApi) -> EmbedResult<String> {
    let accounts = api.list_accounts().await.inspect_err(log_request_error)?;
    accounts
        .into_first()
        .map(|account| account.id)
        .ok_or(EmbedError::NoAccountsFound)
}

/// Returns the first view (profile) of `web_property_id` under `account_id`.
async fn first_view(
    api: &dyn ManagementApi,
    account_id: &str,
    web_property_id: &str,
) -> EmbedResult<ViewId> {
    let profiles = api
        .list_profiles(account_id, web_property_id)
        .await
        .inspect_err(log_request_error)?;
    profiles
        .into_first()
        .map(|profile| ViewId::new(profile.id))
        .ok_or(EmbedError::NoViewsFound)
}

/// Looks up the display name of the tracked property. Returns `None` when the lookup fails or
/// the property has no name.
pub async fn property_name(
    api: &dyn ManagementApi,
    account_id: &str,
    web_property_id: &str,
) -> Option<String> {
    match api.get_web_property(account_id, web_property_id).await {
        Ok(property) => property.name,
        Err(err) => {
            LOGGER.warn(format!(
                "failed to look up web property `{web_property_id}`: {err}"
            ));
            None
        }
    }
}

fn log_request_error(err: &EmbedError) {
    LOGGER.error(format!("{} ({})", err, err.code()));
}
