use async_trait::async_trait;
use js_sys::Reflect;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::JsValue;

use crate::error::{EmbedError, EmbedResult};
use crate::management::rest::ErrorEnvelope;
use crate::management::{Account, ItemList, ManagementApi, Profile, WebProperty};
use crate::platform::browser::gapi;

/// Management API access through `gapi.client.analytics.management`, authorized by the Embed
/// API's own auth state.
#[derive(Clone, Copy, Debug, Default)]
pub struct GapiManagementClient;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PropertyParams<'a> {
    account_id: &'a str,
    web_property_id: &'a str,
}

impl GapiManagementClient {
    pub fn new() -> Self {
        Self
    }

    async fn call<T>(&self, resource: &str, method: &str, params: Option<JsValue>) -> EmbedResult<T>
    where
        T: DeserializeOwned,
    {
        let target = gapi::lookup(&["gapi", "client", "analytics", "management", resource])
            .ok_or_else(|| EmbedError::LibraryUnavailable {
                message: format!("gapi.client.analytics.management.{resource} is not available"),
            })?;

        let request = match params {
            Some(params) => gapi::call_method(&target, method, &[&params])?,
            None => gapi::call_method(&target, method, &[])?,
        };

        match gapi::await_thenable(&request).await {
            Ok(response) => {
                let result = Reflect::get(&response, &JsValue::from_str("result"))
                    .unwrap_or(JsValue::UNDEFINED);
                gapi::from_js(&result)
            }
            Err(rejection) => Err(rejection_error(rejection)),
        }
    }
}

fn rejection_error(rejection: JsValue) -> EmbedError {
    let result = Reflect::get(&rejection, &JsValue::from_str("result")).unwrap_or(JsValue::UNDEFINED);
    let message = gapi::from_js::<ErrorEnvelope>(&result)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|error| error.message);
    match message {
        Some(message) => EmbedError::RequestFailed {
            message: Some(message),
        },
        None => EmbedError::RequestFailed {
            message: Some(gapi::js_error_message(rejection)).filter(|message| !message.is_empty()),
        },
    }
}

#[async_trait(?Send)]
impl ManagementApi for GapiManagementClient {
    async fn list_accounts(&self) -> EmbedResult<ItemList<Account>> {
        self.call("accounts", "list", None).await
    }

    async fn list_profiles(
        &self,
        account_id: &str,
        web_property_id: &str,
    ) -> EmbedResult<ItemList<Profile>> {
        let params = gapi::to_js(&PropertyParams {
            account_id,
            web_property_id,
        })?;
        self.call("profiles", "list", Some(params)).await
    }

    async fn get_web_property(
        &self,
        account_id: &str,
        web_property_id: &str,
    ) -> EmbedResult<WebProperty> {
        let params = gapi::to_js(&PropertyParams {
            account_id,
            web_property_id,
        })?;
        self.call("webproperties", "get", Some(params)).await
    }
}
