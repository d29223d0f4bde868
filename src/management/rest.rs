use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::auth::AuthSession;
use crate::error::{internal_error, invalid_response, request_failed, EmbedError, EmbedResult};
use crate::management::{Account, ItemList, ManagementApi, Profile, WebProperty};

const MANAGEMENT_API_URL: &str = "https://www.googleapis.com/analytics/v3/management";

const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Management API v3 client authorized with the token recorded in an [`AuthSession`].
#[derive(Clone, Debug)]
pub struct RestManagementClient {
    http: Client,
    base_url: Url,
    session: AuthSession,
}

impl RestManagementClient {
    pub fn new(session: AuthSession) -> EmbedResult<Self> {
        let base_url =
            std::env::var("GA_MANAGEMENT_API_URL").unwrap_or_else(|_| MANAGEMENT_API_URL.to_string());
        Self::with_base_url(&base_url, session)
    }

    pub fn with_base_url(base_url: &str, session: AuthSession) -> EmbedResult<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|err| {
            internal_error(format!("Invalid management endpoint '{base_url}': {err}"))
        })?;

        let http = Client::builder()
            .build()
            .map_err(|err| internal_error(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> EmbedResult<Url> {
        let mut path = self.base_url.as_str().trim_end_matches('/').to_string();
        for segment in segments {
            path.push('/');
            path.extend(utf8_percent_encode(segment, PATH_SEGMENT));
        }
        Url::parse(&path).map_err(|err| internal_error(format!("Invalid management URL: {err}")))
    }

    async fn get_json<T>(&self, url: Url) -> EmbedResult<T>
    where
        T: DeserializeOwned,
    {
        let token = self
            .session
            .token()
            .ok_or_else(|| request_failed("No access token available; authorize before querying"))?;

        log::debug!("GET {url}");
        let response = self
            .http
            .get(url)
            .bearer_auth(token.as_str())
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|err| request_failed(format!("Network error: {err}")))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|err| invalid_response(format!("unexpected management response: {err}")));
        }

        let body = response.text().await.unwrap_or_default();
        Err(error_from_body(status.as_u16(), &body))
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl ManagementApi for RestManagementClient {
    async fn list_accounts(&self) -> EmbedResult<ItemList<Account>> {
        let url = self.endpoint(&["accounts"])?;
        self.get_json(url).await
    }

    async fn list_profiles(
        &self,
        account_id: &str,
        web_property_id: &str,
    ) -> EmbedResult<ItemList<Profile>> {
        let url = self.endpoint(&[
            "accounts",
            account_id,
            "webproperties",
            web_property_id,
            "profiles",
        ])?;
        self.get_json(url).await
    }

    async fn get_web_property(
        &self,
        account_id: &str,
        web_property_id: &str,
    ) -> EmbedResult<WebProperty> {
        let url = self.endpoint(&["accounts", account_id, "webproperties", web_property_id])?;
        self.get_json(url).await
    }
}

#[derive(Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub(crate) error: Option<ErrorBody>,
}

#[derive(Deserialize)]
pub(crate) struct ErrorBody {
    pub(crate) message: Option<String>,
}

/// Extracts `error.message` from a Google API error body.
pub(crate) fn error_from_body(status: u16, body: &str) -> EmbedError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|error| error.message);
    match message {
        Some(message) => EmbedError::RequestFailed {
            message: Some(message),
        },
        None => request_failed(format!("Management API request failed with status {status}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_is_taken_from_google_error_body() {
        let err = error_from_body(
            403,
            r#"{"error":{"code":403,"message":"User does not have any Google Analytics account."}}"#,
        );
        assert_eq!(
            err.user_message(),
            "Error: User does not have any Google Analytics account."
        );

        let err = error_from_body(502, "<html>Bad Gateway</html>");
        assert_eq!(
            err.user_message(),
            "Error: Management API request failed with status 502"
        );
    }

    #[test]
    fn path_segments_are_encoded() {
        let client =
            RestManagementClient::with_base_url("https://example.com/v3/management/", AuthSession::new())
                .unwrap();
        let url = client
            .endpoint(&["accounts", "12 3", "webproperties", "UA-1/1"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/v3/management/accounts/12%203/webproperties/UA-1%2F1"
        );
    }

    #[cfg(not(target_arch = "wasm32"))]
    mod native {
        use super::*;
        use crate::token::AccessToken;
        use httpmock::prelude::*;
        use serde_json::json;
        use std::panic::{self, AssertUnwindSafe};

        fn try_start_server() -> Option<MockServer> {
            panic::catch_unwind(AssertUnwindSafe(|| MockServer::start())).ok()
        }

        fn authorized_session() -> AuthSession {
            let session = AuthSession::new();
            session.set_token(AccessToken::new("T"));
            session
        }

        #[tokio::test(flavor = "current_thread")]
        async fn list_accounts_sends_bearer_token() {
            let Some(server) = try_start_server() else {
                eprintln!("Skipping list_accounts_sends_bearer_token: unable to start mock server");
                return;
            };
            let mock = server.mock(|when, then| {
                when.method(GET)
                    .path("/management/accounts")
                    .header("authorization", "Bearer T");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({
                        "kind": "analytics#accounts",
                        "items": [{ "id": "111", "name": "Main" }, { "id": "222" }]
                    }));
            });

            let client =
                RestManagementClient::with_base_url(&server.url("/management"), authorized_session())
                    .unwrap();
            let accounts = client.list_accounts().await.unwrap();

            mock.assert();
            let first = accounts.into_first().unwrap();
            assert_eq!(first.id, "111");
            assert_eq!(first.name.as_deref(), Some("Main"));
        }

        #[tokio::test(flavor = "current_thread")]
        async fn list_profiles_targets_account_and_property() {
            let Some(server) = try_start_server() else {
                eprintln!("Skipping list_profiles_targets_account_and_property: unable to start mock server");
                return;
            };
            let mock = server.mock(|when, then| {
                when.method(GET)
                    .path("/management/accounts/111/webproperties/UA-1-1/profiles");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({ "items": [{ "id": "9001", "webPropertyId": "UA-1-1" }] }));
            });

            let client =
                RestManagementClient::with_base_url(&server.url("/management"), authorized_session())
                    .unwrap();
            let profiles = client.list_profiles("111", "UA-1-1").await.unwrap();

            assert_eq!(mock.hits(), 1);
            assert_eq!(profiles.into_first().unwrap().id, "9001");
        }

        #[tokio::test(flavor = "current_thread")]
        async fn api_error_surfaces_google_message() {
            let Some(server) = try_start_server() else {
                eprintln!("Skipping api_error_surfaces_google_message: unable to start mock server");
                return;
            };
            server.mock(|when, then| {
                when.method(GET)
                    .path("/management/accounts/111/webproperties/UA-1-1");
                then.status(403)
                    .header("content-type", "application/json")
                    .json_body(json!({ "error": { "code": 403, "message": "Insufficient permissions" } }));
            });

            let client =
                RestManagementClient::with_base_url(&server.url("/management"), authorized_session())
                    .unwrap();
            let err = client.get_web_property("111", "UA-1-1").await.unwrap_err();

            assert_eq!(
                err,
                EmbedError::RequestFailed {
                    message: Some("Insufficient permissions".into())
                }
            );
        }

        #[tokio::test(flavor = "current_thread")]
        async fn unauthorized_session_fails_without_request() {
            let client =
                RestManagementClient::with_base_url("http://127.0.0.1:9/management", AuthSession::new())
                    .unwrap();
            let err = client.list_accounts().await.unwrap_err();
            assert!(matches!(err, EmbedError::RequestFailed { .. }));
        }
    }
}
