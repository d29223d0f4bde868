//! Hands the fetched access token to the analytics library.
//!
//! Authorization is fire-and-forget: the library is trusted to reject unauthorized calls later,
//! so nothing here verifies the token.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::EmbedResult;
use crate::token::AccessToken;

#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
pub use web::GapiAuthorizer;

/// Token shared between the authorizer and the clients that issue authorized requests.
#[derive(Clone, Debug, Default)]
pub struct AuthSession {
    token: Arc<RwLock<Option<AccessToken>>>,
}

impl AuthSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_token(&self, token: AccessToken) {
        *self.token.write().unwrap() = Some(token);
    }

    pub fn token(&self) -> Option<AccessToken> {
        self.token.read().unwrap().clone()
    }

    pub fn is_authorized(&self) -> bool {
        self.token.read().unwrap().is_some()
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait Authorizer: Send + Sync {
    /// Resolves once the analytics library can accept an authorization.
    async fn ready(&self) -> EmbedResult<()> {
        Ok(())
    }

    fn authorize(&self, token: &AccessToken) -> EmbedResult<()>;
}

/// Authorizer that only records the token for [`crate::management::RestManagementClient`].
#[derive(Clone, Debug, Default)]
pub struct SessionAuthorizer {
    session: AuthSession,
}

impl SessionAuthorizer {
    pub fn new(session: AuthSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl Authorizer for SessionAuthorizer {
    fn authorize(&self, token: &AccessToken) -> EmbedResult<()> {
        self.session.set_token(token.clone());
        Ok(())
    }
}

#[cfg(all(feature = "wasm-web", target_arch = "wasm32"))]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use futures::channel::oneshot;
    use js_sys::Object;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::prelude::*;

    use super::*;
    use crate::error::EmbedError;
    use crate::platform::browser::gapi;

    /// Drives `gapi.analytics.auth` from the Embed API script already loaded on the page.
    #[derive(Clone, Debug, Default)]
    pub struct GapiAuthorizer {
        session: AuthSession,
    }

    impl GapiAuthorizer {
        pub fn new(session: AuthSession) -> Self {
            Self { session }
        }
    }

    #[async_trait(?Send)]
    impl Authorizer for GapiAuthorizer {
        async fn ready(&self) -> EmbedResult<()> {
            if gapi::lookup(&["gapi", "analytics", "auth"]).is_some() {
                return Ok(());
            }
            let analytics = gapi::lookup(&["gapi", "analytics"]).ok_or_else(|| {
                EmbedError::LibraryUnavailable {
                    message: "gapi.analytics has not been loaded".into(),
                }
            })?;

            let (sender, receiver) = oneshot::channel::<()>();
            let sender = Rc::new(RefCell::new(Some(sender)));
            let ready = Closure::wrap(Box::new(move || {
                if let Some(tx) = sender.borrow_mut().take() {
                    let _ = tx.send(());
                }
            }) as Box<dyn FnMut()>);

            gapi::call_method(&analytics, "ready", &[ready.as_ref()])?;
            ready.forget();

            receiver.await.map_err(|_| EmbedError::LibraryUnavailable {
                message: "gapi.analytics.ready callback dropped".into(),
            })
        }

        fn authorize(&self, token: &AccessToken) -> EmbedResult<()> {
            let auth = gapi::lookup(&["gapi", "analytics", "auth"]).ok_or_else(|| {
                EmbedError::LibraryUnavailable {
                    message: "gapi.analytics.auth is not available".into(),
                }
            })?;

            let server_auth = Object::new();
            gapi::set(&server_auth, "access_token", &JsValue::from_str(token.as_str()))?;
            let options = Object::new();
            gapi::set(&options, "serverAuth", &server_auth)?;

            gapi::call_method(&auth, "authorize", &[options.as_ref()])?;
            self.session.set_token(token.clone());
            Ok(())
        }
    }
}
