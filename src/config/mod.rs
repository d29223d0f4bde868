//! Startup configuration for the embedded dashboard.
//!
//! The browser integration reads two attributes from the `<script>` tag that loaded it
//! (`serviceurl` and `trackingid`) and a page-instance `uid` from the host document's base URI.
//! A relative `serviceurl` is resolved against that same base URI.
//! The values are captured once into an [`EmbedConfig`] and handed to the pipeline explicitly.

use std::env;

use url::Url;

use crate::error::{configuration_missing, EmbedResult};

const UID_MARKER: &str = "?uid=";

/// Raw configuration as read from the host page. Any field may be missing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmbedConfig {
    pub service_url: Option<String>,
    pub tracking_id: Option<String>,
    pub uid: Option<String>,
    /// Base URI of the document that owns the script.
    pub base_uri: Option<String>,
}

/// Configuration after the checks performed before the token request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedConfig {
    pub service_url: Url,
    pub tracking_id: String,
    pub uid: Option<String>,
}

/// Optional behaviour toggles for the dashboard pipeline.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DashboardSettings {
    /// Looks up the web property's display name and writes it into the `ga-property-name`
    /// container when one exists.
    pub show_property_name: bool,
}

impl EmbedConfig {
    pub fn new(service_url: impl Into<String>, tracking_id: impl Into<String>) -> Self {
        Self {
            service_url: non_blank(Some(service_url.into())),
            tracking_id: non_blank(Some(tracking_id.into())),
            uid: None,
            base_uri: None,
        }
    }

    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = non_blank(Some(uid.into()));
        self
    }

    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = non_blank(Some(base_uri.into()));
        self
    }

    /// Builds the configuration from the invoking script's attributes and the base URI of the
    /// document that owns it.
    pub fn from_script_attributes(
        service_url: Option<String>,
        tracking_id: Option<String>,
        base_uri: Option<&str>,
    ) -> Self {
        Self {
            service_url: non_blank(service_url),
            tracking_id: non_blank(tracking_id),
            uid: base_uri.and_then(parse_uid),
            base_uri: non_blank(base_uri.map(str::to_string)),
        }
    }

    /// Reads `GA_EMBED_SERVICE_URL`, `GA_EMBED_TRACKING_ID` and `GA_EMBED_BASE_URI`.
    pub fn from_env() -> Self {
        let base_uri = env::var("GA_EMBED_BASE_URI").ok();
        Self::from_script_attributes(
            env::var("GA_EMBED_SERVICE_URL").ok(),
            env::var("GA_EMBED_TRACKING_ID").ok(),
            base_uri.as_deref(),
        )
    }

    /// Checks the values required before a token can be requested. The service URL is checked
    /// first, then the tracking id. A relative service URL is joined onto the base URI.
    pub fn validate(&self) -> EmbedResult<ValidatedConfig> {
        let raw_url = self
            .service_url
            .as_deref()
            .ok_or_else(|| configuration_missing(None))?;
        let base = self
            .base_uri
            .as_deref()
            .and_then(|base| Url::parse(base).ok());
        let service_url = Url::options()
            .base_url(base.as_ref())
            .parse(raw_url)
            .map_err(|err| {
                configuration_missing(Some(&format!("Invalid service URL '{raw_url}': {err}")))
            })?;
        let tracking_id = self
            .tracking_id
            .clone()
            .ok_or_else(|| configuration_missing(Some("Tracking Id not found")))?;

        Ok(ValidatedConfig {
            service_url,
            tracking_id,
            uid: self.uid.clone(),
        })
    }
}

/// Extracts the page-instance id from a base URI of the form `...?uid=<value>`.
///
/// Only the segment between the first marker and the next one (if any) is returned.
pub fn parse_uid(base_uri: &str) -> Option<String> {
    let (_, rest) = base_uri.split_once(UID_MARKER)?;
    let value = rest.split(UID_MARKER).next().unwrap_or_default();
    non_blank(Some(value.to_string()))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
