//! Browser entry points.
//!
//! The widget is loaded by a `<script>` tag carrying `serviceurl` and `trackingid` attributes,
//! possibly from inside an HTML import. An optional `loglevel` attribute sets the console
//! threshold. [`start`] locates that tag, wires the `gapi` backed implementations together and
//! runs the dashboard on the event loop.

use std::rc::Rc;

use js_sys::Reflect;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element};

use crate::auth::{AuthSession, GapiAuthorizer};
use crate::charts::GapiChartRenderer;
use crate::config::{DashboardSettings, EmbedConfig};
use crate::dashboard::Dashboard;
use crate::error::{EmbedError, EmbedResult};
use crate::logger::{self, LogLevel, Logger};
use crate::management::GapiManagementClient;
use crate::platform::browser::gapi;
use crate::platform::runtime;
use crate::presenter::{ContainerLookup, Presenter, WebDocument};
use crate::token::ServiceTokenSource;

static LOGGER: Logger = Logger::new("@ga-embed/web");

/// Starts the dashboard for the script tag currently being evaluated.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    let script = current_script()
        .ok_or_else(|| JsValue::from_str("unable to locate the invoking <script> element"))?;
    start_with_script(script)
}

/// Starts the dashboard configured by the attributes of `script`.
#[wasm_bindgen(js_name = startWithScript)]
pub fn start_with_script(script: Element) -> Result<(), JsValue> {
    if let Some(level) = script
        .get_attribute("loglevel")
        .as_deref()
        .and_then(LogLevel::from_name)
    {
        logger::set_log_level(level);
    }
    let dashboard = dashboard_for_script(&script).map_err(|err| JsValue::from_str(&err.to_string()))?;
    runtime::spawn_detached(async move {
        if let Err(err) = dashboard.run().await {
            LOGGER.debug(format!("dashboard stopped: {}", err.code()));
        }
    });
    Ok(())
}

/// Builds a dashboard from the script's attributes and the documents it can see.
pub fn dashboard_for_script(script: &Element) -> EmbedResult<Dashboard> {
    let current = WebDocument::current().ok_or_else(|| EmbedError::Internal("document not available".into()))?;
    let owner = owner_document(script).unwrap_or_else(|| current.document().clone());

    let config = EmbedConfig::from_script_attributes(
        script.get_attribute("serviceurl"),
        script.get_attribute("trackingid"),
        owner.base_uri().ok().flatten().as_deref(),
    );
    let settings = DashboardSettings {
        show_property_name: script.has_attribute("showpropertyname"),
    };

    let lookup = ContainerLookup::new(config.uid.clone(), Rc::new(current))
        .with_fallback(Rc::new(WebDocument::new(owner)));

    let dashboard = Dashboard::new(
        config,
        Presenter::new(lookup),
        Rc::new(ServiceTokenSource::new()?),
        Rc::new(GapiAuthorizer::new(AuthSession::new())),
        Rc::new(GapiManagementClient::new()),
        Rc::new(GapiChartRenderer::new()),
    );
    Ok(dashboard.with_settings(settings))
}

/// `HTMLImports.currentScript`, then `document.currentScript.__importElement`, then
/// `document.currentScript`.
pub fn current_script() -> Option<Element> {
    if let Some(script) = gapi::lookup(&["HTMLImports", "currentScript"]) {
        if let Ok(element) = script.dyn_into::<Element>() {
            return Some(element);
        }
    }

    let document = web_sys::window()?.document()?;
    let script: Element = document.current_script()?.into();
    let imported = Reflect::get(&script, &JsValue::from_str("__importElement")).ok();
    match imported.and_then(|value| value.dyn_into::<Element>().ok()) {
        Some(element) => Some(element),
        None => Some(script),
    }
}

fn owner_document(script: &Element) -> Option<Document> {
    script.owner_document()
}
