use js_sys::Reflect;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsValue;

use crate::charts::{ChartDescriptor, ChartRenderer};
use crate::error::{EmbedError, EmbedResult};
use crate::logger::Logger;
use crate::platform::browser::gapi;
use crate::presenter::Container;

static LOGGER: Logger = Logger::new("@ga-embed/data-chart");

/// Renders through `gapi.analytics.googleCharts.DataChart`. Each chart fetches its own data;
/// failures reported by the chart's `error` event are logged.
#[derive(Clone, Copy, Debug, Default)]
pub struct GapiChartRenderer;

impl GapiChartRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl ChartRenderer for GapiChartRenderer {
    fn execute(&self, descriptor: &ChartDescriptor, container: &Container) -> EmbedResult<()> {
        let element = container
            .element()
            .ok_or_else(|| EmbedError::Internal(format!(
                "container `{}` is not a DOM element",
                container.element_id()
            )))?;
        let constructor = gapi::lookup(&["gapi", "analytics", "googleCharts", "DataChart"])
            .ok_or_else(|| EmbedError::LibraryUnavailable {
                message: "gapi.analytics.googleCharts.DataChart is not available".into(),
            })?;

        let config = gapi::to_js(descriptor)?;
        let chart = Reflect::get(&config, &JsValue::from_str("chart"))
            .map_err(|err| EmbedError::Internal(gapi::js_error_message(err)))?;
        gapi::set(&chart, "container", &element)?;

        let data_chart = gapi::construct(&constructor, &[&config])?;

        let element_id = container.element_id().to_string();
        let on_error = Closure::wrap(Box::new(move |event: JsValue| {
            LOGGER.error(format!(
                "chart `{element_id}` failed: {}",
                describe_chart_error(event)
            ));
        }) as Box<dyn FnMut(JsValue)>);
        gapi::call_method(
            &data_chart,
            "on",
            &[&JsValue::from_str("error"), on_error.as_ref()],
        )?;
        on_error.forget();

        gapi::call_method(&data_chart, "execute", &[])?;
        Ok(())
    }
}

fn describe_chart_error(event: JsValue) -> String {
    Reflect::get(&event, &JsValue::from_str("error"))
        .ok()
        .and_then(|error| Reflect::get(&error, &JsValue::from_str("message")).ok())
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| gapi::js_error_message(event))
}
