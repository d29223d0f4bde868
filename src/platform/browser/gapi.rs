//! Thin helpers for reaching into the `gapi` globals installed by the Embed API loader.

use js_sys::{Array, Function, Promise, Reflect};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use crate::error::{internal_error, invalid_response, EmbedError, EmbedResult};

/// Walks a dotted path from the global object, returning `None` on the first missing link.
pub fn lookup(path: &[&str]) -> Option<JsValue> {
    let mut current: JsValue = js_sys::global().into();
    for segment in path {
        current = Reflect::get(&current, &JsValue::from_str(segment)).ok()?;
        if current.is_null() || current.is_undefined() {
            return None;
        }
    }
    Some(current)
}

pub fn set(target: &JsValue, key: &str, value: &JsValue) -> EmbedResult<()> {
    Reflect::set(target, &JsValue::from_str(key), value)
        .map(|_| ())
        .map_err(|err| internal_error(format!("failed to set `{key}`: {}", js_error_message(err))))
}

pub fn call_method(target: &JsValue, name: &str, args: &[&JsValue]) -> EmbedResult<JsValue> {
    let function = Reflect::get(target, &JsValue::from_str(name))
        .map_err(|err| library_error(format!("failed to access {name}(): {}", js_error_message(err))))?
        .dyn_into::<Function>()
        .map_err(|_| library_error(format!("{name}() is not a function")))?;

    function
        .apply(target, &to_array(args))
        .map_err(|err| library_error(format!("{name}() threw: {}", js_error_message(err))))
}

pub fn construct(constructor: &JsValue, args: &[&JsValue]) -> EmbedResult<JsValue> {
    let constructor = constructor
        .dyn_ref::<Function>()
        .ok_or_else(|| library_error("constructor is not a function"))?;
    Reflect::construct(constructor, &to_array(args))
        .map_err(|err| library_error(format!("constructor threw: {}", js_error_message(err))))
}

/// Awaits a gapi thenable. gapi request objects are not real `Promise`s, so they are adopted
/// through `Promise.resolve` first.
pub async fn await_thenable(value: &JsValue) -> Result<JsValue, JsValue> {
    JsFuture::from(Promise::resolve(value)).await
}

pub fn to_js<T: Serialize>(value: &T) -> EmbedResult<JsValue> {
    let json = serde_json::to_string(value)
        .map_err(|err| internal_error(format!("failed to serialize value: {err}")))?;
    js_sys::JSON::parse(&json)
        .map_err(|err| internal_error(format!("failed to build JS value: {}", js_error_message(err))))
}

pub fn from_js<T: DeserializeOwned>(value: &JsValue) -> EmbedResult<T> {
    let json = js_sys::JSON::stringify(value)
        .ok()
        .and_then(|json| json.as_string())
        .ok_or_else(|| invalid_response("response is not JSON serializable"))?;
    serde_json::from_str(&json).map_err(|err| invalid_response(format!("unexpected response: {err}")))
}

pub fn js_error_message(value: JsValue) -> String {
    if let Some(error) = value.dyn_ref::<js_sys::Error>() {
        String::from(error.message())
    } else if let Some(string) = value.as_string() {
        string
    } else {
        format!("{value:?}")
    }
}

fn to_array(args: &[&JsValue]) -> Array {
    args.iter().map(|value| (*value).clone()).collect()
}

fn library_error(message: impl Into<String>) -> EmbedError {
    EmbedError::LibraryUnavailable {
        message: message.into(),
    }
}
