//! JSON shapes handed to JavaScript
//!
//! `cargo test` writes the TypeScript definitions to `bindings/`.

use std::collections::BTreeMap;

use serde::Serialize;
use ts_rs::TS;
use wasm_bindgen::JsValue;
use wp_core::{Location, PathMatch};

/// A match as seen from JavaScript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, rename = "PathMatch")]
pub struct JsPathMatch {
    pub pattern: Option<String>,
    pub url: String,
    pub is_exact: bool,
    pub params: BTreeMap<String, String>,
}

impl From<&PathMatch> for JsPathMatch {
    fn from(m: &PathMatch) -> Self {
        Self {
            pattern: m.pattern.clone(),
            url: m.url.clone(),
            is_exact: m.is_exact,
            params: m
                .params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

/// A location as seen from JavaScript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export, rename = "Location")]
pub struct JsLocation {
    pub pathname: String,
    pub search: String,
    pub hash: String,
    pub href: String,
}

impl From<&Location> for JsLocation {
    fn from(location: &Location) -> Self {
        Self {
            pathname: location.pathname.clone(),
            search: location.search.clone(),
            hash: location.hash.clone(),
            href: location.to_string(),
        }
    }
}

/// Serialize through JSON into a plain JS object.
pub(crate) fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    let text = serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))?;
    js_sys::JSON::parse(&text)
}
