//! Deployment configuration, read from an optional `window.INKPRESS_CONFIG`
//! global so the same bundle can point at different backend hosts.

use leptos::prelude::window;
use serde::Deserialize;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Base URL of the document/auth store, no trailing slash.
    pub api_base: String,
    /// Base URL of the file store, no trailing slash.
    pub storage_base: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: "/api/v1".to_string(),
            storage_base: "/storage/v1".to_string(),
        }
    }
}

impl AppConfig {
    /// Reads the host-provided global, falling back to defaults when it is
    /// absent or malformed.
    pub fn load() -> Self {
        let global = js_sys::Reflect::get(&window(), &"INKPRESS_CONFIG".into());
        match global {
            Ok(value) if !value.is_undefined() && !value.is_null() => {
                serde_wasm_bindgen::from_value(value).unwrap_or_default()
            }
            _ => Self::default(),
        }
    }
}
