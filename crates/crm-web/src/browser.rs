//! Browser implementations of the core's host seams

use crm_core::{ConsoleConfig, CoreError, HistoryDriver, SessionStorage};
use leptos::logging::warn;
use wasm_bindgen::JsValue;

/// localStorage key holding the serialized session
pub const SESSION_KEY: &str = "crm-console.session";

/// `window.history` / `window.location`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserHistory;

impl HistoryDriver for BrowserHistory {
    fn current_path(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().pathname().ok())
            .unwrap_or_else(|| "/".to_string())
    }

    fn push(&self, path: &str) {
        let result = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))
            .and_then(|w| w.history())
            .and_then(|h| h.push_state_with_url(&JsValue::NULL, "", Some(path)));
        if let Err(e) = result {
            warn!("history.pushState({path}) failed: {e:?}");
        }
    }

    fn replace(&self, path: &str) {
        let result = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))
            .and_then(|w| w.history())
            .and_then(|h| h.replace_state_with_url(&JsValue::NULL, "", Some(path)));
        if let Err(e) = result {
            warn!("history.replaceState({path}) failed: {e:?}");
        }
    }
}

/// `window.localStorage`, scoped to one key
#[derive(Debug, Clone)]
pub struct LocalStorage {
    key: String,
}

impl LocalStorage {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self::new(SESSION_KEY)
    }
}

impl SessionStorage for LocalStorage {
    fn load(&self) -> Option<String> {
        Self::storage().and_then(|s| s.get_item(&self.key).ok().flatten())
    }

    fn store(&self, raw: &str) -> Result<(), CoreError> {
        let storage =
            Self::storage().ok_or_else(|| CoreError::storage("localStorage is unavailable"))?;
        storage
            .set_item(&self.key, raw)
            .map_err(|e| CoreError::storage(format!("localStorage write failed: {e:?}")))
    }

    fn remove(&self) {
        if let Some(storage) = Self::storage() {
            if let Err(e) = storage.remove_item(&self.key) {
                warn!("localStorage remove failed: {e:?}");
            }
        }
    }
}

/// Page origin, e.g. `https://crm.example.com`
pub fn origin() -> Option<String> {
    web_sys::window().and_then(|w| w.location().origin().ok())
}

/// Configuration baked in at build time, falling back to same-origin
pub fn web_config() -> ConsoleConfig {
    let defaults = ConsoleConfig::default();
    let config = ConsoleConfig {
        api_base_url: option_env!("CRM_API_URL")
            .map(str::to_string)
            .or_else(origin)
            .unwrap_or(defaults.api_base_url.clone()),
        base_prefix: option_env!("CRM_BASE_PREFIX").unwrap_or_default().to_string(),
        ..defaults
    };

    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            warn!("Ignoring build-time base prefix: {e}");
            ConsoleConfig {
                base_prefix: String::new(),
                ..config
            }
        }
    }
}
