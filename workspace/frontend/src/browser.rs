//! Browser-backed implementations of the client engine's seams, plus the few
//! page-level helpers (location, navigation, clipboard) the components need.

use async_trait::async_trait;
use client::api_base::PageLocation;
use client::{ClientError, KeyValueStore, Result, Timer};
use common::FamilyRef;
use gloo_timers::future::TimeoutFuture;
use std::time::Duration;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{window, Storage, Url, UrlSearchParams};

use crate::settings;

fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

/// Which browser storage area to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageScope {
    /// `sessionStorage`: lives as long as the tab
    Session,
    /// `localStorage`: survives across tabs and restarts
    Local,
}

/// [`KeyValueStore`] over `sessionStorage` or `localStorage`.
///
/// The storage object is looked up on every call; when it is unavailable
/// (privacy mode, no window) reads see nothing and writes fail.
#[derive(Debug, Clone, Copy)]
pub struct BrowserStorage {
    scope: StorageScope,
}

impl BrowserStorage {
    pub fn session() -> Self {
        Self { scope: StorageScope::Session }
    }

    pub fn local() -> Self {
        Self { scope: StorageScope::Local }
    }

    fn storage(&self) -> Result<Storage> {
        let window = window().ok_or_else(|| ClientError::Storage("no window".to_string()))?;
        let storage = match self.scope {
            StorageScope::Session => window.session_storage(),
            StorageScope::Local => window.local_storage(),
        };
        storage
            .map_err(|e| ClientError::Storage(js_error(e)))?
            .ok_or_else(|| ClientError::Storage(format!("{:?} storage unavailable", self.scope)))
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|e| ClientError::Storage(js_error(e)))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| ClientError::Storage(js_error(e)))
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.storage()?
            .remove_item(key)
            .map_err(|e| ClientError::Storage(js_error(e)))
    }
}

/// [`Timer`] on `setTimeout`; dropping the sleep clears the timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTimer;

#[async_trait(?Send)]
impl Timer for GlooTimer {
    async fn sleep(&self, duration: Duration) {
        let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
        TimeoutFuture::new(millis).await;
    }
}

/// Protocol and origin of the current page.
pub fn page_location() -> PageLocation {
    let Some(location) = window().map(|w| w.location()) else {
        return PageLocation::new("http:", "");
    };
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let origin = location.origin().unwrap_or_default();
    PageLocation::new(protocol, origin)
}

/// Family fields of the current URL's query string, possibly incomplete.
pub fn query_family() -> FamilyRef {
    let search = window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default();
    let Ok(params) = UrlSearchParams::new_with_str(&search) else {
        return FamilyRef::default();
    };
    client::family_code::family_from_query(
        [FamilyRef::ID_PARAM, FamilyRef::NAME_PARAM, FamilyRef::CODE_PARAM]
            .into_iter()
            .filter_map(|key| params.get(key).map(|value| (key, value))),
    )
}

/// The current page URL with the family written into its query string.
pub fn share_link(family: &FamilyRef) -> std::result::Result<String, String> {
    let href = window()
        .ok_or_else(|| "no window".to_string())?
        .location()
        .href()
        .map_err(js_error)?;
    let url = Url::new(&href).map_err(js_error)?;
    let params = url.search_params();
    for (key, value) in family.query_pairs() {
        params.set(key, value);
    }
    Ok(url.href())
}

/// Navigates the tab to `url`.
pub fn navigate(url: &str) {
    log::debug!("Navigating to {}", url);
    if let Some(window) = window() {
        if let Err(e) = window.location().set_href(url) {
            log::error!("Navigation to {} failed: {}", url, js_error(e));
        }
    }
}

/// The default failure action for pages that need a session.
pub fn redirect_to_login() {
    navigate(&settings::get_settings().login_url);
}

/// Writes `text` through the async Clipboard API.
pub async fn write_clipboard(text: &str) -> std::result::Result<(), String> {
    let navigator = window().ok_or_else(|| "no window".to_string())?.navigator();
    let clipboard = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard")).map_err(js_error)?;
    if clipboard.is_undefined() || clipboard.is_null() {
        return Err("clipboard API unavailable".to_string());
    }
    let write_text: js_sys::Function = js_sys::Reflect::get(&clipboard, &JsValue::from_str("writeText"))
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;
    let promise: js_sys::Promise = write_text
        .call1(&clipboard, &JsValue::from_str(text))
        .map_err(js_error)?
        .dyn_into()
        .map_err(js_error)?;
    JsFuture::from(promise).await.map_err(js_error)?;
    Ok(())
}
