use serde::{Deserialize, Serialize};

pub(crate) const TOKEN_KEY: &str = "token";
pub(crate) const PROVIDER_TOKEN_KEY: &str = "provider_token";
pub(crate) const USER_KEY: &str = "user";
pub(crate) const RETURN_TO_KEY: &str = "return_to";

/// String key/value persistence that survives page reloads.
///
/// The browser implementation is `localStorage`; tests use [`MemoryStorage`].
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

/// `window.localStorage`. Every call degrades to a no-op when storage is
/// unavailable (private mode, quota, no window).
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        Self::storage().and_then(|s| s.get_item(key).ok().flatten())
    }

    fn set_item(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, value).is_err() {
                tracing::warn!(key, "localStorage write failed");
            }
        }
    }

    fn remove_item(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

#[cfg(test)]
#[derive(Default)]
pub(crate) struct MemoryStorage {
    items: std::cell::RefCell<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

pub(crate) fn load_json_from_storage<T: for<'de> Deserialize<'de>>(
    store: &impl KeyValueStore,
    key: &str,
) -> Option<T> {
    let json = store.get_item(key)?;
    match serde_json::from_str(&json) {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding unreadable stored value");
            None
        }
    }
}

pub(crate) fn save_json_to_storage<T: Serialize>(store: &impl KeyValueStore, key: &str, value: &T) {
    if let Ok(json) = serde_json::to_string(value) {
        store.set_item(key, &json);
    }
}

/// Remember where to land after the OAuth round trip.
pub(crate) fn save_return_to(store: &impl KeyValueStore, path: &str) {
    match sanitize_return_path(path) {
        Some(p) => store.set_item(RETURN_TO_KEY, p),
        None => store.remove_item(RETURN_TO_KEY),
    }
}

/// One-shot read of the stored return path; falls back to the main view.
pub(crate) fn take_return_to(store: &impl KeyValueStore) -> String {
    let stored = store.get_item(RETURN_TO_KEY);
    store.remove_item(RETURN_TO_KEY);
    stored
        .as_deref()
        .and_then(sanitize_return_path)
        .unwrap_or("/")
        .to_string()
}

/// Only same-origin absolute paths are allowed, and never the auth pages
/// themselves.
///
/// Browsers treat `\` like `/` and drop tabs/newlines while parsing, so
/// `/\host` and `/\t/host` both resolve to another origin.
pub(crate) fn sanitize_return_path(path: &str) -> Option<&str> {
    let path = path.trim();
    if !path.starts_with('/') || path.chars().any(char::is_control) {
        return None;
    }
    if matches!(path.chars().nth(1), Some('/') | Some('\\')) {
        return None;
    }
    if path.starts_with("/login") || path.starts_with("/auth/") {
        return None;
    }
    Some(path)
}
