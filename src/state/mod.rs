pub(crate) mod form;
pub(crate) mod notes;

use crate::api::ApiClient;
use crate::config::EnvConfig;
use crate::models::User;
use crate::realtime::RealtimeFeed;
use crate::session::{AuthStatus, Session};
use crate::storage::{BrowserStorage, KeyValueStore, PROVIDER_TOKEN_KEY};
use leptos::prelude::*;

/// Application-lifetime state, created once in `App` and handed to views via
/// context.
#[derive(Clone, Copy)]
pub(crate) struct AppState {
    pub config: StoredValue<EnvConfig>,

    /// Starts as `Loading`; `hydrate` resolves it from localStorage.
    pub session: RwSignal<Session>,

    /// The single push-channel connection (browser handles are not `Send`).
    pub feed: StoredValue<RealtimeFeed, LocalStorage>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            config: StoredValue::new(EnvConfig::new()),
            session: RwSignal::new(Session::pending()),
            feed: StoredValue::new_local(RealtimeFeed::new()),
        }
    }

    pub fn hydrate(&self) {
        self.session.set(Session::hydrate(&BrowserStorage));
    }

    pub fn status(&self) -> AuthStatus {
        self.session.with(|s| s.status())
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.with(|s| s.user().cloned())
    }

    /// Client carrying the current bearer token (read untracked: event
    /// handlers and tasks call this).
    pub fn api_client(&self) -> ApiClient {
        let base_url = self.config.with_value(|c| c.api_url.clone());
        let token = self
            .session
            .with_untracked(|s| s.token().map(str::to_string));
        ApiClient::new(base_url).with_token(token)
    }

    pub fn login(&self, token: String, user: User, provider_token: Option<String>) {
        if let Some(pt) = provider_token {
            BrowserStorage.set_item(PROVIDER_TOKEN_KEY, &pt);
        }
        self.session
            .update(|s| s.login(&BrowserStorage, token, user));
    }

    pub fn logout(&self) {
        self.feed.with_value(|f| f.disconnect());
        self.session.update(|s| s.logout(&BrowserStorage));
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);
