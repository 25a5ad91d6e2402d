use crate::models::User;
use crate::storage::{
    load_json_from_storage, save_json_to_storage, KeyValueStore, PROVIDER_TOKEN_KEY, TOKEN_KEY,
    USER_KEY,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthStatus {
    /// Persisted state has not been read yet.
    Loading,
    Authenticated,
    Unauthenticated,
}

/// Current identity and bearer token.
///
/// Pure state container: it only talks to a [`KeyValueStore`], never to the
/// network. The reactive wrapper lives in `state::AppState`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    hydrated: bool,
    token: Option<String>,
    user: Option<User>,
}

impl Session {
    /// A session that has not been hydrated yet (reports `Loading`).
    pub fn pending() -> Self {
        Self::default()
    }

    /// Restore from persisted storage. A profile without a token is stale and
    /// gets dropped.
    pub fn hydrate(store: &impl KeyValueStore) -> Self {
        let token = store.get_item(TOKEN_KEY).filter(|t| !t.trim().is_empty());
        let user = if token.is_some() {
            load_json_from_storage::<User>(store, USER_KEY)
        } else {
            store.remove_item(USER_KEY);
            None
        };

        tracing::debug!(authenticated = token.is_some(), "session hydrated");

        Self {
            hydrated: true,
            token,
            user,
        }
    }

    pub fn login(&mut self, store: &impl KeyValueStore, token: String, user: User) {
        store.set_item(TOKEN_KEY, &token);
        save_json_to_storage(store, USER_KEY, &user);
        tracing::info!(user_id = %user.id, "signed in");

        self.hydrated = true;
        self.token = Some(token);
        self.user = Some(user);
    }

    pub fn logout(&mut self, store: &impl KeyValueStore) {
        store.remove_item(TOKEN_KEY);
        store.remove_item(USER_KEY);
        store.remove_item(PROVIDER_TOKEN_KEY);
        tracing::info!("signed out");

        self.hydrated = true;
        self.token = None;
        self.user = None;
    }

    pub fn status(&self) -> AuthStatus {
        if !self.hydrated {
            AuthStatus::Loading
        } else if self.token.is_some() {
            AuthStatus::Authenticated
        } else {
            AuthStatus::Unauthenticated
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status() == AuthStatus::Loading
    }

    pub fn is_authenticated(&self) -> bool {
        self.status() == AuthStatus::Authenticated
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            username: format!("user{id}"),
            discriminator: "0".to_string(),
            avatar: None,
            email: None,
            verified: Some(true),
            global_name: None,
        }
    }

    #[test]
    fn test_pending_session_reports_loading() {
        let s = Session::pending();
        assert_eq!(s.status(), AuthStatus::Loading);
        assert!(!s.is_authenticated());
    }

    #[test]
    fn test_hydrate_without_token_is_unauthenticated() {
        let store = MemoryStorage::default();
        let s = Session::hydrate(&store);
        assert_eq!(s.status(), AuthStatus::Unauthenticated);
    }

    #[test]
    fn test_hydrate_drops_user_without_token() {
        let store = MemoryStorage::default();
        save_json_to_storage(&store, USER_KEY, &user("1"));
        let s = Session::hydrate(&store);
        assert!(s.user().is_none());
        assert!(store.get_item(USER_KEY).is_none());
    }

    #[test]
    fn test_login_persists_and_hydrate_restores() {
        let store = MemoryStorage::default();
        let mut s = Session::hydrate(&store);
        s.login(&store, "jwt".to_string(), user("7"));
        assert_eq!(store.get_item(TOKEN_KEY).as_deref(), Some("jwt"));

        let restored = Session::hydrate(&store);
        assert!(restored.is_authenticated());
        assert_eq!(restored.token(), Some("jwt"));
        assert_eq!(restored.user().map(|u| u.id.as_str()), Some("7"));
    }

    #[test]
    fn test_logout_clears_everything() {
        let store = MemoryStorage::default();
        store.set_item(PROVIDER_TOKEN_KEY, "discord-access");
        let mut s = Session::hydrate(&store);
        s.login(&store, "jwt".to_string(), user("7"));
        s.logout(&store);

        assert_eq!(s.status(), AuthStatus::Unauthenticated);
        assert!(s.user().is_none());
        assert!(store.get_item(TOKEN_KEY).is_none());
        assert!(store.get_item(USER_KEY).is_none());
        assert!(store.get_item(PROVIDER_TOKEN_KEY).is_none());
    }

    #[test]
    fn test_is_authenticated_tracks_token_presence_over_sequences() {
        let store = MemoryStorage::default();
        let mut s = Session::hydrate(&store);

        // l = login, o = logout; check after every step.
        for (i, step) in "lloloollo".chars().enumerate() {
            match step {
                'l' => s.login(&store, format!("t{i}"), user("1")),
                'o' => s.logout(&store),
                _ => {}
            }
            assert_eq!(s.is_authenticated(), s.token().is_some());
            assert_eq!(s.is_authenticated(), store.get_item(TOKEN_KEY).is_some());
            assert_ne!(s.status(), AuthStatus::Loading);
        }
        assert!(!s.is_authenticated());
    }
}
