use serde::{Deserialize, Serialize};

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_AUTHORIZE_URL: &str = "https://discord.com/api/oauth2/authorize";

/// Runtime configuration for the SPA.
///
/// Values come from `window.ENV` (set by the hosting page), then from the
/// `NOTES_*` variables baked in at compile time, then from local defaults.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EnvConfig {
    pub api_url: String,
    pub ws_url: String,
    pub oauth_client_id: String,
    pub oauth_authorize_url: String,
}

impl EnvConfig {
    pub fn new() -> Self {
        let api_url = read_window_env(&["API_URL", "api_url"])
            .or_else(|| option_env!("NOTES_API_URL").map(str::to_string))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let ws_url = read_window_env(&["WS_URL", "ws_url"])
            .or_else(|| option_env!("NOTES_WS_URL").map(str::to_string));

        let oauth_client_id = read_window_env(&["OAUTH_CLIENT_ID", "oauth_client_id"])
            .or_else(|| option_env!("NOTES_OAUTH_CLIENT_ID").map(str::to_string))
            .unwrap_or_default();

        let oauth_authorize_url = read_window_env(&["OAUTH_AUTHORIZE_URL"])
            .unwrap_or_else(|| DEFAULT_AUTHORIZE_URL.to_string());

        Self::from_parts(api_url, ws_url, oauth_client_id, oauth_authorize_url)
    }

    pub(crate) fn from_parts(
        api_url: String,
        ws_url: Option<String>,
        oauth_client_id: String,
        oauth_authorize_url: String,
    ) -> Self {
        let api_url = api_url.trim_end_matches('/').to_string();
        let ws_url = ws_url
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| derive_ws_url(&api_url));

        if oauth_client_id.is_empty() {
            tracing::warn!("no OAuth client id configured; login links will be rejected");
        }

        Self {
            api_url,
            ws_url,
            oauth_client_id,
            oauth_authorize_url,
        }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}

// We accept several spellings for each key (`API_URL` is documented, the
// lowercase form is what older deployments set).
fn read_window_env(keys: &[&str]) -> Option<String> {
    let window = web_sys::window()?;
    let env = window.get("ENV")?;
    if env.is_undefined() || !env.is_object() {
        return None;
    }

    keys.iter().find_map(|k| {
        js_sys::Reflect::get(&env, &(*k).into())
            .ok()
            .and_then(|v| v.as_string())
            .filter(|s| !s.trim().is_empty())
    })
}

/// Push channel URL for a backend base URL: same host, websocket scheme, `/ws`.
pub(crate) fn derive_ws_url(api_url: &str) -> String {
    let base = api_url.trim_end_matches('/');
    let swapped = if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}")
    } else if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}")
    } else {
        base.to_string()
    };
    format!("{swapped}/ws")
}
