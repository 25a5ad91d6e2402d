use crate::api::{ApiErrorKind, AuthApi};
use crate::config::EnvConfig;
use crate::models::User;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub(crate) const CALLBACK_PATH: &str = "/auth/callback";

/// Provider authorize URL the login button links to.
pub(crate) fn authorize_url(cfg: &EnvConfig, origin: &str) -> String {
    format!(
        "{}?client_id={}&redirect_uri={}&response_type=code&scope=identify",
        cfg.oauth_authorize_url,
        urlencoding::encode(&cfg.oauth_client_id),
        urlencoding::encode(&redirect_uri(origin)),
    )
}

pub(crate) fn redirect_uri(origin: &str) -> String {
    format!("{}{}", origin.trim_end_matches('/'), CALLBACK_PATH)
}

/// Query parameters the provider appends when redirecting back.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

impl CallbackParams {
    pub(crate) fn new(code: Option<String>, error: Option<String>) -> Self {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            code: non_blank(code),
            error: non_blank(error),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum OAuthError {
    /// The provider redirected back with `error=...`.
    ProviderDenied,
    MissingCode,
    /// `/auth/exchange` answered non-2xx or could not be reached.
    Rejected(Option<String>),
    /// 2xx but without both `token` and `user`.
    IncompleteResponse(Option<String>),
}

impl std::fmt::Display for OAuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OAuthError::ProviderDenied => write!(f, "Authentication failed. Please try again."),
            OAuthError::MissingCode => write!(f, "No authorization code found."),
            OAuthError::Rejected(Some(msg)) | OAuthError::IncompleteResponse(Some(msg)) => {
                write!(f, "{msg}")
            }
            OAuthError::Rejected(None) => write!(
                f,
                "An error occurred during authentication. Please try again."
            ),
            OAuthError::IncompleteResponse(None) => {
                write!(f, "Failed to authenticate with Discord.")
            }
        }
    }
}

impl std::error::Error for OAuthError {}

/// Everything the page needs to finish signing in.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Handoff {
    pub token: String,
    pub user: User,
    pub provider_token: Option<String>,
}

/// Validates the redirect and exchanges the code. Pure with respect to
/// session state: the caller applies the result.
pub(crate) async fn complete_handoff(
    api: &impl AuthApi,
    params: &CallbackParams,
    redirect_uri: &str,
) -> Result<Handoff, OAuthError> {
    if let Some(err) = &params.error {
        tracing::warn!(provider_error = %err, "provider denied authorization");
        return Err(OAuthError::ProviderDenied);
    }

    let Some(code) = params.code.as_deref() else {
        return Err(OAuthError::MissingCode);
    };

    let resp = match api.exchange_code(code, redirect_uri).await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::error!(error = %e, "authorization code exchange failed");
            let msg = match e.kind {
                ApiErrorKind::Network | ApiErrorKind::Parse => None,
                ApiErrorKind::Http | ApiErrorKind::Unauthorized => e.server_message(),
            };
            return Err(OAuthError::Rejected(msg));
        }
    };

    let server_msg = resp.server_message();
    match (resp.token.filter(|t| !t.trim().is_empty()), resp.user) {
        (Some(token), Some(user)) => Ok(Handoff {
            token,
            user,
            provider_token: resp.provider_token.filter(|t| !t.trim().is_empty()),
        }),
        _ => {
            tracing::warn!("exchange response missing token or user");
            Err(OAuthError::IncompleteResponse(server_msg))
        }
    }
}

/// One-shot latch: the first `try_claim` wins, every later call loses.
#[derive(Clone, Debug, Default)]
pub(crate) struct OnceGuard(Arc<AtomicBool>);

impl OnceGuard {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn try_claim(&self) -> bool {
        !self.0.swap(true, Ordering::SeqCst)
    }
}
