use crate::session::AuthStatus;

pub(crate) const LOGIN_PATH: &str = "/login";
pub(crate) const HOME_PATH: &str = "/";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardKind {
    /// Only signed-in users get the nested content.
    RequireAuth,
    /// Only signed-out users get the nested content (login, OAuth callback).
    RequireGuest,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Pending,
    Render,
    Redirect(String),
}

/// Route gate as a pure transition: `Loading` holds, the wrong side of the
/// gate redirects, the right side renders.
pub fn decide(kind: GuardKind, status: AuthStatus, current_path: &str) -> GuardDecision {
    match (kind, status) {
        (_, AuthStatus::Loading) => GuardDecision::Pending,
        (GuardKind::RequireAuth, AuthStatus::Authenticated) => GuardDecision::Render,
        (GuardKind::RequireAuth, AuthStatus::Unauthenticated) => {
            GuardDecision::Redirect(login_redirect(current_path))
        }
        (GuardKind::RequireGuest, AuthStatus::Unauthenticated) => GuardDecision::Render,
        (GuardKind::RequireGuest, AuthStatus::Authenticated) => {
            GuardDecision::Redirect(HOME_PATH.to_string())
        }
    }
}

fn login_redirect(from: &str) -> String {
    if from.is_empty() || from == HOME_PATH {
        LOGIN_PATH.to_string()
    } else {
        format!("{LOGIN_PATH}?from={}", urlencoding::encode(from))
    }
}
