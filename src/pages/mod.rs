mod auth_callback;
mod dashboard;
mod login;
mod note_detail;

pub use auth_callback::AuthCallbackPage;
pub use dashboard::DashboardPage;
pub use login::LoginPage;
pub use note_detail::NoteDetailPage;

use crate::state::notes::DELETE_CONFIRM_PROMPT;
use leptos_dom::helpers::window;

/// Blocking browser confirm before a delete; a failed dialog counts as "no".
pub(crate) fn confirm_delete() -> bool {
    window()
        .confirm_with_message(DELETE_CONFIRM_PROMPT)
        .unwrap_or(false)
}

/// `window.location.origin`, used to build the OAuth redirect URI.
pub(crate) fn window_origin() -> String {
    window()
        .location()
        .origin()
        .unwrap_or_default()
}
