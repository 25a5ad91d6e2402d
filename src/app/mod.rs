use crate::components::{RequireAuth, RequireGuest};
use crate::pages::{AuthCallbackPage, DashboardPage, LoginPage, NoteDetailPage};
use crate::state::{AppContext, AppState};
use leptos::prelude::*;
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

#[component]
pub fn App() -> impl IntoView {
    let app_state = AppState::new();
    provide_context(AppContext(app_state));

    // Session starts as `Loading`; resolve it once the app is mounted.
    Effect::new(move |_| app_state.hydrate());

    // The OAuth callback stays unguarded: it signs in and redirects by itself.
    view! {
        <Router>
            <Routes fallback=|| view! {
                <RequireAuth>
                    <DashboardPage />
                </RequireAuth>
            }>
                <Route path=path!("") view=|| view! {
                    <RequireAuth>
                        <DashboardPage />
                    </RequireAuth>
                } />
                <Route path=path!("notes/:id") view=|| view! {
                    <RequireAuth>
                        <NoteDetailPage />
                    </RequireAuth>
                } />
                <Route path=path!("login") view=|| view! {
                    <RequireGuest>
                        <LoginPage />
                    </RequireGuest>
                } />
                <Route path=path!("auth/callback") view=AuthCallbackPage />
            </Routes>
        </Router>
    }
}
