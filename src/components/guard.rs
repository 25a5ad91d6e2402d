use crate::components::ui::PageSpinner;
use crate::guard::{decide, GuardDecision, GuardKind};
use crate::state::AppContext;
use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};
use leptos_router::NavigateOptions;

fn guarded(kind: GuardKind, children: ChildrenFn) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let location = use_location();
    let navigate = StoredValue::new(use_navigate());

    // Store children so the view macro sees an `Fn` (not an `FnOnce`).
    let children = StoredValue::new(children);

    let decision = Memo::new(move |_| {
        let search = location.search.get();
        let search = search.trim_start_matches('?');
        let path = if search.is_empty() {
            location.pathname.get()
        } else {
            format!("{}?{}", location.pathname.get(), search)
        };
        decide(kind, app_state.0.status(), &path)
    });

    Effect::new(move |_| {
        if let GuardDecision::Redirect(to) = decision.get() {
            tracing::debug!(?kind, to = %to, "route guard redirect");
            navigate.with_value(|nav| {
                nav(
                    &to,
                    NavigateOptions {
                        replace: true,
                        ..Default::default()
                    },
                )
            });
        }
    });

    view! {
        <Show
            when=move || decision.get() == GuardDecision::Render
            fallback=|| view! { <PageSpinner class="min-h-screen" /> }
        >
            {move || children.with_value(|c| c())}
        </Show>
    }
}

/// Renders its children only for a signed-in user; everyone else is sent to
/// `/login?from=<current path>`.
#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    guarded(GuardKind::RequireAuth, children)
}

/// Renders its children only for a signed-out user; a signed-in user is sent
/// home.
#[component]
pub fn RequireGuest(children: ChildrenFn) -> impl IntoView {
    guarded(GuardKind::RequireGuest, children)
}
