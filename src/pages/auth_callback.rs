use crate::components::ui::{Button, ButtonSize, ErrorPanel, PageSpinner};
use crate::guard::LOGIN_PATH;
use crate::oauth::{complete_handoff, redirect_uri, CallbackParams, OnceGuard};
use crate::pages::window_origin;
use crate::state::AppContext;
use crate::storage::{take_return_to, BrowserStorage};
use crate::util::Liveness;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_query_map};
use leptos_router::NavigateOptions;

/// Landing page for the provider redirect. Exchanges the `code` exactly once,
/// signs in, then moves on to the remembered return path.
#[component]
pub fn AuthCallbackPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let query = use_query_map();
    let navigate = StoredValue::new(use_navigate());

    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let once = OnceGuard::new();
    let alive = Liveness::new();
    on_cleanup({
        let alive = alive.clone();
        move || alive.kill()
    });

    Effect::new(move |_| {
        if !once.try_claim() {
            return;
        }

        let params = query.with_untracked(|q| CallbackParams::new(q.get("code"), q.get("error")));
        let redirect = redirect_uri(&window_origin());
        let api = app_state.0.api_client();
        let alive = alive.clone();

        spawn_local(async move {
            let result = complete_handoff(&api, &params, &redirect).await;
            if !alive.is_alive() {
                return;
            }

            match result {
                Ok(handoff) => {
                    app_state
                        .0
                        .login(handoff.token, handoff.user, handoff.provider_token);
                    let to = take_return_to(&BrowserStorage);
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
                Err(e) => {
                    error.try_set(Some(e.to_string()));
                }
            }
        });
    });

    view! {
        <div class="min-h-screen bg-background px-4">
            {move || match error.get() {
                None => view! {
                    <div class="flex flex-col items-center">
                        <PageSpinner class="min-h-[50vh]" />
                        <p class="text-sm text-muted-foreground">"Signing you in..."</p>
                    </div>
                }
                .into_any(),
                Some(message) => view! {
                    <ErrorPanel title="Authentication Error" message=message>
                        <Button size=ButtonSize::Sm href=LOGIN_PATH>
                            "Return to Login"
                        </Button>
                    </ErrorPanel>
                }
                .into_any(),
            }}
        </div>
    }
}
