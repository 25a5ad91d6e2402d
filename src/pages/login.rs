use crate::components::ui::{Card, CardContent, CardDescription, CardHeader, CardTitle};
use crate::oauth::authorize_url;
use crate::pages::window_origin;
use crate::state::AppContext;
use crate::storage::{save_return_to, BrowserStorage};
use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

#[component]
pub fn LoginPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let query = use_query_map();

    let href = app_state
        .0
        .config
        .with_value(|cfg| authorize_url(cfg, &window_origin()));

    // The provider redirect drops our query string, so `from` has to survive
    // in storage until the callback page reads it.
    let on_click = move |_| {
        let from = query.get_untracked().get("from").unwrap_or_default();
        save_return_to(&BrowserStorage, &from);
        tracing::debug!(from = %from, "leaving for provider authorization");
    };

    view! {
        <div class="min-h-screen bg-background">
            <div class="mx-auto flex min-h-screen w-full max-w-sm flex-col justify-center px-4 py-10">
                <div class="mb-6 flex items-center justify-center">
                    <span class="text-sm font-medium text-foreground">"Notes"</span>
                </div>

                <Card>
                    <CardHeader>
                        <CardTitle class="text-lg">"Log in"</CardTitle>
                        <CardDescription class="text-xs">
                            "Sign in with your Discord account to see your notes."
                        </CardDescription>
                    </CardHeader>

                    <CardContent>
                        <a
                            href=href
                            on:click=on_click
                            class="inline-flex h-9 w-full items-center justify-center rounded-md bg-[#5865F2] px-4 text-sm font-medium text-white shadow-xs hover:bg-[#4752C4]"
                        >
                            "Login with Discord"
                        </a>
                    </CardContent>
                </Card>
            </div>
        </div>
    }
}
