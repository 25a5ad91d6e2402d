use crate::components::ui::{Button, ButtonSize, ButtonVariant};
use crate::guard::LOGIN_PATH;
use crate::state::AppContext;
use icons::LogOut;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use leptos_router::NavigateOptions;

#[component]
pub fn AppLayout(children: Children) -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let navigate = StoredValue::new(use_navigate());

    let user = move || app_state.0.current_user();

    let on_logout = move |_| {
        app_state.0.logout();
        navigate.with_value(|nav| nav(LOGIN_PATH, NavigateOptions::default()));
    };

    view! {
        <div class="flex min-h-screen flex-col bg-background text-foreground">
            <header class="border-b border-border">
                <div class="mx-auto flex h-14 w-full max-w-5xl items-center justify-between px-4">
                    <a href="/" class="text-sm font-semibold">"Notes"</a>

                    <div class="flex items-center gap-3">
                        {move || {
                            user().map(|u| {
                                let name = u.display_name().to_string();
                                let avatar = u.avatar_url().map(|src| {
                                    view! {
                                        <img
                                            src=src
                                            alt=name.clone()
                                            class="size-7 rounded-full border border-border"
                                        />
                                    }
                                });
                                view! {
                                    <div class="flex items-center gap-2 text-sm">
                                        {avatar}
                                        <span class="text-muted-foreground">{name}</span>
                                    </div>
                                }
                            })
                        }}

                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Sm
                            on:click=on_logout
                        >
                            <LogOut />
                            "Logout"
                        </Button>
                    </div>
                </div>
            </header>

            <main class="mx-auto w-full max-w-5xl flex-1 px-4 py-6">
                {children()}
            </main>

            <footer class="border-t border-border py-4 text-center text-xs text-muted-foreground">
                "Notes for your Discord servers"
            </footer>
        </div>
    }
}
