use leptos::prelude::*;
use leptos_ui::clx;

mod components {
    use super::*;
    clx! {Alert, div, "relative w-full rounded-lg border px-4 py-3 text-sm"}
    clx! {AlertTitle, h4, "mb-1 font-medium tracking-tight leading-none"}
    clx! {AlertDescription, p, "text-sm [&_p]:leading-relaxed"}
}

pub use components::*;

/// Inline, operation-local error banner. Renders nothing while `error` is `None`.
#[component]
pub fn ErrorBanner(#[prop(into)] error: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || error.get().is_some() fallback=|| ().into_view()>
            {move || {
                error.get().map(|e| view! {
                    <Alert class="mb-4 border-destructive/30 bg-destructive/5">
                        <AlertDescription class="text-destructive">{e}</AlertDescription>
                    </Alert>
                })
            }}
        </Show>
    }
}

/// Blocking full-page message with a single way out.
#[component]
pub fn ErrorPanel(
    #[prop(into)] title: String,
    #[prop(into)] message: String,
    children: Children,
) -> impl IntoView {
    view! {
        <Alert class="mx-auto my-8 max-w-md border-destructive/40 bg-destructive/5 p-6">
            <AlertTitle class="text-lg">{title}</AlertTitle>
            <AlertDescription class="mb-4 text-destructive">{message}</AlertDescription>
            {children()}
        </Alert>
    }
}
