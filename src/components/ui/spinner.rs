use icons::LoaderCircle;
use leptos::prelude::*;
use tw_merge::tw_merge;

#[component]
pub fn Spinner(#[prop(into, optional)] class: String) -> impl IntoView {
    let merged_class = tw_merge!("size-4 animate-spin", class);

    view! { <LoaderCircle class=merged_class attr:role="status" attr:aria-label="Loading" /> }
}

/// Placeholder shown while something page-sized is pending.
#[component]
pub fn PageSpinner(#[prop(into, optional)] class: String) -> impl IntoView {
    let merged_class = tw_merge!("flex items-center justify-center py-12", class);

    view! {
        <div class=merged_class>
            <Spinner class="size-8 text-muted-foreground" />
        </div>
    }
}
