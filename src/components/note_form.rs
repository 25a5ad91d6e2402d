use crate::components::ui::{
    Alert, AlertDescription, Button, ButtonSize, ButtonVariant, Input, Label, Select, Spinner,
    TextArea,
};
use crate::models::{Note, Visibility};
use crate::state::form::{NoteDraft, NoteFormValues};
use leptos::prelude::*;

/// Create/edit form. Validation happens here; the caller receives a
/// ready-to-send draft.
#[component]
pub fn NoteForm(
    #[prop(optional)] initial: Option<Note>,
    #[prop(into)] on_submit: Callback<NoteDraft>,
    #[prop(into)] on_cancel: Callback<()>,
    #[prop(into)] loading: Signal<bool>,
) -> impl IntoView {
    let editing = initial.is_some();
    let values = initial
        .as_ref()
        .map(|n| NoteFormValues::from_note(n, &chrono::Local))
        .unwrap_or_default();

    let title = RwSignal::new(values.title);
    let content = RwSignal::new(values.content);
    let visibility = RwSignal::new(values.visibility.as_str().to_string());
    let alert_at = RwSignal::new(values.alert_at);
    let error: RwSignal<Option<String>> = RwSignal::new(None);

    let on_form_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if loading.get_untracked() {
            return;
        }

        let values = NoteFormValues {
            title: title.get_untracked(),
            content: content.get_untracked(),
            visibility: Visibility::parse(&visibility.get_untracked()),
            alert_at: alert_at.get_untracked(),
        };

        match values.validate(&chrono::Local) {
            Ok(draft) => {
                error.set(None);
                on_submit.run(draft);
            }
            Err(e) => error.set(Some(e.to_string())),
        }
    };

    let visibility_options = [Visibility::Private, Visibility::Public]
        .into_iter()
        .map(|v| (v.as_str(), v.label()))
        .collect::<Vec<_>>();

    view! {
        <form class="flex flex-col gap-4" on:submit=on_form_submit>
            <div class="flex flex-col gap-1.5">
                <Label html_for="note-title">"Title"</Label>
                <Input id="note-title" placeholder="Note title" bind_value=title required=true />
            </div>

            <div class="flex flex-col gap-1.5">
                <Label html_for="note-content">"Content"</Label>
                <TextArea id="note-content" placeholder="Write your note..." bind_value=content />
            </div>

            <div class="grid gap-4 sm:grid-cols-2">
                <div class="flex flex-col gap-1.5">
                    <Label html_for="note-visibility">"Visibility"</Label>
                    <Select id="note-visibility" options=visibility_options bind_value=visibility />
                </div>

                <div class="flex flex-col gap-1.5">
                    <Label html_for="note-alert">"Reminder"</Label>
                    <Input id="note-alert" r#type="datetime-local" bind_value=alert_at />
                </div>
            </div>

            <Show when=move || error.get().is_some() fallback=|| ().into_view()>
                {move || {
                    error.get().map(|e| {
                        view! {
                            <Alert class="border-destructive/30">
                                <AlertDescription class="text-destructive text-xs">{e}</AlertDescription>
                            </Alert>
                        }
                    })
                }}
            </Show>

            <div class="flex justify-end gap-2">
                <Button
                    variant=ButtonVariant::Outline
                    size=ButtonSize::Sm
                    attr:r#type="button"
                    on:click=move |_| on_cancel.run(())
                >
                    "Cancel"
                </Button>
                <Button size=ButtonSize::Sm attr:disabled=move || loading.get()>
                    <span class="inline-flex items-center gap-2">
                        <Show when=move || loading.get() fallback=|| ().into_view()>
                            <Spinner />
                        </Show>
                        {if editing { "Update Note" } else { "Create Note" }}
                    </span>
                </Button>
            </div>
        </form>
    }
}
