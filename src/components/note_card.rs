use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardFooter, CardHeader, CardTitle,
};
use crate::models::Note;
use crate::util::{format_short, paragraphs};
use icons::{Pencil, Trash2};
use leptos::prelude::*;

const PREVIEW_LINES: usize = 3;

/// List entry for one note. Clicking the card opens it; the action buttons
/// stop propagation so they don't also open it.
#[component]
pub fn NoteCard(
    note: Note,
    #[prop(into)] on_open: Callback<String>,
    #[prop(into)] on_edit: Callback<Note>,
    #[prop(into)] on_delete: Callback<String>,
    /// A mutation is in flight; deleting again is blocked until it settles.
    #[prop(into, optional)]
    busy: Signal<bool>,
) -> impl IntoView {
    let expanded = RwSignal::new(false);

    let lines = paragraphs(&note.content);
    let long = lines.len() > PREVIEW_LINES;
    let lines = StoredValue::new(lines);

    let created = format_short(&note.created_at);
    let updated = note.was_edited().then(|| format_short(&note.updated_at));

    let id = note.id.clone();
    let title = note.title.clone();
    let note = StoredValue::new(note);

    let open_id = id.clone();
    let delete_id = id;

    view! {
        <Card
            class="cursor-pointer transition-colors hover:bg-accent/40"
            on:click=move |_| on_open.run(open_id.clone())
        >
            <CardHeader>
                <CardTitle class="text-base">{title}</CardTitle>
            </CardHeader>

            <CardContent class="space-y-1 text-sm text-muted-foreground">
                {move || {
                    let shown = if expanded.get() { usize::MAX } else { PREVIEW_LINES };
                    lines.with_value(|ls| {
                        ls.iter()
                            .take(shown)
                            .map(|l| view! { <p class="min-h-4 break-words">{l.clone()}</p> })
                            .collect_view()
                    })
                }}

                <Show when=move || long fallback=|| ().into_view()>
                    <Button
                        variant=ButtonVariant::Link
                        size=ButtonSize::Sm
                        class="h-auto px-0"
                        on:click=move |ev: web_sys::MouseEvent| {
                            ev.stop_propagation();
                            expanded.update(|e| *e = !*e);
                        }
                    >
                        {move || if expanded.get() { "Show less" } else { "Read more" }}
                    </Button>
                </Show>
            </CardContent>

            <CardFooter class="justify-between text-xs text-muted-foreground">
                <div class="flex flex-col">
                    <span>"Created " {created}</span>
                    {updated.map(|u| view! { <span>"Updated " {u}</span> })}
                </div>

                <div class="flex items-center gap-1">
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        attr:aria-label="Edit note"
                        on:click=move |ev: web_sys::MouseEvent| {
                            ev.stop_propagation();
                            on_edit.run(note.get_value());
                        }
                    >
                        <Pencil />
                    </Button>
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        class="hover:text-destructive"
                        attr:aria-label="Delete note"
                        attr:disabled=move || busy.get()
                        on:click=move |ev: web_sys::MouseEvent| {
                            ev.stop_propagation();
                            on_delete.run(delete_id.clone());
                        }
                    >
                        <Trash2 />
                    </Button>
                </div>
            </CardFooter>
        </Card>
    }
}
