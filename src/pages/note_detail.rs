use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Card, CardContent, CardFooter, CardHeader, CardTitle,
    ErrorBanner, PageSpinner,
};
use crate::components::{AppLayout, NoteForm};
use crate::guard::HOME_PATH;
use crate::pages::confirm_delete;
use crate::state::form::NoteDraft;
use crate::state::notes::{
    confirm_and_delete, fetch_note, submit_update, NoteDetailState, DELETE_NOTE_ERROR,
    LOAD_NOTE_ERROR, UPDATE_NOTE_ERROR,
};
use crate::state::AppContext;
use crate::util::{format_long, paragraphs, Liveness};
use icons::{ArrowLeft, Bell, Pencil, Trash2};
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params};
use leptos_router::params::Params;
use leptos_router::NavigateOptions;

#[derive(Params, PartialEq, Clone, Debug)]
pub struct NoteRouteParams {
    pub id: Option<String>,
}

#[component]
pub fn NoteDetailPage() -> impl IntoView {
    let app_state = expect_context::<AppContext>();
    let params = use_params::<NoteRouteParams>();
    let navigate = StoredValue::new(use_navigate());

    // Use a closure so params access happens inside a reactive tracking context.
    let note_id = move || params.get().ok().and_then(|p| p.id).unwrap_or_default();

    let detail: RwSignal<NoteDetailState> = RwSignal::new(NoteDetailState::default());
    let editing = RwSignal::new(false);
    let loading = Signal::derive(move || detail.with(|s| s.loading));
    let error = Signal::derive(move || detail.with(|s| s.error.clone()));

    let alive = Liveness::new();
    on_cleanup({
        let alive = alive.clone();
        move || alive.kill()
    });

    let go_home = move || {
        navigate.with_value(|nav| nav(HOME_PATH, NavigateOptions::default()));
    };

    // Refetch whenever the route id changes.
    Effect::new({
        let alive = alive.clone();
        move |_| {
            let id = note_id();
            if id.trim().is_empty() {
                return;
            }
            let api = app_state.0.api_client();
            let alive = alive.clone();
            editing.set(false);
            detail.update(|s| s.begin());

            spawn_local(async move {
                let result = fetch_note(&api, &id).await;
                if !alive.is_alive() {
                    return;
                }
                detail.try_update(|s| match result {
                    Ok(note) => s.loaded(note),
                    Err(_) => s.failed(LOAD_NOTE_ERROR),
                });
            });
        }
    });

    let on_submit = {
        let alive = alive.clone();
        Callback::new(move |draft: NoteDraft| {
            let id = note_id();
            let api = app_state.0.api_client();
            let alive = alive.clone();
            detail.update(|s| s.begin());

            spawn_local(async move {
                let result = submit_update(&api, &id, &draft.into_patch()).await;
                if !alive.is_alive() {
                    return;
                }
                match result {
                    Ok(note) => {
                        detail.try_update(|s| s.loaded(note));
                        editing.try_set(false);
                    }
                    Err(_) => {
                        detail.try_update(|s| s.failed(UPDATE_NOTE_ERROR));
                    }
                }
            });
        })
    };

    let on_delete = {
        let alive = alive.clone();
        Callback::new(move |_: ()| {
            let id = note_id();
            let api = app_state.0.api_client();
            let alive = alive.clone();

            spawn_local(async move {
                let begin = || {
                    detail.update(|s| s.begin());
                };
                let Some(result) = confirm_and_delete(&api, &id, confirm_delete, begin).await
                else {
                    return;
                };
                if !alive.is_alive() {
                    return;
                }
                match result {
                    Ok(()) => {
                        detail.try_update(|s| s.deleted());
                        go_home();
                    }
                    Err(_) => {
                        detail.try_update(|s| s.failed(DELETE_NOTE_ERROR));
                    }
                }
            });
        })
    };

    let on_cancel = Callback::new(move |_: ()| editing.set(false));

    view! {
        <AppLayout>
            <div class="space-y-4">
                <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm on:click=move |_| go_home()>
                    <ArrowLeft />
                    "Back to Notes"
                </Button>

                <ErrorBanner error=error />

                {move || {
                    let Some(note) = detail.with(|s| s.note.clone()) else {
                        return if loading.get() {
                            view! { <PageSpinner /> }.into_any()
                        } else {
                            view! {
                                <div class="py-12 text-center text-sm text-muted-foreground">
                                    "Note not found."
                                </div>
                            }
                            .into_any()
                        };
                    };

                    if editing.get() {
                        return view! {
                            <Card>
                                <CardHeader>
                                    <CardTitle>"Edit Note"</CardTitle>
                                </CardHeader>
                                <CardContent>
                                    <NoteForm
                                        initial=note
                                        on_submit=on_submit
                                        on_cancel=on_cancel
                                        loading=loading
                                    />
                                </CardContent>
                            </Card>
                        }
                        .into_any();
                    }

                    let created = format_long(&note.created_at);
                    let updated = note.was_edited().then(|| format_long(&note.updated_at));
                    let reminder = note.alert_at.as_ref().map(format_long);

                    view! {
                        <Card>
                            <CardHeader>
                                <CardTitle class="text-2xl">{note.title.clone()}</CardTitle>
                                <span class="rounded-full border border-border px-2 py-0.5 text-xs text-muted-foreground">
                                    {note.visibility.label()}
                                </span>
                            </CardHeader>

                            <CardContent class="space-y-2">
                                {paragraphs(&note.content)
                                    .into_iter()
                                    .map(|p| view! { <p class="min-h-4 break-words">{p}</p> })
                                    .collect_view()}
                            </CardContent>

                            <CardFooter class="flex-col items-start gap-3 text-xs text-muted-foreground sm:flex-row sm:items-center sm:justify-between">
                                <div class="flex flex-col gap-0.5">
                                    <span>"Created: " {created}</span>
                                    {updated.map(|u| view! { <span>"Updated: " {u}</span> })}
                                    {reminder.map(|r| view! {
                                        <span class="inline-flex items-center gap-1">
                                            <Bell class="size-3" />
                                            "Reminder: " {r}
                                        </span>
                                    })}
                                </div>

                                <div class="flex items-center gap-2">
                                    <Button
                                        variant=ButtonVariant::Outline
                                        size=ButtonSize::Sm
                                        on:click=move |_| editing.set(true)
                                    >
                                        <Pencil />
                                        "Edit"
                                    </Button>
                                    <Button
                                        variant=ButtonVariant::Destructive
                                        size=ButtonSize::Sm
                                        attr:disabled=move || loading.get()
                                        on:click=move |_| on_delete.run(())
                                    >
                                        <Trash2 />
                                        "Delete"
                                    </Button>
                                </div>
                            </CardFooter>
                        </Card>
                    }
                    .into_any()
                }}
            </div>
        </AppLayout>
    }
}
